// HEARTBEATS MONITOR LOOP
// ISSUES ONE HEARTBEAT PER INTERVAL UNTIL CTRL+C OR THE BEAT LIMIT.
// TIMESTAMPS ARE CLOCK_MONOTONIC NANOSECONDS SINCE START; ENERGY IS RAPL MICROJOULES.
// RATES ARE PRINTED PER SECOND (ENGINE RATES ARE PER NANOSECOND).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use log::info;

use heartbeats::clock::MonotonicClock;
use heartbeats::config::{HeartbeatConfig, LogTarget};
use heartbeats::energy::EnergyReader;
use heartbeats::sink::FdSink;
use heartbeats::{Beat, Heartbeat, HeartbeatLogger};

const NS_PER_SEC: f64 = 1_000_000_000.0;

fn open_sink(target: &LogTarget) -> Result<Box<dyn Write>> {
    Ok(match target {
        LogTarget::None => Box::new(io::sink()),
        LogTarget::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        LogTarget::Fd(fd) => Box::new(FdSink::new(*fd)?),
    })
}

fn print_window(hb: &Heartbeat, verbose: bool) {
    let mut line = format!(
        "hb: {:<8} window_perf/s: {:<14.3} global_perf/s: {:<14.3}",
        hb.count(),
        hb.window_perf() * NS_PER_SEC,
        hb.global_perf() * NS_PER_SEC,
    );
    if hb.variant().tracks_accuracy() {
        line.push_str(&format!(" window_acc: {:<8.3}", hb.window_accuracy_rate()));
    }
    if hb.variant().tracks_power() {
        // UJ PER NS -> W
        line.push_str(&format!(" window_power_w: {:<10.3}", hb.window_power() * 1_000.0));
    }
    println!("{}", line);

    if verbose {
        println!(
            "  TOTAL work={} time_ns={} accuracy={} energy_uj={} instant_perf/s={:.3}",
            hb.global_work(), hb.global_time(), hb.global_accuracy(),
            hb.global_energy(), hb.instant_perf() * NS_PER_SEC
        );
    }
}

fn summary(hb: &Heartbeat) {
    println!("\n{}", "=".repeat(50));
    println!("HEARTBEATS SUMMARY");
    println!("{}", "=".repeat(50));
    println!("  VARIANT:           {}", hb.variant().label());
    println!("  HEARTBEATS:        {}", hb.count());
    println!("  WINDOW SIZE:       {}", hb.window_size());
    println!("  GLOBAL WORK:       {}", hb.global_work());
    println!("  ELAPSED:           {:.1}s", hb.global_time() as f64 / NS_PER_SEC);
    println!("  GLOBAL PERF/S:     {:.3}", hb.global_perf() * NS_PER_SEC);
    println!("  WINDOW PERF/S:     {:.3}", hb.window_perf() * NS_PER_SEC);
    if hb.variant().tracks_accuracy() {
        println!("  ACCURACY RATE:     {:.3}", hb.global_accuracy_rate());
    }
    if hb.variant().tracks_power() {
        println!("  GLOBAL POWER:      {:.3} W", hb.global_power() * 1_000.0);
    }
}

pub fn run_monitor(cfg: &HeartbeatConfig, verbose: bool, shutdown: &AtomicBool) -> Result<()> {
    cfg.validate()?;

    let variant = cfg.variant();
    let mut energy = if variant.tracks_power() {
        Some(EnergyReader::open(cfg.energy_path.clone())?)
    } else {
        None
    };

    let hb = Heartbeat::new(variant, cfg.window_size)?;
    let mut logger = HeartbeatLogger::new(hb, open_sink(&cfg.log)?)?;
    info!("monitor started: variant={} window_size={}", variant.label(), cfg.window_size);

    let mut tag = 0u64;
    let mut start_energy = match energy.as_mut() {
        Some(reader) => reader.read()?,
        None => 0,
    };
    let clock = MonotonicClock::start();
    let mut start = clock.now_ns();

    while !shutdown.load(Ordering::Relaxed) && cfg.count.map_or(true, |n| tag < n) {
        std::thread::sleep(cfg.interval);

        let end = clock.now_ns();
        let end_energy = match energy.as_mut() {
            Some(reader) => reader.read()?,
            None => 0,
        };

        let beat = Beat::new(tag, cfg.work, start, end)
            .accuracy(cfg.work)
            .energy(start_energy, end_energy);
        logger.report(beat)?;

        if logger.heartbeat().window_complete() {
            print_window(logger.heartbeat(), verbose);
        }

        tag += 1;
        start = end;
        start_energy = end_energy;
    }

    summary(logger.heartbeat());
    let mut sink = logger.finish()?;
    sink.flush()?;
    Ok(())
}
