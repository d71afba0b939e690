// HEARTBEATS MONITOR
// DRIVES THE HEARTBEAT ENGINE WITH A SYNTHETIC FIXED-INTERVAL WORKLOAD
//
// THE ENGINE LIVES IN THE LIBRARY (PURE, TESTABLE OFFLINE)
// THIS BINARY HANDLES: CONFIGURATION, TIMING, ENERGY READINGS, REPORTING

mod cli;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use heartbeats::config::{self, HeartbeatConfig, LogTarget};
use heartbeats::energy::DEFAULT_ENERGY_PATH;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

#[derive(Parser)]
#[command(name = "heartbeats")]
#[command(about = "HEARTBEATS -- SLIDING-WINDOW PERFORMANCE, ACCURACY AND POWER MONITOR")]
struct Cli {
    // NUMBER OF HEARTBEATS IN THE SLIDING WINDOW
    #[arg(long, default_value_t = config::DEFAULT_WINDOW_SIZE)]
    window_size: usize,

    // TRACK ACCURACY (EVERY UNIT OF SYNTHETIC WORK COUNTS AS ACCURATE)
    #[arg(long)]
    accuracy: bool,

    // TRACK POWER FROM THE ENERGY COUNTER
    #[arg(long)]
    power: bool,

    // MILLISECONDS BETWEEN HEARTBEATS
    #[arg(long, default_value_t = config::DEFAULT_INTERVAL_MS)]
    interval_ms: u64,

    // WORK UNITS REPORTED PER HEARTBEAT
    #[arg(long, default_value_t = config::DEFAULT_WORK)]
    work: i64,

    // STOP AFTER N HEARTBEATS (DEFAULT: RUN UNTIL CTRL+C)
    #[arg(long)]
    count: Option<u64>,

    // WRITE THE HEARTBEAT LOG TO THIS FILE
    #[arg(long, conflicts_with = "log_fd")]
    log: Option<PathBuf>,

    // WRITE THE HEARTBEAT LOG TO AN INHERITED FILE DESCRIPTOR (1 = STDOUT)
    #[arg(long)]
    log_fd: Option<i32>,

    // CUMULATIVE ENERGY COUNTER IN MICROJOULES
    #[arg(long, default_value = DEFAULT_ENERGY_PATH)]
    energy_path: PathBuf,

    // PRINT VERBOSE OUTPUT
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> HeartbeatConfig {
        let log = match (&self.log, self.log_fd) {
            (Some(path), _) => LogTarget::File(path.clone()),
            (None, Some(fd)) => LogTarget::Fd(fd),
            (None, None) => LogTarget::None,
        };
        HeartbeatConfig {
            window_size: self.window_size,
            accuracy: self.accuracy,
            power: self.power,
            interval: Duration::from_millis(self.interval_ms),
            work: self.work,
            count: self.count,
            log,
            energy_path: self.energy_path.clone(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    ctrlc::set_handler(move || {
        SHUTDOWN.store(true, Ordering::Relaxed);
    })?;

    let cfg = cli.config();

    println!("HEARTBEATS v{}", env!("CARGO_PKG_VERSION"));
    println!("VARIANT:         {}", cfg.variant().label());
    println!("WINDOW SIZE:     {}", cfg.window_size);
    println!("INTERVAL:        {} ms", cli.interval_ms);
    println!("WORK PER BEAT:   {}", cfg.work);
    match &cfg.log {
        LogTarget::None => println!("LOG:             NONE"),
        LogTarget::File(path) => println!("LOG:             {}", path.display()),
        LogTarget::Fd(fd) => println!("LOG:             FD {}", fd),
    }
    if cfg.power {
        println!("ENERGY:          {}", cfg.energy_path.display());
    }
    println!();

    println!("HEARTBEATS IS ACTIVE (CTRL+C TO EXIT)");
    cli::run::run_monitor(&cfg, cli.verbose, &SHUTDOWN)?;
    println!("HEARTBEATS OUT.");
    Ok(())
}
