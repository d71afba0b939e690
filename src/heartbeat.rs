// HEARTBEAT ENGINE
// ONE ENGINE FOR ALL FOUR VARIANTS. THE VARIANT ONLY DECIDES WHICH OPTIONAL
// FIELDS ARE RECORDED; THE WINDOW AND AGGREGATION ALGORITHM IS SHARED.
//
// REPORT IS O(1): WINDOW SUMS ARE MAINTAINED INCREMENTALLY. THE RECORD ABOUT
// TO BE EVICTED IS SUBTRACTED BEFORE THE NEW ONE IS INSERTED, SO THE WINDOW
// SUMS ALWAYS MATCH EXACTLY THE RECORDS RESIDENT IN THE BUFFER.
//
// SINGLE WRITER. report() TAKES &mut self; SHARING ACROSS THREADS NEEDS
// EXTERNAL SYNCHRONIZATION.

use log::{debug, trace};

use crate::error::{HeartbeatError, Result};
use crate::record::{Record, Totals};
use crate::window::WindowBuffer;

// VARIANT

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Variant {
    Base = 0,
    Accuracy = 1,
    Power = 2,
    AccuracyPower = 3,
}

impl Variant {
    pub fn from_flags(accuracy: bool, power: bool) -> Self {
        match (accuracy, power) {
            (false, false) => Self::Base,
            (true, false) => Self::Accuracy,
            (false, true) => Self::Power,
            (true, true) => Self::AccuracyPower,
        }
    }

    pub fn tracks_accuracy(self) -> bool {
        matches!(self, Self::Accuracy | Self::AccuracyPower)
    }

    pub fn tracks_power(self) -> bool {
        matches!(self, Self::Power | Self::AccuracyPower)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Base => "BASE",
            Self::Accuracy => "ACCURACY",
            Self::Power => "POWER",
            Self::AccuracyPower => "ACCURACY+POWER",
        }
    }
}

// REPORT INPUT

/// Inputs of one heartbeat. Accuracy and energy default to zero and are
/// ignored by variants that do not track them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Beat {
    pub user_tag: u64,
    pub work: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub accuracy: i64,
    pub start_energy: i64,
    pub end_energy: i64,
}

impl Beat {
    pub fn new(user_tag: u64, work: i64, start_time: i64, end_time: i64) -> Self {
        Self { user_tag, work, start_time, end_time, ..Self::default() }
    }

    pub fn accuracy(mut self, accuracy: i64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn energy(mut self, start_energy: i64, end_energy: i64) -> Self {
        self.start_energy = start_energy;
        self.end_energy = end_energy;
        self
    }
}

// ENGINE

#[derive(Debug)]
pub struct Heartbeat {
    variant: Variant,
    window: WindowBuffer<Record>,
    global: Totals,
    window_totals: Totals,
    last: Option<Record>,
    count: u64,
}

impl Heartbeat {
    pub fn new(variant: Variant, window_size: usize) -> Result<Self> {
        let window = WindowBuffer::with_capacity(window_size)?;
        debug!("heartbeat created: variant={} window_size={}", variant.label(), window_size);
        Ok(Self {
            variant,
            window,
            global: Totals::default(),
            window_totals: Totals::default(),
            last: None,
            count: 0,
        })
    }

    /// Construct from a signed window size as handed over by a binding layer.
    /// Non-positive sizes fail with [`HeartbeatError::InvalidWindowSize`].
    pub fn create(variant: Variant, window_size: i32) -> Result<Self> {
        let size = usize::try_from(window_size)
            .map_err(|_| HeartbeatError::InvalidWindowSize(window_size as i64))?;
        Self::new(variant, size)
    }

    /// Issue a heartbeat.
    ///
    /// The engine does not check `end_time >= start_time` or
    /// `end_energy >= start_energy`; intervals that run backwards are
    /// accumulated as negative deltas.
    pub fn report(&mut self, beat: Beat) {
        let accuracy = if self.variant.tracks_accuracy() { beat.accuracy } else { 0 };
        let (start_energy, end_energy) = if self.variant.tracks_power() {
            (beat.start_energy, beat.end_energy)
        } else {
            (0, 0)
        };

        let mut record = Record {
            id: self.count,
            user_tag: beat.user_tag,
            work: beat.work,
            start_time: beat.start_time,
            end_time: beat.end_time,
            accuracy,
            start_energy,
            end_energy,
            ..Record::default()
        };
        let deltas = record.deltas();

        self.global.add(&deltas);

        // DROP THE OLDEST RECORD'S CONTRIBUTION BEFORE IT IS OVERWRITTEN
        if let Some(evicted) = self.window.evicting() {
            self.window_totals.sub(&evicted.deltas());
        }
        self.window_totals.add(&deltas);

        record.global = self.global;
        record.window = self.window_totals;
        self.window.insert(record);
        self.last = Some(record);
        self.count += 1;

        trace!(
            "heartbeat {}: tag={} work={} dt={} window_work={} window_time={}",
            record.id, record.user_tag, deltas.work, deltas.time,
            self.window_totals.work, self.window_totals.time
        );
        if self.window_complete() {
            debug!(
                "window complete after {} heartbeats: window_perf={:.6}",
                self.count, self.window_perf()
            );
        }
    }

    /// Release the engine and its window storage.
    pub fn finish(self) {
        debug!(
            "heartbeat finished: {} heartbeats, global_work={} global_time={}",
            self.count, self.global.work, self.global.time
        );
    }

    // TRUE RIGHT AFTER THE REPORT THAT COMPLETED A FULL WINDOW OF FRESH RECORDS
    pub fn window_complete(&self) -> bool {
        self.count > 0 && self.count % self.window.capacity() as u64 == 0
    }

    // --- QUERIES ---

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn window_size(&self) -> usize {
        self.window.capacity()
    }

    // TAG OF THE MOST RECENT HEARTBEAT, 0 BEFORE THE FIRST ONE
    pub fn user_tag(&self) -> u64 {
        self.last.map_or(0, |r| r.user_tag)
    }

    /// Heartbeats issued since construction.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Records currently resident in the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn last_record(&self) -> Option<&Record> {
        self.last.as_ref()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.window.iter()
    }

    pub fn global(&self) -> Totals {
        self.global
    }

    pub fn window(&self) -> Totals {
        self.window_totals
    }

    pub fn global_time(&self) -> i64 {
        self.global.time
    }

    pub fn window_time(&self) -> i64 {
        self.window_totals.time
    }

    pub fn global_work(&self) -> i64 {
        self.global.work
    }

    pub fn window_work(&self) -> i64 {
        self.window_totals.work
    }

    pub fn global_accuracy(&self) -> i64 {
        self.global.accuracy
    }

    pub fn window_accuracy(&self) -> i64 {
        self.window_totals.accuracy
    }

    pub fn global_energy(&self) -> i64 {
        self.global.energy
    }

    pub fn window_energy(&self) -> i64 {
        self.window_totals.energy
    }

    pub fn global_perf(&self) -> f64 {
        self.global.perf()
    }

    pub fn window_perf(&self) -> f64 {
        self.window_totals.perf()
    }

    pub fn instant_perf(&self) -> f64 {
        self.last.map_or(0.0, |r| r.instant_perf())
    }

    pub fn global_accuracy_rate(&self) -> f64 {
        self.global.accuracy_rate()
    }

    pub fn window_accuracy_rate(&self) -> f64 {
        self.window_totals.accuracy_rate()
    }

    pub fn instant_accuracy_rate(&self) -> f64 {
        self.last.map_or(0.0, |r| r.instant_accuracy_rate())
    }

    pub fn global_power(&self) -> f64 {
        self.global.power()
    }

    pub fn window_power(&self) -> f64 {
        self.window_totals.power()
    }

    pub fn instant_power(&self) -> f64 {
        self.last.map_or(0.0, |r| r.instant_power())
    }
}
