// HEARTBEATS MONITOR CONFIGURATION
// PLAIN DATA FILLED IN BY THE BINARY'S CLI. NO BPF, NO I/O: TESTABLE OFFLINE.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{HeartbeatError, Result};
use crate::heartbeat::Variant;

pub const DEFAULT_WINDOW_SIZE: usize = 20;
pub const DEFAULT_INTERVAL_MS: u64 = 100;
pub const DEFAULT_WORK: i64 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogTarget {
    None,
    File(PathBuf),
    Fd(i32),
}

#[derive(Clone, Debug)]
pub struct HeartbeatConfig {
    pub window_size: usize,
    pub accuracy: bool,
    pub power: bool,
    pub interval: Duration,
    pub work: i64,
    // STOP AFTER THIS MANY HEARTBEATS (NONE: RUN UNTIL CTRL+C)
    pub count: Option<u64>,
    pub log: LogTarget,
    pub energy_path: PathBuf,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            accuracy: false,
            power: false,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            work: DEFAULT_WORK,
            count: None,
            log: LogTarget::None,
            energy_path: PathBuf::from(crate::energy::DEFAULT_ENERGY_PATH),
        }
    }
}

impl HeartbeatConfig {
    pub fn variant(&self) -> Variant {
        Variant::from_flags(self.accuracy, self.power)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(HeartbeatError::InvalidWindowSize(0));
        }
        if let LogTarget::Fd(fd) = self.log {
            if fd < 0 {
                return Err(HeartbeatError::InvalidDescriptor(fd));
            }
        }
        Ok(())
    }
}
