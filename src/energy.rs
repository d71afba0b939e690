// ENERGY COUNTER READER
// READS A CUMULATIVE MICROJOULE COUNTER FROM POWERCAP (INTEL RAPL) SYSFS.
// THE HARDWARE COUNTER WRAPS AT max_energy_range_uj; READINGS ARE UNWRAPPED
// SO THE VALUES HANDED TO THE ENGINE NEVER DECREASE.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{HeartbeatError, Result};

pub const DEFAULT_ENERGY_PATH: &str = "/sys/class/powercap/intel-rapl:0/energy_uj";
const MAX_RANGE_FILE: &str = "max_energy_range_uj";

pub fn parse_energy(raw: &str) -> Result<i64> {
    let s = raw.trim();
    s.parse::<i64>()
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| HeartbeatError::EnergyParse(s.to_string()))
}

fn read_counter(path: &Path) -> Result<i64> {
    let raw = std::fs::read_to_string(path).map_err(|source| HeartbeatError::Energy {
        path: path.to_path_buf(),
        source,
    })?;
    parse_energy(&raw)
}

#[derive(Debug)]
pub struct EnergyReader {
    path: PathBuf,
    max_range: Option<i64>,
    last_raw: Option<i64>,
    offset: i64,
}

impl EnergyReader {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        // FAIL EARLY IF THE COUNTER IS NOT READABLE
        read_counter(&path)?;
        let max_range = path
            .parent()
            .map(|dir| dir.join(MAX_RANGE_FILE))
            .and_then(|p| read_counter(&p).ok());
        debug!("energy counter {}: max_range={:?}", path.display(), max_range);
        Ok(Self::with_range(path, max_range))
    }

    pub fn with_range(path: impl Into<PathBuf>, max_range: Option<i64>) -> Self {
        Self { path: path.into(), max_range, last_raw: None, offset: 0 }
    }

    pub fn read(&mut self) -> Result<i64> {
        let raw = read_counter(&self.path)?;
        Ok(self.unwrap_reading(raw))
    }

    // FOLD ONE RAW READING INTO THE MONOTONIC SERIES
    pub fn unwrap_reading(&mut self, raw: i64) -> i64 {
        if let Some(last) = self.last_raw {
            if raw < last {
                // WITHOUT A KNOWN RANGE, ASSUME THE COUNTER RESTARTED FROM ZERO
                let step = self.max_range.unwrap_or(last);
                warn!("energy counter wrapped ({} -> {}), adding {}", last, raw, step);
                self.offset = self.offset.wrapping_add(step);
            }
        }
        self.last_raw = Some(raw);
        self.offset.wrapping_add(raw)
    }
}
