// HEARTBEAT TIMESTAMPS
// CLOCK_MONOTONIC NANOSECONDS, MEASURED FROM THE CLOCK'S CREATION SO LOGGED
// START/END TIMES STAY SMALL ENOUGH FOR THEIR FIXED-WIDTH COLUMNS.

fn monotonic_raw_ns() -> i64 {
    let mut ts = libc::timespec { tv_sec: 0, tv_nsec: 0 };
    // CLOCK_MONOTONIC CANNOT FAIL WITH A VALID timespec POINTER
    unsafe {
        libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts);
    }
    (ts.tv_sec as i64)
        .wrapping_mul(1_000_000_000)
        .wrapping_add(ts.tv_nsec as i64)
}

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: i64,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self { origin: monotonic_raw_ns() }
    }

    /// Nanoseconds since [`MonotonicClock::start`]. Never decreases.
    pub fn now_ns(&self) -> i64 {
        monotonic_raw_ns() - self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_near_zero_and_never_goes_back() {
        let clock = MonotonicClock::start();
        let a = clock.now_ns();
        let b = clock.now_ns();
        assert!(a >= 0);
        assert!(b >= a);
        // WELL UNDER A SECOND AFTER START
        assert!(a < 1_000_000_000);
    }

    #[test]
    fn sleep_is_measured() {
        let clock = MonotonicClock::start();
        let a = clock.now_ns();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(clock.now_ns() - a >= 5_000_000);
    }
}
