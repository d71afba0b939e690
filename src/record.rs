// HEARTBEAT RECORD
// ONE FIXED-SIZE VALUE PER REPORT. STORED BY VALUE IN THE WINDOW BUFFER.
// ACCUMULATORS WRAP ON OVERFLOW -- CALLERS PICK UNITS THAT FIT IN i64.

// WORK / TIME, ACCURACY / WORK, ENERGY / TIME. ZERO DENOMINATOR READS AS 0.
#[inline]
pub fn ratio(num: i64, den: i64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// One set of accumulators: a per-record delta, the window sums or the
/// global sums.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub time: i64,
    pub work: i64,
    pub accuracy: i64,
    pub energy: i64,
}

impl Totals {
    pub fn add(&mut self, d: &Totals) {
        self.time = self.time.wrapping_add(d.time);
        self.work = self.work.wrapping_add(d.work);
        self.accuracy = self.accuracy.wrapping_add(d.accuracy);
        self.energy = self.energy.wrapping_add(d.energy);
    }

    pub fn sub(&mut self, d: &Totals) {
        self.time = self.time.wrapping_sub(d.time);
        self.work = self.work.wrapping_sub(d.work);
        self.accuracy = self.accuracy.wrapping_sub(d.accuracy);
        self.energy = self.energy.wrapping_sub(d.energy);
    }

    pub fn perf(&self) -> f64 {
        ratio(self.work, self.time)
    }

    pub fn accuracy_rate(&self) -> f64 {
        ratio(self.accuracy, self.work)
    }

    pub fn power(&self) -> f64 {
        ratio(self.energy, self.time)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub user_tag: u64,
    pub work: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub accuracy: i64,
    pub start_energy: i64,
    pub end_energy: i64,
    // ACCUMULATORS AS THEY STOOD RIGHT AFTER THIS RECORD WAS APPLIED
    pub global: Totals,
    pub window: Totals,
}

impl Record {
    /// This interval's contribution to every accumulator.
    pub fn deltas(&self) -> Totals {
        Totals {
            time: self.end_time.wrapping_sub(self.start_time),
            work: self.work,
            accuracy: self.accuracy,
            energy: self.end_energy.wrapping_sub(self.start_energy),
        }
    }

    pub fn instant_perf(&self) -> f64 {
        self.deltas().perf()
    }

    pub fn instant_accuracy_rate(&self) -> f64 {
        self.deltas().accuracy_rate()
    }

    pub fn instant_power(&self) -> f64 {
        self.deltas().power()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(100, 0), 0.0);
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(100, 10), 10.0);
    }

    #[test]
    fn deltas_from_fields() {
        let r = Record {
            work: 7,
            start_time: 10,
            end_time: 30,
            accuracy: 5,
            start_energy: 1_000,
            end_energy: 1_400,
            ..Record::default()
        };
        let d = r.deltas();
        assert_eq!(d, Totals { time: 20, work: 7, accuracy: 5, energy: 400 });
        assert_eq!(r.instant_perf(), 7.0 / 20.0);
        assert_eq!(r.instant_accuracy_rate(), 5.0 / 7.0);
        assert_eq!(r.instant_power(), 20.0);
    }

    #[test]
    fn totals_add_sub_cancel() {
        let mut t = Totals::default();
        let d = Totals { time: 3, work: 4, accuracy: 2, energy: 9 };
        t.add(&d);
        t.add(&d);
        t.sub(&d);
        assert_eq!(t, d);
    }

    #[test]
    fn totals_wrap_instead_of_panicking() {
        let mut t = Totals { work: i64::MAX, ..Totals::default() };
        t.add(&Totals { work: 1, ..Totals::default() });
        assert_eq!(t.work, i64::MIN);
    }
}
