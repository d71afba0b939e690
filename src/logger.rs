// AUTOMATIC HEARTBEAT LOGGING
// WRAPS AN ENGINE AND A CALLER-SUPPLIED SINK. THE HEADER IS WRITTEN UP FRONT;
// EVERY TIME A WINDOW COMPLETES, THE RECORDS NOT YET LOGGED ARE WRITTEN.
// EACH RECORD REACHES THE SINK EXACTLY ONCE. THE SINK IS NEVER CLOSED HERE:
// finish() HANDS IT BACK.

use std::io::Write;

use log::debug;

use crate::codec;
use crate::error::Result;
use crate::heartbeat::{Beat, Heartbeat};

pub struct HeartbeatLogger<W: Write> {
    heartbeat: Heartbeat,
    sink: W,
    // ID OF THE FIRST RECORD NOT YET WRITTEN
    next_id: u64,
}

impl<W: Write> HeartbeatLogger<W> {
    pub fn new(heartbeat: Heartbeat, mut sink: W) -> Result<Self> {
        codec::write_header(heartbeat.variant(), &mut sink)?;
        let next_id = heartbeat.count();
        Ok(Self { heartbeat, sink, next_id })
    }

    /// Issue a heartbeat, logging the window if this report completed it.
    pub fn report(&mut self, beat: Beat) -> Result<()> {
        self.heartbeat.report(beat);
        if self.heartbeat.window_complete() {
            self.flush()?;
        }
        Ok(())
    }

    /// Write every record issued since the last flush that is still resident.
    pub fn flush(&mut self) -> Result<()> {
        let variant = self.heartbeat.variant();
        let from = self.next_id;
        let mut written = 0usize;
        for record in self.heartbeat.records().filter(|r| r.id >= from) {
            codec::write_record(variant, record, &mut self.sink)?;
            // ADVANCE PER RECORD SO A FAILED WRITE NEVER REPEATS EARLIER LINES
            self.next_id = record.id + 1;
            written += 1;
        }
        self.next_id = self.heartbeat.count();
        self.sink.flush()?;
        if written > 0 {
            debug!("logged {} heartbeat records", written);
        }
        Ok(())
    }

    pub fn heartbeat(&self) -> &Heartbeat {
        &self.heartbeat
    }

    pub fn pending(&self) -> u64 {
        self.heartbeat.count() - self.next_id
    }

    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        self.heartbeat.finish();
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heartbeat::Variant;

    fn lines(buf: &[u8]) -> Vec<String> {
        String::from_utf8(buf.to_vec()).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn header_written_on_creation() {
        let hb = Heartbeat::new(Variant::Base, 2).unwrap();
        let logger = HeartbeatLogger::new(hb, Vec::new()).unwrap();
        let out = logger.finish().unwrap();
        let l = lines(&out);
        assert_eq!(l.len(), 1);
        assert!(l[0].starts_with("HB"));
    }

    #[test]
    fn logs_on_window_completion_only() {
        let hb = Heartbeat::new(Variant::Base, 3).unwrap();
        let mut logger = HeartbeatLogger::new(hb, Vec::new()).unwrap();
        for i in 0..2i64 {
            logger.report(Beat::new(0, 1, i, i + 1)).unwrap();
        }
        assert_eq!(logger.pending(), 2);
        logger.report(Beat::new(0, 1, 2, 3)).unwrap();
        assert_eq!(logger.pending(), 0);
        logger.report(Beat::new(0, 1, 3, 4)).unwrap();
        assert_eq!(logger.pending(), 1);

        let out = logger.finish().unwrap();
        // HEADER + 4 RECORDS, EACH EXACTLY ONCE
        let l = lines(&out);
        assert_eq!(l.len(), 5);
        let ids: Vec<&str> = l[1..].iter().map(|s| s.split_whitespace().next().unwrap()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3"]);
    }

    // ACCEPTS `ok_writes` WRITES, FAILS ONCE, THEN ACCEPTS EVERYTHING
    struct FailOnce {
        out: Vec<u8>,
        ok_writes: usize,
        failed: bool,
    }

    impl Write for FailOnce {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.ok_writes == 0 && !self.failed {
                self.failed = true;
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
            }
            self.ok_writes = self.ok_writes.saturating_sub(1);
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_does_not_repeat_logged_records() {
        // HEADER AND RECORD 0 GO THROUGH, RECORD 1 FAILS
        let sink = FailOnce { out: Vec::new(), ok_writes: 2, failed: false };
        let hb = Heartbeat::new(Variant::Base, 3).unwrap();
        let mut logger = HeartbeatLogger::new(hb, sink).unwrap();
        logger.report(Beat::new(0, 1, 0, 1)).unwrap();
        logger.report(Beat::new(0, 1, 1, 2)).unwrap();
        let err = logger.report(Beat::new(0, 1, 2, 3)).unwrap_err();
        assert!(matches!(err, crate::error::HeartbeatError::Write(_)));
        assert_eq!(logger.pending(), 2);

        logger.flush().unwrap();
        assert_eq!(logger.pending(), 0);

        let out = logger.finish().unwrap().out;
        let l = lines(&out);
        let ids: Vec<&str> = l[1..].iter().map(|s| s.split_whitespace().next().unwrap()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[test]
    fn sink_errors_reach_the_caller() {
        let sink = FailOnce { out: Vec::new(), ok_writes: 1, failed: false };
        let hb = Heartbeat::new(Variant::Base, 4).unwrap();
        let mut logger = HeartbeatLogger::new(hb, sink).unwrap();
        logger.report(Beat::new(0, 1, 0, 1)).unwrap();
        assert!(matches!(logger.finish(), Err(crate::error::HeartbeatError::Write(_))));
    }
}
