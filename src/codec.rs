// HEARTBEAT LOG CODEC
// ONE HEADER LINE NAMING EVERY COLUMN, THEN ONE LINE PER RECORD.
// COLUMNS ARE LEFT-ALIGNED, FIXED-WIDTH DECIMAL, SEPARATED BY ONE SPACE.
// THE COLUMN SET DEPENDS ON THE VARIANT: BASE, THEN ACCURACY, THEN POWER.
//
// EACH LINE IS BUILT IN MEMORY AND HANDED TO THE SINK IN ONE write_all.
// A FAILED WRITE IS RETURNED AS-IS; RETRYING IS THE CALLER'S CALL.

use std::io::Write;

use crate::error::Result;
use crate::heartbeat::{Heartbeat, Variant};
use crate::record::Record;

const ID_WIDTH: usize = 6;
const INT_WIDTH: usize = 11;
const RATE_WIDTH: usize = 20;

#[derive(Clone, Copy)]
enum Value {
    Id(u64),
    Int(i64),
    Rate(f64),
}

struct Column {
    name: &'static str,
    value: fn(&Record) -> Value,
}

impl Column {
    fn width(&self, v: Value) -> usize {
        let base = match v {
            Value::Id(_) => ID_WIDTH,
            Value::Int(_) => INT_WIDTH,
            Value::Rate(_) => RATE_WIDTH,
        };
        base.max(self.name.len())
    }
}

const BASE_COLUMNS: &[Column] = &[
    Column { name: "HB", value: |r| Value::Id(r.id) },
    Column { name: "Tag", value: |r| Value::Id(r.user_tag) },
    Column { name: "Work", value: |r| Value::Int(r.work) },
    Column { name: "Global_Work", value: |r| Value::Int(r.global.work) },
    Column { name: "Window_Work", value: |r| Value::Int(r.window.work) },
    Column { name: "Start_Time", value: |r| Value::Int(r.start_time) },
    Column { name: "End_Time", value: |r| Value::Int(r.end_time) },
    Column { name: "Global_Time", value: |r| Value::Int(r.global.time) },
    Column { name: "Window_Time", value: |r| Value::Int(r.window.time) },
    Column { name: "Global_Perf", value: |r| Value::Rate(r.global.perf()) },
    Column { name: "Window_Perf", value: |r| Value::Rate(r.window.perf()) },
    Column { name: "Instant_Perf", value: |r| Value::Rate(r.instant_perf()) },
];

const ACCURACY_COLUMNS: &[Column] = &[
    Column { name: "Accuracy", value: |r| Value::Int(r.accuracy) },
    Column { name: "Global_Accuracy", value: |r| Value::Int(r.global.accuracy) },
    Column { name: "Window_Accuracy", value: |r| Value::Int(r.window.accuracy) },
    Column { name: "Global_Accuracy_Rate", value: |r| Value::Rate(r.global.accuracy_rate()) },
    Column { name: "Window_Accuracy_Rate", value: |r| Value::Rate(r.window.accuracy_rate()) },
    Column { name: "Instant_Accuracy_Rate", value: |r| Value::Rate(r.instant_accuracy_rate()) },
];

const POWER_COLUMNS: &[Column] = &[
    Column { name: "Start_Energy", value: |r| Value::Int(r.start_energy) },
    Column { name: "End_Energy", value: |r| Value::Int(r.end_energy) },
    Column { name: "Global_Energy", value: |r| Value::Int(r.global.energy) },
    Column { name: "Window_Energy", value: |r| Value::Int(r.window.energy) },
    Column { name: "Global_Power", value: |r| Value::Rate(r.global.power()) },
    Column { name: "Window_Power", value: |r| Value::Rate(r.window.power()) },
    Column { name: "Instant_Power", value: |r| Value::Rate(r.instant_power()) },
];

fn column_set(variant: Variant) -> impl Iterator<Item = &'static Column> {
    let acc: &'static [Column] = if variant.tracks_accuracy() { ACCURACY_COLUMNS } else { &[] };
    let pow: &'static [Column] = if variant.tracks_power() { POWER_COLUMNS } else { &[] };
    BASE_COLUMNS.iter().chain(acc).chain(pow)
}

/// Column names logged for `variant`, in output order.
pub fn columns(variant: Variant) -> Vec<&'static str> {
    column_set(variant).map(|c| c.name).collect()
}

// HEADER AND RECORD LINES SHARE WIDTHS SO THE COLUMNS LINE UP
fn header_line(variant: Variant) -> String {
    let mut line = String::new();
    for (i, col) in column_set(variant).enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let width = col.width((col.value)(&Record::default()));
        line.push_str(&format!("{:<width$}", col.name, width = width));
    }
    line.push('\n');
    line
}

fn record_line(variant: Variant, record: &Record) -> String {
    let mut line = String::new();
    for (i, col) in column_set(variant).enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let v = (col.value)(record);
        let width = col.width(v);
        let field = match v {
            Value::Id(x) => format!("{:<width$}", x, width = width),
            Value::Int(x) => format!("{:<width$}", x, width = width),
            Value::Rate(x) => format!("{:<width$.6}", x, width = width),
        };
        line.push_str(&field);
    }
    line.push('\n');
    line
}

pub fn write_header<W: Write + ?Sized>(variant: Variant, sink: &mut W) -> Result<()> {
    sink.write_all(header_line(variant).as_bytes())?;
    Ok(())
}

pub fn write_record<W: Write + ?Sized>(variant: Variant, record: &Record, sink: &mut W) -> Result<()> {
    sink.write_all(record_line(variant, record).as_bytes())?;
    Ok(())
}

/// Write every record resident in the window, oldest first.
pub fn write_window<W: Write + ?Sized>(heartbeat: &Heartbeat, sink: &mut W) -> Result<()> {
    for record in heartbeat.records() {
        write_record(heartbeat.variant(), record, sink)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heartbeat::Beat;

    #[test]
    fn column_counts_per_variant() {
        assert_eq!(columns(Variant::Base).len(), 12);
        assert_eq!(columns(Variant::Accuracy).len(), 18);
        assert_eq!(columns(Variant::Power).len(), 19);
        assert_eq!(columns(Variant::AccuracyPower).len(), 25);
    }

    #[test]
    fn power_columns_follow_accuracy_columns() {
        let cols = columns(Variant::AccuracyPower);
        let acc = cols.iter().position(|c| *c == "Accuracy").unwrap();
        let pow = cols.iter().position(|c| *c == "Start_Energy").unwrap();
        assert!(acc < pow);
        assert_eq!(*cols.last().unwrap(), "Instant_Power");
    }

    #[test]
    fn header_and_record_align() {
        let mut hb = Heartbeat::new(Variant::Accuracy, 4).unwrap();
        hb.report(Beat::new(3, 100, 0, 10).accuracy(50));
        let header = header_line(Variant::Accuracy);
        let line = record_line(Variant::Accuracy, hb.last_record().unwrap());
        assert_eq!(header.len(), line.len());
        assert!(line.contains("10.000000"));
        assert!(line.contains("0.500000"));
    }

    #[test]
    fn failing_sink_reports_write_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let err = write_header(Variant::Base, &mut Broken).unwrap_err();
        assert!(matches!(err, crate::error::HeartbeatError::Write(_)));
    }
}
