// HEARTBEATS -- IN-PROCESS PROGRESS AND EFFICIENCY INSTRUMENTATION
// APPLICATIONS REPORT WORK DONE PER INTERVAL (PLUS OPTIONAL ACCURACY AND
// ENERGY); THE ENGINE KEEPS GLOBAL AND SLIDING-WINDOW PERFORMANCE,
// ACCURACY RATE AND POWER, AND LOGS RECORDS IN A FIXED COLUMN FORMAT.

pub mod clock;
pub mod codec;
pub mod config;
pub mod energy;
pub mod error;
pub mod heartbeat;
pub mod logger;
pub mod record;
pub mod sink;
pub mod window;

pub use error::{HeartbeatError, Result};
pub use heartbeat::{Beat, Heartbeat, Variant};
pub use logger::HeartbeatLogger;
pub use record::{Record, Totals};
pub use window::WindowBuffer;
