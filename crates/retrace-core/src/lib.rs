pub mod config;
pub mod dispatch;
pub mod idle;
pub mod probe;
pub mod timefmt;

pub use probe::{create_probe, ActivityProbe, ActivitySnapshot, ProbeError};
