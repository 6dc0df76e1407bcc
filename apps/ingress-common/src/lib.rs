pub mod reqid;
pub mod telemetry;

pub use reqid::*;
pub use telemetry::*;
