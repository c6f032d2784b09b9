//! Core detection engine and host interface for the Rust CSYNC platform.
//!
//! The modules split the streaming preamble detector into small stages:
//! a multi-hypothesis correlator bank, a latch/peak-tracking state machine,
//! a columnar state history, and the typed ingress/egress boundary used by
//! host runtimes.

pub mod detector;
pub mod host_interface;
pub mod math;
pub mod prelude;
pub mod telemetry;

pub use prelude::{DetectorConfig, DetectorError, DetectorResult};
