//! Dispatch telemetry.
//!
//! Read-only side channel. Nothing in the dispatch path reads it back.
//! Events carry ids, formats, kinds and durations; never document text or response bodies.

pub mod event;
pub mod recorder;

pub use event::DispatchEvent;
pub use recorder::{DispatchTelemetry, TelemetrySnapshot};
