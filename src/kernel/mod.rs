pub mod dispatcher;
pub mod event;
pub mod format;
pub mod lifecycle;
pub mod sequence;
pub mod telemetry;
