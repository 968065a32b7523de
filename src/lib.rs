pub mod config;
pub mod error;
pub mod kernel;
pub mod outputs;
pub mod services;

// Re-export specific items if needed for convenient access
pub use config::ClientConfig;
pub use kernel::dispatcher::{DispatchHandle, RequestDispatcher};
pub use kernel::event::{Completion, FailureReason, RequestOutcome, SinkUpdate};
pub use kernel::format::{OutputFormat, TriggerTable};
pub use outputs::ResultSink;
pub use services::ctakes::{HttpTransport, Transport};
