//! The cTAKES REST backend: `POST <base-path>/service/process?format=<f>`.

pub mod client;
pub mod transport;

pub use client::HttpTransport;
pub use transport::{process_url, PendingCall, ProcessRequest, Transport};
