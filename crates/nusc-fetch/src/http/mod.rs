//! HTTP plumbing: the transport capability and its reqwest implementation.

mod client;
mod transport;

pub use client::HttpClient;
pub use transport::{HttpResponse, HttpTransport, Progress};
