// Upstream dispatch: outbound request assembly and the HTTP client

pub mod client;
pub mod request;

pub use client::UpstreamClient;
pub use request::{build_outbound, OutboundRequest};
