//! Dynamic JSON translation reverse proxy.
//!
//! Forwards inbound requests to an upstream target and, when the upstream
//! answers with JSON, rewrites selected values using per-language dot-path
//! rule sets loaded from a backing store.

pub mod modules;
pub mod proxy;
