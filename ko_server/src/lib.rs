//! HTTP server for the knockout bracket engine.
//!
//! - [`api`]: Router, handlers, and middleware
//! - [`config`]: Environment and CLI configuration
//! - [`logging`]: Tracing subscriber and structured log helpers
//! - [`metrics`]: Prometheus counters and gauges

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
