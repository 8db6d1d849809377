//! HTTP binding for the auth core: routes, guards as middleware, and error
//! mapping.

pub mod app;
pub mod config;
pub mod middleware;
