//! HTTP API: configuration, route mounting, and request/response mapping.

pub mod app;
pub mod config;
pub mod middleware;
