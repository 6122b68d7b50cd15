//! HTTP API: server, routing, and request/response mapping for the backend
//! functions.

pub mod app;
pub mod middleware;
