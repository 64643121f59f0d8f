//! HTTP API: upload shell, response types, and SSE logs.

pub mod logs;
pub mod server;
pub mod types;
