//! HTTP 基础设施
//!
//! RESTful 命令入口 + 频道监听 WebSocket

pub mod dto;
pub mod error;
pub mod handlers;
mod middleware;
mod routes;
mod server;
mod state;

pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
