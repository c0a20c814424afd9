pub mod config;
pub mod crypto;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod model;
pub mod quantum;
pub mod server;
