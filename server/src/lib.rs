pub mod broadcaster;
pub mod hub;
pub mod notifier;
pub mod registry;
pub mod server_config;
pub mod session_rng;
pub mod web_server;
pub mod ws_handler;

pub use common::log;
