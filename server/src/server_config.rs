use std::net::SocketAddr;

use common::config::Validate;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "server_config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub ai_player_name: String,
    pub symbol_x_image: String,
    pub symbol_o_image: String,
    pub draw_message: String,
    pub outbound_queue_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:5000".to_string(),
            ai_player_name: "The Big Bad CPU".to_string(),
            symbol_x_image: "/Content/Images/LouieT3X.png".to_string(),
            symbol_o_image: "/Content/Images/LouieT3O.png".to_string(),
            draw_message: "Game ended in a draw!".to_string(),
            outbound_queue_size: 128,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.listen_address
            .parse()
            .map_err(|e| format!("Invalid listen address '{}': {}", self.listen_address, e))
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;
        if self.ai_player_name.trim().is_empty() {
            return Err("AI player name must not be empty".to_string());
        }
        if self.draw_message.trim().is_empty() {
            return Err("Draw message must not be empty".to_string());
        }
        if self.outbound_queue_size == 0 {
            return Err("Outbound queue size must be at least 1".to_string());
        }
        Ok(())
    }
}
