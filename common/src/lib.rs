pub mod proto {
    include!(concat!(env!("OUT_DIR"), "/tictactoe_hub.rs"));
}

pub mod config;
pub mod games;
pub mod id_generator;
pub mod identifiers;
pub mod logger;

pub use identifiers::*;
pub use proto::*;
