use rand::Rng;

use crate::identifiers::AI_CONNECTION_HANDLE;

const ADJECTIVES: &[&str] = &[
    "swift", "brave", "clever", "mighty", "silent", "golden", "wild", "noble",
    "fierce", "gentle", "quick", "wise", "bold", "proud", "cunning", "sly",
];

const NOUNS: &[&str] = &[
    "falcon", "bear", "tiger", "wolf", "eagle", "dragon", "lion", "panther",
    "hawk", "fox", "raven", "cobra", "shark", "phoenix", "lynx", "viper",
];

/// Builds a connection handle such as `swift-falcon-3fa9c21e`.
pub fn generate_connection_id() -> String {
    let mut rng = rand::rng();
    loop {
        let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
        let noun = NOUNS[rng.random_range(0..NOUNS.len())];
        let suffix: u32 = rng.random();
        let id = format!("{}-{}-{:08x}", adjective, noun, suffix);
        if id != AI_CONNECTION_HANDLE {
            return id;
        }
    }
}

pub fn generate_session_id(sequence: u64) -> String {
    format!("session_{}", sequence)
}
