use std::fmt;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: String) -> Self {
                Self(id)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(ConnectionId);

define_id!(SessionId);

/// Handle reserved for the built-in AI participant. Transport handles never take this value.
pub const AI_CONNECTION_HANDLE: &str = "CPU";

impl ConnectionId {
    pub fn ai() -> Self {
        Self(AI_CONNECTION_HANDLE.to_string())
    }

    pub fn is_ai(&self) -> bool {
        self.0 == AI_CONNECTION_HANDLE
    }
}
