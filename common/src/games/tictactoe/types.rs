use std::fmt;

pub const GRID_SIZE: usize = 9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mark {
    #[default]
    Empty,
    A,
    B,
}

impl Mark {
    pub fn opponent(&self) -> Option<Mark> {
        match self {
            Mark::A => Some(Mark::B),
            Mark::B => Some(Mark::A),
            Mark::Empty => None,
        }
    }
}

pub type Grid = [Mark; GRID_SIZE];

/// Seat of a participant within a session. The first seat always places `Mark::A`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn mark(self) -> Mark {
        match self {
            Slot::First => Mark::A,
            Slot::Second => Mark::B,
        }
    }

    pub fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

/// A cell index known to lie in `0..GRID_SIZE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(u8);

impl Position {
    pub fn new(index: i64) -> Option<Self> {
        if (0..GRID_SIZE as i64).contains(&index) {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE as u8).map(Position)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display symbol shown to clients. Independent from `Mark`, which only encodes the seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::X => "X",
            Symbol::O => "O",
        }
    }

    pub fn other(self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameMode {
    HumanVsHuman,
    HumanVsAi,
    AiVsHuman,
}

impl GameMode {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(GameMode::HumanVsHuman),
            1 => Some(GameMode::HumanVsAi),
            2 => Some(GameMode::AiVsHuman),
            _ => None,
        }
    }

    pub fn has_ai(self) -> bool {
        !matches!(self, GameMode::HumanVsHuman)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::HumanVsHuman => "human-vs-human",
            GameMode::HumanVsAi => "human-vs-ai",
            GameMode::AiVsHuman => "ai-vs-human",
        };
        f.write_str(name)
    }
}
