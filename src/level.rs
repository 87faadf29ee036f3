use serde::Serialize;

/// AI strength. The numeric level doubles as the search depth in plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Accepts only the levels 1, 3 and 5.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Easy),
            3 => Some(Self::Normal),
            5 => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        self.depth()
    }

    pub fn depth(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Normal => 3,
            Self::Hard => 5,
        }
    }

    /// Easy -> Normal -> Hard -> Easy.
    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Normal,
            Self::Normal => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
        }
    }
}
