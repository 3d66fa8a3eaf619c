#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPosition {
    Login,
    Level1,
    Level2,
    Level3,
    Level4,
    Complete,
}

impl FlowPosition {
    /// Forward edge for every non-terminal position. Calling this on
    /// `Complete` is a caller bug, not a user-reachable state, and panics.
    pub fn next(self) -> FlowPosition {
        match self {
            Self::Login => Self::Level1,
            Self::Level1 => Self::Level2,
            Self::Level2 => Self::Level3,
            Self::Level3 => Self::Level4,
            Self::Level4 => Self::Complete,
            Self::Complete => panic!("no forward transition exists from Complete"),
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Level1 => "Level 1",
            Self::Level2 => "Level 2",
            Self::Level3 => "Level 3",
            Self::Level4 => "Level 4",
            Self::Complete => "Completion",
        }
    }
}

pub fn reset_target() -> FlowPosition {
    FlowPosition::Login
}
