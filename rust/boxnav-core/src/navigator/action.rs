use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Forward,
    Backward,
    RotateLeft,
    RotateRight,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Forward, Action::Backward, Action::RotateLeft, Action::RotateRight];

    /// Actions a policy may pick on its own. Backward is only reachable explicitly.
    pub const AUTOMATIC: [Action; 3] = [Action::Forward, Action::RotateLeft, Action::RotateRight];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Backward => "backward",
            Action::RotateLeft => "rotate_left",
            Action::RotateRight => "rotate_right",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Action::Forward => 0,
            Action::Backward => 1,
            Action::RotateLeft => 2,
            Action::RotateRight => 3,
        }
    }

    pub fn is_translation(self) -> bool {
        matches!(self, Action::Forward | Action::Backward)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one navigator step: what was executed and what the geometry asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub taken: Action,
    pub correct: Action,
}

impl ActionOutcome {
    pub fn agrees(&self) -> bool {
        self.taken == self.correct
    }
}
