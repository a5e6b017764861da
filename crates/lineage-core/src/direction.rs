use crate::LineageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side of a node where an edge handle is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlePosition {
    Top,
    Bottom,
    Left,
    Right,
}

/// Flow direction of a layout, named after the rank direction tokens the
/// frontend sends (`TB`, `BT`, `LR`, `RL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LayoutDirection {
    #[default]
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl LayoutDirection {
    /// `(sourcePosition, targetPosition)` for every node laid out in this direction.
    pub fn handles(self) -> (HandlePosition, HandlePosition) {
        match self {
            LayoutDirection::TopBottom => (HandlePosition::Bottom, HandlePosition::Top),
            LayoutDirection::BottomTop => (HandlePosition::Top, HandlePosition::Bottom),
            LayoutDirection::LeftRight => (HandlePosition::Right, HandlePosition::Left),
            LayoutDirection::RightLeft => (HandlePosition::Left, HandlePosition::Right),
        }
    }

    /// Ranks advance along the y axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, LayoutDirection::TopBottom | LayoutDirection::BottomTop)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutDirection::TopBottom => "TB",
            LayoutDirection::BottomTop => "BT",
            LayoutDirection::LeftRight => "LR",
            LayoutDirection::RightLeft => "RL",
        }
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutDirection {
    type Err = LineageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" => Ok(LayoutDirection::TopBottom),
            "BT" => Ok(LayoutDirection::BottomTop),
            "LR" => Ok(LayoutDirection::LeftRight),
            "RL" => Ok(LayoutDirection::RightLeft),
            _ => Err(LineageError::InvalidDirection(s.to_string())),
        }
    }
}

/// Which layout strategy the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    /// Tree layout for top-to-bottom requests, layered layout otherwise.
    #[default]
    Auto,
    Tree,
    Layered,
}

impl FromStr for LayoutStrategy {
    type Err = LineageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(LayoutStrategy::Auto),
            "tree" => Ok(LayoutStrategy::Tree),
            "layered" | "dagre" => Ok(LayoutStrategy::Layered),
            _ => Err(LineageError::InvalidStrategy(s.to_string())),
        }
    }
}
