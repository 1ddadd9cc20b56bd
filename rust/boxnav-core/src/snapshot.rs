use serde::{Deserialize, Serialize};

use crate::environment::{DisplayBounds, Environment};
use crate::geometry::{OrientedBox, Pt};
use crate::navigator::Action;

/// Read-only drawing data for one box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub corners: [Pt; 4],
    pub target: Pt,
    pub origin: Pt,
    pub width: f64,
    pub height: f64,
    pub rotation_degrees: f64,
}

impl From<&OrientedBox> for BoxGeometry {
    fn from(b: &OrientedBox) -> Self {
        Self {
            corners: b.corners(),
            target: b.target(),
            origin: b.origin(),
            width: b.width(),
            height: b.height(),
            rotation_degrees: b.rotation_degrees(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub boxes: Vec<BoxGeometry>,
    pub bounds: DisplayBounds,
}

impl From<&Environment> for EnvironmentSnapshot {
    fn from(env: &Environment) -> Self {
        Self { boxes: env.boxes().iter().map(BoxGeometry::from).collect(), bounds: env.display_bounds() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigatorSnapshot {
    pub position: Pt,
    pub rotation: f64,
    pub heading: Pt,
    pub current_target: Pt,
    /// Corridor indices of the boxes containing `position`.
    pub containing_boxes: Vec<usize>,
}

/// One step as seen by a rendering sink. Step 0 is the initial state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub step: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<Action>,
    #[serde(default)]
    pub rejected: bool,
    pub navigator: NavigatorSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn box_geometry_includes_fourth_corner() {
        let b = OrientedBox::new(Pt::new(0.0, 0.0), Pt::new(0.0, 20.0), Pt::new(10.0, 20.0), Pt::new(5.0, 18.0));
        let g = BoxGeometry::from(&b);
        assert_eq!(g.corners[3], Pt::new(10.0, 0.0));
        assert_eq!(g.width, 10.0);
        assert_eq!(g.height, 20.0);
    }

    #[test]
    fn initial_frame_omits_actions() {
        let frame = Frame {
            step: 0,
            taken: None,
            correct: None,
            rejected: false,
            navigator: NavigatorSnapshot {
                position: Pt::new(1.0, 2.0),
                rotation: 0.0,
                heading: Pt::new(1.0, 0.0),
                current_target: Pt::new(3.0, 4.0),
                containing_boxes: vec![0],
            },
        };
        let v = serde_json::to_value(&frame).unwrap();
        assert!(v.get("taken").is_none());
        assert_eq!(v["navigator"]["position"]["x"], Value::from(1.0));
    }
}
