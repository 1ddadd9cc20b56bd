//! JSON scene description: the corridor boxes and the agent's start pose.
//!
//! ```json
//! {
//!   "boxes": [
//!     { "a": {"x": 0, "y": 0}, "b": {"x": 0, "y": 20}, "c": {"x": 10, "y": 20}, "target": {"x": 5, "y": 18} }
//!   ],
//!   "start": { "position": {"x": 7, "y": 12}, "rotation_degrees": 150 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::errors::NavError;
use crate::geometry::{OrientedBox, Pt};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub a: Pt,
    pub b: Pt,
    pub c: Pt,
    pub target: Pt,
}

impl BoxSpec {
    pub fn build(&self) -> OrientedBox {
        OrientedBox::new(self.a, self.b, self.c, self.target)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartSpec {
    pub position: Pt,
    #[serde(default)]
    pub rotation_degrees: f64,
}

impl StartSpec {
    pub fn rotation(&self) -> f64 {
        self.rotation_degrees.to_radians()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneSpec {
    pub boxes: Vec<BoxSpec>,
    pub start: StartSpec,
}

impl Default for SceneSpec {
    /// Two-box L-shaped corridor.
    fn default() -> Self {
        Self {
            boxes: vec![
                BoxSpec { a: Pt::new(0.0, 0.0), b: Pt::new(0.0, 20.0), c: Pt::new(10.0, 20.0), target: Pt::new(5.0, 18.0) },
                BoxSpec { a: Pt::new(0.0, 10.0), b: Pt::new(0.0, 20.0), c: Pt::new(30.0, 20.0), target: Pt::new(28.0, 15.0) },
            ],
            start: StartSpec { position: Pt::new(7.0, 12.0), rotation_degrees: 150.0 },
        }
    }
}

impl SceneSpec {
    pub fn from_json_str(s: &str) -> Result<Self, NavError> {
        serde_json::from_str(s).map_err(|e| NavError::invalid(format!("malformed scene: {e}")))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, NavError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| NavError::invalid(format!("reading scene {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn build_environment(&self) -> Result<Environment, NavError> {
        Environment::new(self.boxes.iter().map(BoxSpec::build).collect())
    }

    /// Validates chaining against `radius` instead of the default sub-goal radius.
    pub fn build_environment_with_radius(&self, radius: f64) -> Result<Environment, NavError> {
        Environment::with_handover_margin(self.boxes.iter().map(BoxSpec::build).collect(), radius)
    }
}
