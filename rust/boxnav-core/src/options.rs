use std::env;

use serde::{Deserialize, Serialize};

use crate::errors::NavError;

pub const DEFAULT_TRANSLATION_INCREMENT: f64 = 1.0;
pub const DEFAULT_ROTATION_INCREMENT_DEG: f64 = 2.5;
pub const DEFAULT_TARGET_ARRIVAL_RADIUS: f64 = 1.0;
pub const DEFAULT_FINAL_ARRIVAL_RADIUS: f64 = 2.0;
pub const DEFAULT_HEADING_TOLERANCE_DEG: f64 = 5.0;

/// Navigator tuning constants. Angles are stored in radians.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub translation_increment: f64,
    pub rotation_increment: f64,
    /// Distance to the current sub-goal at which the next box may take over.
    pub target_arrival_radius: f64,
    /// Distance to the last box's target that counts as arrival.
    pub final_arrival_radius: f64,
    /// Half-width of the heading cone inside which the navigator moves forward.
    pub heading_tolerance: f64,
    /// Commit translations even when they leave every box (externally driven position).
    pub allow_out_of_bounds: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            translation_increment: DEFAULT_TRANSLATION_INCREMENT,
            rotation_increment: DEFAULT_ROTATION_INCREMENT_DEG.to_radians(),
            target_arrival_radius: DEFAULT_TARGET_ARRIVAL_RADIUS,
            final_arrival_radius: DEFAULT_FINAL_ARRIVAL_RADIUS,
            heading_tolerance: DEFAULT_HEADING_TOLERANCE_DEG.to_radians(),
            allow_out_of_bounds: false,
        }
    }
}

impl NavigatorConfig {
    /// Overlay environment variables on the defaults. Missing/invalid values fall back to defaults.
    ///
    /// Variables:
    /// - BOXNAV_TRANSLATION_INCREMENT: step length
    /// - BOXNAV_ROTATION_INCREMENT_DEG: rotation step in degrees
    /// - BOXNAV_TARGET_RADIUS: sub-goal arrival radius
    /// - BOXNAV_FINAL_RADIUS: final target arrival radius
    /// - BOXNAV_HEADING_TOLERANCE_DEG: forward cone half-width in degrees
    /// - BOXNAV_ALLOW_OUT_OF_BOUNDS: "1"/"0" (default 0)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let positive = |name: &str| -> Option<f64> {
            lookup(name)?.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
        };
        if let Some(v) = positive("BOXNAV_TRANSLATION_INCREMENT") {
            cfg.translation_increment = v;
        }
        if let Some(v) = positive("BOXNAV_ROTATION_INCREMENT_DEG") {
            cfg.rotation_increment = v.to_radians();
        }
        if let Some(v) = positive("BOXNAV_TARGET_RADIUS") {
            cfg.target_arrival_radius = v;
        }
        if let Some(v) = positive("BOXNAV_FINAL_RADIUS") {
            cfg.final_arrival_radius = v;
        }
        if let Some(v) = positive("BOXNAV_HEADING_TOLERANCE_DEG") {
            cfg.heading_tolerance = v.to_radians();
        }
        if let Some(v) = lookup("BOXNAV_ALLOW_OUT_OF_BOUNDS") {
            cfg.allow_out_of_bounds = v.trim() == "1";
        }
        cfg
    }

    pub fn validate(&self) -> Result<(), NavError> {
        let fields = [
            ("translation_increment", self.translation_increment),
            ("rotation_increment", self.rotation_increment),
            ("target_arrival_radius", self.target_arrival_radius),
            ("final_arrival_radius", self.final_arrival_radius),
            ("heading_tolerance", self.heading_tolerance),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v <= 0.0 {
                return Err(NavError::invalid(format!("{name} must be a positive number, got {v}")));
            }
        }
        Ok(())
    }
}
