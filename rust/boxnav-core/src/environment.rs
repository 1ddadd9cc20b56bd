//! Ordered corridor of oriented boxes.
//!
//! Order matters: box `i`'s target must sit inside box `i + 1`, at least the
//! handover margin away from its edges, so that an agent within the sub-goal
//! radius of it is already inside the next box. The final target is the target
//! of the last box.

use serde::{Deserialize, Serialize};

use crate::errors::NavError;
use crate::geometry::{OrientedBox, Pt, EPSILON};
use crate::options::DEFAULT_TARGET_ARRIVAL_RADIUS;

/// Padding added around the extremal box corners for display.
pub const DISPLAY_PADDING: f64 = 5.0;
/// Heading-arrow scale relative to the smaller display extent.
pub const DISPLAY_SCALE_FACTOR: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub scale: f64,
}

#[derive(Clone, Debug)]
pub struct Environment {
    boxes: Vec<OrientedBox>,
    handover_margin: f64,
}

impl Environment {
    /// Validates the box list with the default sub-goal radius as handover margin.
    pub fn new(boxes: Vec<OrientedBox>) -> Result<Self, NavError> {
        Self::with_handover_margin(boxes, DEFAULT_TARGET_ARRIVAL_RADIUS)
    }

    /// Navigators on this environment may use a sub-goal radius up to `margin`.
    pub fn with_handover_margin(boxes: Vec<OrientedBox>, margin: f64) -> Result<Self, NavError> {
        if !margin.is_finite() || margin < 0.0 {
            return Err(NavError::invalid(format!("handover margin must be non-negative, got {margin}")));
        }
        if boxes.is_empty() {
            return Err(NavError::invalid("environment needs at least one box"));
        }
        for (i, b) in boxes.iter().enumerate() {
            if !b.is_well_formed() {
                return Err(NavError::invalid(format!("box {i} is not a non-degenerate rectangle")));
            }
            if !b.point_is_inside(b.target()) {
                return Err(NavError::invalid(format!("box {i} target lies outside the box")));
            }
        }
        for (i, pair) in boxes.windows(2).enumerate() {
            let depth = pair[1].inset_depth(pair[0].target());
            if depth + EPSILON < margin {
                return Err(NavError::invalid(format!(
                    "box {i} target is {depth:.3} inside box {} (need {margin}); the corridor does not chain",
                    i + 1
                )));
            }
        }
        Ok(Self { boxes, handover_margin: margin })
    }

    pub fn handover_margin(&self) -> f64 {
        self.handover_margin
    }

    pub fn boxes(&self) -> &[OrientedBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn first_target(&self) -> Pt {
        self.boxes[0].target()
    }

    pub fn final_target(&self) -> Pt {
        self.boxes[self.boxes.len() - 1].target()
    }

    /// Every box containing `pt`, in corridor order.
    pub fn boxes_containing(&self, pt: Pt) -> Vec<&OrientedBox> {
        self.boxes.iter().filter(|b| b.point_is_inside(pt)).collect()
    }

    /// Corridor indices of the boxes containing `pt`.
    pub fn indices_containing(&self, pt: Pt) -> Vec<usize> {
        self.boxes
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.point_is_inside(pt).then_some(i))
            .collect()
    }

    pub fn contains(&self, pt: Pt) -> bool {
        self.boxes.iter().any(|b| b.point_is_inside(pt))
    }

    pub fn is_at_final_target(&self, pt: Pt, threshold: f64) -> bool {
        pt.distance(self.final_target()) < threshold
    }

    pub fn display_bounds(&self) -> DisplayBounds {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for b in &self.boxes {
            for p in [b.a(), b.b(), b.c()] {
                x_min = x_min.min(p.x);
                x_max = x_max.max(p.x);
                y_min = y_min.min(p.y);
                y_max = y_max.max(p.y);
            }
        }
        let scale = DISPLAY_SCALE_FACTOR * (x_max - x_min).abs().min((y_max - y_min).abs());
        DisplayBounds {
            x_min: x_min - DISPLAY_PADDING,
            x_max: x_max + DISPLAY_PADDING,
            y_min: y_min - DISPLAY_PADDING,
            y_max: y_max + DISPLAY_PADDING,
            scale,
        }
    }
}
