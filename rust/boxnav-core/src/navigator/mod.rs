//! Discrete-action navigator.
//!
//! Each step reads the environment, advances the sub-goal when the agent has
//! reached it inside an overlap, computes the geometrically correct action,
//! lets the policy pick the executed one, and commits the new state only once
//! every check (bounds, engine) has passed.

pub mod action;
pub mod policy;

use std::fmt;

use tracing::{debug, warn};

pub use action::{Action, ActionOutcome};
pub use policy::{ActionPolicy, NavigatorKind, Perfect, Wandering};

use crate::bridge::EngineBridge;
use crate::environment::Environment;
use crate::errors::NavError;
use crate::geometry::{Pt, EPSILON};
use crate::options::NavigatorConfig;
use crate::snapshot::NavigatorSnapshot;

pub struct Navigator<'env, P = Perfect> {
    env: &'env Environment,
    position: Pt,
    /// Radians, never wrapped; only its cos/sin are used.
    rotation: f64,
    target: Pt,
    config: NavigatorConfig,
    policy: P,
    bridge: Option<Box<dyn EngineBridge>>,
}

impl<'env, P: ActionPolicy> Navigator<'env, P> {
    pub fn new(
        env: &'env Environment,
        position: Pt,
        rotation: f64,
        config: NavigatorConfig,
        policy: P,
    ) -> Result<Self, NavError> {
        config.validate()?;
        if config.target_arrival_radius > env.handover_margin() + EPSILON {
            return Err(NavError::invalid(format!(
                "sub-goal radius {} exceeds the corridor's handover margin {}",
                config.target_arrival_radius,
                env.handover_margin()
            )));
        }
        if !config.allow_out_of_bounds && !env.contains(position) {
            return Err(NavError::invalid(format!(
                "start position ({}, {}) is outside every box",
                position.x, position.y
            )));
        }
        if !rotation.is_finite() {
            return Err(NavError::invalid("start rotation must be finite"));
        }
        Ok(Self { env, position, rotation, target: env.first_target(), config, policy, bridge: None })
    }

    /// Drive an external engine instead of simulating motion locally.
    pub fn with_bridge(mut self, bridge: Box<dyn EngineBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn environment(&self) -> &'env Environment { self.env }
    pub fn position(&self) -> Pt { self.position }
    pub fn rotation(&self) -> f64 { self.rotation }
    pub fn current_target(&self) -> Pt { self.target }
    pub fn config(&self) -> &NavigatorConfig { &self.config }
    pub fn policy(&self) -> &P { &self.policy }
    pub fn policy_mut(&mut self) -> &mut P { &mut self.policy }
    pub fn has_bridge(&self) -> bool { self.bridge.is_some() }

    pub fn heading(&self) -> Pt {
        Pt::from_angle(self.rotation)
    }

    pub fn at_final_target(&self) -> bool {
        self.env.is_at_final_target(self.position, self.config.final_arrival_radius)
    }

    /// Replace the local position with the engine's, if one is attached.
    /// Without a bridge this is a no-op.
    pub fn sync_position(&mut self) -> Result<Pt, NavError> {
        self.position = self.observed_position()?;
        Ok(self.position)
    }

    /// The correct action for the current state, including any pending
    /// sub-goal advance. Does not mutate anything.
    pub fn correct_action(&self) -> Result<Action, NavError> {
        let target = self.advanced_target(self.position);
        self.decide(self.position, target)
    }

    /// One navigation step. On error nothing is committed.
    pub fn take_action(&mut self) -> Result<ActionOutcome, NavError> {
        let position = self.observed_position()?;
        let target = self.advanced_target(position);
        let correct = self.decide(position, target)?;
        let taken = self.policy.select(correct);
        let (next_position, next_rotation) = self.resolve(position, taken)?;
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.apply(taken)?;
        }
        if target != self.target {
            debug!(x = target.x, y = target.y, "advanced sub-goal");
        }
        self.target = target;
        self.position = next_position;
        self.rotation = next_rotation;
        Ok(ActionOutcome { taken, correct })
    }

    /// Execute `action` directly, bypassing policy and sub-goal logic. This is
    /// the only way to move backward.
    pub fn perform(&mut self, action: Action) -> Result<(), NavError> {
        let position = self.observed_position()?;
        let (next_position, next_rotation) = self.resolve(position, action)?;
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.apply(action)?;
        }
        self.position = next_position;
        self.rotation = next_rotation;
        Ok(())
    }

    pub fn snapshot(&self) -> NavigatorSnapshot {
        NavigatorSnapshot {
            position: self.position,
            rotation: self.rotation,
            heading: self.heading(),
            current_target: self.target,
            containing_boxes: self.env.indices_containing(self.position),
        }
    }

    fn observed_position(&mut self) -> Result<Pt, NavError> {
        match self.bridge.as_mut() {
            Some(bridge) => Ok(bridge.position()?),
            None => Ok(self.position),
        }
    }

    /// Overlaps resolve toward the end of the corridor: the last containing box wins.
    fn advanced_target(&self, position: Pt) -> Pt {
        if position.distance(self.target) >= self.config.target_arrival_radius {
            return self.target;
        }
        let containing = self.env.boxes_containing(position);
        match containing.as_slice() {
            [_, .., last] => last.target(),
            _ => self.target,
        }
    }

    fn decide(&self, position: Pt, target: Pt) -> Result<Action, NavError> {
        let heading = Pt::from_angle(self.rotation).normalized()?;
        let to_target = (target - position).normalized()?;
        let signed = heading.angle_between(to_target);
        Ok(if signed.abs() < self.config.heading_tolerance {
            Action::Forward
        } else if signed > 0.0 {
            Action::RotateLeft
        } else {
            Action::RotateRight
        })
    }

    fn resolve(&self, position: Pt, action: Action) -> Result<(Pt, f64), NavError> {
        let inc = self.config.rotation_increment;
        match action {
            Action::Forward => self.translate(position, action, 1.0),
            Action::Backward => self.translate(position, action, -1.0),
            Action::RotateLeft => Ok((position, self.rotation + inc)),
            Action::RotateRight => Ok((position, self.rotation - inc)),
        }
    }

    fn translate(&self, from: Pt, action: Action, sign: f64) -> Result<(Pt, f64), NavError> {
        let to = from + self.heading() * (sign * self.config.translation_increment);
        if self.config.allow_out_of_bounds || self.env.contains(to) {
            Ok((to, self.rotation))
        } else {
            warn!(%action, from_x = from.x, from_y = from.y, to_x = to.x, to_y = to.y, "rejected step outside every box");
            Err(NavError::OutOfBounds { action, from, to })
        }
    }
}

impl<P> fmt::Debug for Navigator<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("target", &self.target)
            .field("config", &self.config)
            .field("bridge", &self.bridge.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::OrientedBox;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn corridor() -> Environment {
        Environment::new(vec![
            OrientedBox::new(Pt::new(0.0, 0.0), Pt::new(0.0, 20.0), Pt::new(10.0, 20.0), Pt::new(5.0, 18.0)),
            OrientedBox::new(Pt::new(0.0, 10.0), Pt::new(0.0, 20.0), Pt::new(30.0, 20.0), Pt::new(28.0, 15.0)),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_start_outside_every_box() {
        let env = corridor();
        let err = Navigator::new(&env, Pt::new(20.0, 5.0), 0.0, NavigatorConfig::default(), Perfect).unwrap_err();
        assert!(matches!(err, NavError::InvalidConfiguration(_)));
        let cfg = NavigatorConfig { allow_out_of_bounds: true, ..NavigatorConfig::default() };
        assert!(Navigator::new(&env, Pt::new(20.0, 5.0), 0.0, cfg, Perfect).is_ok());
    }

    #[test]
    fn rejects_radius_wider_than_handover_margin() {
        let env = corridor();
        let cfg = NavigatorConfig { target_arrival_radius: 1.5, ..NavigatorConfig::default() };
        let err = Navigator::new(&env, Pt::new(5.0, 5.0), 0.0, cfg.clone(), Perfect).unwrap_err();
        assert!(err.to_string().contains("handover margin"), "{err}");

        let wide = Environment::with_handover_margin(env.boxes().to_vec(), 2.0).unwrap();
        assert!(Navigator::new(&wide, Pt::new(5.0, 5.0), 0.0, cfg, Perfect).is_ok());
    }

    #[test]
    fn rotation_direction_convention() {
        let env = corridor();
        // Target (5,18) is straight up from (5,5); facing east means it lies to the left.
        let mut nav = Navigator::new(&env, Pt::new(5.0, 5.0), 0.0, NavigatorConfig::default(), Perfect).unwrap();
        let out = nav.take_action().unwrap();
        assert_eq!(out.correct, Action::RotateLeft);
        assert!(nav.rotation() > 0.0);

        let mut nav = Navigator::new(&env, Pt::new(5.0, 5.0), PI, NavigatorConfig::default(), Perfect).unwrap();
        assert_eq!(nav.take_action().unwrap().correct, Action::RotateRight);
        assert!(nav.rotation() < PI);
    }

    #[test]
    fn forward_moves_one_increment_along_heading() {
        let env = corridor();
        let mut nav = Navigator::new(&env, Pt::new(5.0, 5.0), FRAC_PI_2, NavigatorConfig::default(), Perfect).unwrap();
        let out = nav.take_action().unwrap();
        assert_eq!(out, ActionOutcome { taken: Action::Forward, correct: Action::Forward });
        assert_eq!(nav.position(), Pt::new(5.0, 6.0));
    }

    #[test]
    fn backward_only_through_perform() {
        let env = corridor();
        let mut nav = Navigator::new(&env, Pt::new(5.0, 5.0), FRAC_PI_2, NavigatorConfig::default(), Perfect).unwrap();
        nav.perform(Action::Backward).unwrap();
        assert_eq!(nav.position(), Pt::new(5.0, 4.0));
        assert!((nav.rotation() - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn sitting_on_target_is_degenerate() {
        let env = corridor();
        let nav = Navigator::new(&env, Pt::new(5.0, 18.0), 0.0, NavigatorConfig::default(), Perfect).unwrap();
        // Inside both boxes and on the sub-goal: the advance kicks in first.
        assert!(nav.correct_action().is_ok());

        let single = Environment::new(vec![OrientedBox::new(
            Pt::new(0.0, 0.0), Pt::new(0.0, 20.0), Pt::new(10.0, 20.0), Pt::new(5.0, 18.0),
        )])
        .unwrap();
        let mut nav = Navigator::new(&single, Pt::new(5.0, 18.0), 0.0, NavigatorConfig::default(), Perfect).unwrap();
        assert!(matches!(nav.correct_action(), Err(NavError::GeometryDegenerate)));
        assert!(matches!(nav.take_action(), Err(NavError::GeometryDegenerate)));
        assert_eq!(nav.position(), Pt::new(5.0, 18.0));
    }

    #[test]
    fn snapshot_reports_containing_boxes() {
        let env = corridor();
        let nav = Navigator::new(&env, Pt::new(5.0, 15.0), 0.0, NavigatorConfig::default(), Perfect).unwrap();
        let snap = nav.snapshot();
        assert_eq!(snap.containing_boxes, vec![0, 1]);
        assert_eq!(snap.heading, Pt::new(1.0, 0.0));
        assert_eq!(snap.current_target, Pt::new(5.0, 18.0));
    }
}
