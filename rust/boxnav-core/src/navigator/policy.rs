use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::action::Action;
use crate::errors::NavError;

pub const DEFAULT_WANDER_PROBABILITY: f64 = 0.5;

/// Chooses the executed action given the geometrically correct one.
pub trait ActionPolicy {
    fn select(&mut self, correct: Action) -> Action;
}

impl<F> ActionPolicy for F
where
    F: FnMut(Action) -> Action,
{
    fn select(&mut self, correct: Action) -> Action {
        self(correct)
    }
}

/// Always executes the correct action.
#[derive(Clone, Copy, Debug, Default)]
pub struct Perfect;

impl ActionPolicy for Perfect {
    fn select(&mut self, correct: Action) -> Action {
        correct
    }
}

/// With probability `probability`, replaces the correct action by one drawn
/// uniformly from [`Action::AUTOMATIC`] (which may coincide with it).
#[derive(Clone, Debug)]
pub struct Wandering<R = SmallRng> {
    probability: f64,
    rng: R,
}

impl Wandering<SmallRng> {
    pub fn new(probability: f64) -> Result<Self, NavError> {
        Self::with_rng(probability, SmallRng::from_os_rng())
    }

    pub fn seeded(probability: f64, seed: u64) -> Result<Self, NavError> {
        Self::with_rng(probability, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Wandering<R> {
    pub fn with_rng(probability: f64, rng: R) -> Result<Self, NavError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(NavError::invalid(format!("wander probability must be within [0, 1], got {probability}")));
        }
        Ok(Self { probability, rng })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl<R: Rng> ActionPolicy for Wandering<R> {
    fn select(&mut self, correct: Action) -> Action {
        if self.rng.random_bool(self.probability) {
            Action::AUTOMATIC[self.rng.random_range(0..Action::AUTOMATIC.len())]
        } else {
            correct
        }
    }
}

/// Named navigator variants, as selected from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigatorKind {
    Perfect,
    Wandering,
}

impl NavigatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NavigatorKind::Perfect => "perfect",
            NavigatorKind::Wandering => "wandering",
        }
    }
}

impl fmt::Display for NavigatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavigatorKind {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perfect" | "boyscout" => Ok(NavigatorKind::Perfect),
            "wandering" | "wanderer" => Ok(NavigatorKind::Wandering),
            other => Err(NavError::invalid(format!("unknown navigator variant '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_passes_through() {
        let mut p = Perfect;
        for a in Action::ALL {
            assert_eq!(p.select(a), a);
        }
    }

    #[test]
    fn probability_zero_never_substitutes() {
        let mut w = Wandering::seeded(0.0, 7).unwrap();
        for _ in 0..200 {
            assert_eq!(w.select(Action::RotateRight), Action::RotateRight);
        }
    }

    #[test]
    fn probability_one_draws_from_automatic_set() {
        let mut w = Wandering::seeded(1.0, 7).unwrap();
        let mut seen = [false; 4];
        for _ in 0..300 {
            let a = w.select(Action::Forward);
            assert!(Action::AUTOMATIC.contains(&a));
            seen[a.index()] = true;
        }
        assert!(seen[Action::RotateLeft.index()] && seen[Action::RotateRight.index()]);
        assert!(!seen[Action::Backward.index()]);
    }

    #[test]
    fn seeded_runs_repeat() {
        let mut a = Wandering::seeded(0.5, 42).unwrap();
        let mut b = Wandering::seeded(0.5, 42).unwrap();
        let xs: Vec<Action> = (0..50).map(|_| a.select(Action::Forward)).collect();
        let ys: Vec<Action> = (0..50).map(|_| b.select(Action::Forward)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn rejects_bad_probability() {
        assert!(Wandering::seeded(1.5, 1).is_err());
        assert!(Wandering::seeded(-0.1, 1).is_err());
        assert!(Wandering::seeded(f64::NAN, 1).is_err());
    }

    #[test]
    fn closures_are_policies() {
        let mut always_left = |_: Action| Action::RotateLeft;
        assert_eq!(always_left.select(Action::Forward), Action::RotateLeft);
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("Perfect".parse::<NavigatorKind>().unwrap(), NavigatorKind::Perfect);
        assert_eq!("wanderer".parse::<NavigatorKind>().unwrap(), NavigatorKind::Wandering);
        assert!(matches!("teleporter".parse::<NavigatorKind>(), Err(NavError::InvalidConfiguration(_))));
    }
}
