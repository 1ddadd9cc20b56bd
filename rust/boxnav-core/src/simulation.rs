use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::NavError;
use crate::geometry::Pt;
use crate::navigator::{Action, ActionOutcome, ActionPolicy, Navigator};
use crate::snapshot::{EnvironmentSnapshot, Frame};

pub const DEFAULT_MAX_STEPS: u64 = 10_000;

/// Consumer of per-step snapshots. Never mutates the simulation.
pub trait FrameSink {
    fn begin(&mut self, scene: &EnvironmentSnapshot) -> io::Result<()>;
    fn frame(&mut self, frame: &Frame) -> io::Result<()>;
    fn finish(&mut self, summary: &RunSummary) -> io::Result<()>;
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn begin(&mut self, _scene: &EnvironmentSnapshot) -> io::Result<()> { Ok(()) }
    fn frame(&mut self, _frame: &Frame) -> io::Result<()> { Ok(()) }
    fn finish(&mut self, _summary: &RunSummary) -> io::Result<()> { Ok(()) }
}

/// Agreement between executed and correct actions, plus per-action counts
/// indexed by [`Action::index`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStats {
    pub agreements: u64,
    pub disagreements: u64,
    pub taken: [u64; 4],
    pub correct: [u64; 4],
}

impl ActionStats {
    pub fn record(&mut self, outcome: ActionOutcome) {
        if outcome.agrees() {
            self.agreements += 1;
        } else {
            self.disagreements += 1;
        }
        self.taken[outcome.taken.index()] += 1;
        self.correct[outcome.correct.index()] += 1;
    }

    pub fn taken_count(&self, action: Action) -> u64 {
        self.taken[action.index()]
    }

    pub fn correct_count(&self, action: Action) -> u64 {
        self.correct[action.index()]
    }

    /// Fraction of recorded steps where the executed action was the correct one.
    pub fn agreement_rate(&self) -> Option<f64> {
        let total = self.agreements + self.disagreements;
        (total > 0).then(|| self.agreements as f64 / total as f64)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: u64,
    pub arrived: bool,
    /// Steps whose translation was refused at the boundary.
    pub rejected_steps: u64,
    pub final_position: Pt,
    pub stats: ActionStats,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("navigation failed at step {step}: {source}")]
    Navigation { step: u64, source: NavError },
    #[error("frame sink failed: {0}")]
    Sink(#[from] io::Error),
}

/// Step `nav` until it reaches the final target or `max_steps` steps have been
/// attempted. Rejected boundary steps count toward the bound; any other
/// navigation error ends the run. With an engine attached, the position is
/// re-read from it before every arrival check and snapshot.
pub fn run<P, S>(nav: &mut Navigator<'_, P>, sink: &mut S, max_steps: u64) -> Result<RunSummary, RunError>
where
    P: ActionPolicy,
    S: FrameSink + ?Sized,
{
    sink.begin(&EnvironmentSnapshot::from(nav.environment()))?;
    nav.sync_position().map_err(|source| RunError::Navigation { step: 0, source })?;
    sink.frame(&Frame { step: 0, taken: None, correct: None, rejected: false, navigator: nav.snapshot() })?;

    let mut stats = ActionStats::default();
    let mut rejected_steps = 0u64;
    let mut steps = 0u64;
    while steps < max_steps && !nav.at_final_target() {
        steps += 1;
        let (taken, correct, rejected) = match nav.take_action() {
            Ok(outcome) => {
                stats.record(outcome);
                (outcome.taken, Some(outcome.correct), false)
            }
            Err(NavError::OutOfBounds { action, .. }) => {
                rejected_steps += 1;
                // Nothing moved, so the correct action is still the one for this step.
                (action, nav.correct_action().ok(), true)
            }
            Err(source) => return Err(RunError::Navigation { step: steps, source }),
        };
        nav.sync_position().map_err(|source| RunError::Navigation { step: steps, source })?;
        sink.frame(&Frame { step: steps, taken: Some(taken), correct, rejected, navigator: nav.snapshot() })?;
    }

    let summary = RunSummary {
        steps,
        arrived: nav.at_final_target(),
        rejected_steps,
        final_position: nav.position(),
        stats,
    };
    if summary.arrived {
        info!(steps = summary.steps, rejected = summary.rejected_steps, "reached final target");
    } else {
        warn!(steps = summary.steps, rejected = summary.rejected_steps, "stopped before reaching final target");
    }
    sink.finish(&summary)?;
    Ok(summary)
}
