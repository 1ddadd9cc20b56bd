//! Capabilities for running the navigator against an external engine.
//!
//! When no bridge is attached the navigator simulates motion itself. With a
//! bridge, position is read from the engine before every step and the chosen
//! action is forwarded to it before anything is committed locally.

use crate::errors::BridgeError;
use crate::geometry::Pt;
use crate::navigator::Action;

pub trait PositionSource {
    fn position(&mut self) -> Result<Pt, BridgeError>;
}

pub trait ActionSink {
    fn apply(&mut self, action: Action) -> Result<(), BridgeError>;
}

pub trait EngineBridge: PositionSource + ActionSink {}

impl<T: PositionSource + ActionSink> EngineBridge for T {}
