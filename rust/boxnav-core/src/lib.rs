pub mod bridge;
pub mod environment;
pub mod errors;
pub mod geometry;
pub mod navigator;
pub mod options;
pub mod scene;
pub mod simulation;
pub mod snapshot;

pub use bridge::{ActionSink, EngineBridge, PositionSource};
pub use environment::{DisplayBounds, Environment};
pub use errors::{BridgeError, NavError};
pub use geometry::{OrientedBox, Pt};
pub use navigator::{Action, ActionOutcome, ActionPolicy, Navigator, NavigatorKind, Perfect, Wandering};
pub use options::NavigatorConfig;
pub use scene::{BoxSpec, SceneSpec, StartSpec};
pub use simulation::{run, ActionStats, FrameSink, NullSink, RunError, RunSummary};
pub use snapshot::{BoxGeometry, EnvironmentSnapshot, Frame, NavigatorSnapshot};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
