pub mod oriented_box;
pub mod vector;

pub use oriented_box::OrientedBox;
pub use vector::{approx_eq, Pt, EPSILON};
