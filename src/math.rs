//! Mathematical structs and functions.

use cgmath::{Point2, Point3, Vector2, Vector3};
pub use arclen::{arc_length, parameter_at_arc_length};
pub use catmull_rom::{CatmullRomSegment, SplineType};
pub use closest::closest_parameter;
pub use ops::{GeometricOperations, Space1d, Space2d, Space3d};
pub use polynomial::Polynomial;

pub(crate) mod arclen;
mod catmull_rom;
mod closest;
mod ops;
mod polynomial;

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// A 3D point
pub type Point3d = Point3<f64>;

/// A 3D vector
pub type Vector3d = Vector3<f64>;
