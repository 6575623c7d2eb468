//! The arithmetic capability every curve in this crate is generic over.
//!
//! A geometric space is described by a zero-sized marker type implementing
//! [GeometricOperations]. The marker names a position type and a difference
//! type and supplies the handful of operations the spline math needs, so the
//! same code evaluates curves on the real line, in the plane and in space.

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use cgmath::prelude::*;

use super::{Point2d, Point3d, Vector2d, Vector3d};

/// Arithmetic over a position type and its difference type.
///
/// Implementations must satisfy:
/// * `add`/`sub` form an abelian group action of `Diff` on `Pos`, so that
///   `add(q, sub(p, q)) == p`;
/// * `mul` is scalar multiplication of `Diff`;
/// * `dot` is a symmetric bilinear form;
/// * `distance` is a metric consistent with `dot`.
pub trait GeometricOperations:
    Copy + Clone + Debug + Default + PartialEq + Eq + Hash + Send + Sync + 'static
{
    /// A position in the space.
    type Pos: Copy + PartialEq + Debug + Send + Sync;
    /// The difference between two positions, also used for tangents.
    type Diff: Copy + PartialEq + Debug + Send + Sync;

    /// The additive identity of `Diff`.
    fn zero_diff() -> Self::Diff;

    /// Translates a position.
    fn add(pos: Self::Pos, diff: Self::Diff) -> Self::Pos;

    /// Adds two differences.
    fn add_diff(a: Self::Diff, b: Self::Diff) -> Self::Diff;

    /// The difference `a - b` between two positions.
    fn sub(a: Self::Pos, b: Self::Pos) -> Self::Diff;

    /// Scales a difference.
    fn mul(diff: Self::Diff, scalar: f64) -> Self::Diff;

    fn dot(a: Self::Diff, b: Self::Diff) -> f64;

    /// Feeds a position into a hasher.
    ///
    /// Must be consistent with the position's `PartialEq`.
    fn hash_pos<H: Hasher>(pos: &Self::Pos, state: &mut H);

    fn sub_diff(a: Self::Diff, b: Self::Diff) -> Self::Diff {
        Self::add_diff(a, Self::mul(b, -1.0))
    }

    fn div(diff: Self::Diff, scalar: f64) -> Self::Diff {
        Self::mul(diff, 1.0 / scalar)
    }

    /// The length of a difference.
    fn magnitude(diff: Self::Diff) -> f64 {
        Self::dot(diff, diff).sqrt()
    }

    fn distance(a: Self::Pos, b: Self::Pos) -> f64 {
        Self::magnitude(Self::sub(a, b))
    }

    /// Linear interpolation between two positions.
    fn lerp(a: Self::Pos, b: Self::Pos, t: f64) -> Self::Pos {
        Self::add(a, Self::mul(Self::sub(b, a), t))
    }
}

/// Hashes a float so that `0.0` and `-0.0` hash alike, matching `==`.
fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    (value + 0.0).to_bits().hash(state)
}

/// The real number line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Space1d;

impl GeometricOperations for Space1d {
    type Pos = f64;
    type Diff = f64;

    fn zero_diff() -> f64 {
        0.0
    }

    fn add(pos: f64, diff: f64) -> f64 {
        pos + diff
    }

    fn add_diff(a: f64, b: f64) -> f64 {
        a + b
    }

    fn sub(a: f64, b: f64) -> f64 {
        a - b
    }

    fn mul(diff: f64, scalar: f64) -> f64 {
        diff * scalar
    }

    fn dot(a: f64, b: f64) -> f64 {
        a * b
    }

    fn hash_pos<H: Hasher>(pos: &f64, state: &mut H) {
        hash_f64(*pos, state)
    }

    fn magnitude(diff: f64) -> f64 {
        diff.abs()
    }
}

/// The euclidean plane.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Space2d;

impl GeometricOperations for Space2d {
    type Pos = Point2d;
    type Diff = Vector2d;

    fn zero_diff() -> Vector2d {
        Vector2d::new(0.0, 0.0)
    }

    fn add(pos: Point2d, diff: Vector2d) -> Point2d {
        pos + diff
    }

    fn add_diff(a: Vector2d, b: Vector2d) -> Vector2d {
        a + b
    }

    fn sub(a: Point2d, b: Point2d) -> Vector2d {
        a - b
    }

    fn mul(diff: Vector2d, scalar: f64) -> Vector2d {
        diff * scalar
    }

    fn dot(a: Vector2d, b: Vector2d) -> f64 {
        a.dot(b)
    }

    fn hash_pos<H: Hasher>(pos: &Point2d, state: &mut H) {
        hash_f64(pos.x, state);
        hash_f64(pos.y, state);
    }

    fn distance(a: Point2d, b: Point2d) -> f64 {
        a.distance(b)
    }
}

/// Three dimensional euclidean space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Space3d;

impl GeometricOperations for Space3d {
    type Pos = Point3d;
    type Diff = Vector3d;

    fn zero_diff() -> Vector3d {
        Vector3d::new(0.0, 0.0, 0.0)
    }

    fn add(pos: Point3d, diff: Vector3d) -> Point3d {
        pos + diff
    }

    fn add_diff(a: Vector3d, b: Vector3d) -> Vector3d {
        a + b
    }

    fn sub(a: Point3d, b: Point3d) -> Vector3d {
        a - b
    }

    fn mul(diff: Vector3d, scalar: f64) -> Vector3d {
        diff * scalar
    }

    fn dot(a: Vector3d, b: Vector3d) -> f64 {
        a.dot(b)
    }

    fn hash_pos<H: Hasher>(pos: &Point3d, state: &mut H) {
        hash_f64(pos.x, state);
        hash_f64(pos.y, state);
        hash_f64(pos.z, state);
    }

    fn distance(a: Point3d, b: Point3d) -> f64 {
        a.distance(b)
    }
}
