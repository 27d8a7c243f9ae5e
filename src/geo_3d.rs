mod point;
mod vector;
mod plane;
mod surface;

pub use point::Point;
pub use vector::GeoVector;
pub use plane::Plane;
pub use surface::{
    Surface,
    SurfaceVertex,
    SurfaceFace,
};

use crate::coords::Coords;

/// Tolerance used for geometric degeneracy checks.
pub const EPSILON: f64 = 1e-12;

/// Anything that occupies a region of space and can report its axis-aligned bounding box.
/// Used by `coords::bbox` to frame a list of heterogeneous objects.
pub trait Bounded {
    /// Bounding box as a (2,3) `Coords`: the min corner, then the max corner.
    /// Returns `None` if the object has no meaningful extent.
    fn bbox(&self) -> Option<Coords>;
}

/// Capability of cutting an object with a plane.
/// `Coords::project_on_surface` only relies on this trait, so any triangulated
/// reference geometry can be plugged in.
pub trait PlaneSection {
    /// Intersect with the plane through `point` with normal `normal`.
    /// Returns the resulting line segments.
    fn intersection_with_plane(&self, point: &Point, normal: &GeoVector) -> Vec<[Point; 2]>;
}
