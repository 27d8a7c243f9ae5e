use std::fmt;
use serde::{Serialize, Deserialize};

use crate::geo_3d::{Point, GeoVector};

/// A plane in 3D space.
/// Contains a normal vector and an offset.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct Plane {
    normal: GeoVector,
    pub offset: f64,
}
impl Plane {
    /// Create a new plane from a normal vector and a point.
    pub fn from_normal_and_point(normal: GeoVector, point: Point) -> Self {
        let normal = normal.normalize();
        let offset = normal.dot(&point.into());
        Plane{normal, offset}
    }

    /// Get the normal vector of the plane. Guaranteed to be normalized.
    pub fn get_normal(&self) -> GeoVector {
        self.normal
    }

    /// Get the signed distance from a point to the plane.
    /// Positive on the side the normal points to.
    pub fn distance_to_point(&self, point: &Point) -> f64 {
        self.normal.dot(&(*point).into()) - self.offset
    }

    /// Get the projection of a point onto the plane.
    pub fn project_point(&self, point: &Point) -> Point {
        *point - self.normal * self.distance_to_point(point)
    }

    /// Intersection of the segment `p1`-`p2` with the plane, if it crosses it.
    pub fn intersect_segment(&self, p1: &Point, p2: &Point) -> Option<Point> {
        let d1 = self.distance_to_point(p1);
        let d2 = self.distance_to_point(p2);
        if d1 * d2 > 0.0 || d1 == d2 {
            return None;
        }
        let t = d1 / (d1 - d2);
        Some(*p1 + (*p2 - *p1) * t)
    }
}
impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plane: normal={}, offset={}", self.normal, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn distance_is_signed() {
        let plane = Plane::from_normal_and_point(GeoVector::new(0.0, 0.0, 2.0), Point::new(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(plane.distance_to_point(&Point::new(5.0, 5.0, 3.0)), 2.0);
        assert_abs_diff_eq!(plane.distance_to_point(&Point::zero()), -1.0);
    }

    #[test]
    fn segment_crossing() {
        let plane = Plane::from_normal_and_point(GeoVector::xhat(), Point::new(1.0, 5.0, 0.0));
        let hit = plane.intersect_segment(&Point::new(0.0, 0.0, 0.0), &Point::new(4.0, 4.0, 0.0));
        assert_abs_diff_eq!(hit.unwrap(), Point::new(1.0, 1.0, 0.0));
        assert!(plane.intersect_segment(&Point::new(2.0, 0.0, 0.0), &Point::new(3.0, 0.0, 0.0)).is_none());
    }
}
