use crate::coords::Coords;
use crate::geo_3d::{Point, GeoVector, Plane, Bounded, PlaneSection, EPSILON};

/// A triangulated surface in 3D space. Contains vertices and faces.
/// Only carries what the coordinate algebra needs from a reference surface:
/// the points, and the triangles for plane sections.
#[derive(Debug, Clone)]
pub struct Surface {
    pub vertices: Vec<SurfaceVertex>,
    pub faces: Vec<SurfaceFace>,
}
impl Surface {
    /// Build a surface from points and triangles (indices into `points`).
    /// Face normals follow the vertex order (right hand rule), vertex normals
    /// are the area-weighted average of the adjacent face normals.
    pub fn from_triangles(points: Vec<Point>, triangles: &[[usize; 3]]) -> Self {
        let mut surface = Surface{
            vertices: points.into_iter().map(SurfaceVertex::new_from_point).collect(),
            faces: Vec::with_capacity(triangles.len()),
        };

        for tri in triangles.iter() {
            let p1 = surface.vertices[tri[0]].point;
            let p2 = surface.vertices[tri[1]].point;
            let p3 = surface.vertices[tri[2]].point;
            let cross = (p2 - p1).cross(&(p3 - p1));
            surface.faces.push(SurfaceFace::new(*tri, cross));
            for vertex_idx in tri.iter() {
                surface.vertices[*vertex_idx].normal += cross * 0.5;
            }
        }

        for vertex in surface.vertices.iter_mut() {
            if vertex.normal.norm() > EPSILON {
                vertex.normal = vertex.normal.normalize();
            }
        }

        surface
    }

    /// The vertex coordinates as a (nvertices,3) `Coords`.
    pub fn to_coords(&self) -> Coords {
        Coords::from_points(self.vertices.iter().map(|v| v.point.to_array()).collect())
    }

    /// The face corner coordinates as a (nfaces,3,3) `Coords`.
    pub fn face_coords(&self) -> Coords {
        let data = self.faces.iter()
            .flat_map(|face| face.vertices.iter())
            .flat_map(|idx| self.vertices[*idx].point.to_array())
            .collect();
        Coords::from_raw(data, vec![self.faces.len(), 3])
    }

    /// Corner points of a face.
    fn face_points(&self, face: &SurfaceFace) -> [Point; 3] {
        [
            self.vertices[face.vertices[0]].point,
            self.vertices[face.vertices[1]].point,
            self.vertices[face.vertices[2]].point,
        ]
    }
}
impl Bounded for Surface {
    fn bbox(&self) -> Option<Coords> {
        if self.vertices.is_empty() {
            return None;
        }
        Some(self.to_coords().bbox())
    }
}
impl PlaneSection for Surface {
    fn intersection_with_plane(&self, point: &Point, normal: &GeoVector) -> Vec<[Point; 2]> {
        let plane = Plane::from_normal_and_point(*normal, *point);
        let mut segments = Vec::new();

        for face in self.faces.iter() {
            let corners = self.face_points(face);
            let mut hits: Vec<Point> = Vec::with_capacity(3);
            for i in 0..3 {
                if let Some(hit) = plane.intersect_segment(&corners[i], &corners[(i + 1) % 3]) {
                    // A corner on the plane is hit by both of its edges
                    if hits.iter().all(|p| p.distance(&hit) > EPSILON) {
                        hits.push(hit);
                    }
                }
            }
            if hits.len() >= 2 {
                segments.push([hits[0], hits[1]]);
            }
        }

        segments
    }
}

#[derive(Debug, Clone)]
pub struct SurfaceVertex {
    pub point: Point,
    pub normal: GeoVector,
}
impl SurfaceVertex {
    pub fn new_from_point(point: Point) -> Self {
        SurfaceVertex{
            point,
            normal: GeoVector::zero(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SurfaceFace {
    pub vertices: [usize; 3],
    normal: GeoVector,
}
impl SurfaceFace {
    pub fn new(vertices: [usize; 3], normal: GeoVector) -> Self {
        SurfaceFace{
            vertices,
            normal: normal.normalize(),
        }
    }

    /// Get the normal vector of the face. Normal vectors are private to guarantee that they are normalized.
    pub fn get_normal(&self) -> GeoVector {
        self.normal
    }
}
