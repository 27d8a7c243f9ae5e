use stl_io;

use crate::io;
use crate::geo_3d::{
    Point,
    Surface,
};

/// Load a STL file from the input path.
/// Uses the external `stl_io` crate.
/// Returns an `IoResult` with the `Surface` or an `Err`
pub fn load_stl(filename: &str) -> io::IoResult<Surface> {
    let mut file = io::open(filename)?;
    let stl = match stl_io::read_stl(&mut file) {
        Ok(stl) => stl,
        Err(error) => {
            return Err(io::IoError{file: Some(filename.to_string()), cause: io::IoErrorType::File(error)});
        },
    };

    let points = stl.vertices.iter()
        .map(|vertex| Point::new(vertex[0].into(), vertex[1].into(), vertex[2].into()))
        .collect();
    let triangles: Vec<[usize; 3]> = stl.faces.iter()
        .map(|face| face.vertices)
        .collect();
    if let Some(bad) = triangles.iter().flatten().find(|&&idx| idx >= stl.vertices.len()) {
        let error_str = format!("Face refers to vertex {} of {}", bad, stl.vertices.len());
        return Err(io::IoError{file: Some(filename.to_string()), cause: io::IoErrorType::StringOnly(error_str)});
    }

    Ok(Surface::from_triangles(points, &triangles))
}

/// Save a surface to a binary STL file.
/// Uses the external `stl_io` crate. Coordinates are stored in single precision.
pub fn save_stl(surface: &Surface, output_path: &str) -> io::IoResult<()> {
    let vertex = |idx: usize| {
        let p = surface.vertices[idx].point;
        stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32])
    };
    let triangles: Vec<stl_io::Triangle> = surface.faces.iter()
        .map(|face| {
            let n = face.get_normal();
            stl_io::Triangle{
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [vertex(face.vertices[0]), vertex(face.vertices[1]), vertex(face.vertices[2])],
            }
        })
        .collect();

    let mut f = io::create(output_path)?;
    match stl_io::write_stl(&mut f, triangles.iter()) {
        Ok(_) => Ok(()),
        Err(error) => Err(io::IoError{file: Some(output_path.to_string()), cause: io::IoErrorType::File(error)}),
    }
}
