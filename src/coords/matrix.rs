//! 3x3 matrices acting on row vectors: a point `x` maps to `x·M`.

use crate::geo_3d::{GeoVector, EPSILON};
use crate::coords::{Direction, ProcResult, shape_err, arg_err};

/// A 3x3 matrix, stored as rows.
pub type Matrix3 = [[f64; 3]; 3];

/// The identity matrix.
pub const IDENTITY: Matrix3 = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

/// Build a matrix from nested rows (e.g. from a config file). Must be exactly 3x3.
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> ProcResult<Matrix3> {
    if rows.len() != 3 || rows.iter().any(|row| row.len() != 3) {
        let shape: Vec<usize> = rows.iter().map(|row| row.len()).collect();
        return shape_err(&format!("Expected a 3x3 matrix, got rows of lengths {:?}", shape));
    }
    let mut mat = [[0.0; 3]; 3];
    for (i, row) in rows.iter().enumerate() {
        mat[i].copy_from_slice(row);
    }
    Ok(mat)
}

/// Rotation matrix over `angle` degrees around an axis through the origin.
///
/// The rotation is counterclockwise when looking down the axis towards the origin,
/// so rotating `[1,0,0]` by 90 degrees around axis 2 gives `[0,1,0]`.
pub fn rotation_matrix(angle: f64, axis: Direction) -> ProcResult<Matrix3> {
    let a = angle.to_radians();
    let (s, c) = a.sin_cos();
    match axis {
        Direction::Axis(axis) => {
            super::check_axis(axis)?;
            let (i, j, k) = (axis, (axis + 1) % 3, (axis + 2) % 3);
            let mut f = [[0.0; 3]; 3];
            f[i][i] = 1.0;
            f[j][j] = c;
            f[j][k] = s;
            f[k][j] = -s;
            f[k][k] = c;
            Ok(f)
        },
        Direction::Vector(vector) => {
            if vector.norm() < EPSILON {
                return arg_err("Rotation axis must not be zero");
            }
            let n = vector.normalize();
            let t = 1.0 - c;
            let (x, y, z) = (n.x, n.y, n.z);
            Ok([
                [t*x*x + c,   t*x*y + s*z, t*x*z - s*y],
                [t*y*x - s*z, t*y*y + c,   t*y*z + s*x],
                [t*z*x + s*y, t*z*y - s*x, t*z*z + c  ],
            ])
        },
    }
}

/// Rotation matrix turning direction `from` into direction `to`.
///
/// The remaining freedom is fixed by `up`: the plane of `to` and the rotated `up`
/// is the image of the plane of `from` and `up`.
pub fn vector_rotation(from: GeoVector, to: GeoVector, up: GeoVector) -> ProcResult<Matrix3> {
    let unit = |v: GeoVector, what: &str| -> ProcResult<GeoVector> {
        if v.norm() < EPSILON {
            return arg_err(&format!("Cannot build a vector rotation: {} is degenerate", what));
        }
        Ok(v.normalize())
    };
    let u = unit(from, "source direction")?;
    let u1 = unit(to, "target direction")?;
    let w = unit(up, "up vector")?;
    let v = unit(w.cross(&u), "source direction parallel to up vector")?;
    let w = unit(u.cross(&v), "source frame")?;
    let v1 = unit(w.cross(&u1), "target direction parallel to up vector")?;
    let w1 = unit(u1.cross(&v1), "target frame")?;

    // local frame (columns u, v, w) followed by target frame (rows u1, v1, w1)
    let to_local = transpose(&[u.to_array(), v.to_array(), w.to_array()]);
    let to_global = [u1.to_array(), v1.to_array(), w1.to_array()];
    Ok(mat_mul(&to_local, &to_global))
}

/// Matrix product `a·b`.
pub(crate) fn mat_mul(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

pub(crate) fn transpose(a: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in a.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            out[j][i] = *value;
        }
    }
    out
}

/// Row vector times matrix.
pub(crate) fn apply(xyz: &[f64], mat: &Matrix3) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (j, value) in out.iter_mut().enumerate() {
        *value = xyz[0] * mat[0][j] + xyz[1] * mat[1][j] + xyz[2] * mat[2][j];
    }
    out
}

pub(crate) fn determinant(a: &Matrix3) -> f64 {
    a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
        - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
        + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0])
}

/// Inverse matrix, `None` if singular.
pub(crate) fn inverse(a: &Matrix3) -> Option<Matrix3> {
    let det = determinant(a);
    let scale = a.iter().flatten().fold(0.0f64, |m, v| m.max(v.abs()));
    if det.abs() <= EPSILON * scale.powi(3) || det == 0.0 {
        return None;
    }
    let mut inv = [[0.0; 3]; 3];
    for (i, row) in inv.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            // cofactor of a[j][i]
            let (r1, r2) = ((j + 1) % 3, (j + 2) % 3);
            let (c1, c2) = ((i + 1) % 3, (i + 2) % 3);
            *value = (a[r1][c1] * a[r2][c2] - a[r1][c2] * a[r2][c1]) / det;
        }
    }
    Some(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_mat_eq(a: &Matrix3, b: &Matrix3) {
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(a[i][j], b[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn axis_rotation_is_counterclockwise() {
        let mat = rotation_matrix(90.0, Direction::Axis(2)).unwrap();
        let rotated = apply(&[1.0, 0.0, 0.0], &mat);
        assert_abs_diff_eq!(rotated[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rotated[1], 1.0, epsilon = 1e-12);

        let mat = rotation_matrix(90.0, Direction::Axis(0)).unwrap();
        let rotated = apply(&[0.0, 1.0, 0.0], &mat);
        assert_abs_diff_eq!(rotated[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn vector_axis_matches_global_axis() {
        for axis in 0..3 {
            let by_index = rotation_matrix(37.0, Direction::Axis(axis)).unwrap();
            let unit = GeoVector::unit(axis).unwrap() * 2.5;
            let by_vector = rotation_matrix(37.0, Direction::Vector(unit)).unwrap();
            assert_mat_eq(&by_index, &by_vector);
        }
    }

    #[test]
    fn inverse_of_rotation_is_transpose() {
        let mat = rotation_matrix(25.0, Direction::Vector(GeoVector::new(1.0, 1.0, 0.0))).unwrap();
        assert_mat_eq(&inverse(&mat).unwrap(), &transpose(&mat));
        assert_mat_eq(&mat_mul(&mat, &transpose(&mat)), &IDENTITY);
        assert!(inverse(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]).is_none());
    }

    #[test]
    fn vector_rotation_maps_source_to_target() {
        let from = GeoVector::xhat();
        let to = GeoVector::new(0.0, 1.0, 1.0);
        let mat = vector_rotation(from, to, GeoVector::zhat()).unwrap();
        let image = apply(&from.to_array(), &mat);
        assert_abs_diff_eq!(GeoVector::from(image), to.normalize(), epsilon = 1e-12);
        assert_abs_diff_eq!(determinant(&mat), 1.0, epsilon = 1e-12);
        assert!(vector_rotation(GeoVector::zhat(), to, GeoVector::zhat()).is_err());
    }

    #[test]
    fn malformed_matrix_rows() {
        assert!(matrix_from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).is_err());
        assert_mat_eq(&matrix_from_rows(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]]).unwrap(), &IDENTITY);
    }
}
