//! Operations that change the shape of a `Coords`, and constructors reading
//! flat sequences of numbers.

use serde::{Serialize, Deserialize};

use crate::io;
use crate::coords::{Coords, Direction, ProcResult, DIM, arg_err, shape_err, format_err};

/// Interpolation parameters: `n` equal steps over [0,1] (giving `n+1` values),
/// or explicit values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Divisions {
    Count(usize),
    Values(Vec<f64>),
}
impl Divisions {
    fn values(&self) -> ProcResult<Vec<f64>> {
        match self {
            Divisions::Count(0) => arg_err("Number of divisions must be at least 1"),
            Divisions::Count(n) => Ok((0..=*n).map(|i| i as f64 / *n as f64).collect()),
            Divisions::Values(values) => Ok(values.clone()),
        }
    }
}
impl From<usize> for Divisions {
    fn from(n: usize) -> Self {
        Divisions::Count(n)
    }
}
impl From<Vec<f64>> for Divisions {
    fn from(values: Vec<f64>) -> Self {
        Divisions::Values(values)
    }
}

/// Width of the floating point values in a raw binary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatWidth {
    F32,
    #[default]
    F64,
}
impl FloatWidth {
    fn bytes(&self) -> usize {
        match self {
            FloatWidth::F32 => 4,
            FloatWidth::F64 => 8,
        }
    }
}

impl Coords {
    /// Stack `n` copies, each one translated over `step * dir` from the previous.
    /// The result has an extra leading axis of length `n`; copy 0 is `self`.
    pub fn replicate(&self, n: usize, dir: Direction, step: Option<f64>) -> ProcResult<Coords> {
        let vector = dir.to_vector()? * step.unwrap_or(1.0);
        let mut data = Vec::with_capacity(n * self.as_slice().len());
        for i in 0..n {
            let copy = self.translate(Direction::Vector(vector), Some(i as f64))?;
            data.extend_from_slice(copy.as_slice());
        }
        let mut pshape = vec![n];
        pshape.extend_from_slice(self.pshape());
        Ok(Coords::from_raw(data, pshape))
    }

    /// Split along the first axis. Needs at least 2 axes.
    pub fn split(&self) -> ProcResult<Vec<Coords>> {
        let Some((&n, rest)) = self.pshape().split_first() else {
            return shape_err("Can only split a Coords with at least 2 axes");
        };
        let block = rest.iter().product::<usize>() * DIM;
        Ok((0..n)
            .map(|i| Coords::from_raw(self.as_slice()[i * block..(i + 1) * block].to_vec(), rest.to_vec()))
            .collect())
    }

    /// Join with `other` along the first axis.
    pub fn append(&self, other: &Coords) -> ProcResult<Coords> {
        Coords::concatenate(&[self.clone(), other.clone()])
    }

    /// Join a list of `Coords` along the first axis. Single points count as (1,3).
    /// All shapes must agree except for the first axis.
    pub fn concatenate(list: &[Coords]) -> ProcResult<Coords> {
        let Some(first) = list.first() else {
            return arg_err("Nothing to concatenate");
        };
        let trailing = |c: &Coords| c.pshape().get(1..).map(|s| s.to_vec()).unwrap_or_default();
        let leading = |c: &Coords| c.pshape().first().copied().unwrap_or(1);
        let rest = trailing(first);
        if let Some(bad) = list.iter().find(|c| trailing(*c) != rest) {
            return shape_err(&format!("Cannot concatenate shapes {:?} and {:?}", first.shape(), bad.shape()));
        }

        let data = list.iter().flat_map(|c| c.as_slice().iter().copied()).collect();
        let mut pshape = vec![list.iter().map(leading).sum()];
        pshape.extend(rest);
        Ok(Coords::from_raw(data, pshape))
    }

    /// Interpolate between `self` and `other` (same shape) at every parameter `t`:
    /// `self + t * (other - self)`. The results are stacked along a new first axis.
    pub fn interpolate(&self, other: &Coords, div: Divisions) -> ProcResult<Coords> {
        if self.pshape() != other.pshape() {
            return shape_err(&format!("Cannot interpolate between shapes {:?} and {:?}", self.shape(), other.shape()));
        }
        let values = div.values()?;
        let mut data = Vec::with_capacity(values.len() * self.as_slice().len());
        for t in values.iter() {
            data.extend(self.as_slice().iter().zip(other.as_slice()).map(|(a, b)| a + t * (b - a)));
        }
        let mut pshape = vec![values.len()];
        pshape.extend_from_slice(self.pshape());
        Ok(Coords::from_raw(data, pshape))
    }

    /// Parse a sequence of numbers, `ndim` (1, 2 or 3) per point, separated by
    /// `sep` and/or whitespace. With `count` set, exactly that many numbers are expected.
    pub fn from_string(s: &str, sep: char, ndim: usize, count: Option<usize>) -> ProcResult<Coords> {
        if !(1..=DIM).contains(&ndim) {
            return arg_err(&format!("Number of coordinates per point must be 1, 2 or 3, got {}", ndim));
        }
        let values = s.split(|c: char| c == sep || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| token.parse::<f64>().or_else(|_| format_err(&format!("Not a number: \"{}\"", token))))
            .collect::<ProcResult<Vec<f64>>>()?;

        if let Some(count) = count {
            if values.len() != count {
                return format_err(&format!("Number of coordinates read: {}, expected {}", values.len(), count));
            }
        }
        check_multiple(values.len(), ndim)?;
        let npoints = values.len() / ndim;
        Coords::new(values, &[npoints, ndim])
    }

    /// Read raw little-endian floats, X, Y, Z for every point in turn.
    pub fn from_file(path: &str, width: FloatWidth) -> ProcResult<Coords> {
        let bytes = io::read_bytes(path)?;
        if bytes.len() % width.bytes() != 0 {
            return format_err(&format!("File size {} of {} is not a multiple of {}", bytes.len(), path, width.bytes()));
        }
        let values: Vec<f64> = match width {
            FloatWidth::F32 => bytes.chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]).into())
                .collect(),
            FloatWidth::F64 => bytes.chunks_exact(8)
                .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
                .collect(),
        };
        check_multiple(values.len(), DIM)?;
        let npoints = values.len() / DIM;
        Coords::new(values, &[npoints, DIM])
    }

    /// Write the coordinates as raw little-endian floats.
    pub fn to_file(&self, path: &str, width: FloatWidth) -> io::IoResult<()> {
        let bytes: Vec<u8> = match width {
            FloatWidth::F32 => self.as_slice().iter().flat_map(|&v| (v as f32).to_le_bytes()).collect(),
            FloatWidth::F64 => self.as_slice().iter().flat_map(|v| v.to_le_bytes()).collect(),
        };
        io::write_bytes(path, &bytes)
    }
}

fn check_multiple(nvalues: usize, ndim: usize) -> ProcResult<()> {
    if nvalues == 0 || nvalues % ndim != 0 {
        return format_err(&format!("Number of coordinates read: {}, expected a positive multiple of {}", nvalues, ndim));
    }
    Ok(())
}
