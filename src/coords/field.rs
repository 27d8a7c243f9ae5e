use std::ops::Index;

/// A value per point, shaped like the `pshape()` of the `Coords` it came from.
/// Distances, coordinate components, test flags and fuse indices are all fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}
impl<T> Field<T> {
    pub(crate) fn from_raw(shape: Vec<usize>, data: Vec<T>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Field{shape, data}
    }

    /// Shape of the field.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the field holds no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The values in flat order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over the values in flat order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Give up the flat value buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}
impl<T> Index<usize> for Field<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.data[idx]
    }
}
impl Field<f64> {
    /// Smallest value, `None` if empty. NaN values are skipped.
    pub fn min(&self) -> Option<f64> {
        self.data.iter().copied().filter(|v| !v.is_nan()).reduce(f64::min)
    }

    /// Largest value, `None` if empty. NaN values are skipped.
    pub fn max(&self) -> Option<f64> {
        self.data.iter().copied().filter(|v| !v.is_nan()).reduce(f64::max)
    }

    /// Flat index of the smallest value (first one on ties).
    pub fn argmin(&self) -> Option<usize> {
        self.data.iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(idx, _)| idx)
    }
}
impl Field<bool> {
    /// Number of `true` flags.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&flag| flag).count()
    }

    /// Flat indices of the `true` flags.
    pub fn where_true(&self) -> Vec<usize> {
        self.data.iter()
            .enumerate()
            .filter_map(|(idx, &flag)| flag.then_some(idx))
            .collect()
    }
}
