use thiserror::Error;

/// An error type for volume operations.
#[derive(Error, Debug, PartialEq)]
pub enum VolumeError {
    /// Volume shape does not match the provided data.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },
}

/// Computes the strides for a row-major (C-contiguous) 3D layout.
///
/// The rightmost dimension has stride 1; each dimension's stride is the
/// product of all dimensions to its right.
///
/// # Examples
///
/// ```rust
/// use opm_volume::get_strides_from_shape;
///
/// let strides = get_strides_from_shape([2, 3, 4]);
/// assert_eq!(strides, [12, 4, 1]);
/// ```
pub fn get_strides_from_shape(shape: [usize; 3]) -> [usize; 3] {
    let mut strides = [0; 3];
    let mut stride = 1;
    for i in (0..3).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A 3-dimensional array of samples with owned data.
///
/// The volume stores its samples contiguously in row-major order; the
/// strides array defines how many elements to skip when moving along each
/// axis. Axes carry no intrinsic meaning — the scan/shift roles are chosen
/// per call by the resampling kernel.
///
/// # Examples
///
/// ```rust
/// use opm_volume::Volume;
///
/// let v = Volume::<f32>::from_shape_vec([1, 2, 3], vec![0.0; 6]).unwrap();
/// assert_eq!(v.shape, [1, 2, 3]);
/// assert_eq!(v.strides, [6, 3, 1]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Volume<T> {
    data: Vec<T>,
    /// The shape of the volume.
    pub shape: [usize; 3],
    /// The strides of the volume data in memory.
    pub strides: [usize; 3],
}

impl<T> Volume<T> {
    /// Creates a new `Volume` with the given shape and data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape, an
    /// error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use opm_volume::Volume;
    ///
    /// let v = Volume::<u8>::from_shape_vec([2, 1, 2], vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(v.numel(), 4);
    /// ```
    pub fn from_shape_vec(shape: [usize; 3], data: Vec<T>) -> Result<Self, VolumeError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(VolumeError::InvalidShape {
                expected: numel,
                actual: data.len(),
            });
        }
        let strides = get_strides_from_shape(shape);
        Ok(Self {
            data,
            shape,
            strides,
        })
    }

    /// Creates a new `Volume` with the given shape, filled with a value.
    pub fn from_shape_val(shape: [usize; 3], value: T) -> Self
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        let strides = get_strides_from_shape(shape);
        Self {
            data: vec![value; numel],
            shape,
            strides,
        }
    }

    /// Creates a new `Volume` with all samples set to zero.
    pub fn zeros(shape: [usize; 3]) -> Self
    where
        T: Clone + num_traits::Zero,
    {
        Self::from_shape_val(shape, T::zero())
    }

    /// Returns the number of samples in the volume.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Get the data of the volume as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the data of the volume as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the volume and returns the underlying vector.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get the linear offset of the sample at the given index.
    ///
    /// Returns `None` if any index is out of bounds for its axis.
    pub fn get_offset(&self, index: [usize; 3]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, dim_size), stride) in index.iter().zip(self.shape).zip(self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the 3D index of the sample at the given linear offset, without
    /// bounds checking. The reverse of [`Self::get_offset`].
    pub fn get_index_unchecked(&self, offset: usize) -> [usize; 3] {
        let mut idx = [0; 3];
        let mut rem = offset;
        for (dim_i, s) in self.strides.iter().enumerate() {
            idx[dim_i] = rem / s;
            rem %= s;
        }
        idx
    }

    /// Get the sample at the given index, checking bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use opm_volume::Volume;
    ///
    /// let v = Volume::<u8>::from_shape_vec([2, 1, 2], vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(v.get([1, 0, 1]), Some(&4));
    /// assert!(v.get([0, 1, 0]).is_none());
    /// ```
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        self.get_offset(index).and_then(|i| self.data.get(i))
    }

    /// Get the sample at the given index without checking bounds.
    pub fn get_unchecked(&self, index: [usize; 3]) -> &T {
        let offset = index
            .iter()
            .zip(self.strides)
            .map(|(&i, s)| i * s)
            .sum::<usize>();
        unsafe { self.data.get_unchecked(offset) }
    }
}
