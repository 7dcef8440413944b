use rayon::prelude::*;

use opm_volume::Volume;

use crate::kernel::{interpolate_line, shift_bias, unsheared_shape, UnshearError};

/// Removes the scan shear from a volume on the host.
///
/// Every plane `k` along the scan axis `sup_i` is translated along the
/// shift axis `sub_j` by `k * slope` pixels, using linear interpolation
/// between the two nearest samples. The output extent along `sub_j` grows
/// per [`unsheared_shape`] so no source content is discarded; positions
/// outside the source extent are zero-filled. A slope of zero returns an
/// exact copy of the input.
///
/// The input volume is not modified.
///
/// # Arguments
///
/// * `src` - The input volume.
/// * `sub_j` - The axis along which each plane is shifted.
/// * `sup_i` - The scan axis; the plane index scales the shift.
/// * `slope` - Shift in pixels per plane. Sign selects the shift direction.
///
/// # Errors
///
/// Returns an error if `sub_j == sup_i` or either axis is out of range.
///
/// # Example
///
/// ```
/// use opm_volume::Volume;
/// use opm_unshear::host::unshear;
///
/// let src = Volume::<f32>::zeros([4, 8, 8]);
/// let dst = unshear(&src, 1, 0, 1.5).unwrap();
/// assert_eq!(dst.shape, [4, 13, 8]);
/// ```
pub fn unshear(
    src: &Volume<f32>,
    sub_j: usize,
    sup_i: usize,
    slope: f32,
) -> Result<Volume<f32>, UnshearError> {
    let out_shape = unsheared_shape(src.shape, sub_j, sup_i, slope)?;
    let bias = shift_bias(slope, src.shape[sup_i]);

    let mut dst = Volume::<f32>::zeros(out_shape);
    let dst_strides = dst.strides;

    let src_data = src.as_slice();
    let src_len = src.shape[sub_j] as isize;
    let src_stride_j = src.strides[sub_j];
    let src_strides = src.strides;

    dst.as_slice_mut()
        .par_iter_mut()
        .enumerate()
        .for_each(|(offset, out_sample)| {
            // decompose the output offset into a 3D index
            let mut idx = [0usize; 3];
            let mut rem = offset;
            for (axis, stride) in dst_strides.iter().enumerate() {
                idx[axis] = rem / stride;
                rem %= stride;
            }

            let k = idx[sup_i];
            let j = idx[sub_j];

            // linear offset of the source line, shift-axis component excluded
            let mut base = 0;
            for axis in 0..3 {
                if axis != sub_j {
                    base += idx[axis] * src_strides[axis];
                }
            }

            let src_pos = j as f32 - (k as f32 * slope + bias);
            *out_sample = interpolate_line(src_data, base, src_stride_j, src_pos, src_len);
        });

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp_volume(shape: [usize; 3]) -> Volume<f32> {
        let numel = shape.iter().product();
        Volume::from_shape_vec(shape, (0..numel).map(|x| x as f32).collect())
            .expect("shape matches data")
    }

    #[test]
    fn zero_slope_is_identity() -> Result<(), UnshearError> {
        let src = ramp_volume([4, 5, 6]);
        for (sub_j, sup_i) in [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)] {
            let dst = unshear(&src, sub_j, sup_i, 0.0)?;
            assert_eq!(dst.shape, src.shape);
            assert_eq!(dst.as_slice(), src.as_slice());
        }
        Ok(())
    }

    #[test]
    fn duplicate_axes_rejected() {
        let src = Volume::<f32>::zeros([2, 2, 2]);
        for slope in [0.0, 1.0, -2.5] {
            let res = unshear(&src, 2, 2, slope);
            assert!(matches!(res, Err(UnshearError::DuplicateAxes(2))));
        }
    }

    #[test]
    fn out_of_range_axis_rejected() {
        let src = Volume::<f32>::zeros([2, 2, 2]);
        assert!(matches!(
            unshear(&src, 3, 0, 1.0),
            Err(UnshearError::AxisOutOfRange(3))
        ));
        assert!(matches!(
            unshear(&src, 0, 5, 1.0),
            Err(UnshearError::AxisOutOfRange(5))
        ));
    }

    #[test]
    fn input_is_not_mutated() -> Result<(), UnshearError> {
        let src = ramp_volume([3, 4, 5]);
        let before = src.as_slice().to_vec();
        let _ = unshear(&src, 1, 0, 1.5)?;
        assert_eq!(src.as_slice(), before.as_slice());
        Ok(())
    }

    #[test]
    fn integer_slope_moves_bright_voxel_exactly() -> Result<(), UnshearError> {
        // Single bright voxel at (k=7, y=11, x=23) in a (20, 30, 40) stack.
        let mut src = Volume::<f32>::zeros([20, 30, 40]);
        let offset = src.get_offset([7, 11, 23]).unwrap();
        src.as_slice_mut()[offset] = 1.0;

        // Shift axis 1 by 2 px per plane along axis 0.
        let dst = unshear(&src, 1, 0, 2.0)?;
        assert_eq!(dst.shape, [20, 30 + 38, 40]);

        // Integer slope means no interpolation blending: a single output
        // voxel carries the full intensity at y + k * slope.
        let moved = dst.get_offset([7, 11 + 14, 23]).unwrap();
        assert_eq!(dst.as_slice()[moved], 1.0);
        assert_eq!(dst.as_slice().iter().filter(|&&v| v != 0.0).count(), 1);
        Ok(())
    }

    #[test]
    fn fractional_slope_splits_weight() -> Result<(), UnshearError> {
        let mut src = Volume::<f32>::zeros([2, 8, 1]);
        let offset = src.get_offset([1, 3, 0]).unwrap();
        src.as_slice_mut()[offset] = 1.0;

        // Plane 1 shifts by 0.5 px: intensity lands half on y=3, half on y=4.
        let dst = unshear(&src, 1, 0, 0.5)?;
        assert_eq!(dst.shape, [2, 9, 1]);
        assert_relative_eq!(*dst.get([1, 3, 0]).unwrap(), 0.5);
        assert_relative_eq!(*dst.get([1, 4, 0]).unwrap(), 0.5);
        // Plane 0 does not move.
        assert_eq!(dst.as_slice().iter().filter(|&&v| v != 0.0).count(), 2);
        Ok(())
    }

    #[test]
    fn negative_slope_preserves_content() -> Result<(), UnshearError> {
        let mut src = Volume::<f32>::zeros([4, 6, 1]);
        let offset = src.get_offset([3, 0, 0]).unwrap();
        src.as_slice_mut()[offset] = 1.0;

        // Plane 3 shifts by -3 px; the bias keeps it inside the output.
        let dst = unshear(&src, 1, 0, -1.0)?;
        assert_eq!(dst.shape, [4, 9, 1]);
        // offset(k) = k * slope + bias = -3 + 3 = 0
        assert_eq!(*dst.get([3, 0, 0]).unwrap(), 1.0);
        assert_eq!(dst.as_slice().iter().filter(|&&v| v != 0.0).count(), 1);
        Ok(())
    }

    #[test]
    fn shift_axis_zero() -> Result<(), UnshearError> {
        // The axis roles are symmetric: shifting along axis 0, scanning
        // along axis 2.
        let mut src = Volume::<f32>::zeros([5, 1, 3]);
        let offset = src.get_offset([2, 0, 2]).unwrap();
        src.as_slice_mut()[offset] = 4.0;

        let dst = unshear(&src, 0, 2, 1.0)?;
        assert_eq!(dst.shape, [7, 1, 3]);
        assert_eq!(*dst.get([4, 0, 2]).unwrap(), 4.0);
        Ok(())
    }

    #[test]
    fn whole_plane_translates() -> Result<(), UnshearError> {
        // Every sample of plane k keeps its neighbors; only the position
        // along the shift axis changes.
        let src = ramp_volume([3, 4, 2]);
        let dst = unshear(&src, 1, 0, 1.0)?;
        assert_eq!(dst.shape, [3, 6, 2]);
        for k in 0..3 {
            for y in 0..4 {
                for x in 0..2 {
                    assert_eq!(dst.get([k, y + k, x]), src.get([k, y, x]));
                }
            }
        }
        Ok(())
    }
}
