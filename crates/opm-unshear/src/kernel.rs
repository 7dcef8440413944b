use thiserror::Error;

use crate::gpu::GpuError;

/// An error type for the shear-correction kernel.
#[derive(Error, Debug)]
pub enum UnshearError {
    /// The shift axis and the scan axis must be two different axes.
    #[error("Shift and scan axes must be distinct, got axis {0} for both")]
    DuplicateAxes(usize),

    /// An axis index does not address an axis of a 3D volume.
    #[error("Axis {0} is out of range for a 3D volume (valid axes are 0, 1, 2)")]
    AxisOutOfRange(usize),

    /// The accelerator backend failed.
    #[error("Accelerator error: {0}")]
    Gpu(#[from] GpuError),
}

/// Validates a (shift axis, scan axis) pair for a 3D volume.
///
/// # Errors
///
/// Returns an error if either axis is not 0, 1 or 2, or if both roles name
/// the same axis.
pub fn check_axes(sub_j: usize, sup_i: usize) -> Result<(), UnshearError> {
    for axis in [sub_j, sup_i] {
        if axis > 2 {
            return Err(UnshearError::AxisOutOfRange(axis));
        }
    }
    if sub_j == sup_i {
        return Err(UnshearError::DuplicateAxes(sub_j));
    }
    Ok(())
}

/// Bias added to every plane offset so the smallest shifted position lands
/// at index zero. Non-zero only for negative slopes.
pub(crate) fn shift_bias(slope: f32, planes: usize) -> f32 {
    let farthest = slope as f64 * planes.saturating_sub(1) as f64;
    (-farthest.min(0.0)) as f32
}

/// Growth of the shift axis needed to hold every shifted plane.
pub(crate) fn shear_padding(slope: f32, planes: usize) -> usize {
    let farthest = (slope as f64).abs() * planes.saturating_sub(1) as f64;
    farthest.ceil() as usize
}

/// The output shape of the shear correction for a given input shape.
///
/// Only the shift axis grows: its extent increases by the ceiling of the
/// largest plane offset, so no source sample can fall outside the output.
/// The same (shape, axes, slope) always yields the same output shape.
///
/// # Errors
///
/// Returns an error for an invalid axis pair, as [`check_axes`] does.
///
/// # Example
///
/// ```
/// use opm_unshear::unsheared_shape;
///
/// // 20 planes, 19 steps of 1.5 px -> ceil(28.5) = 29 extra columns.
/// let shape = unsheared_shape([20, 30, 40], 1, 0, 1.5).unwrap();
/// assert_eq!(shape, [20, 59, 40]);
/// ```
pub fn unsheared_shape(
    shape: [usize; 3],
    sub_j: usize,
    sup_i: usize,
    slope: f32,
) -> Result<[usize; 3], UnshearError> {
    check_axes(sub_j, sup_i)?;
    let mut out = shape;
    out[sub_j] += shear_padding(slope, shape[sup_i]);
    Ok(out)
}

/// Fetch one sample from a line along the shift axis, zero outside the
/// valid range. `base` is the linear offset of the line's first sample and
/// `stride` the element step along the shift axis.
#[inline]
pub(crate) fn sample_or_zero(
    data: &[f32],
    base: usize,
    stride: usize,
    x: isize,
    len: isize,
) -> f32 {
    if x >= 0 && x < len {
        data[base + x as usize * stride]
    } else {
        0.0
    }
}

/// Linear interpolation of a line along the shift axis at a fractional
/// position, with zero fill outside the source extent.
///
/// This is the numerical contract shared by both backends: the accelerator
/// shader evaluates exactly this expression per output sample.
#[inline]
pub(crate) fn interpolate_line(
    data: &[f32],
    base: usize,
    stride: usize,
    src_pos: f32,
    len: isize,
) -> f32 {
    let x0 = src_pos.floor();
    let frac = src_pos - x0;
    let x0 = x0 as isize;

    let v0 = sample_or_zero(data, base, stride, x0, len);
    let v1 = sample_or_zero(data, base, stride, x0 + 1, len);

    v0 * (1.0 - frac) + v1 * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_valid_pairs() {
        for sub_j in 0..3 {
            for sup_i in 0..3 {
                if sub_j == sup_i {
                    assert!(matches!(
                        check_axes(sub_j, sup_i),
                        Err(UnshearError::DuplicateAxes(_))
                    ));
                } else {
                    assert!(check_axes(sub_j, sup_i).is_ok());
                }
            }
        }
    }

    #[test]
    fn axes_out_of_range() {
        assert!(matches!(
            check_axes(3, 0),
            Err(UnshearError::AxisOutOfRange(3))
        ));
        assert!(matches!(
            check_axes(1, 7),
            Err(UnshearError::AxisOutOfRange(7))
        ));
    }

    #[test]
    fn shape_grows_shift_axis_only() -> Result<(), UnshearError> {
        assert_eq!(unsheared_shape([20, 30, 40], 1, 0, 0.0)?, [20, 30, 40]);
        assert_eq!(unsheared_shape([20, 30, 40], 1, 0, 2.0)?, [20, 68, 40]);
        assert_eq!(unsheared_shape([20, 30, 40], 2, 0, 1.5)?, [20, 30, 69]);
        // Sign does not change the growth, only the bias.
        assert_eq!(unsheared_shape([20, 30, 40], 1, 0, -2.0)?, [20, 68, 40]);
        Ok(())
    }

    #[test]
    fn bias_is_zero_for_positive_slope() {
        assert_eq!(shift_bias(2.0, 20), 0.0);
        assert_eq!(shift_bias(0.0, 20), 0.0);
        // 19 steps of -2 px biases every plane forward by 38 px.
        assert_eq!(shift_bias(-2.0, 20), 38.0);
    }

    #[test]
    fn interpolation_splits_weight() {
        let line = [0.0f32, 10.0, 20.0, 30.0];
        assert_eq!(interpolate_line(&line, 0, 1, 1.0, 4), 10.0);
        assert_eq!(interpolate_line(&line, 0, 1, 1.5, 4), 15.0);
        assert_eq!(interpolate_line(&line, 0, 1, 0.25, 4), 2.5);
        // Positions straddling the boundary blend with the zero fill.
        assert_eq!(interpolate_line(&line, 0, 1, -0.5, 4), 0.0);
        assert_eq!(interpolate_line(&line, 0, 1, 3.5, 4), 15.0);
        assert_eq!(interpolate_line(&line, 0, 1, 4.0, 4), 0.0);
    }
}
