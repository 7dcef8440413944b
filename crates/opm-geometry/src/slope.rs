use thiserror::Error;

/// An error type for the shear geometry solver.
#[derive(Error, Debug, PartialEq)]
pub enum GeometryError {
    /// Both tilt angles were supplied; the solver derives one from the other.
    #[error("Only one of theta_iip or theta_sample must be provided")]
    BothAnglesGiven,

    /// Neither tilt angle was supplied.
    #[error("Either theta_iip or theta_sample must be provided")]
    NoAngleGiven,
}

/// Physical parameters of the optical train.
///
/// Lengths (`dv`, `dp`) must share one unit; the solver output is unitless
/// (pixels per plane).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpticalConfig {
    /// Refractive index at the sample (Obj1).
    pub n1: f64,
    /// Refractive index at the intermediate image plane (Obj2).
    pub n2: f64,
    /// Magnification from Obj1 to Obj2.
    pub m1_2: f64,
    /// Magnification from Obj2 to Obj3.
    pub m2_3: f64,
    /// Camera pixel pitch along the shift axis.
    pub dv: f64,
    /// Plane separation along the scan axis.
    pub dp: f64,
}

impl OpticalConfig {
    /// Optical scaling between the two tilt-angle representations.
    ///
    /// The precedence is `(M1_2 / n1) * n2`, not `M1_2 / (n1 * n2)`.
    fn angle_scaling(&self) -> f64 {
        self.m1_2 / self.n1 * self.n2
    }
}

/// Scan polarity of the acquisition.
///
/// The solver returns the slope magnitude implied by the optics; whether the
/// planes walk toward positive or negative indices along the shift axis
/// depends on the stage scan direction, which the optics cannot know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Polarity {
    /// Planes shift toward increasing indices along the shift axis.
    #[default]
    Positive,
    /// Planes shift toward decreasing indices along the shift axis.
    Negative,
}

/// Solved shear geometry: the slope and both views of the tilt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShearGeometry {
    /// Shear slope in (pixels along the shift axis) per (plane along the
    /// scan axis). Non-negative for nominal configurations.
    pub slope: f64,
    /// Tilt angle at the sample plane, in radians.
    pub theta_sample: f64,
    /// Tilt angle at the intermediate image plane, in radians.
    pub theta_iip: f64,
}

impl ShearGeometry {
    /// The slope with the scan polarity applied.
    pub fn signed_slope(&self, polarity: Polarity) -> f64 {
        match polarity {
            Polarity::Positive => self.slope,
            Polarity::Negative => -self.slope,
        }
    }
}

/// Calculate the slope of the shear from the optical parameters.
///
/// Exactly one of `theta_iip` / `theta_sample` must be provided, in radians,
/// strictly between 0 and π/2; the other is derived from the optical
/// scaling `(M1_2 / n1) * n2`. Angles at the domain boundaries are not
/// trapped — 0 or π/2 produce non-finite values that propagate into the
/// result, as does a zero magnification or refractive index.
///
/// # Arguments
///
/// * `config` - The physical parameters of the optical train.
/// * `theta_iip` - Tilt angle of the intermediate image plane.
/// * `theta_sample` - Tilt angle of the sample plane.
///
/// # Returns
///
/// The solved [`ShearGeometry`]: the slope plus both angles, one equal to
/// the supplied value and the other derived.
///
/// # Errors
///
/// Returns an error if both angles are supplied, or neither.
///
/// # Example
///
/// ```
/// use opm_geometry::{get_slope, OpticalConfig};
///
/// let config = OpticalConfig {
///     n1: 1.33,
///     n2: 1.0,
///     m1_2: 1.0,
///     m2_3: 1.0,
///     dv: 6.5,
///     dp: 1.0,
/// };
///
/// let geometry = get_slope(&config, None, Some(0.6981)).unwrap();
/// assert!(geometry.slope > 0.0);
/// ```
pub fn get_slope(
    config: &OpticalConfig,
    theta_iip: Option<f64>,
    theta_sample: Option<f64>,
) -> Result<ShearGeometry, GeometryError> {
    let k = config.angle_scaling();

    let (theta_sample, theta_iip) = match (theta_iip, theta_sample) {
        (Some(_), Some(_)) => return Err(GeometryError::BothAnglesGiven),
        (None, None) => return Err(GeometryError::NoAngleGiven),
        (Some(iip), None) => ((iip.tan() * k).atan(), iip),
        (None, Some(sample)) => (sample, (sample.tan() / k).atan()),
    };

    // Axial sample spacing implied by one camera pixel step.
    let dz_sample =
        config.dv / config.m2_3 * theta_iip.sin() / config.m1_2.powi(2) * config.n1 / config.n2;
    let slope = (config.dp / theta_sample.tan()) / dz_sample;

    Ok(ShearGeometry {
        slope,
        theta_sample,
        theta_iip,
    })
}
