use std::fmt;

use log::{info, warn};

use opm_volume::Volume;

use crate::gpu::{self, GpuContext, GpuError, GpuUnshear, GpuVolume};
use crate::host;
use crate::kernel::UnshearError;

/// The discriminated backend choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Host-memory implementation; always available.
    Host,
    /// Accelerator-resident implementation.
    Accelerator,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Host => write!(f, "host"),
            BackendKind::Accelerator => write!(f, "accelerator"),
        }
    }
}

/// Probes for a usable accelerator and returns the backend to bind.
///
/// Any probe failure yields [`BackendKind::Host`]; the outcome is logged,
/// never surfaced as an error.
pub fn detect_backend() -> BackendKind {
    match gpu::probe_adapter() {
        Some(name) => {
            info!("Accelerator found ({name}). Using accelerator implementation.");
            BackendKind::Accelerator
        }
        None => {
            info!("Accelerator not available. Using host implementation.");
            BackendKind::Host
        }
    }
}

/// A shear-correction engine bound to one backend.
///
/// The binding is chosen at construction and immutable afterward. Both
/// arms implement one numerical contract; see the crate documentation for
/// the output-sizing and interpolation policy.
///
/// # Example
///
/// ```no_run
/// use opm_volume::Volume;
/// use opm_unshear::{BackendKind, Unshearer};
///
/// let engine = Unshearer::auto();
/// let volume = Volume::<f32>::zeros([20, 30, 40]);
/// let corrected = engine.unshear(&volume, 1, 0, 1.5).unwrap();
/// ```
pub enum Unshearer {
    /// Host-memory engine.
    Host,
    /// Accelerator engine: a device context plus the compiled pipeline.
    Accelerator {
        /// The device context the pipeline was compiled for.
        context: GpuContext,
        /// The compiled unshear pipeline.
        pipeline: GpuUnshear,
    },
}

impl Unshearer {
    /// Constructs the engine for an explicitly chosen backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the accelerator was requested but no device
    /// could be opened. The host choice never fails.
    pub fn new(kind: BackendKind) -> Result<Self, GpuError> {
        match kind {
            BackendKind::Host => Ok(Unshearer::Host),
            BackendKind::Accelerator => {
                let context = GpuContext::new()?;
                let pipeline = GpuUnshear::new(&context);
                Ok(Unshearer::Accelerator { context, pipeline })
            }
        }
    }

    /// Probes for an accelerator and constructs the matching engine,
    /// falling back to the host on any failure.
    pub fn auto() -> Self {
        match detect_backend() {
            BackendKind::Host => Unshearer::Host,
            BackendKind::Accelerator => match Self::new(BackendKind::Accelerator) {
                Ok(engine) => engine,
                Err(e) => {
                    warn!("Accelerator initialization failed ({e}). Falling back to host implementation.");
                    Unshearer::Host
                }
            },
        }
    }

    /// The backend this engine is bound to.
    pub fn kind(&self) -> BackendKind {
        match self {
            Unshearer::Host => BackendKind::Host,
            Unshearer::Accelerator { .. } => BackendKind::Accelerator,
        }
    }

    /// Removes the scan shear from a host volume with the bound backend.
    ///
    /// The accelerator arm handles placement at this boundary: it uploads
    /// the input, runs the device kernel, and downloads the result. Callers
    /// that keep data in accelerator memory should use [`GpuUnshear`]
    /// directly.
    ///
    /// # Errors
    ///
    /// Returns an error if `sub_j == sup_i`, either axis is out of range,
    /// or the accelerator fails mid-flight.
    pub fn unshear(
        &self,
        volume: &Volume<f32>,
        sub_j: usize,
        sup_i: usize,
        slope: f32,
    ) -> Result<Volume<f32>, UnshearError> {
        match self {
            Unshearer::Host => host::unshear(volume, sub_j, sup_i, slope),
            Unshearer::Accelerator { context, pipeline } => {
                let device_volume = GpuVolume::upload(context, volume);
                let corrected = pipeline.unshear(context, &device_volume, sub_j, sup_i, slope)?;
                Ok(corrected.download(context)?)
            }
        }
    }
}
