#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! Oblique-plane acquisition shears the recorded stack: each plane along
//! the scan axis is laterally offset from the previous one by a constant
//! number of pixels (the slope, solved by `opm-geometry`). This crate
//! removes that shear by translating every plane back by `plane index *
//! slope` pixels with sub-pixel linear interpolation.
//!
//! Two backends implement one numerical contract: a host implementation
//! over `opm-volume` arrays and an accelerator implementation over
//! device-resident storage buffers. Backend selection is an explicit,
//! testable step; [`Unshearer::auto`] probes for an accelerator once and
//! falls back to the host.
//!
//! # Numerical contract
//!
//! - The output extent along the shift axis grows by
//!   `ceil(|slope| * (planes - 1))`; other axes are unchanged.
//! - Plane offsets are biased so the smallest shifted position lands at
//!   index zero, so no source content is discarded for either slope sign.
//! - Out-of-range source positions contribute zero (no wrap, no mirror).
//! - A slope of zero is the identity.

/// backend selection module.
pub mod backend;

/// accelerator implementation module.
pub mod gpu;

/// host implementation module.
pub mod host;

/// shared numerical contract module.
pub mod kernel;

pub use crate::backend::{detect_backend, BackendKind, Unshearer};
pub use crate::gpu::{GpuContext, GpuError, GpuUnshear, GpuVolume};
pub use crate::kernel::{check_axes, unsheared_shape, UnshearError};
