#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! In an oblique-plane microscope the light sheet is tilted with respect to
//! the detection axis, so successive camera frames along the scan axis are
//! laterally offset from one another. This crate converts the physical
//! optical parameters of the instrument into the shear slope that the
//! resampling kernel removes.
//!
//! The same tilt can be expressed at two reference planes — the sample
//! plane and the intermediate image plane — related by a fixed
//! magnification/refractive-index scaling. The solver accepts either angle
//! and derives the other.

/// shear slope solver module.
pub mod slope;

pub use crate::slope::{get_slope, GeometryError, OpticalConfig, Polarity, ShearGeometry};
