#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `opm-volume` provides [`Volume`], the owned 3D array that every other
//! crate in the workspace operates on. A volume is a contiguous row-major
//! buffer plus a `[usize; 3]` shape; no physical units are attached — units
//! are carried only through the scalar optical parameters used elsewhere to
//! derive a shear slope.

/// Bincode module for binary serialization and deserialization.
///
/// Provides the dense-array file encoding (shape + strides + samples) when
/// the `bincode` feature is enabled.
#[cfg(feature = "bincode")]
pub mod bincode;

/// Volume module containing the container and its error type.
pub mod volume;

pub use crate::volume::{get_strides_from_shape, Volume, VolumeError};
