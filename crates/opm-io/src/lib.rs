#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! Reads and writes volumes as a dense-array file: the bincode encoding of
//! shape, strides and raw samples. The format carries no image semantics —
//! it is the on-disk twin of [`opm_volume::Volume`].

/// error module for the io operations.
pub mod error;

/// functional api to read and write volume files.
pub mod functional;

pub use crate::error::IoError;
pub use crate::functional::{read_volume, write_volume};
