#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use opm_volume as volume;

#[doc(inline)]
pub use opm_geometry as geometry;

#[doc(inline)]
pub use opm_unshear as unshear;

#[doc(inline)]
pub use opm_io as io;
