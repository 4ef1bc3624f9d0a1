#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// histogram analysis pipeline module.
pub mod analyze;

/// color transformations module.
pub mod color;

/// image enhancement module.
pub mod enhance;

/// compute image histogram module.
pub mod histogram;

/// histogram statistics module.
pub mod metrics;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;
