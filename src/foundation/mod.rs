//! Value types, error taxonomy and pixel math shared by every stage.

/// Frame, frame-rate and canvas value types.
pub mod core;
/// `ReelError` and `ReelResult`.
pub mod error;
/// Fixed-point 8-bit helpers.
pub(crate) mod math;
