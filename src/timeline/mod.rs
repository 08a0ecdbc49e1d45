//! Image schedule over the output timeline.

/// Equal image windows with trailing crossfades.
pub mod planner;
