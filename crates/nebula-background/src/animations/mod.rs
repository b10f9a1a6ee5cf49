//! Per-variant drawing routines.

pub mod rings;
pub mod starfield;
