//! Error types for accumulator update and merge operations.
//!
//! All variants indicate a configuration or programming error: a layer
//! index that does not exist in the stack the accumulator was sized for, or
//! an attempt to combine accumulators sized for different stacks. None of
//! them are recoverable conditions: callers are expected to propagate them
//! and fix the setup. Values are never clamped into range silently.

use std::error::Error;
use std::fmt;

/// Errors from run-accumulator update and merge operations and the
/// primitives underneath them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TallyError {
    /// A layer index outside `[1, layers]` was passed to an update call.
    ///
    /// Layer indices are 1-based; slot 0 is reserved for whole-stack
    /// aggregates. This always indicates a mismatch between the geometry
    /// and the accumulator, never valid data.
    LayerOutOfRange {
        /// The offending layer index.
        layer: u32,
        /// Number of layers the accumulator was sized for.
        layers: u32,
    },
    /// A raw primary-fate slot outside `[0, 2]`.
    InvalidOutcome {
        /// The offending slot.
        slot: usize,
    },
    /// Two accumulators sized for different stacks were merged.
    LayerCountMismatch {
        /// Layer count of the accumulator being merged into.
        target: u32,
        /// Layer count of the contribution.
        source: u32,
    },
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayerOutOfRange { layer, layers } => {
                write!(f, "layer {layer} out of range for a {layers}-layer stack")
            }
            Self::InvalidOutcome { slot } => {
                write!(f, "primary-fate slot {slot} outside [0, 2]")
            }
            Self::LayerCountMismatch { target, source } => {
                write!(
                    f,
                    "cannot merge a {source}-layer tally into a {target}-layer tally"
                )
            }
        }
    }
}

impl Error for TallyError {}
