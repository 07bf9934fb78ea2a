//! Engine-wide tuning constants.
//!
//! Centralizes magic numbers so they are configurable in one place. The
//! proximity threshold and settle multiplier are defaults only; both can be
//! overridden per container / per engine at runtime.

use std::time::Duration;

// ============================================================================
// Sorting
// ============================================================================

/// Fraction of a container's width/height added as a margin on each axis when
/// deciding whether the pointer is still "near" the container. Outside this
/// expanded rectangle the sort step bails without reordering, which prevents
/// thrashing right at the container edge.
pub const DROP_PROXIMITY_THRESHOLD: f32 = 0.05;

// ============================================================================
// Settling
// ============================================================================

/// Upper bound on the settle wait, as a multiple of the measured transition
/// duration. Guards against hosts that never deliver a transition-end signal
/// for very short or no-op transitions.
pub const SETTLE_TIMEOUT_MULTIPLIER: f32 = 1.5;

// ============================================================================
// Gestures
// ============================================================================

/// Delay between pointer-down and the drag sequence actually starting.
/// Zero means the first pointer-move begins the drag.
pub const DEFAULT_DRAG_START_DELAY: Duration = Duration::ZERO;
