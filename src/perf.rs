//! Performance instrumentation for the pointer-move hot path.
//!
//! Move handling runs on every pointer sample (potentially 60+ times per
//! second), so the engine carries lightweight scoped timers that are
//! zero-cost unless the `profiling` feature is enabled.

use std::time::Instant;
use tracing::warn;
#[cfg(feature = "profiling")]
use tracing::trace;

/// Threshold above which a move-path operation is considered slow, in
/// milliseconds. One frame at 60 FPS.
pub const SLOW_OPERATION_MS: f64 = 16.67;

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::for_profiling($name);
        #[cfg(not(feature = "profiling"))]
        let _ = $name; // Suppress unused variable warning
    };
}

pub use profile_scope;

/// A scoped timer that logs its duration on drop when it exceeds the
/// configured threshold.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    /// Create a timer for profiling (1ms reporting threshold).
    pub fn for_profiling(name: &'static str) -> Self {
        Self::new(name, 1.0)
    }

    /// Get elapsed time without stopping the timer.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        #[cfg(feature = "profiling")]
        if elapsed_ms > self.threshold_ms {
            trace!("[PERF] {}: {:.2}ms", self.name, elapsed_ms);
        }

        #[cfg(not(feature = "profiling"))]
        if elapsed_ms > self.threshold_ms.max(SLOW_OPERATION_MS) {
            warn!(
                operation = self.name,
                elapsed_ms = format!("{:.2}", elapsed_ms),
                "Slow operation"
            );
        }
    }
}
