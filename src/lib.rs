//! Deterministic fixed-point 2D physics.
//!
//! Every quantity in the simulation is a decimal fixed-point number, so a
//! [`World`](engine::World) fed the same bodies and time steps produces
//! bit-identical state on every machine.

pub mod engine;

// ============================================================================
// Profiling Macros
// ============================================================================

/// Conditionally log messages based on tick interval when perf_stats feature is enabled.
/// 
/// This macro logs a message every 100 ticks. When the perf_stats feature is disabled,
/// this macro compiles to nothing - zero runtime cost.
/// 
/// # Example
/// ```ignore
/// profile_log!(self.tick, "Resolved {} contacts", self.live_impacts.len());
/// ```
/// 
/// # Zero-Cost Abstraction
/// When compiled without the `perf_stats` feature, this expands to an empty block.
/// Even the arguments (e.g., `self.live_impacts.len()`) are not evaluated.
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {
        if $tick % 100 == 0 {
            ::tracing::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {};
}
