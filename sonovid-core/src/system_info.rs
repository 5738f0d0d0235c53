//! Host information used when sizing the encoder.

use std::thread;

/// Thread count used when the platform cannot report its parallelism.
pub const DEFAULT_CPU_CORES: usize = 4;

/// Number of logical cores available to this process.
#[must_use]
pub fn cpu_core_count() -> usize {
    thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(DEFAULT_CPU_CORES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_core_count_is_positive() {
        assert!(cpu_core_count() >= 1);
    }
}
