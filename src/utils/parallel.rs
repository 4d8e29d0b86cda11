//! Worker pool sizing

use crate::{BsrError, Result};

/// Worker count for a configured processor count; 0 means every core
pub fn resolve_threads(processors: usize) -> usize {
    if processors == 0 {
        num_cpus::get()
    } else {
        processors
    }
}

/// A dedicated pool so fan-out stays bounded regardless of the global pool
pub fn build_pool(processors: usize) -> Result<rayon::ThreadPool> {
    let threads = resolve_threads(processors);

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("lsbsr-worker-{}", i))
        .build()
        .map_err(|e| BsrError::Config(format!("cannot build a {}-thread pool: {}", threads, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_threads() {
        assert_eq!(resolve_threads(3), 3);
        assert_eq!(resolve_threads(0), num_cpus::get());
    }

    #[test]
    fn test_build_pool_size() {
        let pool = build_pool(2).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
    }
}
