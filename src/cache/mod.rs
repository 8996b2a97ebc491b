//! Kernel cache implementation
//!
//! Provides an LRU cache for kernel values so repeated evaluations of the same
//! index pair skip the feature fetch and dot product. When the kernel is bound
//! symmetrically (same provider on both sides) K(i,j) = K(j,i) and only one
//! of the two is stored.

use crate::core::{FeatureProvider, Result};
use crate::kernel::Kernel;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Cache key for kernel values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    i: usize,
    j: usize,
}

impl CacheKey {
    /// Create a key, normalized so that i <= j for symmetric kernels
    fn new(i: usize, j: usize, symmetric: bool) -> Self {
        if symmetric && i > j {
            Self { i: j, j: i }
        } else {
            Self { i, j }
        }
    }
}

/// LRU cache for kernel matrix values
pub struct KernelCache {
    cache: LruCache<CacheKey, f64>,
    symmetric: bool,
    hits: u64,
    misses: u64,
}

impl KernelCache {
    /// Create a new kernel cache with specified capacity in number of entries
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            symmetric: false,
            hits: 0,
            misses: 0,
        }
    }

    /// Create a kernel cache with capacity based on memory size in bytes
    pub fn with_memory_limit(memory_bytes: usize) -> Self {
        let capacity = (memory_bytes / 24).max(1); // key (16 bytes) + value (8 bytes)
        Self::new(capacity)
    }

    /// Treat (i, j) and (j, i) as the same entry
    pub fn set_symmetric(&mut self, symmetric: bool) {
        self.symmetric = symmetric;
    }

    /// Whether (i, j) and (j, i) share an entry
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Get a kernel value from cache
    pub fn get(&mut self, i: usize, j: usize) -> Option<f64> {
        let key = CacheKey::new(i, j, self.symmetric);
        if let Some(&value) = self.cache.get(&key) {
            self.hits += 1;
            Some(value)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Put a kernel value into cache
    pub fn put(&mut self, i: usize, j: usize, value: f64) {
        let key = CacheKey::new(i, j, self.symmetric);
        self.cache.put(key, value);
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.cache.cap().get(),
            size: self.cache.len(),
        }
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}

/// Kernel wrapper that memoizes computed values
pub struct CachedKernel<K: Kernel> {
    kernel: K,
    cache: KernelCache,
}

impl<K: Kernel> CachedKernel<K> {
    /// Wrap `kernel` with a cache of `cache_size` bytes
    pub fn new(kernel: K, cache_size: usize) -> Self {
        let mut cache = KernelCache::with_memory_limit(cache_size);
        cache.set_symmetric(kernel.is_symmetric());
        Self { kernel, cache }
    }

    /// Bind the wrapped kernel and drop every cached value
    pub fn init(
        &mut self,
        lhs: Arc<dyn FeatureProvider>,
        rhs: Arc<dyn FeatureProvider>,
    ) -> Result<()> {
        self.cache.clear();
        let result = self.kernel.init(lhs, rhs);
        self.cache.set_symmetric(self.kernel.is_symmetric());
        result
    }

    /// Unbind the wrapped kernel and drop every cached value
    pub fn cleanup(&mut self) {
        self.kernel.cleanup();
        self.cache.clear();
    }

    /// Kernel value K(lhs\[i\], rhs\[j\]), served from cache when possible
    pub fn compute(&mut self, i: usize, j: usize) -> Result<f64> {
        if let Some(value) = self.cache.get(i, j) {
            return Ok(value);
        }

        let value = self.kernel.compute(i, j)?;
        self.cache.put(i, j, value);
        Ok(value)
    }

    /// Row i of the kernel matrix
    pub fn kernel_row(&mut self, i: usize) -> Result<Vec<f64>> {
        (0..self.kernel.num_rhs())
            .map(|j| self.compute(i, j))
            .collect()
    }

    /// Wrapped kernel
    pub fn inner(&self) -> &K {
        &self.kernel
    }

    /// Cache statistics
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
