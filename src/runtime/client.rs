//! Client that owns execution settings for the tiled engines

use crate::error::{Error, Result};
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Thread-level parallelism settings
///
/// - `num_threads`: size of a dedicated worker pool. `None` runs on rayon's
///   global pool.
/// - `min_len`: minimum number of tile coordinates handed to one worker at a
///   time. `None` lets every coordinate be scheduled independently.
///
/// Without the `rayon` feature both settings are accepted and ignored; every
/// engine runs serially.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParallelismConfig {
    /// Worker thread count for a dedicated pool
    pub num_threads: Option<usize>,
    /// Minimum coordinates per parallel work item
    pub min_len: Option<usize>,
}

impl ParallelismConfig {
    /// Create a new configuration
    pub fn new(num_threads: Option<usize>, min_len: Option<usize>) -> Self {
        Self {
            num_threads,
            min_len,
        }
    }

    /// Single worker thread
    pub fn serial() -> Self {
        Self::new(Some(1), None)
    }

    fn validate(&self) -> Result<()> {
        if self.num_threads == Some(0) {
            return Err(Error::invalid_argument(
                "num_threads",
                "thread count must be positive",
            ));
        }
        if self.min_len == Some(0) {
            return Err(Error::invalid_argument("min_len", "min_len must be positive"));
        }
        Ok(())
    }
}

/// Entry point for tiled linear algebra.
///
/// The client carries the [`ParallelismConfig`] and, when a thread count is
/// configured, its own rayon pool. All operations are exposed through
/// [`TiledLinalgOps`](crate::ops::TiledLinalgOps).
///
/// ```ignore
/// use tiled_linalg::prelude::*;
///
/// let client = TiledClient::new().with_parallelism(ParallelismConfig::new(Some(4), None))?;
/// let value = client.dot(&a, &b)?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct TiledClient {
    config: ParallelismConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl TiledClient {
    /// Client running on the global pool with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a parallelism configuration, building a dedicated pool if
    /// `num_threads` is set
    pub fn with_parallelism(self, config: ParallelismConfig) -> Result<Self> {
        config.validate()?;

        #[cfg(feature = "rayon")]
        let pool = match config.num_threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("tiled-linalg-{i}"))
                    .build()
                    .map_err(|e| Error::Backend(e.to_string()))?;
                tracing::debug!(num_threads = n, "built dedicated worker pool");
                Some(Arc::new(pool))
            }
            None => None,
        };

        Ok(Self {
            config,
            #[cfg(feature = "rayon")]
            pool,
        })
    }

    /// Active configuration
    #[inline]
    pub fn parallelism(&self) -> ParallelismConfig {
        self.config
    }

    /// Number of worker threads operations will run on
    pub fn num_threads(&self) -> usize {
        #[cfg(feature = "rayon")]
        {
            match &self.pool {
                Some(pool) => pool.current_num_threads(),
                None => rayon::current_num_threads(),
            }
        }
        #[cfg(not(feature = "rayon"))]
        {
            1
        }
    }

    #[cfg(feature = "rayon")]
    #[inline]
    pub(crate) fn rayon_min_len(&self) -> usize {
        self.config.min_len.unwrap_or(1)
    }

    /// Run `f` inside the client's pool (or the global pool if none)
    #[cfg(feature = "rayon")]
    pub(crate) fn install_parallelism<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_threads() {
        let err = TiledClient::new()
            .with_parallelism(ParallelismConfig::new(Some(0), None))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "num_threads", .. }));

        let err = TiledClient::new()
            .with_parallelism(ParallelismConfig::new(None, Some(0)))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "min_len", .. }));
    }

    #[test]
    fn test_config_is_kept() {
        let config = ParallelismConfig::new(Some(2), Some(4));
        let client = TiledClient::new().with_parallelism(config).unwrap();
        assert_eq!(client.parallelism(), config);
    }

    #[test]
    fn test_serial_config() {
        let config = ParallelismConfig::serial();
        assert_eq!(config, ParallelismConfig::new(Some(1), None));
        let client = TiledClient::new().with_parallelism(config).unwrap();
        assert_eq!(client.num_threads(), 1);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_dedicated_pool_size() {
        let client = TiledClient::new()
            .with_parallelism(ParallelismConfig::new(Some(3), None))
            .unwrap();
        assert_eq!(client.num_threads(), 3);
        let inside = client.install_parallelism(rayon::current_num_threads);
        assert_eq!(inside, 3);
    }

    #[cfg(not(feature = "rayon"))]
    #[test]
    fn test_serial_without_rayon() {
        assert_eq!(TiledClient::new().num_threads(), 1);
    }
}
