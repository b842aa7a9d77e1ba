use std::path::PathBuf;

use bbrs_acir::DEFAULT_MAX_DECOMPRESSED_SIZE;
use bbrs_srs::global_crs::DEFAULT_MAX_SRS_SIZE;
use tracing::warn;

pub const SRS_PATH_ENV: &str = "BB_SRS_PATH";
pub const MAX_BYTECODE_BYTES_ENV: &str = "BB_MAX_BYTECODE_BYTES";
pub const MAX_SRS_SIZE_ENV: &str = "BB_MAX_SRS_SIZE";
pub const KEY_CACHE_SIZE_ENV: &str = "BB_KEY_CACHE_SIZE";

pub const DEFAULT_KEY_CACHE_SIZE: usize = 16;

/// Backend configuration, normally read once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiConfig {
    /// SRS points file. `None` derives the SRS in memory.
    pub srs_path: Option<PathBuf>,
    /// Bound on the decompressed bytecode payload.
    pub max_bytecode_bytes: usize,
    /// Ceiling on the number of SRS points.
    pub max_srs_size: usize,
    /// Cached proving keys; zero disables the cache.
    pub key_cache_size: usize,
}

impl Default for FfiConfig {
    fn default() -> Self {
        Self {
            srs_path: None,
            max_bytecode_bytes: DEFAULT_MAX_DECOMPRESSED_SIZE,
            max_srs_size: DEFAULT_MAX_SRS_SIZE,
            key_cache_size: DEFAULT_KEY_CACHE_SIZE,
        }
    }
}

impl FfiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparsable numbers fall back to
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str, default: usize| match lookup(key) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(key, value = %raw, default, "ignoring unparsable setting");
                default
            }),
        };
        Self {
            srs_path: lookup(SRS_PATH_ENV)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            max_bytecode_bytes: number(MAX_BYTECODE_BYTES_ENV, defaults.max_bytecode_bytes),
            max_srs_size: number(MAX_SRS_SIZE_ENV, defaults.max_srs_size),
            key_cache_size: number(KEY_CACHE_SIZE_ENV, defaults.key_cache_size),
        }
    }

    pub fn with_srs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.srs_path = Some(path.into());
        self
    }

    pub fn with_max_bytecode_bytes(mut self, bytes: usize) -> Self {
        self.max_bytecode_bytes = bytes;
        self
    }

    pub fn with_max_srs_size(mut self, points: usize) -> Self {
        self.max_srs_size = points;
        self
    }

    pub fn with_key_cache_size(mut self, entries: usize) -> Self {
        self.key_cache_size = entries;
        self
    }
}
