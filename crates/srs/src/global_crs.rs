use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::error::SrsError;
use crate::factories::{Bn254Crs, Bn254CrsFactory, MemBn254Crs};

/// Default ceiling on the number of SRS points a manager will load.
pub const DEFAULT_MAX_SRS_SIZE: usize = 1 << 22;

/// Owns the process SRS and grows it on demand.
///
/// Readers get an `Arc` snapshot that stays valid while the SRS grows. Growth is
/// serialized: the first caller loads only the missing points, later callers for
/// the same or a smaller size see the new snapshot and return immediately. The
/// size never decreases.
pub struct SrsManager {
    factory: Arc<dyn Bn254CrsFactory>,
    current: RwLock<Option<Arc<MemBn254Crs>>>,
    grow_lock: Mutex<()>,
    max_size: usize,
}

impl SrsManager {
    pub fn new(factory: Arc<dyn Bn254CrsFactory>, max_size: usize) -> Self {
        Self {
            factory,
            current: RwLock::new(None),
            grow_lock: Mutex::new(()),
            max_size,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of points currently loaded (zero before the first `ensure`).
    pub fn current_size(&self) -> usize {
        self.current
            .read()
            .as_ref()
            .map_or(0, |crs| crs.get_monomial_size())
    }

    pub fn current(&self) -> Option<Arc<MemBn254Crs>> {
        self.current.read().clone()
    }

    fn snapshot_with_at_least(&self, required: usize) -> Option<Arc<MemBn254Crs>> {
        self.current
            .read()
            .as_ref()
            .filter(|crs| crs.get_monomial_size() >= required)
            .cloned()
    }

    /// Return a snapshot holding at least `required` points, loading more if needed.
    pub fn ensure(&self, required: usize) -> Result<Arc<MemBn254Crs>, SrsError> {
        let required = required.max(1);
        if let Some(crs) = self.snapshot_with_at_least(required) {
            return Ok(crs);
        }
        if required > self.max_size {
            return Err(SrsError::ExceedsLimit {
                required,
                limit: self.max_size,
            });
        }

        let _guard = self.grow_lock.lock();
        // Another caller may have grown the SRS while we waited.
        if let Some(crs) = self.snapshot_with_at_least(required) {
            return Ok(crs);
        }

        let existing = self.current();
        let start = existing.as_ref().map_or(0, |crs| crs.get_monomial_size());
        debug!(
            source = %self.factory.describe(),
            start,
            required,
            "loading SRS points"
        );
        let fresh = self.factory.load_points(start, required - start)?;

        let mut points = Vec::with_capacity(required);
        if let Some(old) = &existing {
            points.extend_from_slice(old.get_monomial_points());
        }
        points.extend(fresh);
        let crs = Arc::new(MemBn254Crs::new(points)?);

        *self.current.write() = Some(crs.clone());
        info!(size = required, previous = start, "SRS grown");
        Ok(crs)
    }
}

// ---------------------------------------------------------------------------
// Global singleton
// ---------------------------------------------------------------------------

static SRS_MANAGER: OnceLock<Arc<SrsManager>> = OnceLock::new();

/// Install the process-wide manager. Returns `false` if one was already installed.
pub fn init_srs_manager(manager: SrsManager) -> bool {
    SRS_MANAGER.set(Arc::new(manager)).is_ok()
}

/// The process-wide manager, if initialized.
pub fn get_srs_manager() -> Option<Arc<SrsManager>> {
    SRS_MANAGER.get().cloned()
}

/// The process-wide manager, installing the one built by `init` on first use.
pub fn get_or_init_srs_manager(init: impl FnOnce() -> SrsManager) -> Arc<SrsManager> {
    SRS_MANAGER.get_or_init(|| Arc::new(init())).clone()
}
