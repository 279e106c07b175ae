//! Client ID generators.

use std::{
    process,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use chatfeed_shared::time::{Clock, SystemClock};
use rand::{
    Rng, RngCore, SeedableRng,
    rngs::{OsRng, StdRng},
};
use uuid::Builder;

use crate::domain::{ClientId, ClientIdGenerator};

/// Random UUID (v4) generator backed by the OS random source.
///
/// Yields `None` when the OS random source cannot be read.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl ClientIdGenerator for UuidGenerator {
    fn try_generate(&self) -> Option<ClientId> {
        let mut bytes = [0u8; 16];
        if let Err(e) = OsRng.try_fill_bytes(&mut bytes) {
            tracing::warn!("OS random source unavailable: {}", e);
            return None;
        }
        let uuid = Builder::from_random_bytes(bytes).into_uuid();
        Some(ClientId::generated(uuid.to_string()))
    }
}

static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Fallback generator: `client-<unix millis>-<random hex>`.
///
/// Sufficiently unique for session attribution, not for any
/// access-control purpose. Seeded without touching the OS random source,
/// so it cannot fail.
pub struct CompositeGenerator {
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl CompositeGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let seed = (clock.now_millis() as u64)
            ^ (u64::from(process::id()) << 32)
            ^ SEED_COUNTER.fetch_add(1, Ordering::Relaxed).rotate_left(17);
        Self {
            clock,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn generate(&self) -> ClientId {
        let suffix: u64 = self.rng.lock().unwrap_or_else(|e| e.into_inner()).r#gen();
        ClientId::generated(format!("client-{}-{:x}", self.clock.now_millis(), suffix))
    }
}

impl Default for CompositeGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl ClientIdGenerator for CompositeGenerator {
    fn try_generate(&self) -> Option<ClientId> {
        Some(self.generate())
    }
}
