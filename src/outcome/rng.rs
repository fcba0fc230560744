use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Process-wide random source. Draws are serialized through a mutex; a fixed
/// seed makes a whole run reproducible.
#[derive(Debug)]
pub struct SharedRng {
    inner: Mutex<StdRng>,
}

impl SharedRng {
    pub fn from_os() -> Self {
        Self {
            inner: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Runs `f` with exclusive access to the generator. Keep `f` short and
    /// never await inside it.
    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_os()
    }
}
