//! Random token adapter for the `ValueGenerator` port.

use std::sync::{Mutex, PoisonError};

use echocheck_application::ports::ValueGenerator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of generated tokens.
pub const TOKEN_LEN: usize = 11;

/// Generates short lowercase base-36 tokens.
///
/// Use [`RandomTokenGenerator::seeded`] for a reproducible sequence.
#[derive(Debug)]
pub struct RandomTokenGenerator {
    rng: Mutex<StdRng>,
}

impl RandomTokenGenerator {
    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a generator with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueGenerator for RandomTokenGenerator {
    fn next_token(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..TOKEN_LEN)
            .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
            .collect()
    }
}
