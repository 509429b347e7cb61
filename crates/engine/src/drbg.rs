//! Deterministic random bit generator
//!
//! ChaCha20 keyed from the operating system RNG and rekeyed every
//! `reseed_interval` draws. Each engine worker owns one generator.

use core::num::NonZeroU32;

use rand::rngs::OsRng;
use rand::{CryptoRng, Error as RandError, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::status::{EngineStatus, Result};

const GEN_RANDOM_CODE: NonZeroU32 = match NonZeroU32::new(RandError::CUSTOM_START) {
    Some(code) => code,
    None => panic!("rand custom error range starts at zero"),
};

/// Reseeding ChaCha20 generator
pub struct Drbg {
    rng: ChaCha20Rng,
    draws: u64,
    reseed_interval: u64,
    fail_seed: bool,
}

impl Drbg {
    /// Seed a generator from the OS RNG
    pub fn seeded(reseed_interval: u64) -> Result<Self> {
        Self::build(reseed_interval, false)
    }

    /// Seed a generator that refuses every seeding attempt when `fail_seed` is set
    pub(crate) fn build(reseed_interval: u64, fail_seed: bool) -> Result<Self> {
        if reseed_interval == 0 {
            return Err(EngineStatus::BadParams);
        }
        let rng = Self::fresh(fail_seed)?;
        Ok(Self {
            rng,
            draws: 0,
            reseed_interval,
            fail_seed,
        })
    }

    fn fresh(fail_seed: bool) -> Result<ChaCha20Rng> {
        if fail_seed {
            log::debug!("drbg: injected seeding failure");
            return Err(EngineStatus::GenRandom);
        }
        ChaCha20Rng::from_rng(OsRng).map_err(|e| {
            log::warn!("drbg: OS RNG unavailable: {}", e);
            EngineStatus::GenRandom
        })
    }

    /// Reseed now if the interval is spent
    pub fn reseed_if_due(&mut self) -> Result<()> {
        if self.draws >= self.reseed_interval {
            self.rng = Self::fresh(self.fail_seed)?;
            self.draws = 0;
            log::trace!("drbg: reseeded");
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<()> {
        self.reseed_if_due()?;
        self.draws += 1;
        Ok(())
    }

    /// Fill `out` with random bytes, reseeding first if the interval is spent
    pub fn fill(&mut self, out: &mut [u8]) -> Result<()> {
        self.tick()?;
        self.rng.fill_bytes(out);
        Ok(())
    }

    /// Draws since the last (re)seed
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RngCore for Drbg {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    // A failed reseed keeps the previous key stream; `fill` and
    // `try_fill_bytes` report the failure.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if self.tick().is_err() {
            self.draws = 0;
        }
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), RandError> {
        self.fill(dest).map_err(|_| RandError::from(GEN_RANDOM_CODE))
    }
}

impl CryptoRng for Drbg {}

impl core::fmt::Debug for Drbg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Drbg")
            .field("draws", &self.draws)
            .field("reseed_interval", &self.reseed_interval)
            .finish_non_exhaustive()
    }
}
