use rand::Rng;

pub const MAX_PROMPT_SEED: u32 = 9999;

/// Source of the randomness used when building prompts.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
    /// Seed in `0..=MAX_PROMPT_SEED`.
    fn seed(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len.max(1))
    }

    fn seed(&self) -> u32 {
        rand::thread_rng().gen_range(0..=MAX_PROMPT_SEED)
    }
}

/// Deterministic source, for reproducible prompts.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    pub index: usize,
    pub seed: u32,
}

impl RandomSource for FixedRandom {
    fn pick_index(&self, len: usize) -> usize {
        self.index % len.max(1)
    }

    fn seed(&self) -> u32 {
        self.seed.min(MAX_PROMPT_SEED)
    }
}
