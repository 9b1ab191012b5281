use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::SeedableRng;

/// The single entropy funnel for a battle. Every shuffle, energy draw and
/// deck-search sample goes through this, so a battle constructed from a
/// fixed seed replays identically.
#[derive(Debug, Clone)]
pub struct BattleRng {
    rng: StdRng,
}

impl BattleRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn new_random() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        *items.choose(&mut self.rng).expect("pick from empty slice")
    }

    /// Up to `amount` distinct indices in `0..length`, in random order.
    pub fn sample_indices(&mut self, length: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(length);
        rand::seq::index::sample(&mut self.rng, length, amount).into_vec()
    }
}
