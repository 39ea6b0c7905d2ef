//! Bot appearance allocator
//!
//! Hands out profile images without repeats until the pool runs dry, then
//! falls back to flat colors. Reset at the start of every round.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::world::Appearance;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppearancePool {
    /// Profile images available to bots
    profiles: Vec<String>,
    /// Indices into `profiles` already handed out this round
    used: Vec<usize>,
}

impl AppearancePool {
    pub fn new(profiles: Vec<String>) -> Self {
        Self {
            profiles,
            used: Vec::new(),
        }
    }

    /// Profiles not yet handed out this round
    pub fn remaining(&self) -> usize {
        self.profiles.len() - self.used.len()
    }

    /// Pick an unused profile, or a random flat color once exhausted
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Appearance {
        let hue = rng.random_range(0.0..360.0);
        let free: Vec<usize> = (0..self.profiles.len())
            .filter(|i| !self.used.contains(i))
            .collect();

        match free.choose(rng) {
            Some(&idx) => {
                self.used.push(idx);
                Appearance::Profile {
                    image: self.profiles[idx].clone(),
                    fallback_hue: hue,
                }
            }
            None => Appearance::Flat { hue },
        }
    }

    /// Make every profile available again
    pub fn reset(&mut self) {
        self.used.clear();
    }
}
