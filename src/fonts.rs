// 🔤 Font Choice - fixed font, or a seeded pick per advisor document

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT: &str = "Calibri";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FontChoice {
    /// Same font for every document
    Fixed { name: String },

    /// One font per document drawn from `pool`; same seed, same sequence
    Random { pool: Vec<String>, seed: u64 },
}

impl Default for FontChoice {
    fn default() -> Self {
        FontChoice::Fixed {
            name: DEFAULT_FONT.to_string(),
        }
    }
}

impl FontChoice {
    /// Random pick per invoice from the usual office fonts
    pub fn invoice_pool(seed: u64) -> Self {
        FontChoice::Random {
            pool: ["Calibri", "Arial", "Aptos Display", "Cambria"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            seed,
        }
    }
}

/// Stateful picker created once per run from a `FontChoice`
pub struct FontPicker {
    choice: FontChoice,
    rng: StdRng,
}

impl FontPicker {
    pub fn new(choice: FontChoice) -> Self {
        let seed = match &choice {
            FontChoice::Random { seed, .. } => *seed,
            FontChoice::Fixed { .. } => 0,
        };
        FontPicker {
            choice,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Font for the next document
    pub fn next_font(&mut self) -> String {
        match &self.choice {
            FontChoice::Fixed { name } => name.clone(),
            FontChoice::Random { pool, .. } => pool
                .choose(&mut self.rng)
                .cloned()
                .unwrap_or_else(|| DEFAULT_FONT.to_string()),
        }
    }
}
