//! The emotion set and the host-side target selector.
//!
//! The set is fixed to the five expressions the perception oracle detects
//! reliably. Selection is the host's exclusive job: the joiner receives the
//! chosen target over the wire and never samples independently. If both
//! peers rolled their own, a dropped message would leave them playing
//! different rounds.

use serde::{Deserialize, Serialize};

use crate::rng::Pcg32;

/// A target facial expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    /// A smile.
    Happy,
    /// A frown.
    Sad,
    /// A scowl.
    Angry,
    /// Raised brows, open mouth.
    Surprised,
    /// A blank face.
    Neutral,
}

impl Emotion {
    /// Every emotion in the configured set, in a fixed order.
    pub const ALL: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Neutral,
    ];

    /// The lowercase name used for display and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks pseudo-random target emotions, avoiding immediate repeats.
///
/// Owned by the authoritative session only. Seedable for deterministic tests.
#[derive(Debug, Clone)]
pub struct EmotionSelector {
    rng: Pcg32,
}

impl EmotionSelector {
    /// Creates a selector with a deterministic seed.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Creates a selector seeded from system timing.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Pcg32::from_entropy(),
        }
    }

    /// Picks the next target emotion, uniform over [`Emotion::ALL`].
    ///
    /// Retries until the result differs from `excluding`; with a single-member
    /// set that member is returned as-is.
    pub fn pick_next(&mut self, excluding: Option<Emotion>) -> Emotion {
        loop {
            let index = self.rng.gen_range(0..Emotion::ALL.len() as u32) as usize;
            let candidate = Emotion::ALL[index];
            if Some(candidate) != excluding || Emotion::ALL.len() == 1 {
                return candidate;
            }
        }
    }
}
