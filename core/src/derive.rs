//! Score-to-card derivation.
//!
//! Turns a [`ScoreSet`] into [`CardMetadata`]. Pure and deterministic: the
//! same scores always produce the same card.

use crate::types::{CardMetadata, Move, RarityTier, ScoreSet};

/// Hit points at a perfect overall score.
pub const MAX_HIT_POINTS: u32 = 100;
/// Damage of a move at a perfect sub-score.
pub const MAX_MOVE_DAMAGE: u32 = 50;

/// Move names, one per sub-score, in card order.
pub const MOVE_NAMES: [&str; 3] = ["Creative Strike", "Prompt Blast", "Artistic Wave"];

/// Description used until the scorer's feedback is attached.
pub const DEFAULT_DESCRIPTION: &str = "A drawing I created";

/// Lower bound of each tier on the 0-1 scale, highest tier first.
/// Equivalent to 9/8/7/6 out of ten.
const TIER_THRESHOLDS: [(f64, RarityTier); 4] = [
    (0.9, RarityTier::Legendary),
    (0.8, RarityTier::Epic),
    (0.7, RarityTier::Rare),
    (0.6, RarityTier::Uncommon),
];

/// Derive card metadata from scores. Out-of-range input is clamped first.
pub fn derive(scores: &ScoreSet) -> CardMetadata {
    let scores = scores.clamped();
    let rarity = rarity_for(scores.overall);

    CardMetadata {
        name: format!("Drawing #{}", drawing_number(&scores)),
        rarity,
        hit_points: scaled_floor(scores.overall, MAX_HIT_POINTS),
        moves: [
            Move::new(
                MOVE_NAMES[0],
                scaled_floor(scores.creativity, MAX_MOVE_DAMAGE),
            ),
            Move::new(
                MOVE_NAMES[1],
                scaled_floor(scores.prompt_adherence, MAX_MOVE_DAMAGE),
            ),
            Move::new(
                MOVE_NAMES[2],
                scaled_floor(scores.artistic_quality, MAX_MOVE_DAMAGE),
            ),
        ],
        achievement: achievement_for(rarity).to_string(),
        description: DEFAULT_DESCRIPTION.to_string(),
    }
}

/// Rarity tier for an overall score on the 0-1 scale.
pub fn rarity_for(overall: f64) -> RarityTier {
    TIER_THRESHOLDS
        .iter()
        .find(|(min, _)| overall >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(RarityTier::Common)
}

/// Achievement line for a tier.
pub fn achievement_for(tier: RarityTier) -> &'static str {
    match tier {
        RarityTier::Legendary => "🎨 Master Artist",
        RarityTier::Epic => "🌟 Creative Genius",
        RarityTier::Rare => "✨ Artistic Prodigy",
        RarityTier::Uncommon => "🎭 Creative Mind",
        RarityTier::Common => "🖌️ Budding Artist",
    }
}

/// Absorbs binary rounding of decimal scores, so 0.58 * 100 floors to 58.
const FLOOR_EPSILON: f64 = 1e-9;

/// `floor(value * max)` for a value already clamped to [0, 1].
fn scaled_floor(value: f64, max: u32) -> u32 {
    let scaled = (value * f64::from(max) + FLOOR_EPSILON).floor();
    // `as` saturates, the min keeps float noise from ever exceeding `max`.
    (scaled as u32).min(max)
}

/// Card number in [0, 1000), mixed from the score bits.
fn drawing_number(scores: &ScoreSet) -> u32 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for (_, value) in scores.fields() {
        state ^= value.to_bits();
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
    }
    (state % 1000) as u32
}
