use std::fmt;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{ImageError, ScoreError};

// ==========================================
// SCORES
// ==========================================

/// The four AI-assessed scores for one drawing.
///
/// All values are stored on the **0 to 1** scale. The scoring UI shows them
/// out of ten; use [`ScoreSet::from_ten_point`] to convert from that view.
/// `overall` is supplied by the scorer and is not an aggregate of the other
/// three.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSet {
    pub creativity: f64,
    pub prompt_adherence: f64,
    pub artistic_quality: f64,
    pub overall: f64,
}

impl ScoreSet {
    /// Build a validated score set on the 0-1 scale.
    pub fn new(
        creativity: f64,
        prompt_adherence: f64,
        artistic_quality: f64,
        overall: f64,
    ) -> Result<Self, ScoreError> {
        let scores = Self {
            creativity,
            prompt_adherence,
            artistic_quality,
            overall,
        };
        scores.validate()?;
        Ok(scores)
    }

    /// Build a validated score set from values out of ten.
    pub fn from_ten_point(
        creativity: f64,
        prompt_adherence: f64,
        artistic_quality: f64,
        overall: f64,
    ) -> Result<Self, ScoreError> {
        Self::new(
            creativity / 10.0,
            prompt_adherence / 10.0,
            artistic_quality / 10.0,
            overall / 10.0,
        )
    }

    /// Check that every score is finite and within [0, 1].
    pub fn validate(&self) -> Result<(), ScoreError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(ScoreError::NotFinite { field });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(ScoreError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Copy with NaN mapped to 0 and everything else clamped into [0, 1].
    pub fn clamped(&self) -> Self {
        Self {
            creativity: clamp_unit(self.creativity),
            prompt_adherence: clamp_unit(self.prompt_adherence),
            artistic_quality: clamp_unit(self.artistic_quality),
            overall: clamp_unit(self.overall),
        }
    }

    /// Scores paired with their wire names, in display order.
    pub fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("creativity", self.creativity),
            ("promptAdherence", self.prompt_adherence),
            ("artisticQuality", self.artistic_quality),
            ("overall", self.overall),
        ]
    }

    /// Overall score on the 0-10 display scale.
    pub fn overall_out_of_ten(&self) -> f64 {
        self.overall * 10.0
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ==========================================
// CARD METADATA
// ==========================================

/// Ordered rarity classification derived from the overall score.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub enum RarityTier {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl RarityTier {
    /// All tiers, lowest first.
    pub const ALL: [RarityTier; 5] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Epic,
        RarityTier::Legendary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RarityTier::Common => "Common",
            RarityTier::Uncommon => "Uncommon",
            RarityTier::Rare => "Rare",
            RarityTier::Epic => "Epic",
            RarityTier::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named attack on the card. Damage comes from one sub-score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Move {
    pub name: String,
    pub damage: u32,
}

impl Move {
    pub fn new(name: &str, damage: u32) -> Self {
        Self {
            name: name.to_string(),
            damage,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} damage)", self.name, self.damage)
    }
}

/// Display metadata for a trading card, derived from a [`ScoreSet`].
///
/// Never edited in place: new scores produce a new value through
/// [`crate::derive::derive`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardMetadata {
    pub name: String,
    pub rarity: RarityTier,
    pub hit_points: u32,
    pub moves: [Move; 3],
    pub achievement: String,
    pub description: String,
}

impl CardMetadata {
    /// Replace the description, usually with the scorer's written feedback.
    /// Blank feedback keeps the derived description.
    pub fn with_description(mut self, description: &str) -> Self {
        let trimmed = description.trim();
        if !trimmed.is_empty() {
            self.description = trimmed.to_string();
        }
        self
    }

    /// Moves flattened for the metadata `Moves` attribute.
    pub fn moves_summary(&self) -> String {
        self.moves
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ==========================================
// IMAGES
// ==========================================

/// Raw image bytes plus their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(mime: &str, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.to_string(),
            bytes,
        }
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new("image/png", bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Decode a `data:<mime>;base64,<payload>` URL as produced by
    /// `canvas.toDataURL`.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let rest = url.strip_prefix("data:").ok_or(ImageError::NotADataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageError::NotADataUrl)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(ImageError::NotBase64)?;
        let mime = if mime.is_empty() {
            "application/octet-stream"
        } else {
            mime
        };
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageError::Decode(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(Self::new(mime, bytes))
    }

    /// Encode back into a data URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// ==========================================
// CHAIN / STORAGE IDENTIFIERS
// ==========================================

/// EVM chain identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wallet account address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Address(pub String);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content-addressed storage locator (e.g. `ipfs://bafy...`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Locator(pub String);

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle of a submitted transaction, usually its hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TxHandle(pub String);

impl fmt::Display for TxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
