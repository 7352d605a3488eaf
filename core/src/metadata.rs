//! NFT metadata documents uploaded to storage and referenced by `tokenURI`.

use serde::{Deserialize, Serialize};

use crate::types::{CardMetadata, Locator, Move};

pub const DRAWING_NAME: &str = "My Drawing";
pub const DRAWING_DESCRIPTION: &str = "A drawing I created";
/// `Type` attribute value of a drawing-only mint.
pub const DRAWING_TYPE: &str = "Drawing";

/// Attribute value, either text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn text(trait_type: &str, value: &str) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: AttributeValue::Text(value.to_string()),
        }
    }

    pub fn number(trait_type: &str, value: u64) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: AttributeValue::Number(value),
        }
    }
}

/// Typed copy of the card stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardProperties {
    #[serde(rename = "type")]
    pub card_type: String,
    pub hp: u32,
    pub moves: Vec<Move>,
}

/// Metadata document shape. Immutable once uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub name: String,
    pub description: String,
    pub image: Locator,
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<CardProperties>,
}

impl MetadataDocument {
    /// Minimal document for a bare drawing.
    pub fn drawing(image: Locator, title: Option<&str>) -> Self {
        Self {
            name: pick_title(title, DRAWING_NAME),
            description: DRAWING_DESCRIPTION.to_string(),
            image,
            attributes: vec![Attribute::text("Type", DRAWING_TYPE)],
            properties: None,
        }
    }

    /// Full card document: attributes plus a typed `properties` block.
    pub fn card(image: Locator, card: &CardMetadata, title: Option<&str>) -> Self {
        let card_type = card.rarity.name().to_string();
        Self {
            name: pick_title(title, &card.name),
            description: card.description.clone(),
            image,
            attributes: vec![
                Attribute::text("Type", &card_type),
                Attribute::number("HP", u64::from(card.hit_points)),
                Attribute::text("Moves", &card.moves_summary()),
            ],
            properties: Some(CardProperties {
                card_type,
                hp: card.hit_points,
                moves: card.moves.to_vec(),
            }),
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

fn pick_title(title: Option<&str>, fallback: &str) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => fallback.to_string(),
    }
}
