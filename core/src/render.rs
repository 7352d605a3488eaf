//! Card rendering contract.
//!
//! [`render`] describes the visual trading card (image, overlay, title, score
//! panel, moves, achievement) as plain data the frontend draws. [`export`]
//! turns that description into a single raster image through a
//! [`CardRasterizer`].

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::gateway::CardRasterizer;
use crate::log;
use crate::types::{CardMetadata, ImageBlob, RarityTier, ScoreSet};

/// Upscaling factor used when exporting a card.
pub const EXPORT_SCALE: u32 = 2;

/// Card width in CSS pixels at 1x.
pub const CARD_WIDTH: u32 = 256;
pub const IMAGE_HEIGHT: u32 = 192;
pub const TITLE_HEIGHT: u32 = 72;
/// Two rows of two score cells.
pub const SCORE_PANEL_HEIGHT: u32 = 128;
pub const MOVE_ROW_HEIGHT: u32 = 24;
pub const ACHIEVEMENT_HEIGHT: u32 = 44;

/// Visual theme of a card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum CardStyle {
    #[default]
    Digital,
    Abstract,
    Landscape,
    Portrait,
    Surreal,
    Minimal,
}

/// Colours used to draw a card.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
    /// Three stops of the image overlay gradient.
    pub gradient: [&'static str; 3],
}

impl CardStyle {
    pub const ALL: [CardStyle; 6] = [
        CardStyle::Digital,
        CardStyle::Abstract,
        CardStyle::Landscape,
        CardStyle::Portrait,
        CardStyle::Surreal,
        CardStyle::Minimal,
    ];

    /// Parse a style label. Anything unrecognised, including rarity names and
    /// "Digital Art", falls back to [`CardStyle::Digital`].
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(label.trim()))
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            CardStyle::Digital => "Digital",
            CardStyle::Abstract => "Abstract",
            CardStyle::Landscape => "Landscape",
            CardStyle::Portrait => "Portrait",
            CardStyle::Surreal => "Surreal",
            CardStyle::Minimal => "Minimal",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            CardStyle::Digital => Palette {
                background: "#2E3192",
                text: "#93C5FD",
                border: "#3B82F6",
                gradient: ["#3B82F6", "#A855F7", "#EC4899"],
            },
            CardStyle::Abstract => Palette {
                background: "#6B1D9C",
                text: "#D8B4FE",
                border: "#A855F7",
                gradient: ["#A855F7", "#EC4899", "#EF4444"],
            },
            CardStyle::Landscape => Palette {
                background: "#1E8449",
                text: "#86EFAC",
                border: "#22C55E",
                gradient: ["#22C55E", "#14B8A6", "#3B82F6"],
            },
            CardStyle::Portrait => Palette {
                background: "#C2185B",
                text: "#F9A8D4",
                border: "#EC4899",
                gradient: ["#EC4899", "#EF4444", "#EAB308"],
            },
            CardStyle::Surreal => Palette {
                background: "#D4AC0D",
                text: "#FDE047",
                border: "#EAB308",
                gradient: ["#EAB308", "#F97316", "#EF4444"],
            },
            CardStyle::Minimal => Palette {
                background: "#17202A",
                text: "#D1D5DB",
                border: "#6B7280",
                gradient: ["#6B7280", "#64748B", "#71717A"],
            },
        }
    }
}

/// Badge colours for a rarity tier.
pub fn rarity_colors(tier: RarityTier) -> (&'static str, &'static str) {
    // (text, background)
    match tier {
        RarityTier::Legendary => ("#A855F7", "#F3E8FF"),
        RarityTier::Epic => ("#EF4444", "#FEE2E2"),
        RarityTier::Rare => ("#3B82F6", "#DBEAFE"),
        RarityTier::Uncommon => ("#22C55E", "#DCFCE7"),
        RarityTier::Common => ("#6B7280", "#F3F4F6"),
    }
}

/// One cell of the score panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCell {
    pub label: String,
    /// Score out of ten with one decimal, e.g. "8.4".
    pub value: String,
}

/// One move row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveLine {
    pub name: String,
    pub damage: u32,
}

/// Vertical geometry of a card at 1x, in CSS pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardLayout {
    pub width: u32,
    pub image_height: u32,
    pub title_height: u32,
    pub score_panel_height: u32,
    pub moves_height: u32,
    pub achievement_height: u32,
}

impl CardLayout {
    pub fn height(&self) -> u32 {
        self.image_height
            + self.title_height
            + self.score_panel_height
            + self.moves_height
            + self.achievement_height
    }

    /// Pixel size of the exported raster at `scale`.
    pub fn scaled(&self, scale: u32) -> (u32, u32) {
        (self.width * scale, self.height() * scale)
    }
}

/// Displayable description of a trading card.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCard {
    /// Image source (data URL or locator).
    pub image: String,
    pub title: String,
    /// Type badge text, the rarity name.
    pub badge: String,
    pub style: CardStyle,
    pub palette: Palette,
    pub rarity: RarityTier,
    pub rarity_color: &'static str,
    /// Fill behind the rarity badge.
    pub rarity_background: &'static str,
    pub hit_points: u32,
    pub moves: Vec<MoveLine>,
    /// Overall score shown on top of the image, when scored.
    pub overall_badge: Option<String>,
    /// Overall, Create, Match, Quality. Absent in preview mode.
    pub score_panel: Option<Vec<ScoreCell>>,
    pub achievement: String,
    pub file_name: String,
}

/// Describe a card. Pass `None` for scores to get the pre-scoring preview,
/// which has no score panel.
pub fn render(image: &str, metadata: &CardMetadata, scores: Option<&ScoreSet>) -> RenderedCard {
    let style = CardStyle::default();
    let scores = scores.map(ScoreSet::clamped);

    RenderedCard {
        image: image.to_string(),
        title: metadata.name.clone(),
        badge: metadata.rarity.name().to_string(),
        style,
        palette: style.palette(),
        rarity: metadata.rarity,
        rarity_color: rarity_colors(metadata.rarity).0,
        rarity_background: rarity_colors(metadata.rarity).1,
        hit_points: metadata.hit_points,
        moves: metadata
            .moves
            .iter()
            .map(|m| MoveLine {
                name: m.name.clone(),
                damage: m.damage,
            })
            .collect(),
        overall_badge: scores.as_ref().map(|s| out_of_ten(s.overall)),
        score_panel: scores.as_ref().map(score_cells),
        achievement: metadata.achievement.clone(),
        file_name: file_name(style),
    }
}

impl RenderedCard {
    /// Show the drawing prompt as the title instead of the card name.
    pub fn with_prompt(mut self, prompt: &str) -> Self {
        let prompt = prompt.trim();
        if !prompt.is_empty() {
            self.title = prompt.to_string();
        }
        self
    }

    pub fn with_style(mut self, style: CardStyle) -> Self {
        self.style = style;
        self.palette = style.palette();
        self.file_name = file_name(style);
        self
    }

    pub fn has_scores(&self) -> bool {
        self.score_panel.is_some()
    }

    pub fn layout(&self) -> CardLayout {
        CardLayout {
            width: CARD_WIDTH,
            image_height: IMAGE_HEIGHT,
            title_height: TITLE_HEIGHT,
            score_panel_height: if self.has_scores() {
                SCORE_PANEL_HEIGHT
            } else {
                0
            },
            moves_height: MOVE_ROW_HEIGHT * self.moves.len() as u32,
            achievement_height: ACHIEVEMENT_HEIGHT,
        }
    }
}

/// Rasterize the whole card at [`EXPORT_SCALE`].
///
/// Failures are reported as [`ExportError::ExportFailed`] and logged; they
/// never affect anything beyond the export itself.
pub async fn export<R>(rasterizer: &R, card: &RenderedCard) -> Result<ImageBlob, ExportError>
where
    R: CardRasterizer + ?Sized,
{
    log::action("export", &card.file_name);
    let blob = match rasterizer.rasterize(card, EXPORT_SCALE).await {
        Ok(blob) => blob,
        Err(reason) => {
            log::warn(&format!("card export failed: {reason}"));
            return Err(ExportError::ExportFailed { reason });
        }
    };
    if blob.is_empty() {
        log::warn("card export produced an empty image");
        return Err(ExportError::ExportFailed {
            reason: "rasterizer returned no data".to_string(),
        });
    }
    log::result(true, &format!("exported {} bytes", blob.len()));
    Ok(blob)
}

fn score_cells(scores: &ScoreSet) -> Vec<ScoreCell> {
    [
        ("Overall", scores.overall),
        ("Create", scores.creativity),
        ("Match", scores.prompt_adherence),
        ("Quality", scores.artistic_quality),
    ]
    .into_iter()
    .map(|(label, value)| ScoreCell {
        label: label.to_string(),
        value: out_of_ten(value),
    })
    .collect()
}

fn out_of_ten(value: f64) -> String {
    format!("{:.1}", value * 10.0)
}

fn file_name(style: CardStyle) -> String {
    format!("{}-card.png", style.name())
}
