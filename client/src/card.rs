//! Card derivation, rendering and export bindings.

use js_sys::Promise;
use promraw_core::log;
use promraw_core::render::{self, CardStyle, RenderedCard};
use promraw_core::{derive, CardMetadata, ScoreSet};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::canvas::CanvasExporter;

/// Scores as sent by the page after scoring.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    pub creativity: f64,
    pub prompt_adherence: f64,
    pub artistic_quality: f64,
    pub overall: f64,
    /// Values are on the 0-10 display scale instead of 0-1.
    #[serde(default)]
    pub out_of_ten: bool,
    /// Written feedback from the scorer, used as the card description.
    #[serde(default)]
    pub feedback: Option<String>,
}

impl ScoreInput {
    pub fn to_scores(&self) -> ScoreSet {
        let div = if self.out_of_ten { 10.0 } else { 1.0 };
        ScoreSet {
            creativity: self.creativity / div,
            prompt_adherence: self.prompt_adherence / div,
            artistic_quality: self.artistic_quality / div,
            overall: self.overall / div,
        }
    }

    pub fn to_card(&self) -> CardMetadata {
        let card = derive(&self.to_scores());
        match &self.feedback {
            Some(feedback) => card.with_description(feedback),
            None => card,
        }
    }
}

/// Everything needed to draw a card.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInput {
    /// Drawing as a data URL or locator.
    pub image: String,
    pub card: CardMetadata,
    /// Omit for the pre-scoring preview.
    #[serde(default)]
    pub scores: Option<ScoreInput>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl RenderInput {
    pub fn render(&self) -> RenderedCard {
        let scores = self.scores.as_ref().map(ScoreInput::to_scores);
        let mut card = render::render(&self.image, &self.card, scores.as_ref());
        if let Some(style) = &self.style {
            card = card.with_style(CardStyle::from_label(style));
        }
        if let Some(prompt) = &self.prompt {
            card = card.with_prompt(prompt);
        }
        card
    }
}

/// Derive card metadata from a score object.
#[wasm_bindgen]
pub fn derive_card(scores_js: JsValue) -> Result<JsValue, String> {
    let input: ScoreInput = serde_wasm_bindgen::from_value(scores_js)
        .map_err(|e| format!("Failed to parse scores: {:?}", e))?;
    let card = input.to_card();
    log::debug(
        "derive_card",
        &format!("{} -> {} ({} HP)", card.name, card.rarity, card.hit_points),
    );
    serde_wasm_bindgen::to_value(&card).map_err(|e| format!("{:?}", e))
}

/// Describe a card for display.
#[wasm_bindgen]
pub fn render_card(input_js: JsValue) -> Result<JsValue, String> {
    let input: RenderInput = serde_wasm_bindgen::from_value(input_js)
        .map_err(|e| format!("Failed to parse card: {:?}", e))?;
    serde_wasm_bindgen::to_value(&input.render()).map_err(|e| format!("{:?}", e))
}

/// Rasterize a card. Resolves to `{ fileName, dataUrl }`, rejects with the
/// failure reason.
#[wasm_bindgen]
pub fn export_card(input_js: JsValue) -> Result<Promise, String> {
    let input: RenderInput = serde_wasm_bindgen::from_value(input_js)
        .map_err(|e| format!("Failed to parse card: {:?}", e))?;
    let exporter = CanvasExporter::new()?;
    let card = input.render();

    Ok(future_to_promise(async move {
        let blob = render::export(&exporter, &card)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let out = js_sys::Object::new();
        js_sys::Reflect::set(&out, &"fileName".into(), &card.file_name.as_str().into())?;
        js_sys::Reflect::set(&out, &"dataUrl".into(), &blob.to_data_url().into())?;
        Ok(out.into())
    }))
}
