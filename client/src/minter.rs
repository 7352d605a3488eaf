//! Mint workflow bindings.

use std::rc::Rc;

use js_sys::{Function, Promise, Uint8Array};
use promraw_core::log;
use promraw_core::{
    CardMetadata, ImageBlob, MintConfig, MintController, MintDraft, MintKind, MintState, Quantity,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::Response;

use crate::canvas::CanvasSurface;
use crate::gateway::{JsStorage, JsWallet};

/// Selector of the drawing canvas used for re-capture.
const DRAWING_CANVAS: &str = "canvas";

/// Amount field, a number or the raw text of the input box.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Number(f64),
    Text(String),
}

impl AmountField {
    pub fn quantity(&self) -> Quantity {
        match self {
            AmountField::Number(n) if n.is_finite() && *n >= 1.0 => {
                Quantity::new(n.min(f64::from(u32::MAX)) as u32).unwrap_or_default()
            }
            AmountField::Number(_) => Quantity::ONE,
            AmountField::Text(text) => Quantity::parse(text),
        }
    }
}

/// A mint request from the page.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MintInput {
    pub kind: MintKind,
    /// Drawing as a data URL or a fetchable locator.
    pub image: Option<String>,
    pub card: Option<CardMetadata>,
    pub title: Option<String>,
    pub quantity: Option<AmountField>,
}

impl MintInput {
    /// Build the draft around the already resolved image. An unreadable
    /// image fails the attempt rather than falling back to the live canvas.
    pub fn into_draft(self, image: Option<Result<ImageBlob, String>>) -> MintDraft {
        let (image, image_error) = match image {
            Some(Ok(blob)) => (Some(blob), None),
            Some(Err(reason)) => (None, Some(reason)),
            None => (None, None),
        };
        let mut draft = match self.kind {
            MintKind::Drawing => MintDraft::drawing(image),
            MintKind::Card => MintDraft::card(image, self.card),
        };
        if let Some(reason) = image_error {
            draft = draft.with_unreadable_image(&reason);
        }
        if let Some(title) = self.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            draft = draft.with_title(title);
        }
        if let Some(amount) = &self.quantity {
            draft = draft.with_quantity(amount.quantity());
        }
        draft
    }
}

/// Decode an inline `data:` image. `None` for sources that must be fetched.
pub fn decode_inline(src: &str) -> Option<Result<ImageBlob, String>> {
    src.starts_with("data:")
        .then(|| ImageBlob::from_data_url(src).map_err(|e| e.to_string()))
}

/// Load a supplied image, fetching locators such as blob or gateway URLs.
pub async fn resolve_image(src: &str) -> Result<ImageBlob, String> {
    match decode_inline(src) {
        Some(decoded) => decoded,
        None => fetch_image(src).await,
    }
}

async fn fetch_image(url: &str) -> Result<ImageBlob, String> {
    let window = web_sys::window().ok_or_else(|| "no window available".to_string())?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("could not fetch {url}: {:?}", e))?
        .dyn_into()
        .map_err(|_| format!("could not fetch {url}"))?;
    if !response.ok() {
        return Err(format!("fetching {url} returned {}", response.status()));
    }

    let mime = response
        .headers()
        .get("content-type")
        .ok()
        .flatten()
        .unwrap_or_else(|| "image/png".to_string());
    let buffer = response
        .array_buffer()
        .map_err(|e| format!("{:?}", e))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| format!("could not read {url}: {:?}", e))?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    log::debug("mint", &format!("fetched {} bytes of {mime} from {url}", bytes.len()));
    Ok(ImageBlob::new(&mime, bytes))
}

/// Parse the page's config, falling back to the build-time defaults.
pub fn parse_config(config_js: JsValue) -> Result<MintConfig, String> {
    let config = if config_js.is_null() || config_js.is_undefined() {
        MintConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config_js)
            .map_err(|e| format!("Failed to parse config: {:?}", e))?
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Drives mint attempts from the page.
#[wasm_bindgen]
pub struct Minter {
    controller: Rc<MintController<JsWallet, JsStorage>>,
}

#[wasm_bindgen]
impl Minter {
    /// `on_state` is called with every new workflow state.
    #[wasm_bindgen(constructor)]
    pub fn new(
        wallet: JsValue,
        storage: JsValue,
        config_js: JsValue,
        on_state: Option<Function>,
    ) -> Result<Minter, String> {
        let config = parse_config(config_js)?;
        log::info(&format!(
            "minter ready for chain {} at {}",
            config.target_chain_id, config.contract_address
        ));

        let mut controller =
            MintController::new(JsWallet::new(wallet), JsStorage::new(storage), config)
                .with_surface(CanvasSurface::new(DRAWING_CANVAS));
        if let Some(callback) = on_state {
            controller = controller.with_listener(move |state: &MintState| {
                let Ok(value) = serde_wasm_bindgen::to_value(state) else {
                    return;
                };
                if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                    log::warn(&format!("state listener threw: {:?}", e));
                }
            });
        }

        Ok(Self {
            controller: Rc::new(controller),
        })
    }

    /// Start a mint attempt. Resolves to the outcome object; never rejects
    /// for workflow failures.
    ///
    /// Nothing runs until the promise is first polled on the microtask
    /// queue, and a locator image is fetched before the attempt starts, so
    /// `isMinting()` may still read false right after this returns. A second
    /// call in that window is still refused: it resolves to the `busy`
    /// outcome once the first attempt holds the flag.
    #[wasm_bindgen]
    pub fn mint(&self, request_js: JsValue) -> Result<Promise, String> {
        let input: MintInput = serde_wasm_bindgen::from_value(request_js)
            .map_err(|e| format!("Failed to parse mint request: {:?}", e))?;
        let controller = Rc::clone(&self.controller);

        Ok(future_to_promise(async move {
            let image = match input.image.as_deref() {
                Some(src) => Some(resolve_image(src).await),
                None => None,
            };
            let draft = input.into_draft(image);
            let outcome = controller.mint(draft).await;
            serde_wasm_bindgen::to_value(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
        }))
    }

    #[wasm_bindgen(js_name = isMinting)]
    pub fn is_minting(&self) -> bool {
        self.controller.is_minting()
    }

    #[wasm_bindgen]
    pub fn state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.controller.state()).unwrap_or(JsValue::NULL)
    }

    /// Clear a finished attempt. Returns false while one is running.
    #[wasm_bindgen]
    pub fn reset(&self) -> bool {
        self.controller.reset()
    }

    #[wasm_bindgen]
    pub fn config(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.controller.config()).unwrap_or(JsValue::NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(json: &str) -> MintInput {
        serde_json::from_str(json).unwrap()
    }

    fn draft_from(json: &str) -> MintDraft {
        let input = input(json);
        let image = input.image.as_deref().and_then(decode_inline);
        input.into_draft(image)
    }

    #[test]
    fn test_drawing_request() {
        let draft = draft_from(r#"{"image":"data:image/png;base64,AQID","quantity":"2"}"#);
        assert_eq!(draft.kind, MintKind::Drawing);
        assert_eq!(draft.image.map(|b| b.bytes), Some(vec![1, 2, 3]));
        assert_eq!(draft.quantity.get(), 2);
        assert!(draft.title.is_none());
    }

    #[test]
    fn test_unreadable_image_is_reported() {
        let draft = draft_from(r#"{"image":"data:,"}"#);
        assert!(draft.image.is_none());
        assert!(draft.image_error.is_some());

        let failed = input(r#"{"image":"https://gateway.example/ipfs/abc"}"#)
            .into_draft(Some(Err("fetching returned 404".to_string())));
        assert!(failed.image.is_none());
        assert_eq!(failed.image_error.as_deref(), Some("fetching returned 404"));

        let absent = draft_from(r#"{}"#);
        assert!(absent.image.is_none());
        assert!(absent.image_error.is_none());
    }

    #[test]
    fn test_only_data_urls_decode_inline() {
        assert!(decode_inline("blob:https://app.example/1234").is_none());
        assert!(decode_inline("https://gateway.example/ipfs/abc").is_none());
        assert!(matches!(decode_inline("data:image/png;base64,AQID"), Some(Ok(_))));
        assert!(matches!(decode_inline("data:image/png,raw"), Some(Err(_))));
    }

    #[test]
    fn test_amount_field() {
        assert_eq!(AmountField::Number(3.0).quantity().get(), 3);
        assert_eq!(AmountField::Number(2.7).quantity().get(), 2);
        assert_eq!(AmountField::Number(0.0).quantity().get(), 1);
        assert_eq!(AmountField::Number(f64::NAN).quantity().get(), 1);
        assert_eq!(AmountField::Text("".to_string()).quantity().get(), 1);
        assert_eq!(AmountField::Text("5".to_string()).quantity().get(), 5);
        assert_eq!(draft_from(r#"{"quantity":4}"#).quantity.get(), 4);
    }

    #[test]
    fn test_card_request_keeps_metadata_and_title() {
        let raw = r#"{
            "kind": "card",
            "image": "data:image/png;base64,AQ==",
            "title": "  Sunset ",
            "card": {
                "name": "Drawing #7",
                "rarity": "Epic",
                "hitPoints": 84,
                "moves": [
                    {"name": "Creative Strike", "damage": 42},
                    {"name": "Prompt Blast", "damage": 35},
                    {"name": "Artistic Wave", "damage": 45}
                ],
                "achievement": "🌟 Creative Genius",
                "description": "A drawing I created"
            }
        }"#;
        let draft = draft_from(raw);
        assert_eq!(draft.kind, MintKind::Card);
        assert_eq!(draft.title.as_deref(), Some("Sunset"));
        assert_eq!(draft.card.map(|c| c.hit_points), Some(84));
        assert_eq!(draft.quantity, Quantity::ONE);
    }

    #[test]
    fn test_card_request_without_metadata() {
        let draft = draft_from(r#"{"kind":"card"}"#);
        assert_eq!(draft.kind, MintKind::Card);
        assert!(draft.card.is_none());
    }
}
