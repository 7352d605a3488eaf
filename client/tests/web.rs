#![cfg(target_arch = "wasm32")]

use promraw_client::card::{derive_card, render_card};
use promraw_client::leaderboard::rank_leaderboard;
use promraw_core::{CardMetadata, RarityTier};
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js(value: serde_json::Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap()
}

#[wasm_bindgen_test]
fn derive_card_from_js() {
    let scores = js(json!({
        "creativity": 0.85,
        "promptAdherence": 0.7,
        "artisticQuality": 0.9,
        "overall": 0.84,
    }));
    let card: CardMetadata = serde_wasm_bindgen::from_value(derive_card(scores).unwrap()).unwrap();
    assert_eq!(card.rarity, RarityTier::Epic);
    assert_eq!(card.hit_points, 84);
}

#[wasm_bindgen_test]
fn derive_card_rejects_garbage() {
    assert!(derive_card(JsValue::from_str("nope")).is_err());
}

#[wasm_bindgen_test]
fn render_card_preview() {
    let scores = js(json!({
        "creativity": 0.5,
        "promptAdherence": 0.5,
        "artisticQuality": 0.5,
        "overall": 0.5,
    }));
    let card = derive_card(scores).unwrap();
    let card: serde_json::Value = serde_wasm_bindgen::from_value(card).unwrap();
    let rendered = render_card(js(json!({ "image": "img", "card": card }))).unwrap();
    assert!(!rendered.is_null());
}

#[wasm_bindgen_test]
fn rank_from_js() {
    let entries = js(json!([
        { "username": "b", "score": 7.0 },
        { "username": "a", "score": 9.0 },
    ]));
    assert!(!rank_leaderboard(entries).unwrap().is_null());
}
