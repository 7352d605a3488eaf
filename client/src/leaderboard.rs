//! Leaderboard binding.

use promraw_core::leaderboard::{self, LeaderboardEntry};
use wasm_bindgen::prelude::*;

/// Rank raw entries for display.
#[wasm_bindgen]
pub fn rank_leaderboard(entries_js: JsValue) -> Result<JsValue, String> {
    let entries: Vec<LeaderboardEntry> = serde_wasm_bindgen::from_value(entries_js)
        .map_err(|e| format!("Failed to parse leaderboard: {:?}", e))?;
    let ranked = leaderboard::rank(entries);
    serde_wasm_bindgen::to_value(&ranked).map_err(|e| format!("{:?}", e))
}
