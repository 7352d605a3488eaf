//! Promraw core: turns drawing scores into trading cards and drives NFT
//! minting through injected wallet and storage gateways.

pub mod config;
pub mod derive;
pub mod error;
pub mod gateway;
pub mod leaderboard;
pub mod log;
pub mod metadata;
pub mod mint;
pub mod render;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::MintConfig;
pub use derive::derive;
pub use error::*;
pub use mint::{MintController, MintDraft, MintKind, MintOutcome, MintState, Quantity};
pub use render::{export, render, CardStyle, RenderedCard};
pub use types::*;
