//! Capability traits for the collaborators the core never implements itself:
//! the wallet/chain provider, content-addressed storage, the drawing canvas
//! and the card rasterizer.
//!
//! All async traits are `?Send`. In the browser they are backed by JavaScript
//! promises, which cannot cross threads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::render::RenderedCard;
use crate::types::{Address, ChainId, ImageBlob, Locator, TxHandle};

/// Parameters of a mint transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintCall {
    /// Mint contract address.
    pub contract: String,
    /// Locator of the uploaded metadata document.
    pub token_uri: Locator,
    pub quantity: u32,
    pub minter: Address,
}

/// Final status reported in a transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Wallet connection and chain access. Read-only for everything but the
/// explicit requests.
#[async_trait(?Send)]
pub trait WalletGateway {
    /// Connected account, if any.
    fn connected_account(&self) -> Option<Address>;

    /// Network the wallet is currently on, if known.
    fn connected_network(&self) -> Option<ChainId>;

    /// Ask the wallet to switch networks. Connection state may be
    /// reinitialised afterwards.
    async fn request_network_switch(&self, chain: ChainId) -> Result<(), GatewayError>;

    /// Submit the mint transaction. A user rejection in the wallet is an error.
    async fn submit_mint_transaction(&self, call: &MintCall) -> Result<TxHandle, GatewayError>;

    /// Wait for the transaction to be final.
    async fn await_receipt(&self, tx: &TxHandle) -> Result<ReceiptStatus, GatewayError>;
}

/// Content-addressed storage such as an IPFS pinning service.
#[async_trait(?Send)]
pub trait StorageGateway {
    async fn upload_binary(&self, blob: &ImageBlob, filename: &str)
        -> Result<Locator, GatewayError>;

    async fn upload_json(&self, document: &serde_json::Value) -> Result<Locator, GatewayError>;
}

/// Live access to the drawing canvas.
pub trait DrawingSurface {
    /// Capture the current drawing, or `None` if there is no canvas.
    fn capture(&self) -> Option<ImageBlob>;
}

/// Turns a rendered card into pixels.
#[async_trait(?Send)]
pub trait CardRasterizer {
    /// Draw `card` at `scale` times its layout size and encode it. The error
    /// is a human-readable reason.
    async fn rasterize(&self, card: &RenderedCard, scale: u32) -> Result<ImageBlob, String>;
}
