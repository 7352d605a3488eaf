//! Error types for card derivation, export and minting.
//!
//! Every mint failure is terminal for that attempt and never retried here;
//! a retry is a fresh attempt started by the user.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid score input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("score `{field}` is not a finite number")]
    NotFinite { field: &'static str },

    #[error("score `{field}` is {value}, expected a value between 0 and 1")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Image bytes could not be obtained from a data URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("not a data URL")]
    NotADataUrl,

    #[error("data URL is not base64 encoded")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Decode(String),

    #[error("image is empty")]
    Empty,
}

/// Invalid mint configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(String),

    #[error("target chain id must be non-zero")]
    ZeroChainId,

    #[error("mint contract address is not set")]
    MissingContract,

    #[error("malformed mint contract address: {0}")]
    MalformedContract(String),
}

/// Failure reported by a wallet, chain or storage collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "reason", rename_all = "camelCase")]
pub enum GatewayError {
    /// The user declined the request in their wallet.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("timed out")]
    Timeout,

    /// Connection dropped or provider missing.
    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

/// Broad classification of mint failures for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MintErrorKind {
    /// Missing image, metadata or account. The user fixes the input and retries.
    InputValidation,
    /// Wrong network. Recoverable by switching and retrying.
    NetworkMismatch,
    Upload,
    /// Submission or confirmation.
    Transaction,
    Interrupted,
}

/// Terminal reason for a failed mint attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MintFailure {
    #[error("no image to mint")]
    MissingImage,

    #[error("card metadata is required to mint a full card")]
    MissingMetadata,

    #[error("no wallet account connected")]
    WalletNotConnected,

    #[error("network switch failed: {reason}")]
    NetworkSwitchFailed { reason: String },

    #[error("image upload failed: {reason}")]
    UploadFailed { reason: String },

    #[error("metadata upload failed: {reason}")]
    MetadataUploadFailed { reason: String },

    #[error("mint transaction rejected or failed: {reason}")]
    TransactionRejectedOrFailed { reason: String },

    #[error("mint transaction {tx} reverted")]
    TransactionReverted { tx: String },

    #[error("could not confirm mint transaction: {reason}")]
    ConfirmationError { reason: String },

    /// The attempt was abandoned before reaching a terminal state.
    #[error("mint attempt was interrupted")]
    Interrupted,
}

impl MintFailure {
    pub fn kind(&self) -> MintErrorKind {
        match self {
            MintFailure::MissingImage
            | MintFailure::MissingMetadata
            | MintFailure::WalletNotConnected => MintErrorKind::InputValidation,
            MintFailure::NetworkSwitchFailed { .. } => MintErrorKind::NetworkMismatch,
            MintFailure::UploadFailed { .. } | MintFailure::MetadataUploadFailed { .. } => {
                MintErrorKind::Upload
            }
            MintFailure::TransactionRejectedOrFailed { .. }
            | MintFailure::TransactionReverted { .. }
            | MintFailure::ConfirmationError { .. } => MintErrorKind::Transaction,
            MintFailure::Interrupted => MintErrorKind::Interrupted,
        }
    }

    /// Message telling the user what to do next.
    pub fn user_message(&self) -> String {
        match self {
            MintFailure::MissingImage => "Missing image. Draw something first.".to_string(),
            MintFailure::MissingMetadata => {
                "Missing metadata for card minting. Submit your drawing for scoring first."
                    .to_string()
            }
            MintFailure::WalletNotConnected => "Please connect your wallet first.".to_string(),
            MintFailure::NetworkSwitchFailed { .. } => {
                "Failed to switch network. Please switch to the minting network manually."
                    .to_string()
            }
            MintFailure::UploadFailed { reason } => {
                format!("Could not upload your image ({reason}). Please try again.")
            }
            MintFailure::MetadataUploadFailed { reason } => {
                format!("Could not upload the NFT metadata ({reason}). Please try again.")
            }
            MintFailure::TransactionRejectedOrFailed { reason } => {
                format!("The mint transaction was not sent ({reason}). Please try again.")
            }
            MintFailure::TransactionReverted { tx } => {
                format!("Transaction {tx} failed on chain. Please try again.")
            }
            MintFailure::ConfirmationError { reason } => format!(
                "Could not confirm your transaction ({reason}). Check your wallet before retrying."
            ),
            MintFailure::Interrupted => {
                "Minting was interrupted. Please try again.".to_string()
            }
        }
    }
}

/// Card rasterization failed. Only the export feature is affected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("card export failed: {reason}")]
    ExportFailed { reason: String },
}
