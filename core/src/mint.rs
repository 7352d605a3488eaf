//! Mint workflow controller.
//!
//! One attempt walks through
//!
//! ```text
//! Idle -> ValidatingInputs -> AwaitingNetworkSwitch -> UploadingImage
//!      -> UploadingMetadata -> SubmittingTransaction -> AwaitingConfirmation
//!      -> Succeeded | Failed
//! ```
//!
//! Each stage finishes before the next one starts and the controller only
//! suspends inside gateway calls. Nothing is retried: a failure ends the
//! attempt and the user starts a new one. A network switch also ends the
//! attempt (back in `Idle`) because the wallet may reinitialise its
//! connection after switching.
//!
//! There is no cancel operation. Dropping the `mint` future (e.g. leaving the
//! page) abandons the attempt; the in-flight flag is still released and the
//! state becomes `Failed(Interrupted)`.

use std::cell::{Cell, RefCell};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MintConfig;
use crate::error::MintFailure;
use crate::gateway::{DrawingSurface, MintCall, ReceiptStatus, StorageGateway, WalletGateway};
use crate::log;
use crate::metadata::MetadataDocument;
use crate::types::{Address, CardMetadata, ImageBlob, Locator, TxHandle};

/// File name given to the uploaded drawing.
pub const IMAGE_FILE_NAME: &str = "nft-image.png";

/// What the user asked to mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MintKind {
    /// Just the drawing
    #[default]
    Drawing,
    /// Full card with scores
    Card,
}

/// Number of tokens to mint, at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(n: u32) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    /// Parse the amount field. Empty, non-numeric or zero input means one.
    pub fn parse(input: &str) -> Self {
        input
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .unwrap_or(Self::ONE)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = String;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n).ok_or_else(|| "quantity must be at least 1".to_string())
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> u32 {
        q.0
    }
}

/// Raw input of the mint form, before validation.
#[derive(Debug, Clone, Default)]
pub struct MintDraft {
    pub kind: MintKind,
    /// Previously captured drawing. When absent the controller re-captures
    /// from its drawing surface.
    pub image: Option<ImageBlob>,
    /// Why a supplied image could not be read. Set, the attempt fails with
    /// `MissingImage` instead of re-capturing.
    pub image_error: Option<String>,
    pub card: Option<CardMetadata>,
    /// Optional user title, replaces the default token name.
    pub title: Option<String>,
    pub quantity: Quantity,
}

impl MintDraft {
    pub fn drawing(image: Option<ImageBlob>) -> Self {
        Self {
            kind: MintKind::Drawing,
            image,
            ..Default::default()
        }
    }

    pub fn card(image: Option<ImageBlob>, card: Option<CardMetadata>) -> Self {
        Self {
            kind: MintKind::Card,
            image,
            card,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    /// The caller supplied an image that could not be read.
    pub fn with_unreadable_image(mut self, reason: &str) -> Self {
        self.image = None;
        self.image_error = Some(reason.to_string());
        self
    }
}

/// A validated mint request. The image is never empty.
#[derive(Debug, Clone, PartialEq)]
pub enum MintRequest {
    DrawingOnly { image: ImageBlob },
    FullCard { image: ImageBlob, card: CardMetadata },
}

impl MintRequest {
    pub fn kind(&self) -> MintKind {
        match self {
            MintRequest::DrawingOnly { .. } => MintKind::Drawing,
            MintRequest::FullCard { .. } => MintKind::Card,
        }
    }

    pub fn image(&self) -> &ImageBlob {
        match self {
            MintRequest::DrawingOnly { image } | MintRequest::FullCard { image, .. } => image,
        }
    }

    /// Metadata document pointing at the uploaded image.
    pub fn document(&self, image: Locator, title: Option<&str>) -> MetadataDocument {
        match self {
            MintRequest::DrawingOnly { .. } => MetadataDocument::drawing(image, title),
            MintRequest::FullCard { card, .. } => MetadataDocument::card(image, card, title),
        }
    }
}

/// What a successful mint produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintReceipt {
    pub kind: MintKind,
    pub tx: TxHandle,
    pub image: Locator,
    pub token_uri: Locator,
    pub quantity: u32,
}

/// Workflow state of the current (or last) attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MintState {
    #[default]
    Idle,
    ValidatingInputs,
    AwaitingNetworkSwitch,
    UploadingImage,
    UploadingMetadata,
    SubmittingTransaction,
    AwaitingConfirmation,
    Succeeded { receipt: MintReceipt },
    Failed { failure: MintFailure },
}

impl MintState {
    pub fn label(&self) -> &'static str {
        match self {
            MintState::Idle => "Idle",
            MintState::ValidatingInputs => "ValidatingInputs",
            MintState::AwaitingNetworkSwitch => "AwaitingNetworkSwitch",
            MintState::UploadingImage => "UploadingImage",
            MintState::UploadingMetadata => "UploadingMetadata",
            MintState::SubmittingTransaction => "SubmittingTransaction",
            MintState::AwaitingConfirmation => "AwaitingConfirmation",
            MintState::Succeeded { .. } => "Succeeded",
            MintState::Failed { .. } => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MintState::Succeeded { .. } | MintState::Failed { .. })
    }

    /// An attempt is between its first and last stage.
    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal() && *self != MintState::Idle
    }
}

impl fmt::Display for MintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one call to [`MintController::mint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum MintOutcome {
    Succeeded { receipt: MintReceipt },
    /// The wallet switched to the target network. Nothing was minted; the
    /// user has to confirm again.
    NetworkSwitched,
    Failed { failure: MintFailure, message: String },
    /// Another attempt is still running. Nothing was done.
    Busy,
}

/// Called with every new state.
pub type TransitionListener = Box<dyn Fn(&MintState)>;

struct Validated {
    request: MintRequest,
    minter: Address,
    title: Option<String>,
    quantity: Quantity,
}

enum Progress {
    Minted(MintReceipt),
    SwitchedNetwork,
}

/// Drives mint attempts against injected wallet and storage gateways.
pub struct MintController<W, S> {
    wallet: W,
    storage: S,
    config: MintConfig,
    surface: Option<Box<dyn DrawingSurface>>,
    listener: Option<TransitionListener>,
    state: RefCell<MintState>,
    minting: Cell<bool>,
}

impl<W, S> MintController<W, S>
where
    W: WalletGateway,
    S: StorageGateway,
{
    pub fn new(wallet: W, storage: S, config: MintConfig) -> Self {
        Self {
            wallet,
            storage,
            config,
            surface: None,
            listener: None,
            state: RefCell::new(MintState::Idle),
            minting: Cell::new(false),
        }
    }

    /// Canvas to re-capture from when a draft carries no image.
    pub fn with_surface(mut self, surface: impl DrawingSurface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    pub fn with_listener(mut self, listener: impl Fn(&MintState) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// True while an attempt is running. New attempts are refused meanwhile.
    pub fn is_minting(&self) -> bool {
        self.minting.get()
    }

    pub fn state(&self) -> MintState {
        self.state.borrow().clone()
    }

    pub fn config(&self) -> &MintConfig {
        &self.config
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Return a finished controller to `Idle`. Refused while minting.
    pub fn reset(&self) -> bool {
        if self.is_minting() {
            return false;
        }
        if *self.state.borrow() != MintState::Idle {
            self.transition(MintState::Idle);
        }
        true
    }

    /// Run one mint attempt to completion.
    ///
    /// The in-flight flag is already clear when the listener sees the final
    /// state of the attempt.
    pub async fn mint(&self, draft: MintDraft) -> MintOutcome {
        if self.minting.get() {
            log::warn("mint requested while another attempt is in flight");
            return MintOutcome::Busy;
        }
        let flight = InFlight::begin(&self.minting, &self.state);
        log::action(
            "mint",
            &format!("kind={:?}, quantity={}", draft.kind, draft.quantity.get()),
        );

        let (next, outcome) = match self.run(draft).await {
            Ok(Progress::Minted(receipt)) => {
                log::result(true, &format!("minted in {}", receipt.tx));
                (
                    MintState::Succeeded {
                        receipt: receipt.clone(),
                    },
                    MintOutcome::Succeeded { receipt },
                )
            }
            Ok(Progress::SwitchedNetwork) => (MintState::Idle, MintOutcome::NetworkSwitched),
            Err(failure) => {
                log::result(false, &failure.to_string());
                let message = failure.user_message();
                (
                    MintState::Failed {
                        failure: failure.clone(),
                    },
                    MintOutcome::Failed { failure, message },
                )
            }
        };
        flight.land();
        self.transition(next);
        outcome
    }

    async fn run(&self, draft: MintDraft) -> Result<Progress, MintFailure> {
        self.transition(MintState::ValidatingInputs);
        let Validated {
            request,
            minter,
            title,
            quantity,
        } = self.validate(draft)?;

        let target = self.config.target_chain_id;
        if self.wallet.connected_network() != Some(target) {
            self.transition(MintState::AwaitingNetworkSwitch);
            self.wallet
                .request_network_switch(target)
                .await
                .map_err(|e| MintFailure::NetworkSwitchFailed {
                    reason: e.to_string(),
                })?;
            log::info("network switched, waiting for the user to retry");
            return Ok(Progress::SwitchedNetwork);
        }

        self.transition(MintState::UploadingImage);
        let image = self
            .storage
            .upload_binary(request.image(), IMAGE_FILE_NAME)
            .await
            .map_err(|e| MintFailure::UploadFailed {
                reason: e.to_string(),
            })?;
        log::debug("mint", &format!("image uploaded to {image}"));

        self.transition(MintState::UploadingMetadata);
        let document = request
            .document(image.clone(), title.as_deref())
            .to_json()
            .map_err(|e| {
                log::error(&format!("metadata document not serializable: {e}"));
                MintFailure::MetadataUploadFailed {
                    reason: e.to_string(),
                }
            })?;
        let token_uri = self
            .storage
            .upload_json(&document)
            .await
            .map_err(|e| MintFailure::MetadataUploadFailed {
                reason: e.to_string(),
            })?;
        log::debug("mint", &format!("metadata uploaded to {token_uri}"));

        self.transition(MintState::SubmittingTransaction);
        let call = MintCall {
            contract: self.config.contract_address.clone(),
            token_uri: token_uri.clone(),
            quantity: quantity.get(),
            minter,
        };
        let tx = self
            .wallet
            .submit_mint_transaction(&call)
            .await
            .map_err(|e| MintFailure::TransactionRejectedOrFailed {
                reason: e.to_string(),
            })?;

        self.transition(MintState::AwaitingConfirmation);
        match self.wallet.await_receipt(&tx).await {
            Ok(ReceiptStatus::Success) => Ok(Progress::Minted(MintReceipt {
                kind: request.kind(),
                tx,
                image,
                token_uri,
                quantity: quantity.get(),
            })),
            Ok(ReceiptStatus::Reverted) => Err(MintFailure::TransactionReverted { tx: tx.0 }),
            Err(e) => Err(MintFailure::ConfirmationError {
                reason: e.to_string(),
            }),
        }
    }

    /// Guards, in order: image, card metadata, connected account.
    fn validate(&self, draft: MintDraft) -> Result<Validated, MintFailure> {
        if let Some(reason) = &draft.image_error {
            log::warn(&format!("supplied image unreadable: {reason}"));
            return Err(MintFailure::MissingImage);
        }
        let image = draft
            .image
            .filter(|blob| !blob.is_empty())
            .or_else(|| self.recapture())
            .ok_or(MintFailure::MissingImage)?;

        let request = match draft.kind {
            MintKind::Drawing => MintRequest::DrawingOnly { image },
            MintKind::Card => MintRequest::FullCard {
                image,
                card: draft.card.ok_or(MintFailure::MissingMetadata)?,
            },
        };

        let minter = self
            .wallet
            .connected_account()
            .ok_or(MintFailure::WalletNotConnected)?;

        Ok(Validated {
            request,
            minter,
            title: draft.title,
            quantity: draft.quantity,
        })
    }

    fn recapture(&self) -> Option<ImageBlob> {
        let blob = self.surface.as_ref()?.capture()?;
        if blob.is_empty() {
            return None;
        }
        log::debug("mint", "using live capture of the drawing surface");
        Some(blob)
    }

    fn transition(&self, next: MintState) {
        let prev = self.state.replace(next.clone());
        log::transition(prev.label(), next.label());
        if let Some(listener) = &self.listener {
            listener(&next);
        }
    }
}

/// Holds the in-flight flag for one attempt and always releases it, even if
/// the attempt panics or its future is dropped.
struct InFlight<'a> {
    minting: &'a Cell<bool>,
    state: &'a RefCell<MintState>,
    landed: bool,
}

impl<'a> InFlight<'a> {
    fn begin(minting: &'a Cell<bool>, state: &'a RefCell<MintState>) -> Self {
        minting.set(true);
        Self {
            minting,
            state,
            landed: false,
        }
    }

    /// The attempt reached its outcome; release the flag before the final
    /// transition is announced.
    fn land(mut self) {
        self.landed = true;
        self.minting.set(false);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.landed {
            if let Ok(mut state) = self.state.try_borrow_mut() {
                if state.is_in_flight() {
                    log::warn(&format!("mint attempt abandoned during {}", state.label()));
                    *state = MintState::Failed {
                        failure: MintFailure::Interrupted,
                    };
                }
            }
        }
        self.minting.set(false);
    }
}
