mod derive;

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::config::MintConfig;
use crate::error::GatewayError;
use crate::gateway::{
    CardRasterizer, DrawingSurface, MintCall, ReceiptStatus, StorageGateway, WalletGateway,
};
use crate::render::RenderedCard;
use crate::types::*;

// ==========================================
// HELPER FUNCTIONS (Boilerplate Reduction)
// ==========================================

const TARGET_CHAIN: u64 = 999_999_999;
const CONTRACT: &str = "0x1111111111111111111111111111111111111111";

fn scores(creativity: f64, adherence: f64, quality: f64, overall: f64) -> ScoreSet {
    ScoreSet {
        creativity,
        prompt_adherence: adherence,
        artistic_quality: quality,
        overall,
    }
}

fn sample_scores() -> ScoreSet {
    scores(0.85, 0.7, 0.9, 0.84)
}

fn sample_card() -> CardMetadata {
    crate::derive::derive(&sample_scores())
}

fn png(bytes: &[u8]) -> ImageBlob {
    ImageBlob::png(bytes.to_vec())
}

fn test_config() -> MintConfig {
    MintConfig::new(TARGET_CHAIN, CONTRACT).expect("valid test config")
}

/// Ordered record of every gateway call, shared between mocks.
type CallLog = Rc<RefCell<Vec<String>>>;

fn calls(log: &CallLog) -> Vec<String> {
    log.borrow().clone()
}

// ==========================================
// MOCK GATEWAYS
// ==========================================

struct MockWallet {
    account: Option<Address>,
    network: Option<ChainId>,
    switch_result: Result<(), GatewayError>,
    submit_result: Result<TxHandle, GatewayError>,
    receipt_result: Result<ReceiptStatus, GatewayError>,
    submitted: RefCell<Vec<MintCall>>,
    log: CallLog,
}

impl MockWallet {
    /// Connected on the target network; every call succeeds.
    fn ready(log: &CallLog) -> Self {
        Self {
            account: Some(Address("0xabc".to_string())),
            network: Some(ChainId(TARGET_CHAIN)),
            switch_result: Ok(()),
            submit_result: Ok(TxHandle("0xfeed".to_string())),
            receipt_result: Ok(ReceiptStatus::Success),
            submitted: RefCell::new(Vec::new()),
            log: log.clone(),
        }
    }
}

#[async_trait(?Send)]
impl WalletGateway for MockWallet {
    fn connected_account(&self) -> Option<Address> {
        self.account.clone()
    }

    fn connected_network(&self) -> Option<ChainId> {
        self.network
    }

    async fn request_network_switch(&self, chain: ChainId) -> Result<(), GatewayError> {
        self.log.borrow_mut().push(format!("switch:{chain}"));
        self.switch_result.clone()
    }

    async fn submit_mint_transaction(&self, call: &MintCall) -> Result<TxHandle, GatewayError> {
        self.log.borrow_mut().push("submit".to_string());
        self.submitted.borrow_mut().push(call.clone());
        self.submit_result.clone()
    }

    async fn await_receipt(&self, tx: &TxHandle) -> Result<ReceiptStatus, GatewayError> {
        self.log.borrow_mut().push(format!("receipt:{tx}"));
        self.receipt_result.clone()
    }
}

struct MockStorage {
    binary_result: Result<Locator, GatewayError>,
    json_result: Result<Locator, GatewayError>,
    documents: RefCell<Vec<serde_json::Value>>,
    log: CallLog,
}

impl MockStorage {
    fn ready(log: &CallLog) -> Self {
        Self {
            binary_result: Ok(Locator("ipfs://image".to_string())),
            json_result: Ok(Locator("ipfs://metadata".to_string())),
            documents: RefCell::new(Vec::new()),
            log: log.clone(),
        }
    }
}

#[async_trait(?Send)]
impl StorageGateway for MockStorage {
    async fn upload_binary(
        &self,
        blob: &ImageBlob,
        filename: &str,
    ) -> Result<Locator, GatewayError> {
        self.log
            .borrow_mut()
            .push(format!("upload_binary:{filename}:{}", blob.len()));
        self.binary_result.clone()
    }

    async fn upload_json(&self, document: &serde_json::Value) -> Result<Locator, GatewayError> {
        self.log.borrow_mut().push("upload_json".to_string());
        self.documents.borrow_mut().push(document.clone());
        self.json_result.clone()
    }
}

/// Canvas stub returning a fixed capture.
struct FixedSurface(Option<ImageBlob>);

impl DrawingSurface for FixedSurface {
    fn capture(&self) -> Option<ImageBlob> {
        self.0.clone()
    }
}

/// Rasterizer stub recording the requested scale.
struct StubRasterizer {
    result: Result<ImageBlob, String>,
    scales: RefCell<Vec<u32>>,
}

impl StubRasterizer {
    fn returning(result: Result<ImageBlob, String>) -> Self {
        Self {
            result,
            scales: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl CardRasterizer for StubRasterizer {
    async fn rasterize(&self, _card: &RenderedCard, scale: u32) -> Result<ImageBlob, String> {
        self.scales.borrow_mut().push(scale);
        self.result.clone()
    }
}
