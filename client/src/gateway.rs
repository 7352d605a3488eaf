//! JavaScript-backed gateways.
//!
//! The page hands us plain objects wrapping its wallet library and pinning
//! service. Expected shape:
//!
//! ```text
//! wallet.account()                 -> string | null
//! wallet.chainId()                 -> number | null
//! wallet.switchChain(chainId)      -> Promise<void>
//! wallet.writeMint(call)           -> Promise<string>   // tx hash
//! wallet.waitForReceipt(hash)      -> Promise<"success" | "reverted">
//!
//! storage.uploadFile(bytes, name, mime) -> Promise<string>
//! storage.uploadJson(document)          -> Promise<string>
//! ```

use async_trait::async_trait;
use js_sys::{Array, Function, Promise, Reflect, Uint8Array};
use promraw_core::gateway::{MintCall, ReceiptStatus, StorageGateway, WalletGateway};
use promraw_core::log;
use promraw_core::{Address, ChainId, GatewayError, ImageBlob, Locator, TxHandle};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// EIP-1193 "user rejected request".
const USER_REJECTED: f64 = 4001.0;

pub struct JsWallet {
    inner: JsValue,
}

impl JsWallet {
    pub fn new(inner: JsValue) -> Self {
        Self { inner }
    }
}

#[async_trait(?Send)]
impl WalletGateway for JsWallet {
    fn connected_account(&self) -> Option<Address> {
        call_sync(&self.inner, "account")
            .and_then(|v| v.as_string())
            .filter(|a| !a.is_empty())
            .map(Address)
    }

    fn connected_network(&self) -> Option<ChainId> {
        call_sync(&self.inner, "chainId")
            .and_then(|v| v.as_f64())
            .filter(|id| *id >= 1.0)
            .map(|id| ChainId(id as u64))
    }

    async fn request_network_switch(&self, chain: ChainId) -> Result<(), GatewayError> {
        call_async(&self.inner, "switchChain", &[JsValue::from_f64(chain.0 as f64)]).await?;
        Ok(())
    }

    async fn submit_mint_transaction(&self, call: &MintCall) -> Result<TxHandle, GatewayError> {
        let call = to_js(call)?;
        let hash = call_async(&self.inner, "writeMint", &[call]).await?;
        hash.as_string()
            .map(TxHandle)
            .ok_or_else(|| GatewayError::Other("writeMint did not return a hash".to_string()))
    }

    async fn await_receipt(&self, tx: &TxHandle) -> Result<ReceiptStatus, GatewayError> {
        let status = call_async(&self.inner, "waitForReceipt", &[JsValue::from_str(&tx.0)]).await?;
        serde_wasm_bindgen::from_value(status)
            .map_err(|e| GatewayError::Other(format!("unexpected receipt status: {e}")))
    }
}

pub struct JsStorage {
    inner: JsValue,
}

impl JsStorage {
    pub fn new(inner: JsValue) -> Self {
        Self { inner }
    }
}

#[async_trait(?Send)]
impl StorageGateway for JsStorage {
    async fn upload_binary(
        &self,
        blob: &ImageBlob,
        filename: &str,
    ) -> Result<Locator, GatewayError> {
        let bytes = Uint8Array::from(blob.bytes.as_slice());
        let args = [
            bytes.into(),
            JsValue::from_str(filename),
            JsValue::from_str(&blob.mime),
        ];
        locator(call_async(&self.inner, "uploadFile", &args).await?)
    }

    async fn upload_json(&self, document: &serde_json::Value) -> Result<Locator, GatewayError> {
        let document = to_js(document)?;
        locator(call_async(&self.inner, "uploadJson", &[document]).await?)
    }
}

fn locator(value: JsValue) -> Result<Locator, GatewayError> {
    value
        .as_string()
        .filter(|s| !s.is_empty())
        .map(Locator)
        .ok_or_else(|| GatewayError::Other("storage returned no locator".to_string()))
}

/// Plain JS objects, not `Map`s, so the page can read fields directly.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, GatewayError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| GatewayError::Other(e.to_string()))
}

fn method(target: &JsValue, name: &str) -> Result<Function, GatewayError> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or_else(|| GatewayError::Unavailable(format!("`{name}` is not a function")))
}

fn call_sync(target: &JsValue, name: &str) -> Option<JsValue> {
    let f = method(target, name).ok()?;
    match f.call0(target) {
        Ok(v) if !v.is_null() && !v.is_undefined() => Some(v),
        Ok(_) => None,
        Err(e) => {
            log::warn(&format!("{name}() threw: {}", describe(&e)));
            None
        }
    }
}

async fn call_async(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, GatewayError> {
    let f = method(target, name)?;
    let args: Array = args.iter().collect();
    let ret = f.apply(target, &args).map_err(classify)?;
    JsFuture::from(Promise::resolve(&ret)).await.map_err(classify)
}

fn classify(err: JsValue) -> GatewayError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    let message = describe(&err);
    if code == Some(USER_REJECTED) {
        GatewayError::Rejected(message)
    } else {
        GatewayError::Other(message)
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}
