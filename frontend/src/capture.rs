//! Signature capture seam.
//!
//! Capture hardware and pads vary by deployment, so the signing flow talks
//! to a trait instead of a concrete widget. The default implementation
//! defers to a `captureSignature()` hook the host page installs on
//! `window`, which resolves to a data URL of the drawn signature; when the
//! hook is absent it falls back to a typed-name signature so the flow stays
//! usable in development.

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

pub trait SignatureCapture {
    /// Runs one capture interaction. `Ok(None)` means the user backed out.
    #[allow(async_fn_in_trait)]
    async fn capture(&self, signer_name: &str) -> Result<Option<String>, String>;
}

pub struct JsSignatureCapture;

impl SignatureCapture for JsSignatureCapture {
    async fn capture(&self, signer_name: &str) -> Result<Option<String>, String> {
        let window = web_sys::window().ok_or("no window")?;
        let hook = Reflect::get(window.as_ref(), &JsValue::from_str("captureSignature"))
            .unwrap_or(JsValue::UNDEFINED);

        let Some(hook) = hook.dyn_ref::<Function>() else {
            // No pad installed: sign with the typed name.
            return Ok(Some(format!("signed:{signer_name}")));
        };

        let result = hook
            .call1(&JsValue::NULL, &JsValue::from_str(signer_name))
            .map_err(|e| format!("captureSignature failed: {e:?}"))?;

        let value = match result.dyn_into::<Promise>() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .map_err(|e| format!("capture rejected: {e:?}"))?,
            Err(value) => value,
        };

        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        value
            .as_string()
            .map(Some)
            .ok_or_else(|| "captureSignature returned a non-string".into())
    }
}
