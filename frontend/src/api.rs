//! HTTP calls to the persistence backend.
//!
//! Sending, signing and template saves are fire-and-confirm POSTs; template
//! listing and loading are plain GETs. The caller turns each `Result` into a
//! toast or a stage transition.

use common::model::{SendRequest, SignRequest, Template, TemplateSummary};
use gloo_net::http::Request;

/// Sends the finished document to the patient for signing. Returns the
/// server-assigned document id.
pub async fn send_document(request: &SendRequest) -> Result<String, String> {
    let response = Request::post("/api/documents/send")
        .json(request)
        .map_err(|e| format!("failed to encode request: {e}"))?
        .send()
        .await
        .map_err(|e| format!("failed to reach server: {e}"))?;

    if response.status() == 200 {
        #[derive(serde::Deserialize)]
        struct SendResponse {
            #[serde(rename = "documentId")]
            document_id: String,
        }
        let body: SendResponse = response
            .json()
            .await
            .map_err(|e| format!("unexpected response: {e}"))?;
        Ok(body.document_id)
    } else {
        Err(format!("server returned status {}", response.status()))
    }
}

/// Persists the current field layout as a reusable template.
pub async fn save_template(request: &SendRequest) -> Result<(), String> {
    let response = Request::post("/api/templates/save")
        .json(request)
        .map_err(|e| format!("failed to encode request: {e}"))?
        .send()
        .await
        .map_err(|e| format!("failed to reach server: {e}"))?;

    if response.status() == 200 {
        Ok(())
    } else {
        Err(format!("server returned status {}", response.status()))
    }
}

/// Fetches the saved templates available to the picker.
pub async fn list_templates() -> Result<Vec<TemplateSummary>, String> {
    let response = Request::get("/api/templates")
        .send()
        .await
        .map_err(|e| format!("failed to reach server: {e}"))?;

    if response.status() == 200 {
        response
            .json()
            .await
            .map_err(|e| format!("unexpected response: {e}"))
    } else {
        Err(format!("server returned status {}", response.status()))
    }
}

/// Fetches one template with its full field layout.
pub async fn fetch_template(id: &str) -> Result<Template, String> {
    let response = Request::get(&format!("/api/templates/{id}"))
        .send()
        .await
        .map_err(|e| format!("failed to reach server: {e}"))?;

    if response.status() == 200 {
        response
            .json()
            .await
            .map_err(|e| format!("unexpected response: {e}"))
    } else {
        Err(format!("server returned status {}", response.status()))
    }
}

/// Submits the captured signature together with the audit trail.
pub async fn submit_signature(request: &SignRequest) -> Result<(), String> {
    let response = Request::post("/api/documents/sign")
        .json(request)
        .map_err(|e| format!("failed to encode request: {e}"))?
        .send()
        .await
        .map_err(|e| format!("failed to reach server: {e}"))?;

    if response.status() == 200 {
        Ok(())
    } else {
        Err(format!("server returned status {}", response.status()))
    }
}
