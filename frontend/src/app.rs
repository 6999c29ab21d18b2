//! Application shell: owns the session and drives the stage transitions
//! from authoring through signing to completion.

use common::model::{AuditEvent, DocumentSource, PatientDetails, SignRequest};
use gloo_console::warn;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::capture::{JsSignatureCapture, SignatureCapture};
use crate::components::editor::DoctorEditor;
use crate::components::viewer::DocumentViewer;
use crate::helpers::{now_iso, show_toast};
use crate::session::{Session, SessionHandle};

/// Demo source document; a host application would supply its own upload.
const DEMO_SOURCE_URL: &str = "/sample/consent-form.pdf";

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Doctor lays out fields on the document.
    Drafting,
    /// Patient reviews and signs.
    Review,
    Completed,
}

pub enum Msg {
    DocumentSent(String),
    SignRequested,
    SignatureCaptured(Option<String>),
    SubmitFinished(Result<(), String>),
    RestartSession,
}

pub struct App {
    session: SessionHandle,
    stage: Stage,
    signature: Option<String>,
    audit: Vec<AuditEvent>,
    submitting: bool,
}

fn fresh_session() -> SessionHandle {
    SessionHandle::new(Session::new_authoring(
        PatientDetails {
            id: String::new(),
            full_name: String::new(),
            email: String::new(),
            dob: String::new(),
            phone: None,
        },
        DocumentSource {
            url: DEMO_SOURCE_URL.to_string(),
            content_type: "application/pdf".to_string(),
        },
    ))
}

impl App {
    fn record_audit(&mut self, action: &str, details: String) {
        let actor = {
            let session = self.session.borrow();
            if session.patient.full_name.is_empty() {
                "patient".to_string()
            } else {
                session.patient.full_name.clone()
            }
        };
        self.audit.push(AuditEvent {
            timestamp: now_iso(),
            action: action.to_string(),
            actor,
            details,
        });
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            session: fresh_session(),
            stage: Stage::Drafting,
            signature: None,
            audit: Vec::new(),
            submitting: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::DocumentSent(document_id) => {
                self.stage = Stage::Review;
                self.record_audit("DOCUMENT_VIEWED", format!("document {document_id} opened"));
                true
            }
            Msg::SignRequested => {
                self.record_audit("CONSENT_ACCEPTED", "patient confirmed identity".into());
                let signer = self.session.borrow().patient.full_name.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match JsSignatureCapture.capture(&signer).await {
                        Ok(signature) => link.send_message(Msg::SignatureCaptured(signature)),
                        Err(error) => {
                            warn!(format!("signature capture failed: {error}"));
                            show_toast("Signature capture failed.");
                            link.send_message(Msg::SignatureCaptured(None));
                        }
                    }
                });
                false
            }
            Msg::SignatureCaptured(None) => false,
            Msg::SignatureCaptured(Some(signature)) => {
                self.signature = Some(signature.clone());
                self.record_audit("DOCUMENT_SIGNED", "signature captured".into());
                self.submitting = true;

                let request = {
                    let mut session = self.session.borrow_mut();
                    session.signature = Some(signature.clone());
                    // Stamp the signature into every signature field so the
                    // persisted layout carries it too.
                    let ids: Vec<String> = session
                        .store
                        .fields()
                        .iter()
                        .filter(|f| f.is_signature())
                        .map(|f| f.id().to_string())
                        .collect();
                    for id in ids {
                        let value = signature.clone();
                        let _ = session.store.update_field(&id, |f| f.set_value(value));
                    }
                    SignRequest {
                        document_id: session.document_id.clone().unwrap_or_default(),
                        signature,
                        audit_events: self.audit.clone(),
                    }
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api::submit_signature(&request).await;
                    link.send_message(Msg::SubmitFinished(result));
                });
                true
            }
            Msg::SubmitFinished(result) => {
                self.submitting = false;
                match result {
                    Ok(()) => {
                        self.stage = Stage::Completed;
                        show_toast("Consent signed and recorded.");
                    }
                    Err(error) => {
                        warn!(format!("signature submission failed: {error}"));
                        show_toast("Could not record the signature. Please retry.");
                    }
                }
                true
            }
            Msg::RestartSession => {
                self.session = fresh_session();
                self.stage = Stage::Drafting;
                self.signature = None;
                self.audit.clear();
                self.submitting = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div style="display: flex; flex-direction: column; min-height: 100vh;">
                { self.render_header() }
                { match self.stage {
                    Stage::Drafting => html! {
                        <DoctorEditor
                            session={self.session.clone()}
                            on_sent={ctx.link().callback(Msg::DocumentSent)}
                        />
                    },
                    Stage::Review => html! {
                        <DocumentViewer
                            session={self.session.clone()}
                            signature={self.signature.clone().map(AttrValue::from)}
                            on_sign={ctx.link().callback(|_| Msg::SignRequested)}
                        />
                    },
                    Stage::Completed => self.render_completed(ctx),
                } }
            </div>
        }
    }
}

impl App {
    fn render_header(&self) -> Html {
        let (label, color) = match self.stage {
            Stage::Drafting => ("Prepare document", "#2563eb"),
            Stage::Review => ("Review & sign", "#d97706"),
            Stage::Completed => ("Completed", "#16a34a"),
        };
        let session = self.session.borrow();
        html! {
            <div style="display: flex; align-items: center; justify-content: space-between; \
                        padding: 10px 20px; background: #fff; border-bottom: 1px solid #e2e8f0; \
                        font-family: Arial, sans-serif;">
                <div style="font-weight: bold; color: #0f172a;">
                    { session.meta.clinic_name.clone() }
                </div>
                <div style={format!("font-size: 13px; color: {color};")}>{ label }</div>
            </div>
        }
    }

    fn render_completed(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div style="flex: 1; display: flex; flex-direction: column; align-items: center; \
                        justify-content: center; gap: 12px; background: #f1f5f9; \
                        font-family: Arial, sans-serif;">
                <div style="font-size: 40px;">{ "✓" }</div>
                <h2 style="margin: 0; color: #0f172a;">{ "Consent recorded" }</h2>
                <p style="color: #475569;">
                    { "The signed document and its audit trail have been stored." }
                </p>
                <button
                    style="padding: 8px 16px; border: none; border-radius: 4px; \
                           background: #2563eb; color: #fff; cursor: pointer;"
                    onclick={ctx.link().callback(|_| Msg::RestartSession)}
                >
                    { "Start a new session" }
                </button>
            </div>
        }
    }
}
