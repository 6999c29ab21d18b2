//! Explicit session state for one authoring or signing session.
//!
//! Where the original application kept a process-wide store, the session is
//! an explicitly constructed value owned by the top-level `App` and passed
//! down as a cheap handle. It is created when a session starts and replaced
//! wholesale on reset, which makes the lifecycle visible in the code that
//! owns it.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use common::binding::{sync_bound_fields, DataSources};
use common::geometry::FieldGeometry;
use common::model::{
    DocumentMeta, DocumentSource, Field, PatientDetails, SignatureField, SourceKey, TextField,
    TextStyle,
};
use common::model::field::{FontWeight, TextAlign, TITLE_FIELD_PREFIX};
use common::store::FieldStore;
use uuid::Uuid;

use crate::helpers::today_string;
use crate::rasterizer::Rasterizer;

/// The palette of fields the sidebar can place. Title is a preset text
/// field, not a distinct kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPreset {
    Title,
    Text,
    Date,
    Signature,
}

pub struct Session {
    pub patient: PatientDetails,
    pub meta: DocumentMeta,
    pub source: Option<DocumentSource>,
    /// Last known good preview image, the fallback when rasterization fails.
    pub preview_url: Option<String>,
    pub document_id: Option<String>,
    pub signature: Option<String>,
    pub store: FieldStore,
    pub sources: DataSources,
    pub rasterizer: Rc<Rasterizer>,
}

impl Session {
    pub fn new_authoring(patient: PatientDetails, source: DocumentSource) -> Self {
        let meta = DocumentMeta {
            procedure_name: String::new(),
            doctor_name: "Dr. Michael Chen".into(),
            clinic_name: "Wizex Medical Center".into(),
            generated_date: today_string(),
        };
        let sources = DataSources::from_session(&patient, &meta, &today_string());
        Self {
            patient,
            meta,
            source: Some(source),
            preview_url: None,
            document_id: None,
            signature: None,
            store: FieldStore::new(),
            sources,
            rasterizer: Rc::new(Rasterizer::new()),
        }
    }

    /// Rebuilds the data sources from the current patient/meta values and
    /// pushes them into every bound field. Called synchronously from the
    /// edit that changed the data, so bound fields never lag.
    pub fn refresh_bindings(&mut self) -> usize {
        self.sources = DataSources::from_session(&self.patient, &self.meta, &today_string());
        sync_bound_fields(&mut self.store, &self.sources)
    }

    /// The file reference handed to the persistence collaborator.
    pub fn file_url(&self) -> String {
        self.source
            .as_ref()
            .map(|s| s.url.clone())
            .or_else(|| self.preview_url.clone())
            .unwrap_or_default()
    }

    /// Builds a palette field with the original editor's preset geometry
    /// and bindings, placed on the given page.
    pub fn preset_field(&self, preset: FieldPreset, page: u32) -> Field {
        let id = Uuid::new_v4().to_string();
        match preset {
            FieldPreset::Title => Field::Text(TextField {
                id: format!("{TITLE_FIELD_PREFIX}-{id}"),
                label: "Header Title".into(),
                page,
                geometry: FieldGeometry::new(5.0, 5.0, 90.0, 6.0),
                value: if self.meta.procedure_name.is_empty() {
                    "DOCUMENT TITLE".into()
                } else {
                    self.meta.procedure_name.to_uppercase()
                },
                style: TextStyle {
                    font_size: 24,
                    font_weight: FontWeight::Bold,
                    text_align: TextAlign::Center,
                },
                source: None,
            }),
            FieldPreset::Text => Field::Text(TextField {
                id,
                label: "Patient Name".into(),
                page,
                geometry: FieldGeometry::new(35.0, 45.0, 25.0, 3.0),
                value: self.patient.full_name.clone(),
                style: TextStyle::default(),
                source: Some(SourceKey::PatientFullName),
            }),
            FieldPreset::Date => Field::Date(TextField {
                id,
                label: "Date".into(),
                page,
                geometry: FieldGeometry::new(75.0, 19.5, 15.0, 2.5),
                value: today_string(),
                style: TextStyle::default(),
                source: Some(SourceKey::MetaDate),
            }),
            FieldPreset::Signature => Field::Signature(SignatureField {
                id,
                label: "Sign Here".into(),
                page,
                geometry: FieldGeometry::new(35.0, 45.0, 30.0, 5.0),
                value: String::new(),
            }),
        }
    }

    /// Seeds the fields a freshly uploaded document starts with: a title
    /// header and an automatic date, like the original authoring flow.
    pub fn seed_default_fields(&mut self) {
        let title = self.preset_field(FieldPreset::Title, 1);
        let date = self.preset_field(FieldPreset::Date, 1);
        // Fresh ids on a fresh store; duplicates are impossible here.
        let _ = self.store.add_field(title);
        let _ = self.store.add_field(date);
    }
}

/// Shared handle to the session, compared by identity so Yew re-renders on
/// session replacement but not on every interior mutation (the store's
/// subscriptions cover those).
#[derive(Clone)]
pub struct SessionHandle(Rc<RefCell<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Rc::new(RefCell::new(session)))
    }

    pub fn borrow(&self) -> Ref<'_, Session> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Session> {
        self.0.borrow_mut()
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
