//! Messages for the authoring editor component.

use std::rc::Rc;

use common::geometry::ResizeHandle;
use common::model::field::TextAlign;
use common::model::{PageImage, Template, TemplateSummary};

use crate::session::FieldPreset;

pub enum Msg {
    /// The field store notified a mutation; re-render.
    StoreChanged,

    // Rasterization
    BeginRasterize,
    RasterReady {
        generation: u64,
        result: Result<Rc<Vec<PageImage>>, String>,
    },
    ViewportChanged,

    // Canvas gestures. Coordinates are client-space pixels; only deltas
    // against the gesture start are ever used.
    FieldPointerDown {
        id: String,
        extend: bool,
        x: f64,
        y: f64,
    },
    HandlePointerDown {
        id: String,
        handle: ResizeHandle,
        x: f64,
        y: f64,
    },
    CanvasPointerDown,
    PointerMoved {
        x: f64,
        y: f64,
    },
    PointerUp,

    // Inline editing
    FieldDoubleClick(String),
    EditInput {
        id: String,
        value: String,
    },
    EditCommit(String),

    // Sidebar: palette and per-field controls
    AddField(FieldPreset),
    DeleteField(String),
    DeleteSelected,
    LabelInput(String),
    ValueInput(String),
    BumpFontSize(i32),
    ToggleBold,
    SetAlign(TextAlign),

    // Sidebar: session data
    PatientNameInput(String),
    DoctorNameInput(String),
    ClinicNameInput(String),
    ProcedureNameInput(String),

    // Pagination
    PrevPage,
    NextPage,

    // Persistence
    SendClicked,
    CancelSend,
    ConfirmSend,
    SendFinished(Result<String, String>),
    SaveTemplate,
    TemplateSaved(Result<(), String>),

    // Template loading
    LoadTemplates,
    TemplatesLoaded(Result<Vec<TemplateSummary>, String>),
    TemplateSelected(String),
    TemplateLoaded(Result<Template, String>),
}
