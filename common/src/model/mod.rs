pub mod document;
pub mod field;
pub mod template;

pub use document::{
    AuditEvent, DocumentMeta, DocumentSource, PageImage, PatientDetails, RasterPlan, SendRequest,
    SignRequest,
};
pub use field::{Field, FieldKind, FontWeight, SignatureField, SourceKey, TextAlign, TextField, TextStyle};
pub use template::{Template, TemplateSummary};
