//! Document-level model types and the payloads handed to the persistence
//! collaborator. The core never defines a wire protocol of its own beyond
//! producing these tuples; coordinate values serialize as plain numbers.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::{DEFAULT_PAGE_HEIGHT, LOGICAL_PAGE_WIDTH};
use crate::model::field::Field;

/// Reference to the uploaded source document. The rasterizer treats the
/// content as opaque and dispatches on the declared content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub url: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

/// How a source turns into pages, decided from the declared content type
/// alone. The decoding itself is platform-bound; this decision is not.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterPlan {
    /// Already a raster image: a single page, reference unchanged, default
    /// page aspect.
    Passthrough(PageImage),
    /// Paginated document: decode and render page by page.
    DecodePages,
}

impl DocumentSource {
    pub fn is_pdf(&self) -> bool {
        self.content_type == "application/pdf"
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn raster_plan(&self) -> Result<RasterPlan, CoreError> {
        if self.is_image() {
            return Ok(RasterPlan::Passthrough(PageImage {
                url: self.url.clone(),
                width: LOGICAL_PAGE_WIDTH,
                height: DEFAULT_PAGE_HEIGHT,
            }));
        }
        if self.is_pdf() {
            return Ok(RasterPlan::DecodePages);
        }
        Err(CoreError::RasterizationFailed(format!(
            "unsupported content type: {}",
            self.content_type
        )))
    }
}

/// One rasterized page. `width`/`height` are logical units (the width is
/// always `LOGICAL_PAGE_WIDTH`); the URL points at the raster image, which
/// is rendered at a higher pixel density for clarity.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    pub url: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDetails {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Document metadata the doctor edits alongside the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(rename = "procedureName")]
    pub procedure_name: String,
    #[serde(rename = "doctorName")]
    pub doctor_name: String,
    #[serde(rename = "clinicName")]
    pub clinic_name: String,
    #[serde(rename = "generatedDate")]
    pub generated_date: String,
}

/// One entry of the client-assembled signing trail. Certificate and audit
/// semantics beyond this shape are a server concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub action: String,
    pub actor: String,
    pub details: String,
}

/// The finalized `{patient, fields, file reference, metadata}` tuple posted
/// on send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendRequest {
    pub patient: PatientDetails,
    pub fields: Vec<Field>,
    #[serde(rename = "fileUrl")]
    pub file_url: String,
    #[serde(flatten)]
    pub meta: DocumentMeta,
}

/// Signature submission for a sent document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignRequest {
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub signature: String,
    #[serde(rename = "auditEvents")]
    pub audit_events: Vec<AuditEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(content_type: &str) -> DocumentSource {
        DocumentSource {
            url: "/uploads/doc".into(),
            content_type: content_type.into(),
        }
    }

    #[test]
    fn image_source_passes_through_as_one_page() {
        let plan = source("image/png").raster_plan().unwrap();
        match plan {
            RasterPlan::Passthrough(page) => {
                assert_eq!(page.url, "/uploads/doc");
                assert_eq!(page.width, LOGICAL_PAGE_WIDTH);
                assert_eq!(page.height, DEFAULT_PAGE_HEIGHT);
            }
            RasterPlan::DecodePages => panic!("image sources must not be decoded"),
        }
    }

    #[test]
    fn pdf_source_is_decoded_page_by_page() {
        assert!(source("application/pdf").is_pdf());
        assert_eq!(
            source("application/pdf").raster_plan().unwrap(),
            RasterPlan::DecodePages
        );
    }

    #[test]
    fn unsupported_content_type_is_rejected() {
        let err = source("text/html").raster_plan().unwrap_err();
        assert!(matches!(err, CoreError::RasterizationFailed(_)));
        assert!(!source("text/html").is_image());
    }
}
