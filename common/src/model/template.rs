//! Reusable field-layout templates.
//!
//! A template is a saved field set plus the document metadata it was
//! authored with. Loading one bulk-replaces the session's field store;
//! bound fields are then re-synced against the current session data.

use serde::{Deserialize, Serialize};

use crate::model::document::DocumentMeta;
use crate::model::field::Field;

/// Listing entry for the template picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(flatten)]
    pub meta: DocumentMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_carries_fields_and_flattened_meta() {
        let json = r#"{
            "id": "tpl-1",
            "name": "Standard Consent",
            "procedureName": "Wisdom Tooth Extraction",
            "doctorName": "Dr. Chen",
            "clinicName": "Wizex Medical Center",
            "generatedDate": "6/1/2026",
            "fields": [
                {"type": "DATE", "id": "f1", "label": "Date", "x": 75.0, "y": 19.5,
                 "w": 15.0, "h": 2.5, "fontSize": 14, "fontWeight": "normal",
                 "textAlign": "left", "source": "meta.date"}
            ]
        }"#;
        let template: Template = serde_json::from_str(json).unwrap();
        assert_eq!(template.name, "Standard Consent");
        assert_eq!(template.meta.procedure_name, "Wisdom Tooth Extraction");
        assert_eq!(template.fields.len(), 1);
        assert_eq!(template.fields[0].id(), "f1");
    }
}
