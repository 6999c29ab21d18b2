//! Smart fields: positioned, data-bearing overlay elements.
//!
//! A field is one of three variants. Text and date fields carry a text style
//! and an optional source binding; signature fields carry neither — their
//! value, when present, is an encoded signature image. The serialized form
//! keeps the flat `{type, id, label, x, y, w, h, page, value, ...}` shape
//! the persistence collaborator expects, so geometry and style are flattened
//! into the field object.

use serde::{Deserialize, Serialize};

use crate::geometry::FieldGeometry;

/// Id prefix that marks the designated title field. The title field mirrors
/// the document's procedure name: committing an edit to it updates the
/// document metadata as well.
pub const TITLE_FIELD_PREFIX: &str = "title-field";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Display style for text and date fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(rename = "fontSize")]
    pub font_size: u32,
    #[serde(rename = "fontWeight")]
    pub font_weight: FontWeight,
    #[serde(rename = "textAlign")]
    pub text_align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 14,
            font_weight: FontWeight::Normal,
            text_align: TextAlign::Left,
        }
    }
}

/// Symbolic key linking a field's value to an external data attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKey {
    #[serde(rename = "patient.fullName")]
    PatientFullName,
    #[serde(rename = "patient.phone")]
    PatientPhone,
    #[serde(rename = "patient.email")]
    PatientEmail,
    #[serde(rename = "patient.dob")]
    PatientDob,
    #[serde(rename = "doctor.name")]
    DoctorName,
    #[serde(rename = "meta.clinic")]
    MetaClinic,
    #[serde(rename = "meta.date")]
    MetaDate,
}

impl SourceKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKey::PatientFullName => "patient.fullName",
            SourceKey::PatientPhone => "patient.phone",
            SourceKey::PatientEmail => "patient.email",
            SourceKey::PatientDob => "patient.dob",
            SourceKey::DoctorName => "doctor.name",
            SourceKey::MetaClinic => "meta.clinic",
            SourceKey::MetaDate => "meta.date",
        }
    }
}

fn default_page() -> u32 {
    1
}

/// Payload of the text and date variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextField {
    pub id: String,
    pub label: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(flatten)]
    pub geometry: FieldGeometry,
    #[serde(default)]
    pub value: String,
    #[serde(flatten)]
    pub style: TextStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKey>,
}

/// Payload of the signature variant. `value` holds the encoded signature
/// image once signed, otherwise it stays empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureField {
    pub id: String,
    pub label: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(flatten)]
    pub geometry: FieldGeometry,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Signature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Field {
    #[serde(rename = "TEXT")]
    Text(TextField),
    #[serde(rename = "DATE")]
    Date(TextField),
    #[serde(rename = "SIGNATURE")]
    Signature(SignatureField),
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Text(_) => FieldKind::Text,
            Field::Date(_) => FieldKind::Date,
            Field::Signature(_) => FieldKind::Signature,
        }
    }

    pub fn is_signature(&self) -> bool {
        matches!(self, Field::Signature(_))
    }

    pub fn id(&self) -> &str {
        match self {
            Field::Text(f) | Field::Date(f) => &f.id,
            Field::Signature(f) => &f.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Field::Text(f) | Field::Date(f) => &f.label,
            Field::Signature(f) => &f.label,
        }
    }

    pub fn set_label(&mut self, label: String) {
        match self {
            Field::Text(f) | Field::Date(f) => f.label = label,
            Field::Signature(f) => f.label = label,
        }
    }

    pub fn page(&self) -> u32 {
        match self {
            Field::Text(f) | Field::Date(f) => f.page,
            Field::Signature(f) => f.page,
        }
    }

    pub fn geometry(&self) -> FieldGeometry {
        match self {
            Field::Text(f) | Field::Date(f) => f.geometry,
            Field::Signature(f) => f.geometry,
        }
    }

    pub fn set_geometry(&mut self, geometry: FieldGeometry) {
        match self {
            Field::Text(f) | Field::Date(f) => f.geometry = geometry,
            Field::Signature(f) => f.geometry = geometry,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Field::Text(f) | Field::Date(f) => &f.value,
            Field::Signature(f) => &f.value,
        }
    }

    pub fn set_value(&mut self, value: String) {
        match self {
            Field::Text(f) | Field::Date(f) => f.value = value,
            Field::Signature(f) => f.value = value,
        }
    }

    /// Text style, present only on text and date fields.
    pub fn style(&self) -> Option<&TextStyle> {
        match self {
            Field::Text(f) | Field::Date(f) => Some(&f.style),
            Field::Signature(_) => None,
        }
    }

    pub fn style_mut(&mut self) -> Option<&mut TextStyle> {
        match self {
            Field::Text(f) | Field::Date(f) => Some(&mut f.style),
            Field::Signature(_) => None,
        }
    }

    /// Source binding, never present on signature fields.
    pub fn source(&self) -> Option<SourceKey> {
        match self {
            Field::Text(f) | Field::Date(f) => f.source,
            Field::Signature(_) => None,
        }
    }

    pub fn is_title_field(&self) -> bool {
        self.id().starts_with(TITLE_FIELD_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FieldGeometry;

    #[test]
    fn text_field_serializes_flat() {
        let field = Field::Text(TextField {
            id: "f1".into(),
            label: "Patient Name".into(),
            page: 1,
            geometry: FieldGeometry::new(14.0, 19.5, 35.0, 2.5),
            value: "Jane Roe".into(),
            style: TextStyle::default(),
            source: Some(SourceKey::PatientFullName),
        });
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "TEXT");
        assert_eq!(json["x"], 14.0);
        assert_eq!(json["fontSize"], 14);
        assert_eq!(json["source"], "patient.fullName");
    }

    #[test]
    fn page_defaults_to_one_when_absent() {
        let json = r#"{"type":"DATE","id":"f2","label":"Date","x":75.0,"y":19.5,"w":15.0,"h":2.5,
                       "fontSize":14,"fontWeight":"normal","textAlign":"left"}"#;
        let field: Field = serde_json::from_str(json).unwrap();
        assert_eq!(field.page(), 1);
        assert_eq!(field.kind(), FieldKind::Date);
        assert_eq!(field.value(), "");
    }

    #[test]
    fn signature_field_has_no_style_or_source() {
        let field = Field::Signature(SignatureField {
            id: "sig".into(),
            label: "Sign Here".into(),
            page: 2,
            geometry: FieldGeometry::new(15.0, 92.0, 40.0, 4.0),
            value: String::new(),
        });
        assert!(field.style().is_none());
        assert!(field.source().is_none());
        let json = serde_json::to_value(&field).unwrap();
        assert!(json.get("fontSize").is_none());
    }
}
