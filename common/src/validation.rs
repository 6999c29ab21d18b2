//! Pre-send field validation.
//!
//! Text fields must carry a value and date fields must parse as dates
//! before a document may be sent; signature fields are the patient's to
//! fill. Date parsing is host-specific, so the caller supplies the check.
//! An error is dropped the moment the user starts editing the flagged
//! field; the next send attempt re-validates everything.

use std::collections::HashMap;

use crate::model::field::{Field, FieldKind};

/// Validation failures keyed by field id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    by_field: HashMap<String, String>,
}

impl ValidationErrors {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.by_field.get(id).map(String::as_str)
    }

    /// Drops the error for one field, called when the user edits it.
    pub fn clear(&mut self, id: &str) {
        self.by_field.remove(id);
    }

    pub fn clear_all(&mut self) {
        self.by_field.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.by_field.values().map(String::as_str)
    }
}

pub fn validate_fields(
    fields: &[Field],
    date_parses: impl Fn(&str) -> bool,
) -> ValidationErrors {
    let mut by_field = HashMap::new();
    for field in fields {
        match field.kind() {
            FieldKind::Text => {
                if field.value().trim().is_empty() {
                    by_field.insert(
                        field.id().to_string(),
                        format!("{} must not be empty", field.label()),
                    );
                }
            }
            FieldKind::Date => {
                if !date_parses(field.value()) {
                    by_field.insert(
                        field.id().to_string(),
                        format!("{} is not a valid date", field.label()),
                    );
                }
            }
            FieldKind::Signature => {}
        }
    }
    ValidationErrors { by_field }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FieldGeometry;
    use crate::model::field::{SignatureField, TextField, TextStyle};

    fn text_field(id: &str, value: &str) -> Field {
        Field::Text(TextField {
            id: id.into(),
            label: "Patient Name".into(),
            page: 1,
            geometry: FieldGeometry::new(35.0, 45.0, 25.0, 3.0),
            value: value.into(),
            style: TextStyle::default(),
            source: None,
        })
    }

    fn date_field(id: &str, value: &str) -> Field {
        Field::Date(TextField {
            id: id.into(),
            label: "Date".into(),
            page: 1,
            geometry: FieldGeometry::new(75.0, 19.5, 15.0, 2.5),
            value: value.into(),
            style: TextStyle::default(),
            source: None,
        })
    }

    fn date_looks_valid(value: &str) -> bool {
        !value.trim().is_empty() && value.contains('/')
    }

    #[test]
    fn empty_text_and_unparsable_date_are_flagged() {
        let fields = vec![
            text_field("t1", "  "),
            text_field("t2", "Jane Roe"),
            date_field("d1", "not a date"),
            date_field("d2", "6/1/2026"),
        ];
        let errors = validate_fields(&fields, date_looks_valid);
        assert!(errors.get("t1").is_some());
        assert!(errors.get("t2").is_none());
        assert!(errors.get("d1").is_some());
        assert!(errors.get("d2").is_none());
    }

    #[test]
    fn signature_fields_are_exempt() {
        let fields = vec![Field::Signature(SignatureField {
            id: "sig".into(),
            label: "Sign Here".into(),
            page: 1,
            geometry: FieldGeometry::new(35.0, 45.0, 30.0, 5.0),
            value: String::new(),
        })];
        assert!(validate_fields(&fields, date_looks_valid).is_empty());
    }

    #[test]
    fn editing_a_flagged_field_drops_its_error_immediately() {
        let fields = vec![text_field("t1", "")];
        let mut errors = validate_fields(&fields, date_looks_valid);
        assert!(errors.get("t1").is_some());

        // The first keystroke into the field clears its error; the user
        // must not keep staring at a red border while fixing it.
        errors.clear("t1");
        assert!(errors.get("t1").is_none());
        assert!(errors.is_empty());
    }
}
