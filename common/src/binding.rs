//! Data-binding sync: keeps source-tagged field values tracking the
//! patient/doctor/meta data the enclosing application owns.
//!
//! The reconciler runs synchronously with the triggering data change, so a
//! bound field never lags the source by more than one render cycle. Direct
//! edits of a bound field are allowed; they simply desynchronize the field
//! until its source value changes again.

use std::collections::HashMap;

use crate::model::document::{DocumentMeta, PatientDetails};
use crate::model::field::SourceKey;
use crate::store::FieldStore;

/// Current values of the external data attributes, keyed symbolically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSources {
    values: HashMap<SourceKey, String>,
}

impl DataSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the session's patient and document metadata. `today` is
    /// supplied by the caller because date formatting is host-specific.
    pub fn from_session(patient: &PatientDetails, meta: &DocumentMeta, today: &str) -> Self {
        let mut sources = Self::new();
        sources.set(SourceKey::PatientFullName, patient.full_name.clone());
        sources.set(SourceKey::PatientEmail, patient.email.clone());
        sources.set(SourceKey::PatientDob, patient.dob.clone());
        sources.set(
            SourceKey::PatientPhone,
            patient.phone.clone().unwrap_or_default(),
        );
        sources.set(SourceKey::DoctorName, meta.doctor_name.clone());
        sources.set(SourceKey::MetaClinic, meta.clinic_name.clone());
        sources.set(SourceKey::MetaDate, today.to_string());
        sources
    }

    /// Returns whether the stored value actually changed.
    pub fn set(&mut self, key: SourceKey, value: String) -> bool {
        match self.values.get(&key) {
            Some(existing) if *existing == value => false,
            _ => {
                self.values.insert(key, value);
                true
            }
        }
    }

    pub fn get(&self, key: SourceKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }
}

/// Pushes current source values into every bound field whose value differs.
/// Returns the number of fields updated. Fields whose source has no value
/// yet are left untouched.
pub fn sync_bound_fields(store: &mut FieldStore, sources: &DataSources) -> usize {
    let stale: Vec<(String, String)> = store
        .bound_fields()
        .filter_map(|(field, key)| {
            sources.get(key).and_then(|value| {
                (field.value() != value).then(|| (field.id().to_string(), value.to_string()))
            })
        })
        .collect();

    let count = stale.len();
    for (id, value) in stale {
        // The id came from the store a moment ago; a miss here is unreachable.
        let _ = store.update_field(&id, |f| f.set_value(value));
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FieldGeometry;
    use crate::model::field::{Field, TextField, TextStyle};

    fn bound_field(id: &str, source: SourceKey, value: &str) -> Field {
        Field::Text(TextField {
            id: id.into(),
            label: "Patient Name".into(),
            page: 1,
            geometry: FieldGeometry::new(14.0, 19.5, 35.0, 2.5),
            value: value.into(),
            style: TextStyle::default(),
            source: Some(source),
        })
    }

    #[test]
    fn source_change_propagates_to_bound_field() {
        let mut store = FieldStore::new();
        store
            .add_field(bound_field("f1", SourceKey::PatientFullName, "A"))
            .unwrap();

        let mut sources = DataSources::new();
        sources.set(SourceKey::PatientFullName, "B".into());
        assert_eq!(sync_bound_fields(&mut store, &sources), 1);
        assert_eq!(store.get("f1").unwrap().value(), "B");
    }

    #[test]
    fn unbound_and_in_sync_fields_are_untouched() {
        let mut store = FieldStore::new();
        store
            .add_field(bound_field("f1", SourceKey::DoctorName, "Dr. Chen"))
            .unwrap();

        let mut sources = DataSources::new();
        sources.set(SourceKey::DoctorName, "Dr. Chen".into());
        // Value already matches; nothing to do.
        assert_eq!(sync_bound_fields(&mut store, &sources), 0);
    }

    #[test]
    fn missing_source_value_leaves_field_alone() {
        let mut store = FieldStore::new();
        store
            .add_field(bound_field("f1", SourceKey::MetaClinic, "edited by hand"))
            .unwrap();
        let sources = DataSources::new();
        assert_eq!(sync_bound_fields(&mut store, &sources), 0);
        assert_eq!(store.get("f1").unwrap().value(), "edited by hand");
    }

    #[test]
    fn loaded_template_fields_pick_up_session_values() {
        let mut store = FieldStore::new();
        store
            .add_field(bound_field("old", SourceKey::DoctorName, "Dr. Chen"))
            .unwrap();

        // Loading a template replaces the whole field set; the replacement
        // fields then re-sync against the live session data.
        store.set_fields(vec![
            bound_field("tpl-name", SourceKey::PatientFullName, ""),
            bound_field("tpl-date", SourceKey::MetaDate, "1/1/2020"),
        ]);
        assert!(store.get("old").is_none());

        let mut sources = DataSources::new();
        sources.set(SourceKey::PatientFullName, "Jane Roe".into());
        sources.set(SourceKey::MetaDate, "6/1/2026".into());
        assert_eq!(sync_bound_fields(&mut store, &sources), 2);
        assert_eq!(store.get("tpl-name").unwrap().value(), "Jane Roe");
        assert_eq!(store.get("tpl-date").unwrap().value(), "6/1/2026");
    }

    #[test]
    fn session_snapshot_covers_all_keys() {
        let patient = PatientDetails {
            id: "p1".into(),
            full_name: "Jane Roe".into(),
            email: "jane@example.com".into(),
            dob: "1990-04-01".into(),
            phone: None,
        };
        let meta = DocumentMeta {
            procedure_name: "Wisdom Tooth Extraction".into(),
            doctor_name: "Dr. Chen".into(),
            clinic_name: "Wizex Medical Center".into(),
            generated_date: "6/1/2026".into(),
        };
        let sources = DataSources::from_session(&patient, &meta, "6/1/2026");
        assert_eq!(sources.get(SourceKey::PatientFullName), Some("Jane Roe"));
        assert_eq!(sources.get(SourceKey::PatientPhone), Some(""));
        assert_eq!(sources.get(SourceKey::MetaDate), Some("6/1/2026"));
    }
}
