//! The authoritative, page-aware field collection for one document session.
//!
//! The store is the sole mutator of field data. Every mutation notifies the
//! registered subscribers synchronously, which is how the renderer surfaces
//! learn to re-render (an explicit observer list instead of framework
//! reactivity). Defensive errors (`DuplicateId`, `NotFound`) are returned to
//! the caller, who logs and no-ops; they must never take the session down.

use std::rc::Rc;

use crate::error::CoreError;
use crate::model::field::{Field, SourceKey};

/// What changed, carried to every subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Added(String),
    Updated(String),
    Removed(String),
    /// The whole field set was replaced (template load).
    Replaced,
}

/// Token returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

type Subscriber = Rc<dyn Fn(&StoreEvent)>;

#[derive(Default)]
pub struct FieldStore {
    fields: Vec<Field>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: usize,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id() == id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields belonging to one 1-indexed page, for per-page rendering.
    pub fn fields_on_page(&self, page: u32) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |f| f.page() == page)
    }

    /// Fields carrying a source binding, for the data-binding reconciler.
    pub fn bound_fields(&self) -> impl Iterator<Item = (&Field, SourceKey)> {
        self.fields.iter().filter_map(|f| f.source().map(|s| (f, s)))
    }

    pub fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    fn notify(&self, event: StoreEvent) {
        for (_, subscriber) in &self.subscribers {
            subscriber(&event);
        }
    }

    /// Appends a field. Ids are generator-assigned, so a duplicate means a
    /// caller bug; it is reported instead of silently overwriting.
    pub fn add_field(&mut self, field: Field) -> Result<(), CoreError> {
        if self.get(field.id()).is_some() {
            return Err(CoreError::DuplicateId(field.id().to_string()));
        }
        let id = field.id().to_string();
        self.fields.push(field);
        self.notify(StoreEvent::Added(id));
        Ok(())
    }

    /// Applies a partial edit to an existing field.
    pub fn update_field(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut Field),
    ) -> Result<(), CoreError> {
        match self.fields.iter_mut().find(|f| f.id() == id) {
            Some(field) => {
                edit(field);
                self.notify(StoreEvent::Updated(id.to_string()));
                Ok(())
            }
            None => Err(CoreError::NotFound(id.to_string())),
        }
    }

    /// Deletes a field. Removing an absent id is a no-op, reported through
    /// the return value.
    pub fn remove_field(&mut self, id: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id() != id);
        if self.fields.len() != before {
            self.notify(StoreEvent::Removed(id.to_string()));
            true
        } else {
            false
        }
    }

    /// Bulk replace, used when a template is loaded and its full field set
    /// is established at once.
    pub fn set_fields(&mut self, fields: Vec<Field>) {
        self.fields = fields;
        self.notify(StoreEvent::Replaced);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::geometry::FieldGeometry;
    use crate::model::field::{SignatureField, TextField, TextStyle};

    fn text_field(id: &str, page: u32) -> Field {
        Field::Text(TextField {
            id: id.into(),
            label: "Text Field".into(),
            page,
            geometry: FieldGeometry::new(10.0, 10.0, 20.0, 5.0),
            value: String::new(),
            style: TextStyle::default(),
            source: None,
        })
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut store = FieldStore::new();
        store.add_field(text_field("f1", 1)).unwrap();
        let err = store.add_field(text_field("f1", 2)).unwrap_err();
        assert_eq!(err, CoreError::DuplicateId("f1".into()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_of_missing_field_reports_not_found() {
        let mut store = FieldStore::new();
        let err = store
            .update_field("ghost", |f| f.set_value("x".into()))
            .unwrap_err();
        assert_eq!(err, CoreError::NotFound("ghost".into()));
    }

    #[test]
    fn remove_absent_id_is_a_noop() {
        let mut store = FieldStore::new();
        store.add_field(text_field("f1", 1)).unwrap();
        assert!(!store.remove_field("ghost"));
        assert!(store.remove_field("f1"));
        assert!(store.is_empty());
    }

    #[test]
    fn page_filter_only_yields_matching_fields() {
        let mut store = FieldStore::new();
        store.add_field(text_field("a", 1)).unwrap();
        store.add_field(text_field("b", 2)).unwrap();
        store
            .add_field(Field::Signature(SignatureField {
                id: "sig".into(),
                label: "Sign Here".into(),
                page: 2,
                geometry: FieldGeometry::new(15.0, 92.0, 40.0, 4.0),
                value: String::new(),
            }))
            .unwrap();
        let on_page_two: Vec<_> = store.fields_on_page(2).map(|f| f.id().to_string()).collect();
        assert_eq!(on_page_two, vec!["b", "sig"]);
    }

    #[test]
    fn every_mutation_notifies_subscribers() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = FieldStore::new();
        let sink = events.clone();
        let sub = store.subscribe(Rc::new(move |e: &StoreEvent| {
            sink.borrow_mut().push(e.clone());
        }));

        store.add_field(text_field("f1", 1)).unwrap();
        store.update_field("f1", |f| f.set_value("v".into())).unwrap();
        store.remove_field("f1");
        store.set_fields(vec![text_field("f2", 1)]);

        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::Added("f1".into()),
                StoreEvent::Updated("f1".into()),
                StoreEvent::Removed("f1".into()),
                StoreEvent::Replaced,
            ]
        );

        store.unsubscribe(sub);
        store.remove_field("f2");
        assert_eq!(events.borrow().len(), 4);
    }
}
