pub mod editor;
pub mod field_layer;
pub mod viewer;
