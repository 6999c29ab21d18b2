//! Framework-free core of the consent-document workflow tool.
//!
//! Everything here compiles natively and for wasm32 without touching the DOM:
//! the field/document data model, the percentage-based geometry math, the
//! field store with its observer list, the selection/gesture state machine,
//! and the data-binding reconciler. The `frontend` crate layers the Yew
//! surfaces on top of these types.

pub mod binding;
pub mod error;
pub mod geometry;
pub mod model;
pub mod selection;
pub mod store;
pub mod validation;

pub use error::CoreError;
