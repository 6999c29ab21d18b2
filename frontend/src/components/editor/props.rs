//! Props for the authoring editor component.

use yew::prelude::*;

use crate::session::SessionHandle;

#[derive(Properties, PartialEq)]
pub struct DoctorEditorProps {
    pub session: SessionHandle,
    /// Fired with the server-assigned document id once the document has
    /// been sent for signing.
    pub on_sent: Callback<String>,
}
