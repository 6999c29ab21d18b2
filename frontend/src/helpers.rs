//! Small DOM utilities shared across the frontend.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

/// Displays a temporary notification message at the bottom of the screen.
///
/// Creates and injects a styled `div` for non-blocking feedback (saved,
/// sent, rasterization fallback, ...). The toast removes itself after a few
/// seconds. A full notification system is a host-application concern; this
/// is only the minimal inline feedback the editor owes the user.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// Today's date formatted for display and for `meta.date` bindings.
pub fn today_string() -> String {
    js_sys::Date::new_0()
        .to_locale_date_string("en-US", &JsValue::UNDEFINED)
        .into()
}

/// Current timestamp in ISO-8601, used for audit events.
pub fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

/// Whether a date field value parses as a date in the host environment.
pub fn is_valid_date(value: &str) -> bool {
    !value.trim().is_empty() && !js_sys::Date::parse(value).is_nan()
}

/// Extracts the `value` of the `<input>` that fired an event.
pub fn input_value(e: &web_sys::Event) -> String {
    e.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

/// Extracts the selected `value` of the `<select>` that fired an event.
pub fn select_value(e: &web_sys::Event) -> String {
    e.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
        .map(|select| select.value())
        .unwrap_or_default()
}
