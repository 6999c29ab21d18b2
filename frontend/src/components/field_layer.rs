//! Shared field overlay renderer.
//!
//! Both the authoring canvas and the signing viewer draw the same absolutely
//! positioned field boxes over the page image; what differs is capability,
//! not structure. A single rendering core takes a [`FieldCaps`] describing
//! what the surrounding surface allows (selection chrome, resize handles,
//! inline editing, signing) and renders only the affordances that are
//! enabled. Keeping one core means a styling fix lands in both surfaces at
//! once.

use common::geometry::ResizeHandle;
use common::model::field::{Field, FontWeight, TextAlign};
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, KeyboardEvent, MouseEvent};
use yew::prelude::*;

/// Per-field rendering capabilities and state. An authoring surface fills
/// in the interactive callbacks; a read-only surface leaves them `None` and
/// supplies the signing bits instead.
#[derive(Clone, PartialEq, Default)]
pub struct FieldCaps {
    pub selected: bool,
    /// Handles render only on a singleton selection.
    pub show_handles: bool,
    pub editing: bool,
    pub error: Option<String>,
    /// Substituted display value for empty bound fields on read-only
    /// surfaces (the signer's name, typically).
    pub fallback_value: Option<String>,
    /// Captured signature image, applied to signature fields on read-only
    /// surfaces.
    pub signature: Option<String>,
    pub on_pointer_down: Option<Callback<MouseEvent>>,
    pub on_handle_down: Option<Callback<(ResizeHandle, MouseEvent)>>,
    pub on_double_click: Option<Callback<()>>,
    pub on_edit_input: Option<Callback<String>>,
    pub on_edit_commit: Option<Callback<()>>,
    pub on_delete: Option<Callback<()>>,
    pub on_sign: Option<Callback<()>>,
}

impl FieldCaps {
    fn interactive(&self) -> bool {
        self.on_pointer_down.is_some()
    }
}

/// Renders one field box at the given display scale.
pub fn render_field(field: &Field, scale: f64, caps: &FieldCaps) -> Html {
    let g = field.geometry();
    let interactive = caps.interactive();

    let border = if caps.error.is_some() {
        "2px solid #dc2626"
    } else if caps.selected {
        "2px solid #2563eb"
    } else if interactive {
        "1px dashed #94a3b8"
    } else {
        "none"
    };
    let background = if caps.selected {
        "rgba(37, 99, 235, 0.08)"
    } else if interactive {
        "rgba(148, 163, 184, 0.05)"
    } else {
        "transparent"
    };
    let style = format!(
        "position: absolute; left: {}%; top: {}%; width: {}%; height: {}%; \
         box-sizing: border-box; border: {}; background: {}; \
         cursor: {}; z-index: {}; user-select: none;",
        g.x,
        g.y,
        g.w,
        g.h,
        border,
        background,
        if interactive { "move" } else { "default" },
        if caps.selected { 20 } else { 10 },
    );

    let onmousedown = caps.on_pointer_down.clone().map(|cb| {
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            e.prevent_default();
            cb.emit(e);
        })
    });
    let ondblclick = caps.on_double_click.clone().map(|cb| {
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            cb.emit(());
        })
    });

    html! {
        <div
            {style}
            onmousedown={onmousedown}
            ondblclick={ondblclick}
            title={caps.error.clone()}
        >
            { render_body(field, scale, caps) }
            if caps.selected && interactive {
                { render_label_tag(field, caps) }
            }
            if caps.show_handles {
                { for ResizeHandle::ALL.iter().map(|h| render_handle(*h, caps)) }
            }
        </div>
    }
}

fn render_body(field: &Field, scale: f64, caps: &FieldCaps) -> Html {
    match field {
        Field::Text(_) | Field::Date(_) => render_text_body(field, scale, caps),
        Field::Signature(_) => render_signature_body(field, caps),
    }
}

fn render_text_body(field: &Field, scale: f64, caps: &FieldCaps) -> Html {
    let style = field.style().copied().unwrap_or_default();
    let weight = match style.font_weight {
        FontWeight::Bold => "bold",
        FontWeight::Normal => "normal",
    };
    let align = match style.text_align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    };
    let font = format!(
        "font-size: {:.1}px; font-weight: {weight}; text-align: {align}; \
         font-family: Arial, sans-serif; color: #111;",
        style.font_size as f64 * scale,
    );

    if caps.editing {
        let oninput = caps.on_edit_input.clone().map(|cb| {
            Callback::from(move |e: InputEvent| {
                if let Some(input) = e
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                {
                    cb.emit(input.value());
                }
            })
        });
        let commit = caps.on_edit_commit.clone();
        let onblur = commit
            .clone()
            .map(|cb| Callback::from(move |_: FocusEvent| cb.emit(())));
        let onkeydown = commit.map(|cb| {
            Callback::from(move |e: KeyboardEvent| {
                if e.key() == "Enter" {
                    cb.emit(());
                }
            })
        });
        let style = format!(
            "width: 100%; height: 100%; box-sizing: border-box; border: none; \
             outline: none; background: #fff; padding: 0 2px; {font}"
        );
        return html! {
            <input
                {style}
                value={field.value().to_string()}
                oninput={oninput}
                onblur={onblur}
                onkeydown={onkeydown}
                onmousedown={Callback::from(|e: MouseEvent| e.stop_propagation())}
            />
        };
    }

    let (text, placeholder) = display_text(field, caps.fallback_value.as_deref());
    let style = format!(
        "width: 100%; height: 100%; overflow: hidden; white-space: nowrap; \
         display: flex; align-items: center; justify-content: {}; \
         padding: 0 2px; box-sizing: border-box; {font}{}",
        match field.style().map(|s| s.text_align) {
            Some(TextAlign::Center) => "center",
            Some(TextAlign::Right) => "flex-end",
            _ => "flex-start",
        },
        if placeholder {
            " color: #94a3b8; font-style: italic;"
        } else {
            ""
        },
    );
    html! { <div {style}>{ text }</div> }
}

/// Text shown for a non-editing text/date field, and whether it is a
/// placeholder. The value wins; an empty value falls back to the surface's
/// substitute; failing both, the label stands in, styled as a placeholder
/// so the box never renders blank.
fn display_text(field: &Field, fallback: Option<&str>) -> (String, bool) {
    if !field.value().is_empty() {
        return (field.value().to_string(), false);
    }
    if let Some(fallback) = fallback.filter(|f| !f.is_empty()) {
        return (fallback.to_string(), false);
    }
    (field.label().to_string(), true)
}

fn render_signature_body(field: &Field, caps: &FieldCaps) -> Html {
    if caps.interactive() {
        // Authoring surface: the placeholder only marks where the patient
        // will sign, it is never editable text.
        return html! {
            <div style="width: 100%; height: 100%; display: flex; align-items: center; \
                        justify-content: center; font-family: cursive; font-size: 13px; \
                        color: #64748b; border-bottom: 1px solid #94a3b8;">
                { field.label() }
            </div>
        };
    }

    if let Some(signature) = &caps.signature {
        if signature.starts_with("data:") {
            return html! {
                <img
                    src={signature.clone()}
                    alt="Signature"
                    style="width: 100%; height: 100%; object-fit: contain;"
                />
            };
        }
        // Typed-name fallback signatures render as script text.
        return html! {
            <div style="width: 100%; height: 100%; display: flex; align-items: center; \
                        justify-content: center; font-family: cursive; font-size: 18px; \
                        color: #111; border-bottom: 1px solid #111;">
                { signature.strip_prefix("signed:").unwrap_or(signature) }
            </div>
        };
    }

    let onclick = caps
        .on_sign
        .clone()
        .map(|cb| Callback::from(move |_: MouseEvent| cb.emit(())));
    html! {
        <button
            onclick={onclick}
            style="width: 100%; height: 100%; border: 2px dashed #2563eb; \
                   border-radius: 4px; background: rgba(37, 99, 235, 0.05); \
                   color: #2563eb; font-size: 13px; cursor: pointer;"
        >
            { format!("Click to sign: {}", field.label()) }
        </button>
    }
}

fn render_label_tag(field: &Field, caps: &FieldCaps) -> Html {
    let ondelete = caps.on_delete.clone().map(|cb| {
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            cb.emit(());
        })
    });
    html! {
        <div style="position: absolute; top: -22px; left: -2px; display: flex; \
                    align-items: center; gap: 4px; background: #2563eb; color: #fff; \
                    font-size: 11px; font-family: Arial, sans-serif; \
                    padding: 2px 6px; border-radius: 3px; white-space: nowrap;">
            { field.label() }
            <span
                onmousedown={Callback::from(|e: MouseEvent| e.stop_propagation())}
                onclick={ondelete}
                style="cursor: pointer; font-weight: bold; padding: 0 2px;"
            >
                { "×" }
            </span>
        </div>
    }
}

fn render_handle(handle: ResizeHandle, caps: &FieldCaps) -> Html {
    let position = match handle {
        ResizeHandle::Nw => "top: -4px; left: -4px;",
        ResizeHandle::N => "top: -4px; left: 50%; transform: translateX(-50%);",
        ResizeHandle::Ne => "top: -4px; right: -4px;",
        ResizeHandle::E => "top: 50%; right: -4px; transform: translateY(-50%);",
        ResizeHandle::Se => "bottom: -4px; right: -4px;",
        ResizeHandle::S => "bottom: -4px; left: 50%; transform: translateX(-50%);",
        ResizeHandle::Sw => "bottom: -4px; left: -4px;",
        ResizeHandle::W => "top: 50%; left: -4px; transform: translateY(-50%);",
    };
    let cursor = match handle {
        ResizeHandle::N | ResizeHandle::S => "ns-resize",
        ResizeHandle::E | ResizeHandle::W => "ew-resize",
        ResizeHandle::Ne | ResizeHandle::Sw => "nesw-resize",
        ResizeHandle::Nw | ResizeHandle::Se => "nwse-resize",
    };
    let style = format!(
        "position: absolute; width: 8px; height: 8px; background: #fff; \
         border: 1px solid #2563eb; border-radius: 1px; z-index: 30; \
         cursor: {cursor}; {position}"
    );
    let onmousedown = caps.on_handle_down.clone().map(|cb| {
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            e.prevent_default();
            cb.emit((handle, e));
        })
    });
    html! { <div {style} onmousedown={onmousedown}></div> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::geometry::FieldGeometry;
    use common::model::field::{TextField, TextStyle};

    fn text_field(value: &str) -> Field {
        Field::Text(TextField {
            id: "f1".into(),
            label: "Patient Name".into(),
            page: 1,
            geometry: FieldGeometry::new(35.0, 45.0, 25.0, 3.0),
            value: value.into(),
            style: TextStyle::default(),
            source: None,
        })
    }

    #[test]
    fn empty_field_shows_its_label_as_placeholder() {
        let (text, placeholder) = display_text(&text_field(""), None);
        assert_eq!(text, "Patient Name");
        assert!(placeholder);
    }

    #[test]
    fn value_wins_over_label_and_fallback() {
        let (text, placeholder) = display_text(&text_field("Jane Roe"), Some("John Doe"));
        assert_eq!(text, "Jane Roe");
        assert!(!placeholder);
    }

    #[test]
    fn read_only_fallback_substitutes_for_empty_value() {
        let (text, placeholder) = display_text(&text_field(""), Some("John Doe"));
        assert_eq!(text, "John Doe");
        assert!(!placeholder);

        // An empty substitute is the same as none at all.
        let (text, placeholder) = display_text(&text_field(""), Some(""));
        assert_eq!(text, "Patient Name");
        assert!(placeholder);
    }
}
