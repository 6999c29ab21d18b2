//! View rendering for the authoring editor component.

use common::model::field::Field;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::components::field_layer::{render_field, FieldCaps};

use super::messages::Msg;
use super::sidebar;
use super::state::DoctorEditor;

pub fn view(component: &DoctorEditor, ctx: &Context<DoctorEditor>) -> Html {
    html! {
        <div style="display: flex; height: 100%; min-height: 100vh; background: #f1f5f9;">
            <div
                ref={component.wrapper_ref.clone()}
                style="flex: 1; overflow: auto; display: flex; flex-direction: column; \
                       align-items: center; padding: 20px;"
            >
                { render_canvas(component, ctx) }
                { render_pagination(component, ctx) }
            </div>
            { sidebar::render(component, ctx) }
            if component.show_send_confirm {
                { render_send_confirm(component, ctx) }
            }
        </div>
    }
}

fn render_canvas(component: &DoctorEditor, ctx: &Context<DoctorEditor>) -> Html {
    let (width_px, height_px) = component.container_px();

    if component.rasterizing && component.pages.is_none() {
        return html! {
            <div style="padding: 80px; color: #64748b; font-family: Arial, sans-serif;">
                { "Rendering document…" }
            </div>
        };
    }
    if let Some(error) = &component.raster_error {
        return html! {
            <div style="padding: 80px; color: #dc2626; font-family: Arial, sans-serif;">
                { format!("Document preview unavailable: {error}") }
            </div>
        };
    }

    let background = component
        .current_page_image()
        .map(|page| format!("background-image: url('{}'); background-size: 100% 100%;", page.url))
        .unwrap_or_else(|| "background: #fff;".to_string());
    let style = format!(
        "position: relative; width: {width_px}px; height: {height_px}px; \
         box-shadow: 0 2px 8px rgba(0, 0, 0, 0.15); flex-shrink: 0; {background}"
    );

    let oncanvasdown = ctx.link().callback(|_: MouseEvent| Msg::CanvasPointerDown);
    let session = ctx.props().session.borrow();

    html! {
        <div {style} onmousedown={oncanvasdown}>
            { for session
                .store
                .fields_on_page(component.current_page)
                .map(|field| render_editor_field(component, ctx, field)) }
        </div>
    }
}

fn render_editor_field(
    component: &DoctorEditor,
    ctx: &Context<DoctorEditor>,
    field: &Field,
) -> Html {
    let id = field.id().to_string();
    let selected = component.selection.is_selected(&id);
    let single = component.selection.single_selection() == Some(id.as_str());
    let editing = component.editing_field.as_deref() == Some(id.as_str());

    let caps = FieldCaps {
        selected,
        show_handles: single && !editing,
        editing,
        error: component.validation_errors.get(&id).map(str::to_string),
        fallback_value: None,
        signature: None,
        on_pointer_down: Some(ctx.link().callback({
            let id = id.clone();
            move |e: MouseEvent| Msg::FieldPointerDown {
                id: id.clone(),
                extend: e.ctrl_key() || e.meta_key() || e.shift_key(),
                x: e.client_x() as f64,
                y: e.client_y() as f64,
            }
        })),
        on_handle_down: Some(ctx.link().callback({
            let id = id.clone();
            move |(handle, e): (common::geometry::ResizeHandle, MouseEvent)| {
                Msg::HandlePointerDown {
                    id: id.clone(),
                    handle,
                    x: e.client_x() as f64,
                    y: e.client_y() as f64,
                }
            }
        })),
        on_double_click: Some(ctx.link().callback({
            let id = id.clone();
            move |_| Msg::FieldDoubleClick(id.clone())
        })),
        on_edit_input: Some(ctx.link().callback({
            let id = id.clone();
            move |value: String| Msg::EditInput {
                id: id.clone(),
                value,
            }
        })),
        on_edit_commit: Some(ctx.link().callback({
            let id = id.clone();
            move |_| Msg::EditCommit(id.clone())
        })),
        on_delete: Some(ctx.link().callback({
            let id = id.clone();
            move |_| Msg::DeleteField(id.clone())
        })),
        on_sign: None,
    };

    render_field(field, component.scale, &caps)
}

fn render_pagination(component: &DoctorEditor, ctx: &Context<DoctorEditor>) -> Html {
    if component.page_count() <= 1 {
        return html! {};
    }
    let button = "padding: 4px 12px; border: 1px solid #cbd5e1; border-radius: 4px; \
                  background: #fff; cursor: pointer;";
    html! {
        <div style="display: flex; gap: 12px; align-items: center; margin-top: 12px; \
                    font-family: Arial, sans-serif; font-size: 13px; color: #334155;">
            <button
                style={button}
                disabled={component.current_page == 1}
                onclick={ctx.link().callback(|_| Msg::PrevPage)}
            >
                { "‹ Prev" }
            </button>
            { format!("Page {} of {}", component.current_page, component.page_count()) }
            <button
                style={button}
                disabled={component.current_page == component.page_count()}
                onclick={ctx.link().callback(|_| Msg::NextPage)}
            >
                { "Next ›" }
            </button>
        </div>
    }
}

fn render_send_confirm(component: &DoctorEditor, ctx: &Context<DoctorEditor>) -> Html {
    let session = ctx.props().session.borrow();
    html! {
        <div style="position: fixed; inset: 0; background: rgba(0, 0, 0, 0.4); \
                    display: flex; align-items: center; justify-content: center; z-index: 100;">
            <div style="background: #fff; border-radius: 8px; padding: 24px; width: 380px; \
                        font-family: Arial, sans-serif;">
                <h3 style="margin: 0 0 8px 0;">{ "Send for signing?" }</h3>
                <p style="color: #475569; font-size: 14px;">
                    { format!(
                        "\"{}\" will be sent to {} with {} field(s).",
                        session.meta.procedure_name,
                        session.patient.full_name,
                        session.store.len(),
                    ) }
                </p>
                <div style="display: flex; justify-content: flex-end; gap: 8px; margin-top: 16px;">
                    <button
                        style="padding: 6px 14px; border: 1px solid #cbd5e1; border-radius: 4px; \
                               background: #fff; cursor: pointer;"
                        onclick={ctx.link().callback(|_| Msg::CancelSend)}
                    >
                        { "Cancel" }
                    </button>
                    <button
                        style="padding: 6px 14px; border: none; border-radius: 4px; \
                               background: #2563eb; color: #fff; cursor: pointer;"
                        disabled={component.sending}
                        onclick={ctx.link().callback(|_| Msg::ConfirmSend)}
                    >
                        { if component.sending { "Sending…" } else { "Send" } }
                    </button>
                </div>
            </div>
        </div>
    }
}
