//! Sidebar rendering: field palette, per-field controls, document data
//! inputs, and the send/save actions.

use common::model::field::{Field, FontWeight, TextAlign};
use yew::prelude::*;

use crate::helpers::{input_value, select_value};
use crate::session::FieldPreset;

use super::messages::Msg;
use super::state::DoctorEditor;

const SECTION: &str = "margin-bottom: 20px;";
const HEADING: &str = "font-size: 11px; font-weight: bold; color: #64748b; \
                       text-transform: uppercase; letter-spacing: 0.05em; \
                       margin-bottom: 8px;";
const BUTTON: &str = "display: block; width: 100%; text-align: left; padding: 8px 10px; \
                      margin-bottom: 6px; border: 1px solid #cbd5e1; border-radius: 4px; \
                      background: #fff; cursor: pointer; font-size: 13px;";
const INPUT: &str = "width: 100%; box-sizing: border-box; padding: 6px 8px; \
                     border: 1px solid #cbd5e1; border-radius: 4px; font-size: 13px; \
                     margin-bottom: 8px;";
const SMALL_BUTTON: &str = "padding: 4px 10px; border: 1px solid #cbd5e1; border-radius: 4px; \
                            background: #fff; cursor: pointer; font-size: 13px;";

pub fn render(component: &DoctorEditor, ctx: &Context<DoctorEditor>) -> Html {
    let session = ctx.props().session.borrow();
    let selected_field = component
        .selection
        .single_selection()
        .and_then(|id| session.store.get(id).cloned());

    html! {
        <div style="width: 280px; flex-shrink: 0; background: #fff; border-left: 1px solid #e2e8f0; \
                    padding: 16px; overflow-y: auto; font-family: Arial, sans-serif;">
            <div style={SECTION}>
                <div style={HEADING}>{ "Add Field" }</div>
                { palette_button(ctx, FieldPreset::Title, "Header Title") }
                { palette_button(ctx, FieldPreset::Text, "Text Field") }
                { palette_button(ctx, FieldPreset::Date, "Date Field") }
                { palette_button(ctx, FieldPreset::Signature, "Signature Field") }
            </div>

            { render_template_picker(component, ctx) }

            { match &selected_field {
                Some(field) => render_field_controls(component, ctx, field),
                None => render_document_inputs(ctx),
            } }

            { render_errors(component) }

            <div style={SECTION}>
                <button
                    style={SMALL_BUTTON}
                    onclick={ctx.link().callback(|_| Msg::SaveTemplate)}
                >
                    { "Save as Template" }
                </button>
                <button
                    style="padding: 8px 14px; border: none; border-radius: 4px; background: #2563eb; \
                           color: #fff; cursor: pointer; font-size: 13px; margin-left: 8px;"
                    disabled={component.sending}
                    onclick={ctx.link().callback(|_| Msg::SendClicked)}
                >
                    { "Send to Patient" }
                </button>
            </div>
        </div>
    }
}

fn render_template_picker(component: &DoctorEditor, ctx: &Context<DoctorEditor>) -> Html {
    if component.templates.is_empty() {
        return html! {};
    }
    html! {
        <div style={SECTION}>
            <div style={HEADING}>{ "Templates" }</div>
            <select
                style={INPUT}
                disabled={component.loading_template}
                onchange={ctx.link().callback(|e: Event| Msg::TemplateSelected(select_value(&e)))}
            >
                <option value="" selected=true>
                    { if component.loading_template { "Loading…" } else { "Load a template…" } }
                </option>
                { for component.templates.iter().map(|t| html! {
                    <option value={t.id.clone()}>{ t.name.clone() }</option>
                }) }
            </select>
        </div>
    }
}

fn palette_button(ctx: &Context<DoctorEditor>, preset: FieldPreset, label: &str) -> Html {
    html! {
        <button
            style={BUTTON}
            onclick={ctx.link().callback(move |_| Msg::AddField(preset))}
        >
            { format!("+ {label}") }
        </button>
    }
}

fn render_field_controls(
    component: &DoctorEditor,
    ctx: &Context<DoctorEditor>,
    field: &Field,
) -> Html {
    let style = field.style().copied();
    html! {
        <div style={SECTION}>
            <div style={HEADING}>{ "Selected Field" }</div>
            <label style="font-size: 12px; color: #475569;">{ "Label" }</label>
            <input
                style={INPUT}
                value={field.label().to_string()}
                oninput={ctx.link().callback(|e: InputEvent| Msg::LabelInput(input_value(&e)))}
            />
            if !field.is_signature() {
                <label style="font-size: 12px; color: #475569;">{ "Value" }</label>
                <input
                    style={INPUT}
                    value={field.value().to_string()}
                    oninput={ctx.link().callback(|e: InputEvent| Msg::ValueInput(input_value(&e)))}
                />
            }
            if let Some(style_values) = style {
                <div style="display: flex; align-items: center; gap: 6px; margin-bottom: 8px;">
                    <button
                        style={SMALL_BUTTON}
                        onclick={ctx.link().callback(|_| Msg::BumpFontSize(-1))}
                    >
                        { "A−" }
                    </button>
                    <span style="font-size: 13px; min-width: 34px; text-align: center;">
                        { format!("{}px", style_values.font_size) }
                    </span>
                    <button
                        style={SMALL_BUTTON}
                        onclick={ctx.link().callback(|_| Msg::BumpFontSize(1))}
                    >
                        { "A+" }
                    </button>
                    <button
                        style={toggle_style(style_values.font_weight == FontWeight::Bold)}
                        onclick={ctx.link().callback(|_| Msg::ToggleBold)}
                    >
                        { "B" }
                    </button>
                </div>
                <div style="display: flex; gap: 6px; margin-bottom: 8px;">
                    { align_button(ctx, style_values.text_align, TextAlign::Left, "Left") }
                    { align_button(ctx, style_values.text_align, TextAlign::Center, "Center") }
                    { align_button(ctx, style_values.text_align, TextAlign::Right, "Right") }
                </div>
            }
            <button
                style="padding: 6px 12px; border: 1px solid #fca5a5; border-radius: 4px; \
                       background: #fef2f2; color: #dc2626; cursor: pointer; font-size: 13px;"
                onclick={ctx.link().callback(|_| Msg::DeleteSelected)}
            >
                { if component.selection.count() > 1 {
                    format!("Delete {} fields", component.selection.count())
                } else {
                    "Delete field".to_string()
                } }
            </button>
        </div>
    }
}

fn toggle_style(active: bool) -> String {
    if active {
        format!("{SMALL_BUTTON} background: #2563eb; color: #fff; font-weight: bold;")
    } else {
        format!("{SMALL_BUTTON} font-weight: bold;")
    }
}

fn align_button(
    ctx: &Context<DoctorEditor>,
    current: TextAlign,
    target: TextAlign,
    label: &str,
) -> Html {
    html! {
        <button
            style={toggle_style(current == target)}
            onclick={ctx.link().callback(move |_| Msg::SetAlign(target))}
        >
            { label }
        </button>
    }
}

fn render_document_inputs(ctx: &Context<DoctorEditor>) -> Html {
    let session = ctx.props().session.borrow();
    html! {
        <div style={SECTION}>
            <div style={HEADING}>{ "Document" }</div>
            <label style="font-size: 12px; color: #475569;">{ "Procedure" }</label>
            <input
                style={INPUT}
                value={session.meta.procedure_name.clone()}
                oninput={ctx.link().callback(|e: InputEvent| Msg::ProcedureNameInput(input_value(&e)))}
            />
            <label style="font-size: 12px; color: #475569;">{ "Patient name" }</label>
            <input
                style={INPUT}
                value={session.patient.full_name.clone()}
                oninput={ctx.link().callback(|e: InputEvent| Msg::PatientNameInput(input_value(&e)))}
            />
            <label style="font-size: 12px; color: #475569;">{ "Doctor" }</label>
            <input
                style={INPUT}
                value={session.meta.doctor_name.clone()}
                oninput={ctx.link().callback(|e: InputEvent| Msg::DoctorNameInput(input_value(&e)))}
            />
            <label style="font-size: 12px; color: #475569;">{ "Clinic" }</label>
            <input
                style={INPUT}
                value={session.meta.clinic_name.clone()}
                oninput={ctx.link().callback(|e: InputEvent| Msg::ClinicNameInput(input_value(&e)))}
            />
        </div>
    }
}

fn render_errors(component: &DoctorEditor) -> Html {
    if component.validation_errors.is_empty() {
        return html! {};
    }
    html! {
        <div style={SECTION}>
            <div style={HEADING}>{ "Needs attention" }</div>
            <ul style="margin: 0; padding-left: 18px; color: #dc2626; font-size: 12px;">
                { for component.validation_errors.messages().map(|e| html! { <li>{ e }</li> }) }
            </ul>
        </div>
    }
}
