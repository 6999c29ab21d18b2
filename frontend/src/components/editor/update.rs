//! Update function for the authoring editor component.
//!
//! Elm-style: receives the current `DoctorEditor` state, the `Context`, and
//! a `Msg`, mutates the state, and returns whether the view should
//! re-render. All field mutations go through the session's `FieldStore`, so
//! every surface subscribed to the store observes them. Async work
//! (rasterization, HTTP) never touches the session directly; it reports
//! back through messages so mutation happens inside this function.

use common::model::field::{Field, FontWeight};
use common::validation::validate_fields;
use gloo_console::warn;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::{is_valid_date, show_toast};

use super::attach_gesture_listeners;
use super::messages::Msg;
use super::state::{DoctorEditor, MAX_FONT_SIZE, MIN_FONT_SIZE};

pub fn update(component: &mut DoctorEditor, ctx: &Context<DoctorEditor>, msg: Msg) -> bool {
    let session = ctx.props().session.clone();
    match msg {
        Msg::StoreChanged => true,

        Msg::BeginRasterize => {
            let (rasterizer, source) = {
                let session = session.borrow();
                match &session.source {
                    Some(source) => (session.rasterizer.clone(), source.clone()),
                    None => return false,
                }
            };
            component.rasterizing = true;
            component.raster_generation += 1;
            let generation = component.raster_generation;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = rasterizer
                    .rasterize(&source)
                    .await
                    .map_err(|e| e.to_string());
                link.send_message(Msg::RasterReady { generation, result });
            });
            true
        }
        Msg::RasterReady { generation, result } => {
            // A newer request is in flight; this result is stale.
            if generation != component.raster_generation {
                return false;
            }
            component.rasterizing = false;
            match result {
                Ok(pages) => {
                    // Keep the first page around as the fallback preview.
                    if let Some(first) = pages.first() {
                        session.borrow_mut().preview_url = Some(first.url.clone());
                    }
                    component.pages = Some(pages);
                    component.raster_error = None;
                    component.current_page = component.current_page.min(component.page_count());
                    ctx.link().send_message(Msg::ViewportChanged);
                }
                Err(error) => {
                    warn!(format!("rasterization failed: {error}"));
                    // A previously captured preview image still beats a
                    // blank canvas.
                    match fallback_page(&session) {
                        Some(page) => {
                            component.pages = Some(std::rc::Rc::new(vec![page]));
                            component.raster_error = None;
                            component.current_page = 1;
                            show_toast("Showing a cached preview of the document.");
                        }
                        None => {
                            component.raster_error = Some(error);
                            show_toast("Could not render the document preview.");
                        }
                    }
                }
            }
            true
        }
        Msg::ViewportChanged => match component.measure_scale() {
            Some(scale) if (scale - component.scale).abs() > 1e-3 => {
                component.scale = scale;
                true
            }
            _ => false,
        },

        Msg::FieldPointerDown { id, extend, x, y } => {
            if component.editing_field.as_deref() != Some(id.as_str()) {
                component.editing_field = None;
            }
            let fields = session.borrow().store.fields().to_vec();
            component
                .selection
                .pointer_down_on_field(&id, extend, (x, y), &fields);
            if component.selection.gesture_active() {
                attach_gesture_listeners(component, ctx);
            }
            true
        }
        Msg::HandlePointerDown { id, handle, x, y } => {
            let origin = session.borrow().store.get(&id).map(Field::geometry);
            let Some(origin) = origin else {
                return false;
            };
            component.editing_field = None;
            component.selection.begin_resize(&id, handle, (x, y), origin);
            attach_gesture_listeners(component, ctx);
            true
        }
        Msg::CanvasPointerDown => {
            component.selection.clear();
            component.editing_field = None;
            true
        }
        Msg::PointerMoved { x, y } => {
            if !component.selection.gesture_active() {
                return false;
            }
            let (cw, ch) = component.container_px();
            match component.selection.pointer_move((x, y), cw, ch) {
                Ok(updates) => {
                    let mut session = session.borrow_mut();
                    for (id, geometry) in updates {
                        if let Err(e) = session
                            .store
                            .update_field(&id, |f| f.set_geometry(geometry))
                        {
                            warn!("gesture update failed:", e.to_string());
                        }
                    }
                    true
                }
                Err(e) => {
                    warn!("gesture aborted:", e.to_string());
                    false
                }
            }
        }
        Msg::PointerUp => {
            component.gesture_listeners = None;
            let mut session = session.borrow_mut();
            let clamps = component.selection.pointer_up(session.store.fields());
            for (id, geometry) in clamps {
                if let Err(e) = session.store.update_field(&id, |f| f.set_geometry(geometry)) {
                    warn!("clamp failed:", e.to_string());
                }
            }
            true
        }

        Msg::FieldDoubleClick(id) => {
            let editable = session
                .borrow()
                .store
                .get(&id)
                .is_some_and(|f| !f.is_signature());
            if editable {
                component.editing_field = Some(id.clone());
                component.selection.select_only(&id);
                true
            } else {
                false
            }
        }
        Msg::EditInput { id, value } => {
            // Typing into a flagged field clears its error immediately.
            component.validation_errors.clear(&id);
            let mut session = session.borrow_mut();
            if let Err(e) = session.store.update_field(&id, |f| f.set_value(value)) {
                warn!("edit failed:", e.to_string());
            }
            true
        }
        Msg::EditCommit(id) => {
            component.editing_field = None;
            let mut session = session.borrow_mut();
            // The title field mirrors the procedure name.
            let title_value = session
                .store
                .get(&id)
                .filter(|f| f.is_title_field())
                .map(|f| f.value().to_string());
            if let Some(value) = title_value {
                session.meta.procedure_name = value;
                session.refresh_bindings();
            }
            component.validation_errors.clear(&id);
            true
        }

        Msg::AddField(preset) => {
            let mut session = session.borrow_mut();
            let field = session.preset_field(preset, component.current_page);
            let id = field.id().to_string();
            match session.store.add_field(field) {
                Ok(()) => component.selection.select_only(&id),
                Err(e) => warn!("add failed:", e.to_string()),
            }
            true
        }
        Msg::DeleteField(id) => {
            session.borrow_mut().store.remove_field(&id);
            component.selection.on_field_removed(&id);
            component.validation_errors.clear(&id);
            if component.editing_field.as_deref() == Some(id.as_str()) {
                component.editing_field = None;
            }
            true
        }
        Msg::DeleteSelected => {
            let ids = component.selection.take_selected();
            let mut session = session.borrow_mut();
            for id in ids {
                session.store.remove_field(&id);
                component.validation_errors.clear(&id);
            }
            component.editing_field = None;
            true
        }

        Msg::LabelInput(label) => {
            edit_single_selection(component, ctx, |f| f.set_label(label))
        }
        Msg::ValueInput(value) => {
            let Some(id) = component.selection.single_selection().map(str::to_string) else {
                return false;
            };
            component.validation_errors.clear(&id);
            let mut session = session.borrow_mut();
            if let Err(e) = session
                .store
                .update_field(&id, |f| f.set_value(value.clone()))
            {
                warn!("value edit failed:", e.to_string());
            }
            let is_title = session.store.get(&id).is_some_and(Field::is_title_field);
            if is_title {
                session.meta.procedure_name = value;
                session.refresh_bindings();
            }
            true
        }
        Msg::BumpFontSize(delta) => edit_single_selection(component, ctx, |f| {
            if let Some(style) = f.style_mut() {
                style.font_size = style
                    .font_size
                    .saturating_add_signed(delta)
                    .clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
            }
        }),
        Msg::ToggleBold => edit_single_selection(component, ctx, |f| {
            if let Some(style) = f.style_mut() {
                style.font_weight = match style.font_weight {
                    FontWeight::Bold => FontWeight::Normal,
                    FontWeight::Normal => FontWeight::Bold,
                };
            }
        }),
        Msg::SetAlign(align) => edit_single_selection(component, ctx, |f| {
            if let Some(style) = f.style_mut() {
                style.text_align = align;
            }
        }),

        Msg::PatientNameInput(value) => {
            let mut session = session.borrow_mut();
            session.patient.full_name = value;
            session.refresh_bindings();
            true
        }
        Msg::DoctorNameInput(value) => {
            let mut session = session.borrow_mut();
            session.meta.doctor_name = value;
            session.refresh_bindings();
            true
        }
        Msg::ClinicNameInput(value) => {
            let mut session = session.borrow_mut();
            session.meta.clinic_name = value;
            session.refresh_bindings();
            true
        }
        Msg::ProcedureNameInput(value) => {
            let mut session = session.borrow_mut();
            session.meta.procedure_name = value.clone();
            session.refresh_bindings();
            // Title fields echo the procedure name in display caps.
            let title_ids: Vec<String> = session
                .store
                .fields()
                .iter()
                .filter(|f| f.is_title_field())
                .map(|f| f.id().to_string())
                .collect();
            for id in title_ids {
                let upper = value.to_uppercase();
                let _ = session.store.update_field(&id, |f| f.set_value(upper));
            }
            true
        }

        Msg::PrevPage => {
            if component.current_page > 1 {
                component.current_page -= 1;
                component.selection.clear();
                true
            } else {
                false
            }
        }
        Msg::NextPage => {
            if component.current_page < component.page_count() {
                component.current_page += 1;
                component.selection.clear();
                true
            } else {
                false
            }
        }

        Msg::SendClicked => {
            let errors = validate_fields(session.borrow().store.fields(), is_valid_date);
            if errors.is_empty() {
                component.validation_errors.clear_all();
                component.show_send_confirm = true;
            } else {
                component.validation_errors = errors;
                show_toast("Some fields need attention before sending.");
            }
            true
        }
        Msg::CancelSend => {
            component.show_send_confirm = false;
            true
        }
        Msg::ConfirmSend => {
            component.show_send_confirm = false;
            component.sending = true;
            let request = build_send_request(&session);
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::send_document(&request).await;
                link.send_message(Msg::SendFinished(result));
            });
            true
        }
        Msg::SendFinished(result) => {
            component.sending = false;
            match result {
                Ok(document_id) => {
                    session.borrow_mut().document_id = Some(document_id.clone());
                    show_toast("Document sent to the patient for signing.");
                    ctx.props().on_sent.emit(document_id);
                }
                Err(error) => {
                    warn!(format!("send failed: {error}"));
                    show_toast("Sending failed. Please try again.");
                }
            }
            true
        }
        Msg::SaveTemplate => {
            let request = build_send_request(&session);
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::save_template(&request).await;
                link.send_message(Msg::TemplateSaved(result));
            });
            false
        }
        Msg::TemplateSaved(result) => {
            match result {
                Ok(()) => show_toast("Template saved."),
                Err(error) => {
                    warn!(format!("template save failed: {error}"));
                    show_toast("Saving the template failed.");
                }
            }
            false
        }

        Msg::LoadTemplates => {
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::list_templates().await;
                link.send_message(Msg::TemplatesLoaded(result));
            });
            false
        }
        Msg::TemplatesLoaded(result) => match result {
            Ok(templates) => {
                component.templates = templates;
                true
            }
            Err(error) => {
                // The picker just stays empty; authoring works without it.
                warn!(format!("template listing failed: {error}"));
                false
            }
        },
        Msg::TemplateSelected(id) => {
            if id.is_empty() || component.loading_template {
                return false;
            }
            component.loading_template = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::fetch_template(&id).await;
                link.send_message(Msg::TemplateLoaded(result));
            });
            true
        }
        Msg::TemplateLoaded(result) => {
            component.loading_template = false;
            match result {
                Ok(template) => {
                    component.selection.clear();
                    component.editing_field = None;
                    component.validation_errors.clear_all();
                    let mut session = session.borrow_mut();
                    session.meta.procedure_name = template.meta.procedure_name;
                    session.store.set_fields(template.fields);
                    // Bound fields track the live session, not the values
                    // the template was saved with.
                    session.refresh_bindings();
                    show_toast("Template loaded.");
                }
                Err(error) => {
                    warn!(format!("template load failed: {error}"));
                    show_toast("Loading the template failed.");
                }
            }
            true
        }
    }
}

fn edit_single_selection(
    component: &mut DoctorEditor,
    ctx: &Context<DoctorEditor>,
    edit: impl FnOnce(&mut Field),
) -> bool {
    let Some(id) = component.selection.single_selection().map(str::to_string) else {
        return false;
    };
    if let Err(e) = ctx
        .props()
        .session
        .borrow_mut()
        .store
        .update_field(&id, edit)
    {
        warn!("field edit failed:", e.to_string());
    }
    true
}

fn fallback_page(session: &crate::session::SessionHandle) -> Option<common::model::PageImage> {
    use common::geometry::{DEFAULT_PAGE_HEIGHT, LOGICAL_PAGE_WIDTH};
    session
        .borrow()
        .preview_url
        .clone()
        .map(|url| common::model::PageImage {
            url,
            width: LOGICAL_PAGE_WIDTH,
            height: DEFAULT_PAGE_HEIGHT,
        })
}

fn build_send_request(session: &crate::session::SessionHandle) -> common::model::SendRequest {
    let session = session.borrow();
    common::model::SendRequest {
        patient: session.patient.clone(),
        fields: session.store.fields().to_vec(),
        file_url: session.file_url(),
        meta: session.meta.clone(),
    }
}
