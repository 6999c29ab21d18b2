//! Read-only signing viewer.
//!
//! Renders every page of the document in a vertical stack with the field
//! overlays in read-only mode: no selection, no handles, no editing. Text
//! and date fields display their values (falling back to the signer's name
//! when a bound value is empty), and signature fields show either the
//! captured signature or a click-to-sign affordance.

use std::rc::Rc;

use common::geometry::{self, LOGICAL_PAGE_WIDTH};
use common::model::PageImage;
use common::model::field::Field;
use gloo_console::warn;
use gloo_events::EventListener;
use web_sys::HtmlElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::field_layer::{render_field, FieldCaps};
use crate::session::SessionHandle;

#[derive(Properties, PartialEq)]
pub struct DocumentViewerProps {
    pub session: SessionHandle,
    /// Captured signature, applied to every signature field once present.
    pub signature: Option<AttrValue>,
    pub on_sign: Callback<()>,
}

pub enum Msg {
    BeginRasterize,
    RasterReady {
        generation: u64,
        result: Result<Rc<Vec<PageImage>>, String>,
    },
    ViewportChanged,
}

pub struct DocumentViewer {
    pages: Option<Rc<Vec<PageImage>>>,
    raster_error: Option<String>,
    raster_generation: u64,
    scale: f64,
    wrapper_ref: NodeRef,
    resize_listener: Option<EventListener>,
}

impl Component for DocumentViewer {
    type Message = Msg;
    type Properties = DocumentViewerProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            pages: None,
            raster_error: None,
            raster_generation: 0,
            scale: 1.0,
            wrapper_ref: NodeRef::default(),
            resize_listener: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::BeginRasterize => {
                let (rasterizer, source) = {
                    let session = ctx.props().session.borrow();
                    match &session.source {
                        Some(source) => (session.rasterizer.clone(), source.clone()),
                        None => return false,
                    }
                };
                self.raster_generation += 1;
                let generation = self.raster_generation;
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
                if generation != self.raster_generation {
                    return false;
                }
                match result {
                    Ok(pages) => {
                        self.pages = Some(pages);
                        self.raster_error = None;
                        ctx.link().send_message(Msg::ViewportChanged);
                    }
                    Err(error) => {
                        warn!(format!("rasterization failed: {error}"));
                        let preview = ctx.props().session.borrow().preview_url.clone();
                        match preview {
                            Some(url) => {
                                self.pages = Some(Rc::new(vec![PageImage {
                                    url,
                                    width: LOGICAL_PAGE_WIDTH,
                                    height: common::geometry::DEFAULT_PAGE_HEIGHT,
                                }]));
                                self.raster_error = None;
                            }
                            None => self.raster_error = Some(error),
                        }
                    }
                }
                true
            }
            Msg::ViewportChanged => {
                let Some(wrapper) = self.wrapper_ref.cast::<HtmlElement>() else {
                    return false;
                };
                let width = wrapper.get_bounding_client_rect().width();
                let scale = geometry::fit_scale((width - 40.0).max(0.0), LOGICAL_PAGE_WIDTH);
                if (scale - self.scale).abs() > 1e-3 {
                    self.scale = scale;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div
                ref={self.wrapper_ref.clone()}
                style="flex: 1; overflow: auto; display: flex; flex-direction: column; \
                       align-items: center; gap: 24px; padding: 20px; background: #f1f5f9;"
            >
                { self.render_pages(ctx) }
            </div>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            if let Some(window) = web_sys::window() {
                let link = ctx.link().clone();
                self.resize_listener = Some(EventListener::new(&window, "resize", move |_| {
                    link.send_message(Msg::ViewportChanged);
                }));
            }
            ctx.link()
                .send_message_batch(vec![Msg::ViewportChanged, Msg::BeginRasterize]);
        }
    }
}

impl DocumentViewer {
    fn render_pages(&self, ctx: &Context<Self>) -> Html {
        if let Some(error) = &self.raster_error {
            return html! {
                <div style="padding: 80px; color: #dc2626; font-family: Arial, sans-serif;">
                    { format!("Document unavailable: {error}") }
                </div>
            };
        }
        let Some(pages) = &self.pages else {
            return html! {
                <div style="padding: 80px; color: #64748b; font-family: Arial, sans-serif;">
                    { "Loading document…" }
                </div>
            };
        };

        html! {
            { for pages
                .iter()
                .enumerate()
                .map(|(index, page)| self.render_page(ctx, index as u32 + 1, page)) }
        }
    }

    fn render_page(&self, ctx: &Context<Self>, number: u32, page: &PageImage) -> Html {
        let session = ctx.props().session.borrow();
        let width_px = page.width * self.scale;
        let height_px = page.height * self.scale;
        let style = format!(
            "position: relative; width: {width_px}px; height: {height_px}px; \
             background-image: url('{}'); background-size: 100% 100%; \
             box-shadow: 0 2px 8px rgba(0, 0, 0, 0.15); flex-shrink: 0;",
            page.url,
        );
        html! {
            <div {style}>
                { for session
                    .store
                    .fields_on_page(number)
                    .map(|field| self.render_readonly_field(ctx, field)) }
            </div>
        }
    }

    fn render_readonly_field(&self, ctx: &Context<Self>, field: &Field) -> Html {
        let session = ctx.props().session.borrow();
        let caps = FieldCaps {
            fallback_value: Some(session.patient.full_name.clone()),
            signature: ctx.props().signature.as_ref().map(|s| s.to_string()),
            on_sign: Some(ctx.props().on_sign.clone()),
            ..FieldCaps::default()
        };
        render_field(field, self.scale, &caps)
    }
}
