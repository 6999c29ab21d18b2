//! Document rasterizer: turns a source reference into an ordered list of
//! page images at the fixed logical width.
//!
//! Raster image sources pass through as a single page. PDF sources go
//! through pdf.js, reached untyped via `js_sys::Reflect` against the
//! `pdfjsLib` global the host page loads; each page is rendered into an
//! offscreen canvas at `RENDER_WIDTH_PX / native_width` and exported as a
//! JPEG data URL. Decoding is expensive, so results are cached per source
//! URL, and a second request for a source that is already being rasterized
//! waits for the first instead of starting over.
//!
//! Rasterization never runs on the interactive path: callers `spawn_local`
//! it and guard staleness with a request generation counter.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use common::error::CoreError;
use common::geometry::{DEFAULT_PAGE_HEIGHT, LOGICAL_PAGE_WIDTH};
use common::model::{DocumentSource, PageImage, RasterPlan};
use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Pixel width pages are rasterized at. Double the logical width, so the
/// raster stays crisp when displayed at scale 1.
const RENDER_WIDTH_PX: f64 = 1600.0;

/// Polling interval while waiting on a rasterization started elsewhere.
const PENDING_POLL_MS: u32 = 50;

#[derive(Default)]
pub struct Rasterizer {
    cache: RefCell<HashMap<String, Rc<Vec<PageImage>>>>,
    pending: RefCell<HashSet<String>>,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterizes one source, serving repeats from the cache. Concurrent
    /// requests for the same source coalesce onto the first one's result.
    pub async fn rasterize(&self, source: &DocumentSource) -> Result<Rc<Vec<PageImage>>, CoreError> {
        loop {
            if let Some(pages) = self.cache.borrow().get(&source.url) {
                return Ok(pages.clone());
            }
            if self.pending.borrow().contains(&source.url) {
                gloo_timers::future::TimeoutFuture::new(PENDING_POLL_MS).await;
            } else {
                break;
            }
        }

        self.pending.borrow_mut().insert(source.url.clone());
        let result = self.rasterize_uncached(source).await;
        self.pending.borrow_mut().remove(&source.url);

        match result {
            Ok(pages) => {
                let pages = Rc::new(pages);
                self.cache
                    .borrow_mut()
                    .insert(source.url.clone(), pages.clone());
                Ok(pages)
            }
            Err(e) => Err(e),
        }
    }

    async fn rasterize_uncached(&self, source: &DocumentSource) -> Result<Vec<PageImage>, CoreError> {
        match source.raster_plan()? {
            RasterPlan::Passthrough(page) => Ok(vec![page]),
            RasterPlan::DecodePages => rasterize_pdf(&source.url).await,
        }
    }
}

async fn rasterize_pdf(url: &str) -> Result<Vec<PageImage>, CoreError> {
    let window =
        web_sys::window().ok_or_else(|| CoreError::RasterizationFailed("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| CoreError::RasterizationFailed("no document".into()))?;

    let pdfjs = get(window.as_ref(), "pdfjsLib")?;
    if pdfjs.is_undefined() || pdfjs.is_null() {
        return Err(CoreError::RasterizationFailed("pdf.js is not loaded".into()));
    }

    let get_document = method(&pdfjs, "getDocument")?;
    let params = Object::new();
    set(&params, "url", &JsValue::from_str(url))?;
    let task = get_document
        .call1(&pdfjs, &params)
        .map_err(|e| js_err("getDocument", e))?;
    let pdf = await_promise(get(&task, "promise")?, "document load").await?;

    let page_count = get(&pdf, "numPages")?.as_f64().unwrap_or(0.0) as u32;
    if page_count == 0 {
        return Err(CoreError::RasterizationFailed("document has no pages".into()));
    }
    let get_page = method(&pdf, "getPage")?;

    let mut pages = Vec::with_capacity(page_count as usize);
    let mut logical_height = DEFAULT_PAGE_HEIGHT;

    for number in 1..=page_count {
        let page_value = get_page
            .call1(&pdf, &JsValue::from_f64(number as f64))
            .map_err(|e| js_err("getPage", e))?;
        let page = await_promise(page_value, "page load").await?;
        let get_viewport = method(&page, "getViewport")?;

        let probe = get_viewport
            .call1(&page, &viewport_params(1.0)?.into())
            .map_err(|e| js_err("getViewport", e))?;
        let native_w = get(&probe, "width")?.as_f64().unwrap_or(0.0);
        let native_h = get(&probe, "height")?.as_f64().unwrap_or(0.0);
        if native_w <= 0.0 || native_h <= 0.0 {
            return Err(CoreError::RasterizationFailed(format!(
                "page {number} has a degenerate viewport"
            )));
        }

        let viewport = get_viewport
            .call1(&page, &viewport_params(RENDER_WIDTH_PX / native_w)?.into())
            .map_err(|e| js_err("getViewport", e))?;
        let px_w = get(&viewport, "width")?.as_f64().unwrap_or(RENDER_WIDTH_PX);
        let px_h = get(&viewport, "height")?
            .as_f64()
            .unwrap_or(RENDER_WIDTH_PX * native_h / native_w);

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| js_err("create canvas", e))?
            .dyn_into()
            .map_err(|_| CoreError::RasterizationFailed("canvas element cast failed".into()))?;
        canvas.set_width(px_w as u32);
        canvas.set_height(px_h as u32);
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| js_err("2d context", e))?
            .ok_or_else(|| CoreError::RasterizationFailed("no 2d context".into()))?
            .dyn_into()
            .map_err(|_| CoreError::RasterizationFailed("2d context cast failed".into()))?;

        let render = method(&page, "render")?;
        let render_params = Object::new();
        set(&render_params, "canvasContext", context.as_ref())?;
        set(&render_params, "viewport", &viewport)?;
        let render_task = render
            .call1(&page, &render_params)
            .map_err(|e| js_err("render", e))?;
        await_promise(get(&render_task, "promise")?, "page render").await?;

        let data_url = canvas
            .to_data_url_with_type("image/jpeg")
            .map_err(|e| js_err("encode page", e))?;

        // The first page fixes the logical height for the whole document:
        // uniform page dimensions are an enforced invariant, not an
        // accident of the source file.
        if number == 1 {
            logical_height = LOGICAL_PAGE_WIDTH * native_h / native_w;
        }
        pages.push(PageImage {
            url: data_url,
            width: LOGICAL_PAGE_WIDTH,
            height: logical_height,
        });
    }

    Ok(pages)
}

fn viewport_params(scale: f64) -> Result<Object, CoreError> {
    let params = Object::new();
    set(&params, "scale", &JsValue::from_f64(scale))?;
    Ok(params)
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, CoreError> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(|e| js_err(key, e))
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), CoreError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| js_err(key, e))
}

fn method(target: &JsValue, key: &str) -> Result<Function, CoreError> {
    get(target, key)?
        .dyn_into::<Function>()
        .map_err(|_| CoreError::RasterizationFailed(format!("missing function: {key}")))
}

async fn await_promise(value: JsValue, context: &str) -> Result<JsValue, CoreError> {
    let promise: Promise = value
        .dyn_into()
        .map_err(|_| CoreError::RasterizationFailed(format!("{context}: not a promise")))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| js_err(context, e))
}

fn js_err(context: &str, value: JsValue) -> CoreError {
    let detail = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"));
    CoreError::RasterizationFailed(format!("{context}: {detail}"))
}
