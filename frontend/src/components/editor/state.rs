//! State struct for the authoring editor component.

use std::rc::Rc;

use common::geometry::{self, DEFAULT_PAGE_HEIGHT, LOGICAL_PAGE_WIDTH};
use common::model::{PageImage, TemplateSummary};
use common::selection::SelectionController;
use common::store::SubscriptionId;
use common::validation::ValidationErrors;
use gloo_events::EventListener;
use web_sys::HtmlElement;
use yew::prelude::*;

/// Horizontal padding reserved around the page when fitting it into the
/// canvas wrapper.
pub const CANVAS_PADDING_PX: f64 = 40.0;

/// Font size bounds for the sidebar stepper.
pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 72;

pub struct DoctorEditor {
    pub selection: SelectionController,
    /// Field currently in inline-edit mode, if any.
    pub editing_field: Option<String>,
    /// Validation failures by field id, refreshed when a send is attempted
    /// and cleared per field as soon as the field is edited.
    pub validation_errors: ValidationErrors,

    /// Templates offered by the sidebar picker.
    pub templates: Vec<TemplateSummary>,
    pub loading_template: bool,

    // Rasterized pages and the staleness guard for in-flight requests.
    pub pages: Option<Rc<Vec<PageImage>>>,
    pub raster_error: Option<String>,
    pub rasterizing: bool,
    pub raster_generation: u64,

    pub current_page: u32,
    pub scale: f64,
    pub wrapper_ref: NodeRef,

    // Listener handles; dropping them detaches the DOM listeners.
    pub resize_listener: Option<EventListener>,
    pub gesture_listeners: Option<(EventListener, EventListener)>,
    pub store_subscription: Option<SubscriptionId>,

    pub sending: bool,
    pub show_send_confirm: bool,
}

impl DoctorEditor {
    pub fn new() -> Self {
        Self {
            selection: SelectionController::new(),
            editing_field: None,
            validation_errors: ValidationErrors::default(),
            templates: Vec::new(),
            loading_template: false,
            pages: None,
            raster_error: None,
            rasterizing: false,
            raster_generation: 0,
            current_page: 1,
            scale: 1.0,
            wrapper_ref: NodeRef::default(),
            resize_listener: None,
            gesture_listeners: None,
            store_subscription: None,
            sending: false,
            show_send_confirm: false,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.pages.as_ref().map_or(1, |p| p.len() as u32)
    }

    /// Logical height of the displayed page. Page dimensions are uniform
    /// across the document, so the first page is authoritative.
    pub fn page_height(&self) -> f64 {
        self.pages
            .as_ref()
            .and_then(|p| p.first())
            .map_or(DEFAULT_PAGE_HEIGHT, |p| p.height)
    }

    /// Displayed page container size in pixels, the reference for every
    /// pixel-to-percent conversion.
    pub fn container_px(&self) -> (f64, f64) {
        (
            LOGICAL_PAGE_WIDTH * self.scale,
            self.page_height() * self.scale,
        )
    }

    /// Re-measures the wrapper and computes the fit scale. `None` when the
    /// wrapper is not mounted yet.
    pub fn measure_scale(&self) -> Option<f64> {
        let wrapper = self.wrapper_ref.cast::<HtmlElement>()?;
        let width = wrapper.get_bounding_client_rect().width();
        Some(geometry::fit_scale(
            (width - CANVAS_PADDING_PX).max(0.0),
            LOGICAL_PAGE_WIDTH,
        ))
    }

    pub fn current_page_image(&self) -> Option<&PageImage> {
        self.pages
            .as_ref()
            .and_then(|p| p.get(self.current_page.saturating_sub(1) as usize))
    }
}
