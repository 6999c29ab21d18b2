//! Authoring editor: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering, and the sidebar.
//!
//! Responsibilities
//! - Re-export selected types (`Msg`, `DoctorEditorProps`, `DoctorEditor`).
//! - Provide the `Component` implementation that delegates to
//!   `update::update` and `view::view`.
//! - Subscribe to the session's field store on creation so store mutations
//!   re-render the canvas, and unsubscribe on teardown.
//! - On first render, seed the default fields, start rasterization, fetch
//!   the saved template list, and attach the window resize listener that
//!   keeps the fit scale current.

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;
use yew::prelude::*;

mod messages;
mod props;
mod sidebar;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::DoctorEditorProps;
pub use state::DoctorEditor;

impl Component for DoctorEditor {
    type Message = Msg;
    type Properties = DoctorEditorProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut component = DoctorEditor::new();

        let mut session = ctx.props().session.borrow_mut();
        if session.store.is_empty() {
            session.seed_default_fields();
        }
        let link = ctx.link().clone();
        component.store_subscription = Some(
            session
                .store
                .subscribe(std::rc::Rc::new(move |_| link.send_message(Msg::StoreChanged))),
        );
        drop(session);

        component
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            if let Some(window) = web_sys::window() {
                let link = ctx.link().clone();
                self.resize_listener = Some(EventListener::new(&window, "resize", move |_| {
                    link.send_message(Msg::ViewportChanged);
                }));
            }
            ctx.link().send_message_batch(vec![
                Msg::ViewportChanged,
                Msg::BeginRasterize,
                Msg::LoadTemplates,
            ]);
        }
    }

    fn destroy(&mut self, ctx: &Context<Self>) {
        if let Some(subscription) = self.store_subscription.take() {
            ctx.props().session.borrow_mut().store.unsubscribe(subscription);
        }
    }
}

/// Installs window-level mousemove/mouseup listeners for the duration of a
/// drag or resize, so the gesture survives the pointer leaving the field.
/// Dropping the handles on pointer-up detaches them.
fn attach_gesture_listeners(component: &mut DoctorEditor, ctx: &Context<DoctorEditor>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let link = ctx.link().clone();
    let mousemove = EventListener::new(&window, "mousemove", move |e| {
        if let Some(e) = e.dyn_ref::<MouseEvent>() {
            link.send_message(Msg::PointerMoved {
                x: e.client_x() as f64,
                y: e.client_y() as f64,
            });
        }
    });
    let link = ctx.link().clone();
    let mouseup = EventListener::new(&window, "mouseup", move |_| {
        link.send_message(Msg::PointerUp);
    });
    component.gesture_listeners = Some((mousemove, mouseup));
}
