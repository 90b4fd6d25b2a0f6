use handoff::{HandoffError, HandoffHost, PlatformSignals, QuickLookAnchor};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlAnchorElement, HtmlElement, Window};

pub const CANVAS_ID: &str = "viewer-canvas";
pub const PROGRESS_ID: &str = "progress-container";
pub const MENU_CONTAINER_ID: &str = "Container_Menu";
pub const AR_BUTTON_ID: &str = "AR-btn";

/// Global function some Huawei browsers expose for native AR.
const HARMONY_PROBE_FN: &str = "checkHarmonyOSFeatures";

pub fn js_error_string(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("document missing"))
}

fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn set_style(document: &Document, id: &str, property: &str, value: &str) {
    let Some(el) = html_element(document, id) else {
        log::debug!("#{id} not in page; skipping {property}");
        return;
    };
    if let Err(err) = el.style().set_property(property, value) {
        log::warn!("cannot set {property} on #{id}: {}", js_error_string(&err));
    }
}

pub fn set_loading_visible(visible: bool) {
    if let Ok(document) = document() {
        set_style(
            &document,
            PROGRESS_ID,
            "display",
            if visible { "block" } else { "none" },
        );
    }
}

pub fn close_menu() {
    if let Ok(document) = document() {
        set_style(&document, MENU_CONTAINER_ID, "width", "0%");
    }
}

/// Calls `handler` on every click of `#id`. Returns `false` when the element
/// is not in the page.
pub fn on_click(id: &str, mut handler: impl FnMut() + 'static) -> Result<bool, JsValue> {
    let Some(el) = document()?.get_element_by_id(id) else {
        return Ok(false);
    };
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        handler();
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(true)
}

pub fn on_resize(mut handler: impl FnMut(f64, f64) + 'static) -> Result<(), JsValue> {
    let win = window()?;
    let closure = {
        let win = win.clone();
        Closure::wrap(Box::new(move || {
            let (w, h) = inner_size(&win);
            handler(w, h);
        }) as Box<dyn FnMut()>)
    };
    win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn inner_size(win: &Window) -> (f64, f64) {
    let w = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1280.0);
    let h = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(720.0);
    (w, h)
}

/// Matches the drawing buffer of the render canvas to `width` x `height`.
pub fn size_canvas(width: f64, height: f64) {
    let canvas = document().ok().and_then(|d| {
        d.get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
    });
    if let Some(canvas) = canvas {
        canvas.set_width(width.max(1.0) as u32);
        canvas.set_height(height.max(1.0) as u32);
    }
}

/// Drag-to-orbit and wheel-to-zoom on the canvas. Pointer events cover
/// mouse and touch alike.
pub fn bind_orbit_input(
    canvas: &web_sys::HtmlCanvasElement,
    orbit: impl Fn(f64, f64, f64) + 'static,
    zoom: impl Fn(f64) + 'static,
) -> Result<(), JsValue> {
    use std::cell::Cell;
    use std::rc::Rc;

    let last: Rc<Cell<Option<(i32, i32)>>> = Rc::new(Cell::new(None));

    {
        let last = last.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::PointerEvent| {
            last.set(Some((event.client_x(), event.client_y())));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let last = last.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::PointerEvent| {
            let Some((x0, y0)) = last.get() else {
                return;
            };
            let (x, y) = (event.client_x(), event.client_y());
            last.set(Some((x, y)));
            let height = f64::from(canvas_clone.client_height());
            orbit(f64::from(x - x0), f64::from(y - y0), height);
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    for kind in ["pointerup", "pointercancel", "pointerleave"] {
        let last = last.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::PointerEvent| {
            last.set(None);
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let closure = Closure::wrap(Box::new(move |event: web_sys::WheelEvent| {
        event.prevent_default();
        zoom(event.delta_y());
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref())?;
    closure.forget();

    Ok(())
}

/// Browser side of the AR handoff.
#[derive(Debug, Clone)]
pub struct BrowserHost {
    window: Window,
    document: Document,
}

impl BrowserHost {
    pub fn new() -> Result<Self, JsValue> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("document missing"))?;
        Ok(Self { window, document })
    }

    pub fn platform_signals(&self) -> PlatformSignals {
        let navigator = self.window.navigator();
        PlatformSignals {
            user_agent: navigator.user_agent().unwrap_or_default(),
            platform: navigator.platform().unwrap_or_default(),
            max_touch_points: u32::try_from(navigator.max_touch_points()).unwrap_or(0),
            legacy_trident: js_sys::Reflect::get(&self.window, &JsValue::from_str("MSStream"))
                .map(|v| v.is_truthy())
                .unwrap_or(false),
        }
    }
}

impl HandoffHost for BrowserHost {
    type Anchor = HtmlAnchorElement;

    fn document_url(&self) -> Result<String, HandoffError> {
        self.window
            .location()
            .href()
            .map_err(|e| HandoffError::Navigation(js_error_string(&e)))
    }

    fn navigate(&self, url: &str) -> Result<(), HandoffError> {
        self.window
            .location()
            .set_href(url)
            .map_err(|e| HandoffError::Navigation(js_error_string(&e)))
    }

    fn mount_anchor(&self, spec: &QuickLookAnchor) -> Result<HtmlAnchorElement, HandoffError> {
        let dom_err = |e: JsValue| HandoffError::Dom(js_error_string(&e));
        let anchor = self
            .document
            .create_element("a")
            .map_err(dom_err)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| HandoffError::Dom("created element is not an anchor".to_string()))?;
        anchor.set_rel(spec.rel);
        anchor.set_href(&spec.href);
        anchor.set_inner_html(&spec.inner_html());

        let body = self
            .document
            .body()
            .ok_or_else(|| HandoffError::Dom("document has no body".to_string()))?;
        body.append_child(&anchor).map_err(dom_err)?;
        Ok(anchor)
    }

    fn click_anchor(&self, anchor: &HtmlAnchorElement) -> Result<(), HandoffError> {
        anchor.click();
        Ok(())
    }

    fn remove_anchor_after(&self, anchor: HtmlAnchorElement, delay_ms: u32) {
        let fallback = anchor.clone();
        let callback = Closure::once_into_js(move || {
            anchor.remove();
            log::debug!("AR link removed");
        });
        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                i32::try_from(delay_ms).unwrap_or(i32::MAX),
            );
        if let Err(err) = scheduled {
            log::warn!(
                "cannot schedule AR link removal ({}); removing now",
                js_error_string(&err)
            );
            fallback.remove();
        }
    }

    fn probe_harmony(&self) -> bool {
        let probe = js_sys::Reflect::get(&self.window, &JsValue::from_str(HARMONY_PROBE_FN))
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok());
        let Some(probe) = probe else {
            log::debug!("{HARMONY_PROBE_FN} not available");
            return false;
        };
        match probe.call0(&self.window) {
            Ok(result) => result.is_truthy(),
            Err(err) => {
                log::warn!("{HARMONY_PROBE_FN} threw: {}", js_error_string(&err));
                false
            }
        }
    }

    fn notify_unsupported(&self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            log::warn!("alert failed: {}", js_error_string(&err));
        }
    }
}
