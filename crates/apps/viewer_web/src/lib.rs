use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};

use catalog::{ButtonKind, MENU};
use formats::{LoadProgress, ModelAsset, ModelLoadError, parse_glb};
use foundation::ids::ModelId;
use handoff::ArHandoff;
use session::{LoadOutcome, LoadTicket, ViewerConfig, ViewerSession};

pub mod dom;
mod wgpu;
use dom::{BrowserHost, js_error_string};
use wgpu::{WgpuContext, init_wgpu_from_canvas_id, render_frame, resize_wgpu, upload_model};

#[derive(Debug)]
pub struct ViewerState {
    pub session: ViewerSession,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub wgpu: Option<WgpuContext>,
    /// DOM listeners and the render loop are installed once.
    pub bound: bool,
}

impl ViewerState {
    fn new(config: ViewerConfig) -> Self {
        let mut session = ViewerSession::new(config);
        session.resize(1280.0, 720.0);
        Self {
            session,
            canvas_width: 1280.0,
            canvas_height: 720.0,
            wgpu: None,
            bound: false,
        }
    }
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::new(ViewerConfig::default()));
}

fn render_scene(timestamp_ms: f64) {
    STATE.with(|state_ref| {
        let mut state = state_ref.borrow_mut();
        let ViewerState { session, wgpu, .. } = &mut *state;
        let frame = session.tick(timestamp_ms);
        if let Some(ctx) = wgpu {
            let world = session.world();
            upload_model(ctx, world.active_entity().zip(world.active()));
            if let Err(err) = render_frame(ctx, &frame) {
                log::warn!("render failed: {}", js_error_string(&err));
            }
        }
    });
}

/// Requests `model` and resolves it in the background.
fn request_model(model: ModelId) {
    let ticket = STATE.with(|state| state.borrow_mut().session.switch_model(model));
    dom::set_loading_visible(true);

    spawn_local(async move {
        let result = fetch_model(&ticket).await;
        let (outcome, visible) = STATE.with(|state| {
            let mut s = state.borrow_mut();
            let outcome = s.session.complete_load(ticket, result);
            (outcome, s.session.loading_visible())
        });
        if outcome != LoadOutcome::Stale {
            dom::set_loading_visible(visible);
        }
    });
}

async fn fetch_model(ticket: &LoadTicket) -> Result<ModelAsset, ModelLoadError> {
    let url = ticket.url.clone();
    let resp = Request::get(&url)
        .send()
        .await
        .map_err(|e| ModelLoadError::Fetch {
            url: url.clone(),
            message: e.to_string(),
        })?;
    if !resp.ok() {
        return Err(ModelLoadError::Status {
            url,
            status: resp.status(),
        });
    }

    let total = resp
        .headers()
        .get("content-length")
        .and_then(|v| v.parse::<u64>().ok());
    let bytes = match resp.body() {
        Some(body) => read_body(body, ticket, total)
            .await
            .map_err(|e| ModelLoadError::Fetch {
                url: url.clone(),
                message: js_error_string(&e),
            })?,
        None => {
            let bytes = resp.binary().await.map_err(|e| ModelLoadError::Fetch {
                url: url.clone(),
                message: e.to_string(),
            })?;
            report_progress(ticket, LoadProgress::new(bytes.len() as u64, total));
            bytes
        }
    };

    parse_glb(&bytes).map_err(|source| ModelLoadError::Parse { url, source })
}

/// Upper bound on the buffer reserved from an advertised content length.
const MAX_PREALLOC_BYTES: u64 = 64 << 20;

fn report_progress(ticket: &LoadTicket, progress: LoadProgress) {
    STATE.with(|state| state.borrow_mut().session.report_progress(ticket, progress));
}

/// Drains `body` chunk by chunk, reporting progress after each one.
async fn read_body(
    body: web_sys::ReadableStream,
    ticket: &LoadTicket,
    total: Option<u64>,
) -> Result<Vec<u8>, JsValue> {
    let reader = body
        .get_reader()
        .unchecked_into::<web_sys::ReadableStreamDefaultReader>();
    let done_key = JsValue::from_str("done");
    let value_key = JsValue::from_str("value");

    let mut bytes = Vec::with_capacity(total.unwrap_or(0).min(MAX_PREALLOC_BYTES) as usize);
    loop {
        let result = JsFuture::from(reader.read()).await?;
        if js_sys::Reflect::get(&result, &done_key)?.is_truthy() {
            break;
        }
        let chunk = js_sys::Uint8Array::new(&js_sys::Reflect::get(&result, &value_key)?);
        let start = bytes.len();
        bytes.resize(start + chunk.length() as usize, 0);
        chunk.copy_to(&mut bytes[start..]);
        report_progress(ticket, LoadProgress::new(bytes.len() as u64, total));
    }
    Ok(bytes)
}

fn bind_page() -> Result<(), JsValue> {
    for entry in MENU {
        let model = entry
            .model_id()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        for (id, kind) in entry.buttons() {
            let model = model.clone();
            let bound = dom::on_click(id, move || {
                request_model(model.clone());
                if kind == ButtonKind::Menu {
                    dom::close_menu();
                }
            })?;
            if !bound {
                log::debug!("button #{id} not in page");
            }
        }
    }

    if !dom::on_click(dom::AR_BUTTON_ID, || {
        if let Err(err) = start_ar() {
            log::error!("AR handoff failed: {}", js_error_string(&err));
        }
    })? {
        log::warn!("#{} not in page; AR only via start_ar()", dom::AR_BUTTON_ID);
    }

    dom::on_resize(|w, h| set_canvas_sizes(w, h))?;

    if let Some(canvas) = dom::document()?
        .get_element_by_id(dom::CANVAS_ID)
        .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
    {
        dom::bind_orbit_input(
            &canvas,
            |dx, dy, h| {
                STATE.with(|state| state.borrow_mut().session.orbit(dx, dy, h));
            },
            |delta| {
                STATE.with(|state| state.borrow_mut().session.zoom(delta));
            },
        )?;
    }

    Ok(())
}

/// Runs `render_scene` on every animation frame for the lifetime of the page.
fn start_render_loop() -> Result<(), JsValue> {
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp_ms: f64| {
        render_scene(timestamp_ms);
        if let Some(cb) = f.borrow().as_ref() {
            if let Ok(win) = dom::window() {
                let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut(f64)>));

    let win = dom::window()?;
    if let Some(cb) = g.borrow().as_ref() {
        win.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    console_log::init_with_level(log::Level::Info).ok();
    Ok(())
}

/// Overrides the viewer configuration. Call before `init_wgpu`; calling it
/// later resets the scene and reloads the initial model.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = ViewerConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let initial = ModelId::new(config.initial_model.clone())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let reload = STATE.with(|state| {
        let mut s = state.borrow_mut();
        let (w, h) = (s.canvas_width, s.canvas_height);
        s.session = ViewerSession::new(config);
        s.session.resize(w, h);
        s.bound
    });
    if reload {
        request_model(initial);
    }
    Ok(())
}

/// Binds the page, loads the initial model, starts the render loop and
/// brings up the GPU surface.
#[wasm_bindgen]
pub fn init_wgpu() {
    let first = STATE.with(|state| {
        let mut s = state.borrow_mut();
        !std::mem::replace(&mut s.bound, true)
    });
    if first {
        if let Err(err) = bind_page().and_then(|_| start_render_loop()) {
            log::error!("page setup failed: {}", js_error_string(&err));
        }
        let initial = STATE.with(|state| state.borrow().session.config().initial_model.clone());
        match ModelId::new(initial) {
            Ok(model) => request_model(model),
            Err(err) => log::error!("initial model: {err}"),
        }
    }

    spawn_local(async move {
        if let Err(err) = init_wgpu_inner().await {
            web_sys::console::log_1(&JsValue::from_str(&format!("wgpu init error: {:?}", err)));
        }
    });
}

#[wasm_bindgen]
pub fn set_canvas_sizes(width: f64, height: f64) {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.canvas_width = width;
        s.canvas_height = height;
        s.session.resize(width, height);
        dom::size_canvas(width, height);
        if let Some(ctx) = &mut s.wgpu {
            resize_wgpu(ctx, width as u32, height as u32);
        }
    });
}

/// Orbit around the model.
///
/// Intended usage: call with pointer delta in pixels.
#[wasm_bindgen]
pub fn camera_orbit(delta_x_px: f64, delta_y_px: f64) {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let h = s.canvas_height;
        s.session.orbit(delta_x_px, delta_y_px, h);
    });
}

/// Zoom (dolly) in/out.
///
/// Intended usage: call with wheel deltaY.
#[wasm_bindgen]
pub fn camera_zoom(wheel_delta_y: f64) {
    STATE.with(|state| state.borrow_mut().session.zoom(wheel_delta_y));
}

#[wasm_bindgen]
pub fn switch_model(id: &str) -> Result<(), JsValue> {
    let model = ModelId::new(id).map_err(|e| JsValue::from_str(&e.to_string()))?;
    request_model(model);
    Ok(())
}

#[wasm_bindgen]
pub fn current_model() -> Option<String> {
    STATE.with(|state| {
        state
            .borrow()
            .session
            .current_model()
            .map(|m| m.as_str().to_string())
    })
}

/// Opens the current model in the platform's AR viewer.
#[wasm_bindgen]
pub fn start_ar() -> Result<(), JsValue> {
    let Some(request) = STATE.with(|state| state.borrow().session.ar_request()) else {
        log::warn!("no model selected; ignoring AR request");
        return Ok(());
    };
    log::info!("{} {}", request.glb_path, request.usdz_path);

    let host = BrowserHost::new()?;
    let signals = host.platform_signals();
    let result = ArHandoff::default().launch(&request, &signals, &host);
    STATE.with(|state| state.borrow_mut().session.record_handoff(&result));
    result
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

async fn init_wgpu_inner() -> Result<(), JsValue> {
    let mut ctx = init_wgpu_from_canvas_id(dom::CANVAS_ID).await?;

    let (w, h) = dom::inner_size(&dom::window()?);
    resize_wgpu(&mut ctx, w as u32, h as u32);

    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.canvas_width = w;
        s.canvas_height = h;
        s.session.resize(w, h);
        s.wgpu = Some(ctx);
    });
    Ok(())
}
