// web.rs - Browser driver (wasm32 only)
//
// Owns the canvas, the sprite image, the resize listener and the
// requestAnimationFrame loop. All state sits behind one Rc<RefCell<_>>
// shared with the JS callbacks; everything runs on the main thread.
//
// Resize handling:
//   - canvas size and field bounds follow the window immediately
//   - repopulation waits for the debounce quiet period, polled per frame

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, Window};

use super::{Debounce, FrameClock, Launch, Lifecycle, Viewport};
use crate::asset::{self, AssetState, SpriteSource};
use crate::config::FieldConfig;
use crate::error::{PetalError, Result};
use crate::render::{PetalRenderer, SpritePass, SpriteStyle};
use crate::sim::{Petal, PetalField};

type FrameCallback = Closure<dyn FnMut(f64)>;
type FrameSlot = Rc<RefCell<Option<FrameCallback>>>;

// ============================================================================
// Canvas renderer
// ============================================================================

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    image: HtmlImageElement,
    source: SpriteSource,
    style: SpriteStyle,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d, image: HtmlImageElement, config: &FieldConfig) -> Self {
        Self {
            ctx,
            image,
            source: SpriteSource::Image,
            style: SpriteStyle::from_config(config),
        }
    }

    pub fn set_source(&mut self, source: SpriteSource) {
        self.source = source;
    }

    fn draw_pass(&self, pass: &SpritePass) {
        let r = pass.rect;
        self.ctx.set_global_alpha(pass.alpha);

        match self.source {
            SpriteSource::Image => {
                if let Err(e) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(&self.image, r.x, r.y, r.w, r.h) {
                    log::debug!("drawImage failed: {:?}", e);
                }
            }
            SpriteSource::Shape => {
                let (start, segs) = asset::teardrop(r);
                // canvas resizes reset fillStyle, so set it every pass
                #[allow(deprecated)]
                self.ctx.set_fill_style(&JsValue::from_str(asset::PETAL_FILL));
                self.ctx.begin_path();
                self.ctx.move_to(start.0, start.1);
                for s in &segs {
                    self.ctx.bezier_curve_to(s.c1.0, s.c1.1, s.c2.0, s.c2.1, s.to.0, s.to.1);
                }
                self.ctx.close_path();
                self.ctx.fill();
            }
        }
    }
}

impl PetalRenderer for CanvasRenderer {
    fn clear(&mut self, w: f64, h: f64) {
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn draw(&mut self, p: &Petal) {
        self.ctx.save();
        // A petal whose transform failed would land at the origin; skip it.
        match self.ctx.translate(p.x, p.y).and_then(|_| self.ctx.rotate(p.angle)) {
            Ok(()) => {
                for pass in self.style.passes(p.size) {
                    self.draw_pass(&pass);
                }
            }
            Err(e) => log::debug!("petal skipped, transform failed: {:?}", e),
        }
        self.ctx.restore();
    }
}

// ============================================================================
// Shared loop state
// ============================================================================

struct Inner {
    window: Window,
    canvas: HtmlCanvasElement,
    viewport: Viewport,

    field: PetalField,
    renderer: CanvasRenderer,

    clock: FrameClock,
    resize: Debounce<Viewport>,
    life: Lifecycle,
    raf_id: Option<i32>,
}

impl Inner {
    fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    /// Size the canvas for `vp` and move the field bounds. Petals stay put.
    fn resize_to(&mut self, vp: Viewport) -> Result<()> {
        self.viewport = vp;

        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", vp.width)).map_err(PetalError::dom)?;
        style.set_property("height", &format!("{}px", vp.height)).map_err(PetalError::dom)?;

        let (bw, bh) = vp.backing_size();
        self.canvas.set_width(bw);
        self.canvas.set_height(bh);

        // Setting the size resets the context; map drawing units back to CSS px.
        self.renderer.ctx.set_transform(vp.dpr, 0.0, 0.0, vp.dpr, 0.0, 0.0).map_err(PetalError::dom)?;

        self.field.resize(vp.width, vp.height);
        Ok(())
    }

    fn frame(&mut self, now: f64) {
        if let Some(vp) = self.resize.poll(now) {
            self.field.reinitialize(vp.width, vp.height);
        }
        let elapsed = self.clock.tick(now);
        self.field.step(elapsed, &mut self.renderer);
    }
}

// ============================================================================
// Loop control
// ============================================================================

fn request_frame(window: &Window, cb: &FrameCallback) -> Result<i32> {
    window.request_animation_frame(cb.as_ref().unchecked_ref()).map_err(PetalError::dom)
}

/// Bring the loop live as `launch` says and request the first frame.
fn run_loop(inner: &Rc<RefCell<Inner>>, slot: &FrameSlot, launch: Launch) -> Result<()> {
    {
        let mut st = inner.borrow_mut();
        st.renderer.set_source(launch.source);

        if launch.populate {
            st.resize.cancel();
            let vp = st.viewport;
            st.field.reinitialize(vp.width, vp.height);
        } else if let Some(vp) = st.resize.flush() {
            st.field.reinitialize(vp.width, vp.height);
        }

        let now = st.now();
        st.clock.reset(now);
    }

    let cb = {
        let inner = inner.clone();
        let slot = slot.clone();
        Closure::wrap(Box::new(move |now: f64| {
            let mut st = inner.borrow_mut();
            if !st.life.is_running() {
                return;
            }
            st.frame(now);

            let next = match slot.borrow().as_ref() {
                Some(cb) => request_frame(&st.window, cb),
                None => return,
            };
            match next {
                Ok(id) => st.raf_id = Some(id),
                Err(e) => {
                    log::error!("petal loop halted: {}", e);
                    st.raf_id = None;
                    st.life.halt();
                }
            }
        }) as Box<dyn FnMut(f64)>)
    };

    let id = request_frame(&inner.borrow().window, &cb);
    let id = match id {
        Ok(id) => id,
        Err(e) => {
            inner.borrow_mut().life.halt();
            return Err(e);
        }
    };
    *slot.borrow_mut() = Some(cb);

    let mut st = inner.borrow_mut();
    st.raf_id = Some(id);
    log::info!("petal loop started with {} petals", st.field.len());
    Ok(())
}

/// Launch if the lifecycle allows it, logging when it doesn't.
fn launch_if(inner: &Rc<RefCell<Inner>>, slot: &FrameSlot, launch: Option<Launch>) -> Result<()> {
    match launch {
        Some(launch) => run_loop(inner, slot, launch),
        None => {
            let st = inner.borrow();
            log::debug!("petal loop not started: {:?}, sprite {:?}", st.life.state(), st.life.asset());
            Ok(())
        }
    }
}

fn settle_asset(inner: &Rc<RefCell<Inner>>, slot: &FrameSlot, asset: AssetState) {
    let launch = inner.borrow_mut().life.settle(asset);
    if let Err(e) = launch_if(inner, slot, launch) {
        log::error!("petal loop failed to start: {}", e);
    }
}

fn stop_loop(inner: &Rc<RefCell<Inner>>, slot: &FrameSlot) {
    let was_running = {
        let mut st = inner.borrow_mut();
        let was_running = st.life.stop();
        if let Some(id) = st.raf_id.take() {
            if let Err(e) = st.window.cancel_animation_frame(id) {
                log::debug!("cancelAnimationFrame failed: {:?}", e);
            }
        }
        was_running
    };
    // The callback holds a clone of `slot`; dropping it breaks the cycle.
    slot.borrow_mut().take();
    if was_running {
        log::info!("petal loop stopped");
    }
}

// ============================================================================
// DOM setup
// ============================================================================

fn read_viewport(window: &Window) -> Viewport {
    let dim = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()), window.device_pixel_ratio())
}

fn find_or_create_canvas(document: &Document, id: &str) -> Result<HtmlCanvasElement> {
    if let Some(el) = document.get_element_by_id(id) {
        return el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| PetalError::Dom(format!("#{id} is not a canvas")));
    }

    let canvas = document
        .create_element("canvas")
        .map_err(PetalError::dom)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| PetalError::Dom("created element is not a canvas".into()))?;
    canvas.set_id(id);

    let body = document.body().ok_or(PetalError::NoBody)?;
    body.prepend_with_node_1(&canvas).map_err(PetalError::dom)?;
    Ok(canvas)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(PetalError::dom)?
        .ok_or_else(|| PetalError::Context("getContext(\"2d\") returned null".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| PetalError::Context("not a CanvasRenderingContext2D".into()))
}

fn sprite_url() -> String {
    let encoded: String = js_sys::encode_uri_component(asset::PETAL_SVG).into();
    format!("data:image/svg+xml;utf8,{}", encoded)
}

// ============================================================================
// Controller
// ============================================================================

#[wasm_bindgen]
pub struct PetalBackground {
    inner: Rc<RefCell<Inner>>,
    slot: FrameSlot,
    on_resize: Closure<dyn FnMut()>,
    _on_load: Closure<dyn FnMut()>,
    _on_error: Closure<dyn FnMut()>,
}

impl PetalBackground {
    /// Attach to (or create) the background canvas and start as soon as the sprite settles.
    pub fn mount(config: FieldConfig) -> Result<Self> {
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let field = PetalField::new(config, seed)?;
        let config = field.config().clone();

        let window = web_sys::window().ok_or(PetalError::NoWindow)?;
        let document = window.document().ok_or(PetalError::NoDocument)?;

        let canvas = find_or_create_canvas(&document, &config.canvas_id)?;
        let style = canvas.style();
        style.set_property("pointer-events", "none").map_err(PetalError::dom)?;
        style.set_property("z-index", "0").map_err(PetalError::dom)?;

        let ctx = context_2d(&canvas)?;
        let image = HtmlImageElement::new().map_err(PetalError::dom)?;
        let renderer = CanvasRenderer::new(ctx, image.clone(), &config);

        let debounce_ms = config.resize_debounce_ms;
        let fallback = config.on_asset_error;
        let viewport = read_viewport(&window);

        let inner = Rc::new(RefCell::new(Inner {
            window: window.clone(),
            canvas,
            viewport,
            field,
            renderer,
            clock: FrameClock::new(),
            resize: Debounce::new(debounce_ms),
            life: Lifecycle::new(fallback),
            raf_id: None,
        }));
        inner.borrow_mut().resize_to(viewport)?;

        let slot: FrameSlot = Rc::new(RefCell::new(None));

        let on_load = {
            let inner = inner.clone();
            let slot = slot.clone();
            Closure::wrap(Box::new(move || {
                settle_asset(&inner, &slot, AssetState::Ready);
            }) as Box<dyn FnMut()>)
        };

        let on_error = {
            let inner = inner.clone();
            let slot = slot.clone();
            Closure::wrap(Box::new(move || {
                let err = PetalError::AssetLoad("petal sprite image".into());
                log::warn!("{}", err);
                settle_asset(&inner, &slot, AssetState::Failed(err.to_string()));
            }) as Box<dyn FnMut()>)
        };

        let on_resize = {
            let inner = inner.clone();
            Closure::wrap(Box::new(move || {
                let mut st = inner.borrow_mut();
                let vp = read_viewport(&st.window);
                if let Err(e) = st.resize_to(vp) {
                    log::error!("canvas resize failed: {}", e);
                }
                let now = st.now();
                st.resize.trigger(now, vp);
            }) as Box<dyn FnMut()>)
        };

        image.set_onload(Some(on_load.as_ref().unchecked_ref()));
        image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .map_err(PetalError::dom)?;
        image.set_src(&sprite_url());

        Ok(Self { inner, slot, on_resize, _on_load: on_load, _on_error: on_error })
    }
}

#[wasm_bindgen]
impl PetalBackground {
    /// Resume after `stop`. No-op while running; before the sprite settles
    /// it re-arms the automatic start instead.
    pub fn start(&self) -> std::result::Result<(), JsValue> {
        let launch = self.inner.borrow_mut().life.start();
        launch_if(&self.inner, &self.slot, launch).map_err(JsValue::from)
    }

    /// Stop the loop, including one that has not started yet.
    pub fn stop(&self) {
        stop_loop(&self.inner, &self.slot);
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().life.is_running()
    }

    pub fn petal_count(&self) -> usize {
        self.inner.borrow().field.len()
    }
}

impl Drop for PetalBackground {
    fn drop(&mut self) {
        stop_loop(&self.inner, &self.slot);

        let st = self.inner.borrow();
        let _ = st
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
        st.renderer.image.set_onload(None);
        st.renderer.image.set_onerror(None);
    }
}
