//! One mounted blob: core instance plus the browser resources it drives.

use crate::audio::MicCapture;
use crate::constants::frame_dt;
use crate::dom::{self, Interval, Listener};
use crate::frame::FrameLoop;
use crate::overlay;
use crate::render::Canvas2d;
use blob_core::{
    AttemptId, BlobInstance, FeatureTelemetry, GestureAction, Resolution, SpectrumSource,
};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub struct Session {
    instance: RefCell<BlobInstance>,
    capture: RefCell<Option<MicCapture>>,
    ticker: RefCell<Option<Interval>>,
    frames: RefCell<Option<FrameLoop>>,
    listeners: RefCell<Vec<Listener>>,
    canvas: web::HtmlCanvasElement,
    notice: web::HtmlElement,
    painter: Canvas2d,
    on_change: RefCell<Option<js_sys::Function>>,
    reported: Cell<bool>,
    last_frame: Cell<Instant>,
    mounted: Cell<bool>,
}

impl Session {
    pub fn mount(container: &web::Element, instance: BlobInstance) -> anyhow::Result<Rc<Self>> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let (canvas, notice) = dom::create_surface(&document, container)?;
        let painter = Canvas2d::new(&canvas)?;
        let session = Rc::new(Session {
            instance: RefCell::new(instance),
            capture: RefCell::new(None),
            ticker: RefCell::new(None),
            frames: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            canvas,
            notice,
            painter,
            on_change: RefCell::new(None),
            reported: Cell::new(false),
            last_frame: Cell::new(Instant::now()),
            mounted: Cell::new(true),
        });
        session.resize();
        session.wire()?;
        let weak = Rc::downgrade(&session);
        *session.frames.borrow_mut() = Some(FrameLoop::start(move || {
            if let Some(s) = weak.upgrade() {
                s.frame();
            }
        }));
        log::info!(
            "[session] mounted key={:?}",
            session.instance.borrow().key()
        );
        Ok(session)
    }

    fn wire(self: &Rc<Self>) -> anyhow::Result<()> {
        let weak = Rc::downgrade(self);
        let click = Listener::new(&self.canvas, "click", move |_| {
            if let Some(s) = weak.upgrade() {
                s.toggle();
            }
        })?;
        let weak = Rc::downgrade(self);
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let resize = Listener::new(&window, "resize", move |_| {
            if let Some(s) = weak.upgrade() {
                s.resize();
            }
        })?;
        self.listeners.borrow_mut().extend([click, resize]);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.instance.borrow().is_active()
    }

    pub fn telemetry(&self) -> FeatureTelemetry {
        self.instance.borrow().telemetry()
    }

    pub fn set_on_change(&self, callback: Option<js_sys::Function>) {
        *self.on_change.borrow_mut() = callback;
    }

    /// Gesture equivalent: start capture when idle, stop otherwise.
    pub fn toggle(self: &Rc<Self>) {
        if !self.mounted.get() {
            return;
        }
        let action = self.instance.borrow_mut().gesture();
        match action {
            GestureAction::Start(attempt) => {
                let session = self.clone();
                spawn_local(async move {
                    session.acquire(attempt).await;
                });
            }
            GestureAction::Stop => self.release(),
        }
        self.notify();
    }

    /// External teardown; idempotent.
    pub fn deactivate(&self) {
        self.instance.borrow_mut().deactivate();
        self.release();
        self.notify();
    }

    /// Release everything; the canvas and notice leave the DOM.
    pub fn unmount(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        self.deactivate();
        self.frames.borrow_mut().take();
        self.listeners.borrow_mut().clear();
        self.on_change.borrow_mut().take();
        self.canvas.remove();
        self.notice.remove();
        log::info!(
            "[session] unmounted key={:?}",
            self.instance.borrow().key()
        );
    }

    async fn acquire(self: Rc<Self>, attempt: AttemptId) {
        let params = self.instance.borrow().analysis().clone();
        let result = MicCapture::start(&params).await;
        let now = Instant::now();
        match result {
            Ok(capture) => {
                let rate = capture.sample_rate();
                let resolution = self
                    .instance
                    .borrow_mut()
                    .resolve_activation(attempt, Ok(rate), now);
                if resolution == Resolution::Activated && self.mounted.get() {
                    *self.capture.borrow_mut() = Some(capture);
                    if let Err(e) = self.start_ticking() {
                        log::error!("[session] extraction tick: {:?}", e);
                        self.deactivate();
                        return;
                    }
                } else {
                    // stale or unmounted; dropping the capture releases it
                    drop(capture);
                    if resolution == Resolution::Activated {
                        self.instance.borrow_mut().deactivate();
                    }
                }
            }
            Err(e) => {
                let resolution = self
                    .instance
                    .borrow_mut()
                    .resolve_activation(attempt, Err(e), now);
                if let Resolution::Failed(e) = resolution {
                    overlay::show(&self.notice, e.user_message());
                }
            }
        }
        self.notify();
    }

    fn start_ticking(self: &Rc<Self>) -> anyhow::Result<()> {
        let weak: Weak<Session> = Rc::downgrade(self);
        let period = self.instance.borrow().analysis().tick_ms;
        let interval = Interval::new(period, move || {
            if let Some(s) = weak.upgrade() {
                s.extraction_tick();
            }
        })?;
        *self.ticker.borrow_mut() = Some(interval);
        Ok(())
    }

    fn extraction_tick(&self) {
        let mut capture = self.capture.borrow_mut();
        let source = capture.as_mut().map(|c| c as &mut dyn SpectrumSource);
        self.instance.borrow_mut().extraction_tick(source);
    }

    fn release(&self) {
        self.ticker.borrow_mut().take();
        if let Some(mut capture) = self.capture.borrow_mut().take() {
            capture.stop();
        }
    }

    fn resize(&self) {
        let (w, h) = dom::sync_canvas_backing_size(&self.canvas);
        self.instance.borrow_mut().resize(w as f32, h as f32);
    }

    fn frame(&self) {
        let now = Instant::now();
        let elapsed = now - self.last_frame.replace(now);
        let dt = frame_dt(elapsed.as_secs_f32());

        let scene = {
            let mut instance = self.instance.borrow_mut();
            instance.expire_notice(now);
            overlay::sync(
                &self.notice,
                instance.notice(now).map(|n| n.message.as_str()),
            );
            instance.render_frame(dt)
        };
        self.painter.draw(&scene, dom::device_pixel_ratio());
    }

    /// Invoke the host callback when the activation flag changed.
    fn notify(&self) {
        let active = self.is_active();
        if self.reported.replace(active) == active {
            return;
        }
        let callback = self.on_change.borrow().clone();
        if let Some(f) = callback {
            if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_bool(active)) {
                log::warn!("[session] on_active_change callback failed: {:?}", e);
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}
