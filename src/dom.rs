use crate::constants::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn device_pixel_ratio() -> f64 {
    effective_dpr(web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0))
}

/// Event listener that is removed again when dropped.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("add {} listener: {:?}", event, e))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// `setInterval` handle, cleared when dropped.
pub struct Interval {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn new(period_ms: u32, handler: impl FnMut() + 'static) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .map_err(|e| anyhow::anyhow!("setInterval: {:?}", e))?;
        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(w) = web::window() {
            w.clear_interval_with_handle(self.handle);
        }
    }
}

/// CSS size of an element, falling back when it has not been laid out.
pub fn css_size(el: &web::Element) -> (f64, f64) {
    let rect = el.get_bounding_client_rect();
    let pick = |v: f64| if v >= 1.0 { v } else { FALLBACK_CSS_SIZE };
    (pick(rect.width()), pick(rect.height()))
}

/// Match the canvas backing store to its CSS size times devicePixelRatio.
/// Returns the CSS size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (f64, f64) {
    let dpr = device_pixel_ratio();
    let (w, h) = css_size(canvas);
    let w_px = ((w * dpr) as u32).max(1);
    let h_px = ((h * dpr) as u32).max(1);
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
    (w, h)
}

/// Create the blob canvas and its notice element inside `container`.
pub fn create_surface(
    document: &web::Document,
    container: &web::Element,
) -> anyhow::Result<(web::HtmlCanvasElement, web::HtmlElement)> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("create canvas: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    _ = canvas.set_attribute("style", CANVAS_STYLE);
    _ = canvas.set_attribute("aria-label", "Microphone visualizer. Click to start or stop.");
    _ = canvas.set_attribute("role", "button");

    let notice: web::HtmlElement = document
        .create_element("div")
        .map_err(|e| anyhow::anyhow!("create notice: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    _ = notice.set_attribute("style", NOTICE_HIDDEN_STYLE);
    _ = notice.set_attribute("role", "status");

    if let Ok(host) = container.clone().dyn_into::<web::HtmlElement>() {
        let style = host.style();
        if style.get_property_value("position").unwrap_or_default().is_empty() {
            _ = style.set_property("position", "relative");
        }
    }
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("append canvas: {:?}", e))?;
    container
        .append_child(&notice)
        .map_err(|e| anyhow::anyhow!("append notice: {:?}", e))?;
    Ok((canvas, notice))
}
