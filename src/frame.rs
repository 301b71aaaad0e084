use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// requestAnimationFrame loop. Dropping it cancels the pending frame and
/// releases the callback.
pub struct FrameLoop {
    tick: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

fn request_frame(tick: &FrameCallback) -> Option<i32> {
    let window = web::window()?;
    let guard = tick.borrow();
    let closure = guard.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}

impl FrameLoop {
    pub fn start(mut on_frame: impl FnMut() + 'static) -> Self {
        let tick: FrameCallback = Rc::new(RefCell::new(None));
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let tick_weak: Weak<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::downgrade(&tick);
        let pending_tick = pending.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            pending_tick.set(None);
            on_frame();
            if let Some(tick) = tick_weak.upgrade() {
                pending_tick.set(request_frame(&tick));
            }
        }) as Box<dyn FnMut()>));
        pending.set(request_frame(&tick));
        Self { tick, pending }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(handle), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(handle);
        }
        self.tick.borrow_mut().take();
    }
}
