#![cfg(target_arch = "wasm32")]
use crate::constants::DEFAULT_KEY;
use crate::session::Session;
use blob_core::{AnalysisParams, BlobInstance, BlobParams};
use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

mod audio;
mod constants;
mod dom;
mod frame;
mod overlay;
mod render;
mod session;

thread_local! {
    static SESSIONS: RefCell<FnvHashMap<String, Rc<Session>>> =
        RefCell::new(FnvHashMap::default());
}

fn key_or_default(key: Option<String>) -> String {
    key.filter(|k| !k.is_empty())
        .unwrap_or_else(|| DEFAULT_KEY.to_string())
}

// Clone the session out so no registry borrow is held while it runs.
fn session(key: Option<String>) -> Option<Rc<Session>> {
    let key = key_or_default(key);
    SESSIONS.with(|s| s.borrow().get(&key).cloned())
}

fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("blob-web starting");
    Ok(())
}

/// Create the blob canvas inside `#container_id` and start its render loop.
/// Mounting an existing key replaces the previous instance.
#[wasm_bindgen]
pub fn mount(container_id: &str, key: Option<String>) -> Result<(), JsValue> {
    mount_inner(container_id, key_or_default(key)).map_err(to_js)
}

fn mount_inner(container_id: &str, key: String) -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", container_id))?;
    unmount(Some(key.clone()));

    let params = BlobParams {
        seed: rand::random(),
        ..BlobParams::default()
    };
    let instance = BlobInstance::new(key.clone(), AnalysisParams::default(), params);
    let session = Session::mount(&container, instance)?;
    SESSIONS.with(|s| s.borrow_mut().insert(key, session));
    Ok(())
}

/// Current activation flag; false for unknown keys.
#[wasm_bindgen]
pub fn audio_reactive_blob(key: Option<String>) -> bool {
    session(key).map(|s| s.is_active()).unwrap_or(false)
}

/// Same as clicking the blob.
#[wasm_bindgen]
pub fn toggle(key: Option<String>) {
    if let Some(s) = session(key) {
        s.toggle();
    }
}

#[wasm_bindgen]
pub fn deactivate(key: Option<String>) {
    if let Some(s) = session(key) {
        s.deactivate();
    }
}

#[wasm_bindgen]
pub fn unmount(key: Option<String>) {
    let key = key_or_default(key);
    let removed = SESSIONS.with(|s| s.borrow_mut().remove(&key));
    if let Some(s) = removed {
        s.unmount();
    }
}

/// Release every mounted instance.
#[wasm_bindgen]
pub fn unmount_all() {
    let all: SmallVec<[Rc<Session>; 4]> =
        SESSIONS.with(|s| s.borrow_mut().drain().map(|(_, v)| v).collect());
    for s in all {
        s.unmount();
    }
}

/// Register `callback(active: boolean)`; pass nothing to clear it.
#[wasm_bindgen]
pub fn on_active_change(key: Option<String>, callback: Option<js_sys::Function>) {
    if let Some(s) = session(key) {
        s.set_on_change(callback);
    }
}

/// `{overallLevel, midLevel, trebleLevel, frequencySpread}`, or `undefined`
/// for an unknown key.
#[wasm_bindgen]
pub fn feature_telemetry(key: Option<String>) -> JsValue {
    let Some(s) = session(key) else {
        return JsValue::UNDEFINED;
    };
    let t = s.telemetry();
    let obj = js_sys::Object::new();
    for (name, value) in [
        ("overallLevel", t.overall_level),
        ("midLevel", t.mid_level),
        ("trebleLevel", t.treble_level),
        ("frequencySpread", t.frequency_spread),
    ] {
        _ = js_sys::Reflect::set(&obj, &JsValue::from_str(name), &JsValue::from_f64(value as f64));
    }
    obj.into()
}
