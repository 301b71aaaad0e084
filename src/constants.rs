/// Host-page and frame-loop constants for the web front-end.
///
/// Kept free of browser types so the host-side tests can `include!` this file.
// Instance key used when the host passes none
pub const DEFAULT_KEY: &str = "audio-blob";

// Canvas
pub const BACKGROUND_CSS: &str = "#f8f8f8";
pub const CANVAS_STYLE: &str = "display:block;width:100%;height:100%;cursor:pointer;touch-action:manipulation;";
// Used when the container has no layout size yet
pub const FALLBACK_CSS_SIZE: f64 = 500.0;
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 3.0;

// Error notice overlay
pub const NOTICE_STYLE: &str = "position:absolute;left:50%;bottom:12px;transform:translateX(-50%);\
max-width:90%;padding:8px 12px;border-radius:6px;background:rgba(30,40,60,0.85);\
color:#fff;font:13px system-ui,sans-serif;text-align:center;pointer-events:none;";
pub const NOTICE_HIDDEN_STYLE: &str = "display:none";

// Frame timing (reference frames of 1/60 s)
pub const REFERENCE_FRAME_SEC: f32 = 1.0 / 60.0;
pub const MAX_FRAME_DT: f32 = 10.0;

/// Convert elapsed wall time into reference frames, capped after stalls.
#[inline]
pub fn frame_dt(elapsed_sec: f32) -> f32 {
    if !elapsed_sec.is_finite() || elapsed_sec <= 0.0 {
        return 0.0;
    }
    (elapsed_sec / REFERENCE_FRAME_SEC).min(MAX_FRAME_DT)
}

/// Clamp a reported devicePixelRatio to something the canvas can afford.
#[inline]
pub fn effective_dpr(reported: f64) -> f64 {
    if reported.is_finite() && reported > 0.0 {
        reported.min(MAX_DEVICE_PIXEL_RATIO)
    } else {
        1.0
    }
}
