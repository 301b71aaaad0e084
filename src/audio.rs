use blob_core::{AnalysisParams, CaptureError, SpectrumSource};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Live microphone session: stream, source node and analyser on a dedicated
/// audio context. Everything is released by [`MicCapture::stop`] or on drop.
pub struct MicCapture {
    ctx: Option<web::AudioContext>,
    stream: Option<web::MediaStream>,
    source: Option<web::MediaStreamAudioSourceNode>,
    analyser: Option<web::AnalyserNode>,
    sample_rate: f32,
}

// Partially acquired resources; released if acquisition fails midway.
#[derive(Default)]
struct Partial {
    stream: Option<web::MediaStream>,
    ctx: Option<web::AudioContext>,
    source: Option<web::MediaStreamAudioSourceNode>,
}

impl Partial {
    fn release(self) {
        release(self.ctx, self.stream, self.source, None);
    }
}

fn release(
    ctx: Option<web::AudioContext>,
    stream: Option<web::MediaStream>,
    source: Option<web::MediaStreamAudioSourceNode>,
    analyser: Option<web::AnalyserNode>,
) {
    if let Some(stream) = stream {
        for track in stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<web::MediaStreamTrack>() {
                track.stop();
            }
        }
    }
    if let Some(source) = source {
        _ = source.disconnect();
    }
    if let Some(analyser) = analyser {
        _ = analyser.disconnect();
    }
    if let Some(ctx) = ctx {
        _ = ctx.close();
    }
}

fn classify(err: &JsValue) -> CaptureError {
    if let Some(dom) = err.dyn_ref::<web::DomException>() {
        return CaptureError::from_dom_rejection(&dom.name(), &dom.message());
    }
    let field = |name: &str| {
        js_sys::Reflect::get(err, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    };
    let name = field("name");
    if name.is_empty() {
        return CaptureError::DeviceUnavailable(format!("{:?}", err));
    }
    CaptureError::from_dom_rejection(&name, &field("message"))
}

fn unavailable(what: &str, err: JsValue) -> CaptureError {
    CaptureError::DeviceUnavailable(format!("{}: {:?}", what, err))
}

fn constraints(params: &AnalysisParams) -> Result<web::MediaStreamConstraints, CaptureError> {
    let audio = js_sys::Object::new();
    let set = |obj: &js_sys::Object, key: &str, value: &JsValue| {
        js_sys::Reflect::set(obj, &JsValue::from_str(key), value)
            .map(|_| ())
            .map_err(|e| unavailable("constraints", e))
    };
    set(
        &audio,
        "echoCancellation",
        &JsValue::from_bool(params.echo_cancellation),
    )?;
    set(
        &audio,
        "noiseSuppression",
        &JsValue::from_bool(params.noise_suppression),
    )?;
    let root = js_sys::Object::new();
    set(&root, "audio", &audio)?;
    set(&root, "video", &JsValue::FALSE)?;
    Ok(root.unchecked_into())
}

impl MicCapture {
    /// Request the microphone and build the analysis graph.
    pub async fn start(params: &AnalysisParams) -> Result<MicCapture, CaptureError> {
        let mut partial = Partial::default();
        match Self::acquire(params, &mut partial).await {
            Ok(analyser) => {
                let Partial {
                    stream,
                    ctx,
                    source,
                } = partial;
                let sample_rate = ctx.as_ref().map(|c| c.sample_rate()).unwrap_or_default();
                log::info!(
                    "[audio] microphone active sample_rate={} bins={}",
                    sample_rate,
                    analyser.frequency_bin_count()
                );
                Ok(MicCapture {
                    ctx,
                    stream,
                    source,
                    analyser: Some(analyser),
                    sample_rate,
                })
            }
            Err(e) => {
                log::warn!("[audio] acquisition failed: {}", e);
                partial.release();
                Err(e)
            }
        }
    }

    async fn acquire(
        params: &AnalysisParams,
        partial: &mut Partial,
    ) -> Result<web::AnalyserNode, CaptureError> {
        let window = web::window()
            .ok_or_else(|| CaptureError::DeviceUnavailable("no window".to_string()))?;
        let navigator = window.navigator();
        let has_devices = js_sys::Reflect::get(&navigator, &JsValue::from_str("mediaDevices"))
            .map(|v| !v.is_undefined() && !v.is_null())
            .unwrap_or(false);
        if !has_devices {
            return Err(CaptureError::DeviceUnavailable(
                "navigator.mediaDevices is not available".to_string(),
            ));
        }
        let devices = navigator.media_devices().map_err(|e| classify(&e))?;
        let promise = devices
            .get_user_media_with_constraints(&constraints(params)?)
            .map_err(|e| classify(&e))?;
        let stream: web::MediaStream = JsFuture::from(promise)
            .await
            .map_err(|e| classify(&e))?
            .dyn_into()
            .map_err(|e| unavailable("getUserMedia result", e))?;
        partial.stream = Some(stream.clone());

        let ctx = web::AudioContext::new().map_err(|e| unavailable("AudioContext", e))?;
        partial.ctx = Some(ctx.clone());
        if ctx.state() == web::AudioContextState::Suspended {
            if let Ok(p) = ctx.resume() {
                _ = JsFuture::from(p).await;
            }
        }

        let source = ctx
            .create_media_stream_source(&stream)
            .map_err(|e| unavailable("media stream source", e))?;
        partial.source = Some(source.clone());

        let analyser = ctx
            .create_analyser()
            .map_err(|e| unavailable("AnalyserNode", e))?;
        analyser.set_fft_size(params.fft_size);
        analyser.set_smoothing_time_constant(params.smoothing_time_constant);
        source
            .connect_with_audio_node(&analyser)
            .map_err(|e| unavailable("connect analyser", e))?;
        Ok(analyser)
    }

    /// Halt tracks, disconnect nodes and close the context. Idempotent.
    pub fn stop(&mut self) {
        if self.ctx.is_none() && self.stream.is_none() {
            return;
        }
        release(
            self.ctx.take(),
            self.stream.take(),
            self.source.take(),
            self.analyser.take(),
        );
        log::info!("[audio] microphone released");
    }
}

impl SpectrumSource for MicCapture {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn read_frequency_bins(&mut self, out: &mut Vec<u8>) -> Result<(), CaptureError> {
        let analyser = self.analyser.as_ref().ok_or(CaptureError::TransformUnready)?;
        let n = analyser.frequency_bin_count() as usize;
        if n == 0 {
            return Err(CaptureError::TransformUnready);
        }
        out.resize(n, 0);
        analyser.get_byte_frequency_data(out.as_mut_slice());
        Ok(())
    }
}

impl Drop for MicCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
