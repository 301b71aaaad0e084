//! One keyed blob: controller, extractor and geometry engine together.
//!
//! The web crate keeps one [`BlobInstance`] per mounted key and drives it from
//! its two periodic callbacks: [`BlobInstance::extraction_tick`] every 50 ms
//! while capturing, [`BlobInstance::render_frame`] on every animation frame.

use crate::blob::BlobEngine;
use crate::controller::{AttemptId, Controller, GestureAction, Notice, Phase, Resolution};
use crate::cues::SpeechCues;
use crate::error::CaptureError;
use crate::features::{FeatureExtractor, FeatureTelemetry, FeatureVector, SpectrumSource};
use crate::params::{AnalysisParams, BlobParams};
use crate::scene::{build_scene, Scene};
use instant::Instant;

pub struct BlobInstance {
    key: String,
    analysis: AnalysisParams,
    controller: Controller,
    extractor: FeatureExtractor,
    engine: BlobEngine,
}

impl BlobInstance {
    pub fn new(key: impl Into<String>, analysis: AnalysisParams, blob: BlobParams) -> Self {
        let key = key.into();
        log::info!("[instance] create key={:?}", key);
        let extractor =
            FeatureExtractor::new(crate::constants::DEFAULT_SAMPLE_RATE, analysis.bin_count());
        Self {
            key,
            analysis,
            controller: Controller::new(),
            extractor,
            engine: BlobEngine::new(blob),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn analysis(&self) -> &AnalysisParams {
        &self.analysis
    }

    pub fn is_active(&self) -> bool {
        self.controller.is_active()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Click on the blob. A `Stop` has already reset the features when this
    /// returns; the caller still owns releasing capture.
    pub fn gesture(&mut self) -> GestureAction {
        let action = self.controller.on_gesture();
        if action == GestureAction::Stop {
            self.extractor.reset();
        }
        action
    }

    /// Report an acquisition outcome; `Ok` carries the live sample rate.
    pub fn resolve_activation(
        &mut self,
        attempt: AttemptId,
        result: Result<f32, CaptureError>,
        now: Instant,
    ) -> Resolution {
        let sample_rate = result.as_ref().ok().copied();
        let resolution = self.controller.resolve(attempt, result.map(|_| ()), now);
        if resolution == Resolution::Activated {
            self.extractor.reset();
            if let Some(rate) = sample_rate {
                self.extractor.configure(rate);
            }
        }
        resolution
    }

    /// External teardown. Idempotent; returns whether anything was running.
    pub fn deactivate(&mut self) -> bool {
        let stopped = self.controller.stop();
        self.extractor.reset();
        stopped
    }

    /// One extraction tick. Sources are ignored unless the instance is active.
    pub fn extraction_tick(&mut self, source: Option<&mut dyn SpectrumSource>) {
        let source = if self.is_active() { source } else { None };
        self.extractor.tick_from(source);
    }

    /// Same as [`extraction_tick`](Self::extraction_tick) with raw bins.
    pub fn extraction_tick_bins(&mut self, bins: Option<&[u8]>) {
        let bins = if self.is_active() { bins } else { None };
        self.extractor.tick(bins);
    }

    /// Advance the animation by `dt` reference frames and describe the frame.
    pub fn render_frame(&mut self, dt: f32) -> Scene {
        let active = self.is_active();
        self.engine.update(
            dt,
            self.extractor.features(),
            self.extractor.cues(),
            active,
        );
        build_scene(&self.engine, self.extractor.features())
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.engine.resize(width, height);
    }

    pub fn features(&self) -> &FeatureVector {
        self.extractor.features()
    }

    pub fn cues(&self) -> &SpeechCues {
        self.extractor.cues()
    }

    pub fn engine(&self) -> &BlobEngine {
        &self.engine
    }

    pub fn telemetry(&self) -> FeatureTelemetry {
        self.extractor.features().telemetry()
    }

    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.controller.notice(now)
    }

    pub fn expire_notice(&mut self, now: Instant) -> bool {
        self.controller.expire_notice(now)
    }
}
