//! Spectrum → smoothed feature vector.
//!
//! The extractor runs on its own fixed tick and is the only writer of the
//! [`FeatureVector`]; the render loop reads it.

use crate::constants::*;
use crate::cues::SpeechCues;
use crate::easing::{ease, unit};
use crate::error::CaptureError;

/// Smoothed audio features, every field in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureVector {
    pub overall_level: f32,
    pub mid_level: f32,
    pub treble_level: f32,
    pub frequency_spread: f32,
    pub pitch_proxy: f32,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            overall_level: 0.0,
            mid_level: 0.0,
            treble_level: 0.0,
            frequency_spread: 0.0,
            pitch_proxy: NEUTRAL_PITCH,
        }
    }
}

impl FeatureVector {
    fn fields_mut(&mut self) -> [&mut f32; 5] {
        [
            &mut self.overall_level,
            &mut self.mid_level,
            &mut self.treble_level,
            &mut self.frequency_spread,
            &mut self.pitch_proxy,
        ]
    }

    /// Restore the `[0, 1]` invariant.
    pub fn clamp(&mut self) {
        for f in self.fields_mut() {
            *f = unit(*f);
        }
    }

    /// One idle tick: multiplicative decay, snapping small values to zero.
    pub fn decay(&mut self) {
        for f in self.fields_mut() {
            *f *= IDLE_DECAY;
            if *f < DECAY_SNAP {
                *f = 0.0;
            }
        }
        self.clamp();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn telemetry(&self) -> FeatureTelemetry {
        FeatureTelemetry {
            overall_level: self.overall_level,
            mid_level: self.mid_level,
            treble_level: self.treble_level,
            frequency_spread: self.frequency_spread,
        }
    }
}

/// Host-facing debug record. The pitch proxy is not part of it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureTelemetry {
    pub overall_level: f32,
    pub mid_level: f32,
    pub treble_level: f32,
    pub frequency_spread: f32,
}

/// Source of byte-scaled magnitude spectra.
pub trait SpectrumSource {
    fn sample_rate(&self) -> f32;
    /// Fill `out` with the current spectrum, resizing it to the bin count.
    fn read_frequency_bins(&mut self, out: &mut Vec<u8>) -> Result<(), CaptureError>;
}

/// Bin index ranges derived from the sample rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinLayout {
    pub bin_count: usize,
    /// Last bin (inclusive) of the mid band.
    pub mid_end: usize,
    /// First bin of the treble band.
    pub treble_start: usize,
    pub pitch_min: usize,
    pub pitch_max: usize,
}

impl BinLayout {
    pub fn new(sample_rate: f32, bin_count: usize) -> Self {
        let bin_count = bin_count.max(2);
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        };
        let last = bin_count - 1;
        let bin_width = (sample_rate / 2.0) / bin_count as f32;
        let mid_end = ((BAND_SPLIT_HZ / bin_width).ceil() as usize).min(last);
        let treble_start = ((BAND_SPLIT_HZ / bin_width).floor() as usize).min(last);
        let pitch_min = ((PITCH_MIN_HZ / bin_width).floor() as usize).clamp(1, last);
        let pitch_max = ((PITCH_MAX_HZ / bin_width).ceil() as usize).clamp(pitch_min, last);
        Self {
            bin_count,
            mid_end,
            treble_start,
            pitch_min,
            pitch_max,
        }
    }

    /// Position of `bin` within the pitch search range, in `[0, 1]`.
    pub fn pitch_position(&self, bin: usize) -> f32 {
        if self.pitch_max == self.pitch_min {
            return NEUTRAL_PITCH;
        }
        unit((bin as f32 - self.pitch_min as f32) / (self.pitch_max - self.pitch_min) as f32)
    }
}

/// Unsmoothed per-tick targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpectrumTargets {
    pub overall: f32,
    pub mid: f32,
    pub treble: f32,
    pub spread: f32,
    pub pitch: f32,
}

fn mean(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    bins.iter().map(|&b| b as f32).sum::<f32>() / bins.len() as f32
}

/// Compute normalized targets from one spectrum frame.
pub fn analyze(bins: &[u8], layout: &BinLayout) -> SpectrumTargets {
    let n = bins.len();
    if n == 0 {
        return SpectrumTargets {
            overall: 0.0,
            mid: 0.0,
            treble: 0.0,
            spread: 0.0,
            pitch: NEUTRAL_PITCH,
        };
    }
    let last = n.saturating_sub(1);
    let mid_end = layout.mid_end.min(last);
    let treble_start = layout.treble_start.min(last);

    let overall = mean(bins);
    let mid = mean(&bins[..=mid_end]);
    let treble = mean(&bins[treble_start..]);
    let active = bins.iter().filter(|&&b| b > BIN_ACTIVITY_THRESHOLD).count();

    let mut peak: Option<(usize, u8)> = None;
    if layout.pitch_min <= last {
        for (i, &b) in bins
            .iter()
            .enumerate()
            .take(layout.pitch_max.min(last) + 1)
            .skip(layout.pitch_min)
        {
            if b > peak.map_or(0, |(_, m)| m) {
                peak = Some((i, b));
            }
        }
    }
    let pitch = match peak {
        Some((i, m)) if m > PITCH_PEAK_MIN => layout.pitch_position(i),
        _ => NEUTRAL_PITCH,
    };

    SpectrumTargets {
        overall: unit(overall / LEVEL_CEILING),
        mid: unit(mid / LEVEL_CEILING),
        treble: unit(treble / LEVEL_CEILING),
        spread: active as f32 / n as f32,
        pitch,
    }
}

/// Owns the feature vector and updates it once per extraction tick.
pub struct FeatureExtractor {
    features: FeatureVector,
    cues: SpeechCues,
    layout: BinLayout,
    sample_rate: f32,
    bin_count: usize,
    scratch: Vec<u8>,
}

impl FeatureExtractor {
    pub fn new(sample_rate: f32, bin_count: usize) -> Self {
        Self {
            features: FeatureVector::default(),
            cues: SpeechCues::default(),
            layout: BinLayout::new(sample_rate, bin_count),
            sample_rate,
            bin_count,
            scratch: Vec::with_capacity(bin_count),
        }
    }

    /// Recompute bin ranges for a new capture session.
    pub fn configure(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.layout = BinLayout::new(sample_rate, self.bin_count);
        log::info!(
            "[features] sample_rate={} mid_end={} treble_start={} pitch={}..={}",
            sample_rate,
            self.layout.mid_end,
            self.layout.treble_start,
            self.layout.pitch_min,
            self.layout.pitch_max
        );
    }

    pub fn features(&self) -> &FeatureVector {
        &self.features
    }

    pub fn cues(&self) -> &SpeechCues {
        &self.cues
    }

    pub fn layout(&self) -> &BinLayout {
        &self.layout
    }

    /// One tick. `None` (or an empty frame) means capture is inactive.
    pub fn tick(&mut self, spectrum: Option<&[u8]>) {
        match spectrum {
            Some(bins) if !bins.is_empty() => {
                if bins.len() != self.layout.bin_count {
                    // analyser resized underneath us; keep the ranges consistent
                    self.bin_count = bins.len();
                    self.layout = BinLayout::new(self.sample_rate, bins.len());
                }
                let targets = analyze(bins, &self.layout);
                self.apply(&targets);
            }
            _ => {
                self.features.decay();
                self.cues.observe_silence();
            }
        }
    }

    /// One tick fed from a live source; read failures count as inactive.
    pub fn tick_from(&mut self, source: Option<&mut dyn SpectrumSource>) {
        let mut scratch = std::mem::take(&mut self.scratch);
        let ready = match source {
            Some(src) => match src.read_frequency_bins(&mut scratch) {
                Ok(()) => true,
                Err(e) => {
                    log::debug!("[features] spectrum unavailable: {}", e);
                    false
                }
            },
            None => false,
        };
        self.tick(if ready { Some(scratch.as_slice()) } else { None });
        self.scratch = scratch;
    }

    /// Back to defaults, as when capture stops.
    pub fn reset(&mut self) {
        self.features.reset();
        self.cues.reset();
    }

    fn apply(&mut self, t: &SpectrumTargets) {
        let previous_pitch = self.features.pitch_proxy;
        let f = &mut self.features;
        f.overall_level = ease(f.overall_level, t.overall, LEVEL_EASE);
        f.mid_level = ease(f.mid_level, t.mid, LEVEL_EASE);
        f.treble_level = ease(f.treble_level, t.treble, LEVEL_EASE);
        f.frequency_spread = ease(f.frequency_spread, t.spread, SPREAD_EASE);
        f.pitch_proxy = ease(f.pitch_proxy, t.pitch, PITCH_EASE);
        f.clamp();
        self.cues.observe(&self.features, previous_pitch);
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, BIN_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_for_common_sample_rate() {
        let l = BinLayout::new(44_100.0, 256);
        // bin width ~86.13 Hz
        assert_eq!(l.mid_end, 47);
        assert_eq!(l.treble_start, 46);
        assert_eq!(l.pitch_min, 1);
        assert_eq!(l.pitch_max, 6);
    }

    #[test]
    fn layout_survives_degenerate_inputs() {
        let l = BinLayout::new(f32::NAN, 0);
        assert!(l.bin_count >= 2);
        assert!(l.pitch_min <= l.pitch_max);
        assert!(l.mid_end < l.bin_count);
    }

    #[test]
    fn silent_spectrum_targets_neutral_pitch() {
        let l = BinLayout::new(48_000.0, 256);
        let t = analyze(&[0u8; 256], &l);
        assert_eq!(t.overall, 0.0);
        assert_eq!(t.spread, 0.0);
        assert_eq!(t.pitch, NEUTRAL_PITCH);
    }

    #[test]
    fn full_scale_spectrum_clamps_levels() {
        let l = BinLayout::new(48_000.0, 256);
        let t = analyze(&[255u8; 256], &l);
        assert_eq!(t.overall, 1.0);
        assert_eq!(t.mid, 1.0);
        assert_eq!(t.treble, 1.0);
        assert_eq!(t.spread, 1.0);
    }

    #[test]
    fn weak_peak_is_not_a_pitch() {
        let l = BinLayout::new(44_100.0, 256);
        let mut bins = [0u8; 256];
        bins[3] = PITCH_PEAK_MIN;
        assert_eq!(analyze(&bins, &l).pitch, NEUTRAL_PITCH);
        bins[3] = PITCH_PEAK_MIN + 1;
        assert!((analyze(&bins, &l).pitch - 0.4).abs() < 1e-6);
    }

    #[test]
    fn short_frame_reconfigures_layout() {
        let mut ex = FeatureExtractor::default();
        ex.tick(Some(&[200u8; 64][..]));
        assert_eq!(ex.layout().bin_count, 64);
        assert!(ex.layout().mid_end < 64);
        assert!(ex.features().overall_level > 0.0);
    }
}
