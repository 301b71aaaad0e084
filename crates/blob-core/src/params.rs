use crate::constants::*;

/// Analysis-node and extraction-tick settings.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisParams {
    pub fft_size: u32,
    pub smoothing_time_constant: f64,
    pub tick_ms: u32,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            fft_size: FFT_SIZE,
            smoothing_time_constant: ANALYSER_SMOOTHING,
            tick_ms: EXTRACTION_TICK_MS,
            echo_cancellation: true,
            noise_suppression: true,
        }
    }
}

impl AnalysisParams {
    #[inline]
    pub fn bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }
}

/// Geometry settings for one blob instance.
#[derive(Clone, Debug, PartialEq)]
pub struct BlobParams {
    pub vertex_count: usize,
    pub base_hue: f32,
    /// Seed for phase offsets and noise permutation.
    pub seed: u64,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            vertex_count: VERTEX_COUNT,
            base_hue: BASE_HUE,
            seed: 0x5EED_B10B,
        }
    }
}
