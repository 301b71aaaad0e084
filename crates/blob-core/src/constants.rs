// Shared analysis and animation tuning constants.
//
// Per-frame values are expressed for a 60 fps reference frame; per-tick values
// for the 50 ms extraction tick.

// Analysis node
pub const FFT_SIZE: u32 = 512;
pub const BIN_COUNT: usize = (FFT_SIZE / 2) as usize;
pub const ANALYSER_SMOOTHING: f64 = 0.75;
pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

// Extraction tick
pub const EXTRACTION_TICK_MS: u32 = 50;
pub const IDLE_DECAY: f32 = 0.95;
pub const DECAY_SNAP: f32 = 0.01;

// Spectrum partitioning
pub const BAND_SPLIT_HZ: f32 = 4_000.0;
pub const BIN_ACTIVITY_THRESHOLD: u8 = 10;
pub const PITCH_MIN_HZ: f32 = 80.0;
pub const PITCH_MAX_HZ: f32 = 500.0;
pub const PITCH_PEAK_MIN: u8 = 15;
pub const LEVEL_CEILING: f32 = 160.0;
pub const NEUTRAL_PITCH: f32 = 0.5;

// Feature smoothing (per tick)
pub const LEVEL_EASE: f32 = 0.1;
pub const SPREAD_EASE: f32 = 0.03;
pub const PITCH_EASE: f32 = 0.06;

// Speech cues (per tick)
pub const VOLUME_HISTORY_LEN: usize = 60;
pub const MID_HISTORY_LEN: usize = 30;
pub const PITCH_CHANGE_EASE: f32 = 0.05;
pub const EMPHASIS_MIN_LEVEL: f32 = 0.30;
pub const EMPHASIS_RATIO: f32 = 1.4;
pub const EMPHASIS_TICKS: u32 = 15;

// Geometry
pub const VERTEX_COUNT: usize = 140;
pub const BASE_RADIUS_DIVISOR: f32 = 5.0;
pub const MIN_RADIUS_FRACTION: f32 = 0.2;
pub const REFERENCE_FPS: f32 = 60.0;

// Audio gating
pub const AUDIO_PRESENCE_THRESHOLD: f32 = 0.09;
pub const SILENCE_THRESHOLD: f32 = 0.03;
pub const PHASE_SPEED_GAIN: f32 = 1.5;
pub const ACTIVE_STATE_EASE: f32 = 0.07;

// Base phase speeds (per frame)
pub const PASSIVE_SPEED: f32 = 0.0004;
pub const SHAPE_SPEED: f32 = 0.0006;
pub const TEXTURE_SPEED: f32 = 0.0010;
pub const WAVINESS_SPEED: f32 = 0.0006;
pub const INTERNAL_SPEED: f32 = 0.0003;
pub const ANGULAR_SPEED: f32 = 0.0003;

// Passive deformation
pub const PASSIVE_POS_SCALE: f32 = 0.7;
pub const PASSIVE_DEFORMATION_BASE: f32 = 0.04;
pub const PASSIVE_DEFORMATION_BOOST: f32 = 0.02;
pub const PASSIVE_DEFORMATION_EASE: f32 = 0.008;
pub const LOUD_WAVINESS_BOOST: f32 = 2.5;

// Shape noise
pub const SHAPE_SCALE_BASE: f32 = 0.9;
pub const SHAPE_SCALE_SPREAD: f32 = 0.08;
pub const SHAPE_SCALE_EASE: f32 = 0.008;

// Texture noise
pub const TEXTURE_POS_SCALE: f32 = 8.0;
pub const TEXTURE_INTENSITY_INITIAL: f32 = 0.04;
pub const TEXTURE_INTENSITY_BASE: f32 = 0.02;
pub const TEXTURE_INTENSITY_MAX: f32 = 0.08;
pub const TEXTURE_INTENSITY_EASE: f32 = 0.012;

// Waviness noise
pub const WAVINESS_SCALE_BASE: f32 = 3.5;
pub const WAVINESS_SCALE_PITCH: f32 = 0.5;
pub const WAVINESS_SCALE_EASE: f32 = 0.01;
pub const WAVINESS_INFLUENCE_MAX: f32 = 0.15;
pub const WAVINESS_INFLUENCE_EASE: f32 = 0.012;

// Peak extension
pub const PEAK_MULTIPLIER_MAX: f32 = 1.1;
pub const PEAK_MULTIPLIER_EASE: f32 = 0.08;

// Treble ripple and wave motion
pub const TREBLE_RIPPLE_THRESHOLD: f32 = 0.25;
pub const TREBLE_RIPPLE_GAIN: f32 = 0.004 * 1.2;
pub const WAVE_SPEED: f32 = 3.0;
pub const WAVE_AMPLITUDE: f32 = 0.015;

// Breathing
pub const BREATHING_AMPLITUDE: f32 = 0.025;
pub const BREATHING_PERIOD_SEC: f32 = 4.0;
pub const BREATHING_WEIGHT_EASE: f32 = 0.05;

// Pause ripple and inhale
pub const PAUSE_MIN_FRAMES: u32 = 20;
pub const PAUSE_RIPPLE_EASE: f32 = 0.06;
pub const INHALE_DEPTH: f32 = 0.08;
pub const INHALE_EASE: f32 = 0.15;

// Internal texture
pub const INTERNAL_POS_SCALE: f32 = 0.5;
pub const INTERNAL_COMPLEXITY_SCALE: f32 = 2.5;
pub const INTERNAL_ALPHA_MAX: f32 = 18.0;
pub const INTERNAL_ALPHA_MIN_VISIBLE: f32 = 1.0;
pub const INTERNAL_ALPHA_EASE: f32 = 0.015;
pub const INTERNAL_RING_COUNT: usize = 10;

// Speech-mode factors
pub const EDGE_SHARPNESS_EASE: f32 = 0.015;
pub const FOCUS_EASE: f32 = 0.02;
pub const MELODY_EASE: f32 = 0.025;
pub const EMPHASIS_EASE: f32 = 0.05;

// Color
pub const BASE_HUE: f32 = 210.0;
pub const HUE_PITCH_RANGE: f32 = 15.0;
pub const HUE_SPREAD_RANGE: f32 = 10.0;
pub const HUE_EASE: f32 = 0.01;
pub const BASE_SATURATION: f32 = 60.0;
pub const BASE_BRIGHTNESS: f32 = 95.0;
pub const SATURATION_BOOST_MAX: f32 = 10.0;
pub const BRIGHTNESS_BOOST_MAX: f32 = 2.0;
pub const COLOR_BOOST_EASE: f32 = 0.05;
pub const FLASH_DECAY: f32 = 0.10;
pub const EDGE_ALPHA: f32 = 95.0;

// Blob layers
pub const MIN_LAYERS: usize = 4;
pub const MAX_LAYERS: usize = 18;
pub const BASE_LAYERS: f32 = 8.0;
pub const LAYER_BOOST: f32 = 15.0;
pub const BASE_ALPHA_STEP: f32 = 2.0;
pub const ALPHA_STEP_BOOST: f32 = 6.0;

// Microphone glyph
pub const MIC_RING_MIN_FRACTION: f32 = 0.75;
pub const MIC_RING_MAX_FRACTION: f32 = 0.92;
pub const MIC_SIZE_FRACTION: f32 = 0.28;
pub const MIC_LEVEL_GAIN: f32 = 0.6;

// Host notices
pub const NOTICE_DURATION_MS: u64 = 5_000;
