pub mod blob;
pub mod color;
pub mod constants;
pub mod controller;
pub mod cues;
pub mod curve;
pub mod easing;
pub mod error;
pub mod features;
pub mod instance;
pub mod noise;
pub mod params;
pub mod scene;

pub use blob::{BlobEngine, BlobState, VertexRing};
pub use color::{Palette, Rgba};
pub use controller::{AttemptId, Controller, GestureAction, Notice, Phase, Resolution};
pub use cues::SpeechCues;
pub use curve::{closed_path, ClosedPath, CubicSegment};
pub use error::CaptureError;
pub use features::{FeatureExtractor, FeatureTelemetry, FeatureVector, SpectrumSource};
pub use instance::BlobInstance;
pub use params::{AnalysisParams, BlobParams};
pub use scene::{build_scene, layer_plan, Circle, FillLayer, MicGlyph, Outline, Scene};
