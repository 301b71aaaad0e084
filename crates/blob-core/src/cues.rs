//! Slow speech statistics derived alongside the feature vector.
//!
//! These never feed back into the feature vector; the geometry engine reads
//! them to modulate motion speed, edge sharpness and the emphasis flash.

use crate::constants::*;
use crate::easing::ease;
use crate::features::FeatureVector;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct SpeechCues {
    volume_history: VecDeque<f32>,
    mid_history: VecDeque<f32>,
    /// Rolling mean of the smoothed overall level.
    pub average_volume: f32,
    /// Rolling mean of the smoothed mid level.
    pub sustained_mid: f32,
    /// Eased magnitude of the per-tick pitch proxy change.
    pub pitch_change_rate: f32,
    /// True while an emphasis moment is running.
    pub emphasis: bool,
    /// Number of emphasis onsets since creation; never reset.
    pub emphasis_onsets: u32,
    emphasis_ticks_left: u32,
}

impl Default for SpeechCues {
    fn default() -> Self {
        Self {
            volume_history: VecDeque::from(vec![0.0; VOLUME_HISTORY_LEN]),
            mid_history: VecDeque::from(vec![0.0; MID_HISTORY_LEN]),
            average_volume: 0.0,
            sustained_mid: 0.0,
            pitch_change_rate: 0.0,
            emphasis: false,
            emphasis_onsets: 0,
            emphasis_ticks_left: 0,
        }
    }
}

fn push_mean(history: &mut VecDeque<f32>, value: f32, cap: usize) -> f32 {
    history.push_back(value);
    while history.len() > cap {
        history.pop_front();
    }
    history.iter().sum::<f32>() / history.len() as f32
}

impl SpeechCues {
    /// Advance after a tick with live audio.
    pub fn observe(&mut self, features: &FeatureVector, previous_pitch: f32) {
        self.average_volume =
            push_mean(&mut self.volume_history, features.overall_level, VOLUME_HISTORY_LEN);
        self.sustained_mid =
            push_mean(&mut self.mid_history, features.mid_level, MID_HISTORY_LEN);
        let change = (features.pitch_proxy - previous_pitch).abs();
        self.pitch_change_rate = ease(self.pitch_change_rate, change, PITCH_CHANGE_EASE);
        self.count_down();

        let level = features.overall_level;
        if !self.emphasis
            && level > EMPHASIS_MIN_LEVEL
            && self.average_volume > 0.01
            && level > self.average_volume * EMPHASIS_RATIO
        {
            self.emphasis = true;
            self.emphasis_ticks_left = EMPHASIS_TICKS;
            self.emphasis_onsets = self.emphasis_onsets.wrapping_add(1);
            log::debug!(
                "emphasis moment: level={:.2} avg={:.2}",
                level,
                self.average_volume
            );
        }
    }

    /// Advance after a tick without audio: histories fill with silence.
    pub fn observe_silence(&mut self) {
        self.average_volume = push_mean(&mut self.volume_history, 0.0, VOLUME_HISTORY_LEN);
        self.sustained_mid = push_mean(&mut self.mid_history, 0.0, MID_HISTORY_LEN);
        self.pitch_change_rate = ease(self.pitch_change_rate, 0.0, PITCH_CHANGE_EASE);
        self.count_down();
    }

    /// Clear statistics; the onset counter survives so observers never see
    /// it move backwards.
    pub fn reset(&mut self) {
        let onsets = self.emphasis_onsets;
        *self = Self::default();
        self.emphasis_onsets = onsets;
    }

    fn count_down(&mut self) {
        if self.emphasis {
            self.emphasis_ticks_left = self.emphasis_ticks_left.saturating_sub(1);
            if self.emphasis_ticks_left == 0 {
                self.emphasis = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(v: f32) -> FeatureVector {
        FeatureVector {
            overall_level: v,
            ..FeatureVector::default()
        }
    }

    #[test]
    fn sudden_rise_triggers_one_emphasis_moment() {
        let mut cues = SpeechCues::default();
        for _ in 0..VOLUME_HISTORY_LEN {
            cues.observe(&level(0.2), 0.5);
        }
        assert!(!cues.emphasis);
        cues.observe(&level(0.6), 0.5);
        assert!(cues.emphasis);
        assert_eq!(cues.emphasis_onsets, 1);
        for _ in 0..EMPHASIS_TICKS {
            cues.observe(&level(0.6), 0.5);
        }
        assert!(!cues.emphasis || cues.emphasis_onsets == 2);
    }

    #[test]
    fn reset_keeps_onset_counter() {
        let mut cues = SpeechCues::default();
        cues.emphasis_onsets = 3;
        cues.pitch_change_rate = 0.2;
        cues.reset();
        assert_eq!(cues.emphasis_onsets, 3);
        assert_eq!(cues.pitch_change_rate, 0.0);
    }
}
