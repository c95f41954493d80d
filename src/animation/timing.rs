//! Per-slide and per-transition phase schedules.
//!
//! A phase is how revealed a slide is, in `[0, 1]`. Schedules are pure functions of duration and
//! frame rate, so two runs with the same inputs produce byte-identical frame sequences.

use crate::animation::ease::Ease;
use crate::foundation::core::Fps;

/// Phase a slide dims down to over the last tenth of its frames.
pub const DIM_FLOOR: f64 = 0.85;

/// Visual bridge between two adjacent slides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Incoming slide animates from phase 0 to 1 with ease-in-out.
    #[default]
    #[serde(alias = "fade")]
    Crossfade,
    /// Solid black frames for the whole window.
    #[serde(alias = "fade-black")]
    FadeBlack,
    /// No transition frames at all.
    Cut,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub kind: TransitionKind,
    /// Seconds.
    pub duration: f64,
}

impl Transition {
    pub fn cut() -> Self {
        Self {
            kind: TransitionKind::Cut,
            duration: 0.0,
        }
    }

    /// Seconds this transition actually occupies on the timeline.
    pub fn effective_duration(self) -> f64 {
        match self.kind {
            TransitionKind::Cut => 0.0,
            _ => self.duration.max(0.0),
        }
    }
}

/// What to rasterize between two slides.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionFrames {
    None,
    /// Phases for the incoming slide.
    Incoming(Vec<f64>),
    /// Number of solid black frames.
    Black(u64),
}

impl TransitionFrames {
    pub fn len(&self) -> u64 {
        match self {
            Self::None => 0,
            Self::Incoming(phases) => phases.len() as u64,
            Self::Black(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Phase for every frame of a slide lasting `duration` seconds.
///
/// `ceil(duration * fps)` frames: the first 20% ease out of 0, the next 70% hold at 1, and the
/// final 10% dim linearly so the last frame sits exactly at [`DIM_FLOOR`].
pub fn frames_for(duration: f64, fps: Fps) -> Vec<f64> {
    let total = fps.secs_to_frames_ceil(duration);
    let entry = total / 5;
    let hold_end = total * 9 / 10;
    let fade = total - hold_end;

    (0..total)
        .map(|i| {
            if i < entry {
                Ease::OutCubic.apply(i as f64 / entry as f64)
            } else if i < hold_end {
                1.0
            } else {
                let t = (i - hold_end + 1) as f64 / fade as f64;
                1.0 - t * (1.0 - DIM_FLOOR)
            }
        })
        .collect()
}

/// Ease-in-out phases for the incoming slide over a `duration`-second window.
pub fn transition_frames(duration: f64, fps: Fps) -> Vec<f64> {
    let total = fps.secs_to_frames_ceil(duration);
    (0..total)
        .map(|i| Ease::InOutQuad.apply(i as f64 / total as f64))
        .collect()
}

/// Frames to render after a slide, given the configured transition.
pub fn transition_plan(transition: Transition, fps: Fps) -> TransitionFrames {
    match transition.kind {
        TransitionKind::Cut => TransitionFrames::None,
        TransitionKind::Crossfade => {
            let phases = transition_frames(transition.duration, fps);
            if phases.is_empty() {
                TransitionFrames::None
            } else {
                TransitionFrames::Incoming(phases)
            }
        }
        TransitionKind::FadeBlack => match fps.secs_to_frames_ceil(transition.duration) {
            0 => TransitionFrames::None,
            n => TransitionFrames::Black(n),
        },
    }
}

/// Sum of slide durations plus one transition between each adjacent pair.
pub fn estimate_duration(durations: &[f64], transition: Transition) -> f64 {
    let slides: f64 = durations.iter().sum();
    let gaps = durations.len().saturating_sub(1) as f64;
    slides + gaps * transition.effective_duration()
}

/// Exact number of frames the animated capture will write.
pub fn total_frames(durations: &[f64], transition: Transition, fps: Fps) -> u64 {
    let per_transition = transition_plan(transition, fps).len();
    let gaps = durations.len().saturating_sub(1) as u64;
    durations
        .iter()
        .map(|&d| fps.secs_to_frames_ceil(d))
        .sum::<u64>()
        + gaps * per_transition
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
