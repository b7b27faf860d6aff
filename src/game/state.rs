use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    AwaitingSecondReveal,
    Resolving,
    Completed,
}

/// Counters of one play-through.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SessionState {
    pub attempt_count: u32,
    pub elapsed_seconds: f64,
    pub matched_pair_count: usize,
    pub current_score: u32,
    pub phase: Phase,
}

impl SessionState {
    pub fn new(base_score: u32) -> Self {
        SessionState {
            attempt_count: 0,
            elapsed_seconds: 0.0,
            matched_pair_count: 0,
            current_score: base_score,
            phase: Phase::Idle,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn clock_label(&self) -> String {
        format_clock(self.elapsed_seconds)
    }
}

/// `MM:SS`, both fields floored.
pub fn format_clock(elapsed_seconds: f64) -> String {
    let total_secs = elapsed_seconds.max(0.0).floor() as u64;
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}
