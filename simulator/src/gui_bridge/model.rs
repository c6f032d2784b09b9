use serde::{Deserialize, Serialize};

#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DetectionViewModel {
    pub max_score_trace: Vec<f32>,
    pub frame_count: usize,
    pub best_score: f32,
    pub best_lane: u32,
    pub best_offset: f32,
    pub notes: Vec<String>,
}

#[allow(dead_code)]
impl DetectionViewModel {
    pub fn new() -> Self {
        Self {
            max_score_trace: Vec::new(),
            frame_count: 0,
            best_score: 0.0,
            best_lane: 0,
            best_offset: 0.0,
            notes: Vec::new(),
        }
    }
}
