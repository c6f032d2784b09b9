use log::{debug, info};

/// Emits detection lifecycle events through the `log` facade.
pub struct EventLog;

impl EventLog {
    pub fn new() -> Self {
        Self
    }

    pub fn frame_latched(&self, chip: u64, lane: usize, score: f32) {
        info!("frame latched at chip {} (lane {}, score {:.3})", chip, lane, score);
    }

    pub fn peak_confirmed(&self, chip: u64, lane: u32, score: f32) {
        info!("peak confirmed at chip {} (lane {}, score {:.3})", chip, lane, score);
    }

    pub fn record(&self, message: &str) {
        debug!("{}", message);
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
