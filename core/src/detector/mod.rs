pub mod bank;
pub mod driver;
pub mod history;
pub mod reference;
pub mod state_machine;

pub use bank::{HypothesisBank, LaneSelection};
pub use driver::StreamDriver;
pub use history::DetectionHistory;
pub use reference::ReferenceSequence;
pub use state_machine::{DetectionPhase, DetectionState, DetectionStateMachine};
