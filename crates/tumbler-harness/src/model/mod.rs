//! Reference model for model-based testing.
//!
//! The model is a plain restatement of the lock's rules: integer dial
//! arithmetic, a three state lifecycle and a direct passcode formula. It
//! serves as the oracle against which `Session` is verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Rules not structure: no gateway, no widgets, no wire records
//! - Deterministic: Same seed and operations produce the same state

mod dial;
pub mod operation;
mod world;

pub use dial::ModelDial;
pub use operation::Operation;
pub use world::{ModelPhase, ModelWorld, ObservableState};
