//! Deterministic simulation harness for tumbler testing.
//!
//! [`SimEnv`] pairs a seeded RNG with a virtual clock, so every rotating key
//! sequence and every tick delta is reproducible from a seed.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing. Operations are applied to both the model and a real
//! [`tumbler_session::Session`], and their observable states are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod sim_env;

pub use model::{ModelDial, ModelPhase, ModelWorld, ObservableState, Operation};
pub use sim_env::SimEnv;
