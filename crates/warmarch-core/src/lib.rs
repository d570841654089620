//! Warmarch Core — shared engine abstractions.
//!
//! This crate defines the traits and types every game context depends on:
//! clock and RNG injection seams, the engine error taxonomy, the transition
//! outcome model, and the key-value store the persistence layer implements.
//! It contains no game rules and no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod rng;
pub mod store;
pub mod transition;
