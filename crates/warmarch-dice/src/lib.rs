//! Warmarch — dice engine.
//!
//! Notation parsing (`[count]d<sides>[+|-modifier]`), uniform rolls,
//! keep-highest/lowest selection, advantage pairs, and the skill-check
//! composite that combat and intrigue resolution build on. All randomness
//! flows through the injected [`warmarch_core::rng::DeterministicRng`] seam;
//! [`rng::SystemRng`] is the production source.

pub mod check;
pub mod error;
pub mod notation;
pub mod rng;
pub mod roll;
