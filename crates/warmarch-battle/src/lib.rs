//! Warmarch — Warfare Battle engine.
//!
//! A battle is a state machine over a deployment grid: phases run
//! setup → battle → aftermath, units deploy onto a 3×3 grid (or wait in
//! reserve/not-deployed), a fixed initiative order drives activation, and
//! every transition is appended to a timestamped log. Invalid requests are
//! never errors — they come back as rejected
//! [`warmarch_core::transition::Transition`]s with the state unchanged.

pub mod application;
pub mod domain;
