//! Warmarch — Intrigue Session engine.
//!
//! An intrigue session is a turn-based political contest among domains. Its
//! state machine deliberately parallels the battle engine: phases run
//! setup → active → resolution, a fixed turn order (initiator first) drives
//! whose turn it is, and every transition lands in a timestamped log.
//! Actions are tagged records; the pure model accepts already-resolved
//! actions and never rolls dice itself.

pub mod application;
pub mod domain;
