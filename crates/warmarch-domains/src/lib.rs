//! Warmarch — Political Domain context.
//!
//! A domain is a political entity with four skills, defense scores derived
//! from those skills (recomputed eagerly on every skill write — never a
//! stale cache), independent defense-level counters, a resource pool, and
//! unit/officer membership lists.

pub mod application;
pub mod domain;
