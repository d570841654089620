//! Warmarch — Military Unit context.
//!
//! A unit is a military formation with combat stats derived from its type
//! and tier, a casualty die tracking attrition, and trait/condition sets.
//! Mutators are immutable-update: each returns a new unit value with a fresh
//! `updated` timestamp.

pub mod application;
pub mod domain;
