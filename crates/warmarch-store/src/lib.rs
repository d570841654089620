//! Warmarch — storage adapters.
//!
//! Implementations of the core [`warmarch_core::store::KeyValueStore`]:
//! an in-memory store (the injected replacement for a global
//! development-mode fallback) and a PostgreSQL store. On top of those, a
//! typed repository façade and the cross-entity unit cascade delete.

pub mod memory;
pub mod pg;
pub mod repository;
pub mod schema;
