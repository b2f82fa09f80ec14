//! Article content versioning.
//!
//! Every edit to an article's text/media is captured as an immutable,
//! ordered snapshot in an append-only version store that is separate from
//! the live (relational) article store. There is no transaction spanning the
//! two stores; the engine writes the snapshot **before** mutating live
//! state, so a crash between the writes leaves extra-but-never-missing
//! history.
//!
//! Layout:
//! - [`store`] -- the version-store capability (trait + record types)
//! - [`pg_store`] -- Postgres-backed document store on its own pool
//! - [`snapshot`] -- pure live-media <-> snapshot mapping
//! - [`locks`] -- per-article write serialization
//! - [`lookups`] -- injected identity/category lookup capabilities
//! - [`engine`] -- update/restore/list/delete orchestration

pub mod engine;
pub mod locks;
pub mod lookups;
pub mod pg_store;
pub mod snapshot;
pub mod store;

pub use engine::{EngineError, VersioningEngine};
pub use pg_store::PgVersionStore;
pub use store::{MediaSnapshotItem, NewVersionRecord, StoreError, VersionRecord, VersionStore};
