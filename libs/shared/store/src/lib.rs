//! In-process document store.
//!
//! Each record type lives in a typed [`Collection`] guarded by its own
//! `RwLock`, so single-document writes are atomic. The stock deduction path
//! relies on [`Collection::try_update`]: the mutation closure runs under the
//! write lock and commits only on success, which turns the original
//! read-then-write stock check into a conditional update.

pub mod collection;
pub mod context;

pub use collection::{Collection, Document};
pub use context::{AppContext, ClinicStore};
