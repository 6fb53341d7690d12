//! I/O adapters built on top of the engine: CSV import for
//! item manifests and CSV export of the current arrangement. Neither touches
//! persistence directly — callers feed imported items through
//! [`crate::engine::Engine::add_item`] and export from
//! [`crate::engine::Engine::list_items`].

#[cfg(feature = "csv-io")]
mod csv;

#[cfg(feature = "csv-io")]
pub use csv::{export_arrangement, import_items, import_items_with_defaults, ImportError};
