//! The translation cache's address-space index and page layout.

/// `PageTable::lookup`/`lookup_or_create`/`invalidate`.
pub mod page_table;
