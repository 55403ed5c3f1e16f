//! The translation cache: a multi-level index over the guest address
//! space, its per-page instruction-slot arrays, and the page-boundary
//! sentinel handlers that stitch pages together.

/// Sentinel handlers (`to_be_translated`, `end_of_page`, `end_of_page2`).
pub mod dispatch;
/// A single dispatchable slot (`InstrCall`) and the `Flow` a handler
/// returns.
pub mod instr_call;
/// A translated page's instruction-slot array.
pub mod page;
/// The address-space index mapping a guest address to its page.
pub mod table;

pub use instr_call::{Flow, HandlerFn, InstrCall};
pub use page::{PageRef, PageSlots, IC_ENTRIES_PER_PAGE, INSTR_ALIGNMENT_SHIFT};
pub use table::PageTable;
