//! `PageTable` never evicts, and every address within a page resolves
//! to the same page-aligned base.

use sparc_core::core::xlate::page::{END_OF_PAGE2_SLOT, END_OF_PAGE_SLOT, IC_ENTRIES_PER_PAGE, PAGE_SIZE_BYTES};
use sparc_core::core::xlate::PageTable;

#[test]
fn lookup_misses_until_created_then_hits() {
    let mut table = PageTable::new(true);
    assert!(table.lookup(0x1000).is_none());

    let page = table.lookup_or_create(0x1000);
    assert_eq!(page.borrow().base_addr, 0x1000);
    assert!(table.lookup(0x1000).is_some());
}

#[test]
fn addresses_within_a_page_share_one_page_slots() {
    let mut table = PageTable::new(true);
    let first = table.lookup_or_create(0x2000);
    let second = table.lookup_or_create(0x2000 + PAGE_SIZE_BYTES - 4);

    assert!(std::rc::Rc::ptr_eq(&first, &second));
}

#[test]
fn an_address_on_the_next_page_gets_a_distinct_page() {
    let mut table = PageTable::new(true);
    let first = table.lookup_or_create(0x2000);
    let next = table.lookup_or_create(0x2000 + PAGE_SIZE_BYTES);

    assert!(!std::rc::Rc::ptr_eq(&first, &next));
    assert_eq!(next.borrow().base_addr, 0x2000 + PAGE_SIZE_BYTES);
}

#[test]
fn invalidate_drops_the_page_so_a_later_lookup_rebuilds_it() {
    let mut table = PageTable::new(true);
    table.lookup_or_create(0x3000);
    table.invalidate(0x3000);
    assert!(table.lookup(0x3000).is_none());
}

#[test]
fn a_fresh_page_carries_the_two_trailing_sentinels() {
    let mut table = PageTable::new(true);
    let page = table.lookup_or_create(0x4000);
    let page = page.borrow();

    assert_eq!(page.slots.len(), IC_ENTRIES_PER_PAGE + 2);
    assert_eq!(page.addr_of(0), 0x4000);
    assert_eq!(page.addr_of(END_OF_PAGE_SLOT), 0x4000 + PAGE_SIZE_BYTES);
    assert!(END_OF_PAGE2_SLOT > END_OF_PAGE_SLOT);
}
