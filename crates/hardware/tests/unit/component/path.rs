//! `FindPathByPartialMatch` over a small bus topology.

use sparc_core::component::Component;

/// Builds `root{name="root"} -> machine1{name="machine1"} ->
/// {pcibus0, pcibus1}` and checks that a partial query on the device
/// class prefix finds exactly both buses, by full dotted path.
#[test]
fn partial_match_on_bus_name_prefix_finds_both_buses() {
    let root = Component::new("root", "root");
    let machine1 = Component::new("machine", "machine1");
    Component::add_child(&root, machine1.clone()).unwrap();

    let pcibus0 = Component::new("dummy", "pcibus0");
    let pcibus1 = Component::new("dummy", "pcibus1");
    Component::add_child(&machine1, pcibus0).unwrap();
    Component::add_child(&machine1, pcibus1).unwrap();

    let mut matches = Component::find_path_by_partial_match(&root, "pci");
    matches.sort();
    assert_eq!(
        matches,
        vec![
            "root.machine1.pcibus0".to_string(),
            "root.machine1.pcibus1".to_string(),
        ]
    );
}

/// An empty query returns every path in the subtree, pre-order.
#[test]
fn empty_query_returns_every_path_pre_order() {
    let root = Component::new("root", "root");
    let machine1 = Component::new("machine", "machine1");
    Component::add_child(&root, machine1.clone()).unwrap();
    let pcibus0 = Component::new("dummy", "pcibus0");
    Component::add_child(&machine1, pcibus0).unwrap();

    let matches = Component::find_path_by_partial_match(&root, "");
    assert_eq!(
        matches,
        vec![
            "root".to_string(),
            "root.machine1".to_string(),
            "root.machine1.pcibus0".to_string(),
        ]
    );
}

/// A query with no matching leaf returns nothing.
#[test]
fn query_with_no_match_returns_empty() {
    let root = Component::new("root", "root");
    let machine1 = Component::new("machine", "machine1");
    Component::add_child(&root, machine1).unwrap();

    assert!(Component::find_path_by_partial_match(&root, "usb").is_empty());
}

/// `LookupPath` resolves a dotted path rooted at the receiver, matching
/// the receiver's own name as the first component.
#[test]
fn lookup_path_resolves_from_receiver() {
    let root = Component::new("root", "root");
    let machine1 = Component::new("machine", "machine1");
    Component::add_child(&root, machine1.clone()).unwrap();
    let pcibus0 = Component::new("dummy", "pcibus0");
    Component::add_child(&machine1, pcibus0).unwrap();

    let found = Component::lookup_path(&root, "root.machine1.pcibus0").unwrap();
    assert_eq!(found.borrow().name(), "pcibus0");
    assert!(Component::lookup_path(&root, "root.machine1.pcibus2").is_none());
}

/// A nameless root renders in parentheses by class name.
#[test]
fn nameless_root_generates_parenthesized_path() {
    let root = Component::new("root", "");
    assert_eq!(Component::generate_path(&root), "(root)");
}
