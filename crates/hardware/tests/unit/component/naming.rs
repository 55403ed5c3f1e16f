//! Unique sibling auto-naming, and name stability after removal.

use sparc_core::component::Component;

/// Adding three unnamed `dummy` children to an empty `dummy` parent
/// assigns `dummy0`, `dummy1`, `dummy2` in insertion order.
#[test]
fn unnamed_siblings_get_sequential_class_names() {
    let parent = Component::new("dummy", "");
    let a = Component::new("dummy", "");
    let b = Component::new("dummy", "");
    let c = Component::new("dummy", "");
    Component::add_child(&parent, a.clone()).unwrap();
    Component::add_child(&parent, b.clone()).unwrap();
    Component::add_child(&parent, c.clone()).unwrap();

    assert_eq!(a.borrow().name(), "dummy0");
    assert_eq!(b.borrow().name(), "dummy1");
    assert_eq!(c.borrow().name(), "dummy2");
}

/// Removing an earlier sibling never renumbers the ones after it — their
/// names were already assigned and are never reclaimed.
#[test]
fn removing_a_sibling_does_not_renumber_the_rest() {
    let parent = Component::new("dummy", "");
    let a = Component::new("dummy", "");
    let b = Component::new("dummy", "");
    let c = Component::new("dummy", "");
    Component::add_child(&parent, a.clone()).unwrap();
    Component::add_child(&parent, b.clone()).unwrap();
    Component::add_child(&parent, c.clone()).unwrap();

    Component::remove_child(&parent, &a);

    assert_eq!(b.borrow().name(), "dummy1");
    assert_eq!(c.borrow().name(), "dummy2");
    assert_eq!(parent.borrow().children().len(), 2);
    assert!(a.borrow().parent().is_none());
}

/// A subsequently added unnamed child fills the smallest unused index,
/// even if that means skipping over a name freed by removal (the freed
/// name itself is never reassigned, but a name that was never taken is
/// still the smallest candidate).
#[test]
fn new_child_after_removal_still_probes_from_zero() {
    let parent = Component::new("dummy", "");
    let a = Component::new("dummy", "");
    Component::add_child(&parent, a.clone()).unwrap();
    Component::remove_child(&parent, &a);

    let d = Component::new("dummy", "");
    Component::add_child(&parent, d.clone()).unwrap();
    assert_eq!(d.borrow().name(), "dummy0");
}

/// An explicitly named child keeps its given name rather than being
/// auto-numbered.
#[test]
fn explicitly_named_child_is_not_renamed() {
    let parent = Component::new("dummy", "");
    let named = Component::new("dummy", "keyboard");
    Component::add_child(&parent, named.clone()).unwrap();
    assert_eq!(named.borrow().name(), "keyboard");
}

/// Attaching a component that already has a parent is rejected.
#[test]
fn add_child_rejects_a_component_already_attached_elsewhere() {
    let parent_a = Component::new("dummy", "");
    let parent_b = Component::new("dummy", "");
    let child = Component::new("dummy", "");
    Component::add_child(&parent_a, child.clone()).unwrap();
    assert!(Component::add_child(&parent_b, child).is_err());
}
