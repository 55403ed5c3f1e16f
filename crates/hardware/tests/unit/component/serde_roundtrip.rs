//! Testable property 2: serialize → deserialize preserves the checksum.

use sparc_core::component::factory::register_builtin_classes;
use sparc_core::component::{Component, ComponentFactory};

fn factory() -> ComponentFactory {
    let mut f = ComponentFactory::new();
    register_builtin_classes(&mut f);
    f
}

/// A multi-level tree of builtin classes round-trips through text
/// unchanged, per `Component::check_consistency`.
#[test]
fn builtin_tree_round_trips_through_text() {
    let f = factory();
    let root = f.create("root").unwrap();
    let machine = f.create("machine(name=machine1)").unwrap();
    Component::add_child(&root, machine.clone()).unwrap();
    let ram = f.create("ram(name=ram0,base=0x1000,size=0x4000)").unwrap();
    Component::add_child(&machine, ram).unwrap();

    Component::check_consistency(&root, &f).unwrap();
}

/// The round-trip actually preserves variable values, not just an
/// accidentally-matching checksum.
#[test]
fn round_trip_preserves_variable_values() {
    let f = factory();
    let ram = f.create("ram(base=0x8000,size=0x2000)").unwrap();
    let text = sparc_core::component::serialize(&ram);
    let restored = sparc_core::component::deserialize(&text, &f).unwrap();

    assert_eq!(
        ram.borrow().get_variable("base").unwrap(),
        restored.borrow().get_variable("base").unwrap()
    );
    assert_eq!(
        ram.borrow().get_variable("size").unwrap(),
        restored.borrow().get_variable("size").unwrap()
    );
}

/// Deserializing a reference to an unregistered class fails rather than
/// silently producing a wrong tree.
#[test]
fn deserialize_rejects_unknown_class() {
    let f = ComponentFactory::new();
    let text = "component \"nope\" \"x\" {\n}\n";
    assert!(sparc_core::component::deserialize(text, &f).is_err());
}
