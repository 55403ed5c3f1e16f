//! Component factory: a process-wide registry mapping class name to
//! constructor and attribute query.
//!
//! Grounded on `original_source/src/components/machines/MVME187Machine.cc`
//! and `TestMIPSMachine.cc`, which build their fixed device topologies by
//! calling a factory with class-name strings; generalized here into a
//! registry any caller can populate and query, matching spec.md §4.2.

use std::collections::HashMap;

use super::node::{Component, ComponentRef};
use super::ComponentError;

/// A registered component class: how to build a fresh instance, and how
/// to answer `HasAttribute` queries about the class (not a particular
/// instance — attributes like `"stable"` or `"description"` are
/// properties of the class itself).
pub struct ClassEntry {
    constructor: Box<dyn Fn(&HashMap<String, String>) -> ComponentRef>,
    attributes: HashMap<&'static str, &'static str>,
}

/// Registry of component classes, keyed by class name.
///
/// `CreateComponent` parses a spec string and looks up the named class;
/// `RegisterComponentClass` installs (or, for an existing name,
/// atomically replaces) an entry.
#[derive(Default)]
pub struct ComponentFactory {
    classes: HashMap<String, ClassEntry>,
}

impl ComponentFactory {
    /// Creates an empty factory with no registered classes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `class_name`, replacing any prior registration under the
    /// same name (spec.md §4.2: "later registrations ... replace the
    /// prior one").
    pub fn register<F>(
        &mut self,
        class_name: &str,
        attributes: &[(&'static str, &'static str)],
        constructor: F,
    ) where
        F: Fn(&HashMap<String, String>) -> ComponentRef + 'static,
    {
        self.classes.insert(
            class_name.to_string(),
            ClassEntry {
                constructor: Box::new(constructor),
                attributes: attributes.iter().copied().collect(),
            },
        );
    }

    /// Returns whether `class_name`'s attribute `key` is present and
    /// non-empty.
    pub fn has_attribute(&self, class_name: &str, key: &str) -> bool {
        self.classes
            .get(class_name)
            .and_then(|entry| entry.attributes.get(key))
            .is_some_and(|v| !v.is_empty())
    }

    /// Returns `class_name`'s attribute `key`, or `None` if the class or
    /// key isn't registered.
    pub fn attribute(&self, class_name: &str, key: &str) -> Option<&'static str> {
        self.classes.get(class_name)?.attributes.get(key).copied()
    }

    /// Parses `spec` (`"name"` or `"name(k1=v1,k2=v2,...)"`) and
    /// constructs a fresh, parentless component of that class. Returns
    /// `None` on a factory miss (spec.md §7(e)) — unknown class name —
    /// or a malformed spec string.
    pub fn create(&self, spec: &str) -> Option<ComponentRef> {
        let (class_name, args) = parse_spec(spec).ok()?;
        let entry = self.classes.get(&class_name)?;
        Some((entry.constructor)(&args))
    }
}

/// Parses the factory spec grammar: `classname` or
/// `classname(k=v,k=v,...)`. Values are raw strings until the component
/// itself parses them (spec.md §6).
pub fn parse_spec(spec: &str) -> Result<(String, HashMap<String, String>), ComponentError> {
    let spec = spec.trim();
    let Some(open) = spec.find('(') else {
        if spec.is_empty() {
            return Err(ComponentError::BadSpec(spec.to_string()));
        }
        return Ok((spec.to_string(), HashMap::new()));
    };
    let close = spec
        .rfind(')')
        .filter(|&c| c == spec.len() - 1)
        .ok_or_else(|| ComponentError::BadSpec(spec.to_string()))?;
    let class_name = spec[..open].to_string();
    if class_name.is_empty() {
        return Err(ComponentError::BadSpec(spec.to_string()));
    }
    let body = &spec[open + 1..close];
    let mut args = HashMap::new();
    if !body.is_empty() {
        for pair in body.split(',') {
            let (k, v) = pair
                .split_once('=')
                .ok_or_else(|| ComponentError::BadSpec(spec.to_string()))?;
            args.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    Ok((class_name, args))
}

/// Registers the built-in classes every end-to-end scenario in spec.md §8
/// relies on: a nameless `"root"` placeholder, a behaviorless `"dummy"`,
/// the `"mainbus"` no-op bus skeleton, a functional `"ram"` backing
/// store, the `"sparc_cpu"` shell, and a grouping `"machine"` component.
pub fn register_builtin_classes(factory: &mut ComponentFactory) {
    factory.register(
        "root",
        &[("stable", "yes"), ("description", "Tree root placeholder")],
        |_args| Component::new("root", ""),
    );

    factory.register(
        "dummy",
        &[
            ("stable", "yes"),
            ("description", "A component with no variables or behavior"),
        ],
        |args| {
            let name = args.get("name").cloned().unwrap_or_default();
            Component::new("dummy", name)
        },
    );

    factory.register(
        "mainbus",
        &[
            ("stable", "yes"),
            ("description", "Generic main bus (no-op skeleton)"),
        ],
        |args| {
            let name = args.get("name").cloned().unwrap_or_default();
            Component::new("mainbus", name)
        },
    );

    factory.register(
        "ram",
        &[
            ("stable", "yes"),
            ("description", "Flat byte-addressable memory backing store"),
        ],
        |args| {
            let name = args.get("name").cloned().unwrap_or_default();
            let comp = Component::new("ram", name);
            let base: u64 = args
                .get("base")
                .and_then(|s| parse_numeric(s))
                .unwrap_or(0);
            let size: u64 = args
                .get("size")
                .and_then(|s| parse_numeric(s))
                .unwrap_or(crate::core::config::defaults::RAM_SIZE as u64);
            comp.borrow_mut()
                .bind_variable("base", super::Variable::U64(base));
            comp.borrow_mut()
                .bind_variable("size", super::Variable::U64(size));
            comp
        },
    );

    factory.register(
        "sparc_cpu",
        &[
            ("stable", "yes"),
            ("description", "SPARC v8/v9 CPU shell"),
            ("machine", "generic"),
        ],
        |args| {
            let name = args.get("name").cloned().unwrap_or_default();
            let comp = Component::new("sparc_cpu", name);
            let is_32bit = args.get("model").map(|m| m != "v9").unwrap_or(true);
            comp.borrow_mut()
                .bind_variable("is_32bit", super::Variable::U8(is_32bit as u8));
            comp
        },
    );

    factory.register(
        "machine",
        &[("stable", "yes"), ("description", "Machine grouping node")],
        |args| {
            let name = args.get("name").cloned().unwrap_or_default();
            Component::new("machine", name)
        },
    );
}

fn parse_numeric(s: &str) -> Option<u64> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}
