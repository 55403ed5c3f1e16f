//! `Component`: a node in the runtime hardware tree.
//!
//! Grounded on `original_source/src/components/dummy/DummyComponent.cc`
//! (variable binding, checksum folding, clone) and
//! `original_source/src/components/busses/MainbusComponent.cc`
//! (parent/child wiring). The tree is single-threaded per spec.md §5, so
//! children are owned via `Rc<RefCell<_>>` and the parent link is a
//! `Weak<RefCell<_>>`, matching spec.md's "weak back-reference, owned
//! children" data model without needing `Arc`/`Mutex`.

use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::rc::{Rc, Weak};

use super::variable::Variable;
use super::ComponentError;

/// A shared handle to a component node.
///
/// Cloning a `ComponentRef` clones the handle (bumps the refcount), not
/// the subtree — use [`Component::clone_subtree`] for a deep copy.
pub type ComponentRef = Rc<RefCell<Component>>;

/// A node in the component tree.
///
/// Holds a class name (e.g. `"mainbus"`, `"dummy"`, `"ram"`), its own
/// name (unique among its siblings, spec.md invariant 2), a weak back-link
/// to its parent, an ordered list of owned children, and an ordered list
/// of named `Variable` bindings.
pub struct Component {
    class_name: String,
    name: String,
    parent: Weak<RefCell<Component>>,
    children: Vec<ComponentRef>,
    variables: Vec<(String, Variable)>,
}

impl Component {
    /// Creates a new, parentless, childless component of the given class.
    ///
    /// This is the low-level constructor; `CreateComponent` (the factory,
    /// spec component B) is the usual way components come into being —
    /// it calls this and then installs the class's variables.
    pub fn new(class_name: impl Into<String>, name: impl Into<String>) -> ComponentRef {
        Rc::new(RefCell::new(Component {
            class_name: class_name.into(),
            name: name.into(),
            parent: Weak::new(),
            children: Vec::new(),
            variables: Vec::new(),
        }))
    }

    /// The component's class name (e.g. `"ram"`).
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The component's own name, unique among its siblings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overwrites this component's own name. Used by deserialization to
    /// restore the serialized name onto a factory-constructed instance,
    /// bypassing `add_child`'s auto-naming (the name is already known).
    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// A handle to the parent, if any. `None` for a detached or root node.
    pub fn parent(&self) -> Option<ComponentRef> {
        self.parent.upgrade()
    }

    /// The owned children, in insertion order.
    pub fn children(&self) -> &[ComponentRef] {
        &self.children
    }

    /// Binds a new named variable on this component. Used by factory
    /// constructors when building a fresh instance; not part of the
    /// public tree-editing API spec.md describes (that's
    /// `set_variable_value`, which requires the variable to already
    /// exist).
    pub fn bind_variable(&mut self, name: impl Into<String>, value: Variable) {
        self.variables.push((name.into(), value));
    }

    /// Reads a variable's current value by name.
    pub fn get_variable(&self, name: &str) -> Result<Variable, ComponentError> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| ComponentError::NoSuchVariable(name.to_string()))
    }

    /// Parses `text` using the named variable's existing type and replaces
    /// its value. Fails if the variable doesn't exist or `text` doesn't
    /// parse per spec.md §6's grammar.
    pub fn set_variable_value(&mut self, name: &str, text: &str) -> Result<(), ComponentError> {
        let (_, var) = self
            .variables
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| ComponentError::NoSuchVariable(name.to_string()))?;
        var.set_from_text(text)
    }

    /// All (name, value) variable bindings, in declaration order. Used by
    /// serialization and checksumming, which must iterate in a
    /// deterministic order.
    pub fn variables(&self) -> &[(String, Variable)] {
        &self.variables
    }

    /// Attaches `child` to `self`, enforcing spec.md invariant 2 (unique
    /// sibling names, auto-assigning `<className><k>` for an empty name).
    ///
    /// Fails with [`ComponentError::AlreadyHasParent`] if `child` is
    /// already attached elsewhere, per spec.md §7(d) ("structural error in
    /// the component tree ... rejected at the API").
    pub fn add_child(self_ref: &ComponentRef, child: ComponentRef) -> Result<(), ComponentError> {
        if child.borrow().parent.upgrade().is_some() {
            return Err(ComponentError::AlreadyHasParent(child.borrow().name.clone()));
        }

        let needs_name = child.borrow().name.is_empty();
        if needs_name {
            let class = child.borrow().class_name.clone();
            let mut k = 0usize;
            loop {
                let candidate = format!("{class}{k}");
                let taken = self_ref
                    .borrow()
                    .children
                    .iter()
                    .any(|c| c.borrow().name == candidate);
                if !taken {
                    child.borrow_mut().name = candidate;
                    break;
                }
                k += 1;
            }
        }

        child.borrow_mut().parent = Rc::downgrade(self_ref);
        self_ref.borrow_mut().children.push(child);
        Ok(())
    }

    /// Detaches `child` from `self_ref`'s child list. The child's own
    /// subtree (and its variables) are preserved intact; only the
    /// parent/child link is severed. Already-assigned sibling names are
    /// never reused for later insertions (spec.md invariant 2).
    pub fn remove_child(self_ref: &ComponentRef, child: &ComponentRef) {
        let mut me = self_ref.borrow_mut();
        if let Some(idx) = me.children.iter().position(|c| Rc::ptr_eq(c, child)) {
            me.children.remove(idx);
        }
        drop(me);
        child.borrow_mut().parent = Weak::new();
    }

    /// Deep-copies the subtree rooted at `self_ref`. The result is
    /// parentless; its checksum equals the source's (spec.md invariant 3),
    /// and subsequent mutation of either tree never affects the other —
    /// building bottom-up (children first) means there is never a partial
    /// or cyclic intermediate state.
    pub fn clone_subtree(self_ref: &ComponentRef) -> ComponentRef {
        let me = self_ref.borrow();
        let cloned = Component::new(me.class_name.clone(), me.name.clone());
        cloned.borrow_mut().variables = me.variables.clone();
        for child in &me.children {
            let child_clone = Component::clone_subtree(child);
            Component::add_child(&cloned, child_clone).expect("freshly cloned child has no parent");
        }
        cloned
    }

    /// Folds this component's class name, variables, and (recursively)
    /// children's checksums into `hasher`, in a fixed deterministic order.
    /// Satisfies testable property 1: a mutation anywhere in the subtree
    /// changes the fold; an unrelated clone's fold is unaffected.
    pub fn add_checksum(self_ref: &ComponentRef, hasher: &mut DefaultHasher) {
        let me = self_ref.borrow();
        hasher.write(me.class_name.as_bytes());
        hasher.write_u8(0); // separator, so "ab"+"c" never collides with "a"+"bc"
        for (name, value) in &me.variables {
            hasher.write(name.as_bytes());
            hasher.write_u8(0);
            value.feed_checksum(hasher);
        }
        for child in &me.children {
            // Each child folds into its own hasher first so structurally
            // different subtrees with accidentally-matching byte streams
            // still diverge (a flat hasher.write of child bytes could
            // collide with a nested one).
            let mut child_hasher = DefaultHasher::new();
            Component::add_checksum(child, &mut child_hasher);
            hasher.write_u64(child_hasher.finish());
        }
    }

    /// Computes this subtree's checksum as a single `u64`.
    pub fn checksum(self_ref: &ComponentRef) -> u64 {
        let mut hasher = DefaultHasher::new();
        Component::add_checksum(self_ref, &mut hasher);
        hasher.finish()
    }

    /// Concatenates ancestor names from the root down to `self_ref` with
    /// `.` separators. A nameless root renders as `(className)` per
    /// spec.md §3.
    pub fn generate_path(self_ref: &ComponentRef) -> String {
        let mut names = Vec::new();
        let mut current = self_ref.clone();
        loop {
            let me = current.borrow();
            if me.name.is_empty() && me.parent.upgrade().is_none() {
                names.push(format!("({})", me.class_name));
            } else {
                names.push(me.name.clone());
            }
            let parent = me.parent.upgrade();
            drop(me);
            match parent {
                Some(p) => current = p,
                None => break,
            }
        }
        names.reverse();
        names.join(".")
    }

    /// Resolves a dotted path rooted at `self_ref`, matching `self_ref`'s
    /// own name as the path's first component (spec.md §3). Returns
    /// `None` on a lookup miss (spec.md §7(f)).
    pub fn lookup_path(self_ref: &ComponentRef, path: &str) -> Option<ComponentRef> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        if first != self_ref.borrow().name {
            return None;
        }
        let mut current = self_ref.clone();
        for part in parts {
            let next = current
                .borrow()
                .children
                .iter()
                .find(|c| c.borrow().name == part)
                .cloned()?;
            current = next;
        }
        Some(current)
    }

    /// Enumerates every path under `self_ref` (pre-order) whose trailing
    /// dotted components equal `query`. An empty `query` returns every
    /// path in the subtree.
    pub fn find_path_by_partial_match(self_ref: &ComponentRef, query: &str) -> Vec<String> {
        let mut out = Vec::new();
        Component::collect_matches(self_ref, query, &mut out);
        out
    }

    fn collect_matches(node: &ComponentRef, query: &str, out: &mut Vec<String>) {
        let path = Component::generate_path(node);
        if query.is_empty() || path_suffix_matches(&path, query) {
            out.push(path);
        }
        for child in &node.borrow().children {
            Component::collect_matches(child, query, out);
        }
    }

    /// Re-serializes and re-parses the subtree rooted at `self_ref`,
    /// asserting the checksum is preserved (testable property 2). Returns
    /// `Ok(())` on success or the mismatch as an error string.
    pub fn check_consistency(
        self_ref: &ComponentRef,
        factory: &super::ComponentFactory,
    ) -> Result<(), String> {
        let before = Component::checksum(self_ref);
        let text = super::serialize(self_ref);
        let restored =
            super::deserialize(&text, factory).map_err(|e| format!("deserialize failed: {e}"))?;
        let after = Component::checksum(&restored);
        if before == after {
            Ok(())
        } else {
            Err(format!("checksum mismatch: {before:#x} != {after:#x}"))
        }
    }
}

/// A path's tail matches a dotted query if every query component but the
/// last equals its corresponding path component exactly, and the last query
/// component is a substring of its corresponding path component (so `"pci"`
/// matches a leaf named `"pcibus0"`).
fn path_suffix_matches(path: &str, query: &str) -> bool {
    let path_parts: Vec<&str> = path.split('.').collect();
    let query_parts: Vec<&str> = query.split('.').collect();
    if query_parts.len() > path_parts.len() {
        return false;
    }
    let tail = &path_parts[path_parts.len() - query_parts.len()..];
    let (last_query, leading_query) = query_parts.split_last().expect("query is non-empty");
    let (last_path, leading_path) = tail.split_last().expect("tail is non-empty");
    leading_query == leading_path && last_path.contains(last_query)
}
