//! Component tree: the runtime hierarchy of emulated machine elements.
//!
//! This module implements spec component (A) (the generic, clonable,
//! checksummable, path-addressable tree of named nodes with typed state
//! variables), component (B) (the process-wide factory registry that
//! builds nodes from class-name strings), and component (C) (the
//! address/data bus capability a subset of component classes implement).
//!
//! The tree itself (`node`) is pure data: class name, parent/child links,
//! and named `Variable` bindings. It carries no knowledge of what a
//! `"sparc_cpu"` or `"ram"` class actually *does* at dispatch time — that
//! lives in `crate::core` and `crate::isa::sparc`, which are constructed
//! from a tree's variables by `crate::sim::Machine::from_tree`. This
//! mirrors the real system: the tree is the inspectable, serializable
//! topology; the dispatch engine holds direct Rust references to the
//! pieces it needs on every instruction for speed, exactly as spec.md's
//! design notes call for ("dispatch ... at rates approaching
//! interpreter-JIT hybrids").

/// The address/data bus capability (spec component C).
pub mod bus;
/// The component factory registry (spec component B).
pub mod factory;
/// The component tree node type (spec component A).
pub mod node;
/// Typed state variables bound to component nodes.
pub mod variable;

pub use bus::{AddressDataBus, MainbusComponent, RamComponent};
pub use factory::ComponentFactory;
pub use node::{Component, ComponentRef};
pub use variable::Variable;

/// Renders the subtree rooted at `root` using the textual grammar spec.md
/// §6 describes: `component "<class>" "<name>" { var "<name>" = <text>
/// ... component { ... } }`. Variable values are written with their own
/// type's textual form ([`Variable::to_text`]) so a fresh component of the
/// same class (which already binds a variable of the right type) can parse
/// them back via `set_variable_value` without needing the type tag spelled
/// out separately.
pub fn serialize(root: &ComponentRef) -> String {
    let mut out = String::new();
    write_node(root, 0, &mut out);
    out
}

fn write_node(node: &ComponentRef, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    let me = node.borrow();
    out.push_str(&pad);
    out.push_str("component \"");
    out.push_str(me.class_name());
    out.push_str("\" \"");
    out.push_str(&escape(me.name()));
    out.push_str("\" {\n");
    for (name, value) in me.variables() {
        out.push_str(&pad);
        out.push_str("  var \"");
        out.push_str(&escape(name));
        out.push_str("\" = ");
        out.push_str(&value.to_text());
        out.push('\n');
    }
    for child in me.children() {
        write_node(child, indent + 1, out);
    }
    out.push_str(&pad);
    out.push_str("}\n");
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parses text produced by [`serialize`] back into a live tree, rebuilding
/// each node via `factory` (so class-specific default variables and
/// behavior are re-established) and then overwriting its variables with the
/// serialized values. Fails on any malformed token stream, an unknown class
/// name (a factory miss), or a variable the factory's default instance
/// doesn't already bind.
pub fn deserialize(text: &str, factory: &ComponentFactory) -> Result<ComponentRef, String> {
    let tokens = tokenize(text)?;
    let mut pos = 0;
    let root = parse_node(&tokens, &mut pos, factory)?;
    Ok(root)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    LBrace,
    RBrace,
    Eq,
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                tokens.push(Token::LBrace);
            }
            '}' => {
                chars.next();
                tokens.push(Token::RBrace);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Eq);
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some('"') => s.push('"'),
                            Some('\\') => s.push('\\'),
                            Some(other) => {
                                s.push('\\');
                                s.push(other);
                            }
                            None => return Err("unterminated escape".to_string()),
                        },
                        Some('"') => break,
                        Some(other) => s.push(other),
                        None => return Err("unterminated string".to_string()),
                    }
                }
                tokens.push(Token::Str(s));
            }
            _ => {
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '{' || c == '}' || c == '=' {
                        break;
                    }
                    s.push(c);
                    chars.next();
                }
                tokens.push(Token::Ident(s));
            }
        }
    }
    Ok(tokens)
}

fn expect_ident(tokens: &[Token], pos: &mut usize, want: &str) -> Result<(), String> {
    match tokens.get(*pos) {
        Some(Token::Ident(s)) if s == want => {
            *pos += 1;
            Ok(())
        }
        other => Err(format!("expected `{want}`, found {other:?}")),
    }
}

fn expect_str(tokens: &[Token], pos: &mut usize) -> Result<String, String> {
    match tokens.get(*pos) {
        Some(Token::Str(s)) => {
            *pos += 1;
            Ok(s.clone())
        }
        other => Err(format!("expected quoted string, found {other:?}")),
    }
}

fn parse_node(
    tokens: &[Token],
    pos: &mut usize,
    factory: &ComponentFactory,
) -> Result<ComponentRef, String> {
    expect_ident(tokens, pos, "component")?;
    let class_name = expect_str(tokens, pos)?;
    let name = expect_str(tokens, pos)?;
    match tokens.get(*pos) {
        Some(Token::LBrace) => *pos += 1,
        other => return Err(format!("expected `{{`, found {other:?}")),
    }

    let node = factory
        .create(&class_name)
        .ok_or_else(|| format!("no such component class: {class_name}"))?;
    node.borrow_mut().set_name(name);

    loop {
        match tokens.get(*pos) {
            Some(Token::Ident(kw)) if kw == "var" => {
                *pos += 1;
                let var_name = expect_str(tokens, pos)?;
                match tokens.get(*pos) {
                    Some(Token::Eq) => *pos += 1,
                    other => return Err(format!("expected `=`, found {other:?}")),
                }
                let value_text = match tokens.get(*pos) {
                    Some(Token::Str(s)) => {
                        *pos += 1;
                        format!("\"{}\"", escape(s))
                    }
                    Some(Token::Ident(s)) => {
                        *pos += 1;
                        s.clone()
                    }
                    other => return Err(format!("expected variable value, found {other:?}")),
                };
                node.borrow_mut()
                    .set_variable_value(&var_name, &value_text)
                    .map_err(|e| e.to_string())?;
            }
            Some(Token::Ident(kw)) if kw == "component" => {
                let child = parse_node(tokens, pos, factory)?;
                Component::add_child(&node, child).map_err(|e| e.to_string())?;
            }
            Some(Token::RBrace) => {
                *pos += 1;
                break;
            }
            other => return Err(format!("unexpected token in component body: {other:?}")),
        }
    }

    Ok(node)
}

/// Errors raised by component-tree operations.
///
/// Spec §7(d) calls structural errors (duplicate parent, cyclic add)
/// "rejected at the API"; this is the type that rejection takes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComponentError {
    /// `add_child` was called with a component that already has a parent.
    #[error("component \"{0}\" already has a parent")]
    AlreadyHasParent(String),
    /// Text passed to `Variable::set_from_text` didn't match the
    /// variable's expected grammar.
    #[error("cannot parse variable text: {0}")]
    BadVariableText(String),
    /// `get_variable`/`set_variable_value` named a variable that doesn't
    /// exist on the node.
    #[error("no such variable: {0}")]
    NoSuchVariable(String),
    /// A factory spec string (`CreateComponent`'s argument) didn't match
    /// the `name` or `name(k=v,...)` grammar.
    #[error("malformed component spec: {0}")]
    BadSpec(String),
}
