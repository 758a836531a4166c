//! Space-separated command namespace names.
//!
//! A namespace name encodes its own hierarchy: `"service plan"` is namespace
//! `plan` nested under `service`.

pub const NAMESPACE_SEP: char = ' ';

/// Join a namespace and a command or child name into a qualified name.
/// An empty namespace yields `name` alone.
pub fn qualified(namespace: &str, name: &str) -> String {
    format!("{}{}{}", namespace, NAMESPACE_SEP, name)
        .trim()
        .to_string()
}

/// Name of the enclosing namespace, `""` for a top-level one.
pub fn parent(name: &str) -> &str {
    name.rfind(NAMESPACE_SEP).map_or("", |i| &name[..i])
}

/// Last segment of a qualified name.
pub fn leaf(name: &str) -> &str {
    name.rfind(NAMESPACE_SEP).map_or(name, |i| &name[i + 1..])
}

/// Nesting depth, `1` for a top-level namespace and `0` for the root.
pub fn depth(name: &str) -> usize {
    name.split(NAMESPACE_SEP).filter(|s| !s.is_empty()).count()
}
