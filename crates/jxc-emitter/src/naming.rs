//! Name formatting policy.
//!
//! Pure string transforms over qualified names; no AST knowledge.

use jxc_ast::{Classification, Symbol};
use jxc_common::{NamingPolicy, QualifiedNameStyle};

#[derive(Clone, Copy, Debug)]
pub struct NameFormatter<'a> {
    policy: &'a NamingPolicy,
}

impl<'a> NameFormatter<'a> {
    pub fn new(policy: &'a NamingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &'a NamingPolicy {
        self.policy
    }

    /// Render a qualified name in the configured style.
    pub fn qualified(&self, qualified_name: &str) -> String {
        match self.policy.qualified_name_style {
            QualifiedNameStyle::Dotted => qualified_name.to_string(),
            QualifiedNameStyle::Flattened => qualified_name.replace('.', "_"),
        }
    }

    /// `a.b.C` + `secret` -> `a_b_C_secret`
    pub fn private_name(&self, class_qualified_name: &str, name: &str) -> String {
        format!("{}_{name}", class_qualified_name.replace('.', "_"))
    }

    /// Short name of a member as written after `.`, mangled when the
    /// member is a private instance member and the policy asks for it.
    pub fn member_name(&self, symbol: &Symbol) -> String {
        if self.policy.mangle_private_on_conflict
            && symbol.is_private()
            && !symbol.is_static()
            && symbol.classification == Classification::ClassMember
            && let Some(parent) = &symbol.parent
        {
            return self.private_name(parent, &symbol.name);
        }
        symbol.name.clone()
    }

    /// Property key of a member declared in a custom namespace.
    pub fn namespaced_property(uri: &str, name: &str) -> String {
        let mut key = String::with_capacity(uri.len() + name.len() + 2);
        for ch in uri.chars() {
            key.push(match ch {
                ':' | '.' => '_',
                '/' => '$',
                other => other,
            });
        }
        key.push_str("__");
        key.push_str(name);
        key
    }

    /// `["name"]`
    pub fn bracket(name: &str) -> String {
        format!("[\"{name}\"]")
    }
}

#[cfg(test)]
#[path = "../tests/naming.rs"]
mod tests;
