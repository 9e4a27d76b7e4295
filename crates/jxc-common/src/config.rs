//! Emit configuration.
//!
//! Options are fixed for a whole compilation run and shared read-only by
//! every unit. They deserialize from the `emit` section of a project file:
//!
//! ```json
//! {
//!   "naming": {
//!     "manglePrivateOnConflict": true,
//!     "qualifiedNameStyle": "flattened"
//!   },
//!   "indentWidth": 4
//! }
//! ```

use serde::Deserialize;

/// How qualified names are rendered in generated code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QualifiedNameStyle {
    /// `a.b.C`
    #[default]
    Dotted,
    /// `a_b_C`
    Flattened,
}

/// Naming and access-form policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingPolicy {
    /// Mangle private member names with their declaring class so that
    /// privates of a subclass cannot clobber those of its base.
    pub mangle_private_on_conflict: bool,
    /// Never wrap method references in bound closures.
    pub suppress_closure_wrapping: bool,
    /// Access members that did not resolve with `obj["name"]` so that
    /// renaming optimizers leave them alone.
    pub treat_unknown_dynamic_member_as_bracket_access: bool,
    pub qualified_name_style: QualifiedNameStyle,
}

/// Qualified names of the runtime helpers referenced by generated code.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeNames {
    /// Utility class providing `closure`, `synthType`, `as`, `is`, `string`.
    pub language: String,
    /// Function registering a class under its qualified name.
    pub export_symbol: String,
    /// Function wiring a subclass prototype chain.
    pub inherits: String,
    /// Event class dispatched by bindable setters.
    pub value_change_event: String,
    /// Constructor for namespace-qualified names.
    pub qname: String,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self {
            language: "org.apache.royale.utils.Language".to_string(),
            export_symbol: "goog.exportSymbol".to_string(),
            inherits: "goog.inherits".to_string(),
            value_change_event: "org.apache.royale.events.ValueChangeEvent".to_string(),
            qname: "QName".to_string(),
        }
    }
}

/// Options controlling one lowering run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmitOptions {
    pub naming: NamingPolicy,
    pub runtime: RuntimeNames,
    /// Emit the reflection-export call after each class constructor.
    pub emit_reflection_export: bool,
    /// Spaces per indentation level.
    pub indent_width: u32,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::default(),
            runtime: RuntimeNames::default(),
            emit_reflection_export: true,
            indent_width: 2,
        }
    }
}

impl EmitOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[must_use]
    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }
}

#[cfg(test)]
#[path = "../tests/config.rs"]
mod tests;
