//! Fixed tables for built-in types the target runtime lacks or renames.

/// Static constants of primitive wrapper types, folded to literals.
///
/// `int.MAX_VALUE` is `2147483648`, one past the true signed bound. Existing
/// output depends on that value, so it is kept.
const FOLDED_CONSTANTS: &[(&str, &str, &str)] = &[
    ("Array", "CASEINSENSITIVE", "1"),
    ("Array", "DESCENDING", "2"),
    ("Array", "UNIQUESORT", "4"),
    ("Array", "RETURNINDEXEDARRAY", "8"),
    ("Array", "NUMERIC", "16"),
    ("int", "MAX_VALUE", "2147483648"),
    ("int", "MIN_VALUE", "-2147483648"),
    ("uint", "MAX_VALUE", "4294967295"),
    ("uint", "MIN_VALUE", "0"),
];

/// Date components: (property, getter, setter).
const DATE_COMPONENTS: &[(&str, &str, &str)] = &[
    ("time", "getTime", "setTime"),
    ("fullYear", "getFullYear", "setFullYear"),
    ("month", "getMonth", "setMonth"),
    ("date", "getDate", "setDate"),
    ("day", "getDay", "setDay"),
    ("hours", "getHours", "setHours"),
    ("minutes", "getMinutes", "setMinutes"),
    ("seconds", "getSeconds", "setSeconds"),
    ("milliseconds", "getMilliseconds", "setMilliseconds"),
    ("timezoneOffset", "getTimezoneOffset", "setTimezoneOffset"),
    ("fullYearUTC", "getUTCFullYear", "setUTCFullYear"),
    ("monthUTC", "getUTCMonth", "setUTCMonth"),
    ("dateUTC", "getUTCDate", "setUTCDate"),
    ("dayUTC", "getUTCDay", "setUTCDay"),
    ("hoursUTC", "getUTCHours", "setUTCHours"),
    ("minutesUTC", "getUTCMinutes", "setUTCMinutes"),
    ("secondsUTC", "getUTCSeconds", "setUTCSeconds"),
    ("millisecondsUTC", "getUTCMilliseconds", "setUTCMilliseconds"),
];

/// Types with no native constructor in the target runtime.
const SYNTHETIC_TYPES: &[&str] = &["int", "uint", "Class"];

pub fn folded_constant(type_name: &str, member: &str) -> Option<&'static str> {
    FOLDED_CONSTANTS
        .iter()
        .find(|(owner, name, _)| *owner == type_name && *name == member)
        .map(|(_, _, value)| *value)
}

/// Component names match case-insensitively.
pub fn date_getter(component: &str) -> Option<&'static str> {
    DATE_COMPONENTS
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(component))
        .map(|(_, getter, _)| *getter)
}

pub fn date_setter(component: &str) -> Option<&'static str> {
    DATE_COMPONENTS
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(component))
        .map(|(_, _, setter)| *setter)
}

pub fn is_synthetic_type(qualified_name: &str) -> bool {
    SYNTHETIC_TYPES.contains(&qualified_name)
}

/// Array operations that lower to `splice`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayOp {
    /// `a.removeAt(i)` -> `a.splice(i, 1)[0]`
    RemoveAt,
    /// `a.insertAt(i, v)` -> `a.splice(i, 0, v)`
    InsertAt,
}

impl ArrayOp {
    pub fn from_member(owner: &str, name: &str) -> Option<Self> {
        if owner != "Array" {
            return None;
        }
        match name {
            "removeAt" => Some(ArrayOp::RemoveAt),
            "insertAt" => Some(ArrayOp::InsertAt),
            _ => None,
        }
    }

    pub const fn renamed(self) -> &'static str {
        "splice"
    }
}

/// Value a typed field or local holds before assignment.
pub fn type_default(qualified_name: &str) -> Option<&'static str> {
    match qualified_name {
        "int" | "uint" => Some("0"),
        "Number" => Some("NaN"),
        "Boolean" => Some("false"),
        _ => None,
    }
}

/// Closure-compiler type expression for a qualified type name.
pub fn doc_type_name(qualified_name: &str) -> Option<&'static str> {
    match qualified_name {
        "int" | "uint" | "Number" => Some("number"),
        "String" => Some("string"),
        "Boolean" => Some("boolean"),
        "*" => Some("*"),
        _ => None,
    }
}

/// Coercion applied when assigning to a variable of a built-in type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coercion {
    /// `(v) >> 0`
    Int,
    /// `(v) >>> 0`
    Uint,
    /// `!!(v)`
    Boolean,
    /// `Language.string(v)`
    String,
}

impl Coercion {
    pub fn for_type(qualified_name: &str) -> Option<Self> {
        match qualified_name {
            "int" => Some(Coercion::Int),
            "uint" => Some(Coercion::Uint),
            "Boolean" => Some(Coercion::Boolean),
            "String" => Some(Coercion::String),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/builtins.rs"]
mod tests;
