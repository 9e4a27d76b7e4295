//! Reflection metadata hand-off.
//!
//! The code generator only reports which members a lowered class has; the
//! metadata format is owned by the consumer behind `ClassInfoSink`.

use jxc_ast::Symbol;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Constructor,
    Field,
    Method,
    Accessor,
    Bindable,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub qualified_name: String,
    pub members: Vec<MemberInfo>,
}

/// Receives the member list of every lowered class, once per class.
pub trait ClassInfoSink {
    fn emit_class_info(&mut self, class: &Symbol, members: &[MemberInfo]);
}

/// Sink that keeps every class info in lowering order.
#[derive(Debug, Default)]
pub struct ClassInfoCollector {
    pub infos: Vec<ClassInfo>,
}

impl ClassInfoSink for ClassInfoCollector {
    fn emit_class_info(&mut self, class: &Symbol, members: &[MemberInfo]) {
        self.infos.push(ClassInfo {
            qualified_name: class.qualified_name.clone(),
            members: members.to_vec(),
        });
    }
}
