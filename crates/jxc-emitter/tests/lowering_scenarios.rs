//! End-to-end lowering of small resolved trees.

use jxc_ast::node::{FunctionData, ParameterData, VariableData};
use jxc_ast::{
    AstBuilder, NamespaceRef, NodeIndex, ProgramSymbols, Symbol, SymbolFlags, SymbolKind, TypeRef,
    UnitBindings, UnitResolver,
};
use jxc_common::diagnostics::diagnostic_codes;
use jxc_common::limits::MAX_EMIT_RECURSION_DEPTH;
use jxc_common::{DiagnosticCategory, DiagnosticSink, EmitOptions, NamingPolicy, QualifiedNameStyle};
use jxc_emitter::{CompilationUnit, EmitError, MemberKind, UnitOutput, lower_unit, lower_units};

const LANGUAGE: &str = "org.apache.royale.utils.Language";

/// One unit under construction: tree, program symbols and node bindings.
struct Unit {
    b: AstBuilder,
    program: ProgramSymbols,
    bindings: UnitBindings,
}

impl Unit {
    fn new() -> Self {
        Self {
            b: AstBuilder::new(),
            program: ProgramSymbols::new(),
            bindings: UnitBindings::new(),
        }
    }

    fn bind(&mut self, node: NodeIndex, symbol: Symbol) {
        let id = self.program.add(symbol);
        self.bindings.bind(node, id);
    }

    /// Source file holding a single expression statement.
    fn statement_file(&mut self, expr: NodeIndex) -> NodeIndex {
        let statement = self.b.expr_stmt(expr);
        self.b.source_file(vec![statement])
    }

    fn lower(self, root: NodeIndex) -> UnitOutput {
        self.lower_with(root, &EmitOptions::default())
            .expect("unit lowers without internal errors")
    }

    fn lower_with(self, root: NodeIndex, options: &EmitOptions) -> Result<UnitOutput, EmitError> {
        let arena = self.b.finish();
        let resolver = UnitResolver::new(&self.program, &self.bindings);
        lower_unit("test.as", &arena, root, &resolver, options).map_err(|failure| failure.error)
    }
}

fn empty_body(b: &mut AstBuilder) -> NodeIndex {
    b.block(vec![])
}

// =============================================================================
// Classes
// =============================================================================

#[test]
fn test_explicit_constructor_with_static_scalar() {
    let mut u = Unit::new();
    let body = empty_body(&mut u.b);
    let ctor = u.b.constructor("C", vec![], body);
    let five = u.b.number("5");
    let x = u.b.static_field("X", Some(five));
    let class = u.b.class("C", None, vec![ctor, x]);
    u.bind(class, Symbol::class("C"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    assert_eq!(
        output.text,
        "/**\n * @constructor\n */\nC = function() {\n};\n\n\
         /**\n * Prevent renaming of class. Needed for reflection.\n */\n\
         goog.exportSymbol('C', C);\n\n\
         /**\n * @type {*}\n */\nC.X = 5;\n"
    );
    assert!(output.diagnostics.is_empty(), "resolved class raises no warnings");
    assert!(!output.needs_language_helper);
}

#[test]
fn test_instance_initializer_moves_into_synthesized_constructor() {
    let mut u = Unit::new();
    let value = u.b.object(vec![]);
    let y = u.b.field("y", Some(value));
    let class = u.b.class("D", None, vec![y]);
    u.bind(class, Symbol::class("D"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    assert!(
        output.text.contains("D = function() {\n  this.y = {};\n};"),
        "constructor assigns the field: {}",
        output.text
    );
    assert!(
        output.text.contains("D.prototype.y;"),
        "prototype declaration carries no value: {}",
        output.text
    );
    let ctor_at = output.text.find("D = function").expect("constructor present");
    let field_at = output.text.find("D.prototype.y;").expect("field present");
    assert!(ctor_at < field_at, "constructor precedes fields");
}

#[test]
fn test_constructor_synthesized_only_for_instance_initializers() {
    let mut u = Unit::new();
    let plain = u.b.field("a", None);
    let seven = u.b.number("7");
    let constant = u.b.static_field("K", Some(seven));
    let class = u.b.class("E", None, vec![plain, constant]);
    u.bind(class, Symbol::class("E"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    assert!(
        !output.text.contains("E = function"),
        "no constructor without instance initializers: {}",
        output.text
    );
    assert!(!output.text.contains("@constructor"));
    assert!(output.text.contains("E.prototype.a;"));
    assert!(output.text.contains("E.K = 7;"));
    assert_eq!(
        output.class_infos[0]
            .members
            .iter()
            .map(|m| m.kind)
            .collect::<Vec<_>>(),
        vec![MemberKind::Field, MemberKind::Field]
    );
}

#[test]
fn test_complex_static_initializer_runs_after_members() {
    let mut u = Unit::new();
    let one = u.b.number("1");
    let list = u.b.array(vec![one]);
    let table = u.b.static_field("TABLE", Some(list));
    let body = empty_body(&mut u.b);
    let run = u.b.method("run", vec![], body);
    let class = u.b.class("S", None, vec![table, run]);
    u.bind(class, Symbol::class("S"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    assert!(output.text.contains("S.TABLE;"), "declared without value: {}", output.text);
    let method_at = output.text.find("S.prototype.run = function").expect("method present");
    let init_at = output.text.find("S.TABLE = [1];").expect("static initializer present");
    assert!(method_at < init_at, "static initializers follow every member");
}

#[test]
fn test_accessors_and_bindables_follow_plain_members() {
    let mut u = Unit::new();
    let label = u.b.bindable(VariableData {
        name: "label".to_string(),
        ..VariableData::default()
    });
    let one = u.b.number("1");
    let ret = u.b.ret(Some(one));
    let getter_body = u.b.block(vec![ret]);
    let size = u.b.getter(FunctionData {
        name: "size".to_string(),
        body: getter_body,
        ..FunctionData::default()
    });
    let run_body = empty_body(&mut u.b);
    let run = u.b.method("run", vec![], run_body);
    let z = u.b.field("z", None);
    let class = u.b.class("C", None, vec![label, size, run, z]);
    u.bind(class, Symbol::class("C"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    let text = &output.text;
    let position = |needle: &str| {
        text.find(needle)
            .unwrap_or_else(|| panic!("missing {needle:?} in:\n{text}"))
    };

    let run_at = position("C.prototype.run = function");
    let z_at = position("C.prototype.z;");
    let backing_at = position("C.prototype.label_;");
    let bindable_get_at = position("C.prototype.get__label = function() {\n  return this.label_;\n};");
    let accessor_at = position("C.prototype.get__size = function() {\n  return 1;\n};");

    assert!(run_at < z_at, "plain members keep declaration order");
    assert!(z_at < backing_at, "bindables come after plain members");
    assert!(bindable_get_at < accessor_at, "accessors come after bindables");

    assert!(text.contains(
        "this.dispatchEvent(org.apache.royale.events.ValueChangeEvent.createUpdateEvent(this, \"label\", oldValue, value));"
    ));
    assert!(text.contains("Object.defineProperties(C.prototype, /** @lends {C.prototype} */ {"));
    assert!(text.contains("size: {\n    get: C.prototype.get__size\n  }"));
    assert!(
        output
            .used_names
            .contains(&"org.apache.royale.events.ValueChangeEvent".to_string()),
        "event class must survive dead-code elimination"
    );

    let kinds: Vec<_> = output.class_infos[0].members.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![MemberKind::Method, MemberKind::Field, MemberKind::Bindable, MemberKind::Accessor]
    );
}

#[test]
fn test_suppress_export_doc_tag() {
    let mut u = Unit::new();
    let members = u.b.block(vec![]);
    let class = u.b.class_with_body("Quiet", None, members, Some("/** @suppressexport */"));
    u.bind(class, Symbol::class("Quiet"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    assert!(!output.text.contains("exportSymbol"), "export suppressed: {}", output.text);
}

#[test]
fn test_force_link_requires_adjacent_import_and_reference() {
    let mut u = Unit::new();
    let linked_import = u.b.import("a.B");
    let linked_ref = u.b.ident("B");
    u.bind(linked_ref, Symbol::class("a.B"));
    let body = empty_body(&mut u.b);
    let run = u.b.method("run", vec![], body);
    let far_import = u.b.import("a.Far");
    let other_body = empty_body(&mut u.b);
    let stop = u.b.method("stop", vec![], other_body);
    let far_ref = u.b.ident("Far");
    u.bind(far_ref, Symbol::class("a.Far"));
    let class = u.b.class(
        "C",
        None,
        vec![linked_import, linked_ref, run, far_import, stop, far_ref],
    );
    u.bind(class, Symbol::class("C"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    assert!(output.used_names.contains(&"a.B".to_string()));
    assert!(
        !output.used_names.contains(&"a.Far".to_string()),
        "import separated from its reference does not link"
    );
    assert!(!output.text.contains("a.B"), "force-link statements emit no code");
}

#[test]
fn test_unresolved_class_declaration_warns_and_uses_package() {
    let mut u = Unit::new();
    let members = u.b.block(vec![]);
    let class = u.b.class_with_body("C", None, members, None);
    let package = u.b.package("a.b", vec![class]);
    let root = u.b.source_file(vec![package]);

    let output = u.lower(root);
    assert_eq!(output.class_infos[0].qualified_name, "a.b.C");
    assert!(output.text.contains("goog.exportSymbol('a.b.C', a.b.C);"));
    let warning = &output.diagnostics[0];
    assert_eq!(warning.code, diagnostic_codes::UNRESOLVED_CLASS_DECLARATION);
    assert_eq!(warning.category, DiagnosticCategory::Warning);
}

#[test]
fn test_flattened_names() {
    let mut u = Unit::new();
    let body = empty_body(&mut u.b);
    let ctor = u.b.constructor("C", vec![], body);
    let class = u.b.class("C", None, vec![ctor]);
    u.bind(class, Symbol::class("a.b.C"));
    let root = u.b.source_file(vec![class]);

    let options = EmitOptions::default().with_naming(NamingPolicy {
        qualified_name_style: QualifiedNameStyle::Flattened,
        ..NamingPolicy::default()
    });
    let output = u.lower_with(root, &options).expect("unit lowers");
    assert!(output.text.contains("a_b_C = function() {"), "{}", output.text);
}

// =============================================================================
// Inheritance and super
// =============================================================================

#[test]
fn test_super_forms() {
    let mut u = Unit::new();
    let base = u.b.ident("Base");
    u.bind(base, Symbol::class("Base"));

    let sup = u.b.super_();
    let super_call = u.b.call(sup, vec![]);
    let super_stmt = u.b.expr_stmt(super_call);
    let ctor_body = u.b.block(vec![super_stmt]);
    let ctor = u.b.constructor("Sub", vec![], ctor_body);

    let items_value = u.b.array(vec![]);
    let items = u.b.field("items", Some(items_value));

    let sup = u.b.super_();
    let run_ref = u.b.ident("run");
    u.bind(run_ref, Symbol::member("Base", "run", SymbolKind::Function));
    let callee = u.b.member(sup, run_ref);
    let call = u.b.call(callee, vec![]);
    let call_stmt = u.b.expr_stmt(call);

    let sup = u.b.super_();
    let size_ref = u.b.ident("size");
    u.bind(size_ref, Symbol::member("Base", "size", SymbolKind::Setter));
    let target = u.b.member(sup, size_ref);
    let five = u.b.number("5");
    let assignment = u.b.assign(target, five);
    let assign_stmt = u.b.expr_stmt(assignment);

    let run_body = u.b.block(vec![call_stmt, assign_stmt]);
    let run = u.b.method("run", vec![], run_body);

    let class = u.b.class("Sub", Some(base), vec![items, ctor, run]);
    u.bind(class, Symbol::class("Sub"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    let text = &output.text;
    assert!(text.contains(" * @extends {Base}\n"), "{text}");
    assert!(
        text.contains("Sub = function() {\n  Sub.base(this, 'constructor');\n  this.items = [];\n};"),
        "super call runs before field initializers: {text}"
    );
    assert!(text.contains("};\ngoog.inherits(Sub, Base);"), "{text}");
    assert!(text.contains("Sub.superClass_.run.call(this);"), "{text}");
    assert!(text.contains("Sub.superClass_.set__size.call(this, 5);"), "{text}");
}

#[test]
fn test_super_outside_class_is_internal_error() {
    let mut u = Unit::new();
    let sup = u.b.super_();
    let call = u.b.call(sup, vec![]);
    let root = u.statement_file(call);

    let error = u
        .lower_with(root, &EmitOptions::default())
        .expect_err("super needs a class");
    assert!(matches!(error, EmitError::NoClassContext { .. }), "got {error:?}");
}

// =============================================================================
// Identifiers, closures and self capture
// =============================================================================

#[test]
fn test_method_reference_bound_in_closure() {
    let mut u = Unit::new();
    let obj = u.b.ident("obj");
    let method = u.b.ident("someMethod");
    u.bind(method, Symbol::member("a.C", "someMethod", SymbolKind::Function));
    let access = u.b.member(obj, method);
    let root = u.statement_file(access);

    let output = u.lower(root);
    assert_eq!(
        output.text,
        format!("{LANGUAGE}.closure(obj.someMethod, obj, 'someMethod');\n")
    );
    assert!(output.needs_language_helper);
}

#[test]
fn test_closure_wrapping_can_be_suppressed() {
    let mut u = Unit::new();
    let obj = u.b.ident("obj");
    let method = u.b.ident("someMethod");
    u.bind(method, Symbol::member("a.C", "someMethod", SymbolKind::Function));
    let access = u.b.member(obj, method);
    let root = u.statement_file(access);

    let options = EmitOptions::from_json_str(r#"{"naming": {"suppressClosureWrapping": true}}"#)
        .expect("options parse");
    let output = u.lower_with(root, &options).expect("unit lowers");
    assert_eq!(output.text, "obj.someMethod;\n");
}

#[test]
fn test_implicit_members_and_self_capture() {
    let mut u = Unit::new();
    let count = u.b.field("count", None);

    // run() { helper; helper(); var f = function() { count; }; }
    let helper_value = u.b.ident("helper");
    u.bind(helper_value, Symbol::member("a.C", "helper", SymbolKind::Function));
    let value_stmt = u.b.expr_stmt(helper_value);
    let helper_callee = u.b.ident("helper");
    u.bind(helper_callee, Symbol::member("a.C", "helper", SymbolKind::Function));
    let helper_call = u.b.call(helper_callee, vec![]);
    let call_stmt = u.b.expr_stmt(helper_call);
    let count_ref = u.b.ident("count");
    u.bind(count_ref, Symbol::member("a.C", "count", SymbolKind::Variable));
    let inner_stmt = u.b.expr_stmt(count_ref);
    let inner_body = u.b.block(vec![inner_stmt]);
    let callback = u.b.function_object(vec![], inner_body);
    let local = u.b.local_var("f", Some(callback));
    let run_body = u.b.block(vec![value_stmt, call_stmt, local]);
    let run = u.b.method("run", vec![], run_body);

    let helper_body = empty_body(&mut u.b);
    let helper = u.b.method("helper", vec![], helper_body);

    let class = u.b.class("C", None, vec![count, run, helper]);
    u.bind(class, Symbol::class("a.C"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    let text = &output.text;
    assert!(
        text.contains("a.C.prototype.run = function() {\n  var self = this;\n"),
        "{text}"
    );
    assert!(
        text.contains(&format!("{LANGUAGE}.closure(this.helper, this, 'helper');")),
        "{text}"
    );
    assert!(text.contains("  this.helper();\n"), "calls are not wrapped: {text}");
    assert!(
        text.contains("var f = function() {\n    self.count;\n  };"),
        "{text}"
    );
    assert!(
        text.contains("a.C.prototype.helper = function() {\n};"),
        "methods without nested functions capture nothing: {text}"
    );
}

#[test]
fn test_local_function_reads_instance_through_self() {
    let mut u = Unit::new();
    let count = u.b.field("count", None);
    let count_ref = u.b.ident("count");
    u.bind(count_ref, Symbol::member("C", "count", SymbolKind::Variable));
    let ret = u.b.ret(Some(count_ref));
    let inner_body = u.b.block(vec![ret]);
    let inner = u.b.function(FunctionData {
        name: "read".to_string(),
        body: inner_body,
        ..FunctionData::default()
    });
    let run_body = u.b.block(vec![inner]);
    let run = u.b.method("run", vec![], run_body);
    let class = u.b.class("C", None, vec![count, run]);
    u.bind(class, Symbol::class("C"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    assert!(
        output
            .text
            .contains("  var self = this;\n  function read() {\n    return self.count;\n  }\n"),
        "{}",
        output.text
    );
}

#[test]
fn test_static_member_written_through_declaring_type() {
    let mut u = Unit::new();
    let bare = u.b.ident("X");
    u.bind(
        bare,
        Symbol::member("a.C", "X", SymbolKind::Variable).with_flags(SymbolFlags::STATIC),
    );
    let owner = u.b.ident("C");
    u.bind(owner, Symbol::class("a.C"));
    let member = u.b.ident("X");
    u.bind(
        member,
        Symbol::member("a.C", "X", SymbolKind::Variable).with_flags(SymbolFlags::STATIC),
    );
    let access = u.b.member(owner, member);
    let sum = u.b.binary("+", bare, access);
    let root = u.statement_file(sum);

    let output = u.lower(root);
    assert_eq!(output.text, "a.C.X + a.C.X;\n");
}

#[test]
fn test_static_accessor_written_as_bracket_access() {
    let mut u = Unit::new();
    let static_getter =
        || Symbol::member("a.C", "size", SymbolKind::Getter).with_flags(SymbolFlags::STATIC);
    let bare = u.b.ident("size");
    u.bind(bare, static_getter());
    let owner = u.b.ident("C");
    u.bind(owner, Symbol::class("a.C"));
    let member = u.b.ident("size");
    u.bind(member, static_getter());
    let access = u.b.member(owner, member);
    let sum = u.b.binary("+", bare, access);
    let root = u.statement_file(sum);

    let output = u.lower(root);
    assert_eq!(output.text, "a.C[\"size\"] + a.C[\"size\"];\n");
}

#[test]
fn test_private_members_mangled_when_enabled() {
    let private_secret = || {
        Symbol::member("a.b.C", "secret", SymbolKind::Variable).with_flags(SymbolFlags::PRIVATE)
    };
    let build = || {
        let mut u = Unit::new();
        let bare = u.b.ident("secret");
        u.bind(bare, private_secret());
        let bare_stmt = u.b.expr_stmt(bare);
        let obj = u.b.ident("obj");
        let member = u.b.ident("secret");
        u.bind(member, private_secret());
        let access = u.b.member(obj, member);
        let access_stmt = u.b.expr_stmt(access);
        let root = u.b.source_file(vec![bare_stmt, access_stmt]);
        (u, root)
    };

    let options = EmitOptions::default().with_naming(NamingPolicy {
        mangle_private_on_conflict: true,
        ..NamingPolicy::default()
    });
    let (u, root) = build();
    let output = u.lower_with(root, &options).expect("unit lowers");
    assert_eq!(output.text, "this.a_b_C_secret;\nobj.a_b_C_secret;\n");

    let (u, root) = build();
    let output = u.lower(root);
    assert_eq!(output.text, "this.secret;\nobj.secret;\n", "mangling is off by default");
}

#[test]
fn test_synthetic_type_as_value() {
    let mut u = Unit::new();
    let x = u.b.ident("x");
    let int_type = u.b.ident("int");
    u.bind(int_type, Symbol::class("int"));
    let test = u.b.binary("is", x, int_type);
    let root = u.statement_file(test);

    let output = u.lower(root);
    assert_eq!(
        output.text,
        format!("{LANGUAGE}.is(x, {LANGUAGE}.synthType('int'));\n")
    );
}

#[test]
fn test_synthetic_type_called_as_cast_is_not_wrapped() {
    let mut u = Unit::new();
    let int_type = u.b.ident("int");
    u.bind(int_type, Symbol::class("int"));
    let x = u.b.ident("x");
    let cast = u.b.call(int_type, vec![x]);
    let root = u.statement_file(cast);

    let output = u.lower(root);
    assert_eq!(output.text, "int(x);\n");
    assert!(!output.needs_language_helper);
}

#[test]
fn test_as_operator_with_class() {
    let mut u = Unit::new();
    let x = u.b.ident("x");
    let target = u.b.ident("Foo");
    u.bind(target, Symbol::class("a.Foo"));
    let cast = u.b.binary("as", x, target);
    let root = u.statement_file(cast);

    let output = u.lower(root);
    assert_eq!(output.text, format!("{LANGUAGE}.as(x, a.Foo);\n"));
}

// =============================================================================
// Member access
// =============================================================================

#[test]
fn test_proxy_member_read() {
    let mut u = Unit::new();
    let proxy = u.b.ident("myProxy");
    u.bindings.set_type(proxy, TypeRef::proxy("a.MyProxy"));
    let access = u.b.dot(proxy, "foo");
    let root = u.statement_file(access);

    let output = u.lower(root);
    assert_eq!(output.text, "myProxy.getProperty('foo');\n");
}

#[test]
fn test_date_getter_and_setter() {
    let mut u = Unit::new();
    let read_date = u.b.ident("myDate");
    u.bindings.set_type(read_date, TypeRef::new("Date"));
    let read = u.b.dot(read_date, "fullYear");
    let read_stmt = u.b.expr_stmt(read);

    let write_date = u.b.ident("d");
    u.bindings.set_type(write_date, TypeRef::new("Date"));
    let target = u.b.dot(write_date, "month");
    let three = u.b.number("3");
    let write = u.b.assign(target, three);
    let write_stmt = u.b.expr_stmt(write);

    let root = u.b.source_file(vec![read_stmt, write_stmt]);
    let output = u.lower(root);
    assert_eq!(output.text, "myDate.getFullYear();\nd.setMonth(3);\n");
}

#[test]
fn test_unknown_member_bracket_policy() {
    let mut u = Unit::new();
    let obj = u.b.ident("obj");
    let access = u.b.dot(obj, "mystery");
    let root = u.statement_file(access);

    let options =
        EmitOptions::from_json_str(r#"{"naming": {"treatUnknownDynamicMemberAsBracketAccess": true}}"#)
            .expect("options parse");
    let output = u.lower_with(root, &options).expect("unit lowers");
    assert_eq!(output.text, "obj[\"mystery\"];\n");
}

#[test]
fn test_unknown_member_dotted_by_default() {
    let mut u = Unit::new();
    let obj = u.b.ident("obj");
    let access = u.b.dot(obj, "mystery");
    let root = u.statement_file(access);

    let output = u.lower(root);
    assert_eq!(output.text, "obj.mystery;\n");
}

#[test]
fn test_folded_constants() {
    let mut u = Unit::new();
    let int_type = u.b.ident("int");
    u.bind(int_type, Symbol::class("int"));
    let max = u.b.dot(int_type, "MAX_VALUE");
    let array_type = u.b.ident("Array");
    u.bind(array_type, Symbol::class("Array"));
    let numeric = u.b.dot(array_type, "NUMERIC");
    let pair = u.b.array(vec![max, numeric]);
    let root = u.statement_file(pair);

    let output = u.lower(root);
    assert_eq!(output.text, "[2147483648, 16];\n");
}

#[test]
fn test_array_remove_and_insert() {
    let mut u = Unit::new();
    let arr = u.b.ident("arr");
    let remove = u.b.ident("removeAt");
    u.bind(remove, Symbol::member("Array", "removeAt", SymbolKind::Function));
    let callee = u.b.member(arr, remove);
    let two = u.b.number("2");
    let removal = u.b.call(callee, vec![two]);
    let remove_stmt = u.b.expr_stmt(removal);

    let arr = u.b.ident("arr");
    let insert = u.b.ident("insertAt");
    u.bind(insert, Symbol::member("Array", "insertAt", SymbolKind::Function));
    let callee = u.b.member(arr, insert);
    let one = u.b.number("1");
    let x = u.b.ident("x");
    let insertion = u.b.call(callee, vec![one, x]);
    let insert_stmt = u.b.expr_stmt(insertion);

    let root = u.b.source_file(vec![remove_stmt, insert_stmt]);
    let output = u.lower(root);
    assert_eq!(output.text, "arr.splice(2, 1)[0];\narr.splice(1, 0, x);\n");
}

#[test]
fn test_namespace_qualified_access() {
    let mut u = Unit::new();
    let obj = u.b.ident("obj");
    let ns = u.b.ident("ns");
    u.bind(ns, Symbol::package_member("a.ns", SymbolKind::Namespace));
    let name = u.b.ident("name");
    let qualified = u.b.namespace_access(ns, name);
    let access = u.b.member(obj, qualified);
    let root = u.statement_file(access);

    let output = u.lower(root);
    assert_eq!(output.text, "obj[new QName(a.ns, 'name').objectAccessFormat()];\n");
    assert_eq!(output.used_names, vec!["a.ns".to_string()]);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_private_namespace_access_is_plain() {
    let mut u = Unit::new();
    let this = u.b.this();
    let ns = u.b.ident("private");
    let name = u.b.ident("secret");
    let qualified = u.b.namespace_access(ns, name);
    let access = u.b.member(this, qualified);
    let root = u.statement_file(access);

    let output = u.lower(root);
    assert_eq!(output.text, "this.secret;\n");
}

#[test]
fn test_unresolved_namespace_warns_and_keeps_name() {
    let mut u = Unit::new();
    let obj = u.b.ident("obj");
    let ns = u.b.ident("ns");
    let name = u.b.ident("name");
    let qualified = u.b.namespace_access(ns, name);
    let access = u.b.member(obj, qualified);
    let root = u.statement_file(access);

    let output = u.lower(root);
    assert_eq!(output.text, "obj[new QName(ns, 'name').objectAccessFormat()];\n");
    assert_eq!(output.diagnostics.len(), 1);
    let warning = &output.diagnostics[0];
    assert_eq!(warning.code, diagnostic_codes::UNRESOLVED_NAMESPACE);
    assert_eq!(warning.category, DiagnosticCategory::Warning);
    assert!(warning.message_text.contains("'ns'"), "{}", warning.message_text);
}

#[test]
fn test_custom_namespace_member_key() {
    let mut u = Unit::new();
    let obj = u.b.ident("obj");
    let member = u.b.ident("run");
    u.bind(
        member,
        Symbol::member("a.C", "run", SymbolKind::Variable).with_namespace(NamespaceRef::Custom {
            qualified_name: "a.ns".to_string(),
            uri: "http://ex.com/ns".to_string(),
        }),
    );
    let access = u.b.member(obj, member);
    let root = u.statement_file(access);

    let output = u.lower(root);
    assert_eq!(output.text, "obj[\"http_$$ex_com$ns__run\"];\n");
    assert_eq!(output.used_names, vec!["a.ns".to_string()]);
}

#[test]
fn test_custom_namespace_method_bound_with_namespaced_key() {
    let custom_run = || {
        Symbol::member("a.C", "run", SymbolKind::Function).with_namespace(NamespaceRef::Custom {
            qualified_name: "a.ns".to_string(),
            uri: "http://ex.com/ns".to_string(),
        })
    };
    let mut u = Unit::new();

    // obj.run as a value
    let obj = u.b.ident("obj");
    let member = u.b.ident("run");
    u.bind(member, custom_run());
    let access = u.b.member(obj, member);
    let access_stmt = u.b.expr_stmt(access);

    // bare run as a value inside a method
    let bare = u.b.ident("run");
    u.bind(bare, custom_run());
    let bare_stmt = u.b.expr_stmt(bare);
    let body = u.b.block(vec![bare_stmt]);
    let start = u.b.method("start", vec![], body);
    let class = u.b.class("C", None, vec![start]);
    u.bind(class, Symbol::class("a.C"));

    let root = u.b.source_file(vec![access_stmt, class]);
    let output = u.lower(root);
    let text = &output.text;
    assert!(
        text.starts_with(&format!(
            "{LANGUAGE}.closure(obj[\"http_$$ex_com$ns__run\"], obj, 'run');\n"
        )),
        "{text}"
    );
    assert!(
        text.contains(&format!(
            "{LANGUAGE}.closure(this[\"http_$$ex_com$ns__run\"], this, 'run');"
        )),
        "{text}"
    );
    assert!(output.used_names.contains(&"a.ns".to_string()));
}

// =============================================================================
// E4X
// =============================================================================

#[test]
fn test_xml_child_descendants_and_filter() {
    let mut u = Unit::new();
    let x = u.b.ident("x");
    u.bindings.set_type(x, TypeRef::new("XML"));
    let child = u.b.dot(x, "item");
    let child_stmt = u.b.expr_stmt(child);

    let x = u.b.ident("x");
    u.bindings.set_type(x, TypeRef::new("XML"));
    let item = u.b.ident("item");
    let all = u.b.descendants(x, item);
    let all_stmt = u.b.expr_stmt(all);

    let x = u.b.ident("x");
    let id = u.b.attribute("id");
    let one = u.b.number("1");
    let predicate = u.b.binary("==", id, one);
    let filtered = u.b.filter(x, predicate);
    let filter_stmt = u.b.expr_stmt(filtered);

    let root = u.b.source_file(vec![child_stmt, all_stmt, filter_stmt]);
    let output = u.lower(root);
    assert_eq!(
        output.text,
        "x.child('item');\n\
         x.descendants('item');\n\
         x.filter(function(node){return (node.attribute('id') == 1);});\n"
    );
}

#[test]
fn test_resolved_descendant_access_is_not_an_xml_lookup() {
    let mut u = Unit::new();
    let obj = u.b.ident("obj");
    u.bindings.set_type(obj, TypeRef::new("a.Plain"));
    let item = u.b.ident("item");
    u.bind(item, Symbol::member("a.Plain", "item", SymbolKind::Variable));
    let all = u.b.descendants(obj, item);
    let root = u.statement_file(all);

    let output = u.lower(root);
    assert_eq!(output.text, "obj..item;\n", "resolved members keep the access operator");
}

#[test]
fn test_unresolved_descendant_access_needs_xml_receiver() {
    let mut u = Unit::new();
    let obj = u.b.ident("obj");
    u.bindings.set_type(obj, TypeRef::new("a.Plain"));
    let item = u.b.ident("item");
    let all = u.b.descendants(obj, item);
    let root = u.statement_file(all);

    let output = u.lower(root);
    assert_eq!(output.text, "obj..item;\n");
}

#[test]
fn test_filter_reads_unresolved_names_from_node() {
    let mut u = Unit::new();
    let x = u.b.ident("x");
    let name = u.b.ident("name");
    let expected = u.b.string("a");
    let predicate = u.b.binary("==", name, expected);
    let filtered = u.b.filter(x, predicate);
    let root = u.statement_file(filtered);

    let output = u.lower(root);
    assert_eq!(
        output.text,
        "x.filter(function(node){return (node.child('name') == \"a\");});\n"
    );
}

// =============================================================================
// Variables, functions and coercion
// =============================================================================

#[test]
fn test_package_variable_coerced_to_int() {
    let mut u = Unit::new();
    let int_type = u.b.ident("int");
    u.bind(int_type, Symbol::class("int"));
    let value = u.b.ident("x");
    let n = u.b.variable(VariableData {
        name: "n".to_string(),
        type_annotation: int_type,
        initializer: value,
        ..VariableData::default()
    });
    let root = u.b.source_file(vec![n]);

    let output = u.lower(root);
    assert_eq!(output.text, "/**\n * @type {number}\n */\nn = (x) >> 0;\n");
}

#[test]
fn test_literal_initializer_needs_no_coercion() {
    let mut u = Unit::new();
    let bool_type = u.b.ident("Boolean");
    u.bind(bool_type, Symbol::class("Boolean"));
    let value = u.b.boolean(true);
    let flag = u.b.variable(VariableData {
        name: "flag".to_string(),
        type_annotation: bool_type,
        initializer: value,
        ..VariableData::default()
    });
    let root = u.b.source_file(vec![flag]);

    let output = u.lower(root);
    assert!(output.text.ends_with("flag = true;\n"), "{}", output.text);
}

#[test]
fn test_unresolved_annotation_aborts_unit() {
    let mut u = Unit::new();
    let unknown = u.b.ident("Mystery");
    let value = u.b.number("1");
    let v = u.b.variable(VariableData {
        name: "v".to_string(),
        type_annotation: unknown,
        initializer: value,
        ..VariableData::default()
    });
    let root = u.b.source_file(vec![v]);

    let error = u
        .lower_with(root, &EmitOptions::default())
        .expect_err("coercion needs the annotation type");
    assert_eq!(error, EmitError::MissingTypeReference { node: unknown });
}

#[test]
fn test_package_function_and_parameter_default() {
    let mut u = Unit::new();
    let three = u.b.number("3");
    let n = u.b.param_with(ParameterData {
        name: "n".to_string(),
        default_value: three,
        ..ParameterData::default()
    });
    let n_ref = u.b.ident("n");
    let ret = u.b.ret(Some(n_ref));
    let body = u.b.block(vec![ret]);
    let f = u.b.function(FunctionData {
        name: "f".to_string(),
        parameters: vec![n],
        body,
        ..FunctionData::default()
    });
    let package = u.b.package("a", vec![f]);
    let root = u.b.source_file(vec![package]);

    let output = u.lower(root);
    assert_eq!(
        output.text,
        "a.f = function(n) {\n  n = typeof n !== 'undefined' ? n : 3;\n  return n;\n};\n"
    );
}

// =============================================================================
// Mappings
// =============================================================================

#[test]
fn test_named_mappings_slice_back_to_identifiers() {
    let mut u = Unit::new();
    let alpha = u.b.ident("alpha");
    let beta = u.b.ident("beta");
    let sum = u.b.binary("+", alpha, beta);
    let root = u.statement_file(sum);

    let arena = u.b.finish();
    let resolver = UnitResolver::new(&u.program, &u.bindings);
    let output =
        lower_unit("sum.as", &arena, root, &resolver, &EmitOptions::default()).expect("unit lowers");
    assert_eq!(output.text, "alpha + beta;\n");

    let line = output.text.lines().next().expect("one line of output");
    let named: Vec<_> = output.mappings.iter().filter(|m| m.name.is_some()).collect();
    assert_eq!(named.len(), 2);
    for (mapping, node) in named.iter().zip([alpha, beta]) {
        let start = mapping.generated_start.column as usize;
        let end = mapping.generated_end.column as usize;
        assert_eq!(Some(&line[start..end]), mapping.name.as_deref());
        assert_eq!(mapping.source_start, arena.range(node).start);
        assert_eq!(mapping.source_end, arena.range(node).end);
        assert_eq!(&*mapping.source_path, "sum.as");
    }

    // The statement mapping opens first and spans every other mapping.
    let outer = &output.mappings[0];
    assert_eq!(outer.generated_start.column, 0);
    assert_eq!(outer.generated_end.column, 13);
    for inner in &output.mappings[1..] {
        assert!(outer.generated_start <= inner.generated_start);
        assert!(inner.generated_end <= outer.generated_end);
    }

    // The operator maps to the source between its operands.
    let operator = &output.mappings[2];
    assert_eq!(operator.source_start, arena.range(alpha).end);
    assert_eq!(&line[operator.generated_start.column as usize..operator.generated_end.column as usize], " + ");
}

#[test]
fn test_every_mapping_closed_in_class_output() {
    let mut u = Unit::new();
    let value = u.b.number("1");
    let field = u.b.field("a", Some(value));
    let body = empty_body(&mut u.b);
    let run = u.b.method("run", vec![], body);
    let class = u.b.class("C", None, vec![field, run]);
    u.bind(class, Symbol::class("C"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    assert!(!output.mappings.is_empty());
    for mapping in &output.mappings {
        assert!(
            mapping.generated_start <= mapping.generated_end,
            "mapping ends before it starts: {mapping:?}"
        );
    }
    let named: Vec<_> = output
        .mappings
        .iter()
        .filter_map(|m| m.name.as_deref())
        .collect();
    assert!(named.contains(&"a"), "field initializer mapping carries the name");
    assert!(named.contains(&"run"), "method mapping carries the name");
}

// =============================================================================
// Nesting depth
// =============================================================================

/// `a.m0.m1...` with `accesses` member accesses, as one statement.
fn lower_access_chain(accesses: usize) -> Result<UnitOutput, EmitError> {
    let mut u = Unit::new();
    let mut expr = u.b.ident("a");
    for i in 0..accesses {
        expr = u.b.dot(expr, &format!("m{i}"));
    }
    let root = u.statement_file(expr);
    u.lower_with(root, &EmitOptions::default())
}

#[test]
fn test_depth_limit_fits_default_thread_stack() {
    // Source file and statement take two levels; the innermost identifier
    // sits one level below the last access.
    let deepest = MAX_EMIT_RECURSION_DEPTH as usize - 3;
    let handle = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || (lower_access_chain(deepest), lower_access_chain(deepest + 1)))
        .expect("thread spawns");
    let (at_limit, past_limit) = handle.join().expect("lowering stays within a 2 MiB stack");

    let output = at_limit.expect("a chain at the limit lowers");
    assert!(output.text.starts_with("a.m0.m1."), "{}", output.text);
    assert!(
        matches!(past_limit, Err(EmitError::DepthExceeded { limit, .. }) if limit == MAX_EMIT_RECURSION_DEPTH),
        "one level deeper is an internal error: {past_limit:?}"
    );
}

// =============================================================================
// Driver and serialization
// =============================================================================

#[test]
fn test_failed_unit_does_not_affect_siblings() {
    let mut program = ProgramSymbols::new();

    let mut good = AstBuilder::new();
    let members = good.block(vec![]);
    let class = good.class_with_body("Ok", None, members, None);
    let good_root = good.source_file(vec![class]);
    let mut good_bindings = UnitBindings::new();
    good_bindings.bind(class, program.add(Symbol::class("Ok")));

    let mut bad = AstBuilder::new();
    let ns = bad.ident("ns");
    let name = bad.ident("name");
    let bad_root = bad.namespace_access(ns, name);

    let units = vec![
        CompilationUnit::new("ok.as", good.finish(), good_root, good_bindings),
        CompilationUnit::new("bad.as", bad.finish(), bad_root, UnitBindings::new()),
    ];
    let sink = DiagnosticSink::new();
    let outputs = lower_units(&units, &program, &EmitOptions::default(), &sink);

    assert_eq!(outputs.len(), 2, "results stay aligned with units");
    let ok = outputs[0].as_ref().expect("sibling unit still lowers");
    assert!(ok.text.contains("goog.exportSymbol('Ok', Ok);"));
    assert!(outputs[1].is_none(), "failed unit yields no output");

    assert!(sink.has_internal_errors());
    let bad_diagnostics = sink.for_file("bad.as");
    assert_eq!(bad_diagnostics.len(), 1);
    assert_eq!(bad_diagnostics[0].code, diagnostic_codes::UNHANDLED_NODE);
    assert!(sink.for_file("ok.as").is_empty());
}

#[test]
fn test_aborted_unit_keeps_earlier_warnings() {
    let program = ProgramSymbols::new();
    let mut b = AstBuilder::new();

    // obj.ns::name;  (ns does not resolve: warning)
    let obj = b.ident("obj");
    let ns = b.ident("ns");
    let name = b.ident("name");
    let qualified = b.namespace_access(ns, name);
    let access = b.member(obj, qualified);
    let access_stmt = b.expr_stmt(access);

    // var v:Mystery = 1;  (annotation does not resolve: internal error)
    let unknown = b.ident("Mystery");
    let value = b.number("1");
    let v = b.variable(VariableData {
        name: "v".to_string(),
        type_annotation: unknown,
        initializer: value,
        ..VariableData::default()
    });
    let root = b.source_file(vec![access_stmt, v]);

    let units = vec![CompilationUnit::new("bad.as", b.finish(), root, UnitBindings::new())];
    let sink = DiagnosticSink::new();
    let outputs = lower_units(&units, &program, &EmitOptions::default(), &sink);

    assert!(outputs[0].is_none(), "unit aborts on the unresolved annotation");
    let codes: Vec<u32> = sink.for_file("bad.as").iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![
            diagnostic_codes::UNRESOLVED_NAMESPACE,
            diagnostic_codes::MISSING_TYPE_REFERENCE,
        ],
        "the warning raised before the abort is still reported"
    );
}

#[test]
fn test_failure_carries_warnings_from_lower_unit() {
    let mut u = Unit::new();
    let obj = u.b.ident("obj");
    let ns = u.b.ident("ns");
    let name = u.b.ident("name");
    let qualified = u.b.namespace_access(ns, name);
    let access = u.b.member(obj, qualified);
    let access_stmt = u.b.expr_stmt(access);
    let stray = u.b.super_();
    let stray_stmt = u.b.expr_stmt(stray);
    let root = u.b.source_file(vec![access_stmt, stray_stmt]);

    let arena = u.b.finish();
    let resolver = UnitResolver::new(&u.program, &u.bindings);
    let failure = lower_unit("test.as", &arena, root, &resolver, &EmitOptions::default())
        .expect_err("bare super is not lowerable");
    assert_eq!(failure.error.code(), diagnostic_codes::UNHANDLED_NODE);
    assert_eq!(failure.diagnostics.len(), 1);
    assert_eq!(failure.diagnostics[0].code, diagnostic_codes::UNRESOLVED_NAMESPACE);
    assert_eq!(failure.to_string(), failure.error.to_string());
}

#[test]
fn test_unit_output_serializes_camel_case() {
    let mut u = Unit::new();
    let value = u.b.number("1");
    let field = u.b.field("a", Some(value));
    let class = u.b.class("C", None, vec![field]);
    u.bind(class, Symbol::class("a.C"));
    let root = u.b.source_file(vec![class]);

    let output = u.lower(root);
    let json = serde_json::to_value(&output).expect("output serializes");
    assert_eq!(json["sourcePath"], "test.as");
    assert_eq!(json["needsLanguageHelper"], false);
    assert_eq!(json["classInfos"][0]["qualifiedName"], "a.C");
    assert_eq!(json["classInfos"][0]["members"][0]["kind"], "constructor");
    assert_eq!(json["classInfos"][0]["members"][1]["kind"], "field");
    assert_eq!(json["classInfos"][0]["members"][1]["isStatic"], false);
    assert!(json["mappings"].as_array().is_some_and(|m| !m.is_empty()));
}
