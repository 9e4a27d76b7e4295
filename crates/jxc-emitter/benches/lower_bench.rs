//! Lowering Benchmark
//!
//! Measures lowering throughput for class-heavy units, single and parallel.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jxc_ast::{
    AstBuilder, NodeArena, NodeIndex, ProgramSymbols, Symbol, SymbolKind, UnitBindings,
    UnitResolver,
};
use jxc_common::{DiagnosticSink, EmitOptions};
use jxc_emitter::{CompilationUnit, lower_unit, lower_units};

// =============================================================================
// Synthetic Units
// =============================================================================

/// A unit with `classes` classes of `members` fields and methods each.
/// Every method reads a field and calls its sibling, so identifier and
/// member resolution run on every statement.
fn generate_unit(
    classes: usize,
    members: usize,
    program: &mut ProgramSymbols,
) -> (NodeArena, NodeIndex, UnitBindings) {
    let mut b = AstBuilder::new();
    let mut bindings = UnitBindings::new();
    let mut declarations = Vec::with_capacity(classes);

    for c in 0..classes {
        b.at(c as u32 * 100, 0);
        let class_name = format!("bench.C{c}");
        let mut body = Vec::with_capacity(members * 2);
        for m in 0..members {
            let field_name = format!("f{m}");
            let method_name = format!("m{m}");

            let value = b.number(&m.to_string());
            body.push(b.field(&field_name, Some(value)));

            let field_ref = b.ident(&field_name);
            bindings.bind(
                field_ref,
                program.add(Symbol::member(&class_name, &field_name, SymbolKind::Variable)),
            );
            let sibling = b.ident(&method_name);
            bindings.bind(
                sibling,
                program.add(Symbol::member(&class_name, &method_name, SymbolKind::Function)),
            );
            let call = b.call(sibling, vec![field_ref]);
            let statement = b.expr_stmt(call);
            let block = b.block(vec![statement]);
            let parameter = b.param("x");
            body.push(b.method(&method_name, vec![parameter], block));
        }
        let class = b.class(&format!("C{c}"), None, body);
        bindings.bind(class, program.add(Symbol::class(&class_name)));
        declarations.push(class);
    }

    let package = b.package("bench", declarations);
    let root = b.source_file(vec![package]);
    (b.finish(), root, bindings)
}

// =============================================================================
// Lowering Benchmarks
// =============================================================================

/// Benchmark: Lower one unit of increasing size
fn bench_lower_unit(c: &mut Criterion) {
    let mut group = c.benchmark_group("lower_unit");
    let options = EmitOptions::default();

    for (classes, members) in [(1, 10), (10, 10), (50, 20)].iter() {
        let mut program = ProgramSymbols::new();
        let (arena, root, bindings) = generate_unit(*classes, *members, &mut program);
        let label = format!("{classes}cls_{members}mem");

        group.throughput(Throughput::Elements(arena.len() as u64));
        group.bench_with_input(BenchmarkId::new("lower", &label), &arena, |b, arena| {
            let resolver = UnitResolver::new(&program, &bindings);
            b.iter(|| black_box(lower_unit("bench.as", arena, root, &resolver, &options)))
        });
    }

    group.finish();
}

/// Benchmark: Lower many independent units through the parallel driver
fn bench_lower_units_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("lower_units");
    let options = EmitOptions::default();

    let mut program = ProgramSymbols::new();
    let units: Vec<CompilationUnit> = (0..32)
        .map(|i| {
            let (arena, root, bindings) = generate_unit(5, 10, &mut program);
            CompilationUnit::new(format!("unit{i}.as"), arena, root, bindings)
        })
        .collect();

    group.throughput(Throughput::Elements(units.len() as u64));
    group.bench_function("32_units", |b| {
        b.iter(|| {
            let diagnostics = DiagnosticSink::new();
            black_box(lower_units(&units, &program, &options, &diagnostics))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_lower_unit, bench_lower_units_parallel);
criterion_main!(benches);
