//! Centralized limits and thresholds for the lowering passes.

/// Maximum depth for emitter recursion.
///
/// Prevents stack overflow when the printer lowers deeply nested
/// expressions or blocks. Exceeding it aborts the current unit with an
/// internal error rather than overflowing the thread's stack.
///
/// Sized for a 2 MiB stack (the std and rayon default) in an unoptimized
/// build, where a member-access chain costs several frames per level.
///
/// ```text
/// a.b.c.d.e.f.g.h.i.j.k.l.m.n /* ... hundreds of levels ... */;
/// if (a) { if (b) { if (c) { /* ... 256 levels ... */ } } }
/// ```
pub const MAX_EMIT_RECURSION_DEPTH: u32 = 256;

/// Initial capacity for the output buffer of one compilation unit.
pub const OUTPUT_BUFFER_INITIAL_CAPACITY: usize = 16 * 1024;

/// Initial capacity for a unit's mapping list.
pub const MAPPINGS_INITIAL_CAPACITY: usize = 1024;
