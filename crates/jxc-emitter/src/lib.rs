//! Code generation core of jxc.
//!
//! Lowers a resolved class-based AST to prototype-based JavaScript text and
//! records, for every emitted fragment, the source range it came from.
//!
//! - `Printer` walks one unit and owns its `SourceWriter`, `MappingTracker`,
//!   `UsedNamesRegistry` and class context stack.
//! - `lower_unit` runs a printer over one tree; `lower_units` runs many
//!   units in parallel.
//! - Name rendering lives in `NameFormatter`, fixed built-in tables in
//!   `builtins`.

pub mod builtins;
pub mod class_context;
pub use class_context::{AccessorPair, ClassLoweringContext, UsedNamesRegistry};

pub mod driver;
pub use driver::{CompilationUnit, lower_units};

pub mod error;
pub use error::{EmitError, UnitFailure};

pub mod mapping;
pub use mapping::{Mapping, MappingToken, MappingTracker};

pub mod naming;
pub use naming::NameFormatter;

pub mod printer;
pub use printer::{Printer, PrinterOutput};

pub mod reflection;
pub use reflection::{ClassInfo, ClassInfoCollector, ClassInfoSink, MemberInfo, MemberKind};

pub mod session;
pub use session::{UnitOutput, lower_unit, lower_unit_with_sink};

pub mod source_writer;
pub use source_writer::SourceWriter;
