//! Parser and query engine for MLIR generic-form text.
//!
//! Text is cut into statements ([`assemble`]), each statement goes through a
//! [`Grammar`], and the results become one immutable [`Program`]. Queries
//! (SSA lookup, projection, display) take the program and a
//! [`ProjectionPolicy`] as plain arguments.

pub mod alias;
pub mod assemble;
pub mod detail;
pub mod display;
pub mod error;
pub mod grammer;
pub mod project;
pub mod ssa;
pub mod tree;

pub use alias::AliasTable;
pub use assemble::{assemble, Statement};
pub use detail::{OpDetail, SsaDetail};
pub use display::{render, render_tree};
pub use error::ParseError;
pub use grammer::ast::{AttrMap, AttrValue, HashType, Location, Scalar, Type, TypeContent};
pub use grammer::{Grammar, MlirGrammar};
pub use project::{project_attrs, project_type, stringify_attrs, ProjectionPolicy};
pub use ssa::{Occurrence, Role, SsaCursor, SsaIndex};
pub use tree::{OpId, Operation, Program, Registry};

/// Parse a whole file with the bundled grammar.
pub fn load(text: &str) -> (Program, AliasTable) {
    let (statements, aliases) = assemble(text);
    let program = Program::build(&statements, &MlirGrammar);
    (program, aliases)
}
