//! Grammar for the generic operation form.
//!
//! The rest of the crate only talks to the [`Grammar`] trait, so a different
//! front end can be swapped in without touching the tree builder.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod parsercore;
pub mod token;

use crate::error::ParseError;
use ast::{HashType, ParsedOp, Type};
use lexer::Lexer;
use parsercore::Parser;

/// Turns the text of one complete statement into its fields.
pub trait Grammar {
    fn parse_statement(&self, text: &str) -> Result<ParsedOp, ParseError>;
}

/// Hand-written grammar for MLIR generic-form operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct MlirGrammar;

impl Grammar for MlirGrammar {
    fn parse_statement(&self, text: &str) -> Result<ParsedOp, ParseError> {
        let tokens = Lexer::new(text).parse();
        Parser::new(text, tokens.into_iter()).parse()
    }
}

/// Parse a standalone type such as `tensor<2xsi32, #mhlo.TypeExt<...>>`.
pub fn parse_type(text: &str) -> Result<Type, ParseError> {
    let tokens = Lexer::new(text).parse();
    Parser::new(text, tokens.into_iter()).parse_single_type()
}

/// Parse a standalone `#name<key = value, ...>` decoration.
pub fn parse_hash_type(text: &str) -> Result<HashType, ParseError> {
    let tokens = Lexer::new(text).parse();
    Parser::new(text, tokens.into_iter()).parse_hash_type()
}
