use crate::assemble::Statement;
use crate::error::ParseError;
use crate::grammer::ast::{AttrMap, Location, ParsedOp, Type};
use crate::grammer::{Grammar, MlirGrammar};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

pub type OpId = usize;
pub type Region = Vec<Operation>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub id: OpId,
    pub output: Option<String>,
    pub op_name: Option<String>,
    pub inputs: Vec<String>,
    pub input_types: Vec<Type>,
    pub output_type: Option<Type>,
    pub attributes: AttrMap,
    pub regions: Vec<Region>,
    pub location: Option<Location>,
    pub original: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ParseError>,
}

impl Operation {
    /// Node for a statement the grammar rejected. Only `original` is kept.
    fn rejected(id: OpId, original: String, error: ParseError) -> Self {
        Operation {
            id,
            output: None,
            op_name: None,
            inputs: vec![],
            input_types: vec![],
            output_type: None,
            attributes: AttrMap::new(),
            regions: vec![],
            location: None,
            original,
            error: Some(error),
        }
    }

    pub fn is_parse_error(&self) -> bool {
        self.error.is_some()
    }

    /// Direct children, region by region.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Operation> {
        self.regions.iter().flatten()
    }
}

/// Where an operation lives: top-level index, then (region, op) per level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    pub top: usize,
    pub steps: Vec<(usize, usize)>,
}

impl Path {
    fn child(&self, region: usize, op: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push((region, op));
        Path { top: self.top, steps }
    }
}

/// Every operation of a program by id, in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Registry(IndexMap<OpId, Path>);

impl Registry {
    pub fn path(&self, id: OpId) -> Option<&Path> {
        self.0.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = OpId> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of one parse pass. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    ops: Vec<Operation>,
    registry: Registry,
}

impl Program {
    /// Parse with the bundled grammar. Location aliases are ignored here,
    /// see [`crate::load`] to get both.
    pub fn parse(text: &str) -> Self {
        let (statements, _) = crate::assemble(text);
        Self::build(&statements, &MlirGrammar)
    }

    pub fn build(statements: &[Statement], grammar: &dyn Grammar) -> Self {
        let mut builder = Builder::new(grammar);
        let ops = statements
            .iter()
            .enumerate()
            .map(|(idx, statement)| builder.build(idx, statement))
            .collect();
        Program {
            ops,
            registry: builder.registry,
        }
    }

    /// Top-level operations in source order
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn get(&self, id: OpId) -> Option<&Operation> {
        let path = self.registry.path(id)?;
        let mut op = self.ops.get(path.top)?;
        for &(region, idx) in &path.steps {
            op = op.regions.get(region)?.get(idx)?;
        }
        Some(op)
    }

    /// All operations at every depth, parents before children.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.ops.iter().rev().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a Operation>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Operation;

    fn next(&mut self) -> Option<Self::Item> {
        let op = self.stack.pop()?;
        self.stack.extend(op.children().rev());
        Some(op)
    }
}

// ----------------------------------------------------------------------------
// Builder
// ----------------------------------------------------------------------------

/// Stamps ids in pre-order while turning grammar output into operations.
struct Builder<'a> {
    grammar: &'a dyn Grammar,
    next_id: OpId,
    registry: Registry,
}

impl<'a> Builder<'a> {
    fn new(grammar: &'a dyn Grammar) -> Self {
        Builder {
            grammar,
            next_id: 0,
            registry: Registry::default(),
        }
    }

    fn stamp(&mut self, path: Path) -> OpId {
        let id = self.next_id;
        self.next_id += 1;
        self.registry.0.insert(id, path);
        id
    }

    fn build(&mut self, index: usize, statement: &Statement) -> Operation {
        let path = Path {
            top: index,
            steps: vec![],
        };
        match self.grammar.parse_statement(&statement.text) {
            Ok(parsed) => {
                debug!(line = statement.line, op = %parsed.op_name, "parsed statement");
                let mut op = self.wrap(parsed, path);
                op.original = statement.text.clone();
                op
            }
            Err(error) => {
                warn!(line = statement.line, %error, "failed to parse statement");
                let id = self.stamp(path);
                Operation::rejected(id, statement.text.clone(), error)
            }
        }
    }

    fn wrap(&mut self, parsed: ParsedOp, path: Path) -> Operation {
        let id = self.stamp(path.clone());

        let mut regions = Vec::with_capacity(parsed.regions.len());
        for (r, region) in parsed.regions.into_iter().enumerate() {
            let mut ops = Vec::with_capacity(region.len());
            for (o, child) in region.into_iter().enumerate() {
                ops.push(self.wrap(child, path.child(r, o)));
            }
            regions.push(ops);
        }

        Operation {
            id,
            output: parsed.output,
            op_name: Some(parsed.op_name),
            inputs: parsed.inputs,
            input_types: parsed.input_types,
            output_type: parsed.output_type,
            attributes: parsed.attributes,
            regions,
            location: parsed.location,
            original: parsed.source,
            error: None,
        }
    }
}
