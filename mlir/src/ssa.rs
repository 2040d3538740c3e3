use crate::tree::{OpId, Operation, Program};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Def,
    Use(usize), // operand index
}

/// One place an SSA name is written in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub op: OpId,
    pub role: Role,
}

/// Definition and use lookup over every operation of a program.
#[derive(Debug)]
pub struct SsaIndex<'a> {
    program: &'a Program,
    defs: IndexMap<String, OpId>,
    uses: IndexMap<String, Vec<OpId>>,
    occurrences: IndexMap<String, Vec<Occurrence>>,
}

impl<'a> SsaIndex<'a> {
    pub fn new(program: &'a Program) -> Self {
        let mut defs = IndexMap::new();
        let mut uses: IndexMap<String, Vec<OpId>> = IndexMap::new();
        let mut occurrences: IndexMap<String, Vec<Occurrence>> = IndexMap::new();

        for op in program.walk() {
            if let Some(output) = &op.output {
                defs.entry(output.clone()).or_insert(op.id);
                occurrences.entry(output.clone()).or_default().push(Occurrence {
                    op: op.id,
                    role: Role::Def,
                });
            }
            for (idx, input) in op.inputs.iter().enumerate() {
                let users = uses.entry(input.clone()).or_default();
                if users.last() != Some(&op.id) {
                    users.push(op.id);
                }
                occurrences.entry(input.clone()).or_default().push(Occurrence {
                    op: op.id,
                    role: Role::Use(idx),
                });
            }
        }

        SsaIndex {
            program,
            defs,
            uses,
            occurrences,
        }
    }

    /// First operation, in pre-order, whose result is `name`.
    pub fn definition_of(&self, name: &str) -> Option<&'a Operation> {
        let id = self.defs.get(name)?;
        self.program.get(*id)
    }

    /// Operations reading `name`, each once, in pre-order.
    pub fn uses_of(&self, name: &str) -> Vec<&'a Operation> {
        self.uses
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.program.get(*id))
            .collect()
    }

    /// Every definition and use site of `name`, in display order.
    pub fn occurrences(&self, name: &str) -> &[Occurrence] {
        self.occurrences.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

/// Steps through the occurrences of one SSA name, clamped at both ends.
#[derive(Debug, Clone)]
pub struct SsaCursor {
    name: String,
    sites: Vec<Occurrence>,
    current: usize,
}

impl SsaCursor {
    /// `None` when the name never appears.
    pub fn new(index: &SsaIndex, name: &str) -> Option<Self> {
        let sites = index.occurrences(name).to_vec();
        if sites.is_empty() {
            return None;
        }
        Some(SsaCursor {
            name: name.to_string(),
            sites,
            current: 0,
        })
    }

    /// Start at a given site, or the first one when it is not an occurrence.
    pub fn at(mut self, site: Occurrence) -> Self {
        self.current = self.sites.iter().position(|s| *s == site).unwrap_or(0);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sites(&self) -> &[Occurrence] {
        &self.sites
    }

    pub fn current(&self) -> Occurrence {
        self.sites[self.current]
    }

    pub fn first(&mut self) -> Occurrence {
        self.current = 0;
        self.current()
    }

    pub fn prev(&mut self) -> Occurrence {
        self.current = self.current.saturating_sub(1);
        self.current()
    }

    pub fn next(&mut self) -> Occurrence {
        self.current = (self.current + 1).min(self.sites.len() - 1);
        self.current()
    }

    pub fn last(&mut self) -> Occurrence {
        self.current = self.sites.len() - 1;
        self.current()
    }

    /// `"2 / 5"`
    pub fn position(&self) -> String {
        format!("{} / {}", self.current + 1, self.sites.len())
    }
}
