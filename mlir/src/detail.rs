use crate::alias::AliasTable;
use crate::project::{project_type, ProjectionPolicy};
use crate::ssa::SsaIndex;
use crate::tree::{OpId, Operation, Program};
use serde::Serialize;
use std::fmt;

const UNKNOWN: &str = "unknown";

/// Everything known about one operation, already projected to text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpDetail {
    pub id: OpId,
    pub op_name: String,
    pub attributes: Vec<String>,
    pub inputs: Vec<(String, String)>,
    pub output: Option<(String, String)>,
    pub location: Option<String>,
    pub error: Option<String>,
}

impl OpDetail {
    pub fn of(
        program: &Program,
        id: OpId,
        aliases: &AliasTable,
        policy: &ProjectionPolicy,
    ) -> Option<Self> {
        let op = program.get(id)?;
        let inputs = op
            .inputs
            .iter()
            .enumerate()
            .map(|(idx, input)| {
                let ty = op
                    .input_types
                    .get(idx)
                    .map_or(UNKNOWN.to_string(), |ty| project_type(ty, policy));
                (input.clone(), ty)
            })
            .collect();
        let output = op.output.as_ref().map(|output| {
            let ty = op
                .output_type
                .as_ref()
                .map_or(UNKNOWN.to_string(), |ty| project_type(ty, policy));
            (output.clone(), ty)
        });

        Some(OpDetail {
            id,
            op_name: op.op_name.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            attributes: op
                .attributes
                .iter()
                .map(|(key, value)| format!("{key} = {value}"))
                .collect(),
            inputs,
            output,
            location: op.location.as_ref().map(|loc| aliases.resolve(loc).to_string()),
            error: op.error.as_ref().map(|e| e.to_string()),
        })
    }
}

impl fmt::Display for OpDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Operation: {} [#{}]", self.op_name, self.id)?;
        if let Some(error) = &self.error {
            writeln!(f, "  Parse error: {error}")?;
        }
        if self.attributes.is_empty() {
            writeln!(f, "  Attributes: none")?;
        } else {
            writeln!(f, "  Attributes:")?;
            for attr in &self.attributes {
                writeln!(f, "    {attr}")?;
            }
        }
        if !self.inputs.is_empty() {
            writeln!(f, "  Inputs:")?;
            for (name, ty) in &self.inputs {
                writeln!(f, "    {name} : {ty}")?;
            }
        }
        if let Some((name, ty)) = &self.output {
            writeln!(f, "  Output: {name} : {ty}")?;
        }
        if let Some(location) = &self.location {
            writeln!(f, "  Location: {location}")?;
        }
        Ok(())
    }
}

/// Definition and users of one SSA value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SsaDetail {
    pub name: String,
    pub ty: String,
    pub defined_by: String,
    pub defined_at: Option<String>,
    pub used_by: Vec<(String, Option<String>)>,
}

impl SsaDetail {
    /// `None` when nothing defines `name`.
    pub fn of(
        index: &SsaIndex,
        name: &str,
        aliases: &AliasTable,
        policy: &ProjectionPolicy,
    ) -> Option<Self> {
        let def = index.definition_of(name)?;
        let resolve = |op: &Operation| {
            op.location.as_ref().map(|loc| aliases.resolve(loc).to_string())
        };

        Some(SsaDetail {
            name: name.to_string(),
            ty: def
                .output_type
                .as_ref()
                .map_or(UNKNOWN.to_string(), |ty| project_type(ty, policy)),
            defined_by: def.op_name.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            defined_at: resolve(def),
            used_by: index
                .uses_of(name)
                .into_iter()
                .map(|op| {
                    let op_name = op.op_name.clone().unwrap_or_else(|| UNKNOWN.to_string());
                    (op_name, resolve(op))
                })
                .collect(),
        })
    }
}

impl fmt::Display for SsaDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SSA Value: {}", self.name)?;
        writeln!(f, "  Type: {}", self.ty)?;
        writeln!(f, "  Defined by: {}", self.defined_by)?;
        if let Some(at) = &self.defined_at {
            writeln!(f, "  Defined at: {at}")?;
        }
        if !self.used_by.is_empty() {
            writeln!(f, "  Used by:")?;
            for (op_name, at) in &self.used_by {
                match at {
                    Some(at) => writeln!(f, "    {op_name} at {at}")?,
                    None => writeln!(f, "    {op_name}")?,
                }
            }
        }
        Ok(())
    }
}
