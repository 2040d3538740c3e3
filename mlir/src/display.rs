use crate::alias::AliasTable;
use crate::project::{project_attrs, project_type, stringify_attrs, ProjectionPolicy};
use crate::tree::{Operation, Program};

/// One-line simplified form of `op`. Regions are shown as `({...})`.
///
/// `%0 = "arith.addf"(%a, %b) {fastmath = #arith.fastmath<none>} : (f32, f32) -> f32 loc("m.py":3:1)`
pub fn render(op: &Operation, aliases: &AliasTable, policy: &ProjectionPolicy) -> String {
    if op.is_parse_error() {
        return op.original.clone();
    }

    let mut line = String::new();
    if let Some(output) = &op.output {
        line.push_str(&format!("{output} = "));
    }
    if let Some(name) = &op.op_name {
        line.push_str(&format!("\"{name}\""));
    }
    line.push_str(&format!("({})", op.inputs.join(", ")));

    if !op.regions.is_empty() {
        line.push_str(" ({...})");
    }

    let inline = project_attrs(&op.attributes, policy);
    if !inline.is_empty() {
        line.push_str(&format!(" {{{}}}", stringify_attrs(&inline)));
    }

    if policy.show_types && (!op.input_types.is_empty() || op.output_type.is_some()) {
        let inputs: Vec<String> = op
            .input_types
            .iter()
            .map(|ty| project_type(ty, policy))
            .collect();
        let output = match &op.output_type {
            Some(ty) => project_type(ty, policy),
            None => "()".to_string(),
        };
        line.push_str(&format!(" : ({}) -> {}", inputs.join(", "), output));
    }

    if let Some(location) = &op.location {
        line.push_str(&format!(" loc({})", aliases.resolve(location)));
    }
    line
}

/// Whole program with regions expanded, two spaces of indent per level.
pub fn render_tree(program: &Program, aliases: &AliasTable, policy: &ProjectionPolicy) -> String {
    let mut lines = vec![];
    for op in program.ops() {
        push_tree(&mut lines, op, 0, aliases, policy);
    }
    lines.join("\n")
}

fn push_tree(
    lines: &mut Vec<String>,
    op: &Operation,
    depth: usize,
    aliases: &AliasTable,
    policy: &ProjectionPolicy,
) {
    let indent = "  ".repeat(depth);
    for line in render(op, aliases, policy).lines() {
        lines.push(format!("{indent}{line}"));
    }
    for child in op.children() {
        push_tree(lines, child, depth + 1, aliases, policy);
    }
}
