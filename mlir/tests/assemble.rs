use mlir::assemble;

fn statements(code: &str) -> Vec<String> {
    let (statements, _) = assemble(code);
    for statement in &statements {
        println!("{:>3}: {}", statement.line, statement.text);
    }
    statements.into_iter().map(|s| s.text).collect()
}

macro_rules! case {
    ($name:ident, $code:expr, $expects:expr) => {
        #[test]
        fn $name() {
            let expects: Vec<&str> = $expects;
            assert_eq!(statements($code), expects);
        }
    };
}

case!(
    single_lines,
    "%0 = \"a\"() : () -> i32\n%1 = \"b\"(%0) : (i32) -> i32\n",
    vec!["%0 = \"a\"() : () -> i32", "%1 = \"b\"(%0) : (i32) -> i32"]
);

case!(
    skips_noise,
    "module {\n  // comment\n\n  %0 = \"a\"() : () -> i32\n  \"func.return\"(%0) : (i32) -> ()\n}\n",
    vec!["%0 = \"a\"() : () -> i32"]
);

case!(
    region_spans_lines,
    "%0 = \"scf.if\"(%c) ({\n  %1 = \"a\"() : () -> i32\n}, {\n  %2 = \"b\"() : () -> i32\n}) : (i1) -> i32\n%3 = \"c\"() : () -> i32",
    vec![
        "%0 = \"scf.if\"(%c) ({\n  %1 = \"a\"() : () -> i32\n}, {\n  %2 = \"b\"() : () -> i32\n}) : (i1) -> i32",
        "%3 = \"c\"() : () -> i32",
    ]
);

case!(
    open_paren_continues,
    "%0 = \"a\"(%x,\n    %y) : (i32, i32) -> i32",
    vec!["%0 = \"a\"(%x,\n    %y) : (i32, i32) -> i32"]
);

case!(
    quoted_brackets_are_ignored,
    "%0 = \"a\"() : () -> i32 loc(\"weird(name\")\n%1 = \"b\"() : () -> i32",
    vec![
        "%0 = \"a\"() : () -> i32 loc(\"weird(name\")",
        "%1 = \"b\"() : () -> i32",
    ]
);

case!(
    comment_brackets_are_ignored,
    "%0 = \"a\"() : () -> i32 // see note (1\n%1 = \"b\"(%0) : (i32) -> i32\n",
    vec![
        "%0 = \"a\"() : () -> i32 // see note (1",
        "%1 = \"b\"(%0) : (i32) -> i32",
    ]
);

#[test]
fn aliases_are_collected_not_assembled() {
    let code = "#loc1 = loc(\"f.mlir\":10:5)\n%0 = \"a\"() ({\n#loc2 = loc(\"g.mlir\":1:1)\n}) : () -> i32 loc(#loc1)\n";
    let (statements, aliases) = assemble(code);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].text, "%0 = \"a\"() ({\n\n}) : () -> i32 loc(#loc1)");
    assert_eq!(aliases.get("#loc1"), Some("\"f.mlir\":10:5"));
    assert_eq!(aliases.get("#loc2"), Some("\"g.mlir\":1:1"));
}

#[test]
fn line_numbers_are_one_based() {
    let (statements, _) = assemble("\n// header\n%0 = \"a\"() : () -> i32\n\n%1 = \"b\"() ({\n}) : () -> i32\n");
    let lines: Vec<usize> = statements.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![3, 5]);
}

#[test]
fn unterminated_statement_is_kept() {
    let (statements, _) = assemble("%0 = \"a\"() ({\n  %1 = \"b\"() : () -> i32\n");
    assert_eq!(statements.len(), 1);
    assert!(statements[0].unterminated);
    assert_eq!(statements[0].text, "%0 = \"a\"() ({\n  %1 = \"b\"() : () -> i32");
}

#[test]
fn balanced_statements_count() {
    let code = include_str!("data/mhlo.mlir");
    let (statements, aliases) = assemble(code);
    assert_eq!(statements.len(), 4);
    assert!(statements.iter().all(|s| !s.unterminated));
    assert_eq!(aliases.len(), 5);
}
