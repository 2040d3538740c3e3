use mlir::grammer::token::{TokenKind, TokenKind::*};

fn assert(code: &str, expects: Vec<TokenKind>) {
    use mlir::grammer::lexer::LineLexer;
    let tokens = LineLexer::new(code, 0, 0).parse();

    println!(" {code}");
    for token in &tokens {
        print!("\r\x1b[{}C^", token.pos.col + 1);
    }
    println!();
    for (idx, token) in tokens.iter().enumerate() {
        println!("{:>2}: {:?}", idx, token.kind);
    }

    assert_eq!(tokens.len(), expects.len());
    for (idx, expect) in expects.iter().enumerate() {
        assert_eq!(tokens[idx].kind, *expect);
    }
}

macro_rules! case {
    ($name:ident, $code:expr, $expects:expr) => {
        #[test]
        fn $name() {
            assert($code, $expects);
        }
    };
}

case!(
    simple_op,
    "%0 = \"arith.constant\"() {value = 42 : i32} : () -> i32 loc(#loc1)",
    vec![
        Value(format!("%0")),
        Equal,
        Text(format!("arith.constant")),
        LParen,
        RParen,
        LCurly,
        Ident(format!("value")),
        Equal,
        Number(format!("42")),
        Colon,
        Ident(format!("i32")),
        RCurly,
        Colon,
        LParen,
        RParen,
        Arrow,
        Ident(format!("i32")),
        Ident(format!("loc")),
        LParen,
        Hash(format!("#loc1")),
        RParen,
    ]
);

case!(
    shaped_type,
    "tensor<1x1x2xsi32>",
    vec![
        Ident(format!("tensor")),
        LAngle,
        Number(format!("1")),
        Ident(format!("x1x2xsi32")),
        RAngle,
    ]
);

case!(
    numbers,
    "-1 0x1F 1.5e-3 2.0 7",
    vec![
        Number(format!("-1")),
        Number(format!("0x1F")),
        Number(format!("1.5e-3")),
        Number(format!("2.0")),
        Number(format!("7")),
    ]
);

case!(
    sigils,
    "%5#1 %arg0 ^bb0 !llvm.ptr @main @\"quoted sym\" #mhlo.TypeExt",
    vec![
        Value(format!("%5#1")),
        Value(format!("%arg0")),
        Caret(format!("^bb0")),
        Bang(format!("!llvm.ptr")),
        At(format!("@main")),
        At(format!("@\"quoted sym\"")),
        Hash(format!("#mhlo.TypeExt")),
    ]
);

case!(
    properties_and_closers,
    "<{a = {b = 1}}> >>",
    vec![
        LProp,
        Ident(format!("a")),
        Equal,
        LCurly,
        Ident(format!("b")),
        Equal,
        Number(format!("1")),
        RCurly,
        RCurly,
        RAngle,
        RAngle,
        RAngle,
    ]
);

case!(
    escaped_text,
    r#""a\"b(" // trailing"#,
    vec![Text(format!(r#"a\"b("#)), Comment(format!("trailing"))]
);

case!(
    unterminated_text,
    "\"open",
    vec![Error(format!("\"open"))]
);

#[test]
fn offsets_span_lines() {
    use mlir::grammer::lexer::Lexer;
    let code = "%0 = \"a\"(\n  %1)";
    let tokens = Lexer::new(code).parse();
    let last = tokens.last().unwrap();
    assert_eq!(last.kind, RParen);
    assert_eq!(last.pos.row, 1);
    assert_eq!(last.pos.col, 4);
    assert_eq!(&code[last.pos.offset..last.end], ")");

    let value = &tokens[4];
    assert_eq!(value.kind, Value(format!("%1")));
    assert_eq!(&code[value.pos.offset..value.end], "%1");
}
