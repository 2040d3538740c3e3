use mlir::grammer::ast::{AttrValue, Location, ParsedOp, Scalar, Type};
use mlir::grammer::{parse_type, Grammar, MlirGrammar};
use mlir::ParseError;

fn assert(code: &str) -> ParsedOp {
    for (idx, line) in code.lines().enumerate() {
        println!("{:>2}: {}", idx, line);
    }
    let result = MlirGrammar.parse_statement(code);
    println!("{:#?}", result);
    match result {
        Ok(op) => op,
        Err(error) => panic!("Error found: {error}"),
    }
}

fn reject(code: &str) -> ParseError {
    match MlirGrammar.parse_statement(code) {
        Ok(op) => panic!("Parsed unexpectedly: {op:#?}"),
        Err(error) => {
            println!("{error}");
            error
        }
    }
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            assert($code);
        }
    };
}

fn num(n: &str) -> Scalar {
    Scalar::Number(n.to_string())
}

case!(no_operands, "%0 = \"arith.constant\"() {value = 42 : i32} : () -> i32");
case!(no_result, "\"func.return\"(%0, %1) : (i32, i32) -> ()");
case!(result_count, "%0:2 = \"test.pair\"() : () -> (i32, i32)");
case!(result_number, "%1 = \"arith.addi\"(%0#0, %0#1) : (i32, i32) -> i32");
case!(properties, "%0 = \"test.op\"() <{flag = true, n = 3 : i64}> : () -> i32");
case!(bang_type, "%p = \"llvm.mlir.zero\"() : () -> !llvm.ptr");
case!(func_type_attr, "\"func.func\"() ({ }) {function_type = (i32) -> i32, sym_name = \"f\"} : () -> ()");
case!(symbol_ref, "%0 = \"func.call\"(%a) {callee = @f} : (i32) -> i32");
case!(fastmath, "%0 = \"arith.addf\"(%a, %b) {fastmath = #arith.fastmath<none>} : (f32, f32) -> f32");
case!(fused_loc, "%0 = \"a.b\"() : () -> i32 loc(fused[\"a.py\":1:2, \"b.py\":3:4])");
case!(comment_tail, "%0 = \"a.b\"() : () -> i32 // trailing note");
case!(
    block_label,
    "%0 = \"scf.execute_region\"() ({\n^bb0(%x: i32):\n  \"scf.yield\"(%x) : (i32) -> ()\n}) : () -> i32"
);

#[test]
fn arith_constant() {
    let op = assert("%0 = \"arith.constant\"() {value = 42 : i32} : () -> i32 loc(#loc1)");
    assert_eq!(op.output.as_deref(), Some("%0"));
    assert_eq!(op.op_name, "arith.constant");
    assert!(op.inputs.is_empty());
    assert!(op.input_types.is_empty());
    assert_eq!(op.output_type, Some(Type::simple("i32")));
    assert_eq!(
        op.attributes.get("value"),
        Some(&AttrValue::Typed {
            value: num("42"),
            ty: Type::simple("i32"),
        })
    );
    assert_eq!(op.location, Some(Location::Alias("#loc1".to_string())));
}

#[test]
fn quoted_location() {
    let op = assert("%0 = \"arith.constant\"() {value = 42 : i32} : () -> i32 loc(\"file.mlir\")");
    assert_eq!(op.location, Some(Location::Literal("\"file.mlir\"".to_string())));
}

#[test]
fn dense_constant_with_hash_type() {
    let op = assert(
        "%0 = \"mhlo.constant\"() {value = dense<[-208982, 155132]> : tensor<2xsi32>} : () -> tensor<2xsi32, #mhlo.TypeExt<memorySpace = global, layout = dense, encoding = compressed, offset = 0 : si64, shape = [2], isConstant = true>> loc(#loc3)",
    );

    match op.attributes.get("value") {
        Some(AttrValue::Typed { value, ty }) => {
            assert_eq!(*value, Scalar::Symbol("dense<[-208982, 155132]>".to_string()));
            assert_eq!(ty.to_string(), "tensor<2xsi32>");
        }
        other => panic!("unexpected value attribute: {other:?}"),
    }

    let Some(Type::Complex { base, content }) = &op.output_type else {
        panic!("expected a complex output type");
    };
    assert_eq!(base, "tensor");
    assert_eq!(content.text, "2xsi32");
    assert_eq!(content.hash_types.len(), 1);

    let hash = &content.hash_types[0];
    assert_eq!(hash.name, "#mhlo.TypeExt");
    let keys: Vec<&str> = hash.attributes.keys().map(|k| k.as_str()).collect();
    assert_eq!(
        keys,
        vec!["memorySpace", "layout", "encoding", "offset", "shape", "isConstant"]
    );
    assert_eq!(
        hash.attributes["offset"],
        AttrValue::Typed {
            value: num("0"),
            ty: Type::simple("si64"),
        }
    );
    assert_eq!(
        hash.attributes["shape"],
        AttrValue::Array(vec![AttrValue::Scalar(num("2"))])
    );
    assert_eq!(hash.attributes["isConstant"], AttrValue::Scalar(Scalar::Bool(true)));
}

#[test]
fn nested_sharding_map() {
    let ty = parse_type(
        "tensor<1x1x2xsi32, #mhlo.TypeExt<memorySpace = local, sharding = <dims = [0, 2, 2, 2], strides = [2, 0, 0, 0]>>>",
    )
    .unwrap();
    let Type::Complex { content, .. } = &ty else {
        panic!("expected a complex type");
    };
    let AttrValue::Map(sharding) = &content.hash_types[0].attributes["sharding"] else {
        panic!("sharding should be a map");
    };
    assert_eq!(sharding["dims"].to_string(), "[0, 2, 2, 2]");
    assert_eq!(sharding["strides"].to_string(), "[2, 0, 0, 0]");
}

#[test]
fn regions_keep_their_own_source() {
    let code = include_str!("data/mhlo.mlir");
    let (statements, _) = mlir::assemble(code);
    let op = assert(&statements[2].text);

    assert_eq!(op.op_name, "mhlo.dot_general");
    assert_eq!(op.inputs, vec!["%16", "%20", "%11"]);
    assert_eq!(op.input_types.len(), 3);
    assert_eq!(op.regions.len(), 2);
    assert_eq!(op.regions[0].len(), 2);
    assert_eq!(op.regions[1].len(), 1);

    let barrier = &op.regions[1][0];
    assert_eq!(barrier.output, None);
    assert_eq!(barrier.op_name, "mhlo.barrier");
    assert_eq!(barrier.output_type, None);
    assert!(barrier.source.starts_with("\"mhlo.barrier\"(%21)"));
    assert!(barrier.source.ends_with("loc(#loc34)"));

    assert_eq!(
        op.attributes["transpose_b"],
        AttrValue::Typed {
            value: num("0"),
            ty: Type::simple("i64"),
        }
    );
}

#[test]
fn xba_matmul() {
    let code = include_str!("data/xba.mlir");
    let (statements, _) = mlir::assemble(code);
    assert_eq!(statements.len(), 2);
    for statement in &statements {
        assert(&statement.text);
    }

    let op = assert(&statements[1].text);
    assert_eq!(op.attributes["keepAlive"], AttrValue::Scalar(Scalar::Bool(true)));
    assert_eq!(op.location, Some(Location::Literal("\"line_20\"".to_string())));
    assert_eq!(op.regions[0][1].inputs, vec!["%32", "%11"]);
}

#[test]
fn multiple_results_keep_tuple_text() {
    let op = assert("%0:2 = \"test.pair\"() : () -> (i32, i32)");
    assert_eq!(op.output_type, Some(Type::simple("(i32, i32)")));
    let op = assert("%0 = \"test.one\"() : () -> (i32)");
    assert_eq!(op.output_type, Some(Type::simple("i32")));
}

#[test]
fn properties_merge_before_attributes() {
    let op = assert("%0 = \"test.op\"() <{a = 1, b = 2}> {b = 3, c = 4} : () -> i32");
    let entries: Vec<String> = op
        .attributes
        .iter()
        .map(|(k, v)| format!("{k} = {v}"))
        .collect();
    assert_eq!(entries, vec!["a = 1", "b = 3", "c = 4"]);
}

#[test]
fn unknown_hash_segment_stays_text() {
    let ty = parse_type("memref<4xf32, #map>").unwrap();
    let Type::Complex { content, .. } = &ty else {
        panic!("expected a complex type");
    };
    assert_eq!(content.text, "4xf32, #map");
    assert!(content.hash_types.is_empty());
}

#[test]
fn errors() {
    assert!(matches!(
        reject("%0 = \"a.b\"(%1 : () -> i32"),
        ParseError::UnexpectedToken { .. }
    ));
    assert!(matches!(
        reject("%0 = \"a.b\"() : () ->"),
        ParseError::UnexpectedEOF(_)
    ));
    assert!(matches!(
        reject("%0 = \"a.b\"() : () -> i32 extra"),
        ParseError::TrailingInput(_)
    ));
    assert!(matches!(
        reject("%0:0 = \"a.b\"() : () -> i32"),
        ParseError::InvalidResultCount(_)
    ));

    let error = reject("%0 = \"a.b\"() : () -> i32\n  ) loc(x)");
    let found = error.found().unwrap();
    assert_eq!(found.text, ")");
    assert_eq!((found.row, found.col), (1, 2));
}
