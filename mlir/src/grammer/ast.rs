use crate::project::stringify_attrs;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// One operation as the grammar sees it, before identifiers are stamped on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedOp {
    pub output: Option<String>,        // "%0"
    pub op_name: String,               // "arith.constant"
    pub inputs: Vec<String>,           // ["%1", "%2"]
    pub input_types: Vec<Type>,        // (i32, tensor<2xf32>)
    pub output_type: Option<Type>,     // -> i32
    pub attributes: AttrMap,           // {value = 42 : i32}
    pub regions: Vec<Vec<ParsedOp>>,   // ({ ... }, { ... })
    pub location: Option<Location>,    // loc(#loc1)
    pub source: String,                // raw text of this operation
}

pub type AttrMap = IndexMap<String, AttrValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Type {
    Simple(String),                                // i32, !llvm.ptr, (i32, i32)
    Complex { base: String, content: TypeContent }, // tensor<2xsi32, #mhlo.TypeExt<...>>
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TypeContent {
    pub text: String,              // "2xsi32"
    pub hash_types: Vec<HashType>, // [#mhlo.TypeExt<...>]
}

/// `#name<key = value, ...>` decoration inside a type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashType {
    pub name: String,
    pub attributes: AttrMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AttrValue {
    Scalar(Scalar),                   // local | 42 | true | "str"
    Typed { value: Scalar, ty: Type }, // 0 : si64
    Array(Vec<AttrValue>),            // [1, 1, 1536]
    Map(AttrMap),                     // <dims = [...], strides = [...]>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Scalar {
    Bool(bool),
    Number(String), // raw literal text
    Str(String),    // without quotes
    Symbol(String), // bare word, #attr, @sym, dense<...>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Location {
    Literal(String), // loc("f.mlir":10:5) -> "f.mlir":10:5
    Alias(String),   // loc(#loc1) -> #loc1
}

impl Type {
    pub fn simple(text: impl Into<String>) -> Self {
        Type::Simple(text.into())
    }
}

// ----------------------------------------------------------------------------
// Printing back to source form

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Simple(text) => write!(f, "{text}"),
            Type::Complex { base, content } => {
                let mut parts = vec![];
                if !content.text.is_empty() {
                    parts.push(content.text.clone());
                }
                for hash in &content.hash_types {
                    parts.push(format!("{}<{}>", hash.name, stringify_attrs(&hash.attributes)));
                }
                write!(f, "{base}<{}>", parts.join(", "))
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Str(s) => write!(f, "\"{s}\""),
            Scalar::Symbol(s) => write!(f, "{s}"),
        }
    }
}

/// Value half of `key = value`
impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Scalar(s) => write!(f, "{s}"),
            AttrValue::Typed { value, ty } => write!(f, "{value} : {ty}"),
            AttrValue::Array(items) => {
                let items: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            AttrValue::Map(map) => write!(f, "<{}>", stringify_attrs(map)),
        }
    }
}
