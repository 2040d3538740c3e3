use super::ast::{AttrMap, AttrValue, HashType, Location, ParsedOp, Scalar, Type, TypeContent};
use super::parsercore::Parser;
use super::token::{Token, TokenKind::*};
use crate::error::ParseError;
use crate::{check, expect, optional, repeat};

impl<'a, I: Iterator<Item = Token>> Parser<'a, I> {
    /// statement = operation EOF
    pub fn parse(mut self) -> Result<ParsedOp, ParseError> {
        let op = self.parse_operation()?;
        self.expect_end()?;
        Ok(op)
    }

    /// hash-type = hash-id "<" [ attr-entry { "," attr-entry } ] ">" EOF
    pub fn parse_hash_type(mut self) -> Result<HashType, ParseError> {
        let name = self.parse_hash()?;
        expect!(self, LAngle)?;
        let entries = repeat!(self, self.parse_attr_entry(), Comma, RAngle);
        expect!(self, RAngle)?;
        self.expect_end()?;
        Ok(HashType {
            name,
            attributes: entries.into_iter().collect(),
        })
    }

    /// type EOF
    pub fn parse_single_type(mut self) -> Result<Type, ParseError> {
        let ty = self.parse_type()?;
        self.expect_end()?;
        Ok(ty)
    }
}

impl<'a, I: Iterator<Item = Token>> Parser<'a, I> {
    /// operation = [ result "=" ] string "(" [ value { "," value } ] ")"
    ///             [ "<{" attr-entries "}>" ] [ "(" region { "," region } ")" ]
    ///             [ attr-dict ] ":" func-type [ location ]
    fn parse_operation(&mut self) -> Result<ParsedOp, ParseError> {
        let start = self.mark();

        // result = value-id [ ":" integer ]
        let output = if check!(self, Value(_)) {
            let name = self.parse_value()?;
            if let Some(count) = optional!(self, Colon, self.parse_number()?) {
                if !matches!(count.parse::<usize>(), Ok(n) if n > 0) {
                    return Err(ParseError::InvalidResultCount(count));
                }
            }
            expect!(self, Equal)?;
            Some(name)
        } else {
            None
        };

        let op_name = self.parse_text()?;

        expect!(self, LParen)?;
        let inputs = repeat!(self, self.parse_value(), Comma, RParen);
        expect!(self, RParen)?;

        // Properties come first so the attribute dictionary can override them
        let mut attributes = AttrMap::new();
        if optional!(self, LProp).is_some() {
            let props = repeat!(self, self.parse_attr_entry(), Comma, RCurly);
            expect!(self, RCurly)?;
            expect!(self, RAngle)?;
            attributes.extend(props);
        }

        let regions = if check!(self, LParen) {
            expect!(self, LParen)?;
            let regions = repeat!(self, self.parse_region(), Comma, RParen);
            expect!(self, RParen)?;
            regions
        } else {
            vec![]
        };

        // attr-dict = "{" [ attr-entry { "," attr-entry } ] "}"
        if optional!(self, LCurly).is_some() {
            let attrs = repeat!(self, self.parse_attr_entry(), Comma, RCurly);
            expect!(self, RCurly)?;
            attributes.extend(attrs);
        }

        expect!(self, Colon)?;
        let (input_types, output_type) = self.parse_func_type()?;
        let location = self.parse_location()?;

        Ok(ParsedOp {
            output,
            op_name,
            inputs,
            input_types,
            output_type,
            attributes,
            regions,
            location,
            source: self.raw(start),
        })
    }

    /// region = "{" { block-label | operation } "}"
    fn parse_region(&mut self) -> Result<Vec<ParsedOp>, ParseError> {
        expect!(self, LCurly)?;
        let mut ops = Vec::new();
        while !check!(self, RCurly) {
            if check!(self, Caret(_)) {
                self.parse_block_label()?;
            } else if self.peek().is_some() {
                ops.push(self.parse_operation()?);
            } else {
                return Err(ParseError::UnexpectedEOF("RCurly".to_string()));
            }
        }
        expect!(self, RCurly)?;
        Ok(ops)
    }

    /// block-label = caret-id [ "(" ... ")" ] ":"
    /// Block arguments are skipped; they do not take part in the op tree.
    fn parse_block_label(&mut self) -> Result<(), ParseError> {
        expect!(self, Caret(_))?;
        if optional!(self, LParen).is_some() {
            self.consume_balanced(1)?;
        }
        expect!(self, Colon)?;
        Ok(())
    }

    /// attr-entry = ( bare-id | string ) "=" attr-value
    fn parse_attr_entry(&mut self) -> Result<(String, AttrValue), ParseError> {
        let key = match self.peek().cloned() {
            Some(Token { kind: Ident(s), .. }) | Some(Token { kind: Text(s), .. }) => {
                self.next();
                s
            }
            _ => return Err(self.unexpected("attribute name")),
        };
        expect!(self, Equal)?;
        let value = self.parse_attr_value()?;
        Ok((key, value))
    }

    /// attr-value = "[" [ attr-value { "," attr-value } ] "]"
    ///            | "<" attr-entries ">" | "{" attr-entries "}"
    ///            | scalar [ ":" type ]
    fn parse_attr_value(&mut self) -> Result<AttrValue, ParseError> {
        if optional!(self, LBracket).is_some() {
            let items = repeat!(self, self.parse_attr_value(), Comma, RBracket);
            expect!(self, RBracket)?;
            return Ok(AttrValue::Array(items));
        }

        if optional!(self, LAngle).is_some() {
            let entries = repeat!(self, self.parse_attr_entry(), Comma, RAngle);
            expect!(self, RAngle)?;
            return Ok(AttrValue::Map(entries.into_iter().collect()));
        }

        if optional!(self, LCurly).is_some() {
            let entries = repeat!(self, self.parse_attr_entry(), Comma, RCurly);
            expect!(self, RCurly)?;
            return Ok(AttrValue::Map(entries.into_iter().collect()));
        }

        let value = self.parse_scalar()?;
        match optional!(self, Colon, self.parse_type()?) {
            Some(ty) => Ok(AttrValue::Typed { value, ty }),
            None => Ok(AttrValue::Scalar(value)),
        }
    }

    /// scalar = "true" | "false" | number | string
    ///        | ( bare-id | hash-id | bang-id | at-id ) [ adjacent "<" raw ">" ]
    ///        | "(" raw ")" [ "->" type ]
    fn parse_scalar(&mut self) -> Result<Scalar, ParseError> {
        let token = match self.peek().cloned() {
            Some(token) => token,
            None => return Err(ParseError::UnexpectedEOF("attribute value".to_string())),
        };
        let start = token.pos.offset;
        match token.kind {
            Number(n) => {
                self.next();
                Ok(Scalar::Number(n))
            }
            Text(s) => {
                self.next();
                Ok(Scalar::Str(s))
            }
            Ident(s) if s == "true" || s == "false" => {
                self.next();
                Ok(Scalar::Bool(s == "true"))
            }
            Ident(_) | Hash(_) | Bang(_) | At(_) => {
                self.next();
                // dense<[1, 2]>, #foo.bar<...>, array<i64: 1, 2>
                if self.check_adjacent(|t| matches!(t.kind, LAngle | LProp)) {
                    let depth = if check!(self, LProp) { 2 } else { 1 };
                    self.next();
                    self.consume_balanced(depth)?;
                }
                Ok(Scalar::Symbol(self.raw(start)))
            }
            LParen => {
                // Function type used as a value: (i32) -> i32
                self.next();
                self.consume_balanced(1)?;
                if optional!(self, Arrow).is_some() {
                    self.parse_type()?;
                }
                Ok(Scalar::Symbol(self.raw(start)))
            }
            _ => Err(self.unexpected("attribute value")),
        }
    }

    /// func-type = "(" [ type { "," type } ] ")" "->" ( type | "(" [ type { "," type } ] ")" )
    fn parse_func_type(&mut self) -> Result<(Vec<Type>, Option<Type>), ParseError> {
        expect!(self, LParen)?;
        let inputs = repeat!(self, self.parse_type(), Comma, RParen);
        expect!(self, RParen)?;
        expect!(self, Arrow)?;

        let output = if check!(self, LParen) {
            let start = self.mark();
            expect!(self, LParen)?;
            let mut results = repeat!(self, self.parse_type(), Comma, RParen);
            expect!(self, RParen)?;
            match results.len() {
                0 => None,
                1 => results.pop(),
                _ => Some(Type::Simple(self.raw(start))),
            }
        } else {
            Some(self.parse_type()?)
        };

        Ok((inputs, output))
    }

    /// type = ( bare-id | bang-id ) [ "<" type-content ">" ]
    ///      | "(" raw ")" [ "->" type ]
    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let token = match self.peek().cloned() {
            Some(token) => token,
            None => return Err(ParseError::UnexpectedEOF("type".to_string())),
        };
        match token.kind {
            Ident(base) | Bang(base) => {
                self.next();
                match optional!(self, LAngle, self.parse_type_content()?) {
                    Some(content) => Ok(Type::Complex { base, content }),
                    None => Ok(Type::Simple(base)),
                }
            }
            LParen => {
                let start = token.pos.offset;
                self.next();
                self.consume_balanced(1)?;
                if optional!(self, Arrow).is_some() {
                    self.parse_type()?;
                }
                Ok(Type::Simple(self.raw(start)))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    /// type-content = segment { "," segment } ">"
    /// A segment shaped like `#name<key = value, ...>` becomes a HashType;
    /// anything else is kept verbatim as text.
    fn parse_type_content(&mut self) -> Result<TypeContent, ParseError> {
        let mut text = Vec::new();
        let mut hash_types = Vec::new();
        loop {
            let start = self.mark();
            self.consume_segment(|kind| matches!(kind, Comma | RAngle))?;
            let segment = self.raw(start);

            if segment.starts_with('#') {
                match super::parse_hash_type(&segment) {
                    Ok(hash) => hash_types.push(hash),
                    Err(_) => text.push(segment),
                }
            } else if !segment.is_empty() {
                text.push(segment);
            }

            if optional!(self, Comma).is_none() {
                expect!(self, RAngle)?;
                break;
            }
        }
        Ok(TypeContent {
            text: text.join(", "),
            hash_types,
        })
    }

    /// location = "loc" "(" ( hash-id | raw ) ")"
    fn parse_location(&mut self) -> Result<Option<Location>, ParseError> {
        if !self.check_if(|t| matches!(&t.kind, Ident(s) if s == "loc")) {
            return Ok(None);
        }
        self.next();
        expect!(self, LParen)?;

        let start = self.mark();
        let alias = match self.peek() {
            Some(Token { kind: Hash(s), .. }) => Some(s.clone()),
            _ => None,
        };
        self.consume_segment(|kind| matches!(kind, RParen))?;
        let raw = self.raw(start);
        expect!(self, RParen)?;

        Ok(Some(match alias {
            Some(alias) if alias == raw => Location::Alias(alias),
            _ => Location::Literal(raw),
        }))
    }

    // ------------------------------------------------------------------------
    // Terminals

    fn parse_value(&mut self) -> Result<String, ParseError> {
        if let Some(Token { kind: Value(s), .. }) = &self.peek().cloned() {
            self.next();
            return Ok(s.clone());
        }
        Err(self.unexpected("SSA value"))
    }

    fn parse_text(&mut self) -> Result<String, ParseError> {
        if let Some(Token { kind: Text(s), .. }) = &self.peek().cloned() {
            self.next();
            return Ok(s.clone());
        }
        Err(self.unexpected("operation name"))
    }

    fn parse_number(&mut self) -> Result<String, ParseError> {
        if let Some(Token { kind: Number(s), .. }) = &self.peek().cloned() {
            self.next();
            return Ok(s.clone());
        }
        Err(self.unexpected("number"))
    }

    fn parse_hash(&mut self) -> Result<String, ParseError> {
        if let Some(Token { kind: Hash(s), .. }) = &self.peek().cloned() {
            self.next();
            return Ok(s.clone());
        }
        Err(self.unexpected("attribute alias"))
    }
}
