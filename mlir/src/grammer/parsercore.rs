use super::token::{Token, TokenKind};
use crate::error::{ParseError, TokenInfo};
use std::iter::Peekable;

pub struct Parser<'a, I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    src: &'a str,
    last_end: usize,
}

impl<'a, I: Iterator<Item = Token>> Parser<'a, I> {
    /// `src` must be the text the tokens were lexed from; raw spans are
    /// sliced out of it by byte offset.
    pub fn new(src: &'a str, tokens: I) -> Self {
        Parser {
            tokens: tokens.peekable(),
            src,
            last_end: 0,
        }
    }

    pub fn info(&self, token: &Token) -> TokenInfo {
        TokenInfo {
            text: self.src.get(token.pos.offset..token.end).unwrap_or("").to_string(),
            row: token.pos.row,
            col: token.pos.col,
        }
    }
}

impl<'a, I: Iterator<Item = Token>> Parser<'a, I> {
    /// Skip comments
    fn skip(&mut self) {
        while let Some(token) = self.tokens.peek() {
            match &token.kind {
                TokenKind::Comment(_) => self.tokens.next(),
                _ => break,
            };
        }
    }

    fn take(&mut self) -> Option<Token> {
        let token = self.tokens.next();
        if let Some(token) = &token {
            self.last_end = token.end;
        }
        token
    }

    /// Peek : Watch next token without consuming it
    pub fn peek(&mut self) -> Option<&Token> {
        self.skip();
        self.tokens.peek()
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Option<Token> {
        self.skip();
        self.take()
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> bool {
        self.skip();
        match self.tokens.peek() {
            Some(token) => cond(token),
            None => false,
        }
    }

    /// Next token starts right where the previous one ended (no whitespace)
    pub fn check_adjacent<F: Fn(&Token) -> bool>(&mut self, cond: F) -> bool {
        let last_end = self.last_end;
        self.check_if(|token| token.pos.offset == last_end && cond(token))
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        self.skip();
        let token = self.tokens.next_if(|token| cond(token));
        if let Some(token) = &token {
            self.last_end = token.end;
        }
        token
    }

    /// Next token must be match with condition (skipping comments)
    pub fn expect_tobe<F: Fn(&Token) -> bool>(
        &mut self,
        cond: F,
        expected: &str,
    ) -> Result<Token, ParseError> {
        self.skip();
        match self.tokens.peek().cloned() {
            Some(token) if cond(&token) => {
                self.take();
                Ok(token)
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.info(&token),
            }),
            None => Err(ParseError::UnexpectedEOF(expected.to_string())),
        }
    }

    /// Byte offset where the next token starts
    pub fn mark(&mut self) -> usize {
        let last_end = self.last_end;
        self.peek().map_or(last_end, |token| token.pos.offset)
    }

    /// Source text from `start` up to the end of the last consumed token
    pub fn raw(&self, start: usize) -> String {
        self.src
            .get(start..self.last_end.max(start))
            .unwrap_or("")
            .trim()
            .to_string()
    }

    /// Consume tokens until the opener that was just consumed is closed.
    /// `depth` is the nesting already open. Returns the closing token.
    pub fn consume_balanced(&mut self, mut depth: usize) -> Result<Token, ParseError> {
        loop {
            let token = self
                .next()
                .ok_or_else(|| ParseError::UnexpectedEOF("closing bracket".to_string()))?;
            depth = match token.kind {
                TokenKind::LProp => depth + 2,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LCurly | TokenKind::LAngle => {
                    depth + 1
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RCurly | TokenKind::RAngle => {
                    depth - 1
                }
                _ => depth,
            };
            if depth == 0 {
                return Ok(token);
            }
        }
    }

    /// Consume a bracket-balanced run of tokens, stopping (without consuming)
    /// at the first token outside any bracket for which `stop` holds.
    pub fn consume_segment<F: Fn(&TokenKind) -> bool>(&mut self, stop: F) -> Result<(), ParseError> {
        use TokenKind::*;
        let mut depth = 0usize;
        loop {
            let kind = match self.peek() {
                Some(token) => token.kind.clone(),
                None => return Err(ParseError::UnexpectedEOF("closing bracket".to_string())),
            };
            if depth == 0 && stop(&kind) {
                return Ok(());
            }
            depth = match kind {
                LProp => depth + 2,
                LParen | LBracket | LCurly | LAngle => depth + 1,
                RParen | RBracket | RCurly | RAngle if depth == 0 => {
                    return Err(self.unexpected("matching bracket"))
                }
                RParen | RBracket | RCurly | RAngle => depth - 1,
                _ => depth,
            };
            self.next();
        }
    }

    /// Error describing the next token (or the end of input)
    pub fn unexpected(&mut self, expected: &str) -> ParseError {
        match self.peek().cloned() {
            Some(token) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.info(&token),
            },
            None => ParseError::UnexpectedEOF(expected.to_string()),
        }
    }

    /// Everything must have been consumed
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        match self.peek().cloned() {
            Some(token) => Err(ParseError::TrailingInput(self.info(&token))),
            None => Ok(()),
        }
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat) => {
        $parser.expect_tobe(|token| matches!(&token.kind, $kind), stringify!($kind))
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat, $following:expr) => {
        if check!($parser, $trigger) {
            expect!($parser, $trigger)?;
            Some($following)
        } else {
            None
        }
    };
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))
    };
}

/// Parse delimited elements up to (not including) a terminal
/// [ element { delimiter element } ] terminal
#[macro_export]
macro_rules! repeat {
    ($parser:expr, $elem:expr, $delimiter:pat, $terminal:pat) => {{
        let mut items = Vec::new();
        if !check!($parser, $terminal) {
            items.push($elem?);
            while check!($parser, $delimiter) {
                expect!($parser, $delimiter)?;
                items.push($elem?);
            }
        }
        items
    }};
}
