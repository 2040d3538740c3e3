use super::token::{Pos, Token, TokenKind};
use std::iter::Peekable;
use std::str::CharIndices;

pub struct Lexer<'a> {
    code: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self { code }
    }

    pub fn parse(self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut offset = 0;
        for (row, line) in self.code.split('\n').enumerate() {
            let lexer = LineLexer::new(line, row, offset);
            tokens.extend(lexer.parse());
            offset += line.len() + 1;
        }
        tokens
    }
}

pub struct LineLexer<'a> {
    iter: Peekable<CharIndices<'a>>,
    row: usize,
    base: usize,
}

impl<'a> LineLexer<'a> {
    /// `base` is the byte offset of this line inside the whole statement.
    pub fn new(line: &'a str, row: usize, base: usize) -> Self {
        Self {
            iter: line.char_indices().peekable(),
            row,
            base,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<(usize, char)> {
        self.iter.clone().nth(n)
    }
    fn consume(&mut self) -> Option<(usize, char)> {
        self.iter.next()
    }
    /// Byte offset (statement-relative) of the next unread char.
    fn here(&mut self, line_end: usize) -> usize {
        self.base + self.iter.peek().map_or(line_end, |(idx, _)| *idx)
    }
}

// ----------------------------------------------------------------------------
// Parser
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    pub fn parse(mut self) -> Vec<Token> {
        let line_end = self.iter.clone().last().map_or(0, |(i, c)| i + c.len_utf8());
        let mut tokens = Vec::new();
        while let Some((idx, ch0)) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            let pos = Pos {
                row: self.row,
                col: idx,
                offset: self.base + idx,
            };

            // 1. Double character token
            if let Some((_, ch1)) = self.peek_nth(1) {
                // Comment
                if ch0 == '/' && ch1 == '/' {
                    self.consume(); // consume '/'
                    self.consume(); // consume '/'
                    while let Some(_) = self.iter.next_if(|(_, c)| c.is_whitespace()) {}
                    let comment = self.iter.by_ref().map(|(_, ch)| ch).collect::<String>();
                    tokens.push(Token::new(TokenKind::Comment(comment), pos, self.base + line_end));
                    break;
                }

                if let Some(kind) = double_char_token(ch0, ch1) {
                    self.consume(); // consume
                    self.consume(); // consume second char
                    tokens.push(Token::new(kind, pos, pos.offset + 2));
                    continue;
                }

                // Negative number literal
                if ch0 == '-' && ch1.is_ascii_digit() {
                    let kind = self.parse_number();
                    tokens.push(Token::new(kind, pos, self.here(line_end)));
                    continue;
                }
            }

            // 2. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                tokens.push(Token::new(kind, pos, pos.offset + 1));
                continue;
            }

            // 3. Number literal
            if ch0.is_ascii_digit() {
                let kind = self.parse_number();
                tokens.push(Token::new(kind, pos, self.here(line_end)));
                continue;
            }

            // 4. String literal
            if ch0 == '"' {
                let kind = self.parse_text();
                tokens.push(Token::new(kind, pos, self.here(line_end)));
                continue;
            }

            // 5. Sigiled identifier: %value #attr ^block !type @symbol
            if matches!(ch0, '%' | '#' | '^' | '!' | '@') {
                let kind = self.parse_sigil(ch0);
                tokens.push(Token::new(kind, pos, self.here(line_end)));
                continue;
            }

            // 6. Bare identifier
            if ch0.is_ascii_alphabetic() || ch0 == '_' {
                let kind = self.parse_ident();
                tokens.push(Token::new(kind, pos, self.here(line_end)));
                continue;
            }

            // Error
            self.iter.next();
            tokens.push(Token::new(
                TokenKind::Error(format!("{ch0}")),
                pos,
                pos.offset + ch0.len_utf8(),
            ));
        }
        tokens
    }

    fn parse_ident(&mut self) -> TokenKind {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self.iter.next_if(|(_, ch)| is_id_char(*ch)) {
            lexeme.push(ch);
        }
        TokenKind::Ident(lexeme)
    }

    fn parse_suffix(&mut self) -> String {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self.iter.next_if(|(_, ch)| is_id_char(*ch)) {
            lexeme.push(ch);
        }
        lexeme
    }

    // %0, %arg1, %5#1, #loc3, #mhlo.TypeExt, ^bb0, !quant.uniform, @main, @"sym"
    fn parse_sigil(&mut self, sigil: char) -> TokenKind {
        self.consume();
        if sigil == '@' && matches!(self.peek_nth(0), Some((_, '"'))) {
            return match self.parse_text() {
                TokenKind::Text(s) => TokenKind::At(format!("@\"{s}\"")),
                other => other,
            };
        }

        let mut name = self.parse_suffix();
        if name.is_empty() {
            return TokenKind::Error(sigil.to_string());
        }
        let body = format!("{sigil}{name}");
        match sigil {
            '%' => {
                // Result number: %5#1
                if let (Some((_, '#')), Some((_, d))) = (self.peek_nth(0), self.peek_nth(1)) {
                    if d.is_ascii_digit() {
                        self.consume();
                        name.clear();
                        while let Some((_, ch)) = self.iter.next_if(|(_, c)| c.is_ascii_digit()) {
                            name.push(ch);
                        }
                        return TokenKind::Value(format!("{body}#{name}"));
                    }
                }
                TokenKind::Value(body)
            }
            '#' => TokenKind::Hash(body),
            '^' => TokenKind::Caret(body),
            '!' => TokenKind::Bang(body),
            _ => TokenKind::At(body),
        }
    }

    // Text: "arith.constant", "f.mlir", "\22escaped\22"
    // Escapes are kept verbatim so the text can be printed back unchanged.
    fn parse_text(&mut self) -> TokenKind {
        self.consume();

        let mut lexeme = String::new();
        let mut escape = false;
        while let Some((_, ch)) = self.consume() {
            if escape {
                lexeme.push(ch);
                escape = false;
            } else {
                match ch {
                    '"' => return TokenKind::Text(lexeme),
                    '\\' => {
                        lexeme.push(ch);
                        escape = true;
                    }
                    ch => lexeme.push(ch),
                }
            }
        }
        TokenKind::Error(format!("\"{lexeme}"))
    }

    // 42, -1, 0x1F, 1.5e-3
    fn parse_number(&mut self) -> TokenKind {
        let mut lexeme = String::new();
        if let Some((_, '-')) = self.peek_nth(0) {
            self.consume();
            lexeme.push('-');
        }

        if let (Some((_, '0')), Some((_, 'x' | 'X')), Some((_, h))) =
            (self.peek_nth(0), self.peek_nth(1), self.peek_nth(2))
        {
            if h.is_ascii_hexdigit() {
                self.consume();
                self.consume();
                lexeme.push_str("0x");
                while let Some((_, ch)) = self.iter.next_if(|(_, c)| c.is_ascii_hexdigit()) {
                    lexeme.push(ch);
                }
                return TokenKind::Number(lexeme);
            }
        }

        self.take_digits(&mut lexeme);

        // Fraction
        if let (Some((_, '.')), Some((_, d))) = (self.peek_nth(0), self.peek_nth(1)) {
            if d.is_ascii_digit() {
                self.consume();
                lexeme.push('.');
                self.take_digits(&mut lexeme);
            }
        }

        // Exponent
        if let Some((_, e @ ('e' | 'E'))) = self.peek_nth(0) {
            let sign = match self.peek_nth(1) {
                Some((_, s @ ('+' | '-'))) => Some(s),
                _ => None,
            };
            let digit_at = if sign.is_some() { 2 } else { 1 };
            if matches!(self.peek_nth(digit_at), Some((_, d)) if d.is_ascii_digit()) {
                self.consume();
                lexeme.push(e);
                if let Some(s) = sign {
                    self.consume();
                    lexeme.push(s);
                }
                self.take_digits(&mut lexeme);
            }
        }

        TokenKind::Number(lexeme)
    }

    fn take_digits(&mut self, lexeme: &mut String) {
        while let Some((_, ch)) = self.iter.next_if(|(_, c)| c.is_ascii_digit()) {
            lexeme.push(ch);
        }
    }
}

fn is_id_char(ch: char) -> bool {
    matches!(ch, '_' | '$' | '.' | '0'..='9' | 'a'..='z' | 'A'..='Z')
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('-', '>') => Some(TokenKind::Arrow),
        ('<', '{') => Some(TokenKind::LProp),
        _ => None,
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equal),
        ':' => Some(TokenKind::Colon),
        ',' => Some(TokenKind::Comma),
        '?' => Some(TokenKind::Question),
        '*' => Some(TokenKind::Star),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '{' => Some(TokenKind::LCurly),
        '}' => Some(TokenKind::RCurly),
        '<' => Some(TokenKind::LAngle),
        '>' => Some(TokenKind::RAngle),
        _ => None,
    }
}
