use crate::alias::{parse_alias_line, AliasTable};
use serde::Serialize;
use tracing::debug;

/// One complete top-level statement, possibly spanning several lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub line: usize, // 1-based line of the first physical line
    pub text: String,
    pub unterminated: bool,
}

/// Open `{`/`(` counts of a statement being collected.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Depth {
    brace: i64,
    paren: i64,
}

impl Depth {
    /// Count brackets on one physical line, ignoring those inside "..." or
    /// after a `//` comment.
    fn feed(&mut self, line: &str) {
        let mut quoted = false;
        let mut escape = false;
        let mut chars = line.chars().peekable();
        while let Some(ch) = chars.next() {
            if quoted {
                match ch {
                    _ if escape => escape = false,
                    '\\' => escape = true,
                    '"' => quoted = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => quoted = true,
                '/' if chars.peek() == Some(&'/') => break,
                '{' => self.brace += 1,
                '}' => self.brace -= 1,
                '(' => self.paren += 1,
                ')' => self.paren -= 1,
                _ => {}
            }
        }
    }

    fn is_open(&self) -> bool {
        self.brace > 0 || self.paren > 0
    }
}

/// `%name =` at the start of the trimmed line
fn is_statement_start(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('%') else {
        return false;
    };
    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    name_len > 0 && rest[name_len..].trim_start().starts_with('=')
}

/// Split raw text into statements and collect location aliases.
pub fn assemble(text: &str) -> (Vec<Statement>, AliasTable) {
    let mut aliases = AliasTable::new();
    let mut statements = Vec::new();
    let mut lines = text.split('\n').enumerate();

    while let Some((idx, raw)) = lines.next() {
        let line = raw.trim();
        if let Some((alias, target)) = parse_alias_line(line) {
            aliases.insert(alias, target);
            continue;
        }
        if !is_statement_start(line) {
            continue;
        }

        let mut body = line.to_string();
        let mut depth = Depth::default();
        depth.feed(line);
        while depth.is_open() {
            let Some((_, next)) = lines.next() else {
                break;
            };
            body.push('\n');
            // Aliases leave a blank row so rows keep matching physical lines
            if let Some((alias, target)) = parse_alias_line(next) {
                aliases.insert(alias, target);
                continue;
            }
            body.push_str(next);
            depth.feed(next);
        }

        let statement = Statement {
            line: idx + 1,
            text: body.trim().to_string(),
            unterminated: depth.is_open(),
        };
        debug!(
            line = statement.line,
            unterminated = statement.unterminated,
            "assembled statement"
        );
        statements.push(statement);
    }

    (statements, aliases)
}
