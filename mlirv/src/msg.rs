use color_print::cprintln;

#[derive(Debug)]
pub enum Msg {
    Error(String),
    Warn(String),
    Note(String),
}

impl Msg {
    fn head(&self) {
        match self {
            Msg::Error(msg) => cprintln!("<red,bold>error</>: {}", msg),
            Msg::Warn(msg) => cprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cprintln!("<green,bold>note</>: {}", msg),
        }
    }

    pub fn print(&self) {
        self.head();
    }

    /// Message pointing at `line` (1-based) of `file`, with a caret under `col`.
    pub fn diag(&self, info: (&str, usize, &str), col: Option<usize>) {
        let (file, line, raw) = info;
        self.head();
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", line, raw);
        match col {
            Some(col) => cprintln!("      <blue>|</> {}<red,bold>^</>", " ".repeat(col)),
            None => cprintln!("      <blue>|</>"),
        }
    }
}
