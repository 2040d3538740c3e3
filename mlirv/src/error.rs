use crate::msg::Msg;
use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read config: {0}")]
    Config(String, #[source] serde_yaml::Error),

    #[error("Failed to dump program")]
    Dump(#[source] serde_yaml::Error),
}

impl Error {
    /// Print the error and its cause
    pub fn print(&self) {
        Msg::Error(self.to_string()).print();
        if let Some(source) = std::error::Error::source(self) {
            cprintln!("      <blue>=</> {}", source);
        }
    }
}
