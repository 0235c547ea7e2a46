use crate::nodes::Kind;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("could not parse: input is not valid UTF-8 ({0})")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("could not parse: {0}")]
    Internal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("macro name {0:?} contains whitespace")]
    MacroName(String),
    #[error("list item expected, found {0:?}")]
    ListItemExpected(Kind),
    #[error("{0:?} cannot be written outside its container")]
    Detached(Kind),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
