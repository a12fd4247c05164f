use std::ffi::OsString;

use crate::{errors::ParseError, parser::Parser};

/// Helper type for loading arguments from the environment.
///
/// This provides a convenient owned container for args retrieved from
/// [`std::env`], which a [`Parser`] can then borrow from. Arguments that
/// aren't valid UTF-8 are converted lossily.
#[derive(Debug, Clone)]
pub struct LoadedArguments {
    arguments: Vec<String>,
}

impl LoadedArguments {
    pub fn from_env() -> Self {
        Self::new(std::env::args_os())
    }

    /// Load from any argument vector, where the first element is the
    /// program name.
    pub fn new(arguments: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        Self {
            arguments: arguments
                .into_iter()
                .map(|argument| argument.into().to_string_lossy().into_owned())
                .collect(),
        }
    }

    /// The program name, or an empty string if the argument vector was empty
    pub fn argv0(&self) -> &str {
        self.arguments.first().map(String::as_str).unwrap_or_default()
    }

    /// Every argument after the program name
    pub fn tokens(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or_default()
    }

    pub fn parse_into(&self, parser: &mut Parser) -> Result<(), ParseError> {
        parser.parse(self.tokens())
    }
}
