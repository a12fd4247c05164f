/*!
The diagnostics produced by [`Parser::parse`][crate::Parser::parse]. Every
failure is fatal to the parse that produced it; the first one detected is the
one returned.
 */

use core::fmt::{self, Display};

use joinery::JoinableIterator;
use lazy_format::lazy_format;

use crate::constraint::Combinator;

/// A token that didn't resolve to any declared argument, exactly as we found
/// it on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unknown {
    /// A single character out of a flag cluster
    Flag { prefix: &'static str, flag: char },

    /// A name, without any attached value
    Name { prefix: &'static str, name: String },

    /// A positional token that no positional argument could take
    Positional(String),
}

impl Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unknown::Flag { prefix, flag } => write!(f, "option {prefix}{flag}"),
            Unknown::Name { prefix, name } => write!(f, "option {prefix}{name}"),
            Unknown::Positional(token) => write!(f, "positional argument {token:?}"),
        }
    }
}

/// Everything that can go wrong while parsing. Arguments are always named by
/// their primary identifier (`--name`, `-f`, or a positional placeholder).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A flag, name, or positional token didn't match any argument
    #[error("unrecognized {0}")]
    UnknownArgument(Unknown),

    /// After parsing, an argument's occurrence count violated its bounds
    #[error("{}", count_mismatch(argument, *count, *min, *max))]
    CountMismatch {
        argument: String,
        count: usize,
        min: usize,
        max: usize,
    },

    /// A value couldn't be converted, or was rejected by a check callback
    #[error("{}", invalid_value(argument, value.as_deref(), message))]
    InvalidValue {
        argument: String,
        value: Option<String>,
        message: String,
    },

    /// The argument needs a value, and the input ran out before one was given
    #[error("{argument} requires a value")]
    MissingValue { argument: String },

    /// The argument doesn't take a value, and one was attached to it
    #[error("{argument} doesn't take a value (got {value:?})")]
    NoValue { argument: String, value: String },

    /// A constraint between arguments wasn't satisfied. `arguments` lists the
    /// arguments (or nested constraints) responsible.
    #[error("{}", violation(*kind, arguments))]
    ConstraintViolation {
        kind: Combinator,
        arguments: Vec<String>,
    },
}

impl ParseError {
    /// The identifier of the argument this error is about, if it's about a
    /// single declared argument.
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::CountMismatch { argument, .. }
            | Self::InvalidValue { argument, .. }
            | Self::MissingValue { argument }
            | Self::NoValue { argument, .. } => Some(argument),
            Self::UnknownArgument(_) | Self::ConstraintViolation { .. } => None,
        }
    }
}

fn count_mismatch(argument: &str, count: usize, min: usize, max: usize) -> impl Display {
    lazy_format!(match ((count == 0, count < min)) {
        (true, _) => "required argument {argument} was omitted",
        (false, true) => "{argument} must appear at least {min} times (got {count})",
        (false, false) => "{argument} may appear at most {max} times (got {count})",
    })
}

fn invalid_value(argument: &str, value: Option<&str>, message: &str) -> impl Display {
    lazy_format!(match (value) {
        Some(value) => "invalid value {value:?} for {argument}: {message}",
        None => "{argument} was rejected: {message}",
    })
}

fn violation(kind: Combinator, arguments: &[String]) -> impl Display {
    let list = arguments.iter().join_with(", ");

    lazy_format!(match (kind) {
        Combinator::NoneOf => "none of these may be given: {list}",
        Combinator::ExactlyOneOf => "exactly one of these must be given: {list}",
        Combinator::AnyRequiredOf => "missing required arguments: {list}",
        Combinator::AllOf => "these must be given together, missing: {list}",
        Combinator::Implies => (
            "{first} requires {second}",
            first = arguments.first().map(String::as_str).unwrap_or_default(),
            second = arguments.get(1).map(String::as_str).unwrap_or_default(),
        ),
    })
}
