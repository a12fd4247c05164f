#![cfg_attr(not(test), no_std)]

/*!
Low-level tokenizing of command-line arguments. Takes care of distinctions
between flags, names, positionals and the stop marker, and of working out
where a value comes from. No type handling or argument lookup happens here;
usually this is too low level to use directly.
*/

mod markers;
mod populated;

pub use markers::{EmptyMarker, Markers};

use populated::PopulatedStr;

/**
The [`ArgumentsParser`] type operates by passing the tokens it classifies into
a [`Visitor`], to be handled.
 */
pub trait Visitor<'arg> {
    type Value;

    /// A positional token, or any token after the stop marker
    fn visit_positional(self, token: &'arg str) -> Self::Value;

    /// A name that definitely has a value, because it was given as
    /// `--name=value`
    fn visit_named_with_value(self, name: &'arg str, value: &'arg str) -> Self::Value;

    /// A name without an attached value, such as `--name`
    fn visit_named(self, name: &'arg str, value: impl ValueAccess<'arg>) -> Self::Value;

    /// A single flag character out of a cluster, such as the `b` in `-abc`
    fn visit_flag(self, flag: char, value: impl ValueAccess<'arg>) -> Self::Value;
}

/**
[`ValueAccess`] allows a visitor to decide if a given argument needs a value,
based on the identity of the flag or name.

Consider `--foo bar`. Is this a pair of arguments (the name `--foo` and the
positional `bar`) or a single name that takes a value? Similarly, `-ab foo`
could be `-a b`, `foo`; or `-a`, `-b foo`; or `-a`, `-b`, `foo`. The
[`ArgumentsParser`] can't independently classify a given token, so instead, a
visitor can request a value via this trait only for arguments that need one,
and the [`ArgumentsParser`] takes care of actually determining where that value
comes from.
*/
pub trait ValueAccess<'arg>: Sized {
    /**
    Get a value from the parser. This should only be called by arguments that
    need it; plain flags should simply ignore it, to ensure that the rest of a
    flag cluster, or the next token, is classified independently.

    For a flag in the middle of a cluster, the value is the remainder of that
    cluster (`-ovalue`). Otherwise it's the next token, taken verbatim. This
    returns [`None`] if all of the tokens have been exhausted.
    */
    fn take(self) -> Option<&'arg str>;
}

#[derive(Debug, Clone, Copy)]
enum State<'arg> {
    Ready,
    PositionalOnly,
    ClusterInProgress(PopulatedStr<'arg>),
}

/**
An `ArgumentsParser` is the main entry point into `quorum_lexer`. It classifies
one token (or one flag out of a cluster) in each call to `next_arg`, sending
the result to the given [`Visitor`].

It operates entirely on borrowed data, because we assume that command-line
arguments can be loaded early on in `main` and then handled in a borrowed form
for the rest of the program. The ubiquitous `'arg` lifetime refers to this
borrowed command line data.
*/
#[derive(Debug, Clone)]
pub struct ArgumentsParser<'m, 'arg, I> {
    markers: Markers<'m>,
    state: State<'arg>,
    tokens: I,
}

impl<'m, 'arg, I> ArgumentsParser<'m, 'arg, I>
where
    I: Iterator<Item = &'arg str>,
{
    /**
    Create a new [`ArgumentsParser`] from an iterator of tokens, where each
    token is a single argument received from the command line. This list
    should *exclude* the name of the program, which is commonly passed as the
    first argument in the list.
     */
    #[inline]
    #[must_use]
    pub fn new(markers: Markers<'m>, tokens: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            markers,
            state: State::Ready,
            tokens: tokens.into_iter(),
        }
    }

    /// True once the stop marker has been seen
    #[inline]
    #[must_use]
    pub fn positional_only(&self) -> bool {
        matches!(self.state, State::PositionalOnly)
    }

    /// Put `self` into a `PositionalOnly` state, then process a positional
    /// token
    #[inline]
    fn positional_only_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        debug_assert!(!matches!(self.state, State::ClusterInProgress(_)));

        self.state = State::PositionalOnly;
        self.tokens
            .next()
            .map(|token| visitor.visit_positional(token))
    }

    /// Put `self` into a `Ready` state, then return a StandardValueAccess
    #[inline]
    fn standard_value(&mut self) -> StandardValueAccess<'_, 'm, 'arg, I> {
        debug_assert!(!matches!(self.state, State::PositionalOnly));

        self.state = State::Ready;
        StandardValueAccess { parent: self }
    }

    /// Put `self` into a `ClusterInProgress` state, then return a
    /// ClusterValueAccess.
    #[inline]
    fn cluster_value(&mut self, rest: PopulatedStr<'arg>) -> ClusterValueAccess<'_, 'arg> {
        debug_assert!(!matches!(self.state, State::PositionalOnly));

        self.state = State::ClusterInProgress(rest);
        ClusterValueAccess {
            rest: rest.get(),
            state: &mut self.state,
        }
    }

    /// Handle one flag out of a cluster. If there is remaining content in the
    /// cluster, it's a candidate for the value; otherwise, the next token is
    /// the candidate.
    #[inline]
    fn handle_flag<V>(&mut self, cluster: PopulatedStr<'arg>, visitor: V) -> V::Value
    where
        V: Visitor<'arg>,
    {
        let (flag, rest) = cluster.split_first();

        match PopulatedStr::new(rest) {
            None => visitor.visit_flag(flag, self.standard_value()),
            Some(rest) => visitor.visit_flag(flag, self.cluster_value(rest)),
        }
    }

    fn classify<V>(&mut self, token: &'arg str, visitor: V) -> V::Value
    where
        V: Visitor<'arg>,
    {
        let markers = self.markers;

        if let Some(name) = token.strip_prefix(markers.name_prefix())
            && !name.is_empty()
        {
            return match split_delimited(name, markers.delimiter()) {
                Some((name, value)) => visitor.visit_named_with_value(name, value),
                None => visitor.visit_named(name, self.standard_value()),
            };
        }

        match token
            .strip_prefix(markers.flag_prefix())
            .and_then(PopulatedStr::new)
        {
            Some(cluster) => self.handle_flag(cluster, visitor),
            None => visitor.visit_positional(token),
        }
    }

    pub fn next_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        match self.state {
            State::Ready => match self.tokens.next()? {
                token if token == self.markers.stop() => self.positional_only_arg(visitor),
                token => Some(self.classify(token, visitor)),
            },
            State::PositionalOnly => self.positional_only_arg(visitor),
            State::ClusterInProgress(cluster) => Some(self.handle_flag(cluster, visitor)),
        }
    }
}

/// ValueAccess implementation that gets the next token from the list.
struct StandardValueAccess<'a, 'm, 'arg, I> {
    parent: &'a mut ArgumentsParser<'m, 'arg, I>,
}

impl<'arg, I> ValueAccess<'arg> for StandardValueAccess<'_, '_, 'arg, I>
where
    I: Iterator<Item = &'arg str>,
{
    fn take(self) -> Option<&'arg str> {
        self.parent.tokens.next()
    }
}

/// ValueAccess implementation that gets the remainder of a flag cluster.
/// Handles things like `-ovalue`, which is equivalent to `-o value`.
struct ClusterValueAccess<'a, 'arg> {
    rest: &'arg str,
    state: &'a mut State<'arg>,
}

impl<'arg> ValueAccess<'arg> for ClusterValueAccess<'_, 'arg> {
    fn take(self) -> Option<&'arg str> {
        debug_assert!(
            matches!(*self.state, State::ClusterInProgress(rest) if rest.get() == self.rest)
        );

        *self.state = State::Ready;
        Some(self.rest)
    }
}

/// Split `name=value` at the first delimiter. A delimiter at the very start
/// of the name is part of the name.
fn split_delimited<'a>(name: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let skip = name.chars().next()?.len_utf8();

    memchr::memmem::find(&name.as_bytes()[skip..], delimiter.as_bytes())
        .map(|i| i + skip)
        .map(|i| (&name[..i], &name[i + delimiter.len()..]))
}
