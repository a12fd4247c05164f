/*!
The top-level [`Parser`]: it owns the argument arena, the groups, and the
constraints, drives the lexer over a token list, and validates the result.
 */

use quorum_lexer::{ArgumentsParser, Markers, ValueAccess, Visitor};
use tracing::{debug, trace};

use crate::{
    constraint::Constraint,
    errors::{ParseError, Unknown},
    group::ArgumentGroup,
    help::Help,
    matcher::{Lookup, TokenMatcher},
    spec::{Alias, ArgumentSpec, Declare, SpecId, Specs, ValueId},
};

/// A handle to one of a [`Parser`]'s groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

/**
A command-line parser, assembled from declarations before use.

```
use quorum::{Parser, Switch, Value};

let mut parser = Parser::new("fetch");
let verbose = parser.add(Switch::new().short('v').long("verbose"));
let jobs = parser.add(Value::<u32>::new().short('j').placeholder("N"));
let urls = parser.add(Value::<String>::new().placeholder("URL").unbounded());

parser.parse(["-vj4", "a", "b"]).unwrap();

assert!(parser.is_set(verbose));
assert_eq!(parser.value(jobs), Some(&4));
assert_eq!(parser.values(urls), ["a", "b"]);
```
*/
#[derive(Debug)]
pub struct Parser {
    program: String,
    description: String,
    specs: Specs,
    groups: Vec<ArgumentGroup>,
    constraints: ArgumentGroup,
}

impl Parser {
    /// The group that [`add`][Parser::add] declares arguments into
    pub const ROOT: GroupId = GroupId(0);

    /// A parser using GNU-style markers: `-f`, `--name`, `--name=value`,
    /// and `--` to stop option parsing.
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_markers(program, Markers::GNU)
    }

    pub fn with_markers(program: impl Into<String>, markers: Markers<'static>) -> Self {
        Self {
            program: program.into(),
            description: String::new(),
            specs: Specs::new(markers),
            groups: vec![ArgumentGroup::new("Options")],
            constraints: ArgumentGroup::new("Constraints"),
        }
    }

    /// A paragraph shown in the help text, after the usage line
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn markers(&self) -> Markers<'static> {
        self.specs.markers()
    }

    /// Add a new, empty group. Groups are searched, validated and shown in
    /// help in the order they were added, after the root group.
    pub fn group(&mut self, name: impl Into<String>) -> GroupId {
        self.groups.push(ArgumentGroup::new(name));
        GroupId(self.groups.len() - 1)
    }

    /// Declare an argument in the root group
    pub fn add<D: Declare>(&mut self, declaration: D) -> D::Handle {
        self.add_to(Self::ROOT, declaration)
    }

    /**
    Declare an argument in the given group

    # Panics

    Panics if `group` came from a different parser and is out of range for
    this one. Nothing is declared in that case.
    */
    pub fn add_to<D: Declare>(&mut self, group: GroupId, declaration: D) -> D::Handle {
        let group = &mut self.groups[group.0];
        let handle = self.specs.declare(declaration);
        let id: SpecId = handle.into();

        group.add(&self.specs, id);
        handle
    }

    /// Declare an argument without adding it to any group. It can't be
    /// matched until it's part of one, usually through
    /// [`nest`][Parser::nest].
    pub fn declare<D: Declare>(&mut self, declaration: D) -> D::Handle {
        self.specs.declare(declaration)
    }

    /// Add another flag or name to an argument that was already declared.
    /// Usage strings already built aren't updated.
    ///
    /// # Panics
    ///
    /// Panics if `id` wasn't declared in this parser.
    pub fn add_alias(&mut self, id: impl Into<SpecId>, alias: Alias) {
        self.specs.add_alias(id, alias);
    }

    /// Add a constraint node to an ordinary group. Its arguments become
    /// lookup members of the group.
    ///
    /// # Panics
    ///
    /// Panics if `group`, or any argument in `constraint`, came from a
    /// different parser.
    pub fn nest(&mut self, group: GroupId, constraint: Constraint) {
        let node = constraint.build(&self.specs);
        self.groups[group.0].add(&self.specs, node);
    }

    /// Add a constraint to be checked after every group has been validated.
    ///
    /// # Panics
    ///
    /// Panics if any argument in `constraint` wasn't declared in this parser.
    pub fn constrain(&mut self, constraint: Constraint) {
        let node = constraint.build(&self.specs);
        trace!(usage = node.usage(), "added constraint");
        self.constraints.add(&self.specs, node);
    }

    #[inline]
    pub fn specs(&self) -> &Specs {
        &self.specs
    }

    /// # Panics
    ///
    /// Panics if `id` wasn't declared in this parser; see
    /// [`Specs::get`] for a checked lookup.
    #[inline]
    pub fn spec(&self, id: impl Into<SpecId>) -> &ArgumentSpec {
        &self.specs[id.into()]
    }

    #[inline]
    pub fn groups(&self) -> &[ArgumentGroup] {
        &self.groups
    }

    #[inline]
    pub fn constraints(&self) -> &ArgumentGroup {
        &self.constraints
    }

    /// How many times the argument was given. Panics like
    /// [`spec`][Parser::spec] on a foreign handle.
    #[inline]
    pub fn count(&self, id: impl Into<SpecId>) -> usize {
        self.spec(id).count()
    }

    /// Panics like [`spec`][Parser::spec] on a foreign handle.
    #[inline]
    pub fn is_set(&self, id: impl Into<SpecId>) -> bool {
        self.spec(id).is_set()
    }

    /// The most recent value given for the argument
    #[inline]
    pub fn value<T: 'static>(&self, id: ValueId<T>) -> Option<&T> {
        self.specs.value(id)
    }

    /// Every value given for the argument, in order
    #[inline]
    pub fn values<T: 'static>(&self, id: ValueId<T>) -> &[T] {
        self.specs.values(id)
    }

    /**
    Parse a list of tokens, which should *not* include the program name,
    then validate the result. The first error encountered is returned, and
    tokens after it are never looked at.

    Occurrence counts and values accumulate across calls; a parser is meant
    to be used for a single command line.
    */
    pub fn parse<I>(&mut self, tokens: I) -> Result<(), ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let tokens: Vec<I::Item> = tokens.into_iter().collect();
        debug!(program = %self.program, tokens = tokens.len(), "parsing");

        let markers = self.specs.markers();
        let mut lexer = ArgumentsParser::new(
            markers,
            tokens.iter().map(<I::Item as AsRef<str>>::as_ref),
        );
        let matcher = TokenMatcher::new(&self.groups);

        while let Some(outcome) = lexer.next_arg(TokenVisitor {
            specs: &mut self.specs,
            matcher,
            markers,
        }) {
            outcome.inspect_err(|error| debug!(%error, "token rejected"))?;
        }

        self.validate()?;

        debug!(program = %self.program, "parsed");
        Ok(())
    }

    /// Parse a full argument vector, where the first element is the program
    /// name.
    pub fn parse_argv<I>(&mut self, argv: I) -> Result<(), ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.parse(argv.into_iter().skip(1))
    }

    /// Validate every group in order, then the constraints. This runs at the
    /// end of [`parse`][Parser::parse].
    pub fn validate(&self) -> Result<(), ParseError> {
        self.groups
            .iter()
            .chain([&self.constraints])
            .try_for_each(|group| {
                group.validate(&self.specs).inspect_err(|error| {
                    debug!(group = group.name(), %error, "validation failed")
                })
            })
    }

    /// Help text, with descriptions on single lines
    pub fn help(&self) -> String {
        Help::new(self).to_string()
    }

    /// Help text, with descriptions wrapped to fit in `width` columns
    pub fn help_wrapped(&self, width: usize) -> String {
        Help::new(self).wrapped(width).to_string()
    }
}

/// Resolves and records each token the lexer classifies.
struct TokenVisitor<'p> {
    specs: &'p mut Specs,
    matcher: TokenMatcher<'p>,
    markers: Markers<'static>,
}

impl TokenVisitor<'_> {
    fn resolve(
        &self,
        lookup: Lookup<'_>,
        unknown: impl FnOnce() -> Unknown,
    ) -> Result<SpecId, ParseError> {
        self.matcher
            .resolve(&*self.specs, lookup)
            .ok_or_else(|| ParseError::UnknownArgument(unknown()))
    }

    /// Record an occurrence of an argument, taking a value only if it
    /// accepts one.
    fn record<'arg>(self, id: SpecId, value: impl ValueAccess<'arg>) -> Result<(), ParseError> {
        let spec = &mut self.specs[id];

        match spec.accepts_value() {
            false => spec.set(),
            true => match value.take() {
                Some(value) => spec.set_value(value),
                None => Err(spec.missing_value()),
            },
        }
    }
}

impl<'arg> Visitor<'arg> for TokenVisitor<'_> {
    type Value = Result<(), ParseError>;

    fn visit_positional(self, token: &'arg str) -> Self::Value {
        trace!(token, "positional");

        let id = self.resolve(Lookup::Positional, || Unknown::Positional(token.to_owned()))?;
        let spec = &mut self.specs[id];

        match spec.accepts_value() {
            true => spec.set_value(token),
            false => spec.set(),
        }
    }

    fn visit_named_with_value(self, name: &'arg str, value: &'arg str) -> Self::Value {
        trace!(name, value, "named with value");

        let prefix = self.markers.name_prefix();
        let id = self.resolve(Lookup::Name(name), || Unknown::Name {
            prefix,
            name: name.to_owned(),
        })?;

        self.specs[id].set_value(value)
    }

    fn visit_named(self, name: &'arg str, value: impl ValueAccess<'arg>) -> Self::Value {
        trace!(name, "named");

        let prefix = self.markers.name_prefix();
        let id = self.resolve(Lookup::Name(name), || Unknown::Name {
            prefix,
            name: name.to_owned(),
        })?;

        self.record(id, value)
    }

    fn visit_flag(self, flag: char, value: impl ValueAccess<'arg>) -> Self::Value {
        trace!(%flag, "flag");

        let prefix = self.markers.flag_prefix();
        let id = self.resolve(Lookup::Flag(flag), || Unknown::Flag { prefix, flag })?;

        self.record(id, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Switch, Value};

    #[test]
    #[should_panic]
    fn foreign_group_handles_panic() {
        let mut other = Parser::new("other");
        let foreign = other.group("Elsewhere");

        let mut parser = Parser::new("test");
        parser.add_to(foreign, Switch::new().short('x'));
    }

    #[test]
    #[should_panic]
    fn foreign_argument_handles_panic() {
        let mut other = Parser::new("other");
        other.add(Switch::new().short('a'));
        let foreign = other.add(Switch::new().short('b'));

        let parser = Parser::new("test");
        parser.count(foreign);
    }

    #[test]
    fn checked_lookup_of_foreign_handles() {
        let mut other = Parser::new("other");
        let foreign = other.add(Value::<String>::new().short('b'));

        let parser = Parser::new("test");
        assert!(parser.specs().get(foreign).is_none());
        assert_eq!(parser.value(foreign), None);
        assert!(parser.values(foreign).is_empty());
    }

    #[test]
    fn groups_are_searched_in_order() {
        let mut parser = Parser::new("test");
        let extra = parser.group("Extra");
        let first = parser.add(Switch::new().short('x'));
        let second = parser.add_to(extra, Switch::new().short('x').max(2));

        parser.parse(["-xxx"]).unwrap();

        assert_eq!(parser.count(first), 1);
        assert_eq!(parser.count(second), 2);
    }

    #[test]
    fn argv_skips_program_name() {
        let mut parser = Parser::new("test");
        let input = parser.add(Value::<String>::new().placeholder("INPUT"));

        parser.parse_argv(["test", "file.txt"]).unwrap();
        assert_eq!(parser.value(input).map(String::as_str), Some("file.txt"));
    }

    #[test]
    fn errors_stop_the_parse() {
        let mut parser = Parser::new("test");
        let a = parser.add(Switch::new().short('a'));
        let b = parser.add(Switch::new().short('b'));

        assert_eq!(
            parser.parse(["-a", "-z", "-b"]),
            Err(ParseError::UnknownArgument(Unknown::Flag {
                prefix: "-",
                flag: 'z'
            }))
        );

        assert!(parser.is_set(a));
        assert!(!parser.is_set(b));
    }

    #[test]
    fn nested_constraint_arguments_are_lookup_members() {
        let mut parser = Parser::new("test");
        let output = parser.group("Output");

        let json = parser.declare(Switch::new().long("json"));
        let yaml = parser.declare(Switch::new().long("yaml"));
        parser.nest(output, Constraint::exactly_one_of().arg(json).arg(yaml));

        parser.parse(["--yaml"]).unwrap();
        assert!(parser.is_set(yaml));
        assert_eq!(parser.groups()[1].usage(), "([ --json ] | [ --yaml ])");
    }
}
