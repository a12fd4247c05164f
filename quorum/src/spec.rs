/*!
Argument declarations and the arena that owns their parse state.

Every declared argument lives in exactly one [`Specs`] arena and is referred
to everywhere else (groups, constraint trees, the matcher) by a copyable
[`SpecId`]. Inserting the same argument into several groups or constraints
only copies the handle, so one matched token updates a single occurrence
counter that every view of that argument observes.
 */

use core::{
    fmt::{self, Display},
    marker::PhantomData,
    ops::{Index, IndexMut},
};

use joinery::JoinableIterator;
use lazy_format::lazy_format;
use quorum_lexer::Markers;
use tracing::trace;

use crate::{
    Requirement,
    errors::ParseError,
    matcher::Lookup,
    parameter::{self, ParseFn, ParsedValue, TypedSlot, ValueSlot},
};

/// A handle to an argument in a [`Specs`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecId(usize);

impl SpecId {
    /// Position of the argument in declaration order
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A handle to a value-bearing argument whose values are of type `T`.
pub struct ValueId<T> {
    id: SpecId,
    phantom: PhantomData<fn() -> T>,
}

impl<T> ValueId<T> {
    #[inline]
    #[must_use]
    pub const fn id(self) -> SpecId {
        self.id
    }
}

impl<T> Copy for ValueId<T> {}

impl<T> Clone for ValueId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for ValueId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ValueId<T> {}

impl<T> fmt::Debug for ValueId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueId").field(&self.id.0).finish()
    }
}

impl<T> From<ValueId<T>> for SpecId {
    #[inline]
    fn from(id: ValueId<T>) -> Self {
        id.id
    }
}

/// An alias that can be added to an argument after it was declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alias {
    /// A single-character flag, like the `v` in `-v`
    Flag(char),

    /// A multi-character name, like the `verbose` in `--verbose`
    Name(String),
}

/// Callback run on every occurrence of an argument, before it is recorded.
/// It receives the raw value (or `None` for a switch); an `Err` rejects the
/// occurrence with an [`InvalidValue`][ParseError::InvalidValue] error.
pub type Check = Box<dyn Fn(Option<&str>) -> Result<(), String>>;

pub(crate) enum Payload {
    Switch,
    Value(Box<dyn ValueSlot>),

    /// Takes no value on the command line; every occurrence stores a preset
    /// constant instead
    Const(Box<dyn ValueSlot>),
}

/**
A single declared argument: its aliases, its occurrence bounds, and its parse
state (the occurrence count, and the parsed values for value-bearing
arguments).

An argument declared without any alias is *positional*, and is matched by
order rather than by a prefixed token. Occurrence bounds are `min..=max`, with
a `max` of 0 meaning unbounded; they only apply when the argument is given at
all, unless it's also required.
*/
pub struct ArgumentSpec {
    flags: Vec<char>,
    names: Vec<String>,
    positional: bool,
    min: usize,
    max: usize,
    requirement: Requirement,
    count: usize,
    description: String,
    placeholder: String,
    check: Option<Check>,
    payload: Payload,
    markers: Markers<'static>,
}

impl ArgumentSpec {
    fn new(payload: Payload) -> Self {
        Self {
            flags: Vec::new(),
            names: Vec::new(),
            positional: false,
            min: 1,
            max: 1,
            requirement: Requirement::Optional,
            count: 0,
            description: String::new(),
            placeholder: String::from("VALUE"),
            check: None,
            payload,
            markers: Markers::GNU,
        }
    }

    #[inline]
    pub fn flags(&self) -> &[char] {
        &self.flags
    }

    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    #[inline]
    pub fn min(&self) -> usize {
        self.min
    }

    /// The maximum number of occurrences, or 0 if unbounded
    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.count > 0
    }

    #[inline]
    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.requirement == Requirement::Mandatory
    }

    #[inline]
    pub fn accepts_value(&self) -> bool {
        matches!(self.payload, Payload::Value(_))
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// True if this argument answers to the given flag, name, or (for
    /// positional arguments) positional lookup.
    pub fn matches(&self, lookup: Lookup<'_>) -> bool {
        match lookup {
            Lookup::Flag(flag) => self.flags.contains(&flag),
            Lookup::Name(name) => self.names.iter().any(|candidate| candidate == name),
            Lookup::Positional => self.positional,
        }
    }

    /// True if another occurrence would still be within `max`
    #[inline]
    pub fn can_accept(&self) -> bool {
        self.max == 0 || self.count < self.max
    }

    /// The primary identifier: the first flag, else the first name, else the
    /// placeholder, rendered with its prefix.
    pub fn identifier(&self) -> impl Display + '_ {
        lazy_format!(match ((self.flags.first(), self.names.first())) {
            (Some(flag), _) => ("{prefix}{flag}", prefix = self.markers.flag_prefix()),
            (None, Some(name)) => ("{prefix}{name}", prefix = self.markers.name_prefix()),
            (None, None) => ("{placeholder}", placeholder = self.placeholder),
        })
    }

    /// Every alias, for help listings: `-o, --output <FILE>`
    pub fn tags(&self) -> String {
        let aliases: Vec<String> = self
            .flags
            .iter()
            .map(|flag| format!("{}{flag}", self.markers.flag_prefix()))
            .chain(
                self.names
                    .iter()
                    .map(|name| format!("{}{name}", self.markers.name_prefix())),
            )
            .collect();

        match (aliases.is_empty(), self.accepts_value()) {
            (true, _) => self.placeholder.clone(),
            (false, true) => format!("{} <{}>", aliases.iter().join_with(", "), self.placeholder),
            (false, false) => aliases.iter().join_with(", ").to_string(),
        }
    }

    /// Record an occurrence of a switch. A [`Const`] argument also stores its
    /// constant, following the same overwrite rule as
    /// [`set_value`][Self::set_value].
    pub fn set(&mut self) -> Result<(), ParseError> {
        if self.accepts_value() {
            return Err(self.missing_value());
        }

        self.run_check(None)?;

        let overwrite = self.max == 1;
        let stored = match &mut self.payload {
            Payload::Const(slot) => slot.accept("", overwrite),
            Payload::Switch | Payload::Value(_) => Ok(()),
        };
        stored.map_err(|message| self.invalid_value(None, message))?;

        self.count += 1;

        trace!(argument = %self.identifier(), count = self.count, "set");
        Ok(())
    }

    /// Record an occurrence of a value-bearing argument. The value is
    /// converted first; if conversion fails, nothing is recorded. Arguments
    /// with a `max` of exactly 1 keep only their latest value, everything
    /// else collects values in order.
    pub fn set_value(&mut self, raw: &str) -> Result<(), ParseError> {
        if !self.accepts_value() {
            return Err(ParseError::NoValue {
                argument: self.identifier().to_string(),
                value: raw.to_owned(),
            });
        }

        self.run_check(Some(raw))?;

        let overwrite = self.max == 1;
        let accepted = match &mut self.payload {
            Payload::Value(slot) => slot.accept(raw, overwrite),
            Payload::Switch | Payload::Const(_) => Ok(()),
        };

        match accepted {
            Err(message) => Err(self.invalid_value(Some(raw), message)),
            Ok(()) => {
                self.count += 1;

                trace!(argument = %self.identifier(), count = self.count, value = raw, "set");
                Ok(())
            }
        }
    }

    /// Check the final occurrence count against `required`, `min` and `max`.
    pub fn validate(&self) -> Result<(), ParseError> {
        let count = self.count;
        let omitted = count == 0 && self.is_required();
        let too_few = count > 0 && count < self.min;
        let too_many = self.max != 0 && count > self.max;

        match omitted || too_few || too_many {
            false => Ok(()),
            true => Err(ParseError::CountMismatch {
                argument: self.identifier().to_string(),
                count,
                min: self.min,
                max: self.max,
            }),
        }
    }

    pub(crate) fn missing_value(&self) -> ParseError {
        ParseError::MissingValue {
            argument: self.identifier().to_string(),
        }
    }

    pub(crate) fn slot<T: 'static>(&self) -> Option<&TypedSlot<T>> {
        match self.payload {
            Payload::Value(ref slot) | Payload::Const(ref slot) => slot.as_any().downcast_ref(),
            Payload::Switch => None,
        }
    }

    fn run_check(&self, raw: Option<&str>) -> Result<(), ParseError> {
        match self.check {
            None => Ok(()),
            Some(ref check) => check(raw).map_err(|message| self.invalid_value(raw, message)),
        }
    }

    fn invalid_value(&self, raw: Option<&str>, message: String) -> ParseError {
        ParseError::InvalidValue {
            argument: self.identifier().to_string(),
            value: raw.map(str::to_owned),
            message,
        }
    }

    fn add_flag(&mut self, flag: char) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    fn add_name(&mut self, name: String) {
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    fn set_min(&mut self, min: usize) {
        self.min = min.max(1);

        if self.max != 0 && self.min > self.max {
            self.max = self.min;
        }
    }

    fn set_max(&mut self, max: usize) {
        self.max = max;

        if max != 0 && max < self.min {
            self.min = max;
        }
    }
}

impl fmt::Debug for ArgumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSpec")
            .field("flags", &self.flags)
            .field("names", &self.names)
            .field("positional", &self.positional)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("requirement", &self.requirement)
            .field("count", &self.count)
            .field("accepts_value", &self.accepts_value())
            .finish_non_exhaustive()
    }
}

/// Something that can be declared in a [`Specs`] arena: a [`Switch`], a
/// [`Value`], or a [`Const`].
pub trait Declare {
    /// The handle returned from declaring this argument
    type Handle: Copy + Into<SpecId>;

    fn into_spec(self) -> ArgumentSpec;

    fn handle(id: SpecId) -> Self::Handle;
}

macro_rules! declaration_methods {
    () => {
        /// Add a single-character flag, such as `-v`. Arguments without any
        /// flag or name are positional.
        pub fn short(mut self, flag: char) -> Self {
            self.spec.add_flag(flag);
            self
        }

        /// Add a multi-character name, such as `--verbose`
        pub fn long(mut self, name: impl Into<String>) -> Self {
            self.spec.add_name(name.into());
            self
        }

        pub fn help(mut self, description: impl Into<String>) -> Self {
            self.spec.description = description.into();
            self
        }

        /// The placeholder used for the value in help text, and as the
        /// identifier of a positional argument
        pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
            self.spec.placeholder = placeholder.into();
            self
        }

        pub fn required(mut self) -> Self {
            self.spec.requirement = Requirement::Mandatory;
            self
        }

        /// Minimum number of occurrences, when the argument is present at
        /// all. Clamped to at least 1; raises `max` if needed.
        pub fn min(mut self, min: usize) -> Self {
            self.spec.set_min(min);
            self
        }

        /// Maximum number of occurrences, or 0 for unbounded. Lowers `min` if
        /// needed.
        pub fn max(mut self, max: usize) -> Self {
            self.spec.set_max(max);
            self
        }

        pub fn unbounded(self) -> Self {
            self.max(0)
        }

        /// Run `check` on every occurrence before it's recorded
        pub fn check(
            mut self,
            check: impl Fn(Option<&str>) -> Result<(), String> + 'static,
        ) -> Self {
            self.spec.check = Some(Box::new(check));
            self
        }
    };
}

/// Declaration of an argument that takes no value, like `--verbose`.
#[derive(Debug)]
pub struct Switch {
    spec: ArgumentSpec,
}

impl Switch {
    pub fn new() -> Self {
        Self {
            spec: ArgumentSpec::new(Payload::Switch),
        }
    }

    declaration_methods!();
}

impl Default for Switch {
    fn default() -> Self {
        Self::new()
    }
}

impl Declare for Switch {
    type Handle = SpecId;

    fn into_spec(self) -> ArgumentSpec {
        self.spec
    }

    fn handle(id: SpecId) -> SpecId {
        id
    }
}

/// Declaration of an argument that takes a value of type `T`, like
/// `--output FILE`, or a positional argument.
pub struct Value<T> {
    spec: ArgumentSpec,
    parse: ParseFn<T>,
    default: Option<T>,
}

impl<T: 'static> Value<T> {
    /// A value parsed with `T`'s [`FromStr`][core::str::FromStr]
    /// implementation
    pub fn new() -> Self
    where
        T: ParsedValue,
        T::Err: Display + 'static,
    {
        Self::from_parse_fn(parameter::from_str())
    }

    /// A value parsed with an arbitrary function
    pub fn with_parser<E>(parse: impl Fn(&str) -> Result<T, E> + 'static) -> Self
    where
        E: Display + 'static,
    {
        Self::from_parse_fn(parameter::parse_fn(parse))
    }

    fn from_parse_fn(parse: ParseFn<T>) -> Self {
        Self {
            // The real payload is built in `into_spec`, once the parse function
            // and default are final
            spec: ArgumentSpec::new(Payload::Switch),
            parse,
            default: None,
        }
    }

    /// The value reported by [`Specs::value`] and [`Specs::values`] when the
    /// argument isn't given. It doesn't count as an occurrence: the argument
    /// is still unset, and a required argument is still missing.
    pub fn default_value(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    /// Run `check` on every parsed value before it's stored. A rejection is
    /// reported like a failed conversion, and the occurrence isn't counted.
    /// Unlike [`check`][Self::check], this sees the converted value.
    pub fn check_value<E>(mut self, check: impl Fn(&T) -> Result<(), E> + 'static) -> Self
    where
        E: Display + 'static,
    {
        self.parse = parameter::checked(self.parse, check);
        self
    }

    declaration_methods!();
}

impl<T: fmt::Debug> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("spec", &self.spec)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

impl<T> Default for Value<T>
where
    T: ParsedValue + 'static,
    T::Err: Display + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Declare for Value<T> {
    type Handle = ValueId<T>;

    fn into_spec(self) -> ArgumentSpec {
        let mut spec = self.spec;
        spec.payload = Payload::Value(Box::new(TypedSlot::new(self.parse, self.default)));
        spec
    }

    fn handle(id: SpecId) -> ValueId<T> {
        ValueId {
            id,
            phantom: PhantomData,
        }
    }
}

/**
Declaration of an argument that takes no value on the command line, but
stores a preset constant each time it's given, like a `--json` switch that
selects `Format::Json`. Several constants can share a value type, and each
one is read back through its own [`ValueId`].

```
use quorum::{Const, Parser};

let mut parser = Parser::new("example");
let level = parser.add(Const::new(3u8).short('v').help("Be verbose"));

assert_eq!(parser.value(level), None);
parser.parse(["-v"]).unwrap();
assert_eq!(parser.value(level), Some(&3));
```
*/
#[derive(Debug)]
pub struct Const<T> {
    spec: ArgumentSpec,
    phantom: PhantomData<fn() -> T>,
}

impl<T: Clone + 'static> Const<T> {
    pub fn new(value: T) -> Self {
        let slot = TypedSlot::new(parameter::constant(value), None);

        Self {
            spec: ArgumentSpec::new(Payload::Const(Box::new(slot))),
            phantom: PhantomData,
        }
    }

    declaration_methods!();
}

impl<T: 'static> Declare for Const<T> {
    type Handle = ValueId<T>;

    fn into_spec(self) -> ArgumentSpec {
        self.spec
    }

    fn handle(id: SpecId) -> ValueId<T> {
        ValueId {
            id,
            phantom: PhantomData,
        }
    }
}

/**
The arena that owns every declared argument.

Indexing with a [`SpecId`] panics if the handle came from a different arena
and is out of range for this one; [`get`][Specs::get], [`value`][Specs::value]
and [`values`][Specs::values] never do. Handles from another arena that happen
to be in range silently refer to whatever argument has that position here.
*/
#[derive(Debug)]
pub struct Specs {
    markers: Markers<'static>,
    specs: Vec<ArgumentSpec>,
}

impl Specs {
    pub fn new(markers: Markers<'static>) -> Self {
        Self {
            markers,
            specs: Vec::new(),
        }
    }

    #[inline]
    pub fn markers(&self) -> Markers<'static> {
        self.markers
    }

    /// Add a new argument. It is positional if it was declared without any
    /// flag or name.
    pub fn declare<D: Declare>(&mut self, declaration: D) -> D::Handle {
        let mut spec = declaration.into_spec();
        spec.positional = spec.flags.is_empty() && spec.names.is_empty();
        spec.markers = self.markers;

        let id = SpecId(self.specs.len());
        trace!(
            index = id.0,
            argument = %spec.identifier(),
            positional = spec.positional,
            "declared argument"
        );

        self.specs.push(spec);
        D::handle(id)
    }

    /// Add an alias to an argument that was already declared. A positional
    /// argument stays matchable by position.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different arena and is out of range here.
    pub fn add_alias(&mut self, id: impl Into<SpecId>, alias: Alias) {
        let spec = &mut self[id.into()];

        match alias {
            Alias::Flag(flag) => spec.add_flag(flag),
            Alias::Name(name) => spec.add_name(name),
        }
    }

    pub fn get(&self, id: impl Into<SpecId>) -> Option<&ArgumentSpec> {
        self.specs.get(id.into().0)
    }

    /// The most recent value given for this argument
    pub fn value<T: 'static>(&self, id: ValueId<T>) -> Option<&T> {
        self.values(id).last()
    }

    /// Every value given for this argument, in order
    pub fn values<T: 'static>(&self, id: ValueId<T>) -> &[T] {
        self.get(id)
            .and_then(|spec| spec.slot::<T>())
            .map(TypedSlot::values)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpecId, &ArgumentSpec)> {
        self.specs
            .iter()
            .enumerate()
            .map(|(index, spec)| (SpecId(index), spec))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for Specs {
    fn default() -> Self {
        Self::new(Markers::GNU)
    }
}

impl Index<SpecId> for Specs {
    type Output = ArgumentSpec;

    #[inline]
    fn index(&self, id: SpecId) -> &ArgumentSpec {
        &self.specs[id.0]
    }
}

impl IndexMut<SpecId> for Specs {
    #[inline]
    fn index_mut(&mut self, id: SpecId) -> &mut ArgumentSpec {
        &mut self.specs[id.0]
    }
}
