/*!
String-to-value conversion for arguments that take values.

Conversion is a pluggable function from `&str` to `T`. Types with a [`FromStr`]
implementation can opt in through [`ParsedValue`]; anything else can be handed
an arbitrary parse function with [`Value::with_parser`][crate::Value::with_parser].
 */

use core::{any::Any, fmt::Display, str::FromStr};

/// For types with a [`FromStr`] implementation, [`ParsedValue`] automatically
/// makes them usable with [`Value::new`][crate::Value::new], parsing each
/// value with [`str::parse`].
pub trait ParsedValue: FromStr {}

pub(crate) type ParseFn<T> = Box<dyn Fn(&str) -> Result<T, String>>;

/// Wrap a parse function with a displayable error into one that reports its
/// failure as a message.
pub(crate) fn parse_fn<T, E>(parse: impl Fn(&str) -> Result<T, E> + 'static) -> ParseFn<T>
where
    T: 'static,
    E: Display + 'static,
{
    Box::new(move |raw| parse(raw).map_err(|err| err.to_string()))
}

/// Run `check` on every successfully parsed value; a rejection fails the
/// whole conversion.
pub(crate) fn checked<T, E>(
    parse: ParseFn<T>,
    check: impl Fn(&T) -> Result<(), E> + 'static,
) -> ParseFn<T>
where
    T: 'static,
    E: Display + 'static,
{
    Box::new(move |raw| {
        let value = parse(raw)?;
        check(&value).map_err(|err| err.to_string())?;
        Ok(value)
    })
}

/// A parse function that ignores its input and always produces `value`
pub(crate) fn constant<T: Clone + 'static>(value: T) -> ParseFn<T> {
    Box::new(move |_| Ok(value.clone()))
}

pub(crate) fn from_str<T>() -> ParseFn<T>
where
    T: ParsedValue + 'static,
    T::Err: Display + 'static,
{
    parse_fn(str::parse::<T>)
}

/**
The storage cell behind a value-bearing argument. It owns the parse function,
every value parsed so far, and the default reported when nothing was parsed,
type-erased so that arguments of different types can live in the same arena.
*/
pub(crate) trait ValueSlot {
    /// Parse `raw` and store it. When `overwrite` is set, the new value
    /// replaces any earlier one; otherwise it is appended. Nothing is stored
    /// if parsing fails.
    fn accept(&mut self, raw: &str, overwrite: bool) -> Result<(), String>;

    fn as_any(&self) -> &dyn Any;
}

pub(crate) struct TypedSlot<T> {
    parse: ParseFn<T>,
    values: Vec<T>,
    default: Option<T>,
}

impl<T> TypedSlot<T> {
    pub fn new(parse: ParseFn<T>, default: Option<T>) -> Self {
        Self {
            parse,
            values: Vec::new(),
            default,
        }
    }

    /// The parsed values, or the default if nothing was parsed yet
    pub fn values(&self) -> &[T] {
        match self.values.is_empty() {
            true => self.default.as_slice(),
            false => &self.values,
        }
    }
}

impl<T: 'static> ValueSlot for TypedSlot<T> {
    fn accept(&mut self, raw: &str, overwrite: bool) -> Result<(), String> {
        let value = (self.parse)(raw)?;

        if overwrite {
            self.values.clear();
        }

        self.values.push(value);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_parse_stores_nothing() {
        let mut slot = TypedSlot::new(from_str::<u8>(), None);

        slot.accept("12", false).unwrap();
        assert!(slot.accept("300", false).is_err());
        assert_eq!(slot.values(), [12]);
    }

    #[test]
    fn overwrite_replaces() {
        let mut slot = TypedSlot::new(from_str::<String>(), None);

        slot.accept("a", true).unwrap();
        slot.accept("b", true).unwrap();
        assert_eq!(slot.values(), ["b"]);

        slot.accept("c", false).unwrap();
        assert_eq!(slot.values(), ["b", "c"]);
    }

    #[test]
    fn injected_parser() {
        let parse = parse_fn(|raw: &str| match raw {
            "on" => Ok(true),
            "off" => Ok(false),
            _ => Err("expected on or off"),
        });
        let mut slot = TypedSlot::new(parse, None);

        assert_eq!(slot.accept("maybe", true).unwrap_err(), "expected on or off");
        slot.accept("on", true).unwrap();
        assert_eq!(slot.values(), [true]);
    }

    #[test]
    fn default_until_first_value() {
        let mut slot = TypedSlot::new(from_str::<u16>(), Some(8080));
        assert_eq!(slot.values(), [8080]);

        assert!(slot.accept("http", true).is_err());
        assert_eq!(slot.values(), [8080]);

        slot.accept("3000", false).unwrap();
        slot.accept("3001", false).unwrap();
        assert_eq!(slot.values(), [3000, 3001]);
    }

    #[test]
    fn checked_rejects_after_parsing() {
        let parse = checked(from_str::<u16>(), |port: &u16| match *port {
            0 => Err("port 0 is reserved"),
            _ => Ok(()),
        });
        let mut slot = TypedSlot::new(parse, None);

        assert_eq!(slot.accept("0", true).unwrap_err(), "port 0 is reserved");
        assert!(slot.accept("-1", true).is_err());
        assert!(slot.values().is_empty());

        slot.accept("22", true).unwrap();
        assert_eq!(slot.values(), [22]);
    }

    #[test]
    fn constant_ignores_input() {
        let mut slot = TypedSlot::new(constant('x'), None);

        slot.accept("", false).unwrap();
        slot.accept("anything", false).unwrap();
        assert_eq!(slot.values(), ['x', 'x']);
    }
}
