/*!
Command-line argument parsing with occurrence bounds and composable
constraints between arguments.

Arguments are declared up front on a [`Parser`], as a [`Switch`] (no value),
a [`Value<T>`] (converted from the raw string, through
[`FromStr`][core::str::FromStr] or any parse function), or a [`Const<T>`] (no
value on the command line, but stores a preset one). Each declaration
returns a copyable handle that's later used to read the parse results, and to
build [`Constraint`]s like "exactly one of `--json` and `--yaml`" or "`--key`
requires `--cert`", which are checked once every token has been consumed.

```
use quorum::{Constraint, Parser, Switch, Value};

let mut parser = Parser::new("serve");
let port = parser.add(Value::<u16>::new().short('p').long("port").placeholder("PORT"));
let key = parser.add(Value::<String>::new().long("key").placeholder("FILE"));
let cert = parser.add(Value::<String>::new().long("cert").placeholder("FILE"));
let quiet = parser.add(Switch::new().short('q'));

parser.constrain(Constraint::implies().arg(key).arg(cert));

let error = parser.parse(["-qp", "8080", "--key=server.key"]).unwrap_err();
assert_eq!(error.to_string(), "--key requires --cert");

assert!(parser.is_set(quiet));
assert_eq!(parser.value(port), Some(&8080));
```

Tokenizing follows GNU conventions by default (`-abc`, `-ovalue`,
`--name=value`, `--name value`, and `--` to end option parsing), and the
markers can be changed with [`Markers`].
*/

pub mod arguments;
pub mod constraint;
pub mod errors;
pub mod group;
pub mod help;
mod impls;
pub mod matcher;
pub mod parameter;
pub mod parser;
pub mod spec;

pub use quorum_lexer::{EmptyMarker, Markers};

pub use arguments::LoadedArguments;
pub use constraint::{Combinator, Constraint, ConstraintNode};
pub use errors::{ParseError, Unknown};
pub use group::ArgumentGroup;
pub use parser::{GroupId, Parser};
pub use spec::{Alias, ArgumentSpec, Const, SpecId, Specs, Switch, Value, ValueId};

/// Whether an argument or constraint must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Requirement {
    #[default]
    Optional,
    Mandatory,
}
