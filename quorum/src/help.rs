/*!
Help text rendering.

```text
Usage: fetch [ -v ] [ -o ] [ --stdout ] URL

Downloads things.

Options:
  -v, --verbose        Print more
  -o, --output <FILE>  Where to put it
  --stdout             Write to standard output
  URL                  What to download

Constraints:
  [ -o ] | [ --stdout ]
```
 */

use core::fmt::{self, Display, Write as _};
use std::borrow::Cow;

use indent_write::fmt::IndentWriter;
use lazy_format::lazy_format;

use crate::{
    constraint::Child,
    group::ArgumentGroup,
    parser::Parser,
    spec::ArgumentSpec,
};

const INDENT: &str = "  ";

/// Descriptions are never wrapped narrower than this, however little room
/// the identifiers leave.
const MIN_DESCRIPTION_WIDTH: usize = 20;

/// A [`Display`] rendering of a [`Parser`]'s help text.
#[derive(Debug, Clone, Copy)]
pub struct Help<'a> {
    parser: &'a Parser,
    width: Option<usize>,
}

impl<'a> Help<'a> {
    pub fn new(parser: &'a Parser) -> Self {
        Self {
            parser,
            width: None,
        }
    }

    /// Wrap descriptions to fit in `width` columns
    pub fn wrapped(self, width: usize) -> Self {
        Self {
            width: Some(width),
            ..self
        }
    }

    /// Groups shown on the usage line: the root group always, the others
    /// only if they have anything in them
    fn usage_groups(&self) -> impl Iterator<Item = &'a ArgumentGroup> + Clone {
        self.parser
            .groups()
            .iter()
            .enumerate()
            .filter(|&(index, group)| index == 0 || !group.is_empty())
            .map(|(_, group)| group)
    }

    /// Every argument listed in help, with its identifier column text
    fn listed(&self) -> impl Iterator<Item = (&'a ArgumentGroup, &'a ArgumentSpec, String)> {
        let specs = self.parser.specs();

        self.parser.groups().iter().flat_map(move |group| {
            group.members().iter().map(move |&id| {
                let spec = &specs[id];
                (group, spec, spec.tags())
            })
        })
    }

    fn lines<'d>(&self, text: &'d str, available: usize) -> Vec<Cow<'d, str>> {
        match self.width {
            None => text.lines().map(Cow::Borrowed).collect(),
            Some(_) => textwrap::wrap(text, available.max(MIN_DESCRIPTION_WIDTH)),
        }
    }
}

impl Display for Help<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let usages = self
            .usage_groups()
            .map(ArgumentGroup::usage)
            .filter(|usage| !usage.is_empty());

        writeln!(
            f,
            "Usage: {program}{usages}",
            program = self.parser.program(),
            usages = lazy_format!(" {usage}" for usage in usages.clone()),
        )?;

        let description = self.parser.description();
        if !description.is_empty() {
            let width = self.width.unwrap_or(usize::MAX);
            self.lines(description, width)
                .iter()
                .enumerate()
                .try_for_each(|(index, line)| match index {
                    0 => write!(f, "\n{line}\n"),
                    _ => writeln!(f, "{line}"),
                })?;
        }

        let column = self
            .listed()
            .map(|(_, _, tags)| tags.chars().count())
            .max()
            .unwrap_or(0)
            + 2;

        let available = self
            .width
            .unwrap_or(usize::MAX)
            .saturating_sub(INDENT.len() + column);

        for group in self.parser.groups() {
            let mut entries = self
                .listed()
                .filter(|&(owner, _, _)| core::ptr::eq(owner, group))
                .peekable();

            if entries.peek().is_none() {
                continue;
            }

            section(f, group.name(), |mut out| {
                entries.try_for_each(|(_, spec, tags)| {
                    describe(&mut out, &tags, &self.lines(spec.description(), available), column)
                })
            })?;
        }

        let constraints = self.parser.constraints();
        if !constraints.is_empty() {
            section(f, constraints.name(), |mut out| {
                constraints.entries().iter().try_for_each(|entry| match entry {
                    Child::Node(node) => writeln!(out, "{}", node.usage()),
                    Child::Spec(id) => writeln!(out, "{}", self.parser.spec(*id).identifier()),
                })
            })?;
        }

        Ok(())
    }
}

/// Write a section by writing a newline, then the `header`, then an
/// indented `body`.
fn section<O: fmt::Write + ?Sized>(
    out: &mut O,
    header: &str,
    body: impl FnOnce(IndentWriter<&mut O>) -> fmt::Result,
) -> fmt::Result {
    writeln!(out, "\n{header}:")?;
    body(IndentWriter::new(INDENT, out))
}

/// Write the identifier, then the description lines, aligned to `column`.
fn describe(
    out: &mut impl fmt::Write,
    tags: &str,
    description: &[Cow<'_, str>],
    column: usize,
) -> fmt::Result {
    match description.split_first() {
        None => writeln!(out, "{tags}"),
        Some((first, rest)) => {
            writeln!(out, "{tags:<column$}{first}")?;
            rest.iter()
                .try_for_each(|line| writeln!(out, "{:column$}{line}", ""))
        }
    }
}
