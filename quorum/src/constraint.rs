/*!
The constraint-satisfaction engine: trees of combinators over arguments,
checked once parsing has finished.

A [`ConstraintNode`] holds an ordered list of [`Child`]ren, each either an
argument handle or another node. Its usage string is built incrementally as
children are added and is never recomputed afterwards, so it always reflects
insertion order and the state of each child at the time it was added.
 */

use core::fmt::{self, Display};

use tracing::debug;

use crate::{
    Requirement,
    errors::ParseError,
    spec::{SpecId, Specs, ValueId},
};

/// The rule a [`ConstraintNode`] enforces over its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// None of the children may be set
    NoneOf,

    /// Exactly one of the children must be set
    ExactlyOneOf,

    /// Every *required* child must be set; the rest are unconstrained
    AnyRequiredOf,

    /// Either every child is set, or (if the node isn't required) none are
    AllOf,

    /// For each adjacent pair of children, if the first is set, so is the
    /// second
    Implies,
}

impl Combinator {
    fn separator(self) -> &'static str {
        match self {
            Combinator::ExactlyOneOf => " | ",
            _ => " ",
        }
    }

    /// Whether a non-required argument is shown in `[ brackets ]` when it's
    /// a direct child of this kind of node
    fn brackets_optional(self) -> bool {
        matches!(self, Combinator::AnyRequiredOf | Combinator::ExactlyOneOf)
    }

    /// Whether a nested node of kind `child` is parenthesized inside a node
    /// of this kind
    fn parenthesizes(self, child: Combinator) -> bool {
        match (self, child) {
            (Combinator::ExactlyOneOf, _) | (_, Combinator::ExactlyOneOf) => true,
            (Combinator::AnyRequiredOf, child) => child != Combinator::AnyRequiredOf,
            _ => false,
        }
    }
}

impl Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Combinator::NoneOf => "none of",
            Combinator::ExactlyOneOf => "exactly one of",
            Combinator::AnyRequiredOf => "any of",
            Combinator::AllOf => "all of",
            Combinator::Implies => "implies",
        })
    }
}

/// A member of a [`ConstraintNode`]
#[derive(Debug, Clone)]
pub enum Child {
    Spec(SpecId),
    Node(ConstraintNode),
}

impl Child {
    pub fn is_set(&self, specs: &Specs) -> bool {
        match self {
            Child::Spec(id) => specs[*id].is_set(),
            Child::Node(node) => node.is_set(specs),
        }
    }

    pub fn is_required(&self, specs: &Specs) -> bool {
        match self {
            Child::Spec(id) => specs[*id].is_required(),
            Child::Node(node) => node.is_required(),
        }
    }

    /// True if this child, or any argument under it, was given at all. A
    /// nested node can be touched without being set, when its own rule is
    /// broken.
    pub fn is_touched(&self, specs: &Specs) -> bool {
        match self {
            Child::Spec(id) => specs[*id].is_set(),
            Child::Node(node) => node.children.iter().any(|child| child.is_touched(specs)),
        }
    }

    pub fn validate(&self, specs: &Specs) -> Result<(), ParseError> {
        match self {
            Child::Spec(id) => specs[*id].validate(),
            Child::Node(node) => node.validate(specs),
        }
    }

    /// How this child is named in diagnostics
    pub fn identifier(&self, specs: &Specs) -> String {
        match self {
            Child::Spec(id) => specs[*id].identifier().to_string(),
            Child::Node(node) => format!("({})", node.usage()),
        }
    }

    /// Append every argument under this child to `out`, depth first, without
    /// duplicates
    pub(crate) fn collect_specs(&self, out: &mut Vec<SpecId>) {
        match self {
            Child::Spec(id) => {
                if !out.contains(id) {
                    out.push(*id);
                }
            }
            Child::Node(node) => node
                .children
                .iter()
                .for_each(|child| child.collect_specs(out)),
        }
    }
}

impl From<SpecId> for Child {
    fn from(id: SpecId) -> Self {
        Child::Spec(id)
    }
}

impl<T> From<ValueId<T>> for Child {
    fn from(id: ValueId<T>) -> Self {
        Child::Spec(id.into())
    }
}

impl From<ConstraintNode> for Child {
    fn from(node: ConstraintNode) -> Self {
        Child::Node(node)
    }
}

/// A combinator over arguments and nested nodes
#[derive(Debug, Clone)]
pub struct ConstraintNode {
    kind: Combinator,
    requirement: Requirement,
    children: Vec<Child>,
    usage: String,
}

impl ConstraintNode {
    /// A new, empty, required node
    pub fn new(kind: Combinator) -> Self {
        Self::with_requirement(kind, Requirement::Mandatory)
    }

    /// A new, empty node. The requirement only matters for
    /// [`AnyRequiredOf`][Combinator::AnyRequiredOf] and
    /// [`AllOf`][Combinator::AllOf], where an optional node tolerates none of
    /// its children being set.
    pub fn with_requirement(kind: Combinator, requirement: Requirement) -> Self {
        Self {
            kind,
            requirement,
            children: Vec::new(),
            usage: match kind {
                Combinator::NoneOf => String::from("!"),
                _ => String::new(),
            },
        }
    }

    #[inline]
    pub fn kind(&self) -> Combinator {
        self.kind
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
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The usage string, as it was built when the children were added
    #[inline]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Append a child and extend the usage string with it.
    pub fn add(&mut self, specs: &Specs, child: impl Into<Child>) {
        let child = child.into();

        let rendered = match child {
            Child::Spec(id) => {
                let spec = &specs[id];

                match !spec.is_required() && self.kind.brackets_optional() {
                    true => format!("[ {} ]", spec.identifier()),
                    false => spec.identifier().to_string(),
                }
            }
            Child::Node(ref node) => {
                match (
                    !node.is_required() && self.kind == Combinator::AnyRequiredOf,
                    self.kind.parenthesizes(node.kind),
                ) {
                    (true, _) => format!("[ {} ]", node.usage),
                    (false, true) => format!("({})", node.usage),
                    (false, false) => node.usage.clone(),
                }
            }
        };

        if !self.children.is_empty() {
            self.usage.push_str(self.kind.separator());
        }

        self.usage.push_str(&rendered);
        self.children.push(child);
    }

    fn count_set(&self, specs: &Specs) -> usize {
        self.children
            .iter()
            .filter(|child| child.is_set(specs))
            .count()
    }

    fn implications_hold(&self, specs: &Specs) -> bool {
        self.first_unmet_implication(specs).is_none()
    }

    fn first_unmet_implication(&self, specs: &Specs) -> Option<(&Child, &Child)> {
        self.children.windows(2).find_map(|pair| match pair {
            [antecedent, consequent]
                if antecedent.is_set(specs) && !consequent.is_set(specs) =>
            {
                Some((antecedent, consequent))
            }
            _ => None,
        })
    }

    /**
    Whether this node counts as "set" when it's the child of another node.

    - [`NoneOf`][Combinator::NoneOf]: none of the children are set
    - [`ExactlyOneOf`][Combinator::ExactlyOneOf]: exactly one child is set
    - [`AnyRequiredOf`][Combinator::AnyRequiredOf]: at least one child is
      set, and every required child is set
    - [`AllOf`][Combinator::AllOf]: there is at least one child and every
      child is set
    - [`Implies`][Combinator::Implies]: at least one child is set, and every
      implication holds
    */
    pub fn is_set(&self, specs: &Specs) -> bool {
        let set = self.count_set(specs);

        match self.kind {
            Combinator::NoneOf => set == 0,
            Combinator::ExactlyOneOf => set == 1,
            Combinator::AnyRequiredOf => {
                set > 0
                    && self
                        .children
                        .iter()
                        .all(|child| child.is_set(specs) || !child.is_required(specs))
            }
            Combinator::AllOf => !self.children.is_empty() && set == self.children.len(),
            Combinator::Implies => set > 0 && self.implications_hold(specs),
        }
    }

    /// Validate every child that was touched. Untouched children are left to
    /// this node's own rule, but a touched nested node always gets to check
    /// its rule, even when a violation makes it count as unset.
    fn validate_touched_children(&self, specs: &Specs) -> Result<(), ParseError> {
        self.children
            .iter()
            .filter(|child| child.is_touched(specs))
            .try_for_each(|child| child.validate(specs))
    }

    fn validate_all_children(&self, specs: &Specs) -> Result<(), ParseError> {
        self.children
            .iter()
            .try_for_each(|child| child.validate(specs))
    }

    fn violation<'a>(
        &self,
        specs: &Specs,
        culprits: impl IntoIterator<Item = &'a Child>,
    ) -> ParseError {
        let arguments: Vec<String> = culprits
            .into_iter()
            .map(|child| child.identifier(specs))
            .collect();

        debug!(kind = %self.kind, usage = %self.usage, ?arguments, "constraint violated");

        ParseError::ConstraintViolation {
            kind: self.kind,
            arguments,
        }
    }

    /// Check this node's rule, and the children it makes relevant.
    /// [`NoneOf`][Combinator::NoneOf] and
    /// [`ExactlyOneOf`][Combinator::ExactlyOneOf] validate every child before
    /// checking their own rule; the other kinds only validate the children
    /// that were touched, so that a child the node already excuses doesn't
    /// also produce an error of its own.
    pub fn validate(&self, specs: &Specs) -> Result<(), ParseError> {
        match self.kind {
            Combinator::NoneOf => {
                self.validate_all_children(specs)?;

                let set: Vec<&Child> = self
                    .children
                    .iter()
                    .filter(|child| child.is_set(specs))
                    .collect();

                match set.is_empty() {
                    true => Ok(()),
                    false => Err(self.violation(specs, set)),
                }
            }
            Combinator::ExactlyOneOf => {
                self.validate_all_children(specs)?;

                match self.count_set(specs) {
                    1 => Ok(()),
                    _ => Err(self.violation(specs, &self.children)),
                }
            }
            Combinator::AnyRequiredOf => {
                self.validate_touched_children(specs)?;

                if !self.is_required() && self.count_set(specs) == 0 {
                    return Ok(());
                }

                let missing: Vec<&Child> = self
                    .children
                    .iter()
                    .filter(|child| child.is_required(specs) && !child.is_set(specs))
                    .collect();

                match missing.is_empty() {
                    true => Ok(()),
                    false => Err(self.violation(specs, missing)),
                }
            }
            Combinator::AllOf => {
                self.validate_touched_children(specs)?;

                let missing: Vec<&Child> = self
                    .children
                    .iter()
                    .filter(|child| !child.is_set(specs))
                    .collect();

                let none_set = missing.len() == self.children.len();

                match missing.is_empty() || (none_set && !self.is_required()) {
                    true => Ok(()),
                    false => Err(self.violation(specs, missing)),
                }
            }
            Combinator::Implies => {
                self.validate_touched_children(specs)?;

                match self.first_unmet_implication(specs) {
                    None => Ok(()),
                    Some((antecedent, consequent)) => {
                        Err(self.violation(specs, [antecedent, consequent]))
                    }
                }
            }
        }
    }
}

/**
A declarative description of a constraint tree, resolved into a
[`ConstraintNode`] with [`build`][Constraint::build]. Children are added to
the node in the order they were given here.

```
use quorum::{Constraint, Parser, Switch};

let mut parser = Parser::new("example");
let json = parser.add(Switch::new().long("json"));
let yaml = parser.add(Switch::new().long("yaml"));

parser.constrain(Constraint::exactly_one_of().arg(json).arg(yaml));
assert_eq!(parser.constraints().usage(), "([ --json ] | [ --yaml ])");
```
*/
#[derive(Debug, Clone)]
pub struct Constraint {
    kind: Combinator,
    requirement: Requirement,
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
enum Entry {
    Spec(SpecId),
    Nested(Constraint),
}

impl Constraint {
    pub fn new(kind: Combinator) -> Self {
        Self {
            kind,
            requirement: Requirement::Mandatory,
            entries: Vec::new(),
        }
    }

    pub fn none_of() -> Self {
        Self::new(Combinator::NoneOf)
    }

    pub fn exactly_one_of() -> Self {
        Self::new(Combinator::ExactlyOneOf)
    }

    pub fn any_required_of() -> Self {
        Self::new(Combinator::AnyRequiredOf)
    }

    pub fn all_of() -> Self {
        Self::new(Combinator::AllOf)
    }

    pub fn implies() -> Self {
        Self::new(Combinator::Implies)
    }

    /// Tolerate none of the children being set
    pub fn optional(mut self) -> Self {
        self.requirement = Requirement::Optional;
        self
    }

    pub fn arg(mut self, id: impl Into<SpecId>) -> Self {
        self.entries.push(Entry::Spec(id.into()));
        self
    }

    pub fn args<I>(self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SpecId>,
    {
        ids.into_iter().fold(self, |this, id| this.arg(id))
    }

    pub fn nest(mut self, constraint: Constraint) -> Self {
        self.entries.push(Entry::Nested(constraint));
        self
    }

    /// Resolve this description against `specs`, rendering the usage strings.
    ///
    /// # Panics
    ///
    /// Panics if any argument wasn't declared in `specs`.
    pub fn build(self, specs: &Specs) -> ConstraintNode {
        let node = ConstraintNode::with_requirement(self.kind, self.requirement);

        self.entries
            .into_iter()
            .fold(node, |mut node, entry| {
                match entry {
                    Entry::Spec(id) => node.add(specs, id),
                    Entry::Nested(constraint) => node.add(specs, constraint.build(specs)),
                }

                node
            })
    }
}
