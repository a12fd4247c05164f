/*!
Named collections of arguments, used for help sections and as the lookup
table that tokens are resolved against.
 */

use std::cell::OnceCell;

use crate::{
    Requirement,
    constraint::{Child, Combinator, ConstraintNode},
    errors::ParseError,
    spec::{SpecId, Specs},
};

/**
A named, ordered collection of arguments and constraint nodes.

A group never enforces a combinator of its own. Validating it validates
each entry: an argument checks its own occurrence bounds, and a nested
constraint node checks its rule. The usage string is built like an optional
[`AnyRequiredOf`][Combinator::AnyRequiredOf] node, so optional arguments
show up in `[ brackets ]`.
*/
#[derive(Debug)]
pub struct ArgumentGroup {
    name: String,
    entries: ConstraintNode,
    members: OnceCell<Vec<SpecId>>,
}

impl ArgumentGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: ConstraintNode::with_requirement(
                Combinator::AnyRequiredOf,
                Requirement::Optional,
            ),
            members: OnceCell::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn usage(&self) -> &str {
        self.entries.usage()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The arguments and nodes added to this group, in order
    #[inline]
    pub fn entries(&self) -> &[Child] {
        self.entries.children()
    }

    pub fn add(&mut self, specs: &Specs, entry: impl Into<Child>) {
        self.entries.add(specs, entry);
        self.members.take();
    }

    /// Every argument in this group, including those inside nested
    /// constraint nodes, in order and without duplicates.
    pub fn members(&self) -> &[SpecId] {
        self.members.get_or_init(|| {
            let mut members = Vec::new();

            self.entries
                .children()
                .iter()
                .for_each(|entry| entry.collect_specs(&mut members));

            members
        })
    }

    pub fn validate(&self, specs: &Specs) -> Result<(), ParseError> {
        self.entries
            .children()
            .iter()
            .try_for_each(|entry| entry.validate(specs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constraint::Constraint,
        spec::{Switch, Value},
    };

    #[test]
    fn members_are_flattened_and_deduplicated() {
        let mut specs = Specs::default();
        let a = specs.declare(Switch::new().short('a'));
        let b = specs.declare(Switch::new().short('b'));
        let c = specs.declare(Value::<u32>::new().short('c'));

        let mut group = ArgumentGroup::new("Options");
        group.add(&specs, a);
        assert_eq!(group.members(), [a]);

        group.add(
            &specs,
            Constraint::exactly_one_of().arg(b).arg(a).arg(c).build(&specs),
        );
        group.add(&specs, b);

        assert_eq!(group.members(), [a, b, c.id()]);
        assert_eq!(group.entries().len(), 3);
    }

    #[test]
    fn usage_brackets_optional_arguments() {
        let mut specs = Specs::default();
        let verbose = specs.declare(Switch::new().short('v').long("verbose"));
        let output = specs.declare(Value::<String>::new().short('o').required());
        let input = specs.declare(Value::<String>::new().placeholder("INPUT"));

        let mut group = ArgumentGroup::new("Options");
        group.add(&specs, verbose);
        group.add(&specs, output);
        group.add(&specs, input);

        assert_eq!(group.usage(), "[ -v ] -o [ INPUT ]");
    }

    #[test]
    fn validation_delegates_to_entries() {
        let mut specs = Specs::default();
        let a = specs.declare(Switch::new().short('a').required());
        let b = specs.declare(Switch::new().short('b'));

        let mut group = ArgumentGroup::new("Options");
        group.add(&specs, b);
        assert!(group.validate(&specs).is_ok());

        group.add(&specs, a);
        assert!(matches!(
            group.validate(&specs),
            Err(ParseError::CountMismatch { ref argument, count: 0, .. }) if argument == "-a"
        ));

        specs[a].set().unwrap();
        assert!(group.validate(&specs).is_ok());
    }
}
