/*!
Resolution of classified tokens to declared arguments.
 */

use tracing::trace;

use crate::{
    group::ArgumentGroup,
    spec::{SpecId, Specs},
};

/// What a token is being resolved as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Flag(char),
    Name(&'a str),
    Positional,
}

/// Resolves lookups against an ordered list of groups.
#[derive(Debug, Clone, Copy)]
pub struct TokenMatcher<'a> {
    groups: &'a [ArgumentGroup],
}

impl<'a> TokenMatcher<'a> {
    #[inline]
    pub fn new(groups: &'a [ArgumentGroup]) -> Self {
        Self { groups }
    }

    /**
    Find the argument for a lookup. Groups are scanned in order, and members
    within each group in order; the first match that can still accept an
    occurrence wins. If every match is already full, the last one is
    returned anyway, so that recording the occurrence reports an over-count
    rather than an unknown argument.
    */
    pub fn resolve(&self, specs: &Specs, lookup: Lookup<'_>) -> Option<SpecId> {
        let mut fallback = None;

        for &id in self.groups.iter().flat_map(|group| group.members()) {
            let spec = &specs[id];

            if !spec.matches(lookup) {
                continue;
            }

            if spec.can_accept() {
                trace!(?lookup, argument = %spec.identifier(), "resolved");
                return Some(id);
            }

            fallback = Some(id);
        }

        if let Some(id) = fallback {
            trace!(?lookup, argument = %specs[id].identifier(), "resolved to a full argument");
        }

        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Switch, Value};

    #[test]
    fn first_accepting_match_wins() {
        let mut specs = Specs::default();
        let first = specs.declare(Value::<String>::new().max(1));
        let second = specs.declare(Value::<String>::new().unbounded());
        let flag = specs.declare(Switch::new().short('f'));

        let mut options = ArgumentGroup::new("Options");
        options.add(&specs, flag);
        options.add(&specs, first);
        let mut rest = ArgumentGroup::new("Rest");
        rest.add(&specs, second);

        let groups = [options, rest];
        let matcher = TokenMatcher::new(&groups);

        assert_eq!(matcher.resolve(&specs, Lookup::Positional), Some(first.id()));
        specs[first.id()].set_value("x").unwrap();
        assert_eq!(matcher.resolve(&specs, Lookup::Positional), Some(second.id()));

        assert_eq!(matcher.resolve(&specs, Lookup::Flag('f')), Some(flag));
        assert_eq!(matcher.resolve(&specs, Lookup::Flag('g')), None);
        assert_eq!(matcher.resolve(&specs, Lookup::Name("f")), None);
    }

    #[test]
    fn full_arguments_are_still_found() {
        let mut specs = Specs::default();
        let a = specs.declare(Switch::new().short('x'));
        let b = specs.declare(Switch::new().long("x"));
        let c = specs.declare(Switch::new().short('x').long("x"));

        let mut group = ArgumentGroup::new("Options");
        [a, b, c].into_iter().for_each(|id| group.add(&specs, id));
        let groups = [group];
        let matcher = TokenMatcher::new(&groups);

        specs[a].set().unwrap();
        assert_eq!(matcher.resolve(&specs, Lookup::Flag('x')), Some(c));

        specs[c].set().unwrap();
        assert_eq!(matcher.resolve(&specs, Lookup::Flag('x')), Some(c));
        assert_eq!(matcher.resolve(&specs, Lookup::Name("x")), Some(b));
    }
}
