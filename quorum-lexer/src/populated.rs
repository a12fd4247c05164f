/// A string slice that is statically guaranteed to hold at least one `char`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulatedStr<'a>(&'a str);

impl<'a> PopulatedStr<'a> {
    #[inline]
    pub fn new(s: &'a str) -> Option<Self> {
        match s.is_empty() {
            true => None,
            false => Some(Self(s)),
        }
    }

    /// The whole point: a static guarantee that there is a first character
    #[inline]
    pub fn split_first(self) -> (char, &'a str) {
        debug_assert!(!self.0.is_empty());

        let mut chars = self.0.chars();

        // Safety: `self.0` is guaranteed to be non-empty, so there is always
        // a first character
        let first = unsafe { chars.next().unwrap_unchecked() };
        (first, chars.as_str())
    }

    #[inline(always)]
    pub fn get(self) -> &'a str {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::PopulatedStr;

    #[test]
    fn empty_is_rejected() {
        assert!(PopulatedStr::new("").is_none());
    }

    #[test]
    fn split_first_handles_multibyte() {
        let s = PopulatedStr::new("éa").unwrap();
        assert_eq!(s.split_first(), ('é', "a"));

        let s = PopulatedStr::new("x").unwrap();
        assert_eq!(s.split_first(), ('x', ""));
    }
}
