use core::fmt;

/**
The lexical markers that decide how a raw token is classified.

The defaults, [`Markers::GNU`], follow the usual conventions: `-a` is a flag,
`--alpha` is a name, `--alpha=value` attaches a value with `=`, and a bare
`--` stops option parsing. The stop marker is allowed to be spelled the same
as the name prefix; a token that is *exactly* the stop marker always wins.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers<'m> {
    flag_prefix: &'m str,
    name_prefix: &'m str,
    delimiter: &'m str,
    stop: &'m str,
}

impl<'m> Markers<'m> {
    pub const GNU: Markers<'static> = Markers {
        flag_prefix: "-",
        name_prefix: "--",
        delimiter: "=",
        stop: "--",
    };

    /// Create a new set of markers. None of them may be empty, since an
    /// empty prefix would match every token.
    pub fn new(
        flag_prefix: &'m str,
        name_prefix: &'m str,
        delimiter: &'m str,
        stop: &'m str,
    ) -> Result<Self, EmptyMarker> {
        let check = |marker: &'static str, value: &str| match value.is_empty() {
            true => Err(EmptyMarker { marker }),
            false => Ok(()),
        };

        check("flag prefix", flag_prefix)?;
        check("name prefix", name_prefix)?;
        check("delimiter", delimiter)?;
        check("stop marker", stop)?;

        Ok(Self {
            flag_prefix,
            name_prefix,
            delimiter,
            stop,
        })
    }

    /// Introduces a cluster of single-character flags, like the `-` in `-abc`
    #[inline]
    #[must_use]
    pub const fn flag_prefix(&self) -> &'m str {
        self.flag_prefix
    }

    /// Introduces a multi-character name, like the `--` in `--alpha`
    #[inline]
    #[must_use]
    pub const fn name_prefix(&self) -> &'m str {
        self.name_prefix
    }

    /// Separates a name from an attached value, like the `=` in `--alpha=1`
    #[inline]
    #[must_use]
    pub const fn delimiter(&self) -> &'m str {
        self.delimiter
    }

    /// The token after which everything is positional
    #[inline]
    #[must_use]
    pub const fn stop(&self) -> &'m str {
        self.stop
    }

    pub fn with_flag_prefix(self, flag_prefix: &'m str) -> Result<Self, EmptyMarker> {
        Self::new(flag_prefix, self.name_prefix, self.delimiter, self.stop)
    }

    pub fn with_name_prefix(self, name_prefix: &'m str) -> Result<Self, EmptyMarker> {
        Self::new(self.flag_prefix, name_prefix, self.delimiter, self.stop)
    }

    pub fn with_delimiter(self, delimiter: &'m str) -> Result<Self, EmptyMarker> {
        Self::new(self.flag_prefix, self.name_prefix, delimiter, self.stop)
    }

    pub fn with_stop(self, stop: &'m str) -> Result<Self, EmptyMarker> {
        Self::new(self.flag_prefix, self.name_prefix, self.delimiter, stop)
    }
}

impl Default for Markers<'static> {
    fn default() -> Self {
        Self::GNU
    }
}

/// One of the markers given to [`Markers::new`] was an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyMarker {
    marker: &'static str,
}

impl EmptyMarker {
    /// Which marker was empty (`"flag prefix"`, `"delimiter"`, etc)
    pub fn marker(&self) -> &'static str {
        self.marker
    }
}

impl fmt::Display for EmptyMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the {} must not be empty", self.marker)
    }
}

impl core::error::Error for EmptyMarker {}
