//! Configuration options for the PAF writer.
//!
//! - [`PafOptions::indent`]: spaces per nesting level (default 2)
//! - [`PafOptions::hierarchical_names`]: whether dotted names such as
//!   `camera.binning` are written as one token (default `false`, in which
//!   case they are rejected with
//!   [`Error::UnsupportedName`](crate::Error::UnsupportedName))
//!
//! ## Examples
//!
//! ```rust
//! use policy_writer::{to_string_with_options, PafOptions, Policy};
//!
//! let mut policy = Policy::new();
//! policy.set("camera.binning", 2).unwrap();
//!
//! let options = PafOptions::new().with_indent(4);
//! let paf = to_string_with_options(&policy, false, options).unwrap();
//! assert_eq!(paf, "camera: {\n    binning: 2\n}\n");
//! ```

/// Configuration options for PAF output.
///
/// # Examples
///
/// ```rust
/// use policy_writer::PafOptions;
///
/// let options = PafOptions::new()
///     .with_indent(4)
///     .with_hierarchical_names(true);
/// assert_eq!(options.indent, 4);
/// assert!(options.hierarchical_names);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PafOptions {
    pub indent: usize,
    pub hierarchical_names: bool,
}

impl Default for PafOptions {
    fn default() -> Self {
        PafOptions {
            indent: 2,
            hierarchical_names: false,
        }
    }
}

impl PafOptions {
    /// Creates default options (2-space indent, flat names only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options without indentation for nested blocks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use policy_writer::PafOptions;
    ///
    /// assert_eq!(PafOptions::compact().indent, 0);
    /// ```
    #[must_use]
    pub fn compact() -> Self {
        PafOptions {
            indent: 0,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per nesting level).
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Enables or disables hierarchical names.
    ///
    /// When enabled, writing `a.b` emits the line `a.b: ...` and leaves the
    /// nesting to the reader.
    #[must_use]
    pub fn with_hierarchical_names(mut self, enabled: bool) -> Self {
        self.hierarchical_names = enabled;
        self
    }
}
