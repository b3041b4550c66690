//! The policy writer contract.
//!
//! [`PolicyWriter`] is the trait every output format implements. It has
//! exactly six required methods, one array writer per element [`Kind`]:
//!
//! | method             | element type     |
//! |--------------------|------------------|
//! | `write_bools`      | `bool`           |
//! | `write_ints`       | `i64`            |
//! | `write_doubles`    | `f64`            |
//! | `write_strings`    | `String`         |
//! | `write_policies`   | [`Policy`]       |
//! | `write_files`      | [`PolicyFile`]   |
//!
//! Everything else has a default: single values are written as one-element
//! arrays, [`PolicyWriter::write`] walks a policy and dispatches each entry
//! by kind, and the format declaration is empty unless a backend overrides
//! [`PolicyWriter::write_declaration`].
//!
//! A writer always owns a usable [`Sink`]. When no output stream is given
//! the sink discards everything, so writes succeed without producing output.
//!
//! ## Implementing a backend
//!
//! ```rust
//! use policy_writer::{Policy, PolicyFile, PolicyWriter, Result};
//! use std::io::Write;
//!
//! /// Writes `name=count` for every parameter.
//! struct Counter(Vec<u8>);
//!
//! impl Counter {
//!     fn count(&mut self, name: &str, n: usize) -> Result<()> {
//!         self.check_name(name)?;
//!         writeln!(self.0, "{name}={n}")?;
//!         Ok(())
//!     }
//! }
//!
//! impl PolicyWriter for Counter {
//!     fn sink(&mut self) -> &mut dyn Write { &mut self.0 }
//!     fn write_bools(&mut self, name: &str, v: &[bool]) -> Result<()> { self.count(name, v.len()) }
//!     fn write_ints(&mut self, name: &str, v: &[i64]) -> Result<()> { self.count(name, v.len()) }
//!     fn write_doubles(&mut self, name: &str, v: &[f64]) -> Result<()> { self.count(name, v.len()) }
//!     fn write_strings(&mut self, name: &str, v: &[String]) -> Result<()> { self.count(name, v.len()) }
//!     fn write_policies(&mut self, name: &str, v: &[Policy]) -> Result<()> { self.count(name, v.len()) }
//!     fn write_files(&mut self, name: &str, v: &[PolicyFile]) -> Result<()> { self.count(name, v.len()) }
//! }
//!
//! let mut policy = Policy::new();
//! policy.set("x", 5).unwrap();
//! policy.set("y", vec![1, 2, 3]).unwrap();
//!
//! let mut counter = Counter(Vec::new());
//! counter.write(&policy, false).unwrap();
//! assert_eq!(counter.0, b"x=1\ny=3\n");
//! ```

use crate::policy::split_name;
use crate::{Array, Error, Policy, PolicyFile, Result, Value};
use std::io::{self, Write};
use std::slice;
use tracing::{debug, trace};

/// The output handle owned by a writer.
///
/// A sink is either a caller-supplied stream or a discard sink. Both accept
/// writes; only the first ever fails, and only when the stream does.
#[derive(Debug)]
pub enum Sink<W> {
    Stream(W),
    Discard(io::Sink),
}

impl<W: Write> Sink<W> {
    /// Wraps `out`, or falls back to a discard sink when `out` is `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use policy_writer::Sink;
    ///
    /// let sink: Sink<Vec<u8>> = Sink::new(None);
    /// assert!(sink.is_discard());
    /// ```
    pub fn new(out: Option<W>) -> Self {
        match out {
            Some(w) => Sink::Stream(w),
            None => {
                debug!("no output stream supplied; writing to a discard sink");
                Sink::Discard(io::sink())
            }
        }
    }

    /// Wraps a caller-supplied stream.
    pub fn stream(out: W) -> Self {
        Sink::Stream(out)
    }

    #[must_use]
    pub fn is_discard(&self) -> bool {
        matches!(self, Sink::Discard(_))
    }

    /// Returns the wrapped stream, if any.
    #[must_use]
    pub fn get_ref(&self) -> Option<&W> {
        match self {
            Sink::Stream(w) => Some(w),
            Sink::Discard(_) => None,
        }
    }

    /// Returns the wrapped stream mutably, if any.
    pub fn get_mut(&mut self) -> Option<&mut W> {
        match self {
            Sink::Stream(w) => Some(w),
            Sink::Discard(_) => None,
        }
    }

    /// Unwraps the stream; a discard sink yields `None`.
    pub fn into_inner(self) -> Option<W> {
        match self {
            Sink::Stream(w) => Some(w),
            Sink::Discard(_) => None,
        }
    }
}

impl Sink<io::Sink> {
    /// Creates a sink that drops everything written to it.
    #[must_use]
    pub fn discard() -> Self {
        Sink::Discard(io::sink())
    }
}

impl<W: Write> Write for Sink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stream(w) => w.write(buf),
            Sink::Discard(s) => s.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stream(w) => w.write_all(buf),
            Sink::Discard(s) => s.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stream(w) => w.flush(),
            Sink::Discard(s) => s.flush(),
        }
    }
}

/// An interface for writing policy data to a stream.
///
/// Names passed to the write methods may be hierarchical (`a.b.c`). A
/// backend that cannot express such a name must fail with
/// [`Error::UnsupportedName`] instead of flattening or truncating it;
/// [`PolicyWriter::check_name`] implements that rule.
///
/// Errors are returned as soon as they happen. The remaining entries of the
/// current call are not written and output already handed to the sink stays
/// there.
pub trait PolicyWriter {
    /// The sink this writer emits to.
    fn sink(&mut self) -> &mut dyn Write;

    fn write_bools(&mut self, name: &str, values: &[bool]) -> Result<()>;

    fn write_ints(&mut self, name: &str, values: &[i64]) -> Result<()>;

    fn write_doubles(&mut self, name: &str, values: &[f64]) -> Result<()>;

    fn write_strings(&mut self, name: &str, values: &[String]) -> Result<()>;

    /// Writes each policy as a nested block under the shared `name`.
    fn write_policies(&mut self, name: &str, values: &[Policy]) -> Result<()>;

    /// Writes references to the files, not their content.
    fn write_files(&mut self, name: &str, values: &[PolicyFile]) -> Result<()>;

    /// Writes every top-level parameter of `policy`, nested policies recursively.
    ///
    /// With `emit_declaration`, the format declaration is written once
    /// before any data. The sink is flushed when all entries are written.
    fn write(&mut self, policy: &Policy, emit_declaration: bool) -> Result<()> {
        debug!(entries = policy.len(), emit_declaration, "writing policy");
        if emit_declaration {
            self.write_declaration()?;
        }
        self.write_entries(policy)?;
        self.flush()
    }

    /// Writes the entries of `policy` in order, without declaration or flush.
    ///
    /// Backends call this to render a nested policy inside its block.
    fn write_entries(&mut self, policy: &Policy) -> Result<()> {
        for (name, value) in policy.iter() {
            trace!(name = %name, kind = %value.kind(), array = value.is_array(), "writing parameter");
            self.write_value(name, value)?;
        }
        Ok(())
    }

    /// Writes the header identifying the output format. Empty by default.
    fn write_declaration(&mut self) -> Result<()> {
        Ok(())
    }

    /// Dispatches `value` to the typed write method for its kind.
    fn write_value(&mut self, name: &str, value: &Value) -> Result<()> {
        match value {
            Value::Bool(b) => self.write_bool(name, *b),
            Value::Int(i) => self.write_int(name, *i),
            Value::Double(d) => self.write_double(name, *d),
            Value::String(s) => self.write_string(name, s),
            Value::Policy(p) => self.write_policy(name, p),
            Value::File(f) => self.write_file(name, f),
            Value::Array(a) => self.write_array(name, a),
        }
    }

    /// Dispatches a typed array to its array writer.
    fn write_array(&mut self, name: &str, array: &Array) -> Result<()> {
        match array {
            Array::Bool(v) => self.write_bools(name, v),
            Array::Int(v) => self.write_ints(name, v),
            Array::Double(v) => self.write_doubles(name, v),
            Array::String(v) => self.write_strings(name, v),
            Array::Policy(v) => self.write_policies(name, v),
            Array::File(v) => self.write_files(name, v),
        }
    }

    /// Writes loosely typed values as one array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] before writing anything when the
    /// values do not share one kind; see [`Array::from_values`].
    fn write_values(&mut self, name: &str, values: &[Value]) -> Result<()> {
        let array = Array::from_values(name, values.iter().cloned())?;
        self.write_array(name, &array)
    }

    fn write_bool(&mut self, name: &str, value: bool) -> Result<()> {
        self.write_bools(name, &[value])
    }

    fn write_int(&mut self, name: &str, value: i64) -> Result<()> {
        self.write_ints(name, &[value])
    }

    fn write_double(&mut self, name: &str, value: f64) -> Result<()> {
        self.write_doubles(name, &[value])
    }

    fn write_string(&mut self, name: &str, value: &str) -> Result<()> {
        self.write_strings(name, &[value.to_string()])
    }

    /// Writes a nested policy under `name`.
    ///
    /// The block holds the same entries a standalone
    /// `write(value, false)` would produce.
    fn write_policy(&mut self, name: &str, value: &Policy) -> Result<()> {
        self.write_policies(name, slice::from_ref(value))
    }

    fn write_file(&mut self, name: &str, value: &PolicyFile) -> Result<()> {
        self.write_files(name, slice::from_ref(value))
    }

    /// Whether this writer can express hierarchical names.
    fn supports_hierarchical_names(&self) -> bool {
        false
    }

    /// Validates a parameter name before it is written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] for empty names or segments and
    /// [`Error::UnsupportedName`] for a hierarchical name when
    /// [`PolicyWriter::supports_hierarchical_names`] is `false`.
    fn check_name(&self, name: &str) -> Result<()> {
        let segments = split_name(name)?;
        if segments.len() > 1 && !self.supports_hierarchical_names() {
            return Err(Error::unsupported_name(name));
        }
        Ok(())
    }

    /// Flushes the sink.
    fn flush(&mut self) -> Result<()> {
        self.sink().flush()?;
        Ok(())
    }
}
