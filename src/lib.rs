//! # policy_writer
//!
//! A write-only serialization contract for hierarchical, dynamically-typed
//! policy trees, and a backend for the PAF (Policy Authoring Format) text
//! dialect.
//!
//! ## What is a policy?
//!
//! A [`Policy`] is a tree of named parameters. Each parameter holds a bool,
//! an int, a double, a string, a nested policy, or a reference to an
//! external policy file ([`PolicyFile`]), either as a single value or as a
//! homogeneous array of them.
//!
//! ## Key Features
//!
//! - **One contract, many formats**: [`PolicyWriter`] has six required array
//!   writers; traversal, kind dispatch and single-value writes come for free
//! - **Exhaustive dispatch**: values are a sum type, so every kind is handled
//! - **Never a dangling sink**: writers without an output stream write to a
//!   discard sink instead of failing
//! - **Loud failures**: hierarchical names a backend cannot express, mixed
//!   arrays and sink errors are reported, never silently dropped
//! - **Serde bridge**: any `Serialize` struct converts into a policy
//!
//! ## Quick Start
//!
//! ```rust
//! use policy_writer::{policy, to_string};
//!
//! let camera = policy!({
//!     "name": "lsstcam",
//!     "binning": 2,
//!     "filters": ["g", "r", "i"],
//!     "amp": { "id": 0, "gain": 1.5 }
//! })
//! .unwrap();
//!
//! let paf = to_string(&camera, true).unwrap();
//! assert_eq!(
//!     paf,
//!     "#<?cfg paf policy ?>\n\
//!      name: \"lsstcam\"\n\
//!      binning: 2\n\
//!      filters: \"g\" \"r\" \"i\"\n\
//!      amp: {\n  id: 0\n  gain: 1.5\n}\n"
//! );
//! ```
//!
//! ### Typed configuration
//!
//! ```rust
//! use policy_writer::{to_policy, to_string};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Isr { do_bias: bool, threshold: f64 }
//!
//! let policy = to_policy(&Isr { do_bias: true, threshold: 5.0 }).unwrap();
//! assert_eq!(to_string(&policy, false).unwrap(), "do_bias: true\nthreshold: 5.0\n");
//! ```
//!
//! ## Errors
//!
//! All operations return [`Result`]. Errors propagate immediately: the rest
//! of the policy is not written, and output already emitted stays in the
//! sink. Buffer externally if you need all-or-nothing output.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - build a policy and write it as PAF
//! - **`macro.rs`** - literal policy trees with the `policy!` macro
//! - **`custom_options.rs`** - indentation and hierarchical names
//! - **`typed_config.rs`** - writing a `Serialize` struct
//!
//! Run any example with: `cargo run --example <name>`

pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod paf;
pub mod policy;
pub mod ser;
pub mod value;
pub mod writer;

pub use error::{Error, Result};
pub use map::PolicyMap;
pub use options::PafOptions;
pub use paf::{PafWriter, PAF_DECLARATION};
pub use policy::Policy;
pub use ser::ValueSerializer;
pub use value::{Array, Kind, PolicyFile, Value};
pub use writer::{PolicyWriter, Sink};

use serde::Serialize;
use std::io;
use std::path::Path;

/// Convert any struct or string-keyed map into a [`Policy`].
///
/// # Examples
///
/// ```rust
/// use policy_writer::to_policy;
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// map.insert("x", 1);
/// let policy = to_policy(&map).unwrap();
/// assert_eq!(policy.names(true), vec!["x"]);
/// ```
///
/// # Errors
///
/// Returns an error if the top-level value is not a map or struct, if a map
/// key is not a string or not a valid name, or if a sequence mixes kinds.
/// Empty sequences are left out.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_policy<T>(value: &T) -> Result<Policy>
where
    T: ?Sized + Serialize,
{
    match value.serialize(ValueSerializer::new(""))? {
        Some(Value::Policy(policy)) => Ok(policy),
        Some(other) => Err(Error::type_mismatch_desc(
            "",
            "map or struct",
            &describe(&other),
        )),
        None => Err(Error::type_mismatch_desc("", "map or struct", "no value")),
    }
}

fn describe(value: &Value) -> String {
    if value.is_array() {
        format!("{} array", value.kind())
    } else {
        value.kind().to_string()
    }
}

/// Write a policy to a PAF string.
///
/// # Examples
///
/// ```rust
/// use policy_writer::{to_string, Policy};
///
/// let mut policy = Policy::new();
/// policy.set("x", 1).unwrap();
/// assert_eq!(to_string(&policy, false).unwrap(), "x: 1\n");
/// ```
///
/// # Errors
///
/// Returns an error if a parameter cannot be written, e.g. a hierarchical key.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(policy: &Policy, emit_declaration: bool) -> Result<String> {
    to_string_with_options(policy, emit_declaration, PafOptions::default())
}

/// Write a policy to a PAF string with custom options.
///
/// # Errors
///
/// Returns an error if a parameter cannot be written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(
    policy: &Policy,
    emit_declaration: bool,
    options: PafOptions,
) -> Result<String> {
    let mut buffer = Vec::with_capacity(256);
    to_writer_with_options(&mut buffer, policy, emit_declaration, options)?;
    String::from_utf8(buffer).map_err(Error::custom)
}

/// Write a policy as PAF to any `io::Write`.
///
/// # Examples
///
/// ```rust
/// use policy_writer::{to_writer, Policy};
///
/// let mut policy = Policy::new();
/// policy.set("x", true).unwrap();
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &policy, false).unwrap();
/// assert_eq!(buffer, b"x: true\n");
/// ```
///
/// # Errors
///
/// Returns an error if a parameter cannot be written or the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, policy: &Policy, emit_declaration: bool) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, policy, emit_declaration, PafOptions::default())
}

/// Write a policy as PAF to any `io::Write` with custom options.
///
/// # Errors
///
/// Returns an error if a parameter cannot be written or the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(
    writer: W,
    policy: &Policy,
    emit_declaration: bool,
    options: PafOptions,
) -> Result<()>
where
    W: io::Write,
{
    PafWriter::with_options(writer, options).write(policy, emit_declaration)
}

/// Write a policy to a PAF file, declaration included.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_file<P: AsRef<Path>>(path: P, policy: &Policy) -> Result<()> {
    PafWriter::create(path)?.write(policy, true)
}
