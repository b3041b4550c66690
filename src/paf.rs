//! PAF (Policy Authoring Format) output.
//!
//! [`PafWriter`] renders one parameter per line, values separated by
//! spaces, and nested policies as brace-delimited blocks:
//!
//! ```text
//! #<?cfg paf policy ?>
//! name: "lsstcam"
//! binning: 2
//! gains: 1.5 1.75
//! enabled: true
//! defaults: @conf/defaults.paf
//! amplifier: {
//!   id: 0
//! }
//! ```
//!
//! Doubles always carry a decimal point or an exponent, so `2.0` is never
//! written as the integer `2`. An empty array is written as `name:` with no
//! values; the parameter is present, but readers see it without values.
//! File references are written unquoted after `@`, so a path containing
//! whitespace is rejected rather than written as two references.
//!
//! Dotted names such as `isr.doBias` are rejected unless
//! [`PafOptions::hierarchical_names`] is set, in which case they are
//! written as one token (`isr.doBias: true`) for the reader to resolve.
//! Nested [`Policy`] values are always written as blocks.
//!
//! ## Examples
//!
//! ```rust
//! use policy_writer::{PafWriter, Policy, PolicyWriter};
//!
//! let mut policy = Policy::new();
//! policy.set("x", 5).unwrap();
//! policy.set("y", vec![1, 2, 3]).unwrap();
//!
//! let mut writer = PafWriter::new(Vec::new());
//! writer.write(&policy, true).unwrap();
//!
//! let paf = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(paf, "#<?cfg paf policy ?>\nx: 5\ny: 1 2 3\n");
//! ```

use crate::{Error, PafOptions, Policy, PolicyFile, PolicyWriter, Result, Sink};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// The declaration line identifying PAF content.
pub const PAF_DECLARATION: &str = "#<?cfg paf policy ?>";

/// A [`PolicyWriter`] producing PAF text.
///
/// Nested policies are written through the same writer; a depth counter
/// tracks the current indentation.
#[derive(Debug)]
pub struct PafWriter<W> {
    sink: Sink<W>,
    options: PafOptions,
    depth: usize,
}

impl<W: Write> PafWriter<W> {
    /// Creates a writer with default options attached to `out`.
    pub fn new(out: W) -> Self {
        Self::with_options(out, PafOptions::default())
    }

    pub fn with_options(out: W, options: PafOptions) -> Self {
        Self::from_sink(Sink::stream(out), options)
    }

    /// Creates a writer for an optional stream.
    ///
    /// Without a stream, output goes to a discard sink and every write succeeds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use policy_writer::{PafOptions, PafWriter, Policy, PolicyWriter};
    ///
    /// let mut writer = PafWriter::<Vec<u8>>::with_optional(None, PafOptions::default());
    /// let mut policy = Policy::new();
    /// policy.set("x", 1).unwrap();
    /// assert!(writer.write(&policy, true).is_ok());
    /// assert!(writer.into_inner().is_none());
    /// ```
    pub fn with_optional(out: Option<W>, options: PafOptions) -> Self {
        Self::from_sink(Sink::new(out), options)
    }

    pub fn from_sink(sink: Sink<W>, options: PafOptions) -> Self {
        PafWriter {
            sink,
            options,
            depth: 0,
        }
    }

    #[must_use]
    pub fn options(&self) -> &PafOptions {
        &self.options
    }

    /// Returns the wrapped stream; `None` when writing to a discard sink.
    #[must_use]
    pub fn get_ref(&self) -> Option<&W> {
        self.sink.get_ref()
    }

    pub fn into_inner(self) -> Option<W> {
        self.sink.into_inner()
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        let width = self.depth * self.options.indent;
        let mut line = String::with_capacity(width + text.len() + 1);
        line.extend(std::iter::repeat(' ').take(width));
        line.push_str(text);
        line.push('\n');
        self.sink.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Writes `name: rendered`, or `name:` when there is nothing to render.
    fn write_entry(&mut self, name: &str, rendered: &str) -> Result<()> {
        self.check_name(name)?;
        if rendered.is_empty() {
            self.write_line(&format!("{name}:"))
        } else {
            self.write_line(&format!("{name}: {rendered}"))
        }
    }
}

impl PafWriter<BufWriter<File>> {
    /// Creates a writer for a new file at `path`, truncating an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened for writing, e.g.
    /// because `path` is a directory or not writable.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::create_with_options(path, PafOptions::default())
    }

    pub fn create_with_options<P: AsRef<Path>>(path: P, options: PafOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| Error::io(&format!("cannot open {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "opened policy output file");
        Ok(Self::with_options(BufWriter::new(file), options))
    }
}

impl PafWriter<io::Sink> {
    /// Creates a writer whose output is discarded.
    #[must_use]
    pub fn discard() -> Self {
        Self::from_sink(Sink::discard(), PafOptions::default())
    }
}

impl<W: Write> PolicyWriter for PafWriter<W> {
    fn sink(&mut self) -> &mut dyn Write {
        &mut self.sink
    }

    fn write_declaration(&mut self) -> Result<()> {
        self.write_line(PAF_DECLARATION)
    }

    fn supports_hierarchical_names(&self) -> bool {
        self.options.hierarchical_names
    }

    fn write_bools(&mut self, name: &str, values: &[bool]) -> Result<()> {
        let rendered = join(values.iter().map(|b| if *b { "true" } else { "false" }));
        self.write_entry(name, &rendered)
    }

    fn write_ints(&mut self, name: &str, values: &[i64]) -> Result<()> {
        let rendered = join(values.iter().map(i64::to_string));
        self.write_entry(name, &rendered)
    }

    fn write_doubles(&mut self, name: &str, values: &[f64]) -> Result<()> {
        let rendered = join(values.iter().map(|d| format_double(*d)));
        self.write_entry(name, &rendered)
    }

    fn write_strings(&mut self, name: &str, values: &[String]) -> Result<()> {
        let rendered = join(values.iter().map(|s| quote(s)));
        self.write_entry(name, &rendered)
    }

    fn write_policies(&mut self, name: &str, values: &[Policy]) -> Result<()> {
        if values.is_empty() {
            return self.write_entry(name, "");
        }
        self.check_name(name)?;
        for policy in values {
            self.write_line(&format!("{name}: {{"))?;
            self.depth += 1;
            let written = self.write_entries(policy);
            self.depth -= 1;
            written?;
            self.write_line("}")?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::Custom`] before writing anything when a path
    /// contains whitespace, since a PAF reader would split it.
    fn write_files(&mut self, name: &str, values: &[PolicyFile]) -> Result<()> {
        if let Some(file) = values
            .iter()
            .find(|f| f.to_string().chars().any(char::is_whitespace))
        {
            return Err(Error::custom(format!(
                "file reference '{file}' for '{name}' contains whitespace"
            )));
        }
        let rendered = join(values.iter().map(|f| format!("@{f}")));
        self.write_entry(name, &rendered)
    }
}

fn join<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(item.as_ref());
    }
    out
}

/// Formats a double so it cannot be read back as an integer.
fn format_double(d: f64) -> String {
    if d.is_nan() {
        "nan".to_string()
    } else if d == f64::INFINITY {
        "inf".to_string()
    } else if d == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        // Debug keeps a trailing ".0" on integral values.
        format!("{d:?}")
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    fn render(policy: &Policy, options: PafOptions) -> Result<String> {
        let mut writer = PafWriter::with_options(Vec::new(), options);
        writer.write(policy, false)?;
        Ok(String::from_utf8(writer.into_inner().unwrap()).unwrap())
    }

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(2.0), "2.0");
        assert_eq!(format_double(1.5), "1.5");
        assert_eq!(format_double(-0.25), "-0.25");
        assert_eq!(format_double(f64::NAN), "nan");
        assert_eq!(format_double(f64::NEG_INFINITY), "-inf");
        assert!(format_double(1e300).contains('e'));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(quote(r"C:\dir"), "\"C:\\\\dir\"");
    }

    #[test]
    fn test_every_kind() {
        let mut policy = Policy::new();
        policy.set("flag", false).unwrap();
        policy.set("n", -3).unwrap();
        policy.set("gain", 2.0).unwrap();
        policy.set("label", "a b").unwrap();
        policy.set("base", PolicyFile::new("conf/base.paf")).unwrap();
        policy.set("sub.k", 1).unwrap();

        let paf = render(&policy, PafOptions::default()).unwrap();
        assert_eq!(
            paf,
            "flag: false\nn: -3\ngain: 2.0\nlabel: \"a b\"\nbase: @conf/base.paf\nsub: {\n  k: 1\n}\n"
        );
    }

    #[test]
    fn test_policy_array_writes_one_block_per_element() {
        let mut first = Policy::new();
        first.set("id", 0).unwrap();
        let mut second = Policy::new();
        second.set("id", 1).unwrap();

        let mut policy = Policy::new();
        policy.set("amp", vec![first, second]).unwrap();

        let paf = render(&policy, PafOptions::default()).unwrap();
        assert_eq!(paf, "amp: {\n  id: 0\n}\namp: {\n  id: 1\n}\n");
    }

    #[test]
    fn test_empty_arrays_keep_their_name() {
        let mut policy = Policy::new();
        policy.set("ints", Vec::<i64>::new()).unwrap();
        policy.set("subs", Vec::<Policy>::new()).unwrap();

        let paf = render(&policy, PafOptions::default()).unwrap();
        assert_eq!(paf, "ints:\nsubs:\n");
    }

    #[test]
    fn test_hierarchical_name_rejected_by_default() {
        let mut writer = PafWriter::new(Vec::new());
        let err = writer.write_int("a.b", 1).unwrap_err();
        assert!(matches!(err, Error::UnsupportedName { ref name } if name == "a.b"));
        assert!(writer.get_ref().unwrap().is_empty());
    }

    #[test]
    fn test_hierarchical_name_written_as_one_token() {
        let options = PafOptions::new().with_hierarchical_names(true);
        let mut writer = PafWriter::with_options(Vec::new(), options);
        writer.write_int("a.b.c", 1).unwrap();
        writer.write_policy("a.d", &Policy::new()).unwrap();
        writer.write_string("top", "x").unwrap();
        assert!(matches!(writer.write_int("a..b", 1), Err(Error::InvalidName { .. })));

        let paf = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(paf, "a.b.c: 1\na.d: {\n}\ntop: \"x\"\n");
    }

    #[test]
    fn test_dotted_siblings_differ_from_policy_array() {
        let options = PafOptions::new().with_hierarchical_names(true);

        let mut map = crate::PolicyMap::new();
        map.insert("a.b".to_string(), Value::from(1));
        map.insert("a.c".to_string(), Value::from(2));
        let dotted = render(&Policy::from_map(map), options.clone()).unwrap();

        let mut first = Policy::new();
        first.set("b", 1).unwrap();
        let mut second = Policy::new();
        second.set("c", 2).unwrap();
        let mut array = Policy::new();
        array.set("a", vec![first, second]).unwrap();
        let blocks = render(&array, options).unwrap();

        assert_eq!(dotted, "a.b: 1\na.c: 2\n");
        assert_ne!(dotted, blocks);
    }

    #[test]
    fn test_file_path_with_whitespace_rejected() {
        let mut writer = PafWriter::new(Vec::new());
        let files = [PolicyFile::new("ok.paf"), PolicyFile::new("conf/my file.paf")];
        let err = writer.write_files("includes", &files).unwrap_err();
        assert!(matches!(err, Error::Custom(ref msg) if msg.contains("my file.paf")));
        assert!(writer.get_ref().unwrap().is_empty());
    }

    #[test]
    fn test_custom_indent() {
        let mut policy = Policy::new();
        policy.set("a.b.c", true).unwrap();

        let paf = render(&policy, PafOptions::new().with_indent(4)).unwrap();
        assert_eq!(paf, "a: {\n    b: {\n        c: true\n    }\n}\n");

        let paf = render(&policy, PafOptions::compact()).unwrap();
        assert_eq!(paf, "a: {\nb: {\nc: true\n}\n}\n");
    }

    #[test]
    fn test_declaration_precedes_data() {
        let mut policy = Policy::new();
        policy.set("x", Value::from(1)).unwrap();

        let mut writer = PafWriter::new(Vec::new());
        writer.write(&policy, true).unwrap();
        let paf = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(paf, format!("{PAF_DECLARATION}\nx: 1\n"));
    }

    #[test]
    fn test_depth_restored_after_error() {
        let mut inner = Policy::new();
        inner.set("ok", 1).unwrap();
        let mut writer = PafWriter::new(Vec::new());
        writer.write_policy("g", &inner).unwrap();
        assert!(writer.write_int("bad.name", 2).is_err());
        writer.write_int("after", 3).unwrap();

        let paf = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(paf, "g: {\n  ok: 1\n}\nafter: 3\n");
    }
}
