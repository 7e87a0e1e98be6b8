/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;
mod lines;

use std::fs;
use std::io;
use std::io::Stderr;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use encoding_rs::Encoding;
use encoding_rs::UTF_8;
use tracing::debug;
use tracing::warn;

pub use error::GoldenError;
pub use lines::split_lines;

const LINES_LABEL: &str = "<lines>";

/// Resolves a WHATWG encoding label such as `utf-8` or `iso-8859-1`.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, GoldenError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| GoldenError::UnknownEncoding(label.to_string()))
}

/// A text file together with the encoding used to decode it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextResource {
    path: PathBuf,
    encoding: &'static Encoding,
}

impl TextResource {
    /// A UTF-8 encoded resource.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_encoding(path, UTF_8)
    }

    pub fn with_encoding(path: impl Into<PathBuf>, encoding: &'static Encoding) -> Self {
        TextResource {
            path: path.into(),
            encoding,
        }
    }

    pub fn with_label(path: impl Into<PathBuf>, label: &str) -> Result<Self, GoldenError> {
        Ok(Self::with_encoding(path, encoding_for_label(label)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Reads and decodes the whole resource, then splits it into lines.
    ///
    /// Decoding is strict: a malformed byte sequence is an error rather
    /// than a replacement character. A byte order mark is kept as content.
    pub fn read_lines(&self) -> Result<Vec<String>, GoldenError> {
        let bytes = fs::read(&self.path).map_err(|source| GoldenError::Io {
            path: self.path.clone(),
            source,
        })?;
        let text = self
            .encoding
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .ok_or_else(|| GoldenError::Malformed {
                path: self.path.clone(),
                encoding: self.encoding.name(),
            })?;
        Ok(split_lines(&text))
    }
}

/// Compares outputs with golden files line by line.
///
/// On a mismatch the golden lines and then the output lines are written to
/// the diagnostic sink, one per line, so they can be inspected by hand.
///
/// # Examples
///
/// ```no_run
/// use xmlgold::{GoldenComparator, TextResource};
///
/// let mut comparator = GoldenComparator::new();
/// let same = comparator.compare(
///     &TextResource::new("expected.html"),
///     &TextResource::with_label("out.html", "iso-8859-1")?,
/// )?;
/// assert!(same);
/// # Ok::<(), xmlgold::GoldenError>(())
/// ```
pub struct GoldenComparator<W: Write> {
    diagnostics: W,
}

impl GoldenComparator<Stderr> {
    /// Creates a comparator reporting mismatches on the standard error.
    pub fn new() -> Self {
        GoldenComparator {
            diagnostics: io::stderr(),
        }
    }
}

impl Default for GoldenComparator<Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> GoldenComparator<W> {
    pub fn with_diagnostics(diagnostics: W) -> Self {
        GoldenComparator { diagnostics }
    }

    pub fn into_inner(self) -> W {
        self.diagnostics
    }

    /// Returns true if both resources decode to the same lines.
    pub fn compare(
        &mut self,
        golden: &TextResource,
        output: &TextResource,
    ) -> Result<bool, GoldenError> {
        let expected = golden.read_lines()?;
        let actual = output.read_lines()?;
        let output_name = output.path().display().to_string();
        self.check(golden.path(), &output_name, &expected, &actual)
    }

    /// Returns true if the golden resource decodes to the given lines.
    pub fn compare_lines<S: AsRef<str>>(
        &mut self,
        golden: &TextResource,
        lines: &[S],
    ) -> Result<bool, GoldenError> {
        let expected = golden.read_lines()?;
        self.check(golden.path(), LINES_LABEL, &expected, lines)
    }

    fn check<S: AsRef<str>>(
        &mut self,
        golden: &Path,
        output: &str,
        expected: &[String],
        actual: &[S],
    ) -> Result<bool, GoldenError> {
        let first_difference = expected
            .iter()
            .zip(actual)
            .position(|(e, a)| e.as_str() != a.as_ref())
            .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())));

        let Some(index) = first_difference else {
            debug!(golden = %golden.display(), output, lines = expected.len(), "output matches golden file");
            return Ok(true);
        };

        warn!(
            golden = %golden.display(),
            output,
            line = index + 1,
            expected_lines = expected.len(),
            actual_lines = actual.len(),
            "output differs from golden file"
        );
        self.dump(expected).map_err(GoldenError::Diagnostics)?;
        self.dump(actual).map_err(GoldenError::Diagnostics)?;
        Ok(false)
    }

    fn dump<S: AsRef<str>>(&mut self, lines: &[S]) -> io::Result<()> {
        for line in lines {
            writeln!(self.diagnostics, "{}", line.as_ref())?;
        }
        self.diagnostics.flush()
    }
}

/// Compares two UTF-8 files, reporting a mismatch on the standard error.
pub fn compare_with_gold(
    golden: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<bool, GoldenError> {
    compare_with_gold_encoding(golden, output, UTF_8)
}

/// Compares two files, decoding both with the given encoding.
pub fn compare_with_gold_encoding(
    golden: impl AsRef<Path>,
    output: impl AsRef<Path>,
    encoding: &'static Encoding,
) -> Result<bool, GoldenError> {
    GoldenComparator::new().compare(
        &TextResource::with_encoding(golden.as_ref(), encoding),
        &TextResource::with_encoding(output.as_ref(), encoding),
    )
}

/// Compares a UTF-8 golden file with lines collected in memory.
pub fn compare_lines_with_gold<S: AsRef<str>>(
    golden: impl AsRef<Path>,
    lines: &[S],
) -> Result<bool, GoldenError> {
    GoldenComparator::new().compare_lines(&TextResource::new(golden.as_ref()), lines)
}
