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
mod escape;

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use encoding_rs::Encoding;
use encoding_rs::UTF_8;
use tracing::debug;

use crate::ContentHandler;
use crate::NamespaceParser;
use crate::SaxError;
use crate::StartElement;

pub use error::HtmlError;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "embed", "frame", "hr", "img", "input", "isindex",
    "link", "meta", "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "checked", "compact", "declare", "defer", "disabled", "ismap", "multiple", "nohref",
    "noresize", "noshade", "nowrap", "readonly", "selected",
];

const DOCTYPE: &str = "<!DOCTYPE html>\n";

fn is_one_of(list: &[&str], name: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(name))
}

/// Output settings for [HtmlSerializer].
#[derive(Clone, Copy, Debug)]
pub struct HtmlOptions {
    /// Output charset. Characters it cannot represent are written as
    /// decimal character references.
    pub encoding: &'static Encoding,
    /// Write `<!DOCTYPE html>` before the root element.
    pub doctype: bool,
    /// End the output with a newline.
    pub final_newline: bool,
}

impl HtmlOptions {
    pub fn with_label(label: &str) -> Result<Self, HtmlError> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| HtmlError::UnknownEncoding(label.to_string()))?;
        Ok(HtmlOptions {
            encoding,
            ..Default::default()
        })
    }
}

impl Default for HtmlOptions {
    fn default() -> Self {
        HtmlOptions {
            encoding: UTF_8,
            doctype: false,
            final_newline: true,
        }
    }
}

/// Writes the parsed document back out with HTML serialization rules.
///
/// Empty void elements like `br` have no end tag, `script` and `style`
/// contents are not escaped and boolean attributes are minimized. Every
/// character outside the output charset, including supplementary ones,
/// becomes exactly one `&#N;` reference.
///
/// Write errors abort the parsing with [SaxError::HandlerAbort]; the
/// write error is kept and returned by [HtmlSerializer::finish()].
///
/// # Examples
///
/// ```
/// use xmlgold::{HtmlOptions, HtmlSerializer, NamespaceParser};
///
/// let options = HtmlOptions::with_label("us-ascii")?;
/// let mut serializer = HtmlSerializer::new(Vec::new(), &options)?;
/// let mut parser = NamespaceParser::new();
/// parser.parse_reader(&mut serializer, "<p>\u{1F600}<br/></p>".as_bytes())?;
/// let html = serializer.finish()?;
/// assert_eq!(html, b"<p>&#128512;<br></p>\n");
/// # Ok::<(), xmlgold::HtmlError>(())
/// ```
pub struct HtmlSerializer<W: Write> {
    writer: W,
    encoding: &'static Encoding,
    doctype: bool,
    final_newline: bool,
    markup: String,
    raw_text: usize,
    started: bool,
    error: Option<io::Error>,
}

impl<W: Write> HtmlSerializer<W> {
    pub fn new(writer: W, options: &HtmlOptions) -> Result<Self, HtmlError> {
        let encoding = options.encoding;
        if encoding.output_encoding() != encoding {
            return Err(HtmlError::UnsupportedEncoding(encoding.name()));
        }
        Ok(HtmlSerializer {
            writer,
            encoding,
            doctype: options.doctype,
            final_newline: options.final_newline,
            markup: String::new(),
            raw_text: 0,
            started: false,
            error: None,
        })
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Returns the write error which aborted the parsing, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Completes the output and returns the writer.
    pub fn finish(mut self) -> Result<W, HtmlError> {
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        if self.started && self.final_newline {
            self.markup.push('\n');
            self.write_markup()?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_markup(&mut self) -> io::Result<()> {
        let result = {
            let (bytes, _, _) = self.encoding.encode(&self.markup);
            self.writer.write_all(&bytes)
        };
        self.markup.clear();
        result
    }

    fn emit(&mut self) -> Result<(), SaxError> {
        self.write_markup().map_err(|err| {
            self.error = Some(err);
            SaxError::HandlerAbort
        })
    }
}

impl<W: Write> ContentHandler for HtmlSerializer<W> {
    fn start_element(&mut self, element: &StartElement) -> Result<(), SaxError> {
        if !self.started {
            self.started = true;
            if self.doctype {
                self.markup.push_str(DOCTYPE);
            }
        }
        let is_html = element.uri.is_empty();
        self.markup.push('<');
        self.markup.push_str(element.qname);
        for attribute in element.attributes {
            self.markup.push(' ');
            self.markup.push_str(attribute.qname());
            if is_html
                && attribute.uri().is_empty()
                && is_one_of(BOOLEAN_ATTRIBUTES, attribute.qname())
                && attribute.value().eq_ignore_ascii_case(attribute.qname())
            {
                continue;
            }
            self.markup.push_str("=\"");
            escape::push_attribute_value(&mut self.markup, attribute.value());
            self.markup.push('"');
        }
        self.markup.push('>');
        if is_html && is_one_of(RAW_TEXT_ELEMENTS, element.local_name) {
            self.raw_text += 1;
        }
        self.emit()
    }

    fn end_element(&mut self, uri: &str, local_name: &str, qname: &str) -> Result<(), SaxError> {
        if uri.is_empty() {
            if is_one_of(VOID_ELEMENTS, local_name) {
                return Ok(());
            }
            if is_one_of(RAW_TEXT_ELEMENTS, local_name) {
                self.raw_text = self.raw_text.saturating_sub(1);
            }
        }
        self.markup.push_str("</");
        self.markup.push_str(qname);
        self.markup.push('>');
        self.emit()
    }

    fn characters(&mut self, text: &str) -> Result<(), SaxError> {
        if self.raw_text > 0 {
            self.markup.push_str(text);
        } else {
            escape::push_text(&mut self.markup, text);
        }
        self.emit()
    }
}

/// Parses an XML document and writes it as HTML.
pub fn to_html<R: Read, W: Write>(
    reader: R,
    writer: W,
    options: &HtmlOptions,
) -> Result<W, HtmlError> {
    let mut serializer = HtmlSerializer::new(BufWriter::new(writer), options)?;
    let result = NamespaceParser::new().parse_reader(&mut serializer, reader);
    if let Some(err) = serializer.take_error() {
        return Err(err.into());
    }
    result?;
    serializer
        .finish()?
        .into_inner()
        .map_err(|err| HtmlError::Io(err.into_error()))
}

/// Converts an XML file into an HTML file, replacing any existing output.
pub fn to_html_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &HtmlOptions,
) -> Result<(), HtmlError> {
    let (input, output) = (input.as_ref(), output.as_ref());
    debug!(
        input = %input.display(),
        output = %output.display(),
        encoding = options.encoding.name(),
        "writing HTML"
    );
    let reader = File::open(input)?;
    let writer = File::create(output)?;
    to_html(reader, writer, options)?;
    Ok(())
}

#[cfg(test)]
mod tests;
