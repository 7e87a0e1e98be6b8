/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod attributes;
mod error;

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::Location;
use crate::SaxElement;
use crate::SaxError;
use crate::SaxHandler;
use crate::SaxParser;

pub use attributes::Attribute;
pub use attributes::Attributes;
use error::description;
pub use error::ParseError;

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// A start tag with its names resolved.
#[derive(Debug)]
pub struct StartElement<'a> {
    /// Namespace URI, empty if the element is in no namespace.
    pub uri: &'a str,
    pub local_name: &'a str,
    /// Qualified name as written in the document.
    pub qname: &'a str,
    pub attributes: &'a Attributes,
}

/// Receiver of namespace aware parsing events.
///
/// All methods do nothing by default, so a handler only implements the
/// events it cares about. Returning [SaxError::HandlerAbort] stops the
/// parsing.
pub trait ContentHandler {
    fn start_element(&mut self, _element: &StartElement) -> Result<(), SaxError> {
        Ok(())
    }

    fn end_element(&mut self, _uri: &str, _local_name: &str, _qname: &str) -> Result<(), SaxError> {
        Ok(())
    }

    /// Character data, possibly in several consecutive fragments.
    fn characters(&mut self, _text: &str) -> Result<(), SaxError> {
        Ok(())
    }
}

struct Binding {
    prefix: String,
    uri: String,
}

struct OpenElement {
    qname: String,
    uri: String,
    local_start: usize,
    bindings: usize,
}

#[derive(Default)]
struct Resolver {
    bindings: Vec<Binding>,
    open: Vec<OpenElement>,
    name: String,
    raw_attributes: Vec<(String, String)>,
    attributes: Attributes,
}

// Splits a qualified name, returning the prefix and the start of the local name.
fn split_qname(qname: &str) -> Result<(&str, usize), SaxError> {
    match qname.split_once(':') {
        None => Ok(("", 0)),
        Some((prefix, local)) => {
            if prefix.is_empty() || local.is_empty() || local.contains(':') {
                return Err(SaxError::BadXml(description::BAD_QNAME));
            }
            Ok((prefix, prefix.len() + 1))
        }
    }
}

fn lookup<'b>(bindings: &'b [Binding], prefix: &str) -> Option<&'b str> {
    if prefix == "xml" {
        return Some(XML_NAMESPACE);
    }
    bindings
        .iter()
        .rev()
        .find(|binding| binding.prefix == prefix)
        .map(|binding| binding.uri.as_str())
}

impl Resolver {
    fn reset(&mut self) {
        self.bindings.clear();
        self.open.clear();
        self.name.clear();
        self.raw_attributes.clear();
        self.attributes.clear();
    }

    fn start(&mut self, handler: &mut impl ContentHandler) -> Result<(), SaxError> {
        let mark = self.bindings.len();
        for (name, value) in &self.raw_attributes {
            if name == "xmlns" {
                self.bindings.push(Binding {
                    prefix: String::new(),
                    uri: value.clone(),
                });
            } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                if value.is_empty() {
                    return Err(SaxError::BadXml(description::EMPTY_PREFIX_BINDING));
                }
                self.bindings.push(Binding {
                    prefix: prefix.to_string(),
                    uri: value.clone(),
                });
            }
        }

        self.attributes.clear();
        for (name, value) in &self.raw_attributes {
            if name == "xmlns" || name.starts_with("xmlns:") {
                continue;
            }
            let (prefix, local_start) = split_qname(name)?;
            let uri = if prefix.is_empty() {
                ""
            } else {
                match lookup(&self.bindings, prefix) {
                    Some(uri) => uri,
                    None => return Err(SaxError::BadXml(description::UNBOUND_PREFIX)),
                }
            };
            if !self.attributes.push(uri, name, local_start, value) {
                return Err(SaxError::BadXml(description::DUPLICATE_ATTRIBUTE));
            }
        }

        let (prefix, local_start) = split_qname(&self.name)?;
        let uri = match lookup(&self.bindings, prefix) {
            Some(uri) => uri.to_string(),
            None if prefix.is_empty() => String::new(),
            None => return Err(SaxError::BadXml(description::UNBOUND_PREFIX)),
        };

        handler.start_element(&StartElement {
            uri: &uri,
            local_name: &self.name[local_start..],
            qname: &self.name,
            attributes: &self.attributes,
        })?;

        self.open.push(OpenElement {
            qname: std::mem::take(&mut self.name),
            uri,
            local_start,
            bindings: mark,
        });
        Ok(())
    }

    fn end(&mut self, handler: &mut impl ContentHandler, name: Option<&str>) -> Result<(), SaxError> {
        let Some(element) = self.open.pop() else {
            return Err(SaxError::BadXml(description::TAG_MISMATCH));
        };
        if let Some(name) = name {
            if name != element.qname {
                return Err(SaxError::BadXml(description::TAG_MISMATCH));
            }
        }
        handler.end_element(
            &element.uri,
            &element.qname[element.local_start..],
            &element.qname,
        )?;
        self.bindings.truncate(element.bindings);
        Ok(())
    }
}

struct Dispatch<'a, H: ContentHandler> {
    resolver: &'a mut Resolver,
    handler: &'a mut H,
}

impl<H: ContentHandler> SaxHandler for Dispatch<'_, H> {
    fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
        match element {
            SaxElement::StartTag(name) => {
                self.resolver.name.clear();
                self.resolver.name.push_str(name);
                self.resolver.raw_attributes.clear();
            }
            SaxElement::Attribute(name, value) => {
                self.resolver
                    .raw_attributes
                    .push((name.to_string(), value.to_string()));
            }
            SaxElement::StartTagContent => self.resolver.start(&mut *self.handler)?,
            SaxElement::StartTagEmpty => {
                self.resolver.start(&mut *self.handler)?;
                self.resolver.end(&mut *self.handler, None)?;
            }
            SaxElement::EndTag(name) => self.resolver.end(&mut *self.handler, Some(*name))?,
            SaxElement::CData(text) => self.handler.characters(text)?,
        }
        Ok(())
    }
}

/// Namespace aware streaming parser.
///
/// Wraps a [SaxParser] and delivers one [StartElement] per element, after
/// all of its attributes are known, with prefixes resolved to namespace URIs.
///
/// # Examples
///
/// ```
/// use xmlgold::{ContentHandler, NamespaceParser, SaxError, StartElement};
///
/// struct Names(Vec<String>);
///
/// impl ContentHandler for Names {
///     fn start_element(&mut self, element: &StartElement) -> Result<(), SaxError> {
///         self.0.push(format!("{{{}}}{}", element.uri, element.local_name));
///         Ok(())
///     }
/// }
///
/// let mut names = Names(Vec::new());
/// let mut parser = NamespaceParser::new();
/// parser.parse_bytes(&mut names, b"<r xmlns='urn:r' xmlns:x='urn:x'><x:a/></r>")?;
/// parser.parse_finish()?;
/// assert_eq!(names.0, ["{urn:r}r", "{urn:x}a"]);
/// # Ok::<(), SaxError>(())
/// ```
pub struct NamespaceParser {
    parser: SaxParser,
    resolver: Resolver,
    buffer_size: usize,
}

impl NamespaceParser {
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Creates a parser which reads streams in blocks of the given size.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        NamespaceParser {
            parser: SaxParser::new(),
            resolver: Resolver::default(),
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.parser.reset();
        self.resolver.reset();
    }

    pub fn location(&self) -> Location {
        self.parser.location()
    }

    pub fn parse_bytes<H: ContentHandler>(
        &mut self,
        handler: &mut H,
        bytes: &[u8],
    ) -> Result<(), SaxError> {
        let mut dispatch = Dispatch {
            resolver: &mut self.resolver,
            handler,
        };
        self.parser.parse_bytes(&mut dispatch, bytes)
    }

    pub fn parse_finish(&mut self) -> Result<(), SaxError> {
        self.parser.parse_finish()
    }

    /// Parses a complete document from a reader.
    ///
    /// The parser is reset first, so it can be reused for many documents.
    pub fn parse_reader<H: ContentHandler>(
        &mut self,
        handler: &mut H,
        mut reader: impl Read,
    ) -> Result<(), ParseError> {
        self.reset();
        let mut buffer = vec![0u8; self.buffer_size];
        loop {
            let len = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(len) => len,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            self.parse_bytes(handler, &buffer[..len])
                .map_err(|error| self.sax_error(error))?;
        }
        self.parse_finish().map_err(|error| self.sax_error(error))
    }

    pub fn parse_file<H: ContentHandler>(
        &mut self,
        handler: &mut H,
        path: impl AsRef<Path>,
    ) -> Result<(), ParseError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "parsing XML file");
        let file = File::open(path)?;
        self.parse_reader(handler, file)
    }

    fn sax_error(&self, error: SaxError) -> ParseError {
        ParseError::Sax {
            error,
            location: self.parser.location(),
        }
    }
}

impl Default for NamespaceParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
