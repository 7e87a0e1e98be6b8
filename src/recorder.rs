/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::path::Path;

use crate::ContentHandler;
use crate::NamespaceParser;
use crate::ParseError;
use crate::SaxError;
use crate::StartElement;

/// Written in place of the value when an element lacks the attribute.
pub const MISSING_VALUE: &str = "null";

/// Records one line per start element in the `local@attr:value` form.
///
/// The collected lines are meant to be compared against a golden file with
/// [GoldenComparator::compare_lines()](crate::GoldenComparator::compare_lines).
#[derive(Debug)]
pub struct AttributeRecorder {
    attribute: String,
    lines: Vec<String>,
}

impl AttributeRecorder {
    /// Creates a recorder for the attribute with the given qualified name.
    pub fn new(attribute: impl Into<String>) -> Self {
        AttributeRecorder {
            attribute: attribute.into(),
            lines: Vec::new(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl ContentHandler for AttributeRecorder {
    fn start_element(&mut self, element: &StartElement) -> Result<(), SaxError> {
        let value = element
            .attributes
            .value(&self.attribute)
            .unwrap_or(MISSING_VALUE);
        self.lines.push(format!(
            "{}@{}:{}",
            element.local_name, self.attribute, value
        ));
        Ok(())
    }
}

/// Parses an XML file and records the given attribute of every element.
pub fn record_attribute(path: impl AsRef<Path>, attribute: &str) -> Result<Vec<String>, ParseError> {
    let mut recorder = AttributeRecorder::new(attribute);
    NamespaceParser::new().parse_file(&mut recorder, path)?;
    Ok(recorder.into_lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(xml: &str, attribute: &str) -> Vec<String> {
        let mut recorder = AttributeRecorder::new(attribute);
        let mut parser = NamespaceParser::new();
        parser.parse_bytes(&mut recorder, xml.as_bytes()).unwrap();
        parser.parse_finish().unwrap();
        recorder.into_lines()
    }

    #[test]
    fn records_values() {
        assert_eq!(record("<a attr=\"x\"><b/></a>", "attr"), [
            "a@attr:x",
            "b@attr:null"
        ]);
    }

    #[test]
    fn supplementary_values() {
        let lines = record(
            "<r xmlns:s='urn:s'><s:a attr='\u{1f600}'/><b attr='&#x20000;&#119070;'/></r>",
            "attr",
        );
        assert_eq!(lines, [
            "r@attr:null",
            "a@attr:\u{1f600}",
            "b@attr:\u{20000}\u{1d11e}"
        ]);
    }

    #[test]
    fn normalized_values() {
        let xml = "\u{feff}<a attr=\"x\ny\tz\"><b attr='1\r\n2'/></a>";
        assert_eq!(record(xml, "attr"), ["a@attr:x y z", "b@attr:1 2"]);
    }

    #[test]
    fn qualified_attribute() {
        let xml = "<r xmlns:s='urn:s'><e s:attr='1' attr='2'/></r>";
        assert_eq!(record(xml, "s:attr"), ["r@s:attr:null", "e@s:attr:1"]);
    }

    #[test]
    fn record_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xml");
        std::fs::write(&path, "<doc attr='1'><x attr=''/></doc>").unwrap();
        assert_eq!(record_attribute(&path, "attr").unwrap(), ["doc@attr:1", "x@attr:"]);
    }
}
