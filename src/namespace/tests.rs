/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::*;

// Records events as strings, e.g. "start {urn:x}a x:a [id=1]".
#[derive(Default)]
struct Tester {
    events: Vec<String>,
}

impl ContentHandler for Tester {
    fn start_element(&mut self, element: &StartElement) -> Result<(), SaxError> {
        let attributes: Vec<String> = element
            .attributes
            .iter()
            .map(|attr| format!("{{{}}}{}={}", attr.uri(), attr.local_name(), attr.value()))
            .collect();
        self.events.push(format!(
            "start {{{}}}{} {} [{}]",
            element.uri,
            element.local_name,
            element.qname,
            attributes.join(" ")
        ));
        Ok(())
    }

    fn end_element(&mut self, uri: &str, local_name: &str, qname: &str) -> Result<(), SaxError> {
        self.events
            .push(format!("end {{{}}}{} {}", uri, local_name, qname));
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), SaxError> {
        if let Some(last) = self.events.last_mut() {
            if let Some(prev) = last.strip_prefix("text ") {
                *last = format!("text {}{}", prev, text);
                return Ok(());
            }
        }
        self.events.push(format!("text {}", text));
        Ok(())
    }
}

fn check(xml: &str, expected: &[&str]) {
    let mut tester = Tester::default();
    let mut parser = NamespaceParser::new();
    assert_eq!(parser.parse_bytes(&mut tester, xml.as_bytes()), Ok(()));
    assert_eq!(parser.parse_finish(), Ok(()));
    assert_eq!(tester.events, expected);
}

fn check_bad(xml: &str, description: &'static str) {
    let mut tester = Tester::default();
    let mut parser = NamespaceParser::new();
    assert_eq!(
        parser.parse_bytes(&mut tester, xml.as_bytes()),
        Err(SaxError::BadXml(description))
    );
}

#[test]
fn no_namespaces() {
    check("<a x='1'>hi<b/></a>", &[
        "start {}a a [{}x=1]",
        "text hi",
        "start {}b b []",
        "end {}b b",
        "end {}a a",
    ]);
}

#[test]
fn default_and_prefixed() {
    check(
        "<r xmlns='urn:r' xmlns:p='urn:p'><p:a p:x='1' y='2'/><b xmlns=''/></r>",
        &[
            "start {urn:r}r r []",
            "start {urn:p}a p:a [{urn:p}x=1 {}y=2]",
            "end {urn:p}a p:a",
            "start {}b b []",
            "end {}b b",
            "end {urn:r}r r",
        ],
    );
}

#[test]
fn scoping() {
    check(
        "<r><a xmlns:p='urn:1'><p:b/></a><a xmlns:p='urn:2'><p:b/></a></r>",
        &[
            "start {}r r []",
            "start {}a a []",
            "start {urn:1}b p:b []",
            "end {urn:1}b p:b",
            "end {}a a",
            "start {}a a []",
            "start {urn:2}b p:b []",
            "end {urn:2}b p:b",
            "end {}a a",
            "end {}r r",
        ],
    );

    check_bad(
        "<r><a xmlns:p='urn:1'/><p:b/></r>",
        description::UNBOUND_PREFIX,
    );
}

#[test]
fn xml_prefix() {
    check("<a xml:lang='tr'/>", &[
        "start {}a a [{http://www.w3.org/XML/1998/namespace}lang=tr]",
        "end {}a a",
    ]);
}

#[test]
fn attribute_lookup() {
    struct Lookup(Vec<Option<String>>);

    impl ContentHandler for Lookup {
        fn start_element(&mut self, element: &StartElement) -> Result<(), SaxError> {
            let attrs = element.attributes;
            self.0.push(attrs.value("attr").map(str::to_string));
            self.0.push(attrs.value("s:attr").map(str::to_string));
            self.0.push(attrs.value_ns("urn:s", "attr").map(str::to_string));
            Ok(())
        }
    }

    let mut lookup = Lookup(Vec::new());
    let mut parser = NamespaceParser::new();
    parser
        .parse_bytes(&mut lookup, "<e xmlns:s='urn:s' attr='\u{1f600}' s:attr='n'/>".as_bytes())
        .unwrap();
    parser.parse_finish().unwrap();
    assert_eq!(lookup.0, [
        Some("\u{1f600}".to_string()),
        Some("n".to_string()),
        Some("n".to_string()),
    ]);
}

#[test]
fn bad_documents() {
    check_bad("<p:a/>", description::UNBOUND_PREFIX);
    check_bad("<a p:x='1'/>", description::UNBOUND_PREFIX);
    check_bad("<a x='1' x='2'/>", description::DUPLICATE_ATTRIBUTE);
    check_bad(
        "<a xmlns:p='urn:p' xmlns:q='urn:p' p:x='1' q:x='2'/>",
        description::DUPLICATE_ATTRIBUTE,
    );
    check_bad("<a xmlns:p=''/>", description::EMPTY_PREFIX_BINDING);
    check_bad("<a></b>", description::TAG_MISMATCH);
    check_bad("<:a/>", description::BAD_QNAME);
    check_bad("<a:/>", description::BAD_QNAME);
}

#[test]
fn parse_reader_in_small_blocks() {
    let xml = "<r xmlns='urn:r'><a>\u{10400}\u{1f600}</a></r>";
    let mut tester = Tester::default();
    let mut parser = NamespaceParser::with_buffer_size(3);
    parser.parse_reader(&mut tester, xml.as_bytes()).unwrap();
    assert_eq!(tester.events, [
        "start {urn:r}r r []",
        "start {urn:r}a a []",
        "text \u{10400}\u{1f600}",
        "end {urn:r}a a",
        "end {urn:r}r r",
    ]);

    // the reader resets the parser for the next document
    let mut tester = Tester::default();
    parser.parse_reader(&mut tester, "<b/>".as_bytes()).unwrap();
    assert_eq!(tester.events, ["start {}b b []", "end {}b b"]);
}

#[test]
fn parse_reader_errors() {
    let mut tester = Tester::default();
    let mut parser = NamespaceParser::new();
    match parser.parse_reader(&mut tester, "<a>\n<b></a>".as_bytes()) {
        Err(ParseError::Sax { error, location }) => {
            assert_eq!(error, SaxError::BadXml(description::TAG_MISMATCH));
            assert_eq!(location.line, 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.xml");
    assert!(matches!(
        parser.parse_file(&mut tester, &missing),
        Err(ParseError::Io(_))
    ));
}
