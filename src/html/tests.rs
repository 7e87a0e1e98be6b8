/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use encoding_rs::WINDOWS_1252;

use super::*;
use crate::ParseError;

fn html_with(xml: &str, options: &HtmlOptions) -> Vec<u8> {
    to_html(xml.as_bytes(), Vec::new(), options).unwrap()
}

fn html(xml: &str) -> String {
    let options = HtmlOptions {
        final_newline: false,
        ..Default::default()
    };
    String::from_utf8(html_with(xml, &options)).unwrap()
}

fn ascii(xml: &str) -> String {
    let options = HtmlOptions {
        final_newline: false,
        ..HtmlOptions::with_label("us-ascii").unwrap()
    };
    String::from_utf8(html_with(xml, &options)).unwrap()
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn supplementary_characters() {
    assert_eq!(ascii("<p>\u{1f600}</p>"), "<p>&#128512;</p>");
    assert_eq!(ascii("<p>&#x1F600;&#128512;</p>"), "<p>&#128512;&#128512;</p>");
    assert_eq!(
        ascii("<p title='\u{2000b}'>\u{1d11e} x</p>"),
        "<p title=\"&#131083;\">&#119070; x</p>"
    );
    assert_eq!(html("<p>\u{1f600}</p>"), "<p>\u{1f600}</p>");
}

#[test]
fn legacy_charset() {
    let options = HtmlOptions {
        encoding: WINDOWS_1252,
        ..Default::default()
    };
    assert_eq!(
        html_with("<p>caf\u{e9} \u{1f600}</p>", &options),
        b"<p>caf\xe9 &#128512;</p>\n"
    );
}

#[test]
fn void_elements() {
    assert_eq!(
        html("<r><br/><img src='a.png'/><BR></BR><x/><p></p></r>"),
        "<r><br><img src=\"a.png\"><BR><x></x><p></p></r>"
    );
}

#[test]
fn raw_text_elements() {
    assert_eq!(
        html("<r><script>if (a &lt; b &amp;&amp; c) {}</script><style>p > a {}</style></r>"),
        "<r><script>if (a < b && c) {}</script><style>p > a {}</style></r>"
    );
    assert_eq!(
        ascii("<script>s = \"\u{1d11e}\";</script>"),
        "<script>s = \"&#119070;\";</script>"
    );
    assert_eq!(html("<r><script/>&lt;</r>"), "<r><script></script>&lt;</r>");
}

#[test]
fn escaping() {
    assert_eq!(
        html("<p>a &lt; b &amp; c &gt; d \"e\"</p>"),
        "<p>a &lt; b &amp; c &gt; d \"e\"</p>"
    );
    assert_eq!(
        html("<a href='?a=1&amp;b=\"2\"' title=\"&lt;x&gt;\"/>"),
        "<a href=\"?a=1&amp;b=&quot;2&quot;\" title=\"<x>\"></a>"
    );
}

#[test]
fn boolean_attributes() {
    assert_eq!(
        html("<input checked='checked' DISABLED='disabled' selected='no' value='x'/>"),
        "<input checked DISABLED selected=\"no\" value=\"x\">"
    );
}

#[test]
fn namespaced_elements() {
    assert_eq!(
        html("<r xmlns:s='urn:s'><s:br/><s:script>&lt;</s:script></r>"),
        "<r><s:br></s:br><s:script>&lt;</s:script></r>"
    );
}

#[test]
fn doctype_and_newline() {
    let options = HtmlOptions {
        doctype: true,
        ..Default::default()
    };
    assert_eq!(
        html_with("<html><body/></html>", &options),
        b"<!DOCTYPE html>\n<html><body></body></html>\n"
    );
}

#[test]
fn encodings() {
    assert_eq!(HtmlOptions::default().encoding, UTF_8);
    assert_eq!(HtmlOptions::with_label("ISO-8859-1").unwrap().encoding, WINDOWS_1252);
    assert!(matches!(
        HtmlOptions::with_label("klingon"),
        Err(HtmlError::UnknownEncoding(label)) if label == "klingon"
    ));

    let options = HtmlOptions::with_label("utf-16").unwrap();
    assert!(matches!(
        HtmlSerializer::new(Vec::new(), &options),
        Err(HtmlError::UnsupportedEncoding("UTF-16LE"))
    ));
    assert!(matches!(
        to_html("<a/>".as_bytes(), Vec::new(), &options),
        Err(HtmlError::UnsupportedEncoding(_))
    ));
}

#[test]
fn bad_documents() {
    let options = HtmlOptions::default();
    assert!(matches!(
        to_html("<p>".as_bytes(), Vec::new(), &options),
        Err(HtmlError::Parse(ParseError::Sax { .. }))
    ));
    assert!(matches!(
        to_html("<p>&#xD83D;&#xDE00;</p>".as_bytes(), Vec::new(), &options),
        Err(HtmlError::Parse(ParseError::Sax {
            error: SaxError::BadXml(_),
            ..
        }))
    ));
}

#[test]
fn write_errors() {
    let options = HtmlOptions::default();
    let mut serializer = HtmlSerializer::new(FailingWriter, &options).unwrap();
    let result = NamespaceParser::new().parse_reader(&mut serializer, "<a>b</a>".as_bytes());
    assert!(matches!(
        result,
        Err(ParseError::Sax {
            error: SaxError::HandlerAbort,
            ..
        })
    ));
    assert_eq!(serializer.take_error().unwrap().to_string(), "disk full");

    assert!(matches!(
        to_html("<a>b</a>".as_bytes(), FailingWriter, &options),
        Err(HtmlError::Io(_))
    ));
}

#[test]
fn html_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.xml");
    let output = dir.path().join("out.html");
    std::fs::write(&input, "<p>\u{1f600}</p>").unwrap();

    let options = HtmlOptions::with_label("iso-8859-1").unwrap();
    to_html_file(&input, &output, &options).unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), b"<p>&#128512;</p>\n");

    assert!(matches!(
        to_html_file(dir.path().join("missing.xml"), &output, &options),
        Err(HtmlError::Io(_))
    ));
}
