/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod golden;
mod html;
mod namespace;
mod parser;
mod recorder;

pub use parser::Location;
pub use parser::SaxElement;
pub use parser::SaxError;
pub use parser::SaxHandler;
pub use parser::SaxParser;

pub use namespace::Attribute;
pub use namespace::Attributes;
pub use namespace::ContentHandler;
pub use namespace::NamespaceParser;
pub use namespace::ParseError;
pub use namespace::StartElement;
pub use namespace::XML_NAMESPACE;

pub use recorder::AttributeRecorder;
pub use recorder::MISSING_VALUE;
pub use recorder::record_attribute;

pub use golden::GoldenComparator;
pub use golden::GoldenError;
pub use golden::TextResource;
pub use golden::compare_lines_with_gold;
pub use golden::compare_with_gold;
pub use golden::compare_with_gold_encoding;
pub use golden::encoding_for_label;
pub use golden::split_lines;

pub use html::HtmlError;
pub use html::HtmlOptions;
pub use html::HtmlSerializer;
pub use html::to_html;
pub use html::to_html_file;
