/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2000-2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use thiserror::Error;

/// Type of the error which happened during the XML SAX parsing.
///
/// These categories are kept as few as possible and correspond to the distinct
/// actions the caller might take. The position of the problem is available via
/// the [location()](super::SaxParser::location) method of the parser.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum SaxError {
    /// Parser could not allocate the memory needed for its buffers.
    #[error("not enough memory")]
    NoMemory,

    /// A syntax error is encountered in the XML input.
    ///
    /// The argument is a short description of the problem, suitable for
    /// showing to the user so they can fix the document.
    #[error("invalid XML syntax: {0}")]
    BadXml(&'static str),

    /// The document uses a construct the parser does not implement.
    ///
    /// Only custom entities declared in DTDs fall into this category.
    #[error("XML construct not supported: {0}")]
    NotSupported(&'static str),

    /// Element handler returned this error.
    ///
    /// Handlers use it to abort the processing while signalling that the
    /// interruption is not caused by the parser itself.
    #[error("handler aborted the parsing")]
    HandlerAbort,
}

pub(crate) mod description {
    pub(crate) const PARSER_REUSE_WITHOUT_RESET: &str =
        "cannot continue after an error without a reset";
    pub(crate) const UTF8_INVALID_CONT_BYTE: &str = "Invalid UTF8 continuation byte";
    pub(crate) const UTF8_OVERLONG_SEQUENCE: &str = "Overlong UTF8 sequence";
    pub(crate) const UTF8_INVALID_PREFIX_BYTE: &str = "Invalid UTF8 prefix byte";
    pub(crate) const UTF8_INCOMPLETE_SEQUENCE: &str = "Input ends inside a UTF8 sequence";
    pub(crate) const CHAR_INVALID: &str = "Invalid XML character";
    pub(crate) const DOC_NO_CONTENT: &str = "Document has no root tag";
    pub(crate) const DOC_OPEN_TAGS: &str = "Document has unclosed tags";
    pub(crate) const DOC_OPEN_MARKUP: &str = "Document epilog has unclosed PI or comment tag";
    pub(crate) const DOC_CDATA_WITHOUT_PARENT: &str =
        "Character data not allowed outside of the root tag";
    pub(crate) const TAG_CLOSE_WITHOUT_OPEN: &str = "Close tag without open";
    pub(crate) const TAG_WHITESPACE_START: &str = "Tag cannot start with whitespace";
    pub(crate) const TAG_OUTSIDE_ROOT: &str = "Tags cannot be outside of the root tag";
    pub(crate) const TAG_EMPTY_NAME: &str = "Tag has no name";
    pub(crate) const TAG_BAD_NAME: &str = "Tag names cannot have '<', '=' or quotes";
    pub(crate) const TAG_DOUBLE_END: &str = "End tag has standalone ending too";
    pub(crate) const TAG_END_TAG_ATTRIBUTES: &str = "End tag cannot have attributes";
    pub(crate) const TAG_EMPTY_TAG_MISSING_END: &str = "Empty element tags must end after the '/'";
    pub(crate) const TAG_ATTRIBUTE_WITHOUT_EQUAL: &str =
        "Tag attributes must have '=' before the value";
    pub(crate) const TAG_ATTRIBUTE_WITHOUT_QUOTE: &str =
        "Tag attribute value must be double or single quotes";
    pub(crate) const TAG_ATTRIBUTE_BAD_NAME: &str =
        "Tag attribute names cannot have '/', '<', '>', '=' or quotes";
    pub(crate) const TAG_ATTRIBUTE_BAD_VALUE: &str =
        "Tag value cannot have '<' character without a reference";
    pub(crate) const REFERENCE_EMPTY: &str = "Reference has no name";
    pub(crate) const REFERENCE_INVALID_DECIMAL: &str = "Non digit in decimal character reference";
    pub(crate) const REFERENCE_INVALID_HEX: &str =
        "Non hex digit in hexadecimal character reference";
    pub(crate) const REFERENCE_BAD_NAME: &str =
        "Reference names cannot have whitespace, '<', '&' or quotes";
    pub(crate) const REFERENCE_CUSTOM_ENTITY: &str =
        "Non-predefined entity references are not supported";
    pub(crate) const TEXT_CDATA_SECTION_END: &str =
        "Character data cannot contain ']]>' outside of a section";
    pub(crate) const COMMENT_MISSING_DASH: &str = "Comment tag should start with double dash";
    pub(crate) const COMMENT_DOUBLE_DASH: &str = "Comment tag should end after double dash";
    pub(crate) const MARKUP_CDATA_SECTION_BAD_START: &str =
        "Character data sections must start with '[CDATA['";
    pub(crate) const MARKUP_CDATA_SECTION_OUTSIDE_ROOT: &str =
        "Character data sections cannot be outside of the root tag";
    pub(crate) const MARKUP_DOCTYPE_BAD_START: &str = "Doctype must start with 'DOCTYPE '";
    pub(crate) const MARKUP_DOCTYPE_MISPLACED: &str = "Doctype must come before the root tag";
    pub(crate) const MARKUP_UNRECOGNIZED: &str =
        "Markup is not a comment, character data section, or document type declaration";
}
