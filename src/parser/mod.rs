/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2000-2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;
mod location;

pub(crate) use error::description;
pub use error::SaxError;
pub use location::Location;

/// An XML element returned from the parser.
#[derive(Debug, Eq, PartialEq)]
pub enum SaxElement<'a> {
    /// A start tag or empty element tag.
    ///
    /// The argument is the full name of the tag. This element is sent to the
    /// handler as soon as the name is parsed, before any attributes.
    StartTag(&'a str),

    /// A tag attribute for the last StartTag.
    ///
    /// First argument is the attribute name and the second argument is the
    /// attribute value with all references replaced by the actual characters.
    Attribute(&'a str, &'a str),

    /// The last StartTag is complete and its content follows.
    StartTagContent,

    /// The last StartTag was an empty element tag and has no content.
    StartTagEmpty,

    /// An end tag element.
    ///
    /// The argument is the full name of the end tag.
    EndTag(&'a str),

    /// A character data element.
    ///
    /// You might get this element several times for a single continuous
    /// block of text, e.g. when the document is parsed in multiple calls.
    /// Fragments are always split on character boundaries, so a
    /// supplementary character is never delivered in halves.
    CData(&'a str),
}

pub trait SaxHandler {
    fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError>;
}

impl<F> SaxHandler for F
where
    F: FnMut(&SaxElement) -> Result<(), SaxError>,
{
    fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
        self(element)
    }
}

/// SAX (Simple API for XML) based XML parser.
///
/// Processes incoming bytes and invokes a handler for each encountered
/// XML element. Input can be given in blocks of any size; a block may end in
/// the middle of a tag or even in the middle of a UTF-8 sequence.
///
/// # Examples
///
/// ```
/// use xmlgold::{SaxElement, SaxError, SaxParser};
///
/// let mut names = Vec::new();
/// let mut handler = |element: &SaxElement| -> Result<(), SaxError> {
///     if let SaxElement::StartTag(name) = element {
///         names.push(name.to_string());
///     }
///     Ok(())
/// };
///
/// let mut parser = SaxParser::new();
/// parser.parse_bytes(&mut handler, b"<doc><a/>")?;
/// parser.parse_bytes(&mut handler, b"<b></b></doc>")?;
/// parser.parse_finish()?;
/// assert_eq!(names, ["doc", "a", "b"]);
/// # Ok::<(), SaxError>(())
/// ```
pub struct SaxParser {
    state: State,
    uni_len: u32,
    uni_left: u32,
    uni_char: u32,
    depth: usize,
    is_end_tag: bool,
    in_value: bool,
    after_cr: bool,
    text_brackets: u8,
    seen_content: bool,
    failed: bool,
    quote: u8,
    value_pos: usize,
    char_ref: u32,
    buffer: Vec<u8>,
    ref_buffer: Vec<u8>,
    location: Location,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Keyword {
    CDataSection,
    Doctype,
}

impl Keyword {
    fn error(self) -> &'static str {
        match self {
            Keyword::CDataSection => description::MARKUP_CDATA_SECTION_BAD_START,
            Keyword::Doctype => description::MARKUP_DOCTYPE_BAD_START,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Prolog,
    TagOpen,
    Markup,
    Keyword {
        word: &'static [u8],
        matched: usize,
        keyword: Keyword,
    },
    CommentOpen,
    Comment,
    CommentDash,
    CommentDashDash,
    PI,
    PIEnd,
    DoctypeWhitespace,
    DoctypeBody,
    DoctypeSubset,
    DoctypeLiteral {
        subset: bool,
    },
    TagName,
    EndTagWhitespace,
    EmptyTagEnd,
    AttributeWhitespace,
    AttributeName,
    AttributeEq,
    AttributeValueStart,
    AttributeValue,
    Content,
    CDataSection,
    CDataSectionBracket,
    CDataSectionBrackets,
    Reference,
    Entity,
    CharReference,
    DecimalCharReference,
    HexCharReference,
    Epilog,
}

const INITIAL_BUFFER_CAPACITY: usize = 128;

const REF_BUFFER_SIZE: usize = 8;

const MAX_CODE_POINT: u32 = 0x10ffff;

const BYTE_ORDER_MARK: &[u8] = b"\xef\xbb\xbf";

macro_rules! whitespace {
    () => {
        b' ' | b'\t' | b'\r' | b'\n'
    };
}

macro_rules! xml_error {
    ($a:ident) => {
        return Err(SaxError::BadXml(description::$a));
    };
}

pub(crate) fn is_valid_xml_char(c: u32) -> bool {
    matches!(
        c,
        0x09 | 0x0a | 0x0d | 0x20..=0xd7ff | 0xe000..=0xfffd | 0x10000..=MAX_CODE_POINT
    )
}

fn buffer_str(bytes: &[u8]) -> Result<&str, SaxError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(_) => Err(SaxError::BadXml(description::UTF8_INCOMPLETE_SEQUENCE)),
    }
}

impl SaxParser {
    /// Creates a new SAX parser instance.
    ///
    /// The instance can be reused for multiple documents with the
    /// [reset()](SaxParser::reset) method.
    pub fn new() -> SaxParser {
        SaxParser {
            state: State::Prolog,
            uni_len: 0,
            uni_left: 0,
            uni_char: 0,
            depth: 0,
            is_end_tag: false,
            in_value: false,
            after_cr: false,
            text_brackets: 0,
            seen_content: false,
            failed: false,
            quote: b'"',
            value_pos: 0,
            char_ref: 0,
            buffer: Vec::with_capacity(INITIAL_BUFFER_CAPACITY),
            ref_buffer: Vec::with_capacity(REF_BUFFER_SIZE),
            location: Location::new(),
        }
    }

    /// Resets the parser into a clean state, keeping the allocated buffers.
    pub fn reset(&mut self) {
        self.state = State::Prolog;
        self.uni_len = 0;
        self.uni_left = 0;
        self.uni_char = 0;
        self.depth = 0;
        self.is_end_tag = false;
        self.in_value = false;
        self.after_cr = false;
        self.text_brackets = 0;
        self.seen_content = false;
        self.failed = false;
        self.quote = b'"';
        self.value_pos = 0;
        self.char_ref = 0;
        self.buffer.clear();
        self.ref_buffer.clear();
        self.location = Location::new();
    }

    /// Position just after the last consumed byte.
    ///
    /// After an error this is the position of the offending byte.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Checks if the document is complete.
    ///
    /// A completed document has a root tag and no unfinished XML constructs,
    /// such as open comments, markup, or a truncated UTF-8 sequence.
    pub fn parse_finish(&mut self) -> Result<(), SaxError> {
        if self.failed {
            xml_error!(PARSER_REUSE_WITHOUT_RESET);
        }
        if self.uni_left > 0 {
            xml_error!(UTF8_INCOMPLETE_SEQUENCE);
        }
        if !self.seen_content {
            xml_error!(DOC_NO_CONTENT);
        }
        if self.depth > 0 {
            xml_error!(DOC_OPEN_TAGS);
        }
        if self.state != State::Epilog {
            xml_error!(DOC_OPEN_MARKUP);
        }
        Ok(())
    }

    /// Parses given XML bytes and checks if the document is complete.
    ///
    /// Convenience for calling [parse_bytes()](SaxParser::parse_bytes)
    /// and [parse_finish()](SaxParser::parse_finish).
    pub fn parse_bytes_finish(
        &mut self,
        handler: &mut impl SaxHandler,
        bytes: &[u8],
    ) -> Result<(), SaxError> {
        self.parse_bytes(handler, bytes)?;
        self.parse_finish()
    }

    /// Parses given XML bytes.
    ///
    /// Once an error is returned, the parser refuses further input until
    /// [reset()](SaxParser::reset) is called.
    pub fn parse_bytes(
        &mut self,
        handler: &mut impl SaxHandler,
        bytes: &[u8],
    ) -> Result<(), SaxError> {
        if self.failed {
            xml_error!(PARSER_REUSE_WITHOUT_RESET);
        }
        let result = self.parse_block(handler, bytes);
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), SaxError> {
        if bytes.is_empty() {
            return Ok(());
        }
        if self.buffer.try_reserve(bytes.len()).is_err() {
            return Err(SaxError::NoMemory);
        }
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    // Sends the buffered character data. With `partial` set, a trailing
    // incomplete UTF-8 sequence stays in the buffer for the next block.
    fn flush_text(&mut self, handler: &mut impl SaxHandler, partial: bool) -> Result<(), SaxError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let sent = match std::str::from_utf8(&self.buffer) {
            Ok(text) => {
                handler.handle_element(&SaxElement::CData(text))?;
                self.buffer.len()
            }
            Err(err) if partial && err.error_len().is_none() => {
                let valid = err.valid_up_to();
                if valid > 0 {
                    let text = buffer_str(&self.buffer[..valid])?;
                    handler.handle_element(&SaxElement::CData(text))?;
                }
                valid
            }
            Err(_) => {
                xml_error!(UTF8_INCOMPLETE_SEQUENCE);
            }
        };
        self.buffer.drain(..sent);
        Ok(())
    }

    fn check_utf8(&mut self, c: u8) -> Result<(), SaxError> {
        if self.uni_left > 0 {
            if c & 0xc0 != 0x80 {
                xml_error!(UTF8_INVALID_CONT_BYTE);
            }
            self.uni_char = (self.uni_char << 6) | (c as u32 & 0x3f);
            self.uni_left -= 1;
            if self.uni_left == 0 {
                // Sequences longer than the actual codepoint size are
                // security hazards.
                let min = match self.uni_len {
                    2 => 0x80,
                    3 => 0x800,
                    _ => 0x10000,
                };
                if self.uni_char < min {
                    xml_error!(UTF8_OVERLONG_SEQUENCE);
                }
                if !is_valid_xml_char(self.uni_char) {
                    xml_error!(CHAR_INVALID);
                }
            }
        } else if c & 0x80 != 0 {
            let (len, bits) = match c {
                0xc0..=0xdf => (2, c & 0x1f),
                0xe0..=0xef => (3, c & 0x0f),
                0xf0..=0xf7 => (4, c & 0x07),
                _ => {
                    xml_error!(UTF8_INVALID_PREFIX_BYTE);
                }
            };
            self.uni_len = len;
            self.uni_left = len - 1;
            self.uni_char = bits as u32;
        } else if c < 0x20 && !matches!(c, b'\t' | b'\n' | b'\r') {
            xml_error!(CHAR_INVALID);
        }
        Ok(())
    }

    // Line ends become a single newline in text and every whitespace
    // becomes a space in attribute values. A '\n' after a '\r' is dropped.
    fn push_line_end(
        &mut self,
        pending: &[u8],
        c: u8,
        after_cr: bool,
        replacement: &[u8],
    ) -> Result<(), SaxError> {
        self.push_bytes(pending)?;
        if c == b'\r' {
            self.after_cr = true;
        } else if c == b'\n' && after_cr {
            return Ok(());
        }
        self.push_bytes(replacement)
    }

    fn close_tag(&mut self) -> Result<(), SaxError> {
        if self.depth == 0 {
            xml_error!(TAG_CLOSE_WITHOUT_OPEN);
        }
        self.depth -= 1;
        self.state = if self.depth == 0 {
            State::Epilog
        } else {
            State::Content
        };
        Ok(())
    }

    fn markup_end(&mut self) {
        self.state = if self.depth > 0 {
            State::Content
        } else if self.seen_content {
            State::Epilog
        } else {
            State::Prolog
        };
    }

    fn reference_end(&mut self) {
        self.state = if self.in_value {
            State::AttributeValue
        } else {
            State::Content
        };
    }

    fn add_ref_digit(&mut self, radix: u32, digit: u32) -> Result<(), SaxError> {
        match self
            .char_ref
            .checked_mul(radix)
            .and_then(|value| value.checked_add(digit))
        {
            Some(value) if value <= MAX_CODE_POINT => {
                self.char_ref = value;
                Ok(())
            }
            _ => {
                xml_error!(CHAR_INVALID);
            }
        }
    }

    fn push_char_ref(&mut self) -> Result<(), SaxError> {
        if !is_valid_xml_char(self.char_ref) {
            xml_error!(CHAR_INVALID);
        }
        let Some(c) = char::from_u32(self.char_ref) else {
            xml_error!(CHAR_INVALID);
        };
        let mut buf = [0u8; 4];
        self.push_bytes(c.encode_utf8(&mut buf).as_bytes())
    }

    fn parse_block(&mut self, handler: &mut impl SaxHandler, bytes: &[u8]) -> Result<(), SaxError> {
        let mut pos: usize = 0;
        let mut back: usize = 0;

        while pos < bytes.len() {
            let c = bytes[pos];
            self.check_utf8(c)?;
            let after_cr = std::mem::replace(&mut self.after_cr, false);

            match self.state {
                State::Prolog | State::Epilog => match c {
                    b'<' => self.state = State::TagOpen,
                    whitespace!() => (),
                    _ if self.state == State::Prolog
                        && BYTE_ORDER_MARK.get(self.location.offset) == Some(&c) => {}
                    _ => {
                        xml_error!(DOC_CDATA_WITHOUT_PARENT);
                    }
                },

                State::TagOpen => match c {
                    b'!' => self.state = State::Markup,
                    b'?' => self.state = State::PI,
                    b'/' => {
                        if self.depth == 0 {
                            xml_error!(TAG_CLOSE_WITHOUT_OPEN);
                        }
                        back = pos + 1;
                        self.is_end_tag = true;
                        self.state = State::TagName;
                    }
                    whitespace!() => {
                        xml_error!(TAG_WHITESPACE_START);
                    }
                    b'>' => {
                        xml_error!(TAG_EMPTY_NAME);
                    }
                    b'<' | b'=' | b'"' | b'\'' => {
                        xml_error!(TAG_BAD_NAME);
                    }
                    _ => {
                        if self.depth == 0 && self.seen_content {
                            xml_error!(TAG_OUTSIDE_ROOT);
                        }
                        self.depth += 1;
                        back = pos;
                        self.is_end_tag = false;
                        self.seen_content = true;
                        self.state = State::TagName;
                    }
                },

                State::Markup => match c {
                    b'-' => self.state = State::CommentOpen,
                    b'[' => {
                        if self.depth == 0 {
                            xml_error!(MARKUP_CDATA_SECTION_OUTSIDE_ROOT);
                        }
                        self.state = State::Keyword {
                            word: b"CDATA[",
                            matched: 0,
                            keyword: Keyword::CDataSection,
                        };
                    }
                    b'D' => {
                        if self.seen_content {
                            xml_error!(MARKUP_DOCTYPE_MISPLACED);
                        }
                        self.state = State::Keyword {
                            word: b"OCTYPE",
                            matched: 0,
                            keyword: Keyword::Doctype,
                        };
                    }
                    _ => {
                        xml_error!(MARKUP_UNRECOGNIZED);
                    }
                },

                State::Keyword {
                    word,
                    matched,
                    keyword,
                } => {
                    if c != word[matched] {
                        return Err(SaxError::BadXml(keyword.error()));
                    }
                    if matched + 1 < word.len() {
                        self.state = State::Keyword {
                            word,
                            matched: matched + 1,
                            keyword,
                        };
                    } else {
                        match keyword {
                            Keyword::CDataSection => {
                                back = pos + 1;
                                self.state = State::CDataSection;
                            }
                            Keyword::Doctype => self.state = State::DoctypeWhitespace,
                        }
                    }
                }

                State::DoctypeWhitespace => match c {
                    whitespace!() => self.state = State::DoctypeBody,
                    _ => {
                        xml_error!(MARKUP_DOCTYPE_BAD_START);
                    }
                },

                State::DoctypeBody => match c {
                    b'[' => self.state = State::DoctypeSubset,
                    b'>' => self.state = State::Prolog,
                    b'"' | b'\'' => {
                        self.quote = c;
                        self.state = State::DoctypeLiteral { subset: false };
                    }
                    _ => (),
                },

                State::DoctypeSubset => match c {
                    b']' => self.state = State::DoctypeBody,
                    b'"' | b'\'' => {
                        self.quote = c;
                        self.state = State::DoctypeLiteral { subset: true };
                    }
                    _ => (),
                },

                State::DoctypeLiteral { subset } => {
                    if c == self.quote {
                        self.state = if subset {
                            State::DoctypeSubset
                        } else {
                            State::DoctypeBody
                        };
                    }
                }

                State::CommentOpen => {
                    if c != b'-' {
                        xml_error!(COMMENT_MISSING_DASH);
                    }
                    self.state = State::Comment;
                }

                State::Comment => {
                    if c == b'-' {
                        self.state = State::CommentDash;
                    }
                }

                State::CommentDash => match c {
                    b'-' => self.state = State::CommentDashDash,
                    _ => self.state = State::Comment,
                },

                State::CommentDashDash => {
                    if c != b'>' {
                        xml_error!(COMMENT_DOUBLE_DASH);
                    }
                    back = pos + 1;
                    self.markup_end();
                }

                State::PI => {
                    if c == b'?' {
                        self.state = State::PIEnd;
                    }
                }

                State::PIEnd => match c {
                    b'>' => {
                        back = pos + 1;
                        self.markup_end();
                    }
                    b'?' => (),
                    _ => self.state = State::PI,
                },

                State::TagName => match c {
                    b'/' | b'>' | whitespace!() => {
                        self.push_bytes(&bytes[back..pos])?;
                        if self.buffer.is_empty() {
                            xml_error!(TAG_EMPTY_NAME);
                        }
                        if self.is_end_tag && c == b'/' {
                            xml_error!(TAG_DOUBLE_END);
                        }
                        let name = buffer_str(&self.buffer)?;
                        if self.is_end_tag {
                            handler.handle_element(&SaxElement::EndTag(name))?;
                        } else {
                            handler.handle_element(&SaxElement::StartTag(name))?;
                        }
                        self.buffer.clear();
                        match c {
                            b'/' => self.state = State::EmptyTagEnd,
                            b'>' => {
                                back = pos + 1;
                                if self.is_end_tag {
                                    self.close_tag()?;
                                } else {
                                    handler.handle_element(&SaxElement::StartTagContent)?;
                                    self.state = State::Content;
                                }
                            }
                            _ => {
                                self.state = if self.is_end_tag {
                                    State::EndTagWhitespace
                                } else {
                                    State::AttributeWhitespace
                                };
                            }
                        }
                    }
                    b'<' | b'=' | b'"' | b'\'' => {
                        xml_error!(TAG_BAD_NAME);
                    }
                    _ => (),
                },

                State::EmptyTagEnd => {
                    if c != b'>' {
                        xml_error!(TAG_EMPTY_TAG_MISSING_END);
                    }
                    handler.handle_element(&SaxElement::StartTagEmpty)?;
                    back = pos + 1;
                    self.close_tag()?;
                }

                State::EndTagWhitespace => match c {
                    b'>' => {
                        back = pos + 1;
                        self.close_tag()?;
                    }
                    whitespace!() => (),
                    _ => {
                        xml_error!(TAG_END_TAG_ATTRIBUTES);
                    }
                },

                State::AttributeWhitespace => match c {
                    whitespace!() => (),
                    b'/' => self.state = State::EmptyTagEnd,
                    b'>' => {
                        handler.handle_element(&SaxElement::StartTagContent)?;
                        back = pos + 1;
                        self.state = State::Content;
                    }
                    b'<' | b'=' | b'"' | b'\'' => {
                        xml_error!(TAG_ATTRIBUTE_BAD_NAME);
                    }
                    _ => {
                        back = pos;
                        self.state = State::AttributeName;
                    }
                },

                State::AttributeName => match c {
                    b'=' => {
                        self.push_bytes(&bytes[back..pos])?;
                        self.state = State::AttributeValueStart;
                    }
                    whitespace!() => {
                        self.push_bytes(&bytes[back..pos])?;
                        self.state = State::AttributeEq;
                    }
                    b'/' | b'>' | b'<' | b'"' | b'\'' => {
                        xml_error!(TAG_ATTRIBUTE_BAD_NAME);
                    }
                    _ => (),
                },

                State::AttributeEq => match c {
                    b'=' => self.state = State::AttributeValueStart,
                    whitespace!() => (),
                    _ => {
                        xml_error!(TAG_ATTRIBUTE_WITHOUT_EQUAL);
                    }
                },

                State::AttributeValueStart => match c {
                    b'"' | b'\'' => {
                        self.quote = c;
                        self.value_pos = self.buffer.len();
                        back = pos + 1;
                        self.state = State::AttributeValue;
                    }
                    whitespace!() => (),
                    _ => {
                        xml_error!(TAG_ATTRIBUTE_WITHOUT_QUOTE);
                    }
                },

                State::AttributeValue => match c {
                    b'&' => {
                        self.push_bytes(&bytes[back..pos])?;
                        self.ref_buffer.clear();
                        self.in_value = true;
                        self.state = State::Reference;
                    }
                    b'<' => {
                        xml_error!(TAG_ATTRIBUTE_BAD_VALUE);
                    }
                    b'\t' | b'\n' | b'\r' => {
                        self.push_line_end(&bytes[back..pos], c, after_cr, b" ")?;
                        back = pos + 1;
                    }
                    _ if c == self.quote => {
                        self.push_bytes(&bytes[back..pos])?;
                        let (name, value) = self.buffer.split_at(self.value_pos);
                        let name = buffer_str(name)?;
                        let value = buffer_str(value)?;
                        handler.handle_element(&SaxElement::Attribute(name, value))?;
                        self.buffer.clear();
                        self.state = State::AttributeWhitespace;
                    }
                    _ => (),
                },

                State::Content => {
                    let brackets = std::mem::take(&mut self.text_brackets);
                    match c {
                        b'<' => {
                            self.push_bytes(&bytes[back..pos])?;
                            self.flush_text(handler, false)?;
                            self.state = State::TagOpen;
                        }
                        b'&' => {
                            self.push_bytes(&bytes[back..pos])?;
                            self.ref_buffer.clear();
                            self.in_value = false;
                            self.state = State::Reference;
                        }
                        b']' => self.text_brackets = brackets.saturating_add(1),
                        b'>' if brackets >= 2 => {
                            xml_error!(TEXT_CDATA_SECTION_END);
                        }
                        b'\r' | b'\n' if c == b'\r' || after_cr => {
                            self.push_line_end(&bytes[back..pos], c, after_cr, b"\n")?;
                            back = pos + 1;
                        }
                        _ => (),
                    }
                }

                State::CDataSection => match c {
                    b']' => {
                        self.push_bytes(&bytes[back..pos])?;
                        self.state = State::CDataSectionBracket;
                    }
                    b'\r' | b'\n' if c == b'\r' || after_cr => {
                        self.push_line_end(&bytes[back..pos], c, after_cr, b"\n")?;
                        back = pos + 1;
                    }
                    _ => (),
                },

                State::CDataSectionBracket => match c {
                    b']' => self.state = State::CDataSectionBrackets,
                    _ => {
                        self.push_bytes(b"]")?;
                        back = pos;
                        if c == b'\r' {
                            self.push_line_end(&[], c, after_cr, b"\n")?;
                            back = pos + 1;
                        }
                        self.state = State::CDataSection;
                    }
                },

                State::CDataSectionBrackets => match c {
                    b'>' => {
                        back = pos + 1;
                        self.state = State::Content;
                    }
                    b']' => self.push_bytes(b"]")?,
                    _ => {
                        self.push_bytes(b"]]")?;
                        back = pos;
                        if c == b'\r' {
                            self.push_line_end(&[], c, after_cr, b"\n")?;
                            back = pos + 1;
                        }
                        self.state = State::CDataSection;
                    }
                },

                State::Reference => match c {
                    b'#' => {
                        self.char_ref = 0;
                        self.state = State::CharReference;
                    }
                    b';' => {
                        xml_error!(REFERENCE_EMPTY);
                    }
                    whitespace!() | b'<' | b'&' | b'"' | b'\'' => {
                        xml_error!(REFERENCE_BAD_NAME);
                    }
                    _ => {
                        self.ref_buffer.push(c);
                        self.state = State::Entity;
                    }
                },

                State::Entity => match c {
                    b';' => {
                        let ent: &[u8] = match self.ref_buffer.as_slice() {
                            b"amp" => b"&",
                            b"lt" => b"<",
                            b"gt" => b">",
                            b"quot" => b"\"",
                            b"apos" => b"'",
                            _ => {
                                return Err(SaxError::NotSupported(
                                    description::REFERENCE_CUSTOM_ENTITY,
                                ));
                            }
                        };
                        self.push_bytes(ent)?;
                        back = pos + 1;
                        self.reference_end();
                    }
                    whitespace!() | b'<' | b'&' | b'"' | b'\'' => {
                        xml_error!(REFERENCE_BAD_NAME);
                    }
                    _ => {
                        if self.ref_buffer.len() >= REF_BUFFER_SIZE {
                            return Err(SaxError::NotSupported(
                                description::REFERENCE_CUSTOM_ENTITY,
                            ));
                        }
                        self.ref_buffer.push(c);
                    }
                },

                State::CharReference => match c {
                    b'x' => self.state = State::HexCharReference,
                    b'0'..=b'9' => {
                        self.add_ref_digit(10, (c - b'0') as u32)?;
                        self.state = State::DecimalCharReference;
                    }
                    _ => {
                        xml_error!(REFERENCE_INVALID_DECIMAL);
                    }
                },

                State::DecimalCharReference => match c {
                    b';' => {
                        self.push_char_ref()?;
                        back = pos + 1;
                        self.reference_end();
                    }
                    b'0'..=b'9' => self.add_ref_digit(10, (c - b'0') as u32)?,
                    _ => {
                        xml_error!(REFERENCE_INVALID_DECIMAL);
                    }
                },

                State::HexCharReference => {
                    if c == b';' {
                        self.push_char_ref()?;
                        back = pos + 1;
                        self.reference_end();
                    } else {
                        match (c as char).to_digit(16) {
                            Some(digit) => self.add_ref_digit(16, digit)?,
                            None => {
                                xml_error!(REFERENCE_INVALID_HEX);
                            }
                        }
                    }
                }
            }

            pos += 1;
            self.location.advance(c);
        }

        match self.state {
            State::TagName | State::AttributeName | State::AttributeValue => {
                self.push_bytes(&bytes[back..pos])?;
            }
            State::Content | State::CDataSection => {
                self.push_bytes(&bytes[back..pos])?;
                self.flush_text(handler, true)?;
            }
            _ => (),
        }

        Ok(())
    }
}

impl Default for SaxParser {
    fn default() -> Self {
        Self::new()
    }
}
