/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2000-2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Display;

/// A position in the parser input byte stream.
///
/// Returned from the [location()](crate::SaxParser::location) method, it
/// points just after the last consumed byte. Columns count characters rather
/// than bytes, so a four byte supplementary character moves the column by one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Location {
    /// Number of bytes consumed.
    pub offset: usize,
    /// Current line, starting from 1.
    pub line: usize,
    /// Characters consumed since the start of the current line.
    pub column: usize,
}

impl Location {
    pub fn new() -> Self {
        Location {
            offset: 0,
            line: 1,
            column: 0,
        }
    }

    pub(super) fn advance(&mut self, c: u8) {
        self.offset += 1;
        if c == b'\n' {
            self.line += 1;
            self.column = 0;
        } else if c & 0xc0 != 0x80 {
            self.column += 1;
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new()
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}, column {} (byte {})",
            self.line, self.column, self.offset
        )
    }
}
