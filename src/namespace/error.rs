/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use thiserror::Error;

use crate::Location;
use crate::SaxError;

/// Error from parsing a whole XML stream.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reading the input failed.
    #[error("cannot read XML input: {0}")]
    Io(#[from] std::io::Error),

    /// The parser or the handler stopped the processing.
    #[error("{error} at {location}")]
    Sax { error: SaxError, location: Location },
}

pub(super) mod description {
    pub(in super::super) const BAD_QNAME: &str = "name has an empty prefix or local part";
    pub(in super::super) const UNBOUND_PREFIX: &str = "namespace prefix is not declared";
    pub(in super::super) const EMPTY_PREFIX_BINDING: &str =
        "namespace prefix cannot be bound to an empty URI";
    pub(in super::super) const DUPLICATE_ATTRIBUTE: &str =
        "attribute name already used in this tag";
    pub(in super::super) const TAG_MISMATCH: &str = "start and end tags have different names";
}
