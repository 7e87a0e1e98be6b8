/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io;

use thiserror::Error;

use crate::ParseError;

#[derive(Debug, Error)]
pub enum HtmlError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),

    /// The encoding cannot be written byte-wise with ASCII markup.
    #[error("HTML output in {0} is not supported")]
    UnsupportedEncoding(&'static str),
}
