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
use std::path::PathBuf;

use thiserror::Error;

/// Failure to read or decode a compared resource.
///
/// A content mismatch is never an error, see
/// [GoldenComparator::compare()](super::GoldenComparator::compare).
#[derive(Debug, Error)]
pub enum GoldenError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// The bytes are not valid in the resource encoding.
    #[error("'{}' has a malformed {encoding} byte sequence", .path.display())]
    Malformed {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),

    #[error("cannot write comparison diagnostics: {0}")]
    Diagnostics(#[source] io::Error),
}
