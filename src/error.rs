// SPDX-FileCopyrightText: 2026 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

#[derive(Debug)]
pub enum Error {
    /// A record declared a length that would place its end outside the section, or before its own start.
    CorruptRecordLength {
        /// The four-character identifier of the section being parsed.
        section: &'static str,
        /// Offset of the offending record's body, relative to the start of the buffer.
        offset: u64,
    },
    /// The buffer ended in the middle of a record or section header.
    TruncatedSection {
        /// The four-character identifier of the section being parsed.
        section: &'static str,
        /// The read failure that signalled the truncation.
        source: binrw::Error,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::CorruptRecordLength { section, offset } => {
                write!(f, "corrupt record length in {section} section at offset {offset:#x}")
            }
            Error::TruncatedSection { section, source } => {
                write!(f, "truncated {section} section: {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::TruncatedSection { source, .. } => Some(source),
            _ => None,
        }
    }
}
