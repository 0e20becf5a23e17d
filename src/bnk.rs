// SPDX-FileCopyrightText: 2026 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::{Cursor, Seek, SeekFrom};

use binrw::{BinRead, BinReaderExt, BinResult, binrw};
use tracing::{debug, warn};

use crate::ByteSpan;
use crate::common_file_operations::section_identifier_string;
use crate::hirc::HircSection;

/// "BKHD"
pub const BKHD_ID: u32 = u32::from_le_bytes(*b"BKHD");
/// "HIRC"
pub const HIRC_ID: u32 = u32::from_le_bytes(*b"HIRC");

#[binrw]
#[brw(little)]
#[derive(Debug)]
struct SectionHeader {
    identifier: u32,
    /// In bytes, the size of the section body following this header.
    length: u32,
}

/// The start of the bank header (BKHD) section. The rest of the section varies with the format
/// version and is skipped.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankHeader {
    /// The bank format version.
    pub version: u32,
    /// The id of this bank.
    pub id: u32,
}

/// Sound bank file, usually with the `.bnk` file extension.
///
/// A bank is a sequence of length-framed sections. Only the bank header and the object hierarchy
/// are decoded here; the remaining sections (media index, embedded media, string table) are
/// skipped over.
#[derive(Debug)]
pub struct Bnk {
    pub header: Option<BankHeader>,
    pub hierarchy: Option<HircSection>,
}

impl Bnk {
    /// Parses an existing BNK file.
    ///
    /// `skip_base_params` consumes the node base parameter block used by container objects in the
    /// hierarchy section, see [`HircSection::read`].
    pub fn from_existing<'a, F>(buffer: ByteSpan<'a>, mut skip_base_params: F) -> Option<Bnk>
    where
        F: FnMut(&mut Cursor<ByteSpan<'a>>) -> BinResult<()>,
    {
        let mut cursor = Cursor::new(buffer);

        let mut header = None;
        let mut hierarchy = None;

        while (cursor.position() as usize) < buffer.len() {
            let section = SectionHeader::read(&mut cursor).ok()?;

            let body_end = cursor
                .position()
                .checked_add(u64::from(section.length))
                .filter(|end| *end as usize <= buffer.len())?;

            match section.identifier {
                BKHD_ID => header = Some(cursor.read_le::<BankHeader>().ok()?),
                HIRC_ID => match HircSection::read(&mut cursor, section.length, &mut skip_base_params) {
                    Ok(section) => hierarchy = Some(section),
                    Err(err) => {
                        warn!(%err, "Failed to parse the hierarchy section");
                        return None;
                    }
                },
                identifier => {
                    debug!(
                        identifier = %section_identifier_string(identifier),
                        "Skipping unhandled section"
                    );
                }
            }

            // Sections are framed the same way records are: wherever their parser stops, the next
            // one starts at the declared end.
            cursor.seek(SeekFrom::Start(body_end)).ok()?;
        }

        Some(Bnk { header, hierarchy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_section(identifier: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut bytes = identifier.to_vec();
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(body);
        bytes
    }

    fn bkhd_body() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&145u32.to_le_bytes());
        body.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        body.extend_from_slice(&[0u8; 12]); // language id and such
        body
    }

    fn hirc_body() -> Vec<u8> {
        // One Sound object.
        let mut body = 1u32.to_le_bytes().to_vec();
        body.push(2);
        body.extend_from_slice(&13u32.to_le_bytes());
        body.extend_from_slice(&700u32.to_le_bytes());
        body.extend_from_slice(&[0u8; 5]);
        body.extend_from_slice(&900u32.to_le_bytes());
        body
    }

    fn no_base_params(_: &mut Cursor<ByteSpan>) -> BinResult<()> {
        Ok(())
    }

    #[test]
    fn read_header_and_hierarchy() {
        let mut bytes = bank_section(b"BKHD", &bkhd_body());
        bytes.extend_from_slice(&bank_section(b"HIRC", &hirc_body()));

        let bnk = Bnk::from_existing(&bytes, no_base_params).unwrap();
        assert_eq!(
            bnk.header,
            Some(BankHeader {
                version: 145,
                id: 0xDEAD_BEEF,
            })
        );

        let hirc = bnk.hierarchy.unwrap();
        assert_eq!(hirc.entries.len(), 1);
        assert_eq!(hirc.entries[0].id, 700);
    }

    #[test]
    fn unhandled_sections_are_skipped() {
        let mut bytes = bank_section(b"BKHD", &bkhd_body());
        bytes.extend_from_slice(&bank_section(b"STID", &[0xAB; 20]));
        bytes.extend_from_slice(&bank_section(b"HIRC", &hirc_body()));

        let bnk = Bnk::from_existing(&bytes, no_base_params).unwrap();
        assert!(bnk.header.is_some());
        assert!(bnk.hierarchy.is_some());
    }

    #[test]
    fn missing_hierarchy_section() {
        let bytes = bank_section(b"BKHD", &bkhd_body());

        let bnk = Bnk::from_existing(&bytes, no_base_params).unwrap();
        assert!(bnk.header.is_some());
        assert!(bnk.hierarchy.is_none());
    }

    #[test]
    fn section_length_past_buffer_end() {
        let mut bytes = bank_section(b"BKHD", &bkhd_body());
        bytes.extend_from_slice(b"HIRC");
        bytes.extend_from_slice(&0xFFFFu32.to_le_bytes());

        assert!(Bnk::from_existing(&bytes, no_base_params).is_none());
    }

    #[test]
    fn corrupt_hierarchy_fails_the_file() {
        // The HIRC body promises an object but ends at the record header.
        let mut body = 1u32.to_le_bytes().to_vec();
        body.push(2);
        body.extend_from_slice(&0xFFFFu32.to_le_bytes());

        let bytes = bank_section(b"HIRC", &body);

        assert!(Bnk::from_existing(&bytes, no_base_params).is_none());
    }

    #[test]
    fn empty_buffer() {
        let bnk = Bnk::from_existing(&[], no_base_params).unwrap();
        assert!(bnk.header.is_none());
        assert!(bnk.hierarchy.is_none());
    }
}
