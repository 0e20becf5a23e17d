// SPDX-FileCopyrightText: 2026 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::{Read, Seek, SeekFrom};

use binrw::{BinReaderExt, BinResult};
use tracing::warn;

use crate::Error;

const SECTION_NAME: &str = "HIRC";

/// The kind of a hierarchy object, without its payload. Used to probe [`HircSection::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HircObjectKind {
    Sound,
    Action,
    Event,
    RandomSequenceContainer,
    MusicSegment,
    MusicTrack,
    MusicSwitchContainer,
    MusicRandomSequenceContainer,
}

/// The decoded payload of one hierarchy object.
///
/// All ids held here are unresolved references: they name other entities (possibly in the same
/// section, possibly elsewhere in the game's banks) and are never looked up during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HircObjectData {
    /// A playable sound, pointing at the audio source it plays.
    Sound { source_id: u32 },
    /// An action performed on a game object, such as "play" or "stop".
    Action { action_type: u8, target_id: u32 },
    /// An event triggering a list of actions, in trigger order.
    Event { action_ids: Vec<u32> },
    /// A container playing its children in random or sequence order.
    RandomSequenceContainer { child_ids: Vec<u32> },
    /// A segment of interactive music.
    MusicSegment { child_ids: Vec<u32> },
    /// A music track, pointing at its audio sources in playback order.
    MusicTrack { source_ids: Vec<u32> },
    /// A music container switching between its children.
    MusicSwitchContainer { child_ids: Vec<u32> },
    /// A music container playing its children in random or sequence order.
    MusicRandomSequenceContainer { child_ids: Vec<u32> },
}

impl HircObjectData {
    pub fn kind(&self) -> HircObjectKind {
        match self {
            HircObjectData::Sound { .. } => HircObjectKind::Sound,
            HircObjectData::Action { .. } => HircObjectKind::Action,
            HircObjectData::Event { .. } => HircObjectKind::Event,
            HircObjectData::RandomSequenceContainer { .. } => {
                HircObjectKind::RandomSequenceContainer
            }
            HircObjectData::MusicSegment { .. } => HircObjectKind::MusicSegment,
            HircObjectData::MusicTrack { .. } => HircObjectKind::MusicTrack,
            HircObjectData::MusicSwitchContainer { .. } => HircObjectKind::MusicSwitchContainer,
            HircObjectData::MusicRandomSequenceContainer { .. } => {
                HircObjectKind::MusicRandomSequenceContainer
            }
        }
    }
}

/// One entry of the hierarchy section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HircObject {
    /// The object's id. Not guaranteed to be unique, not even within a kind.
    pub id: u32,
    pub data: HircObjectData,
}

impl HircObject {
    pub fn kind(&self) -> HircObjectKind {
        self.data.kind()
    }
}

/// The object hierarchy section of a sound bank.
///
/// Holds every recognized object in the order it appears in the section. Records with a type the
/// parser doesn't know are skipped and leave no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HircSection {
    pub entries: Vec<HircObject>,
}

enum RecordError {
    CorruptLength { offset: u64 },
    Read(binrw::Error),
}

impl From<binrw::Error> for RecordError {
    fn from(err: binrw::Error) -> Self {
        RecordError::Read(err)
    }
}

impl From<std::io::Error> for RecordError {
    fn from(err: std::io::Error) -> Self {
        RecordError::Read(err.into())
    }
}

impl HircSection {
    /// Parses the hierarchy section from `reader`, which must be positioned at the start of the
    /// section body and have at least `section_length` bytes left.
    ///
    /// `skip_base_params` must consume the node base parameter block that prefixes container
    /// objects, leaving the cursor just past it. Its layout varies with the bank format version
    /// and is supplied by the caller; see [`crate::bnk`].
    pub fn read<R, F>(
        reader: &mut R,
        section_length: u32,
        mut skip_base_params: F,
    ) -> Result<HircSection, Error>
    where
        R: Read + Seek,
        F: FnMut(&mut R) -> BinResult<()>,
    {
        match Self::read_entries(reader, section_length, &mut skip_base_params) {
            Ok(entries) => Ok(HircSection { entries }),
            Err(RecordError::CorruptLength { offset }) => Err(Error::CorruptRecordLength {
                section: SECTION_NAME,
                offset,
            }),
            Err(RecordError::Read(source)) => Err(Error::TruncatedSection {
                section: SECTION_NAME,
                source,
            }),
        }
    }

    fn read_entries<R, F>(
        reader: &mut R,
        section_length: u32,
        skip_base_params: &mut F,
    ) -> Result<Vec<HircObject>, RecordError>
    where
        R: Read + Seek,
        F: FnMut(&mut R) -> BinResult<()>,
    {
        let section_end = reader.stream_position()? + u64::from(section_length);

        let object_count = reader.read_le::<u32>()?;

        let mut entries = Vec::new();
        for _ in 0..object_count {
            let object_type = reader.read_le::<u8>()?;
            let object_length = reader.read_le::<u32>()?;

            // The declared length counts everything after the length field, id included. Every
            // record ends at this position no matter what its decoder consumes, so a decoder that
            // stops short of an unmodeled trailing field (or overshoots into it) can't throw off
            // the records after it.
            let record_start = reader.stream_position()?;
            let record_end = record_start
                .checked_add(u64::from(object_length))
                .filter(|end| *end <= section_end)
                .ok_or(RecordError::CorruptLength {
                    offset: record_start,
                })?;

            let id = reader.read_le::<u32>()?;

            let data = match object_type {
                2 => Some(read_sound(reader)?),
                3 => Some(read_action(reader)?),
                4 => Some(read_event(reader)?),
                5 => Some(read_random_sequence_container(reader, skip_base_params)?),
                10 => Some(read_music_segment(reader, skip_base_params)?),
                11 => Some(read_music_track(reader)?),
                12 => Some(read_music_switch_container(reader, skip_base_params)?),
                13 => Some(read_music_random_sequence_container(
                    reader,
                    skip_base_params,
                )?),
                object_type => {
                    warn!(object_type, id, "Skipping unknown hierarchy object type");
                    None
                }
            };

            if let Some(data) = data {
                entries.push(HircObject { id, data });
            }

            reader.seek(SeekFrom::Start(record_end))?;
        }

        Ok(entries)
    }

    /// Returns every entry of exactly the given kind whose id matches, in section order.
    ///
    /// Ids are not unique, so this can return any number of entries. An entry of a different kind
    /// sharing the same id never matches.
    pub fn find(&self, kind: HircObjectKind, id: u32) -> Vec<&HircObject> {
        self.entries
            .iter()
            .filter(|entry| entry.id == id && entry.kind() == kind)
            .collect()
    }
}

fn read_id_list<R: Read + Seek>(reader: &mut R, count: u32) -> BinResult<Vec<u32>> {
    let mut ids = Vec::new();
    for _ in 0..count {
        ids.push(reader.read_le::<u32>()?);
    }

    Ok(ids)
}

fn read_sound<R: Read + Seek>(reader: &mut R) -> BinResult<HircObjectData> {
    reader.seek(SeekFrom::Current(5))?;

    Ok(HircObjectData::Sound {
        source_id: reader.read_le::<u32>()?,
    })
}

fn read_action<R: Read + Seek>(reader: &mut R) -> BinResult<HircObjectData> {
    reader.seek(SeekFrom::Current(1))?;

    Ok(HircObjectData::Action {
        action_type: reader.read_le::<u8>()?,
        target_id: reader.read_le::<u32>()?,
    })
}

fn read_event<R: Read + Seek>(reader: &mut R) -> BinResult<HircObjectData> {
    let action_count = reader.read_le::<u8>()?;

    Ok(HircObjectData::Event {
        action_ids: read_id_list(reader, u32::from(action_count))?,
    })
}

fn read_random_sequence_container<R, F>(
    reader: &mut R,
    skip_base_params: &mut F,
) -> BinResult<HircObjectData>
where
    R: Read + Seek,
    F: FnMut(&mut R) -> BinResult<()>,
{
    skip_base_params(reader)?;
    reader.seek(SeekFrom::Current(24))?;

    let child_count = reader.read_le::<u32>()?;

    Ok(HircObjectData::RandomSequenceContainer {
        child_ids: read_id_list(reader, child_count)?,
    })
}

fn read_music_segment<R, F>(reader: &mut R, skip_base_params: &mut F) -> BinResult<HircObjectData>
where
    R: Read + Seek,
    F: FnMut(&mut R) -> BinResult<()>,
{
    reader.seek(SeekFrom::Current(1))?;
    skip_base_params(reader)?;

    let child_count = reader.read_le::<u32>()?;

    Ok(HircObjectData::MusicSegment {
        child_ids: read_id_list(reader, child_count)?,
    })
}

fn read_music_track<R: Read + Seek>(reader: &mut R) -> BinResult<HircObjectData> {
    reader.seek(SeekFrom::Current(1))?;

    let source_count = reader.read_le::<u32>()?;

    let mut source_ids = Vec::new();
    for _ in 0..source_count {
        reader.seek(SeekFrom::Current(5))?;
        source_ids.push(reader.read_le::<u32>()?);
    }

    Ok(HircObjectData::MusicTrack { source_ids })
}

fn read_music_switch_container<R, F>(
    reader: &mut R,
    skip_base_params: &mut F,
) -> BinResult<HircObjectData>
where
    R: Read + Seek,
    F: FnMut(&mut R) -> BinResult<()>,
{
    reader.seek(SeekFrom::Current(1))?;
    skip_base_params(reader)?;

    let child_count = reader.read_le::<u32>()?;

    Ok(HircObjectData::MusicSwitchContainer {
        child_ids: read_id_list(reader, child_count)?,
    })
}

fn read_music_random_sequence_container<R, F>(
    reader: &mut R,
    skip_base_params: &mut F,
) -> BinResult<HircObjectData>
where
    R: Read + Seek,
    F: FnMut(&mut R) -> BinResult<()>,
{
    reader.seek(SeekFrom::Current(1))?;
    skip_base_params(reader)?;

    let child_count = reader.read_le::<u32>()?;

    Ok(HircObjectData::MusicRandomSequenceContainer {
        child_ids: read_id_list(reader, child_count)?,
    })
}
