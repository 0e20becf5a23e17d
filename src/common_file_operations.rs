// SPDX-FileCopyrightText: 2026 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

/// Renders a four-character section identifier (stored as a little-endian u32) for log messages.
pub(crate) fn section_identifier_string(identifier: u32) -> String {
    identifier
        .to_le_bytes()
        .iter()
        .map(|&x| {
            if x.is_ascii_graphic() {
                x as char
            } else {
                '?'
            }
        })
        .collect()
}
