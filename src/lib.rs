// SPDX-FileCopyrightText: 2026 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

/// Represents a continuous block of memory which is not owned, and comes from an external source where it will be kept alive.
pub type ByteSpan<'a> = &'a [u8];

/// Represents a continuous block of memory which is owned.
pub type ByteBuffer = Vec<u8>;

mod error;
pub use error::Error;

/// Reading the outer sound bank container (BNK).
pub mod bnk;

/// Reading the object hierarchy section (HIRC).
pub mod hirc;

mod common_file_operations;
