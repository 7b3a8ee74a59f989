// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Fixed-width element encoding.

Every resource category stores elements of a single width. 16-bit values
are encoded little-endian, matching the native order of the consuming
targets, and that order is used consistently by the writer and reader.
*/

use {
    crate::{Error, ResourceResult},
    byteorder::{LittleEndian, WriteBytesExt},
};

/// Width of one element in a resource category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementWidth {
    /// 8-bit elements, including single-byte characters.
    One,
    /// 16-bit elements, little-endian.
    Two,
}

impl ElementWidth {
    /// Size of one element in bytes.
    pub fn bytes(self) -> usize {
        match self {
            ElementWidth::One => 1,
            ElementWidth::Two => 2,
        }
    }

    /// Natural alignment of a run of elements, in bytes.
    ///
    /// Equal to the element size: byte data is unaligned, 16-bit data
    /// starts on even addresses.
    pub fn alignment(self) -> usize {
        self.bytes()
    }

    /// Element width in bits, for diagnostics.
    pub fn bits(self) -> u8 {
        match self {
            ElementWidth::One => 8,
            ElementWidth::Two => 16,
        }
    }

    /// Largest value representable at this width.
    pub fn max_value(self) -> u32 {
        match self {
            ElementWidth::One => 0xff,
            ElementWidth::Two => 0xffff,
        }
    }
}

/// Encode one scalar at the given width, appending to `dest`.
///
/// `category` and `entry` only feed error context; the encoding itself
/// depends on nothing but `value` and `width`.
pub fn encode_scalar(
    dest: &mut Vec<u8>,
    value: u32,
    width: ElementWidth,
    category: &str,
    entry: usize,
) -> ResourceResult<()> {
    if value > width.max_value() {
        return Err(Error::ValueOutOfRange {
            category: category.to_string(),
            entry,
            value,
            bits: width.bits(),
        });
    }

    match width {
        ElementWidth::One => dest.write_u8(value as u8)?,
        ElementWidth::Two => dest.write_u16::<LittleEndian>(value as u16)?,
    }

    Ok(())
}

/// Encode one character into its single-byte representation.
pub fn encode_char(
    dest: &mut Vec<u8>,
    character: char,
    category: &str,
    entry: usize,
) -> ResourceResult<()> {
    if !character.is_ascii() {
        return Err(Error::CharacterOutOfRange {
            category: category.to_string(),
            entry,
            character,
        });
    }

    dest.push(character as u8);

    Ok(())
}
