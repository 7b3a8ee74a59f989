// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Flat table packing.

Entries are concatenated in declaration order - no reordering, no
deduplication of equal-valued entries - so that identical input always
produces byte-identical output. Each entry's offset and element count is
recorded as it is packed.
*/

use crate::{
    element::{encode_char, encode_scalar, ElementWidth},
    ResourceResult,
};

/// Location of one sub-table inside a grouped entry.
///
/// The offset is in bytes relative to the start of the parent entry's
/// region; the length is in elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubTableSlice {
    pub offset: usize,
    pub len: usize,
}

/// Location of one packed entry inside a category blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedEntry {
    /// Byte offset relative to the start of the category blob.
    pub offset: usize,

    /// Length in elements. For strings this includes the terminator.
    pub len: usize,

    /// Sub-table index for grouped entries; empty for flat entries.
    pub sub_tables: Vec<SubTableSlice>,
}

/// The byte-serialized form of one category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedBlob {
    pub data: Vec<u8>,
    pub entries: Vec<PackedEntry>,
}

impl PackedBlob {
    /// Total byte length of the packed data.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// String terminator appended after each string entry's characters.
pub const STRING_TERMINATOR: u8 = 0;

/// Pack string entries into a blob.
///
/// Each string encodes to its single-byte characters followed by a 0x00
/// terminator; the recorded entry length counts the terminator, so a
/// consumer can bound a string without a separate length field.
pub fn pack_strings(category: &str, strings: &[String]) -> ResourceResult<PackedBlob> {
    let mut blob = PackedBlob::default();

    for (entry_id, string) in strings.iter().enumerate() {
        let offset = blob.data.len();

        for character in string.chars() {
            encode_char(&mut blob.data, character, category, entry_id)?;
        }
        blob.data.push(STRING_TERMINATOR);

        blob.entries.push(PackedEntry {
            offset,
            len: blob.data.len() - offset,
            sub_tables: Vec::new(),
        });
    }

    Ok(blob)
}

/// Pack fixed-width scalar tables into a blob.
///
/// Tables may differ in element count; each entry records its own length.
pub fn pack_scalar_tables(
    category: &str,
    tables: &[Vec<u32>],
    width: ElementWidth,
) -> ResourceResult<PackedBlob> {
    let mut blob = PackedBlob::default();

    for (entry_id, values) in tables.iter().enumerate() {
        let offset = blob.data.len();

        for &value in values {
            encode_scalar(&mut blob.data, value, width, category, entry_id)?;
        }

        blob.entries.push(PackedEntry {
            offset,
            len: values.len(),
            sub_tables: Vec::new(),
        });
    }

    Ok(blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_strings() -> ResourceResult<()> {
        let blob = pack_strings("string", &["lo".to_string(), "hi".to_string()])?;

        assert_eq!(blob.data, b"lo\0hi\0");
        assert_eq!(
            blob.entries,
            vec![
                PackedEntry {
                    offset: 0,
                    len: 3,
                    sub_tables: vec![],
                },
                PackedEntry {
                    offset: 3,
                    len: 3,
                    sub_tables: vec![],
                },
            ]
        );

        Ok(())
    }

    #[test]
    fn test_pack_strings_equal_values_not_deduplicated() -> ResourceResult<()> {
        let blob = pack_strings("string", &["ok".to_string(), "ok".to_string()])?;

        assert_eq!(blob.data, b"ok\0ok\0");
        assert_eq!(blob.entries.len(), 2);
        assert_eq!(blob.entries[1].offset, 3);

        Ok(())
    }

    #[test]
    fn test_pack_scalar_tables_u16() -> ResourceResult<()> {
        let blob = pack_scalar_tables(
            "lookup_table",
            &[vec![0x0102, 0x0304], vec![0xffff]],
            ElementWidth::Two,
        )?;

        assert_eq!(blob.data, vec![0x02, 0x01, 0x04, 0x03, 0xff, 0xff]);
        assert_eq!(blob.entries[0].offset, 0);
        assert_eq!(blob.entries[0].len, 2);
        assert_eq!(blob.entries[1].offset, 4);
        assert_eq!(blob.entries[1].len, 1);

        Ok(())
    }

    #[test]
    fn test_pack_empty() -> ResourceResult<()> {
        let blob = pack_scalar_tables("lookup_table", &[], ElementWidth::Two)?;
        assert_eq!(blob.byte_len(), 0);
        assert!(blob.entries.is_empty());

        Ok(())
    }

    #[test]
    fn test_pack_scalar_range_error_context() {
        let err = pack_scalar_tables("waveform", &[vec![0], vec![300]], ElementWidth::One)
            .expect_err("value exceeds 8-bit range");

        assert_eq!(
            err.to_string(),
            "value 300 does not fit in a 8-bit element (category waveform, entry 1)"
        );
    }
}
