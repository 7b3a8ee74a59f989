// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Two-level grouped packing.

Some categories hold entries that are themselves ordered collections of
sub-tables: the glyph strips of one bitmap character, the sample banks of
one waveform. The resolver flattens the two levels into one contiguous
run per entry and records a secondary index of (offset, length) per
sub-table, with offsets relative to the entry's start. That gives the
consumer O(1) addressing of "sub-table n of entry m" without scanning.
*/

use crate::{
    element::{encode_scalar, ElementWidth},
    table::{PackedBlob, PackedEntry, SubTableSlice},
    ResourceResult,
};

/// Pack grouped entries into a blob with a per-entry sub-table index.
///
/// Each entry's sub-tables are concatenated in declaration order; the
/// entry's own length is the sum of its sub-table lengths. An entry with
/// zero sub-tables packs to zero length and an empty sub-index, which is
/// valid - placeholder categories may contain such entries.
pub fn pack_groups(
    category: &str,
    groups: &[Vec<Vec<u32>>],
    width: ElementWidth,
) -> ResourceResult<PackedBlob> {
    let mut blob = PackedBlob::default();

    for (entry_id, tables) in groups.iter().enumerate() {
        let entry_offset = blob.data.len();
        let mut sub_tables = Vec::with_capacity(tables.len());
        let mut entry_len = 0;

        for values in tables {
            sub_tables.push(SubTableSlice {
                offset: blob.data.len() - entry_offset,
                len: values.len(),
            });

            for &value in values {
                encode_scalar(&mut blob.data, value, width, category, entry_id)?;
            }

            entry_len += values.len();
        }

        blob.entries.push(PackedEntry {
            offset: entry_offset,
            len: entry_len,
            sub_tables,
        });
    }

    Ok(blob)
}
