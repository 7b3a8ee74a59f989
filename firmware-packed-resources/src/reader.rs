// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Typed read access to an assembled image.

This is the contract generated accessors are held to: given a category
and an entry ID, return a typed view (data plus element width) into the
image, indexable a second time by sub-table for grouped categories. All
ID lookups are bounds-checked against the master index and fail with
[Error::IndexOutOfRange], so a generated accessor can surface the check
as a debug assertion or a recoverable result as its target language
prefers.

The reader borrows the image; nothing here copies or mutates it.
*/

use {
    crate::{
        element::ElementWidth,
        image::{CategoryIndex, IndexEntry, MasterIndex, ResourceImage},
        table::STRING_TERMINATOR,
        Error, ResourceResult,
    },
    byteorder::{ByteOrder, LittleEndian},
};

/// Read-only view over an image and its master index.
pub struct ImageReader<'a> {
    data: &'a [u8],
    index: &'a MasterIndex,
}

impl<'a> ImageReader<'a> {
    pub fn new(image: &'a ResourceImage) -> Self {
        Self {
            data: &image.data,
            index: &image.index,
        }
    }

    /// Construct from separately held image bytes and index.
    ///
    /// The index must describe `data`; offsets are trusted once the ID
    /// bounds checks pass.
    pub fn from_parts(data: &'a [u8], index: &'a MasterIndex) -> Self {
        Self { data, index }
    }

    pub fn category_count(&self) -> usize {
        self.index.categories.len()
    }

    /// Entry view by (category ID, entry ID).
    pub fn entry(&self, category_id: usize, entry_id: usize) -> ResourceResult<EntryView<'a>> {
        let category = self.index.categories.get(category_id).ok_or_else(|| {
            Error::IndexOutOfRange {
                category: format!("#{}", category_id),
                what: "category",
                requested: category_id,
                available: self.index.categories.len(),
            }
        })?;

        let entry = category
            .entries
            .get(entry_id)
            .ok_or_else(|| Error::IndexOutOfRange {
                category: category.name.clone(),
                what: "entry",
                requested: entry_id,
                available: category.entries.len(),
            })?;

        Ok(EntryView {
            data: self.data,
            category,
            entry,
        })
    }

    /// Entry view by (category name, entry ID).
    pub fn entry_by_name(&self, name: &str, entry_id: usize) -> ResourceResult<EntryView<'a>> {
        let category = self.index.category_by_name(name)?;
        self.entry(category.id, entry_id)
    }
}

/// Typed view of one entry's data.
#[derive(Clone, Copy)]
pub struct EntryView<'a> {
    data: &'a [u8],
    category: &'a CategoryIndex,
    entry: &'a IndexEntry,
}

impl<'a> EntryView<'a> {
    pub fn width(&self) -> ElementWidth {
        self.category.width
    }

    pub fn symbol(&self) -> &'a str {
        &self.entry.symbol
    }

    /// Length in elements.
    pub fn len(&self) -> usize {
        self.entry.len
    }

    pub fn is_empty(&self) -> bool {
        self.entry.len == 0
    }

    /// The entry's raw bytes.
    pub fn bytes(&self) -> &'a [u8] {
        let start = self.entry.offset;
        &self.data[start..start + self.entry.len * self.category.width.bytes()]
    }

    /// Decode the entry's elements as scalars.
    pub fn scalars(&self) -> Vec<u32> {
        decode_scalars(self.bytes(), self.category.width)
    }

    /// The entry as a string, without its terminator.
    ///
    /// `None` when the entry does not end in the terminator byte or is
    /// not valid single-byte text.
    pub fn string(&self) -> Option<&'a str> {
        let bytes = self.bytes();
        match bytes.split_last() {
            Some((&STRING_TERMINATOR, text)) => std::str::from_utf8(text).ok(),
            _ => None,
        }
    }

    pub fn sub_table_count(&self) -> usize {
        self.entry.sub_tables.len()
    }

    /// Second-level view into a grouped entry.
    pub fn sub_table(&self, sub_index: usize) -> ResourceResult<SubTableView<'a>> {
        let sub = self.entry.sub_tables.get(sub_index).ok_or_else(|| {
            Error::IndexOutOfRange {
                category: self.category.name.clone(),
                what: "sub-table",
                requested: sub_index,
                available: self.entry.sub_tables.len(),
            }
        })?;

        let start = self.entry.offset + sub.offset;
        Ok(SubTableView {
            width: self.category.width,
            bytes: &self.data[start..start + sub.len * self.category.width.bytes()],
        })
    }
}

/// Typed view of one sub-table of a grouped entry.
#[derive(Clone, Copy)]
pub struct SubTableView<'a> {
    width: ElementWidth,
    bytes: &'a [u8],
}

impl<'a> SubTableView<'a> {
    /// Length in elements.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.width.bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn scalars(&self) -> Vec<u32> {
        decode_scalars(self.bytes, self.width)
    }
}

fn decode_scalars(bytes: &[u8], width: ElementWidth) -> Vec<u32> {
    match width {
        ElementWidth::One => bytes.iter().map(|&b| b as u32).collect(),
        ElementWidth::Two => bytes
            .chunks_exact(2)
            .map(|chunk| LittleEndian::read_u16(chunk) as u32)
            .collect(),
    }
}
