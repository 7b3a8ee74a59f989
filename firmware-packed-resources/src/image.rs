// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Final image layout.

Category blobs are laid back-to-back in declaration order. Zero-filled
padding is inserted before a blob when the running offset does not satisfy
the category's element alignment - at most one byte, ahead of a 16-bit
category. Padding is excluded from every recorded offset and length:
offsets always point at real data.

Assembly is the single externally verified determinism point: same
categories, same entries, same declaration order, same image bytes, on
every run.
*/

use crate::{
    catalog::Catalog,
    element::ElementWidth,
    table::SubTableSlice,
    Error, ResourceResult,
};

/// Master-index record for one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// Derived symbolic constant name.
    pub symbol: String,

    /// Absolute byte offset into the image.
    pub offset: usize,

    /// Length in elements.
    pub len: usize,

    /// Sub-table index for grouped entries, offsets relative to `offset`.
    pub sub_tables: Vec<SubTableSlice>,
}

/// Master-index record for one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryIndex {
    /// Category ID: declaration-order position, zero-based.
    pub id: usize,
    pub name: String,
    pub symbol_prefix: String,
    pub width: ElementWidth,
    pub grouped: bool,
    pub needs_manager: bool,

    /// Entry records in entry-ID order.
    pub entries: Vec<IndexEntry>,
}

impl CategoryIndex {
    /// Byte length of one entry's data.
    pub fn entry_byte_len(&self, entry: &IndexEntry) -> usize {
        entry.len * self.width.bytes()
    }
}

/// Master index across all categories.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MasterIndex {
    pub categories: Vec<CategoryIndex>,
}

impl MasterIndex {
    /// Category index for a symbolic name.
    pub fn category_by_name(&self, name: &str) -> ResourceResult<&CategoryIndex> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::UnknownCategoryReference {
                category: name.to_string(),
            })
    }
}

/// The final artifact: image bytes plus master index.
///
/// Constructed once per compilation run and never mutated afterwards;
/// consumers only read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceImage {
    pub data: Vec<u8>,
    pub index: MasterIndex,
}

/// Concatenate all category blobs into one address space.
pub fn assemble(catalog: &Catalog) -> ResourceImage {
    let mut data = Vec::new();
    let mut categories = Vec::with_capacity(catalog.len());

    for (id, category) in catalog.categories().iter().enumerate() {
        let alignment = category.width.alignment();
        while data.len() % alignment != 0 {
            data.push(0);
        }

        let base = data.len();
        data.extend_from_slice(&category.blob.data);

        let entries = category
            .blob
            .entries
            .iter()
            .zip(&category.symbols)
            .map(|(entry, symbol)| IndexEntry {
                symbol: symbol.clone(),
                offset: base + entry.offset,
                len: entry.len,
                sub_tables: entry.sub_tables.clone(),
            })
            .collect();

        categories.push(CategoryIndex {
            id,
            name: category.name.clone(),
            symbol_prefix: category.symbol_prefix.clone(),
            width: category.width,
            grouped: category.grouped,
            needs_manager: category.needs_manager,
            entries,
        });
    }

    ResourceImage {
        data,
        index: MasterIndex { categories },
    }
}
