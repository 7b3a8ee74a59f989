// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Accessor specifications for specialized managers.

Categories flagged for specialized access get an [AccessorCategory]
describing everything a templating collaborator needs to render typed
lookup code in any target language: element width, flat versus grouped
shape, entry count, and per-entry symbol and length. Grouped categories
are always included; the second indexing level is described by each
entry's sub-table count.

Out-of-range entry IDs and sub-indexes are the reader's
`IndexOutOfRange` contract; a generated accessor surfaces that bound
check as a debug assertion or a recoverable result, whichever fits the
target language.
*/

use {
    firmware_packed_resources::{ElementWidth, MasterIndex},
    serde::Serialize,
};

/// Accessor specifications for one compilation run.
#[derive(Clone, Debug, Serialize)]
pub struct AccessorSpec {
    pub namespace: String,
    pub categories: Vec<AccessorCategory>,
}

/// Lookup description for one managed category.
#[derive(Clone, Debug, Serialize)]
pub struct AccessorCategory {
    pub name: String,
    pub id: usize,
    pub symbol_prefix: String,
    pub element: &'static str,
    pub grouped: bool,
    pub entry_count: usize,
    pub entries: Vec<AccessorEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AccessorEntry {
    pub symbol: String,

    /// Length in elements.
    pub len: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_table_count: Option<usize>,
}

/// JSON tag for an element width.
pub fn element_tag(width: ElementWidth) -> &'static str {
    match width {
        ElementWidth::One => "u8",
        ElementWidth::Two => "u16",
    }
}

/// Derive accessor specifications from the master index.
pub fn derive_accessor_specs(namespace: &str, index: &MasterIndex) -> AccessorSpec {
    let categories = index
        .categories
        .iter()
        .filter(|category| category.needs_manager)
        .map(|category| AccessorCategory {
            name: category.name.clone(),
            id: category.id,
            symbol_prefix: category.symbol_prefix.clone(),
            element: element_tag(category.width),
            grouped: category.grouped,
            entry_count: category.entries.len(),
            entries: category
                .entries
                .iter()
                .map(|entry| AccessorEntry {
                    symbol: entry.symbol.clone(),
                    len: entry.len,
                    sub_table_count: category.grouped.then(|| entry.sub_tables.len()),
                })
                .collect(),
        })
        .collect();

    AccessorSpec {
        namespace: namespace.to_string(),
        categories,
    }
}
