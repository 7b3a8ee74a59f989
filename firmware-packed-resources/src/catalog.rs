// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Resource catalog: stable IDs and per-category packing.

The catalog assigns every category its declaration-order position as the
category ID and every entry its declaration-order position as the entry
ID, both zero-based. IDs are stable across runs for identical input, so
symbolic references compiled into firmware do not shift between builds.
Appending entries never renumbers or moves existing ones.
*/

use {
    crate::{
        element::ElementWidth,
        group::pack_groups,
        table::{pack_scalar_tables, pack_strings, PackedBlob},
        Error, ResourceResult,
    },
    std::collections::BTreeSet,
};

/// A named flat table of scalar values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedTable {
    pub name: String,
    pub values: Vec<u32>,
}

/// A named grouped entry: an ordered set of sub-tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedGroup {
    pub name: String,
    pub tables: Vec<Vec<u32>>,
}

/// The entries of one category, tagged by shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryEntries {
    /// Flat string entries. Symbols derive from the string content.
    Strings(Vec<String>),
    /// Flat scalar tables.
    Tables(Vec<NamedTable>),
    /// Two-level grouped entries.
    Groups(Vec<NamedGroup>),
}

impl CategoryEntries {
    pub fn len(&self) -> usize {
        match self {
            CategoryEntries::Strings(entries) => entries.len(),
            CategoryEntries::Tables(entries) => entries.len(),
            CategoryEntries::Groups(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether entries are two-level collections of sub-tables.
    pub fn is_grouped(&self) -> bool {
        matches!(self, CategoryEntries::Groups(_))
    }
}

/// Declaration of one resource category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    /// Symbolic name, unique across the catalog.
    pub name: String,

    /// Prefix for generated per-entry symbols, e.g. `STR_RES`.
    pub symbol_prefix: String,

    /// Element width. String categories use [ElementWidth::One].
    pub width: ElementWidth,

    pub entries: CategoryEntries,

    /// Whether a specialized typed manager should be generated.
    ///
    /// Grouped categories always get one; this flag opts flat
    /// categories in.
    pub specialized_manager: bool,

    /// An explicitly empty category. Packs to a zero-length blob instead
    /// of failing the zero-entries consistency check.
    pub placeholder: bool,
}

impl Category {
    pub fn needs_manager(&self) -> bool {
        self.specialized_manager || self.entries.is_grouped()
    }
}

/// One category after packing, with its derived symbols.
#[derive(Clone, Debug)]
pub struct PackedCategory {
    pub name: String,
    pub symbol_prefix: String,
    pub width: ElementWidth,
    pub grouped: bool,
    pub needs_manager: bool,

    /// Per-entry symbol, in entry-ID order.
    pub symbols: Vec<String>,

    pub blob: PackedBlob,
}

/// All categories of one compilation run, packed and numbered.
#[derive(Clone, Debug)]
pub struct Catalog {
    categories: Vec<PackedCategory>,
}

impl Catalog {
    /// Pack the given categories in declaration order.
    pub fn from_categories(categories: Vec<Category>) -> ResourceResult<Self> {
        let mut seen = BTreeSet::new();
        let mut packed = Vec::with_capacity(categories.len());

        for category in categories {
            if !seen.insert(category.name.clone()) {
                return Err(Error::DuplicateCategory {
                    category: category.name,
                });
            }

            if category.entries.is_empty() && !category.placeholder {
                return Err(Error::EmptyCategory {
                    category: category.name,
                });
            }

            let (blob, symbols) = match &category.entries {
                CategoryEntries::Strings(strings) => (
                    pack_strings(&category.name, strings)?,
                    strings
                        .iter()
                        .map(|s| derive_symbol(&category.symbol_prefix, s))
                        .collect(),
                ),
                CategoryEntries::Tables(tables) => {
                    let values: Vec<_> = tables.iter().map(|t| t.values.clone()).collect();
                    (
                        pack_scalar_tables(&category.name, &values, category.width)?,
                        tables
                            .iter()
                            .map(|t| derive_symbol(&category.symbol_prefix, &t.name))
                            .collect(),
                    )
                }
                CategoryEntries::Groups(groups) => {
                    let tables: Vec<_> = groups.iter().map(|g| g.tables.clone()).collect();
                    (
                        pack_groups(&category.name, &tables, category.width)?,
                        groups
                            .iter()
                            .map(|g| derive_symbol(&category.symbol_prefix, &g.name))
                            .collect(),
                    )
                }
            };

            packed.push(PackedCategory {
                grouped: category.entries.is_grouped(),
                needs_manager: category.needs_manager(),
                name: category.name,
                symbol_prefix: category.symbol_prefix,
                width: category.width,
                symbols,
                blob,
            });
        }

        Ok(Self { categories: packed })
    }

    /// Packed categories in declaration (category-ID) order.
    pub fn categories(&self) -> &[PackedCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category ID for a symbolic name.
    pub fn category_id(&self, name: &str) -> ResourceResult<usize> {
        self.categories
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| Error::UnknownCategoryReference {
                category: name.to_string(),
            })
    }

    /// Packed category for a symbolic name.
    pub fn category(&self, name: &str) -> ResourceResult<&PackedCategory> {
        Ok(&self.categories[self.category_id(name)?])
    }
}

/// Derive an entry's symbolic constant name from its prefix and raw name.
///
/// Alphanumeric characters are uppercased; everything else becomes `_`.
/// `derive_symbol("STR_RES", "osc mix")` is `STR_RES_OSC_MIX`.
pub fn derive_symbol(prefix: &str, name: &str) -> String {
    let mut symbol = String::with_capacity(prefix.len() + name.len() + 1);
    symbol.push_str(prefix);
    symbol.push('_');

    for character in name.chars() {
        if character.is_ascii_alphanumeric() {
            symbol.push(character.to_ascii_uppercase());
        } else {
            symbol.push('_');
        }
    }

    symbol
}
