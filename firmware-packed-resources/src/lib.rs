// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Packed resource images for memory-constrained firmware targets.

This crate implements the packing and layout half of a firmware resource
compiler. Host-side data tables - text strings, numeric lookup tables,
bitmap character glyphs, multi-channel waveform sample sets - are
serialized into a single contiguous resource image plus a master index
mapping (category, entry ID) to (offset, length). Firmware then addresses
constant data by symbolic ID instead of raw offsets.

The pipeline is a one-shot batch transform: declare categories, build a
[Catalog], assemble a [ResourceImage]. Output is deterministic - identical
categories and entries in identical declaration order produce byte-identical
images and indices on every run, which keeps generated artifacts
reproducible and diffable.

Categories are either *flat* (each entry is one string or one table of
scalars) or *grouped* (each entry is an ordered set of sub-tables, such as
the strips of one bitmap character or the sample banks of one waveform).
Grouped categories carry a secondary per-entry index so a consumer can
locate an individual sub-table without scanning.

The read side lives in [reader]: given an image and its index, it hands out
typed, bounds-checked views that reproduce the original values. The image
itself is immutable once assembled.
*/

pub mod catalog;
pub mod element;
pub mod group;
pub mod image;
pub mod reader;
pub mod table;

pub use crate::{
    catalog::{derive_symbol, Catalog, Category, CategoryEntries, NamedGroup, NamedTable},
    element::ElementWidth,
    image::{assemble, CategoryIndex, IndexEntry, MasterIndex, ResourceImage},
    reader::{EntryView, ImageReader, SubTableView},
    table::{PackedBlob, PackedEntry, SubTableSlice},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "value {value} does not fit in a {bits}-bit element (category {category}, entry {entry})"
    )]
    ValueOutOfRange {
        category: String,
        entry: usize,
        value: u32,
        bits: u8,
    },

    #[error(
        "character {character:?} has no single-byte encoding (category {category}, entry {entry})"
    )]
    CharacterOutOfRange {
        category: String,
        entry: usize,
        character: char,
    },

    #[error("category {category} declares entries but none were provided")]
    EmptyCategory { category: String },

    #[error("duplicate category name: {category}")]
    DuplicateCategory { category: String },

    #[error("reference to unknown category: {category}")]
    UnknownCategoryReference { category: String },

    #[error(
        "{what} index {requested} out of range for category {category} ({available} available)"
    )]
    IndexOutOfRange {
        category: String,
        what: &'static str,
        requested: usize,
        available: usize,
    },
}

/// Result type for this crate.
pub type ResourceResult<T> = Result<T, Error>;
