// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Resource definition files.

A definition file is JSON: a namespace scoping all generated symbols and
an ordered list of category descriptors. Declaration order in the file is
ID order in the compiled output.

```json
{
  "namespace": "synth",
  "categories": [
    {
      "name": "string",
      "symbol_prefix": "STR_RES",
      "element": "char",
      "entries": ["waveform", "parameter"]
    },
    {
      "name": "lookup_table",
      "symbol_prefix": "LUT_RES",
      "element": "u16",
      "entries": [{"name": "scale_just", "values": [4096, 4437]}]
    },
    {
      "name": "waveform",
      "symbol_prefix": "WAV_RES",
      "element": "u8",
      "entries": [{"name": "lfo", "tables": [[0, 16, 32], [255, 128]]}]
    }
  ]
}
```
*/

use {
    anyhow::{anyhow, Context, Result},
    firmware_packed_resources::{Category, CategoryEntries, ElementWidth, NamedGroup, NamedTable},
    serde::Deserialize,
    std::{fs::File, io::BufReader, path::Path},
};

/// Top-level resource definition.
#[derive(Clone, Debug, Deserialize)]
pub struct ResourceConfig {
    /// Namespace identifier scoping all generated symbols.
    pub namespace: String,

    /// Category descriptors, in declaration (= ID) order.
    pub categories: Vec<CategoryConfig>,
}

/// One category descriptor.
#[derive(Clone, Debug, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub symbol_prefix: String,
    pub element: ElementTag,

    /// Request a specialized typed manager. Grouped categories get one
    /// regardless of this flag.
    #[serde(default)]
    pub manager: bool,

    /// Explicitly empty category; zero entries is then valid.
    #[serde(default)]
    pub placeholder: bool,

    pub entries: EntriesConfig,
}

/// Element type tag of a category.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ElementTag {
    U8,
    U16,
    Char,
}

impl ElementTag {
    pub fn width(self) -> ElementWidth {
        match self {
            ElementTag::U8 | ElementTag::Char => ElementWidth::One,
            ElementTag::U16 => ElementWidth::Two,
        }
    }
}

/// Entry data in one of the three supported shapes.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum EntriesConfig {
    Strings(Vec<String>),
    Tables(Vec<TableConfig>),
    Groups(Vec<GroupConfig>),
}

#[derive(Clone, Debug, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub values: Vec<u32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub tables: Vec<Vec<u32>>,
}

/// Load a resource definition from a JSON file.
pub fn load_config(path: &Path) -> Result<ResourceConfig> {
    let file =
        File::open(path).with_context(|| format!("opening config file {}", path.display()))?;

    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config file {}", path.display()))
}

/// Convert descriptors into core categories, validating shape against
/// the declared element type.
pub fn to_categories(config: &ResourceConfig) -> Result<Vec<Category>> {
    config
        .categories
        .iter()
        .map(|category| {
            let entries = match (&category.entries, category.element) {
                // An empty entry list carries no shape of its own; give
                // it the shape the element tag implies.
                (EntriesConfig::Strings(strings), _) if strings.is_empty() => {
                    match category.element {
                        ElementTag::Char => CategoryEntries::Strings(Vec::new()),
                        ElementTag::U8 | ElementTag::U16 => CategoryEntries::Tables(Vec::new()),
                    }
                }
                (EntriesConfig::Strings(strings), ElementTag::Char) => {
                    CategoryEntries::Strings(strings.clone())
                }
                (EntriesConfig::Strings(_), _) => {
                    return Err(anyhow!(
                        "category {}: string entries require element \"char\"",
                        category.name
                    ));
                }
                (EntriesConfig::Tables(_) | EntriesConfig::Groups(_), ElementTag::Char) => {
                    return Err(anyhow!(
                        "category {}: element \"char\" requires string entries",
                        category.name
                    ));
                }
                (EntriesConfig::Tables(tables), _) => CategoryEntries::Tables(
                    tables
                        .iter()
                        .map(|t| NamedTable {
                            name: t.name.clone(),
                            values: t.values.clone(),
                        })
                        .collect(),
                ),
                (EntriesConfig::Groups(groups), _) => CategoryEntries::Groups(
                    groups
                        .iter()
                        .map(|g| NamedGroup {
                            name: g.name.clone(),
                            tables: g.tables.clone(),
                        })
                        .collect(),
                ),
            };

            Ok(Category {
                name: category.name.clone(),
                symbol_prefix: category.symbol_prefix.clone(),
                width: category.element.width(),
                entries,
                specialized_manager: category.manager,
                placeholder: category.placeholder,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    {
      "namespace": "synth",
      "categories": [
        {
          "name": "string",
          "symbol_prefix": "STR_RES",
          "element": "char",
          "entries": ["lo", "hi"]
        },
        {
          "name": "lookup_table",
          "symbol_prefix": "LUT_RES",
          "element": "u16",
          "entries": [{"name": "scale", "values": [258, 772]}]
        },
        {
          "name": "waveform",
          "symbol_prefix": "WAV_RES",
          "element": "u8",
          "entries": [{"name": "lfo", "tables": [[1, 2], [3, 4, 5]]}]
        }
      ]
    }
    "#;

    #[test]
    fn test_parse_shapes() {
        let config: ResourceConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(config.namespace, "synth");
        assert_eq!(config.categories.len(), 3);

        assert!(matches!(
            config.categories[0].entries,
            EntriesConfig::Strings(_)
        ));
        assert!(matches!(
            config.categories[1].entries,
            EntriesConfig::Tables(_)
        ));
        assert!(matches!(
            config.categories[2].entries,
            EntriesConfig::Groups(_)
        ));
    }

    #[test]
    fn test_to_categories() {
        let config: ResourceConfig = serde_json::from_str(SAMPLE).unwrap();
        let categories = to_categories(&config).unwrap();

        assert_eq!(categories[0].width, ElementWidth::One);
        assert_eq!(categories[1].width, ElementWidth::Two);
        assert!(categories[2].entries.is_grouped());
        assert!(categories[2].needs_manager());
        assert!(!categories[0].needs_manager());
    }

    #[test]
    fn test_shape_mismatch() {
        let config: ResourceConfig = serde_json::from_str(
            r#"
            {
              "namespace": "synth",
              "categories": [
                {
                  "name": "lookup_table",
                  "symbol_prefix": "LUT_RES",
                  "element": "u16",
                  "entries": ["not", "numbers"]
                }
              ]
            }
            "#,
        )
        .unwrap();

        let err = to_categories(&config).expect_err("strings under a u16 element");
        assert!(err.to_string().contains("lookup_table"));
    }

    #[test]
    fn test_empty_entries_take_element_shape() {
        let config: ResourceConfig = serde_json::from_str(
            r#"
            {
              "namespace": "synth",
              "categories": [
                {
                  "name": "reserved",
                  "symbol_prefix": "RSV_RES",
                  "element": "u16",
                  "placeholder": true,
                  "entries": []
                }
              ]
            }
            "#,
        )
        .unwrap();

        let categories = to_categories(&config).unwrap();
        assert!(matches!(
            categories[0].entries,
            CategoryEntries::Tables(ref tables) if tables.is_empty()
        ));
        assert!(categories[0].placeholder);
    }
}
