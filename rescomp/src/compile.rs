// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Compilation driver.

Runs the full pipeline for one definition file: load, pack, assemble,
render artifacts, write. The image and both index documents are rendered
completely in memory and each file is written through a temporary file
renamed into place, so a failing run never leaves a partial artifact
behind.

Artifacts for namespace `ns` are `ns.bin` (image bytes),
`ns-index.json` (master index) and `ns-managers.json` (accessor
specifications).
*/

use {
    crate::{
        config::{load_config, to_categories, ResourceConfig},
        manager::{derive_accessor_specs, element_tag},
    },
    anyhow::{anyhow, bail, Context, Result},
    firmware_packed_resources::{assemble, Catalog, ResourceImage},
    serde::Serialize,
    std::{
        fs,
        io::Write,
        path::{Path, PathBuf},
    },
};

/// Destination paths of the three artifacts.
#[derive(Clone, Debug)]
pub struct ArtifactPaths {
    pub image: PathBuf,
    pub index: PathBuf,
    pub managers: PathBuf,
}

pub fn artifact_paths(output_dir: &Path, namespace: &str) -> ArtifactPaths {
    ArtifactPaths {
        image: output_dir.join(format!("{}.bin", namespace)),
        index: output_dir.join(format!("{}-index.json", namespace)),
        managers: output_dir.join(format!("{}-managers.json", namespace)),
    }
}

/// Fully rendered artifact contents, before any file is touched.
pub struct RenderedArtifacts {
    pub namespace: String,
    pub image: Vec<u8>,
    pub index: Vec<u8>,
    pub managers: Vec<u8>,
}

/// Run the packing pipeline for a loaded definition.
pub fn build_image(config: &ResourceConfig) -> Result<ResourceImage> {
    let categories = to_categories(config)?;
    let catalog = Catalog::from_categories(categories).context("building resource catalog")?;

    Ok(assemble(&catalog))
}

#[derive(Serialize)]
struct IndexFile<'a> {
    namespace: &'a str,
    image_len: usize,
    categories: Vec<IndexFileCategory<'a>>,
}

#[derive(Serialize)]
struct IndexFileCategory<'a> {
    id: usize,
    name: &'a str,
    symbol_prefix: &'a str,
    element: &'static str,
    grouped: bool,
    entries: Vec<IndexFileEntry<'a>>,
}

#[derive(Serialize)]
struct IndexFileEntry<'a> {
    symbol: &'a str,
    offset: usize,
    len: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sub_tables: Vec<IndexFileSubTable>,
}

#[derive(Serialize)]
struct IndexFileSubTable {
    offset: usize,
    len: usize,
}

fn render_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(value)?;
    data.push(b'\n');
    Ok(data)
}

/// Render all artifacts for a definition file, entirely in memory.
pub fn render(config_path: &Path) -> Result<RenderedArtifacts> {
    let config = load_config(config_path)?;
    let image = build_image(&config)?;

    let index_file = IndexFile {
        namespace: &config.namespace,
        image_len: image.data.len(),
        categories: image
            .index
            .categories
            .iter()
            .map(|category| IndexFileCategory {
                id: category.id,
                name: &category.name,
                symbol_prefix: &category.symbol_prefix,
                element: element_tag(category.width),
                grouped: category.grouped,
                entries: category
                    .entries
                    .iter()
                    .map(|entry| IndexFileEntry {
                        symbol: &entry.symbol,
                        offset: entry.offset,
                        len: entry.len,
                        sub_tables: entry
                            .sub_tables
                            .iter()
                            .map(|sub| IndexFileSubTable {
                                offset: sub.offset,
                                len: sub.len,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect(),
    };

    let managers = derive_accessor_specs(&config.namespace, &image.index);

    Ok(RenderedArtifacts {
        index: render_json(&index_file)?,
        managers: render_json(&managers)?,
        namespace: config.namespace,
        image: image.data,
    })
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("no parent directory for {}", path.display()))?;

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    file.write_all(data)?;
    file.persist(path)
        .with_context(|| format!("renaming into {}", path.display()))?;

    Ok(())
}

/// Compile a definition file and write artifacts into `output_dir`.
pub fn compile(config_path: &Path, output_dir: &Path) -> Result<ArtifactPaths> {
    let artifacts = render(config_path)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let paths = artifact_paths(output_dir, &artifacts.namespace);
    write_atomic(&paths.image, &artifacts.image)?;
    write_atomic(&paths.index, &artifacts.index)?;
    write_atomic(&paths.managers, &artifacts.managers)?;

    log::info!(
        "wrote {} ({} bytes image)",
        paths.image.display(),
        artifacts.image.len()
    );

    Ok(paths)
}

/// Recompile and byte-compare against existing artifacts.
///
/// Fails if any artifact is missing or differs from what the current
/// definitions produce, which makes reproducibility externally checkable.
pub fn verify(config_path: &Path, output_dir: &Path) -> Result<()> {
    let artifacts = render(config_path)?;
    let paths = artifact_paths(output_dir, &artifacts.namespace);

    for (path, expected) in [
        (&paths.image, &artifacts.image),
        (&paths.index, &artifacts.index),
        (&paths.managers, &artifacts.managers),
    ] {
        let actual =
            fs::read(path).with_context(|| format!("reading artifact {}", path.display()))?;

        if &actual != expected {
            bail!("{} is out of date with its definitions", path.display());
        }

        log::debug!("{} matches", path.display());
    }

    Ok(())
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
          "name": "waveform",
          "symbol_prefix": "WAV_RES",
          "element": "u8",
          "entries": [{"name": "lfo", "tables": [[1, 2], [3, 4, 5]]}]
        }
      ]
    }
    "#;

    #[test]
    fn test_build_image_from_config() {
        let config: ResourceConfig = serde_json::from_str(SAMPLE).unwrap();
        let image = build_image(&config).unwrap();

        assert_eq!(image.data, b"lo\0hi\0\x01\x02\x03\x04\x05");
        assert_eq!(image.index.categories.len(), 2);
    }

    #[test]
    fn test_index_rendering_deterministic() {
        let config: ResourceConfig = serde_json::from_str(SAMPLE).unwrap();
        let first = build_image(&config).unwrap();
        let second = build_image(&config).unwrap();

        assert_eq!(
            render_json(&derive_accessor_specs("synth", &first.index)).unwrap(),
            render_json(&derive_accessor_specs("synth", &second.index)).unwrap()
        );
    }
}
