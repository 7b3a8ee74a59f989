// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    anyhow::Result,
    rescomp::compile::{compile, verify},
    std::fs,
};

const DEFINITIONS: &str = r#"
{
  "namespace": "synth",
  "categories": [
    {
      "name": "string",
      "symbol_prefix": "STR_RES",
      "element": "char",
      "entries": ["waveform", "parameter", "range"]
    },
    {
      "name": "lookup_table",
      "symbol_prefix": "LUT_RES",
      "element": "u16",
      "manager": true,
      "entries": [
        {"name": "scale_just", "values": [4096, 4437, 4800]},
        {"name": "groove_swing", "values": [0, 127]}
      ]
    },
    {
      "name": "reserved",
      "symbol_prefix": "RSV_RES",
      "element": "u8",
      "placeholder": true,
      "entries": []
    },
    {
      "name": "waveform",
      "symbol_prefix": "WAV_RES",
      "element": "u8",
      "entries": [
        {"name": "lfo", "tables": [[0, 16, 32], [255, 128]]},
        {"name": "vibrato", "tables": [[7]]}
      ]
    }
  ]
}
"#;

fn write_definitions(dir: &std::path::Path) -> Result<std::path::PathBuf> {
    let path = dir.join("resources.json");
    fs::write(&path, DEFINITIONS)?;
    Ok(path)
}

#[test]
fn test_compile_writes_all_artifacts() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let config = write_definitions(dir.path())?;

    let paths = compile(&config, dir.path())?;

    assert!(paths.image.exists());
    assert!(paths.index.exists());
    assert!(paths.managers.exists());
    assert_eq!(paths.image.file_name().unwrap(), "synth.bin");

    let index: serde_json::Value = serde_json::from_slice(&fs::read(&paths.index)?)?;
    assert_eq!(index["namespace"], "synth");
    assert_eq!(index["categories"][0]["name"], "string");
    assert_eq!(index["categories"][3]["grouped"], true);

    let managers: serde_json::Value = serde_json::from_slice(&fs::read(&paths.managers)?)?;
    let managed: Vec<_> = managers["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(managed, vec!["lookup_table", "waveform"]);

    Ok(())
}

#[test]
fn test_recompilation_is_byte_identical() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let config = write_definitions(dir.path())?;

    let first_out = dir.path().join("first");
    let second_out = dir.path().join("second");
    let first = compile(&config, &first_out)?;
    let second = compile(&config, &second_out)?;

    assert_eq!(fs::read(&first.image)?, fs::read(&second.image)?);
    assert_eq!(fs::read(&first.index)?, fs::read(&second.index)?);
    assert_eq!(fs::read(&first.managers)?, fs::read(&second.managers)?);

    Ok(())
}

#[test]
fn test_verify_accepts_fresh_and_rejects_stale() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let config = write_definitions(dir.path())?;

    let paths = compile(&config, dir.path())?;
    verify(&config, dir.path())?;

    // Any drift between artifacts and definitions must fail verification.
    let mut image = fs::read(&paths.image)?;
    image[0] ^= 0xff;
    fs::write(&paths.image, image)?;

    assert!(verify(&config, dir.path()).is_err());

    Ok(())
}

#[test]
fn test_verify_fails_when_artifacts_missing() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let config = write_definitions(dir.path())?;

    assert!(verify(&config, dir.path()).is_err());

    Ok(())
}

#[test]
fn test_compile_rejects_out_of_range_values() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"
        {
          "namespace": "synth",
          "categories": [
            {
              "name": "waveform",
              "symbol_prefix": "WAV_RES",
              "element": "u8",
              "entries": [{"name": "lfo", "tables": [[300]]}]
            }
          ]
        }
        "#,
    )?;

    let out = dir.path().join("out");
    let err = compile(&path, &out).expect_err("value exceeds 8-bit range");
    assert!(format!("{:#}", err).contains("300"));

    // Nothing may be written on failure.
    assert!(!out.exists());

    Ok(())
}
