// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "mpx-rs.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, String),

    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),
}

/// Default search paths for `mpx-rs.toml`
/// (current directory → XDG config → /etc).
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("mpx-rs").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from("/etc/mpx-rs").join(CONFIG_FILE_NAME));
    paths
}

/// Deserialize the `[key]` table of `content`.
///
/// `Ok(None)` means the document parsed but has no such section. `path` is
/// only used for error messages.
fn parse_section<T: DeserializeOwned>(
    content: &str,
    key: &str,
    path: &Path,
) -> Result<Option<T>, ConfigError> {
    let parse_err = |e: &dyn std::fmt::Display| ConfigError::ParseError(path.to_path_buf(), e.to_string());

    let mut table: toml::Table = toml::from_str(content).map_err(|e| parse_err(&e))?;
    let Some(section) = table.remove(key) else {
        return Ok(None);
    };
    section.try_into::<T>().map(Some).map_err(|e| parse_err(&e))
}

fn load_section_from_file<T: DeserializeOwned>(
    path: &Path,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;
    parse_section(&content, key, path)
}

/// A component configuration stored as one section of `mpx-rs.toml`.
pub trait ConfigFile: Sized + Default + DeserializeOwned {
    /// Section key in `mpx-rs.toml` (e.g. `"mpx-server"`).
    fn section_key() -> &'static str;

    /// Parse the section out of an in-memory document.
    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        parse_section::<Self>(content, Self::section_key(), Path::new("<string>"))?
            .ok_or_else(|| missing_section::<Self>(Path::new("<string>")))
    }

    /// Load the section from a specific file. A file without the
    /// `[<section_key>]` table is an error.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        load_section_from_file::<Self>(path, Self::section_key())?
            .ok_or_else(|| missing_section::<Self>(path))
    }

    /// Load the first default-path file that carries the section.
    ///
    /// Returns `(Default::default(), None)` when none does.
    fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in config_search_paths() {
            if path.exists() {
                if let Some(cfg) = load_section_from_file::<Self>(&path, Self::section_key())? {
                    return Ok((cfg, Some(path)));
                }
            }
        }
        Ok((Self::default(), None))
    }

    /// `explicit` if given, the default search otherwise.
    fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match explicit {
            Some(path) => Ok((Self::load_from_file(path)?, Some(path.to_path_buf()))),
            None => Self::load_from_default_paths(),
        }
    }
}

fn missing_section<T: ConfigFile>(path: &Path) -> ConfigError {
    ConfigError::ParseError(
        path.to_path_buf(),
        format!("missing [{}] section", T::section_key()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Demo {
        name: String,
        level: u8,
    }

    impl ConfigFile for Demo {
        fn section_key() -> &'static str {
            "demo"
        }
    }

    #[test]
    fn section_defaults_apply() {
        let cfg = Demo::from_toml_str("[demo]\nname = \"x\"\n").unwrap();
        assert_eq!(
            cfg,
            Demo {
                name: "x".into(),
                level: 0
            }
        );
    }

    #[test]
    fn other_sections_are_ignored() {
        let doc = "[other]\nfoo = 1\n\n[demo]\nlevel = 3\n";
        assert_eq!(Demo::from_toml_str(doc).unwrap().level, 3);
    }

    #[test]
    fn missing_section_is_an_error() {
        let err = Demo::from_toml_str("[other]\nfoo = 1\n").unwrap_err();
        assert!(err.to_string().contains("missing [demo] section"));
    }

    #[test]
    fn bad_types_are_reported() {
        let err = Demo::from_toml_str("[demo]\nlevel = \"high\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(..)));
    }

    #[test]
    fn load_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[demo]\nname = \"from-file\"").unwrap();

        let (cfg, path) = Demo::load(Some(file.path())).unwrap();
        assert_eq!(cfg.name, "from-file");
        assert_eq!(path.as_deref(), Some(file.path()));
    }

    #[test]
    fn unreadable_file() {
        let err = Demo::load_from_file(Path::new("/nonexistent/mpx-rs.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(..)));
    }

    #[test]
    fn search_paths_end_in_etc() {
        let paths = config_search_paths();
        assert_eq!(paths[0], PathBuf::from("mpx-rs.toml"));
        assert_eq!(
            paths.last(),
            Some(&PathBuf::from("/etc/mpx-rs/mpx-rs.toml"))
        );
    }
}
