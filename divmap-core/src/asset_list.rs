//! Newline-delimited asset list loading.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default asset list file name.
pub const DEFAULT_ASSET_LIST: &str = "lista.txt";

/// Errors loading the asset list. Both are fatal for a run.
#[derive(Debug, Error)]
pub enum AssetListError {
    #[error("asset list '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read asset list '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read the asset list at `path`.
///
/// Order and duplicates are preserved; blank lines are skipped.
pub fn load_asset_list(path: &Path) -> Result<Vec<String>, AssetListError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            AssetListError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            AssetListError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    Ok(parse_asset_list(&content))
}

/// Split content into trimmed, non-blank identifiers.
pub fn parse_asset_list(content: &str) -> Vec<String> {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines_and_trims() {
        let assets = parse_asset_list("MXRF11.SA\n\n  HGLG11.SA \r\n\t\nKNRI11.SA");
        assert_eq!(assets, vec!["MXRF11.SA", "HGLG11.SA", "KNRI11.SA"]);
    }

    #[test]
    fn keeps_duplicates_and_order() {
        let assets = parse_asset_list("B\nA\nB\n");
        assert_eq!(assets, vec!["B", "A", "B"]);
    }

    #[test]
    fn keeps_raw_spelling() {
        assert_eq!(parse_asset_list("café\n"), vec!["café"]);
    }

    #[test]
    fn ignores_byte_order_mark() {
        assert_eq!(parse_asset_list("\u{feff}PETR4.SA\n"), vec!["PETR4.SA"]);
    }

    #[test]
    fn empty_content_yields_no_assets() {
        assert!(parse_asset_list("\n \n").is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lista.txt");
        match load_asset_list(&path) {
            Err(AssetListError::NotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lista.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, b'\n']).unwrap();
        assert!(matches!(
            load_asset_list(&path),
            Err(AssetListError::Read { .. })
        ));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lista.txt");
        std::fs::write(&path, "XPLG11.SA\nVISC11.SA\n").unwrap();
        assert_eq!(load_asset_list(&path).unwrap(), vec!["XPLG11.SA", "VISC11.SA"]);
    }
}
