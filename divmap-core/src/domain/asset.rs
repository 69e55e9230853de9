//! Asset identifiers and their normalized form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized asset identifier: diacritics transliterated away, upper-cased.
///
/// Raw input spellings (`café`, `Cafe`, ` CAFÉ `) all collapse to `CAFE`.
/// The provider is still queried with the raw spelling; this is the label
/// used for keying rows in the result table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Normalize a raw identifier. Idempotent.
    pub fn normalize(raw: &str) -> Self {
        Self(normalize_text(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Transliterate to ASCII and upper-case. Characters with no ASCII
/// transliteration are dropped rather than replaced with a placeholder.
pub fn normalize_text(raw: &str) -> String {
    deunicode::deunicode_with_tofu(raw, "").trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_uppercases() {
        assert_eq!(AssetId::normalize("café").as_str(), "CAFE");
        assert_eq!(AssetId::normalize("Ação3").as_str(), "ACAO3");
    }

    #[test]
    fn keeps_ticker_punctuation() {
        assert_eq!(AssetId::normalize("mxrf11.sa").as_str(), "MXRF11.SA");
        assert_eq!(AssetId::normalize("BRK-B").as_str(), "BRK-B");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = AssetId::normalize("  Érico.sa ");
        let twice = AssetId::normalize(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = AssetId::normalize("hglg11");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"HGLG11\"");
    }
}
