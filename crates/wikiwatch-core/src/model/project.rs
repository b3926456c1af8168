// ── Project identity ──
//
// A project is one addressable wiki: a Wikipedia language edition, or one
// of the two shared sites every account also watches (Commons, Wikidata).

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A content language, optionally narrowed to a script/content variant
/// (e.g. `zh` + `zh-hant`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    #[serde(default)]
    pub variant: Option<String>,
}

impl Language {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            variant: None,
        }
    }

    pub fn with_variant(code: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            variant: Some(variant.into()),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{} ({variant})", self.code),
            None => f.write_str(&self.code),
        }
    }
}

/// One wiki site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "language", rename_all = "snake_case")]
pub enum Project {
    Wikipedia(Language),
    Commons,
    Wikidata,
}

impl Project {
    /// One Wikipedia edition per language, in input order.
    pub fn projects_from_languages(languages: &[Language]) -> Vec<Self> {
        languages.iter().cloned().map(Self::Wikipedia).collect()
    }

    /// The `variant` request parameter for this project, if any.
    pub fn variant_code(&self) -> Option<&str> {
        match self {
            Self::Wikipedia(language) => language.variant.as_deref(),
            Self::Commons | Self::Wikidata => None,
        }
    }

    pub fn language(&self) -> Option<&Language> {
        match self {
            Self::Wikipedia(language) => Some(language),
            Self::Commons | Self::Wikidata => None,
        }
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Wikipedia(a), Self::Wikipedia(b)) => a == b,
            (Self::Commons, Self::Commons) | (Self::Wikidata, Self::Wikidata) => true,
            _ => false,
        }
    }
}

impl Eq for Project {}

// Must agree with `PartialEq`: the variant code is part of the identity.
impl Hash for Project {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        if let Self::Wikipedia(language) = self {
            language.code.hash(state);
            language.variant.hash(state);
        }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wikipedia(language) => write!(f, "{language} wikipedia"),
            Self::Commons => f.write_str("commons"),
            Self::Wikidata => f.write_str("wikidata"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn en() -> Project {
        Project::Wikipedia(Language::new("en"))
    }

    #[test]
    fn wikipedia_editions_compare_by_language() {
        assert_eq!(en(), en());
        assert_ne!(en(), Project::Wikipedia(Language::new("es")));
        assert_ne!(
            Project::Wikipedia(Language::with_variant("zh", "zh-hans")),
            Project::Wikipedia(Language::with_variant("zh", "zh-hant")),
        );
    }

    #[test]
    fn shared_sites_only_equal_themselves() {
        assert_eq!(Project::Commons, Project::Commons);
        assert_eq!(Project::Wikidata, Project::Wikidata);
        assert_ne!(Project::Commons, Project::Wikidata);
        assert_ne!(Project::Commons, en());
    }

    #[test]
    fn variants_are_distinct_map_keys() {
        let mut counts = HashMap::new();
        *counts
            .entry(Project::Wikipedia(Language::with_variant("zh", "zh-hans")))
            .or_insert(0) += 1;
        *counts
            .entry(Project::Wikipedia(Language::with_variant("zh", "zh-hant")))
            .or_insert(0) += 1;
        *counts
            .entry(Project::Wikipedia(Language::with_variant("zh", "zh-hans")))
            .or_insert(0) += 1;

        assert_eq!(counts.len(), 2);
        assert_eq!(
            counts[&Project::Wikipedia(Language::with_variant("zh", "zh-hans"))],
            2
        );
    }

    #[test]
    fn projects_from_languages_preserves_order() {
        let languages = [Language::new("es"), Language::new("en"), Language::new("de")];
        let projects = Project::projects_from_languages(&languages);

        let codes: Vec<_> = projects
            .iter()
            .filter_map(|p| p.language().map(|l| l.code.as_str()))
            .collect();
        assert_eq!(codes, ["es", "en", "de"]);
    }

    #[test]
    fn variant_code_only_for_wikipedia() {
        let zh = Project::Wikipedia(Language::with_variant("zh", "zh-hant"));
        assert_eq!(zh.variant_code(), Some("zh-hant"));
        assert_eq!(en().variant_code(), None);
        assert_eq!(Project::Commons.variant_code(), None);
    }
}
