//! Seed taxonomy types.
//!
//! The seed taxonomy is the static catalog of categories known ahead of time
//! (e.g. "App crashes", "Payment failed"). During consolidation, mentions are
//! anchored to seed categories before novel clustering is attempted, which
//! keeps well-known issues from fragmenting into parallel clusters with
//! slightly different names.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConsolidateError, TaxonomyError};

/// A predefined category with a canonical name and optional aliases.
///
/// Aliases widen the anchoring net: a mention is matched against the
/// canonical name *and* every alias, and joins the category if any of them
/// clears the similarity threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCategory {
    /// The stable name mentions are grouped under.
    #[serde(rename = "canonical_name")]
    pub name: String,
    /// Alternative phrasings of the same category.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl SeedCategory {
    /// Creates a seed category with no aliases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    /// Creates a seed category with aliases.
    pub fn with_aliases<I, S>(name: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// Iterates over all phrases this category answers to: the canonical
    /// name first, then every alias.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// The full set of seed categories for one consolidation run.
///
/// Loaded once and treated as immutable for the duration of the run. An
/// empty taxonomy is valid: anchoring simply never fires and every mention
/// goes through novel clustering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTaxonomy {
    /// The seed categories, in declaration order.
    pub categories: Vec<SeedCategory>,
}

impl SeedTaxonomy {
    /// Creates a taxonomy from a list of categories.
    pub fn new(categories: Vec<SeedCategory>) -> Self {
        Self { categories }
    }

    /// Loads a taxonomy from a JSON file.
    ///
    /// The expected schema is `{"categories": [{"canonical_name": "...",
    /// "aliases": ["..."]}]}`, matching the seed file format produced by the
    /// surrounding tooling. The loaded taxonomy is not validated here; call
    /// [`SeedTaxonomy::validate`] (or let consolidation do it) to reject
    /// empty or duplicate names.
    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let contents = fs::read_to_string(path).map_err(|source| TaxonomyError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| TaxonomyError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the number of seed categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true if the taxonomy has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Checks structural invariants: every canonical name is non-empty after
    /// trimming, and no two categories share a canonical name.
    pub fn validate(&self) -> Result<(), ConsolidateError> {
        let mut seen: HashSet<&str> = HashSet::new();

        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(ConsolidateError::EmptySeedName);
            }
            if !seen.insert(category.name.as_str()) {
                return Err(ConsolidateError::DuplicateSeedName {
                    name: category.name.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    #[test]
    fn labels_yield_name_then_aliases() {
        let seed = SeedCategory::with_aliases("App crashes", ["crash", "crashes on login"]);
        let labels: Vec<&str> = seed.labels().collect();
        assert_eq!(labels, vec!["App crashes", "crash", "crashes on login"]);
    }

    #[test]
    fn labels_without_aliases() {
        let seed = SeedCategory::new("Late delivery");
        let labels: Vec<&str> = seed.labels().collect();
        assert_eq!(labels, vec!["Late delivery"]);
    }

    #[test]
    fn validate_accepts_empty_taxonomy() {
        assert!(SeedTaxonomy::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_name() {
        let taxonomy = SeedTaxonomy::new(vec![SeedCategory::new("  ")]);
        assert!(matches!(
            taxonomy.validate(),
            Err(ConsolidateError::EmptySeedName)
        ));
    }

    #[test]
    fn validate_rejects_duplicate_names() {
        let taxonomy = SeedTaxonomy::new(vec![
            SeedCategory::new("Food cold"),
            SeedCategory::new("Payment failed"),
            SeedCategory::new("Food cold"),
        ]);
        assert!(matches!(
            taxonomy.validate(),
            Err(ConsolidateError::DuplicateSeedName { name }) if name == "Food cold"
        ));
    }

    #[test]
    fn load_parses_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"categories": [
                {{"canonical_name": "App crashes", "aliases": ["crash"]}},
                {{"canonical_name": "Payment failed"}}
            ]}}"#
        )
        .unwrap();

        let taxonomy = SeedTaxonomy::load(file.path()).unwrap();
        assert_eq!(taxonomy.len(), 2);
        assert_eq!(taxonomy.categories[0].name, "App crashes");
        assert_eq!(taxonomy.categories[0].aliases, vec!["crash"]);
        assert!(taxonomy.categories[1].aliases.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let result = SeedTaxonomy::load(Path::new("/nonexistent/seeds.json"));
        assert!(matches!(result, Err(TaxonomyError::ReadFile { .. })));
    }

    #[test]
    fn load_reports_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = SeedTaxonomy::load(file.path());
        assert!(matches!(result, Err(TaxonomyError::ParseFile { .. })));
    }
}
