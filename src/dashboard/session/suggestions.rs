// dashboard/session/suggestions.rs - Search-box suggestions
//
// Ranks candidates from the catalog (names in both languages, SKUs,
// categories), the recent-search history and the smart filter vocabulary
// against what the user has typed so far.

use std::collections::HashSet;

use serde::Serialize;

use crate::dashboard::api::catalog::Catalog;
use crate::dashboard::session::history::RecentSearches;
use crate::dashboard::session::smart_filter::{normalize_token, VOCABULARY};

const EXACT: u32 = 400;
const PREFIX: u32 = 300;
const WORD_PREFIX: u32 = 200;
const SUBSTRING: u32 = 100;
const RECENT_BOOST: u32 = 50;
const POPULAR_BOOST: u32 = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Product,
    Category,
    Recent,
    SmartFilter,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
    /// Set for product suggestions
    pub product_id: Option<u32>,
    pub score: u32,
}

/// How well `candidate` matches `needle`; both lowercase
fn match_score(candidate: &str, needle: &str) -> Option<u32> {
    if candidate == needle {
        Some(EXACT)
    } else if candidate.starts_with(needle) {
        Some(PREFIX)
    } else if candidate
        .split(|c: char| c.is_whitespace() || c == '-')
        .any(|word| word.starts_with(needle))
    {
        Some(WORD_PREFIX)
    } else if candidate.contains(needle) {
        Some(SUBSTRING)
    } else {
        None
    }
}

/// Ranked suggestions for `input`, at most `limit`
///
/// Empty input returns the recent searches.
pub fn suggest(
    catalog: &Catalog,
    history: &RecentSearches,
    input: &str,
    limit: usize,
) -> Vec<Suggestion> {
    let needle = input.trim().to_lowercase();

    if needle.is_empty() {
        return history
            .iter()
            .take(limit)
            .map(|q| Suggestion {
                text: q.to_string(),
                kind: SuggestionKind::Recent,
                product_id: None,
                score: 0,
            })
            .collect();
    }

    let mut candidates: Vec<Suggestion> = Vec::new();
    let mut push = |text: &str, kind: SuggestionKind, product_id: Option<u32>, boost: u32| {
        if let Some(score) = match_score(&text.to_lowercase(), &needle) {
            candidates.push(Suggestion {
                text: text.to_string(),
                kind,
                product_id,
                score: score + boost,
            });
        }
    };

    for product in catalog.products() {
        let boost = if product.popular { POPULAR_BOOST } else { 0 };
        push(&product.name, SuggestionKind::Product, Some(product.id), boost);
        push(&product.name_vi, SuggestionKind::Product, Some(product.id), boost);
        push(&product.sku, SuggestionKind::Product, Some(product.id), boost);
    }
    for category in catalog.categories() {
        push(&category, SuggestionKind::Category, None, 0);
    }
    for recent in history.iter() {
        push(recent, SuggestionKind::Recent, None, RECENT_BOOST);
    }

    // Vocabulary tokens are compared in their normalized spelling
    let token_needle = normalize_token(&needle);
    if !token_needle.is_empty() {
        for token in VOCABULARY {
            if let Some(score) = match_score(token, &token_needle) {
                candidates.push(Suggestion {
                    text: token.to_string(),
                    kind: SuggestionKind::SmartFilter,
                    product_id: None,
                    score,
                });
            }
        }
    }

    candidates.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.text.cmp(&b.text)));

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|s| seen.insert(s.text.to_lowercase()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{catalogs::ColdChainCatalog, CatalogFixture};

    #[test]
    fn test_match_score_ranking() {
        assert_eq!(match_score("tôm sú", "tôm sú"), Some(EXACT));
        assert_eq!(match_score("tôm sú", "tôm"), Some(PREFIX));
        assert_eq!(match_score("black tiger prawn", "tiger"), Some(WORD_PREFIX));
        assert_eq!(match_score("black tiger prawn", "ger"), Some(SUBSTRING));
        assert_eq!(match_score("black tiger prawn", "salmon"), None);
    }

    #[test]
    fn test_empty_input_returns_history() {
        let catalog = ColdChainCatalog::catalog().unwrap();
        let mut history = RecentSearches::default();
        history.record("tôm");
        history.record("xoài");

        let suggestions = suggest(&catalog, &history, "  ", 5);
        let texts: Vec<&str> = suggestions.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["xoài", "tôm"]);
        assert!(suggestions.iter().all(|s| s.kind == SuggestionKind::Recent));
    }

    #[test]
    fn test_prefix_beats_substring() {
        let catalog = ColdChainCatalog::catalog().unwrap();
        let history = RecentSearches::default();

        let suggestions = suggest(&catalog, &history, "sữa", 10);
        assert!(!suggestions.is_empty());
        // "Sữa" (category) is an exact match and ranks first
        assert_eq!(suggestions[0].text, "Sữa");
        assert_eq!(suggestions[0].kind, SuggestionKind::Category);
        assert!(suggestions.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_results_are_deduplicated_and_limited() {
        let catalog = ColdChainCatalog::catalog().unwrap();
        let mut history = RecentSearches::default();
        history.record("Hải sản");

        let suggestions = suggest(&catalog, &history, "hải", 3);
        assert!(suggestions.len() <= 3);
        let hai_san = suggestions
            .iter()
            .filter(|s| s.text.to_lowercase() == "hải sản")
            .count();
        assert_eq!(hai_san, 1);
    }

    #[test]
    fn test_vocabulary_suggestions() {
        let catalog = ColdChainCatalog::catalog().unwrap();
        let history = RecentSearches::default();

        let suggestions = suggest(&catalog, &history, "low s", 5);
        assert!(suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::SmartFilter && s.text == "low_stock"));
    }
}
