// dashboard/session/smart_filter.rs - Smart filter vocabulary
//
// Maps short free-form tokens ("low stock", "đông lạnh" typed without
// accents, "cheapest") onto filter-dimension updates. Anything outside the
// vocabulary is treated as a text search by the store.

use crate::dashboard::model::{
    BlockchainStatus, FilterUpdate, QualityGrade, SortDirection, SortKey, StockStatus,
    TemperatureClass,
};

/// Result of interpreting a smart filter token
#[derive(Clone, Debug, PartialEq)]
pub enum SmartFilter {
    /// The token is in the vocabulary
    Updates(Vec<FilterUpdate>),
    /// Unknown token, to be used as the text query
    Search(String),
}

/// Vocabulary entries, as normalized tokens
pub const VOCABULARY: &[&str] = &[
    "low_stock",
    "sap_het",
    "out_of_stock",
    "het_hang",
    "in_stock",
    "all_stock",
    "blockchain_verified",
    "verified",
    "unverified",
    "frozen",
    "dong_lanh",
    "chill",
    "chilled",
    "mat",
    "dry",
    "kho",
    "premium",
    "grade_a",
    "popular",
    "best_seller",
    "cheapest",
    "newest",
    "recently_restocked",
    "critical",
];

/// Trim, lowercase, and turn runs of spaces and hyphens into one underscore
pub fn normalize_token(token: &str) -> String {
    let lowered = token.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_sep = false;
    for ch in lowered.chars() {
        if ch == ' ' || ch == '-' || ch == '_' {
            pending_sep = true;
        } else {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        }
    }
    out
}

/// Interpret a token against the fixed vocabulary
pub fn interpret(token: &str) -> SmartFilter {
    let normalized = normalize_token(token);

    let updates = match normalized.as_str() {
        "low_stock" | "sap_het" => vec![FilterUpdate::StockStatus(StockStatus::LowStock)],
        "out_of_stock" | "het_hang" => vec![FilterUpdate::StockStatus(StockStatus::OutOfStock)],
        "in_stock" | "all_stock" => vec![FilterUpdate::StockStatus(StockStatus::All)],
        "blockchain_verified" | "verified" => {
            vec![FilterUpdate::BlockchainStatus(BlockchainStatus::Verified)]
        }
        "unverified" => vec![FilterUpdate::BlockchainStatus(BlockchainStatus::Unverified)],
        "frozen" | "dong_lanh" => vec![FilterUpdate::Temperature(Some(TemperatureClass::Frozen))],
        "chill" | "chilled" | "mat" => {
            vec![FilterUpdate::Temperature(Some(TemperatureClass::Chill))]
        }
        "dry" | "kho" => vec![FilterUpdate::Temperature(Some(TemperatureClass::Dry))],
        "premium" | "grade_a" => vec![FilterUpdate::QualityGrade(Some(QualityGrade::A))],
        "popular" | "best_seller" => sort(SortKey::Popularity, SortDirection::Desc),
        "cheapest" => sort(SortKey::Price, SortDirection::Asc),
        "newest" | "recently_restocked" => sort(SortKey::LastRestocked, SortDirection::Desc),
        "critical" => {
            let mut updates = vec![FilterUpdate::StockStatus(StockStatus::OutOfStock)];
            updates.extend(sort(SortKey::Stock, SortDirection::Asc));
            updates
        }
        _ => return SmartFilter::Search(token.trim().to_string()),
    };

    SmartFilter::Updates(updates)
}

fn sort(key: SortKey, direction: SortDirection) -> Vec<FilterUpdate> {
    vec![
        FilterUpdate::SortBy(key),
        FilterUpdate::SortDirection(direction),
    ]
}
