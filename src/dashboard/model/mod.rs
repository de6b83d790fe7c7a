// dashboard/model/mod.rs - Shared data models for the dashboard core
//
// These types are used by the store, the pure query functions, the
// import/export helpers and the HTTP API. Everything here is plain data:
// no I/O, no hidden state.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dashboard::error::{DashboardError, Result};

/// Default number of products per page
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Storage requirement of a product
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemperatureClass {
    Chill,  // 0-4 °C
    Frozen, // -18 °C and below
    Dry,    // ambient
}

impl TemperatureClass {
    pub const ALL: [TemperatureClass; 3] = [
        TemperatureClass::Chill,
        TemperatureClass::Frozen,
        TemperatureClass::Dry,
    ];
}

impl fmt::Display for TemperatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureClass::Chill => write!(f, "CHILL"),
            TemperatureClass::Frozen => write!(f, "FROZEN"),
            TemperatureClass::Dry => write!(f, "DRY"),
        }
    }
}

impl FromStr for TemperatureClass {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "chill" | "chilled" => Ok(TemperatureClass::Chill),
            "frozen" => Ok(TemperatureClass::Frozen),
            "dry" => Ok(TemperatureClass::Dry),
            _ => Err(DashboardError::invalid_value("temperature_class", s)),
        }
    }
}

/// Quality grade assigned at goods receipt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityGrade {
    A,
    B,
    C,
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityGrade::A => write!(f, "A"),
            QualityGrade::B => write!(f, "B"),
            QualityGrade::C => write!(f, "C"),
        }
    }
}

impl FromStr for QualityGrade {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(QualityGrade::A),
            "B" => Ok(QualityGrade::B),
            "C" => Ok(QualityGrade::C),
            _ => Err(DashboardError::invalid_value("quality_grade", s)),
        }
    }
}

/// Stock-status filter dimension
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    All,
    LowStock,   // stock <= reorder point
    OutOfStock, // stock == 0
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::All => write!(f, "all"),
            StockStatus::LowStock => write!(f, "low_stock"),
            StockStatus::OutOfStock => write!(f, "out_of_stock"),
        }
    }
}

impl FromStr for StockStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StockStatus::All),
            "low_stock" | "low" => Ok(StockStatus::LowStock),
            "out_of_stock" | "out" => Ok(StockStatus::OutOfStock),
            _ => Err(DashboardError::invalid_value("stock_status", s)),
        }
    }
}

/// Blockchain-status filter dimension
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockchainStatus {
    #[default]
    All,
    Verified,
    Unverified,
}

impl fmt::Display for BlockchainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainStatus::All => write!(f, "all"),
            BlockchainStatus::Verified => write!(f, "verified"),
            BlockchainStatus::Unverified => write!(f, "unverified"),
        }
    }
}

impl FromStr for BlockchainStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(BlockchainStatus::All),
            "verified" => Ok(BlockchainStatus::Verified),
            "unverified" => Ok(BlockchainStatus::Unverified),
            _ => Err(DashboardError::invalid_value("blockchain_status", s)),
        }
    }
}

/// Sort key for the derived view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Catalog insertion order
    #[default]
    Catalog,
    Name,
    Price,
    Stock,
    LastRestocked,
    /// Popular flag; descending puts popular products first
    Popularity,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Catalog => write!(f, "catalog"),
            SortKey::Name => write!(f, "name"),
            SortKey::Price => write!(f, "price"),
            SortKey::Stock => write!(f, "stock"),
            SortKey::LastRestocked => write!(f, "last_restocked"),
            SortKey::Popularity => write!(f, "popularity"),
        }
    }
}

impl FromStr for SortKey {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "catalog" | "default" => Ok(SortKey::Catalog),
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            "stock" => Ok(SortKey::Stock),
            "last_restocked" | "restocked" | "lastrestocked" => Ok(SortKey::LastRestocked),
            "popularity" | "popular" => Ok(SortKey::Popularity),
            _ => Err(DashboardError::invalid_value("sort_by", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(DashboardError::invalid_value("sort_direction", s)),
        }
    }
}

/// Product record from the catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub sku: String,
    pub name: String,
    /// Vietnamese display name
    pub name_vi: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub temperature_class: TemperatureClass,
    pub stock: u32,
    pub reorder_point: u32,
    pub price: Decimal,
    /// Province of origin
    pub province: String,
    #[serde(default)]
    pub certifications: BTreeSet<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub blockchain_verified: bool,
    pub quality_grade: QualityGrade,
    pub last_restocked: NaiveDateTime,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.reorder_point
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// Fields consulted by free-text search
    pub fn searchable_fields(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.name_vi.as_str(),
            self.sku.as_str(),
            self.category.as_str(),
        ]
    }

    /// Case-insensitive substring match; `needle` must already be lowercase
    pub fn matches_text(&self, needle: &str) -> bool {
        self.searchable_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Price times stock, saturating at `Decimal::MAX`
    pub fn inventory_value(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.stock))
    }
}

/// Filter criteria applied to the catalog
///
/// Always fully defined: `Default` supplies every dimension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub query: String,
    pub category: Option<String>,
    pub province: Option<String>,
    pub stock_status: StockStatus,
    pub blockchain_status: BlockchainStatus,
    pub quality_grade: Option<QualityGrade>,
    pub temperature_class: Option<TemperatureClass>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub sort_by: SortKey,
    pub sort_direction: SortDirection,
    /// Zero-based page index
    pub page: u32,
    pub page_size: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            query: String::new(),
            category: None,
            province: None,
            stock_status: StockStatus::All,
            blockchain_status: BlockchainStatus::All,
            quality_grade: None,
            temperature_class: None,
            price_min: None,
            price_max: None,
            sort_by: SortKey::Catalog,
            sort_direction: SortDirection::Asc,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterCriteria {
    pub fn with_page_size(page_size: u32) -> Self {
        FilterCriteria {
            page_size,
            ..FilterCriteria::default()
        }
    }

    /// Lowercased, trimmed query; None when text filtering is off
    pub fn text_needle(&self) -> Option<String> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// Price bounds with min and max swapped when given in the wrong order
    pub fn price_range(&self) -> (Option<Decimal>, Option<Decimal>) {
        match (self.price_min, self.price_max) {
            (Some(min), Some(max)) if min > max => (Some(max), Some(min)),
            other => other,
        }
    }

    /// Page size never below one
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.max(1)
    }

    /// Apply one filter-dimension update
    ///
    /// Every update except a page change sends the view back to the first page.
    pub fn apply(&mut self, update: FilterUpdate) {
        if !matches!(update, FilterUpdate::Page(_)) {
            self.page = 0;
        }

        match update {
            FilterUpdate::Category(value) => self.category = value,
            FilterUpdate::Province(value) => self.province = value,
            FilterUpdate::StockStatus(value) => self.stock_status = value,
            FilterUpdate::BlockchainStatus(value) => self.blockchain_status = value,
            FilterUpdate::QualityGrade(value) => self.quality_grade = value,
            FilterUpdate::Temperature(value) => self.temperature_class = value,
            FilterUpdate::PriceMin(value) => self.price_min = value,
            FilterUpdate::PriceMax(value) => self.price_max = value,
            FilterUpdate::SortBy(value) => self.sort_by = value,
            FilterUpdate::SortDirection(value) => self.sort_direction = value,
            FilterUpdate::Page(value) => self.page = value,
            FilterUpdate::PageSize(value) => self.page_size = value,
        }
    }

    /// Number of dimensions narrowing the result set (text query included)
    pub fn active_filter_count(&self) -> usize {
        [
            self.text_needle().is_some(),
            self.category.is_some(),
            self.province.is_some(),
            self.stock_status != StockStatus::All,
            self.blockchain_status != BlockchainStatus::All,
            self.quality_grade.is_some(),
            self.temperature_class.is_some(),
            self.price_min.is_some(),
            self.price_max.is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }
}

/// One filter dimension and its new value
///
/// A closed set: there is no way to name a dimension that does not exist.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterUpdate {
    Category(Option<String>),
    Province(Option<String>),
    StockStatus(StockStatus),
    BlockchainStatus(BlockchainStatus),
    QualityGrade(Option<QualityGrade>),
    Temperature(Option<TemperatureClass>),
    PriceMin(Option<Decimal>),
    PriceMax(Option<Decimal>),
    SortBy(SortKey),
    SortDirection(SortDirection),
    Page(u32),
    PageSize(u32),
}

impl FilterUpdate {
    /// Parse a `(key, value)` pair as sent by a query string or a command line
    ///
    /// Keys are accepted in snake_case and camelCase. An empty value or `all`
    /// clears optional dimensions.
    pub fn parse(key: &str, value: &str) -> Result<FilterUpdate> {
        let value = value.trim();

        let update = match key.trim() {
            "category" => FilterUpdate::Category(optional_text(value)),
            "province" => FilterUpdate::Province(optional_text(value)),
            "stock_status" | "stockStatus" => FilterUpdate::StockStatus(value.parse()?),
            "blockchain_status" | "blockchainStatus" => {
                FilterUpdate::BlockchainStatus(value.parse()?)
            }
            "quality_grade" | "qualityGrade" => {
                FilterUpdate::QualityGrade(optional_parse(value)?)
            }
            "temperature" | "temperature_class" | "temperatureClass" => {
                FilterUpdate::Temperature(optional_parse(value)?)
            }
            "price_min" | "priceMin" | "min_price" | "minPrice" => {
                FilterUpdate::PriceMin(parse_price(key, value)?)
            }
            "price_max" | "priceMax" | "max_price" | "maxPrice" => {
                FilterUpdate::PriceMax(parse_price(key, value)?)
            }
            "sort" | "sort_by" | "sortBy" => FilterUpdate::SortBy(value.parse()?),
            "direction" | "sort_direction" | "sortDirection" => {
                FilterUpdate::SortDirection(value.parse()?)
            }
            "page" => FilterUpdate::Page(
                value
                    .parse()
                    .map_err(|_| DashboardError::invalid_value(key, value))?,
            ),
            "page_size" | "pageSize" => FilterUpdate::PageSize(
                value
                    .parse()
                    .map_err(|_| DashboardError::invalid_value(key, value))?,
            ),
            other => return Err(DashboardError::InvalidFilterKey(other.to_string())),
        };

        Ok(update)
    }
}

fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(value.to_string())
    }
}

fn optional_parse<T: FromStr<Err = DashboardError>>(value: &str) -> Result<Option<T>> {
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

fn parse_price(key: &str, value: &str) -> Result<Option<Decimal>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<Decimal>()
        .map(Some)
        .map_err(|_| DashboardError::invalid_value(key, value))
}

/// Facet count for filters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Price histogram bucket, `[min, max)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBucket {
    pub min: Decimal,
    pub max: Decimal,
    pub count: usize,
}

/// Derived view: one page of matching products plus facets over all matches
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub items: Vec<Product>,
    pub total_count: usize,
    /// Effective page after clamping
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub category_facets: Vec<FacetCount>,
    pub province_facets: Vec<FacetCount>,
}

/// Analytics data for the KPI cards
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogAnalytics {
    pub total_products: usize,
    pub total_units: u64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub verified_count: usize,
    pub inventory_value: Decimal,
    pub category_stats: Vec<CategoryStat>,
    pub temperature_breakdown: Vec<TemperatureCount>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub count: usize,
    pub units: u64,
    pub avg_price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureCount {
    pub temperature_class: TemperatureClass,
    pub count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Critical,
    Warning,
}

/// Inventory alert for a product at or below its reorder point
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAlert {
    pub product_id: u32,
    pub sku: String,
    pub name: String,
    pub stock: u32,
    pub reorder_point: u32,
    pub severity: AlertSeverity,
}

/// Import status tracking
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportStatus {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub complete: bool,
}
