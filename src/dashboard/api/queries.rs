// dashboard/api/queries.rs - Derived views over the catalog
//
// This module computes everything the dashboard shows from the catalog:
// the filtered/sorted/paginated product view, facet counts, the price
// histogram, KPI analytics and inventory alerts.
//
// Philosophy: Pure functions that take the catalog and parameters,
// return typed results. No side effects, easy to test.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::dashboard::api::catalog::Catalog;
use crate::dashboard::model::*;

/// Default histogram bucket width in VND
pub const DEFAULT_PRICE_BUCKET: i64 = 100_000;

/// Does `product` satisfy every active predicate of `criteria`?
pub fn matches_criteria(product: &Product, criteria: &FilterCriteria) -> bool {
    if let Some(needle) = criteria.text_needle() {
        if !product.matches_text(&needle) {
            return false;
        }
    }
    matches_dimensions(product, criteria)
}

// Everything except the text query, so callers can lowercase the needle once
fn matches_dimensions(product: &Product, criteria: &FilterCriteria) -> bool {
    if let Some(category) = &criteria.category {
        if &product.category != category {
            return false;
        }
    }

    if let Some(province) = &criteria.province {
        if &product.province != province {
            return false;
        }
    }

    let stock_ok = match criteria.stock_status {
        StockStatus::All => true,
        StockStatus::LowStock => product.is_low_stock(),
        StockStatus::OutOfStock => product.is_out_of_stock(),
    };
    if !stock_ok {
        return false;
    }

    let chain_ok = match criteria.blockchain_status {
        BlockchainStatus::All => true,
        BlockchainStatus::Verified => product.blockchain_verified,
        BlockchainStatus::Unverified => !product.blockchain_verified,
    };
    if !chain_ok {
        return false;
    }

    if criteria
        .quality_grade
        .is_some_and(|grade| product.quality_grade != grade)
    {
        return false;
    }

    if criteria
        .temperature_class
        .is_some_and(|class| product.temperature_class != class)
    {
        return false;
    }

    let (min, max) = criteria.price_range();
    if min.is_some_and(|min| product.price < min) || max.is_some_and(|max| product.price > max) {
        return false;
    }

    true
}

fn compare_by(key: SortKey, a: &Product, b: &Product) -> Ordering {
    match key {
        SortKey::Catalog => Ordering::Equal,
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Price => a.price.cmp(&b.price),
        SortKey::Stock => a.stock.cmp(&b.stock),
        SortKey::LastRestocked => a.last_restocked.cmp(&b.last_restocked),
        SortKey::Popularity => a.popular.cmp(&b.popular),
    }
}

/// All matching products in display order, without pagination
///
/// The sort is stable in both directions: ties keep catalog order.
pub fn filter_and_sort<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    let needle = criteria.text_needle();

    let mut matched: Vec<&Product> = products
        .iter()
        .filter(|p| needle.as_deref().map_or(true, |n| p.matches_text(n)))
        .filter(|p| matches_dimensions(p, criteria))
        .collect();

    let key = criteria.sort_by;
    match criteria.sort_direction {
        SortDirection::Asc => matched.sort_by(|a, b| compare_by(key, a, b)),
        SortDirection::Desc => matched.sort_by(|a, b| compare_by(key, b, a)),
    }

    matched
}

/// Derive the product view for `criteria`
///
/// Pages beyond the last one clamp to the last page; an empty result has a
/// single empty page 0.
pub fn derive_view(catalog: &Catalog, criteria: &FilterCriteria) -> ProductView {
    let matched = filter_and_sort(catalog.products(), criteria);

    let total_count = matched.len();
    let page_size = criteria.effective_page_size();
    let page_count = (total_count.div_ceil(page_size as usize)).max(1) as u32;
    let page = criteria.page.min(page_count - 1);

    if page != criteria.page {
        tracing::debug!(
            "Requested page {} clamped to {} ({} pages)",
            criteria.page,
            page,
            page_count
        );
    }

    let items: Vec<Product> = matched
        .iter()
        .skip(page as usize * page_size as usize)
        .take(page_size as usize)
        .map(|p| (*p).clone())
        .collect();

    tracing::debug!(
        "Derived view: {} of {} products match, page {}/{}",
        total_count,
        catalog.len(),
        page + 1,
        page_count
    );

    ProductView {
        items,
        total_count,
        page,
        page_size,
        page_count,
        category_facets: facet_counts(matched.iter().map(|p| p.category.as_str())),
        province_facets: facet_counts(matched.iter().map(|p| p.province.as_str())),
    }
}

/// Count values, most frequent first; ties keep first-seen order
pub fn facet_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<FacetCount> {
    let mut facets: Vec<FacetCount> = Vec::new();
    for value in values {
        match facets.iter_mut().find(|f| f.value == value) {
            Some(facet) => facet.count += 1,
            None => facets.push(FacetCount {
                value: value.to_string(),
                count: 1,
            }),
        }
    }
    facets.sort_by(|a, b| b.count.cmp(&a.count));
    facets
}

/// Price histogram with buckets `[k * width, (k + 1) * width)`, ascending
///
/// A non-positive width falls back to `DEFAULT_PRICE_BUCKET`.
pub fn price_histogram<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    bucket_width: Decimal,
) -> Vec<PriceBucket> {
    let width = if bucket_width > Decimal::ZERO {
        bucket_width
    } else {
        Decimal::from(DEFAULT_PRICE_BUCKET)
    };

    let mut buckets: BTreeMap<Decimal, usize> = BTreeMap::new();
    for product in products {
        let Some(min) = product
            .price
            .checked_div(width)
            .and_then(|q| q.floor().checked_mul(width))
        else {
            tracing::warn!("Price {} of {} is out of histogram range", product.price, product.sku);
            continue;
        };
        *buckets.entry(min).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(min, count)| PriceBucket {
            min,
            max: min.saturating_add(width),
            count,
        })
        .collect()
}

/// KPI analytics over the whole catalog
pub fn analytics(catalog: &Catalog) -> CatalogAnalytics {
    let products = catalog.products();

    let mut category_stats: Vec<CategoryStat> = Vec::new();
    let mut price_sums: Vec<Decimal> = Vec::new();
    for product in products {
        let idx = match category_stats
            .iter()
            .position(|s| s.category == product.category)
        {
            Some(idx) => idx,
            None => {
                category_stats.push(CategoryStat {
                    category: product.category.clone(),
                    count: 0,
                    units: 0,
                    avg_price: Decimal::ZERO,
                });
                price_sums.push(Decimal::ZERO);
                category_stats.len() - 1
            }
        };
        category_stats[idx].count += 1;
        category_stats[idx].units += u64::from(product.stock);
        price_sums[idx] = price_sums[idx].saturating_add(product.price);
    }
    for (stat, sum) in category_stats.iter_mut().zip(price_sums) {
        stat.avg_price = (sum / Decimal::from(stat.count)).round_dp(2);
    }
    category_stats.sort_by(|a, b| b.count.cmp(&a.count));

    let temperature_breakdown = TemperatureClass::ALL
        .iter()
        .map(|class| TemperatureCount {
            temperature_class: *class,
            count: products
                .iter()
                .filter(|p| p.temperature_class == *class)
                .count(),
        })
        .collect();

    CatalogAnalytics {
        total_products: products.len(),
        total_units: products.iter().map(|p| u64::from(p.stock)).sum(),
        low_stock_count: products.iter().filter(|p| p.is_low_stock()).count(),
        out_of_stock_count: products.iter().filter(|p| p.is_out_of_stock()).count(),
        verified_count: products.iter().filter(|p| p.blockchain_verified).count(),
        inventory_value: products
            .iter()
            .map(Product::inventory_value)
            .fold(Decimal::ZERO, Decimal::saturating_add),
        category_stats,
        temperature_breakdown,
    }
}

/// Alerts for products at or below their reorder point
///
/// Ordered critical first, then by stock ascending, then catalog order.
pub fn inventory_alerts(catalog: &Catalog) -> Vec<InventoryAlert> {
    let mut alerts: Vec<InventoryAlert> = catalog
        .products()
        .iter()
        .filter(|p| p.is_low_stock())
        .map(|p| InventoryAlert {
            product_id: p.id,
            sku: p.sku.clone(),
            name: p.name.clone(),
            stock: p.stock,
            reorder_point: p.reorder_point,
            severity: if p.is_out_of_stock() {
                AlertSeverity::Critical
            } else {
                AlertSeverity::Warning
            },
        })
        .collect();

    alerts.sort_by(|a, b| a.severity.cmp(&b.severity).then(a.stock.cmp(&b.stock)));
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::catalogs::product_with_stock;

    fn two_item_catalog() -> Catalog {
        Catalog::new(vec![
            product_with_stock(1, "A", 10, 20),
            product_with_stock(2, "B", 30, 20),
        ])
        .unwrap()
    }

    #[test]
    fn test_low_stock_filter_example() {
        let criteria = FilterCriteria {
            stock_status: StockStatus::LowStock,
            ..FilterCriteria::default()
        };
        let view = derive_view(&two_item_catalog(), &criteria);
        let skus: Vec<&str> = view.items.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["A"]);
        assert_eq!(view.total_count, 1);
    }

    #[test]
    fn test_sort_desc_keeps_catalog_order_for_ties() {
        let mut a = product_with_stock(1, "A", 5, 0);
        let mut b = product_with_stock(2, "B", 5, 0);
        let c = product_with_stock(3, "C", 9, 0);
        a.price = Decimal::new(100, 0);
        b.price = Decimal::new(100, 0);
        let products = vec![a, b, c];

        let criteria = FilterCriteria {
            sort_by: SortKey::Stock,
            sort_direction: SortDirection::Desc,
            ..FilterCriteria::default()
        };
        let ordered: Vec<u32> = filter_and_sort(&products, &criteria)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ordered, vec![3, 1, 2]);
    }

    #[test]
    fn test_out_of_range_page_clamps_to_last_page() {
        let products = (1..=5).map(|i| product_with_stock(i, &format!("S{}", i), i, 0)).collect();
        let catalog = Catalog::new(products).unwrap();
        let criteria = FilterCriteria {
            page: 99,
            page_size: 2,
            ..FilterCriteria::default()
        };
        let view = derive_view(&catalog, &criteria);
        assert_eq!(view.page_count, 3);
        assert_eq!(view.page, 2);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, 5);
    }

    #[test]
    fn test_empty_result_has_single_empty_page() {
        let criteria = FilterCriteria {
            query: "no such product".to_string(),
            page: 4,
            ..FilterCriteria::default()
        };
        let view = derive_view(&two_item_catalog(), &criteria);
        assert_eq!(view.total_count, 0);
        assert_eq!(view.page, 0);
        assert_eq!(view.page_count, 1);
        assert!(view.items.is_empty());
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let criteria = FilterCriteria {
            page_size: 0,
            ..FilterCriteria::default()
        };
        let view = derive_view(&two_item_catalog(), &criteria);
        assert_eq!(view.page_size, 1);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.page_count, 2);
    }

    #[test]
    fn test_inverted_price_range_is_swapped() {
        let mut cheap = product_with_stock(1, "CHEAP", 1, 0);
        let mut mid = product_with_stock(2, "MID", 1, 0);
        let mut dear = product_with_stock(3, "DEAR", 1, 0);
        cheap.price = Decimal::new(10, 0);
        mid.price = Decimal::new(50, 0);
        dear.price = Decimal::new(90, 0);
        let products = vec![cheap, mid, dear];

        let criteria = FilterCriteria {
            price_min: Some(Decimal::new(60, 0)),
            price_max: Some(Decimal::new(20, 0)),
            ..FilterCriteria::default()
        };
        let matched: Vec<&str> = filter_and_sort(&products, &criteria)
            .iter()
            .map(|p| p.sku.as_str())
            .collect();
        assert_eq!(matched, vec!["MID"]);
    }

    #[test]
    fn test_facet_counts_order() {
        let facets = facet_counts(["b", "a", "b", "c", "a", "b"].into_iter());
        assert_eq!(facets[0], FacetCount { value: "b".into(), count: 3 });
        assert_eq!(facets[1], FacetCount { value: "a".into(), count: 2 });
        assert_eq!(facets[2], FacetCount { value: "c".into(), count: 1 });
    }

    #[test]
    fn test_price_histogram_buckets() {
        let mut a = product_with_stock(1, "A", 1, 0);
        let mut b = product_with_stock(2, "B", 1, 0);
        let mut c = product_with_stock(3, "C", 1, 0);
        a.price = Decimal::new(45_000, 0);
        b.price = Decimal::new(99_999, 0);
        c.price = Decimal::new(210_000, 0);
        let products = vec![a, b, c];

        let buckets = price_histogram(&products, Decimal::new(100_000, 0));
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].min, Decimal::ZERO);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].min, Decimal::new(200_000, 0));
        assert_eq!(buckets[1].max, Decimal::new(300_000, 0));
    }

    #[test]
    fn test_extreme_prices_saturate() {
        let mut huge = product_with_stock(1, "HUGE", 1000, 0);
        let mut also_huge = product_with_stock(2, "ALSO", 1000, 0);
        huge.price = Decimal::MAX;
        also_huge.price = Decimal::MAX;
        assert_eq!(huge.inventory_value(), Decimal::MAX);

        let catalog = Catalog::new(vec![huge, also_huge]).unwrap();
        let summary = analytics(&catalog);
        assert_eq!(summary.inventory_value, Decimal::MAX);
        assert_eq!(summary.category_stats[0].count, 2);

        let buckets = price_histogram(catalog.products(), Decimal::new(100_000, 0));
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 2);
        assert!(buckets[0].max <= Decimal::MAX);

        let tiny_width = price_histogram(catalog.products(), Decimal::new(1, 20));
        assert!(tiny_width.is_empty());
    }

    #[test]
    fn test_alerts_critical_first() {
        let catalog = Catalog::new(vec![
            product_with_stock(1, "LOW", 5, 10),
            product_with_stock(2, "OK", 50, 10),
            product_with_stock(3, "OUT", 0, 10),
        ])
        .unwrap();
        let alerts = inventory_alerts(&catalog);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].sku, "OUT");
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(alerts[1].sku, "LOW");
        assert_eq!(alerts[1].severity, AlertSeverity::Warning);
    }
}
