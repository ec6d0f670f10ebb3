//! # Catalog Query Logic
//!
//! Pure filtering and pagination for the product catalog.
//!
//! ## Why This Lives in Core
//! The catalog endpoint has two interchangeable backends (SQLite and an
//! in-memory fallback) that must stay behaviorally identical:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                GET /products?search=&category=                │
//! │                           │                                   │
//! │              ┌────────────┴────────────┐                      │
//! │              ▼                         ▼                      │
//! │      ProductRepository          MemoryStore                   │
//! │      (SQL WHERE/ORDER/          (filter_and_page,             │
//! │       LIMIT/OFFSET +             THIS MODULE)                 │
//! │       COUNT query)                                            │
//! │              │                         │                      │
//! │              └────────────┬────────────┘                      │
//! │                           ▼                                   │
//! │              { items, total_matching,                         │
//! │                page, total_pages }                            │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The predicate and the pagination math are defined once, here, so the
//! SQL path can be contract-tested against them.
//!
//! ## Semantics
//! - `search` non-empty: case-insensitive substring of name OR code OR
//!   barcode.
//! - `category` non-empty: exact, case-sensitive equality.
//! - Both filters AND-combined; inactive products always excluded.
//! - Results ordered by name ascending.
//! - `total_matching` is the size of the full filtered set, computed
//!   independently of the page window.

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Default page size when the caller doesn't specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Canonical case folding for search comparisons.
///
/// Unicode-aware, unlike SQLite's ASCII-only `lower()`. Accented
/// product names are the norm in this catalog ("Óleo de Soja",
/// "Açúcar"), so the SQL backend stores copies pre-folded with this
/// function instead of folding inside the query. Both backends must
/// fold through here or the same search would return different result
/// sets depending on the configured backend.
pub fn search_key(text: &str) -> String {
    text.to_lowercase()
}

// =============================================================================
// Query
// =============================================================================

/// A catalog query: free-text search, category filter, page window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search term. Empty means "no search filter".
    pub search: String,

    /// Exact category filter. Empty means "no category filter".
    pub category: String,

    /// 1-based page number.
    pub page: u32,

    /// Items per page.
    pub page_size: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        CatalogQuery {
            search: String::new(),
            category: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogQuery {
    /// Clamps page and page size to at least 1 and trims the search term.
    ///
    /// Both backends normalize before evaluating, so a `page=0` request
    /// behaves like `page=1` everywhere.
    pub fn normalize(mut self) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.max(1);
        self.search = self.search.trim().to_string();
        self
    }

    /// Row offset of the first item on this page.
    #[inline]
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Folded search term for case-insensitive matching.
    #[inline]
    pub fn search_lower(&self) -> String {
        search_key(self.search.trim())
    }

    /// Whether a product satisfies this query's filters.
    ///
    /// Pagination is not considered here; this is the predicate that
    /// defines `total_matching`.
    pub fn matches(&self, product: &Product) -> bool {
        product_matches(product, &self.search_lower(), &self.category)
    }
}

/// Filter predicate shared by [`CatalogQuery::matches`] and
/// [`filter_and_page`]. `needle_lower` must already be lowercased.
fn product_matches(product: &Product, needle_lower: &str, category: &str) -> bool {
    if !product.active {
        return false;
    }

    if !needle_lower.is_empty() {
        let in_name = search_key(&product.name).contains(needle_lower);
        let in_code = search_key(&product.code).contains(needle_lower);
        let in_barcode = product
            .barcode
            .as_deref()
            .map(|b| search_key(b).contains(needle_lower))
            .unwrap_or(false);

        if !(in_name || in_code || in_barcode) {
            return false;
        }
    }

    if !category.is_empty() && product.category.as_deref() != Some(category) {
        return false;
    }

    true
}

// =============================================================================
// Page
// =============================================================================

/// One page of catalog results plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    /// Items on this page, ordered by name ascending.
    pub items: Vec<Product>,

    /// Size of the full filtered set, independent of the page window.
    pub total_matching: u64,

    /// The (normalized) page number that was served.
    pub page: u32,

    /// `ceil(total_matching / page_size)`; 0 when nothing matched.
    pub total_pages: u32,
}

/// Number of pages needed for `total` items at `page_size` per page.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let page_size = page_size.max(1) as u64;
    total.div_ceil(page_size) as u32
}

/// Filters, sorts, and pages an in-memory product list.
///
/// This is the fallback backend's entire query path. The count is taken
/// from the full filtered set before slicing, so `total_matching` never
/// leaks from the page window.
pub fn filter_and_page(products: &[Product], query: &CatalogQuery) -> CatalogPage {
    let query = query.clone().normalize();
    let needle = query.search_lower();

    let mut matching: Vec<&Product> = products
        .iter()
        .filter(|p| product_matches(p, &needle, &query.category))
        .collect();
    matching.sort_by(|a, b| a.name.cmp(&b.name));

    let total = matching.len() as u64;
    let offset = query.offset() as usize;
    let items: Vec<Product> = matching
        .into_iter()
        .skip(offset)
        .take(query.page_size as usize)
        .cloned()
        .collect();

    CatalogPage {
        items,
        total_matching: total,
        page: query.page,
        total_pages: total_pages(total, query.page_size),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(code: &str, name: &str, category: Option<&str>, active: bool) -> Product {
        Product {
            id: format!("id-{code}"),
            code: code.to_string(),
            name: name.to_string(),
            category: category.map(String::from),
            price_cents: 1000,
            stock: 10,
            barcode: Some(format!("789123456789{code}")),
            unit: "UN".to_string(),
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_catalog() -> Vec<Product> {
        vec![
            product("001", "Arroz 5kg", Some("Alimentos"), true),
            product("002", "Feijão 1kg", Some("Alimentos"), true),
            product("003", "Sabonete", Some("Higiene"), false),
        ]
    }

    #[test]
    fn test_category_filter_excludes_inactive() {
        let products = sample_catalog();
        let query = CatalogQuery {
            category: "Alimentos".to_string(),
            ..Default::default()
        };

        let page = filter_and_page(&products, &query);
        let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Arroz 5kg", "Feijão 1kg"]);
        assert_eq!(page.total_matching, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_inactive_never_appears() {
        let products = sample_catalog();
        for query in [
            CatalogQuery::default(),
            CatalogQuery {
                search: "Sabonete".to_string(),
                ..Default::default()
            },
            CatalogQuery {
                category: "Higiene".to_string(),
                ..Default::default()
            },
        ] {
            let page = filter_and_page(&products, &query);
            assert!(page.items.iter().all(|p| p.name != "Sabonete"));
        }
    }

    #[test]
    fn test_search_by_code() {
        let products = sample_catalog();
        let query = CatalogQuery {
            search: "001".to_string(),
            page_size: 1,
            ..Default::default()
        };

        let page = filter_and_page(&products, &query);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Arroz 5kg");
        assert_eq!(page.total_matching, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_search_case_insensitive() {
        let products = sample_catalog();
        let upper = filter_and_page(
            &products,
            &CatalogQuery {
                search: "ARROZ".to_string(),
                ..Default::default()
            },
        );
        let lower = filter_and_page(
            &products,
            &CatalogQuery {
                search: "arroz".to_string(),
                ..Default::default()
            },
        );

        let ids = |page: &CatalogPage| -> Vec<String> {
            page.items.iter().map(|p| p.id.clone()).collect()
        };
        assert_eq!(ids(&upper), ids(&lower));
        assert_eq!(upper.total_matching, 1);
    }

    #[test]
    fn test_search_folds_accented_names() {
        let products = vec![
            product("004", "Óleo de Soja 900ml", Some("Alimentos"), true),
            product("005", "Açúcar 1kg", Some("Alimentos"), true),
        ];

        for needle in ["ÓLEO", "óleo", "Óleo"] {
            let page = filter_and_page(
                &products,
                &CatalogQuery {
                    search: needle.to_string(),
                    ..Default::default()
                },
            );
            assert_eq!(page.total_matching, 1, "search {needle:?}");
            assert_eq!(page.items[0].code, "004");
        }

        let page = filter_and_page(
            &products,
            &CatalogQuery {
                search: "AÇÚCAR".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(page.total_matching, 1);
        assert_eq!(page.items[0].code, "005");
    }

    #[test]
    fn test_search_includes_barcode() {
        let products = sample_catalog();
        let query = CatalogQuery {
            search: "789123456789002".to_string(),
            ..Default::default()
        };

        let page = filter_and_page(&products, &query);
        assert_eq!(page.total_matching, 1);
        assert_eq!(page.items[0].code, "002");
    }

    #[test]
    fn test_category_exact_match_only() {
        let products = sample_catalog();
        let query = CatalogQuery {
            category: "Aliment".to_string(),
            ..Default::default()
        };

        let page = filter_and_page(&products, &query);
        assert_eq!(page.total_matching, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_filters_are_and_combined() {
        let products = sample_catalog();
        // "Arroz" matches by name but is not in Higiene.
        let query = CatalogQuery {
            search: "Arroz".to_string(),
            category: "Higiene".to_string(),
            ..Default::default()
        };

        let page = filter_and_page(&products, &query);
        assert_eq!(page.total_matching, 0);
    }

    #[test]
    fn test_second_page_of_two() {
        let products = sample_catalog();
        let query = CatalogQuery {
            category: "Alimentos".to_string(),
            page: 2,
            page_size: 1,
            ..Default::default()
        };

        let page = filter_and_page(&products, &query);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Feijão 1kg");
        assert_eq!(page.total_matching, 2);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_total_independent_of_page_window() {
        let products: Vec<Product> = (0..7)
            .map(|i| product(&format!("{i:03}"), &format!("Produto {i}"), None, true))
            .collect();

        for page_num in 1..=4 {
            let query = CatalogQuery {
                page: page_num,
                page_size: 2,
                ..Default::default()
            };
            let page = filter_and_page(&products, &query);
            assert_eq!(page.total_matching, 7);
            assert_eq!(page.total_pages, 4);
        }
    }

    #[test]
    fn test_pages_disjoint_and_exhaustive() {
        let products: Vec<Product> = (0..7)
            .map(|i| product(&format!("{i:03}"), &format!("Produto {i}"), None, true))
            .collect();

        let mut seen: Vec<String> = Vec::new();
        let first = filter_and_page(
            &products,
            &CatalogQuery {
                page_size: 3,
                ..Default::default()
            },
        );
        for page_num in 1..=first.total_pages {
            let page = filter_and_page(
                &products,
                &CatalogQuery {
                    page: page_num,
                    page_size: 3,
                    ..Default::default()
                },
            );
            seen.extend(page.items.iter().map(|p| p.id.clone()));
        }

        // Every item exactly once, in sorted order.
        assert_eq!(seen.len(), 7);
        let mut deduped = seen.clone();
        deduped.dedup();
        assert_eq!(deduped, seen);
        let mut sorted = seen.clone();
        sorted.sort();
        assert_eq!(sorted, seen);
    }

    #[test]
    fn test_page_past_end_is_empty_with_correct_totals() {
        let products = sample_catalog();
        let query = CatalogQuery {
            category: "Alimentos".to_string(),
            page: 9,
            page_size: 50,
            ..Default::default()
        };

        let page = filter_and_page(&products, &query);
        assert!(page.items.is_empty());
        assert_eq!(page.total_matching, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_normalize_clamps_zero_page() {
        let query = CatalogQuery {
            page: 0,
            page_size: 0,
            search: "  arroz  ".to_string(),
            ..Default::default()
        }
        .normalize();

        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 1);
        assert_eq!(query.search, "arroz");
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_total_pages_math() {
        assert_eq!(total_pages(0, 50), 0);
        assert_eq!(total_pages(1, 50), 1);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(51, 50), 2);
        assert_eq!(total_pages(2, 1), 2);
    }
}
