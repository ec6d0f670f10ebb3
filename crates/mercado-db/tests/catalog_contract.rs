//! Catalog behavior contract, run against both product backends.
//!
//! Every test body is written once against [`ProductStore`] and then
//! executed twice: once on the in-memory store and once on an
//! in-memory SQLite database. The two backends must be
//! indistinguishable through the trait.

use mercado_core::{CatalogQuery, NewProduct, Product};
use mercado_db::{Database, DbConfig, DbError, MemoryStore, ProductStore};

// =============================================================================
// Harness
// =============================================================================

async fn sqlite_store() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Runs a test body against both backends.
macro_rules! both_backends {
    ($body:ident) => {
        $body(MemoryStore::new()).await;
        let db = sqlite_store().await;
        $body(db.products()).await;
    };
}

fn draft(code: &str, name: &str, category: Option<&str>, barcode: Option<&str>) -> NewProduct {
    NewProduct {
        code: code.to_string(),
        name: name.to_string(),
        category: category.map(str::to_string),
        price_cents: 2590,
        stock: 100,
        barcode: barcode.map(str::to_string),
        unit: "UN".to_string(),
    }
}

/// The standing fixture: two groceries plus a deactivated hygiene item.
async fn seed_fixture<S: ProductStore>(store: &S) -> Vec<Product> {
    let arroz = store
        .insert(draft(
            "001",
            "Arroz 5kg",
            Some("Alimentos"),
            Some("7891234567890"),
        ))
        .await
        .unwrap();
    let feijao = store
        .insert(draft(
            "002",
            "Feijão 1kg",
            Some("Alimentos"),
            Some("7891234567891"),
        ))
        .await
        .unwrap();
    let sabonete = store
        .insert(draft("003", "Sabonete", Some("Higiene"), None))
        .await
        .unwrap();
    store.soft_deactivate(&sabonete.id).await.unwrap();
    vec![arroz, feijao, sabonete]
}

fn query() -> CatalogQuery {
    CatalogQuery::default()
}

fn names(page: &mercado_core::CatalogPage) -> Vec<&str> {
    page.items.iter().map(|p| p.name.as_str()).collect()
}

// =============================================================================
// Filtering
// =============================================================================

#[tokio::test]
async fn category_filter_excludes_inactive() {
    async fn body<S: ProductStore>(store: S) {
        seed_fixture(&store).await;

        let page = store
            .find(&CatalogQuery {
                category: "Alimentos".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 2);
        assert_eq!(names(&page), ["Arroz 5kg", "Feijão 1kg"]);

        // The deactivated product never surfaces, even in its own category.
        let page = store
            .find(&CatalogQuery {
                category: "Higiene".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 0);
        assert!(page.items.is_empty());
    }
    both_backends!(body);
}

#[tokio::test]
async fn category_must_match_exactly() {
    async fn body<S: ProductStore>(store: S) {
        seed_fixture(&store).await;

        let page = store
            .find(&CatalogQuery {
                category: "Aliment".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 0);
    }
    both_backends!(body);
}

#[tokio::test]
async fn search_matches_code() {
    async fn body<S: ProductStore>(store: S) {
        seed_fixture(&store).await;

        let page = store
            .find(&CatalogQuery {
                search: "001".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 1);
        assert_eq!(page.items[0].code, "001");
    }
    both_backends!(body);
}

#[tokio::test]
async fn search_is_case_insensitive() {
    async fn body<S: ProductStore>(store: S) {
        seed_fixture(&store).await;

        for needle in ["ARROZ", "arroz", "Arroz"] {
            let page = store
                .find(&CatalogQuery {
                    search: needle.to_string(),
                    ..query()
                })
                .await
                .unwrap();
            assert_eq!(page.total_matching, 1, "search {needle:?}");
            assert_eq!(page.items[0].name, "Arroz 5kg");
        }
    }
    both_backends!(body);
}

#[tokio::test]
async fn accented_search_is_case_insensitive_on_both_backends() {
    async fn body<S: ProductStore>(store: S) {
        store
            .insert(draft("004", "Óleo de Soja 900ml", Some("Alimentos"), None))
            .await
            .unwrap();
        store
            .insert(draft("005", "Açúcar 1kg", Some("Alimentos"), None))
            .await
            .unwrap();

        for needle in ["ÓLEO", "óleo", "Óleo"] {
            let page = store
                .find(&CatalogQuery {
                    search: needle.to_string(),
                    ..query()
                })
                .await
                .unwrap();
            assert_eq!(page.total_matching, 1, "search {needle:?}");
            assert_eq!(page.items[0].code, "004");
        }

        let page = store
            .find(&CatalogQuery {
                search: "AÇÚCAR".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 1);
        assert_eq!(page.items[0].name, "Açúcar 1kg");
    }
    both_backends!(body);
}

#[tokio::test]
async fn update_refreshes_accented_search_matching() {
    async fn body<S: ProductStore>(store: S) {
        let created = store
            .insert(draft("006", "Refrigerante 2L", Some("Bebidas"), None))
            .await
            .unwrap();

        store
            .update(
                &created.id,
                draft("006", "Pêssego em Calda", Some("Alimentos"), None),
            )
            .await
            .unwrap();

        let page = store
            .find(&CatalogQuery {
                search: "PÊSSEGO".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 1);
        assert_eq!(page.items[0].id, created.id);

        // The old name no longer matches.
        let page = store
            .find(&CatalogQuery {
                search: "refrigerante".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 0);
    }
    both_backends!(body);
}

#[tokio::test]
async fn search_matches_barcode() {
    async fn body<S: ProductStore>(store: S) {
        seed_fixture(&store).await;

        let page = store
            .find(&CatalogQuery {
                search: "7891234567891".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 1);
        assert_eq!(page.items[0].name, "Feijão 1kg");
    }
    both_backends!(body);
}

#[tokio::test]
async fn search_and_category_combine() {
    async fn body<S: ProductStore>(store: S) {
        seed_fixture(&store).await;

        // "00" matches every code, the category narrows it down.
        let page = store
            .find(&CatalogQuery {
                search: "00".to_string(),
                category: "Alimentos".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 2);

        // A search hit outside the requested category is not returned.
        let page = store
            .find(&CatalogQuery {
                search: "Arroz".to_string(),
                category: "Higiene".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 0);
    }
    both_backends!(body);
}

#[tokio::test]
async fn like_wildcards_in_search_are_literal() {
    async fn body<S: ProductStore>(store: S) {
        store
            .insert(draft("010", "Promo 100%", Some("Ofertas"), None))
            .await
            .unwrap();
        store
            .insert(draft("011", "Outro Item", Some("Ofertas"), None))
            .await
            .unwrap();

        let page = store
            .find(&CatalogQuery {
                search: "100%".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 1);
        assert_eq!(page.items[0].name, "Promo 100%");

        // "%" alone matches only products whose text contains it.
        let page = store
            .find(&CatalogQuery {
                search: "%".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 1);
    }
    both_backends!(body);
}

// =============================================================================
// Ordering and pagination
// =============================================================================

#[tokio::test]
async fn results_are_sorted_by_name() {
    async fn body<S: ProductStore>(store: S) {
        store.insert(draft("020", "Zebra", None, None)).await.unwrap();
        store.insert(draft("021", "Abacaxi", None, None)).await.unwrap();
        store.insert(draft("022", "Manga", None, None)).await.unwrap();

        let page = store.find(&query()).await.unwrap();
        assert_eq!(names(&page), ["Abacaxi", "Manga", "Zebra"]);
    }
    both_backends!(body);
}

#[tokio::test]
async fn pages_are_disjoint_and_exhaustive() {
    async fn body<S: ProductStore>(store: S) {
        for i in 0..5 {
            store
                .insert(draft(&format!("03{i}"), &format!("Item {i}"), None, None))
                .await
                .unwrap();
        }

        let first = store
            .find(&CatalogQuery {
                page: 1,
                page_size: 2,
                ..query()
            })
            .await
            .unwrap();
        let second = store
            .find(&CatalogQuery {
                page: 2,
                page_size: 2,
                ..query()
            })
            .await
            .unwrap();
        let third = store
            .find(&CatalogQuery {
                page: 3,
                page_size: 2,
                ..query()
            })
            .await
            .unwrap();

        // Totals do not depend on the requested window.
        for page in [&first, &second, &third] {
            assert_eq!(page.total_matching, 5);
            assert_eq!(page.total_pages, 3);
        }
        assert_eq!(first.items.len(), 2);
        assert_eq!(second.items.len(), 2);
        assert_eq!(third.items.len(), 1);

        let mut all: Vec<String> = first
            .items
            .iter()
            .chain(&second.items)
            .chain(&third.items)
            .map(|p| p.id.clone())
            .collect();
        let before = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), before);
    }
    both_backends!(body);
}

#[tokio::test]
async fn page_past_the_end_is_empty_with_totals() {
    async fn body<S: ProductStore>(store: S) {
        seed_fixture(&store).await;

        let page = store
            .find(&CatalogQuery {
                page: 9,
                page_size: 50,
                ..query()
            })
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_matching, 2);
        assert_eq!(page.page, 9);
        assert_eq!(page.total_pages, 1);
    }
    both_backends!(body);
}

#[tokio::test]
async fn overflowing_page_window_is_empty_not_first_page() {
    async fn body<S: ProductStore>(store: S) {
        seed_fixture(&store).await;

        // page * page_size overflows i64; must not wrap into a
        // negative OFFSET that SQLite would read as page 1.
        let page = store
            .find(&CatalogQuery {
                page: u32::MAX,
                page_size: u32::MAX,
                ..query()
            })
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_matching, 2);
        assert_eq!(page.total_pages, 1);
    }
    both_backends!(body);
}

#[tokio::test]
async fn empty_result_has_zero_pages() {
    async fn body<S: ProductStore>(store: S) {
        let page = store
            .find(&CatalogQuery {
                search: "nada".to_string(),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total_matching, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }
    both_backends!(body);
}

// =============================================================================
// Mutation
// =============================================================================

#[tokio::test]
async fn insert_rejects_duplicate_code() {
    async fn body<S: ProductStore>(store: S) {
        store
            .insert(draft("050", "Original", None, None))
            .await
            .unwrap();
        let err = store
            .insert(draft("050", "Imitação", None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }), "{err:?}");
    }
    both_backends!(body);
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_id() {
    async fn body<S: ProductStore>(store: S) {
        let created = store
            .insert(draft("060", "Arroz 5kg", Some("Alimentos"), None))
            .await
            .unwrap();

        let mut revised = draft("060", "Arroz Integral 5kg", Some("Alimentos"), None);
        revised.price_cents = 2990;
        let updated = store.update(&created.id, revised).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Arroz Integral 5kg");
        assert_eq!(updated.price_cents, 2990);

        let fetched = store.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Arroz Integral 5kg");
    }
    both_backends!(body);
}

#[tokio::test]
async fn update_missing_product_is_not_found() {
    async fn body<S: ProductStore>(store: S) {
        let err = store
            .update("no-such-id", draft("070", "Fantasma", None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }), "{err:?}");
    }
    both_backends!(body);
}

#[tokio::test]
async fn soft_deactivate_keeps_record_but_hides_it() {
    async fn body<S: ProductStore>(store: S) {
        let created = store
            .insert(draft("080", "Sabonete", Some("Higiene"), None))
            .await
            .unwrap();

        store.soft_deactivate(&created.id).await.unwrap();

        // Direct fetch still works, the catalog no longer lists it.
        let fetched = store.get(&created.id).await.unwrap().unwrap();
        assert!(!fetched.active);
        let page = store.find(&query()).await.unwrap();
        assert_eq!(page.total_matching, 0);

        let err = store.soft_deactivate("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }), "{err:?}");
    }
    both_backends!(body);
}

#[tokio::test]
async fn categories_are_distinct_sorted_and_active_only() {
    async fn body<S: ProductStore>(store: S) {
        seed_fixture(&store).await;
        store
            .insert(draft("090", "Café 500g", Some("Bebidas"), None))
            .await
            .unwrap();

        let categories = store.categories().await.unwrap();
        assert_eq!(categories, ["Alimentos", "Bebidas"]);
    }
    both_backends!(body);
}
