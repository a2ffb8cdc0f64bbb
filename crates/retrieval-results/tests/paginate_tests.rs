use retrieval_core::config::PaginationSettings;
use retrieval_core::query::Page;
use retrieval_results::{paginate, Results};

#[test]
fn wraps_when_page_requested() {
    let results = paginate(vec!["a", "b"], 7, Some(Page { page: 3, per_page: Some(2) }), &PaginationSettings::default());
    let page = results.paginated().expect("paginated");
    assert_eq!(page.page(), 3);
    assert_eq!(page.per_page(), 2);
    assert_eq!(page.total_entries(), 7);
    assert_eq!(page.total_pages(), 4);
    assert_eq!(results.as_slice(), &["a", "b"]);
}

#[test]
fn per_page_falls_back_to_setting() {
    let settings = PaginationSettings { enabled: true, default_per_page: 10 };
    let results = paginate(vec![1], 1, Some(Page { page: 1, per_page: None }), &settings);
    assert_eq!(results.paginated().map(|p| p.per_page()), Some(10));
}

#[test]
fn plain_without_page_or_when_disabled() {
    let plain = paginate(vec![1, 2], 2, None, &PaginationSettings::default());
    assert!(matches!(plain, Results::Plain(_)));

    let disabled = PaginationSettings { enabled: false, default_per_page: 30 };
    let plain = paginate(vec![1, 2], 2, Some(Page { page: 1, per_page: None }), &disabled);
    assert!(plain.paginated().is_none());
    assert_eq!(plain.into_vec(), vec![1, 2]);
}

#[test]
fn map_keeps_metadata() {
    let results = paginate(vec![1, 2], 9, Some(Page { page: 2, per_page: Some(2) }), &PaginationSettings::default());
    let mapped = results.map(|n| n * 10);
    assert_eq!(mapped.paginated().map(|p| p.total_entries()), Some(9));
    assert_eq!(mapped.iter().copied().collect::<Vec<_>>(), vec![10, 20]);
}
