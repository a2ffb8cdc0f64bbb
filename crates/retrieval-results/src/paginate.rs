use retrieval_core::config::PaginationSettings;
use retrieval_core::query::Page;
use std::ops::Deref;

/// One page of results with its position in the full match set.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    items: Vec<T>,
    page: u64,
    per_page: u64,
    total_entries: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total_entries: u64) -> Self {
        Self { items, page, per_page, total_entries }
    }

    pub fn page(&self) -> u64 { self.page }

    pub fn per_page(&self) -> u64 { self.per_page }

    pub fn total_entries(&self) -> u64 { self.total_entries }

    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 { return 0; }
        self.total_entries.div_ceil(self.per_page)
    }

    pub fn items(&self) -> &[T] { &self.items }

    pub fn into_items(self) -> Vec<T> { self.items }
}

/// Ordered results. Only the `Paginated` variant carries page metadata;
/// a plain sequence has no notion of `total_entries` at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Results<T> {
    Paginated(Paginated<T>),
    Plain(Vec<T>),
}

impl<T> Results<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            Results::Paginated(p) => p.items(),
            Results::Plain(items) => items,
        }
    }

    pub fn paginated(&self) -> Option<&Paginated<T>> {
        match self {
            Results::Paginated(p) => Some(p),
            Results::Plain(_) => None,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Results::Paginated(p) => p.into_items(),
            Results::Plain(items) => items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Results<U> {
        match self {
            Results::Paginated(p) => {
                let Paginated { items, page, per_page, total_entries } = p;
                Results::Paginated(Paginated::new(items.into_iter().map(f).collect(), page, per_page, total_entries))
            }
            Results::Plain(items) => Results::Plain(items.into_iter().map(f).collect()),
        }
    }
}

impl<T> Deref for Results<T> {
    type Target = [T];
    fn deref(&self) -> &[T] { self.as_slice() }
}

impl<T> IntoIterator for Results<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter { self.into_vec().into_iter() }
}

/// Wraps `items` with page metadata when a page was asked for and
/// pagination is enabled; otherwise returns them as a plain sequence.
pub fn paginate<T>(items: Vec<T>, total: u64, page: Option<Page>, settings: &PaginationSettings) -> Results<T> {
    match page {
        Some(page) if settings.enabled => {
            let per_page = page.per_page.unwrap_or(settings.default_per_page);
            Results::Paginated(Paginated::new(items, page.page, per_page, total))
        }
        _ => Results::Plain(items),
    }
}
