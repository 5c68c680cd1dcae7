//! Structured query and paging types.
//!
//! Queries are built explicitly with the constructors on [`Query`] and
//! [`BoolQuery`] instead of being derived from method names; the repository
//! facade composes them for its derived finder methods, and callers can pass
//! arbitrary queries to `search`.

use serde_json::Value;

/// A structured query against the book index.
///
/// The variants mirror the subset of the engine's query DSL the repository
/// needs: match-all, exact term matching, field-existence checks, nested
/// sub-document queries, and boolean composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Matches every document.
    MatchAll,
    /// Exact match of `field` against `value`.
    Term { field: String, value: Value },
    /// Matches documents where `field` is present and non-null.
    Exists { field: String },
    /// Runs `query` against the nested sub-documents under `path`.
    Nested { path: String, query: Box<Query> },
    /// Boolean composition of sub-queries.
    Bool(BoolQuery),
}

impl Query {
    /// A query matching all documents.
    pub fn match_all() -> Self {
        Self::MatchAll
    }

    /// An exact term query on the given field.
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// A field-existence query.
    pub fn exists(field: impl Into<String>) -> Self {
        Self::Exists {
            field: field.into(),
        }
    }

    /// A nested query scoped to the sub-documents under `path`.
    pub fn nested(path: impl Into<String>, query: Query) -> Self {
        Self::Nested {
            path: path.into(),
            query: Box::new(query),
        }
    }

    /// Start building a boolean query.
    pub fn bool_query() -> BoolQuery {
        BoolQuery::default()
    }
}

/// Boolean composition of sub-queries.
///
/// All `must` and `filter` clauses must match and no `must_not` clause may
/// match. When `should` is non-empty, at least one should-clause must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    /// Clauses that must all match.
    pub must: Vec<Query>,
    /// Clauses of which at least one must match, when any are present.
    pub should: Vec<Query>,
    /// Clauses that must not match.
    pub must_not: Vec<Query>,
    /// Non-scoring clauses that must all match.
    pub filter: Vec<Query>,
}

impl BoolQuery {
    /// Add a must clause.
    pub fn must(mut self, query: Query) -> Self {
        self.must.push(query);
        self
    }

    /// Add a should clause.
    pub fn should(mut self, query: Query) -> Self {
        self.should.push(query);
        self
    }

    /// Add a must-not clause.
    pub fn must_not(mut self, query: Query) -> Self {
        self.must_not.push(query);
        self
    }

    /// Add a filter clause.
    pub fn filter(mut self, query: Query) -> Self {
        self.filter.push(query);
        self
    }

    /// Finish building and wrap into a [`Query`].
    pub fn build(self) -> Query {
        Query::Bool(self)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// The engine's string form of the order.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Sort specification for a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Field to sort by.
    pub field: String,
    /// Direction.
    pub order: SortOrder,
}

impl Sort {
    /// Ascending sort on the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    /// Descending sort on the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// A request for one page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Zero-based page number.
    pub page: usize,
    /// Page size; must be non-zero.
    pub size: usize,
    /// Optional sort specification.
    pub sort: Option<Sort>,
}

impl PageRequest {
    /// A page request for the given page number and size.
    pub fn of(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    /// Attach a sort specification.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> usize {
        self.page * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::of(0, 10)
    }
}

/// One page of results plus total-count metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of matching documents across all pages.
    pub total: u64,
    /// Zero-based page number this page was requested with.
    pub page: usize,
    /// Requested page size.
    pub size: usize,
}

impl<T> Page<T> {
    /// Build a page from items and metadata.
    pub fn new(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
        }
    }

    /// An empty page for the given request.
    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of pages for the request's page size.
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total.div_ceil(self.size as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_term_query_builder() {
        let query = Query::term("name", "test");
        assert_eq!(
            query,
            Query::Term {
                field: "name".to_string(),
                value: json!("test"),
            }
        );
    }

    #[test]
    fn test_bool_query_builder() {
        let query = Query::bool_query()
            .must(Query::term("name", "test"))
            .must(Query::term("price", 10))
            .build();

        match query {
            Query::Bool(bool_query) => {
                assert_eq!(bool_query.must.len(), 2);
                assert!(bool_query.should.is_empty());
            }
            other => panic!("expected bool query, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_query_builder() {
        let query = Query::nested("buckets", Query::term("buckets.1", "v"));
        match query {
            Query::Nested { path, query } => {
                assert_eq!(path, "buckets");
                assert!(matches!(*query, Query::Term { .. }));
            }
            other => panic!("expected nested query, got {:?}", other),
        }
    }

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::of(0, 10).offset(), 0);
        assert_eq!(PageRequest::of(3, 25).offset(), 75);
    }

    #[test]
    fn test_page_total_pages() {
        let request = PageRequest::of(0, 10);
        let page: Page<u32> = Page::new(vec![1, 2, 3], 21, &request);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.len(), 3);
        assert!(!page.is_empty());

        let empty: Page<u32> = Page::empty(&request);
        assert_eq!(empty.total_pages(), 0);
        assert!(empty.is_empty());
    }
}
