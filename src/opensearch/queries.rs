//! OpenSearch query builders.
//!
//! This module translates the structured [`Query`] model into OpenSearch
//! request bodies.

use serde_json::{json, Value};

use crate::query::{PageRequest, Query};

/// Build a full search request body from a query and page request.
///
/// The body carries the translated query, `from`/`size` paging derived from
/// the request, `track_total_hits` so page totals are exact, and an optional
/// `sort` clause.
pub fn build_search_body(query: &Query, page: &PageRequest) -> Value {
    let mut body = json!({
        "query": query_to_json(query),
        "from": page.offset(),
        "size": page.size,
        "track_total_hits": true
    });

    if let Some(sort) = &page.sort {
        let mut clause = serde_json::Map::new();
        clause.insert(sort.field.clone(), json!({ "order": sort.order.as_str() }));
        body["sort"] = Value::Array(vec![Value::Object(clause)]);
    }

    body
}

/// Translate a [`Query`] into its OpenSearch JSON form.
pub fn query_to_json(query: &Query) -> Value {
    match query {
        Query::MatchAll => json!({ "match_all": {} }),
        Query::Term { field, value } => {
            let mut term = serde_json::Map::new();
            term.insert(field.clone(), value.clone());
            json!({ "term": term })
        }
        Query::Exists { field } => json!({ "exists": { "field": field } }),
        Query::Nested { path, query } => json!({
            "nested": {
                "path": path,
                "query": query_to_json(query)
            }
        }),
        Query::Bool(bool_query) => {
            let mut clauses = serde_json::Map::new();
            if !bool_query.must.is_empty() {
                clauses.insert("must".to_string(), clause_list(&bool_query.must));
            }
            if !bool_query.should.is_empty() {
                clauses.insert("should".to_string(), clause_list(&bool_query.should));
                // At least one should-clause must match even when other
                // clause kinds are present.
                clauses.insert("minimum_should_match".to_string(), json!(1));
            }
            if !bool_query.must_not.is_empty() {
                clauses.insert("must_not".to_string(), clause_list(&bool_query.must_not));
            }
            if !bool_query.filter.is_empty() {
                clauses.insert("filter".to_string(), clause_list(&bool_query.filter));
            }
            json!({ "bool": clauses })
        }
    }
}

fn clause_list(queries: &[Query]) -> Value {
    Value::Array(queries.iter().map(query_to_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Sort;

    #[test]
    fn test_match_all_body() {
        let body = build_search_body(&Query::match_all(), &PageRequest::of(0, 10));

        assert_eq!(body["query"], json!({ "match_all": {} }));
        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 10);
        assert_eq!(body["track_total_hits"], true);
        assert!(body.get("sort").is_none());
    }

    #[test]
    fn test_paging_offset() {
        let body = build_search_body(&Query::match_all(), &PageRequest::of(2, 25));

        assert_eq!(body["from"], 50);
        assert_eq!(body["size"], 25);
    }

    #[test]
    fn test_sort_clause() {
        let page = PageRequest::of(0, 10).with_sort(Sort::asc("name"));
        let body = build_search_body(&Query::match_all(), &page);

        assert_eq!(body["sort"], json!([{ "name": { "order": "asc" } }]));
    }

    #[test]
    fn test_term_query() {
        let query = Query::term("name", "test");

        assert_eq!(query_to_json(&query), json!({ "term": { "name": "test" } }));
    }

    #[test]
    fn test_numeric_term_query() {
        let query = Query::term("price", 10);

        assert_eq!(query_to_json(&query), json!({ "term": { "price": 10 } }));
    }

    #[test]
    fn test_exists_query() {
        let query = Query::exists("name");

        assert_eq!(
            query_to_json(&query),
            json!({ "exists": { "field": "name" } })
        );
    }

    #[test]
    fn test_nested_query() {
        let query = Query::nested("buckets", Query::term("buckets.1", "test3"));

        assert_eq!(
            query_to_json(&query),
            json!({
                "nested": {
                    "path": "buckets",
                    "query": { "term": { "buckets.1": "test3" } }
                }
            })
        );
    }

    #[test]
    fn test_bool_query_with_must() {
        let query = Query::bool_query()
            .must(Query::term("name", "test"))
            .must(Query::term("price", 10))
            .build();
        let value = query_to_json(&query);

        let must = value["bool"]["must"].as_array().unwrap();
        assert_eq!(must.len(), 2);
        assert!(value["bool"].get("should").is_none());
    }

    #[test]
    fn test_bool_query_with_should_sets_minimum_match() {
        let query = Query::bool_query()
            .should(Query::term("name", "test"))
            .should(Query::term("price", 10))
            .build();
        let value = query_to_json(&query);

        let should = value["bool"]["should"].as_array().unwrap();
        assert_eq!(should.len(), 2);
        assert_eq!(value["bool"]["minimum_should_match"], 1);
    }

    #[test]
    fn test_bool_query_with_filter() {
        let query = Query::bool_query()
            .must(Query::match_all())
            .filter(Query::exists("name"))
            .build();
        let value = query_to_json(&query);

        let filter = value["bool"]["filter"].as_array().unwrap();
        assert_eq!(filter[0], json!({ "exists": { "field": "name" } }));
    }
}
