//! Property-based tests for the query-string codec

use proptest::prelude::*;
use storefront_runtime::QueryParameters;

fn decoded_pairs(query: &QueryParameters) -> Vec<(String, Option<String>)> {
    query
        .iter()
        .map(|p| (p.key.clone(), p.value.clone()))
        .collect()
}

proptest! {
    /// Serializing and re-parsing keeps every decoded key and value.
    #[test]
    fn serialized_query_parses_to_same_pairs(raw in "[a-zA-Z0-9%=&+._~*'()!@|é -]{1,40}") {
        let parsed = QueryParameters::parse(&raw);
        let reparsed = QueryParameters::parse(&parsed.to_string());
        prop_assert_eq!(decoded_pairs(&parsed), decoded_pairs(&reparsed));
    }

    /// Serialization is a fixed point after one pass.
    #[test]
    fn serialization_is_idempotent(raw in "[a-zA-Z0-9%=&+._~*'()!@|é -]{0,40}") {
        let once = QueryParameters::parse(&raw).to_string();
        let twice = QueryParameters::parse(&once).to_string();
        prop_assert_eq!(once, twice);
    }

    /// Parameter count equals the number of `&`-separated chunks.
    #[test]
    fn count_matches_chunks(raw in "[a-z=&]{1,30}") {
        let query = QueryParameters::parse(&raw);
        prop_assert_eq!(query.len(), raw.split('&').count());
    }
}
