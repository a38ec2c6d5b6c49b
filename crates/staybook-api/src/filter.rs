// Server-side equality filters.
//
// The store filters a collection with `orderBy="<field>"&equalTo="<value>"`,
// both values JSON-encoded. The client never re-filters locally.

use serde_json::Value;

/// An equality predicate applied server-side on a collection listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityFilter {
    field: String,
    value: String,
}

impl EqualityFilter {
    /// Only records whose `field` equals `value`.
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Query pairs in the form the store expects.
    pub(crate) fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("orderBy", Value::from(self.field.as_str()).to_string()),
            ("equalTo", Value::from(self.value.as_str()).to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_are_json_quoted() {
        let filter = EqualityFilter::new("userId", "u-42");
        let [order_by, equal_to] = filter.query_pairs();
        assert_eq!(order_by, ("orderBy", "\"userId\"".to_owned()));
        assert_eq!(equal_to, ("equalTo", "\"u-42\"".to_owned()));
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        let filter = EqualityFilter::new("userId", "a\"b");
        let [_, equal_to] = filter.query_pairs();
        assert_eq!(equal_to.1, r#""a\"b""#);
    }
}
