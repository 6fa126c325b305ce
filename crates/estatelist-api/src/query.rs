// PostgREST-style predicate builder.
//
// Renders filter predicates to URL query pairs: `price=gte.100`,
// `location=ilike.*austin*`, `order=created_at.desc`. Predicates AND
// together server-side; callers add only the predicates for fields
// that are actually present.

/// Sort direction for `order=` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn suffix(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Builder for a REST read query against a single table.
///
/// ```
/// use estatelist_api::query::{Query, SortOrder};
///
/// let q = Query::select("*")
///     .eq("type", "house")
///     .gte("price", 100_000.0)
///     .ilike("location", "austin")
///     .order("created_at", SortOrder::Descending);
/// assert_eq!(
///     q.into_pairs(),
///     vec![
///         ("select".to_string(), "*".to_string()),
///         ("type".to_string(), "eq.house".to_string()),
///         ("price".to_string(), "gte.100000".to_string()),
///         ("location".to_string(), "ilike.*austin*".to_string()),
///         ("order".to_string(), "created_at.desc".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Start a query with a column projection (usually `"*"`).
    pub fn select(columns: &str) -> Self {
        Self {
            pairs: vec![("select".into(), columns.into())],
        }
    }

    /// Exact-match predicate.
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.pairs.push((column.into(), format!("eq.{}", value.to_string())));
        self
    }

    /// Inclusive lower bound.
    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.pairs.push((column.into(), format!("gte.{}", value.to_string())));
        self
    }

    /// Inclusive upper bound.
    pub fn lte(mut self, column: &str, value: impl ToString) -> Self {
        self.pairs.push((column.into(), format!("lte.{}", value.to_string())));
        self
    }

    /// Case-insensitive substring match. The pattern is wrapped in `*`
    /// wildcards here; callers pass the bare needle.
    pub fn ilike(mut self, column: &str, needle: &str) -> Self {
        self.pairs.push((column.into(), format!("ilike.*{needle}*")));
        self
    }

    /// Sort by a column.
    pub fn order(mut self, column: &str, direction: SortOrder) -> Self {
        self.pairs
            .push(("order".into(), format!("{column}.{}", direction.suffix())));
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, n: usize) -> Self {
        self.pairs.push(("limit".into(), n.to_string()));
        self
    }

    /// Consume the builder, yielding query pairs for `reqwest`.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_only() {
        let q = Query::select("*");
        assert_eq!(q.into_pairs(), vec![("select".into(), "*".into())]);
    }

    #[test]
    fn float_bounds_render_without_trailing_zeroes() {
        let q = Query::select("*").gte("price", 250_000.0).lte("price", 400_000.5);
        let pairs = q.into_pairs();
        assert_eq!(pairs[1].1, "gte.250000");
        assert_eq!(pairs[2].1, "lte.400000.5");
    }

    #[test]
    fn ilike_wraps_needle_in_wildcards() {
        let q = Query::select("*").ilike("location", "Lake View");
        assert_eq!(q.into_pairs()[1].1, "ilike.*Lake View*");
    }

    #[test]
    fn predicates_preserve_call_order() {
        let q = Query::select("*")
            .eq("type", "condo")
            .order("created_at", SortOrder::Descending)
            .limit(5);
        let keys: Vec<_> = q.into_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["select", "type", "order", "limit"]);
    }
}
