use serde::Serialize;

/// The pagination envelope returned by list endpoints.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            pages,
            has_next: page * limit < total,
            has_prev: page > 1,
        }
    }
}

/// Clamps a raw `page` query value.
pub fn normalize_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamps a raw `limit` query value.
pub fn normalize_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_math() {
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let last = Pagination::new(3, 10, 25);
        assert!(!last.has_next);
    }

    #[test]
    fn normalizes_degenerate_query_values() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some(-3)), 1);
        assert_eq!(normalize_limit(None, 10), 10);
        assert_eq!(normalize_limit(Some(0), 10), 1);
        assert_eq!(normalize_limit(Some(1000), 10), 100);
    }
}
