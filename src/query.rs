use serde::Deserialize;

/// Query parameters accepted by GET /users
///
/// All values arrive as raw strings: an unparseable value falls back to its
/// default instead of failing the request, matching the public contract.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed, defaults to 1)
    pub page: Option<String>,
    /// Items per page (defaults to 10, clamps to >= 1)
    #[serde(rename = "recordPerPage")]
    pub record_per_page: Option<String>,
    /// Explicit start offset; when parseable it overrides the page-derived
    /// offset entirely
    #[serde(rename = "startIndex")]
    pub start_index: Option<String>,
}

/// Normalized LIMIT/OFFSET derived from `ListParams`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn from_params(params: &ListParams) -> Self {
        let record_per_page = parse_positive(params.record_per_page.as_deref()).unwrap_or(10);
        let page = parse_positive(params.page.as_deref()).unwrap_or(1);

        let offset = params
            .start_index
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            // Postgres rejects a negative OFFSET
            .map(|idx| idx.max(0))
            .unwrap_or((page - 1) * record_per_page);

        Self {
            limit: record_per_page,
            offset,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|&n| n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        page: Option<&str>,
        record_per_page: Option<&str>,
        start_index: Option<&str>,
    ) -> ListParams {
        ListParams {
            page: page.map(String::from),
            record_per_page: record_per_page.map(String::from),
            start_index: start_index.map(String::from),
        }
    }

    #[test]
    fn defaults_to_first_page_of_ten() {
        let p = Pagination::from_params(&ListParams::default());
        assert_eq!(p, Pagination { limit: 10, offset: 0 });
    }

    #[test]
    fn page_derives_the_offset() {
        let p = Pagination::from_params(&params(Some("3"), Some("10"), None));
        assert_eq!(p, Pagination { limit: 10, offset: 20 });

        let p = Pagination::from_params(&params(Some("2"), Some("25"), None));
        assert_eq!(p, Pagination { limit: 25, offset: 25 });
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let p = Pagination::from_params(&params(Some("0"), Some("-5"), None));
        assert_eq!(p, Pagination { limit: 10, offset: 0 });

        let p = Pagination::from_params(&params(Some("-1"), Some("0"), None));
        assert_eq!(p, Pagination { limit: 10, offset: 0 });
    }

    #[test]
    fn junk_values_fall_back() {
        let p = Pagination::from_params(&params(Some("abc"), Some("ten"), Some("x")));
        assert_eq!(p, Pagination { limit: 10, offset: 0 });
    }

    #[test]
    fn start_index_overrides_page_when_parseable() {
        let p = Pagination::from_params(&params(Some("3"), Some("10"), Some("7")));
        assert_eq!(p, Pagination { limit: 10, offset: 7 });

        // unparseable startIndex keeps the page-derived offset
        let p = Pagination::from_params(&params(Some("3"), Some("10"), Some("seven")));
        assert_eq!(p, Pagination { limit: 10, offset: 20 });

        // negative startIndex clamps rather than erroring the query
        let p = Pagination::from_params(&params(None, None, Some("-4")));
        assert_eq!(p, Pagination { limit: 10, offset: 0 });
    }
}
