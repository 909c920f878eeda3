use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

pub const DEFAULT_CONVERSATION_LIMIT: i64 = 50;
pub const DEFAULT_MESSAGE_LIMIT: i64 = 100;

/// Raw paging parameters. Values are kept as text so a malformed value falls
/// back to the route default instead of rejecting the request.
///
/// Extraction never fails. When a key is repeated the first occurrence wins and
/// the rest are ignored.
#[derive(Debug, Default)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub skip: Option<String>,
}

impl ListParams {
    pub fn from_query(query: Option<&str>) -> Self {
        let pairs: Vec<(String, String)> = query
            .and_then(|raw| serde_urlencoded::from_str(raw).ok())
            .unwrap_or_default();
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone())
        };

        Self {
            limit: first("limit"),
            offset: first("offset"),
            skip: first("skip"),
        }
    }

    pub fn limit_or(&self, default: i64) -> i64 {
        lenient(self.limit.as_deref(), default)
    }

    pub fn offset_or(&self, default: i64) -> i64 {
        lenient(self.offset.as_deref(), default)
    }

    pub fn skip_or(&self, default: i64) -> i64 {
        lenient(self.skip.as_deref(), default)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query()))
    }
}

/// Missing, non-numeric and negative values all yield `default`. No upper bound.
fn lenient(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|parsed| *parsed >= 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>, offset: Option<&str>) -> ListParams {
        ListParams {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
            skip: None,
        }
    }

    #[test]
    fn missing_values_use_defaults() {
        let p = ListParams::default();
        assert_eq!(p.limit_or(DEFAULT_CONVERSATION_LIMIT), 50);
        assert_eq!(p.offset_or(0), 0);
        assert_eq!(p.skip_or(0), 0);
    }

    #[test]
    fn numeric_values_are_used_as_given() {
        let p = params(Some("2"), Some(" 1 "));
        assert_eq!(p.limit_or(DEFAULT_CONVERSATION_LIMIT), 2);
        assert_eq!(p.offset_or(0), 1);

        let huge = params(Some("1000000"), None);
        assert_eq!(huge.limit_or(DEFAULT_MESSAGE_LIMIT), 1_000_000);
    }

    #[test]
    fn malformed_or_negative_values_fall_back() {
        assert_eq!(params(Some("abc"), None).limit_or(100), 100);
        assert_eq!(params(Some(""), None).limit_or(100), 100);
        assert_eq!(params(Some("-5"), None).limit_or(100), 100);
        assert_eq!(params(Some("1.5"), None).limit_or(100), 100);
        assert_eq!(params(None, Some("99999999999999999999")).offset_or(0), 0);
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let p = ListParams::from_query(Some("limit=1&limit=2&skip=3&skip=x"));
        assert_eq!(p.limit_or(DEFAULT_CONVERSATION_LIMIT), 1);
        assert_eq!(p.skip_or(0), 3);
    }

    #[test]
    fn query_is_percent_decoded_and_unknown_keys_ignored() {
        let p = ListParams::from_query(Some("offset=%32&foo=bar&limit"));
        assert_eq!(p.offset_or(0), 2);
        assert_eq!(p.limit.as_deref(), Some(""));
        assert_eq!(p.limit_or(DEFAULT_MESSAGE_LIMIT), 100);
    }

    #[test]
    fn absent_query_yields_defaults() {
        let p = ListParams::from_query(None);
        assert!(p.limit.is_none() && p.offset.is_none() && p.skip.is_none());
    }
}
