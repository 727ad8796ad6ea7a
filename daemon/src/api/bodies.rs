use super::*;

const MISSING_SEARCH_BODY: &str = "Request body was malformed or missing";
const INVALID_PER_PAGE: &str = "Invalid \"X-Cantus-Per-Page\" header";
const TOO_BIG_PER_PAGE: &str = "\"X-Cantus-Per-Page\" is too high";
const TOO_SMALL_PER_PAGE: &str = "\"X-Cantus-Per-Page\" must be 0 or greater";
const INVALID_PAGE: &str = "Invalid \"X-Cantus-Page\" header";
const TOO_SMALL_PAGE: &str = "\"X-Cantus-Page\" must be greater than 0";

/// What the search filter hands to the handler.
pub(super) struct SearchCall {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Deserialize, Debug)]
pub(super) struct SearchBody {
    pub query: String,
    #[serde(default)]
    pub page: Option<PageValue>,
    #[serde(default)]
    pub per_page: Option<PageValue>,
}

impl SearchBody {
    pub fn from_bytes(body: &[u8]) -> Result<SearchBody, ApiError> {
        serde_json::from_slice(body).map_err(|e| {
            debug!("Invalid SEARCH body: {e}");
            ApiError::new(StatusCode::BAD_REQUEST, MISSING_SEARCH_BODY)
        })
    }
}

/// Clients send numbers either as JSON numbers or as strings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub(super) enum PageValue {
    Number(i64),
    // 5.0
    Float(f64),
    Text(String),
}

impl PageValue {
    fn as_int(&self) -> Option<i64> {
        match self {
            PageValue::Number(n) => Some(*n),
            PageValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
            PageValue::Float(_) => None,
            PageValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn from_header(headers: &HeaderMap, name: &HeaderName) -> Option<PageValue> {
        let value = headers.get(name)?.to_str().ok()?;
        Some(PageValue::Text(value.to_string()))
    }
}

/// Paging limits of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

/// The page a request asked for, once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Page {
    pub page: u64,
    pub per_page: u64,
}

impl Page {
    pub fn start(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Paging {
    pub(super) fn page(&self, page: Option<PageValue>, per_page: Option<PageValue>) -> Result<Page, ApiError> {
        let per_page = match per_page {
            None => self.default_per_page,
            Some(value) => match value.as_int() {
                None => return Err(ApiError::new(StatusCode::BAD_REQUEST, INVALID_PER_PAGE)),
                Some(n) if n < 0 => return Err(ApiError::new(StatusCode::BAD_REQUEST, TOO_SMALL_PER_PAGE)),
                Some(0) => self.max_per_page,
                Some(n) if n as u64 > self.max_per_page => {
                    return Err(ApiError::new(StatusCode::INSUFFICIENT_STORAGE, TOO_BIG_PER_PAGE).with_per_page(self.max_per_page))
                }
                Some(n) => n as u64,
            },
        };

        let page = match page {
            None => 1,
            Some(value) => match value.as_int() {
                None => return Err(ApiError::new(StatusCode::BAD_REQUEST, INVALID_PAGE)),
                Some(n) if n < 1 => return Err(ApiError::new(StatusCode::BAD_REQUEST, TOO_SMALL_PAGE)),
                Some(n) => n as u64,
            },
        };

        Ok(Page { page, per_page })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGING: Paging = Paging { default_per_page: 10, max_per_page: 100 };

    fn num(n: i64) -> Option<PageValue> {
        Some(PageValue::Number(n))
    }

    #[test]
    fn defaults() {
        assert_eq!(PAGING.page(None, None).unwrap(), Page { page: 1, per_page: 10 });
        assert_eq!(PAGING.page(num(4), num(0)).unwrap(), Page { page: 4, per_page: 100 });
        assert_eq!(PAGING.page(Some(PageValue::Text(String::from(" 2 "))), num(100)).unwrap().start(), 100);
    }

    #[test]
    fn rejections() {
        assert_eq!(PAGING.page(None, num(101)).unwrap_err().status, StatusCode::INSUFFICIENT_STORAGE);
        assert_eq!(PAGING.page(None, num(-3)).unwrap_err().reason, TOO_SMALL_PER_PAGE);
        assert_eq!(PAGING.page(num(0), None).unwrap_err().reason, TOO_SMALL_PAGE);
        assert_eq!(PAGING.page(Some(PageValue::Text(String::from("two"))), None).unwrap_err().reason, INVALID_PAGE);
    }

    #[test]
    fn floats() {
        let body = SearchBody::from_bytes(br#"{"query": "Deus", "page": 2.0, "per_page": 5.5}"#).unwrap();
        assert_eq!(body.page, Some(PageValue::Float(2.0)));
        assert_eq!(PAGING.page(body.page.clone(), None).unwrap(), Page { page: 2, per_page: 10 });
        assert_eq!(PAGING.page(None, body.per_page).unwrap_err().reason, INVALID_PER_PAGE);
    }

    #[test]
    fn body() {
        let body = SearchBody::from_bytes(br#"{"query": "Deus", "per_page": "5", "extra": true}"#).unwrap();
        assert_eq!(body.query, "Deus");
        assert_eq!(body.per_page, Some(PageValue::Text(String::from("5"))));
        assert_eq!(body.page, None);
        assert!(SearchBody::from_bytes(b"").is_err());
        assert!(SearchBody::from_bytes(br#"{"query": 3}"#).is_err());
    }
}
