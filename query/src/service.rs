use crate::prelude::*;

/// A record returned by the search service, as a JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub start: Option<u64>,
    pub rows: Option<u64>,
    /// Solr `sort` parameter, like `incipit asc`.
    pub sort: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> SearchRequest {
        SearchRequest {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_rows(mut self, rows: u64) -> Self {
        self.rows = Some(rows);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    /// Matching records, most relevant first.
    pub docs: Vec<Document>,
    /// Total number of matches, which may exceed `docs.len()`.
    pub hits: u64,
}

impl SearchResults {
    /// The `id` of every document, in relevance order.
    pub fn ids(&self) -> Result<Vec<String>, ServiceError> {
        self.docs.iter().map(document_id).collect()
    }
}

/// Read the `id` of a document. Solr may hand it out as a string or a number.
pub fn document_id(doc: &Document) -> Result<String, ServiceError> {
    match doc.get("id") {
        Some(serde_json::Value::String(id)) => Ok(id.clone()),
        Some(serde_json::Value::Number(id)) => Ok(id.to_string()),
        Some(_) => Err(ServiceError::InvalidResponse(String::from("id expected to be a string or a number"))),
        None => Err(ServiceError::InvalidResponse(String::from("id expected on document"))),
    }
}

/// The search index, seen as a black box answering query strings.
///
/// Implementations enforce their own timeouts and report them as [`ServiceError::Unavailable`].
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn query(&self, request: SearchRequest) -> Result<SearchResults, ServiceError>;
}

#[async_trait]
impl<T: SearchService + ?Sized> SearchService for Arc<T> {
    async fn query(&self, request: SearchRequest) -> Result<SearchResults, ServiceError> {
        (**self).query(request).await
    }
}
