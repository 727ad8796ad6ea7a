use crate::prelude::*;
use reqwest::StatusCode;

#[derive(Debug)]
pub enum SolrRpcError {
    Reqwest(reqwest::Error),
    Json(serde_json::Error),
    Status(StatusCode, String),
    InvalidResponse(&'static str),
}

impl From<reqwest::Error> for SolrRpcError {
    fn from(e: reqwest::Error) -> Self {
        SolrRpcError::Reqwest(e)
    }
}

impl From<serde_json::Error> for SolrRpcError {
    fn from(e: serde_json::Error) -> Self {
        SolrRpcError::Json(e)
    }
}

impl std::fmt::Display for SolrRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolrRpcError::Reqwest(e) => write!(f, "ReqwestError: {e}"),
            SolrRpcError::Json(e) => write!(f, "InvalidJson: {e}"),
            SolrRpcError::Status(status, body) => write!(f, "Status {status}: {body}"),
            SolrRpcError::InvalidResponse(e) => write!(f, "InvalidResponse: {e}"),
        }
    }
}

impl std::error::Error for SolrRpcError {}

impl From<SolrRpcError> for ServiceError {
    fn from(e: SolrRpcError) -> Self {
        match e {
            SolrRpcError::Reqwest(e) => ServiceError::Unavailable(e.to_string()),
            SolrRpcError::Json(e) => ServiceError::InvalidResponse(e.to_string()),
            SolrRpcError::Status(status, body) => ServiceError::Status(status.as_u16(), body),
            SolrRpcError::InvalidResponse(e) => ServiceError::InvalidResponse(e.to_string()),
        }
    }
}

use SolrRpcError::InvalidResponse;

/// Client of the `select` handler of a Solr core.
pub struct SolrClient {
    client: Client,
    url: String,
}

impl SolrClient {
    pub fn new(url: &str, timeout: Duration) -> Result<SolrClient, SolrRpcError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(SolrClient {
            client,
            url: url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn select(&self, request: &SearchRequest) -> Result<SearchResults, SolrRpcError> {
        info!("Submitting {:?} to Solr", request.query);
        let rep = self.client
            .get(format!("{}/select", self.url))
            .query(&select_params(request))
            .send().await?;
        let status = rep.status();
        let rep = rep.text().await?;
        if !status.is_success() {
            return Err(SolrRpcError::Status(status, rep));
        }
        parse_select_response(&rep)
    }
}

fn select_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", request.query.clone()),
        ("wt", String::from("json")),
        ("df", String::from("default_search")),
    ];
    if let Some(start) = request.start {
        params.push(("start", start.to_string()));
    }
    if let Some(rows) = request.rows {
        params.push(("rows", rows.to_string()));
    }
    if let Some(sort) = &request.sort {
        params.push(("sort", sort.clone()));
    }
    params
}

pub fn parse_select_response(rep: &str) -> Result<SearchResults, SolrRpcError> {
    let data = serde_json::from_str::<serde_json::Value>(rep)?;
    let response = data
        .get("response").ok_or(InvalidResponse("response expected on data"))?;
    let hits = response
        .get("numFound").ok_or(InvalidResponse("numFound expected on response"))?
        .as_u64().ok_or(InvalidResponse("numFound expected to be a number"))?;
    let docs = response
        .get("docs").ok_or(InvalidResponse("docs expected on response"))?
        .as_array().ok_or(InvalidResponse("docs expected to be an array"))?;

    let docs = docs
        .iter()
        .map(|doc| doc.as_object().cloned().ok_or(InvalidResponse("doc expected to be an object")))
        .collect::<Result<Vec<Document>, _>>()?;
    trace!("Solr found {hits} results, {} returned", docs.len());

    Ok(SearchResults { docs, hits })
}

#[async_trait]
impl SearchService for SolrClient {
    async fn query(&self, request: SearchRequest) -> Result<SearchResults, ServiceError> {
        match self.select(&request).await {
            Ok(results) => Ok(results),
            Err(e) => {
                warn!("Solr query {:?} failed: {e}", request.query);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params() {
        let request = SearchRequest {
            sort: Some(String::from("incipit asc")),
            ..SearchRequest::new("type:chant AND (Deus)").with_start(20).with_rows(10)
        };
        assert_eq!(select_params(&request), vec![
            ("q", String::from("type:chant AND (Deus)")),
            ("wt", String::from("json")),
            ("df", String::from("default_search")),
            ("start", String::from("20")),
            ("rows", String::from("10")),
            ("sort", String::from("incipit asc")),
        ]);
        assert_eq!(select_params(&SearchRequest::new("*")).len(), 3);
    }

    #[test]
    fn select_response() {
        let rep = r#"{
            "responseHeader": {"status": 0, "QTime": 1},
            "response": {"numFound": 42, "start": 0, "docs": [
                {"id": "162", "type": "genre", "name": "A"},
                {"id": 163, "type": "genre"}
            ]}
        }"#;
        let results = parse_select_response(rep).unwrap();
        assert_eq!(results.hits, 42);
        assert_eq!(results.ids().unwrap(), vec!["162", "163"]);
        assert_eq!(results.docs[0].get("name"), Some(&serde_json::json!("A")));
    }

    #[test]
    fn invalid_responses() {
        assert!(matches!(parse_select_response("not json"), Err(SolrRpcError::Json(_))));
        assert!(matches!(parse_select_response("{}"), Err(InvalidResponse("response expected on data"))));
        assert!(matches!(
            parse_select_response(r#"{"response": {"numFound": 1, "docs": [3]}}"#),
            Err(InvalidResponse("doc expected to be an object"))
        ));

        let e: ServiceError = SolrRpcError::Status(StatusCode::BAD_REQUEST, String::from("undefined field")).into();
        assert_eq!(e, ServiceError::Status(400, String::from("undefined field")));
    }
}
