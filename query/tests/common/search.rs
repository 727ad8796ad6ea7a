use super::*;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory search service answering a fixed set of queries.
///
/// Unknown queries match nothing. Every request is recorded so tests can check which sub-queries
/// were issued.
#[derive(Default)]
pub struct FakeSearch {
    answers: HashMap<String, Vec<Document>>,
    failing: bool,
    requests: Mutex<Vec<SearchRequest>>,
}

impl FakeSearch {
    pub fn new() -> FakeSearch {
        FakeSearch::default()
    }

    /// A service that fails every request.
    pub fn unavailable() -> FakeSearch {
        FakeSearch { failing: true, ..Default::default() }
    }

    /// Answer `query` with records having the given ids, in that order.
    pub fn answer(mut self, query: &str, ids: &[&str]) -> FakeSearch {
        self.answers.insert(query.to_string(), ids.iter().map(|id| doc(id)).collect());
        self
    }

    /// Answer `query` with the given records as is.
    pub fn answer_docs(mut self, query: &str, docs: Vec<Document>) -> FakeSearch {
        self.answers.insert(query.to_string(), docs);
        self
    }

    pub async fn queries(&self) -> Vec<String> {
        self.requests.lock().await.iter().map(|r| r.query.clone()).collect()
    }
}

pub fn doc(id: &str) -> Document {
    match json!({"id": id, "type": "test"}) {
        serde_json::Value::Object(doc) => doc,
        _ => unreachable!(),
    }
}

#[async_trait]
impl SearchService for FakeSearch {
    async fn query(&self, request: SearchRequest) -> Result<SearchResults, ServiceError> {
        debug!("Fake search for {:?}", request.query);
        self.requests.lock().await.push(request.clone());
        if self.failing {
            return Err(ServiceError::Unavailable(String::from("connection refused")));
        }
        let docs = self.answers.get(&request.query).cloned().unwrap_or_default();
        Ok(SearchResults { hits: docs.len() as u64, docs })
    }
}
