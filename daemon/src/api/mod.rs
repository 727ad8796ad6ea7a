use crate::prelude::*;
use warp::{
    Filter,
    http::{Method, HeaderMap, StatusCode, header::{ALLOW, CONTENT_TYPE, HeaderName, HeaderValue}},
    hyper::body::Bytes,
    path::FullPath,
    reply::Response,
};
use std::convert::Infallible;

mod bodies;
mod search;
use {
    bodies::*,
    search::*,
};
pub use bodies::Paging;

const TOTAL_RESULTS: HeaderName = HeaderName::from_static("x-cantus-total-results");
const PAGE: HeaderName = HeaderName::from_static("x-cantus-page");
const PER_PAGE: HeaderName = HeaderName::from_static("x-cantus-per-page");

/// Largest SEARCH body accepted, in bytes.
const MAX_BODY_SIZE: u64 = 64 * 1024;

/// Value of the `Allow` header on browse URLs.
const ALLOWED_METHODS: &str = "OPTIONS, SEARCH";

/// Everything request handlers share.
pub struct ApiState {
    pub schema: Arc<Schema>,
    pub service: Arc<dyn SearchService>,
    pub paging: Paging,
}

/// An error response, rendered as `<code>: <reason>`.
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    reason: String,
    per_page: Option<u64>,
}

impl ApiError {
    fn new(status: StatusCode, reason: impl Into<String>) -> ApiError {
        ApiError {
            status,
            reason: reason.into(),
            per_page: None,
        }
    }

    fn with_per_page(mut self, per_page: u64) -> ApiError {
        self.per_page = Some(per_page);
        self
    }

    fn into_response(self) -> Response {
        let mut resp = Response::new(format!("{}: {}", self.status.as_u16(), self.reason).into());
        *resp.status_mut() = self.status;
        if self.status == StatusCode::METHOD_NOT_ALLOWED {
            resp.headers_mut().insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }
        if let Some(per_page) = self.per_page {
            resp.headers_mut().insert(PER_PAGE, HeaderValue::from(per_page));
        }
        resp
    }
}

fn json_response(json: String) -> Response {
    let mut resp = Response::new(json.into());
    resp.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}

fn root() -> Response {
    let mut browse = serde_json::Map::new();
    for resource in RESOURCES {
        browse.insert(resource.plural.to_string(), resource.url().into());
    }
    browse.insert(String::from("all"), BROWSE_ALL.url().into());
    json_response(serde_json::json!({"resources": {"browse": browse}}).to_string())
}

/// The request body, capped at [`MAX_BODY_SIZE`].
/// A request without `Content-Length` is handled as having no body.
fn body() -> impl Filter<Extract = (Bytes,), Error = warp::Rejection> + Clone {
    let without_length = warp::header::optional::<u64>("content-length").and_then(|length: Option<u64>| async move {
        match length {
            None => Ok(Bytes::new()),
            Some(_) => Err(warp::reject::not_found()),
        }
    });

    warp::body::content_length_limit(MAX_BODY_SIZE)
        .and(warp::body::bytes())
        .or(without_length)
        .unify()
}

pub fn routes(state: Arc<ApiState>) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    let root = warp::get()
        .and(warp::path::end())
        .map(root);

    let search = warp::method()
        .and(warp::path::full())
        .and(warp::header::headers_cloned())
        .and(body())
        .map(move |method: Method, path: FullPath, headers: HeaderMap, body: Bytes| {
            (SearchCall { method, path: path.as_str().to_string(), headers, body }, Arc::clone(&state))
        })
        .and_then(search);

    root.or(search).unify()
}

pub async fn serve_api(api_addr: SocketAddr, state: Arc<ApiState>, allowed_origins: &[String]) {
    let mut cors = warp::cors()
        .allow_headers(vec!["content-type", "x-cantus-page", "x-cantus-per-page"])
        .allow_methods(vec!["GET", "OPTIONS", "SEARCH"])
        .expose_headers(vec!["x-cantus-total-results", "x-cantus-page", "x-cantus-per-page"]);
    if allowed_origins.is_empty() {
        cors = cors.allow_any_origin();
    }
    for origin in allowed_origins {
        cors = cors.allow_origin(origin.as_str());
    }

    info!("API listening on {api_addr}");
    warp::serve(routes(state).with(cors)).run(api_addr).await;
}
