use super::*;

const NO_SEARCH_RESULTS: &str = "SEARCH query returned no results";
const INVALID_SEARCH_QUERY: &str = "SEARCH query is malformed";
const TOO_LARGE_PAGE: &str = "\"X-Cantus-Page\" is too high (there are not that many pages)";
const SOLR_502_ERROR: &str = "Bad Gateway (Problem with Solr Server)";
pub(super) const RESOURCE_MISSING_ID: &str = "Solr returned a resource without an \"id\" field.";
pub(super) const RESOURCE_MISSING_TYPE: &str = "Solr returned a resource without a \"type\" field.";

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Syntax(_) | QueryError::MalformedSubquery(_) => ApiError::new(StatusCode::BAD_REQUEST, INVALID_SEARCH_QUERY),
            QueryError::UnknownField(_) => ApiError::new(StatusCode::BAD_REQUEST, e.to_string()),
            QueryError::NoResults { .. } => ApiError::new(StatusCode::NOT_FOUND, NO_SEARCH_RESULTS),
            QueryError::Service(_) => ApiError::new(StatusCode::BAD_GATEWAY, SOLR_502_ERROR),
        }
    }
}

/// The browse resource a path designates. View URLs have no SEARCH counterpart.
fn resource_of(path: &str) -> Result<Resource, ApiError> {
    let plural = path.trim_matches('/');
    if plural.contains('/') {
        return Err(ApiError::new(StatusCode::NOT_FOUND, format!("Cannot SEARCH {path}")));
    }
    Resource::from_plural(plural).ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("No resource at {path}")))
}

pub(super) async fn search((call, state): (SearchCall, Arc<ApiState>)) -> Result<Response, Infallible> {
    let (method, path) = (call.method.clone(), call.path.clone());
    match run_search(call, &state).await {
        Ok(resp) => Ok(resp),
        Err(e) => {
            if e.status.is_server_error() {
                error!("{method} {path} failed with {}: {}", e.status, e.reason);
            } else {
                warn!("{method} {path} failed with {}: {}", e.status, e.reason);
            }
            Ok(e.into_response())
        }
    }
}

async fn run_search(call: SearchCall, state: &ApiState) -> Result<Response, ApiError> {
    let resource = resource_of(&call.path)?;
    match call.method.as_str() {
        "SEARCH" => (),
        "OPTIONS" => {
            let mut resp = Response::new(String::new().into());
            resp.headers_mut().insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
            return Ok(resp);
        }
        _ => return Err(ApiError::new(StatusCode::METHOD_NOT_ALLOWED, format!("{} is not allowed here", call.method))),
    }

    let body = SearchBody::from_bytes(&call.body)?;
    let page = state.paging.page(
        body.page.clone().or_else(|| PageValue::from_header(&call.headers, &PAGE)),
        body.per_page.clone().or_else(|| PageValue::from_header(&call.headers, &PER_PAGE)),
    )?;

    let translator = Translator::new(&state.schema, &*state.service);
    let query = translator.translate(resource.type_name, &body.query).await?;
    let request = SearchRequest::new(query).with_start(page.start()).with_rows(page.per_page);
    let results = state.service.query(request).await.map_err(QueryError::from)?;

    if results.docs.is_empty() {
        // Matches exist but not on this page
        if results.hits > 0 {
            return Err(ApiError::new(StatusCode::CONFLICT, TOO_LARGE_PAGE));
        }
        return Err(ApiError::new(StatusCode::NOT_FOUND, NO_SEARCH_RESULTS));
    }

    let mut records = serde_json::Map::new();
    let mut sort_order = Vec::with_capacity(results.docs.len());
    for doc in results.docs {
        let id = document_id(&doc).map_err(|_| ApiError::new(StatusCode::BAD_GATEWAY, RESOURCE_MISSING_ID))?;
        if !doc.contains_key("type") {
            return Err(ApiError::new(StatusCode::BAD_GATEWAY, RESOURCE_MISSING_TYPE));
        }
        sort_order.push(serde_json::Value::String(id.clone()));
        records.insert(id, serde_json::Value::Object(doc));
    }
    records.insert(String::from("sort_order"), serde_json::Value::Array(sort_order));

    let mut resp = json_response(serde_json::Value::Object(records).to_string());
    let headers = resp.headers_mut();
    headers.insert(TOTAL_RESULTS, HeaderValue::from(results.hits));
    headers.insert(PAGE, HeaderValue::from(page.page));
    headers.insert(PER_PAGE, HeaderValue::from(page.per_page));
    Ok(resp)
}
