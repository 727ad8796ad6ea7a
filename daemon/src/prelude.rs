pub use crate::{
    api::*,
    clap::*,
    resources::*,
    rpc_solr::*,
};

pub use cantus_query::{document_id, Document, QueryError, Schema, SearchRequest, SearchResults, SearchService, ServiceError, Translator};
pub use clap::Parser;
pub use log::{info, warn, error, debug, trace};
pub use serde::{Serialize, Deserialize};
pub use async_trait::async_trait;
pub use std::{
    time::Duration,
    sync::Arc, net::SocketAddr,
};
pub use reqwest::Client;
