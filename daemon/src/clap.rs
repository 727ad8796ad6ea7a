use crate::prelude::*;

/// Cantus API daemon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Solr core url, without the trailing `/select`
    #[arg(long, default_value = "http://localhost:8983/solr/collection1")]
    pub solr_url: String,

    /// Timeout for requests to Solr (in seconds)
    #[arg(long, default_value = "10")]
    pub solr_timeout: u64,

    /// Address on which the API will listen
    #[arg(long, default_value_t = String::from("127.0.0.1:8888"))]
    pub api_addr: String,

    /// Number of results per page when the request does not say
    #[arg(long, default_value = "10")]
    pub default_per_page: u64,

    /// Highest number of results per page a request may ask for
    #[arg(long, default_value = "100")]
    pub max_per_page: u64,

    /// JSON file with the searchable fields and cross-reference table (defaults to the Cantus schema)
    #[arg(long)]
    pub schema: Option<String>,

    /// Origins allowed to make cross-origin requests
    #[arg(long)]
    pub cors_allow_origin: Vec<String>,
}

impl Args {
    pub fn paging(&self) -> Paging {
        Paging {
            default_per_page: self.default_per_page,
            max_per_page: self.max_per_page,
        }
    }

    pub fn load_schema(&self) -> Result<Schema, String> {
        let Some(path) = &self.schema else {
            return Ok(Schema::cantus());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("Could not read schema {path}: {e}"))?;
        Schema::from_json(&json).map_err(|e| format!("Invalid schema {path}: {e}"))
    }
}
