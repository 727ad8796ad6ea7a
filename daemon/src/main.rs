mod api;
mod clap;
mod prelude;
mod resources;
mod rpc_solr;

use crate::prelude::*;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Args::parse();

    let schema = match config.load_schema() {
        Ok(schema) => schema,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    let solr = match SolrClient::new(&config.solr_url, Duration::from_secs(config.solr_timeout)) {
        Ok(solr) => solr,
        Err(e) => {
            error!("Could not build the Solr client: {e}");
            std::process::exit(1);
        }
    };
    let api_addr = match config.api_addr.parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid api address {}: {e}", config.api_addr);
            std::process::exit(1);
        }
    };

    info!("Searching {} with {} searchable fields", config.solr_url, schema.fields.len());
    let state = Arc::new(ApiState {
        schema: Arc::new(schema),
        service: Arc::new(solr),
        paging: config.paging(),
    });
    serve_api(api_addr, state, &config.cors_allow_origin).await;
}
