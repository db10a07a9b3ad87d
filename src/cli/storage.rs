use std::path::PathBuf;

use clap::Parser;

use crate::{
    db::{Storage, file::FileStorage, rest::RestStorage},
    prelude::*,
};

#[derive(Parser)]
pub struct StorageArgs {
    /// TOML file with the periods, unused when the REST endpoint is set.
    #[clap(long = "store-path", default_value = "bandeira.toml", env = "STORE_PATH")]
    path: PathBuf,

    /// PostgREST base URL. For example: `https://example.supabase.co`.
    #[clap(long = "rest-url", env = "REST_URL")]
    rest_url: Option<String>,

    #[clap(long = "rest-api-key", env = "REST_API_KEY")]
    rest_api_key: Option<String>,

    #[clap(long = "rest-table", default_value = "month_periods", env = "REST_TABLE")]
    rest_table: String,
}

impl StorageArgs {
    pub fn open(self) -> Result<Box<dyn Storage>> {
        match self.rest_url {
            Some(base_url) => {
                let api_key = self.rest_api_key.context("`--rest-api-key` is required")?;
                info!(%base_url, table = %self.rest_table, "using the REST storage");
                Ok(Box::new(RestStorage::new(&base_url, &self.rest_table, api_key)))
            }
            None => {
                debug!(path = %self.path.display(), "using the file storage");
                Ok(Box::new(FileStorage::new(self.path)))
            }
        }
    }
}
