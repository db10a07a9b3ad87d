use std::time::Duration;

use ureq::Agent;

use crate::{
    db::{PeriodRecord, Storage},
    prelude::*,
};

/// PostgREST-compatible table, for example a hosted Supabase project.
pub struct RestStorage {
    client: Agent,
    table_url: String,
    api_key: String,
}

impl RestStorage {
    pub fn new(base_url: &str, table: &str, api_key: String) -> Self {
        let client =
            Agent::config_builder().timeout_global(Some(Duration::from_secs(10))).build().into();
        Self { client, table_url: Self::table_url(base_url, table), api_key }
    }

    fn table_url(base_url: &str, table: &str) -> String {
        format!("{}/rest/v1/{table}", base_url.trim_end_matches('/'))
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

impl Storage for RestStorage {
    #[instrument(skip_all, fields(url = %self.table_url))]
    fn load(&self) -> Result<Vec<PeriodRecord>> {
        info!("fetching the periods…");
        let periods = self
            .client
            .get(&self.table_url)
            .query("select", "*")
            .header("apikey", &self.api_key)
            .header("Authorization", self.authorization())
            .call()
            .with_context(|| format!("failed to fetch `{}`", self.table_url))?
            .body_mut()
            .read_json::<Vec<PeriodRecord>>()
            .context("failed to deserialize the periods")?;
        info!(n_periods = periods.len(), "fetched");
        Ok(periods)
    }

    #[instrument(skip_all, fields(url = %self.table_url, period = %record.key()))]
    fn save(&self, record: &PeriodRecord) -> Result {
        info!("upserting the period…");
        self.client
            .post(&self.table_url)
            .query("on_conflict", "month,year")
            .header("apikey", &self.api_key)
            .header("Authorization", self.authorization())
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .send_json(record)
            .with_context(|| format!("failed to upsert `{}`", record.key()))?;
        Ok(())
    }
}
