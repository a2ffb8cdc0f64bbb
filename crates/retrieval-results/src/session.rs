use retrieval_core::config::{Config, Settings};
use retrieval_core::error::{Error, Result};
use retrieval_core::query::Query;
use retrieval_core::traits::{EntityLoader, Transport};
use retrieval_decode::FieldCodec;
use std::sync::Arc;

use crate::result_set::ResultSet;

/// Runs queries through a transport and wraps each response in a [`ResultSet`].
pub struct Session<T: Transport, L: EntityLoader> {
    settings: Settings,
    codec: FieldCodec,
    transport: Arc<T>,
    loader: Arc<L>,
}

impl<T: Transport, L: EntityLoader> Session<T, L> {
    pub fn new(settings: Settings, transport: Arc<T>, loader: Arc<L>) -> Self {
        let codec = FieldCodec::from_settings(&settings);
        Self { settings, codec, transport, loader }
    }

    pub fn from_config(config: &Config, transport: Arc<T>, loader: Arc<L>) -> anyhow::Result<Self> {
        Ok(Self::new(config.settings()?, transport, loader))
    }

    pub fn settings(&self) -> &Settings { &self.settings }

    pub fn codec(&self) -> &FieldCodec { &self.codec }

    pub fn search(&self, query: &Query) -> Result<ResultSet<L>> {
        let raw = self.transport.execute(query).map_err(|e| Error::Transport(format!("{:#}", e)))?;
        ResultSet::new(&raw, query, &self.settings, &self.codec, Arc::clone(&self.loader))
    }
}
