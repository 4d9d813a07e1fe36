//! Bots sub-client.

use crate::client::QuantflowClient;
use crate::domain::bot::Bot;
use crate::error::SdkError;
use crate::shared::TradingId;

/// Sub-client for bot observation.
pub struct Bots<'a> {
    pub(crate) client: &'a QuantflowClient,
}

impl<'a> Bots<'a> {
    /// List bots, optionally scoped to one trading.
    pub async fn list(&self, trading_id: Option<&TradingId>) -> Result<Vec<Bot>, SdkError> {
        let wires = self
            .client
            .http
            .list_bots(trading_id.map(|id| id.as_str()))
            .await?;
        Ok(wires.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Bot, SdkError> {
        let wire = self.client.http.get_bot(id).await?;
        Ok(wire.into())
    }
}
