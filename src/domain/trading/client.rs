//! Tradings sub-client — CRUD and lifecycle operations.

use crate::client::QuantflowClient;
use crate::domain::trading::wire::{CreateTradingRequest, UpdateTradingRequest};
use crate::domain::trading::{self, Trading};
use crate::error::SdkError;
use crate::shared::TradingId;

/// Sub-client for trading operations.
pub struct Tradings<'a> {
    pub(crate) client: &'a QuantflowClient,
}

impl<'a> Tradings<'a> {
    pub async fn list(&self) -> Result<Vec<Trading>, SdkError> {
        let wires = self.client.http.list_tradings().await?;
        wires
            .into_iter()
            .map(|w| {
                w.try_into()
                    .map_err(|e: trading::ValidationError| SdkError::Validation(e.to_string()))
            })
            .collect()
    }

    pub async fn get(&self, id: &TradingId) -> Result<Trading, SdkError> {
        let wire = self.client.http.get_trading(id.as_str()).await?;
        wire.try_into()
            .map_err(|e: trading::ValidationError| SdkError::Validation(e.to_string()))
    }

    pub async fn create(&self, request: &CreateTradingRequest) -> Result<Trading, SdkError> {
        let wire = self.client.http.create_trading(request).await?;
        wire.try_into()
            .map_err(|e: trading::ValidationError| SdkError::Validation(e.to_string()))
    }

    pub async fn update(
        &self,
        id: &TradingId,
        request: &UpdateTradingRequest,
    ) -> Result<Trading, SdkError> {
        let wire = self.client.http.update_trading(id.as_str(), request).await?;
        wire.try_into()
            .map_err(|e: trading::ValidationError| SdkError::Validation(e.to_string()))
    }

    pub async fn delete(&self, id: &TradingId) -> Result<(), SdkError> {
        Ok(self.client.http.delete_trading(id.as_str()).await?)
    }

    /// Ask the backend to start the trading's bot.
    pub async fn start(&self, id: &TradingId) -> Result<Trading, SdkError> {
        let wire = self.client.http.start_trading(id.as_str()).await?;
        wire.try_into()
            .map_err(|e: trading::ValidationError| SdkError::Validation(e.to_string()))
    }

    /// Ask the backend to stop the trading's bot.
    pub async fn stop(&self, id: &TradingId) -> Result<Trading, SdkError> {
        let wire = self.client.http.stop_trading(id.as_str()).await?;
        wire.try_into()
            .map_err(|e: trading::ValidationError| SdkError::Validation(e.to_string()))
    }
}
