//! Exchange-bindings sub-client.

use crate::client::QuantflowClient;
use crate::domain::exchange_binding::wire::CreateBindingRequest;
use crate::domain::exchange_binding::ExchangeBinding;
use crate::error::SdkError;
use crate::shared::BindingId;

/// Sub-client for exchange-binding operations.
pub struct ExchangeBindings<'a> {
    pub(crate) client: &'a QuantflowClient,
}

impl<'a> ExchangeBindings<'a> {
    pub async fn list(&self) -> Result<Vec<ExchangeBinding>, SdkError> {
        let wires = self.client.http.list_exchange_bindings().await?;
        Ok(wires.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: &BindingId) -> Result<ExchangeBinding, SdkError> {
        let wire = self.client.http.get_exchange_binding(id.as_str()).await?;
        Ok(wire.into())
    }

    pub async fn create(&self, request: &CreateBindingRequest) -> Result<ExchangeBinding, SdkError> {
        let wire = self.client.http.create_exchange_binding(request).await?;
        Ok(wire.into())
    }

    pub async fn delete(&self, id: &BindingId) -> Result<(), SdkError> {
        Ok(self.client.http.delete_exchange_binding(id.as_str()).await?)
    }
}
