use std::collections::HashMap;

use common_enums::GatewayMode;
use common_utils::{date_time, CustomResult};
use domain_types::{
    connector_flow::CreateAccessToken,
    connector_types::{
        AccessToken, AccessTokenRequestData, AccessTokenResponseData, PaymentFlowData,
    },
    errors::ConnectorError,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    types::{Connectors, Proxy},
};
use error_stack::{report, ResultExt};
use interfaces::{
    connector_integration_v2::BoxedConnectorIntegrationV2,
    connector_types::AccessTokenProvider,
};
use tokio::sync::RwLock;

use crate::service::execute_connector_processing_step;

/// Seconds before the advertised expiry at which a token is no longer handed out
pub const DEFAULT_EXPIRY_SKEW_SECONDS: i64 = 30;

const SERVICE_NAME: &str = "oauth2_client_credentials";

type TokenIntegration = BoxedConnectorIntegrationV2<
    'static,
    CreateAccessToken,
    PaymentFlowData,
    AccessTokenRequestData,
    AccessTokenResponseData,
>;

/// OAuth2 client-credentials grant with a token cache shared by every caller.
///
/// The token request itself is built and decoded by the connector; this type
/// only decides when a new one is needed.
pub struct OAuth2ClientCredentials {
    connector: TokenIntegration,
    connector_name: &'static str,
    proxy: Proxy,
    mode: GatewayMode,
    connectors: Connectors,
    auth: ConnectorAuthType,
    skew_seconds: i64,
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl OAuth2ClientCredentials {
    pub fn new(
        connector: TokenIntegration,
        connector_name: &'static str,
        proxy: Proxy,
        mode: GatewayMode,
        connectors: Connectors,
        auth: ConnectorAuthType,
    ) -> Self {
        Self {
            connector,
            connector_name,
            proxy,
            mode,
            connectors,
            auth,
            skew_seconds: DEFAULT_EXPIRY_SKEW_SECONDS,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_skew_seconds(mut self, skew_seconds: i64) -> Self {
        self.skew_seconds = skew_seconds;
        self
    }

    fn valid_token(&self, token: Option<&AccessToken>) -> Option<AccessToken> {
        token
            .filter(|token| !token.is_expired_at(date_time::now_unix_timestamp(), self.skew_seconds))
            .cloned()
    }

    async fn fetch_token(&self) -> CustomResult<AccessToken, ConnectorError> {
        let issued_at = date_time::now_unix_timestamp();
        let router_data = RouterDataV2::new(
            PaymentFlowData::new(SERVICE_NAME, self.mode, self.connectors.clone()),
            self.auth.clone(),
            AccessTokenRequestData::default(),
        );
        let router_data = execute_connector_processing_step(
            &self.proxy,
            self.connector.clone(),
            router_data,
            self.connector_name,
            SERVICE_NAME,
        )
        .await
        .change_context(ConnectorError::OAuthFailure)?;

        match router_data.response {
            Ok(response) => Ok(AccessToken::from_response(response, issued_at)),
            Err(error) => {
                tracing::error!(
                    code = %error.code,
                    message = %error.message,
                    "token endpoint rejected the client credentials"
                );
                Err(report!(ConnectorError::OAuthFailure)).attach_printable(format!(
                    "token endpoint replied with status {}",
                    error.status_code
                ))
            }
        }
    }
}

#[async_trait::async_trait]
impl AccessTokenProvider for OAuth2ClientCredentials {
    async fn get_access_token(
        &self,
        client_key: &str,
    ) -> CustomResult<AccessToken, ConnectorError> {
        if let Some(token) = self.valid_token(self.tokens.read().await.get(client_key)) {
            return Ok(token);
        }

        let mut tokens = self.tokens.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = self.valid_token(tokens.get(client_key)) {
            return Ok(token);
        }

        tracing::info!(connector = self.connector_name, "fetching a new access token");
        let token = self.fetch_token().await?;
        tokens.insert(client_key.to_string(), token.clone());
        Ok(token)
    }

    async fn clear_access_token(&self, client_key: &str) {
        self.tokens.write().await.remove(client_key);
    }
}
