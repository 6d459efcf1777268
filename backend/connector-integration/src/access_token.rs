use common_utils::{date_time, CustomResult};
use domain_types::{
    connector_types::{AccessTokenResponseData, PaymentFlowData},
    errors::ConnectorError,
};
use interfaces::connector_types::AccessTokenProvider;

/// Client key the PayPal wallet token is cached under
pub const SECUREPAY_PAYPAL_CLIENT_KEY: &str = "securepay";

pub struct AccessTokenManager;

impl AccessTokenManager {
    pub fn should_refresh_token(access_token: &Option<AccessTokenResponseData>) -> bool {
        access_token.is_none()
    }

    /// Puts a bearer token on the flow data unless it already carries one.
    ///
    /// A token that has expired by the time the provider hands it over is
    /// dropped from the provider and fetched once more.
    pub async fn ensure_access_token(
        provider: &dyn AccessTokenProvider,
        client_key: &str,
        payment_flow_data: PaymentFlowData,
    ) -> CustomResult<PaymentFlowData, ConnectorError> {
        if !Self::should_refresh_token(&payment_flow_data.access_token) {
            return Ok(payment_flow_data);
        }

        let mut token = provider.get_access_token(client_key).await?;
        if token.is_expired_at(date_time::now_unix_timestamp(), 0) {
            tracing::info!(client_key, "access token expired, requesting a new one");
            provider.clear_access_token(client_key).await;
            token = provider.get_access_token(client_key).await?;
        }

        Ok(payment_flow_data.set_access_token(Some(AccessTokenResponseData::from(&token))))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use common_enums::GatewayMode;
    use common_utils::Secret;
    use domain_types::{connector_types::AccessToken, types::Connectors};
    use hyperswitch_masking::PeekInterface;

    use super::*;

    /// Hands out the queued tokens in order and records every call.
    struct QueuedTokens {
        tokens: Mutex<Vec<AccessToken>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl QueuedTokens {
        fn new(mut tokens: Vec<AccessToken>) -> Self {
            tokens.reverse();
            Self {
                tokens: Mutex::new(tokens),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl AccessTokenProvider for QueuedTokens {
        async fn get_access_token(
            &self,
            _client_key: &str,
        ) -> CustomResult<AccessToken, ConnectorError> {
            self.calls.lock().unwrap().push("get");
            self.tokens
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| error_stack::report!(ConnectorError::OAuthFailure))
        }

        async fn clear_access_token(&self, _client_key: &str) {
            self.calls.lock().unwrap().push("clear");
        }
    }

    fn token(value: &str, expires_at: i64) -> AccessToken {
        AccessToken {
            token: Secret::new(value.to_string()),
            expires_at,
        }
    }

    fn flow_data() -> PaymentFlowData {
        PaymentFlowData::new("ORDER-1", GatewayMode::Test, Connectors::default())
    }

    #[tokio::test]
    async fn test_valid_token_is_attached() {
        let provider = QueuedTokens::new(vec![token(
            "fresh",
            date_time::now_unix_timestamp() + 600,
        )]);
        let data = AccessTokenManager::ensure_access_token(
            &provider,
            SECUREPAY_PAYPAL_CLIENT_KEY,
            flow_data(),
        )
        .await
        .unwrap();
        assert_eq!(data.get_access_token().unwrap().peek(), "fresh");
        assert_eq!(*provider.calls.lock().unwrap(), vec!["get"]);
    }

    #[tokio::test]
    async fn test_expired_token_is_cleared_and_refetched() {
        let now = date_time::now_unix_timestamp();
        let provider = QueuedTokens::new(vec![token("stale", now - 1), token("renewed", now + 600)]);
        let data = AccessTokenManager::ensure_access_token(
            &provider,
            SECUREPAY_PAYPAL_CLIENT_KEY,
            flow_data(),
        )
        .await
        .unwrap();
        assert_eq!(data.get_access_token().unwrap().peek(), "renewed");
        assert_eq!(*provider.calls.lock().unwrap(), vec!["get", "clear", "get"]);
    }

    #[tokio::test]
    async fn test_provider_failure_is_oauth_failure() {
        let provider = QueuedTokens::new(Vec::new());
        let error = AccessTokenManager::ensure_access_token(
            &provider,
            SECUREPAY_PAYPAL_CLIENT_KEY,
            flow_data(),
        )
        .await
        .unwrap_err();
        assert_eq!(error.current_context(), &ConnectorError::OAuthFailure);
    }
}
