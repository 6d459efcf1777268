#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::{sync::Arc, time::Duration};

use connector_integration::{
    access_token::SECUREPAY_PAYPAL_CLIENT_KEY, connectors::SecurePayPaypal,
};
use domain_types::{
    connector_flow::CreateAccessToken,
    connector_types::{AccessTokenRequestData, AccessTokenResponseData, PaymentFlowData},
};
use external_services::oauth2::OAuth2ClientCredentials;
use interfaces::{
    api::ConnectorCommon,
    connector_integration_v2::{BoxedConnectorIntegrationV2, ConnectorIntegrationAnyV2},
    connector_types::AccessTokenProvider,
};
use serde_json::json;
use tokio::task::JoinSet;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

mod common;

const CALLERS: usize = 8;

fn token_client(server_uri: &str) -> Arc<OAuth2ClientCredentials> {
    let config = common::test_config(server_uri, true);
    let integration: BoxedConnectorIntegrationV2<
        'static,
        CreateAccessToken,
        PaymentFlowData,
        AccessTokenRequestData,
        AccessTokenResponseData,
    > = SecurePayPaypal::new().get_connector_integration_v2();
    Arc::new(OAuth2ClientCredentials::new(
        integration,
        SecurePayPaypal::new().id(),
        config.proxy.clone(),
        config.gateway.mode,
        config.connectors.clone(),
        config.gateway.paypal_auth().unwrap(),
    ))
}

/// Token endpoint that answers slowly so that concurrent callers overlap.
async fn mount_slow_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(200))
                .set_body_json(json!({
                    "access_token": "tok_1",
                    "token_type": "Bearer",
                    "expires_in": 3600
                })),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn fetch_concurrently(client: &Arc<OAuth2ClientCredentials>) {
    let mut callers = JoinSet::new();
    for _ in 0..CALLERS {
        let client = Arc::clone(client);
        callers.spawn(async move { client.get_access_token(SECUREPAY_PAYPAL_CLIENT_KEY).await });
    }

    let mut answered = 0;
    while let Some(joined) = callers.join_next().await {
        let token = joined.unwrap().unwrap();
        assert_eq!(token.bearer_header_value(), "Bearer tok_1");
        answered += 1;
    }
    assert_eq!(answered, CALLERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_token_fetch() {
    let server = MockServer::start().await;
    mount_slow_token(&server, 1).await;

    let client = token_client(&server.uri());
    fetch_concurrently(&client).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_after_clear_fetches_once_more() {
    let server = MockServer::start().await;
    mount_slow_token(&server, 2).await;

    let client = token_client(&server.uri());
    fetch_concurrently(&client).await;

    client.clear_access_token(SECUREPAY_PAYPAL_CLIENT_KEY).await;
    fetch_concurrently(&client).await;
}
