use std::sync::Arc;

use cards::CardDetails;
use common_enums::CaptureMethod;
use common_utils::{consts, request::Request, CustomResult};
use connector_integration::{
    access_token::{AccessTokenManager, SECUREPAY_PAYPAL_CLIENT_KEY},
    connectors::{SecurePay, SecurePayPaypal},
    utils::connector_error_from_response,
};
use domain_types::{
    connector_flow::{Authorize, CreateAccessToken, PaypalExecute, PaypalInitiate},
    connector_types::{
        AccessTokenRequestData, AccessTokenResponseData, OrderDetails, PaymentFlowData,
        PaymentMethodDetails, PaymentOutcome, PaymentsAuthorizeData, PaymentsResponseData,
        PaypalExecuteData, PaypalExecuteOutcome, PaypalInitiateData, PaypalInitiateResponseData,
    },
    errors::ConnectorError,
    paypal_session::PaypalSession,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_response_types::Response,
};
use error_stack::{report, ResultExt};
use external_services::{
    oauth2::OAuth2ClientCredentials, service::execute_connector_processing_step,
    session::InMemoryPaymentDetailsStore,
};
use hyperswitch_masking::PeekInterface;
use interfaces::{
    api::ConnectorCommon,
    connector_integration_v2::{
        BoxedConnectorIntegrationV2, ConnectorIntegrationAnyV2, ConnectorIntegrationV2,
    },
    connector_types::{
        AccessTokenProvider, OffsitePaymentGateway, OnsitePaymentGateway, PaymentDetailsStore,
    },
};
use serde_json::{Map, Value};

use crate::{configs::Config, logger};

const CARD_PAYMENT_SERVICE: &str = "securepay_payment";
const PAYPAL_INITIATE_SERVICE: &str = "securepay_paypal_initiate";
const PAYPAL_EXECUTE_SERVICE: &str = "securepay_paypal_execute";

type AuthorizeRouterData =
    RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>;

/// Host-facing SecurePay adapter.
///
/// Holds the immutable configuration, the transient card store and the
/// shared OAuth2 token cache; every payment attempt is otherwise
/// request-scoped.
pub struct GatewayApp {
    config: Arc<Config>,
    card_store: Arc<dyn PaymentDetailsStore>,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
}

impl GatewayApp {
    pub fn new(config: Config) -> Self {
        let token_provider = config.gateway.paypal_auth().map(|auth| {
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
                auth,
            )) as Arc<dyn AccessTokenProvider>
        });

        Self {
            config: Arc::new(config),
            card_store: Arc::new(InMemoryPaymentDetailsStore::new()),
            token_provider,
        }
    }

    pub fn with_card_store(mut self, card_store: Arc<dyn PaymentDetailsStore>) -> Self {
        self.card_store = card_store;
        self
    }

    pub fn with_token_provider(mut self, token_provider: Arc<dyn AccessTokenProvider>) -> Self {
        self.token_provider = Some(token_provider);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn card_store(&self) -> &Arc<dyn PaymentDetailsStore> {
        &self.card_store
    }

    fn flow_data(&self, order: &OrderDetails) -> PaymentFlowData {
        PaymentFlowData::new(
            order.order_reference.clone(),
            self.config.gateway.mode,
            self.config.connectors.clone(),
        )
        .with_client_ip(order.client_ip.clone())
    }

    fn message_id(&self) -> String {
        let bounds = self.config.gateway.message_id;
        common_utils::generate_message_id(
            bounds.min_length,
            bounds.max_length,
            &consts::MESSAGE_ID_ALPHABET,
        )
    }

    fn authorize_router_data(
        &self,
        order: &OrderDetails,
        card: Option<CardDetails>,
        capture_method: CaptureMethod,
    ) -> AuthorizeRouterData {
        RouterDataV2::new(
            self.flow_data(order),
            self.config.gateway.card_auth(),
            PaymentsAuthorizeData {
                amount: order.amount,
                currency: order.currency,
                capture_method,
                card,
                message_id: Some(self.message_id()),
            },
        )
    }

    /// Builds the XML payment request for one attempt, consuming the card.
    pub fn build_request(
        &self,
        order: &OrderDetails,
        card: CardDetails,
        capture_method: CaptureMethod,
    ) -> CustomResult<Request, ConnectorError> {
        order.validate_amount()?;
        SecurePay::new()
            .build_request_v2(&self.authorize_router_data(order, Some(card), capture_method))?
            .ok_or(report!(ConnectorError::RequestEncodingFailed))
    }

    /// POSTs a built request once and hands back the raw reply, whatever its status.
    pub async fn submit(&self, request: Request) -> CustomResult<Response, ConnectorError> {
        let url = request.url.clone();
        match external_services::service::call_connector_api(
            &self.config.proxy,
            request,
            CARD_PAYMENT_SERVICE,
        )
        .await
        {
            Ok(Ok(response)) | Ok(Err(response)) => Ok(response),
            Err(error) => Err(error
                .change_context(ConnectorError::GatewayUnreachable)
                .attach_printable(format!("request to {url} was not answered"))),
        }
    }

    /// Maps a raw XML API reply onto the outcome the host records.
    pub fn interpret_response(
        &self,
        order: &OrderDetails,
        capture_method: CaptureMethod,
        response: Response,
    ) -> CustomResult<PaymentOutcome, ConnectorError> {
        let connector = SecurePay::new();
        let router_data = self.authorize_router_data(order, None, capture_method);
        let router_data = if response.is_success() {
            connector.handle_response_v2(router_data, response)?
        } else {
            connector.handle_error_response_v2(router_data, response)?
        };
        card_payment_outcome(router_data)
    }

    async fn card_payment(
        &self,
        order: &OrderDetails,
        card: Option<CardDetails>,
        capture_method: CaptureMethod,
    ) -> CustomResult<PaymentOutcome, ConnectorError> {
        order.validate_amount()?;
        let integration: BoxedConnectorIntegrationV2<
            'static,
            Authorize,
            PaymentFlowData,
            PaymentsAuthorizeData,
            PaymentsResponseData,
        > = SecurePay::new().get_connector_integration_v2();
        let router_data = execute_connector_processing_step(
            &self.config.proxy,
            integration,
            self.authorize_router_data(order, card, capture_method),
            SecurePay::new().id(),
            CARD_PAYMENT_SERVICE,
        )
        .await?;
        card_payment_outcome(router_data)
    }

    fn paypal_auth(&self) -> CustomResult<ConnectorAuthType, ConnectorError> {
        self.config
            .gateway
            .paypal_auth()
            .ok_or(report!(ConnectorError::InvalidConnectorConfig {
                config: "gateway.paypal"
            }))
    }

    async fn paypal_flow_data(
        &self,
        order: &OrderDetails,
    ) -> CustomResult<PaymentFlowData, ConnectorError> {
        let provider = self
            .token_provider
            .as_deref()
            .ok_or(report!(ConnectorError::InvalidConnectorConfig {
                config: "gateway.paypal"
            }))?;
        AccessTokenManager::ensure_access_token(
            provider,
            SECUREPAY_PAYPAL_CLIENT_KEY,
            self.flow_data(order),
        )
        .await
    }
}

fn card_payment_outcome(
    router_data: AuthorizeRouterData,
) -> CustomResult<PaymentOutcome, ConnectorError> {
    let status = router_data.resource_common_data.status;
    match router_data.response {
        Ok(response) => {
            let remote_id = response.resource_id.get_connector_transaction_id().ok();
            if remote_id.is_none() {
                logger::warn!("approved payment carried no txnID");
            }
            Ok(PaymentOutcome::new(remote_id, status))
        }
        Err(error) => Err(report!(connector_error_from_response(&error))).attach_printable(
            format!("gateway replied with status {}", error.status_code),
        ),
    }
}

#[async_trait::async_trait]
impl OnsitePaymentGateway for GatewayApp {
    async fn create_payment_method(
        &self,
        session_id: &str,
        details: PaymentMethodDetails,
    ) -> CustomResult<(), ConnectorError> {
        let card = CardDetails::try_from(details)?;
        logger::info!(session_id, card = ?card, "card details held for the session");
        self.card_store.store(session_id, card);
        Ok(())
    }

    #[logger::instrument(skip_all, fields(order_reference = %order.order_reference))]
    async fn create_payment(
        &self,
        session_id: &str,
        order: &OrderDetails,
        capture_method: CaptureMethod,
    ) -> CustomResult<PaymentOutcome, ConnectorError> {
        // Taken before anything can fail so no outcome leaves the card behind.
        let card = self.card_store.take(session_id);
        let outcome = self.card_payment(order, card, capture_method).await;
        match &outcome {
            Ok(outcome) => logger::info!(
                remote_transaction_id = ?outcome.remote_transaction_id,
                new_state = outcome.new_state(),
                "card payment completed"
            ),
            Err(error) => logger::warn!(error = %error.current_context(), "card payment failed"),
        }
        outcome
    }

    async fn delete_payment_method(&self, session_id: &str) -> CustomResult<(), ConnectorError> {
        if self.card_store.remove(session_id) {
            logger::info!(session_id, "held card details discarded");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl OffsitePaymentGateway for GatewayApp {
    #[logger::instrument(skip_all, fields(order_reference = %order.order_reference))]
    async fn initiate_redirect(
        &self,
        order: &OrderDetails,
        extra: Map<String, Value>,
    ) -> CustomResult<PaypalSession, ConnectorError> {
        order.validate_amount()?;
        let auth = self.paypal_auth()?;
        let mut session = PaypalSession::new(
            order.amount,
            order.currency,
            self.config.gateway.merchant_id.peek().clone(),
        );

        let integration: BoxedConnectorIntegrationV2<
            'static,
            PaypalInitiate,
            PaymentFlowData,
            PaypalInitiateData,
            PaypalInitiateResponseData,
        > = SecurePayPaypal::new().get_connector_integration_v2();
        let router_data = RouterDataV2::new(
            self.paypal_flow_data(order).await?,
            auth,
            PaypalInitiateData {
                amount: order.amount,
                currency: order.currency,
                order_id: session.order_id.clone(),
                extra,
            },
        );
        let router_data = execute_connector_processing_step(
            &self.config.proxy,
            integration,
            router_data,
            SecurePayPaypal::new().id(),
            PAYPAL_INITIATE_SERVICE,
        )
        .await?;

        let response = router_data
            .response
            .map_err(|error| report!(connector_error_from_response(&error)))?;
        logger::debug!(raw_response = %response.raw_response, "PayPal order initiated");
        session.mark_initiated(response.payment_url.as_str())?;
        Ok(session)
    }

    #[logger::instrument(skip_all, fields(order_id = %session.order_id))]
    async fn complete_redirect(
        &self,
        session: &mut PaypalSession,
        order: &OrderDetails,
        payer_id: &str,
    ) -> CustomResult<PaymentOutcome, ConnectorError> {
        session.ensure_returnable(payer_id)?;
        let auth = self.paypal_auth()?;
        let flow_data = self.paypal_flow_data(order).await?;
        // Only a session that can actually be executed moves to `Returned`.
        session.mark_returned(payer_id)?;

        let integration: BoxedConnectorIntegrationV2<
            'static,
            PaypalExecute,
            PaymentFlowData,
            PaypalExecuteData,
            PaypalExecuteOutcome,
        > = SecurePayPaypal::new().get_connector_integration_v2();
        let router_data = RouterDataV2::new(
            flow_data,
            auth,
            PaypalExecuteData {
                amount: order.amount,
                order_id: session.order_id.clone(),
                payer_id: payer_id.to_string(),
            },
        );
        let router_data = execute_connector_processing_step(
            &self.config.proxy,
            integration,
            router_data,
            SecurePayPaypal::new().id(),
            PAYPAL_EXECUTE_SERVICE,
        )
        .await?;

        let outcome = router_data
            .response
            .map_err(|error| report!(connector_error_from_response(&error)))?;
        session.mark_executed(outcome.clone())?;

        let status = outcome.attempt_status();
        Ok(match outcome {
            PaypalExecuteOutcome::Paid { remote_id } => PaymentOutcome::new(Some(remote_id), status),
            PaypalExecuteOutcome::NotCompleted { .. } => PaymentOutcome::new(None, status),
        })
    }
}

impl std::fmt::Debug for GatewayApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayApp")
            .field("mode", &self.config.gateway.mode)
            .field("auth", &self.config.gateway.card_auth().get_masked_keys())
            .field("paypal_enabled", &self.token_provider.is_some())
            .finish_non_exhaustive()
    }
}
