use cards::CardDetails;
use common_enums::CaptureMethod;
use common_utils::CustomResult;
use domain_types::{
    connector_flow,
    connector_types::{
        AccessToken, AccessTokenRequestData, AccessTokenResponseData, OrderDetails,
        PaymentFlowData, PaymentMethodDetails, PaymentOutcome, PaymentsAuthorizeData,
        PaymentsResponseData, PaypalExecuteData, PaypalExecuteOutcome, PaypalInitiateData,
        PaypalInitiateResponseData,
    },
    errors::ConnectorError,
    paypal_session::PaypalSession,
};
use serde_json::{Map, Value};

use crate::{api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2};

/// Connectors that take card payments directly
pub trait CardPaymentConnector: ConnectorCommon + PaymentAuthorizeV2 {}

/// Connectors that send the shopper away to a wallet and finish the order on return
pub trait WalletRedirectConnector:
    ConnectorCommon + PaypalInitiateV2 + PaypalExecuteV2 + PaymentAccessToken
{
}

pub trait PaymentAuthorizeV2:
    ConnectorIntegrationV2<
    connector_flow::Authorize,
    PaymentFlowData,
    PaymentsAuthorizeData,
    PaymentsResponseData,
>
{
}

pub trait PaypalInitiateV2:
    ConnectorIntegrationV2<
    connector_flow::PaypalInitiate,
    PaymentFlowData,
    PaypalInitiateData,
    PaypalInitiateResponseData,
>
{
}

pub trait PaypalExecuteV2:
    ConnectorIntegrationV2<
    connector_flow::PaypalExecute,
    PaymentFlowData,
    PaypalExecuteData,
    PaypalExecuteOutcome,
>
{
}

pub trait PaymentAccessToken:
    ConnectorIntegrationV2<
    connector_flow::CreateAccessToken,
    PaymentFlowData,
    AccessTokenRequestData,
    AccessTokenResponseData,
>
{
}

/// Source of OAuth2 bearer tokens, shared by concurrent payment attempts
#[async_trait::async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Cached token for `client_key`, fetching a new one when none is held
    /// or the held one has expired.
    async fn get_access_token(&self, client_key: &str)
        -> CustomResult<AccessToken, ConnectorError>;

    /// Forget the token held for `client_key`.
    async fn clear_access_token(&self, client_key: &str);
}

/// Short-lived holding area for card data between checkout steps.
///
/// Entries are keyed by the host's session id and are meant to be removed
/// by `take` as soon as a payment attempt starts.
pub trait PaymentDetailsStore: Send + Sync {
    fn store(&self, session_id: &str, details: CardDetails);

    /// Removes and returns the card details held for the session.
    fn take(&self, session_id: &str) -> Option<CardDetails>;

    fn peek_exists(&self, session_id: &str) -> bool;

    /// Drops the details held for the session, returning whether any existed.
    fn remove(&self, session_id: &str) -> bool;
}

/// Checkout where card details are collected on the merchant's own pages
#[async_trait::async_trait]
pub trait OnsitePaymentGateway: Send + Sync {
    /// Validates the card fields and keeps them for the session's next payment.
    async fn create_payment_method(
        &self,
        session_id: &str,
        details: PaymentMethodDetails,
    ) -> CustomResult<(), ConnectorError>;

    /// Charges (or pre-authorises) the card held for the session.
    ///
    /// The card details are gone from the store once this returns, whatever
    /// the outcome.
    async fn create_payment(
        &self,
        session_id: &str,
        order: &OrderDetails,
        capture_method: CaptureMethod,
    ) -> CustomResult<PaymentOutcome, ConnectorError>;

    /// Local cleanup only; the gateway keeps no stored cards to delete.
    async fn delete_payment_method(&self, session_id: &str) -> CustomResult<(), ConnectorError>;
}

/// Checkout where the shopper pays on the wallet provider's pages
#[async_trait::async_trait]
pub trait OffsitePaymentGateway: Send + Sync {
    /// Creates the wallet order and returns the session holding the redirect url.
    async fn initiate_redirect(
        &self,
        order: &OrderDetails,
        extra: Map<String, Value>,
    ) -> CustomResult<PaypalSession, ConnectorError>;

    /// Executes the order once the shopper comes back with a payer id.
    async fn complete_redirect(
        &self,
        session: &mut PaypalSession,
        order: &OrderDetails,
        payer_id: &str,
    ) -> CustomResult<PaymentOutcome, ConnectorError>;
}
