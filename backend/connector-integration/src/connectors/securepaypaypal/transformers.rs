use base64::Engine;
use common_enums::PaypalPaymentStatus;
use common_utils::MinorUnit;
use domain_types::{
    connector_flow::{CreateAccessToken, PaypalExecute, PaypalInitiate},
    connector_types::{
        AccessTokenRequestData, AccessTokenResponseData, PaymentFlowData, PaypalExecuteData,
        PaypalExecuteOutcome, PaypalInitiateData, PaypalInitiateResponseData,
    },
    errors::ConnectorError,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
};
use error_stack::report;
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{map::Entry, Map, Value};

use crate::types::ResponseRouterData;

type Error = error_stack::Report<ConnectorError>;

pub const BASE64_ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

pub const PAYMENT_TYPE_SALE: &str = "sale";
pub const NO_SHIPPING: &str = "true";


#[derive(Debug, Clone)]
pub struct SecurePayPaypalAuthType {
    pub merchant_id: Secret<String>,
    pub client_id: Secret<String>,
    pub client_secret: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for SecurePayPaypalAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::SecurePayPaypal {
                merchant_id,
                client_id,
                client_secret,
            } => Ok(Self {
                merchant_id: merchant_id.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => Err(report!(ConnectorError::FailedToObtainAuthType)),
        }
    }
}

impl SecurePayPaypalAuthType {
    /// HTTP basic client authentication for the token endpoint
    pub fn basic_auth_value(&self) -> Secret<String> {
        let credentials = format!("{}:{}", self.client_id.peek(), self.client_secret.peek());
        Secret::new(format!("Basic {}", BASE64_ENGINE.encode(credentials)))
    }
}

fn client_ip(data: &PaymentFlowData) -> Result<String, Error> {
    Ok(data.get_client_ip()?.peek().to_string())
}

// ============================================================================
// ACCESS TOKEN
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SecurePayPaypalAccessTokenRequest {
    pub grant_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl From<&AccessTokenRequestData> for SecurePayPaypalAccessTokenRequest {
    fn from(request: &AccessTokenRequestData) -> Self {
        Self {
            grant_type: request.grant_type.clone(),
            scope: request.scope.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurePayPaypalAccessTokenResponse {
    pub access_token: Secret<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
}

impl TryFrom<ResponseRouterData<SecurePayPaypalAccessTokenResponse, Self>>
    for RouterDataV2<CreateAccessToken, PaymentFlowData, AccessTokenRequestData, AccessTokenResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<SecurePayPaypalAccessTokenResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let response = item.response;
        Ok(item.router_data.set_response(Ok(AccessTokenResponseData {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
        })))
    }
}

// ============================================================================
// INITIATE
// ============================================================================

/// Initiate body: the caller's extra fields (such as `redirectUrls`) with the
/// order fields filled in wherever the caller left them out.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct SecurePayPaypalInitiateRequest(pub Map<String, Value>);

impl
    TryFrom<
        &RouterDataV2<PaypalInitiate, PaymentFlowData, PaypalInitiateData, PaypalInitiateResponseData>,
    > for SecurePayPaypalInitiateRequest
{
    type Error = Error;

    fn try_from(
        item: &RouterDataV2<
            PaypalInitiate,
            PaymentFlowData,
            PaypalInitiateData,
            PaypalInitiateResponseData,
        >,
    ) -> Result<Self, Self::Error> {
        let auth = SecurePayPaypalAuthType::try_from(&item.connector_auth_type)?;
        let computed = [
            ("amount", Value::from(item.request.amount.get_amount_as_i64())),
            ("merchantCode", Value::from(auth.merchant_id.peek().as_str())),
            ("ip", Value::from(client_ip(&item.resource_common_data)?)),
            ("orderId", Value::from(item.request.order_id.as_str())),
            ("paymentType", Value::from(PAYMENT_TYPE_SALE)),
            ("noShipping", Value::from(NO_SHIPPING)),
        ];

        let mut body = item.request.extra.clone();
        for (key, value) in computed {
            match body.entry(key) {
                Entry::Occupied(_) => {
                    tracing::debug!(key, "caller supplied field kept over computed value");
                }
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }
        Ok(Self(body))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurePayPaypalInitiateResponse {
    pub payment_url: Option<String>,
    pub order_id: Option<String>,
    #[serde(skip)]
    pub raw_response: Value,
}

impl TryFrom<ResponseRouterData<SecurePayPaypalInitiateResponse, Self>>
    for RouterDataV2<PaypalInitiate, PaymentFlowData, PaypalInitiateData, PaypalInitiateResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<SecurePayPaypalInitiateResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code,
        } = item;

        let payment_url = response
            .payment_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(url::Url::parse);

        match payment_url {
            Some(Ok(payment_url)) => Ok(router_data.set_response(Ok(PaypalInitiateResponseData {
                payment_url,
                raw_response: response.raw_response,
            }))),
            Some(Err(parse_error)) => {
                tracing::error!(%parse_error, "wallet API returned an unusable paymentUrl");
                Ok(router_data.set_response(Err(missing_payment_url(http_code))))
            }
            None => {
                tracing::error!("wallet API reply carried no paymentUrl");
                Ok(router_data.set_response(Err(missing_payment_url(http_code))))
            }
        }
    }
}

fn missing_payment_url(status_code: u16) -> ErrorResponse {
    ErrorResponse {
        code: "missing_payment_url".to_string(),
        message: "The PayPal payment could not be started".to_string(),
        reason: Some("reply carried no usable paymentUrl".to_string()),
        status_code,
        attempt_status: None,
        connector_transaction_id: None,
    }
}

// ============================================================================
// EXECUTE
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurePayPaypalExecuteRequest {
    pub merchant_code: String,
    pub ip: String,
    pub amount: MinorUnit,
    pub payer_id: String,
}

impl
    TryFrom<&RouterDataV2<PaypalExecute, PaymentFlowData, PaypalExecuteData, PaypalExecuteOutcome>>
    for SecurePayPaypalExecuteRequest
{
    type Error = Error;

    fn try_from(
        item: &RouterDataV2<PaypalExecute, PaymentFlowData, PaypalExecuteData, PaypalExecuteOutcome>,
    ) -> Result<Self, Self::Error> {
        let auth = SecurePayPaypalAuthType::try_from(&item.connector_auth_type)?;
        Ok(Self {
            merchant_code: auth.merchant_id.peek().to_string(),
            ip: client_ip(&item.resource_common_data)?,
            amount: item.request.amount,
            payer_id: item.request.payer_id.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurePayPaypalExecuteResponse {
    pub status: Option<String>,
    pub provider_reference_number: Option<String>,
    pub order_id: Option<String>,
}

impl SecurePayPaypalExecuteResponse {
    pub fn payment_status(&self) -> PaypalPaymentStatus {
        self.status
            .as_deref()
            .and_then(|status| status.parse().ok())
            .unwrap_or(PaypalPaymentStatus::Unknown)
    }
}

impl TryFrom<ResponseRouterData<SecurePayPaypalExecuteResponse, Self>>
    for RouterDataV2<PaypalExecute, PaymentFlowData, PaypalExecuteData, PaypalExecuteOutcome>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<SecurePayPaypalExecuteResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code,
        } = item;
        let order_id = router_data.request.order_id.clone();

        if !response.payment_status().is_paid() {
            let status = response.status.unwrap_or_else(|| "unknown".to_string());
            tracing::info!(
                order_id = %order_id,
                status = %status,
                "SecurePay PayPal transaction could not be completed"
            );
            let outcome = PaypalExecuteOutcome::NotCompleted { status };
            let attempt_status = outcome.attempt_status();
            return Ok(router_data
                .update_resource_common_data(|data| data.set_status(attempt_status))
                .set_response(Ok(outcome)));
        }

        match response
            .provider_reference_number
            .filter(|reference| !reference.trim().is_empty())
        {
            Some(remote_id) => {
                tracing::info!(order_id = %order_id, "SecurePay PayPal transaction completed");
                let outcome = PaypalExecuteOutcome::Paid { remote_id };
                let attempt_status = outcome.attempt_status();
                Ok(router_data
                    .update_resource_common_data(|data| data.set_status(attempt_status))
                    .set_response(Ok(outcome)))
            }
            None => {
                tracing::error!(order_id = %order_id, "paid order carried no providerReferenceNumber");
                Ok(router_data.set_response(Err(ErrorResponse {
                    code: "missing_reference".to_string(),
                    message: "The PayPal payment reference is missing".to_string(),
                    reason: None,
                    status_code: http_code,
                    attempt_status: None,
                    connector_transaction_id: None,
                })))
            }
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SecurePayPaypalErrorDetail {
    pub code: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

/// Error body of the wallet API, or of the token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SecurePayPaypalErrorResponse {
    #[serde(default)]
    pub errors: Vec<SecurePayPaypalErrorDetail>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl SecurePayPaypalErrorResponse {
    pub fn code_and_message(&self) -> Option<(String, String)> {
        if let Some(detail) = self.errors.first() {
            let code = detail.code.clone()?;
            let message = detail
                .detail
                .clone()
                .or_else(|| detail.title.clone())
                .unwrap_or_else(|| code.clone());
            return Some((code, message));
        }
        let code = self.error.clone()?;
        let message = self.error_description.clone().unwrap_or_else(|| code.clone());
        Some((code, message))
    }
}
