use cards::CardDetails;
use common_enums::{AttemptStatus, CaptureMethod, Currency, GatewayMode};
use common_utils::{errors, pii::IpAddress, CustomResult, MinorUnit};
use error_stack::ResultExt;
use hyperswitch_masking::{PeekInterface, Secret};
use serde::Deserialize;

use crate::{
    types::Connectors,
    utils::{missing_field_err, Error},
};

/// Data shared by every flow of a single payment attempt
#[derive(Debug, Clone)]
pub struct PaymentFlowData {
    /// Host order identifier, sent as the purchase order number
    pub order_reference: String,
    pub mode: GatewayMode,
    pub status: AttemptStatus,
    pub connectors: Connectors,
    pub access_token: Option<AccessTokenResponseData>,
    pub client_ip: Option<IpAddress>,
    pub connector_http_status_code: Option<u16>,
    pub raw_connector_response: Option<Secret<String>>,
}

impl PaymentFlowData {
    pub fn new(order_reference: impl Into<String>, mode: GatewayMode, connectors: Connectors) -> Self {
        Self {
            order_reference: order_reference.into(),
            mode,
            status: AttemptStatus::Started,
            connectors,
            access_token: None,
            client_ip: None,
            connector_http_status_code: None,
            raw_connector_response: None,
        }
    }

    pub fn with_client_ip(mut self, client_ip: Option<IpAddress>) -> Self {
        self.client_ip = client_ip;
        self
    }

    pub fn get_access_token(&self) -> Result<Secret<String>, Error> {
        self.access_token
            .as_ref()
            .map(|token_data| token_data.access_token.clone())
            .ok_or_else(missing_field_err("access_token"))
    }

    pub fn set_access_token(mut self, access_token: Option<AccessTokenResponseData>) -> Self {
        self.access_token = access_token;
        self
    }

    pub fn get_client_ip(&self) -> Result<IpAddress, Error> {
        self.client_ip
            .clone()
            .ok_or_else(missing_field_err("client_ip"))
    }

    pub fn set_status(mut self, status: AttemptStatus) -> Self {
        self.status = status;
        self
    }
}

/// Flow data that keeps the vendor's reply for diagnostics
pub trait RawConnectorResponse {
    fn set_raw_connector_response(&mut self, response: Option<String>);

    fn get_raw_connector_response(&self) -> Option<Secret<String>>;

    fn set_connector_http_status_code(&mut self, status_code: u16);
}

impl RawConnectorResponse for PaymentFlowData {
    fn set_raw_connector_response(&mut self, response: Option<String>) {
        self.raw_connector_response = response.map(Secret::new);
    }

    fn get_raw_connector_response(&self) -> Option<Secret<String>> {
        self.raw_connector_response.clone()
    }

    fn set_connector_http_status_code(&mut self, status_code: u16) {
        self.connector_http_status_code = Some(status_code);
    }
}

/// Card payment request for the XML API
#[derive(Debug)]
pub struct PaymentsAuthorizeData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub capture_method: CaptureMethod,
    /// Taken from the transient store for this attempt only
    pub card: Option<CardDetails>,
    /// Message id for this attempt; generated with the default bounds when absent
    pub message_id: Option<String>,
}

impl PaymentsAuthorizeData {
    pub fn is_auto_capture(&self) -> bool {
        self.capture_method == CaptureMethod::Automatic
    }

    pub fn get_card(&self) -> Result<&CardDetails, Error> {
        self.card.as_ref().ok_or_else(|| {
            crate::utils::invalid_input_err("Please enter payment details to continue.")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseId {
    ConnectorTransactionId(String),
    #[default]
    NoResponseId,
}

impl ResponseId {
    pub fn get_connector_transaction_id(&self) -> CustomResult<String, errors::ValidationError> {
        match self {
            Self::ConnectorTransactionId(txn_id) => Ok(txn_id.to_string()),
            Self::NoResponseId => Err(errors::ValidationError::IncorrectValueProvided {
                field_name: "connector_transaction_id",
            })
            .attach_printable("Expected connector transaction ID not found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentsResponseData {
    pub resource_id: ResponseId,
    /// Vendor response code, e.g. the bank response code of a card transaction
    pub connector_response_code: Option<String>,
    pub connector_response_text: Option<String>,
    pub status_code: u16,
}

/// Start of a PayPal Express Checkout order
#[derive(Debug, Clone)]
pub struct PaypalInitiateData {
    pub amount: MinorUnit,
    pub currency: Currency,
    /// UUID the wallet API knows the order by
    pub order_id: String,
    /// Host supplied fields such as `redirectUrls`, merged under the computed ones
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaypalInitiateResponseData {
    /// Where the host sends the shopper's browser
    pub payment_url: url::Url,
    pub raw_response: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct PaypalExecuteData {
    pub amount: MinorUnit,
    pub order_id: String,
    pub payer_id: String,
}

/// Result of executing a PayPal order.
///
/// A non-paid order is reported as a value rather than an error; the host
/// decides what to show the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaypalExecuteOutcome {
    Paid { remote_id: String },
    NotCompleted { status: String },
}

impl PaypalExecuteOutcome {
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid { .. })
    }

    pub fn attempt_status(&self) -> AttemptStatus {
        match self {
            Self::Paid { .. } => AttemptStatus::Charged,
            Self::NotCompleted { .. } => AttemptStatus::Pending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessTokenRequestData {
    pub grant_type: String,
    /// Space separated scopes requested with the token
    pub scope: Option<String>,
}

impl Default for AccessTokenRequestData {
    fn default() -> Self {
        Self {
            grant_type: "client_credentials".to_string(),
            scope: Some(crate::types::SECUREPAY_PAYPAL_OAUTH_SCOPES.join(" ")),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccessTokenResponseData {
    pub access_token: Secret<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
}

/// A bearer token together with the instant it stops being valid
#[derive(Clone, Debug)]
pub struct AccessToken {
    pub token: Secret<String>,
    /// Unix timestamp in seconds
    pub expires_at: i64,
}

impl AccessToken {
    /// Tokens without an advertised lifetime are treated as valid for an hour.
    pub const DEFAULT_TTL_SECONDS: i64 = 3600;

    pub fn from_response(response: AccessTokenResponseData, issued_at: i64) -> Self {
        Self {
            token: response.access_token,
            expires_at: issued_at
                + response
                    .expires_in
                    .unwrap_or(Self::DEFAULT_TTL_SECONDS),
        }
    }

    /// Expired, or expiring within `skew_seconds` of `now`.
    pub fn is_expired_at(&self, now: i64, skew_seconds: i64) -> bool {
        now + skew_seconds >= self.expires_at
    }

    pub fn bearer_header_value(&self) -> String {
        format!("Bearer {}", self.token.peek())
    }
}

impl From<&AccessToken> for AccessTokenResponseData {
    fn from(token: &AccessToken) -> Self {
        Self {
            access_token: token.token.clone(),
            token_type: Some("Bearer".to_string()),
            expires_in: None,
        }
    }
}

/// What the host knows about the order being paid for
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub order_reference: String,
    pub amount: MinorUnit,
    pub currency: Currency,
    pub client_ip: Option<IpAddress>,
}

impl OrderDetails {
    pub fn new(order_reference: impl Into<String>, amount: MinorUnit, currency: Currency) -> Self {
        Self {
            order_reference: order_reference.into(),
            amount,
            currency,
            client_ip: None,
        }
    }

    pub fn with_client_ip(mut self, client_ip: impl Into<String>) -> Self {
        self.client_ip = Some(IpAddress::new(client_ip.into()));
        self
    }

    /// Amounts must be strictly positive before anything is sent.
    pub fn validate_amount(&self) -> Result<(), Error> {
        if self.amount.is_greater_than(0) {
            Ok(())
        } else {
            Err(crate::utils::invalid_input_err(format!(
                "Amount must be greater than zero, got {}",
                self.amount
            )))
        }
    }
}

/// Raw card fields as collected by the host's checkout form
pub struct PaymentMethodDetails {
    pub number: Secret<String>,
    pub expiry_month: Secret<String>,
    pub expiry_year: Secret<String>,
    pub security_code: Secret<String>,
    pub holder_name: Option<Secret<String>>,
}

impl std::fmt::Debug for PaymentMethodDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentMethodDetails")
            .field("number", &"*** masked ***")
            .field("holder_name", &self.holder_name)
            .finish_non_exhaustive()
    }
}

impl TryFrom<PaymentMethodDetails> for CardDetails {
    type Error = Error;

    fn try_from(details: PaymentMethodDetails) -> Result<Self, Self::Error> {
        let required = [
            ("number", &details.number),
            ("expiry_month", &details.expiry_month),
            ("expiry_year", &details.expiry_year),
            ("security_code", &details.security_code),
        ];
        if let Some((field, _)) = required
            .iter()
            .find(|(_, value)| value.peek().trim().is_empty())
        {
            return Err(crate::utils::invalid_input_err(format!(
                "Please enter payment details to continue. Missing {field}"
            )));
        }
        Self::new(
            details.number.peek(),
            details.expiry_month.peek(),
            details.expiry_year.peek(),
            details.security_code.peek(),
            details.holder_name,
        )
        .change_context(crate::errors::ConnectorError::InvalidInput {
            message: "Invalid payment details".to_string(),
        })
    }
}

/// Result handed back to the host after a payment attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub remote_transaction_id: Option<String>,
    pub status: AttemptStatus,
}

impl PaymentOutcome {
    pub fn new(remote_transaction_id: Option<String>, status: AttemptStatus) -> Self {
        Self {
            remote_transaction_id,
            status,
        }
    }

    /// The state name the host stores on its payment record
    pub fn new_state(&self) -> &'static str {
        self.status.host_payment_state()
    }
}
