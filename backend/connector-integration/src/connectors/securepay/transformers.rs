use common_enums::{AttemptStatus, CaptureMethod, Currency};
use common_utils::{
    date_time,
    xml::{XmlDocument, XmlElement},
    MinorUnit,
};
use domain_types::{
    connector_flow::Authorize,
    connector_types::{PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData, ResponseId},
    errors::ConnectorError,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
    utils::invalid_input_err,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::{ExposeInterface, PeekInterface, Secret, StrongSecret};
use serde::Deserialize;

use crate::{types::ResponseRouterData, utils::PaymentsAuthorizeRequestData};

type Error = error_stack::Report<ConnectorError>;

pub const API_VERSION: &str = "xml-4.2";
/// Seconds SecurePay waits on the bank before giving up
pub const TIMEOUT_VALUE: u32 = 60;
/// Transaction source code of the XML API
pub const TXN_SOURCE: u32 = 23;
pub const REQUEST_TYPE_PAYMENT: &str = "Payment";
pub const STATUS_CODE_NORMAL: &str = "000";
const APPROVED_NO: &str = "No";
const DECLINED_MESSAGE: &str = "The payment was declined";
const MISSING_STATUS_CODE: &str = "missing_status";

// Authentication Type Definition
#[derive(Debug, Clone)]
pub struct SecurePayAuthType {
    pub merchant_id: Secret<String>,
    pub password: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for SecurePayAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::SecurePay {
                merchant_id,
                password,
            } => Ok(Self {
                merchant_id: merchant_id.clone(),
                password: password.clone(),
            }),
            _ => Err(report!(ConnectorError::FailedToObtainAuthType)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurePayTxnType {
    Payment,
    Preauthorise,
}

impl SecurePayTxnType {
    pub fn code(self) -> u8 {
        match self {
            Self::Payment => 0,
            Self::Preauthorise => 10,
        }
    }
}

impl From<CaptureMethod> for SecurePayTxnType {
    fn from(capture_method: CaptureMethod) -> Self {
        match capture_method {
            CaptureMethod::Automatic => Self::Payment,
            CaptureMethod::Manual => Self::Preauthorise,
        }
    }
}

/// Card fields copied out for a single message
#[derive(Debug)]
pub struct SecurePayCardInfo {
    pub card_number: StrongSecret<String>,
    pub cvv: StrongSecret<String>,
    /// `MM/YY`
    pub expiry_date: StrongSecret<String>,
}

#[derive(Debug)]
pub struct SecurePayPaymentRequest {
    pub message_id: String,
    pub message_timestamp: String,
    pub merchant_id: Secret<String>,
    pub password: Secret<String>,
    pub txn_type: SecurePayTxnType,
    pub amount: MinorUnit,
    pub currency: Currency,
    pub purchase_order_no: String,
    pub card: SecurePayCardInfo,
}

impl TryFrom<&RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>>
    for SecurePayPaymentRequest
{
    type Error = Error;

    fn try_from(
        item: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    ) -> Result<Self, Self::Error> {
        let auth = SecurePayAuthType::try_from(&item.connector_auth_type)?;
        let card = item.request.get_card()?;
        if !item.request.amount.is_greater_than(0) {
            return Err(invalid_input_err(format!(
                "Amount must be greater than zero, got {}",
                item.request.amount
            )));
        }

        let message_id = item
            .request
            .message_id
            .clone()
            .unwrap_or_else(common_utils::generate_securepay_message_id);
        let message_timestamp = date_time::securepay_timestamp()
            .change_context(ConnectorError::RequestEncodingFailed)
            .attach_printable("failed to format the message timestamp")?;

        Ok(Self {
            message_id,
            message_timestamp,
            merchant_id: auth.merchant_id,
            password: auth.password,
            txn_type: SecurePayTxnType::from(item.request.capture_method),
            amount: item.request.amount,
            currency: item.request.currency,
            purchase_order_no: item.resource_common_data.order_reference.clone(),
            card: SecurePayCardInfo {
                card_number: StrongSecret::new(card.number.peek().to_string()),
                cvv: StrongSecret::new(card.security_code.peek().peek().to_string()),
                expiry_date: StrongSecret::new(card.expiry.to_mm_yy().expose()),
            },
        })
    }
}

impl SecurePayPaymentRequest {
    /// The `SecurePayMessage` document for a single card transaction.
    pub fn to_xml_document(&self) -> XmlDocument {
        let message_info = XmlElement::parent(
            "MessageInfo",
            vec![
                XmlElement::text("messageID", &self.message_id),
                XmlElement::text("messageTimestamp", &self.message_timestamp),
                XmlElement::text("timeoutValue", TIMEOUT_VALUE),
                XmlElement::text("apiVersion", API_VERSION),
            ],
        );
        let merchant_info = XmlElement::parent(
            "MerchantInfo",
            vec![
                XmlElement::text("merchantID", self.merchant_id.peek()),
                XmlElement::secret(
                    "password",
                    StrongSecret::new(self.password.peek().to_string()),
                ),
            ],
        );
        let credit_card_info = XmlElement::parent(
            "CreditCardInfo",
            vec![
                XmlElement::secret("cardNumber", self.card.card_number.clone()),
                XmlElement::secret("cvv", self.card.cvv.clone()),
                XmlElement::secret("expiryDate", self.card.expiry_date.clone()),
            ],
        );
        let txn = XmlElement::parent(
            "Txn",
            vec![
                XmlElement::text("txnType", self.txn_type.code()),
                XmlElement::text("txnSource", TXN_SOURCE),
                XmlElement::text("amount", self.amount),
                XmlElement::text("currency", self.currency),
                XmlElement::text("purchaseOrderNo", &self.purchase_order_no),
                credit_card_info,
            ],
        )
        .attribute("ID", 1);
        let payment = XmlElement::parent(
            "Payment",
            vec![XmlElement::parent("TxnList", vec![txn]).attribute("count", 1)],
        );

        XmlDocument::new(XmlElement::parent(
            "SecurePayMessage",
            vec![
                message_info,
                merchant_info,
                XmlElement::text("RequestType", REQUEST_TYPE_PAYMENT),
                payment,
            ],
        ))
    }
}

// Response structures. Unknown elements are ignored.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurePayStatus {
    #[serde(rename = "statusCode", default)]
    pub status_code: Option<String>,
    #[serde(rename = "statusDescription", default)]
    pub status_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurePayTxn {
    #[serde(rename = "@ID", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub approved: Option<String>,
    #[serde(rename = "responseCode", default)]
    pub response_code: Option<String>,
    #[serde(rename = "responseText", default)]
    pub response_text: Option<String>,
    #[serde(rename = "txnID", default)]
    pub txn_id: Option<String>,
    #[serde(rename = "settlementDate", default)]
    pub settlement_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurePayTxnList {
    #[serde(rename = "@count", default)]
    pub count: Option<String>,
    #[serde(rename = "Txn", default)]
    pub txns: Vec<SecurePayTxn>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurePayPaymentBlock {
    #[serde(rename = "TxnList", default)]
    pub txn_list: Option<SecurePayTxnList>,
}

/// A `SecurePayMessage` reply to a payment request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurePayPaymentResponse {
    #[serde(rename = "Status", default)]
    pub status: Option<SecurePayStatus>,
    #[serde(rename = "Payment", default)]
    pub payment: Option<SecurePayPaymentBlock>,
    // Some replies carry the transaction fields directly under the root.
    #[serde(default)]
    pub approved: Option<String>,
    #[serde(rename = "txnID", default)]
    pub txn_id: Option<String>,
    #[serde(rename = "responseCode", default)]
    pub response_code: Option<String>,
    #[serde(rename = "responseText", default)]
    pub response_text: Option<String>,
}

/// What a payment reply means for the attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurePayDecision {
    GatewayError {
        code: String,
        description: String,
    },
    Declined {
        response_code: Option<String>,
        response_text: Option<String>,
        txn_id: Option<String>,
    },
    Approved {
        txn_id: Option<String>,
        response_code: Option<String>,
        response_text: Option<String>,
    },
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl SecurePayPaymentResponse {
    fn txn(&self) -> Option<&SecurePayTxn> {
        self.payment
            .as_ref()
            .and_then(|payment| payment.txn_list.as_ref())
            .and_then(|list| list.txns.first())
    }

    fn txn_field<'a>(
        &'a self,
        from_txn: impl Fn(&'a SecurePayTxn) -> Option<&'a String>,
        top_level: Option<&'a String>,
    ) -> Option<String> {
        non_empty(self.txn().and_then(from_txn)).or_else(|| non_empty(top_level))
    }

    pub fn approved(&self) -> Option<String> {
        self.txn_field(|txn| txn.approved.as_ref(), self.approved.as_ref())
    }

    pub fn txn_id(&self) -> Option<String> {
        self.txn_field(|txn| txn.txn_id.as_ref(), self.txn_id.as_ref())
    }

    pub fn response_code(&self) -> Option<String> {
        self.txn_field(|txn| txn.response_code.as_ref(), self.response_code.as_ref())
    }

    pub fn response_text(&self) -> Option<String> {
        self.txn_field(|txn| txn.response_text.as_ref(), self.response_text.as_ref())
    }

    /// Applies the status check before the approval check.
    pub fn decision(&self) -> SecurePayDecision {
        let status_code = self
            .status
            .as_ref()
            .and_then(|status| non_empty(status.status_code.as_ref()));
        match status_code {
            None => {
                return SecurePayDecision::GatewayError {
                    code: MISSING_STATUS_CODE.to_string(),
                    description: "The reply carried no status".to_string(),
                }
            }
            Some(code) if code != STATUS_CODE_NORMAL => {
                let description = self
                    .status
                    .as_ref()
                    .and_then(|status| non_empty(status.status_description.as_ref()))
                    .unwrap_or_default();
                return SecurePayDecision::GatewayError { code, description };
            }
            Some(_) => {}
        }

        if self.approved().as_deref() == Some(APPROVED_NO) {
            SecurePayDecision::Declined {
                response_code: self.response_code(),
                response_text: self.response_text(),
                txn_id: self.txn_id(),
            }
        } else {
            SecurePayDecision::Approved {
                txn_id: self.txn_id(),
                response_code: self.response_code(),
                response_text: self.response_text(),
            }
        }
    }
}

impl TryFrom<ResponseRouterData<SecurePayPaymentResponse, Self>>
    for RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<SecurePayPaymentResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code,
        } = item;

        match response.decision() {
            SecurePayDecision::GatewayError { code, description } => {
                tracing::error!(
                    status_code = %code,
                    status_description = %description,
                    order_reference = %router_data.resource_common_data.order_reference,
                    "SecurePay returned an error status"
                );
                Ok(router_data.set_response(Err(ErrorResponse {
                    code,
                    message: if description.is_empty() {
                        ErrorResponse::default().message
                    } else {
                        description.clone()
                    },
                    reason: Some(description),
                    status_code: http_code,
                    attempt_status: None,
                    connector_transaction_id: None,
                })))
            }
            SecurePayDecision::Declined {
                response_code,
                response_text,
                txn_id,
            } => {
                tracing::info!(
                    response_code = ?response_code,
                    order_reference = %router_data.resource_common_data.order_reference,
                    "SecurePay declined the payment"
                );
                Ok(router_data
                    .update_resource_common_data(|data| data.set_status(AttemptStatus::Failure))
                    .set_response(Err(ErrorResponse {
                        code: response_code.unwrap_or_else(|| "declined".to_string()),
                        message: DECLINED_MESSAGE.to_string(),
                        reason: response_text,
                        status_code: http_code,
                        attempt_status: Some(AttemptStatus::Failure),
                        connector_transaction_id: txn_id,
                    })))
            }
            SecurePayDecision::Approved {
                txn_id,
                response_code,
                response_text,
            } => {
                let status = router_data.request.approved_status();
                let resource_id = txn_id
                    .map(ResponseId::ConnectorTransactionId)
                    .unwrap_or_default();
                Ok(router_data
                    .update_resource_common_data(|data| data.set_status(status))
                    .set_response(Ok(PaymentsResponseData {
                        resource_id,
                        connector_response_code: response_code,
                        connector_response_text: response_text,
                        status_code: http_code,
                    })))
            }
        }
    }
}

/// Best effort read of the `Status` block of an error reply
pub(crate) fn parse_error_status(body: &str) -> Option<SecurePayStatus> {
    use common_utils::ext_traits::XmlExt;

    body.parse_xml::<SecurePayPaymentResponse>("SecurePayPaymentResponse")
        .ok()
        .and_then(|response| response.status)
        .filter(|status| non_empty(status.status_code.as_ref()).is_some())
}
