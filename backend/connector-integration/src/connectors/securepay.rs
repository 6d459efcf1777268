pub mod transformers;

use common_enums::GatewayMode;
use common_utils::{
    ext_traits::XmlExt,
    request::RequestContent,
    CustomResult, Maskable,
};
use domain_types::{
    connector_flow::Authorize,
    connector_types::{PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData},
    errors::ConnectorError,
    router_data::ErrorResponse,
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Connectors,
};
use error_stack::{report, ResultExt};
use interfaces::{
    api::ConnectorCommon,
    connector_integration_v2::ConnectorIntegrationV2,
    connector_types::{CardPaymentConnector, PaymentAuthorizeV2},
};
use transformers::{SecurePayPaymentRequest, SecurePayPaymentResponse};

use crate::{types::ResponseRouterData, utils};

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
}

/// `Content-Type` the XML API expects, charset spelling included
pub const XML_CONTENT_TYPE: &str = "text/xml; charset=UTF8";
/// Message-type segment appended to the configured `.../xmlapi/` root
const PAYMENT_PATH: &str = "payment";

/// Card payments through the SecurePay XML API
#[derive(Clone, Debug)]
pub struct SecurePay;

impl SecurePay {
    pub const fn new() -> &'static Self {
        &Self
    }

    /// Decodes a reply body, treating anything that is not an XML document as
    /// no reply at all.
    pub fn parse_payment_response(
        &self,
        res: &Response,
    ) -> CustomResult<SecurePayPaymentResponse, ConnectorError> {
        let body = utils::response_text(res)?;
        if !body.starts_with('<') {
            return Err(report!(ConnectorError::GatewayUnreachable))
                .attach_printable("gateway reply is not an XML document");
        }
        body.parse_xml::<SecurePayPaymentResponse>("SecurePayPaymentResponse")
            .change_context(ConnectorError::GatewayUnreachable)
            .attach_printable("gateway reply could not be parsed")
    }
}

impl CardPaymentConnector for SecurePay {}
impl PaymentAuthorizeV2 for SecurePay {}

impl ConnectorCommon for SecurePay {
    fn id(&self) -> &'static str {
        "securepay"
    }

    fn common_get_content_type(&self) -> &'static str {
        XML_CONTENT_TYPE
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, mode: GatewayMode) -> &'a str {
        connectors.securepay.base_url(mode)
    }

    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        let body = String::from_utf8_lossy(&res.response);
        match transformers::parse_error_status(&body) {
            Some(status) => {
                let code = status.status_code.unwrap_or_default();
                let message = status
                    .status_description
                    .unwrap_or_else(|| ErrorResponse::default().message);
                tracing::error!(
                    status_code = %code,
                    status_description = %message,
                    http_status = res.status_code,
                    "SecurePay returned an error status"
                );
                Ok(ErrorResponse {
                    code,
                    message: message.clone(),
                    reason: Some(message),
                    status_code: res.status_code,
                    attempt_status: None,
                    connector_transaction_id: None,
                })
            }
            None => utils::handle_json_response_deserialization_failure(&res, self.id()),
        }
    }
}

impl ConnectorIntegrationV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>
    for SecurePay
{
    fn get_headers(
        &self,
        _req: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(vec![(
            headers::CONTENT_TYPE.to_string(),
            self.common_get_content_type().to_string().into(),
        )])
    }

    fn get_content_type(&self) -> &'static str {
        self.common_get_content_type()
    }

    fn get_url(
        &self,
        req: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    ) -> CustomResult<String, ConnectorError> {
        let data = &req.resource_common_data;
        Ok(format!(
            "{}{PAYMENT_PATH}",
            self.base_url(&data.connectors, data.mode)
        ))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        let request = SecurePayPaymentRequest::try_from(req)?;
        Ok(Some(RequestContent::Xml(request.to_xml_document())))
    }

    fn handle_response_v2(
        &self,
        data: RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        ConnectorError,
    > {
        let response = self.parse_payment_response(&res)?;
        RouterDataV2::try_from(ResponseRouterData {
            response,
            router_data: data,
            http_code: res.status_code,
        })
    }
}
