use common_enums::GatewayMode;
use common_utils::{CustomResult, Maskable};
use domain_types::{
    errors::ConnectorError, router_data::ConnectorAuthType, router_data::ErrorResponse,
    router_response_types::Response, types::Connectors,
};

/// Behaviour shared by every flow of a connector
pub trait ConnectorCommon {
    /// Name of the connector (in lowercase).
    fn id(&self) -> &'static str;

    /// HTTP header used for authorization.
    fn get_auth_header(
        &self,
        _auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(Vec::new())
    }

    /// HTTP `Content-Type` to be used for POST requests.
    /// Defaults to `application/json`.
    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    /// The base URL for interacting with the connector's API in the given mode.
    fn base_url<'a>(&self, connectors: &'a Connectors, mode: GatewayMode) -> &'a str;

    /// common error response for a connector if it is same in all case
    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        let message = String::from_utf8_lossy(&res.response).trim().to_string();
        Ok(ErrorResponse {
            code: res.status_code.to_string(),
            message: if message.is_empty() {
                ErrorResponse::default().message
            } else {
                message
            },
            reason: None,
            status_code: res.status_code,
            attempt_status: None,
            connector_transaction_id: None,
        })
    }
}
