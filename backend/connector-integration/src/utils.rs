use common_enums::AttemptStatus;
use common_utils::CustomResult;
use domain_types::{
    connector_types::PaymentsAuthorizeData, errors, router_data::ErrorResponse,
    router_response_types::Response,
};
use error_stack::{report, Report, ResultExt};

type Error = Report<errors::ConnectorError>;

const UTF8_BOM: &str = "\u{feff}";

pub trait PaymentsAuthorizeRequestData {
    /// Status the attempt moves to once the gateway approves it.
    fn approved_status(&self) -> AttemptStatus;
}

impl PaymentsAuthorizeRequestData for PaymentsAuthorizeData {
    fn approved_status(&self) -> AttemptStatus {
        if self.is_auto_capture() {
            AttemptStatus::Charged
        } else {
            AttemptStatus::Authorized
        }
    }
}

/// Body of a vendor reply as text, without a leading byte order mark.
///
/// A reply that is empty, blank or not UTF-8 counts as no reply at all.
pub(crate) fn response_text(res: &Response) -> Result<&str, Error> {
    let text = std::str::from_utf8(&res.response)
        .change_context(errors::ConnectorError::GatewayUnreachable)
        .attach_printable("gateway reply is not valid UTF-8")?;
    let text = text.trim_start_matches(UTF8_BOM).trim();
    if text.is_empty() {
        return Err(report!(errors::ConnectorError::GatewayUnreachable))
            .attach_printable(format!("empty reply with status {}", res.status_code));
    }
    Ok(text)
}

/// Maps an error recorded on the router data onto the failure the host acts on.
///
/// Errors flagged with a failed attempt status are issuer declines; anything
/// else the gateway reported is a gateway error.
pub fn connector_error_from_response(error: &ErrorResponse) -> errors::ConnectorError {
    match error.attempt_status {
        Some(AttemptStatus::Failure) => errors::ConnectorError::HardDecline {
            code: Some(error.code.clone()),
            message: error.message.clone(),
        },
        _ => errors::ConnectorError::GatewayError {
            code: error.code.clone(),
            message: error.message.clone(),
        },
    }
}

pub(crate) fn handle_json_response_deserialization_failure(
    res: &Response,
    connector: &'static str,
) -> CustomResult<ErrorResponse, errors::ConnectorError> {
    let response_data = String::from_utf8_lossy(&res.response).trim().to_string();
    tracing::warn!(connector, status_code = res.status_code, "unexpected error reply shape");
    Ok(ErrorResponse {
        status_code: res.status_code,
        code: res.status_code.to_string(),
        message: "Unsupported response type".to_string(),
        reason: (!response_data.is_empty()).then_some(response_data),
        attempt_status: None,
        connector_transaction_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &'static str) -> Response {
        Response {
            headers: None,
            response: bytes::Bytes::from_static(body.as_bytes()),
            status_code: 200,
        }
    }

    #[test]
    fn test_response_text_strips_bom_and_whitespace() {
        let res = response("\u{feff}  <SecurePayMessage/>\n");
        assert_eq!(response_text(&res).unwrap(), "<SecurePayMessage/>");
    }

    #[test]
    fn test_blank_reply_is_unreachable() {
        let error = response_text(&response("   ")).unwrap_err();
        assert_eq!(
            error.current_context(),
            &errors::ConnectorError::GatewayUnreachable
        );
    }

    #[test]
    fn test_declines_and_gateway_errors_are_told_apart() {
        let mut error = ErrorResponse {
            code: "05".to_string(),
            message: "Do Not Honour".to_string(),
            reason: None,
            status_code: 200,
            attempt_status: Some(AttemptStatus::Failure),
            connector_transaction_id: None,
        };
        assert_eq!(
            connector_error_from_response(&error),
            errors::ConnectorError::HardDecline {
                code: Some("05".to_string()),
                message: "Do Not Honour".to_string(),
            }
        );
        error.attempt_status = None;
        assert!(matches!(
            connector_error_from_response(&error),
            errors::ConnectorError::GatewayError { .. }
        ));
    }
}
