use crate::errors;

pub type Error = error_stack::Report<errors::ConnectorError>;

pub fn missing_field_err(
    message: &'static str,
) -> Box<dyn Fn() -> error_stack::Report<errors::ConnectorError> + 'static> {
    Box::new(move || {
        errors::ConnectorError::MissingRequiredField {
            field_name: message,
        }
        .into()
    })
}

pub fn invalid_input_err(message: impl Into<String>) -> error_stack::Report<errors::ConnectorError> {
    errors::ConnectorError::InvalidInput {
        message: message.into(),
    }
    .into()
}
