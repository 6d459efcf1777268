/// Failures a connector reports to its caller.
///
/// The first five variants are the outcomes a host is expected to act on.
/// The rest describe plumbing problems inside the adapter.
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ConnectorError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
    #[error("Could not connect to the payment gateway")]
    GatewayUnreachable,
    #[error("Payment gateway error {code}: {message}")]
    GatewayError { code: String, message: String },
    #[error("The card was declined: {message}")]
    HardDecline {
        code: Option<String>,
        message: String,
    },
    #[error("Failed to obtain an OAuth2 access token")]
    OAuthFailure,
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Failed to obtain authentication type")]
    FailedToObtainAuthType,
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Invalid connector configuration: {config}")]
    InvalidConnectorConfig { config: &'static str },
    #[error("Failed to execute a processing step: {0:?}")]
    ProcessingStepFailed(Option<bytes::Bytes>),
}

impl ConnectorError {
    /// Whether the host may let the shopper try again with the same details.
    pub fn is_retryable_by_shopper(&self) -> bool {
        matches!(self, Self::GatewayUnreachable | Self::OAuthFailure)
    }
}

/// Failures of the HTTP transport underneath a connector.
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ApiClientError {
    #[error("Header map construction failed")]
    HeaderMapConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Client construction failed")]
    ClientConstructionFailed,
    #[error("URL encoding of request payload failed")]
    UrlEncodingFailed,
    #[error("Failed to encode the request body")]
    RequestEncodingFailed,
    #[error("Failed to send request to connector {0}")]
    RequestNotSent(String),
    #[error("Failed to decode response")]
    ResponseDecodingFailed,
    #[error("Server responded with Request Timeout")]
    RequestTimeoutReceived,
    #[error("connection closed before a message could complete")]
    ConnectionClosedIncompleteMessage,
    #[error("Server responded with Internal Server Error")]
    InternalServerErrorReceived,
    #[error("Server responded with Bad Gateway")]
    BadGatewayReceived,
    #[error("Server responded with Service Unavailable")]
    ServiceUnavailableReceived,
    #[error("Server responded with Gateway Timeout")]
    GatewayTimeoutReceived,
    #[error("Unexpected state reached/Invariants conflicted")]
    UnexpectedState,
    #[error("Unexpected server response")]
    UnexpectedServerResponse,
}
