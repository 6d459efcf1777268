/// Card payment through the XML API, capturing or authorize-only
#[derive(Debug, Clone)]
pub struct Authorize;

/// Start of a PayPal redirect round trip
#[derive(Debug, Clone)]
pub struct PaypalInitiate;

/// Completion of a PayPal order after the shopper returns
#[derive(Debug, Clone)]
pub struct PaypalExecute;

#[derive(Debug, Clone)]
pub struct CreateAccessToken;
