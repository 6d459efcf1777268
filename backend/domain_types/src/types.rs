use common_enums::GatewayMode;
use serde::{Deserialize, Serialize};

pub const SECUREPAY_LIVE_BASE_URL: &str = "https://www.securepay.com.au/xmlapi/";
pub const SECUREPAY_TEST_BASE_URL: &str = "https://test.securepay.com.au/xmlapi/";
pub const SECUREPAY_PAYPAL_LIVE_BASE_URL: &str =
    "https://payments.auspost.net.au/v2/wallets/paypal/payments/";
pub const SECUREPAY_PAYPAL_SANDBOX_BASE_URL: &str =
    "https://payments-stest.npe.auspost.zone/v2/wallets/paypal/payments/";
pub const SECUREPAY_PAYPAL_LIVE_TOKEN_URL: &str =
    "https://hello.auspost.com.au/oauth2/ausrkwxtmx9Jtwp4s356/v1/token";
pub const SECUREPAY_PAYPAL_SANDBOX_TOKEN_URL: &str =
    "https://hello.sandbox.auspost.com.au/oauth2/ausujjr7T0v0TTilk3l5/v1/token";

pub const SECUREPAY_PAYPAL_OAUTH_SCOPES: [&str; 2] = [
    "https://api.payments.auspost.com.au/payhive/payments/read",
    "https://api.payments.auspost.com.au/payhive/payments/write",
];

/// Endpoints of the SecurePay XML API
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
#[serde(default)]
pub struct SecurePayParams {
    pub live_base_url: String,
    pub test_base_url: String,
}

impl Default for SecurePayParams {
    fn default() -> Self {
        Self {
            live_base_url: SECUREPAY_LIVE_BASE_URL.to_string(),
            test_base_url: SECUREPAY_TEST_BASE_URL.to_string(),
        }
    }
}

impl SecurePayParams {
    pub fn base_url(&self, mode: GatewayMode) -> &str {
        match mode {
            GatewayMode::Live => &self.live_base_url,
            GatewayMode::Test => &self.test_base_url,
        }
    }
}

/// Endpoints of the PayPal wallet API and its OAuth2 token issuer
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
#[serde(default)]
pub struct SecurePayPaypalParams {
    pub live_base_url: String,
    pub sandbox_base_url: String,
    pub live_token_url: String,
    pub sandbox_token_url: String,
}

impl Default for SecurePayPaypalParams {
    fn default() -> Self {
        Self {
            live_base_url: SECUREPAY_PAYPAL_LIVE_BASE_URL.to_string(),
            sandbox_base_url: SECUREPAY_PAYPAL_SANDBOX_BASE_URL.to_string(),
            live_token_url: SECUREPAY_PAYPAL_LIVE_TOKEN_URL.to_string(),
            sandbox_token_url: SECUREPAY_PAYPAL_SANDBOX_TOKEN_URL.to_string(),
        }
    }
}

impl SecurePayPaypalParams {
    pub fn base_url(&self, mode: GatewayMode) -> &str {
        match mode {
            GatewayMode::Live => &self.live_base_url,
            GatewayMode::Test => &self.sandbox_base_url,
        }
    }

    pub fn token_url(&self, mode: GatewayMode) -> &str {
        match mode {
            GatewayMode::Live => &self.live_token_url,
            GatewayMode::Test => &self.sandbox_token_url,
        }
    }
}

#[derive(Clone, Deserialize, Serialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Connectors {
    pub securepay: SecurePayParams,
    pub securepay_paypal: SecurePayPaypalParams,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    pub bypass_proxy_urls: Vec<String>,
}

impl Proxy {
    pub fn cache_key(&self, should_bypass_proxy: bool) -> Option<Self> {
        if should_bypass_proxy || (self.http_url.is_none() && self.https_url.is_none()) {
            None
        } else {
            Some(self.clone())
        }
    }
}
