use hyperswitch_masking::{PeekInterface, Secret};

/// Credentials a connector authenticates with
#[derive(Default, Debug, Clone, serde::Deserialize)]
#[serde(tag = "auth_type")]
pub enum ConnectorAuthType {
    /// Merchant id and transaction password for the XML API
    SecurePay {
        merchant_id: Secret<String>,
        password: Secret<String>,
    },
    /// Merchant code plus OAuth2 client credentials for the PayPal wallet API
    SecurePayPaypal {
        merchant_id: Secret<String>,
        client_id: Secret<String>,
        client_secret: Secret<String>,
    },
    #[default]
    NoKey,
}

impl ConnectorAuthType {
    // show only first and last two characters of the key and mask others with *
    // mask the entire key if it's length is less than or equal to 4
    fn mask_key(key: &Secret<String>) -> Secret<String> {
        let key = key.peek();
        let key_len = key.chars().count();
        let masked_key = if key_len <= 4 {
            "*".repeat(key_len)
        } else {
            key.chars()
                .enumerate()
                .map(|(index, character)| {
                    if index < 2 || index >= key_len - 2 {
                        character
                    } else {
                        '*'
                    }
                })
                .collect()
        };
        Secret::new(masked_key)
    }

    // Mask the keys in the auth_type
    pub fn get_masked_keys(&self) -> Self {
        match self {
            Self::NoKey => Self::NoKey,
            Self::SecurePay {
                merchant_id,
                password,
            } => Self::SecurePay {
                merchant_id: Self::mask_key(merchant_id),
                password: Self::mask_key(password),
            },
            Self::SecurePayPaypal {
                merchant_id,
                client_id,
                client_secret,
            } => Self::SecurePayPaypal {
                merchant_id: Self::mask_key(merchant_id),
                client_id: Self::mask_key(client_id),
                client_secret: Self::mask_key(client_secret),
            },
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, PartialEq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub reason: Option<String>,
    pub status_code: u16,
    pub attempt_status: Option<common_enums::AttemptStatus>,
    pub connector_transaction_id: Option<String>,
}

impl Default for ErrorResponse {
    fn default() -> Self {
        Self {
            code: "SP_00".to_string(),
            message: "Something went wrong".to_string(),
            reason: None,
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            attempt_status: None,
            connector_transaction_id: None,
        }
    }
}
