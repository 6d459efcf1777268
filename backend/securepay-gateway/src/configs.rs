use std::path::PathBuf;

use common_enums::{Currency, GatewayMode};
use common_utils::consts;
use domain_types::{
    router_data::ConnectorAuthType,
    types::{Connectors, Proxy},
};
use hyperswitch_masking::Secret;

use crate::{error::ConfigurationError, logger::config::Log};

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    pub common: Common,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub proxy: Proxy,
    #[serde(default)]
    pub connectors: Connectors,
    pub gateway: GatewaySettings,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Common {
    pub environment: consts::Env,
}

/// Merchant account the adapter acts for
#[derive(Clone, serde::Deserialize, Debug)]
pub struct GatewaySettings {
    pub mode: GatewayMode,
    pub merchant_id: Secret<String>,
    pub password: Secret<String>,
    #[serde(default = "default_currency")]
    pub currency: Currency,
    /// Client credentials for the PayPal wallet API; PayPal is off without them.
    #[serde(default)]
    pub paypal: Option<PaypalCredentials>,
    #[serde(default)]
    pub message_id: MessageIdSettings,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct PaypalCredentials {
    pub client_id: Secret<String>,
    pub client_secret: Secret<String>,
}

/// Length bounds of the XML message id
#[derive(Clone, Copy, serde::Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct MessageIdSettings {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for MessageIdSettings {
    fn default() -> Self {
        Self {
            min_length: consts::MESSAGE_ID_MIN_LENGTH,
            max_length: consts::MESSAGE_ID_MAX_LENGTH,
        }
    }
}

fn default_currency() -> Currency {
    Currency::AUD
}

impl GatewaySettings {
    pub fn card_auth(&self) -> ConnectorAuthType {
        ConnectorAuthType::SecurePay {
            merchant_id: self.merchant_id.clone(),
            password: self.password.clone(),
        }
    }

    pub fn paypal_auth(&self) -> Option<ConnectorAuthType> {
        self.paypal
            .as_ref()
            .map(|credentials| ConnectorAuthType::SecurePayPaypal {
                merchant_id: self.merchant_id.clone(),
                client_id: credentials.client_id.clone(),
                client_secret: credentials.client_secret.clone(),
            })
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let MessageIdSettings {
            min_length,
            max_length,
        } = self.message_id;
        if max_length == 0 || min_length > max_length {
            return Err(ConfigurationError::InvalidValue {
                field: "gateway.message_id",
                reason: format!("bounds {min_length}..={max_length} are empty"),
            });
        }
        Ok(())
    }
}

impl Config {
    /// Function to build the configuration by picking it from default locations
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::new_with_config_path(None)
    }

    /// Function to build the configuration from an explicit file, or from
    /// `config/<RUN_ENV>.toml` when none is given
    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, ConfigurationError> {
        let env = consts::Env::current_env();
        let config_path = Self::config_path(&env, explicit_config_path);

        let config = Self::builder(&env)?
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(consts::ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("proxy.bypass_proxy_urls"),
            )
            .build()?;

        #[allow(clippy::print_stderr)]
        let config: Self = serde_path_to_error::deserialize(config).map_err(|error| {
            eprintln!("Unable to deserialize application configuration: {error}");
            error.into_inner()
        })?;

        config.gateway.validate()?;

        Ok(config)
    }

    pub fn builder(
        environment: &consts::Env,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            // "env" can't be altered by config field.
            .set_override("env", environment.to_string())
    }

    /// Config path.
    pub fn config_path(
        environment: &consts::Env,
        explicit_config_path: Option<PathBuf>,
    ) -> PathBuf {
        let mut config_path = PathBuf::new();
        if let Some(explicit_config_path_val) = explicit_config_path {
            config_path.push(explicit_config_path_val);
        } else {
            let config_directory: String = "config".into();
            let config_file_name = environment.config_path();

            config_path.push(workspace_path());
            config_path.push(config_directory);
            config_path.push(config_file_name);
        }
        config_path
    }
}

pub fn workspace_path() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let mut path = PathBuf::from(manifest_dir);
        path.pop();
        path.pop();
        path
    } else {
        PathBuf::from(".")
    }
}
