/// Lower-case hexadecimal digits used for SecurePay message ids
pub const MESSAGE_ID_ALPHABET: [char; 16] = [
    'a', 'b', 'c', 'd', 'e', 'f', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];
pub const MESSAGE_ID_MIN_LENGTH: usize = 15;
/// SecurePay rejects message ids longer than 30 characters
pub const MESSAGE_ID_MAX_LENGTH: usize = 25;

/// Prefix for environment variable overrides, e.g. `SECUREPAY__GATEWAY__MODE`
pub const ENV_PREFIX: &str = "SECUREPAY";
pub const RUN_ENV: &str = "RUN_ENV";

/// Deployment environment the process is running in.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Env {
    #[default]
    Development,
    Sandbox,
    Production,
}

impl Env {
    /// Reads `RUN_ENV`, falling back to the build profile when it is unset or unknown.
    pub fn current_env() -> Self {
        std::env::var(RUN_ENV)
            .ok()
            .and_then(|env| env.parse().ok())
            .unwrap_or(if cfg!(debug_assertions) {
                Self::Development
            } else {
                Self::Production
            })
    }

    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Sandbox => "sandbox.toml",
            Self::Production => "production.toml",
        }
    }
}
