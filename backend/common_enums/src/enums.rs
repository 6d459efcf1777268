/// The three-letter ISO 4217 currency code of a payment amount.
///
/// SecurePay settles in AUD; the other codes are accepted by the PayPal wallet.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::VariantNames,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    AUD,
    CAD,
    EUR,
    GBP,
    HKD,
    JPY,
    KWD,
    NZD,
    SGD,
    USD,
}

impl Currency {
    pub fn iso_4217(self) -> &'static str {
        match self {
            Self::AUD => "036",
            Self::CAD => "124",
            Self::EUR => "978",
            Self::GBP => "826",
            Self::HKD => "344",
            Self::JPY => "392",
            Self::KWD => "414",
            Self::NZD => "554",
            Self::SGD => "702",
            Self::USD => "840",
        }
    }

    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(self, Self::JPY)
    }

    pub fn is_three_decimal_currency(self) -> bool {
        matches!(self, Self::KWD)
    }

    /// Number of digits in the minor unit of this currency.
    pub fn number_of_digits_after_decimal_point(self) -> u32 {
        if self.is_zero_decimal_currency() {
            0
        } else if self.is_three_decimal_currency() {
            3
        } else {
            2
        }
    }
}

/// The status of the attempt
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Hash,
    Eq,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttemptStatus {
    Started,
    AuthenticationPending,
    Authorized,
    Charged,
    #[default]
    Pending,
    Failure,
}

impl AttemptStatus {
    pub fn is_terminal_status(self) -> bool {
        matches!(self, Self::Charged | Self::Authorized | Self::Failure)
    }

    /// Name of the matching state on the host's payment record.
    pub fn host_payment_state(self) -> &'static str {
        match self {
            Self::Charged => "completed",
            Self::Authorized => "authorization",
            Self::Failure => "authorization_voided",
            Self::Started | Self::AuthenticationPending | Self::Pending => "new",
        }
    }
}

/// Whether funds are settled immediately or only held.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaptureMethod {
    #[default]
    Automatic,
    Manual,
}

/// Which of the vendor environments requests are sent to.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GatewayMode {
    Live,
    #[default]
    #[serde(alias = "sandbox")]
    #[strum(to_string = "test", serialize = "sandbox")]
    Test,
}

impl GatewayMode {
    pub fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

/// `status` of a PayPal order as reported by the wallet API
#[derive(
    Clone,
    Debug,
    Eq,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaypalPaymentStatus {
    Paid,
    Pending,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl PaypalPaymentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}
