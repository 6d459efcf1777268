use crate::connectors;

/// A decoded vendor reply travelling together with the router data it answers
pub struct ResponseRouterData<Response, RouterData> {
    pub response: Response,
    pub router_data: RouterData,
    pub http_code: u16,
}

/// The connectors this crate ships, by the name they are configured under
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectorEnum {
    Securepay,
    SecurepayPaypal,
}

impl ConnectorEnum {
    pub fn id(self) -> &'static str {
        use interfaces::api::ConnectorCommon;

        match self {
            Self::Securepay => connectors::SecurePay::new().id(),
            Self::SecurepayPaypal => connectors::SecurePayPaypal::new().id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_connector_names() {
        assert_eq!(ConnectorEnum::from_str("securepay").unwrap(), ConnectorEnum::Securepay);
        assert_eq!(ConnectorEnum::SecurepayPaypal.to_string(), "securepay_paypal");
        assert_eq!(ConnectorEnum::SecurepayPaypal.id(), "securepay_paypal");
    }
}
