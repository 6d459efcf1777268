#![allow(dead_code)]

use common_enums::{Currency, GatewayMode};
use common_utils::{consts::Env, MinorUnit};
use domain_types::{
    connector_types::{OrderDetails, PaymentMethodDetails},
    types::{Connectors, Proxy, SecurePayParams, SecurePayPaypalParams},
};
use hyperswitch_masking::Secret;
use securepay_gateway::{
    configs::{Common, Config, GatewaySettings, MessageIdSettings, PaypalCredentials},
    logger::config::Log,
};

pub const MERCHANT_ID: &str = "ABC0001";
pub const MERCHANT_PASSWORD: &str = "abc123";
pub const PAYPAL_CLIENT_ID: &str = "client";
pub const PAYPAL_CLIENT_SECRET: &str = "secret";

pub const XML_PATH: &str = "/xmlapi/payment";
pub const TOKEN_PATH: &str = "/oauth2/token";
pub const PAYPAL_BASE_PATH: &str = "/v2/wallets/paypal/payments/";

/// Gateway configuration with every test-mode endpoint on the mock server
pub fn test_config(server_uri: &str, with_paypal: bool) -> Config {
    Config {
        common: Common {
            environment: Env::Development,
        },
        log: Log::default(),
        proxy: Proxy::default(),
        connectors: Connectors {
            securepay: SecurePayParams {
                live_base_url: format!("{server_uri}/live/xmlapi/"),
                test_base_url: format!("{server_uri}/xmlapi/"),
            },
            securepay_paypal: SecurePayPaypalParams {
                live_base_url: format!("{server_uri}/live{PAYPAL_BASE_PATH}"),
                sandbox_base_url: format!("{server_uri}{PAYPAL_BASE_PATH}"),
                live_token_url: format!("{server_uri}/live{TOKEN_PATH}"),
                sandbox_token_url: format!("{server_uri}{TOKEN_PATH}"),
            },
        },
        gateway: GatewaySettings {
            mode: GatewayMode::Test,
            merchant_id: Secret::new(MERCHANT_ID.to_string()),
            password: Secret::new(MERCHANT_PASSWORD.to_string()),
            currency: Currency::AUD,
            paypal: with_paypal.then(|| PaypalCredentials {
                client_id: Secret::new(PAYPAL_CLIENT_ID.to_string()),
                client_secret: Secret::new(PAYPAL_CLIENT_SECRET.to_string()),
            }),
            message_id: MessageIdSettings::default(),
        },
    }
}

pub fn order(reference: &str, amount: i64) -> OrderDetails {
    OrderDetails::new(reference, MinorUnit::new(amount), Currency::AUD).with_client_ip("203.0.113.7")
}

pub fn card_fields() -> PaymentMethodDetails {
    PaymentMethodDetails {
        number: Secret::new("4444333322221111".to_string()),
        expiry_month: Secret::new("09".to_string()),
        expiry_year: Secret::new("2031".to_string()),
        security_code: Secret::new("123".to_string()),
        holder_name: Some(Secret::new("Test User".to_string())),
    }
}

/// A SecurePay XML reply with the given status code and approval flag
pub fn xml_reply(status_code: &str, approved: &str, txn_id: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\
         <SecurePayMessage>\
         <MessageInfo><messageID>8af793f9af34bea0cf40f5fb79f383</messageID>\
         <messageTimestamp>20262410120000000+600</messageTimestamp>\
         <apiVersion>xml-4.2</apiVersion></MessageInfo>\
         <RequestType>Payment</RequestType>\
         <MerchantInfo><merchantID>{MERCHANT_ID}</merchantID></MerchantInfo>\
         <Status><statusCode>{status_code}</statusCode><statusDescription>Normal</statusDescription></Status>\
         <Payment><TxnList count=\"1\"><Txn ID=\"1\">\
         <txnType>0</txnType><txnSource>23</txnSource><amount>1999</amount>\
         <currency>AUD</currency><purchaseOrderNo>1042</purchaseOrderNo>\
         <approved>{approved}</approved><responseCode>00</responseCode>\
         <responseText>Approved</responseText><settlementDate>20261018</settlementDate>\
         <txnID>{txn_id}</txnID>\
         <CreditCardInfo><pan>444433...111</pan><expiryDate>09/31</expiryDate>\
         <cardType>6</cardType><cardDescription>Visa</cardDescription></CreditCardInfo>\
         </Txn></TxnList></Payment>\
         </SecurePayMessage>"
    )
}
