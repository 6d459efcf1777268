use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common_enums::CaptureMethod;
use common_utils::MinorUnit;
use domain_types::{
    connector_types::{OrderDetails, PaymentMethodDetails, PaymentOutcome},
    errors::ConnectorError,
    paypal_session::{PaypalFlowState, PaypalSession},
};
use error_stack::Report;
use hyperswitch_masking::{PeekInterface, Secret};
use interfaces::connector_types::{OffsitePaymentGateway, OnsitePaymentGateway};
use securepay_gateway::{app::GatewayApp, configs, error::ExitCode, logger};
use serde_json::{json, Map, Value};

/// Manual smoke testing against the SecurePay test endpoints
#[derive(Debug, Parser)]
#[command(name = "securepay-gateway", version)]
struct Cli {
    /// Configuration file; defaults to config/<RUN_ENV>.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct OrderArgs {
    /// Host order reference, sent as the purchase order number
    #[arg(long)]
    order: String,
    /// Order total in major units, e.g. 19.99
    #[arg(long)]
    amount: String,
    /// ISO currency code; defaults to the configured currency
    #[arg(long)]
    currency: Option<String>,
    #[arg(long, default_value = "127.0.0.1")]
    client_ip: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Charge or pre-authorise a card through the XML API
    CardPayment {
        #[command(flatten)]
        order: OrderArgs,
        #[arg(long, env = "SECUREPAY_CARD_NUMBER")]
        card_number: String,
        #[arg(long)]
        expiry_month: String,
        #[arg(long)]
        expiry_year: String,
        #[arg(long, env = "SECUREPAY_CARD_CVV")]
        cvv: String,
        /// Pre-authorise only instead of capturing
        #[arg(long)]
        authorize_only: bool,
    },
    /// Create a PayPal order and print the URL to send the shopper to
    PaypalInitiate {
        #[command(flatten)]
        order: OrderArgs,
        #[arg(long)]
        success_url: String,
        #[arg(long)]
        cancel_url: String,
    },
    /// Execute a PayPal order after the shopper returned with a payer id
    PaypalExecute {
        #[command(flatten)]
        order: OrderArgs,
        /// Order id printed by paypal-initiate
        #[arg(long)]
        order_id: String,
        #[arg(long)]
        payment_url: String,
        #[arg(long)]
        payer_id: String,
    },
}

impl OrderArgs {
    fn order_details(
        &self,
        config: &configs::Config,
    ) -> Result<OrderDetails, Report<ConnectorError>> {
        let currency = match &self.currency {
            Some(code) => code.to_uppercase().parse().map_err(|_| {
                Report::new(ConnectorError::InvalidInput {
                    message: format!("Unknown currency {code}"),
                })
            })?,
            None => config.gateway.currency,
        };
        let amount = MinorUnit::from_major_str(&self.amount, currency).map_err(|error| {
            error.change_context(ConnectorError::InvalidInput {
                message: format!("Invalid amount {}", self.amount),
            })
        })?;
        Ok(OrderDetails::new(self.order.clone(), amount, currency).with_client_ip(&self.client_ip))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    #[allow(clippy::expect_used)]
    let config = configs::Config::new_with_config_path(cli.config.clone())
        .expect("Failed while parsing config");
    let guard = logger::setup(
        &config.log,
        securepay_gateway::service_name!(),
        [
            securepay_gateway::service_name!(),
            "connector_integration",
            "external_services",
        ],
    );

    let result = run(cli.command, config).await;
    #[allow(clippy::print_stdout, clippy::print_stderr)]
    let code = match result {
        Ok(output) => {
            println!("{output:#}");
            0
        }
        Err(error) => {
            eprintln!("{error:?}");
            error.current_context().exit_code()
        }
    };
    // Flush buffered logs; `exit` skips destructors.
    drop(guard);
    std::process::exit(code);
}

async fn run(command: Command, config: configs::Config) -> Result<Value, Report<ConnectorError>> {
    let app = GatewayApp::new(config);

    match command {
        Command::CardPayment {
            order,
            card_number,
            expiry_month,
            expiry_year,
            cvv,
            authorize_only,
        } => {
            let order = order.order_details(app.config())?;
            let session_id = format!("cli-{}", order.order_reference);
            app.create_payment_method(
                &session_id,
                PaymentMethodDetails {
                    number: Secret::new(card_number),
                    expiry_month: Secret::new(expiry_month),
                    expiry_year: Secret::new(expiry_year),
                    security_code: Secret::new(cvv),
                    holder_name: None,
                },
            )
            .await?;
            let capture_method = if authorize_only {
                CaptureMethod::Manual
            } else {
                CaptureMethod::Automatic
            };
            let outcome = app
                .create_payment(&session_id, &order, capture_method)
                .await?;
            Ok(outcome_json(&outcome))
        }
        Command::PaypalInitiate {
            order,
            success_url,
            cancel_url,
        } => {
            let order = order.order_details(app.config())?;
            let mut extra = Map::new();
            extra.insert(
                "redirectUrls".to_string(),
                json!({ "successUrl": success_url, "cancelUrl": cancel_url }),
            );
            let session = app.initiate_redirect(&order, extra).await?;
            let payment_url = match session.state() {
                PaypalFlowState::Initiated { payment_url } => payment_url.clone(),
                _ => String::new(),
            };
            Ok(json!({
                "order_id": session.order_id,
                "payment_url": payment_url,
            }))
        }
        Command::PaypalExecute {
            order,
            order_id,
            payment_url,
            payer_id,
        } => {
            let order = order.order_details(app.config())?;
            let mut session = PaypalSession::with_order_id(
                order_id,
                order.amount,
                order.currency,
                app.config().gateway.merchant_id.peek().clone(),
            );
            session.mark_initiated(payment_url)?;
            let outcome = app
                .complete_redirect(&mut session, &order, &payer_id)
                .await?;
            Ok(outcome_json(&outcome))
        }
    }
}

fn outcome_json(outcome: &PaymentOutcome) -> Value {
    json!({
        "remote_transaction_id": outcome.remote_transaction_id,
        "new_state": outcome.new_state(),
    })
}
