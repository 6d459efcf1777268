//! Transient state of one PayPal redirect round trip.

use common_enums::Currency;
use common_utils::MinorUnit;

use crate::{
    connector_types::PaypalExecuteOutcome,
    errors::ConnectorError,
    utils::{invalid_input_err, Error},
};

#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PaypalFlowState {
    NotStarted,
    /// The shopper has been sent to `payment_url`
    Initiated { payment_url: String },
    /// The shopper came back with a payer id
    Returned,
    Executed(PaypalExecuteOutcome),
}

#[derive(Debug, Clone)]
pub struct PaypalSession {
    pub order_id: String,
    pub amount: MinorUnit,
    pub currency: Currency,
    pub merchant_code: String,
    pub payer_id: Option<String>,
    state: PaypalFlowState,
}

impl PaypalSession {
    /// Starts a round trip under a freshly generated order UUID.
    pub fn new(amount: MinorUnit, currency: Currency, merchant_code: impl Into<String>) -> Self {
        Self::with_order_id(common_utils::generate_uuid(), amount, currency, merchant_code)
    }

    pub fn with_order_id(
        order_id: impl Into<String>,
        amount: MinorUnit,
        currency: Currency,
        merchant_code: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            currency,
            merchant_code: merchant_code.into(),
            payer_id: None,
            state: PaypalFlowState::NotStarted,
        }
    }

    pub fn state(&self) -> &PaypalFlowState {
        &self.state
    }

    pub fn mark_initiated(&mut self, payment_url: impl Into<String>) -> Result<(), Error> {
        match self.state {
            PaypalFlowState::NotStarted => {
                self.state = PaypalFlowState::Initiated {
                    payment_url: payment_url.into(),
                };
                Ok(())
            }
            _ => Err(self.illegal_transition("initiated")),
        }
    }

    /// Checks that a return with `payer_id` would be accepted, without moving.
    pub fn ensure_returnable(&self, payer_id: &str) -> Result<(), Error> {
        if payer_id.trim().is_empty() {
            return Err(invalid_input_err("PayerID is missing from the return request"));
        }
        match self.state {
            PaypalFlowState::Initiated { .. } => Ok(()),
            _ => Err(self.illegal_transition("returned")),
        }
    }

    pub fn mark_returned(&mut self, payer_id: impl Into<String>) -> Result<(), Error> {
        let payer_id = payer_id.into();
        self.ensure_returnable(&payer_id)?;
        self.payer_id = Some(payer_id);
        self.state = PaypalFlowState::Returned;
        Ok(())
    }

    pub fn mark_executed(&mut self, outcome: PaypalExecuteOutcome) -> Result<(), Error> {
        match self.state {
            PaypalFlowState::Returned => {
                self.state = PaypalFlowState::Executed(outcome);
                Ok(())
            }
            _ => Err(self.illegal_transition("executed")),
        }
    }

    fn illegal_transition(&self, target: &str) -> error_stack::Report<ConnectorError> {
        invalid_input_err(format!(
            "PayPal session {} cannot move from {} to {target}",
            self.order_id, self.state
        ))
    }
}
