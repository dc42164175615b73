pub mod mpesa;

use async_trait::async_trait;
use lipa_primitives::error::MpesaError;
use lipa_primitives::models::providers::mpesa::StkPushAck;

pub use mpesa::MpesaClient;

pub struct StkPushParams<'a> {
    pub amount: i64,
    pub phone_number: &'a str,
    pub account_reference: &'a str,
}

/// Outbound "ask the payer to pay" call. The returned `CheckoutRequestID` is the
/// key later callbacks are matched on.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initiate(&self, params: StkPushParams<'_>) -> Result<StkPushAck, MpesaError>;
}
