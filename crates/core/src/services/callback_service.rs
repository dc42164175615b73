use crate::app_state::AppState;
use crate::services::reconciliation_service::{ReconciliationResult, ReconciliationService};
use crate::stores::Datastore;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::dtos::callback_dto::CallbackAck;
use lipa_primitives::models::entities::callback_event::{CallbackEvent, NewCallbackEvent};
use lipa_primitives::models::entities::enum_types::CallbackOutcome;
use lipa_primitives::models::providers::mpesa::StkCallbackEnvelope;
use serde_json::{json, Value};
use tracing::{error, info, warn};

pub const DEFAULT_EVENT_LIMIT: i64 = 50;
pub const MAX_EVENT_LIMIT: i64 = 500;

pub struct CallbackService;

impl CallbackService {
    /// Handles one delivery on the callback endpoint. The gateway always gets an
    /// acknowledgement: `ResultCode 0` when the delivery was processed (including
    /// when nothing matched), `ResultCode 1` for anything that went wrong.
    pub async fn acknowledge(state: &AppState, body: &[u8]) -> CallbackAck {
        Self::acknowledge_with(state.store.as_ref(), body).await
    }

    pub async fn acknowledge_with<S>(store: &S, body: &[u8]) -> CallbackAck
    where
        S: Datastore + ?Sized,
    {
        let payload: Value = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Callback body is not valid JSON");
                let mut event = NewCallbackEvent::new(
                    CallbackOutcome::Rejected,
                    json!({ "raw": String::from_utf8_lossy(body) }),
                );
                event.detail = Some(format!("Invalid JSON: {}", e));
                Self::record(store, event).await;
                return CallbackAck::internal_error();
            }
        };

        let envelope = match serde_json::from_value::<StkCallbackEnvelope>(payload.clone()) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Callback body does not match the STK callback shape");
                let mut event = NewCallbackEvent::new(CallbackOutcome::Rejected, payload);
                event.detail = Some(format!("Unexpected payload: {}", e));
                Self::record(store, event).await;
                return CallbackAck::internal_error();
            }
        };

        let callback = envelope.body.stk_callback;
        info!(
            checkout_request_id = %callback.checkout_request_id,
            result_code = callback.result_code,
            "STK callback received"
        );

        let mut event = NewCallbackEvent::new(CallbackOutcome::Error, payload);
        event.checkout_request_id = Some(callback.checkout_request_id.clone());
        event.result_code = Some(callback.result_code);

        let ack = match ReconciliationService::reconcile(store, &callback).await {
            Ok(result) => {
                event.outcome = result.outcome().to_string();
                match &result {
                    ReconciliationResult::Failed(_) => {
                        event.detail = Some(callback.result_desc.clone());
                    }
                    ReconciliationResult::AlreadySettled(payment) => {
                        event.detail = Some(format!("Payment already {}", payment.status));
                    }
                    _ => {}
                }
                CallbackAck::accepted()
            }
            Err(e) => {
                error!(
                    checkout_request_id = %callback.checkout_request_id,
                    error = %e,
                    "Callback reconciliation failed"
                );
                if matches!(e, ApiError::Callback(_)) {
                    event.outcome = CallbackOutcome::Rejected.to_string();
                }
                event.detail = Some(e.to_string());
                CallbackAck::internal_error()
            }
        };

        Self::record(store, event).await;
        ack
    }

    pub async fn recent_events(
        state: &AppState,
        limit: Option<i64>,
    ) -> Result<Vec<CallbackEvent>, ApiError> {
        let limit = limit
            .unwrap_or(DEFAULT_EVENT_LIMIT)
            .clamp(1, MAX_EVENT_LIMIT);
        state.store.find_recent_callback_events(limit).await
    }

    async fn record<S>(store: &S, event: NewCallbackEvent)
    where
        S: Datastore + ?Sized,
    {
        if let Err(e) = store.record_callback_event(event).await {
            error!(error = %e, "Failed to record callback event");
        }
    }
}
