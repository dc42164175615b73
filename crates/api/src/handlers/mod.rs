pub mod callback_events;
pub mod health;
pub mod mpesa_callback;
pub mod orders;
pub mod payments;
pub mod stk_push;
