pub mod callback_service;
pub mod order_service;
pub mod payment_service;
pub mod reconciliation_service;
pub mod stk_push_service;
