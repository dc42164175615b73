pub mod callback_event_repository;
pub mod order_repository;
pub mod payment_repository;
