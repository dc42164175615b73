pub mod callback_dto;
pub mod health_dto;
pub mod order_dto;
pub mod payment_dto;
pub mod providers;
pub mod stk_dto;

pub use callback_dto::*;
pub use health_dto::*;
pub use order_dto::*;
pub use payment_dto::*;
pub use providers::*;
pub use stk_dto::*;
