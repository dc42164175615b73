pub mod callback_event;
pub mod enum_types;
pub mod order;
pub mod payment;

pub use callback_event::*;
pub use enum_types::*;
pub use order::*;
pub use payment::*;
