pub mod api;
pub mod models;
pub mod money;

pub use models::{ParseEnumError, Principal, RequestStatus, Role};
pub use money::{Money, MoneyError};
