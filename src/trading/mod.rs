pub mod gateway;

pub use gateway::{ExchangeSession, OperationOutcome, OrderGateway, Rejection};
