//! `tienda-payment` — the pluggable payment capability.

pub mod factory;
pub mod gateway;

pub use factory::{MOCK_PROVIDER, PROVIDER_ENV, gateway_from_env, select_gateway};
pub use gateway::{BankGateway, MockGateway, PaymentGateway};
