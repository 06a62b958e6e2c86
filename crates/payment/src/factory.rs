//! Gateway selection from configuration.
//!
//! The provider string is consulted per invocation, not at process start, so
//! tests and operators can flip the variant without a restart.

use std::sync::Arc;

use crate::gateway::{BankGateway, MockGateway, PaymentGateway};

/// Environment variable naming the payment provider.
pub const PROVIDER_ENV: &str = "PAYMENT_PROVIDER";

/// Provider value selecting the mock gateway. Anything else (or nothing)
/// selects the real one.
pub const MOCK_PROVIDER: &str = "MOCK";

/// Select a gateway for the given provider string.
pub fn select_gateway(provider: Option<&str>) -> Arc<dyn PaymentGateway> {
    match provider {
        Some(MOCK_PROVIDER) => Arc::new(MockGateway),
        _ => Arc::new(BankGateway::default()),
    }
}

/// Select a gateway from `PAYMENT_PROVIDER`, read at call time.
pub fn gateway_from_env() -> Arc<dyn PaymentGateway> {
    let provider = std::env::var(PROVIDER_ENV).ok();
    select_gateway(provider.as_deref())
}
