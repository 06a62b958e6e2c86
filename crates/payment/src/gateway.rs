//! Gateway implementations: the real bank processor and the test mock.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use rust_decimal::Decimal;

/// Payment capability consumed by the purchase service.
///
/// `charge` returns whether the charge went through; the service translates
/// `false` into its typed payment error. `name` identifies the concrete
/// variant (factory tests and logs key off it).
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    fn charge(&self, amount: Decimal) -> bool;
}

/// Real gateway. Always approves; each charge appends an immutable audit
/// line to a local log file.
///
/// The audit write sits outside any purchase transaction. If the surrounding
/// unit of work later aborts, the line survives — treat the log as
/// at-least-once, not exactly-once.
#[derive(Debug, Clone)]
pub struct BankGateway {
    log_path: PathBuf,
}

impl BankGateway {
    pub const DEFAULT_LOG: &'static str = "payments.log";

    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    fn append_audit_line(&self, amount: Decimal) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "[{}] charge approved: ${amount}", Utc::now().to_rfc3339())
    }
}

impl Default for BankGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOG)
    }
}

impl PaymentGateway for BankGateway {
    fn name(&self) -> &'static str {
        "bank"
    }

    fn charge(&self, amount: Decimal) -> bool {
        // Fire-and-forget: a failed audit write must not fail the charge.
        if let Err(e) = self.append_audit_line(amount) {
            tracing::warn!(error = %e, path = %self.log_path.display(), "audit log write failed");
        }
        true
    }
}

/// Test double selected via configuration. Approves everything, no side
/// effect beyond a diagnostic trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockGateway;

impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn charge(&self, amount: Decimal) -> bool {
        tracing::debug!(%amount, "mock gateway approved charge without charging");
        true
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn bank_gateway_appends_one_audit_line_per_charge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payments.log");
        let gateway = BankGateway::new(&path);

        assert!(gateway.charge(dec!(178.50)));
        assert!(gateway.charge(dec!(297.50)));

        let log = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("charge approved: $178.50"));
        assert!(lines[1].contains("charge approved: $297.50"));
    }

    #[test]
    fn bank_gateway_still_approves_when_the_log_is_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        // The directory itself is not a writable file path.
        let gateway = BankGateway::new(dir.path());
        assert!(gateway.charge(dec!(10.00)));
    }

    #[test]
    fn mock_gateway_approves_without_side_effects() {
        assert!(MockGateway.charge(dec!(1.00)));
    }
}
