//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the registry.
//!
//! # Metrics
//!
//! - `registry_talks_added_total` - Total number of talks added
//! - `registry_talks_canceled_total` - Total number of talks canceled
//! - `registry_registrations_total` - Total number of paid registrations
//! - `registry_refunds_total` - Total number of overpayment refunds
//! - `registry_withdrawals_total` - Total number of owner withdrawals
//! - `registry_custody_balance` - Current custodied balance

use prometheus::{Gauge, IntCounter, Registry};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Total talks added
    pub talks_added: IntCounter,

    /// Total talks canceled
    pub talks_canceled: IntCounter,

    /// Total paid registrations
    pub registrations: IntCounter,

    /// Total overpayment refunds issued
    pub refunds: IntCounter,

    /// Total owner withdrawals
    pub withdrawals: IntCounter,

    /// Current custody balance
    pub custody_balance: Gauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let talks_added =
            IntCounter::new("registry_talks_added_total", "Total number of talks added")?;
        registry.register(Box::new(talks_added.clone()))?;

        let talks_canceled = IntCounter::new(
            "registry_talks_canceled_total",
            "Total number of talks canceled",
        )?;
        registry.register(Box::new(talks_canceled.clone()))?;

        let registrations = IntCounter::new(
            "registry_registrations_total",
            "Total number of paid registrations",
        )?;
        registry.register(Box::new(registrations.clone()))?;

        let refunds = IntCounter::new(
            "registry_refunds_total",
            "Total number of overpayment refunds",
        )?;
        registry.register(Box::new(refunds.clone()))?;

        let withdrawals = IntCounter::new(
            "registry_withdrawals_total",
            "Total number of owner withdrawals",
        )?;
        registry.register(Box::new(withdrawals.clone()))?;

        let custody_balance = Gauge::new("registry_custody_balance", "Current custodied balance")?;
        registry.register(Box::new(custody_balance.clone()))?;

        Ok(Self {
            talks_added,
            talks_canceled,
            registrations,
            refunds,
            withdrawals,
            custody_balance,
            registry,
        })
    }

    /// Record talk addition
    pub fn record_talk_added(&self) {
        self.talks_added.inc();
    }

    /// Record talk cancellation
    pub fn record_talk_canceled(&self) {
        self.talks_canceled.inc();
    }

    /// Record a paid registration, counting a refund if change was given
    pub fn record_registration(&self, refund: Decimal) {
        self.registrations.inc();
        if refund > Decimal::ZERO {
            self.refunds.inc();
        }
    }

    /// Record an owner withdrawal
    pub fn record_withdrawal(&self) {
        self.withdrawals.inc();
    }

    /// Increase the custody balance gauge
    pub fn add_custody(&self, amount: Decimal) {
        self.custody_balance.add(amount.to_f64().unwrap_or(0.0));
    }

    /// Decrease the custody balance gauge
    pub fn sub_custody(&self, amount: Decimal) {
        self.custody_balance.sub(amount.to_f64().unwrap_or(0.0));
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
