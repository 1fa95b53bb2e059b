//! Main registry orchestration layer
//!
//! This module ties together the state machine, actor, and metrics
//! components into a high-level API for conference administration.
//!
//! # Example
//!
//! ```no_run
//! use registry_core::{Address, Config, Conference};
//!
//! #[tokio::main]
//! async fn main() -> registry_core::Result<()> {
//!     let config = Config::default();
//!     let conference = Conference::spawn(config)?;
//!
//!     let owner = conference.owner().clone();
//!     let id = conference
//!         .add_talk(
//!             owner,
//!             "Talk 1".to_string(),
//!             "Room 1".to_string(),
//!             1_700_000_000,
//!             1_700_003_600,
//!             vec![Address::new("spk-a")],
//!             vec!["John Doe".to_string()],
//!         )
//!         .await?;
//!     assert_eq!(id, 1);
//!
//!     Ok(())
//! }
//! ```

use crate::{
    actor::{spawn_registry_actor, RegistryHandle},
    metrics::Metrics,
    state::RegistryState,
    types::{Address, EventRecord, RegistrationReceipt, Talk, TalkId},
    Config, Error, Result,
};
use rust_decimal::Decimal;

/// Main conference registry interface
pub struct Conference {
    /// Actor handle for all operations
    handle: RegistryHandle,

    /// Prometheus metrics
    metrics: Metrics,

    /// Designated owner
    owner: Address,

    /// Fixed registration price
    price: Decimal,
}

impl Conference {
    /// Spawn a registry from configuration
    pub fn spawn(config: Config) -> Result<Self> {
        if config.registration_price < Decimal::ZERO {
            return Err(Error::Config(format!(
                "registration_price must be non-negative, got {}",
                config.registration_price
            )));
        }

        let owner = Address::new(&config.owner);
        let price = config.registration_price;

        let state = RegistryState::new(owner.clone(), price);
        let handle = spawn_registry_actor(state, config.mailbox_capacity);

        let metrics =
            Metrics::new().map_err(|e| Error::Config(format!("metrics setup failed: {}", e)))?;

        tracing::info!(owner = %owner, %price, "Conference registry spawned");

        Ok(Self {
            handle,
            metrics,
            owner,
            price,
        })
    }

    /// The designated owner identity
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// The fixed registration price
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Metrics collector (for exposition)
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Add a talk to the catalog. Owner-only.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_talk(
        &self,
        caller: Address,
        title: String,
        location: String,
        start_time: i64,
        end_time: i64,
        speaker_addresses: Vec<Address>,
        speaker_names: Vec<String>,
    ) -> Result<TalkId> {
        let id = self
            .handle
            .add_talk(
                caller,
                title,
                location,
                start_time,
                end_time,
                speaker_addresses,
                speaker_names,
            )
            .await?;

        self.metrics.record_talk_added();
        Ok(id)
    }

    /// Cancel a talk. Owner-only.
    pub async fn cancel_talk(&self, caller: Address, id: TalkId) -> Result<()> {
        self.handle.cancel_talk(caller, id).await?;
        self.metrics.record_talk_canceled();
        Ok(())
    }

    /// Register the caller as a paid attendee with an attached value.
    ///
    /// Underpayment fails and moves no funds; overpayment comes back through
    /// the receipt's `refund` within the same operation.
    pub async fn register(
        &self,
        caller: Address,
        full_name: String,
        value: Decimal,
    ) -> Result<RegistrationReceipt> {
        let receipt = self.handle.register(caller, full_name, value).await?;

        self.metrics.record_registration(receipt.refund);
        self.metrics.add_custody(receipt.paid);
        Ok(receipt)
    }

    /// Withdraw custodied funds to the owner. Owner-only.
    pub async fn withdraw(&self, caller: Address, amount: Decimal) -> Result<Decimal> {
        let released = self.handle.withdraw(caller, amount).await?;

        self.metrics.record_withdrawal();
        self.metrics.sub_custody(released);
        Ok(released)
    }

    /// Count of talks ever added, canceled ones included
    pub async fn number_of_talks(&self) -> Result<u64> {
        self.handle.number_of_talks().await
    }

    /// Full talk snapshot; fails on unknown ids
    pub async fn talk(&self, id: TalkId) -> Result<Talk> {
        self.handle.talk(id).await
    }

    /// Talk ids the speaker appears in, in add order
    pub async fn talks_per_speaker(&self, speaker: Address) -> Result<Vec<TalkId>> {
        self.handle.talks_per_speaker(speaker).await
    }

    /// Talk ids filtered by cancellation status, scanned fresh per call
    pub async fn talks(&self, canceled_only: bool) -> Result<Vec<TalkId>> {
        self.handle.talk_ids(canceled_only).await
    }

    /// Cancellation status; fails on unknown ids
    pub async fn is_talk_canceled(&self, id: TalkId) -> Result<bool> {
        self.handle.is_talk_canceled(id).await
    }

    /// Whether the address holds a registration
    pub async fn is_registered(&self, attendee: Address) -> Result<bool> {
        self.handle.is_registered(attendee).await
    }

    /// Current custody balance
    pub async fn custody_balance(&self) -> Result<Decimal> {
        self.handle.custody_balance().await
    }

    /// Snapshot of the notification log
    pub async fn events(&self) -> Result<Vec<EventRecord>> {
        self.handle.events().await
    }

    /// Shutdown the registry
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conference() -> Conference {
        let config = Config {
            owner: "owner".to_string(),
            ..Config::default()
        };
        Conference::spawn(config).unwrap()
    }

    #[tokio::test]
    async fn test_spawn_and_shutdown() {
        let conference = test_conference();
        assert_eq!(conference.number_of_talks().await.unwrap(), 0);
        conference.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_spawn_rejects_negative_price() {
        let config = Config {
            registration_price: Decimal::new(-1, 0),
            ..Config::default()
        };
        assert!(matches!(Conference::spawn(config), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_metrics_track_operations() {
        let conference = test_conference();
        let owner = conference.owner().clone();
        let price = conference.price();

        conference
            .add_talk(
                owner.clone(),
                "Talk 1".to_string(),
                "Room 1".to_string(),
                100,
                200,
                vec![],
                vec![],
            )
            .await
            .unwrap();
        conference.cancel_talk(owner.clone(), 1).await.unwrap();
        conference
            .register(Address::new("att-1"), "Rick Deckard".to_string(), price)
            .await
            .unwrap();

        let metrics = conference.metrics();
        assert_eq!(metrics.talks_added.get(), 1);
        assert_eq!(metrics.talks_canceled.get(), 1);
        assert_eq!(metrics.registrations.get(), 1);

        conference.shutdown().await.unwrap();
    }
}
