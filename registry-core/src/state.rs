//! In-memory registry state and transition logic
//!
//! [`RegistryState`] is the single source of truth: the talk arena, both
//! index maps, the attendee roster, the custody balance and the event log.
//! Every mutation validates all preconditions before touching anything, so
//! an error always leaves the state exactly as it was.
//!
//! # Invariants
//!
//! - Talk ids are 1, 2, 3, ... in add order; never reused, never removed
//! - `speakers` preserves the caller's insertion order
//! - The speaker index only grows; cancellation does not compact it
//! - Custody grows by exactly the registration price per registration
//! - At most one registration per address

use crate::{
    error::{Error, Result},
    types::{Address, EventRecord, RegistrationReceipt, RegistryEvent, Speaker, Talk, TalkId},
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Exclusive owner of all registry data.
#[derive(Debug)]
pub struct RegistryState {
    /// Designated administrative identity
    owner: Address,

    /// Fixed registration price
    price: Decimal,

    /// Talk arena; index i holds talk id i+1
    talks: Vec<Talk>,

    /// Speaker address -> talk ids, in the order the talks were added
    speaker_index: HashMap<Address, Vec<TalkId>>,

    /// Attendee address -> stored full name
    registrations: HashMap<Address, String>,

    /// Custodied registration fees
    custody: Decimal,

    /// Append-only notification log
    events: Vec<EventRecord>,
}

impl RegistryState {
    /// Create an empty registry for the given owner and price.
    pub fn new(owner: Address, price: Decimal) -> Self {
        Self {
            owner,
            price,
            talks: Vec::new(),
            speaker_index: HashMap::new(),
            registrations: HashMap::new(),
            custody: Decimal::ZERO,
            events: Vec::new(),
        }
    }

    /// The designated owner.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// The fixed registration price.
    pub fn price(&self) -> Decimal {
        self.price
    }

    fn require_owner(&self, caller: &Address) -> Result<()> {
        if caller != &self.owner {
            return Err(Error::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    fn record(&mut self, event: RegistryEvent) {
        let seq = self.events.len() as u64;
        self.events.push(EventRecord {
            seq,
            recorded_at: Utc::now(),
            event,
        });
    }

    // Mutations

    /// Add a talk to the catalog. Owner-only.
    ///
    /// `speaker_addresses` and `speaker_names` are parallel vectors and must
    /// have equal length. Returns the newly assigned id.
    #[allow(clippy::too_many_arguments)]
    pub fn add_talk(
        &mut self,
        caller: &Address,
        title: String,
        location: String,
        start_time: i64,
        end_time: i64,
        speaker_addresses: Vec<Address>,
        speaker_names: Vec<String>,
    ) -> Result<TalkId> {
        self.require_owner(caller)?;

        if speaker_addresses.len() != speaker_names.len() {
            return Err(Error::InvalidInput(format!(
                "speaker arrays differ in length: {} addresses, {} names",
                speaker_addresses.len(),
                speaker_names.len()
            )));
        }

        let id = self.talks.len() as TalkId + 1;

        let speakers: Vec<Speaker> = speaker_addresses
            .into_iter()
            .zip(speaker_names)
            .map(|(address, name)| Speaker { address, name })
            .collect();

        for speaker in &speakers {
            self.speaker_index
                .entry(speaker.address.clone())
                .or_default()
                .push(id);
        }

        let talk = Talk {
            id,
            title: title.clone(),
            location,
            start_time,
            end_time,
            speakers,
            canceled: false,
        };
        self.talks.push(talk);

        self.record(RegistryEvent::TalkAdded {
            id,
            title,
            start_time,
            end_time,
        });

        tracing::debug!(talk_id = id, "Talk added");

        Ok(id)
    }

    /// Cancel a talk. Owner-only; fails on unknown or already-canceled ids.
    ///
    /// Flips the flag and nothing else: the speaker index is not compacted
    /// and no attendee is refunded (registration is conference-wide, not
    /// per-talk).
    pub fn cancel_talk(&mut self, caller: &Address, id: TalkId) -> Result<()> {
        self.require_owner(caller)?;

        let talk = self.talk_mut(id)?;
        if talk.canceled {
            return Err(Error::AlreadyCanceled(id));
        }
        talk.canceled = true;

        let (title, start_time, end_time) = (talk.title.clone(), talk.start_time, talk.end_time);
        self.record(RegistryEvent::TalkCanceled {
            id,
            title,
            start_time,
            end_time,
        });

        tracing::debug!(talk_id = id, "Talk canceled");

        Ok(())
    }

    /// Register the caller as a paid attendee.
    ///
    /// The attached `value` must cover the registration price exactly;
    /// underpayment fails with no state change, overpayment is returned
    /// through the receipt's `refund` field within the same operation.
    /// Re-registration is rejected.
    pub fn register(
        &mut self,
        caller: &Address,
        full_name: String,
        value: Decimal,
    ) -> Result<RegistrationReceipt> {
        if self.registrations.contains_key(caller) {
            return Err(Error::AlreadyRegistered(caller.clone()));
        }

        if value < self.price {
            return Err(Error::InsufficientPayment {
                required: self.price,
                provided: value,
            });
        }

        let refund = value - self.price;

        self.registrations.insert(caller.clone(), full_name.clone());
        self.custody += self.price;

        self.record(RegistryEvent::AttendeeRegistered {
            name: full_name.clone(),
        });

        tracing::debug!(attendee = %caller, %refund, "Attendee registered");

        Ok(RegistrationReceipt {
            refund,
            paid: self.price,
        })
    }

    /// Withdraw custodied funds. Owner-only; bounded by the custody balance.
    ///
    /// Returns the released amount.
    pub fn withdraw(&mut self, caller: &Address, amount: Decimal) -> Result<Decimal> {
        self.require_owner(caller)?;

        if amount > self.custody {
            return Err(Error::InsufficientFunds {
                available: self.custody,
                requested: amount,
            });
        }

        self.custody -= amount;
        self.record(RegistryEvent::FundsWithdrawn { amount });

        tracing::info!(%amount, remaining = %self.custody, "Funds withdrawn");

        Ok(amount)
    }

    // Queries

    /// Count of talks ever added, canceled ones included.
    pub fn number_of_talks(&self) -> u64 {
        self.talks.len() as u64
    }

    /// Full talk snapshot; fails on ids outside `[1, count]`.
    pub fn talk(&self, id: TalkId) -> Result<Talk> {
        self.talk_ref(id).cloned()
    }

    /// Talk ids the given speaker appears in, in add order. Possibly empty.
    pub fn talks_per_speaker(&self, speaker: &Address) -> Vec<TalkId> {
        self.speaker_index.get(speaker).cloned().unwrap_or_default()
    }

    /// Fresh filtered scan over all talk ids. No caching between calls.
    pub fn talk_ids(&self, canceled_only: bool) -> Vec<TalkId> {
        self.iter_talks()
            .filter(|t| t.canceled == canceled_only)
            .map(|t| t.id)
            .collect()
    }

    /// Restartable iterator over all talks in id order.
    pub fn iter_talks(&self) -> impl Iterator<Item = &Talk> {
        self.talks.iter()
    }

    /// Cancellation status; fails on unknown ids.
    pub fn is_talk_canceled(&self, id: TalkId) -> Result<bool> {
        Ok(self.talk_ref(id)?.canceled)
    }

    /// Whether the address holds a registration.
    pub fn is_registered(&self, attendee: &Address) -> bool {
        self.registrations.contains_key(attendee)
    }

    /// Stored full name for a registered attendee.
    pub fn attendee_name(&self, attendee: &Address) -> Option<String> {
        self.registrations.get(attendee).cloned()
    }

    /// Current custody balance.
    pub fn custody_balance(&self) -> Decimal {
        self.custody
    }

    /// Snapshot of the notification log.
    pub fn events(&self) -> Vec<EventRecord> {
        self.events.clone()
    }

    fn talk_ref(&self, id: TalkId) -> Result<&Talk> {
        if id == 0 {
            return Err(Error::TalkNotFound(id));
        }
        self.talks
            .get(id as usize - 1)
            .ok_or(Error::TalkNotFound(id))
    }

    fn talk_mut(&mut self, id: TalkId) -> Result<&mut Talk> {
        if id == 0 {
            return Err(Error::TalkNotFound(id));
        }
        self.talks
            .get_mut(id as usize - 1)
            .ok_or(Error::TalkNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::new("owner")
    }

    fn price() -> Decimal {
        Decimal::new(18, 1) // 1.8
    }

    fn test_state() -> RegistryState {
        RegistryState::new(owner(), price())
    }

    fn add_simple_talk(state: &mut RegistryState, title: &str) -> TalkId {
        state
            .add_talk(
                &owner(),
                title.to_string(),
                "Room 1".to_string(),
                100,
                200,
                vec![Address::new("spk-a")],
                vec!["John Doe".to_string()],
            )
            .unwrap()
    }

    #[test]
    fn test_empty_registry() {
        let state = test_state();
        assert_eq!(state.number_of_talks(), 0);
        assert_eq!(state.custody_balance(), Decimal::ZERO);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_sequential_ids() {
        let mut state = test_state();
        assert_eq!(add_simple_talk(&mut state, "Talk 1"), 1);
        assert_eq!(add_simple_talk(&mut state, "Talk 2"), 2);
        assert_eq!(add_simple_talk(&mut state, "Talk 3"), 3);
        assert_eq!(state.number_of_talks(), 3);
    }

    #[test]
    fn test_add_talk_requires_owner() {
        let mut state = test_state();
        let result = state.add_talk(
            &Address::new("mallory"),
            "Talk 1".to_string(),
            "Room 1".to_string(),
            100,
            200,
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(Error::Unauthorized(_))));
        assert_eq!(state.number_of_talks(), 0);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_add_talk_rejects_mismatched_speaker_arrays() {
        let mut state = test_state();
        let result = state.add_talk(
            &owner(),
            "Talk 1".to_string(),
            "Room 1".to_string(),
            100,
            200,
            vec![Address::new("spk-a"), Address::new("spk-b")],
            vec!["John Doe".to_string()],
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(state.number_of_talks(), 0);
        assert!(state.talks_per_speaker(&Address::new("spk-a")).is_empty());
    }

    #[test]
    fn test_speaker_index_insertion_order() {
        let mut state = test_state();

        state
            .add_talk(
                &owner(),
                "Talk 1".to_string(),
                "Room 1".to_string(),
                100,
                200,
                vec![Address::new("spk-a"), Address::new("spk-b")],
                vec!["John Doe".to_string(), "Claire Smith".to_string()],
            )
            .unwrap();
        state
            .add_talk(
                &owner(),
                "Talk 2".to_string(),
                "Room 2".to_string(),
                100,
                200,
                vec![Address::new("spk-b")],
                vec!["Claire Smith".to_string()],
            )
            .unwrap();
        state
            .add_talk(
                &owner(),
                "Talk 3".to_string(),
                "Room 3".to_string(),
                300,
                400,
                vec![Address::new("spk-a")],
                vec!["John Doe".to_string()],
            )
            .unwrap();

        assert_eq!(state.talks_per_speaker(&Address::new("spk-a")), vec![1, 3]);
        assert_eq!(state.talks_per_speaker(&Address::new("spk-b")), vec![1, 2]);
        assert!(state.talks_per_speaker(&Address::new("nobody")).is_empty());
    }

    #[test]
    fn test_cancel_talk() {
        let mut state = test_state();
        add_simple_talk(&mut state, "Talk 1");
        add_simple_talk(&mut state, "Talk 2");

        state.cancel_talk(&owner(), 2).unwrap();
        assert!(state.is_talk_canceled(2).unwrap());
        assert!(!state.is_talk_canceled(1).unwrap());

        // Second cancel fails, flag stays set
        let result = state.cancel_talk(&owner(), 2);
        assert!(matches!(result, Err(Error::AlreadyCanceled(2))));
        assert!(state.is_talk_canceled(2).unwrap());
    }

    #[test]
    fn test_cancel_does_not_compact_speaker_index() {
        let mut state = test_state();
        add_simple_talk(&mut state, "Talk 1");
        state.cancel_talk(&owner(), 1).unwrap();
        assert_eq!(state.talks_per_speaker(&Address::new("spk-a")), vec![1]);
    }

    #[test]
    fn test_cancel_unknown_talk() {
        let mut state = test_state();
        assert!(matches!(
            state.cancel_talk(&owner(), 1),
            Err(Error::TalkNotFound(1))
        ));
        assert!(matches!(
            state.cancel_talk(&owner(), 0),
            Err(Error::TalkNotFound(0))
        ));
    }

    #[test]
    fn test_talk_ids_partition() {
        let mut state = test_state();
        for i in 1..=4 {
            add_simple_talk(&mut state, &format!("Talk {}", i));
        }
        state.cancel_talk(&owner(), 2).unwrap();
        state.cancel_talk(&owner(), 4).unwrap();

        assert_eq!(state.talk_ids(true), vec![2, 4]);
        assert_eq!(state.talk_ids(false), vec![1, 3]);
    }

    #[test]
    fn test_register_exact_payment() {
        let mut state = test_state();
        let attendee = Address::new("att-1");

        let receipt = state
            .register(&attendee, "Rick Deckard".to_string(), price())
            .unwrap();
        assert_eq!(receipt.refund, Decimal::ZERO);
        assert_eq!(receipt.paid, price());
        assert!(state.is_registered(&attendee));
        assert_eq!(state.attendee_name(&attendee).unwrap(), "Rick Deckard");
        assert_eq!(state.custody_balance(), price());
    }

    #[test]
    fn test_register_underpayment_reverts() {
        let mut state = test_state();
        let attendee = Address::new("att-1");
        let short = price() - Decimal::new(5, 1); // price - 0.5

        let result = state.register(&attendee, "Rick Deckard".to_string(), short);
        assert!(matches!(result, Err(Error::InsufficientPayment { .. })));
        assert!(!state.is_registered(&attendee));
        assert_eq!(state.custody_balance(), Decimal::ZERO);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_register_overpayment_refunds_change() {
        let mut state = test_state();
        let attendee = Address::new("att-1");
        let value = price() + Decimal::new(7, 1); // price + 0.7

        let receipt = state
            .register(&attendee, "Rick Deckard".to_string(), value)
            .unwrap();
        assert_eq!(receipt.refund, Decimal::new(7, 1));
        assert_eq!(state.custody_balance(), price());
    }

    #[test]
    fn test_register_twice_rejected() {
        let mut state = test_state();
        let attendee = Address::new("att-1");

        state
            .register(&attendee, "Rick Deckard".to_string(), price())
            .unwrap();
        let result = state.register(&attendee, "R. Deckard".to_string(), price());
        assert!(matches!(result, Err(Error::AlreadyRegistered(_))));

        // First registration untouched
        assert_eq!(state.attendee_name(&attendee).unwrap(), "Rick Deckard");
        assert_eq!(state.custody_balance(), price());
    }

    #[test]
    fn test_withdraw() {
        let mut state = test_state();
        state
            .register(&Address::new("att-1"), "Rick Deckard".to_string(), price())
            .unwrap();
        state
            .register(
                &Address::new("att-2"),
                "Niander Wallace".to_string(),
                price(),
            )
            .unwrap();

        let released = state.withdraw(&owner(), price()).unwrap();
        assert_eq!(released, price());
        assert_eq!(state.custody_balance(), price());
    }

    #[test]
    fn test_withdraw_requires_owner() {
        let mut state = test_state();
        state
            .register(&Address::new("att-1"), "Rick Deckard".to_string(), price())
            .unwrap();

        let result = state.withdraw(&Address::new("att-1"), price());
        assert!(matches!(result, Err(Error::Unauthorized(_))));
        assert_eq!(state.custody_balance(), price());
    }

    #[test]
    fn test_withdraw_bounded_by_custody() {
        let mut state = test_state();
        let result = state.withdraw(&owner(), Decimal::ONE);
        assert!(matches!(result, Err(Error::InsufficientFunds { .. })));
        assert_eq!(state.custody_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_event_log_order() {
        let mut state = test_state();
        add_simple_talk(&mut state, "Talk 1");
        state.cancel_talk(&owner(), 1).unwrap();
        state
            .register(&Address::new("att-1"), "Rick Deckard".to_string(), price())
            .unwrap();

        let events = state.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].seq, 0);
        assert!(matches!(events[0].event, RegistryEvent::TalkAdded { id: 1, .. }));
        assert!(matches!(
            events[1].event,
            RegistryEvent::TalkCanceled { id: 1, .. }
        ));
        assert!(matches!(
            events[2].event,
            RegistryEvent::AttendeeRegistered { ref name } if name == "Rick Deckard"
        ));
    }
}
