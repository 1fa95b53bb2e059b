//! Actor-based concurrency for the registry
//!
//! The original host serialized every mutation for free; on a multi-threaded
//! runtime that guarantee is reproduced with the single-writer pattern:
//! one Tokio task exclusively owns [`RegistryState`] and processes messages
//! from a bounded mailbox one at a time, so every operation commits entirely
//! before the next begins. Reads go through the same mailbox and therefore
//! always observe a fully committed state.

use crate::state::RegistryState;
use crate::types::{
    Address, EventRecord, RegistrationReceipt, Talk, TalkId,
};
use crate::{Error, Result};
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};

/// Message sent to the registry actor
pub enum RegistryMessage {
    /// Add a talk to the catalog
    AddTalk {
        caller: Address,
        title: String,
        location: String,
        start_time: i64,
        end_time: i64,
        speaker_addresses: Vec<Address>,
        speaker_names: Vec<String>,
        response: oneshot::Sender<Result<TalkId>>,
    },

    /// Cancel a talk
    CancelTalk {
        caller: Address,
        id: TalkId,
        response: oneshot::Sender<Result<()>>,
    },

    /// Register a paying attendee
    Register {
        caller: Address,
        full_name: String,
        value: Decimal,
        response: oneshot::Sender<Result<RegistrationReceipt>>,
    },

    /// Withdraw custodied funds
    Withdraw {
        caller: Address,
        amount: Decimal,
        response: oneshot::Sender<Result<Decimal>>,
    },

    /// Count of talks ever added
    NumberOfTalks {
        response: oneshot::Sender<u64>,
    },

    /// Full talk snapshot
    GetTalk {
        id: TalkId,
        response: oneshot::Sender<Result<Talk>>,
    },

    /// Talk ids for a speaker
    TalksPerSpeaker {
        speaker: Address,
        response: oneshot::Sender<Vec<TalkId>>,
    },

    /// Filtered scan over talk ids
    TalkIds {
        canceled_only: bool,
        response: oneshot::Sender<Vec<TalkId>>,
    },

    /// Cancellation status of a talk
    IsTalkCanceled {
        id: TalkId,
        response: oneshot::Sender<Result<bool>>,
    },

    /// Registration status of an address
    IsRegistered {
        attendee: Address,
        response: oneshot::Sender<bool>,
    },

    /// Current custody balance
    CustodyBalance {
        response: oneshot::Sender<Decimal>,
    },

    /// Snapshot of the notification log
    Events {
        response: oneshot::Sender<Vec<EventRecord>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes registry messages
pub struct RegistryActor {
    /// Exclusively owned state
    state: RegistryState,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<RegistryMessage>,
}

impl RegistryActor {
    /// Create new actor
    pub fn new(state: RegistryState, mailbox: mpsc::Receiver<RegistryMessage>) -> Self {
        Self { state, mailbox }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            if matches!(msg, RegistryMessage::Shutdown) {
                break;
            }
            self.handle_message(msg);
        }
        tracing::debug!("Registry actor stopped");
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: RegistryMessage) {
        match msg {
            RegistryMessage::AddTalk {
                caller,
                title,
                location,
                start_time,
                end_time,
                speaker_addresses,
                speaker_names,
                response,
            } => {
                let result = self.state.add_talk(
                    &caller,
                    title,
                    location,
                    start_time,
                    end_time,
                    speaker_addresses,
                    speaker_names,
                );
                let _ = response.send(result);
            }

            RegistryMessage::CancelTalk { caller, id, response } => {
                let _ = response.send(self.state.cancel_talk(&caller, id));
            }

            RegistryMessage::Register {
                caller,
                full_name,
                value,
                response,
            } => {
                let _ = response.send(self.state.register(&caller, full_name, value));
            }

            RegistryMessage::Withdraw {
                caller,
                amount,
                response,
            } => {
                let _ = response.send(self.state.withdraw(&caller, amount));
            }

            RegistryMessage::NumberOfTalks { response } => {
                let _ = response.send(self.state.number_of_talks());
            }

            RegistryMessage::GetTalk { id, response } => {
                let _ = response.send(self.state.talk(id));
            }

            RegistryMessage::TalksPerSpeaker { speaker, response } => {
                let _ = response.send(self.state.talks_per_speaker(&speaker));
            }

            RegistryMessage::TalkIds {
                canceled_only,
                response,
            } => {
                let _ = response.send(self.state.talk_ids(canceled_only));
            }

            RegistryMessage::IsTalkCanceled { id, response } => {
                let _ = response.send(self.state.is_talk_canceled(id));
            }

            RegistryMessage::IsRegistered { attendee, response } => {
                let _ = response.send(self.state.is_registered(&attendee));
            }

            RegistryMessage::CustodyBalance { response } => {
                let _ = response.send(self.state.custody_balance());
            }

            RegistryMessage::Events { response } => {
                let _ = response.send(self.state.events());
            }

            RegistryMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone)]
pub struct RegistryHandle {
    sender: mpsc::Sender<RegistryMessage>,
}

impl RegistryHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<RegistryMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        msg: RegistryMessage,
        rx: oneshot::Receiver<T>,
    ) -> Result<T> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Add a talk
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
        let (tx, rx) = oneshot::channel();
        self.request(
            RegistryMessage::AddTalk {
                caller,
                title,
                location,
                start_time,
                end_time,
                speaker_addresses,
                speaker_names,
                response: tx,
            },
            rx,
        )
        .await?
    }

    /// Cancel a talk
    pub async fn cancel_talk(&self, caller: Address, id: TalkId) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.request(
            RegistryMessage::CancelTalk {
                caller,
                id,
                response: tx,
            },
            rx,
        )
        .await?
    }

    /// Register a paying attendee
    pub async fn register(
        &self,
        caller: Address,
        full_name: String,
        value: Decimal,
    ) -> Result<RegistrationReceipt> {
        let (tx, rx) = oneshot::channel();
        self.request(
            RegistryMessage::Register {
                caller,
                full_name,
                value,
                response: tx,
            },
            rx,
        )
        .await?
    }

    /// Withdraw custodied funds
    pub async fn withdraw(&self, caller: Address, amount: Decimal) -> Result<Decimal> {
        let (tx, rx) = oneshot::channel();
        self.request(
            RegistryMessage::Withdraw {
                caller,
                amount,
                response: tx,
            },
            rx,
        )
        .await?
    }

    /// Count of talks ever added
    pub async fn number_of_talks(&self) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.request(RegistryMessage::NumberOfTalks { response: tx }, rx)
            .await
    }

    /// Full talk snapshot
    pub async fn talk(&self, id: TalkId) -> Result<Talk> {
        let (tx, rx) = oneshot::channel();
        self.request(RegistryMessage::GetTalk { id, response: tx }, rx)
            .await?
    }

    /// Talk ids for a speaker
    pub async fn talks_per_speaker(&self, speaker: Address) -> Result<Vec<TalkId>> {
        let (tx, rx) = oneshot::channel();
        self.request(
            RegistryMessage::TalksPerSpeaker {
                speaker,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Filtered scan over talk ids
    pub async fn talk_ids(&self, canceled_only: bool) -> Result<Vec<TalkId>> {
        let (tx, rx) = oneshot::channel();
        self.request(
            RegistryMessage::TalkIds {
                canceled_only,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Cancellation status of a talk
    pub async fn is_talk_canceled(&self, id: TalkId) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.request(RegistryMessage::IsTalkCanceled { id, response: tx }, rx)
            .await?
    }

    /// Registration status of an address
    pub async fn is_registered(&self, attendee: Address) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.request(
            RegistryMessage::IsRegistered {
                attendee,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Current custody balance
    pub async fn custody_balance(&self) -> Result<Decimal> {
        let (tx, rx) = oneshot::channel();
        self.request(RegistryMessage::CustodyBalance { response: tx }, rx)
            .await
    }

    /// Snapshot of the notification log
    pub async fn events(&self) -> Result<Vec<EventRecord>> {
        let (tx, rx) = oneshot::channel();
        self.request(RegistryMessage::Events { response: tx }, rx)
            .await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(RegistryMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the registry actor
pub fn spawn_registry_actor(state: RegistryState, mailbox_capacity: usize) -> RegistryHandle {
    let (tx, rx) = mpsc::channel(mailbox_capacity); // Bounded channel for backpressure
    let actor = RegistryActor::new(state, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    RegistryHandle::new(tx)
}
