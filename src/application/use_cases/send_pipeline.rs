//! Delivery of send outcomes to the conversation that owns the messages.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::entities::{History, HistoryEvent};
use crate::domain::services::SendOutcome;

/// Worker that settles provisional messages as send outcomes arrive.
///
/// Outcomes are applied one at a time on the worker's task, which owns the
/// conversation; events produced by each outcome are forwarded in order.
pub struct SendPipeline {
    history: History,
    outcome_rx: mpsc::UnboundedReceiver<SendOutcome>,
    event_tx: mpsc::UnboundedSender<HistoryEvent>,
    observer_gone: bool,
}

impl SendPipeline {
    #[must_use]
    pub const fn new(
        history: History,
        outcome_rx: mpsc::UnboundedReceiver<SendOutcome>,
        event_tx: mpsc::UnboundedSender<HistoryEvent>,
    ) -> Self {
        Self {
            history,
            outcome_rx,
            event_tx,
            observer_gone: false,
        }
    }

    /// Runs until every outcome sender is dropped, then hands the
    /// conversation back.
    pub async fn run(mut self) -> History {
        info!(peer = %self.history.id(), "Send pipeline started");
        while let Some(outcome) = self.outcome_rx.recv().await {
            self.handle_outcome(outcome);
        }
        let delayed = self.history.flush_delayed_events();
        self.forward(delayed);
        info!(peer = %self.history.id(), "Send pipeline stopped");
        self.history
    }

    fn handle_outcome(&mut self, outcome: SendOutcome) {
        let local_id = outcome.local_id();
        match self.history.item(local_id) {
            None => {
                warn!(id = %local_id, "Send outcome for unknown message");
                return;
            }
            Some(item) if !item.is_sending() => {
                warn!(id = %local_id, state = %item.send_state(), "Send outcome for settled message");
                return;
            }
            Some(_) => {}
        }
        match outcome.apply(&mut self.history) {
            Ok(()) => {
                let events = self.history.take_events();
                debug!(id = %local_id, count = events.len(), "Send outcome applied");
                self.forward(events);
            }
            Err(e) => {
                warn!(id = %local_id, error = %e, "Failed to apply send outcome");
            }
        }
    }

    /// Outcomes keep being applied after the observer hangs up; only
    /// forwarding stops.
    fn forward(&mut self, events: Vec<HistoryEvent>) {
        if self.observer_gone {
            return;
        }
        for event in events {
            if self.event_tx.send(event).is_err() {
                warn!(peer = %self.history.id(), "Event receiver dropped, no longer forwarding events");
                self.observer_gone = true;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        ChannelInfo, HistoryItem, MessageFlags, MsgId, Peer, PeerKind, PeerUpdate, SendState,
    };

    fn channel_with_pending(ids: &[i64]) -> History {
        let mut history = History::new(Peer::new(
            40_u64,
            "Updates",
            PeerKind::Channel(ChannelInfo::default()),
        ));
        for id in ids {
            let item = HistoryItem::new(
                history.id(),
                MsgId(*id),
                MessageFlags::OUT | MessageFlags::SENDING,
                100,
                None,
            )
            .with_text("queued".into());
            history.add_item(item).unwrap();
        }
        history.take_events();
        history
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<HistoryEvent>) -> Vec<HistoryEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_outcomes_are_applied_in_order() {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let pipeline = SendPipeline::new(channel_with_pending(&[-5, -17]), outcome_rx, event_tx);
        let worker = tokio::spawn(pipeline.run());

        outcome_tx
            .send(SendOutcome::Delivered {
                local_id: MsgId(-5),
                server_id: MsgId(9001),
            })
            .unwrap();
        outcome_tx
            .send(SendOutcome::Failed {
                local_id: MsgId(-17),
            })
            .unwrap();
        drop(outcome_tx);

        let history = worker.await.unwrap();
        assert_eq!(
            history.item(MsgId(9001)).map(HistoryItem::send_state),
            Some(SendState::Confirmed)
        );
        assert_eq!(
            history.item(MsgId(-17)).map(HistoryItem::send_state),
            Some(SendState::Failed)
        );
        assert!(!history.is_local_registered(MsgId(-5)));

        let events = drain(&mut event_rx);
        assert_eq!(
            events.first(),
            Some(&HistoryEvent::ItemIdChanged {
                old_id: MsgId(-5),
                new_id: MsgId(9001),
            })
        );
        assert_eq!(
            events.last(),
            Some(&HistoryEvent::PeerUpdated {
                peer: history.id(),
                update: PeerUpdate::ChannelLocalMessages,
            })
        );
    }

    #[tokio::test]
    async fn test_stale_and_unknown_outcomes_are_skipped() {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let pipeline = SendPipeline::new(channel_with_pending(&[-5]), outcome_rx, event_tx);

        for outcome in [
            SendOutcome::Delivered {
                local_id: MsgId(-5),
                server_id: MsgId(10),
            },
            SendOutcome::Failed {
                local_id: MsgId(-5),
            },
            SendOutcome::Failed {
                local_id: MsgId(-99),
            },
        ] {
            outcome_tx.send(outcome).unwrap();
        }
        drop(outcome_tx);

        let history = pipeline.run().await;
        assert_eq!(
            history.item(MsgId(10)).map(HistoryItem::send_state),
            Some(SendState::Confirmed)
        );
        let events = drain(&mut event_rx);
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_outcomes_still_applied_after_receiver_dropped() {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        drop(event_rx);
        let pipeline = SendPipeline::new(channel_with_pending(&[-5, -17]), outcome_rx, event_tx);

        outcome_tx
            .send(SendOutcome::Delivered {
                local_id: MsgId(-5),
                server_id: MsgId(9001),
            })
            .unwrap();
        outcome_tx
            .send(SendOutcome::Failed {
                local_id: MsgId(-17),
            })
            .unwrap();
        drop(outcome_tx);

        let history = pipeline.run().await;
        assert_eq!(
            history.item(MsgId(9001)).map(HistoryItem::send_state),
            Some(SendState::Confirmed)
        );
        assert_eq!(
            history.item(MsgId(-17)).map(HistoryItem::send_state),
            Some(SendState::Failed)
        );
        assert_eq!(history.pending_delayed_events().count(), 0);
    }
}
