//! Drives catalogue actions through a [`Transport`] and feeds their
//! completions back into the [`ViewState`].
//!
//! Requests run as tokio tasks; completions travel over an unbounded channel
//! and are applied by whoever owns the dispatcher (the UI loop or the one-shot
//! command), so view state is only ever touched from one place. At most one
//! request is outstanding: triggers while pending are rejected.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::catalogue::ActionKind;
use crate::client::Transport;
use crate::view::{FormFields, Outcome, Ticket, ViewEvent, ViewState};

/// Reason a trigger was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("\"{pending}\" is still in flight")]
    InFlight { pending: ActionKind },
}

#[derive(Debug)]
struct Completion {
    ticket: Ticket,
    outcome: Outcome,
}

pub struct Dispatcher<T: Transport> {
    transport: T,
    state: ViewState,
    next_ticket: Ticket,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    task: Option<JoinHandle<()>>,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            transport,
            state: ViewState::new(),
            next_ticket: 1,
            tx,
            rx,
            task: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Starts `kind` with the current form values.
    ///
    /// The view moves to pending synchronously; the request itself runs on
    /// the ambient tokio runtime, so this must be called from within one.
    ///
    /// # Errors
    ///
    /// [`DispatchError::InFlight`] if another request has not settled yet.
    pub fn trigger(&mut self, kind: ActionKind, form: &FormFields) -> Result<Ticket, DispatchError> {
        if let Some(pending) = self.state.pending() {
            log::warn!("ignoring {kind}: {} is still in flight", pending.action);
            return Err(DispatchError::InFlight {
                pending: pending.action,
            });
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let request = kind.bind(form).request();
        log::info!("#{ticket} {kind}: {} {}", request.method, request.path);

        self.apply(ViewEvent::Triggered {
            ticket,
            action: kind,
        });

        let transport = self.transport.clone();
        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(async move {
            let outcome = transport.execute(request).await.map_err(|e| e.to_string());
            // The receiver lives as long as the dispatcher.
            let _ = tx.send(Completion { ticket, outcome });
        }));
        Ok(ticket)
    }

    /// Applies every completion that has already arrived, without waiting.
    ///
    /// Returns the number of completions consumed.
    pub fn poll_completions(&mut self) -> usize {
        let mut count = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.complete(completion);
            count += 1;
        }
        count
    }

    /// Waits until the outstanding request (if any) has settled.
    pub async fn settle(&mut self) {
        while self.state.is_in_flight() {
            match self.rx.recv().await {
                Some(completion) => self.complete(completion),
                None => break,
            }
        }
    }

    /// Aborts the outstanding request. Returns `false` if nothing was pending.
    ///
    /// The aborted request writes neither result nor error.
    pub fn cancel(&mut self) -> bool {
        let Some(pending) = self.state.pending() else {
            return false;
        };
        if let Some(task) = self.task.take() {
            task.abort();
        }
        log::info!("#{} {} cancelled", pending.ticket, pending.action);
        self.apply(ViewEvent::Cancelled {
            ticket: pending.ticket,
        });
        true
    }

    fn complete(&mut self, completion: Completion) {
        match &completion.outcome {
            Ok(_) => log::info!("#{} settled", completion.ticket),
            Err(message) => log::info!("#{} failed: {message}", completion.ticket),
        }
        self.apply(ViewEvent::Completed {
            ticket: completion.ticket,
            outcome: completion.outcome,
        });
    }

    fn apply(&mut self, event: ViewEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(event);
    }
}

impl<T: Transport> Drop for Dispatcher<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::testing::RecordingTransport;
    use crate::client::{ActionResult, Method, RequestError};
    use crate::view::Phase;

    #[tokio::test]
    async fn parameterless_action_issues_one_request_without_body() {
        let transport = RecordingTransport::default();
        let mut dispatcher = Dispatcher::new(transport.clone());

        dispatcher
            .trigger(ActionKind::RunN2Contingencies, &FormFields::default())
            .unwrap();
        assert_eq!(dispatcher.state().phase(), Phase::Pending);
        dispatcher.settle().await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/run-n2-contingencies");
        assert!(requests[0].body.is_none());
        assert_eq!(dispatcher.state().phase(), Phase::Settled);
    }

    #[tokio::test]
    async fn success_sets_result_and_clears_error() {
        let transport = RecordingTransport::default();
        transport.reply(Err(RequestError::new(400, "X")));
        transport.reply(Ok(ActionResult::new(json!({"status": "ok"}))));
        let mut dispatcher = Dispatcher::new(transport);
        let form = FormFields::default();

        dispatcher.trigger(ActionKind::LineRating, &form).unwrap();
        dispatcher.settle().await;
        assert_eq!(dispatcher.state().last_error(), Some("X"));
        assert!(dispatcher.state().last_result().is_none());

        dispatcher.trigger(ActionKind::LineRating, &form).unwrap();
        dispatcher.settle().await;
        assert!(dispatcher.state().last_error().is_none());
        assert_eq!(
            dispatcher.state().last_result().map(ActionResult::as_value),
            Some(&json!({"status": "ok"}))
        );
    }

    #[tokio::test]
    async fn reentrant_trigger_is_rejected() {
        let transport = RecordingTransport::default();
        let mut dispatcher = Dispatcher::new(transport.clone());
        let form = FormFields::default();

        let first = dispatcher.trigger(ActionKind::Matching, &form).unwrap();
        let second = dispatcher.trigger(ActionKind::Simulation, &form);
        assert_eq!(
            second,
            Err(DispatchError::InFlight {
                pending: ActionKind::Matching
            })
        );

        dispatcher.settle().await;
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(dispatcher.state().shown_action(), Some(ActionKind::Matching));

        let third = dispatcher.trigger(ActionKind::Simulation, &form).unwrap();
        assert!(third > first);
    }

    #[tokio::test]
    async fn poll_completions_applies_arrived_results() {
        let transport = RecordingTransport::default();
        transport.reply(Ok(ActionResult::new(json!({"status": "ok"}))));
        let mut dispatcher = Dispatcher::new(transport);

        dispatcher
            .trigger(ActionKind::GeneratorControl, &FormFields::default())
            .unwrap();
        let mut applied = 0;
        for _ in 0..50 {
            tokio::task::yield_now().await;
            applied += dispatcher.poll_completions();
            if applied > 0 {
                break;
            }
        }
        assert_eq!(applied, 1);
        assert_eq!(dispatcher.state().phase(), Phase::Settled);
    }

    #[tokio::test]
    async fn cancel_leaves_no_result() {
        let transport = RecordingTransport::default();
        transport.reply(Ok(ActionResult::new(json!({"late": true}))));
        let mut dispatcher = Dispatcher::new(transport);

        dispatcher
            .trigger(ActionKind::Simulation, &FormFields::default())
            .unwrap();
        assert!(dispatcher.cancel());
        assert!(!dispatcher.cancel());

        tokio::task::yield_now().await;
        dispatcher.poll_completions();
        assert_eq!(dispatcher.state().phase(), Phase::Idle);
        assert!(dispatcher.state().last_result().is_none());
    }

    #[tokio::test]
    async fn item_list_body_reaches_transport() {
        let transport = RecordingTransport::default();
        let mut dispatcher = Dispatcher::new(transport.clone());
        let form = FormFields {
            items: "relay_a relay_b".to_string(),
            ..FormFields::default()
        };

        dispatcher
            .trigger(ActionKind::RemoveOvercurrentRelay, &form)
            .unwrap();
        dispatcher.settle().await;

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Delete);
        assert_eq!(requests[0].path, "/overcurrent-relay");
        assert_eq!(
            requests[0].body,
            Some(json!({"items": ["relay_a", "relay_b"]}))
        );
    }
}
