//! Console view state: form fields plus the response of the last action.
//!
//! [`ViewState`] is updated only through [`ViewState::transition`], a pure
//! function of the old state and a [`ViewEvent`].

use crate::catalogue::{ActionKind, SymType};
use crate::client::ActionResult;

/// Identifies one triggered request; completions carry it back.
pub type Ticket = u64;

/// Settled outcome of a request: the response, or the error message to show.
pub type Outcome = Result<ActionResult, String>;

/// Editable form values, kept as entered (numeric fields are coerced only
/// when an action is triggered).
#[derive(Debug, Clone, PartialEq)]
pub struct FormFields {
    /// Generator model for the sym-type action.
    pub sym_type: SymType,
    /// Shared by "set loading level" and "set initial generation level".
    pub loading_level: String,
    /// Number of random cases to generate.
    pub random_cases: String,
    /// Free-text relay item list, comma or whitespace separated.
    pub items: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            sym_type: SymType::Classical,
            loading_level: "1.0".to_string(),
            random_cases: "100".to_string(),
            items: String::new(),
        }
    }
}

/// Something that happened to the single outstanding request.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The user triggered `action`; the request is now in flight.
    Triggered { ticket: Ticket, action: ActionKind },
    /// The request resolved or failed.
    Completed { ticket: Ticket, outcome: Outcome },
    /// The request was aborted before completing.
    Cancelled { ticket: Ticket },
}

/// Coarse state of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing shown, nothing in flight.
    Idle,
    /// A request is outstanding.
    Pending,
    /// Exactly one of result/error is shown.
    Settled,
}

/// The in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    pub ticket: Ticket,
    pub action: ActionKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    last_result: Option<ActionResult>,
    last_error: Option<String>,
    pending: Option<Pending>,
    /// Action whose response is currently displayed.
    shown_action: Option<ActionKind>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Pending
        } else if self.last_result.is_some() || self.last_error.is_some() {
            Phase::Settled
        } else {
            Phase::Idle
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn last_result(&self) -> Option<&ActionResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn shown_action(&self) -> Option<ActionKind> {
        self.shown_action
    }

    /// Applies one event and returns the new state.
    ///
    /// * `Triggered` is ignored while another request is pending. Otherwise
    ///   the previous error is cleared at once and the previous result stays
    ///   visible until completion.
    /// * `Completed` and `Cancelled` are ignored unless their ticket matches
    ///   the pending one.
    /// * A successful completion sets the result and clears the error; a
    ///   failed one sets the error and clears the result.
    pub fn transition(self, event: ViewEvent) -> Self {
        match event {
            ViewEvent::Triggered { ticket, action } => {
                if self.pending.is_some() {
                    return self;
                }
                Self {
                    last_error: None,
                    pending: Some(Pending { ticket, action }),
                    ..self
                }
            }
            ViewEvent::Completed { ticket, outcome } => {
                let Some(pending) = self.pending.filter(|p| p.ticket == ticket) else {
                    return self;
                };
                let (last_result, last_error) = match outcome {
                    Ok(result) => (Some(result), None),
                    Err(message) => (None, Some(message)),
                };
                Self {
                    last_result,
                    last_error,
                    pending: None,
                    shown_action: Some(pending.action),
                }
            }
            ViewEvent::Cancelled { ticket } => {
                if self.pending.is_some_and(|p| p.ticket == ticket) {
                    Self {
                        pending: None,
                        ..self
                    }
                } else {
                    self
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ok(value: serde_json::Value) -> Outcome {
        Ok(ActionResult::new(value))
    }

    fn triggered(ticket: Ticket) -> ViewEvent {
        ViewEvent::Triggered {
            ticket,
            action: ActionKind::Matching,
        }
    }

    #[test]
    fn starts_idle() {
        let state = ViewState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.last_result().is_none());
        assert!(state.last_error().is_none());
        assert!(!state.is_in_flight());
    }

    #[test]
    fn trigger_then_success_settles_with_result() {
        let state = ViewState::new().transition(triggered(1));
        assert_eq!(state.phase(), Phase::Pending);

        let state = state.transition(ViewEvent::Completed {
            ticket: 1,
            outcome: ok(json!({"status": "ok"})),
        });
        assert_eq!(state.phase(), Phase::Settled);
        assert_eq!(
            state.last_result().map(ActionResult::as_value),
            Some(&json!({"status": "ok"}))
        );
        assert!(state.last_error().is_none());
        assert_eq!(state.shown_action(), Some(ActionKind::Matching));
    }

    #[test]
    fn failure_replaces_previous_result() {
        let state = ViewState::new()
            .transition(triggered(1))
            .transition(ViewEvent::Completed {
                ticket: 1,
                outcome: ok(json!({"status": "ok"})),
            })
            .transition(triggered(2));
        // Previous result stays visible while pending.
        assert!(state.last_result().is_some());

        let state = state.transition(ViewEvent::Completed {
            ticket: 2,
            outcome: Err("Not Found".to_string()),
        });
        assert_eq!(state.last_error(), Some("Not Found"));
        assert!(state.last_result().is_none());
        assert_eq!(state.phase(), Phase::Settled);
    }

    #[test]
    fn trigger_clears_previous_error_immediately() {
        let state = ViewState::new()
            .transition(triggered(1))
            .transition(ViewEvent::Completed {
                ticket: 1,
                outcome: Err("boom".to_string()),
            })
            .transition(triggered(2));
        assert!(state.last_error().is_none());
        assert_eq!(state.phase(), Phase::Pending);

        let state = state.transition(ViewEvent::Completed {
            ticket: 2,
            outcome: ok(json!({"status": "ok"})),
        });
        assert!(state.last_error().is_none());
        assert!(state.last_result().is_some());
    }

    #[test]
    fn second_trigger_while_pending_is_ignored() {
        let state = ViewState::new().transition(triggered(1)).transition(
            ViewEvent::Triggered {
                ticket: 2,
                action: ActionKind::Simulation,
            },
        );
        assert_eq!(
            state.pending(),
            Some(Pending {
                ticket: 1,
                action: ActionKind::Matching
            })
        );
    }

    #[test]
    fn stale_completion_is_ignored() {
        let state = ViewState::new().transition(triggered(3));
        let after = state.clone().transition(ViewEvent::Completed {
            ticket: 2,
            outcome: ok(json!({})),
        });
        assert_eq!(after, state);
    }

    #[test]
    fn cancel_drops_pending_without_writing() {
        let state = ViewState::new()
            .transition(triggered(1))
            .transition(ViewEvent::Cancelled { ticket: 1 });
        assert_eq!(state.phase(), Phase::Idle);

        // A late completion of the aborted request changes nothing.
        let state = state.transition(ViewEvent::Completed {
            ticket: 1,
            outcome: ok(json!({"late": true})),
        });
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn form_defaults() {
        let form = FormFields::default();
        assert_eq!(form.sym_type, SymType::Classical);
        assert_eq!(form.loading_level, "1.0");
        assert_eq!(form.random_cases, "100");
        assert!(form.items.is_empty());
    }
}
