//! Console application state: form editing, action selection and dispatch.

use crate::catalogue::ActionKind;
use crate::client::{ApiClient, Transport};
use crate::dispatch::Dispatcher;
use crate::view::{FormFields, ViewState};

/// Which part of the form receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Actions,
    SymType,
    LoadingLevel,
    RandomCases,
    Items,
}

impl Focus {
    /// Tab order.
    const ORDER: [Focus; 5] = [
        Focus::Actions,
        Focus::SymType,
        Focus::LoadingLevel,
        Focus::RandomCases,
        Focus::Items,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Whether the focused widget takes free text.
    pub fn is_text(self) -> bool {
        matches!(self, Self::LoadingLevel | Self::RandomCases | Self::Items)
    }
}

/// TUI application state.
pub struct App<T: Transport = ApiClient> {
    dispatcher: Dispatcher<T>,
    /// Current form values.
    pub form: FormFields,
    /// Index into [`ActionKind::ALL`].
    pub selected: usize,
    pub focus: Focus,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// Backend URL shown in the header.
    pub backend: String,
    /// Transient message, e.g. a rejected trigger.
    pub notice: Option<String>,
}

impl<T: Transport> App<T> {
    pub fn new(transport: T, form: FormFields, backend: impl Into<String>) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport),
            form,
            selected: 0,
            focus: Focus::Actions,
            quit: false,
            backend: backend.into(),
            notice: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        self.dispatcher.state()
    }

    pub fn is_in_flight(&self) -> bool {
        self.state().is_in_flight()
    }

    pub fn selected_action(&self) -> ActionKind {
        ActionKind::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < ActionKind::ALL.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Triggers the selected action with the current form values.
    ///
    /// Requires an entered tokio runtime.
    pub fn trigger_selected(&mut self) {
        let kind = self.selected_action();
        self.notice = match self.dispatcher.trigger(kind, &self.form) {
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        };
    }

    /// Applies completions that arrived since the last frame.
    pub fn poll_completions(&mut self) {
        self.dispatcher.poll_completions();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn toggle_sym_type(&mut self) {
        self.form.sym_type = self.form.sym_type.toggled();
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::LoadingLevel => Some(&mut self.form.loading_level),
            Focus::RandomCases => Some(&mut self.form.random_cases),
            Focus::Items => Some(&mut self.form.items),
            Focus::Actions | Focus::SymType => None,
        }
    }

    /// Appends a character to the focused text field.
    pub fn input_char(&mut self, c: char) {
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    /// Aborts any outstanding request before exit.
    pub fn shutdown(&mut self) {
        self.dispatcher.cancel();
    }
}
