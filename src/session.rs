//! Session orchestration: which group is open, whether it is waiting for
//! its password, and the time the board was last refreshed.
//!
//! ```text
//! NoGroupSelected --select(g), unlocked--------> GroupActive(g)
//! NoGroupSelected --select(g), locked----------> AwaitingSecret(g)
//! AwaitingSecret(g) --submit(correct)----------> GroupActive(g)
//! AwaitingSecret(g) --submit(wrong)------------> AwaitingSecret(g)
//! AwaitingSecret(g) --cancel-------------------> NoGroupSelected
//! GroupActive(g) --deselect--------------------> NoGroupSelected
//! GroupActive(g) --tick/refresh(now)-----------> GroupActive(g), resolved at now
//! ```
//!
//! Ticks outside `GroupActive` record the time but resolve nothing.

use crate::access::{AccessState, WrongSecret};
use crate::data::Dataset;
use crate::group::{Group, GroupCard};
use crate::resolver::{resolve, Resolution};
use chrono::NaiveDateTime;
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoGroupSelected,
    AwaitingSecret { group_id: String },
    GroupActive { group_id: String },
}

/// Lifecycle of the password prompt, for the presentation layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Opened,
    ErrorShown,
    Closed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The group was open already and is now active.
    Entered,
    /// The group is locked; a password prompt is open.
    SecretRequired,
}

impl Selection {
    pub fn prompt_event(self) -> Option<PromptEvent> {
        match self {
            Selection::Entered => None,
            Selection::SecretRequired => Some(PromptEvent::Opened),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No group with id `{id}`")]
    UnknownGroup { id: String },
    #[error("No password prompt is open")]
    NoPendingPrompt,
    #[error(transparent)]
    WrongSecret(#[from] WrongSecret),
}

impl SessionError {
    pub fn prompt_event(&self) -> Option<PromptEvent> {
        match self {
            SessionError::WrongSecret(_) => Some(PromptEvent::ErrorShown),
            _ => None,
        }
    }
}

/// One running instance of the board.
///
/// Owns the loaded data and the access grants, so separate sessions never
/// share state.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    access: AccessState,
    state: SessionState,
    observed_time: NaiveDateTime,
}

impl Session {
    pub fn new(dataset: Dataset, now: NaiveDateTime) -> Session {
        Session {
            dataset,
            access: AccessState::new(),
            state: SessionState::NoGroupSelected,
            observed_time: now,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn access(&self) -> &AccessState {
        &self.access
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn observed_time(&self) -> NaiveDateTime {
        self.observed_time
    }

    pub fn active_group(&self) -> Option<&Group> {
        match &self.state {
            SessionState::GroupActive { group_id } => self.dataset.group(group_id),
            _ => None,
        }
    }

    /// The group a password prompt is open for.
    pub fn pending_group(&self) -> Option<&Group> {
        match &self.state {
            SessionState::AwaitingSecret { group_id } => self.dataset.group(group_id),
            _ => None,
        }
    }

    /// All groups, each marked locked or unlocked for this session.
    pub fn group_cards(&self) -> Vec<GroupCard<'_>> {
        self.dataset
            .groups
            .iter()
            .map(|g| GroupCard::new(g, !self.access.is_unlocked(g)))
            .collect()
    }

    /// Opens `group_id`, or asks for its password first when it is locked.
    /// Replaces whatever was selected before.
    pub fn select_group(&mut self, group_id: &str) -> Result<Selection, SessionError> {
        let group = self
            .dataset
            .group(group_id)
            .ok_or_else(|| SessionError::UnknownGroup {
                id: group_id.to_string(),
            })?;

        if self.access.is_unlocked(group) {
            info!("entering group {}", group_id);
            self.state = SessionState::GroupActive {
                group_id: group_id.to_string(),
            };
            Ok(Selection::Entered)
        } else {
            info!("group {} is locked, asking for password", group_id);
            self.state = SessionState::AwaitingSecret {
                group_id: group_id.to_string(),
            };
            Ok(Selection::SecretRequired)
        }
    }

    /// Checks `candidate` against the pending group's password. On success
    /// the prompt closes and the group becomes active; on failure the
    /// prompt stays open.
    pub fn submit_secret(&mut self, candidate: &str) -> Result<PromptEvent, SessionError> {
        let group_id = match &self.state {
            SessionState::AwaitingSecret { group_id } => group_id.clone(),
            _ => return Err(SessionError::NoPendingPrompt),
        };
        let group = self
            .dataset
            .group(&group_id)
            .ok_or_else(|| SessionError::UnknownGroup {
                id: group_id.clone(),
            })?;

        self.access.attempt_unlock(group, candidate)?;

        info!("entering group {}", group_id);
        self.state = SessionState::GroupActive { group_id };
        Ok(PromptEvent::Closed)
    }

    /// Closes an open password prompt without entering the group.
    pub fn cancel_prompt(&mut self) -> Option<PromptEvent> {
        match self.state {
            SessionState::AwaitingSecret { .. } => {
                debug!("password prompt cancelled");
                self.state = SessionState::NoGroupSelected;
                Some(PromptEvent::Closed)
            }
            _ => None,
        }
    }

    /// Back to the group list. Unlocked groups stay unlocked.
    pub fn deselect(&mut self) {
        if self.state != SessionState::NoGroupSelected {
            debug!("leaving {:?}", self.state);
        }
        self.state = SessionState::NoGroupSelected;
    }

    /// Periodic refresh. Records `now` and resolves the active group, if any.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<Resolution<'_>> {
        self.observed_time = now;
        self.resolution()
    }

    /// User-requested refresh. Same effect as a tick.
    pub fn manual_refresh(&mut self, now: NaiveDateTime) -> Option<Resolution<'_>> {
        debug!("manual refresh at {}", now);
        self.tick(now)
    }

    /// The active group resolved at the last observed time.
    pub fn resolution(&self) -> Option<Resolution<'_>> {
        self.active_group()
            .map(|group| resolve(group, &self.dataset.people, &self.observed_time))
    }
}
