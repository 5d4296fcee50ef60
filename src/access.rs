use crate::group::Group;
use log::{info, warn};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Wrong password for group `{group_id}`")]
pub struct WrongSecret {
    pub group_id: String,
}

/// Successful outcome of [`AccessState::attempt_unlock`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unlocked {
    /// The secret matched and the group is now open for this session.
    Granted,
    /// The group has no secret; nothing needed unlocking.
    Public,
}

/// Groups unlocked so far in this session.
///
/// Lives only as long as its owner. Nothing is written anywhere, so a new
/// session starts with every secret-gated group locked again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessState {
    unlocked: BTreeSet<String>,
}

impl AccessState {
    pub fn new() -> AccessState {
        AccessState::default()
    }

    /// Public groups are always unlocked.
    pub fn is_unlocked(&self, group: &Group) -> bool {
        !group.requires_secret() || self.unlocked.contains(&group.id)
    }

    /// Compares `candidate` against the group's secret, exactly and
    /// case-sensitively. A match opens the group for the rest of the session.
    /// A mismatch changes nothing; there is no lockout and no back-off.
    ///
    /// # Examples
    /// ```
    /// use roster_board::access::{AccessState, Unlocked};
    /// use roster_board::group::Group;
    ///
    /// let group = Group::new("g2", "Night shift", "").with_secret("xyz");
    /// let mut access = AccessState::new();
    ///
    /// assert!(!access.is_unlocked(&group));
    /// assert!(access.attempt_unlock(&group, "XYZ").is_err());
    /// assert!(!access.is_unlocked(&group));
    ///
    /// assert_eq!(access.attempt_unlock(&group, "xyz"), Ok(Unlocked::Granted));
    /// assert!(access.is_unlocked(&group));
    /// ```
    pub fn attempt_unlock(&mut self, group: &Group, candidate: &str) -> Result<Unlocked, WrongSecret> {
        match &group.secret {
            None => Ok(Unlocked::Public),
            Some(secret) if secret.matches(candidate) => {
                if self.unlocked.insert(group.id.clone()) {
                    info!("group {} unlocked", group.id);
                }
                Ok(Unlocked::Granted)
            }
            Some(_) => {
                warn!("wrong password for group {}", group.id);
                Err(WrongSecret {
                    group_id: group.id.clone(),
                })
            }
        }
    }

    /// Number of groups unlocked by secret in this session.
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gated() -> Group {
        Group::new("g2", "Gated", "").with_secret("pass1")
    }

    #[test]
    fn unlocking_twice_records_the_group_once() {
        let group = gated();
        let mut access = AccessState::new();

        assert_eq!(access.attempt_unlock(&group, "pass1"), Ok(Unlocked::Granted));
        assert_eq!(access.attempt_unlock(&group, "pass1"), Ok(Unlocked::Granted));

        assert_eq!(access.unlocked_count(), 1);
        assert!(access.is_unlocked(&group));
    }

    #[test]
    fn secrets_are_case_sensitive() {
        let group = gated();
        let mut access = AccessState::new();

        assert_eq!(
            access.attempt_unlock(&group, "Pass1"),
            Err(WrongSecret {
                group_id: "g2".to_string()
            })
        );
        assert!(!access.is_unlocked(&group));
        assert_eq!(access.unlocked_count(), 0);
    }

    #[test]
    fn wrong_secret_after_unlock_keeps_the_grant() {
        let group = gated();
        let mut access = AccessState::new();

        access.attempt_unlock(&group, "pass1").unwrap();
        assert!(access.attempt_unlock(&group, "nope").is_err());
        assert!(access.is_unlocked(&group));
    }

    #[test]
    fn public_groups_need_no_unlock() {
        let group = Group::new("g1", "Open", "");
        let mut access = AccessState::new();

        assert!(access.is_unlocked(&group));
        assert_eq!(access.attempt_unlock(&group, "anything"), Ok(Unlocked::Public));
        assert_eq!(access.unlocked_count(), 0);
    }

    #[test]
    fn grants_are_per_group() {
        let a = Group::new("a", "", "").with_secret("same");
        let b = Group::new("b", "", "").with_secret("same");
        let mut access = AccessState::new();

        access.attempt_unlock(&a, "same").unwrap();
        assert!(access.is_unlocked(&a));
        assert!(!access.is_unlocked(&b));
    }

    #[test]
    fn fresh_state_is_isolated() {
        let group = gated();
        let mut first = AccessState::new();
        first.attempt_unlock(&group, "pass1").unwrap();

        assert!(!AccessState::new().is_unlocked(&group));
    }
}
