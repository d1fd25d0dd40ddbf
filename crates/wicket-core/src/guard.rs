//! Account lockout guard
//!
//! Pure decision logic for one authentication attempt: given the current
//! credential record and the outcome of password verification, produce the
//! verdict for the caller and the exact mutation to apply to the record.
//!
//! The guard never touches storage and never verifies passwords itself;
//! it consumes the verifier's boolean result. The caller must apply the
//! returned mutation and persist it in the same atomic store update that
//! read the record, so a verdict is never observable without its mutation.

use chrono::{DateTime, Utc};

use crate::policy::LockoutPolicy;
use crate::record::CredentialRecord;

/// Outcome of one authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Credentials verified, session issuance may proceed
    Accepted,
    /// Attempt rejected; the reason is internal-facing only
    Rejected(RejectionReason),
}

/// Why an attempt was rejected
///
/// Distinct variants exist for operators, logs, and tests. An
/// unauthenticated caller must only ever see [`RejectionReason::public_message`],
/// which is identical for every reason so account state cannot be probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The account is locked; nothing short of an administrative unlock
    /// changes that, so the record is left untouched
    AccountLocked,
    /// The password did not verify; the failure counter advances
    InvalidPassword,
}

impl RejectionReason {
    /// The one string an unauthenticated caller may be shown
    pub fn public_message(&self) -> &'static str {
        "invalid username or password"
    }
}

/// Exact field changes to apply to a record after one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMutation {
    /// A failed attempt was counted
    RecordFailure {
        login_attempts: u32,
        account_locked: bool,
    },
    /// A successful attempt clears the failure state
    RecordSuccess { last_login: DateTime<Utc> },
}

impl RecordMutation {
    /// Apply the mutation to a record in place
    pub fn apply(&self, record: &mut CredentialRecord) {
        match *self {
            RecordMutation::RecordFailure {
                login_attempts,
                account_locked,
            } => {
                record.login_attempts = login_attempts;
                record.account_locked = account_locked;
            }
            RecordMutation::RecordSuccess { last_login } => {
                record.login_attempts = 0;
                record.account_locked = false;
                record.last_login = Some(last_login);
            }
        }
    }
}

/// Evaluate one authentication attempt
///
/// Total over its inputs: every combination of record state and
/// verification result has a defined outcome.
///
/// - Locked records are terminal: the verdict is `Rejected(AccountLocked)`
///   with no mutation, regardless of whether the password was correct, so
///   repeated attempts against a locked account cannot change state.
/// - A mismatch advances the counter by exactly one and sets the lock once
///   the policy threshold is reached. The verdict on the attempt that trips
///   the lock is still `InvalidPassword`; the caller learns about the lock
///   on the next attempt.
/// - A match resets the counter and lock and stamps `last_login`.
pub fn evaluate(
    record: &CredentialRecord,
    policy: &LockoutPolicy,
    password_matches: bool,
    now: DateTime<Utc>,
) -> (Verdict, Option<RecordMutation>) {
    if record.account_locked {
        return (Verdict::Rejected(RejectionReason::AccountLocked), None);
    }

    if !password_matches {
        let login_attempts = record.login_attempts + 1;
        let mutation = RecordMutation::RecordFailure {
            login_attempts,
            account_locked: policy.locks_at(login_attempts),
        };
        return (
            Verdict::Rejected(RejectionReason::InvalidPassword),
            Some(mutation),
        );
    }

    let mutation = RecordMutation::RecordSuccess { last_login: now };
    (Verdict::Accepted, Some(mutation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(login_attempts: u32, account_locked: bool) -> CredentialRecord {
        CredentialRecord {
            password_hash: "$argon2id$stub".to_string(),
            login_attempts,
            account_locked,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    fn apply(record: &mut CredentialRecord, mutation: Option<RecordMutation>) {
        if let Some(m) = mutation {
            m.apply(record);
        }
    }

    #[test]
    fn test_first_failure_counts() {
        let mut record = record_with(0, false);
        let (verdict, mutation) =
            evaluate(&record, &LockoutPolicy::default(), false, Utc::now());

        assert_eq!(verdict, Verdict::Rejected(RejectionReason::InvalidPassword));
        apply(&mut record, mutation);
        assert_eq!(record.login_attempts, 1);
        assert!(!record.account_locked);
    }

    #[test]
    fn test_fifth_failure_locks_but_reports_invalid_password() {
        let mut record = record_with(4, false);
        let (verdict, mutation) =
            evaluate(&record, &LockoutPolicy::default(), false, Utc::now());

        // The tripping attempt is still reported as a bad password; the
        // lock surfaces on the next attempt.
        assert_eq!(verdict, Verdict::Rejected(RejectionReason::InvalidPassword));
        apply(&mut record, mutation);
        assert_eq!(record.login_attempts, 5);
        assert!(record.account_locked);
    }

    #[test]
    fn test_locked_account_rejects_correct_password_without_mutation() {
        let record = record_with(5, true);
        let (verdict, mutation) =
            evaluate(&record, &LockoutPolicy::default(), true, Utc::now());

        assert_eq!(verdict, Verdict::Rejected(RejectionReason::AccountLocked));
        assert!(mutation.is_none());
    }

    #[test]
    fn test_locked_account_is_terminal_for_failures_too() {
        let mut record = record_with(5, true);
        let before = record.clone();

        for _ in 0..10 {
            let (verdict, mutation) =
                evaluate(&record, &LockoutPolicy::default(), false, Utc::now());
            assert_eq!(verdict, Verdict::Rejected(RejectionReason::AccountLocked));
            apply(&mut record, mutation);
        }

        assert_eq!(record, before);
    }

    #[test]
    fn test_success_resets_counter_and_stamps_last_login() {
        let mut record = record_with(3, false);
        let now = Utc::now();
        let (verdict, mutation) = evaluate(&record, &LockoutPolicy::default(), true, now);

        assert_eq!(verdict, Verdict::Accepted);
        apply(&mut record, mutation);
        assert_eq!(record.login_attempts, 0);
        assert!(!record.account_locked);
        assert_eq!(record.last_login, Some(now));
    }

    #[test]
    fn test_rejections_share_one_public_message() {
        assert_eq!(
            RejectionReason::AccountLocked.public_message(),
            RejectionReason::InvalidPassword.public_message()
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// One failure advances the counter by exactly one, and the lock
            /// engages exactly when the threshold is reached.
            #[test]
            fn failure_counting_is_monotonic(attempts in 0u32..64) {
                let mut record = record_with(attempts, false);
                let (verdict, mutation) =
                    evaluate(&record, &LockoutPolicy::default(), false, Utc::now());

                prop_assert_eq!(
                    verdict,
                    Verdict::Rejected(RejectionReason::InvalidPassword)
                );
                apply(&mut record, mutation);
                prop_assert_eq!(record.login_attempts, attempts + 1);
                prop_assert_eq!(record.account_locked, attempts + 1 >= 5);
            }

            /// Success from any non-locked state clears the failure state.
            #[test]
            fn success_always_resets(attempts in 0u32..5) {
                let mut record = record_with(attempts, false);
                let (verdict, mutation) =
                    evaluate(&record, &LockoutPolicy::default(), true, Utc::now());

                prop_assert_eq!(verdict, Verdict::Accepted);
                apply(&mut record, mutation);
                prop_assert_eq!(record.login_attempts, 0);
                prop_assert!(!record.account_locked);
                prop_assert!(record.last_login.is_some());
            }

            /// Locked records are never mutated, whatever the input.
            #[test]
            fn locked_is_idempotent(attempts in 5u32..64, matches: bool) {
                let record = record_with(attempts, true);
                let (verdict, mutation) =
                    evaluate(&record, &LockoutPolicy::default(), matches, Utc::now());

                prop_assert_eq!(
                    verdict,
                    Verdict::Rejected(RejectionReason::AccountLocked)
                );
                prop_assert!(mutation.is_none());
            }
        }
    }
}
