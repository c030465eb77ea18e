//! Transient, dismissible notice shown after a rolled-back mutation or a
//! completed account action.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use memberhub::{ContentError, MutationOutcome};

/// How long a notice stays up before dismissing itself.
pub const NOTICE_TTL_MS: u32 = 4_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoticeTone {
    #[default]
    Info,
    Error,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeState {
    pub message: Option<String>,
    pub tone: NoticeTone,
    /// Bumped on every `show` so a stale timer cannot dismiss a newer notice.
    pub seq: u64,
}

impl NoticeState {
    /// Show `message`, returning the sequence number the dismiss timer must
    /// present.
    pub fn show(&mut self, message: impl Into<String>, tone: NoticeTone) -> u64 {
        self.seq += 1;
        self.message = Some(message.into());
        self.tone = tone;
        self.seq
    }

    pub fn dismiss(&mut self) {
        self.message = None;
    }

    /// Dismiss only if no newer notice replaced the one numbered `seq`.
    pub fn expire(&mut self, seq: u64) {
        if self.seq == seq {
            self.dismiss();
        }
    }
}

/// Notice text for a mutation outcome, if it warrants one.
pub fn outcome_notice(action: &str, outcome: &MutationOutcome<ContentError>) -> Option<String> {
    match outcome {
        MutationOutcome::RolledBack(e) => Some(format!("Could not {action}: {}", e.message())),
        MutationOutcome::Committed | MutationOutcome::Blocked => None,
    }
}
