//! State - 取得フローの状態
//!
//! # 状態遷移
//! ```text
//! Idle → ResolvingLocator → Transferring → Opening → Done
//!              │                 │            │
//!              └──────→ Failed ←─┴────────────┘
//! ResolvingLocator → Idle  (ユーザーがキャンセル)
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalState {
    Idle,
    ResolvingLocator,
    Transferring,
    Opening,
    Done,
    Failed,
}

impl RetrievalState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn can_advance_to(self, next: Self) -> bool {
        use RetrievalState::*;
        matches!(
            (self, next),
            (Idle, ResolvingLocator)
                | (ResolvingLocator, Idle)
                | (ResolvingLocator, Transferring)
                | (ResolvingLocator, Failed)
                | (Transferring, Opening)
                | (Transferring, Failed)
                | (Opening, Done)
                | (Opening, Failed)
        )
    }
}

impl fmt::Display for RetrievalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::ResolvingLocator => "resolving_locator",
            Self::Transferring => "transferring",
            Self::Opening => "opening",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::RetrievalState::{self, *};
    use rstest::rstest;

    #[rstest]
    #[case(Idle, ResolvingLocator)]
    #[case(ResolvingLocator, Idle)]
    #[case(ResolvingLocator, Transferring)]
    #[case(Transferring, Opening)]
    #[case(Opening, Done)]
    #[case(Transferring, Failed)]
    fn allowed_transitions(#[case] from: RetrievalState, #[case] to: RetrievalState) {
        assert!(from.can_advance_to(to));
    }

    #[rstest]
    #[case(Idle, Transferring)]
    #[case(Idle, Failed)]
    #[case(Transferring, Idle)]
    #[case(Done, Idle)]
    #[case(Failed, ResolvingLocator)]
    fn rejected_transitions(#[case] from: RetrievalState, #[case] to: RetrievalState) {
        assert!(!from.can_advance_to(to));
    }

    #[test]
    fn only_done_and_failed_are_terminal() {
        assert!(Done.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!Idle.is_terminal());
    }
}
