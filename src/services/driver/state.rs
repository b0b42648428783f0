//! Harness State Machine

use serde::{Deserialize, Serialize};

/// Where a ruling run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarnessState {
    Init,
    /// Service started and healthy
    EnvironmentUp,
    /// Workspace copied and project registered
    ProjectReady,
    /// Build returned an outcome, successful or not
    BuildRan,
    /// Comparator produced a report
    Compared,
    /// Run passed
    Done,
    /// Run stopped on a failure
    Aborted,
}

impl HarnessState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: HarnessState) -> bool {
        use HarnessState::*;
        match (self, next) {
            (Done, _) | (Aborted, _) => false,
            (_, Aborted) => true,
            (Init, EnvironmentUp)
            | (EnvironmentUp, ProjectReady)
            | (ProjectReady, BuildRan)
            | (BuildRan, Compared)
            | (Compared, Done) => true,
            _ => false,
        }
    }

    /// `Done` or `Aborted`; no transition leaves these.
    pub fn is_terminal(self) -> bool {
        matches!(self, HarnessState::Done | HarnessState::Aborted)
    }
}

impl std::fmt::Display for HarnessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarnessState::Init => write!(f, "INIT"),
            HarnessState::EnvironmentUp => write!(f, "ENVIRONMENT_UP"),
            HarnessState::ProjectReady => write!(f, "PROJECT_READY"),
            HarnessState::BuildRan => write!(f, "BUILD_RAN"),
            HarnessState::Compared => write!(f, "COMPARED"),
            HarnessState::Done => write!(f, "DONE"),
            HarnessState::Aborted => write!(f, "ABORTED"),
        }
    }
}
