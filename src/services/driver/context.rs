//! Session Context
//!
//! The explicit per-session state the driver hands to each component: the
//! single live service handle and the run's output layout.

use ruling_core::RunLayout;

use crate::services::environment::ServiceHandle;

/// One live session. Created by `HarnessDriver::before_session` and
/// consumed by `HarnessDriver::after_session`.
#[derive(Debug)]
pub struct SessionContext {
    handle: ServiceHandle,
    layout: RunLayout,
}

impl SessionContext {
    pub fn new(handle: ServiceHandle, layout: RunLayout) -> Self {
        Self { handle, layout }
    }

    pub fn handle(&self) -> &ServiceHandle {
        &self.handle
    }

    pub fn layout(&self) -> &RunLayout {
        &self.layout
    }

    pub(crate) fn into_handle(self) -> ServiceHandle {
        self.handle
    }
}
