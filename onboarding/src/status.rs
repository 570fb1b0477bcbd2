use std::future::Future;

use crate::util::{ClientError, Result};

/// Page-level feedback: inline message, loading flag, error flag and an
/// optional blocking alert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiStatus {
    pub message: String,
    pub loading: bool,
    pub failed: bool,
    pub alert: Option<String>,
}

impl UiStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggering controls must be disabled while a call is in flight.
    pub fn controls_enabled(&self) -> bool {
        !self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn succeed(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.failed = false;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.failed = true;
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
        self.failed = false;
    }

    /// Drop a previous failure message; a success message is kept.
    pub fn clear_failure(&mut self) {
        if self.failed {
            self.clear_message();
        }
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    /// Hand the pending alert to the UI exactly once.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}

#[derive(Debug)]
pub enum RemoteCallResult<T> {
    Success(T),
    Failure(ClientError),
}

impl<T> From<Result<T>> for RemoteCallResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => RemoteCallResult::Success(value),
            Err(error) => RemoteCallResult::Failure(error),
        }
    }
}

impl<T> RemoteCallResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, RemoteCallResult::Success(_))
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            RemoteCallResult::Success(value) => Ok(value),
            RemoteCallResult::Failure(error) => Err(error),
        }
    }
}

/// Run one user-triggered remote action: raise the loading flag, await the
/// call, drop the flag again whatever happened, and hand back the tagged
/// result for the page to map onto its state.
pub async fn dispatch<T, F>(status: &mut UiStatus, label: &str, call: F) -> RemoteCallResult<T>
where
    F: Future<Output = Result<T>>,
{
    status.set_loading(true);
    log::debug!("{}: started", label);

    let result = RemoteCallResult::from(call.await);
    match &result {
        RemoteCallResult::Success(_) => log::info!("{}: succeeded", label),
        RemoteCallResult::Failure(error) => log::error!("{}: {}", label, error),
    }

    status.set_loading(false);
    result
}
