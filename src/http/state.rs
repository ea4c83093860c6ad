//! Shared application state for the HTTP layer.

use crate::controller::Controller;
use crate::session::SessionContext;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One session per process, explicit rather than process-global.
///
/// The mutex serializes exchanges: the UI submits one question at a time, and
/// a second request simply waits for the in-flight one to finish.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Controller>,
    pub session: Arc<Mutex<SessionContext>>,
}

impl AppState {
    pub fn new(controller: Controller, memory_budget: usize) -> Self {
        Self {
            controller: Arc::new(controller),
            session: Arc::new(Mutex::new(SessionContext::new(memory_budget))),
        }
    }
}
