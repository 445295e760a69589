use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tickr_core::connector::{HistoryProvider, TickrConnector};
use tickr_core::{DateRange, PricePoint, TickrError};

/// Instruction for how a call should behave for a given symbol.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(TickrError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    history_rules: HashMap<String, MockBehavior<Vec<PricePoint>>>,
    history_requests: Vec<(String, DateRange)>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
#[derive(Clone)]
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `history` calls for a specific symbol.
    pub async fn set_history_behavior(
        &self,
        symbol: &str,
        behavior: MockBehavior<Vec<PricePoint>>,
    ) {
        let mut guard = self.state.lock().await;
        guard
            .history_rules
            .insert(symbol.to_ascii_uppercase(), behavior);
    }

    /// Every `history` call received so far, in arrival order.
    pub async fn history_requests(&self) -> Vec<(String, DateRange)> {
        self.state.lock().await.history_requests.clone()
    }

    /// Number of `history` calls received so far.
    pub async fn history_calls(&self) -> usize {
        self.state.lock().await.history_requests.len()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.history_rules.clear();
        guard.history_requests.clear();
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn TickrConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn TickrConnector>, controller)
    }
}

impl TickrConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
}

#[async_trait]
impl HistoryProvider for DynamicMockConnector {
    async fn history(&self, symbol: &str, range: DateRange) -> Result<Vec<PricePoint>, TickrError> {
        let key = symbol.to_ascii_uppercase();
        // Log and snapshot the rule without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.history_requests.push((key.clone(), range));
            guard.history_rules.get(&key).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(points)) => Ok(points),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(TickrError::not_found(format!("history for {key}"))),
        }
    }
}
