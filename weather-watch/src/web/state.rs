//! Application state for the web layer.

use std::sync::Arc;

use crate::engine::DecisionEngine;

/// Shared application state.
pub struct AppState<S, O> {
    /// The decision engine, shared by every request
    pub engine: Arc<DecisionEngine<S, O>>,
}

impl<S, O> AppState<S, O> {
    pub fn new(engine: DecisionEngine<S, O>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

// Manual impl: cloning only bumps the Arc, so S and O need not be Clone
impl<S, O> Clone for AppState<S, O> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}
