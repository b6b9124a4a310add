//! Creator Discovery - client-side orchestration for creator discovery
//!
//! This library drives the four-step workflow used to find influencers for a
//! product: register a company, define a product, configure a search, and
//! review the matches (approve individual ones, contact them in bulk).
//! The workflow is a pure reducer over an explicit state; a thin HTTP
//! gateway talks to the matching/outreach backend.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{Intent, Session, Step, WorkflowError, WorkflowState};
pub use models::{Company, InfluencerMatch, MatchStatus, Product, SearchParameters};
pub use services::{BackendClient, BackendError, Gateway};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let state = WorkflowState::default();
        assert_eq!(state.step, Step::Company);
    }
}
