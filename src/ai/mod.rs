//! AI equation explainer.
//!
//! A single request/response round trip to a language model: the request
//! carries an equation, the response a step-by-step explanation. It never
//! touches calculator state.

mod client;
mod panel;

pub use client::{ExplainRequest, ExplainResponse, Explainer, GeminiClient};
pub use panel::{EMPTY_MESSAGE, ExplanationPanel, FAILURE_MESSAGE};
