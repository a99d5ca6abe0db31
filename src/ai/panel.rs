//! State of the equation explainer view.
//!
//! Requests are independent and never cancelled: whichever response arrives
//! last is the one shown.

use super::client::{ExplainRequest, ExplainResponse, Explainer};
use crate::error::ExplainError;
use futures::StreamExt;
use futures::stream::FuturesUnordered;

/// Shown for any failed request, whatever the cause.
pub const FAILURE_MESSAGE: &str =
    "Failed to get explanation. The AI model might be unavailable or the equation is too complex.";

/// Shown when submitting an empty equation.
pub const EMPTY_MESSAGE: &str = "Please enter an equation.";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExplanationPanel {
    pub equation: String,
    pub explanation: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
}

impl ExplanationPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `equation`, clearing the previous outcome.
    pub fn begin(&mut self, equation: &str) -> Result<ExplainRequest, ExplainError> {
        let equation = equation.trim();
        if equation.is_empty() {
            self.error = Some(EMPTY_MESSAGE.to_string());
            return Err(ExplainError::EmptyEquation);
        }

        self.equation = equation.to_string();
        self.loading = true;
        self.error = None;
        self.explanation = None;
        Ok(ExplainRequest::new(equation))
    }

    /// Apply a finished request.
    pub fn finish(&mut self, result: Result<ExplainResponse, ExplainError>) {
        self.loading = false;
        match result {
            Ok(response) => {
                self.explanation = Some(response.explanation);
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(%err, equation = %self.equation, "explanation failed");
                self.explanation = None;
                self.error = Some(FAILURE_MESSAGE.to_string());
            }
        }
    }

    /// Submit one equation and wait for its explanation.
    pub async fn submit<E: Explainer>(&mut self, explainer: &E, equation: &str) {
        if let Ok(request) = self.begin(equation) {
            let result = explainer.explain(request).await;
            self.finish(result);
        }
    }

    /// Submit several equations at once. Each response is applied as it
    /// arrives, so the panel ends on the last one to complete. Returns every
    /// outcome in completion order.
    pub async fn submit_all<E: Explainer>(
        &mut self,
        explainer: &E,
        equations: &[String],
    ) -> Vec<(String, Result<ExplainResponse, ExplainError>)> {
        let mut in_flight = FuturesUnordered::new();
        for equation in equations {
            match self.begin(equation) {
                Ok(request) => {
                    let equation = request.equation.clone();
                    in_flight.push(async move { (equation, explainer.explain(request).await) });
                }
                Err(err) => tracing::debug!(%err, "skipping empty equation"),
            }
        }

        let mut outcomes = Vec::with_capacity(in_flight.len());
        while let Some((equation, result)) = in_flight.next().await {
            self.settle(&equation, result.clone(), in_flight.len());
            outcomes.push((equation, result));
        }
        outcomes
    }

    /// Apply one completion of a batch. The panel keeps loading while
    /// `remaining` requests are still in flight.
    fn settle(
        &mut self,
        equation: &str,
        result: Result<ExplainResponse, ExplainError>,
        remaining: usize,
    ) {
        self.equation = equation.to_string();
        self.finish(result);
        self.loading = remaining > 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Explains by echoing, and fails for equations containing `fail`.
    struct EchoExplainer;

    impl Explainer for EchoExplainer {
        async fn explain(&self, request: ExplainRequest) -> Result<ExplainResponse, ExplainError> {
            if request.equation.contains("fail") {
                Err(ExplainError::Backend("model unavailable".to_string()))
            } else {
                Ok(ExplainResponse {
                    explanation: format!("Solve {} step by step.", request.equation),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_successful_submit() {
        let mut panel = ExplanationPanel::new();
        panel.submit(&EchoExplainer, "  2x + 5 = 15 ").await;
        assert!(!panel.loading);
        assert_eq!(panel.equation, "2x + 5 = 15");
        assert_eq!(
            panel.explanation.as_deref(),
            Some("Solve 2x + 5 = 15 step by step.")
        );
        assert_eq!(panel.error, None);
    }

    #[tokio::test]
    async fn test_failure_shows_generic_message() {
        let mut panel = ExplanationPanel::new();
        panel.submit(&EchoExplainer, "please fail").await;
        assert_eq!(panel.explanation, None);
        assert_eq!(panel.error.as_deref(), Some(FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_empty_equation_is_rejected_before_request() {
        let mut panel = ExplanationPanel::new();
        panel.submit(&EchoExplainer, "   ").await;
        assert!(!panel.loading);
        assert_eq!(panel.error.as_deref(), Some(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn test_new_submission_replaces_previous_outcome() {
        let mut panel = ExplanationPanel::new();
        panel.submit(&EchoExplainer, "fail").await;
        panel.submit(&EchoExplainer, "1+1").await;
        assert_eq!(panel.error, None);
        assert_eq!(panel.explanation.as_deref(), Some("Solve 1+1 step by step."));
    }

    #[test]
    fn test_batch_keeps_loading_until_last_completion() {
        let mut panel = ExplanationPanel::new();
        panel.begin("1+1").unwrap();
        panel.begin("2+2").unwrap();

        let first = Ok(ExplainResponse {
            explanation: "Two.".to_string(),
        });
        panel.settle("1+1", first, 1);
        assert!(panel.loading);
        assert_eq!(panel.explanation.as_deref(), Some("Two."));

        panel.settle("2+2", Err(ExplainError::EmptyResponse), 0);
        assert!(!panel.loading);
        assert_eq!(panel.equation, "2+2");
        assert_eq!(panel.error.as_deref(), Some(FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_submit_all_ends_on_last_completion() {
        let mut panel = ExplanationPanel::new();
        let equations = vec!["1+1".to_string(), "".to_string(), "2+2".to_string()];
        let outcomes = panel.submit_all(&EchoExplainer, &equations).await;
        assert_eq!(outcomes.len(), 2);
        assert!(!panel.loading);

        let (last_equation, last_result) = outcomes.last().unwrap();
        assert_eq!(panel.equation, *last_equation);
        assert_eq!(
            panel.explanation.as_deref(),
            Some(last_result.as_ref().unwrap().explanation.as_str())
        );
    }
}
