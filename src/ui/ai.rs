//! Rendering for the equation explainer.

use crate::ai::ExplanationPanel;

/// Render the panel: the explanation, the error, or a prompt when idle.
pub fn render_explanation(panel: &ExplanationPanel) -> String {
    if panel.loading {
        return format!("Explaining {} ...", panel.equation);
    }

    if let Some(error) = &panel.error {
        return format!("[!] {}", error);
    }

    match &panel.explanation {
        Some(explanation) => format!("Explanation of {}:\n\n{}", panel.equation, explanation),
        None => "Enter an equation to see the AI-powered explanation here.".to_string(),
    }
}
