//! Intent resolution: prompt assembly, classification, output validation.
//!
//! One blocking model call turns free text into an `IntentDecision`. The
//! model is instructed to answer with bare JSON; code fences are stripped
//! defensively before parsing. Parse and validation failures are fatal for
//! the turn and are never retried against the model.

use gigmate_core::capability::CapabilityDescriptor;
use gigmate_core::error::ModelError;
use gigmate_core::model::ModelClient;
use gigmate_core::UserContext;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// The classifier's structured verdict: which capability to invoke, or
/// `"none"` when the request is out of scope.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentDecision {
    pub capability: String,

    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl IntentDecision {
    pub fn is_none(&self) -> bool {
        self.capability.eq_ignore_ascii_case("none")
    }
}

const CLASSIFICATION_INSTRUCTIONS: &str = "\
You are an intent classifier for a freelance-marketplace assistant. \
Decide which single capability, if any, should handle the user's request.\n\
Respond with a JSON object only, no prose and no code fences:\n\
{\"capability\": \"<name or none>\", \"parameters\": { ... }}\n\
Use \"none\" when no listed capability applies. Extract parameter values \
from the user's message.";

pub struct IntentPipeline {
    model: Arc<dyn ModelClient>,
}

impl IntentPipeline {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Assemble the classification prompt.
    pub fn build_prompt(
        catalog: &[CapabilityDescriptor],
        context: &UserContext,
        transcript: &str,
        input: &str,
    ) -> String {
        let catalog_block = if catalog.is_empty() {
            "(no capabilities registered)".to_string()
        } else {
            catalog
                .iter()
                .map(|d| format!("- {}: {}", d.name, d.description))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let context_block =
            serde_json::to_string(context).unwrap_or_else(|_| "{}".to_string());

        let transcript_block = if transcript.is_empty() {
            "(empty)".to_string()
        } else {
            transcript.to_string()
        };

        format!(
            "{CLASSIFICATION_INSTRUCTIONS}\n\n\
             Available capabilities:\n{catalog_block}\n\n\
             User context:\n{context_block}\n\n\
             Recent conversation:\n{transcript_block}\n\n\
             User message:\n{input}"
        )
    }

    /// Classify one input into an `IntentDecision`.
    pub async fn classify(
        &self,
        catalog: &[CapabilityDescriptor],
        context: &UserContext,
        transcript: &str,
        input: &str,
    ) -> Result<IntentDecision, ModelError> {
        let prompt = Self::build_prompt(catalog, context, transcript, input);
        let raw = self.model.invoke(&prompt).await?;
        let decision = parse_decision(&raw)?;
        debug!(capability = %decision.capability, "Classified intent");
        Ok(decision)
    }
}

/// Strip a surrounding markdown code fence, with or without a language tag.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line ("json", "JSON", …), then the closing fence
    let rest = match rest.split_once('\n') {
        Some((_tag, body)) => body,
        None => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

/// Parse and validate the model's output into a decision.
pub fn parse_decision(raw: &str) -> Result<IntentDecision, ModelError> {
    let cleaned = strip_code_fences(raw);

    let value: serde_json::Value = serde_json::from_str(cleaned)
        .map_err(|e| ModelError::Parse(format!("{e}; output was: {cleaned:.120}")))?;

    let decision: IntentDecision = serde_json::from_value(value)
        .map_err(|e| ModelError::Validation(e.to_string()))?;

    if decision.capability.trim().is_empty() {
        return Err(ModelError::Validation("capability name is empty".into()));
    }
    if !decision.parameters.is_object() && !decision.parameters.is_null() {
        return Err(ModelError::Validation(
            "parameters must be an object".into(),
        ));
    }

    Ok(decision)
}
