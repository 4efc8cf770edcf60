use log::debug;

use crate::error::GenerationError;
use crate::models::trip::{GeneratedResult, TripRequest};
use crate::services::openai_service::{strip_code_fence, ChatMessage, OpenAiClient};

/// Source of freshly generated stages.
pub trait StageGenerator {
    /// Produce up to `request.number_of_days * request.stages_per_day` stages
    /// for `request.trip_location`, none of them named in `avoid`.
    async fn generate(
        &self,
        request: &TripRequest,
        avoid: &[String],
    ) -> Result<GeneratedResult, GenerationError>;
}

const STAGE_SYSTEM_PROMPT: &str = r#"You are an AI that plans travel itineraries as a list of stages (places to visit).
Respond with ONLY JSON. Do not include any descriptions or code blocks; the output must parse as JSON.
The response needs to be formatted exactly like the following structure:
{
  "s": [
    { "i": Number (1-based position), "l": String (name of the place), "d": String (one or two sentence description), "e": String (a single emoji) }
  ]
}
If the request cannot be satisfied respond with:
{ "error": String (reason) }"#;

pub struct OpenAiStageGenerator {
    client: OpenAiClient,
}

impl OpenAiStageGenerator {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

impl StageGenerator for OpenAiStageGenerator {
    async fn generate(
        &self,
        request: &TripRequest,
        avoid: &[String],
    ) -> Result<GeneratedResult, GenerationError> {
        let messages = [
            ChatMessage::system(STAGE_SYSTEM_PROMPT),
            ChatMessage::user(stage_prompt(request, avoid)),
        ];

        let reply = self.client.complete(&messages).await?;
        let generated = parse_generated_stages(&reply)?;
        debug!(
            "Generated {} stages for '{}'",
            generated.stages.len(),
            request.trip_location
        );
        Ok(generated)
    }
}

pub fn stage_prompt(request: &TripRequest, avoid: &[String]) -> String {
    let total = request.capacity();
    let mut prompt = format!(
        "Plan {} stages in or near {}: {} days with {} stages per day.",
        total, request.trip_location, request.number_of_days, request.stages_per_day
    );
    if !request.trip_notes.trim().is_empty() {
        prompt.push_str(&format!(" Traveller notes: {}.", request.trip_notes.trim()));
    }
    if !avoid.is_empty() {
        prompt.push_str(&format!(
            " Do not include any of these places: {}.",
            avoid.join("; ")
        ));
    }
    prompt
}

pub fn parse_generated_stages(reply: &str) -> Result<GeneratedResult, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| GenerationError::Malformed(e.to_string()))?;

    if let Some(reason) = value.get("error").and_then(|e| e.as_str()) {
        return Err(GenerationError::Rejected(reason.to_string()));
    }
    if value.get("s").or_else(|| value.get("stages")).is_none() {
        return Err(GenerationError::Malformed(
            "reply has no stage list".to_string(),
        ));
    }

    let mut generated: GeneratedResult =
        serde_json::from_value(value).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    generated
        .stages
        .retain(|stage| !stage.location.trim().is_empty());
    Ok(generated)
}
