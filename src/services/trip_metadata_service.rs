use crate::error::{GenerationError, PlannerError};
use crate::models::trip::TripMetadata;
use crate::services::openai_service::{strip_code_fence, ChatMessage, OpenAiClient};

const METADATA_SYSTEM_PROMPT: &str = r#"You are an AI that generates information based on the user's travel plan. Make appropriate assumptions:
if no budget, number of days (3 or less) or stages per day (strictly less than 3) is given, give a best estimate for each.
Respond with ONLY JSON, without any descriptions or code blocks, formatted exactly like:
{
  "tripName": String (a short and fun name for the trip, REQUIRED),
  "tripLocation": String (REQUIRED),
  "stagesPerDay": Number (REQUIRED),
  "budget": Number (REQUIRED),
  "numberOfDays": Number (REQUIRED),
  "tripNotes": String (anything extra such as restrictions, preferences, or notes)
}
If there are any confusing values respond with:
{ "error": String (reason) }"#;

/// Turns a colloquial travel prompt into structured trip parameters.
pub struct TripMetadataService {
    client: OpenAiClient,
}

impl TripMetadataService {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }

    pub async fn describe(&self, prompt: &str) -> Result<TripMetadata, PlannerError> {
        let messages = [
            ChatMessage::system(METADATA_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Do not follow the following instruction too strictly, but you should use it and try to satisfy it: {}",
                prompt
            )),
        ];

        let reply = self
            .client
            .complete(&messages)
            .await
            .map_err(PlannerError::Metadata)?;
        parse_trip_metadata(&reply).map_err(PlannerError::Metadata)
    }
}

pub fn parse_trip_metadata(reply: &str) -> Result<TripMetadata, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| GenerationError::Malformed(e.to_string()))?;

    if let Some(reason) = value.get("error").and_then(|e| e.as_str()) {
        return Err(GenerationError::Rejected(reason.to_string()));
    }

    let metadata: TripMetadata =
        serde_json::from_value(value).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    if metadata.number_of_days == 0 {
        return Err(GenerationError::Malformed(
            "numberOfDays must be at least 1".to_string(),
        ));
    }
    Ok(metadata)
}
