use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use std::time::Duration;
use tracing::error;

use crate::config::config_model::GeminiConfig;
use crate::domain::{
    repositories::{
        summarization_engine::SummarizationEngine, transcription_engine::TranscriptionEngine,
    },
    value_objects::{summaries::SummaryStructure, transcription::EngineSegment},
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const TRANSCRIPTION_PROMPT: &str = "Transcribe this meeting recording verbatim in its spoken \
language. Split the audio into utterance-level segments with start and end times in seconds. \
Label each distinct voice SPEAKER_1, SPEAKER_2, and so on, in order of first appearance. \
Return only the segment array described by the response schema.";

/// Gemini generateContent client covering both AI engines: audio
/// transcription with diarization and transcript summarization. Audio is
/// sent inline as base64; both calls constrain the model to a JSON response
/// schema so the reply parses directly into domain values.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .context("failed to build Gemini http client")?;

        Ok(Self {
            http,
            api_key: config.api_key,
            model: config.model,
        })
    }

    async fn generate(&self, body: serde_json::Value, context: &str) -> Result<String> {
        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Gemini request failed: {}", context))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = match resp.text().await {
                Ok(text) if !text.is_empty() => text,
                Ok(_) => "<empty response body>".to_string(),
                Err(err) => format!("<failed to read response body: {err}>"),
            };

            error!(
                status = %status,
                response_body = %body,
                context = %context,
                "gemini api request failed"
            );

            anyhow::bail!("Gemini API request failed: {} (status {})", context, status);
        }

        let response = resp
            .json::<GenerateContentResponse>()
            .await
            .with_context(|| format!("failed to decode Gemini response: {}", context))?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .with_context(|| format!("Gemini response carried no text: {}", context))
    }
}

#[async_trait]
impl TranscriptionEngine for GeminiClient {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_extension: String,
    ) -> Result<Vec<EngineSegment>> {
        let mime_type = mime_guess::from_ext(&file_extension)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": TRANSCRIPTION_PROMPT },
                    { "inline_data": { "mime_type": mime_type, "data": BASE64.encode(&audio) } }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "start_time": { "type": "NUMBER" },
                            "end_time": { "type": "NUMBER" },
                            "content": { "type": "STRING" },
                            "speaker_label": { "type": "STRING" },
                            "confidence": { "type": "NUMBER" }
                        },
                        "required": ["start_time", "end_time", "content", "speaker_label"]
                    }
                }
            }
        });

        let text = self.generate(body, "transcription").await?;

        let segments = serde_json::from_str::<Vec<EngineSegment>>(&text)
            .context("Gemini transcription reply was not a segment array")?;

        Ok(segments)
    }
}

#[async_trait]
impl SummarizationEngine for GeminiClient {
    async fn summarize(
        &self,
        transcript_text: String,
        summary_style: String,
    ) -> Result<SummaryStructure> {
        let prompt = format!(
            "Summarize the following meeting transcript in the language it is written in, \
in the {} style. Produce a concise overview paragraph, the key discussion points, and any \
action items with owners where stated.\n\nTranscript:\n{}",
            summary_style, transcript_text
        );

        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "overview": { "type": "STRING" },
                        "key_points": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "action_items": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["overview", "key_points", "action_items"]
                }
            }
        });

        let text = self.generate(body, "summarization").await?;

        let structure = serde_json::from_str::<SummaryStructure>(&text)
            .context("Gemini summary reply did not match the summary structure")?;

        Ok(structure)
    }
}
