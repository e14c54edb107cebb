//! AI-assisted answers for job-application form fields.
//!
//! Form fields and a user profile go to a chat-completion model, which is
//! asked for one answer per field id. Replies are parsed leniently and
//! select answers are snapped onto the field's allowed options.

pub mod client;
pub mod options;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Result;

pub use client::OpenAiClient;

/// Answers keyed by field id
pub type FieldAnswers = BTreeMap<String, String>;

/// One input on an application form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub field_id: String,

    #[serde(default)]
    pub label: String,

    /// `text`, `select`, `textarea`, ...
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,

    /// Allowed values for selects
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[serde(default)]
    pub required: bool,
}

fn default_field_type() -> String {
    "text".to_string()
}

impl FormField {
    /// Load a JSON array of fields
    pub fn list_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<FormField>> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A chat-completion backend
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Return the assistant's reply text for the conversation
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Parse a model reply into answers.
///
/// Accepts a bare JSON object or one embedded in prose, spanning from the
/// first `{` to the last `}`. Non-string values are stringified and `null`
/// becomes an empty answer.
pub fn parse_reply(text: &str) -> Option<FieldAnswers> {
    let text = text.trim();
    let object = serde_json::from_str::<serde_json::Map<String, Value>>(text)
        .ok()
        .or_else(|| {
            let start = text.find('{')?;
            let end = text.rfind('}')?;
            if end <= start {
                return None;
            }
            serde_json::from_str(&text[start..=end]).ok()
        })?;

    Some(
        object
            .into_iter()
            .map(|(key, value)| {
                let answer = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, answer)
            })
            .collect(),
    )
}

/// Maps form fields to answers with a chat model
pub struct FieldInterpreter<M> {
    model: M,
    system_prompt: Option<String>,
}

impl<M: ChatModel> FieldInterpreter<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            system_prompt: None,
        }
    }

    /// Replace the default system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Ask the model for one answer per field.
    ///
    /// An empty field list returns an empty map without calling the model.
    /// An unparseable reply maps every field to `""`.
    pub async fn map_fields(&self, fields: &[FormField], profile: &Value) -> Result<FieldAnswers> {
        if fields.is_empty() {
            return Ok(FieldAnswers::new());
        }

        let messages = prompt::build_messages(fields, profile, self.system_prompt.as_deref())?;
        ::log::info!("Asking the model to fill {} fields", fields.len());
        let reply = self.model.complete(&messages).await?;

        match parse_reply(&reply) {
            Some(raw) => Ok(options::normalize_answers(fields, &raw)),
            None => {
                ::log::warn!("Could not parse model output, returning empty answers: {}", reply);
                Ok(fields
                    .iter()
                    .map(|f| (f.field_id.clone(), String::new()))
                    .collect())
            }
        }
    }
}
