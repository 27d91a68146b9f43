use std::collections::BTreeMap;

use reqwest::multipart::Form;
use serde::{Deserialize, Deserializer, Serialize};

/// The API sends `null` for fields it has not filled in yet.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WorkflowInstance {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub workflow_id: String,
    pub status: Option<String>,
    /// Document id to content hash, populated once documents are generated.
    #[serde(deserialize_with = "null_as_default")]
    pub document_hashes: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkflowInstance {
    pub fn document_ids(&self) -> impl Iterator<Item = &str> {
        self.document_hashes.keys().map(String::as_str)
    }

    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some("completed")
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Step {
    #[serde(deserialize_with = "null_as_default")]
    pub step: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub participant: String,
    /// Empty once the step no longer has a signing link.
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMethod {
    Email,
    Phone,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Email => "email",
            ContactMethod::Phone => "phone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub method: ContactMethod,
    /// Email address or phone number, matching `method`.
    pub value: String,
    pub full_name: String,
}

impl Participant {
    pub fn email(value: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            method: ContactMethod::Email,
            value: value.into(),
            full_name: full_name.into(),
        }
    }

    pub fn phone(value: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            method: ContactMethod::Phone,
            value: value.into(),
            full_name: full_name.into(),
        }
    }
}

/// Parameters for `POST /workflow_instances`. Only fields that are set are
/// sent; the API reports missing required ones.
#[derive(Debug, Clone, Default)]
pub struct CreateInstance {
    pub workflow_id: Option<String>,
    /// Keyed by the participant's role in the workflow.
    pub participants: BTreeMap<String, Participant>,
    pub merge_fields: BTreeMap<String, String>,
    pub callback_url: Option<String>,
    pub redirect_url: Option<String>,
    pub document_delivery: bool,
}

impl CreateInstance {
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: Some(workflow_id.into()),
            ..Self::default()
        }
    }

    pub fn participant(mut self, role: impl Into<String>, participant: Participant) -> Self {
        self.participants.insert(role.into(), participant);
        self
    }

    pub fn merge_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.merge_fields.insert(key.into(), value.into());
        self
    }

    pub fn callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    pub fn redirect_url(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    pub fn document_delivery(mut self, enabled: bool) -> Self {
        self.document_delivery = enabled;
        self
    }

    /// Multipart field names and values, in the order they are sent.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        if let Some(id) = self.workflow_id.as_deref().filter(|id| !id.is_empty()) {
            fields.push(("workflow_id".to_string(), id.to_string()));
        }
        for (role, participant) in &self.participants {
            fields.push((
                format!("participants[{role}][type]"),
                participant.method.as_str().to_string(),
            ));
            fields.push((format!("participants[{role}][value]"), participant.value.clone()));
            fields.push((
                format!("participants[{role}][full_name]"),
                participant.full_name.clone(),
            ));
        }
        for (key, value) in &self.merge_fields {
            fields.push((format!("merge_fields[{key}]"), value.clone()));
        }
        if let Some(url) = self.callback_url.as_deref().filter(|u| !u.is_empty()) {
            fields.push(("callback_url".to_string(), url.to_string()));
        }
        if let Some(url) = self.redirect_url.as_deref().filter(|u| !u.is_empty()) {
            fields.push(("redirect_url".to_string(), url.to_string()));
        }
        if self.document_delivery {
            fields.push(("document_delivery".to_string(), "true".to_string()));
        }
        fields
    }

    pub fn to_form(&self) -> Form {
        self.form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
    }
}
