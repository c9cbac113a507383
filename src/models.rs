//! Request, template, and response types the matcher works on.

use crate::error::MatchError;
use crate::matcher::CompiledTemplate;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header map: name to ordered values.
pub type Headers = HashMap<String, Vec<String>>;

/// An observed request, already decoded by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDetails {
    pub method: String,
    /// Host, possibly carrying a `scheme://` prefix depending on the caller.
    pub destination: String,
    pub scheme: String,
    pub path: String,
    pub query: String,
    pub body: String,
    pub headers: Headers,
}

/// A pattern over request fields.
///
/// `None` on a field matches any value. `Some("")` is an empty pattern and
/// only matches an empty value. A template with every field `None` and no
/// headers matches every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Required headers; each declared value list must equal the observed one as a set.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: Headers,
}

/// Canned response returned for a matched template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseDetails {
    /// HTTP status code
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response body; base64 text when `encoded_body` is set
    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub encoded_body: bool,

    #[serde(default)]
    pub headers: Headers,
}

fn default_status() -> u16 {
    200
}

impl Default for ResponseDetails {
    fn default() -> Self {
        Self {
            status: default_status(),
            body: String::new(),
            encoded_body: false,
            headers: HashMap::new(),
        }
    }
}

impl ResponseDetails {
    /// Response with the given body and default status.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Get the body content as bytes.
    pub fn body_bytes(&self) -> anyhow::Result<Vec<u8>> {
        if self.encoded_body {
            base64::engine::general_purpose::STANDARD
                .decode(&self.body)
                .map_err(|e| anyhow::anyhow!("Invalid base64 body: {}", e))
        } else {
            Ok(self.body.as_bytes().to_vec())
        }
    }
}

/// One template and the response it produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestTemplateResponsePair {
    #[serde(default)]
    pub request: RequestTemplate,
    pub response: ResponseDetails,
}

impl RequestTemplateResponsePair {
    pub fn new(request: RequestTemplate, response: ResponseDetails) -> Self {
        Self { request, response }
    }
}

/// Ordered templates; earlier entries take precedence.
///
/// Patterns are compiled when the simulation is built, so an invalid glob
/// surfaces here rather than on the first lookup that reaches it.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    templates: Vec<RequestTemplateResponsePair>,
    compiled: Vec<CompiledTemplate>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(
        templates: Vec<RequestTemplateResponsePair>,
    ) -> Result<Self, MatchError> {
        let compiled = templates
            .iter()
            .map(|pair| CompiledTemplate::new(&pair.request))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            templates,
            compiled,
        })
    }

    pub fn templates(&self) -> &[RequestTemplateResponsePair] {
        &self.templates
    }

    pub(crate) fn entries(
        &self,
    ) -> impl Iterator<Item = (&RequestTemplateResponsePair, &CompiledTemplate)> {
        self.templates.iter().zip(&self.compiled)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
