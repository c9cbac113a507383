//! Transport-facing views of loaded templates.
//!
//! Used by inspection and export tooling only; matching never goes through
//! these types. Absent template fields stay absent in the view and are
//! omitted when serialized, so a view converts back to the same template.

use crate::models::{Headers, RequestTemplate, RequestTemplateResponsePair, ResponseDetails};
use serde::{Deserialize, Serialize};

/// Request type tag identifying template matchers.
pub const TEMPLATE_REQUEST_TYPE: &str = "template";

/// A template and its response as presented to administration tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestResponsePairView {
    pub request: RequestDetailsView,
    pub response: ResponseDetailsView,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetailsView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
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
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDetailsView {
    pub status: u16,
    pub body: String,
    #[serde(default)]
    pub encoded_body: bool,
    #[serde(default)]
    pub headers: Headers,
}

impl RequestTemplateResponsePair {
    /// Project this pair into its view.
    pub fn to_view(&self) -> RequestResponsePairView {
        let t = &self.request;
        RequestResponsePairView {
            request: RequestDetailsView {
                request_type: Some(TEMPLATE_REQUEST_TYPE.to_string()),
                method: t.method.clone(),
                destination: t.destination.clone(),
                scheme: t.scheme.clone(),
                path: t.path.clone(),
                query: t.query.clone(),
                body: t.body.clone(),
                headers: t.headers.clone(),
            },
            response: ResponseDetailsView::from(&self.response),
        }
    }
}

impl From<&ResponseDetails> for ResponseDetailsView {
    fn from(response: &ResponseDetails) -> Self {
        Self {
            status: response.status,
            body: response.body.clone(),
            encoded_body: response.encoded_body,
            headers: response.headers.clone(),
        }
    }
}

impl From<ResponseDetailsView> for ResponseDetails {
    fn from(view: ResponseDetailsView) -> Self {
        Self {
            status: view.status,
            body: view.body,
            encoded_body: view.encoded_body,
            headers: view.headers,
        }
    }
}

impl From<RequestResponsePairView> for RequestTemplateResponsePair {
    fn from(view: RequestResponsePairView) -> Self {
        let r = view.request;
        Self {
            request: RequestTemplate {
                method: r.method,
                destination: r.destination,
                scheme: r.scheme,
                path: r.path,
                query: r.query,
                body: r.body,
                headers: r.headers,
            },
            response: view.response.into(),
        }
    }
}
