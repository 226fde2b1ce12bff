// Request and response types for the SafeComms API.
//
// Requests carry `Option` fields so that "not set by the caller" can be told
// apart from an explicit value; the `with_defaults` methods fill in the
// server-side defaults right before a request is sent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Language sent when the caller doesn't choose one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A moderation verdict, passed through exactly as the server returned it.
pub type ModerationResult = Value;

/// Body for `POST /moderation/text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextModerationRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Ask the server to return the content with flagged words replaced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
    /// Ask the server to detect personally identifiable information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pii: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_profile_id: Option<String>,
}

impl TextModerationRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = Some(replace);
        self
    }

    pub fn pii(mut self, pii: bool) -> Self {
        self.pii = Some(pii);
        self
    }

    pub fn replace_severity(mut self, severity: impl Into<String>) -> Self {
        self.replace_severity = Some(severity.into());
        self
    }

    pub fn moderation_profile_id(mut self, profile_id: impl Into<String>) -> Self {
        self.moderation_profile_id = Some(profile_id.into());
        self
    }

    /// Fill unset fields with `language="en"`, `replace=false`, `pii=false`.
    /// Fields the caller set, including an explicit `false`, are kept.
    pub fn with_defaults(self) -> Self {
        Self {
            language: self.language.or_else(|| Some(DEFAULT_LANGUAGE.to_string())),
            replace: self.replace.or(Some(false)),
            pii: self.pii.or(Some(false)),
            ..self
        }
    }
}

/// Body for `POST /moderation/image`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageModerationRequest {
    /// An `http(s)://` URL or a `data:` URI.
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_profile_id: Option<String>,
}

impl ImageModerationRequest {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn moderation_profile_id(mut self, profile_id: impl Into<String>) -> Self {
        self.moderation_profile_id = Some(profile_id.into());
        self
    }

    /// Fill an unset language with `"en"`.
    pub fn with_defaults(self) -> Self {
        Self {
            language: self.language.or_else(|| Some(DEFAULT_LANGUAGE.to_string())),
            ..self
        }
    }
}

/// Account usage as reported by `GET /usage`.
///
/// The client doesn't validate these figures. Every field is optional so a
/// partial body still decodes, numbers keep whatever JSON form the server
/// used, and keys this type doesn't know land in `extra`. Serializing it back
/// yields the body the server sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Requests per minute allowed for the tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<Number>,
    /// `None` when absent, `Some(None)` when the server sends `null` (unlimited).
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub token_limit: Option<Option<Number>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_tokens: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UsageResponse {
    /// True when the server reported `tokenLimit: null`.
    pub fn is_unlimited(&self) -> bool {
        matches!(self.token_limit, Some(None))
    }
}

// Only called when the key is present, so an explicit null becomes `Some(None)`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<Number>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Number>::deserialize(deserializer).map(Some)
}

/// An RFC 7807 problem body returned with API errors.
///
/// The body is kept exactly as received, whatever its shape; the standard
/// members are read through accessors that return `None` when a member is
/// missing or has an unexpected type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemDetails(Value);

impl ProblemDetails {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    /// The `type` URI.
    pub fn problem_type(&self) -> Option<&str> {
        self.str_member("type")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_member("title")
    }

    /// The `status` member, accepted as a JSON number or a numeric string.
    pub fn status(&self) -> Option<u16> {
        match self.0.get("status")? {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        self.str_member("detail")
    }

    pub fn instance(&self) -> Option<&str> {
        self.str_member("instance")
    }

    /// Look up any member, e.g. `errors` or `traceId`.
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The members, when the body is a JSON object.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn str_member(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_defaults_fill_only_unset_fields() {
        let request = TextModerationRequest::new("hi")
            .language("fr")
            .pii(true)
            .with_defaults();
        assert_eq!(request.language.as_deref(), Some("fr"));
        assert_eq!(request.pii, Some(true));
        assert_eq!(request.replace, Some(false));
    }

    #[test]
    fn image_defaults_keep_profile_id() {
        let request = ImageModerationRequest::new("https://example.com/cat.jpg")
            .moderation_profile_id("strict")
            .with_defaults();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "image": "https://example.com/cat.jpg",
                "language": "en",
                "moderationProfileId": "strict"
            })
        );
    }

    #[test]
    fn problem_details_keeps_unknown_members() {
        let body = json!({
            "type": "https://tools.ietf.org/html/rfc6585#section-4",
            "title": "Too Many Requests",
            "status": 429,
            "traceId": "00-abc-01"
        });
        let problem: ProblemDetails = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(problem.status(), Some(429));
        assert_eq!(problem.extension("traceId"), Some(&json!("00-abc-01")));
        assert_eq!(serde_json::to_value(&problem).unwrap(), body);
    }

    #[test]
    fn problem_details_members_with_unexpected_types() {
        let problem = ProblemDetails::new(json!({
            "type": null,
            "title": 7,
            "status": "400",
            "detail": "content too long"
        }));
        assert_eq!(problem.problem_type(), None);
        assert_eq!(problem.title(), None);
        assert_eq!(problem.status(), Some(400));
        assert_eq!(problem.detail(), Some("content too long"));
    }

    #[test]
    fn usage_keeps_float_and_null_numbers() {
        let body = json!({"rateLimit": 60.0, "tokenLimit": null});
        let usage: UsageResponse = serde_json::from_value(body.clone()).unwrap();
        assert!(usage.is_unlimited());
        assert_eq!(usage.rate_limit.as_ref().and_then(Number::as_f64), Some(60.0));
        assert_eq!(serde_json::to_value(&usage).unwrap(), body);
    }
}
