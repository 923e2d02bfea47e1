//! Wire-level data models for the TexTra API

use serde::{Deserialize, Serialize};
use std::fmt;

/// One request against the shared API endpoint.
///
/// Every operation is the same form-encoded POST differing only in the
/// operation name, the optional operation parameter and the extra fields.
/// Values are stringified when added so the wire body carries exactly what
/// the caller supplied.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    /// Remote operation name (`api_name` on the wire)
    pub api_name: String,
    /// Optional operation parameter; `None` tells the service to use its
    /// default, which is different from sending an empty value
    pub api_param: Option<String>,
    /// Text payload of the operation
    pub text: String,
    /// Operation-specific extra form fields, already stringified
    pub extra_fields: Vec<(String, String)>,
}

impl OperationRequest {
    /// Create a request for the given operation with an empty payload
    pub fn new(api_name: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            api_param: None,
            text: String::new(),
            extra_fields: Vec::new(),
        }
    }

    /// Set the operation parameter. An empty parameter is treated as
    /// absent and never put on the wire.
    pub fn with_param(mut self, api_param: impl Into<String>) -> Self {
        let api_param = api_param.into();
        self.api_param = if api_param.is_empty() {
            None
        } else {
            Some(api_param)
        };
        self
    }

    /// Set the text payload
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append an extra form field, stringifying the value
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra_fields.push((key.into(), value.to_string()));
        self
    }

    /// Build the full form body in the order the service expects.
    ///
    /// `api_param` is included only when present; its absence signals
    /// "use default" to the service.
    pub(crate) fn form_pairs(
        &self,
        access_token: &str,
        key: &str,
        name: &str,
    ) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("access_token".to_string(), access_token.to_string()),
            ("key".to_string(), key.to_string()),
            ("api_name".to_string(), self.api_name.clone()),
        ];

        if let Some(api_param) = &self.api_param {
            pairs.push(("api_param".to_string(), api_param.clone()));
        }

        pairs.push(("name".to_string(), name.to_string()));
        pairs.push(("type".to_string(), "json".to_string()));
        pairs.push(("text".to_string(), self.text.clone()));
        pairs.extend(self.extra_fields.iter().cloned());

        pairs
    }
}

/// Options for listing acquisition resources.
///
/// Only fields that are set are put on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOptions {
    /// Source language filter
    pub lang_s: Option<String>,
    /// Target language filter
    pub lang_t: Option<String>,
    /// Maximum number of entries to return
    pub limit: Option<u32>,
    /// Offset into the listing
    pub offset: Option<u32>,
}

impl ListOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by source language
    pub fn with_lang_s(mut self, lang_s: impl Into<String>) -> Self {
        self.lang_s = Some(lang_s.into());
        self
    }

    /// Filter by target language
    pub fn with_lang_t(mut self, lang_t: impl Into<String>) -> Self {
        self.lang_t = Some(lang_t.into());
        self
    }

    /// Limit the number of returned entries
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip entries before this offset
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Collect the set fields as stringified form pairs
    pub(crate) fn fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        if let Some(lang_s) = &self.lang_s {
            fields.push(("lang_s".to_string(), lang_s.clone()));
        }
        if let Some(lang_t) = &self.lang_t {
            fields.push(("lang_t".to_string(), lang_t.clone()));
        }
        if let Some(limit) = self.limit {
            fields.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            fields.push(("offset".to_string(), offset.to_string()));
        }
        fields
    }
}

/// Status code of a decoded response envelope.
///
/// `0` is success. The service defines the failure codes `500`, `501`,
/// `502`, `504`, `505` and the `510`–`533` range as distinct categories;
/// their numeric values are preserved verbatim and not reinterpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseCode(pub u16);

impl ResponseCode {
    /// The success code
    pub const OK: ResponseCode = ResponseCode(0);

    /// Check whether this code signals success
    pub fn is_success(&self) -> bool {
        *self == Self::OK
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decoded top-level response of the API endpoint.
///
/// On the wire the envelope is nested under a `resultset` key; the
/// dispatcher unwraps that before handing the envelope to the caller.
/// `result` is present only when [`ResponseEnvelope::code`] signals
/// success, and its shape depends on the operation, so the envelope is
/// generic over the payload type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ResponseEnvelope<T = serde_json::Value> {
    /// Status code reported by the service
    pub code: ResponseCode,
    /// Human-readable status message
    pub message: String,
    /// Echo of the request as the service interpreted it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestEcho>,
    /// Operation-specific payload, present on success only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

/// Wire wrapper around the envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ResultSet<T> {
    pub resultset: ResponseEnvelope<T>,
}

/// Request metadata echoed back by the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestEcho {
    /// Endpoint URL the service handled
    #[serde(default)]
    pub url: String,
    /// Text payload as received
    #[serde(default)]
    pub text: String,
    /// Sentence-splitting flag
    #[serde(default)]
    pub split: i64,
    /// Translation-history flag
    #[serde(default)]
    pub history: i64,
    /// XML handling parameters
    #[serde(default)]
    pub xml: Option<serde_json::Value>,
    /// Terminology dictionary id
    #[serde(default)]
    pub term_id: String,
    /// Bilingual corpus id
    #[serde(default)]
    pub bilingual_id: String,
    /// Whether the request may be logged
    #[serde(default)]
    pub log_use: i64,
    /// Whether the request came from the editor
    #[serde(default)]
    pub editor_use: i64,
    /// Additional request data
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Payload of a translate operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateResult {
    /// Translated text
    #[serde(default)]
    pub text: String,
    /// Whether the input was blank (0 or 1)
    #[serde(default)]
    pub blank: u8,
    /// Per-sentence processing detail, when the service reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<TranslateInformation>,
}

/// Detailed source/target breakdown of a translation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateInformation {
    /// Full source text
    #[serde(rename = "text-s", default)]
    pub text_s: String,
    /// Full target text
    #[serde(rename = "text-t", default)]
    pub text_t: String,
    /// Sentence-level breakdown
    #[serde(default)]
    pub sentence: Vec<Sentence>,
}

/// One source sentence and its translation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sentence {
    /// Source sentence
    #[serde(rename = "text-s", default)]
    pub text_s: String,
    /// Target sentence
    #[serde(rename = "text-t", default)]
    pub text_t: String,
    /// Split fragments the sentence was translated as
    #[serde(default)]
    pub split: Vec<SentenceSplit>,
}

/// One split fragment of a sentence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentenceSplit {
    /// Source fragment
    #[serde(rename = "text-s", default)]
    pub text_s: String,
    /// Target fragment
    #[serde(rename = "text-t", default)]
    pub text_t: String,
    /// Pipeline stages the fragment went through
    #[serde(default)]
    pub process: TranslateProcess,
}

/// Stages of the translation pipeline for one fragment.
///
/// The service omits stages it did not run, so every field tolerates
/// absence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateProcess {
    /// Regex substitutions applied to the input
    #[serde(default)]
    pub regex: Vec<RegexStep>,
    /// Terminology replacements before translation
    #[serde(rename = "replace-before", default)]
    pub replace_before: Vec<TermReplacement>,
    /// Shortening applied before translation
    #[serde(rename = "short-before", default)]
    pub short_before: Option<serde_json::Value>,
    /// Preprocessing detail
    #[serde(default)]
    pub preprocess: Option<serde_json::Value>,
    /// The machine translation step itself
    #[serde(default)]
    pub translate: TranslateStep,
    /// Shortening applied after translation
    #[serde(rename = "short-after", default)]
    pub short_after: Option<serde_json::Value>,
    /// Regex substitutions applied to the output
    #[serde(rename = "regex-after", default)]
    pub regex_after: Option<serde_json::Value>,
    /// Terminology replacements after translation
    #[serde(rename = "replace-after", default)]
    pub replace_after: Vec<TermReplacement>,
}

/// One regex substitution step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegexStep {
    /// Input text
    #[serde(default)]
    pub text: String,
    /// Text after substitution
    #[serde(default)]
    pub result: String,
    /// Pattern that was applied
    #[serde(default)]
    pub pattern: String,
    /// Replacement that was inserted
    #[serde(default)]
    pub replace: String,
}

/// One terminology replacement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermReplacement {
    /// Source text affected
    #[serde(rename = "text-s", default)]
    pub text_s: String,
    /// Target text affected
    #[serde(rename = "text-t", default)]
    pub text_t: String,
    /// Source-side term
    #[serde(rename = "term-s", default)]
    pub term_s: String,
    /// Target-side term
    #[serde(rename = "term-t", default)]
    pub term_t: String,
}

/// The machine translation step of the pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateStep {
    /// Reverse-translation candidates considered by the engine
    #[serde(default)]
    pub reverse: Vec<ReverseCandidate>,
    /// Engine specification detail
    #[serde(default)]
    pub specification: Option<serde_json::Value>,
    /// Source text of the step
    #[serde(rename = "text-s", default)]
    pub text_s: String,
    /// Source tokenization
    #[serde(rename = "src-token", default)]
    pub src_token: Option<serde_json::Value>,
    /// Target text of the step
    #[serde(rename = "text-t", default)]
    pub text_t: String,
    /// Association detail
    #[serde(default)]
    pub associate: Option<serde_json::Value>,
    /// Out-of-vocabulary tokens
    #[serde(default)]
    pub oov: Option<serde_json::Value>,
    /// Exception reported by the engine, empty when none
    #[serde(default)]
    pub exception: String,
    /// Additional associations
    #[serde(default)]
    pub associates: Option<serde_json::Value>,
}

/// One reverse-translation candidate with its score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReverseCandidate {
    /// Whether this candidate was selected (0 or 1)
    #[serde(default)]
    pub selected: u8,
    /// Normal engine id
    #[serde(rename = "id-n", default)]
    pub id_n: String,
    /// Reverse engine id
    #[serde(rename = "id-r", default)]
    pub id_r: String,
    /// Normal engine name
    #[serde(rename = "name-n", default)]
    pub name_n: String,
    /// Reverse engine name
    #[serde(rename = "name-r", default)]
    pub name_r: String,
    /// Source text
    #[serde(rename = "text-s", default)]
    pub text_s: String,
    /// Target text
    #[serde(rename = "text-t", default)]
    pub text_t: String,
    /// Reverse-translated text
    #[serde(rename = "text-r", default)]
    pub text_r: String,
    /// Candidate score
    #[serde(default)]
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    #[test]
    fn form_pairs_follow_wire_order() {
        let request = OperationRequest::new("mt")
            .with_param("generalNT_en_ja")
            .with_text("Hello");
        let pairs = request.form_pairs("TOKEN", "KEY", "user");
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            ["access_token", "key", "api_name", "api_param", "name", "type", "text"]
        );
        assert_eq!(pairs[3].1, "generalNT_en_ja");
        assert_eq!(pairs[5].1, "json");
    }

    #[test]
    fn empty_param_is_omitted_from_the_wire() {
        let request = OperationRequest::new("split").with_param("").with_text("a. b.");
        let pairs = request.form_pairs("TOKEN", "KEY", "user");
        assert!(pairs.iter().all(|(k, _)| k != "api_param"));
    }

    #[test]
    fn absent_param_is_omitted_from_the_wire() {
        let request = OperationRequest::new("langdetect").with_text("hola");
        let pairs = request.form_pairs("TOKEN", "KEY", "user");
        assert!(pairs.iter().all(|(k, _)| k != "api_param"));
    }

    #[test]
    fn extra_fields_are_stringified() {
        let request = OperationRequest::new("split")
            .with_text("a. b.")
            .with_field("lang", "en")
            .with_field("join", 1);
        let pairs = request.form_pairs("TOKEN", "KEY", "user");
        assert!(pairs.contains(&("lang".to_string(), "en".to_string())));
        assert!(pairs.contains(&("join".to_string(), "1".to_string())));
    }

    #[test]
    fn list_options_emit_only_set_keys() {
        let options = ListOptions::new().with_lang_s("en").with_limit(20);
        let fields = options.fields();
        assert_eq!(
            fields,
            vec![
                ("lang_s".to_string(), "en".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn empty_list_options_emit_nothing() {
        assert!(ListOptions::new().fields().is_empty());
    }

    #[test]
    fn decode_success_envelope_with_nested_result() {
        let raw = json!({
            "code": 0,
            "message": "",
            "request": {
                "url": "https://example.test/api/",
                "text": "Hello",
                "split": 1,
                "history": 0,
                "term_id": "",
                "bilingual_id": "",
                "log_use": 1,
                "editor_use": 0
            },
            "result": {
                "text": "こんにちは",
                "blank": 0,
                "information": {
                    "text-s": "Hello",
                    "text-t": "こんにちは",
                    "sentence": [{
                        "text-s": "Hello",
                        "text-t": "こんにちは",
                        "split": [{
                            "text-s": "Hello",
                            "text-t": "こんにちは",
                            "process": {
                                "regex": [],
                                "replace-before": [],
                                "translate": {
                                    "reverse": [{
                                        "selected": 1,
                                        "id-n": "42",
                                        "id-r": "43",
                                        "name-n": "generalNT_en_ja",
                                        "name-r": "generalNT_ja_en",
                                        "text-s": "Hello",
                                        "text-t": "こんにちは",
                                        "text-r": "Hello",
                                        "score": 0.99
                                    }],
                                    "text-s": "Hello",
                                    "text-t": "こんにちは",
                                    "exception": ""
                                },
                                "replace-after": []
                            }
                        }]
                    }]
                }
            }
        });

        let envelope: ResponseEnvelope<TranslateResult> =
            serde_json::from_value(raw).unwrap();
        assert!(envelope.code.is_success());
        let result = envelope.result.unwrap();
        assert_eq!(result.text, "こんにちは");
        assert_eq!(result.blank, 0);

        let information = result.information.unwrap();
        assert_eq!(information.sentence.len(), 1);
        let translate = &information.sentence[0].split[0].process.translate;
        assert_eq!(translate.reverse[0].name_n, "generalNT_en_ja");
        assert!((translate.reverse[0].score - 0.99).abs() < f64::EPSILON);

        let echo = envelope.request.unwrap();
        assert_eq!(echo.text, "Hello");
        assert_eq!(echo.log_use, 1);
    }

    #[test]
    fn decode_failure_envelope_without_result() {
        let raw = json!({ "code": 510, "message": "Authentication failed" });
        let envelope: ResponseEnvelope = serde_json::from_value(raw).unwrap();
        assert_eq!(envelope.code, ResponseCode(510));
        assert!(!envelope.code.is_success());
        assert!(envelope.result.is_none());
        assert!(envelope.request.is_none());
    }

    #[test]
    fn envelope_serialization_skips_absent_fields() {
        let envelope: ResponseEnvelope<TranslateResult> = ResponseEnvelope {
            code: ResponseCode::OK,
            message: "ok".to_string(),
            request: None,
            result: Some(TranslateResult {
                text: "hi".to_string(),
                blank: 0,
                information: None,
            }),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_json_include!(
            actual: value.clone(),
            expected: json!({ "code": 0, "message": "ok", "result": { "text": "hi" } })
        );
        assert!(value.get("request").is_none());
    }

    #[test]
    fn response_code_display_is_the_wire_value() {
        assert_eq!(ResponseCode(533).to_string(), "533");
        assert_eq!(ResponseCode::OK.to_string(), "0");
    }
}
