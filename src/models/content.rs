use serde::{Deserialize, Serialize};

/// One unit of a `generateContent` request: either prompt text or inline media.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        ContentPart::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<ContentPart>,
}

impl GenerateContentRequest {
    /// Wraps the parts as the single user turn of the request.
    pub fn from_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            contents: vec![RequestContent { parts }],
        }
    }
}

// Response side. Every level is optional and may be null, so an odd reply
// surfaces as a missing image. The REST API answers in camelCase, the
// aliases cover the snake_case form some proxies emit.

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "inlineData", alias = "inline_data")]
    pub inline_data: Option<ResponseBlob>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseBlob {
    #[serde(default, rename = "mimeType", alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

impl GenerateContentResponse {
    /// Reads an already parsed body. `None` when the JSON is not an object of
    /// the expected shape at all (a bare `null`, an array, a string).
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.as_ref().map_or(0, Vec::len)
    }

    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.as_ref()?.first()
    }

    /// The first inline payload among the first candidate's parts.
    pub fn first_inline_blob(&self) -> Option<&ResponseBlob> {
        self.first_candidate()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .filter_map(|part| part.inline_data.as_ref())
            .find(|blob| blob.data.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_only_payload() {
        let request = GenerateContentRequest::from_parts(vec![ContentPart::text("a red cube")]);
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"contents":[{"parts":[{"text":"a red cube"}]}]}"#
        );
    }

    #[test]
    fn test_inline_part_shape() {
        let part = ContentPart::inline("image/png", "iVBORw0KGgo=");
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}})
        );
    }

    #[test]
    fn test_parts_keep_order() {
        let request = GenerateContentRequest::from_parts(vec![
            ContentPart::text("make it blue"),
            ContentPart::inline("image/jpeg", "AAAA"),
        ]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contents": [{"parts": [
                {"text": "make it blue"},
                {"inlineData": {"mimeType": "image/jpeg", "data": "AAAA"}}
            ]}]})
        );
    }

    #[test]
    fn test_first_inline_blob_skips_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Here is your image"},
                        {"inlineData": {"mimeType": "image/png", "data": "first"}},
                        {"inlineData": {"mimeType": "image/webp", "data": "second"}}
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 5}
        }))
        .unwrap();

        let blob = response.first_inline_blob().unwrap();
        assert_eq!(blob.mime_type.as_deref(), Some("image/png"));
        assert_eq!(blob.data.as_deref(), Some("first"));
    }

    #[test]
    fn test_snake_case_reply() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"inline_data": {"mime_type": "image/jpeg", "data": "abc"}}
            ]}}]
        }))
        .unwrap();

        let blob = response.first_inline_blob().unwrap();
        assert_eq!(blob.mime_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn test_missing_levels() {
        let cases = [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
            json!({"candidates": [{"content": {}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": "no image today"}]}}]}),
            json!({"candidates": [{"content": {"parts": [{"inlineData": {"mimeType": "image/png"}}]}}]}),
            json!({"candidates": null}),
            json!({"candidates": [{"content": null}]}),
            json!({"candidates": [{"content": {"parts": null}}]}),
            json!({"candidates": [{"content": {"parts": [{"inlineData": null}]}}]}),
            json!({"candidates": [{"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": null}}]}}]}),
        ];

        for case in cases {
            let response = GenerateContentResponse::from_value(case.clone()).unwrap();
            assert!(response.first_inline_blob().is_none(), "{case}");
        }
    }

    #[test]
    fn test_non_object_bodies() {
        for case in [json!(null), json!(42), json!("image"), json!({"candidates": "none"})] {
            assert!(GenerateContentResponse::from_value(case.clone()).is_none(), "{case}");
        }
    }

    #[test]
    fn test_only_first_candidate_is_searched() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "nothing"}]}},
                {"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "x"}}]}}
            ]
        }))
        .unwrap();

        assert!(response.first_inline_blob().is_none());
    }
}
