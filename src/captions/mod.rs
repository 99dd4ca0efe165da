//! # Captions
//!
//! The contract with the captioning collaborator: which style is asked for,
//! the prompt sent along with the composed image, and how the raw model reply
//! is turned into a caption list. The network call itself lives outside the
//! crate; implementations of [`Captioner`] plug it in.

use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CaptionError;

/// Tone and language of the generated captions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionStyle {
    /// One cinematic short sentence in Simplified Chinese
    #[default]
    ShortSimplified,
    /// One imaginative line of poetry in Traditional Chinese
    PoeticTraditional,
    /// One atmospheric sentence of English prose
    EnglishProse,
}

impl CaptionStyle {
    pub const ALL: [CaptionStyle; 3] = [
        CaptionStyle::ShortSimplified,
        CaptionStyle::PoeticTraditional,
        CaptionStyle::EnglishProse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CaptionStyle::ShortSimplified => "short_simplified",
            CaptionStyle::PoeticTraditional => "poetic_traditional",
            CaptionStyle::EnglishProse => "english_prose",
        }
    }

    /// Instruction for a single photo in this style
    pub fn instruction(&self) -> &'static str {
        match self {
            CaptionStyle::ShortSimplified => "请为图片生成一句有电影感的简体中文短句。",
            CaptionStyle::PoeticTraditional => "請為圖片創作一句充滿詩意、富有想像的繁體中文詩。",
            CaptionStyle::EnglishProse => {
                "Please write a short, atmospheric, and poetic sentence in English for the image."
            }
        }
    }
}

impl FromStr for CaptionStyle {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        CaptionStyle::ALL
            .into_iter()
            .find(|style| style.name() == normalized)
            .ok_or_else(|| CaptionError::UnknownStyle { name: s.to_string() })
    }
}

impl fmt::Display for CaptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Prompt sent with the composed image
///
/// With more than one photo the model is asked for one caption per photo,
/// top to bottom. Either way the reply is requested as `{"texts": [...]}`.
pub fn build_prompt(style: CaptionStyle, count: usize) -> String {
    if count > 1 {
        let example: Vec<String> = (1..=count).map(|i| format!("\"caption for photo {}\"", i)).collect();
        format!(
            "This image is a strip of {count} photos stacked top to bottom. \
             Write one caption for each photo, in order from top to bottom. \
             Style: {instruction} \
             Reply with JSON only, exactly in this shape: {{\"texts\": [{example}]}}",
            count = count,
            instruction = style.instruction(),
            example = example.join(", "),
        )
    } else {
        format!(
            "{} Reply with JSON only, exactly in this shape: {{\"texts\": [\"caption\"]}}",
            style.instruction()
        )
    }
}

/// Turn a raw model reply into captions
///
/// Markdown code fences around the reply are ignored. A JSON object with a
/// `texts` array yields those strings; any other JSON object yields a single
/// entry reporting the unknown format; anything that is not JSON is taken as
/// one caption verbatim.
pub fn parse_caption_response(raw: &str) -> Result<Vec<String>, CaptionError> {
    let text = strip_code_fence(raw.trim());
    if text.is_empty() {
        return Err(CaptionError::EmptyResponse);
    }

    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(_) => {
            debug!("Caption reply is not JSON, using it as plain text");
            return Ok(vec![text.to_string()]);
        }
    };

    let captions = match value {
        Value::Object(mut map) => match map.remove("texts") {
            Some(Value::Array(items)) => items.into_iter().map(value_to_caption).collect(),
            Some(other) => vec![value_to_caption(other)],
            None => vec![format!("Unknown caption format: {}", text)],
        },
        Value::Array(items) => items.into_iter().map(value_to_caption).collect(),
        other => vec![value_to_caption(other)],
    };
    Ok(captions)
}

fn value_to_caption(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Source of captions for a composed image
pub trait Captioner {
    /// Generate `count` captions for `image`, one per photo from the top
    fn generate_captions(
        &self,
        image: &RgbImage,
        style: CaptionStyle,
        count: usize,
    ) -> Result<Vec<String>, CaptionError>;
}

/// Captions supplied up front, e.g. on the command line
#[derive(Debug, Clone, Default)]
pub struct StaticCaptioner {
    captions: Vec<String>,
}

impl StaticCaptioner {
    pub fn new(captions: Vec<String>) -> Self {
        Self { captions }
    }
}

impl Captioner for StaticCaptioner {
    fn generate_captions(
        &self,
        _image: &RgbImage,
        _style: CaptionStyle,
        count: usize,
    ) -> Result<Vec<String>, CaptionError> {
        Ok(self.captions.iter().take(count.max(1)).cloned().collect())
    }
}

/// Replays a raw model reply, e.g. one saved to a file
#[derive(Debug, Clone)]
pub struct ResponseCaptioner {
    raw: String,
}

impl ResponseCaptioner {
    pub fn new<S: Into<String>>(raw: S) -> Self {
        Self { raw: raw.into() }
    }
}

impl Captioner for ResponseCaptioner {
    fn generate_captions(
        &self,
        _image: &RgbImage,
        _style: CaptionStyle,
        _count: usize,
    ) -> Result<Vec<String>, CaptionError> {
        parse_caption_response(&self.raw)
    }
}

/// Recover from a captioning failure with a one-element caption list
///
/// An empty reply becomes `placeholder`; any other failure becomes its
/// error message, so the user sees what went wrong on the image itself.
pub fn captions_or_placeholder(
    result: Result<Vec<String>, CaptionError>,
    placeholder: &str,
) -> Vec<String> {
    match result {
        Ok(captions) => captions,
        Err(CaptionError::EmptyResponse) => {
            warn!("Captioning returned nothing, using placeholder");
            vec![placeholder.to_string()]
        }
        Err(e) => {
            warn!("Captioning failed: {}", e);
            vec![e.to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_names_roundtrip() {
        for style in CaptionStyle::ALL {
            assert_eq!(style.name().parse::<CaptionStyle>().unwrap(), style);
        }
        assert_eq!("English-Prose".parse::<CaptionStyle>().unwrap(), CaptionStyle::EnglishProse);
        assert!(matches!(
            "haiku".parse::<CaptionStyle>(),
            Err(CaptionError::UnknownStyle { .. })
        ));
    }

    #[test]
    fn test_prompt_for_single_photo() {
        let prompt = build_prompt(CaptionStyle::EnglishProse, 1);
        assert!(prompt.starts_with("Please write a short"));
        assert!(prompt.contains(r#"{"texts": ["caption"]}"#));
    }

    #[test]
    fn test_prompt_for_strip_lists_every_photo() {
        let prompt = build_prompt(CaptionStyle::ShortSimplified, 3);
        assert!(prompt.contains("3 photos"));
        assert!(prompt.contains("top to bottom"));
        assert!(prompt.contains("\"caption for photo 3\""));
        assert!(prompt.contains(CaptionStyle::ShortSimplified.instruction()));
    }

    #[test]
    fn test_parse_json_texts() {
        let captions = parse_caption_response(r#" {"texts": ["晨光", "Dusk", "夜"]} "#).unwrap();
        assert_eq!(captions, vec!["晨光", "Dusk", "夜"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"texts\": [\"one\"]}\n```";
        assert_eq!(parse_caption_response(raw).unwrap(), vec!["one"]);
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(
            parse_caption_response("A quiet street after rain.").unwrap(),
            vec!["A quiet street after rain."]
        );
    }

    #[test]
    fn test_parse_unknown_json_shape() {
        let captions = parse_caption_response(r#"{"caption": "x"}"#).unwrap();
        assert_eq!(captions.len(), 1);
        assert!(captions[0].starts_with("Unknown caption format"));
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(matches!(parse_caption_response("   "), Err(CaptionError::EmptyResponse)));
        assert!(matches!(parse_caption_response("```\n```"), Err(CaptionError::EmptyResponse)));
    }

    #[test]
    fn test_static_captioner_limits_count() {
        let captioner = StaticCaptioner::new(vec!["a".into(), "b".into(), "c".into()]);
        let image = RgbImage::new(1, 1);
        let captions = captioner.generate_captions(&image, CaptionStyle::default(), 1).unwrap();
        assert_eq!(captions, vec!["a"]);
    }

    #[test]
    fn test_placeholder_recovery() {
        assert_eq!(
            captions_or_placeholder(Err(CaptionError::EmptyResponse), "none yet"),
            vec!["none yet"]
        );

        let failed = captions_or_placeholder(
            Err(CaptionError::RequestFailed { reason: "timeout".into() }),
            "none yet",
        );
        assert_eq!(failed.len(), 1);
        assert!(failed[0].contains("timeout"));

        assert_eq!(captions_or_placeholder(Ok(vec!["x".into()]), "p"), vec!["x"]);
    }
}
