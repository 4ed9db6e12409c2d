use serde_json::Value;

use crate::{
    foundation::core::Frame,
    foundation::error::{SignplayError, SignplayResult},
    parse::frames::decode_frame_list,
};

/// Video file extensions recognized when classifying a media URI.
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "webm", "avi", "mkv"];

/// Sentinel `type` emitted by the backend for tokens with no dictionary entry.
const PLACEHOLDER_TYPE: &str = "placeholder_missing";

/// One discrete performable unit of output, backed by exactly one content source.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sign {
    /// Word/letter this sign performs; for placeholders, the unmapped token.
    pub label: String,
    /// Resolved content source.
    pub content: SignContent,
}

/// Content source for a sign, fixed at parse time.
///
/// Precedence among simultaneously present fields is
/// Video > InlineLandmarks > RemoteLandmarks, with the explicit
/// `placeholder_missing` sentinel checked first.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SignContent {
    /// Playable video clip, delegated to the external video collaborator.
    Video {
        /// Resolved or backend-relative media URI.
        uri: String,
    },
    /// Landmark frames carried inline in the reply.
    InlineLandmarks {
        /// Decoded canonical frames.
        frames: Vec<Frame>,
    },
    /// Landmark document to fetch before playback.
    RemoteLandmarks {
        /// Document URI.
        uri: String,
    },
    /// No content exists for this token; stalls with a user-facing message.
    PlaceholderMissing,
}

/// A tolerated per-entry parse problem; the entry was skipped.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseWarning {
    /// Index of the entry in the reply's sign list.
    pub index: usize,
    /// Why the entry was skipped.
    pub reason: String,
}

/// Result of decoding a translation reply.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParsedResponse {
    /// Ordered playable signs.
    pub signs: Vec<Sign>,
    /// Entries that were skipped, in reply order.
    pub warnings: Vec<ParseWarning>,
}

/// Decode a backend translation reply into an ordered sign list.
///
/// Accepted top-level shapes: `{"translation": {"signs": [...]}}`,
/// `{"signs": [...]}`, or the bare whole-utterance form
/// `{"landmark_data": [...]}`. Malformed individual entries are skipped with
/// a recorded warning; the parse fails only when no sign list can be located.
#[tracing::instrument(skip(value))]
pub fn parse_response(value: &Value) -> SignplayResult<ParsedResponse> {
    if let Some(entries) = locate_sign_list(value) {
        let entries = entries
            .as_array()
            .ok_or_else(|| SignplayError::parse("\"signs\" is not a list"))?;

        let mut signs = Vec::with_capacity(entries.len());
        let mut warnings = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match parse_entry(index, entry) {
                Ok(sign) => signs.push(sign),
                Err(e) => {
                    let reason = e.to_string();
                    tracing::warn!(index, %reason, "skipping malformed sign entry");
                    warnings.push(ParseWarning { index, reason });
                }
            }
        }
        return Ok(ParsedResponse { signs, warnings });
    }

    // The original service can reply with one unlabeled landmark tensor for
    // the whole utterance instead of a sign list.
    if let Some(data) = value.get("landmark_data") {
        let frames = decode_frame_list(data)
            .map_err(|e| SignplayError::parse(format!("top-level landmark_data: {e}")))?;
        return Ok(ParsedResponse {
            signs: vec![Sign {
                label: "translation".to_string(),
                content: SignContent::InlineLandmarks { frames },
            }],
            warnings: Vec::new(),
        });
    }

    Err(SignplayError::parse(
        "reply carries no \"signs\" list (checked top level and \"translation\")",
    ))
}

fn locate_sign_list(value: &Value) -> Option<&Value> {
    value
        .get("translation")
        .and_then(|t| t.get("signs"))
        .or_else(|| value.get("signs"))
}

fn parse_entry(index: usize, entry: &Value) -> SignplayResult<Sign> {
    let entry = entry
        .as_object()
        .ok_or_else(|| SignplayError::unresolvable("entry is not an object"))?;

    let label = ["label", "text"]
        .iter()
        .find_map(|k| entry.get(*k).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("sign-{index}"));

    if entry.get("type").and_then(Value::as_str) == Some(PLACEHOLDER_TYPE) {
        return Ok(Sign {
            label,
            content: SignContent::PlaceholderMissing,
        });
    }

    if let Some(uri) = ["video_path", "media_path"]
        .iter()
        .find_map(|k| entry.get(*k).and_then(Value::as_str))
        && has_video_extension(uri)
    {
        return Ok(Sign {
            label,
            content: SignContent::Video {
                uri: uri.to_string(),
            },
        });
    }

    match entry.get("landmark_data") {
        Some(data @ Value::Array(_)) => {
            let frames = decode_frame_list(data)?;
            return Ok(Sign {
                label,
                content: SignContent::InlineLandmarks { frames },
            });
        }
        Some(Value::String(uri)) => {
            return Ok(Sign {
                label,
                content: SignContent::RemoteLandmarks { uri: uri.clone() },
            });
        }
        _ => {}
    }

    if let Some(uri) = entry.get("animation_path").and_then(Value::as_str) {
        return Ok(Sign {
            label,
            content: SignContent::RemoteLandmarks {
                uri: uri.to_string(),
            },
        });
    }

    Err(SignplayError::unresolvable(format!(
        "entry '{label}' has no recognizable content field"
    )))
}

/// True when the URI's path component ends in a recognized video extension.
fn has_video_extension(uri: &str) -> bool {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    path.rsplit('.')
        .next()
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

#[cfg(test)]
#[path = "../../tests/unit/parse/response.rs"]
mod tests;
