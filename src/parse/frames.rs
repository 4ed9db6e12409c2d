use serde_json::Value;

use crate::{
    foundation::core::{Frame, Landmark},
    foundation::error::{SignplayError, SignplayResult},
};

/// Features per landmark in flat numeric frame arrays.
const FEATURES_PER_POINT: usize = 5;

fn default_confidence() -> f64 {
    1.0
}

#[derive(serde::Deserialize)]
struct PointMap {
    x: f64,
    y: f64,
    #[serde(default)]
    z: f64,
    #[serde(default = "default_confidence")]
    visibility: f64,
    #[serde(default = "default_confidence")]
    presence: f64,
}

impl From<PointMap> for Landmark {
    fn from(p: PointMap) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
            visibility: p.visibility,
            presence: p.presence,
        }
    }
}

#[derive(Default, serde::Deserialize)]
struct StructuredFrame {
    #[serde(default)]
    right_hand_landmarks: Vec<PointMap>,
    #[serde(default)]
    left_hand_landmarks: Vec<PointMap>,
}

#[derive(serde::Deserialize)]
struct StructuredDocument {
    frames: Vec<StructuredFrame>,
}

/// Decode a literal nested numeric array (`landmark_data`) into frames.
///
/// Each frame is either a flat numeric array chunked into 5 features per
/// point, or an array of per-point arrays `[x, y, z?, visibility?, presence?]`.
pub fn decode_frame_list(value: &Value) -> SignplayResult<Vec<Frame>> {
    let entries = value
        .as_array()
        .ok_or_else(|| SignplayError::decode("landmark data is not an array of frames"))?;
    entries
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            decode_frame(frame)
                .map_err(|e| SignplayError::decode(format!("frame {i}: {e}")))
        })
        .collect()
}

fn decode_frame(value: &Value) -> SignplayResult<Frame> {
    let entries = value
        .as_array()
        .ok_or_else(|| SignplayError::decode("frame is not an array"))?;
    if entries.is_empty() {
        return Ok(Frame::default());
    }

    if entries.iter().all(Value::is_number) {
        return decode_flat_frame(entries);
    }
    let points = entries
        .iter()
        .map(|p| match p.as_array() {
            Some(a) => decode_point_array(a),
            None => Err(SignplayError::decode(
                "frame mixes numbers and nested arrays",
            )),
        })
        .collect::<SignplayResult<Vec<_>>>()?;
    Ok(Frame::new(points))
}

fn decode_flat_frame(entries: &[Value]) -> SignplayResult<Frame> {
    if entries.len() % FEATURES_PER_POINT != 0 {
        return Err(SignplayError::decode(format!(
            "flat frame length {} is not a multiple of {FEATURES_PER_POINT}",
            entries.len()
        )));
    }
    let mut points = Vec::with_capacity(entries.len() / FEATURES_PER_POINT);
    for chunk in entries.chunks_exact(FEATURES_PER_POINT) {
        let mut f = [0.0f64; FEATURES_PER_POINT];
        for (slot, v) in f.iter_mut().zip(chunk) {
            *slot = v
                .as_f64()
                .ok_or_else(|| SignplayError::decode("non-numeric landmark feature"))?;
        }
        points.push(Landmark {
            x: f[0],
            y: f[1],
            z: f[2],
            visibility: f[3],
            presence: f[4],
        });
    }
    Ok(Frame::new(points))
}

fn decode_point_array(entries: &[Value]) -> SignplayResult<Landmark> {
    if !(3..=FEATURES_PER_POINT).contains(&entries.len()) {
        return Err(SignplayError::decode(format!(
            "point has {} features, expected 3 to {FEATURES_PER_POINT}",
            entries.len()
        )));
    }
    let feature = |i: usize, default: f64| -> SignplayResult<f64> {
        match entries.get(i) {
            Some(v) => v
                .as_f64()
                .ok_or_else(|| SignplayError::decode("non-numeric landmark feature")),
            None => Ok(default),
        }
    };
    Ok(Landmark {
        x: feature(0, 0.0)?,
        y: feature(1, 0.0)?,
        z: feature(2, 0.0)?,
        visibility: feature(3, 1.0)?,
        presence: feature(4, 1.0)?,
    })
}

/// Decode a remote landmark document body into frames.
///
/// Accepts either a bare JSON array of frames (as [`decode_frame_list`]) or a
/// structured object `{frames: [{right_hand_landmarks|left_hand_landmarks:
/// [{x, y, z, visibility?, presence?}, ...]}, ...]}`. A body that is not JSON
/// at all is a fetch-level failure; JSON of an unrecognized shape is a decode
/// failure, never a best-effort guess.
pub fn decode_landmark_document(body: &str) -> SignplayResult<Vec<Frame>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SignplayError::fetch(format!("malformed landmark body: {e}")))?;
    match &value {
        Value::Array(_) => decode_frame_list(&value),
        Value::Object(map) if map.contains_key("frames") => {
            let doc: StructuredDocument = serde_json::from_value(value)
                .map_err(|e| SignplayError::decode(format!("structured landmark body: {e}")))?;
            Ok(doc
                .frames
                .into_iter()
                .map(|f| {
                    // Right hand first, then left; absent hands are skipped.
                    let points = f
                        .right_hand_landmarks
                        .into_iter()
                        .chain(f.left_hand_landmarks)
                        .map(Landmark::from)
                        .collect();
                    Frame::new(points)
                })
                .collect())
        }
        _ => Err(SignplayError::decode(
            "unrecognized landmark document shape",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/parse/frames.rs"]
mod tests;
