//! Typed views over decoded clip descriptors.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::fields::{as_array, as_int, as_object, as_str, json_type_name, lookup, require};
use crate::orchestrator::{ImportError, ImportResult};

/// Key holding the embedded timeline of compound descriptors.
pub const TIMELINE_XML_KEY: &str = "subclip.xml";

/// Duration given to markers without an out point.
pub const POINT_MARKER_DURATION: i64 = 1;

/// Recognized descriptor types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipType {
    Clip,
    Still,
    Audio,
    Subclip,
    Seq,
}

impl ClipType {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "clip" => Some(Self::Clip),
            "still" => Some(Self::Still),
            "audio" => Some(Self::Audio),
            "subclip" => Some(Self::Subclip),
            "seq" => Some(Self::Seq),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clip => "clip",
            Self::Still => "still",
            Self::Audio => "audio",
            Self::Subclip => "subclip",
            Self::Seq => "seq",
        }
    }

    /// Whether this type is imported through an embedded timeline.
    pub fn is_compound(&self) -> bool {
        matches!(self, Self::Subclip | Self::Seq)
    }
}

impl fmt::Display for ClipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the media of a descriptor comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipSource<'a> {
    /// An existing local file.
    File(PathBuf),
    /// Timeline XML to be collapsed into a compound clip.
    Timeline(&'a str),
}

/// A descriptor whose type and media source have been validated.
///
/// Metadata fields are checked when they are read, so a malformed
/// `name` only surfaces once the clip exists and can be rolled back.
#[derive(Debug, Clone)]
pub struct ClipDescriptor<'a> {
    clip_type: ClipType,
    source: ClipSource<'a>,
    fields: &'a Map<String, Value>,
}

impl<'a> ClipDescriptor<'a> {
    pub fn clip_type(&self) -> ClipType {
        self.clip_type
    }

    pub fn source(&self) -> &ClipSource<'a> {
        &self.source
    }

    /// Display name, if one was given.
    pub fn name(&self) -> ImportResult<Option<&'a str>> {
        lookup(self.fields, "name")
            .map(|value| as_str("name", value))
            .transpose()
    }

    /// Asset identifier, as text. Integers are accepted as well as strings.
    pub fn asset_id(&self) -> ImportResult<Option<String>> {
        match lookup(self.fields, "ID") {
            None => Ok(None),
            Some(Value::String(id)) => Ok(Some(id.clone())),
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(Some(n.to_string())),
            Some(other) => Err(ImportError::validation(format!(
                "field 'ID' must be a string or an integer, found {}",
                json_type_name(other)
            ))),
        }
    }

    /// Free-text notes. An explicit null counts as absent.
    pub fn notes(&self) -> ImportResult<Option<&'a str>> {
        match lookup(self.fields, "notes") {
            None | Some(Value::Null) => Ok(None),
            Some(value) => as_str("notes", value).map(Some),
        }
    }

    /// Markers in declaration order.
    pub fn markers(&self) -> ImportResult<Vec<MarkerDescriptor>> {
        let Some(value) = lookup(self.fields, "markers") else {
            return Ok(Vec::new());
        };
        as_array("markers", value)?
            .iter()
            .map(parse_marker)
            .collect()
    }
}

/// One marker as described by the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDescriptor {
    pub name: String,
    pub description: String,
    pub in_frame: i64,
    pub out_frame: Option<i64>,
}

impl MarkerDescriptor {
    /// Length in frames. Fails when `out - in` does not fit in an `i64`.
    pub fn duration(&self) -> ImportResult<i64> {
        match self.out_frame {
            Some(out) => out.checked_sub(self.in_frame).ok_or_else(|| {
                ImportError::validation(format!(
                    "marker '{}' spans {}..{}, which is out of range",
                    self.name, self.in_frame, out
                ))
            }),
            None => Ok(POINT_MARKER_DURATION),
        }
    }

    /// Marker position relative to a clip starting at `clip_start`.
    pub fn pool_frame(&self, clip_start: i64) -> ImportResult<i64> {
        self.in_frame.checked_sub(clip_start).ok_or_else(|| {
            ImportError::validation(format!(
                "marker '{}' at frame {} is out of range for a clip starting at {}",
                self.name, self.in_frame, clip_start
            ))
        })
    }
}

/// Validate one entry of a `markers` list.
pub fn parse_marker(value: &Value) -> ImportResult<MarkerDescriptor> {
    let fields = as_object("marker", value)?;

    let name = as_str("name", require(fields, "name")?)?.to_string();
    let description = as_str("description", require(fields, "description")?)?.to_string();
    let in_frame = frame_of("in", require(fields, "in")?)?;
    let out_frame = lookup(fields, "out")
        .map(|out| frame_of("out", out))
        .transpose()?;

    Ok(MarkerDescriptor {
        name,
        description,
        in_frame,
        out_frame,
    })
}

fn frame_of(key: &str, value: &Value) -> ImportResult<i64> {
    let point = as_object(key, value)?;
    as_int("frm", require(point, "frm")?)
}

/// Validate the header of a descriptor: its shape, its type and its media source.
///
/// An unknown `type` is [`ImportError::Unsupported`]; a simple type whose
/// file does not exist is [`ImportError::AssetNotFound`].
pub fn parse_descriptor(value: &Value) -> ImportResult<ClipDescriptor<'_>> {
    let fields = as_object("descriptor", value)?;

    let type_name = as_str("type", require(fields, "type")?)?;
    let clip_type =
        ClipType::parse(type_name).ok_or_else(|| ImportError::unsupported(type_name))?;

    let source = if clip_type.is_compound() {
        ClipSource::Timeline(as_str(TIMELINE_XML_KEY, require(fields, TIMELINE_XML_KEY)?)?)
    } else {
        ClipSource::File(media_path(fields)?)
    };

    Ok(ClipDescriptor {
        clip_type,
        source,
        fields,
    })
}

fn media_path(fields: &Map<String, Value>) -> ImportResult<PathBuf> {
    let media = as_object("media", require(fields, "media")?)?;
    let path = Path::new(as_str("filePath", require(media, "filePath")?)?);

    if !path.is_file() {
        return Err(ImportError::asset_not_found(path));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::ErrorKind;
    use serde_json::json;
    use tempfile::tempdir;

    fn kind_of(value: &Value) -> ErrorKind {
        parse_descriptor(value).unwrap_err().kind()
    }

    #[test]
    fn parses_simple_descriptor() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mov");
        std::fs::write(&file, b"media").unwrap();

        let value = json!({
            "type": "clip",
            "media": {"filePath": file.to_str().unwrap()},
            "name": "A",
            "ID": 42,
            "notes": null
        });
        let descriptor = parse_descriptor(&value).unwrap();

        assert_eq!(descriptor.clip_type(), ClipType::Clip);
        assert_eq!(descriptor.source(), &ClipSource::File(file));
        assert_eq!(descriptor.name().unwrap(), Some("A"));
        assert_eq!(descriptor.asset_id().unwrap(), Some("42".to_string()));
        assert_eq!(descriptor.notes().unwrap(), None);
        assert!(descriptor.markers().unwrap().is_empty());
    }

    #[test]
    fn compound_types_need_timeline_xml() {
        let value = json!({"type": "seq", "subclip.xml": "<xmeml/>"});
        let descriptor = parse_descriptor(&value).unwrap();
        assert_eq!(descriptor.source(), &ClipSource::Timeline("<xmeml/>"));

        assert_eq!(kind_of(&json!({"type": "subclip"})), ErrorKind::Validation);
        assert_eq!(
            kind_of(&json!({"type": "subclip", "subclip.xml": 3})),
            ErrorKind::Validation
        );
    }

    #[test]
    fn header_errors_are_classified() {
        assert_eq!(kind_of(&json!("clip")), ErrorKind::Validation);
        assert_eq!(kind_of(&json!({})), ErrorKind::Validation);
        assert_eq!(kind_of(&json!({"type": 7})), ErrorKind::Validation);
        assert_eq!(kind_of(&json!({"type": "widget"})), ErrorKind::Unsupported);
        assert_eq!(kind_of(&json!({"type": "clip"})), ErrorKind::Validation);
        assert_eq!(
            kind_of(&json!({"type": "clip", "media": "a.mov"})),
            ErrorKind::Validation
        );
        assert_eq!(
            kind_of(&json!({"type": "still", "media": {"filePath": null}})),
            ErrorKind::Validation
        );
        assert_eq!(
            kind_of(&json!({"type": "audio", "media": {"filePath": "/missing"}})),
            ErrorKind::AssetNotFound
        );
    }

    #[test]
    fn directory_is_not_an_asset() {
        let dir = tempdir().unwrap();
        let value = json!({"type": "clip", "media": {"filePath": dir.path().to_str().unwrap()}});
        assert_eq!(kind_of(&value), ErrorKind::AssetNotFound);
    }

    #[test]
    fn malformed_metadata_is_lazy() {
        let value = json!({
            "type": "seq",
            "subclip.xml": "<xmeml/>",
            "name": 5,
            "ID": [1],
            "notes": false,
            "markers": {}
        });
        let descriptor = parse_descriptor(&value).unwrap();

        assert!(descriptor.name().is_err());
        assert!(descriptor.asset_id().is_err());
        assert!(descriptor.notes().is_err());
        assert!(descriptor.markers().is_err());
    }

    #[test]
    fn marker_frames_and_durations() {
        let point = parse_marker(&json!({"name": "a", "description": "", "in": {"frm": 5}})).unwrap();
        assert_eq!(point.pool_frame(0).unwrap(), 5);
        assert_eq!(point.duration().unwrap(), 1);

        let range = parse_marker(&json!({
            "name": "b",
            "description": "d",
            "in": {"frm": 5},
            "out": {"frm": 15}
        }))
        .unwrap();
        assert_eq!(range.pool_frame(0).unwrap(), 5);
        assert_eq!(range.duration().unwrap(), 10);
        assert_eq!(range.pool_frame(3).unwrap(), 2);
    }

    #[test]
    fn extreme_marker_frames_are_rejected() {
        let span = parse_marker(&json!({
            "name": "wide",
            "description": "",
            "in": {"frm": i64::MIN},
            "out": {"frm": i64::MAX}
        }))
        .unwrap();
        assert_eq!(span.duration().unwrap_err().kind(), ErrorKind::Validation);

        let early = parse_marker(&json!({"name": "early", "description": "", "in": {"frm": i64::MIN}}))
            .unwrap();
        assert_eq!(early.pool_frame(1).unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(early.pool_frame(0).unwrap(), i64::MIN);
    }

    #[test]
    fn marker_fields_are_strict() {
        let bad = [
            json!([]),
            json!({"description": "", "in": {"frm": 1}}),
            json!({"name": "a", "in": {"frm": 1}}),
            json!({"name": "a", "description": 1, "in": {"frm": 1}}),
            json!({"name": "a", "description": ""}),
            json!({"name": "a", "description": "", "in": 1}),
            json!({"name": "a", "description": "", "in": {"frm": 1.5}}),
            json!({"name": "a", "description": "", "in": {"frm": 1}, "out": null}),
            json!({"name": "a", "description": "", "in": {"frm": 1}, "out": {}}),
        ];
        for value in &bad {
            let err = parse_marker(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "accepted {}", value);
        }
    }

    #[test]
    fn clip_type_names_round_trip() {
        for name in ["clip", "still", "audio", "subclip", "seq"] {
            assert_eq!(ClipType::parse(name).unwrap().as_str(), name);
        }
        assert!(ClipType::parse("Clip").is_none());
    }
}
