//! Source maps: the v3 JSON file model and its decoded segment lists.
//!
//! [`Mappings`] holds segments in absolute coordinates, one list per
//! generated line. [`Mappings::encode`] and [`Mappings::decode`] convert to
//! and from the relative `mappings` string: generated columns are relative
//! to the previous segment of the same line, origin fields are relative to
//! the previous segment of the whole map.

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, MappingResult};
use crate::vlq;

/// The only source map version produced and accepted.
pub const SOURCE_MAP_VERSION: u32 = 3;

// ══════════════════════════════════════════════════════════════════════════════
// Segments
// ══════════════════════════════════════════════════════════════════════════════

/// One decoded mapping segment; all coordinates are 0-based and absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub generated_column: u32,
    pub source: u32,
    pub original_line: u32,
    pub original_column: u32,
}

impl Segment {
    pub fn new(generated_column: u32, original_line: u32, original_column: u32) -> Self {
        Self {
            generated_column,
            source: 0,
            original_line,
            original_column,
        }
    }
}

/// Decoded segments, indexed by generated line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mappings {
    pub lines: Vec<Vec<Segment>>,
}

impl Mappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment to `generated_line`, growing the line list as needed.
    pub fn push(&mut self, generated_line: u32, segment: Segment) {
        let line = generated_line as usize;
        if self.lines.len() <= line {
            self.lines.resize_with(line + 1, Vec::new);
        }
        self.lines[line].push(segment);
    }

    /// Segments of one generated line; empty when the line has none.
    pub fn line(&self, generated_line: u32) -> &[Segment] {
        self.lines
            .get(generated_line as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every segment with its generated line, in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Segment)> {
        self.lines
            .iter()
            .enumerate()
            .flat_map(|(line, segments)| segments.iter().map(move |s| (line as u32, s)))
    }

    /// Total number of segments.
    pub fn len(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(Vec::is_empty)
    }

    /// Re-delta-encode into a `mappings` string.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        let mut prev_source = 0i64;
        let mut prev_line = 0i64;
        let mut prev_column = 0i64;

        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                out.push(';');
            }
            let mut prev_generated = 0i64;
            for (i, segment) in line.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let generated = i64::from(segment.generated_column);
                let source = i64::from(segment.source);
                let original_line = i64::from(segment.original_line);
                let original_column = i64::from(segment.original_column);
                vlq::encode_value(generated - prev_generated, &mut out);
                vlq::encode_value(source - prev_source, &mut out);
                vlq::encode_value(original_line - prev_line, &mut out);
                vlq::encode_value(original_column - prev_column, &mut out);
                prev_generated = generated;
                prev_source = source;
                prev_line = original_line;
                prev_column = original_column;
            }
        }
        out
    }

    /// Decode a `mappings` string. Segments without an origin (one field)
    /// still advance the generated column but are not kept.
    pub fn decode(mappings: &str) -> MappingResult<Self> {
        let mut lines = Vec::new();
        let mut prev_source = 0i64;
        let mut prev_line = 0i64;
        let mut prev_column = 0i64;

        for (line_idx, line) in mappings.split(';').enumerate() {
            let mut segments = Vec::new();
            let mut generated = 0i64;
            for encoded in line.split(',').filter(|s| !s.is_empty()) {
                let fields = vlq::decode(encoded)?;
                match fields.len() {
                    1 => {
                        generated += fields[0];
                        continue;
                    }
                    4 | 5 => {}
                    n => return Err(MappingError::SegmentLength(n)),
                }
                generated += fields[0];
                prev_source += fields[1];
                prev_line += fields[2];
                prev_column += fields[3];
                let coordinate = |value: i64| {
                    u32::try_from(value)
                        .map_err(|_| MappingError::NegativeCoordinate { line: line_idx })
                };
                segments.push(Segment {
                    generated_column: coordinate(generated)?,
                    source: coordinate(prev_source)?,
                    original_line: coordinate(prev_line)?,
                    original_column: coordinate(prev_column)?,
                });
            }
            lines.push(segments);
        }

        while lines.last().is_some_and(Vec::is_empty) {
            lines.pop();
        }
        Ok(Self { lines })
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// SourceMap
// ══════════════════════════════════════════════════════════════════════════════

/// A v3 source map file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u32,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub source_root: String,
    pub sources: Vec<String>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// A single-source map for `file` with the given segments.
    pub fn new(file: impl Into<String>, source: impl Into<String>, mappings: &Mappings) -> Self {
        Self {
            version: SOURCE_MAP_VERSION,
            file: file.into(),
            source_root: String::new(),
            sources: vec![source.into()],
            names: Vec::new(),
            mappings: mappings.encode(),
        }
    }

    /// Decoded segments of this map.
    pub fn decoded(&self) -> MappingResult<Mappings> {
        Mappings::decode(&self.mappings)
    }

    pub fn to_json(&self) -> MappingResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a map, rejecting versions other than 3.
    pub fn from_json(json: &str) -> MappingResult<Self> {
        let map: SourceMap = serde_json::from_str(json)?;
        if map.version != SOURCE_MAP_VERSION {
            return Err(MappingError::UnsupportedVersion(map.version));
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_resets_generated_column_per_line() {
        let mut m = Mappings::new();
        m.push(0, Segment::new(0, 0, 0));
        m.push(0, Segment::new(4, 0, 6));
        m.push(2, Segment::new(2, 1, 4));
        assert_eq!(m.encode(), "AAAA,IAAM;;EACF");
    }

    #[test]
    fn decode_restores_absolute_coordinates() {
        let m = Mappings::decode("AAAA,IAAM;;EACF").unwrap();
        assert_eq!(m.lines.len(), 3);
        assert_eq!(m.line(0)[1], Segment::new(4, 0, 6));
        assert!(m.line(1).is_empty());
        assert_eq!(m.line(2)[0], Segment::new(2, 1, 4));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn single_field_segments_only_move_the_column() {
        let m = Mappings::decode("E,EAAA").unwrap();
        assert_eq!(m.line(0), &[Segment::new(4, 0, 0)]);
    }

    #[test]
    fn malformed_segments_are_errors() {
        assert!(matches!(
            Mappings::decode("AA"),
            Err(MappingError::SegmentLength(2))
        ));
        assert!(matches!(
            Mappings::decode("AAAD"),
            Err(MappingError::NegativeCoordinate { line: 0 })
        ));
    }

    #[test]
    fn json_uses_camel_case_fields() {
        let map = SourceMap::new("out.js", "../src/in.ts", &Mappings::new());
        let json = map.to_json().unwrap();
        assert!(json.contains("\"sourceRoot\":\"\""));
        assert!(json.contains("\"sources\":[\"../src/in.ts\"]"));
        assert_eq!(SourceMap::from_json(&json).unwrap(), map);
    }

    #[test]
    fn other_versions_are_rejected() {
        let json = r#"{"version":2,"sources":[],"mappings":""}"#;
        assert!(matches!(
            SourceMap::from_json(json),
            Err(MappingError::UnsupportedVersion(2))
        ));
    }
}
