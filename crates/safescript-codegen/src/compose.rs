//! Composition of chained position mappings.
//!
//! Given `first: original → intermediate` and `second: intermediate → final`,
//! every segment of `second` is re-pointed at the original position of the
//! `first` segment that covers its intermediate position: the segment on the
//! same intermediate line with the greatest column not past it. Segments
//! with no such cover are dropped.

use crate::error::MappingResult;
use crate::source_map::{Mappings, Segment, SourceMap};

/// Compose two decoded mappings.
pub fn compose(first: &Mappings, second: &Mappings) -> Mappings {
    let mut out = Mappings::new();
    for (generated_line, segment) in second.iter() {
        match floor_segment(first.line(segment.original_line), segment.original_column) {
            Some(cover) => out.push(
                generated_line,
                Segment {
                    generated_column: segment.generated_column,
                    source: cover.source,
                    original_line: cover.original_line,
                    original_column: cover.original_column,
                },
            ),
            None => tracing::trace!(
                line = generated_line,
                column = segment.generated_column,
                "dropping segment with no covering origin"
            ),
        }
    }
    if let Some(last) = second.lines.len().checked_sub(1) {
        if out.lines.len() <= last {
            out.lines.resize_with(last + 1, Vec::new);
        }
    }
    out
}

/// Compose two source map files. The result names the final file and keeps
/// the first map's sources.
pub fn compose_source_maps(first: &SourceMap, second: &SourceMap) -> MappingResult<SourceMap> {
    let composed = compose(&first.decoded()?, &second.decoded()?);
    Ok(SourceMap {
        version: second.version,
        file: second.file.clone(),
        source_root: first.source_root.clone(),
        sources: first.sources.clone(),
        names: second.names.clone(),
        mappings: composed.encode(),
    })
}

/// The segment of `line` with the greatest generated column `<= column`.
/// Ties go to the earliest segment.
fn floor_segment(line: &[Segment], column: u32) -> Option<&Segment> {
    line.iter()
        .filter(|s| s.generated_column <= column)
        .fold(None, |best: Option<&Segment>, s| match best {
            Some(b) if b.generated_column >= s.generated_column => Some(b),
            _ => Some(s),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mappings(lines: &[&[(u32, u32, u32)]]) -> Mappings {
        let mut m = Mappings::new();
        for (idx, line) in lines.iter().enumerate() {
            for &(generated, orig_line, orig_col) in line.iter() {
                m.push(idx as u32, Segment::new(generated, orig_line, orig_col));
            }
        }
        if m.lines.len() < lines.len() {
            m.lines.resize_with(lines.len(), Vec::new);
        }
        m
    }

    #[test]
    fn floor_match_picks_greatest_column_not_past() {
        // first: intermediate line 0 has segments at columns 0 and 10.
        let first = mappings(&[&[(0, 0, 0), (10, 3, 4)]]);
        // second: final segments pointing at intermediate columns 12 and 5.
        let second = mappings(&[&[(0, 0, 12), (7, 0, 5)]]);
        let composed = compose(&first, &second);
        assert_eq!(
            composed.line(0),
            &[Segment::new(0, 3, 4), Segment::new(7, 0, 0)]
        );
    }

    #[test]
    fn segment_without_cover_is_dropped() {
        let first = mappings(&[&[(4, 1, 1)], &[]]);
        // column 2 precedes every first-stage segment on line 0; line 1 is empty.
        let second = mappings(&[&[(0, 0, 2), (3, 1, 0)], &[(0, 0, 9)]]);
        let composed = compose(&first, &second);
        assert!(composed.line(0).is_empty());
        assert_eq!(composed.line(1), &[Segment::new(0, 1, 1)]);
        assert_eq!(composed.lines.len(), 2);
    }

    #[test]
    fn line_past_first_map_is_dropped() {
        let first = mappings(&[&[(0, 0, 0)]]);
        let second = mappings(&[&[(0, 5, 0)]]);
        assert!(compose(&first, &second).is_empty());
    }

    #[test]
    fn composed_file_keeps_first_sources() {
        let first = SourceMap::new("mid.ts", "../src/orig.ts", &mappings(&[&[(0, 0, 0)]]));
        let second = SourceMap::new("mid.js", "mid.ts", &mappings(&[&[(2, 0, 0)]]));
        let composed = compose_source_maps(&first, &second).unwrap();
        assert_eq!(composed.file, "mid.js");
        assert_eq!(composed.sources, vec!["../src/orig.ts".to_string()]);
        assert_eq!(composed.mappings, "EAAA");
    }
}
