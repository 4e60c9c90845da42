// Copyright 2026 The Matrix.org Foundation C.I.C.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! How edits move marks.
//!
//! An edit is described by a position and a signed length. Insertions
//! (`delta > 0`) shift every mark starting at or after the position and
//! stretch marks the position falls strictly inside. Text typed right at a
//! mark's end is therefore not swallowed by it, nor is text typed right at
//! its start.
//!
//! Deletions (`delta < 0`) erase `[position, position - delta)`. A mark end
//! that falls inside the erased span collapses onto `position`, so a
//! deletion crossing one edge of a mark truncates it and a deletion
//! covering a whole mark leaves it degenerate.
//!
//! Degenerate marks are always dropped.

use crate::mark::{shift, Mark, Range};
use crate::mark_store::normalize;
use crate::text::utf16_len;

/// What an [`adjust`] call did beyond moving ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Adjusted {
    /// Marks that became degenerate and were removed.
    pub dropped: Vec<Mark>,
    /// Whether the edit landed inside or on the edge of an atomic mark,
    /// which means its reference should be re-validated.
    pub touched_atomic: bool,
}

pub fn adjust(
    marks: &mut Vec<Mark>,
    position: usize,
    delta: isize,
) -> Adjusted {
    let mut adjusted = Adjusted::default();
    if delta == 0 {
        return adjusted;
    }
    for mark in marks.iter_mut() {
        let Range { from, to } = mark.range;
        if mark.mark_type.is_atomic() && edit_touches(from, to, position, delta)
        {
            adjusted.touched_atomic = true;
        }
        mark.range = if delta > 0 {
            if position <= from {
                mark.range.shifted(delta)
            } else if position < to {
                Range::new(from, shift(to, delta))
            } else {
                mark.range
            }
        } else {
            let erased = delta.unsigned_abs();
            Range::new(
                map_deleted(from, position, erased),
                map_deleted(to, position, erased),
            )
        };
    }
    let (kept, dropped) = std::mem::take(marks)
        .into_iter()
        .partition::<Vec<_>, _>(|m| !m.range.is_empty());
    *marks = kept;
    normalize(marks);
    if !dropped.is_empty() {
        log::debug!(
            "adjust({position}, {delta}) dropped {} marks",
            dropped.len()
        );
    }
    adjusted.dropped = dropped;
    adjusted
}

fn map_deleted(pos: usize, at: usize, erased: usize) -> usize {
    if pos <= at {
        pos
    } else if pos < at + erased {
        at
    } else {
        pos - erased
    }
}

fn edit_touches(from: usize, to: usize, at: usize, delta: isize) -> bool {
    if delta > 0 {
        from <= at && at <= to
    } else {
        at <= to && at + delta.unsigned_abs() >= from
    }
}

/// Clamp every mark into `text`, drop empty spans and unresolvable
/// params, and merge whatever now overlaps.
pub fn check_ranges(text: &str, marks: &mut Vec<Mark>) {
    check_ranges_with(text, marks, |_| true);
}

/// [`check_ranges`] with an extra caller-supplied resolver, e.g. a lookup
/// confirming that a mentioned object still exists.
pub fn check_ranges_with(
    text: &str,
    marks: &mut Vec<Mark>,
    resolves: impl Fn(&Mark) -> bool,
) {
    let len = utf16_len(text);
    let before = marks.len();
    let checked: Vec<Mark> = std::mem::take(marks)
        .into_iter()
        .map(|m| Mark::with_param(m.mark_type, m.param, m.range.clamped(len)))
        .filter(|m| !m.range.is_empty() && m.param_resolves() && resolves(m))
        .collect();
    *marks = checked;
    normalize(marks);
    if marks.len() != before {
        log::debug!(
            "check_ranges kept {} of {before} marks over {len} units",
            marks.len()
        );
    }
}

/// Rewrite `text` into the form the markup round trip preserves: CR LF
/// and lone CR become LF, NUL is removed. Marks move with every removed
/// unit.
pub fn normalize_text(text: &str, marks: &mut Vec<Mark>) -> String {
    if !text.contains(['\r', '\0']) {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' if chars.peek() == Some(&'\n') => {
                adjust(marks, utf16_len(&out), -1);
            }
            '\r' => out.push('\n'),
            '\0' => {
                adjust(marks, utf16_len(&out), -1);
            }
            ch => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::MarkType;

    fn bold(from: usize, to: usize) -> Mark {
        Mark::new(MarkType::Bold, Range::new(from, to))
    }

    fn adjusted(mark: Mark, position: usize, delta: isize) -> Vec<Mark> {
        let mut marks = vec![mark];
        adjust(&mut marks, position, delta);
        marks
    }

    #[test]
    fn inserting_inside_a_mark_extends_it() {
        assert_eq!(adjusted(bold(5, 10), 7, 3), vec![bold(5, 13)]);
    }

    #[test]
    fn inserting_before_a_mark_shifts_it() {
        assert_eq!(adjusted(bold(5, 10), 2, 3), vec![bold(8, 13)]);
    }

    #[test]
    fn inserting_after_a_mark_leaves_it() {
        assert_eq!(adjusted(bold(5, 10), 12, 3), vec![bold(5, 10)]);
    }

    #[test]
    fn inserting_at_either_edge_does_not_grow_the_mark() {
        assert_eq!(adjusted(bold(5, 10), 5, 2), vec![bold(7, 12)]);
        assert_eq!(adjusted(bold(5, 10), 10, 2), vec![bold(5, 10)]);
    }

    #[test]
    fn deleting_before_a_mark_shifts_it_left() {
        assert_eq!(adjusted(bold(5, 10), 0, -2), vec![bold(3, 8)]);
    }

    #[test]
    fn deleting_inside_a_mark_shrinks_it() {
        assert_eq!(adjusted(bold(5, 10), 6, -2), vec![bold(5, 8)]);
    }

    #[test]
    fn deleting_across_an_edge_truncates() {
        assert_eq!(adjusted(bold(5, 10), 3, -4), vec![bold(3, 6)]);
        assert_eq!(adjusted(bold(5, 10), 8, -5), vec![bold(5, 8)]);
    }

    #[test]
    fn deleting_the_whole_mark_drops_it() {
        let mut marks = vec![bold(5, 10), bold(12, 14)];
        let result = adjust(&mut marks, 4, -7);
        assert_eq!(marks, vec![bold(5, 7)]);
        assert_eq!(result.dropped, vec![bold(4, 4)]);
    }

    #[test]
    fn deletion_joining_two_identical_marks_merges_them() {
        let mut marks = vec![bold(0, 3), bold(5, 8)];
        adjust(&mut marks, 3, -2);
        assert_eq!(marks, vec![bold(0, 6)]);
    }

    #[test]
    fn edits_touching_links_are_reported() {
        let link = Mark::with_param(MarkType::Link, "a.org", Range::new(2, 6));
        let mut marks = vec![link.clone()];
        assert!(adjust(&mut marks, 6, 1).touched_atomic);
        let mut marks = vec![link.clone()];
        assert!(!adjust(&mut marks, 8, 1).touched_atomic);
        let mut marks = vec![link];
        assert!(adjust(&mut marks, 0, -2).touched_atomic);
        assert!(!adjust(&mut vec![bold(0, 4)], 2, 1).touched_atomic);
    }

    #[test]
    fn check_ranges_clamps_into_the_text() {
        let mut marks = vec![bold(2, 40), bold(50, 60)];
        check_ranges("hello", &mut marks);
        assert_eq!(marks, vec![bold(2, 5)]);
    }

    #[test]
    fn check_ranges_drops_unresolved_params() {
        let mut marks = vec![
            Mark::with_param(MarkType::Link, "", Range::new(0, 2)),
            Mark::with_param(MarkType::Color, "red", Range::new(0, 2)),
            Mark::with_param(MarkType::Background, "mauve", Range::new(0, 2)),
            Mark::with_param(MarkType::Mention, "obj1", Range::new(2, 4)),
        ];
        check_ranges("hello", &mut marks);
        let kinds: Vec<MarkType> = marks.iter().map(|m| m.mark_type).collect();
        assert_eq!(kinds, vec![MarkType::Color, MarkType::Mention]);
    }

    #[test]
    fn check_ranges_consults_the_resolver() {
        let mut marks = vec![
            Mark::with_param(MarkType::Mention, "gone", Range::new(0, 2)),
            Mark::with_param(MarkType::Mention, "here", Range::new(3, 5)),
        ];
        check_ranges_with("hello", &mut marks, |m| m.param != "gone");
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].param, "here");
    }

    #[test]
    fn check_ranges_counts_utf16_units() {
        // \u{1F600} is two code units
        let mut marks = vec![bold(0, 9)];
        check_ranges("\u{1F600}ab", &mut marks);
        assert_eq!(marks, vec![bold(0, 4)]);
    }

    #[test]
    fn crlf_collapses_and_later_marks_follow() {
        let mut marks = vec![bold(0, 1), bold(3, 4)];
        let text = normalize_text("a\r\nb", &mut marks);
        assert_eq!(text, "a\nb");
        assert_eq!(marks, vec![bold(0, 1), bold(2, 3)]);
    }

    #[test]
    fn lone_cr_becomes_lf_and_nul_is_removed() {
        let mut marks = vec![bold(2, 5)];
        let text = normalize_text("a\rx\0yz", &mut marks);
        assert_eq!(text, "a\nxyz");
        assert_eq!(marks, vec![bold(2, 4)]);
    }

    #[test]
    fn clean_text_is_left_alone() {
        let mut marks = vec![bold(0, 2)];
        assert_eq!(normalize_text("ab\ncd", &mut marks), "ab\ncd");
        assert_eq!(marks, vec![bold(0, 2)]);
    }
}
