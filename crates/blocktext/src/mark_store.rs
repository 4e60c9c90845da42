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

//! The ordered, deduplicated set of marks owned by one text block.
//!
//! Marks are kept in insertion order. After every public operation no two
//! marks of the same type overlap: identical marks (same type and param)
//! that overlap or touch are merged into their union, and a mark with a
//! different param wins over the span it is written onto.
//!
//! Operations never fail. Degenerate or out-of-range input is dropped
//! silently; callers run [`MarkStore::check_ranges`] after bulk text
//! replacement to re-establish the range invariant against the new text.

use crate::mark::{Mark, MarkType, Range};
use crate::ranges::{self, Adjusted};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkStore {
    marks: Vec<Mark>,
}

impl MarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate a store from persisted marks, normalising as it goes.
    pub fn from_marks(marks: impl IntoIterator<Item = Mark>) -> Self {
        let mut store = Self::new();
        for mark in marks {
            store.add(mark);
        }
        store
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter()
    }

    pub fn as_slice(&self) -> &[Mark] {
        &self.marks
    }

    pub fn to_vec(&self) -> Vec<Mark> {
        self.marks.clone()
    }

    pub fn into_vec(self) -> Vec<Mark> {
        self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Write `mark` on, merging with identical neighbours.
    pub fn add(&mut self, mark: Mark) {
        insert_merged(&mut self.marks, mark);
        self.assert_invariants();
    }

    /// Toolbar-style toggle.
    ///
    /// - A parametrised mark with an empty param removes that type from the
    ///   range ("remove link").
    /// - If an identical mark already covers the whole range, the range is
    ///   taken out of it (style off).
    /// - Otherwise the mark is written on with [`MarkStore::add`].
    pub fn toggle(&mut self, mark: Mark) {
        let mark = Mark::with_param(mark.mark_type, mark.param, mark.range);
        if mark.range.is_empty() {
            return;
        }
        let types = [mark.mark_type];
        if mark.mark_type.has_param() && mark.param.is_empty() {
            self.remove_in_range(mark.range, Some(&types));
            return;
        }
        let covered = self
            .marks
            .iter()
            .any(|m| m.same_kind(&mark) && m.range.contains(&mark.range));
        if covered {
            self.remove_in_range(mark.range, Some(&types));
        } else {
            self.add(mark);
        }
    }

    /// Erase marks from `range`, optionally only those of `types`.
    ///
    /// Marks inside the range are deleted; marks extending past one side are
    /// truncated; marks extending past both sides keep both outer parts.
    pub fn remove_in_range(
        &mut self,
        range: Range,
        types: Option<&[MarkType]>,
    ) {
        carve(&mut self.marks, range, |t| {
            types.is_none_or(|types| types.contains(&t))
        });
        self.assert_invariants();
    }

    /// Shift marks for an edit of `delta` code units at `position`.
    pub fn adjust(&mut self, position: usize, delta: isize) -> Adjusted {
        let adjusted = ranges::adjust(&mut self.marks, position, delta);
        self.assert_invariants();
        adjusted
    }

    /// Normalise line endings and NULs in `text`, moving marks to match.
    pub fn normalize_text(&mut self, text: &str) -> String {
        let text = ranges::normalize_text(text, &mut self.marks);
        self.assert_invariants();
        text
    }

    /// Clamp marks into `text` and drop anything that no longer resolves.
    pub fn check_ranges(&mut self, text: &str) {
        ranges::check_ranges(text, &mut self.marks);
        self.assert_invariants();
    }

    /// Whether a mark of `mark_type` covers the whole of `range`.
    pub fn active_in(&self, range: Range, mark_type: MarkType) -> bool {
        self.marks
            .iter()
            .any(|m| m.mark_type == mark_type && m.range.contains(&range))
    }

    /// Marks ordered for rendering: by start, longer marks first so they
    /// nest outside shorter ones, then by type rank.
    pub fn sorted_for_render(&self) -> Vec<&Mark> {
        sorted_for_render(&self.marks)
    }

    #[cfg(feature = "assert-invariants")]
    fn assert_invariants(&self) {
        for (i, a) in self.marks.iter().enumerate() {
            assert!(!a.range.is_empty(), "degenerate mark {a:?}");
            for b in &self.marks[i + 1..] {
                assert!(
                    a.mark_type != b.mark_type || !a.range.overlaps(&b.range),
                    "overlapping marks {a:?} and {b:?}"
                );
            }
        }
    }

    #[cfg(not(feature = "assert-invariants"))]
    fn assert_invariants(&self) {}
}

impl From<Vec<Mark>> for MarkStore {
    fn from(marks: Vec<Mark>) -> Self {
        Self::from_marks(marks)
    }
}

pub(crate) fn sorted_for_render(marks: &[Mark]) -> Vec<&Mark> {
    let mut sorted: Vec<&Mark> = marks.iter().collect();
    sorted.sort_by(|a, b| {
        a.range
            .from
            .cmp(&b.range.from)
            .then(b.range.to.cmp(&a.range.to))
            .then(a.mark_type.rank().cmp(&b.mark_type.rank()))
    });
    sorted
}

/// Rebuild `marks` so no two same-type marks overlap.
pub(crate) fn normalize(marks: &mut Vec<Mark>) {
    let input = std::mem::take(marks);
    for mark in input {
        insert_merged(marks, mark);
    }
}

/// Absorb identical marks that touch `mark`, carve the span out of
/// same-type marks with another param, then append.
///
/// Relies on `marks` already being normalised, so a single pass finds
/// every identical neighbour.
fn insert_merged(marks: &mut Vec<Mark>, mut mark: Mark) {
    if mark.range.is_empty() {
        return;
    }
    let mut i = 0;
    while i < marks.len() {
        if marks[i].same_kind(&mark) && marks[i].range.touches(&mark.range) {
            let absorbed = marks.remove(i);
            mark.range = mark.range.union(&absorbed.range);
        } else {
            i += 1;
        }
    }
    let mark_type = mark.mark_type;
    carve(marks, mark.range, |t| t == mark_type);
    marks.push(mark);
}

fn carve(
    marks: &mut Vec<Mark>,
    range: Range,
    applies_to: impl Fn(MarkType) -> bool,
) {
    if range.is_empty() {
        return;
    }
    let mut kept = Vec::with_capacity(marks.len() + 1);
    for mark in marks.drain(..) {
        if !applies_to(mark.mark_type) || !mark.range.overlaps(&range) {
            kept.push(mark);
            continue;
        }
        if mark.range.from < range.from {
            kept.push(mark.with_range(Range::new(mark.range.from, range.from)));
        }
        if mark.range.to > range.to {
            kept.push(mark.with_range(Range::new(range.to, mark.range.to)));
        }
    }
    *marks = kept;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn bold(from: usize, to: usize) -> Mark {
        Mark::new(MarkType::Bold, Range::new(from, to))
    }

    fn link(url: &str, from: usize, to: usize) -> Mark {
        Mark::with_param(MarkType::Link, url, Range::new(from, to))
    }

    fn as_set(store: &MarkStore) -> HashSet<Mark> {
        store.iter().cloned().collect()
    }

    fn assert_no_same_type_overlap(store: &MarkStore) {
        let marks = store.as_slice();
        for (i, a) in marks.iter().enumerate() {
            for b in &marks[i + 1..] {
                assert!(
                    a.mark_type != b.mark_type || !a.range.overlaps(&b.range),
                    "{a:?} overlaps {b:?}"
                );
            }
        }
    }

    // ===================================================================
    // add
    // ===================================================================

    #[test]
    fn adding_overlapping_identical_marks_merges_them() {
        let mut store = MarkStore::new();
        store.add(bold(0, 4));
        store.add(bold(2, 8));
        assert_eq!(store.as_slice(), &[bold(0, 8)]);
    }

    #[test]
    fn adding_adjacent_identical_marks_merges_them() {
        let mut store = MarkStore::from_marks(vec![bold(0, 3), bold(6, 9)]);
        store.add(bold(3, 6));
        assert_eq!(store.as_slice(), &[bold(0, 9)]);
    }

    #[test]
    fn different_types_overlap_freely() {
        let mut store = MarkStore::new();
        store.add(bold(0, 4));
        store.add(Mark::new(MarkType::Italic, Range::new(2, 6)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn a_link_with_another_url_wins_over_the_overlap() {
        let mut store = MarkStore::new();
        store.add(link("a.org", 0, 10));
        store.add(link("b.org", 3, 6));
        assert_eq!(
            as_set(&store),
            HashSet::from([
                link("a.org", 0, 3),
                link("a.org", 6, 10),
                link("b.org", 3, 6)
            ])
        );
        assert_no_same_type_overlap(&store);
    }

    #[test]
    fn adjacent_links_with_different_urls_stay_apart() {
        let store = MarkStore::from_marks(vec![
            link("a.org", 0, 3),
            link("b.org", 3, 6),
        ]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn hydrating_drops_degenerate_marks() {
        let store = MarkStore::from_marks(vec![bold(3, 3), bold(4, 2)]);
        assert!(store.is_empty());
    }

    // ===================================================================
    // toggle
    // ===================================================================

    #[test]
    fn toggling_twice_restores_the_original_set() {
        let original = MarkStore::from_marks(vec![
            Mark::new(MarkType::Italic, Range::new(0, 4)),
            link("a.org", 5, 9),
        ]);
        let mut store = original.clone();
        store.toggle(bold(1, 3));
        assert!(store.active_in(Range::new(1, 3), MarkType::Bold));
        store.toggle(bold(1, 3));
        assert_eq!(as_set(&store), as_set(&original));
    }

    #[test]
    fn toggling_part_of_a_bold_span_unbolds_only_that_part() {
        let mut store = MarkStore::from_marks(vec![bold(0, 6)]);
        store.toggle(bold(0, 2));
        assert_eq!(store.as_slice(), &[bold(2, 6)]);
    }

    #[test]
    fn toggling_the_middle_splits_the_mark() {
        let mut store = MarkStore::from_marks(vec![bold(0, 9)]);
        store.toggle(bold(3, 6));
        assert_eq!(as_set(&store), HashSet::from([bold(0, 3), bold(6, 9)]));
    }

    #[test]
    fn toggling_over_a_partial_overlap_extends_the_mark() {
        let mut store = MarkStore::from_marks(vec![bold(0, 4)]);
        store.toggle(bold(2, 8));
        assert_eq!(store.as_slice(), &[bold(0, 8)]);
    }

    #[test]
    fn toggling_an_empty_link_removes_links() {
        let mut store = MarkStore::from_marks(vec![link("a.org", 0, 8)]);
        store.toggle(link("", 2, 4));
        assert_eq!(
            as_set(&store),
            HashSet::from([link("a.org", 0, 2), link("a.org", 4, 8)])
        );
    }

    #[test]
    fn toggling_an_empty_range_does_nothing() {
        let mut store = MarkStore::from_marks(vec![bold(0, 4)]);
        store.toggle(bold(2, 2));
        assert_eq!(store.as_slice(), &[bold(0, 4)]);
    }

    // ===================================================================
    // remove_in_range
    // ===================================================================

    #[test]
    fn removing_deletes_inner_and_truncates_outer_marks() {
        let mut store = MarkStore::from_marks(vec![
            bold(0, 4),
            Mark::new(MarkType::Italic, Range::new(5, 7)),
            Mark::new(MarkType::Underline, Range::new(6, 12)),
        ]);
        store.remove_in_range(Range::new(3, 8), None);
        assert_eq!(
            as_set(&store),
            HashSet::from([
                bold(0, 3),
                Mark::new(MarkType::Underline, Range::new(8, 12))
            ])
        );
    }

    #[test]
    fn removing_can_be_limited_to_types() {
        let mut store = MarkStore::from_marks(vec![
            bold(0, 4),
            Mark::new(MarkType::Italic, Range::new(0, 4)),
        ]);
        store.remove_in_range(Range::new(0, 4), Some(&[MarkType::Italic]));
        assert_eq!(store.as_slice(), &[bold(0, 4)]);
    }

    #[test]
    fn removing_a_collapsed_range_keeps_everything() {
        let mut store = MarkStore::from_marks(vec![bold(0, 4)]);
        store.remove_in_range(Range::collapsed(2), None);
        assert_eq!(store.as_slice(), &[bold(0, 4)]);
    }

    // ===================================================================
    // Invariant across operation sequences
    // ===================================================================

    #[test]
    fn no_same_type_overlap_survives_any_operation() {
        let mut store = MarkStore::new();
        let ops: Vec<Box<dyn Fn(&mut MarkStore)>> = vec![
            Box::new(|s| s.toggle(bold(0, 5))),
            Box::new(|s| s.toggle(link("a.org", 2, 9))),
            Box::new(|s| s.toggle(link("b.org", 4, 12))),
            Box::new(|s| {
                s.adjust(3, 4);
            }),
            Box::new(|s| s.toggle(bold(4, 10))),
            Box::new(|s| {
                s.adjust(2, -5);
            }),
            Box::new(|s| s.check_ranges("short text")),
            Box::new(|s| s.toggle(bold(1, 3))),
        ];
        for op in ops {
            op(&mut store);
            assert_no_same_type_overlap(&store);
            assert!(store.iter().all(|m| !m.range.is_empty()));
        }
    }

    #[test]
    fn render_order_puts_longer_marks_outside() {
        let store = MarkStore::from_marks(vec![
            Mark::new(MarkType::Italic, Range::new(0, 3)),
            bold(0, 6),
            Mark::new(MarkType::Underline, Range::new(0, 3)),
        ]);
        let order: Vec<MarkType> =
            store.sorted_for_render().iter().map(|m| m.mark_type).collect();
        assert_eq!(
            order,
            vec![MarkType::Bold, MarkType::Italic, MarkType::Underline]
        );
    }
}
