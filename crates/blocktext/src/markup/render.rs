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

//! Conversion from text and marks to editor markup.
//!
//! The text is cut at every mark boundary. For each segment we work out the
//! set of marks covering it, close open tags that are no longer wanted
//! (closing and later reopening anything nested inside them) and open the
//! missing ones, longest-lived first.
//!
//! Widgets (mentions and emoji) get an empty `<smile>` placeholder in the
//! segment where they start; enrichment fills it in later.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::mark::{Mark, MarkType, Range};
use crate::mark_store::sorted_for_render;
use crate::text::{slice, utf16_len};

/// Render `text` with `marks` applied.
pub fn render(text: &str, marks: &[Mark]) -> String {
    render_with_widgets(text, marks).0
}

/// Render and also return the widget marks whose placeholders need
/// enrichment.
pub(crate) fn render_with_widgets(
    text: &str,
    marks: &[Mark],
) -> (String, Vec<Mark>) {
    let len = utf16_len(text);
    let clamped: Vec<Mark> = marks
        .iter()
        .map(|m| m.with_range(m.range.clamped(len)))
        .filter(|m| !m.range.is_empty())
        .collect();
    let sorted = sorted_for_render(&clamped);

    let mut boundaries: BTreeSet<usize> = BTreeSet::from([0, len]);
    for mark in &sorted {
        boundaries.insert(mark.range.from);
        boundaries.insert(mark.range.to);
    }
    let boundaries: Vec<usize> = boundaries.into_iter().collect();

    let mut html = String::new();
    let mut open: Vec<usize> = Vec::new();
    for pair in boundaries.windows(2) {
        let segment = Range::new(pair[0], pair[1]);
        let desired: Vec<usize> = (0..sorted.len())
            .filter(|&i| sorted[i].range.contains(&segment))
            .collect();

        // Close from the first open tag that is no longer wanted
        let keep = open
            .iter()
            .position(|i| !desired.contains(i))
            .unwrap_or(open.len());
        while open.len() > keep {
            if let Some(i) = open.pop() {
                push_close(&mut html, sorted[i]);
            }
        }

        let mut opening: Vec<usize> =
            desired.into_iter().filter(|i| !open.contains(i)).collect();
        opening.sort_by_key(|&i| {
            (Reverse(sorted[i].range.to), sorted[i].mark_type.rank())
        });
        for i in opening {
            push_open(&mut html, sorted[i], segment.from);
            open.push(i);
        }

        push_text(&mut html, slice(text, segment.from, segment.to));
    }
    while let Some(i) = open.pop() {
        push_close(&mut html, sorted[i]);
    }

    let widgets = clamped
        .iter()
        .filter(|m| m.mark_type.is_widget())
        .cloned()
        .collect();
    (html, widgets)
}

fn push_open(html: &mut String, mark: &Mark, segment_from: usize) {
    let tag = mark.mark_type.tag();
    let param = html_escape::encode_double_quoted_attribute(&mark.param);
    match mark.mark_type {
        MarkType::Link => {
            html.push_str(&format!("<{tag} href=\"{param}\">"));
        }
        t if t.has_param() => {
            html.push_str(&format!("<{tag} data-param=\"{param}\">"));
        }
        _ => html.push_str(&format!("<{tag}>")),
    }
    if mark.mark_type.is_widget() && segment_from == mark.range.from {
        html.push_str("<smile></smile>");
    }
    if mark.mark_type == MarkType::Mention {
        html.push_str("<name>");
    }
}

fn push_close(html: &mut String, mark: &Mark) {
    if mark.mark_type == MarkType::Mention {
        html.push_str("</name>");
    }
    html.push_str(&format!("</{}>", mark.mark_type.tag()));
}

fn push_text(html: &mut String, text: &str) {
    let escaped = html_escape::encode_text(text);
    html.push_str(&escaped.replace('\n', "<br>"));
}
