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

use blocktext::{
    adjust, check_ranges, detect_autoformat, normalize_text, parse, render,
    sanitize_to_parts, Autoformat, BlockCommand, BlockStyle, Mark, MarkStore,
    MarkType, Range, Restyle,
};

fn bold(from: usize, to: usize) -> Mark {
    Mark::new(MarkType::Bold, Range::new(from, to))
}

#[test]
fn typing_before_a_mark_pushes_it_along() {
    let mut marks = vec![bold(0, 5)];
    adjust(&mut marks, 0, 1);
    assert_eq!(marks, vec![bold(1, 6)]);
    assert_eq!(render("XHello", &marks), "X<b>Hello</b>");
}

#[test]
fn pasting_in_front_shifts_marks_by_the_pasted_length() {
    let mut marks = vec![bold(0, 5)];
    let pasted = sanitize_to_parts("Hello ");
    assert_eq!(pasted.text, "Hello ");
    assert!(pasted.marks.is_empty());

    adjust(&mut marks, 0, 6);
    assert_eq!(marks, vec![bold(6, 11)]);
    assert_eq!(render("Hello world", &marks), "Hello <b>world</b>");
}

#[test]
fn deleting_across_a_mark_edge_truncates_it() {
    let mut marks = vec![bold(2, 6)];
    let adjusted = adjust(&mut marks, 0, -4);
    assert_eq!(marks, vec![bold(0, 2)]);
    assert!(adjusted.dropped.is_empty());

    let adjusted = adjust(&mut marks, 0, -2);
    assert!(marks.is_empty());
    assert_eq!(adjusted.dropped, vec![bold(0, 0)]);
}

#[test]
fn rendered_markup_parses_back_to_the_same_block() {
    let text = "Ann likes https://matrix.org";
    let marks = vec![
        Mark::with_param(MarkType::Mention, "user-1", Range::new(0, 3)),
        Mark::new(MarkType::Italic, Range::new(4, 9)),
        Mark::with_param(
            MarkType::Link,
            "https://matrix.org",
            Range::new(10, 28),
        ),
    ];
    let markup = render(text, &marks);
    let parsed = parse(&markup);
    assert_eq!(parsed.text, text);
    assert_eq!(parsed.marks.len(), marks.len());
    for mark in &marks {
        assert!(parsed.marks.contains(mark), "{mark:?} lost in {markup}");
    }
    assert_eq!(render(&parsed.text, &parsed.marks), markup);
}

#[test]
fn normalized_line_endings_survive_the_markup_round_trip() {
    for raw in ["a\r\nb", "a\rb", "x\0y\r\n\r\nz"] {
        let end = raw.len();
        let last = Mark::new(MarkType::Italic, Range::new(end - 1, end));
        let mut marks = vec![bold(0, 1), last];
        let text = normalize_text(raw, &mut marks);
        assert_eq!(marks.len(), 2, "{raw:?}");

        let parsed = parse(&render(&text, &marks));
        assert_eq!(parsed.text, text, "{raw:?}");
        assert_eq!(parsed.marks.len(), marks.len(), "{raw:?}");
        for mark in &marks {
            assert!(parsed.marks.contains(mark), "{raw:?} lost {mark:?}");
        }
    }
}

#[test]
fn hash_space_turns_a_paragraph_into_a_header() {
    let found = detect_autoformat(
        "# Hi",
        &[bold(2, 4)],
        BlockStyle::Paragraph,
        true,
        "js",
    );
    assert_eq!(
        found,
        Some(Autoformat::Restyle(Restyle {
            style: BlockStyle::Header1,
            text: "Hi".into(),
            marks: vec![bold(0, 2)],
            lang: None,
            prefix_len: 1,
        }))
    );
}

#[test]
fn numbered_prefix_is_ignored_on_headers() {
    let found =
        detect_autoformat("1. ", &[], BlockStyle::Header1, true, "js");
    assert_eq!(found, None);
}

#[test]
fn prefixes_wait_for_the_delimiter_but_commands_do_not() {
    let style = BlockStyle::Paragraph;
    assert_eq!(detect_autoformat("# ", &[], style, false, "js"), None);
    assert_eq!(
        detect_autoformat("---", &[], style, false, "js"),
        Some(Autoformat::Command(BlockCommand::Divider))
    );
}

#[test]
fn toggling_twice_restores_the_original_marks() {
    let mut store = MarkStore::from_marks([bold(0, 3)]);
    let before = store.to_vec();
    let italic = Mark::new(MarkType::Italic, Range::new(1, 5));

    store.toggle(italic.clone());
    assert!(store.active_in(Range::new(1, 5), MarkType::Italic));
    store.toggle(italic);
    assert_eq!(store.to_vec(), before);
}

#[test]
fn marks_of_one_type_never_overlap() {
    let mut store = MarkStore::new();
    store.add(bold(0, 3));
    store.add(bold(2, 6));
    store.add(bold(6, 8));
    assert_eq!(store.as_slice(), &[bold(0, 8)]);

    let red = Mark::with_param(MarkType::Color, "red", Range::new(0, 10));
    let blue = Mark::with_param(MarkType::Color, "blue", Range::new(3, 5));
    store.add(red);
    store.add(blue.clone());
    let colors: Vec<&Mark> = store
        .iter()
        .filter(|m| m.mark_type == MarkType::Color)
        .collect();
    assert_eq!(colors.len(), 3);
    assert!(colors.contains(&&blue));
    for (i, a) in colors.iter().enumerate() {
        for b in &colors[i + 1..] {
            assert!(!a.range.overlaps(&b.range), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn stored_marks_are_checked_against_their_text() {
    let mut marks = vec![
        bold(1, 40),
        Mark::with_param(MarkType::Link, "not a url", Range::new(0, 2)),
        Mark::with_param(MarkType::Color, "red", Range::new(9, 12)),
    ];
    check_ranges("abc", &mut marks);
    assert_eq!(marks, vec![bold(1, 3)]);
}
