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

//! String helpers addressed in UTF-16 code units.
//!
//! Every position handled by this crate (mark ranges, cursor ranges, menu
//! filter anchors) is a UTF-16 code unit offset, matching the coordinates
//! reported by platform text surfaces. Rust strings are UTF-8, so these
//! helpers translate between the two. Offsets that land inside a surrogate
//! pair snap forward to the next character boundary.

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Byte offset in `s` of the UTF-16 position `pos`, clamped to `s.len()`.
pub fn byte_offset(s: &str, pos: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in s.char_indices() {
        if units >= pos {
            return idx;
        }
        units += ch.len_utf16();
    }
    s.len()
}

/// The slice of `s` between two UTF-16 positions.
pub fn slice(s: &str, from: usize, to: usize) -> &str {
    let start = byte_offset(s, from);
    let end = byte_offset(s, to.max(from));
    &s[start..end]
}

/// `s` with `insert` placed at the UTF-16 position `pos`.
pub fn insert(s: &str, pos: usize, insert: &str) -> String {
    let at = byte_offset(s, pos);
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..at]);
    out.push_str(insert);
    out.push_str(&s[at..]);
    out
}

/// `s` with the UTF-16 span `[from, to)` removed.
pub fn cut(s: &str, from: usize, to: usize) -> String {
    let start = byte_offset(s, from);
    let end = byte_offset(s, to.max(from));
    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..start]);
    out.push_str(&s[end..]);
    out
}

/// The character that ends immediately before the UTF-16 position `pos`.
pub fn char_before(s: &str, pos: usize) -> Option<char> {
    if pos == 0 {
        return None;
    }
    let at = byte_offset(s, pos);
    s[..at].chars().next_back()
}
