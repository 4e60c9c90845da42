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

//! Markdown-style shortcuts typed at the start of a block.
//!
//! Typing `# ` at the very start of a paragraph turns it into a header,
//! `- ` into a bullet and so on. The prefix and the space that confirmed it
//! are removed from the text and every mark moves left to follow. A few
//! whole-text commands (`---`, `/file`, `/image`, `/video`) replace the
//! block instead.

use crate::block_style::BlockStyle;
use crate::mark::Mark;
use crate::ranges::adjust;
use crate::text::{cut, utf16_len};

/// Prefixes in match order, with the style they switch to. The consumed
/// length excludes the confirming space.
const GRAMMAR: [(&[&str], BlockStyle); 9] = [
    (&["*", "-", "+"], BlockStyle::Bulleted),
    (&["[]"], BlockStyle::Checkbox),
    (&["1."], BlockStyle::Numbered),
    (&["#"], BlockStyle::Header1),
    (&["##"], BlockStyle::Header2),
    (&["###"], BlockStyle::Header3),
    (&[">"], BlockStyle::Toggle),
    (&["\""], BlockStyle::Quote),
    (&["```"], BlockStyle::Code),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    File,
    Image,
    Video,
}

/// A whole-text command that replaces the block with another kind of
/// block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockCommand {
    Divider,
    File(FileKind),
}

impl BlockCommand {
    fn from_text(text: &str) -> Option<Self> {
        match text {
            "---" => Some(Self::Divider),
            "/file" => Some(Self::File(FileKind::File)),
            "/image" => Some(Self::File(FileKind::Image)),
            "/video" => Some(Self::File(FileKind::Video)),
            _ => None,
        }
    }
}

/// A style change caused by a typed prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Restyle {
    pub style: BlockStyle,
    /// The block text with the prefix and its space removed.
    pub text: String,
    pub marks: Vec<Mark>,
    /// Highlighting language, set only when switching to code.
    pub lang: Option<String>,
    /// Length of the matched prefix, not counting the space.
    pub prefix_len: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Autoformat {
    Restyle(Restyle),
    Command(BlockCommand),
}

/// Look for an autoformat in freshly confirmed block text.
///
/// Commands are recognised on any confirmed key. The prefix grammar only
/// runs when `delimiter` says the key just released was the space that
/// completes a prefix. `code_lang` is the language a new code block gets.
pub fn detect(
    text: &str,
    marks: &[Mark],
    style: BlockStyle,
    delimiter: bool,
    code_lang: &str,
) -> Option<Autoformat> {
    if style == BlockStyle::Code {
        return None;
    }
    if let Some(command) = BlockCommand::from_text(text) {
        return Some(Autoformat::Command(command));
    }
    if !delimiter || !style.can_have_marks() {
        return None;
    }
    let (prefix, target) = match_prefix(text, style)?;
    let prefix_len = utf16_len(prefix);
    let consumed = prefix_len + 1;

    let (marks, lang) = if target == BlockStyle::Code {
        (Vec::new(), Some(code_lang.to_owned()))
    } else {
        let mut marks = marks.to_vec();
        adjust(&mut marks, 0, -(consumed as isize));
        (marks, None)
    };
    Some(Autoformat::Restyle(Restyle {
        style: target,
        text: cut(text, 0, consumed),
        marks,
        lang,
        prefix_len,
    }))
}

fn match_prefix(
    text: &str,
    style: BlockStyle,
) -> Option<(&'static str, BlockStyle)> {
    for (prefixes, target) in GRAMMAR {
        if target == style
            || (target == BlockStyle::Numbered && style.is_header())
        {
            continue;
        }
        let found = prefixes.iter().find(|prefix| {
            text.strip_prefix(**prefix)
                .is_some_and(|rest| rest.starts_with(' '))
        });
        if let Some(prefix) = found {
            return Some((*prefix, target));
        }
    }
    None
}
