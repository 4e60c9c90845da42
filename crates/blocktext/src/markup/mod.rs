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

pub mod highlight;
mod parse;
mod parser;
mod render;
mod sanitize;

pub use highlight::{Highlighted, Highlighter};
pub use parse::{parse, plain_text, try_parse, Parsed};
pub use render::render;
pub use sanitize::{sanitize, sanitize_to_parts};

use crate::block_style::BlockStyle;
use crate::mark::Mark;

/// Markup for one block, plus the inline widgets left for enrichment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedBlock {
    pub markup: String,
    pub widgets: Vec<Mark>,
}

/// Render a block the way its style wants it shown.
///
/// Code blocks are highlighted as `lang` and never show marks; the other
/// styles that cannot carry marks render as escaped text.
pub fn render_block(
    text: &str,
    marks: &[Mark],
    style: BlockStyle,
    lang: &str,
    highlighter: &Highlighter,
) -> RenderedBlock {
    if style == BlockStyle::Code {
        return RenderedBlock {
            markup: highlighter.highlight(text, lang).markup,
            widgets: Vec::new(),
        };
    }
    if !style.can_have_marks() {
        return RenderedBlock {
            markup: render(text, &[]),
            widgets: Vec::new(),
        };
    }
    let (markup, widgets) = render::render_with_widgets(text, marks);
    RenderedBlock { markup, widgets }
}
