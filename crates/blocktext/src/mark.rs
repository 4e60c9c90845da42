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

//! The mark model: typed, ranged inline annotations over a block's text.
//!
//! ## Mark types
//!
//! | Type         | Tag       | Param           | Atomic | Widget |
//! |--------------|-----------|-----------------|--------|--------|
//! | `Strike`     | `strike`  | -               |        |        |
//! | `Code`       | `kbd`     | -               |        |        |
//! | `Italic`     | `i`       | -               |        |        |
//! | `Bold`       | `b`       | -               |        |        |
//! | `Underline`  | `u`       | -               |        |        |
//! | `Link`       | `lnk`     | URL             | yes    |        |
//! | `Object`     | `obj`     | object id       |        |        |
//! | `Color`      | `color`   | palette name    |        |        |
//! | `Background` | `bgcolor` | palette name    |        |        |
//! | `Mention`    | `mention` | object id       | yes    | yes    |
//! | `Emoji`      | `emoji`   | glyph / icon id | yes    | yes    |

use std::str::FromStr;

use email_address::EmailAddress;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

use crate::error::{Error, Result};

/// Colour names accepted by `Color` and `Background` marks.
pub const PALETTE: [&str; 11] = [
    "default", "grey", "yellow", "orange", "red", "pink", "purple", "blue",
    "ice", "teal", "lime",
];

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum MarkType {
    Strike,
    Code,
    Italic,
    Bold,
    Underline,
    Link,
    Object,
    Color,
    Background,
    Mention,
    Emoji,
}

impl MarkType {
    /// Look a mark type up by its snake_case name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::UnknownMarkType(name.into()))
    }

    /// The markup element this mark renders to.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Strike => "strike",
            Self::Code => "kbd",
            Self::Italic => "i",
            Self::Bold => "b",
            Self::Underline => "u",
            Self::Link => "lnk",
            Self::Object => "obj",
            Self::Color => "color",
            Self::Background => "bgcolor",
            Self::Mention => "mention",
            Self::Emoji => "emoji",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "strike" => Some(Self::Strike),
            "kbd" => Some(Self::Code),
            "i" => Some(Self::Italic),
            "b" => Some(Self::Bold),
            "u" => Some(Self::Underline),
            "lnk" => Some(Self::Link),
            "obj" => Some(Self::Object),
            "color" => Some(Self::Color),
            "bgcolor" => Some(Self::Background),
            "mention" => Some(Self::Mention),
            "emoji" => Some(Self::Emoji),
            _ => None,
        }
    }

    /// Whether marks of this type carry a meaningful `param`.
    pub fn has_param(&self) -> bool {
        matches!(
            self,
            Self::Link
                | Self::Object
                | Self::Color
                | Self::Background
                | Self::Mention
                | Self::Emoji
        )
    }

    /// Atomic marks reference something outside the text; edits touching
    /// them require the reference to be re-validated.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Self::Link | Self::Mention | Self::Emoji)
    }

    /// Widgets render as self-contained inline elements whose visual
    /// content is filled in asynchronously.
    pub fn is_widget(&self) -> bool {
        matches!(self, Self::Mention | Self::Emoji)
    }

    /// Nesting rank, outermost first. Used to order opening tags of marks
    /// that start and end at the same positions.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Background => 0,
            Self::Color => 1,
            Self::Object => 2,
            Self::Link => 3,
            Self::Bold => 4,
            Self::Italic => 5,
            Self::Underline => 6,
            Self::Strike => 7,
            Self::Code => 8,
            Self::Mention => 9,
            Self::Emoji => 10,
        }
    }
}

/// A half-open `[from, to)` span in UTF-16 code units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    pub from: usize,
    pub to: usize,
}

impl Range {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub fn collapsed(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.to <= self.from
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// Strict overlap: the spans share at least one code unit.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.from < other.to && other.from < self.to
    }

    /// Overlapping or adjacent.
    pub fn touches(&self, other: &Range) -> bool {
        self.from <= other.to && other.from <= self.to
    }

    pub fn contains(&self, other: &Range) -> bool {
        self.from <= other.from && other.to <= self.to
    }

    pub fn union(&self, other: &Range) -> Range {
        Range::new(self.from.min(other.from), self.to.max(other.to))
    }

    /// Both ends moved by `delta`, saturating at zero.
    pub fn shifted(&self, delta: isize) -> Range {
        Range::new(shift(self.from, delta), shift(self.to, delta))
    }

    /// Both ends clamped into `[0, len]`.
    pub fn clamped(&self, len: usize) -> Range {
        let to = self.to.min(len);
        Range::new(self.from.min(to), to)
    }
}

pub(crate) fn shift(pos: usize, delta: isize) -> usize {
    if delta < 0 {
        pos.saturating_sub(delta.unsigned_abs())
    } else {
        pos.saturating_add(delta as usize)
    }
}

/// A typed, ranged annotation over a block's plain text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mark {
    pub mark_type: MarkType,
    /// URL, object id, colour name or emoji; empty for pure styles.
    pub param: String,
    pub range: Range,
}

impl Mark {
    /// A pure style mark such as bold or italic.
    pub fn new(mark_type: MarkType, range: Range) -> Self {
        Self {
            mark_type,
            param: String::new(),
            range,
        }
    }

    pub fn with_param(
        mark_type: MarkType,
        param: impl Into<String>,
        range: Range,
    ) -> Self {
        let param = if mark_type.has_param() {
            param.into()
        } else {
            String::new()
        };
        Self {
            mark_type,
            param,
            range,
        }
    }

    pub(crate) fn with_range(&self, range: Range) -> Self {
        Self {
            mark_type: self.mark_type,
            param: self.param.clone(),
            range,
        }
    }

    /// Whether two marks describe the same annotation apart from where it
    /// sits.
    pub fn same_kind(&self, other: &Mark) -> bool {
        self.mark_type == other.mark_type && self.param == other.param
    }

    /// Whether `param` still refers to something usable.
    pub fn param_resolves(&self) -> bool {
        let param = self.param.as_str();
        match self.mark_type {
            MarkType::Link => is_linkable(param),
            MarkType::Object | MarkType::Mention => !param.trim().is_empty(),
            MarkType::Emoji => is_emoji(param),
            MarkType::Color | MarkType::Background => PALETTE.contains(&param),
            _ => true,
        }
    }
}

/// An emoji param is either the glyph itself, a single grapheme cluster,
/// or a host icon id such as `smile` or `custom:party-parrot`.
pub(crate) fn is_emoji(param: &str) -> bool {
    param.graphemes(true).count() == 1
        || (!param.is_empty()
            && param.chars().all(|c| {
                c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')
            }))
}

/// A link target is usable when it is a URL on its own, a URL once a
/// scheme is added, or an e-mail address.
pub(crate) fn is_linkable(param: &str) -> bool {
    let param = param.trim();
    if param.is_empty() || param.contains(char::is_whitespace) {
        return false;
    }
    Url::parse(param).is_ok()
        || EmailAddress::is_valid(param)
        || Url::parse(&format!("http://{param}"))
            .map(|url| url.host_str().is_some_and(|h| h.contains('.')))
            .unwrap_or(false)
}
