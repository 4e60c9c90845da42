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

use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::{Error, Result};

/// The style of the block that owns a piece of text.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum BlockStyle {
    Title,
    Description,
    #[default]
    Paragraph,
    Header1,
    Header2,
    Header3,
    Quote,
    Code,
    Bulleted,
    Numbered,
    Toggle,
    Checkbox,
}

impl BlockStyle {
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::UnknownBlockStyle(name.into()))
    }

    /// Code blocks are highlighted instead of marked up, and titles and
    /// descriptions are plain.
    pub fn can_have_marks(&self) -> bool {
        !matches!(self, Self::Code | Self::Title | Self::Description)
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header1 | Self::Header2 | Self::Header3)
    }

    /// Whether typing `/` or `@` may open a menu.
    pub fn allows_menus(&self) -> bool {
        self.can_have_marks()
    }

    /// Icon size in pixels for inline widgets rendered in this style.
    pub fn icon_size(&self) -> u32 {
        match self {
            Self::Header1 => 32,
            Self::Header2 => 28,
            Self::Header3 | Self::Quote => 26,
            _ => 24,
        }
    }
}
