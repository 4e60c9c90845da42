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

//! The collaborators an edit session talks to.
//!
//! None of these are implemented here. The host application wires its
//! editable surface, persistence layer, block store, focus tracker,
//! menus and preferences into a [`Host`] for the duration of one call.

use crate::autoformat::{BlockCommand, FileKind};
use crate::block_style::BlockStyle;
use crate::mark::{Mark, Range};

pub use crate::enrichment::ObjectLookup;

pub type BlockId = String;

/// Text and marks handed to persistence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitRequest {
    pub block_id: BlockId,
    pub text: String,
    pub marks: Vec<Mark>,
    /// Whether listeners should see this as an update of the block.
    pub is_update: bool,
    /// Increases with every commit of this block. Acknowledgements and
    /// store echoes carry it back.
    pub revision: u64,
}

pub trait Persistence {
    /// Fire and forget. Commits of one block must be applied in revision
    /// order.
    fn commit_text(&mut self, request: CommitRequest);
    fn set_code_language(&mut self, block_id: &str, lang: &str);
}

/// The block that replaces a text block after an autoformat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockDescriptor {
    Text {
        style: BlockStyle,
        text: String,
        marks: Vec<Mark>,
        lang: Option<String>,
    },
    Divider,
    File(FileKind),
}

impl From<BlockCommand> for BlockDescriptor {
    fn from(command: BlockCommand) -> Self {
        match command {
            BlockCommand::Divider => Self::Divider,
            BlockCommand::File(kind) => Self::File(kind),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockPosition {
    Top,
    Bottom,
    Replace,
}

pub trait BlockReplacer {
    /// Create `descriptor` relative to `target`, returning the new id.
    fn replace_block(
        &mut self,
        target: &str,
        descriptor: BlockDescriptor,
        position: BlockPosition,
    ) -> BlockId;
}

pub trait FocusService {
    /// Record where the cursor should be.
    fn set_focus(&mut self, block_id: &str, range: Range);
    /// Move the native selection to the recorded place.
    fn apply_focus(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuKind {
    /// `/` command menu.
    Add,
    /// `@` mention search.
    Mention,
    /// Emoji picker.
    Emoji,
    /// Formatting toolbar over a selection.
    Context,
    Style,
    Color,
    Background,
    More,
}

impl MenuKind {
    /// Menus that take over the keyboard while open.
    pub const BLOCKING: [MenuKind; 4] =
        [Self::Style, Self::Color, Self::Background, Self::More];

    /// The character that opened the menu, if it was typed.
    pub fn trigger(&self) -> Option<char> {
        match self {
            Self::Add => Some('/'),
            Self::Mention => Some('@'),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn is_empty(&self) -> bool {
        self.x == 0.0
            && self.y == 0.0
            && self.width == 0.0
            && self.height == 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuPayload {
    pub block_id: BlockId,
    pub range: Range,
    pub marks: Vec<Mark>,
}

pub trait MenuService {
    /// Open `kind` near `anchor`, or next to the block when there is none.
    fn open(
        &mut self,
        kind: MenuKind,
        anchor: Option<Rect>,
        payload: MenuPayload,
    );
    fn close(&mut self, kind: MenuKind);
    /// Whether `kind` is open, or any menu when `kind` is `None`.
    fn is_open(&self, kind: Option<MenuKind>) -> bool;
    /// Text typed after the trigger character of an open menu.
    fn set_filter(&mut self, kind: MenuKind, filter: &str);
}

/// The native text surface of one block.
pub trait EditableSurface {
    fn markup(&self) -> String;
    fn set_markup(&mut self, markup: &str);
    /// What the user sees, without markup.
    fn text(&self) -> String;
    fn selection(&self) -> Option<Range>;
    fn set_selection(&mut self, range: Range);
    fn selection_rect(&self) -> Option<Rect>;
}

/// Choices that outlive a block.
pub trait Preferences {
    /// Language of the last code block whose language was picked.
    fn code_lang(&self) -> Option<String>;
    fn set_code_lang(&mut self, lang: &str);
}

/// Everything a session needs for one call.
pub struct Host<'a> {
    pub surface: &'a mut dyn EditableSurface,
    pub persistence: &'a mut dyn Persistence,
    pub blocks: &'a mut dyn BlockReplacer,
    pub focus: &'a mut dyn FocusService,
    pub menus: &'a mut dyn MenuService,
    pub prefs: &'a mut dyn Preferences,
}
