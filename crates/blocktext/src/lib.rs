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

//! Rich-text annotation engine for block editors.
//!
//! A block is plain text plus a set of [`Mark`]s: typed, ranged inline
//! styles and references addressed in UTF-16 code units. This crate keeps
//! marks consistent while the text is edited, converts between text plus
//! marks and the inline markup shown by an editable surface, recognises
//! markdown-style shortcuts and drives a block's edit session.

pub mod autoformat;
mod block_style;
mod config;
pub mod enrichment;
mod error;
mod mark;
mod mark_store;
pub mod markup;
pub mod ranges;
pub mod session;
pub mod text;

#[cfg(test)]
mod tests;

pub use crate::autoformat::{
    detect as detect_autoformat, Autoformat, BlockCommand, FileKind, Restyle,
};
pub use crate::block_style::BlockStyle;
pub use crate::config::EditorConfig;
pub use crate::enrichment::{
    Enrichment, EnrichmentQueue, Lookup, ObjectLayout, ObjectLookup,
    ObjectSummary, WidgetIcon,
};
pub use crate::error::{Error, Result};
pub use crate::mark::{Mark, MarkType, Range, PALETTE};
pub use crate::mark_store::MarkStore;
pub use crate::markup::{
    parse, plain_text, render, render_block, sanitize, sanitize_to_parts,
    try_parse, Highlighter, Parsed, RenderedBlock,
};
pub use crate::ranges::{
    adjust, check_ranges, check_ranges_with, normalize_text, Adjusted,
};
pub use crate::session::{Block, EditSession, KeyDown, KeyEvent, KeyUp};
