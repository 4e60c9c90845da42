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

//! Errors surfaced by the non-editing entry points of the crate.
//!
//! Editing itself never fails: range drift, invalid marks, foreign markup
//! and missing grammars all degrade to the best available text/marks state.
//! These errors only come out of configuration loading, name lookups and
//! the strict markup parser.

/// Everything that can go wrong outside of the editing paths.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid editor configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("unknown mark type `{0}`")]
    UnknownMarkType(String),

    #[error("unknown block style `{0}`")]
    UnknownBlockStyle(String),

    #[error("markup could not be parsed cleanly: {}", errors.join("; "))]
    MarkupParse { errors: Vec<String> },

    #[error("syntax highlighting failed: {0}")]
    Highlight(String),
}

pub type Result<T> = std::result::Result<T, Error>;
