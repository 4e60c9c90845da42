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

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Tunables for an edit session, usually loaded from the `[editor]` table
/// of the host application's TOML configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct EditorConfig {
    /// Highlighting language for new code blocks when no language has been
    /// used before.
    pub default_code_lang: String,
    /// Quiet period before a key-up commit is sent. Zero commits on every
    /// key-up.
    pub commit_debounce_ms: u64,
    /// Quiet period before a URL field submits itself.
    pub url_submit_delay_ms: u64,
    /// Whether typed markdown prefixes restyle the block.
    pub autoformat: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_code_lang: "js".into(),
            commit_debounce_ms: 0,
            url_submit_delay_ms: 1000,
            autoformat: true,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn commit_debounce(&self) -> Duration {
        Duration::from_millis(self.commit_debounce_ms)
    }

    pub fn url_submit_delay(&self) -> Duration {
        Duration::from_millis(self.url_submit_delay_ms)
    }
}
