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

//! Per-block edit sessions.
//!
//! An [`EditSession`] owns the text, marks and cursor of one block and is
//! driven by the host's surface events. Everything outside the block is
//! reached through the traits in [`services`].

mod controller;
pub mod debounce;
mod keys;
pub mod services;
mod state;

pub use controller::{Block, EditSession, Forward, KeyDown, KeyUp};
pub use debounce::{normalize_url, Debouncer, UrlAutoSubmit};
pub use keys::{Key, KeyEvent, Modifiers};
pub use state::{ActiveMenu, SessionState};
