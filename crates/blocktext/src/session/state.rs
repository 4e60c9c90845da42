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

use crate::session::services::MenuKind;

/// A menu the session opened, anchored where its trigger was typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveMenu {
    pub kind: MenuKind,
    /// Position of the trigger character, or of the cursor for menus
    /// opened without one.
    pub anchor: usize,
}

/// What the session is in the middle of.
///
/// Composition suspends everything else, so nothing (autoformat, menu
/// filtering, re-rendering) can run while an IME owns the keyboard. A
/// menu open when composition started is remembered and restored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Composing { menu: Option<ActiveMenu> },
    MenuOpen(ActiveMenu),
}

impl SessionState {
    pub fn is_composing(&self) -> bool {
        matches!(self, Self::Composing { .. })
    }

    pub fn menu(&self) -> Option<ActiveMenu> {
        match *self {
            Self::Idle => None,
            Self::Composing { menu } => menu,
            Self::MenuOpen(menu) => Some(menu),
        }
    }

    pub fn menu_is(&self, kind: MenuKind) -> bool {
        matches!(self, Self::MenuOpen(menu) if menu.kind == kind)
    }

    /// Opening a picker steals focus from the surface, so the blur it
    /// causes must not commit.
    pub fn suppresses_blur_commit(&self) -> bool {
        self.menu().is_some_and(|menu| {
            matches!(menu.kind, MenuKind::Mention | MenuKind::Emoji)
        })
    }

    pub(crate) fn start_composition(self) -> Self {
        match self {
            Self::Idle => Self::Composing { menu: None },
            Self::MenuOpen(menu) => Self::Composing { menu: Some(menu) },
            composing => composing,
        }
    }

    pub(crate) fn end_composition(self) -> Self {
        match self {
            Self::Composing { menu: Some(menu) } => Self::MenuOpen(menu),
            Self::Composing { menu: None } => Self::Idle,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention() -> ActiveMenu {
        ActiveMenu {
            kind: MenuKind::Mention,
            anchor: 3,
        }
    }

    #[test]
    fn composition_remembers_the_open_menu() {
        let state = SessionState::MenuOpen(mention()).start_composition();
        assert!(state.is_composing());
        assert_eq!(state.menu(), Some(mention()));
        assert!(state.suppresses_blur_commit());
        assert_eq!(state.end_composition(), SessionState::MenuOpen(mention()));
    }

    #[test]
    fn composition_from_idle_returns_to_idle() {
        let state = SessionState::Idle.start_composition();
        assert_eq!(state.start_composition(), state);
        assert_eq!(state.end_composition(), SessionState::Idle);
    }

    #[test]
    fn pickers_suppress_the_blur_commit() {
        assert!(SessionState::MenuOpen(mention()).suppresses_blur_commit());
        let add = ActiveMenu {
            kind: MenuKind::Add,
            anchor: 0,
        };
        assert!(!SessionState::MenuOpen(add).suppresses_blur_commit());
        assert!(!SessionState::Idle.suppresses_blur_commit());
    }
}
