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

//! Keystroke-level orchestration of one text block.
//!
//! The session keeps the block's semantic text and marks, and the cursor
//! range in plain-text coordinates. Key-down handles the keys that commit
//! immediately or are forwarded to block navigation. Key-up reads the live
//! markup back, runs menu triggers and autoformat, resynchronises after
//! drift and commits.

use std::time::Instant;

use crate::autoformat::{self, Autoformat};
use crate::block_style::BlockStyle;
use crate::config::EditorConfig;
use crate::enrichment::{Enrichment, EnrichmentQueue, ObjectLookup};
use crate::mark::{shift, Mark, MarkType, Range};
use crate::mark_store::MarkStore;
use crate::markup::{parse, render_block, sanitize_to_parts, Highlighter};
use crate::session::debounce::Debouncer;
use crate::session::keys::{Key, KeyEvent};
use crate::session::services::{
    BlockDescriptor, BlockId, BlockPosition, CommitRequest, Host, MenuKind,
    MenuPayload, Rect,
};
use crate::session::state::{ActiveMenu, SessionState};
use crate::text::{char_before, cut, insert, slice, utf16_len};

/// A text block as the document store knows it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    /// The document the block belongs to.
    pub root_id: String,
    pub text: String,
    pub marks: Vec<Mark>,
    pub style: BlockStyle,
    /// Highlighting language of a code block.
    pub lang: Option<String>,
}

/// What the surface should do with a key-down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyDown {
    /// Composition is running; the key belongs to the IME.
    Ignored,
    /// A blocking menu is open; swallow the key.
    Blocked,
    /// Handled here; suppress the default action.
    Consumed,
    /// Let the surface apply its default action and do nothing else.
    Native,
    /// Pass the key on to block-level handling.
    Forward(Forward),
}

/// State handed to block-level handling along with a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forward {
    pub prevent_default: bool,
    pub text: String,
    pub marks: Vec<Mark>,
    pub range: Option<Range>,
}

/// What a key-up ended up doing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyUp {
    Ignored,
    /// The key went to the open menu's filter.
    Menu,
    /// An autoformat replaced the block.
    Replaced(BlockId),
    Edited,
}

pub struct EditSession {
    config: EditorConfig,
    highlighter: Highlighter,
    id: BlockId,
    root_id: String,
    style: BlockStyle,
    lang: Option<String>,
    text: String,
    marks: MarkStore,
    /// Text of the last commit, to skip commits that change nothing.
    committed: String,
    range: Option<Range>,
    state: SessionState,
    focused: bool,
    after_paste: bool,
    revision: u64,
    acknowledged: u64,
    commit_timer: Debouncer,
    enrichment: EnrichmentQueue,
}

impl EditSession {
    pub fn new(config: EditorConfig, block: Block) -> Self {
        let highlighter = Highlighter::new(config.default_code_lang.clone());
        let commit_timer = Debouncer::new(config.commit_debounce());
        let mut session = Self {
            config,
            highlighter,
            id: String::new(),
            root_id: String::new(),
            style: BlockStyle::default(),
            lang: None,
            text: String::new(),
            marks: MarkStore::new(),
            committed: String::new(),
            range: None,
            state: SessionState::Idle,
            focused: false,
            after_paste: false,
            revision: 0,
            acknowledged: 0,
            commit_timer,
            enrichment: EnrichmentQueue::new(),
        };
        session.load(block);
        session
    }

    pub fn block_id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn marks(&self) -> &[Mark] {
        self.marks.as_slice()
    }

    pub fn style(&self) -> BlockStyle {
        self.style
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn range(&self) -> Option<Range> {
        self.range
    }

    /// Newest revision handed to persistence.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_pending_commit(&self) -> bool {
        self.commit_timer.is_pending()
    }

    /// The language a code block is highlighted as.
    pub fn code_lang(&self) -> &str {
        self.lang
            .as_deref()
            .unwrap_or(self.highlighter.default_lang())
    }

    /// Whether `mark_type` is on over the whole current selection.
    pub fn is_active(&self, mark_type: MarkType) -> bool {
        self.range
            .filter(|range| !range.is_empty())
            .is_some_and(|range| self.marks.active_in(range, mark_type))
    }

    fn load(&mut self, block: Block) {
        let mut marks = MarkStore::from_marks(block.marks);
        let text = if block.text == "\n" {
            String::new()
        } else {
            marks.normalize_text(&block.text)
        };
        if block.style.can_have_marks() {
            marks.check_ranges(&text);
        } else {
            marks.clear();
        }
        self.id = block.id;
        self.root_id = block.root_id;
        self.style = block.style;
        self.lang = block.lang;
        self.committed = text.clone();
        self.text = text;
        self.marks = marks;
    }

    /// Show the block on the surface and queue its widgets.
    pub fn render(&mut self, host: &mut Host) {
        let rendered = render_block(
            &self.text,
            self.marks.as_slice(),
            self.style,
            self.code_lang(),
            &self.highlighter,
        );
        host.surface.set_markup(&rendered.markup);
        self.enrichment.schedule(rendered.widgets);
    }

    /// Take a new version of the block from the document store.
    ///
    /// Echoes of commits older than the newest one issued are dropped, so
    /// an early commit that completes late cannot overwrite later typing.
    /// After a fresh update the cursor is put back where it was.
    pub fn apply_external_update(
        &mut self,
        host: &mut Host,
        block: Block,
        revision: Option<u64>,
    ) -> bool {
        if let Some(revision) = revision {
            if revision < self.revision {
                log::debug!(
                    "ignoring stale update r{revision} of {}, newest is r{}",
                    self.id,
                    self.revision
                );
                return false;
            }
        }
        self.load(block);
        self.render(host);
        if self.focused {
            self.restore_focus(host);
        }
        true
    }

    pub fn focus(&mut self, host: &mut Host) {
        self.focused = true;
        if let Some(range) = host.surface.selection() {
            self.range = Some(range);
        }
    }

    pub fn blur(&mut self, host: &mut Host) {
        self.focused = false;
        if self.state.is_composing() {
            log::debug!("blur of {} mid-composition, deferring", self.id);
            return;
        }
        self.sync_menu(host);
        if self.state.suppresses_blur_commit() {
            log::debug!("blur of {} while a picker is open", self.id);
            return;
        }
        self.reconcile(host);
        self.commit(host, true);
    }

    /// The native selection changed.
    pub fn select(&mut self, host: &mut Host) {
        let previous = self.range;
        let Some(range) = host.surface.selection() else {
            return;
        };
        self.range = Some(range);
        host.focus.set_focus(&self.id, range);

        if range.is_empty()
            || previous == Some(range)
            || !self.style.can_have_marks()
        {
            host.menus.close(MenuKind::Context);
            return;
        }
        for kind in [MenuKind::Add, MenuKind::Mention] {
            host.menus.close(kind);
            if self.state.menu_is(kind) {
                self.state = SessionState::Idle;
            }
        }
        let payload = self.menu_payload(range);
        let anchor = anchor_rect(host);
        host.menus.open(MenuKind::Context, anchor, payload);
    }

    pub fn composition_start(&mut self) {
        self.state = self.state.start_composition();
    }

    /// Composition finished; catch up with whatever it produced.
    pub fn composition_end(&mut self, host: &mut Host) {
        self.state = self.state.end_composition();
        self.range = host.surface.selection().or(self.range);
        self.reconcile(host);
        if self.focused || self.state.suppresses_blur_commit() {
            self.commit_or_schedule(host);
        } else {
            // The surface was blurred mid-composition
            self.commit(host, true);
        }
    }

    pub fn key_down(&mut self, host: &mut Host, event: &KeyEvent) -> KeyDown {
        if self.state.is_composing() {
            return KeyDown::Ignored;
        }
        self.sync_menu(host);
        if MenuKind::BLOCKING
            .iter()
            .any(|kind| host.menus.is_open(Some(*kind)))
        {
            return KeyDown::Blocked;
        }
        log::trace!("key down {} in {}", event.key, self.id);

        let value = host.surface.text();
        let range = host.surface.selection();
        let symbol_before = range.and_then(|r| char_before(&value, r.from));
        let shift_held = event.modifiers.shift;
        let command = event.modifiers.command();

        match event.key {
            Key::Enter => {
                let plain_enter_in_code =
                    self.style == BlockStyle::Code && !shift_held;
                if !plain_enter_in_code && !host.menus.is_open(None) {
                    self.take_text(value);
                    self.commit(host, true);
                    return self.forward(range, true);
                }
            }
            Key::ArrowUp | Key::ArrowDown if command && shift_held => {
                self.take_text(value);
                self.commit(host, true);
                return self.forward(range, true);
            }
            Key::Tab => {
                let Some(range) = range else {
                    return KeyDown::Consumed;
                };
                self.take_text(value);
                if self.style == BlockStyle::Code {
                    self.text = insert(&self.text, range.from, "\t");
                    self.render(host);
                    self.commit(host, true);
                    self.move_cursor(host, range.from + 1);
                    return KeyDown::Consumed;
                }
                self.commit(host, true);
                host.focus.apply_focus();
                return self.forward(Some(range), true);
            }
            Key::Backspace => {
                let add_open = host.menus.is_open(Some(MenuKind::Add));
                let mention_open = host.menus.is_open(Some(MenuKind::Mention));
                if !add_open && !mention_open {
                    if range.is_some() {
                        self.take_text(value);
                        self.commit(host, true);
                        return self.forward(range, false);
                    }
                } else {
                    for kind in [MenuKind::Add, MenuKind::Mention] {
                        if host.menus.is_open(Some(kind))
                            && symbol_before == kind.trigger()
                        {
                            self.close_menu(host, kind);
                        }
                    }
                }
            }
            Key::Delete => {
                if let Some(r) = range {
                    let len = utf16_len(&value);
                    if r.to > 0 && (r.from != r.to || r.to != len) {
                        return KeyDown::Native;
                    }
                }
            }
            Key::Char('e') if command => {
                if self.open_emoji_picker(host) {
                    return KeyDown::Consumed;
                }
            }
            _ => {}
        }

        self.range = range.or(self.range);
        if let Some(range) = range {
            host.focus.set_focus(&self.id, range);
        }
        self.forward(range, false)
    }

    pub fn key_up(&mut self, host: &mut Host, event: &KeyEvent) -> KeyUp {
        if self.state.is_composing() {
            return KeyUp::Ignored;
        }
        self.sync_menu(host);
        log::trace!("key up {} in {}", event.key, self.id);

        let value = host.surface.text();
        let range = host.surface.selection();
        self.range = range.or(self.range);

        let after_paste = std::mem::take(&mut self.after_paste);
        let may_open = !after_paste
            && !event.key.is_special()
            && self.style.allows_menus();

        for kind in [MenuKind::Add, MenuKind::Mention] {
            if host.menus.is_open(Some(kind)) {
                if event.is(&Key::Space) {
                    self.close_menu(host, kind);
                } else {
                    self.filter_menu(host, kind, &value, range);
                }
                return KeyUp::Menu;
            }
        }

        if let Some(range) = range.filter(|_| may_open) {
            match char_before(&value, range.from) {
                Some('/') => self.open_menu(host, MenuKind::Add, range),
                Some('@') if space_before_trigger(&value, range.from) => {
                    self.open_menu(host, MenuKind::Mention, range)
                }
                _ => {}
            }
        }

        if self.config.autoformat {
            if let Some(id) = self.autoformat(host, &value, event) {
                return KeyUp::Replaced(id);
            }
        }

        if event.is(&Key::Backspace) {
            host.menus.close(MenuKind::Context);
        }

        self.reconcile(host);
        self.commit_or_schedule(host);
        KeyUp::Edited
    }

    /// Read text and marks back from the surface.
    ///
    /// When the surface text and the markup disagree, the markup wins: it
    /// is re-rendered and the cursor moves by the length difference.
    /// Returns whether that happened.
    pub fn reconcile(&mut self, host: &mut Host) -> bool {
        let value = host.surface.text();
        if !self.style.can_have_marks() {
            self.text = self.marks.normalize_text(&value);
            self.marks.clear();
            return false;
        }
        let parsed = parse(&host.surface.markup());
        self.marks = MarkStore::from_marks(parsed.marks);
        self.text = parsed.text;
        if value == self.text {
            return false;
        }

        let diff = utf16_len(&value) as isize - utf16_len(&self.text) as isize;
        log::debug!("{} drifted by {diff} from its markup, resyncing", self.id);
        self.render(host);
        if let Some(range) = self.range {
            let range =
                Range::new(shift(range.from, -diff), shift(range.to, -diff));
            self.range = Some(range);
            host.focus.set_focus(&self.id, range);
            host.focus.apply_focus();
        }
        true
    }

    /// Hand the current text and marks to persistence. Without `update`,
    /// nothing is sent unless the text changed.
    pub fn commit(&mut self, host: &mut Host, update: bool) -> Option<u64> {
        self.commit_timer.cancel();
        if !update && self.text == self.committed {
            return None;
        }
        let marks = if self.style.can_have_marks() {
            self.marks.to_vec()
        } else {
            Vec::new()
        };
        self.revision += 1;
        self.committed = self.text.clone();
        host.persistence.commit_text(CommitRequest {
            block_id: self.id.clone(),
            text: self.text.clone(),
            marks,
            is_update: update,
            revision: self.revision,
        });
        Some(self.revision)
    }

    /// Commit now, or start the quiet period when commits are debounced.
    pub fn commit_or_schedule(&mut self, host: &mut Host) {
        if self.config.commit_debounce_ms == 0 {
            self.commit(host, false);
        } else if self.text != self.committed {
            self.commit_timer.schedule(Instant::now());
        }
    }

    /// Fire a debounced commit whose quiet period is over.
    ///
    /// Nothing fires while composing; the timer stays armed.
    pub fn poll(&mut self, host: &mut Host, now: Instant) -> Option<u64> {
        if self.state.is_composing() {
            return None;
        }
        if self.commit_timer.fire_if_due(now) {
            self.reconcile(host);
            self.commit(host, false)
        } else {
            None
        }
    }

    /// Persistence confirmed `revision`. Returns false for stale acks.
    pub fn acknowledge(&mut self, revision: u64) -> bool {
        if revision < self.acknowledged {
            log::debug!(
                "stale ack r{revision} for {}, already at r{}",
                self.id,
                self.acknowledged
            );
            return false;
        }
        self.acknowledged = revision;
        true
    }

    /// Toggle a mark over the current selection from the toolbar.
    pub fn toggle_mark(
        &mut self,
        host: &mut Host,
        mark_type: MarkType,
        param: &str,
    ) {
        if !self.style.can_have_marks() {
            return;
        }
        self.reconcile(host);
        let Some(range) = host.surface.selection().or(self.range) else {
            return;
        };
        let range = range.clamped(utf16_len(&self.text));
        if range.is_empty() {
            return;
        }
        self.marks.toggle(Mark::with_param(mark_type, param, range));
        self.render(host);
        self.commit(host, true);
        self.range = Some(range);
        host.focus.set_focus(&self.id, range);
        host.focus.apply_focus();
    }

    /// Replace the `@` query with a mention of `object_id` shown as `name`.
    pub fn insert_mention(
        &mut self,
        host: &mut Host,
        name: &str,
        object_id: &str,
    ) {
        let Some(menu) =
            self.state.menu().filter(|m| m.kind == MenuKind::Mention)
        else {
            log::debug!("mention picked with no mention menu in {}", self.id);
            return;
        };
        self.reconcile(host);
        let len = utf16_len(&self.text);
        let anchor = menu.anchor.min(len);
        let cursor = host
            .surface
            .selection()
            .or(self.range)
            .map_or(anchor + 1, |r| r.from);
        let query_end = cursor.max(anchor + 1).min(len);

        self.erase(anchor, query_end);
        let label = format!("{name} ");
        self.insert_text(anchor, &label);
        self.marks.add(Mark::with_param(
            MarkType::Mention,
            object_id,
            Range::new(anchor, anchor + utf16_len(name)),
        ));
        self.marks.check_ranges(&self.text);

        self.close_menu(host, MenuKind::Mention);
        self.render(host);
        self.commit(host, true);
        self.move_cursor(host, anchor + utf16_len(&label));
    }

    /// Open the emoji picker at the cursor. Returns false when it cannot
    /// be opened here.
    pub fn open_emoji_picker(&mut self, host: &mut Host) -> bool {
        if !self.style.can_have_marks()
            || host.menus.is_open(Some(MenuKind::Emoji))
        {
            return false;
        }
        let range = host
            .surface
            .selection()
            .or(self.range)
            .unwrap_or_else(|| Range::collapsed(utf16_len(&self.text)));
        self.open_menu_at(host, MenuKind::Emoji, range, range.from);
        true
    }

    /// Insert an emoji picked from the picker.
    pub fn insert_emoji(&mut self, host: &mut Host, icon: &str) {
        if !self.style.can_have_marks() {
            return;
        }
        let at = match self.state.menu() {
            Some(menu) if menu.kind == MenuKind::Emoji => menu.anchor,
            _ => match host.surface.selection().or(self.range) {
                Some(range) => range.from,
                None => return,
            },
        };
        self.close_menu(host, MenuKind::Emoji);
        let at = at.min(utf16_len(&self.text));
        self.marks.adjust(at, 1);
        self.marks.toggle(Mark::with_param(
            MarkType::Emoji,
            icon,
            Range::new(at, at + 1),
        ));
        self.text = insert(&self.text, at, " ");
        self.render(host);
        self.commit(host, true);
        self.move_cursor(host, at + 1);
    }

    /// Insert pasted markup at the cursor, replacing the selection.
    pub fn paste(&mut self, host: &mut Host, markup: &str) {
        self.after_paste = true;
        self.reconcile(host);
        let len = utf16_len(&self.text);
        let range = host
            .surface
            .selection()
            .or(self.range)
            .unwrap_or_else(|| Range::collapsed(len))
            .clamped(len);

        let pasted = sanitize_to_parts(markup);
        self.erase(range.from, range.to);
        let inserted = self.insert_text(range.from, &pasted.text);
        if self.style.can_have_marks() {
            for mark in pasted.marks {
                let moved = mark.range.shifted(range.from as isize);
                self.marks.add(Mark::with_param(
                    mark.mark_type,
                    mark.param,
                    moved,
                ));
            }
            self.marks.check_ranges(&self.text);
        }

        self.render(host);
        self.commit(host, true);
        self.move_cursor(host, range.from + inserted);
    }

    /// Change a code block's language and remember it for new ones.
    pub fn set_code_language(&mut self, host: &mut Host, lang: &str) {
        host.persistence.set_code_language(&self.id, lang);
        host.prefs.set_code_lang(lang);
        self.lang = Some(lang.to_owned());
        self.render(host);
        self.move_cursor(host, utf16_len(&self.text));
    }

    /// Paint the widgets queued by the last render.
    pub fn idle(&mut self, lookup: &dyn ObjectLookup) -> Vec<Enrichment> {
        self.enrichment.run_idle(lookup, &self.root_id, self.style)
    }

    fn autoformat(
        &mut self,
        host: &mut Host,
        value: &str,
        event: &KeyEvent,
    ) -> Option<BlockId> {
        let marks = if self.style.can_have_marks() {
            parse(&host.surface.markup()).marks
        } else {
            Vec::new()
        };
        let code_lang = host
            .prefs
            .code_lang()
            .unwrap_or_else(|| self.config.default_code_lang.clone());
        let found = autoformat::detect(
            value,
            &marks,
            self.style,
            event.is(&Key::Space),
            &code_lang,
        )?;

        let restyle = match &found {
            Autoformat::Restyle(restyle) => Some(restyle.clone()),
            Autoformat::Command(_) => None,
        };
        let descriptor = match found {
            Autoformat::Command(command) => BlockDescriptor::from(command),
            Autoformat::Restyle(restyle) => BlockDescriptor::Text {
                style: restyle.style,
                text: restyle.text,
                marks: restyle.marks,
                lang: restyle.lang,
            },
        };
        let new_id = host.blocks.replace_block(
            &self.id,
            descriptor,
            BlockPosition::Replace,
        );
        log::debug!("autoformat replaced {} with {new_id}", self.id);
        self.close_menu(host, MenuKind::Add);

        if let Some(restyle) = restyle {
            let root_id = std::mem::take(&mut self.root_id);
            self.load(Block {
                id: new_id.clone(),
                root_id,
                text: restyle.text,
                marks: restyle.marks,
                style: restyle.style,
                lang: restyle.lang,
            });
            self.render(host);
        }
        self.range = Some(Range::collapsed(0));
        host.focus.set_focus(&new_id, Range::collapsed(0));
        host.focus.apply_focus();
        Some(new_id)
    }

    fn filter_menu(
        &mut self,
        host: &mut Host,
        kind: MenuKind,
        value: &str,
        range: Option<Range>,
    ) {
        let Some(menu) = self.state.menu().filter(|m| m.kind == kind) else {
            return;
        };
        let Some(range) = range.filter(|r| r.from >= menu.anchor) else {
            return;
        };
        let typed = slice(value, menu.anchor, range.from);
        let filter = match kind.trigger() {
            Some(trigger) => typed.strip_prefix(trigger).unwrap_or(typed),
            None => typed,
        };
        host.menus.set_filter(kind, filter);
    }

    fn open_menu(&mut self, host: &mut Host, kind: MenuKind, range: Range) {
        if host.menus.is_open(Some(kind)) {
            return;
        }
        self.open_menu_at(host, kind, range, range.from.saturating_sub(1));
    }

    fn open_menu_at(
        &mut self,
        host: &mut Host,
        kind: MenuKind,
        range: Range,
        anchor: usize,
    ) {
        let payload = self.menu_payload(range);
        let rect = anchor_rect(host);
        host.menus.open(kind, rect, payload);
        self.state = SessionState::MenuOpen(ActiveMenu { kind, anchor });
    }

    fn close_menu(&mut self, host: &mut Host, kind: MenuKind) {
        host.menus.close(kind);
        if self.state.menu_is(kind) {
            self.state = SessionState::Idle;
        }
    }

    /// Forget menus that were closed behind our back.
    fn sync_menu(&mut self, host: &Host) {
        if let SessionState::MenuOpen(menu) = self.state {
            if !host.menus.is_open(Some(menu.kind)) {
                self.state = SessionState::Idle;
            }
        }
    }

    fn menu_payload(&self, range: Range) -> MenuPayload {
        MenuPayload {
            block_id: self.id.clone(),
            range,
            marks: self.marks.to_vec(),
        }
    }

    fn forward(&self, range: Option<Range>, prevent_default: bool) -> KeyDown {
        KeyDown::Forward(Forward {
            prevent_default,
            text: self.text.clone(),
            marks: self.marks.to_vec(),
            range,
        })
    }

    /// Adopt the surface text before a key-down commit.
    fn take_text(&mut self, value: String) {
        self.text = self.marks.normalize_text(&value);
        if self.style.can_have_marks() {
            self.marks.check_ranges(&self.text);
        } else {
            self.marks.clear();
        }
    }

    fn erase(&mut self, from: usize, to: usize) {
        if to <= from {
            return;
        }
        self.text = cut(&self.text, from, to);
        let adjusted = self.marks.adjust(from, -((to - from) as isize));
        if adjusted.touched_atomic {
            self.marks.check_ranges(&self.text);
        }
    }

    fn insert_text(&mut self, at: usize, text: &str) -> usize {
        let len = utf16_len(text);
        self.text = insert(&self.text, at, text);
        let adjusted = self.marks.adjust(at, len as isize);
        if adjusted.touched_atomic {
            self.marks.check_ranges(&self.text);
        }
        len
    }

    fn move_cursor(&mut self, host: &mut Host, at: usize) {
        let range = Range::collapsed(at);
        self.range = Some(range);
        host.focus.set_focus(&self.id, range);
        host.focus.apply_focus();
    }

    fn restore_focus(&self, host: &mut Host) {
        if let Some(range) = self.range {
            let range = range.clamped(utf16_len(&self.text));
            host.focus.set_focus(&self.id, range);
            host.focus.apply_focus();
        }
    }
}

fn anchor_rect(host: &Host) -> Option<Rect> {
    host.surface.selection_rect().filter(|rect| !rect.is_empty())
}

/// `@` only opens mentions at the start of the text or after whitespace.
fn space_before_trigger(value: &str, cursor: usize) -> bool {
    cursor <= 1
        || char_before(value, cursor - 1).is_some_and(char::is_whitespace)
}
