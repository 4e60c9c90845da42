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

//! Deferred painting of inline widgets.
//!
//! Rendering leaves an empty `<smile>` placeholder in every mention and
//! emoji. Filling one in may need object metadata that is still loading,
//! so the placeholders are queued and resolved on the next idle tick,
//! never while text is being rendered. Each render replaces whatever was
//! still queued from the previous one.

use crate::block_style::BlockStyle;
use crate::mark::{Mark, MarkType};

/// Layout of a referenced object, as far as widgets care.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ObjectLayout {
    #[default]
    Basic,
    Task,
    Other,
}

/// Metadata about an object a mention points to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectSummary {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub layout: ObjectLayout,
    pub done: bool,
}

/// Answer of an object lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Not loaded yet; the widget shows a loader and is disabled.
    Pending,
    Ready(ObjectSummary),
}

/// Something that can answer object lookups for a document.
pub trait ObjectLookup {
    fn get(&self, root_id: &str, object_id: &str) -> Lookup;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetIcon {
    Loading,
    Object(ObjectSummary),
    Emoji(String),
}

/// What to paint into one placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enrichment {
    pub mark: Mark,
    pub icon: WidgetIcon,
    /// Icon size in pixels, following the block style.
    pub size: u32,
    /// The mention cannot be opened yet.
    pub disabled: bool,
    /// The mention points at a finished task.
    pub done: bool,
}

#[derive(Clone, Debug, Default)]
pub struct EnrichmentQueue {
    pending: Vec<Mark>,
    generation: u64,
}

impl EnrichmentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the widgets of a fresh render, dropping older work.
    pub fn schedule(&mut self, widgets: Vec<Mark>) {
        if !self.pending.is_empty() {
            log::debug!(
                "render {} superseded {} queued widgets",
                self.generation + 1,
                self.pending.len()
            );
        }
        self.generation += 1;
        self.pending = widgets;
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of renders that queued work so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolve everything queued.
    pub fn run_idle(
        &mut self,
        lookup: &dyn ObjectLookup,
        root_id: &str,
        style: BlockStyle,
    ) -> Vec<Enrichment> {
        let size = style.icon_size();
        std::mem::take(&mut self.pending)
            .into_iter()
            .filter(|mark| !mark.param.is_empty())
            .map(|mark| enrich(mark, lookup, root_id, size))
            .collect()
    }
}

fn enrich(
    mark: Mark,
    lookup: &dyn ObjectLookup,
    root_id: &str,
    size: u32,
) -> Enrichment {
    if mark.mark_type == MarkType::Emoji {
        return Enrichment {
            icon: WidgetIcon::Emoji(mark.param.clone()),
            mark,
            size,
            disabled: false,
            done: false,
        };
    }
    match lookup.get(root_id, &mark.param) {
        Lookup::Pending => Enrichment {
            mark,
            icon: WidgetIcon::Loading,
            size,
            disabled: true,
            done: false,
        },
        Lookup::Ready(object) => Enrichment {
            mark,
            done: object.layout == ObjectLayout::Task && object.done,
            icon: WidgetIcon::Object(object),
            size,
            disabled: false,
        },
    }
}
