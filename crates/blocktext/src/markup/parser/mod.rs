// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A minimal arena DOM ("PaDom") filled in by html5ever.
//!
//! Nodes are owned by one flat list and refer to their children by handle.
//! Nodes detached during tree construction stay in the list as garbage;
//! walkers start from the document and never see them.

mod padom_creator;
mod panode_container;

use html5ever::tree_builder::ElementFlags;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use once_cell::sync::Lazy;

pub(crate) use padom_creator::PaDomCreator;
pub(crate) use panode_container::PaNodeContainer;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

static NO_NAME: Lazy<QualName> = Lazy::new(|| paqual_name(""));

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PaDomHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaDomNode {
    Document(PaNodeContainer),
    Container(PaNodeContainer),
    Text(PaNodeText),
    /// Comments and processing instructions; kept only so handles stay
    /// valid.
    Comment(String),
}

impl PaDomNode {
    pub(crate) fn name(&self) -> &QualName {
        match self {
            Self::Document(c) | Self::Container(c) => &c.name,
            Self::Text(_) | Self::Comment(_) => &NO_NAME,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<PaDomHandle>> {
        match self {
            Self::Document(c) | Self::Container(c) => Some(&mut c.children),
            Self::Text(_) | Self::Comment(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeText {
    pub(crate) content: String,
}

#[derive(Clone, Debug)]
pub(crate) struct PaDom {
    nodes: Vec<PaDomNode>,
    document_handle: PaDomHandle,
}

impl PaDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![PaDomNode::Document(PaNodeContainer {
                name: paqual_name(""),
                attrs: Vec::new(),
                children: Vec::new(),
            })],
            document_handle: PaDomHandle(0),
        }
    }

    pub(crate) fn add_node(&mut self, node: PaDomNode) -> PaDomHandle {
        self.nodes.push(node);
        PaDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn get_node(&self, handle: &PaDomHandle) -> &PaDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(
        &mut self,
        handle: &PaDomHandle,
    ) -> &mut PaDomNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn document_handle(&self) -> &PaDomHandle {
        &self.document_handle
    }

    pub(crate) fn document(&self) -> &PaNodeContainer {
        match self.get_node(&self.document_handle) {
            PaDomNode::Document(doc) | PaDomNode::Container(doc) => doc,
            PaDomNode::Text(_) | PaDomNode::Comment(_) => {
                unreachable!("the document handle always maps to a document")
            }
        }
    }

    pub(crate) fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> PaDomHandle {
        self.add_node(PaDomNode::Container(PaNodeContainer {
            name,
            attrs: attrs
                .into_iter()
                .map(|attr| {
                    let name = attr.name.local.as_ref().to_owned();
                    (name, attr.value.to_string())
                })
                .collect(),
            children: Vec::new(),
        }))
    }

    /// Append `child` to `parent`. Appending to a text node is ignored.
    pub(crate) fn push_child(
        &mut self,
        parent: &PaDomHandle,
        child: PaDomHandle,
    ) {
        if let Some(children) = self.get_mut_node(parent).children_mut() {
            children.push(child);
        }
    }

    pub(crate) fn children(&self, handle: &PaDomHandle) -> &[PaDomHandle] {
        match self.get_node(handle) {
            PaDomNode::Document(c) | PaDomNode::Container(c) => &c.children,
            PaDomNode::Text(_) | PaDomNode::Comment(_) => &[],
        }
    }

    pub(crate) fn parent_of(
        &self,
        handle: &PaDomHandle,
    ) -> Option<PaDomHandle> {
        self.nodes
            .iter()
            .position(|node| match node {
                PaDomNode::Document(c) | PaDomNode::Container(c) => {
                    c.children.contains(handle)
                }
                PaDomNode::Text(_) | PaDomNode::Comment(_) => false,
            })
            .map(PaDomHandle)
    }

    /// Unlink `handle` from its parent, if it has one.
    pub(crate) fn detach(&mut self, handle: &PaDomHandle) {
        if let Some(parent) = self.parent_of(handle) {
            if let Some(children) = self.get_mut_node(&parent).children_mut() {
                children.retain(|c| c != handle);
            }
        }
    }

    /// Insert `child` into `sibling`'s parent, immediately before it.
    pub(crate) fn insert_before(
        &mut self,
        sibling: &PaDomHandle,
        child: PaDomHandle,
    ) {
        let Some(parent) = self.parent_of(sibling) else {
            return;
        };
        if let Some(children) = self.get_mut_node(&parent).children_mut() {
            let at = children
                .iter()
                .position(|c| c == sibling)
                .unwrap_or(children.len());
            children.insert(at, child);
        }
    }

    /// Move every child of `from` to the end of `to`.
    pub(crate) fn reparent_children(
        &mut self,
        from: &PaDomHandle,
        to: &PaDomHandle,
    ) {
        let moved = match self.get_mut_node(from).children_mut() {
            Some(children) => std::mem::take(children),
            None => return,
        };
        if let Some(children) = self.get_mut_node(to).children_mut() {
            children.extend(moved);
        }
    }
}

pub(crate) fn paqual_name(local_name: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(local_name),
    )
}
