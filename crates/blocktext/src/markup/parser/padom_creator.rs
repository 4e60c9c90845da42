// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::borrow::Cow;
use std::cell::{Ref, RefCell};

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};

use super::{paqual_name, PaDom, PaDomHandle, PaDomNode, PaNodeText};

/// A finished parse: the arena plus every complaint html5ever raised.
///
/// Complaints never stop the tree from being built; the strict entry
/// points turn them into errors, the lenient ones only log them.
#[derive(Clone, Debug)]
pub(crate) struct PaDomParse {
    pub(crate) dom: PaDom,
    pub(crate) parse_errors: Vec<String>,
}

pub(crate) struct PaDomCreator {
    state: RefCell<PaDomParse>,
}

impl PaDomCreator {
    pub(crate) fn parse(markup: &str) -> PaDomParse {
        parse_fragment(
            PaDomCreator::default(),
            Default::default(),
            paqual_name(""),
            vec![],
        )
        .from_utf8()
        .one(markup.as_bytes())
    }

    fn append_text(&self, parent: &PaDomHandle, text: &str) {
        let dom = &mut self.state.borrow_mut().dom;
        let last_text = match dom.children(parent).last() {
            Some(last) if matches!(dom.get_node(last), PaDomNode::Text(_)) => {
                Some(last.clone())
            }
            _ => None,
        };
        match last_text {
            Some(handle) => {
                if let PaDomNode::Text(node) = dom.get_mut_node(&handle) {
                    node.content.push_str(text);
                }
            }
            None => {
                let handle = dom.add_node(PaDomNode::Text(PaNodeText {
                    content: text.to_owned(),
                }));
                dom.push_child(parent, handle);
            }
        }
    }
}

impl Default for PaDomCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(PaDomParse {
                dom: PaDom::new(),
                parse_errors: Vec::new(),
            }),
        }
    }
}

impl TreeSink for PaDomCreator {
    type Handle = PaDomHandle;
    type Output = PaDomParse;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        self.state.into_inner()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().dom.document_handle().clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |state| state.dom.get_node(target).name())
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        self.state
            .borrow_mut()
            .dom
            .create_element(name, attrs, flags)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.state
            .borrow_mut()
            .dom
            .add_node(PaDomNode::Comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        self.create_comment(data)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(child) => {
                self.state.borrow_mut().dom.push_child(parent, child)
            }
            NodeOrText::AppendText(tendril) => {
                self.append_text(parent, tendril.as_ref())
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().dom.parent_of(element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Fragments have no doctype
    }

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are kept inline; the walkers decide whether to
        // read them.
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        match new_node {
            NodeOrText::AppendNode(node) => {
                dom.detach(&node);
                dom.insert_before(sibling, node);
            }
            NodeOrText::AppendText(tendril) => {
                let previous = dom.parent_of(sibling).and_then(|parent| {
                    let children = dom.children(&parent);
                    let at = children.iter().position(|c| c == sibling)?;
                    at.checked_sub(1).map(|i| children[i].clone())
                });
                if let Some(previous) = previous {
                    if let PaDomNode::Text(text) = dom.get_mut_node(&previous) {
                        text.content.push_str(tendril.as_ref());
                        return;
                    }
                }
                let handle = dom.add_node(PaDomNode::Text(PaNodeText {
                    content: tendril.as_ref().to_owned(),
                }));
                dom.insert_before(sibling, handle);
            }
        }
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        if let PaDomNode::Container(node) = dom.get_mut_node(target) {
            for attr in attrs {
                let name = attr.name.local.as_ref();
                if node.get_attr(name).is_none() {
                    node.attrs.push((name.to_owned(), attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.state.borrow_mut().dom.detach(target);
    }

    fn reparent_children(
        &self,
        node: &Self::Handle,
        new_parent: &Self::Handle,
    ) {
        self.state
            .borrow_mut()
            .dom
            .reparent_children(node, new_parent);
    }

    fn set_current_line(&self, _line_number: u64) {}
}
