// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::error::{Error, Result};
use crate::mark::{Mark, MarkType, Range};
use crate::mark_store::MarkStore;
use crate::markup::parser::{PaDom, PaDomCreator, PaDomNode, PaNodeContainer};
use crate::ranges::check_ranges;
use crate::text::utf16_len;

/// Where a piece of markup came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MarkupSource {
    /// Markup read back from the editable surface, i.e. our own rendering
    /// plus whatever the user typed into it.
    Editor,
    /// Foreign markup from the clipboard. Synonym tags and styled spans are
    /// understood, block structure becomes line breaks and every parameter
    /// is validated.
    Clipboard,
}

/// Plain text plus the marks found over it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parsed {
    pub text: String,
    pub marks: Vec<Mark>,
}

/// Read editor markup back into text and marks.
///
/// Never fails: anything html5ever complains about or that is not one of
/// our tags is logged and read as plain text.
pub fn parse(markup: &str) -> Parsed {
    let (parsed, problems) = parse_from_source(markup, MarkupSource::Editor);
    if !problems.is_empty() {
        log::debug!("lenient parse ignored: {}", problems.join("; "));
    }
    parsed
}

/// Like [`parse`], but any parse error or unknown element is an error.
pub fn try_parse(markup: &str) -> Result<Parsed> {
    let (parsed, problems) = parse_from_source(markup, MarkupSource::Editor);
    if problems.is_empty() {
        Ok(parsed)
    } else {
        Err(Error::MarkupParse { errors: problems })
    }
}

/// The text a reader would see, without any marks.
pub fn plain_text(markup: &str) -> String {
    parse(markup).text
}

pub(crate) fn parse_from_source(
    markup: &str,
    source: MarkupSource,
) -> (Parsed, Vec<String>) {
    let parsed = PaDomCreator::parse(markup);
    let mut converter = Converter::new(&parsed.dom, source);
    converter.convert(parsed.dom.document());
    let mut problems = parsed.parse_errors;
    problems.append(&mut converter.unsupported);
    (converter.finish(), problems)
}

struct Converter<'a> {
    dom: &'a PaDom,
    source: MarkupSource,
    text: String,
    len: usize,
    marks: MarkStore,
    pending_break: bool,
    pre_depth: usize,
    unsupported: Vec<String>,
}

impl<'a> Converter<'a> {
    fn new(dom: &'a PaDom, source: MarkupSource) -> Self {
        Self {
            dom,
            source,
            text: String::new(),
            len: 0,
            marks: MarkStore::new(),
            pending_break: false,
            pre_depth: 0,
            unsupported: Vec::new(),
        }
    }

    fn finish(self) -> Parsed {
        let mut marks = self.marks.into_vec();
        if self.source == MarkupSource::Clipboard {
            check_ranges(&self.text, &mut marks);
        }
        Parsed {
            text: self.text,
            marks,
        }
    }

    fn convert(&mut self, container: &PaNodeContainer) {
        let dom = self.dom;
        for handle in &container.children {
            match dom.get_node(handle) {
                PaDomNode::Container(child) => self.convert_container(child),
                PaDomNode::Text(text) => self.convert_text(&text.content),
                PaDomNode::Document(_) | PaDomNode::Comment(_) => {}
            }
        }
    }

    fn convert_container(&mut self, child: &PaNodeContainer) {
        let tag = child.tag();
        match tag {
            "html" | "body" | "name" => self.convert(child),
            "br" => {
                self.flush_break();
                self.push_text("\n");
            }
            // Widget chrome: filled in by enrichment, never part of the text
            "smile" => {}
            _ => {
                if let Some((mark_type, param)) = self.mark_for(child) {
                    self.convert_marked(child, &[(mark_type, param)]);
                } else if self.source == MarkupSource::Clipboard {
                    self.convert_foreign(child);
                } else {
                    self.unsupported
                        .push(format!("Node `{tag}` is not supported"));
                    self.convert(child);
                }
            }
        }
    }

    /// Convert the children of `child` and mark everything they produced.
    fn convert_marked(
        &mut self,
        child: &PaNodeContainer,
        marks: &[(MarkType, String)],
    ) {
        let start = self.len;
        self.convert(child);
        let end = self.len;
        if end > start {
            for (mark_type, param) in marks {
                self.marks.add(Mark::with_param(
                    *mark_type,
                    param.clone(),
                    Range::new(start, end),
                ));
            }
        }
    }

    fn mark_for(&self, child: &PaNodeContainer) -> Option<(MarkType, String)> {
        let tag = child.tag();
        let clipboard = self.source == MarkupSource::Clipboard;
        let mark_type = match MarkType::from_tag(tag) {
            Some(mark_type) => mark_type,
            None if !clipboard => return None,
            None => match tag {
                "strong" => MarkType::Bold,
                "em" => MarkType::Italic,
                "s" | "del" => MarkType::Strike,
                "code" if self.pre_depth == 0 => MarkType::Code,
                "a" if child.get_attr("href").is_some() => MarkType::Link,
                _ => return None,
            },
        };
        // Google Docs wraps whole pastes in a non-bold <b>
        if clipboard
            && mark_type == MarkType::Bold
            && child.contains_style("font-weight", "normal")
        {
            return None;
        }
        let param = match mark_type {
            MarkType::Link => child.get_attr("href"),
            _ => None,
        }
        .or_else(|| child.get_attr("data-param"))
        .unwrap_or("");
        Some((mark_type, param.to_owned()))
    }

    fn convert_foreign(&mut self, child: &PaNodeContainer) {
        match child.tag() {
            "script" | "style" | "head" | "title" | "template" | "meta"
            | "link" | "noscript" => {}
            "span" => {
                let styles = span_marks(child);
                self.convert_marked(child, &styles);
            }
            "pre" => {
                self.request_break();
                self.pre_depth += 1;
                self.convert(child);
                self.pre_depth -= 1;
                self.request_break();
            }
            tag if is_block(tag) => {
                self.request_break();
                self.convert(child);
                self.request_break();
            }
            _ => self.convert(child),
        }
    }

    fn convert_text(&mut self, content: &str) {
        if self.source == MarkupSource::Editor || self.pre_depth > 0 {
            self.flush_break();
            self.push_text(content);
            return;
        }
        let collapsed = collapse_whitespace(content);
        let at_line_start = self.pending_break
            || self.text.is_empty()
            || self.text.ends_with(['\n', ' ']);
        let collapsed = if at_line_start {
            collapsed.trim_start_matches(' ')
        } else {
            collapsed.as_str()
        };
        if !collapsed.is_empty() {
            self.flush_break();
            self.push_text(collapsed);
        }
    }

    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
        self.len += utf16_len(text);
    }

    fn request_break(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.pending_break = true;
        }
    }

    fn flush_break(&mut self) {
        if std::mem::take(&mut self.pending_break)
            && !self.text.is_empty()
            && !self.text.ends_with('\n')
        {
            self.push_text("\n");
        }
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "li"
            | "ul"
            | "ol"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "tr"
            | "table"
            | "blockquote"
            | "section"
            | "article"
            | "header"
            | "footer"
    )
}

/// Marks implied by a styled `<span>`.
fn span_marks(span: &PaNodeContainer) -> Vec<(MarkType, String)> {
    let styles = [
        ("font-weight", "bold", MarkType::Bold),
        ("font-weight", "700", MarkType::Bold),
        ("font-style", "italic", MarkType::Italic),
        ("text-decoration", "underline", MarkType::Underline),
        ("text-decoration", "line-through", MarkType::Strike),
    ];
    let mut marks: Vec<(MarkType, String)> = Vec::new();
    for (name, value, mark_type) in styles {
        if span.contains_style(name, value)
            && !marks.iter().any(|(t, _)| *t == mark_type)
        {
            marks.push((mark_type, String::new()));
        }
    }
    marks
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(if ch == '\u{A0}' { ' ' } else { ch });
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use speculoos::{assert_that, AssertionFailure, Spec};

    use super::*;
    use crate::markup::render;

    trait Roundtrips<T> {
        fn roundtrips(&self);
    }

    impl<'s, T> Roundtrips<T> for Spec<'s, T>
    where
        T: AsRef<str>,
    {
        fn roundtrips(&self) {
            let subject = self.subject.as_ref();
            let parsed = parse(subject);
            let output = render(&parsed.text, &parsed.marks);
            if output != subject {
                AssertionFailure::from_spec(self)
                    .with_expected(String::from(subject))
                    .with_actual(output)
                    .fail();
            }
        }
    }

    fn mark(mark_type: MarkType, from: usize, to: usize) -> Mark {
        Mark::new(mark_type, Range::new(from, to))
    }

    fn clipboard(markup: &str) -> Parsed {
        parse_from_source(markup, MarkupSource::Clipboard).0
    }

    #[test]
    fn parse_plain_text() {
        assert_that!("some text").roundtrips();
    }

    #[test]
    fn parse_simple_tag() {
        assert_that!("<b>sdfds</b>").roundtrips();
    }

    #[test]
    fn parse_tag_with_surrounding_text() {
        assert_that!("before <i>inside</i> after").roundtrips();
    }

    #[test]
    fn parse_nested_tags() {
        assert_that!("a<b>b<i>c</i>d</b>e").roundtrips();
    }

    #[test]
    fn parse_br_tag() {
        assert_that!("a<br>b").roundtrips();
        assert_eq!(parse("a<br>b").text, "a\nb");
    }

    #[test]
    fn parse_link() {
        assert_that!(r#"<lnk href="https://matrix.org">here</lnk>"#)
            .roundtrips();
    }

    #[test]
    fn parse_parametrised_marks() {
        assert_that!(r#"<color data-param="red">warm</color>"#).roundtrips();
        assert_that!(r#"<obj data-param="page1">Page</obj>"#).roundtrips();
    }

    #[test]
    fn parse_mention_skips_the_widget_chrome() {
        let parsed = parse(
            r#"hi <mention data-param="u1"><smile>&#128512;</smile><name>Ann</name></mention>"#,
        );
        assert_eq!(parsed.text, "hi Ann");
        assert_eq!(
            parsed.marks,
            vec![Mark::with_param(MarkType::Mention, "u1", Range::new(3, 6))]
        );
    }

    #[test]
    fn parse_decodes_entities() {
        assert_eq!(parse("a &lt;b&gt; &amp; c").text, "a <b> & c");
    }

    #[test]
    fn fragments_of_one_mark_are_merged() {
        let parsed = parse("<i>ab</i><b><i>cd</i></b>");
        assert_eq!(parsed.text, "abcd");
        assert!(parsed.marks.contains(&mark(MarkType::Italic, 0, 4)));
        assert!(parsed.marks.contains(&mark(MarkType::Bold, 2, 4)));
        assert_eq!(parsed.marks.len(), 2);
    }

    #[test]
    fn empty_elements_produce_no_marks() {
        assert!(parse("a<b></b>c").marks.is_empty());
    }

    #[test]
    fn unknown_elements_are_read_as_text() {
        let parsed = parse("<div>a<span>b</span></div>");
        assert_eq!(parsed.text, "ab");
        assert!(parsed.marks.is_empty());
    }

    #[test]
    fn try_parse_rejects_unknown_elements() {
        let err = try_parse("<div>a</div>").unwrap_err();
        assert_eq!(
            err.to_string(),
            "markup could not be parsed cleanly: Node `div` is not supported"
        );
        assert!(try_parse("<b>a</b><br>c").is_ok());
    }

    #[test]
    fn plain_text_strips_everything() {
        assert_eq!(plain_text("<b>x</b><lnk href=\"a.org\">y</lnk>"), "xy");
    }

    #[test]
    fn clipboard_maps_synonyms() {
        let parsed = clipboard(
            "<strong>a</strong><em>b</em><del>c</del><s>d</s><code>e</code>",
        );
        assert_eq!(parsed.text, "abcde");
        assert_eq!(
            parsed.marks,
            vec![
                mark(MarkType::Bold, 0, 1),
                mark(MarkType::Italic, 1, 2),
                mark(MarkType::Strike, 2, 4),
                mark(MarkType::Code, 4, 5),
            ]
        );
    }

    #[test]
    fn clipboard_reads_styled_spans() {
        let parsed = clipboard(
            r#"<span style="font-weight:700;font-style:italic">x</span>"#,
        );
        assert_eq!(
            parsed.marks,
            vec![mark(MarkType::Bold, 0, 1), mark(MarkType::Italic, 0, 1)]
        );
    }

    #[test]
    fn clipboard_turns_blocks_into_lines() {
        let parsed = clipboard(indoc! {"
            <h1>Title</h1>
            <p>First   paragraph</p>
            <ul>
              <li>one</li>
              <li>two</li>
            </ul>
        "});
        assert_eq!(parsed.text, "Title\nFirst paragraph\none\ntwo");
    }

    #[test]
    fn clipboard_keeps_preformatted_whitespace() {
        let parsed = clipboard("<p>a</p><pre>x  =\n  1</pre>");
        assert_eq!(parsed.text, "a\nx  =\n  1");
    }

    #[test]
    fn clipboard_drops_scripts_and_bad_links() {
        let parsed = clipboard(
            "<script>alert(1)</script><a href=\"not a url\">x</a><a>y</a>",
        );
        assert_eq!(parsed.text, "xy");
        assert!(parsed.marks.is_empty());
    }

    #[test]
    fn clipboard_keeps_good_links() {
        let parsed = clipboard("<a href=\"https://matrix.org\">m</a>");
        assert_eq!(
            parsed.marks,
            vec![Mark::with_param(
                MarkType::Link,
                "https://matrix.org",
                Range::new(0, 1)
            )]
        );
    }

    #[test]
    fn clipboard_ignores_google_docs_wrapper() {
        let parsed = clipboard(
            r#"<b style="font-weight:normal;" id="docs-internal-guid-1"><p><i>Italic</i></p></b>"#,
        );
        assert_eq!(parsed.text, "Italic");
        assert_eq!(parsed.marks, vec![mark(MarkType::Italic, 0, 6)]);
    }
}
