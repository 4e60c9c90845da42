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

//! Syntax highlighting for code blocks.
//!
//! Code blocks never carry marks; their markup is the block text run
//! through a syntect grammar and emitted as classed `<span>`s, styled by
//! the host. Newlines stay literal because code surfaces preserve
//! whitespace.

use once_cell::sync::Lazy;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::error::{Error, Result};

/// Language id that turns highlighting off.
pub const PLAIN: &str = "plain";

static SYNTAX_SET: Lazy<SyntaxSet> =
    Lazy::new(SyntaxSet::load_defaults_newlines);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highlighted {
    pub markup: String,
    /// The language actually used, after fallback.
    pub lang: String,
}

#[derive(Clone, Debug)]
pub struct Highlighter {
    default_lang: String,
}

impl Highlighter {
    pub fn new(default_lang: impl Into<String>) -> Self {
        Self {
            default_lang: default_lang.into(),
        }
    }

    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    /// Highlight `code` as `lang`. Never fails: an unknown language falls
    /// back to the default one, and a grammar failure to escaped text.
    pub fn highlight(&self, code: &str, lang: &str) -> Highlighted {
        self.try_highlight(code, lang).unwrap_or_else(|err| {
            log::warn!("{err}; showing code block as plain text");
            plain(code)
        })
    }

    pub fn try_highlight(&self, code: &str, lang: &str) -> Result<Highlighted> {
        if lang == PLAIN {
            return Ok(plain(code));
        }
        let Some((syntax, lang)) = self.resolve(lang) else {
            return Ok(plain(code));
        };
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &SYNTAX_SET,
            ClassStyle::Spaced,
        );
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| Error::Highlight(format!("{lang}: {e}")))?;
        }
        Ok(Highlighted {
            markup: generator.finalize(),
            lang: lang.to_owned(),
        })
    }

    fn resolve<'a>(
        &'a self,
        lang: &'a str,
    ) -> Option<(&'static SyntaxReference, &'a str)> {
        if let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang) {
            return Some((syntax, lang));
        }
        log::debug!(
            "no grammar for `{lang}`, falling back to `{}`",
            self.default_lang
        );
        SYNTAX_SET
            .find_syntax_by_token(&self.default_lang)
            .map(|syntax| (syntax, self.default_lang.as_str()))
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new("js")
    }
}

fn plain(code: &str) -> Highlighted {
    Highlighted {
        markup: html_escape::encode_text(code).into_owned(),
        lang: PLAIN.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::plain_text;

    #[test]
    fn known_languages_are_highlighted() {
        let code = "let x = 1 < 2;\nfn main() {}\n";
        let out = Highlighter::default().highlight(code, "rust");
        assert_eq!(out.lang, "rust");
        assert!(out.markup.contains("<span class=\""));
        assert_eq!(plain_text(&out.markup), code);
    }

    #[test]
    fn unknown_languages_fall_back_to_the_default() {
        let out = Highlighter::new("js").highlight("var a = 1;", "cobol-85");
        assert_eq!(out.lang, "js");
        assert!(out.markup.contains("<span"));
    }

    #[test]
    fn plain_bypasses_highlighting() {
        let out = Highlighter::default().highlight("a < b", PLAIN);
        assert_eq!(
            out,
            Highlighted {
                markup: "a &lt; b".into(),
                lang: PLAIN.into(),
            }
        );
    }

    #[test]
    fn unresolvable_default_gives_plain_text() {
        let out = Highlighter::new("no-such-lang").highlight("x", "nor-this");
        assert_eq!(out.lang, PLAIN);
        assert_eq!(out.markup, "x");
    }
}
