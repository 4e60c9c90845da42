// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::parse::{parse_from_source, MarkupSource, Parsed};
use crate::markup::render;

static META_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<meta[^>]*>").unwrap());

/// Reduce pasted markup to the tags and attributes the editor understands.
pub fn sanitize(markup: &str) -> String {
    let parsed = sanitize_to_parts(markup);
    render(&parsed.text, &parsed.marks)
}

/// Like [`sanitize`], but hand back the text and marks instead of
/// re-rendering them.
pub fn sanitize_to_parts(markup: &str) -> Parsed {
    // Office suites prepend <meta> tags that confuse fragment parsing
    let cleaned = META_TAG.replace_all(markup, "");
    let (parsed, problems) =
        parse_from_source(&cleaned, MarkupSource::Clipboard);
    if !problems.is_empty() {
        log::debug!("sanitized pasted markup: {}", problems.join("; "));
    }
    parsed
}
