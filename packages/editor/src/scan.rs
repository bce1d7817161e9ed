//! # Source Scanning
//!
//! Balanced-delimiter and markup-tag scanning over raw component source.
//!
//! Nothing here parses the component language. The scanner only answers two
//! questions: where does a construct open, and where is its matching close.
//! String literals and whole markup elements are skipped while scanning code,
//! so delimiters inside them are not counted. Inside an element only tags and
//! `{...}` expressions matter, and nested tags with the same name are
//! depth-counted so the outermost element closes on its own closing tag.

use std::ops::Range;

/// Opening tag of a markup element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    /// Tag name (empty for fragments `<>`)
    pub name: String,
    /// Byte offset just past the closing `>` of the opening tag
    pub end: usize,
    /// Whether the tag closes itself (`<Hero />`)
    pub self_closing: bool,
}

/// A complete markup element located in source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpan {
    pub name: String,
    /// Offset of the opening `<`
    pub start: usize,
    /// Offset just past the opening tag
    pub open_end: usize,
    /// Offset of the closing tag's `<` (equal to `end` when self-closing)
    pub close_start: usize,
    /// Offset just past the whole element
    pub end: usize,
    pub self_closing: bool,
}

impl ElementSpan {
    /// Range covering the element including its tags
    pub fn outer(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Range between the opening and closing tags
    pub fn inner(&self) -> Range<usize> {
        self.open_end..self.close_start
    }

    /// Source text of the opening tag, attributes included
    pub fn opening_tag<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.open_end]
    }
}

fn is_tag_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_' | b':')
}

/// An apostrophe only opens a string when it does not follow a word
/// character; `Don't` in markup text is prose, not a literal.
fn opens_single_quote(bytes: &[u8], i: usize) -> bool {
    i == 0 || !bytes[i - 1].is_ascii_alphanumeric()
}

/// Skip a quoted literal starting at `i`, returning the offset after its
/// closing quote. Unterminated literals yield `None`.
fn skip_quoted(bytes: &[u8], i: usize) -> Option<usize> {
    let quote = bytes[i];
    let mut j = i + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b if b == quote => return Some(j + 1),
            _ => j += 1,
        }
    }
    None
}

/// What begins at an offset of code
pub(crate) enum CodeAtom {
    /// A string literal or markup element; scanning resumes at the offset
    Skip(usize),
    /// A string literal that never closes
    Unterminated,
    Plain,
}

/// Whether a `<` at `lt` sits where an expression may begin, so it can open
/// markup rather than compare (`i < n`) or bind a type (`useState<T>`).
fn markup_may_start(bytes: &[u8], lt: usize) -> bool {
    let mut j = lt;
    while j > 0 && bytes[j - 1].is_ascii_whitespace() {
        j -= 1;
    }
    if j == 0 {
        return true;
    }

    match bytes[j - 1] {
        b'(' | b',' | b'=' | b':' | b'?' | b'&' | b'|' | b'!' | b'{' | b'[' | b';' | b'>' => true,
        _ => {
            let before = &bytes[..j];
            before.ends_with(b"return")
                && (j == 6 || !(bytes[j - 7].is_ascii_alphanumeric() || bytes[j - 7] == b'_'))
        }
    }
}

/// Classify the code at `i`. Markup elements are skipped whole, so text
/// inside them (`1) Sign up`, `'90s`) never counts as delimiters or quotes.
pub(crate) fn code_atom(source: &str, i: usize) -> CodeAtom {
    let bytes = source.as_bytes();
    let literal = |i| skip_quoted(bytes, i).map_or(CodeAtom::Unterminated, CodeAtom::Skip);

    match bytes[i] {
        b'"' | b'`' => literal(i),
        b'\'' if opens_single_quote(bytes, i) => literal(i),
        b'<' if markup_may_start(bytes, i) => match element_at(source, i) {
            Some(element) => CodeAtom::Skip(element.end),
            None => CodeAtom::Plain,
        },
        _ => CodeAtom::Plain,
    }
}

/// Find the delimiter closing the one at `open` (`(`, `{` or `[`).
///
/// Returns the offset of the closing delimiter.
pub fn matching_close(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let (open_ch, close_ch) = match bytes.get(open)? {
        b'(' => (b'(', b')'),
        b'{' => (b'{', b'}'),
        b'[' => (b'[', b']'),
        _ => return None,
    };

    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match code_atom(source, i) {
            CodeAtom::Skip(next) => {
                i = next;
                continue;
            }
            CodeAtom::Unterminated => return None,
            CodeAtom::Plain => {}
        }
        match bytes[i] {
            c if c == open_ch => depth += 1,
            c if c == close_ch => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Parse the opening tag starting at `lt` (which must point at `<`).
///
/// Closing tags, comparison operators (`a < b`) and malformed tags yield
/// `None`.
pub fn open_tag_at(source: &str, lt: usize) -> Option<OpenTag> {
    let bytes = source.as_bytes();
    if bytes.get(lt) != Some(&b'<') {
        return None;
    }

    let name_start = lt + 1;
    let mut j = name_start;
    while j < bytes.len() && is_tag_name_char(bytes[j]) {
        j += 1;
    }
    let name = &source[name_start..j];

    if name.is_empty() {
        // Only a fragment `<>` may have an empty name
        return if bytes.get(j) == Some(&b'>') {
            Some(OpenTag {
                name: String::new(),
                end: j + 1,
                self_closing: false,
            })
        } else {
            None
        };
    }

    if !bytes[name_start].is_ascii_alphabetic() {
        return None;
    }

    // Attributes: quoted values and `{...}` expressions may contain `>`
    let mut last_significant = b'<';
    while j < bytes.len() {
        match bytes[j] {
            b'"' | b'\'' => {
                j = skip_quoted(bytes, j)?;
                last_significant = b'"';
                continue;
            }
            b'{' => {
                j = matching_close(source, j)? + 1;
                last_significant = b'}';
                continue;
            }
            b'>' => {
                return Some(OpenTag {
                    name: name.to_string(),
                    end: j + 1,
                    self_closing: last_significant == b'/',
                });
            }
            b'<' => return None,
            b if b.is_ascii_whitespace() => {}
            b => last_significant = b,
        }
        j += 1;
    }

    None
}

/// Find the closing tag for an element named `name` whose content starts at
/// `from`. Returns `(close_start, end)`.
///
/// Element text is literal: only tags and `{...}` expressions are scanned.
fn find_close(source: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = source.as_bytes();
    let mut depth = 1usize;
    let mut i = from;

    while let Some(offset) = source[i..].find(['<', '{']) {
        let lt = i + offset;

        // `{...}` in element text is an expression; its contents are code
        if bytes[lt] == b'{' {
            i = matching_close(source, lt).map_or(lt + 1, |close| close + 1);
            continue;
        }

        if bytes.get(lt + 1) == Some(&b'/') {
            let name_start = lt + 2;
            let mut name_end = name_start;
            while name_end < bytes.len() && is_tag_name_char(bytes[name_end]) {
                name_end += 1;
            }
            let mut gt = name_end;
            while gt < bytes.len() && bytes[gt].is_ascii_whitespace() {
                gt += 1;
            }
            if bytes.get(gt) == Some(&b'>') && &source[name_start..name_end] == name {
                depth -= 1;
                if depth == 0 {
                    return Some((lt, gt + 1));
                }
            }
            i = name_end.max(lt + 2);
            continue;
        }

        if let Some(tag) = open_tag_at(source, lt) {
            if tag.name == name && !tag.self_closing {
                depth += 1;
            }
            i = tag.end;
            continue;
        }

        i = lt + 1;
    }

    None
}

/// Locate the complete element whose opening `<` sits at `lt`.
pub fn element_at(source: &str, lt: usize) -> Option<ElementSpan> {
    let tag = open_tag_at(source, lt)?;

    if tag.self_closing {
        return Some(ElementSpan {
            name: tag.name,
            start: lt,
            open_end: tag.end,
            close_start: tag.end,
            end: tag.end,
            self_closing: true,
        });
    }

    let (close_start, end) = find_close(source, &tag.name, tag.end)?;
    Some(ElementSpan {
        name: tag.name,
        start: lt,
        open_end: tag.end,
        close_start,
        end,
        self_closing: false,
    })
}

/// Iterator over every element (nested ones included) that lies entirely
/// within a scope, in source order of their opening tags.
pub struct Elements<'a> {
    source: &'a str,
    pos: usize,
    end: usize,
}

impl<'a> Iterator for Elements<'a> {
    type Item = ElementSpan;

    fn next(&mut self) -> Option<ElementSpan> {
        while self.pos < self.end {
            let offset = self.source[self.pos..self.end].find('<')?;
            let lt = self.pos + offset;
            self.pos = lt + 1;

            if let Some(element) = element_at(self.source, lt) {
                if element.end <= self.end {
                    return Some(element);
                }
            }
        }
        None
    }
}

/// All elements within `scope`, outermost first
pub fn elements(source: &str, scope: Range<usize>) -> Elements<'_> {
    Elements {
        source,
        pos: scope.start,
        end: scope.end.min(source.len()),
    }
}

/// Elements named `name` within `scope` that are not nested inside another
/// element of the same name.
pub fn top_level_named(source: &str, scope: Range<usize>, name: &str) -> Vec<ElementSpan> {
    let mut found = Vec::new();
    let end = scope.end.min(source.len());
    let mut i = scope.start;

    while i < end {
        let Some(offset) = source[i..end].find('<') else {
            break;
        };
        let lt = i + offset;

        match element_at(source, lt) {
            Some(element) if element.name == name && element.end <= end => {
                i = element.end;
                found.push(element);
            }
            _ => i = lt + 1,
        }
    }

    found
}

/// Narrow a range so it excludes leading and trailing whitespace
pub fn trim_range(source: &str, range: Range<usize>) -> Range<usize> {
    let slice = &source[range.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();

    if leading == slice.len() {
        // All whitespace: empty range after it
        return range.start + leading..range.start + leading;
    }

    range.start + leading..range.end - trailing
}

/// Skip ASCII whitespace from `i`
pub fn skip_whitespace(source: &str, mut i: usize) -> usize {
    let bytes = source.as_bytes();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}
