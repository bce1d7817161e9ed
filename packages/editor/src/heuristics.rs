//! # Fallback Heuristics
//!
//! Structural pattern matchers that locate the editable region of a
//! component source file.
//!
//! ## Chains
//!
//! Each document kind has an ordered chain. Matchers are tried in order and
//! the first one that returns a range wins; the extractor and the patcher both
//! walk the same chain, so the region shown for editing is exactly the region
//! later replaced.
//!
//! ```text
//! home: component return → component aria-label wrapper → component motion.* wrapper
//!       → section blocks → first element
//! page: return statement → section blocks → className container → component tags
//! ```
//!
//! Every matcher returns `Option<Range<usize>>`; no matcher ever errors.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scan::{
    code_atom, element_at, elements, matching_close, skip_whitespace, top_level_named,
    trim_range, CodeAtom,
};
use crate::DocumentKind;

static FUNCTION_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(export\s+default\s+)?(?:async\s+)?function\s+([A-Z][A-Za-z0-9_]*)\s*\(")
        .expect("function component pattern")
});

static ARROW_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:const|let|var)\s+([A-Z][A-Za-z0-9_]*)\s*(?::[^=]+)?=\s*(?:async\s*)?\(")
        .expect("arrow component pattern")
});

static DEFAULT_EXPORT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)export\s+default\s+([A-Z][A-Za-z0-9_]*)\s*(?:;|$)")
        .expect("default export pattern")
});

static RETURN_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\breturn\b").expect("return pattern"));

static ARIA_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\saria-label\s*=").expect("aria-label pattern"));

static CLASS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\sclassName\s*=").expect("className pattern"));

/// A single fallback matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Heuristic {
    /// Top-level `return (...)` of the outer component block
    ComponentReturn,
    /// Inner content of the first `aria-label` element in the component block
    ComponentLabeledWrapper,
    /// Inner content of the first `motion.*` element in the component block
    ComponentAnimatedWrapper,
    /// Markup returned by the page component, or the first markup return
    ReturnStatement,
    /// Every top-level `<section>` block, as one contiguous range
    SectionBlocks,
    /// Inner content of the first element carrying `className`
    StyledContainer,
    /// Every self-closing capitalised component tag, as one contiguous range
    ComponentTags,
    /// The first complete element anywhere, tags included
    FirstElement,
}

pub const HOME_CHAIN: &[Heuristic] = &[
    Heuristic::ComponentReturn,
    Heuristic::ComponentLabeledWrapper,
    Heuristic::ComponentAnimatedWrapper,
    Heuristic::SectionBlocks,
    Heuristic::FirstElement,
];

pub const PAGE_CHAIN: &[Heuristic] = &[
    Heuristic::ReturnStatement,
    Heuristic::SectionBlocks,
    Heuristic::StyledContainer,
    Heuristic::ComponentTags,
];

impl DocumentKind {
    /// Ordered fallback chain for this kind
    pub fn chain(&self) -> &'static [Heuristic] {
        match self {
            DocumentKind::Home => HOME_CHAIN,
            DocumentKind::Page => PAGE_CHAIN,
        }
    }
}

impl Heuristic {
    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::ComponentReturn => "component-return",
            Heuristic::ComponentLabeledWrapper => "component-labeled-wrapper",
            Heuristic::ComponentAnimatedWrapper => "component-animated-wrapper",
            Heuristic::ReturnStatement => "return-statement",
            Heuristic::SectionBlocks => "section-blocks",
            Heuristic::StyledContainer => "styled-container",
            Heuristic::ComponentTags => "component-tags",
            Heuristic::FirstElement => "first-element",
        }
    }

    /// Locate this heuristic's raw (untrimmed) range in `source`
    pub fn locate(&self, source: &str) -> Option<Range<usize>> {
        let whole = 0..source.len();

        match self {
            Heuristic::ComponentReturn => {
                let component = primary_component(source)?;
                if component.expression_body {
                    return None;
                }
                top_level_return(source, component.body)
            }

            Heuristic::ComponentLabeledWrapper => {
                let component = primary_component(source)?;
                elements(source, component.body)
                    .find(|e| !e.self_closing && ARIA_LABEL.is_match(e.opening_tag(source)))
                    .map(|e| e.inner())
            }

            Heuristic::ComponentAnimatedWrapper => {
                let component = primary_component(source)?;
                elements(source, component.body)
                    .find(|e| !e.self_closing && e.name.starts_with("motion."))
                    .map(|e| e.inner())
            }

            Heuristic::ReturnStatement => {
                if let Some(component) = primary_component(source) {
                    if !component.expression_body {
                        if let Some(range) = top_level_return(source, component.body) {
                            return Some(range);
                        }
                    }
                }
                first_markup_return(source)
            }

            Heuristic::SectionBlocks => {
                let sections = top_level_named(source, whole, "section");
                span_of(sections.iter().map(|s| s.outer()))
            }

            Heuristic::StyledContainer => elements(source, whole)
                .find(|e| !e.self_closing && CLASS_NAME.is_match(e.opening_tag(source)))
                .map(|e| e.inner()),

            Heuristic::ComponentTags => {
                let tags = elements(source, whole).filter(|e| {
                    e.self_closing && e.name.starts_with(|c: char| c.is_ascii_uppercase())
                });
                span_of(tags.map(|e| e.outer()))
            }

            Heuristic::FirstElement => elements(source, whole).next().map(|e| e.outer()),
        }
    }
}

/// Byte range of editable content and the heuristic that found it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableRegion {
    pub range: Range<usize>,
    pub heuristic: Heuristic,
}

impl EditableRegion {
    pub fn content<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.clone()]
    }
}

/// Walk the chain for `kind` and return the first (trimmed) match.
pub fn locate(source: &str, kind: DocumentKind) -> Option<EditableRegion> {
    for heuristic in kind.chain() {
        if let Some(range) = heuristic.locate(source) {
            let range = trim_range(source, range);
            tracing::debug!(
                heuristic = heuristic.name(),
                start = range.start,
                end = range.end,
                "editable region located"
            );
            return Some(EditableRegion {
                range,
                heuristic: *heuristic,
            });
        }
    }

    tracing::debug!(%kind, "no heuristic matched");
    None
}

/// A capitalised function or arrow component definition
#[derive(Debug, Clone)]
struct ComponentDefinition {
    name: String,
    start: usize,
    /// Range inside the body delimiters
    body: Range<usize>,
    /// `=> (...)` or `=> <tag>` bodies have no return statement
    expression_body: bool,
    default_export: bool,
}

fn component_definitions(source: &str) -> Vec<ComponentDefinition> {
    let mut found = Vec::new();

    for caps in FUNCTION_COMPONENT.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let Some(params_close) = matching_close(source, whole.end() - 1) else {
            continue;
        };
        let Some(brace_offset) = source[params_close..].find('{') else {
            continue;
        };
        let body_open = params_close + brace_offset;
        let Some(body_close) = matching_close(source, body_open) else {
            continue;
        };

        found.push(ComponentDefinition {
            name: name.as_str().to_string(),
            start: whole.start(),
            body: body_open + 1..body_close,
            expression_body: false,
            default_export: caps.get(1).is_some(),
        });
    }

    for caps in ARROW_COMPONENT.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(params_close) = matching_close(source, whole.end() - 1) else {
            continue;
        };
        let arrow = skip_whitespace(source, params_close + 1);
        if !source[arrow..].starts_with("=>") {
            continue;
        }
        let body_start = skip_whitespace(source, arrow + 2);

        let body = match source.as_bytes().get(body_start) {
            Some(b'{') => matching_close(source, body_start)
                .map(|close| (body_start + 1..close, false)),
            Some(b'(') => matching_close(source, body_start)
                .map(|close| (body_start + 1..close, true)),
            Some(b'<') => element_at(source, body_start).map(|e| (e.outer(), true)),
            _ => None,
        };
        let Some((body, expression_body)) = body else {
            continue;
        };

        found.push(ComponentDefinition {
            name: name.as_str().to_string(),
            start: whole.start(),
            body,
            expression_body,
            default_export: false,
        });
    }

    if let Some(default_name) = DEFAULT_EXPORT_NAME
        .captures_iter(source)
        .find_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
    {
        for definition in &mut found {
            if definition.name == default_name {
                definition.default_export = true;
            }
        }
    }

    found.sort_by_key(|d| d.start);
    found
}

/// The default-exported component, falling back to the first definition
fn primary_component(source: &str) -> Option<ComponentDefinition> {
    let definitions = component_definitions(source);
    let default = definitions.iter().position(|d| d.default_export);
    definitions.into_iter().nth(default.unwrap_or(0))
}

/// Ranges of `{...}` blocks, literals and markup nested directly inside `body`
fn nested_spans(source: &str, body: &Range<usize>) -> Vec<Range<usize>> {
    let bytes = source.as_bytes();
    let mut blocks = Vec::new();
    let mut i = body.start;

    while i < body.end {
        match code_atom(source, i) {
            CodeAtom::Skip(next) => {
                blocks.push(i..next);
                i = next;
                continue;
            }
            CodeAtom::Unterminated => break,
            CodeAtom::Plain => {}
        }
        match bytes[i] {
            b'{' => match matching_close(source, i) {
                Some(close) => {
                    blocks.push(i..close + 1);
                    i = close + 1;
                }
                None => break,
            },
            _ => i += 1,
        }
    }

    blocks
}

/// Expression wrapped by a `return` whose value starts at `at`
fn returned_expression(source: &str, at: usize) -> Option<Range<usize>> {
    match source.as_bytes().get(at)? {
        b'(' => matching_close(source, at).map(|close| at + 1..close),
        b'<' => element_at(source, at).map(|e| e.outer()),
        _ => None,
    }
}

/// First `return` at brace depth zero of `body` that wraps an expression
fn top_level_return(source: &str, body: Range<usize>) -> Option<Range<usize>> {
    let nested = nested_spans(source, &body);

    RETURN_KEYWORD
        .find_iter(&source[body.clone()])
        .map(|m| (body.start + m.start(), body.start + m.end()))
        .filter(|(start, _)| !nested.iter().any(|block| block.contains(start)))
        .find_map(|(_, end)| {
            let range = returned_expression(source, skip_whitespace(source, end))?;
            (range.end <= body.end).then_some(range)
        })
}

/// First `return` anywhere whose wrapped expression is markup
fn first_markup_return(source: &str) -> Option<Range<usize>> {
    RETURN_KEYWORD.find_iter(source).find_map(|m| {
        let range = returned_expression(source, skip_whitespace(source, m.end()))?;
        source[range.clone()]
            .trim_start()
            .starts_with('<')
            .then_some(range)
    })
}

/// Smallest range covering every range yielded, `None` when empty
fn span_of(ranges: impl Iterator<Item = Range<usize>>) -> Option<Range<usize>> {
    ranges.fold(None, |acc: Option<Range<usize>>, r| match acc {
        None => Some(r),
        Some(acc) => Some(acc.start.min(r.start)..acc.end.max(r.end)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_component_definition() {
        let source = "export default function Home() {\n  return (<main/>);\n}\n";
        let component = primary_component(source).unwrap();
        assert_eq!(component.name, "Home");
        assert!(component.default_export);
        assert!(!component.expression_body);
        assert_eq!(&source[component.body], "\n  return (<main/>);\n");
    }

    #[test]
    fn test_arrow_component_with_default_export_statement() {
        let source = r#"
const Helper = () => { return null; };
const Landing = () => (
  <motion.div animate={{ opacity: 1 }}>Hi</motion.div>
);
export default Landing;
"#;
        let component = primary_component(source).unwrap();
        assert_eq!(component.name, "Landing");
        assert!(component.expression_body);
    }

    #[test]
    fn test_lowercase_functions_are_not_components() {
        assert!(primary_component("function helper() { return 1; }").is_none());
    }

    #[test]
    fn test_nested_returns_are_skipped() {
        let source = r#"export default function List({ items }) {
  const rows = items.map((item) => {
    return (<li>{item}</li>);
  });
  if (!items) return null;
  return (
    <ul>{rows}</ul>
  );
}"#;
        let range = Heuristic::ComponentReturn.locate(source).unwrap();
        assert_eq!(source[range].trim(), "<ul>{rows}</ul>");
    }

    #[test]
    fn test_return_in_markup_text_is_skipped() {
        let source = r#"export default function Faq() {
  const note = <p>We return (most) items</p>;
  return (
    <main>{note}</main>
  );
}"#;
        let range = Heuristic::ComponentReturn.locate(source).unwrap();
        assert_eq!(source[range].trim(), "<main>{note}</main>");
    }

    #[test]
    fn test_bare_markup_return() {
        let source = "function Card() { return <div className=\"card\">Body</div>; }";
        let range = Heuristic::ReturnStatement.locate(source).unwrap();
        assert_eq!(&source[range], "<div className=\"card\">Body</div>");
    }

    #[test]
    fn test_return_statement_without_component_needs_markup() {
        let source = "const x = () => { return (1 + 2); };\nconst y = function() { return (<p>y</p>); };";
        let range = Heuristic::ReturnStatement.locate(source).unwrap();
        assert_eq!(&source[range], "<p>y</p>");
    }

    #[test]
    fn test_section_blocks_span() {
        let source = "<main>\n<section>A</section>\n<hr />\n<section>B</section>\n</main>";
        let range = Heuristic::SectionBlocks.locate(source).unwrap();
        assert_eq!(
            &source[range],
            "<section>A</section>\n<hr />\n<section>B</section>"
        );
    }

    #[test]
    fn test_component_tags_span() {
        let source = "<Layout>\n  <Hero />\n  <Features items={list} />\n</Layout>";
        let range = Heuristic::ComponentTags.locate(source).unwrap();
        assert_eq!(&source[range], "<Hero />\n  <Features items={list} />");
    }

    #[test]
    fn test_styled_container_inner() {
        let source = r#"<div className="hero">  OLD  </div>"#;
        let range = Heuristic::StyledContainer.locate(source).unwrap();
        assert_eq!(&source[range], "  OLD  ");
    }

    #[test]
    fn test_locate_trims_and_reports_heuristic() {
        let source = "export default function Home() {\n  return (\n    <main>Hi</main>\n  );\n}";
        let region = locate(source, DocumentKind::Home).unwrap();
        assert_eq!(region.heuristic, Heuristic::ComponentReturn);
        assert_eq!(region.content(source), "<main>Hi</main>");
    }

    #[test]
    fn test_chains_are_distinct() {
        assert_eq!(DocumentKind::Home.chain().len(), 5);
        assert_eq!(DocumentKind::Page.chain().len(), 4);
        assert_eq!(DocumentKind::Home.chain()[4], Heuristic::FirstElement);
    }
}
