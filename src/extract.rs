//! Content Extractor: raw markup → flat visible text.
//!
//! `parse_html` is the boundary to the markup parser (html5ever into an
//! `RcDom`); `extract_text` walks the tree and joins block-level chunks with a
//! separator. Invisible subtrees (`head`, `script`, `style`, ...) contribute
//! nothing, and empty blocks are dropped so separators never pile up.
//!
//! `clean_fragment` covers the other common input: plain text that still
//! carries stray markup and entities (review dumps with `<br />`).

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Elements whose content is never visible text.
const SKIPPED: &[&str] = &["head", "script", "style", "noscript", "template", "iframe", "svg"];

/// Elements that open and close a block of text.
const BLOCK: &[&str] = &[
    "html", "body", "p", "div", "br", "hr", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol",
    "dl", "dt", "dd", "table", "thead", "tbody", "tfoot", "tr", "td", "th", "caption", "section",
    "article", "header", "footer", "nav", "aside", "main", "blockquote", "pre", "figure",
    "figcaption", "form", "fieldset", "legend", "address", "details", "summary",
];

fn default_separator() -> String {
    "\n".to_string()
}

fn default_trim() -> bool {
    true
}

/// How blocks are joined. Defaults: newline separator, trimmed blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_trim")]
    pub trim: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            trim: default_trim(),
        }
    }
}

/// Parsed markup tree, owned by the parser collaborator and opaque here.
pub struct ParsedDocument {
    dom: RcDom,
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument").finish_non_exhaustive()
    }
}

/// Parse an HTML document. html5ever recovers from malformed markup, so this never fails.
pub fn parse_html(raw: &str) -> ParsedDocument {
    let dom = parse_document(RcDom::default(), Default::default()).one(raw);
    ParsedDocument { dom }
}

/// Visible text of a parsed document, blocks joined by `opts.separator`.
pub fn extract_text(doc: &ParsedDocument, opts: &ExtractOptions) -> String {
    let mut blocks = BlockCollector::new(opts);
    blocks.walk(&doc.dom.document);
    blocks.finish()
}

/// `parse_html` + `extract_text`.
pub fn html_to_text(raw: &str, opts: &ExtractOptions) -> String {
    extract_text(&parse_html(raw), opts)
}

/// Plain text with stray markup: block-ish tags become block boundaries,
/// other tags vanish, entities are decoded.
pub fn clean_fragment(text: &str, opts: &ExtractOptions) -> String {
    static RE_BLOCK: OnceCell<Regex> = OnceCell::new();
    static RE_TAG: OnceCell<Regex> = OnceCell::new();
    let re_block = RE_BLOCK.get_or_init(|| {
        Regex::new(r"(?i)<\s*/?\s*(?:br|p|div|li|h[1-6]|tr|hr|ul|ol|table|blockquote|pre)\b[^>]*>")
            .unwrap()
    });
    let re_tag =
        RE_TAG.get_or_init(|| Regex::new(r"(?is)<!--.*?-->|</?[a-z][a-z0-9]*\b[^>]*>").unwrap());

    let mut blocks = BlockCollector::new(opts);
    for segment in re_block.split(text) {
        let stripped = re_tag.replace_all(segment, "");
        blocks.push_block(&html_escape::decode_html_entities(&stripped));
    }
    blocks.finish()
}

enum Visit {
    Enter(Handle),
    LeaveBlock,
}

/// Children in reverse so they pop in document order.
fn push_children(stack: &mut Vec<Visit>, node: &Handle) {
    stack.extend(
        node.children
            .borrow()
            .iter()
            .rev()
            .map(|c| Visit::Enter(c.clone())),
    );
}

struct BlockCollector<'a> {
    opts: &'a ExtractOptions,
    blocks: Vec<String>,
    current: String,
}

impl<'a> BlockCollector<'a> {
    fn new(opts: &'a ExtractOptions) -> Self {
        Self {
            opts,
            blocks: Vec::new(),
            current: String::new(),
        }
    }

    /// Depth-first, document order, with an explicit stack: nesting depth is
    /// bounded only by memory, not by the thread stack.
    fn walk(&mut self, root: &Handle) {
        let mut stack = vec![Visit::Enter(root.clone())];
        while let Some(visit) = stack.pop() {
            let node = match visit {
                Visit::Enter(node) => node,
                Visit::LeaveBlock => {
                    self.flush();
                    continue;
                }
            };
            match &node.data {
                NodeData::Document => push_children(&mut stack, &node),
                NodeData::Text { contents } => self.current.push_str(&contents.borrow()),
                NodeData::Element { name, .. } => {
                    let tag: &str = &name.local;
                    if SKIPPED.contains(&tag) {
                        continue;
                    }
                    if BLOCK.contains(&tag) {
                        self.flush();
                        stack.push(Visit::LeaveBlock);
                    }
                    push_children(&mut stack, &node);
                }
                NodeData::Doctype { .. }
                | NodeData::Comment { .. }
                | NodeData::ProcessingInstruction { .. } => {}
            }
        }
    }

    fn flush(&mut self) {
        let block = std::mem::take(&mut self.current);
        self.push_block(&block);
    }

    /// Whitespace-only blocks are dropped whether or not trimming is on.
    fn push_block(&mut self, block: &str) {
        if block.trim().is_empty() {
            return;
        }
        let kept = if self.opts.trim { block.trim() } else { block };
        self.blocks.push(kept.to_string());
    }

    fn finish(mut self) -> String {
        self.flush();
        self.blocks.join(&self.opts.separator)
    }
}
