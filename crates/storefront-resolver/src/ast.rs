//! Minimal module syntax tree for import rewriting.
//!
//! A module is parsed with tree-sitter and split into opaque text and the
//! string literals of its import sites. Only the literals are ever edited,
//! so printing the tree back reproduces every byte of the original outside
//! the rewritten specifiers.
//!
//! Recognised import sites:
//!
//! ```text
//! import Foo, {bar} from '...'      export {baz} from '...'
//! import '...'                      export * from '...'
//! import('...')                     require('...')
//! import foo = require('...')
//! ```
//!
//! Comments, template literals and ordinary strings are never import sites,
//! whatever they contain.

use std::fmt;

use storefront_fs::NormalizedPath;
use tree_sitter::{Language, Node, Parser};

use crate::error::{Error, Result};

/// Grammar a module is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// JavaScript, including JSX.
    JavaScript,
    TypeScript,
    Tsx,
}

impl Syntax {
    /// Pick the grammar from the file extension. Unknown extensions parse
    /// as JavaScript.
    pub fn for_path(path: &NormalizedPath) -> Self {
        match path.extension() {
            Some("ts" | "mts" | "cts") => Self::TypeScript,
            Some("tsx") => Self::Tsx,
            _ => Self::JavaScript,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
        })
    }
}

/// Stable identity of an import site within one parsed module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Syntactic form of an import site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x from '...'` or `export x from '...'`
    Static,
    /// `import '...'`
    SideEffect,
    /// `import('...')`
    Dynamic,
    /// `require('...')` or `import x = require('...')`
    Require,
}

/// The string literal of one import site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportNode {
    pub id: NodeId,
    pub kind: ImportKind,
    specifier: String,
    /// Literal body as printed, escapes included.
    raw: String,
    quote: char,
    resolved: bool,
}

impl ImportNode {
    /// Module specifier without quotes or escapes.
    pub fn specifier(&self) -> &str {
        &self.specifier
    }

    /// Replace the specifier. It is escaped for the node's quote on print.
    pub fn set_specifier(&mut self, specifier: impl Into<String>) {
        self.specifier = specifier.into();
        self.raw = escape(&self.specifier, self.quote);
    }

    /// The quote character the literal was written with.
    pub fn quote(&self) -> char {
        self.quote
    }

    /// Whether a transform already rewrote this site.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub(crate) fn mark_resolved(&mut self) {
        self.resolved = true;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Import(ImportNode),
}

/// A module split into text and import literals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleAst {
    segments: Vec<Segment>,
    has_errors: bool,
}

struct Site<'t> {
    kind: ImportKind,
    literal: Node<'t>,
}

impl ModuleAst {
    /// Parse `source` and split it into text and import literals.
    pub fn parse(source: &str, syntax: Syntax) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&syntax.language())
            .map_err(|source| Error::Grammar { syntax, source })?;
        let tree = parser
            .parse(source, None)
            .ok_or(Error::Parse { syntax })?;
        let root = tree.root_node();

        let mut sites = collect_sites(root, source);
        sites.sort_by_key(|site| site.literal.start_byte());
        sites.dedup_by_key(|site| site.literal.start_byte());

        let mut segments = Vec::new();
        let mut cursor = 0;
        for (index, site) in sites.into_iter().enumerate() {
            let (start, end) = (site.literal.start_byte(), site.literal.end_byte());
            let text = &source[start..end];
            let Some(quote) = text.chars().next() else {
                continue;
            };
            // Body sits between the opening and closing quote.
            let raw = &text[quote.len_utf8()..text.len() - quote.len_utf8()];
            segments.push(Segment::Text(source[cursor..start].to_string()));
            segments.push(Segment::Import(ImportNode {
                id: NodeId(index),
                kind: site.kind,
                specifier: unescape(raw),
                raw: raw.to_string(),
                quote,
                resolved: false,
            }));
            cursor = end;
        }
        segments.push(Segment::Text(source[cursor..].to_string()));

        Ok(Self {
            segments,
            has_errors: root.has_error(),
        })
    }

    /// Whether the parser had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Import sites in source order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportNode> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Import(node) => Some(node),
            Segment::Text(_) => None,
        })
    }

    /// Mutable import sites in source order.
    pub fn imports_mut(&mut self) -> impl Iterator<Item = &mut ImportNode> {
        self.segments.iter_mut().filter_map(|segment| match segment {
            Segment::Import(node) => Some(node),
            Segment::Text(_) => None,
        })
    }

    /// Render the module back to source text.
    pub fn print(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Import(node) => {
                    out.push(node.quote);
                    out.push_str(&node.raw);
                    out.push(node.quote);
                }
            }
        }
        out
    }
}

fn collect_sites<'t>(root: Node<'t>, source: &str) -> Vec<Site<'t>> {
    let mut sites = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "import_statement" => {
                if let Some(literal) = string_field(node, "source") {
                    let has_clause = named_child_of_kind(node, "import_clause").is_some();
                    let kind = if has_clause {
                        ImportKind::Static
                    } else {
                        ImportKind::SideEffect
                    };
                    sites.push(Site { kind, literal });
                }
            }
            "export_statement" => {
                if let Some(literal) = string_field(node, "source") {
                    sites.push(Site {
                        kind: ImportKind::Static,
                        literal,
                    });
                }
            }
            "import_require_clause" => {
                let literal =
                    string_field(node, "source").or_else(|| named_child_of_kind(node, "string"));
                if let Some(literal) = literal {
                    sites.push(Site {
                        kind: ImportKind::Require,
                        literal,
                    });
                }
            }
            "call_expression" => {
                if let Some(site) = call_site(node, source) {
                    sites.push(site);
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            stack.push(child);
        }
    }
    sites
}

/// `import('...')` or `require('...')` with a single plain string argument.
fn call_site<'t>(node: Node<'t>, source: &str) -> Option<Site<'t>> {
    let function = node.child_by_field_name("function")?;
    let kind = match function.kind() {
        "import" => ImportKind::Dynamic,
        "identifier" if function.utf8_text(source.as_bytes()).ok()? == "require" => {
            ImportKind::Require
        }
        _ => return None,
    };
    let arguments = node.child_by_field_name("arguments")?;
    if arguments.named_child_count() != 1 {
        return None;
    }
    let literal = arguments.named_child(0)?;
    (literal.kind() == "string").then_some(Site { kind, literal })
}

fn string_field<'t>(node: Node<'t>, field: &str) -> Option<Node<'t>> {
    node.child_by_field_name(field)
        .filter(|literal| literal.kind() == "string")
}

fn named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == kind);
    found
}

/// Undo `\\`, `\'` and `\"`. Other escapes are kept as written.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('\\' | '\'' | '"')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn escape(specifier: &str, quote: char) -> String {
    let mut out = String::with_capacity(specifier.len());
    for c in specifier.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
