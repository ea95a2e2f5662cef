//! Data types used throughout the phpoutline server.
//!
//! This module contains the owned "model" types that represent syntax
//! nodes relevant to symbol extraction. All data is owned so we don't
//! depend on the parser's arena lifetime: the extraction pass in
//! [`crate::parser`] copies everything the classifier and the builders
//! need out of the mago AST, including the ancestor chain of each node.

use std::sync::Arc;

use tower_lsp::lsp_types::Url;

/// The declared shape of an enclosing declaration.
///
/// Ancestor relationships are recorded at extraction time rather than
/// discovered by a hidden tree walk, so a [`SourceNode`] can answer
/// "is my nearest enclosing declaration a property declaration?" without
/// holding a reference back into the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    PropertyDeclaration,
    ClassDeclaration,
    FunctionDeclaration,
}

/// The name child of a node, when it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameChild {
    /// A qualified name already resolved against the node's lexical
    /// context (e.g. a namespace definition's full `Foo\Bar` name).
    Qualified(String),
    /// A raw name token as written in source. May carry a leading `$`
    /// sigil for variable-like names.
    Token(String),
}

/// The left operand of an assignment expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentTarget {
    /// A direct variable: `$x = …`. The name is stored without `$`.
    Variable(String),
    /// A raw token rather than a variable node. The text may still
    /// carry a leading `$` sigil.
    Token(String),
    /// Anything else (property access, array access, list destructuring).
    Other,
}

/// Tagged discriminant for the node variants the classifier knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeVariant {
    ClassDeclaration,
    TraitDeclaration,
    InterfaceDeclaration,
    NamespaceDefinition,
    FunctionDeclaration,
    MethodDeclaration,
    /// A function call expression. `first_string_argument` is set when
    /// the first argument is a non-empty string literal, which is what
    /// the `define('NAME', value)` constant idiom requires.
    CallExpression {
        callee: String,
        first_string_argument: Option<String>,
    },
    /// A `$variable` occurrence.
    Variable,
    /// One `NAME = value` element of a `const` declaration.
    ConstElement,
    /// An assignment expression; only the left operand matters here.
    AssignmentExpression { target: AssignmentTarget },
    /// A variable captured by a closure `use (…)` clause.
    ClosureUseVariable,
    /// A function or method parameter.
    Parameter,
}

/// An owned, read-only view of one syntax node.
///
/// Carries everything symbol building needs: the owning file's full text
/// and URI, the node's absolute byte offset and width, its tagged
/// variant, its name child (if any) and the shapes of its enclosing
/// declarations, nearest first.
#[derive(Debug, Clone)]
pub struct SourceNode {
    /// URI of the owning file.
    pub uri: Url,
    /// Full text of the owning file, shared between all nodes of the file.
    pub text: Arc<str>,
    /// Absolute byte offset of the node's start within `text`.
    pub offset: u32,
    /// Width of the node in bytes.
    pub width: u32,
    pub variant: NodeVariant,
    pub name: Option<NameChild>,
    /// Shapes of the enclosing declarations, nearest first.
    pub ancestors: Vec<NodeShape>,
}

impl SourceNode {
    /// Whether any enclosing declaration has the given shape.
    ///
    /// Mirrors a "first ancestor of shape X" lookup: because `ancestors`
    /// is ordered nearest-first, the first hit is the nearest one.
    pub fn has_ancestor(&self, shape: NodeShape) -> bool {
        self.ancestors.contains(&shape)
    }
}

/// A member declared only inside a PHPDoc comment (`@method` /
/// `@property`), with no corresponding code declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTag {
    /// `@method ReturnType name(…)`
    Method { name: String },
    /// `@property Type $name` (also `-read` / `-write` forms)
    Property { name: String },
}

impl DocTag {
    pub fn name(&self) -> &str {
        match self {
            DocTag::Method { name } | DocTag::Property { name } => name,
        }
    }
}
