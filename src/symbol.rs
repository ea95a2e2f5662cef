//! Symbol classification and `SymbolInformation` building.
//!
//! The classifier decides what a syntax node *is* (class, method,
//! variable, constant, …) and how its display name is derived. The rules
//! are evaluated as an ordered, first-match-wins table; the order is
//! semantically significant and part of the contract, so it lives in a
//! public constant that tests can assert against.

use tower_lsp::lsp_types::{Range, SymbolInformation, SymbolKind};

use crate::location::LocationBuilder;
use crate::types::{AssignmentTarget, DocTag, NameChild, NodeShape, NodeVariant, SourceNode};

/// One classification rule. Rules are disjoint predicates over a node's
/// variant (plus its ancestor chain for [`PropertyVariable`]); what makes
/// the table ordered is that the first matching rule wins and later rules
/// are never consulted.
///
/// [`PropertyVariable`]: ClassificationRule::PropertyVariable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    /// `class Foo { … }`
    ClassDeclaration,
    /// `trait Foo { … }`; traits share `SymbolKind::CLASS` since the
    /// protocol has no trait kind.
    TraitDeclaration,
    /// `define('NAME', value)` — a call whose first argument is a
    /// non-empty string literal naming the constant.
    ConstDefineCall,
    /// `interface Foo { … }`
    InterfaceDeclaration,
    /// `namespace Foo\Bar;`
    NamespaceDefinition,
    /// A free `function foo() { … }` declaration.
    FunctionDeclaration,
    /// A method; `__construct` and `__destruct` classify as Constructor.
    MethodDeclaration,
    /// A `$variable` whose nearest enclosing declaration is a property
    /// declaration.
    PropertyVariable,
    /// One element of a `const` declaration.
    ConstElement,
    /// An assignment to a direct variable, a closure-captured variable,
    /// or a parameter.
    VariableLike,
}

/// The classification order. First match wins; the order itself is part
/// of the contract and must not be rearranged.
pub const CLASSIFICATION_ORDER: [ClassificationRule; 10] = [
    ClassificationRule::ClassDeclaration,
    ClassificationRule::TraitDeclaration,
    ClassificationRule::ConstDefineCall,
    ClassificationRule::InterfaceDeclaration,
    ClassificationRule::NamespaceDefinition,
    ClassificationRule::FunctionDeclaration,
    ClassificationRule::MethodDeclaration,
    ClassificationRule::PropertyVariable,
    ClassificationRule::ConstElement,
    ClassificationRule::VariableLike,
];

impl ClassificationRule {
    fn matches(&self, node: &SourceNode) -> bool {
        match self {
            Self::ClassDeclaration => node.variant == NodeVariant::ClassDeclaration,
            Self::TraitDeclaration => node.variant == NodeVariant::TraitDeclaration,
            Self::ConstDefineCall => is_const_define_call(node),
            Self::InterfaceDeclaration => node.variant == NodeVariant::InterfaceDeclaration,
            Self::NamespaceDefinition => node.variant == NodeVariant::NamespaceDefinition,
            Self::FunctionDeclaration => node.variant == NodeVariant::FunctionDeclaration,
            Self::MethodDeclaration => node.variant == NodeVariant::MethodDeclaration,
            Self::PropertyVariable => {
                node.variant == NodeVariant::Variable
                    && node.has_ancestor(NodeShape::PropertyDeclaration)
            }
            Self::ConstElement => node.variant == NodeVariant::ConstElement,
            Self::VariableLike => match &node.variant {
                NodeVariant::AssignmentExpression { target } => {
                    matches!(target, AssignmentTarget::Variable(_))
                }
                NodeVariant::ClosureUseVariable | NodeVariant::Parameter => true,
                _ => false,
            },
        }
    }

    fn kind(&self, node: &SourceNode) -> SymbolKind {
        match self {
            Self::ClassDeclaration | Self::TraitDeclaration => SymbolKind::CLASS,
            Self::ConstDefineCall | Self::ConstElement => SymbolKind::CONSTANT,
            Self::InterfaceDeclaration => SymbolKind::INTERFACE,
            Self::NamespaceDefinition => SymbolKind::NAMESPACE,
            Self::FunctionDeclaration => SymbolKind::FUNCTION,
            Self::MethodDeclaration => {
                let name = match &node.name {
                    Some(NameChild::Token(text)) => text.as_str(),
                    Some(NameChild::Qualified(text)) => text.as_str(),
                    None => "",
                };
                if name == "__construct" || name == "__destruct" {
                    SymbolKind::CONSTRUCTOR
                } else {
                    SymbolKind::METHOD
                }
            }
            Self::PropertyVariable => SymbolKind::PROPERTY,
            Self::VariableLike => SymbolKind::VARIABLE,
        }
    }
}

/// Whether a node is a `define('NAME', value)`-style constant definition:
/// a call to `define` (case-insensitive, as PHP resolves function names)
/// whose first argument is a non-empty string literal.
fn is_const_define_call(node: &SourceNode) -> bool {
    match &node.variant {
        NodeVariant::CallExpression {
            callee,
            first_string_argument,
        } => callee.eq_ignore_ascii_case("define") && first_string_argument.is_some(),
        _ => false,
    }
}

/// Classify a node into a symbol kind and display name.
///
/// Returns `None` for unclassifiable nodes, a defined non-error outcome
/// that callers silently skip. Also returns `None` when a kind matched
/// but no name is derivable, so a kind never survives downstream with an
/// undeterminable name.
pub fn classify(node: &SourceNode) -> Option<(SymbolKind, String)> {
    let rule = CLASSIFICATION_ORDER
        .iter()
        .find(|rule| rule.matches(node))?;
    let name = extract_name(node)?;
    Some((rule.kind(node), name))
}

/// Derive the display name for an already-matched node.
fn extract_name(node: &SourceNode) -> Option<String> {
    match &node.variant {
        NodeVariant::AssignmentExpression { target } => match target {
            AssignmentTarget::Variable(name) => Some(name.clone()),
            AssignmentTarget::Token(text) => {
                Some(text.trim_start_matches('$').to_string()).filter(|n| !n.is_empty())
            }
            AssignmentTarget::Other => None,
        },
        NodeVariant::CallExpression {
            first_string_argument,
            ..
        } => first_string_argument.clone(),
        _ => match &node.name {
            Some(NameChild::Qualified(fqn)) => Some(fqn.clone()),
            Some(NameChild::Token(text)) => {
                Some(text.trim_start_matches('$').to_string()).filter(|n| !n.is_empty())
            }
            None => None,
        },
    }
}

/// Derive the enclosing-scope name from a fully qualified name.
///
/// The FQN is split on any of the scope separators (`::` for static
/// member access, `->` for instance member access, `\` for namespaces),
/// the last segment is dropped, and the rest is rejoined with the
/// namespace separator. A single-segment FQN yields the empty string:
/// global scope, not an error.
pub fn container_name(fqn: &str) -> String {
    let normalized = fqn.replace("::", "\\").replace("->", "\\");
    match normalized.rsplit_once('\\') {
        Some((container, _)) => container.to_string(),
        None => String::new(),
    }
}

/// Builds [`SymbolInformation`] descriptors for the nodes of one file.
#[derive(Debug, Clone)]
pub struct SymbolBuilder {
    locations: LocationBuilder,
}

impl SymbolBuilder {
    pub fn new(text: &str) -> Self {
        Self {
            locations: LocationBuilder::new(text),
        }
    }

    pub fn locations(&self) -> &LocationBuilder {
        &self.locations
    }

    /// Convert a node into a symbol descriptor.
    ///
    /// Returns `None` when the node is unclassifiable. When an enclosing
    /// FQN is supplied, the container name is derived from it.
    #[allow(deprecated)] // SymbolInformation::deprecated must be populated
    pub fn build(
        &self,
        node: &SourceNode,
        enclosing_fqn: Option<&str>,
    ) -> Option<SymbolInformation> {
        let (kind, name) = classify(node)?;
        Some(SymbolInformation {
            name,
            kind,
            tags: None,
            deprecated: None,
            location: self.locations.from_node(node),
            container_name: enclosing_fqn.map(container_name),
        })
    }

    /// Build a symbol for a member declared only inside a PHPDoc comment.
    ///
    /// `@method` tags become methods, everything else becomes a property.
    /// The location is the given range inside the owning declaration's
    /// file, and the container name is always set.
    #[allow(deprecated)]
    pub fn from_doc_tag(
        &self,
        tag: &DocTag,
        range: Range,
        enclosing_fqn: &str,
        owner: &SourceNode,
    ) -> SymbolInformation {
        let kind = match tag {
            DocTag::Method { .. } => SymbolKind::METHOD,
            DocTag::Property { .. } => SymbolKind::PROPERTY,
        };
        SymbolInformation {
            name: tag.name().to_string(),
            kind,
            tags: None,
            deprecated: None,
            location: LocationBuilder::from_range(owner.uri.clone(), range),
            container_name: Some(container_name(enclosing_fqn)),
        }
    }
}
