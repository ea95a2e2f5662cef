//! PHP parsing and symbol node extraction.
//!
//! Parses source text with the mago_syntax parser and walks the AST,
//! producing owned [`SourceNode`] values for every declaration that can
//! appear in a document outline: namespace definitions, class-likes and
//! their members, free functions, `const` statements, `define()` calls
//! and top-level variable assignments. Each node is paired with its
//! fully qualified name (when it has one) so the symbol builder can
//! derive container names, and class-level docblocks are scanned for
//! `@method` / `@property` virtual members.
//!
//! Parameters and closure-captured variables are classifier inputs but
//! carry no FQN, so they are not emitted into outlines; only definitions
//! with a fully qualified name reach the symbol providers.

use std::sync::Arc;

use mago_span::{HasSpan, Span};
use mago_syntax::ast::*;
use tower_lsp::lsp_types::Url;

use crate::docblock;
use crate::types::{AssignmentTarget, DocTag, NameChild, NodeShape, NodeVariant, SourceNode};

/// A `@method` / `@property` member declared only in a class docblock.
pub(crate) struct VirtualMember {
    pub tag: DocTag,
    /// Absolute `(start, end)` byte offsets of the owning docblock.
    pub doc_span: (u32, u32),
    /// FQN of the virtual member itself.
    pub fqn: String,
    /// The class-like declaration the docblock belongs to.
    pub owner: SourceNode,
}

/// Everything extracted from one file.
pub(crate) struct FileSymbols {
    /// Outline nodes, each with its FQN when one exists.
    pub nodes: Vec<(SourceNode, Option<String>)>,
    pub virtual_members: Vec<VirtualMember>,
}

impl FileSymbols {
    fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            virtual_members: Vec::new(),
        }
    }
}

struct FileContext<'a> {
    uri: Url,
    text: Arc<str>,
    trivia: &'a [Trivia<'a>],
    content: &'a str,
}

impl FileContext<'_> {
    fn make_node(
        &self,
        span: Span,
        variant: NodeVariant,
        name: Option<NameChild>,
        ancestors: Vec<NodeShape>,
    ) -> SourceNode {
        SourceNode {
            uri: self.uri.clone(),
            text: Arc::clone(&self.text),
            offset: span.start.offset,
            width: span.end.offset - span.start.offset,
            variant,
            name,
            ancestors,
        }
    }
}

/// Parse PHP source text and extract all outline nodes.
///
/// The parser is guarded with `catch_unwind`: a panic inside mago on
/// malformed input is logged and the file indexes as empty.
pub(crate) fn parse_symbols(uri: &Url, content: &str) -> FileSymbols {
    let content_owned = content.to_string();
    let uri = uri.clone();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let arena = bumpalo::Bump::new();
        let file_id = mago_database::file::FileId::new("input.php");
        let program = mago_syntax::parser::parse_file_content(&arena, file_id, &content_owned);

        let ctx = FileContext {
            uri,
            text: Arc::from(content_owned.as_str()),
            trivia: program.trivia.as_slice(),
            content: &content_owned,
        };

        let mut out = FileSymbols::empty();
        collect_statements(program.statements.iter(), &ctx, None, &mut out);
        out
    }));

    match result {
        Ok(out) => out,
        Err(_) => {
            tracing::error!("parser panicked while extracting symbols");
            FileSymbols::empty()
        }
    }
}

/// Prefix a name with the current namespace, if any.
fn qualify(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{}\\{}", ns, name),
        None => name.to_string(),
    }
}

fn collect_statements<'a>(
    statements: impl Iterator<Item = &'a Statement<'a>>,
    ctx: &FileContext<'a>,
    namespace: Option<&str>,
    out: &mut FileSymbols,
) {
    for statement in statements {
        match statement {
            Statement::Namespace(ns_stmt) => {
                let ns_name = ns_stmt
                    .name
                    .as_ref()
                    .map(|ident| ident.value().to_string())
                    .filter(|s| !s.is_empty());

                if let Some(name) = &ns_name {
                    let node = ctx.make_node(
                        ns_stmt.span(),
                        NodeVariant::NamespaceDefinition,
                        Some(NameChild::Qualified(name.clone())),
                        Vec::new(),
                    );
                    out.nodes.push((node, Some(name.clone())));
                }

                let effective_ns = ns_name.as_deref().or(namespace);
                collect_statements(ns_stmt.statements().iter(), ctx, effective_ns, out);
            }
            Statement::Class(class) => {
                collect_class_like(
                    ctx,
                    class,
                    class.span(),
                    &class.name.value.to_string(),
                    NodeVariant::ClassDeclaration,
                    class.members.iter(),
                    namespace,
                    out,
                );
            }
            Statement::Interface(iface) => {
                collect_class_like(
                    ctx,
                    iface,
                    iface.span(),
                    &iface.name.value.to_string(),
                    NodeVariant::InterfaceDeclaration,
                    iface.members.iter(),
                    namespace,
                    out,
                );
            }
            Statement::Trait(trait_def) => {
                collect_class_like(
                    ctx,
                    trait_def,
                    trait_def.span(),
                    &trait_def.name.value.to_string(),
                    NodeVariant::TraitDeclaration,
                    trait_def.members.iter(),
                    namespace,
                    out,
                );
            }
            // PHP 8.1 enums have no kind in the exposed symbol schema.
            Statement::Enum(_) => {}
            Statement::Function(func) => {
                let name = func.name.value.to_string();
                let fqn = qualify(namespace, &format!("{}()", name));
                let node = ctx.make_node(
                    func.span(),
                    NodeVariant::FunctionDeclaration,
                    Some(NameChild::Token(name)),
                    Vec::new(),
                );
                out.nodes.push((node, Some(fqn)));
            }
            Statement::Constant(const_decl) => {
                for item in const_decl.items.iter() {
                    let name = item.name.value.to_string();
                    let fqn = qualify(namespace, &name);
                    let node = ctx.make_node(
                        item.span(),
                        NodeVariant::ConstElement,
                        Some(NameChild::Token(name)),
                        Vec::new(),
                    );
                    out.nodes.push((node, Some(fqn)));
                }
            }
            Statement::Expression(expr_stmt) => {
                collect_expression(expr_stmt.expression, ctx, out);
            }
            Statement::Block(block) => {
                collect_statements(block.statements.iter(), ctx, namespace, out);
            }
            // `if (!defined('X')) { define('X', …); }` is a common guard
            // pattern, so `if` bodies are walked too.
            Statement::If(if_stmt) => {
                collect_if_body(&if_stmt.body, ctx, namespace, out);
            }
            _ => {}
        }
    }
}

/// Shared extraction for `class`, `interface` and `trait` declarations,
/// which all expose the same `ClassLikeMember` member list.
#[allow(clippy::too_many_arguments)]
fn collect_class_like<'a>(
    ctx: &FileContext<'a>,
    declaration: &impl HasSpan,
    span: Span,
    name: &str,
    variant: NodeVariant,
    members: impl Iterator<Item = &'a ClassLikeMember<'a>>,
    namespace: Option<&str>,
    out: &mut FileSymbols,
) {
    let class_fqn = qualify(namespace, name);
    let class_node = ctx.make_node(
        span,
        variant,
        Some(NameChild::Token(name.to_string())),
        Vec::new(),
    );

    // Virtual members from the class-level docblock, located at the
    // docblock itself since they have no code declaration.
    if let Some((doc_text, doc_span)) =
        docblock::docblock_for_node(ctx.trivia, ctx.content, declaration)
    {
        for tag in docblock::extract_virtual_member_tags(doc_text) {
            let fqn = match &tag {
                DocTag::Method { name } => format!("{}::{}()", class_fqn, name),
                DocTag::Property { name } => format!("{}::${}", class_fqn, name),
            };
            out.virtual_members.push(VirtualMember {
                tag,
                doc_span,
                fqn,
                owner: class_node.clone(),
            });
        }
    }

    out.nodes.push((class_node, Some(class_fqn.clone())));

    for member in members {
        match member {
            ClassLikeMember::Method(method) => {
                let method_name = method.name.value.to_string();
                let fqn = format!("{}::{}()", class_fqn, method_name);
                let node = ctx.make_node(
                    method.span(),
                    NodeVariant::MethodDeclaration,
                    Some(NameChild::Token(method_name)),
                    vec![NodeShape::ClassDeclaration],
                );
                out.nodes.push((node, Some(fqn)));
            }
            ClassLikeMember::Property(property) => {
                for var in property.variables() {
                    let var_name = var.name.to_string();
                    let fqn = format!("{}::{}", class_fqn, var_name);
                    let node = ctx.make_node(
                        var.span(),
                        NodeVariant::Variable,
                        Some(NameChild::Token(var_name)),
                        vec![NodeShape::PropertyDeclaration, NodeShape::ClassDeclaration],
                    );
                    out.nodes.push((node, Some(fqn)));
                }
            }
            ClassLikeMember::Constant(constant) => {
                for item in constant.items.iter() {
                    let const_name = item.name.value.to_string();
                    let fqn = format!("{}::{}", class_fqn, const_name);
                    let node = ctx.make_node(
                        item.span(),
                        NodeVariant::ConstElement,
                        Some(NameChild::Token(const_name)),
                        vec![NodeShape::ClassDeclaration],
                    );
                    out.nodes.push((node, Some(fqn)));
                }
            }
            _ => {}
        }
    }
}

/// Extract outline nodes from a statement-level expression: `define()`
/// constant definitions and direct variable assignments.
fn collect_expression<'a>(expr: &'a Expression<'a>, ctx: &FileContext<'a>, out: &mut FileSymbols) {
    match expr {
        Expression::Call(Call::Function(func_call)) => {
            let callee = match func_call.function {
                Expression::Identifier(ident) => ident.value().to_string(),
                _ => return,
            };
            let first_string_argument = first_string_argument(func_call);

            // Only `define('NAME', …)` calls name a constant; anything
            // else would be outline noise.
            if !callee.eq_ignore_ascii_case("define") {
                return;
            }
            let Some(name) = first_string_argument.clone() else {
                return;
            };

            let node = ctx.make_node(
                expr.span(),
                NodeVariant::CallExpression {
                    callee,
                    first_string_argument,
                },
                None,
                Vec::new(),
            );
            // define() constants always land in the global namespace
            // (or carry their namespace inside the literal itself).
            out.nodes.push((node, Some(name)));
        }
        Expression::Assignment(assignment) => {
            let target = match assignment.lhs {
                Expression::Variable(Variable::Direct(dv)) => {
                    let raw = dv.name.to_string();
                    AssignmentTarget::Variable(raw.trim_start_matches('$').to_string())
                }
                _ => AssignmentTarget::Other,
            };
            if matches!(target, AssignmentTarget::Other) {
                return;
            }
            let node = ctx.make_node(
                assignment.span(),
                NodeVariant::AssignmentExpression { target },
                None,
                Vec::new(),
            );
            out.nodes.push((node, None));
        }
        _ => {}
    }
}

/// The first argument of a call, when it is a non-empty string literal.
fn first_string_argument(func_call: &FunctionCall<'_>) -> Option<String> {
    let first = func_call.argument_list.arguments.iter().next()?;
    let first_expr = match first {
        Argument::Positional(pos) => pos.value,
        Argument::Named(named) => named.value,
    };
    if let Expression::Literal(Literal::String(lit_str)) = first_expr
        && let Some(value) = lit_str.value
        && !value.is_empty()
    {
        return Some(value.to_string());
    }
    None
}

/// Recurse into an `if` statement body, covering both brace-delimited
/// and colon-delimited forms including `elseif` / `else` branches.
fn collect_if_body<'a>(
    body: &'a IfBody<'a>,
    ctx: &FileContext<'a>,
    namespace: Option<&str>,
    out: &mut FileSymbols,
) {
    match body {
        IfBody::Statement(body) => {
            collect_statements(std::iter::once(body.statement), ctx, namespace, out);
            for else_if in body.else_if_clauses.iter() {
                collect_statements(std::iter::once(else_if.statement), ctx, namespace, out);
            }
            if let Some(else_clause) = &body.else_clause {
                collect_statements(std::iter::once(else_clause.statement), ctx, namespace, out);
            }
        }
        IfBody::ColonDelimited(body) => {
            collect_statements(body.statements.iter(), ctx, namespace, out);
            for else_if in body.else_if_clauses.iter() {
                collect_statements(else_if.statements.iter(), ctx, namespace, out);
            }
            if let Some(else_clause) = &body.else_clause {
                collect_statements(else_clause.statements.iter(), ctx, namespace, out);
            }
        }
    }
}
