use std::sync::Arc;

use phpoutline_lsp::{NameChild, NodeShape, NodeVariant, SourceNode};
use tower_lsp::lsp_types::Url;

pub const SAMPLE_TEXT: &str = "<?php\n$x = 1;\n";

/// Build a node over the sample text with a small in-bounds span.
pub fn node(
    variant: NodeVariant,
    name: Option<NameChild>,
    ancestors: Vec<NodeShape>,
) -> SourceNode {
    SourceNode {
        uri: Url::parse("file:///test.php").unwrap(),
        text: Arc::from(SAMPLE_TEXT),
        offset: 6,
        width: 2,
        variant,
        name,
        ancestors,
    }
}
