use tree_sitter::Node;

/// Extract text from a node
pub fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Named children of a node, in source order
pub fn named_children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

pub fn is_comment(node: Node) -> bool {
    node.kind() == "comment"
}

/// Name of the method invoked by a `call` node, if it is one
pub fn call_name<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    if node.kind() != "call" {
        return None;
    }
    node.child_by_field_name("method")
        .map(|method| node_text(method, source))
}

/// `sig { ... }` / `sig do ... end` without a receiver
pub fn is_sig_call(node: Node, source: &str) -> bool {
    call_name(node, source) == Some("sig")
        && node.child_by_field_name("receiver").is_none()
        && node.child_by_field_name("block").is_some()
}

/// Climb from a definition node to the statement that owns it.
///
/// `private def foo` and `private attr_reader :foo` wrap the definition in the
/// only argument of a modifier call; the modifier call is the statement then.
pub fn enclosing_statement(node: Node) -> Node {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if parent.kind() != "argument_list" || parent.named_child_count() != 1 {
            break;
        }
        match parent.parent() {
            Some(call) if call.kind() == "call" && call.child_by_field_name("block").is_none() => {
                current = call;
            }
            _ => break,
        }
    }
    current
}

/// Previous named sibling that is not a comment
pub fn previous_statement(node: Node) -> Option<Node> {
    let mut sibling = node.prev_named_sibling();
    while let Some(candidate) = sibling {
        if !is_comment(candidate) {
            return Some(candidate);
        }
        sibling = candidate.prev_named_sibling();
    }
    None
}

/// The `sig` call directly preceding a statement, comments in between allowed
pub fn attached_sig<'a>(statement: Node<'a>, source: &str) -> Option<Node<'a>> {
    previous_statement(statement).filter(|prev| is_sig_call(*prev, source))
}

/// Iterator over all descendant nodes, pre-order, the node itself included
pub fn descendants(node: Node) -> impl Iterator<Item = Node> {
    DescendantIterator::new(node)
}

struct DescendantIterator<'a> {
    cursor: tree_sitter::TreeCursor<'a>,
    done: bool,
}

impl<'a> DescendantIterator<'a> {
    fn new(node: Node<'a>) -> Self {
        Self {
            cursor: node.walk(),
            done: false,
        }
    }
}

impl<'a> Iterator for DescendantIterator<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let node = self.cursor.node();

        if self.cursor.goto_first_child() {
            return Some(node);
        }

        loop {
            if self.cursor.goto_next_sibling() {
                return Some(node);
            }

            if !self.cursor.goto_parent() {
                self.done = true;
                return Some(node);
            }
        }
    }
}
