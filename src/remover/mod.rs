//! Safe removal of a single definition from a source buffer.
//!
//! A request goes through four steps: locate the node at the requested
//! location, check that it has the shape of the requested kind, pick a
//! removal strategy for that shape, and turn it into an [`EditList`]. The
//! remover never reads or writes files; nothing is applied when a step fails.

mod context;
mod editor;
mod lines;
mod sig;

pub use context::{AttrFlavour, Target};
pub use editor::{Edit, EditList};

use crate::error::RemoveError;
use crate::index::{DefinitionKind, Location};
use crate::parser::{
    attached_sig, call_name, descendants, enclosing_statement, is_comment, is_sig_call,
    named_children, node_text, RubyParser,
};
use lines::{blank_line_after, blank_line_before, ends_line, indentation, line_end, line_start, starts_line};
use tracing::debug;
use tree_sitter::{Node, Tree};

/// Calls that do nothing on their own inside a singleton class
const NO_OP_CALLS: [&str; 4] = ["private", "protected", "public", "module_function"];

/// Nodes whose first named children are a header (name, superclass, value)
const HEADED: [&str; 5] = ["class", "module", "singleton_class", "method", "singleton_method"];

pub struct Remover {
    parser: RubyParser,
}

impl Remover {
    pub fn new() -> Self {
        Self {
            parser: RubyParser::new(),
        }
    }

    /// Rewrite `source` without the `kind` definition at `location`
    pub fn remove(
        &mut self,
        kind: DefinitionKind,
        location: &Location,
        source: &str,
    ) -> Result<String, RemoveError> {
        let edits = self.plan(kind, location, source)?;
        Ok(edits.apply(source))
    }

    /// Compute the edits [`Remover::remove`] would apply
    pub fn plan(
        &mut self,
        kind: DefinitionKind,
        location: &Location,
        source: &str,
    ) -> Result<EditList, RemoveError> {
        let tree = self.parser.parse_tree(source).ok_or_else(|| RemoveError::NotFound {
            kind,
            location: location.clone(),
        })?;

        let node = context::locate(&tree, kind, location)?;
        let target = context::classify(node, kind, location, source)?;
        debug!("Removing {} at {} ({})", kind, location, node.kind());

        let mut planner = Planner {
            source,
            tree: &tree,
            edits: EditList::new(),
        };
        match target {
            Target::Namespace(node) => planner.remove_statement(node),
            Target::Method(node) => planner.remove_member(enclosing_statement(node)),
            Target::Accessor {
                symbol,
                call,
                flavour,
            } => planner.remove_accessor(symbol, call, flavour, kind),
            Target::ConstantAssignment(node) => planner.remove_constant_assignment(node),
            Target::ConstantTarget(node) => planner.remove_constant_target(node),
        }

        debug!("{} edit(s) planned", planner.edits.len());
        Ok(planner.edits)
    }
}

impl Default for Remover {
    fn default() -> Self {
        Self::new()
    }
}

struct Planner<'s, 't> {
    source: &'s str,
    tree: &'t Tree,
    edits: EditList,
}

impl<'s, 't> Planner<'s, 't> {
    fn text(&self, node: Node) -> &'s str {
        node_text(node, self.source)
    }

    // Whole statements

    /// Delete a statement with its attached comments and sigs, and the blank
    /// lines that would otherwise pile up where it was
    fn remove_statement(&mut self, statement: Node<'t>) {
        let source = self.source;
        let end = self.statement_end(statement);

        let on_own_lines = starts_line(source, statement.start_byte())
            && (source[..statement.end_byte()].ends_with('\n') || ends_line(source, statement.end_byte()));
        if !on_own_lines {
            return self.remove_inline(statement, end);
        }

        let first = self.leading_attachments(statement);
        let mut block_start = line_start(source, first.start_byte());
        let mut block_end = line_end_after(source, end);

        let has_previous = previous_in_body(first).is_some();
        let has_next = {
            let mut sibling = statement.next_named_sibling();
            // A trailing comment on the last line goes with the statement
            while let Some(node) = sibling.filter(|node| node.start_byte() < block_end) {
                sibling = node.next_named_sibling();
            }
            sibling.is_some()
        };

        // One blank line goes: the one above, else the one below a first or
        // last element
        if let Some(start) = blank_line_before(source, block_start) {
            block_start = start;
        } else if !has_previous || !has_next {
            block_end = blank_line_after(source, block_end).unwrap_or(block_end);
        }

        self.edits.delete(block_start, block_end);
    }

    /// Comments and sigs directly above the statement, without a gap
    fn leading_attachments(&self, statement: Node<'t>) -> Node<'t> {
        let mut first = statement;
        let mut sibling = previous_in_body(statement);

        while let Some(previous) = sibling {
            let attachable = (is_comment(previous) || is_sig_call(previous, self.source))
                && starts_line(self.source, previous.start_byte());
            if !attachable || previous.end_position().row + 1 != first.start_position().row {
                break;
            }
            first = previous;
            sibling = previous_in_body(previous);
        }
        first
    }

    /// End of the statement, past the bodies of heredocs it opens
    fn statement_end(&self, statement: Node) -> usize {
        let openings = descendants(statement)
            .filter(|node| node.kind() == "heredoc_beginning")
            .count();
        let inner_bodies = descendants(statement)
            .filter(|node| node.kind() == "heredoc_body")
            .count();
        let pending = openings.saturating_sub(inner_bodies);
        if pending == 0 {
            return statement.end_byte();
        }

        descendants(self.tree.root_node())
            .filter(|node| node.kind() == "heredoc_body" && node.start_byte() >= statement.end_byte())
            .take(pending)
            .last()
            .map_or(statement.end_byte(), |body| body.end_byte())
    }

    /// A statement sharing its line with other code: drop its bytes and one
    /// `;` separator
    fn remove_inline(&mut self, statement: Node, end: usize) {
        let source = self.source;
        let start = statement.start_byte();

        let after = &source[end..];
        let after_spaces = after.trim_start_matches([' ', '\t']);
        if let Some(rest) = after_spaces.strip_prefix(';') {
            let rest = rest.trim_start_matches([' ', '\t']);
            return self.edits.delete(start, source.len() - rest.len());
        }

        let before = source[..start].trim_end_matches([' ', '\t']);
        if before.ends_with(';') {
            return self.edits.delete(before.len() - 1, end);
        }

        self.edits.delete(start, end);
    }

    /// Remove a method or accessor statement, taking a singleton class that
    /// would be left empty along with it
    fn remove_member(&mut self, statement: Node<'t>) {
        match self.emptied_singleton_class(statement) {
            Some(singleton_class) => {
                debug!("Collapsing singleton class");
                self.remove_statement(singleton_class)
            }
            None => self.remove_statement(statement),
        }
    }

    fn emptied_singleton_class(&self, statement: Node<'t>) -> Option<Node<'t>> {
        let parent = statement.parent()?;
        let singleton_class = match parent.kind() {
            "singleton_class" => parent,
            "body_statement" => parent.parent().filter(|p| p.kind() == "singleton_class")?,
            _ => return None,
        };
        let value = singleton_class.child_by_field_name("value").map(|v| v.id());
        let sig = attached_sig(statement, self.source).map(|s| s.id());

        let remaining = named_children(parent)
            .into_iter()
            .filter(|node| node.id() != statement.id())
            .filter(|node| Some(node.id()) != value && Some(node.id()) != sig)
            .filter(|node| !self.is_no_op(*node))
            .count();
        (remaining == 0).then_some(singleton_class)
    }

    fn is_no_op(&self, node: Node) -> bool {
        is_comment(node)
            || is_sig_call(node, self.source)
            || self.is_sig_extension(node)
            || (node.kind() == "identifier" && NO_OP_CALLS.contains(&self.text(node)))
            || (call_name(node, self.source).is_some_and(|name| NO_OP_CALLS.contains(&name))
                && node.child_by_field_name("arguments").is_none())
    }

    /// `extend T::Sig`
    fn is_sig_extension(&self, node: Node) -> bool {
        call_name(node, self.source) == Some("extend")
            && node.child_by_field_name("receiver").is_none()
            && node.child_by_field_name("arguments").is_some_and(|arguments| {
                let arguments = named_children(arguments);
                arguments.len() == 1 && self.text(arguments[0]) == "T::Sig"
            })
    }

    // Lists

    /// Cut one element out of a comma-separated list of at least two
    fn splice(&mut self, element: Node<'t>, siblings: &[Node<'t>]) {
        let source = self.source;
        let index = siblings.iter().position(|s| s.id() == element.id());
        let previous = index.and_then(|i| i.checked_sub(1)).map(|i| siblings[i]);
        let next = index.and_then(|i| siblings.get(i + 1)).copied();
        let row = |node: Node| (node.start_position().row, node.end_position().row);

        let (start, end) = match (previous, next) {
            // `A, B` → `A`
            (Some(p), _) if row(p).1 == row(element).0 => (p.end_byte(), element.end_byte()),
            // `B, C` → `C`
            (_, Some(n)) if row(n).0 == row(element).1 => (element.start_byte(), n.start_byte()),
            // Element alone on its line(s)
            (Some(_), Some(_)) => (
                line_start(source, element.start_byte()),
                line_end(source, element.end_byte()),
            ),
            (Some(p), None) => (p.end_byte(), element.end_byte()),
            (None, Some(n)) => (element.start_byte(), n.start_byte()),
            (None, None) => (element.start_byte(), element.end_byte()),
        };
        self.edits.delete(start, end);
    }

    // Constants

    fn remove_constant_assignment(&mut self, assignment: Node<'t>) {
        // `A = B = 1`: keep the value of `B = 1`, drop the binding
        let is_value = assignment.parent().is_some_and(|parent| {
            matches!(parent.kind(), "assignment" | "operator_assignment")
                && parent.child_by_field_name("right").map(|r| r.id()) == Some(assignment.id())
        });
        let chained = assignment.child_by_field_name("right").is_some_and(|right| {
            right.kind() == "assignment"
                && right
                    .child_by_field_name("left")
                    .is_some_and(|left| matches!(left.kind(), "constant" | "scope_resolution"))
        });

        if is_value || chained {
            if let Some(value) = assignment.child_by_field_name("right") {
                let value = self.text(value).to_string();
                return self.edits.replace(assignment.start_byte(), assignment.end_byte(), value);
            }
        }
        self.remove_statement(enclosing_statement(assignment));
    }

    fn remove_constant_target(&mut self, target: Node<'t>) {
        // A parenthesized group or splat holding only the target goes as a whole
        let mut element = target;
        let mut list = target.parent();
        while let Some(parent) = list {
            let single = parent.kind() == "rest_assignment"
                || (parent.kind() == "destructured_left_assignment" && list_items(parent).len() == 1);
            if !single {
                break;
            }
            element = parent;
            list = parent.parent();
        }
        let Some(list) = list else {
            return;
        };

        let siblings = list_items(list);
        // `(A, B)` minus `A` is `B`
        if list.kind() == "destructured_left_assignment" && siblings.len() == 2 {
            if let Some(survivor) = siblings.iter().find(|s| s.id() != element.id()) {
                let survivor = self.text(*survivor).to_string();
                return self.edits.replace(list.start_byte(), list.end_byte(), survivor);
            }
        }
        if siblings.len() > 1 {
            return self.splice(element, &siblings);
        }

        let assignment = owning_assignment(list);
        match assignment {
            Some(assignment) => self.remove_statement(enclosing_statement(assignment)),
            None => self.splice(element, &siblings),
        }
    }

    // Accessors

    fn remove_accessor(
        &mut self,
        symbol: Node<'t>,
        call: Node<'t>,
        flavour: AttrFlavour,
        kind: DefinitionKind,
    ) {
        let statement = enclosing_statement(call);
        let survivor = match (flavour, kind) {
            (AttrFlavour::Accessor, DefinitionKind::AttrReader) => Some(AttrFlavour::Writer),
            (AttrFlavour::Accessor, _) => Some(AttrFlavour::Reader),
            _ => None,
        };
        let siblings = symbol.parent().map(list_items).unwrap_or_default();

        if siblings.len() > 1 {
            self.splice(symbol, &siblings);
            if let Some(survivor) = survivor {
                self.redeclare(statement, call, symbol, survivor);
            }
            return;
        }

        let Some(survivor) = survivor else {
            return self.remove_member(statement);
        };

        // `attr_accessor :x` becomes `attr_reader :x` in place
        if let Some(method) = call.child_by_field_name("method") {
            self.edits.replace(method.start_byte(), method.end_byte(), attr_call(survivor));
        }
        if survivor == AttrFlavour::Writer {
            if let Some(sig) = attached_sig(statement, self.source) {
                if let Some(ty) = sig::attribute_type(self.text(sig)) {
                    let translated = sig::writer_sig(symbol_name(self.text(symbol)), ty);
                    self.edits.replace(sig.start_byte(), sig.end_byte(), translated);
                }
            }
        }
    }

    /// Declare the surviving half of a split `attr_accessor` on its own line,
    /// right below the original statement
    fn redeclare(&mut self, statement: Node, call: Node, symbol: Node, survivor: AttrFlavour) {
        let source = self.source;
        let indent = indentation(source, statement.start_byte());
        // `private attr_accessor :a, :b` keeps its modifier
        let modifier = &source[statement.start_byte()..call.start_byte()];
        let symbol_text = self.text(symbol);

        let mut text = String::new();
        if let Some(sig) = attached_sig(statement, source) {
            if let Some(ty) = sig::attribute_type(self.text(sig)) {
                let translated = match survivor {
                    AttrFlavour::Writer => sig::writer_sig(symbol_name(symbol_text), ty),
                    _ => sig::reader_sig(ty),
                };
                text.push_str(&format!("{}{}\n", indent, translated));
            }
        }
        text.push_str(&format!("{}{}{} {}\n", indent, modifier, attr_call(survivor), symbol_text));

        let at = line_end(source, statement.end_byte());
        if at == source.len() && !source.ends_with('\n') {
            text = format!("\n{}", text.trim_end_matches('\n'));
        }
        self.edits.insert(at, text);
    }
}

/// Previous statement or comment of the same body.
///
/// Comments above the first statement of a class body end up outside its
/// `body_statement`, next to the class name.
fn previous_in_body(node: Node) -> Option<Node> {
    let parent = node.parent()?;
    match node.prev_named_sibling() {
        Some(previous) if parent.kind() == "body_statement" || is_comment(previous) => Some(previous),
        Some(_) if HEADED.contains(&parent.kind()) => None,
        Some(previous) => Some(previous),
        None if parent.kind() == "body_statement" => {
            parent.prev_named_sibling().filter(|previous| is_comment(*previous))
        }
        None => None,
    }
}

/// Non-comment named children of a list node
fn list_items(list: Node) -> Vec<Node> {
    named_children(list)
        .into_iter()
        .filter(|node| !is_comment(*node))
        .collect()
}

// The assignment owning a (possibly nested) target list
fn owning_assignment(list: Node) -> Option<Node> {
    let mut current = list;
    while let Some(parent) = current.parent() {
        if parent.kind() == "assignment" {
            return Some(parent);
        }
        current = parent;
    }
    None
}

/// Line end for an offset that may already sit right after a newline
fn line_end_after(source: &str, end: usize) -> usize {
    if end > 0 && source.as_bytes()[end - 1] == b'\n' {
        end
    } else {
        line_end(source, end)
    }
}

fn attr_call(flavour: AttrFlavour) -> &'static str {
    match flavour {
        AttrFlavour::Reader => "attr_reader",
        AttrFlavour::Writer => "attr_writer",
        AttrFlavour::Accessor => "attr_accessor",
    }
}

// `:name`, `:"name"`
fn symbol_name(symbol: &str) -> &str {
    symbol.trim_start_matches(':').trim_matches(|c: char| c == '"' || c == '\'')
}
