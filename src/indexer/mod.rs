//! Syntax-tree visitor that fills an [`Index`] shard for one file.

mod call;
mod nesting;

pub use call::{Call, CallArg};
pub use nesting::{NamespaceKind, Nesting};

use crate::error::ParseError;
use crate::index::{Definition, DefinitionId, DefinitionKind, Index, Location, Reference};
use crate::parser::{attached_sig, enclosing_statement, named_children, node_text, RubyParser};
use crate::plugins::{DefineEvent, PluginSet, SendEvent};
use std::path::Path;
use tree_sitter::Node;

const ATTR_CALLS: [&str; 3] = ["attr_reader", "attr_writer", "attr_accessor"];

/// Parse one file and index it into a fresh shard
pub fn index_source(
    parser: &mut RubyParser,
    plugins: &PluginSet,
    path: &Path,
    source: &str,
) -> Result<Index, ParseError> {
    let tree = parser.parse(path, source)?;

    let mut indexer = Indexer::new(path, source, plugins);
    let mut nesting = Nesting::new();
    indexer.visit(tree.root_node(), &mut nesting);

    Ok(indexer.into_index())
}

/// Extra facts about a definition that plugins may look at
#[derive(Default)]
struct Details<'s> {
    superclass: Option<&'s str>,
    sig: Option<&'s str>,
    value: Option<&'s str>,
    has_body: bool,
    namespace: bool,
}

/// Per-file visitor
pub struct Indexer<'a> {
    path: &'a Path,
    source: &'a str,
    plugins: &'a PluginSet,
    index: Index,
}

impl<'a> Indexer<'a> {
    pub fn new(path: &'a Path, source: &'a str, plugins: &'a PluginSet) -> Self {
        Self {
            path,
            source,
            plugins,
            index: Index::new(),
        }
    }

    pub fn into_index(self) -> Index {
        self.index
    }

    fn text(&self, node: Node) -> &'a str {
        node_text(node, self.source)
    }

    fn location(&self, node: Node) -> Location {
        Location::from_node(self.path, node)
    }

    fn reference_method(&mut self, name: &str, node: Node) {
        let location = self.location(node);
        self.index.reference(Reference::method(name, location));
    }

    fn reference_constant(&mut self, name: &str, node: Node) {
        let location = self.location(node);
        self.index.reference(Reference::constant(name, location));
    }

    pub fn visit(&mut self, node: Node, nesting: &mut Nesting) {
        match node.kind() {
            "class" => self.visit_class(node, nesting),
            "module" => self.visit_module(node, nesting),
            "singleton_class" => self.visit_singleton_class(node, nesting),
            "method" => self.visit_method(node, nesting),
            "singleton_method" => self.visit_singleton_method(node, nesting),
            "call" => self.visit_call(node, nesting),
            "identifier" => self.visit_identifier(node, nesting),
            "constant" => self.reference_constant(self.text(node), node),
            "scope_resolution" => self.visit_scope_resolution(node, nesting),
            "assignment" => self.visit_assignment(node, nesting),
            "operator_assignment" => self.visit_operator_assignment(node, nesting),
            "binary" => self.visit_binary(node, nesting),
            "unary" => self.visit_unary(node, nesting),
            "element_reference" => {
                self.reference_method("[]", node);
                self.visit_children(node, nesting);
            }
            "alias" => self.visit_alias(node),
            "block_argument" => self.visit_block_argument(node, nesting),
            "block" | "do_block" => self.visit_block(node, None, nesting),
            "lambda" => {
                nesting.push_block(Some("lambda".to_string()));
                self.visit_children(node, nesting);
                nesting.pop();
            }
            "method_parameters" | "block_parameters" | "lambda_parameters" => {
                self.visit_parameters(node, nesting)
            }
            "exception_variable" => {
                for target in named_children(node) {
                    self.visit_target(target, None, nesting);
                }
            }
            "for" => self.visit_for(node, nesting),
            "comment" | "undef" => {}
            _ => self.visit_children(node, nesting),
        }
    }

    fn visit_children(&mut self, node: Node, nesting: &mut Nesting) {
        for child in named_children(node) {
            self.visit(child, nesting);
        }
    }

    // Namespaces

    fn visit_class(&mut self, node: Node, nesting: &mut Nesting) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return self.visit_children(node, nesting);
        };
        let (name, full_name) = self.namespace_name(name_node, nesting);

        // The superclass is evaluated in the outer scope
        let superclass_node = node.child_by_field_name("superclass");
        let superclass_expr = superclass_node.and_then(|s| {
            named_children(s)
                .into_iter()
                .find(|child| child.kind() != "comment")
        });
        if let Some(expr) = superclass_expr {
            self.visit(expr, nesting);
        }
        let superclass = superclass_expr.map(|expr| self.text(expr));

        let body = body_nodes(node, &[Some(name_node), superclass_node]);
        let definition = Definition::new(
            DefinitionKind::Class,
            name,
            full_name.clone(),
            self.location(node),
        );
        self.define(
            definition,
            nesting,
            Details {
                superclass,
                has_body: has_statements(&body),
                namespace: true,
                ..Details::default()
            },
        );

        nesting.push_namespace(
            NamespaceKind::Class,
            full_name,
            superclass.map(str::to_string),
        );
        for child in body {
            self.visit(child, nesting);
        }
        nesting.pop();
    }

    fn visit_module(&mut self, node: Node, nesting: &mut Nesting) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return self.visit_children(node, nesting);
        };
        let (name, full_name) = self.namespace_name(name_node, nesting);

        let body = body_nodes(node, &[Some(name_node)]);
        let definition = Definition::new(
            DefinitionKind::Module,
            name,
            full_name.clone(),
            self.location(node),
        );
        self.define(
            definition,
            nesting,
            Details {
                has_body: has_statements(&body),
                namespace: true,
                ..Details::default()
            },
        );

        nesting.push_namespace(NamespaceKind::Module, full_name, None);
        for child in body {
            self.visit(child, nesting);
        }
        nesting.pop();
    }

    // `class << self` has no name of its own, so it is not a definition
    fn visit_singleton_class(&mut self, node: Node, nesting: &mut Nesting) {
        let value = node.child_by_field_name("value");
        if let Some(value) = value {
            if value.kind() != "self" {
                self.visit(value, nesting);
            }
        }

        nesting.push_singleton_class();
        for child in body_nodes(node, &[value]) {
            self.visit(child, nesting);
        }
        nesting.pop();
    }

    /// Short and full name of a class or module from its name path
    fn namespace_name(&self, name_node: Node, nesting: &Nesting) -> (String, String) {
        let path: String = self
            .text(name_node)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let full_name = match path.strip_prefix("::") {
            Some(absolute) => absolute.to_string(),
            None => match nesting.namespace() {
                Some(namespace) => format!("{}::{}", namespace, path),
                None => path.clone(),
            },
        };
        let name = full_name
            .rsplit("::")
            .next()
            .unwrap_or(full_name.as_str())
            .to_string();

        (name, full_name)
    }

    // Methods

    fn visit_method(&mut self, node: Node, nesting: &mut Nesting) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return self.visit_children(node, nesting);
        };
        let name = method_name(self.text(name_node));
        let full_name = member_full_name(nesting.namespace(), &name, nesting.in_singleton_class());

        self.define_method(node, name, full_name, nesting);
        self.visit_method_body(node, &[Some(name_node)], nesting);
    }

    fn visit_singleton_method(&mut self, node: Node, nesting: &mut Nesting) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return self.visit_children(node, nesting);
        };
        let name = method_name(self.text(name_node));
        let object = node.child_by_field_name("object");

        let full_name = match object {
            Some(object) if object.kind() == "self" => {
                member_full_name(nesting.namespace(), &name, true)
            }
            Some(object) if matches!(object.kind(), "constant" | "scope_resolution") => {
                self.visit(object, nesting);
                format!("{}::{}", self.text(object), name)
            }
            // `def obj.foo`: obj is not a namespace and is not referenced
            Some(object) => format!("{}.{}", self.text(object), name),
            None => name.clone(),
        };

        self.define_method(node, name, full_name, nesting);
        self.visit_method_body(node, &[Some(name_node), object], nesting);
    }

    fn define_method(&mut self, node: Node, name: String, full_name: String, nesting: &Nesting) {
        let sig = attached_sig(enclosing_statement(node), self.source).map(|sig| self.text(sig));
        let definition = Definition::new(DefinitionKind::Method, name, full_name, self.location(node));
        self.define(
            definition,
            nesting,
            Details {
                sig,
                ..Details::default()
            },
        );
    }

    fn visit_method_body(&mut self, node: Node, skip: &[Option<Node>], nesting: &mut Nesting) {
        nesting.push_method();
        for child in named_children(node) {
            if skip.iter().flatten().any(|s| s.id() == child.id()) {
                continue;
            }
            self.visit(child, nesting);
        }
        nesting.pop();
    }

    // Calls

    fn visit_call(&mut self, node: Node, nesting: &mut Nesting) {
        let Some(method) = node.child_by_field_name("method") else {
            return self.visit_children(node, nesting);
        };
        if !matches!(method.kind(), "identifier" | "constant" | "operator") {
            return self.visit_children(node, nesting);
        }

        let name = self.text(method);
        let receiver = node.child_by_field_name("receiver");

        if ATTR_CALLS.contains(&name) && receiver.map_or(true, |r| r.kind() == "self") {
            return self.visit_attr(node, name, nesting);
        }

        self.reference_method(name, method);

        if let Some(receiver) = receiver {
            self.visit(receiver, nesting);
        }

        if !self.plugins.is_empty() {
            if let Some(call) = Call::from_node(self.path, node, self.source) {
                self.dispatch_call(&call, nesting);
            }
        }

        if let Some(arguments) = node.child_by_field_name("arguments") {
            self.visit_children(arguments, nesting);
        }
        if let Some(block) = node.child_by_field_name("block") {
            self.visit_block(block, Some(name), nesting);
        }
    }

    fn visit_attr(&mut self, node: Node, kind: &str, nesting: &mut Nesting) {
        let Some(arguments) = node.child_by_field_name("arguments") else {
            return;
        };

        let sig = attached_sig(enclosing_statement(node), self.source).map(|sig| self.text(sig));
        let singleton = nesting.in_singleton_class();

        for argument in named_children(arguments) {
            let name = match argument.kind() {
                "simple_symbol" => self.text(argument).trim_start_matches(':').to_string(),
                "delimited_symbol" => match CallArg::from_node(self.path, argument, self.source) {
                    CallArg::Symbol { value, .. } => value,
                    _ => continue,
                },
                _ => continue,
            };

            if kind != "attr_writer" {
                let full_name = member_full_name(nesting.namespace(), &name, singleton);
                self.define_accessor(DefinitionKind::AttrReader, name.clone(), full_name, argument, sig, nesting);
            }
            if kind != "attr_reader" {
                let writer = format!("{}=", name);
                let full_name = member_full_name(nesting.namespace(), &writer, singleton);
                self.define_accessor(DefinitionKind::AttrWriter, writer, full_name, argument, sig, nesting);
            }
        }
    }

    fn define_accessor(
        &mut self,
        kind: DefinitionKind,
        name: String,
        full_name: String,
        symbol: Node,
        sig: Option<&'a str>,
        nesting: &Nesting,
    ) {
        let definition = Definition::new(kind, name, full_name, self.location(symbol));
        self.define(
            definition,
            nesting,
            Details {
                sig,
                ..Details::default()
            },
        );
    }

    fn visit_identifier(&mut self, node: Node, nesting: &mut Nesting) {
        let name = self.text(node);
        if nesting.is_local(name) {
            return;
        }

        self.reference_method(name, node);
        if !self.plugins.is_empty() {
            let call = Call::bare(name, self.location(node));
            self.dispatch_call(&call, nesting);
        }
    }

    fn visit_block(&mut self, node: Node, call: Option<&str>, nesting: &mut Nesting) {
        nesting.push_block(call.map(str::to_string));
        self.visit_children(node, nesting);
        nesting.pop();
    }

    fn visit_block_argument(&mut self, node: Node, nesting: &mut Nesting) {
        for child in named_children(node) {
            if child.kind() == "simple_symbol" {
                let name = self.text(child).trim_start_matches(':');
                self.reference_method(name, child);
            } else {
                self.visit(child, nesting);
            }
        }
    }

    fn visit_scope_resolution(&mut self, node: Node, nesting: &mut Nesting) {
        if let Some(scope) = node.child_by_field_name("scope") {
            self.visit(scope, nesting);
        }
        if let Some(name) = node.child_by_field_name("name") {
            if name.kind() == "constant" {
                self.reference_constant(self.text(name), name);
            }
        }
    }

    // Operators

    fn visit_binary(&mut self, node: Node, nesting: &mut Nesting) {
        if let Some(operator) = node.child_by_field_name("operator") {
            match self.text(operator) {
                "&&" | "and" => self.reference_method("&&", operator),
                "||" | "or" => self.reference_method("||", operator),
                op @ ("<" | ">" | "<=" | ">=") => {
                    self.reference_method(op, operator);
                    self.reference_method("<=>", operator);
                }
                op => self.reference_method(op, operator),
            }
        }

        for field in ["left", "right"] {
            if let Some(operand) = node.child_by_field_name(field) {
                self.visit(operand, nesting);
            }
        }
    }

    fn visit_unary(&mut self, node: Node, nesting: &mut Nesting) {
        if let Some(operator) = node.child_by_field_name("operator") {
            let name = match self.text(operator) {
                "!" | "not" => Some("!"),
                "-" => Some("-@"),
                "+" => Some("+@"),
                "~" => Some("~"),
                _ => None,
            };
            if let Some(name) = name {
                self.reference_method(name, operator);
            }
        }

        if let Some(operand) = node.child_by_field_name("operand") {
            self.visit(operand, nesting);
        }
    }

    // `alias new old` keeps `old` alive
    fn visit_alias(&mut self, node: Node) {
        let names = named_children(node);
        if let Some(old) = names.get(1) {
            let name = method_name(self.text(*old));
            self.reference_method(&name, *old);
        }
    }

    // Assignments

    fn visit_assignment(&mut self, node: Node, nesting: &mut Nesting) {
        let left = node.child_by_field_name("left");
        let right = node.child_by_field_name("right");

        if let Some(left) = left {
            if left.kind() == "left_assignment_list" {
                self.visit_targets(left, nesting);
            } else {
                self.visit_target(left, Some((node, right)), nesting);
            }
        }

        if let Some(right) = right {
            self.visit(right, nesting);
        }
    }

    fn visit_targets(&mut self, list: Node, nesting: &mut Nesting) {
        for target in named_children(list) {
            self.visit_target(target, None, nesting);
        }
    }

    /// A plain `=` target. `whole` is the assignment when it binds a single name.
    fn visit_target(
        &mut self,
        target: Node,
        whole: Option<(Node, Option<Node>)>,
        nesting: &mut Nesting,
    ) {
        match target.kind() {
            "identifier" => {
                let name = self.text(target);
                nesting.declare_local(name);
                self.reference_method(&format!("{}=", name), target);
            }
            "instance_variable" | "class_variable" | "global_variable" => {
                self.reference_method(&format!("{}=", self.text(target)), target);
            }
            "constant" | "scope_resolution" => {
                self.define_constant(target, whole, false, nesting);
            }
            "call" => {
                if let Some(method) = target.child_by_field_name("method") {
                    self.reference_method(&format!("{}=", self.text(method)), method);
                }
                if let Some(receiver) = target.child_by_field_name("receiver") {
                    self.visit(receiver, nesting);
                }
            }
            "element_reference" => {
                self.reference_method("[]=", target);
                self.visit_children(target, nesting);
            }
            "rest_assignment" => {
                for inner in named_children(target) {
                    self.visit_target(inner, None, nesting);
                }
            }
            "destructured_left_assignment" | "left_assignment_list" => {
                self.visit_targets(target, nesting)
            }
            _ => {}
        }
    }

    fn visit_operator_assignment(&mut self, node: Node, nesting: &mut Nesting) {
        let right = node.child_by_field_name("right");

        if let Some(target) = node.child_by_field_name("left") {
            match target.kind() {
                "identifier" => {
                    let name = self.text(target);
                    nesting.declare_local(name);
                    self.reference_method(name, target);
                    self.reference_method(&format!("{}=", name), target);
                }
                "instance_variable" | "class_variable" | "global_variable" => {
                    let name = self.text(target);
                    self.reference_method(name, target);
                    self.reference_method(&format!("{}=", name), target);
                }
                "constant" | "scope_resolution" => {
                    self.define_constant(target, Some((node, right)), true, nesting);
                }
                "call" => {
                    if let Some(method) = target.child_by_field_name("method") {
                        let name = self.text(method);
                        self.reference_method(name, method);
                        self.reference_method(&format!("{}=", name), method);
                    }
                    if let Some(receiver) = target.child_by_field_name("receiver") {
                        self.visit(receiver, nesting);
                    }
                }
                "element_reference" => {
                    self.reference_method("[]", target);
                    self.reference_method("[]=", target);
                    self.visit_children(target, nesting);
                }
                _ => {}
            }
        }

        if let Some(right) = right {
            self.visit(right, nesting);
        }
    }

    /// Constant assignment target. The definition spans the whole assignment
    /// when it binds a single name, the constant itself otherwise.
    fn define_constant(
        &mut self,
        target: Node,
        whole: Option<(Node, Option<Node>)>,
        compound: bool,
        nesting: &mut Nesting,
    ) {
        let (path, name_node) = match target.kind() {
            "scope_resolution" => {
                if let Some(scope) = target.child_by_field_name("scope") {
                    self.visit(scope, nesting);
                }
                (self.text(target), target.child_by_field_name("name"))
            }
            _ => (self.text(target), Some(target)),
        };
        let Some(name_node) = name_node else {
            return;
        };
        let name = self.text(name_node).to_string();

        let full_name = match path.strip_prefix("::") {
            Some(absolute) => absolute.to_string(),
            None => match nesting.namespace() {
                Some(namespace) => format!("{}::{}", namespace, path),
                None => path.to_string(),
            },
        };

        if compound {
            self.reference_constant(&name, name_node);
        }

        let (span, value) = match whole {
            Some((assignment, right)) => (assignment, right.map(|r| self.text(r))),
            None => (target, None),
        };

        let definition = Definition::new(DefinitionKind::Constant, name, full_name, self.location(span));
        self.define(
            definition,
            nesting,
            Details {
                value,
                ..Details::default()
            },
        );
    }

    // Locals

    fn visit_parameters(&mut self, node: Node, nesting: &mut Nesting) {
        for parameter in named_children(node) {
            match parameter.kind() {
                "identifier" => nesting.declare_local(self.text(parameter)),
                "optional_parameter"
                | "keyword_parameter"
                | "splat_parameter"
                | "hash_splat_parameter"
                | "block_parameter" => {
                    if let Some(name) = parameter.child_by_field_name("name") {
                        nesting.declare_local(self.text(name));
                    }
                    if let Some(value) = parameter.child_by_field_name("value") {
                        self.visit(value, nesting);
                    }
                }
                "destructured_parameter" => self.visit_parameters(parameter, nesting),
                _ => {}
            }
        }
    }

    fn visit_for(&mut self, node: Node, nesting: &mut Nesting) {
        let pattern = node.child_by_field_name("pattern");
        if let Some(pattern) = pattern {
            self.visit_target(pattern, None, nesting);
        }
        for child in named_children(node) {
            if Some(child.id()) != pattern.map(|p| p.id()) {
                self.visit(child, nesting);
            }
        }
    }

    // Plugin dispatch

    /// Add a definition, then let every plugin look at it
    fn define(&mut self, definition: Definition, nesting: &Nesting, details: Details<'a>) -> DefinitionId {
        let kind = definition.kind;
        let id = if details.namespace {
            self.index.define_namespace(
                definition,
                details.superclass.map(str::to_string),
                nesting.namespace_names(),
            )
        } else {
            self.index.define(definition)
        };

        if self.plugins.is_empty() {
            return id;
        }

        let scope = nesting.scope();
        let mut references = Vec::new();
        if let Some(definition) = self.index.definition_mut(id) {
            let mut event = DefineEvent::new(definition, &mut references, self.path, &scope)
                .with_sig(details.sig)
                .with_value(details.value)
                .with_body(details.has_body);

            match kind {
                DefinitionKind::Class => {
                    let mut event = event.with_superclass(details.superclass);
                    self.plugins.on_define_class(&mut event);
                }
                DefinitionKind::Module => self.plugins.on_define_module(&mut event),
                DefinitionKind::Method => self.plugins.on_define_method(&mut event),
                DefinitionKind::AttrReader | DefinitionKind::AttrWriter => {
                    self.plugins.on_define_accessor(&mut event)
                }
                DefinitionKind::Constant => self.plugins.on_define_constant(&mut event),
            }
        }

        for reference in references {
            self.index.reference(reference);
        }
        id
    }

    fn dispatch_call(&mut self, call: &Call, nesting: &Nesting) {
        let scope = nesting.scope();
        let mut references = Vec::new();
        let mut event = SendEvent::new(&mut references, call, self.path, &scope);
        self.plugins.on_send(&mut event);

        for reference in references {
            self.index.reference(reference);
        }
    }
}

/// Body statements of a class, module or singleton class: every named child
/// except the header nodes, with `body_statement` flattened
fn body_nodes<'t>(node: Node<'t>, header: &[Option<Node<'t>>]) -> Vec<Node<'t>> {
    let mut body = Vec::new();
    for child in named_children(node) {
        if header.iter().flatten().any(|h| h.id() == child.id()) {
            continue;
        }
        if child.kind() == "body_statement" {
            body.extend(named_children(child));
        } else {
            body.push(child);
        }
    }
    body
}

fn has_statements(body: &[Node]) -> bool {
    body.iter().any(|node| node.kind() != "comment")
}

// `def foo=`, `def ==`, `alias :new :old`
fn method_name(text: &str) -> String {
    text.trim_start_matches(':').to_string()
}

/// `A::B#foo` for instance members, `A::B::foo` for singleton members,
/// the bare name at the top level
fn member_full_name(owner: Option<&str>, name: &str, singleton: bool) -> String {
    match owner {
        Some(owner) if singleton => format!("{}::{}", owner, name),
        Some(owner) => format!("{}#{}", owner, name),
        None => name.to_string(),
    }
}
