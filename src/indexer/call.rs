use crate::index::Location;
use crate::parser::{named_children, node_text};
use std::path::Path;
use tree_sitter::Node;

/// A call-like expression as handed to plugins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Method name, e.g. "before_action"
    pub name: String,

    /// Receiver as written, e.g. "self" or "User"
    pub receiver: Option<String>,

    pub args: Vec<CallArg>,

    /// Whether a `{ }` / `do end` block is attached
    pub has_block: bool,

    pub location: Location,
}

/// A call argument, reduced to the shapes plugins care about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Symbol { value: String, location: Location },
    String { value: String, location: Location },
    Constant { name: String, location: Location },
    Array(Vec<CallArg>),
    /// A hash literal or a run of bare keyword arguments
    Hash(Vec<(CallArg, CallArg)>),
    Other,
}

impl Call {
    /// Build from a `call` node
    pub fn from_node(path: &Path, node: Node, source: &str) -> Option<Self> {
        let method = node.child_by_field_name("method")?;

        let args = node
            .child_by_field_name("arguments")
            .map(|arguments| CallArg::from_argument_list(path, arguments, source))
            .unwrap_or_default();

        Some(Self {
            name: node_text(method, source).to_string(),
            receiver: node
                .child_by_field_name("receiver")
                .map(|receiver| node_text(receiver, source).to_string()),
            args,
            has_block: node.child_by_field_name("block").is_some(),
            location: Location::from_node(path, node),
        })
    }

    /// A receiver-less call without arguments (`foo`)
    pub fn bare(name: &str, location: Location) -> Self {
        Self {
            name: name.to_string(),
            receiver: None,
            args: Vec::new(),
            has_block: false,
            location,
        }
    }

    /// Positional symbol arguments
    pub fn symbols(&self) -> impl Iterator<Item = (&str, &Location)> {
        self.args.iter().filter_map(CallArg::as_symbol)
    }

    /// Positional symbol or string arguments
    pub fn names(&self) -> impl Iterator<Item = (&str, &Location)> {
        self.args.iter().filter_map(CallArg::as_name)
    }

    /// Every key/value pair of hash arguments
    pub fn pairs(&self) -> impl Iterator<Item = &(CallArg, CallArg)> {
        self.args
            .iter()
            .filter_map(|arg| match arg {
                CallArg::Hash(pairs) => Some(pairs),
                _ => None,
            })
            .flatten()
    }

    /// Value of a symbol-keyed option such as `if: :admin?`
    pub fn keyword(&self, key: &str) -> Option<&CallArg> {
        self.pairs()
            .find(|(k, _)| k.as_symbol().is_some_and(|(name, _)| name == key))
            .map(|(_, value)| value)
    }

    pub fn first_arg(&self) -> Option<&CallArg> {
        self.args.first()
    }

    pub fn last_arg(&self) -> Option<&CallArg> {
        self.args.last()
    }
}

impl CallArg {
    fn from_argument_list(path: &Path, arguments: Node, source: &str) -> Vec<CallArg> {
        let mut args = Vec::new();
        let mut pending_pairs: Vec<(CallArg, CallArg)> = Vec::new();

        for child in named_children(arguments) {
            match child.kind() {
                "pair" => {
                    if let Some(pair) = Self::pair(path, child, source) {
                        pending_pairs.push(pair);
                    }
                }
                "block_argument" | "comment" => {}
                _ => {
                    if !pending_pairs.is_empty() {
                        args.push(CallArg::Hash(std::mem::take(&mut pending_pairs)));
                    }
                    args.push(Self::from_node(path, child, source));
                }
            }
        }

        if !pending_pairs.is_empty() {
            args.push(CallArg::Hash(pending_pairs));
        }
        args
    }

    fn pair(path: &Path, node: Node, source: &str) -> Option<(CallArg, CallArg)> {
        let key = node.child_by_field_name("key")?;
        let value = node.child_by_field_name("value")?;
        Some((Self::from_node(path, key, source), Self::from_node(path, value, source)))
    }

    pub fn from_node(path: &Path, node: Node, source: &str) -> CallArg {
        let location = || Location::from_node(path, node);

        match node.kind() {
            "simple_symbol" => CallArg::Symbol {
                value: node_text(node, source).trim_start_matches(':').to_string(),
                location: location(),
            },
            "hash_key_symbol" | "bare_symbol" => CallArg::Symbol {
                value: node_text(node, source).to_string(),
                location: location(),
            },
            "delimited_symbol" => match literal_content(node, source) {
                Some(value) => CallArg::Symbol {
                    value,
                    location: location(),
                },
                None => CallArg::Other,
            },
            "string" => match literal_content(node, source) {
                Some(value) => CallArg::String {
                    value,
                    location: location(),
                },
                None => CallArg::Other,
            },
            "bare_string" => CallArg::String {
                value: node_text(node, source).to_string(),
                location: location(),
            },
            "constant" | "scope_resolution" => CallArg::Constant {
                name: node_text(node, source).to_string(),
                location: location(),
            },
            "array" | "string_array" | "symbol_array" => CallArg::Array(
                named_children(node)
                    .into_iter()
                    .filter(|child| child.kind() != "comment")
                    .map(|child| Self::from_node(path, child, source))
                    .collect(),
            ),
            "hash" => CallArg::Hash(
                named_children(node)
                    .into_iter()
                    .filter(|child| child.kind() == "pair")
                    .filter_map(|child| Self::pair(path, child, source))
                    .collect(),
            ),
            _ => CallArg::Other,
        }
    }

    /// Symbol value and location
    pub fn as_symbol(&self) -> Option<(&str, &Location)> {
        match self {
            CallArg::Symbol { value, location } => Some((value.as_str(), location)),
            _ => None,
        }
    }

    /// Symbol or string value and location
    pub fn as_name(&self) -> Option<(&str, &Location)> {
        match self {
            CallArg::Symbol { value, location } | CallArg::String { value, location } => {
                Some((value.as_str(), location))
            }
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<(&str, &Location)> {
        match self {
            CallArg::Constant { name, location } => Some((name.as_str(), location)),
            _ => None,
        }
    }
}

// Text of a string-like literal, `None` when it is interpolated.
fn literal_content(node: Node, source: &str) -> Option<String> {
    let mut content = String::new();
    for child in named_children(node) {
        match child.kind() {
            "string_content" => content.push_str(node_text(child, source)),
            _ => return None,
        }
    }
    Some(content)
}
