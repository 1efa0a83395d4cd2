//! Finding the node a removal request points at and checking its shape.

use crate::error::RemoveError;
use crate::index::{DefinitionKind, Location};
use crate::parser::{call_name, descendants};
use tree_sitter::{Node, Tree};

/// `attr_*` flavour of an accessor declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrFlavour {
    Reader,
    Writer,
    Accessor,
}

impl AttrFlavour {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "attr_reader" => Some(AttrFlavour::Reader),
            "attr_writer" => Some(AttrFlavour::Writer),
            "attr_accessor" => Some(AttrFlavour::Accessor),
            _ => None,
        }
    }

    fn defines(self, kind: DefinitionKind) -> bool {
        matches!(
            (self, kind),
            (AttrFlavour::Accessor, _)
                | (AttrFlavour::Reader, DefinitionKind::AttrReader)
                | (AttrFlavour::Writer, DefinitionKind::AttrWriter)
        )
    }
}

/// What the located node turned out to be
#[derive(Debug, Clone, Copy)]
pub enum Target<'t> {
    /// `class` or `module`
    Namespace(Node<'t>),
    /// `def foo` or `def self.foo`
    Method(Node<'t>),
    /// One symbol of an `attr_*` call
    Accessor {
        symbol: Node<'t>,
        call: Node<'t>,
        flavour: AttrFlavour,
    },
    /// Assignment binding a single constant
    ConstantAssignment(Node<'t>),
    /// One constant among several targets of a multiple assignment
    ConstantTarget(Node<'t>),
}

/// Smallest node whose span is exactly `location`
pub fn locate<'t>(
    tree: &'t Tree,
    kind: DefinitionKind,
    location: &Location,
) -> Result<Node<'t>, RemoveError> {
    descendants(tree.root_node())
        .filter(|node| location.matches_node(*node))
        .last()
        .ok_or_else(|| RemoveError::NotFound {
            kind,
            location: location.clone(),
        })
}

/// Check that `node` has the syntactic shape of a `kind` definition
pub fn classify<'t>(
    node: Node<'t>,
    kind: DefinitionKind,
    location: &Location,
    source: &str,
) -> Result<Target<'t>, RemoveError> {
    let target = match kind {
        DefinitionKind::Class if node.kind() == "class" => Some(Target::Namespace(node)),
        DefinitionKind::Module if node.kind() == "module" => Some(Target::Namespace(node)),
        DefinitionKind::Method if matches!(node.kind(), "method" | "singleton_method") => {
            Some(Target::Method(node))
        }
        DefinitionKind::AttrReader | DefinitionKind::AttrWriter => accessor(node, kind, source),
        DefinitionKind::Constant => constant(node),
        _ => None,
    };

    target.ok_or_else(|| RemoveError::KindMismatch {
        kind,
        location: location.clone(),
        found: node.kind().to_string(),
    })
}

fn accessor<'t>(symbol: Node<'t>, kind: DefinitionKind, source: &str) -> Option<Target<'t>> {
    if !matches!(symbol.kind(), "simple_symbol" | "delimited_symbol") {
        return None;
    }
    let arguments = symbol.parent().filter(|p| p.kind() == "argument_list")?;
    let call = arguments.parent()?;
    if call
        .child_by_field_name("receiver")
        .is_some_and(|receiver| receiver.kind() != "self")
    {
        return None;
    }

    let flavour = AttrFlavour::from_name(call_name(call, source)?)?;
    flavour.defines(kind).then_some(Target::Accessor {
        symbol,
        call,
        flavour,
    })
}

fn constant(node: Node) -> Option<Target> {
    match node.kind() {
        "assignment" | "operator_assignment" => {
            let left = node.child_by_field_name("left")?;
            matches!(left.kind(), "constant" | "scope_resolution")
                .then_some(Target::ConstantAssignment(node))
        }
        "constant" | "scope_resolution" => {
            let parent = node.parent()?;
            matches!(
                parent.kind(),
                "left_assignment_list" | "destructured_left_assignment" | "rest_assignment"
            )
            .then_some(Target::ConstantTarget(node))
        }
        _ => None,
    }
}
