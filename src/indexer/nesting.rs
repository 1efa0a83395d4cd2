use crate::plugins::EventScope;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceKind {
    Class,
    Module,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FrameKind {
    Program,
    Namespace {
        kind: NamespaceKind,
        full_name: String,
        superclass: Option<String>,
    },
    /// `class << self`
    SingletonClass,
    Method,
    /// A `{ }` / `do end` block, with the name of the call it belongs to
    Block(Option<String>),
}

impl FrameKind {
    // Local variables do not leak through these frames
    fn is_opaque(&self) -> bool {
        !matches!(self, FrameKind::Block(_))
    }
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    locals: HashSet<String>,
}

/// Lexical context of the node being visited.
///
/// Passed explicitly through the traversal; one value per file.
#[derive(Debug)]
pub struct Nesting {
    frames: Vec<Frame>,
}

impl Nesting {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                kind: FrameKind::Program,
                locals: HashSet::new(),
            }],
        }
    }

    fn push(&mut self, kind: FrameKind) {
        self.frames.push(Frame {
            kind,
            locals: HashSet::new(),
        });
    }

    pub fn push_namespace(&mut self, kind: NamespaceKind, full_name: String, superclass: Option<String>) {
        self.push(FrameKind::Namespace {
            kind,
            full_name,
            superclass,
        });
    }

    pub fn push_singleton_class(&mut self) {
        self.push(FrameKind::SingletonClass);
    }

    pub fn push_method(&mut self) {
        self.push(FrameKind::Method);
    }

    pub fn push_block(&mut self, call: Option<String>) {
        self.push(FrameKind::Block(call));
    }

    pub fn pop(&mut self) {
        // The program frame stays
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Full name of the innermost class or module
    pub fn namespace(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|frame| match &frame.kind {
            FrameKind::Namespace { full_name, .. } => Some(full_name.as_str()),
            _ => None,
        })
    }

    /// Superclass of the innermost namespace, when that namespace is a class
    pub fn namespace_superclass(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|frame| match &frame.kind {
            FrameKind::Namespace { kind, superclass, .. } => match kind {
                NamespaceKind::Class => Some(superclass.as_deref()),
                NamespaceKind::Module => Some(None),
            },
            _ => None,
        })?
    }

    /// Full names of every enclosing namespace, outermost first
    pub fn namespace_names(&self) -> Vec<String> {
        self.frames
            .iter()
            .filter_map(|frame| match &frame.kind {
                FrameKind::Namespace { full_name, .. } => Some(full_name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether definitions here belong to the singleton class of the owner
    pub fn in_singleton_class(&self) -> bool {
        self.frames
            .iter()
            .rev()
            .find(|frame| {
                matches!(
                    frame.kind,
                    FrameKind::Namespace { .. } | FrameKind::SingletonClass
                )
            })
            .is_some_and(|frame| frame.kind == FrameKind::SingletonClass)
    }

    pub fn declare_local(&mut self, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.locals.insert(name.to_string());
        }
    }

    pub fn is_local(&self, name: &str) -> bool {
        for frame in self.frames.iter().rev() {
            if frame.locals.contains(name) {
                return true;
            }
            if frame.kind.is_opaque() {
                return false;
            }
        }
        false
    }

    /// Snapshot handed to plugins
    pub fn scope(&self) -> EventScope {
        EventScope {
            owner: self.namespace().map(str::to_string),
            owner_superclass: self.namespace_superclass().map(str::to_string),
            block: self.block().map(str::to_string),
        }
    }

    /// Innermost named block between this point and the enclosing method or
    /// namespace
    pub fn block(&self) -> Option<&str> {
        for frame in self.frames.iter().rev() {
            match &frame.kind {
                FrameKind::Block(Some(call)) => return Some(call.as_str()),
                FrameKind::Block(None) => continue,
                _ => return None,
            }
        }
        None
    }
}

impl Default for Nesting {
    fn default() -> Self {
        Self::new()
    }
}
