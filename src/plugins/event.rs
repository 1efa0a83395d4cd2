use crate::index::{Definition, Location, Reference};
use crate::indexer::{Call, CallArg};
use std::path::Path;

/// Where a definition or call sits, as far as plugins are concerned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventScope {
    /// Full name of the innermost enclosing class or module
    pub owner: Option<String>,

    /// Superclass of the innermost enclosing class, as written
    pub owner_superclass: Option<String>,

    /// Name of the call whose block encloses the event (`enums`, `included`...)
    pub block: Option<String>,
}

/// Handle given to the `on_define_*` hooks.
///
/// The definition has already been added to the index; a hook may only mark
/// it ignored or add references. References are collected and appended to the
/// index once every plugin has run.
pub struct DefineEvent<'a> {
    definition: &'a mut Definition,
    references: &'a mut Vec<Reference>,
    path: &'a Path,
    scope: &'a EventScope,
    superclass: Option<&'a str>,
    sig: Option<&'a str>,
    value: Option<&'a str>,
    has_body: bool,
}

impl<'a> DefineEvent<'a> {
    pub fn new(
        definition: &'a mut Definition,
        references: &'a mut Vec<Reference>,
        path: &'a Path,
        scope: &'a EventScope,
    ) -> Self {
        Self {
            definition,
            references,
            path,
            scope,
            superclass: scope.owner_superclass.as_deref(),
            sig: None,
            value: None,
            has_body: false,
        }
    }

    /// Own superclass, for class definitions
    pub fn with_superclass(mut self, superclass: Option<&'a str>) -> Self {
        self.superclass = superclass;
        self
    }

    pub fn with_sig(mut self, sig: Option<&'a str>) -> Self {
        self.sig = sig;
        self
    }

    pub fn with_value(mut self, value: Option<&'a str>) -> Self {
        self.value = value;
        self
    }

    pub fn with_body(mut self, has_body: bool) -> Self {
        self.has_body = has_body;
        self
    }

    pub fn definition(&self) -> &Definition {
        self.definition
    }

    pub fn name(&self) -> &str {
        &self.definition().name
    }

    pub fn full_name(&self) -> &str {
        &self.definition().full_name
    }

    pub fn location(&self) -> &Location {
        &self.definition().location
    }

    /// Exempt the definition from dead-code reporting
    pub fn ignore(&mut self) {
        self.definition.ignore();
    }

    pub fn is_ignored(&self) -> bool {
        self.definition().is_ignored()
    }

    pub fn reference_method(&mut self, name: &str, location: Location) {
        self.references.push(Reference::method(name, location));
    }

    pub fn reference_constant(&mut self, name: &str, location: Location) {
        self.references.push(Reference::constant(name, location));
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// Full name of the enclosing class or module
    pub fn owner(&self) -> Option<&'a str> {
        let scope: &'a EventScope = self.scope;
        scope.owner.as_deref()
    }

    /// The class's own superclass for class definitions, otherwise the
    /// superclass of the enclosing class
    pub fn superclass(&self) -> Option<&'a str> {
        self.superclass
    }

    /// Name of the call whose block encloses the definition
    pub fn enclosing_block(&self) -> Option<&'a str> {
        let scope: &'a EventScope = self.scope;
        scope.block.as_deref()
    }

    /// Source of the attached `sig { ... }`, if any
    pub fn sig(&self) -> Option<&'a str> {
        self.sig
    }

    /// Source of the assigned value, for constants
    pub fn value(&self) -> Option<&'a str> {
        self.value
    }

    /// Whether a class or module has at least one statement in its body
    pub fn has_body(&self) -> bool {
        self.has_body
    }
}

/// Handle given to `on_send`
pub struct SendEvent<'a> {
    references: &'a mut Vec<Reference>,
    call: &'a Call,
    path: &'a Path,
    scope: &'a EventScope,
}

impl<'a> SendEvent<'a> {
    pub fn new(
        references: &'a mut Vec<Reference>,
        call: &'a Call,
        path: &'a Path,
        scope: &'a EventScope,
    ) -> Self {
        Self {
            references,
            call,
            path,
            scope,
        }
    }

    pub fn call(&self) -> &'a Call {
        self.call
    }

    pub fn reference_method(&mut self, name: &str, location: Location) {
        self.references.push(Reference::method(name, location));
    }

    pub fn reference_constant(&mut self, name: &str, location: Location) {
        self.references.push(Reference::constant(name, location));
    }

    /// Reference the method named by a symbol or string argument, or by each
    /// such element of an array argument
    pub fn reference_method_arg(&mut self, arg: &CallArg) {
        match arg {
            CallArg::Array(items) => {
                for item in items {
                    self.reference_method_arg(item);
                }
            }
            _ => {
                if let Some((name, location)) = arg.as_name() {
                    self.reference_method(name, location.clone());
                }
            }
        }
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    pub fn owner(&self) -> Option<&'a str> {
        let scope: &'a EventScope = self.scope;
        scope.owner.as_deref()
    }

    pub fn owner_superclass(&self) -> Option<&'a str> {
        let scope: &'a EventScope = self.scope;
        scope.owner_superclass.as_deref()
    }
}
