//! Generic-parameter scopes.

/// Which declaration introduced a generic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericOwner {
    /// A type; `depth` is 0 for a top-level type and grows by one per nesting level.
    Type { depth: usize },
    Method,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    /// Name as written in source.
    pub name: String,
    /// Name used in emitted code. Differs from `name` only when the parameter shadows an outer one, since the
    /// target does not allow a template parameter to be redeclared in a nested scope.
    pub emitted: String,
    pub owner: GenericOwner,
}

/// Ordered generic parameters visible at one position: outer type parameters first, then the declaration's own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericScope {
    params: Vec<GenericParam>,
}

impl GenericScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, renaming it if an outer parameter already uses its emitted name.
    pub fn push(&mut self, name: &str, owner: GenericOwner) -> &GenericParam {
        let mut emitted = name.to_string();
        while self.params.iter().any(|p| p.emitted == emitted) {
            emitted.push('_');
        }
        self.params.push(GenericParam {
            name: name.to_string(),
            emitted,
            owner,
        });
        &self.params[self.params.len() - 1]
    }

    /// Innermost parameter named `name`; inner parameters shadow outer ones.
    pub fn lookup(&self, name: &str) -> Option<&GenericParam> {
        self.params.iter().rev().find(|p| p.name == name)
    }

    pub fn params(&self) -> &[GenericParam] {
        &self.params
    }

    /// Parameters introduced by the owning declaration itself.
    pub fn own(&self, owner: GenericOwner) -> impl Iterator<Item = &GenericParam> {
        self.params.iter().filter(move |p| p.owner == owner)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
