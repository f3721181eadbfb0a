//! The project model: every declaration in the run, owned in one place.
//!
//! Declarations live in an arena indexed by [`DeclId`]. Two views sit on top of it:
//! - a flat index from [`QualifiedPath`] to id, for constant-time lookup during resolution and emission;
//! - a namespace tree ([`NamespaceNode`]) holding child namespaces and top-level types by simple name.
//!
//! ## Notes
//! - Only the merger builds a model and only the resolution pass writes to one. Emission borrows it immutably.
//! - Nested types are ordinary class/interface/enum declarations whose `parent` is their enclosing type. They are
//!   reachable through the index and through their parent's member list, not through the namespace tree.
//!
//! ## See also
//! - [`crate::frontend::merge`] for construction
//! - [`crate::frontend::resolve`] for the resolution pass

pub mod decl;
pub mod path;
pub mod scope;
pub mod types;

use std::collections::{BTreeMap, HashMap};

pub use decl::{
    Accessor, DeclId, DeclKind, Declaration, EnumDecl, EnumMember, FieldDecl, Initializer, MethodDecl, Modifiers,
    NamespaceDecl, Parameter, PropertyDecl, SignalDecl, TypeDecl,
};
pub use path::QualifiedPath;
pub use scope::{GenericOwner, GenericParam, GenericScope};
pub use types::{
    CppType, DeclaredSegment, LexicalScope, NameSegment, NamedType, ResolvedType, SourceType, TypeReference,
    TypeSyntax, UnresolvedType,
};

/// A node of the namespace tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceNode {
    pub path: QualifiedPath,
    /// The namespace's own declaration; `None` for the global namespace.
    pub decl: Option<DeclId>,
    pub namespaces: BTreeMap<String, NamespaceNode>,
    pub types: BTreeMap<String, DeclId>,
}

impl NamespaceNode {
    fn new(path: QualifiedPath) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    /// This node and every descendant, parents before children, siblings by name.
    pub fn walk(&self) -> Vec<&NamespaceNode> {
        let mut out = vec![self];
        for child in self.namespaces.values() {
            out.extend(child.walk());
        }
        out
    }
}

/// The merged, project-wide declaration store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectModel {
    decls: Vec<Declaration>,
    index: HashMap<QualifiedPath, DeclId>,
    root: NamespaceNode,
}

impl ProjectModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id]
    }

    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.decls.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls.iter().enumerate()
    }

    pub fn lookup(&self, path: &QualifiedPath) -> Option<DeclId> {
        self.index.get(path).copied()
    }

    pub fn root(&self) -> &NamespaceNode {
        &self.root
    }

    pub fn namespace(&self, path: &QualifiedPath) -> Option<&NamespaceNode> {
        let mut node = &self.root;
        for segment in path.segments() {
            node = node.namespaces.get(segment)?;
        }
        Some(node)
    }

    /// Top-level type `name` directly inside namespace `namespace`.
    pub fn type_in_namespace(&self, namespace: &QualifiedPath, name: &str) -> Option<DeclId> {
        self.namespace(namespace)?.types.get(name).copied()
    }

    /// Nested type `name` declared directly inside type `owner`.
    pub fn nested_type(&self, owner: DeclId, name: &str) -> Option<DeclId> {
        self.decl(owner)
            .members()
            .iter()
            .copied()
            .find(|&id| self.decl(id).is_type() && self.decl(id).name == name)
    }

    /// Top-level types ordered by qualified path.
    pub fn top_level_types(&self) -> Vec<DeclId> {
        let mut ids: Vec<DeclId> = self
            .root
            .walk()
            .into_iter()
            .flat_map(|ns| ns.types.values().copied())
            .collect();
        ids.sort_by(|a, b| self.decl(*a).path.cmp(&self.decl(*b).path));
        ids
    }

    /// The enclosing type chain of `id`, outermost first, ending with `id` itself.
    pub fn type_chain(&self, id: DeclId) -> Vec<DeclId> {
        let mut chain = vec![id];
        let mut current = self.decl(id).parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.decl(parent).parent;
        }
        chain.reverse();
        chain
    }

    /// Outermost enclosing type of `id` (itself when top-level).
    pub fn top_level_of(&self, id: DeclId) -> DeclId {
        self.type_chain(id)[0]
    }

    /// Namespace path a type (or member) lives in.
    pub fn namespace_of(&self, id: DeclId) -> QualifiedPath {
        let top = self.decl(self.top_level_of(id));
        top.path.parent().unwrap_or_default()
    }

    /// Add a declaration to the arena and index. The merger checks for collisions before calling this.
    pub(crate) fn insert(&mut self, decl: Declaration) -> DeclId {
        let id = self.decls.len();
        self.index.insert(decl.path.clone(), id);
        self.decls.push(decl);
        id
    }

    /// Namespace node for `path`, creating missing nodes along the way.
    pub(crate) fn namespace_mut(&mut self, path: &QualifiedPath) -> &mut NamespaceNode {
        let mut node = &mut self.root;
        let mut walked = QualifiedPath::root();
        for segment in path.segments() {
            walked = walked.child(segment.clone());
            let next = walked.clone();
            node = node
                .namespaces
                .entry(segment.clone())
                .or_insert_with(|| NamespaceNode::new(next));
        }
        node
    }
}
