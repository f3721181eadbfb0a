//! Project Model Merger: all file outlines in, one [`ProjectModel`] out.
//!
//! Merging is the barrier between per-file and project-wide work. Outlines are merged in file-path order, so the
//! resulting model (arena order included) does not depend on the order files were read or outlined in.
//!
//! ## Notes
//! - Types whose parts are all marked `partial` merge into one declaration; members keep part order, then source
//!   order.
//! - Collisions become duplicate-declaration diagnostics naming both locations. A colliding type's members are not
//!   merged, so one collision is reported once rather than once per member.
//! - Structural diagnostics collected by the outline builder are carried through: the merge fails if any file had
//!   one, because a dropped declaration could change what other references resolve to.

use gdunsharp_core::lang::modifiers::ModifierId;
use gdunsharp_syntax::SourceLocation;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::frontend::model::{DeclId, DeclKind, Declaration, NamespaceDecl, ProjectModel, QualifiedPath};
use crate::frontend::outline::{FileOutline, OutlineItem, TypeOutline};

struct Merger {
    model: ProjectModel,
    diagnostics: Vec<Diagnostic>,
}

/// Merge every file outline into one project model.
///
/// ## Errors
///
/// Every outline diagnostic plus every collision found while merging, in presentation order.
#[tracing::instrument(skip_all, fields(files = outlines.len()))]
pub fn merge(mut outlines: Vec<FileOutline>) -> Result<ProjectModel, Diagnostics> {
    outlines.sort_by(|a, b| a.file.cmp(&b.file));
    let mut merger = Merger {
        model: ProjectModel::new(),
        diagnostics: Vec::new(),
    };
    for outline in outlines {
        merger.diagnostics.extend(outline.diagnostics);
        for (path, location) in outline.namespaces {
            merger.namespace(&path, &location);
        }
        for ty in outline.types {
            let namespace = ty.decl.path.parent().unwrap_or_default();
            if merger.model.lookup(&namespace).is_none() {
                merger.namespace(&namespace, &ty.decl.location);
            }
            merger.insert_type(ty, None);
        }
    }
    tracing::debug!(declarations = merger.model.len(), "merged");
    match Diagnostics::from_vec(merger.diagnostics) {
        Some(errors) => Err(errors),
        None => Ok(merger.model),
    }
}

impl Merger {
    /// Make sure `path` and its ancestors exist as namespaces, recording `location` on `path` itself.
    fn namespace(&mut self, path: &QualifiedPath, location: &SourceLocation) {
        let mut current = QualifiedPath::root();
        for segment in path.segments() {
            current = current.child(segment.clone());
            if let Some(id) = self.model.lookup(&current) {
                let existing = self.model.decl_mut(id);
                let DeclKind::Namespace(ns) = &mut existing.kind else {
                    let first = existing.location.clone();
                    self.diagnostics.push(
                        Diagnostic::duplicate(&current, first, location.clone())
                            .with_note("a namespace and a type share this name"),
                    );
                    return;
                };
                if &current == path && !ns.declared_at.contains(location) {
                    ns.declared_at.push(location.clone());
                }
                continue;
            }
            let id = self.model.insert(Declaration {
                path: current.clone(),
                name: segment.clone(),
                location: location.clone(),
                parent: None,
                kind: DeclKind::Namespace(NamespaceDecl {
                    declared_at: vec![location.clone()],
                }),
            });
            self.model.namespace_mut(&current).decl = Some(id);
        }
    }

    /// Members of `owner` other than overloads that share `name` with a new member.
    fn sibling_conflict(&self, owner: DeclId, name: &str, is_method: bool) -> Option<DeclId> {
        self.model.decl(owner).members().iter().copied().find(|&id| {
            let sibling = self.model.decl(id);
            let sibling_is_method = matches!(sibling.kind, DeclKind::Method(_) | DeclKind::Constructor(_));
            sibling.name == name && !(is_method && sibling_is_method)
        })
    }

    fn report_duplicate(&mut self, existing: DeclId, decl: &Declaration, note: Option<&str>) {
        let first = self.model.decl(existing).location.clone();
        let mut diagnostic = Diagnostic::duplicate(&decl.path, first, decl.location.clone());
        if let Some(note) = note {
            diagnostic = diagnostic.with_note(note);
        }
        self.diagnostics.push(diagnostic);
    }

    fn insert_type(&mut self, outline: TypeOutline, parent: Option<DeclId>) {
        let TypeOutline { mut decl, items } = outline;
        if let Some(existing) = self.model.lookup(&decl.path) {
            if let Some(target) = self.merge_partial(existing, &decl) {
                self.insert_items(items, target);
            }
            return;
        }
        if let Some(owner) = parent {
            if let Some(sibling) = self.sibling_conflict(owner, &decl.name, false) {
                self.report_duplicate(sibling, &decl, None);
                return;
            }
        }

        decl.parent = parent;
        let name = decl.name.clone();
        let namespace = decl.path.parent().unwrap_or_default();
        let id = self.model.insert(decl);
        match parent {
            Some(owner) => {
                if let Some(owner_type) = self.model.decl_mut(owner).as_type_mut() {
                    owner_type.members.push(id);
                }
            }
            None => {
                self.model.namespace_mut(&namespace).types.insert(name, id);
            }
        }
        self.insert_items(items, id);
    }

    /// Fold a further part of a partial type into `existing`; returns the id to add its members to.
    fn merge_partial(&mut self, existing: DeclId, part: &Declaration) -> Option<DeclId> {
        let current = self.model.decl(existing);
        let same_kind = matches!(
            (&current.kind, &part.kind),
            (DeclKind::Class(_), DeclKind::Class(_)) | (DeclKind::Interface(_), DeclKind::Interface(_))
        );
        let (Some(current_type), Some(part_type)) = (current.as_type(), part.as_type()) else {
            self.report_duplicate(existing, part, None);
            return None;
        };
        if !same_kind {
            self.report_duplicate(existing, part, None);
            return None;
        }
        if !current_type.is_partial() || !part_type.is_partial() {
            self.report_duplicate(existing, part, Some("every part of a partial type must be marked `partial`"));
            return None;
        }
        if current_type.generics != part_type.generics {
            self.report_duplicate(existing, part, Some("partial declarations disagree on generic parameters"));
            return None;
        }

        let part_type = part_type.clone();
        let target = self.model.decl_mut(existing).as_type_mut()?;
        for modifier in part_type.modifiers.iter() {
            target.modifiers.push(modifier);
        }
        for attribute in part_type.attributes {
            if !target.attributes.contains(&attribute) {
                target.attributes.push(attribute);
            }
        }
        for base in part_type.bases {
            if !target.bases.iter().any(|b| b.written() == base.written()) {
                target.bases.push(base);
            }
        }
        target.parts.extend(part_type.parts);
        Some(existing)
    }

    fn insert_items(&mut self, items: Vec<OutlineItem>, owner: DeclId) {
        for item in items {
            match item {
                OutlineItem::Type(nested) => self.insert_type(nested, Some(owner)),
                OutlineItem::Member(member) => self.insert_member(member, owner),
            }
        }
    }

    fn insert_member(&mut self, mut member: Declaration, owner: DeclId) {
        if let Some(existing) = self.model.lookup(&member.path) {
            self.report_duplicate(existing, &member, None);
            return;
        }
        let is_method = matches!(member.kind, DeclKind::Method(_) | DeclKind::Constructor(_));
        if let Some(sibling) = self.sibling_conflict(owner, &member.name, is_method) {
            self.report_duplicate(sibling, &member, None);
            return;
        }
        if matches!(member.kind, DeclKind::Constructor(_)) && self.model.decl(owner).is_type() {
            let owner_static = self
                .model
                .decl(owner)
                .modifiers()
                .is_some_and(|m| m.has(ModifierId::Static));
            if owner_static {
                self.diagnostics.push(Diagnostic::structural(
                    "static classes cannot declare constructors",
                    member.location.clone(),
                ));
                return;
            }
        }
        member.parent = Some(owner);
        let id = self.model.insert(member);
        if let Some(owner_type) = self.model.decl_mut(owner).as_type_mut() {
            owner_type.members.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use gdunsharp_syntax::parser::parse;

    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::frontend::outline::build_outline;

    fn outline(path: &str, source: &str) -> FileOutline {
        build_outline(&parse(path, source).unwrap(), &QualifiedPath::root())
    }

    #[test]
    fn merges_files_into_one_namespace_tree() {
        let model = merge(vec![
            outline("B.cs", "namespace NamespaceA { class Bar {} }"),
            outline("A.cs", "namespace NamespaceA { class Foo { Bar bar; } }"),
        ])
        .unwrap();
        let ns = model.namespace(&QualifiedPath::parse("NamespaceA")).unwrap();
        assert_eq!(ns.types.keys().collect::<Vec<_>>(), vec!["Bar", "Foo"]);
        let foo = model.lookup(&QualifiedPath::parse("NamespaceA.Foo")).unwrap();
        let field = model.lookup(&QualifiedPath::parse("NamespaceA.Foo.bar")).unwrap();
        assert_eq!(model.decl(field).parent, Some(foo));
        assert_eq!(model.decl(foo).members(), [field]);
    }

    #[test]
    fn duplicate_types_name_both_locations() {
        let errors = merge(vec![
            outline("A.cs", "namespace N { class Foo {} }"),
            outline("B.cs", "namespace N { class Foo {} }"),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        let error = errors.first().unwrap();
        assert_eq!(error.kind, DiagnosticKind::DuplicateDeclaration);
        assert_eq!(error.location.file.to_str(), Some("B.cs"));
        assert_eq!(error.related[0].file.to_str(), Some("A.cs"));
    }

    #[test]
    fn partial_parts_merge_in_file_order() {
        let model = merge(vec![
            outline("b/Player.Signals.cs", "namespace G { partial class Player { int b; } }"),
            outline("a/Player.cs", "namespace G { public partial class Player : Node { int a; } }"),
        ])
        .unwrap();
        let player = model.lookup(&QualifiedPath::parse("G.Player")).unwrap();
        let names: Vec<&str> = model
            .decl(player)
            .members()
            .iter()
            .map(|&id| model.decl(id).name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        let ty = model.decl(player).as_type().unwrap();
        assert_eq!(ty.parts.len(), 2);
        assert_eq!(ty.bases.len(), 1);
    }

    #[test]
    fn partial_mixed_with_non_partial_is_a_duplicate() {
        let errors = merge(vec![
            outline("A.cs", "namespace G { partial class P {} }"),
            outline("B.cs", "namespace G { class P {} }"),
        ])
        .unwrap_err();
        assert_eq!(errors.count(DiagnosticKind::DuplicateDeclaration), 1);
        assert!(errors.first().unwrap().notes.iter().any(|n| n.contains("partial")));
    }

    #[test]
    fn member_collisions() {
        let errors = merge(vec![outline(
            "A.cs",
            "namespace G { class C { int x; void x() {} void M(int a) {} void M(int b) {} void M(string s) {} } }",
        )])
        .unwrap_err();
        assert_eq!(errors.count(DiagnosticKind::DuplicateDeclaration), 2);
    }

    #[test]
    fn namespace_and_type_cannot_share_a_name() {
        let errors = merge(vec![
            outline("A.cs", "namespace G { class Tools {} }"),
            outline("B.cs", "namespace G.Tools { class Hammer {} }"),
        ])
        .unwrap_err();
        assert_eq!(errors.count(DiagnosticKind::DuplicateDeclaration), 1);
    }

    #[test]
    fn outline_diagnostics_fail_the_merge() {
        let errors = merge(vec![outline("A.cs", "namespace G { struct S {} class C {} }")]).unwrap_err();
        assert_eq!(errors.count(DiagnosticKind::StructuralUnsupported), 1);
    }
}
