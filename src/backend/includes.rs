//! Include derivation.
//!
//! Includes come only from resolved type references actually used by a unit. Project types held through a pointer
//! need only their namespace's forward header, so a unit gets one include per referenced namespace. Bases, nested
//! types and `Ref<>`-held classes need complete types and include the defining header. A forward header is dropped
//! when the defining headers already included cover every pointer reference into its namespace.

use std::collections::BTreeSet;
use std::fmt;

use gdunsharp_core::lang::types::{EngineTypeKind, StructuralRule, primitives};

use crate::backend::layout::Layout;
use crate::config::TypeMapConfig;
use crate::frontend::model::{DeclId, DeclKind, ProjectModel, SourceType};
use crate::frontend::resolve::RefSlot;
use crate::frontend::type_map;

const REF_HEADER: &str = "godot_cpp/classes/ref.hpp";
pub const CLASS_DB_HEADER: &str = "godot_cpp/core/class_db.hpp";
const CSTDINT: &str = "cstdint";

/// One include line. System includes sort before local ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Include {
    System(String),
    Local(String),
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Include::System(path) => write!(f, "#include <{path}>"),
            Include::Local(path) => write!(f, "#include \"{path}\""),
        }
    }
}

/// Deduplicated, sorted includes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeSet(BTreeSet<Include>);

impl IncludeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn system(&mut self, path: impl Into<String>) {
        self.0.insert(Include::System(path.into()));
    }

    pub fn local(&mut self, path: impl Into<String>) {
        self.0.insert(Include::Local(path.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Include> {
        self.0.iter()
    }
}

/// Collects the includes a unit's declarations need.
pub struct IncludeCollector<'a> {
    model: &'a ProjectModel,
    config: &'a TypeMapConfig,
    layout: Layout<'a>,
    top: DeclId,
    includes: IncludeSet,
    /// `(forward header, defining header)` of each project type held through a pointer.
    forwards: Vec<(String, String)>,
}

impl<'a> IncludeCollector<'a> {
    pub fn new(model: &'a ProjectModel, config: &'a TypeMapConfig, layout: Layout<'a>, top: DeclId) -> Self {
        Self {
            model,
            config,
            layout,
            top,
            includes: IncludeSet::new(),
            forwards: Vec::new(),
        }
    }

    pub fn finish(mut self) -> IncludeSet {
        let uncovered: Vec<String> = self
            .forwards
            .iter()
            .filter(|(_, header)| !self.includes.0.contains(&Include::Local(header.clone())))
            .map(|(forward, _)| forward.clone())
            .collect();
        for forward in uncovered {
            self.includes.local(forward);
        }
        self.includes
    }

    pub fn add(&mut self, include: Include) {
        self.includes.0.insert(include);
    }

    /// Every reference held by a type, its members and its nested types.
    pub fn declaration(&mut self, id: DeclId) {
        let model = self.model;
        let decl = model.decl(id);
        if let DeclKind::Enum(e) = &decl.kind {
            if e.underlying.is_none() {
                self.includes.system(CSTDINT);
            }
        }
        for slot in RefSlot::all(decl) {
            let Some(source) = slot.get(decl).and_then(|r| r.source()) else {
                continue;
            };
            if matches!(slot, RefSlot::Base(_)) {
                self.complete(source);
            }
            self.reference(source);
        }
        for &member in decl.members() {
            self.declaration(member);
        }
    }

    fn reference(&mut self, ty: &SourceType) {
        ty.walk(&mut |t| self.single(t));
    }

    fn single(&mut self, ty: &SourceType) {
        match ty {
            SourceType::Primitive(id) => {
                let info = primitives::info_for(*id);
                let default_target = self.config.primitive_target(*id) == info.default_target;
                if let (true, Some(header)) = (default_target, info.header) {
                    self.includes.system(header);
                }
            }
            SourceType::Engine(info) => {
                self.includes.system(info.header);
                if info.kind == EngineTypeKind::RefCounted {
                    self.includes.system(REF_HEADER);
                }
            }
            SourceType::Container { rule, .. } => {
                if let Some(structural) = rule.structural() {
                    self.includes.system(self.config.template(structural).header.clone());
                }
            }
            SourceType::Array(_) => {
                self.includes
                    .system(self.config.template(StructuralRule::Sequence).header.clone());
            }
            SourceType::Declared { segments } => {
                let Some(id) = ty.declared_id() else {
                    return;
                };
                let ref_held = type_map::engine_base(self.model, id)
                    .is_some_and(|base| base.kind == EngineTypeKind::RefCounted)
                    && matches!(self.model.decl(id).kind, DeclKind::Class(_));
                if ref_held {
                    self.includes.system(REF_HEADER);
                }
                if ref_held || segments.len() > 1 {
                    self.complete(ty);
                } else {
                    let top = self.model.top_level_of(id);
                    if top != self.top {
                        let namespace = self.model.namespace_of(id);
                        self.forwards.push((self.layout.forward(&namespace), self.layout.header(top)));
                    }
                }
            }
            SourceType::Void | SourceType::Nullable(_) | SourceType::GenericParam { .. } => {}
        }
    }

    /// The defining header of a project type, when it is not the unit's own.
    fn complete(&mut self, ty: &SourceType) {
        let Some(id) = ty.declared_id() else {
            return;
        };
        let top = self.model.top_level_of(id);
        if top != self.top {
            self.includes.local(self.layout.header(top));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_includes_sort_first() {
        let mut set = IncludeSet::new();
        set.local("Game/_forward.hpp");
        set.system("godot_cpp/variant/string.hpp");
        set.system("cstdint");
        set.local("Game/_forward.hpp");
        let lines: Vec<String> = set.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "#include <cstdint>",
                "#include <godot_cpp/variant/string.hpp>",
                "#include \"Game/_forward.hpp\"",
            ]
        );
    }
}
