//! Emission units: one top-level type and everything nested in it, canonicalized for rendering.
//!
//! Units are derived from the resolved model on every run and never cached. Members keep source declaration order.

use gdunsharp_core::lang::conventions::{
    BACKING_FIELD_PREFIX, ENUM_UNDERLYING_TYPE, GETTER_PREFIX, SETTER_PARAM, SETTER_PREFIX,
};
use gdunsharp_core::lang::cpp_keywords;
use gdunsharp_core::lang::types::PrimitiveTypeId;

use crate::backend::includes::{CLASS_DB_HEADER, IncludeCollector, IncludeSet};
use crate::backend::layout::Layout;
use crate::backend::literals;
use crate::config::TranslatorConfig;
use crate::diagnostics::Diagnostic;
use crate::frontend::classify::{
    self, MemberShape, Mutability, Passing, Storage, TypeKind, TypeShape, Virtuality,
};
use crate::frontend::model::{
    CppType, DeclId, DeclKind, Declaration, GenericOwner, Initializer, Parameter, ProjectModel, SourceType,
    TypeReference,
};
use crate::frontend::type_map::TypeMapper;

/// Shared read-only state for building and rendering units.
#[derive(Clone, Copy)]
pub struct EmitContext<'a> {
    pub model: &'a ProjectModel,
    pub config: &'a TranslatorConfig,
    pub mapper: TypeMapper<'a>,
    pub layout: Layout<'a>,
}

impl<'a> EmitContext<'a> {
    pub fn new(model: &'a ProjectModel, config: &'a TranslatorConfig) -> Self {
        Self {
            model,
            config,
            mapper: TypeMapper::new(model, &config.type_map),
            layout: Layout::new(model, &config.output),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmissionUnit {
    pub top: DeclId,
    /// Keyword-escaped namespace segments, outermost first.
    pub namespace: Vec<String>,
    /// Source file names the type was declared in.
    pub sources: Vec<String>,
    /// Definitions go to an inline artifact included by the header, because the unit contains templates.
    pub inline: bool,
    pub has_engine_class: bool,
    pub root: TypeUnit,
    pub header_path: String,
    /// `.cpp` path, or the inline artifact path when `inline`.
    pub definition_path: String,
    pub header_includes: IncludeSet,
}

#[derive(Debug, Clone)]
pub struct TypeUnit {
    pub id: DeclId,
    pub name: String,
    /// Name relative to the namespace, with template arguments at each templated level (`Outer<T>::Inner`).
    pub qualified: String,
    /// Template parameter lists of every templated level, outermost first, for out-of-class definitions.
    pub templates: Vec<Vec<String>>,
    pub own_params: Vec<String>,
    pub shape: TypeShape,
    pub bases: Vec<String>,
    /// Immediate base passed to `GDCLASS` for engine classes.
    pub gdclass_base: Option<String>,
    pub body: TypeBody,
}

#[derive(Debug, Clone)]
pub enum TypeBody {
    Enum {
        underlying: String,
        enumerators: Vec<(String, Option<String>)>,
    },
    Members(Vec<MemberUnit>),
}

#[derive(Debug, Clone)]
pub enum MemberUnit {
    Field(FieldUnit),
    Property(PropertyUnit),
    Method(MethodUnit),
    Signal(SignalUnit),
    Type(Box<TypeUnit>),
}

#[derive(Debug, Clone)]
pub struct FieldUnit {
    pub name: String,
    pub ty: CppType,
    pub shape: MemberShape,
    /// Target literal; `None` means value-initialization.
    pub init: Option<String>,
    /// Initializer expression the target does not get.
    pub dropped: Option<String>,
    /// A `const` the target can spell `static constexpr`.
    pub constexpr: bool,
    pub export: Option<ExportUnit>,
}

/// Editor registration of a field or property.
#[derive(Debug, Clone)]
pub struct ExportUnit {
    pub property: String,
    pub getter: String,
    /// Empty for read-only properties.
    pub setter: String,
    pub variant: &'static str,
}

#[derive(Debug, Clone)]
pub struct PropertyUnit {
    pub name: String,
    pub ty: CppType,
    pub shape: MemberShape,
    /// Backing field of an auto-property.
    pub backing: Option<String>,
    pub init: Option<String>,
    pub dropped: Option<String>,
    pub getter: Option<AccessorUnit>,
    pub setter: Option<AccessorUnit>,
    /// Accessors are registered with the engine.
    pub bind: bool,
    pub export: Option<ExportUnit>,
}

#[derive(Debug, Clone)]
pub struct AccessorUnit {
    pub name: String,
    pub body: AccessorBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorBody {
    /// Reads or writes the backing field.
    Backing(String),
    /// Source accessor body, carried as a comment.
    Source(String),
    /// Pure virtual; no definition.
    Pure,
}

#[derive(Debug, Clone)]
pub struct MethodUnit {
    pub name: String,
    pub return_type: CppType,
    pub params: Vec<ParamUnit>,
    pub own_params: Vec<String>,
    pub shape: MemberShape,
    pub body: Option<String>,
    pub bind: bool,
}

impl MethodUnit {
    pub fn is_constructor(&self) -> bool {
        self.shape.kind == classify::MemberKind::Constructor
    }
}

#[derive(Debug, Clone)]
pub struct ParamUnit {
    pub name: String,
    pub ty: CppType,
    pub by_ref: bool,
    pub default: Option<String>,
}

impl ParamUnit {
    /// `T name`, or `T &name` for by-reference parameters.
    pub fn declare(&self) -> String {
        if self.by_ref {
            CppType::new(format!("{} &", self.ty)).declare(&self.name)
        } else {
            self.ty.declare(&self.name)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignalUnit {
    pub name: String,
    pub params: Vec<SignalParam>,
}

#[derive(Debug, Clone)]
pub struct SignalParam {
    pub name: String,
    pub ty: CppType,
    /// `godot::Variant` type tag, e.g. `INT`.
    pub variant: &'static str,
}

fn target(reference: &TypeReference) -> Result<CppType, Diagnostic> {
    reference.target().cloned().ok_or_else(|| {
        Diagnostic::unresolved(reference.written(), &[], reference.location().clone())
            .with_note("internal error: an unresolved reference reached emission")
    })
}

fn initializer(init: &Initializer) -> (Option<String>, Option<String>) {
    match init {
        Initializer::None => (None, None),
        Initializer::Literal(text) => (literals::literal(text), None),
        Initializer::Dropped(text) => (None, Some(text.clone())),
    }
}

/// Build the unit for a top-level type.
pub fn build_unit(ctx: &EmitContext<'_>, top: DeclId) -> Result<EmissionUnit, Diagnostic> {
    let builder = UnitBuilder { ctx };
    let root = builder.type_unit(top, &[], None)?;
    let inline = uses_templates(ctx.model, top);
    let has_engine_class = any_engine_class(&root);

    let mut collector = IncludeCollector::new(ctx.model, &ctx.config.type_map, ctx.layout, top);
    collector.declaration(top);
    let mut header_includes = collector.finish();
    if inline && has_engine_class {
        header_includes.system(CLASS_DB_HEADER);
    }

    let decl = ctx.model.decl(top);
    let locations = match decl.as_type() {
        Some(ty) if !ty.parts.is_empty() => ty.parts.clone(),
        _ => vec![decl.location.clone()],
    };
    let mut sources: Vec<String> = locations
        .iter()
        .map(|l| {
            l.file()
                .file_name()
                .map_or_else(|| l.file().display().to_string(), |n| n.to_string_lossy().into_owned())
        })
        .collect();
    sources.sort();
    sources.dedup();

    Ok(EmissionUnit {
        top,
        namespace: ctx
            .model
            .namespace_of(top)
            .segments()
            .iter()
            .map(|s| cpp_keywords::escape(s))
            .collect(),
        sources,
        inline,
        has_engine_class,
        root,
        header_path: ctx.layout.header(top),
        definition_path: if inline {
            ctx.layout.inline(top)
        } else {
            ctx.layout.source(top)
        },
        header_includes,
    })
}

fn uses_templates(model: &ProjectModel, id: DeclId) -> bool {
    let decl = model.decl(id);
    let templated = match &decl.kind {
        DeclKind::Class(_) | DeclKind::Interface(_) | DeclKind::Method(_) => !decl.generics().is_empty(),
        _ => false,
    };
    templated || decl.members().iter().any(|&m| uses_templates(model, m))
}

fn any_engine_class(unit: &TypeUnit) -> bool {
    unit.shape.is_engine_class()
        || match &unit.body {
            TypeBody::Members(members) => members.iter().any(|m| match m {
                MemberUnit::Type(nested) => any_engine_class(nested),
                _ => false,
            }),
            TypeBody::Enum { .. } => false,
        }
}

struct UnitBuilder<'c, 'a> {
    ctx: &'c EmitContext<'a>,
}

impl UnitBuilder<'_, '_> {
    fn type_unit(&self, id: DeclId, outer: &[Vec<String>], parent: Option<&str>) -> Result<TypeUnit, Diagnostic> {
        let model = self.ctx.model;
        let decl = model.decl(id);
        let shape = classify::classify_type(model, id);
        let depth = model.type_chain(id).len() - 1;
        let own_params: Vec<String> = decl
            .generic_scope()
            .map(|s| s.own(GenericOwner::Type { depth }).map(|p| p.emitted.clone()).collect())
            .unwrap_or_default();
        let name = cpp_keywords::escape(&decl.name);
        let spelled = if own_params.is_empty() {
            name.clone()
        } else {
            format!("{name}<{}>", own_params.join(", "))
        };
        let qualified = match parent {
            Some(parent) => format!("{parent}::{spelled}"),
            None => spelled,
        };
        let mut templates = outer.to_vec();
        if !own_params.is_empty() {
            templates.push(own_params.clone());
        }

        let bases = match decl.as_type() {
            Some(ty) => ty.bases.iter().map(|b| target(b).map(|t| t.0)).collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let gdclass_base = if shape.is_engine_class() { bases.first().cloned() } else { None };

        let body = match &decl.kind {
            DeclKind::Enum(e) => TypeBody::Enum {
                underlying: match &e.underlying {
                    Some(underlying) => target(underlying)?.0,
                    None => ENUM_UNDERLYING_TYPE.to_string(),
                },
                enumerators: e
                    .members
                    .iter()
                    .map(|m| {
                        (
                            cpp_keywords::escape(&m.name),
                            m.value.as_deref().map(literals::constant_expression),
                        )
                    })
                    .collect(),
            },
            _ => {
                let mut members = Vec::with_capacity(decl.members().len());
                for &member in decl.members() {
                    members.push(self.member(member, &templates, &qualified)?);
                }
                TypeBody::Members(members)
            }
        };

        Ok(TypeUnit {
            id,
            name,
            qualified,
            templates,
            own_params,
            shape,
            bases,
            gdclass_base,
            body,
        })
    }

    fn member(&self, id: DeclId, templates: &[Vec<String>], qualified: &str) -> Result<MemberUnit, Diagnostic> {
        let model = self.ctx.model;
        let decl = model.decl(id);
        if decl.is_type() {
            return Ok(MemberUnit::Type(Box::new(self.type_unit(id, templates, Some(qualified))?)));
        }
        let Some(shape) = classify::classify_member(model, id) else {
            return Err(self.unexpected(decl));
        };
        Ok(match &decl.kind {
            DeclKind::Field(field) => {
                let (init, dropped) = initializer(&field.initializer);
                let constexpr = shape.mutability == Mutability::Constant && self.constexpr_type(&field.ty);
                let export = if shape.exported {
                    self.export(&decl.name, &field.ty, true)
                } else {
                    None
                };
                MemberUnit::Field(FieldUnit {
                    name: shape.emitted_name.clone(),
                    ty: target(&field.ty)?,
                    shape,
                    init,
                    dropped,
                    constexpr,
                    export,
                })
            }
            DeclKind::Property(property) => {
                let pure = shape.virtuality == Virtuality::Pure;
                let auto = property.is_auto() && !pure;
                let backing = auto.then(|| format!("{BACKING_FIELD_PREFIX}{}", decl.name));
                let accessor = |prefix: &str, body: &Option<String>, backing_body: String| AccessorUnit {
                    name: format!("{prefix}{}", decl.name),
                    body: match (pure, body) {
                        (true, _) => AccessorBody::Pure,
                        (false, Some(source)) => AccessorBody::Source(source.clone()),
                        (false, None) => AccessorBody::Backing(backing_body),
                    },
                };
                let field = backing.clone().unwrap_or_default();
                let getter = property
                    .getter
                    .as_ref()
                    .map(|g| accessor(GETTER_PREFIX, &g.body, format!("return {field};")));
                let setter = property.setter.as_ref().map(|s| {
                    accessor(
                        SETTER_PREFIX,
                        &s.body,
                        format!("{field} = {SETTER_PARAM};"),
                    )
                });
                let (init, dropped) = initializer(&property.initializer);
                let in_engine_class = decl
                    .parent
                    .is_some_and(|p| classify::classify_type(model, p).is_engine_class());
                let bind = in_engine_class
                    && shape.storage == Storage::Instance
                    && property.ty.source().is_some_and(|s| self.ctx.mapper.variant_type(s).is_some());
                let export = if shape.exported {
                    self.export(&decl.name, &property.ty, setter.is_some())
                } else {
                    None
                };
                MemberUnit::Property(PropertyUnit {
                    name: decl.name.clone(),
                    ty: target(&property.ty)?,
                    shape,
                    backing,
                    init,
                    dropped,
                    getter,
                    setter,
                    bind,
                    export,
                })
            }
            DeclKind::Method(method) | DeclKind::Constructor(method) => {
                let own_params = method
                    .generic_scope
                    .own(GenericOwner::Method)
                    .map(|p| p.emitted.clone())
                    .collect();
                MemberUnit::Method(MethodUnit {
                    name: shape.emitted_name.clone(),
                    return_type: target(&method.return_type)?,
                    params: self.params(&method.params)?,
                    own_params,
                    body: method.body.clone(),
                    bind: classify::is_bindable(&self.ctx.mapper, model, id),
                    shape,
                })
            }
            DeclKind::Signal(signal) => MemberUnit::Signal(SignalUnit {
                name: decl.name.clone(),
                params: signal
                    .params
                    .iter()
                    .map(|p| {
                        let variant = p.ty.source().and_then(|s| self.ctx.mapper.variant_type(s));
                        Ok(SignalParam {
                            name: p.name.clone(),
                            ty: target(&p.ty)?,
                            variant: variant.unwrap_or("NIL"),
                        })
                    })
                    .collect::<Result<_, Diagnostic>>()?,
            }),
            _ => return Err(self.unexpected(decl)),
        })
    }

    fn params(&self, params: &[Parameter]) -> Result<Vec<ParamUnit>, Diagnostic> {
        params
            .iter()
            .map(|p| {
                Ok(ParamUnit {
                    name: cpp_keywords::escape(&p.name),
                    ty: target(&p.ty)?,
                    by_ref: classify::passing(p) == Passing::ByReference,
                    default: p
                        .default
                        .as_deref()
                        .map(|d| literals::literal(d).unwrap_or_else(|| "{}".to_string())),
                })
            })
            .collect()
    }

    /// Integral, floating, boolean, character and enum constants can be `constexpr`.
    fn constexpr_type(&self, ty: &TypeReference) -> bool {
        match ty.source() {
            Some(SourceType::Primitive(id)) => !matches!(id, PrimitiveTypeId::String | PrimitiveTypeId::Object),
            Some(declared @ SourceType::Declared { .. }) => declared
                .declared_id()
                .is_some_and(|id| matches!(self.ctx.model.decl(id).kind, DeclKind::Enum(_))),
            _ => false,
        }
    }

    fn export(&self, name: &str, ty: &TypeReference, writable: bool) -> Option<ExportUnit> {
        let variant = self.ctx.mapper.variant_type(ty.source()?)?;
        Some(ExportUnit {
            property: name.to_string(),
            getter: format!("{GETTER_PREFIX}{name}"),
            setter: if writable {
                format!("{SETTER_PREFIX}{name}")
            } else {
                String::new()
            },
            variant,
        })
    }

    fn unexpected(&self, decl: &Declaration) -> Diagnostic {
        Diagnostic::structural(
            format!("{} `{}` cannot appear inside a type", decl.kind_name(), decl.name),
            decl.location.clone(),
        )
    }
}

/// Whether a type unit is an interface (rendered as an abstract class with a virtual destructor).
pub fn is_interface(unit: &TypeUnit) -> bool {
    unit.shape.kind == TypeKind::Interface
}
