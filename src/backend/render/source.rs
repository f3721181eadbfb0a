//! Definition artifact: out-of-class member definitions, static data and engine registration.

use gdunsharp_core::lang::conventions::{BIND_METHODS_NAME, ENGINE_CPP_NAMESPACE as GD, SETTER_PARAM};

use super::{banner, body_text, declare_const, param_list, qualifier, template_line};
use crate::backend::cpp_emitter::CppEmitter;
use crate::backend::emission::{
    AccessorBody, AccessorUnit, EmissionUnit, EmitContext, ExportUnit, FieldUnit, MemberUnit, MethodUnit,
    PropertyUnit, SignalUnit, TypeBody, TypeUnit,
};
use crate::backend::includes::CLASS_DB_HEADER;
use crate::frontend::classify::{Mutability, Storage, Virtuality};
use crate::frontend::model::CppType;

/// Definitions of a unit, or `None` when nothing needs an out-of-class definition.
pub(super) fn render(ctx: &EmitContext<'_>, unit: &EmissionUnit) -> Option<String> {
    let mut body = CppEmitter::new();
    DefinitionWriter { inline: unit.inline }.type_unit(&mut body, &unit.root);
    let body = body.finish();
    if body.is_empty() {
        return None;
    }

    let mut e = CppEmitter::new();
    banner(&mut e, ctx, &unit.sources);
    if !unit.inline {
        if ctx.config.output.banner {
            e.blank_line();
        }
        e.linef(format_args!("#include \"{}\"", unit.header_path));
        if unit.has_engine_class {
            e.blank_line();
            e.linef(format_args!("#include <{CLASS_DB_HEADER}>"));
        }
    }
    e.separate();
    e.open_namespaces(&unit.namespace);
    for line in body.lines() {
        e.line(line);
    }
    e.close_namespaces(&unit.namespace);
    Some(e.finish())
}

struct DefinitionWriter {
    inline: bool,
}

impl DefinitionWriter {
    fn type_unit(&self, e: &mut CppEmitter, ty: &TypeUnit) {
        let TypeBody::Members(members) = &ty.body else {
            return;
        };
        if ty.gdclass_base.is_some() {
            self.bind_methods(e, ty, members);
        }
        for member in members {
            match member {
                MemberUnit::Field(field) => self.field(e, ty, field),
                MemberUnit::Property(property) => self.property(e, ty, property),
                MemberUnit::Method(method) => self.method(e, ty, method),
                MemberUnit::Type(nested) => self.type_unit(e, nested),
                MemberUnit::Signal(_) => {}
            }
        }
    }

    /// Template lines for a member of `ty`, or `inline` for header-resident definitions that are not templates.
    fn open(&self, e: &mut CppEmitter, ty: &TypeUnit, own: &[String]) -> &'static str {
        e.separate();
        for params in ty.templates.iter().map(Vec::as_slice).chain((!own.is_empty()).then_some(own)) {
            e.line(&template_line(params));
        }
        if self.inline && ty.templates.is_empty() && own.is_empty() {
            "inline "
        } else {
            ""
        }
    }

    fn bind_methods(&self, e: &mut CppEmitter, ty: &TypeUnit, members: &[MemberUnit]) {
        let inline = self.open(e, ty, &[]);
        let class = &ty.qualified;
        let mut lines = Vec::new();
        for member in members {
            match member {
                MemberUnit::Field(FieldUnit {
                    export: Some(export), ..
                }) => {
                    bind_accessors(&mut lines, class, export);
                    lines.push(add_property(export));
                }
                MemberUnit::Property(property) if property.bind => {
                    if let Some(getter) = &property.getter {
                        lines.push(bind(class, &getter.name, &[]));
                    }
                    if let Some(setter) = &property.setter {
                        lines.push(bind(class, &setter.name, &[SETTER_PARAM]));
                    }
                    if let Some(export) = &property.export {
                        lines.push(add_property(export));
                    }
                }
                MemberUnit::Method(method) if method.bind => {
                    let params: Vec<&str> = method.params.iter().map(|p| p.name.as_str()).collect();
                    lines.push(bind(class, &method.name, &params));
                }
                MemberUnit::Signal(signal) => lines.push(add_signal(signal)),
                _ => {}
            }
        }
        let head = format!("{inline}void {class}::{BIND_METHODS_NAME}()");
        if lines.is_empty() {
            e.linef(format_args!("{head} {{}}"));
        } else {
            e.block(&head, |e| lines.iter().for_each(|l| e.line(l)));
        }
    }

    fn field(&self, e: &mut CppEmitter, ty: &TypeUnit, field: &FieldUnit) {
        if field.shape.storage == Storage::Static && !field.constexpr && !self.inline {
            let immutable = field.shape.mutability != Mutability::Mutable;
            self.static_definition(e, ty, &field.ty, &field.name, immutable, &field.init);
        }
        if let Some(export) = &field.export {
            let getter = AccessorUnit {
                name: export.getter.clone(),
                body: AccessorBody::Backing(format!("return {};", field.name)),
            };
            self.getter(e, ty, &field.ty, &getter, false);
            if !export.setter.is_empty() {
                let setter = AccessorUnit {
                    name: export.setter.clone(),
                    body: AccessorBody::Backing(format!("{} = {SETTER_PARAM};", field.name)),
                };
                self.setter(e, ty, &field.ty, &setter);
            }
        }
    }

    fn static_definition(
        &self,
        e: &mut CppEmitter,
        ty: &TypeUnit,
        cpp: &CppType,
        name: &str,
        immutable: bool,
        init: &Option<String>,
    ) {
        let inline = self.open(e, ty, &[]);
        let qualified = format!("{}{name}", qualifier(ty));
        let declarator = if immutable {
            declare_const(cpp, &qualified)
        } else {
            cpp.declare(&qualified)
        };
        match init {
            Some(value) => e.linef(format_args!("{inline}{declarator} = {value};")),
            None => e.linef(format_args!("{inline}{declarator}{{}};")),
        }
    }

    fn property(&self, e: &mut CppEmitter, ty: &TypeUnit, property: &PropertyUnit) {
        let static_ = property.shape.storage == Storage::Static;
        if let (Some(backing), true, false) = (&property.backing, static_, self.inline) {
            self.static_definition(e, ty, &property.ty, backing, false, &property.init);
        }
        if let Some(getter) = &property.getter {
            self.getter(e, ty, &property.ty, getter, static_);
        }
        if let Some(setter) = &property.setter {
            self.setter(e, ty, &property.ty, setter);
        }
    }

    fn getter(&self, e: &mut CppEmitter, ty: &TypeUnit, cpp: &CppType, getter: &AccessorUnit, static_: bool) {
        if getter.body == AccessorBody::Pure {
            return;
        }
        let inline = self.open(e, ty, &[]);
        let constness = if static_ { "" } else { " const" };
        let head = format!(
            "{inline}{}{constness}",
            cpp.declare(&format!("{}{}()", qualifier(ty), getter.name))
        );
        accessor_body(e, &head, &getter.body, true);
    }

    fn setter(&self, e: &mut CppEmitter, ty: &TypeUnit, cpp: &CppType, setter: &AccessorUnit) {
        if setter.body == AccessorBody::Pure {
            return;
        }
        let inline = self.open(e, ty, &[]);
        let head = format!(
            "{inline}void {}{}({})",
            qualifier(ty),
            setter.name,
            cpp.declare(SETTER_PARAM)
        );
        accessor_body(e, &head, &setter.body, false);
    }

    fn method(&self, e: &mut CppEmitter, ty: &TypeUnit, method: &MethodUnit) {
        if method.shape.virtuality == Virtuality::Pure {
            return;
        }
        let inline = self.open(e, ty, &method.own_params);
        let params = param_list(&method.params, false);
        let signature = format!("{}{}({params})", qualifier(ty), method.name);
        let head = if method.is_constructor() {
            format!("{inline}{signature}")
        } else {
            format!("{inline}{}", method.return_type.declare(&signature))
        };
        let comment = method.body.as_deref().map(body_text).unwrap_or_default();
        let returns = !method.is_constructor() && !method.return_type.is_void();
        if comment.is_empty() && !returns {
            e.linef(format_args!("{head} {{}}"));
            return;
        }
        e.block(&head, |e| {
            e.comment(&comment);
            if returns {
                e.line("return {};");
            }
        });
    }
}

fn accessor_body(e: &mut CppEmitter, head: &str, body: &AccessorBody, returns: bool) {
    e.block(head, |e| match body {
        AccessorBody::Backing(statement) => e.line(statement),
        AccessorBody::Source(source) => {
            e.comment(&body_text(source));
            if returns {
                e.line("return {};");
            }
        }
        AccessorBody::Pure => {}
    });
}

fn bind(class: &str, method: &str, params: &[&str]) -> String {
    let names: String = std::iter::once(method)
        .chain(params.iter().copied())
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{GD}::ClassDB::bind_method({GD}::D_METHOD({names}), &{class}::{method});")
}

fn bind_accessors(lines: &mut Vec<String>, class: &str, export: &ExportUnit) {
    lines.push(bind(class, &export.getter, &[]));
    if !export.setter.is_empty() {
        lines.push(bind(class, &export.setter, &[SETTER_PARAM]));
    }
}

fn add_property(export: &ExportUnit) -> String {
    format!(
        "ADD_PROPERTY({GD}::PropertyInfo({GD}::Variant::{}, \"{}\"), \"{}\", \"{}\");",
        export.variant, export.property, export.setter, export.getter
    )
}

fn add_signal(signal: &SignalUnit) -> String {
    let mut args = vec![format!("\"{}\"", signal.name)];
    args.extend(
        signal
            .params
            .iter()
            .map(|p| format!("{GD}::PropertyInfo({GD}::Variant::{}, \"{}\")", p.variant, p.name)),
    );
    format!("ADD_SIGNAL({GD}::MethodInfo({}));", args.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_lines() {
        assert_eq!(
            bind("Player", "Jump", &["height"]),
            "godot::ClassDB::bind_method(godot::D_METHOD(\"Jump\", \"height\"), &Player::Jump);"
        );
        let export = ExportUnit {
            property: "Speed".into(),
            getter: "get_Speed".into(),
            setter: "set_Speed".into(),
            variant: "FLOAT",
        };
        assert_eq!(
            add_property(&export),
            "ADD_PROPERTY(godot::PropertyInfo(godot::Variant::FLOAT, \"Speed\"), \"set_Speed\", \"get_Speed\");"
        );
    }
}
