//! Header artifact: class, interface and enum definitions with member declarations.

use gdunsharp_core::lang::conventions::{BIND_METHODS_NAME, SETTER_PARAM};

use super::{banner, declare_const, param_list, specifiers, template_line};
use crate::backend::cpp_emitter::CppEmitter;
use crate::backend::emission::{
    EmissionUnit, EmitContext, ExportUnit, FieldUnit, MemberUnit, MethodUnit, PropertyUnit, SignalUnit, TypeBody,
    TypeUnit, is_interface,
};
use crate::frontend::classify::{Mutability, Storage, TypeKind};
use crate::frontend::model::CppType;

pub(super) fn render(ctx: &EmitContext<'_>, unit: &EmissionUnit, has_definitions: bool) -> String {
    let mut e = CppEmitter::new();
    banner(&mut e, ctx, &unit.sources);
    e.line("#pragma once");
    if !unit.header_includes.is_empty() {
        e.blank_line();
        for include in unit.header_includes.iter() {
            e.line(&include.to_string());
        }
    }
    e.blank_line();
    e.open_namespaces(&unit.namespace);
    TypeWriter { inline: unit.inline }.type_unit(&mut e, &unit.root);
    e.close_namespaces(&unit.namespace);
    if unit.inline && has_definitions {
        e.blank_line();
        e.linef(format_args!("#include \"{}\"", unit.definition_path));
    }
    e.finish()
}

struct TypeWriter {
    inline: bool,
}

impl TypeWriter {
    fn type_unit(&self, e: &mut CppEmitter, ty: &TypeUnit) {
        match &ty.body {
            TypeBody::Enum {
                underlying,
                enumerators,
            } => {
                e.type_block(&format!("enum class {} : {underlying}", ty.name), |e| {
                    for (name, value) in enumerators {
                        match value {
                            Some(value) => e.linef(format_args!("{name} = {value},")),
                            None => e.linef(format_args!("{name},")),
                        }
                    }
                });
            }
            TypeBody::Members(members) => {
                if !ty.own_params.is_empty() {
                    e.line(&template_line(&ty.own_params));
                }
                e.type_block(&class_head(ty), |e| self.class_body(e, ty, members));
            }
        }
    }

    fn class_body(&self, e: &mut CppEmitter, ty: &TypeUnit, members: &[MemberUnit]) {
        if let Some(base) = &ty.gdclass_base {
            e.linef(format_args!("GDCLASS({}, {base})", ty.name));
            e.blank_line();
            e.label("protected");
            e.linef(format_args!("static void {BIND_METHODS_NAME}();"));
            e.blank_line();
        }
        e.label("public");

        // Nested types come first so every later member can name them.
        let nested: Vec<&TypeUnit> = members
            .iter()
            .filter_map(|m| match m {
                MemberUnit::Type(nested) => Some(nested.as_ref()),
                _ => None,
            })
            .collect();
        let classes = || nested.iter().filter(|n| n.shape.kind != TypeKind::Enum);
        for class in classes() {
            if !class.own_params.is_empty() {
                e.line(&template_line(&class.own_params));
            }
            e.linef(format_args!("class {};", class.name));
        }
        for nested_enum in nested.iter().filter(|n| n.shape.kind == TypeKind::Enum) {
            e.separate();
            self.type_unit(e, nested_enum);
        }
        for class in classes() {
            e.separate();
            self.type_unit(e, class);
        }
        if !nested.is_empty() {
            e.separate();
        }

        if is_interface(ty) {
            e.linef(format_args!("virtual ~{}() = default;", ty.name));
        }
        if ty.shape.is_static {
            e.linef(format_args!("{}() = delete;", ty.name));
        }
        for member in members {
            match member {
                MemberUnit::Field(field) => self.field(e, field),
                MemberUnit::Property(property) => self.property(e, property),
                MemberUnit::Method(method) => self.method(e, method),
                MemberUnit::Signal(signal) => signal_comment(e, signal),
                MemberUnit::Type(_) => {}
            }
        }
    }

    fn field(&self, e: &mut CppEmitter, field: &FieldUnit) {
        if let Some(dropped) = &field.dropped {
            e.linef(format_args!("// initializer: {dropped}"));
        }
        let static_ = field.shape.storage == Storage::Static;
        let immutable = field.shape.mutability != Mutability::Mutable;
        if field.constexpr {
            e.linef(format_args!(
                "static constexpr {}{};",
                field.ty.declare(&field.name),
                initializer(&field.init)
            ));
        } else {
            self.variable(e, &field.ty, &field.name, static_, immutable, &field.init);
        }
        if let Some(export) = &field.export {
            accessor_declarations(e, export, &field.ty, static_);
        }
    }

    /// A data member; static members are `static inline` in units whose definitions live in the header.
    fn variable(
        &self,
        e: &mut CppEmitter,
        ty: &CppType,
        name: &str,
        static_: bool,
        immutable: bool,
        init: &Option<String>,
    ) {
        let declarator = if immutable {
            declare_const(ty, name)
        } else {
            ty.declare(name)
        };
        match (static_, self.inline) {
            (true, true) => e.linef(format_args!("static inline {declarator}{};", initializer(init))),
            (true, false) => e.linef(format_args!("static {declarator};")),
            (false, _) => e.linef(format_args!("{declarator}{};", initializer(init))),
        }
    }

    fn property(&self, e: &mut CppEmitter, property: &PropertyUnit) {
        if let Some(dropped) = &property.dropped {
            e.linef(format_args!("// initializer: {dropped}"));
        }
        let static_ = property.shape.storage == Storage::Static;
        if let Some(backing) = &property.backing {
            self.variable(e, &property.ty, backing, static_, false, &property.init);
        }
        let (prefix, suffix) = specifiers(&property.shape);
        let constness = if static_ { "" } else { " const" };
        if let Some(getter) = &property.getter {
            e.linef(format_args!(
                "{prefix}{}{constness}{suffix};",
                property.ty.declare(&format!("{}()", getter.name))
            ));
        }
        if let Some(setter) = &property.setter {
            e.linef(format_args!(
                "{prefix}void {}({}){suffix};",
                setter.name,
                property.ty.declare(SETTER_PARAM)
            ));
        }
    }

    fn method(&self, e: &mut CppEmitter, method: &MethodUnit) {
        let params = param_list(&method.params, true);
        if method.is_constructor() {
            e.linef(format_args!("{}({params});", method.name));
            return;
        }
        if !method.own_params.is_empty() {
            e.line(&template_line(&method.own_params));
        }
        let (prefix, suffix) = specifiers(&method.shape);
        e.linef(format_args!(
            "{prefix}{}{suffix};",
            method.return_type.declare(&format!("{}({params})", method.name))
        ));
    }
}

fn class_head(ty: &TypeUnit) -> String {
    let mut head = format!("class {}", ty.name);
    if ty.shape.is_final {
        head.push_str(" final");
    }
    if !ty.bases.is_empty() {
        let bases: Vec<String> = ty.bases.iter().map(|b| format!("public {b}")).collect();
        head.push_str(&format!(" : {}", bases.join(", ")));
    }
    head
}

/// ` = value`, or `{}` for value-initialization.
fn initializer(init: &Option<String>) -> String {
    match init {
        Some(value) => format!(" = {value}"),
        None => "{}".to_string(),
    }
}

fn accessor_declarations(e: &mut CppEmitter, export: &ExportUnit, ty: &CppType, static_: bool) {
    let (prefix, constness) = if static_ { ("static ", "") } else { ("", " const") };
    e.linef(format_args!("{prefix}{}{constness};", ty.declare(&format!("{}()", export.getter))));
    if !export.setter.is_empty() {
        e.linef(format_args!("{prefix}void {}({});", export.setter, ty.declare(SETTER_PARAM)));
    }
}

fn signal_comment(e: &mut CppEmitter, signal: &SignalUnit) {
    let params: Vec<String> = signal.params.iter().map(|p| p.ty.declare(&p.name)).collect();
    e.linef(format_args!("// signal {}({})", signal.name, params.join(", ")));
}
