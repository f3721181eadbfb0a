//! C++ keyword vocabulary (for codegen identifier escaping).

/// Reserved words and alternative tokens in C++17.
pub const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break", "case", "catch", "char",
    "char16_t", "char32_t", "class", "compl", "const", "constexpr", "const_cast", "continue", "decltype", "default",
    "delete", "do", "double", "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register", "reinterpret_cast", "return",
    "short", "signed", "sizeof", "static", "static_assert", "static_cast", "struct", "switch", "template", "this",
    "thread_local", "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual",
    "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Check whether an identifier is a C++ keyword.
pub fn is_keyword(name: &str) -> bool {
    CPP_KEYWORDS.contains(&name)
}

/// Escape an identifier that would collide with a C++ keyword by appending `_`.
///
/// ## Examples
/// ```rust
/// use gdunsharp_core::lang::cpp_keywords::escape;
///
/// assert_eq!(escape("delete"), "delete_");
/// assert_eq!(escape("health"), "health");
/// ```
pub fn escape(name: &str) -> String {
    if is_keyword(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_escape_with_trailing_underscore() {
        assert_eq!(escape("template"), "template_");
        assert_eq!(escape("Template"), "Template");
    }
}
