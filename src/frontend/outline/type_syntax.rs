//! Parse the text of a C# type into [`TypeSyntax`].
//!
//! Types are small and regular, so they are read from their source text with a recursive-descent parser rather than
//! by walking the several node shapes the grammar uses for them. Shapes outside the dialect are rejected with a
//! message suitable for a structural-unsupported diagnostic.

use crate::frontend::model::{NameSegment, NamedType, TypeSyntax};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    ColonColon,
    Punct(char),
}

fn tokenize(text: &str) -> Result<Vec<Token<'_>>, String> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() {
            i += 1;
        } else if c == '@' || c == '_' || c.is_ascii_alphabetic() {
            let start = if c == '@' { i + 1 } else { i };
            i += 1;
            while i < bytes.len() && (bytes[i] == b'_' || bytes[i].is_ascii_alphanumeric()) {
                i += 1;
            }
            tokens.push(Token::Ident(&text[start..i]));
        } else if text[i..].starts_with("::") {
            tokens.push(Token::ColonColon);
            i += 2;
        } else if ".<>,[]?*()".contains(c) {
            tokens.push(Token::Punct(c));
            i += 1;
        } else {
            return Err(format!("unsupported type syntax `{}`", text.trim()));
        }
    }
    Ok(tokens)
}

struct TypeParser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(&Token::Punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), String> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(format!("expected `{c}` in type"))
        }
    }

    fn ident(&mut self) -> Result<&'a str, String> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = *name;
                self.pos += 1;
                Ok(name)
            }
            _ => Err("expected a type name".to_string()),
        }
    }

    fn parse_type(&mut self) -> Result<TypeSyntax, String> {
        let mut ty = match self.peek() {
            Some(Token::Punct('(')) => return Err("tuple types are not supported".to_string()),
            Some(Token::Ident("ref" | "scoped" | "readonly")) => {
                return Err("ref-like types are not supported".to_string());
            }
            Some(Token::Ident("delegate")) => return Err("function pointer types are not supported".to_string()),
            _ => TypeSyntax::Named(self.parse_named()?),
        };
        loop {
            if self.eat('?') {
                ty = TypeSyntax::Nullable(Box::new(ty));
            } else if self.eat('[') {
                if self.peek() == Some(&Token::Punct(',')) {
                    return Err("multi-dimensional arrays are not supported".to_string());
                }
                self.expect(']')?;
                ty = TypeSyntax::Array(Box::new(ty));
            } else if self.eat('*') {
                return Err("pointer types are not supported".to_string());
            } else {
                return Ok(ty);
            }
        }
    }

    fn parse_named(&mut self) -> Result<NamedType, String> {
        let mut global = false;
        if let (Some(Token::Ident(first)), Some(Token::ColonColon)) = (self.peek(), self.tokens.get(self.pos + 1)) {
            if *first != "global" {
                return Err("namespace alias qualifiers are not supported".to_string());
            }
            global = true;
            self.pos += 2;
        }
        let mut segments = vec![self.parse_segment()?];
        while self.eat('.') {
            segments.push(self.parse_segment()?);
        }
        Ok(NamedType { global, segments })
    }

    fn parse_segment(&mut self) -> Result<NameSegment, String> {
        let name = self.ident()?.to_string();
        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                if self.eat('>') {
                    break;
                }
                self.expect(',')?;
            }
        }
        Ok(NameSegment { name, args })
    }
}

/// Parse a type as written in source.
///
/// ## Errors
///
/// A message naming the unsupported shape: tuples, pointers, multi-dimensional arrays, ref-like types, function
/// pointers, alias qualifiers, or text that is not a type at all.
pub fn parse_type(text: &str) -> Result<TypeSyntax, String> {
    let mut parser = TypeParser {
        tokens: tokenize(text)?,
        pos: 0,
    };
    let ty = parser.parse_type()?;
    if parser.pos != parser.tokens.len() {
        return Err(format!("unsupported type syntax `{}`", text.trim()));
    }
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generic_qualified_and_suffixed_types() {
        let ty = parse_type("System.Collections.Generic.Dictionary<string, List<int[]>>?").unwrap();
        assert_eq!(ty.to_string(), "System.Collections.Generic.Dictionary<string,List<int[]>>?");
        let TypeSyntax::Nullable(inner) = ty else {
            panic!("expected nullable");
        };
        let TypeSyntax::Named(named) = *inner else {
            panic!("expected named");
        };
        assert_eq!(named.qualifier(), "System.Collections.Generic");
        assert_eq!(named.last().unwrap().args.len(), 2);
    }

    #[test]
    fn global_prefix_and_verbatim_identifiers() {
        let ty = parse_type("global::Game.@event").unwrap();
        assert_eq!(ty.to_string(), "global::Game.event");
    }

    #[test]
    fn jagged_arrays_nest() {
        let ty = parse_type("int[][]").unwrap();
        assert!(matches!(ty, TypeSyntax::Array(ref inner) if matches!(**inner, TypeSyntax::Array(_))));
    }

    #[test]
    fn rejects_out_of_dialect_shapes() {
        assert_eq!(parse_type("(int, string)").unwrap_err(), "tuple types are not supported");
        assert_eq!(parse_type("int*").unwrap_err(), "pointer types are not supported");
        assert_eq!(parse_type("int[,]").unwrap_err(), "multi-dimensional arrays are not supported");
        assert_eq!(parse_type("ref int").unwrap_err(), "ref-like types are not supported");
        assert!(parse_type("Alias::Foo").is_err());
        assert!(parse_type("List<int").is_err());
    }
}
