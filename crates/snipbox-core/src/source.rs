//! Source units: user text plus the pinned language edition.

use std::fmt;

use serde::{Deserialize, Serialize};
use syn::{Item, ReturnType, Type};

/// Rust edition the snippet is compiled with.
///
/// Pinned in configuration, never inferred from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Edition {
    #[serde(rename = "2015")]
    E2015,
    #[serde(rename = "2018")]
    E2018,
    #[default]
    #[serde(rename = "2021")]
    E2021,
    #[serde(rename = "2024")]
    E2024,
}

impl Edition {
    /// The value passed to `rustc --edition`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E2015 => "2015",
            Self::E2018 => "2018",
            Self::E2021 => "2021",
            Self::E2024 => "2024",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Edition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2015" => Ok(Self::E2015),
            "2018" => Ok(Self::E2018),
            "2021" => Ok(Self::E2021),
            "2024" => Ok(Self::E2024),
            other => Err(format!("unknown edition: {other}")),
        }
    }
}

/// Shape of the program's entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPoint {
    /// `fn main()`
    Plain,
    /// `fn main() -> T`, usually a `Result`. An `Err` return is printed by
    /// the runtime as `Error: {err:?}` and exits with status 1.
    Fallible,
}

/// Immutable source text with the edition it will be compiled under.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    text: String,
    edition: Edition,
}

impl SourceUnit {
    pub fn new(text: impl Into<String>, edition: Edition) -> Self {
        Self {
            text: text.into(),
            edition,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn edition(&self) -> Edition {
        self.edition
    }

    /// Whether there is anything to compile at all.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Shape of a top-level `main` declared in the text.
    ///
    /// This only reads the signature. Whether the crate has an entry point
    /// at all is up to rustc: `main` may be imported or macro-generated.
    /// Text that does not parse is assumed to be a program so that rustc
    /// gets to report the syntax errors.
    pub fn entry_point(&self) -> Option<EntryPoint> {
        let file = match syn::parse_file(&self.text) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!("Source does not parse, deferring to rustc: {}", e);
                return Some(EntryPoint::Plain);
            }
        };

        file.items.iter().find_map(|item| match item {
            Item::Fn(func) if func.sig.ident == "main" => Some(match &func.sig.output {
                ReturnType::Default => EntryPoint::Plain,
                ReturnType::Type(_, ty) if is_unit(ty) => EntryPoint::Plain,
                ReturnType::Type(..) => EntryPoint::Fallible,
            }),
            _ => None,
        })
    }
}

fn is_unit(ty: &Type) -> bool {
    match ty {
        Type::Tuple(tuple) => tuple.elems.is_empty(),
        Type::Paren(inner) => is_unit(&inner.elem),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(text: &str) -> SourceUnit {
        SourceUnit::new(text, Edition::default())
    }

    #[test]
    fn test_plain_main() {
        let src = unit("fn main() { println!(\"hi\"); }");
        assert_eq!(src.entry_point(), Some(EntryPoint::Plain));
    }

    #[test]
    fn test_explicit_unit_return_is_plain() {
        assert_eq!(unit("fn main() -> () {}").entry_point(), Some(EntryPoint::Plain));
    }

    #[test]
    fn test_fallible_main() {
        let src = unit(
            "fn main() -> Result<(), String> {\n    Err(\"boom\".to_string())\n}",
        );
        assert_eq!(src.entry_point(), Some(EntryPoint::Fallible));
    }

    #[test]
    fn test_no_main() {
        let src = unit("pub fn helper() -> i32 { 1 }\nstruct Main;");
        assert_eq!(src.entry_point(), None);
    }

    #[test]
    fn test_nested_main_does_not_count() {
        let src = unit("mod inner { pub fn main() {} }");
        assert_eq!(src.entry_point(), None);
    }

    #[test]
    fn test_unparseable_defers_to_compiler() {
        assert_eq!(unit("fn main( {").entry_point(), Some(EntryPoint::Plain));
    }

    #[test]
    fn test_blank() {
        assert!(unit("  \n\t").is_blank());
        assert!(!unit("fn main() {}").is_blank());
    }

    #[test]
    fn test_edition_parse() {
        assert_eq!("2024".parse::<Edition>(), Ok(Edition::E2024));
        assert!("2027".parse::<Edition>().is_err());
        assert_eq!(Edition::default().to_string(), "2021");
    }
}
