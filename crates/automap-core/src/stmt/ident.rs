use std::fmt;

/// A SQL identifier (table or column name).
///
/// The stored name is the raw, unquoted text. `Display` renders the quoted
/// form (`"NAME"`), doubling any embedded quote characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident(String);

impl Ident {
    /// Wraps a name that is already known to be a valid identifier.
    pub fn new(name: impl Into<String>) -> Ident {
        Ident(name.into())
    }

    /// Builds an identifier from arbitrary text.
    ///
    /// Every character outside `[A-Za-z0-9_]` becomes `_`, and a leading digit
    /// gets an `_` prefix, so the result never needs more than plain quoting.
    pub fn safe(name: &str) -> Ident {
        let mut ident: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();

        if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
            ident.insert(0, '_');
        }

        Ident(ident)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders the quoted identifier.
    pub fn quoted(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.replace('"', "\"\""))
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Ident::new(value)
    }
}

impl From<&Ident> for Ident {
    fn from(value: &Ident) -> Self {
        value.clone()
    }
}
