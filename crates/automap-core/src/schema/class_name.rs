use std::{fmt, sync::Arc};

/// Fully qualified class identifier, such as `my.pkg.CustomerOrder`.
///
/// Cheap to clone; segments may be separated by `.` or `::`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName(Arc<str>);

impl ClassName {
    pub fn new(name: impl AsRef<str>) -> ClassName {
        ClassName(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment: `my.pkg.CustomerOrder` -> `CustomerOrder`.
    pub fn simple_name(&self) -> &str {
        let name = &*self.0;
        let start = [name.rfind("::").map(|i| i + 2), name.rfind('.').map(|i| i + 1)]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(0);
        &name[start..]
    }
}

impl fmt::Debug for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassName({})", self.0)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassName {
    fn from(value: &str) -> Self {
        ClassName::new(value)
    }
}

impl From<&ClassName> for ClassName {
    fn from(value: &ClassName) -> Self {
        value.clone()
    }
}
