use std::collections::HashMap;

/// Registry of error type identifiers and their parent types.
///
/// Configured suppression lists name types, and a list entry matches an
/// error when it names the error's own type or any ancestor. The host
/// registers its error taxonomy once at startup; unregistered types are
/// roots with no ancestors.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    parents: HashMap<String, String>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`TypeHierarchy::register`].
    pub fn with_type(mut self, name: impl Into<String>, parent: impl Into<String>) -> Self {
        self.register(name, parent);
        self
    }

    /// Declare `parent` as the direct supertype of `name`.
    pub fn register(&mut self, name: impl Into<String>, parent: impl Into<String>) {
        self.parents.insert(name.into(), parent.into());
    }

    /// The type itself followed by every ancestor, nearest first.
    pub fn lineage(&self, name: &str) -> Vec<String> {
        let mut lineage = vec![name.to_string()];
        let mut current = name;

        while let Some(parent) = self.parents.get(current) {
            // A misregistered cycle must not hang the error path.
            if lineage.iter().any(|seen| seen == parent) {
                tracing::warn!(type_name = %name, parent = %parent, "Cycle in error type hierarchy");
                break;
            }
            lineage.push(parent.clone());
            current = parent;
        }

        lineage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> TypeHierarchy {
        TypeHierarchy::new()
            .with_type("HttpError", "AppError")
            .with_type("NotFound", "HttpError")
    }

    #[test]
    fn test_lineage_walks_to_root() {
        assert_eq!(
            hierarchy().lineage("NotFound"),
            vec!["NotFound", "HttpError", "AppError"]
        );
    }

    #[test]
    fn test_unregistered_type_is_its_own_lineage() {
        assert_eq!(hierarchy().lineage("RuntimeFailure"), vec!["RuntimeFailure"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let cyclic = TypeHierarchy::new().with_type("A", "B").with_type("B", "A");
        assert_eq!(cyclic.lineage("A"), vec!["A", "B"]);
    }
}
