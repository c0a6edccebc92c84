use crate::{SchemaError, YamlSchema};
use tracing::debug;

/// The configured schemas of one run.
///
/// When several globs cover the same path the first configured schema
/// decides. Overlapping globs are best avoided in configuration.
#[derive(Debug, Default)]
pub struct YamlSchemas(Vec<YamlSchema>);

impl YamlSchemas {
    /// Build a registry, dropping repeated `(url, match)` pairs.
    pub fn new(schemas: impl IntoIterator<Item = YamlSchema>) -> Self {
        let mut out: Vec<YamlSchema> = Vec::new();
        for schema in schemas {
            let duplicate = out
                .iter()
                .any(|s| s.url() == schema.url() && s.matches() == schema.matches());
            if duplicate {
                debug!(url = schema.url(), matches = schema.matches(), "dropping duplicate schema");
                continue;
            }
            out.push(schema);
        }
        Self(out)
    }

    pub fn from_pairs<U, M>(pairs: impl IntoIterator<Item = (U, M)>) -> Self
    where
        U: Into<String>,
        M: Into<String>,
    {
        Self::new(pairs.into_iter().map(|(url, matches)| YamlSchema::new(url, matches)))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YamlSchema> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Outcome of the first schema whose glob covers `path`.
    ///
    /// [`SchemaError::NoPathMatch`] when none does.
    pub fn validate(&self, path: &str, data: &[u8]) -> Result<(), SchemaError> {
        for schema in &self.0 {
            match schema.validate(path, data) {
                Err(SchemaError::NoPathMatch) => continue,
                outcome => return outcome,
            }
        }
        Err(SchemaError::NoPathMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        let schemas = YamlSchemas::from_pairs([
            ("a.json", "**/*.yaml"),
            ("a.json", "**/*.yaml"),
            ("a.json", "*.yml"),
        ]);
        assert_eq!(schemas.len(), 2);
    }

    #[test]
    fn empty_registry_reports_no_match() {
        let schemas = YamlSchemas::default();
        assert_eq!(
            schemas.validate("x.yaml", b"a: 1\n"),
            Err(SchemaError::NoPathMatch)
        );
    }
}
