//! Catalog error types

use std::path::PathBuf;

/// Errors raised while loading or validating a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog text is not valid TOML for the catalog schema
    #[error("invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),

    /// Catalog carries no version tag
    #[error("catalog version must not be empty")]
    MissingVersion,

    /// Two entries of one entity type share a natural key
    #[error("duplicate {entity} entry: {key}")]
    DuplicateEntry { entity: &'static str, key: String },

    /// A program names a university the catalog does not seed
    #[error("program '{program}' references unknown university '{university}'")]
    UnknownUniversity { program: String, university: String },

    /// An application or message names a program the catalog does not seed
    #[error("{entity} references unknown program '{program}'")]
    UnknownProgram {
        entity: &'static str,
        program: String,
    },

    /// A message targets an application the catalog does not seed
    #[error("message references unseeded application for '{program}'")]
    UnseededApplication { program: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CatalogError::UnknownUniversity {
            program: "Law".to_string(),
            university: "Nowhere".to_string(),
        };
        assert!(err.to_string().contains("unknown university 'Nowhere'"));
    }
}
