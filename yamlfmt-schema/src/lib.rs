//! JSON schema validation for YAML documents, dispatched by path glob.
//!
//! Each [`YamlSchema`] pairs a schema location with a glob. `*` stays inside
//! one path segment and `**` crosses directories. [`YamlSchemas`] resolves
//! the schema that applies to a path and reports [`SchemaError::NoPathMatch`]
//! when none does, which callers treat as "nothing to check".

pub mod error;
mod registry;
mod schema;

pub use error::SchemaError;
pub use registry::YamlSchemas;
pub use schema::YamlSchema;
