//! Schema script handling.
//!
//! Scripts are plain CQL: statements separated by `;`. There is no support
//! for `;` inside string literals, which the bundled schema never needs.

use scylla::client::session::Session;

use crate::error::ScyllaError;

/// The keyspace and the seven tables the harness reads and writes.
pub const BUNDLED_SCHEMA: &str = include_str!("../schema/schema.cql");

/// Keyspace name written in [`BUNDLED_SCHEMA`].
pub const BUNDLED_KEYSPACE: &str = "social_media";

/// Longest keyspace name the cluster accepts.
const MAX_KEYSPACE_LEN: usize = 48;

/// Whether `name` can be used unquoted as a keyspace name.
#[must_use]
pub fn is_valid_keyspace(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_KEYSPACE_LEN
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The bundled schema with every table created in `keyspace`.
#[must_use]
pub fn bundled_schema(keyspace: &str) -> String {
    BUNDLED_SCHEMA.replace(BUNDLED_KEYSPACE, keyspace)
}

/// Split a script into trimmed, non-empty statements.
#[must_use]
pub fn split_statements(script: &str) -> Vec<&str> {
    script
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .collect()
}

/// Execute every statement of `script` in order.
///
/// Returns the number of statements executed.
///
/// # Errors
///
/// Stops at the first statement the cluster rejects.
pub async fn apply(session: &Session, script: &str) -> Result<usize, ScyllaError> {
    let statements = split_statements(script);
    for (index, statement) in statements.iter().enumerate() {
        let first_line = statement.lines().next().unwrap_or_default();
        tracing::info!(index, statement = first_line, "executing schema statement");
        session.query_unpaged(*statement, ()).await?;
    }
    Ok(statements.len())
}
