//! Firebird SQL dialect (Strategy pattern).
//!
//! Firebird has no multi-row `VALUES` list and no bulk-insert protocol, so
//! rows are inserted as `SELECT <literals> FROM RDB$DATABASE` fragments
//! joined by `UNION ALL`, wrapped in an `EXECUTE BLOCK`.

use crate::core::traits::Dialect;

/// Firebird dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct FirebirdDialect;

impl FirebirdDialect {
    /// Create a new Firebird dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for FirebirdDialect {
    fn name(&self) -> &str {
        "firebird"
    }

    fn quote_ident(&self, name: &str) -> String {
        // Dialect 3 delimited identifiers; embedded quotes are doubled
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn single_row_source(&self) -> &str {
        "RDB$DATABASE"
    }

    fn write_binary_literal(&self, out: &mut String, hex: &str) {
        out.reserve(hex.len() + 3);
        out.push_str("X'");
        out.push_str(hex);
        out.push('\'');
    }

    fn wrap_atomic_block(&self, statement: &str) -> String {
        format!("EXECUTE BLOCK AS BEGIN {}; END", statement)
    }

    fn catalog_query(&self, table: &str) -> String {
        let mut table_literal = String::new();
        self.write_string_literal(&mut table_literal, table);

        format!(
            "SELECT R.RDB$FIELD_NAME, F.RDB$FIELD_TYPE, F.RDB$FIELD_LENGTH, \
             CSET.RDB$CHARACTER_SET_NAME \
             FROM RDB$RELATION_FIELDS R \
             LEFT JOIN RDB$FIELDS F ON R.RDB$FIELD_SOURCE = F.RDB$FIELD_NAME \
             LEFT JOIN RDB$CHARACTER_SETS CSET ON F.RDB$CHARACTER_SET_ID = CSET.RDB$CHARACTER_SET_ID \
             WHERE R.RDB$RELATION_NAME = {} \
             ORDER BY R.RDB$FIELD_POSITION",
            table_literal
        )
    }
}
