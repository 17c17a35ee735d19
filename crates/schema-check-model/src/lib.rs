//! Database schema types for schema-check.
//!
//! These are the passive structures a schema is read into before it is
//! compared: a [`Schema`] holds [`Table`]s by name, and each table carries its
//! columns, primary-key column list, indexes and foreign keys.
//!
//! Names are expected to be unique within their owning sequence (columns of a
//! table, indexes of a table, and so on). Nothing here enforces that.

use indexmap::IndexMap;
use std::fmt;

/// A database column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Textual type name as reported by the database (e.g. `integer`,
    /// `character varying`)
    pub data_type: String,
    /// Whether the column allows NULL
    pub nullable: bool,
    /// Raw default expression, if any
    pub default: Option<String>,
    /// Whether the database generates values for this column
    pub is_identity: bool,
}

impl Column {
    /// A non-nullable column without default or identity.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: false,
            default: None,
            is_identity: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self
    }

    /// The default expression, with an empty string treated as no default.
    pub fn default_expr(&self) -> Option<&str> {
        self.default.as_deref().filter(|d| !d.is_empty())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.data_type)?;

        let mut attrs = Vec::new();
        if !self.nullable {
            attrs.push("NOT NULL".to_string());
        }
        if self.is_identity {
            attrs.push("IDENTITY".to_string());
        }
        if let Some(default) = self.default_expr() {
            attrs.push(format!("DEFAULT {}", default));
        }
        if !attrs.is_empty() {
            write!(f, " [{}]", attrs.join(", "))?;
        }
        Ok(())
    }
}

/// A database index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name
    pub name: String,
    /// Key columns, in index key order
    pub columns: Vec<String>,
    /// Whether this is a unique index
    pub unique: bool,
}

impl Index {
    /// A non-unique index over `columns`.
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unique = if self.unique { "UNIQUE " } else { "" };
        write!(
            f,
            "{}INDEX {} ({})",
            unique,
            self.name,
            self.columns.join(", ")
        )
    }
}

/// A foreign key constraint.
///
/// `columns[i]` references `referenced_columns[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name
    pub name: String,
    /// Column(s) in this table
    pub columns: Vec<String>,
    /// Referenced table
    pub referenced_table: String,
    /// Referenced column(s)
    pub referenced_columns: Vec<String>,
}

impl ForeignKey {
    pub fn new<I, J, S, T>(
        name: impl Into<String>,
        columns: I,
        referenced_table: impl Into<String>,
        referenced_columns: J,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            referenced_table: referenced_table.into(),
            referenced_columns: referenced_columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FOREIGN KEY {} ({}) -> {}({})",
            self.name,
            self.columns.join(", "),
            self.referenced_table,
            self.referenced_columns.join(", ")
        )
    }
}

/// A database table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Columns, in declaration order
    pub columns: Vec<Column>,
    /// Primary key column names, in key ordinal order
    pub primary_key: Vec<String>,
    /// Indexes
    pub indexes: Vec<Index>,
    /// Foreign keys
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// An empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} columns)", self.name, self.columns.len())?;
        for col in &self.columns {
            writeln!(f, "    {}", col)?;
        }
        if !self.primary_key.is_empty() {
            writeln!(f, "    PRIMARY KEY ({})", self.primary_key.join(", "))?;
        }
        for idx in &self.indexes {
            writeln!(f, "    {}", idx)?;
        }
        for fk in &self.foreign_keys {
            writeln!(f, "    {}", fk)?;
        }
        Ok(())
    }
}

/// A complete database schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    /// Tables in the schema, indexed by name
    pub tables: IndexMap<String, Table>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, keyed by its name.
    ///
    /// Returns the table previously stored under that name, if any.
    pub fn insert_table(&mut self, table: Table) -> Option<Table> {
        self.tables.insert(table.name.clone(), table)
    }

    /// Get a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Iterate over all tables.
    pub fn iter_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<Table> for Schema {
    fn from_iter<T: IntoIterator<Item = Table>>(iter: T) -> Self {
        let mut schema = Schema::new();
        for table in iter {
            schema.insert_table(table);
        }
        schema
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schema ({} tables):", self.tables.len())?;
        for table in self.iter_tables() {
            writeln!(f)?;
            write!(f, "  {}", table)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
