//! Schema comparison - report every structural difference between a source
//! and a target [`Schema`].
//!
//! Tables, columns, indexes and foreign keys are matched purely by name.
//! Primary keys, index column lists and foreign-key column lists are compared
//! position by position: `(a, b)` and `(b, a)` are different.
//!
//! ## Ordering
//!
//! Differences are emitted in a fixed order so that the same inputs always
//! produce the same report:
//!
//! 1. `MissingTable` for every source-only table, sorted by name
//! 2. `ExtraTable` for every target-only table, sorted by name
//! 3. for every table on both sides, sorted by name: columns, primary key,
//!    indexes, foreign keys
//!
//! Within one of those sub-comparisons, items are visited in name order:
//! source items first (missing or mismatched), then target-only extras.
//!
//! ## Duplicate names
//!
//! If a table lists two columns (or indexes, or foreign keys) with the same
//! name, the last one wins and the earlier one is ignored. A warning is
//! logged when that happens; the comparison itself carries on.

use schema_check_model::{Column, ForeignKey, Index, Schema, Table};
use std::collections::BTreeMap;
use std::fmt;

/// The category of a [`Difference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiffKind {
    /// Table exists in source only.
    MissingTable,
    /// Table exists in target only.
    ExtraTable,
    /// Column exists in source only.
    MissingColumn,
    /// Column exists in target only.
    ExtraColumn,
    ColumnTypeMismatch,
    ColumnNullableMismatch,
    ColumnDefaultMismatch,
    ColumnIdentityMismatch,
    /// Primary key column count or a column at some position differs.
    PrimaryKeyMismatch,
    /// Index exists in source only.
    MissingIndex,
    /// Index exists in target only.
    ExtraIndex,
    IndexUniqueMismatch,
    IndexColumnsMismatch,
    /// Foreign key exists in source only.
    MissingForeignKey,
    /// Foreign key exists in target only.
    ExtraForeignKey,
    ForeignKeyReferenceMismatch,
    ForeignKeyColumnsMismatch,
    ForeignKeyReferencedColumnsMismatch,
}

impl DiffKind {
    /// Every kind, in declaration order.
    pub const ALL: [DiffKind; 18] = [
        DiffKind::MissingTable,
        DiffKind::ExtraTable,
        DiffKind::MissingColumn,
        DiffKind::ExtraColumn,
        DiffKind::ColumnTypeMismatch,
        DiffKind::ColumnNullableMismatch,
        DiffKind::ColumnDefaultMismatch,
        DiffKind::ColumnIdentityMismatch,
        DiffKind::PrimaryKeyMismatch,
        DiffKind::MissingIndex,
        DiffKind::ExtraIndex,
        DiffKind::IndexUniqueMismatch,
        DiffKind::IndexColumnsMismatch,
        DiffKind::MissingForeignKey,
        DiffKind::ExtraForeignKey,
        DiffKind::ForeignKeyReferenceMismatch,
        DiffKind::ForeignKeyColumnsMismatch,
        DiffKind::ForeignKeyReferencedColumnsMismatch,
    ];

    /// The tag used in reports, e.g. `MissingColumn`.
    pub fn as_str(self) -> &'static str {
        match self {
            DiffKind::MissingTable => "MissingTable",
            DiffKind::ExtraTable => "ExtraTable",
            DiffKind::MissingColumn => "MissingColumn",
            DiffKind::ExtraColumn => "ExtraColumn",
            DiffKind::ColumnTypeMismatch => "ColumnTypeMismatch",
            DiffKind::ColumnNullableMismatch => "ColumnNullableMismatch",
            DiffKind::ColumnDefaultMismatch => "ColumnDefaultMismatch",
            DiffKind::ColumnIdentityMismatch => "ColumnIdentityMismatch",
            DiffKind::PrimaryKeyMismatch => "PrimaryKeyMismatch",
            DiffKind::MissingIndex => "MissingIndex",
            DiffKind::ExtraIndex => "ExtraIndex",
            DiffKind::IndexUniqueMismatch => "IndexUniqueMismatch",
            DiffKind::IndexColumnsMismatch => "IndexColumnsMismatch",
            DiffKind::MissingForeignKey => "MissingForeignKey",
            DiffKind::ExtraForeignKey => "ExtraForeignKey",
            DiffKind::ForeignKeyReferenceMismatch => "ForeignKeyReferenceMismatch",
            DiffKind::ForeignKeyColumnsMismatch => "ForeignKeyColumnsMismatch",
            DiffKind::ForeignKeyReferencedColumnsMismatch => {
                "ForeignKeyReferencedColumnsMismatch"
            }
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single discrepancy between the source and target schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    kind: DiffKind,
    table: String,
    message: String,
}

impl Difference {
    fn new(kind: DiffKind, table: &str, message: String) -> Self {
        Self {
            kind,
            table: table.to_string(),
            message,
        }
    }

    pub fn kind(&self) -> DiffKind {
        self.kind
    }

    /// Name of the table the difference was found in.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.table, self.message)
    }
}

/// Number of differences of each kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    counts: BTreeMap<DiffKind, usize>,
}

impl Summary {
    pub fn from_differences(differences: &[Difference]) -> Self {
        let mut counts = BTreeMap::new();
        for diff in differences {
            *counts.entry(diff.kind).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn count(&self, kind: DiffKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Non-zero counts, in [`DiffKind`] order.
    pub fn iter(&self) -> impl Iterator<Item = (DiffKind, usize)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }
}

/// Extension trait to compare a schema against another.
pub trait SchemaCompare {
    /// Differences found when `self` is the source and `target` the target.
    fn compare(&self, target: &Schema) -> Vec<Difference>;
}

impl SchemaCompare for Schema {
    fn compare(&self, target: &Schema) -> Vec<Difference> {
        compare(self, target)
    }
}

/// Compare `source` against `target` and return every difference found.
///
/// "Missing" differences describe items only present in `source`, "Extra"
/// differences items only present in `target`. An empty result means the
/// schemas match.
///
/// # Example
///
/// ```
/// use schema_check::{DiffKind, Schema, Table, compare};
///
/// let source: Schema = [Table::new("users"), Table::new("orders")].into_iter().collect();
/// let target: Schema = [Table::new("users")].into_iter().collect();
///
/// let differences = compare(&source, &target);
/// assert_eq!(differences.len(), 1);
/// assert_eq!(differences[0].kind(), DiffKind::MissingTable);
/// assert_eq!(differences[0].table(), "orders");
/// ```
pub fn compare(source: &Schema, target: &Schema) -> Vec<Difference> {
    let mut differences = Vec::new();

    let mut missing: Vec<&str> = source
        .tables
        .keys()
        .filter(|name| !target.tables.contains_key(name.as_str()))
        .map(String::as_str)
        .collect();
    missing.sort_unstable();
    for name in missing {
        differences.push(Difference::new(
            DiffKind::MissingTable,
            name,
            "Table exists in source but not in target".to_string(),
        ));
    }

    let mut extra: Vec<&str> = target
        .tables
        .keys()
        .filter(|name| !source.tables.contains_key(name.as_str()))
        .map(String::as_str)
        .collect();
    extra.sort_unstable();
    for name in extra {
        differences.push(Difference::new(
            DiffKind::ExtraTable,
            name,
            "Table exists in target but not in source".to_string(),
        ));
    }

    let mut shared: Vec<(&str, &Table, &Table)> = source
        .tables
        .iter()
        .filter_map(|(name, src)| target.tables.get(name).map(|tgt| (name.as_str(), src, tgt)))
        .collect();
    shared.sort_unstable_by_key(|(name, _, _)| *name);
    for (name, src, tgt) in shared {
        differences.extend(compare_table(name, src, tgt));
    }

    tracing::debug!(
        source_tables = source.tables.len(),
        target_tables = target.tables.len(),
        differences = differences.len(),
        "compared schemas"
    );

    differences
}

/// Compare two tables with the same name.
fn compare_table(name: &str, source: &Table, target: &Table) -> Vec<Difference> {
    let mut differences = Vec::new();
    differences.extend(compare_columns(name, &source.columns, &target.columns));
    differences.extend(compare_primary_keys(
        name,
        &source.primary_key,
        &target.primary_key,
    ));
    differences.extend(compare_indexes(name, &source.indexes, &target.indexes));
    differences.extend(compare_foreign_keys(
        name,
        &source.foreign_keys,
        &target.foreign_keys,
    ));
    differences
}

fn compare_columns(table: &str, source: &[Column], target: &[Column]) -> Vec<Difference> {
    let source = by_name(table, "column", source, |c| &c.name);
    let target = by_name(table, "column", target, |c| &c.name);

    let presence = Presence {
        table,
        noun: "Column",
        missing: DiffKind::MissingColumn,
        extra: DiffKind::ExtraColumn,
    };
    presence.diff(&source, &target, |name, src, tgt, out| {
        if src.data_type != tgt.data_type {
            out.push(Difference::new(
                DiffKind::ColumnTypeMismatch,
                table,
                format!(
                    "Column '{}' has different types: source={}, target={}",
                    name, src.data_type, tgt.data_type
                ),
            ));
        }

        if src.nullable != tgt.nullable {
            out.push(Difference::new(
                DiffKind::ColumnNullableMismatch,
                table,
                format!(
                    "Column '{}' has different nullable settings: source={}, target={}",
                    name, src.nullable, tgt.nullable
                ),
            ));
        }

        if src.default_expr() != tgt.default_expr() {
            out.push(Difference::new(
                DiffKind::ColumnDefaultMismatch,
                table,
                format!(
                    "Column '{}' has different default values: source={}, target={}",
                    name,
                    src.default_expr().unwrap_or("(none)"),
                    tgt.default_expr().unwrap_or("(none)")
                ),
            ));
        }

        if src.is_identity != tgt.is_identity {
            out.push(Difference::new(
                DiffKind::ColumnIdentityMismatch,
                table,
                format!(
                    "Column '{}' has different identity settings: source={}, target={}",
                    name, src.is_identity, tgt.is_identity
                ),
            ));
        }
    })
}

/// A count mismatch is reported on its own; positions are only compared when
/// both keys have the same number of columns.
fn compare_primary_keys(table: &str, source: &[String], target: &[String]) -> Vec<Difference> {
    if source.len() != target.len() {
        return vec![Difference::new(
            DiffKind::PrimaryKeyMismatch,
            table,
            format!(
                "Different number of primary key columns: source={}, target={}",
                source.len(),
                target.len()
            ),
        )];
    }

    source
        .iter()
        .zip(target)
        .enumerate()
        .filter(|(_, (src, tgt))| src != tgt)
        .map(|(i, (src, tgt))| {
            Difference::new(
                DiffKind::PrimaryKeyMismatch,
                table,
                format!(
                    "Primary key column mismatch at position {}: source={}, target={}",
                    i + 1,
                    src,
                    tgt
                ),
            )
        })
        .collect()
}

fn compare_indexes(table: &str, source: &[Index], target: &[Index]) -> Vec<Difference> {
    let source = by_name(table, "index", source, |i| &i.name);
    let target = by_name(table, "index", target, |i| &i.name);

    let presence = Presence {
        table,
        noun: "Index",
        missing: DiffKind::MissingIndex,
        extra: DiffKind::ExtraIndex,
    };
    presence.diff(&source, &target, |name, src, tgt, out| {
        if src.unique != tgt.unique {
            out.push(Difference::new(
                DiffKind::IndexUniqueMismatch,
                table,
                format!(
                    "Index '{}' has different unique settings: source={}, target={}",
                    name, src.unique, tgt.unique
                ),
            ));
        }

        if src.columns != tgt.columns {
            out.push(Difference::new(
                DiffKind::IndexColumnsMismatch,
                table,
                format!(
                    "Index '{}' has different columns: source={}, target={}",
                    name,
                    list(&src.columns),
                    list(&tgt.columns)
                ),
            ));
        }
    })
}

fn compare_foreign_keys(
    table: &str,
    source: &[ForeignKey],
    target: &[ForeignKey],
) -> Vec<Difference> {
    let source = by_name(table, "foreign key", source, |fk| &fk.name);
    let target = by_name(table, "foreign key", target, |fk| &fk.name);

    let presence = Presence {
        table,
        noun: "Foreign key",
        missing: DiffKind::MissingForeignKey,
        extra: DiffKind::ExtraForeignKey,
    };
    presence.diff(&source, &target, |name, src, tgt, out| {
        if src.referenced_table != tgt.referenced_table {
            out.push(Difference::new(
                DiffKind::ForeignKeyReferenceMismatch,
                table,
                format!(
                    "Foreign key '{}' references different tables: source={}, target={}",
                    name, src.referenced_table, tgt.referenced_table
                ),
            ));
        }

        if src.columns != tgt.columns {
            out.push(Difference::new(
                DiffKind::ForeignKeyColumnsMismatch,
                table,
                format!(
                    "Foreign key '{}' has different columns: source={}, target={}",
                    name,
                    list(&src.columns),
                    list(&tgt.columns)
                ),
            ));
        }

        if src.referenced_columns != tgt.referenced_columns {
            out.push(Difference::new(
                DiffKind::ForeignKeyReferencedColumnsMismatch,
                table,
                format!(
                    "Foreign key '{}' references different columns: source={}, target={}",
                    name,
                    list(&src.referenced_columns),
                    list(&tgt.referenced_columns)
                ),
            ));
        }
    })
}

/// Index `items` by name. On duplicate names the last entry wins.
fn by_name<'a, T>(
    table: &str,
    what: &str,
    items: &'a [T],
    name: impl Fn(&T) -> &String,
) -> BTreeMap<&'a str, &'a T> {
    let mut map = BTreeMap::new();
    for item in items {
        let key = name(item).as_str();
        if map.insert(key, item).is_some() {
            tracing::warn!(
                table,
                name = key,
                "duplicate {} name, keeping the last definition",
                what
            );
        }
    }
    map
}

/// Reports items present on one side only, and hands items present on both
/// sides to a field-level comparison.
struct Presence<'a> {
    table: &'a str,
    noun: &'static str,
    missing: DiffKind,
    extra: DiffKind,
}

impl Presence<'_> {
    fn diff<T>(
        &self,
        source: &BTreeMap<&str, &T>,
        target: &BTreeMap<&str, &T>,
        mut compare_shared: impl FnMut(&str, &T, &T, &mut Vec<Difference>),
    ) -> Vec<Difference> {
        let mut differences = Vec::new();

        for (name, src) in source {
            match target.get(name) {
                Some(tgt) => compare_shared(*name, *src, *tgt, &mut differences),
                None => differences.push(Difference::new(
                    self.missing,
                    self.table,
                    format!("{} '{}' exists in source but not in target", self.noun, name),
                )),
            }
        }

        for name in target.keys().filter(|name| !source.contains_key(*name)) {
            differences.push(Difference::new(
                self.extra,
                self.table,
                format!("{} '{}' exists in target but not in source", self.noun, name),
            ));
        }

        differences
    }
}

/// Render a column list as `[a, b]`.
fn list(columns: &[String]) -> String {
    format!("[{}]", columns.join(", "))
}
