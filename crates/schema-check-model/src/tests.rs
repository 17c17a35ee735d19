use super::*;

fn users_table() -> Table {
    Table::new("users")
        .with_column(Column::new("id", "bigint").identity())
        .with_column(Column::new("email", "text"))
        .with_column(Column::new("last_login", "timestamp without time zone").nullable())
        .with_column(Column::new("created_at", "timestamp with time zone").with_default("now()"))
        .with_primary_key(["id"])
        .with_index(Index::new("users_email_key", ["email"]).unique())
}

#[test]
fn test_column_builder_defaults() {
    let col = Column::new("id", "integer");
    assert!(!col.nullable);
    assert!(!col.is_identity);
    assert_eq!(col.default, None);
}

#[test]
fn test_column_default_expr_treats_empty_as_none() {
    assert_eq!(Column::new("a", "text").default_expr(), None);
    assert_eq!(Column::new("a", "text").with_default("").default_expr(), None);
    assert_eq!(
        Column::new("a", "text").with_default("'x'::text").default_expr(),
        Some("'x'::text")
    );
}

#[test]
fn test_column_display() {
    let col = Column::new("created_at", "timestamp with time zone").with_default("now()");
    assert_eq!(
        col.to_string(),
        "created_at: timestamp with time zone [NOT NULL, DEFAULT now()]"
    );

    let col = Column::new("bio", "text").nullable();
    assert_eq!(col.to_string(), "bio: text");

    let col = Column::new("id", "bigint").identity();
    assert_eq!(col.to_string(), "id: bigint [NOT NULL, IDENTITY]");
}

#[test]
fn test_index_display() {
    let idx = Index::new("idx_orders_customer_date", ["customer_id", "order_date"]);
    assert_eq!(
        idx.to_string(),
        "INDEX idx_orders_customer_date (customer_id, order_date)"
    );
    assert_eq!(
        idx.unique().to_string(),
        "UNIQUE INDEX idx_orders_customer_date (customer_id, order_date)"
    );
}

#[test]
fn test_foreign_key_display() {
    let fk = ForeignKey::new("orders_customer_id_fkey", ["customer_id"], "customers", ["id"]);
    assert_eq!(
        fk.to_string(),
        "FOREIGN KEY orders_customer_id_fkey (customer_id) -> customers(id)"
    );
}

#[test]
fn test_table_builder() {
    let table = users_table();
    assert_eq!(table.columns.len(), 4);
    assert_eq!(table.primary_key, vec!["id"]);
    assert_eq!(table.indexes.len(), 1);
    assert!(table.indexes[0].unique);
    assert!(table.foreign_keys.is_empty());

    let last_login = table.get_column("last_login").unwrap();
    assert!(last_login.nullable);
    assert!(table.get_column("missing").is_none());
}

#[test]
fn test_schema_insert_replaces_same_name() {
    let mut schema = Schema::new();
    assert!(schema.insert_table(Table::new("users")).is_none());

    let previous = schema.insert_table(users_table());
    assert_eq!(previous, Some(Table::new("users")));
    assert_eq!(schema.table_count(), 1);
    assert_eq!(schema.get_table("users").unwrap().columns.len(), 4);
}

#[test]
fn test_schema_from_iter() {
    let schema: Schema = [Table::new("orders"), users_table(), Table::new("orders")]
        .into_iter()
        .collect();

    assert_eq!(schema.table_count(), 2);
    let names: Vec<_> = schema.iter_tables().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["orders", "users"]);
}

#[test]
fn test_empty_schema() {
    let schema = Schema::new();
    assert!(schema.is_empty());
    assert!(schema.get_table("users").is_none());
    assert_eq!(schema.to_string(), "Schema (0 tables):\n");
}

#[test]
fn test_schema_display() {
    let schema: Schema = [users_table()].into_iter().collect();
    let expected = "\
Schema (1 tables):

  users (4 columns)
    id: bigint [NOT NULL, IDENTITY]
    email: text [NOT NULL]
    last_login: timestamp without time zone
    created_at: timestamp with time zone [NOT NULL, DEFAULT now()]
    PRIMARY KEY (id)
    UNIQUE INDEX users_email_key (email)
";
    assert_eq!(schema.to_string(), expected);
}
