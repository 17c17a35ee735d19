//! Integration tests against real PostgreSQL.
//!
//! These tests verify that:
//! 1. Catalog queries read columns, key order, index order and foreign-key
//!    column pairing correctly
//! 2. Two databases with known differences compare as expected
//!
//! Run with: cargo test -p schema-check --test postgres_introspect -- --ignored
//!
//! Note: Requires Docker to be running.

use std::time::Duration;

use schema_check::{AcquireConfig, DiffKind, acquire, compare};
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::ContainerAsync;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use tokio_postgres::{Client, NoTls};

const SHOP_DDL: &str = r#"
    CREATE TABLE customers (
        id INTEGER GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
        email TEXT NOT NULL,
        name VARCHAR(100)
    );
    CREATE UNIQUE INDEX customers_email_key ON customers (email);

    CREATE TABLE orders (
        tenant_id INTEGER NOT NULL,
        id INTEGER NOT NULL,
        customer_id INTEGER NOT NULL REFERENCES customers (id),
        placed_on DATE DEFAULT CURRENT_DATE,
        PRIMARY KEY (tenant_id, id)
    );
    CREATE INDEX idx_orders_customer_date ON orders (customer_id, placed_on);

    CREATE TABLE order_lines (
        tenant_id INTEGER NOT NULL,
        order_id INTEGER NOT NULL,
        line INTEGER NOT NULL,
        CONSTRAINT order_lines_order_fkey
            FOREIGN KEY (order_id, tenant_id) REFERENCES orders (id, tenant_id)
    );

    CREATE VIEW recent_orders AS SELECT id, placed_on FROM orders;
"#;

/// Start a PostgreSQL container and return it with a URL for its default database.
async fn setup_postgres() -> (ContainerAsync<Postgres>, String) {
    let container = Postgres::default()
        .start()
        .await
        .expect("failed to start postgres container");
    let host = container.get_host().await.expect("postgres host not available");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("postgres port not available");

    let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
    (container, url)
}

/// Connect with retries (postgres may not be fully ready even after the port is open).
async fn connect(url: &str) -> Client {
    let mut attempts = 0;
    let max_attempts = 10;
    let (client, connection) = loop {
        attempts += 1;
        match tokio_postgres::connect(url, NoTls).await {
            Ok(result) => break result,
            Err(e) if attempts < max_attempts => {
                tracing::debug!("Connection attempt {} failed: {}, retrying...", attempts, e);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            Err(e) => panic!(
                "failed to connect to postgres after {} attempts: {}",
                attempts, e
            ),
        }
    };

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {}", e);
        }
    });

    client
}

/// Create a second database next to the default one and return its URL.
async fn create_database(admin: &Client, base_url: &str, name: &str) -> String {
    admin
        .batch_execute(&format!("CREATE DATABASE {}", name))
        .await
        .expect("failed to create database");
    let (server, _) = base_url.rsplit_once('/').expect("url has a database path");
    format!("{}/{}", server, name)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_acquire_reads_catalog_metadata() {
    let (_container, url) = setup_postgres().await;
    let client = connect(&url).await;
    client.batch_execute(SHOP_DDL).await.expect("failed to create tables");

    let schema = acquire(&AcquireConfig::new(&url))
        .await
        .expect("failed to acquire schema");

    let names: Vec<_> = schema.iter_tables().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["customers", "order_lines", "orders"]);

    let customers = schema.get_table("customers").unwrap();
    let id = customers.get_column("id").unwrap();
    assert_eq!(id.data_type, "integer");
    assert!(id.is_identity);
    assert!(!id.nullable);
    let name = customers.get_column("name").unwrap();
    assert_eq!(name.data_type, "character varying");
    assert!(name.nullable);
    assert_eq!(name.default, None);
    let email_key = customers
        .indexes
        .iter()
        .find(|i| i.name == "customers_email_key")
        .unwrap();
    assert!(email_key.unique);

    let orders = schema.get_table("orders").unwrap();
    assert_eq!(orders.primary_key, vec!["tenant_id", "id"]);
    let placed_on = orders.get_column("placed_on").unwrap();
    assert_eq!(placed_on.default.as_deref(), Some("CURRENT_DATE"));
    let pkey = orders.indexes.iter().find(|i| i.name == "orders_pkey").unwrap();
    assert!(pkey.unique);
    assert_eq!(pkey.columns, vec!["tenant_id", "id"]);
    let by_date = orders
        .indexes
        .iter()
        .find(|i| i.name == "idx_orders_customer_date")
        .unwrap();
    assert!(!by_date.unique);
    assert_eq!(by_date.columns, vec!["customer_id", "placed_on"]);
    assert_eq!(orders.foreign_keys.len(), 1);
    assert_eq!(orders.foreign_keys[0].name, "orders_customer_id_fkey");
    assert_eq!(orders.foreign_keys[0].referenced_table, "customers");

    let lines = schema.get_table("order_lines").unwrap();
    assert!(lines.primary_key.is_empty());
    let fk = &lines.foreign_keys[0];
    assert_eq!(fk.columns, vec!["order_id", "tenant_id"]);
    assert_eq!(fk.referenced_table, "orders");
    assert_eq!(fk.referenced_columns, vec!["id", "tenant_id"]);

    let with_views = acquire(&AcquireConfig::new(&url).with_views(true))
        .await
        .expect("failed to acquire schema with views");
    assert!(with_views.get_table("recent_orders").is_some());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_compare_two_databases() {
    let (_container, url) = setup_postgres().await;
    let admin = connect(&url).await;

    let source_url = create_database(&admin, &url, "source_db").await;
    let target_url = create_database(&admin, &url, "target_db").await;

    connect(&source_url)
        .await
        .batch_execute(SHOP_DDL)
        .await
        .expect("failed to create source tables");

    let target = connect(&target_url).await;
    target
        .batch_execute(SHOP_DDL)
        .await
        .expect("failed to create target tables");
    target
        .batch_execute(
            r#"
            ALTER TABLE customers DROP COLUMN name;
            CREATE INDEX idx_orders_placed_on ON orders (placed_on);
            CREATE TABLE audit_log (id BIGINT PRIMARY KEY);
            "#,
        )
        .await
        .expect("failed to alter target tables");

    let source = acquire(&AcquireConfig::new(&source_url)).await.unwrap();
    let target = acquire(&AcquireConfig::new(&target_url)).await.unwrap();

    let differences = compare(&source, &target);
    let found: Vec<_> = differences
        .iter()
        .map(|d| (d.kind(), d.table().to_string()))
        .collect();
    assert_eq!(
        found,
        vec![
            (DiffKind::ExtraTable, "audit_log".to_string()),
            (DiffKind::MissingColumn, "customers".to_string()),
            (DiffKind::ExtraIndex, "orders".to_string()),
        ]
    );

    assert!(compare(&source, &source).is_empty());
}
