//! Cassandra storage
//!
//! One keyspace, one table, `id` as the only primary key column. No
//! clustering columns and no secondary indexes; search is a full scan done in
//! process (see `crate::search`).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use rust_decimal::Decimal;
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::errors::{DbError, ExecutionError, RequestAttemptError};
use scylla::policies::load_balancing::DefaultPolicy;
use scylla::statement::prepared::PreparedStatement;
use scylla::value::{CqlDecimal, CqlValue, Row};
use shared::models::MenuItem;
use uuid::Uuid;

use super::lifecycle::{ProvisionError, ProvisionStep, Provisioner};
use super::store::{MenuStore, StoreError, StoreResult};
use crate::core::config::CassandraConfig;

pub const MENU_TABLE: &str = "menu_items";

/// Rows per page when scanning the table
pub const FETCH_PAGE_SIZE: i32 = 1000;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS menu_items (
    id uuid PRIMARY KEY,
    name text,
    description text,
    category text,
    price decimal,
    is_vegetarian boolean,
    created_at timestamp,
    updated_at timestamp
)";

const VERIFY_TABLE: &str = "SELECT id FROM menu_items LIMIT 5";

const SELECT_ALL: &str = "SELECT id, name, description, category, price, is_vegetarian, \
     created_at, updated_at FROM menu_items";

const SELECT_ONE: &str = "SELECT id, name, description, category, price, is_vegetarian, \
     created_at, updated_at FROM menu_items WHERE id = ?";

const INSERT: &str = "INSERT INTO menu_items \
     (id, name, description, category, price, is_vegetarian, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

// Lightweight transaction so a row deleted since the read is not recreated
const UPDATE: &str = "UPDATE menu_items SET name = ?, description = ?, category = ?, \
     price = ?, is_vegetarian = ?, updated_at = ? WHERE id = ? IF EXISTS";

const DELETE: &str = "DELETE FROM menu_items WHERE id = ?";

type MenuItemRow = (
    Uuid,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<CqlDecimal>,
    Option<bool>,
    Option<DateTime<Utc>>,
    Option<DateTime<Utc>>,
);

pub fn create_keyspace_cql(config: &CassandraConfig) -> String {
    format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {}",
        config.keyspace,
        config.replication.to_cql()
    )
}

// =============================================================================
// Provisioner
// =============================================================================

/// Opens a session and makes sure the keyspace and table exist
pub struct CassandraProvisioner {
    config: CassandraConfig,
}

impl CassandraProvisioner {
    pub fn new(config: CassandraConfig) -> Self {
        Self { config }
    }

    async fn connect(&self) -> Result<Session, ProvisionError> {
        let policy = DefaultPolicy::builder()
            .prefer_datacenter(self.config.datacenter.clone())
            .token_aware(true)
            .build();

        let profile = ExecutionProfile::builder()
            .request_timeout(Some(self.config.timeout))
            .load_balancing_policy(policy)
            .build();

        let mut builder = SessionBuilder::new()
            .known_nodes(&self.config.hosts)
            .connection_timeout(self.config.timeout)
            .default_execution_profile_handle(profile.into_handle());

        if let (Some(user), Some(password)) = (&self.config.username, &self.config.password) {
            builder = builder.user(user, password);
        }

        builder
            .build()
            .await
            .map_err(ProvisionError::at(ProvisionStep::Connect))
    }
}

#[async_trait]
impl Provisioner for CassandraProvisioner {
    async fn provision(&self) -> Result<Arc<dyn MenuStore>, ProvisionError> {
        let session = self.connect().await?;
        tracing::debug!(hosts = ?self.config.hosts, "Session opened");

        session
            .query_unpaged(create_keyspace_cql(&self.config), ())
            .await
            .map_err(ProvisionError::at(ProvisionStep::CreateKeyspace))?;

        session
            .use_keyspace(self.config.keyspace.clone(), false)
            .await
            .map_err(ProvisionError::at(ProvisionStep::UseKeyspace))?;

        session
            .query_unpaged(CREATE_TABLE, ())
            .await
            .map_err(ProvisionError::at(ProvisionStep::CreateTable))?;

        session
            .query_unpaged(VERIFY_TABLE, ())
            .await
            .map_err(ProvisionError::at(ProvisionStep::Verify))?
            .into_rows_result()
            .map_err(ProvisionError::at(ProvisionStep::Verify))?;

        tracing::debug!(keyspace = %self.config.keyspace, table = MENU_TABLE, "Schema verified");

        let store = CassandraStore::prepare(session).await?;
        Ok(Arc::new(store))
    }
}

// =============================================================================
// Store
// =============================================================================

struct Statements {
    select_all: PreparedStatement,
    select_one: PreparedStatement,
    insert: PreparedStatement,
    update: PreparedStatement,
    delete: PreparedStatement,
}

/// Menu storage on a provisioned session
pub struct CassandraStore {
    session: Session,
    statements: Statements,
}

impl CassandraStore {
    async fn prepare(session: Session) -> Result<Self, ProvisionError> {
        let at = || ProvisionError::at(ProvisionStep::Prepare);

        let mut select_all = session.prepare(SELECT_ALL).await.map_err(at())?;
        select_all.set_page_size(FETCH_PAGE_SIZE);

        let statements = Statements {
            select_all,
            select_one: session.prepare(SELECT_ONE).await.map_err(at())?,
            insert: session.prepare(INSERT).await.map_err(at())?,
            update: session.prepare(UPDATE).await.map_err(at())?,
            delete: session.prepare(DELETE).await.map_err(at())?,
        };

        Ok(Self {
            session,
            statements,
        })
    }
}

#[async_trait]
impl MenuStore for CassandraStore {
    async fn list_all(&self) -> StoreResult<Vec<MenuItem>> {
        let rows: Vec<MenuItemRow> = self
            .session
            .execute_iter(self.statements.select_all.clone(), ())
            .await
            .map_err(StoreError::database)?
            .rows_stream::<MenuItemRow>()
            .map_err(StoreError::decode)?
            .try_collect()
            .await
            .map_err(StoreError::database)?;

        Ok(rows.into_iter().map(row_to_item).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<MenuItem>> {
        let row = self
            .session
            .execute_unpaged(&self.statements.select_one, (id,))
            .await
            .map_err(execution_error)?
            .into_rows_result()
            .map_err(StoreError::decode)?
            .maybe_first_row::<MenuItemRow>()
            .map_err(StoreError::decode)?;

        Ok(row.map(row_to_item))
    }

    async fn insert(&self, item: &MenuItem) -> StoreResult<()> {
        self.session
            .execute_unpaged(
                &self.statements.insert,
                (
                    item.id,
                    item.name.as_deref(),
                    item.description.as_deref(),
                    item.category.as_deref(),
                    item.price.map(decimal_to_cql),
                    item.is_vegetarian,
                    item.created_at,
                    item.updated_at,
                ),
            )
            .await
            .map_err(execution_error)?;
        Ok(())
    }

    async fn update(&self, item: &MenuItem) -> StoreResult<bool> {
        let row = self
            .session
            .execute_unpaged(
                &self.statements.update,
                (
                    item.name.as_deref(),
                    item.description.as_deref(),
                    item.category.as_deref(),
                    item.price.map(decimal_to_cql),
                    item.is_vegetarian,
                    item.updated_at,
                    item.id,
                ),
            )
            .await
            .map_err(execution_error)?
            .into_rows_result()
            .map_err(StoreError::decode)?
            .maybe_first_row::<Row>()
            .map_err(StoreError::decode)?;
        Ok(was_applied(row.as_ref()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.session
            .execute_unpaged(&self.statements.delete, (id,))
            .await
            .map_err(execution_error)?;
        Ok(())
    }
}

/// Timeouts get their own variant so they surface as 503 instead of 500
fn execution_error(err: ExecutionError) -> StoreError {
    match err {
        ExecutionError::RequestTimeout(after) => {
            StoreError::Timeout(format!("no response within {after:?}"))
        }
        ExecutionError::LastAttemptError(RequestAttemptError::DbError(
            db @ (DbError::ReadTimeout { .. } | DbError::WriteTimeout { .. }),
            msg,
        )) => StoreError::Timeout(format!("{db}: {msg}")),
        other => StoreError::database(other),
    }
}

/// First column of a conditional statement's result is `[applied]`
fn was_applied(row: Option<&Row>) -> bool {
    matches!(
        row.and_then(|r| r.columns.first()),
        Some(Some(CqlValue::Boolean(true)))
    )
}

/// A price the model cannot hold reads back as null instead of failing the
/// whole scan.
fn row_to_item(row: MenuItemRow) -> MenuItem {
    let (id, name, description, category, price, is_vegetarian, created_at, updated_at) = row;

    let price = price.and_then(|p| {
        let value = cql_to_decimal(&p);
        if value.is_none() {
            tracing::warn!(%id, "Stored price does not fit a decimal, returning null");
        }
        value
    });

    MenuItem {
        id,
        name,
        description,
        category,
        price,
        is_vegetarian: is_vegetarian.unwrap_or(false),
        created_at,
        updated_at,
    }
}

// =============================================================================
// Decimal conversion
// =============================================================================

/// CQL decimals are an unscaled two's-complement varint plus a scale.
pub fn decimal_to_cql(value: Decimal) -> CqlDecimal {
    let mantissa = value.mantissa().to_be_bytes();
    // Drop redundant sign-extension bytes, keep at least one
    let mut start = 0;
    while start < mantissa.len() - 1 {
        let (byte, next) = (mantissa[start], mantissa[start + 1]);
        let redundant = (byte == 0x00 && next & 0x80 == 0) || (byte == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    CqlDecimal::from_signed_be_bytes_slice_and_exponent(&mantissa[start..], value.scale() as i32)
}

/// `None` when the value exceeds what `Decimal` can represent
pub fn cql_to_decimal(value: &CqlDecimal) -> Option<Decimal> {
    let (bytes, scale) = value.as_signed_be_bytes_slice_and_exponent();
    if bytes.len() > 16 {
        return None;
    }

    let fill = if bytes.first().is_some_and(|b| b & 0x80 != 0) {
        0xFF
    } else {
        0x00
    };
    let mut buf = [fill; 16];
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    let mut mantissa = i128::from_be_bytes(buf);

    let scale = if scale < 0 {
        mantissa = mantissa.checked_mul(10i128.checked_pow(scale.unsigned_abs())?)?;
        0
    } else {
        scale as u32
    };

    Decimal::try_from_i128_with_scale(mantissa, scale).ok()
}
