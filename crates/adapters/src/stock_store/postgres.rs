// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Postgres counter table
//!
//! Expects `{table}(id BIGSERIAL PRIMARY KEY, name TEXT NOT NULL, stock BIGINT NOT NULL)`.

use super::{RowLock, StockStore, StockTransaction, StoreError};
use async_trait::async_trait;
use sg_core::{Counter, CounterId, DatabaseConfig};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

type Row = (i64, String, i64);

fn to_counter((id, name, stock): Row) -> Counter {
    Counter::new(id, name, stock)
}

#[derive(Debug, Clone)]
pub struct PgStockStore {
    pool: PgPool,
    table: String,
}

impl PgStockStore {
    pub fn new(pool: &PgPool, table: impl Into<String>) -> Self {
        Self {
            pool: pool.clone(),
            table: table.into(),
        }
    }

    /// Open a pool for `config`; the table name must already be validated
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        Ok(Self::new(&pool, config.table.clone()))
    }
}

pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
    table: String,
}

#[async_trait]
impl StockTransaction for PgTransaction {
    async fn find(&mut self, id: CounterId, lock: RowLock) -> Result<Option<Counter>, StoreError> {
        let table = &self.table;
        let suffix = match lock {
            RowLock::None => "",
            RowLock::Exclusive => " FOR UPDATE",
        };
        let row = sqlx::query_as::<_, Row>(&format!(
            "SELECT id, name, stock FROM {table} WHERE id = $1{suffix}"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(to_counter))
    }

    async fn save(&mut self, counter: &Counter) -> Result<(), StoreError> {
        let table = &self.table;
        let result = sqlx::query(&format!(
            "UPDATE {table} SET name = $2, stock = $3 WHERE id = $1"
        ))
        .bind(counter.id)
        .bind(&counter.name)
        .bind(counter.stock)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowGone(counter.id));
        }
        Ok(())
    }

    async fn insert(&mut self, name: &str, stock: i64) -> Result<Counter, StoreError> {
        let table = &self.table;
        let row = sqlx::query_as::<_, Row>(&format!(
            "INSERT INTO {table} (name, stock) VALUES ($1, $2) RETURNING id, name, stock"
        ))
        .bind(name)
        .bind(stock)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(to_counter(row))
    }

    async fn clear(&mut self) -> Result<(), StoreError> {
        let table = &self.table;
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl StockStore for PgStockStore {
    type Tx = PgTransaction;

    async fn begin(&self) -> Result<PgTransaction, StoreError> {
        Ok(PgTransaction {
            tx: self.pool.begin().await?,
            table: self.table.clone(),
        })
    }

    async fn get(&self, id: CounterId) -> Result<Option<Counter>, StoreError> {
        let table = &self.table;
        let row = sqlx::query_as::<_, Row>(&format!(
            "SELECT id, name, stock FROM {table} WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(to_counter))
    }
}
