//! SQLite ledger. Each save rewrites the `trades` table inside one
//! transaction; `seq` keeps storage order.

use std::path::Path;

use crate::domain::error::MiloError;
use crate::domain::trade_record::TradeRecord;
use crate::ports::ledger_port::LedgerPort;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use rusqlite::types::Type;

const POOL_SIZE: u32 = 4;

pub struct SqliteLedgerAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_error(e: r2d2::Error) -> MiloError {
    MiloError::storage(e.to_string())
}

fn query_error(e: rusqlite::Error) -> MiloError {
    MiloError::storage(e.to_string())
}

fn parse_column<T>(idx: usize, raw: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

impl SqliteLedgerAdapter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, MiloError> {
        let manager = SqliteConnectionManager::file(path.as_ref());
        let pool = Pool::builder()
            .max_size(POOL_SIZE)
            .build(manager)
            .map_err(pool_error)?;
        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, MiloError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_error)?;
        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    fn initialize_schema(&self) -> Result<(), MiloError> {
        let conn = self.pool.get().map_err(pool_error)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS trades (
                seq INTEGER PRIMARY KEY,
                id_signal TEXT NOT NULL,
                instrument TEXT NOT NULL,
                direction TEXT NOT NULL,
                entry_price REAL NOT NULL,
                sl_price REAL NOT NULL,
                tp_price REAL NOT NULL,
                setup_tag TEXT NOT NULL,
                atr_5d REAL NOT NULL,
                context TEXT NOT NULL,
                status TEXT NOT NULL,
                close_price REAL,
                p_g_points REAL
            );
            CREATE INDEX IF NOT EXISTS idx_trades_id_signal ON trades(id_signal);",
        )
        .map_err(query_error)?;
        Ok(())
    }
}

impl LedgerPort for SqliteLedgerAdapter {
    fn load(&self) -> Result<Vec<TradeRecord>, MiloError> {
        let conn = self.pool.get().map_err(pool_error)?;

        let mut stmt = conn
            .prepare(
                "SELECT id_signal, instrument, direction, entry_price, sl_price, tp_price,
                        setup_tag, atr_5d, context, status, close_price, p_g_points
                 FROM trades
                 ORDER BY seq ASC",
            )
            .map_err(query_error)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TradeRecord {
                    id_signal: row.get(0)?,
                    instrument: row.get(1)?,
                    direction: parse_column(2, row.get(2)?)?,
                    entry_price: row.get(3)?,
                    sl_price: row.get(4)?,
                    tp_price: row.get(5)?,
                    setup_tag: row.get(6)?,
                    atr_5d: row.get(7)?,
                    context: row.get(8)?,
                    status: parse_column(9, row.get(9)?)?,
                    close_price: row.get(10)?,
                    p_g_points: row.get(11)?,
                })
            })
            .map_err(query_error)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(query_error)?);
        }
        Ok(records)
    }

    fn save(&self, records: &[TradeRecord]) -> Result<(), MiloError> {
        let mut conn = self.pool.get().map_err(pool_error)?;
        let tx = conn.transaction().map_err(query_error)?;

        tx.execute("DELETE FROM trades", []).map_err(query_error)?;
        for (seq, r) in records.iter().enumerate() {
            tx.execute(
                "INSERT INTO trades (seq, id_signal, instrument, direction, entry_price,
                    sl_price, tp_price, setup_tag, atr_5d, context, status, close_price, p_g_points)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    seq as i64,
                    r.id_signal,
                    r.instrument,
                    r.direction.as_str(),
                    r.entry_price,
                    r.sl_price,
                    r.tp_price,
                    r.setup_tag,
                    r.atr_5d,
                    r.context,
                    r.status.as_str(),
                    r.close_price,
                    r.p_g_points
                ],
            )
            .map_err(query_error)?;
        }

        tx.commit().map_err(query_error)?;
        Ok(())
    }
}
