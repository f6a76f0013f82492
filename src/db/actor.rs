use crate::db::schema::{create_map_table_sql, insert_map_row_sql, map_row_params};
use crate::db::value::map_row_from_value;
use crate::db::{DatabaseTarget, TableName};
use crate::error::GatewayError;
use duckdb::{Connection, params_from_iter, types::Value};
use quackgate_schema::{IngestRecord, QueryRow};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub enum DbActorMessage {
    /// Run a statement whose rows are a single MAP column.
    QueryMapRows(String, RpcReplyPort<Result<Vec<QueryRow>, GatewayError>>),

    /// Create the table if needed and append one map row.
    Ingest(
        TableName,
        IngestRecord,
        RpcReplyPort<Result<(), GatewayError>>,
    ),

    /// Round-trip a trivial statement through the engine.
    Ping(RpcReplyPort<Result<(), GatewayError>>),
}

/// Cloneable handle to the actor owning the DuckDB connection.
#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn query_map_rows(
        &self,
        sql: impl Into<String>,
    ) -> Result<Vec<QueryRow>, GatewayError> {
        ractor::call!(self.actor, DbActorMessage::QueryMapRows, sql.into())
            .map_err(|e| GatewayError::Actor(format!("DbActor QueryMapRows RPC failed: {e}")))?
    }

    pub async fn ingest(&self, table: TableName, record: IngestRecord) -> Result<(), GatewayError> {
        ractor::call!(self.actor, DbActorMessage::Ingest, table, record)
            .map_err(|e| GatewayError::Actor(format!("DbActor Ingest RPC failed: {e}")))?
    }

    pub async fn ping(&self) -> Result<(), GatewayError> {
        ractor::call!(self.actor, DbActorMessage::Ping)
            .map_err(|e| GatewayError::Actor(format!("DbActor Ping RPC failed: {e}")))?
    }

    /// Stops the actor and waits until the connection has been closed.
    pub async fn close(&self) -> Result<(), GatewayError> {
        self.actor
            .stop_and_wait(Some("shutdown".to_string()), None)
            .await
            .map_err(|e| GatewayError::Actor(format!("DbActor stop failed: {e}")))
    }
}

struct DbActorState {
    /// Taken in `post_stop` so the connection is closed before the actor reports stopped.
    conn: Option<Connection>,
}

impl DbActorState {
    fn conn(&self) -> Result<&Connection, GatewayError> {
        self.conn
            .as_ref()
            .ok_or_else(|| GatewayError::Actor("DuckDB connection already closed".to_string()))
    }

    /// Runs `job` on a clone of the owned connection in the blocking pool and
    /// replies from there, so the mailbox keeps draining while it executes.
    fn dispatch<T, F>(&self, reply: RpcReplyPort<Result<T, GatewayError>>, job: F)
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, GatewayError> + Send + 'static,
    {
        let conn = match self
            .conn()
            .and_then(|conn| conn.try_clone().map_err(GatewayError::Connection))
        {
            Ok(conn) => conn,
            Err(e) => {
                let _ = reply.send(Err(e));
                return;
            }
        };

        tokio::task::spawn_blocking(move || {
            let res = job(&conn);
            // Released before replying so a close that follows sees no open clones.
            drop(conn);
            let _ = reply.send(res);
        });
    }
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = Connection;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        conn: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        Ok(DbActorState { conn: Some(conn) })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        if let Some(conn) = state.conn.take() {
            if let Err((_conn, e)) = conn.close() {
                warn!(error = %e, "DuckDB connection did not close cleanly");
            }
        }
        info!("DbActor stopped; DuckDB connection closed");
        Ok(())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::QueryMapRows(sql, reply) => {
                state.dispatch(reply, move |conn| query_map_rows(conn, &sql));
            }
            DbActorMessage::Ingest(table, record, reply) => {
                state.dispatch(reply, move |conn| ingest(conn, &table, &record));
            }
            DbActorMessage::Ping(reply) => {
                state.dispatch(reply, |conn| {
                    conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
                        .map(|_| ())
                        .map_err(GatewayError::Execution)
                });
            }
        }
        Ok(())
    }
}

fn query_map_rows(conn: &Connection, sql: &str) -> Result<Vec<QueryRow>, GatewayError> {
    // duckdb-rs reports an empty statement with a bare error code.
    if sql.trim().is_empty() {
        return Err(GatewayError::EmptyStatement);
    }

    let mut stmt = conn.prepare(sql).map_err(GatewayError::Execution)?;
    let mut rows = stmt.query([]).map_err(GatewayError::Execution)?;

    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(GatewayError::Execution)? {
        // A second column means the result is not a bare map row.
        if row.get_ref(1).is_ok() {
            return Err(GatewayError::DataShape(
                "expected exactly one MAP column per row".to_string(),
            ));
        }
        let value: Value = row.get(0).map_err(GatewayError::Execution)?;
        out.push(map_row_from_value(&value)?);
    }

    debug!(rows = out.len(), "Map query executed");
    Ok(out)
}

fn ingest(conn: &Connection, table: &TableName, record: &IngestRecord) -> Result<(), GatewayError> {
    if let Err(e) = conn.execute(&create_map_table_sql(table), []) {
        error!(step = "create_table", table = %table, error = %e, "Ingest failed");
        return Err(GatewayError::Execution(e));
    }

    let insert_sql = insert_map_row_sql(table, record.len());
    if let Err(e) = conn.execute(&insert_sql, params_from_iter(map_row_params(record))) {
        error!(step = "insert_row", table = %table, error = %e, "Ingest failed");
        return Err(GatewayError::Execution(e));
    }

    debug!(table = %table, entries = record.len(), "Ingested map row");
    Ok(())
}

fn open_connection(target: &DatabaseTarget) -> duckdb::Result<Connection> {
    match target {
        DatabaseTarget::InMemory => Connection::open_in_memory(),
        DatabaseTarget::File(path) => Connection::open(path),
    }
}

/// Open the database and spawn the actor that owns the connection.
///
/// A failure to open the engine is returned as `GatewayError::Connection`.
pub async fn spawn(target: &DatabaseTarget) -> Result<DbActorHandle, GatewayError> {
    let conn = open_connection(target).map_err(GatewayError::Connection)?;

    let (actor, _jh) = Actor::spawn(None, DbActor, conn)
        .await
        .map_err(|e| GatewayError::Actor(format!("failed to spawn DbActor: {e}")))?;

    info!(database = %target, "DbActor initialized");
    Ok(DbActorHandle { actor })
}
