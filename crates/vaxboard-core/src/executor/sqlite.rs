//! SQLite-backed execution capability.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, ErrorCode, OpenFlags};

use super::QueryExecutor;
use crate::error::Error;
use crate::value::{Table, Value};

/// Schema of the vaccination dataset.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Paciente (
    id_paciente TEXT PRIMARY KEY,
    sexo TEXT,
    municipio TEXT,
    uf TEXT,
    idade INTEGER,
    raca_cor TEXT
);

CREATE TABLE IF NOT EXISTS Fabricante (
    id INTEGER PRIMARY KEY,
    nome TEXT
);

CREATE TABLE IF NOT EXISTS Vacina (
    id INTEGER PRIMARY KEY,
    nome TEXT,
    id_fabricante INTEGER REFERENCES Fabricante(id)
);

CREATE TABLE IF NOT EXISTS Estabelecimento (
    id_cnes TEXT PRIMARY KEY,
    nome_fantasia TEXT,
    municipio TEXT,
    uf TEXT,
    tipo TEXT,
    latitude REAL,
    longitude REAL
);

CREATE TABLE IF NOT EXISTS EstrategiaVacinacao (
    id INTEGER PRIMARY KEY,
    descricao TEXT
);

CREATE TABLE IF NOT EXISTS AplicacaoDose (
    id_aplicacao TEXT PRIMARY KEY,
    data_vacina TEXT,
    dose_vacina TEXT,
    local_aplicacao TEXT,
    via_administracao TEXT,
    lote_vacina TEXT,
    cnes TEXT REFERENCES Estabelecimento(id_cnes),
    id_vacina INTEGER REFERENCES Vacina(id),
    id_paciente TEXT REFERENCES Paciente(id_paciente),
    id_estrategia_vacinacao INTEGER REFERENCES EstrategiaVacinacao(id)
);

CREATE INDEX IF NOT EXISTS idx_aplicacao_data ON AplicacaoDose(data_vacina);
CREATE INDEX IF NOT EXISTS idx_aplicacao_paciente ON AplicacaoDose(id_paciente);
CREATE INDEX IF NOT EXISTS idx_estabelecimento_uf ON Estabelecimento(uf);
"#;

#[derive(Debug, Clone)]
enum Source {
    File { path: PathBuf, create: bool },
    Memory,
}

/// Executes statements against a SQLite database.
///
/// The connection is opened on first use and kept for the life of the
/// executor. If opening fails the error is reported for that statement and
/// the next statement tries again.
pub struct SqliteExecutor {
    source: Source,
    conn: Mutex<Option<Connection>>,
}

impl SqliteExecutor {
    /// Execute against an existing database file, read-only.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_source(Source::File {
            path: path.into(),
            create: false,
        })
    }

    /// Execute against a database file, creating it if missing.
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self::with_source(Source::File {
            path: path.into(),
            create: true,
        })
    }

    /// Execute against a private in-memory database.
    pub fn in_memory() -> Self {
        Self::with_source(Source::Memory)
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            conn: Mutex::new(None),
        }
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::File { path, .. } => Some(path),
            Source::Memory => None,
        }
    }

    /// Create the dataset tables if they do not exist.
    pub fn init_schema(&self) -> Result<(), Error> {
        self.execute_batch(SCHEMA)
    }

    /// Run one or more statements without parameters or results.
    pub fn execute_batch(&self, sql: &str) -> Result<(), Error> {
        self.with_connection(sql, &[], |conn| conn.execute_batch(sql))
    }

    /// Run `f` on the connection, opening it first if needed.
    fn with_connection<T, F>(&self, sql: &str, params: &[String], f: F) -> Result<T, Error>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let mut guard = self.conn.lock();

        if guard.is_none() {
            let conn = self
                .connect()
                .map_err(|e| Error::connection(e.to_string(), sql, params))?;
            tracing::debug!(path = ?self.path(), "opened sqlite connection");
            *guard = Some(conn);
        }

        match guard.as_ref() {
            Some(conn) => f(conn).map_err(|e| classify(e, sql, params)),
            None => Err(Error::connection("connection unavailable", sql, params)),
        }
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        match &self.source {
            Source::Memory => Connection::open_in_memory(),
            Source::File { path, create } => {
                let flags = if *create {
                    OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
                } else {
                    OpenFlags::SQLITE_OPEN_READ_ONLY
                };
                Connection::open_with_flags(path, flags | OpenFlags::SQLITE_OPEN_NO_MUTEX)
            }
        }
    }
}

impl QueryExecutor for SqliteExecutor {
    fn execute(&self, sql: &str, params: &[String]) -> Result<Table, Error> {
        self.with_connection(sql, params, |conn| {
            let mut stmt = conn.prepare(sql)?;
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let width = columns.len();
            let mut table = Table::new(columns);

            let mut rows = stmt.query(params_from_iter(params.iter()))?;
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(width);
                for i in 0..width {
                    values.push(convert(row.get_ref(i)?));
                }
                table.push_row(values);
            }

            Ok(table)
        })
    }
}

fn convert(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Unreachable, locked or unreadable databases are connection failures;
/// everything else is a problem with the statement.
fn classify(err: rusqlite::Error, sql: &str, params: &[String]) -> Error {
    let unreachable = matches!(
        err.sqlite_error_code(),
        Some(
            ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::NotADatabase
                | ErrorCode::PermissionDenied
                | ErrorCode::SystemIoFailure
        )
    );

    if unreachable {
        Error::connection(err.to_string(), sql, params)
    } else {
        Error::query(err.to_string(), sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_execute_binds_params_and_names_columns() {
        let executor = SqliteExecutor::in_memory();
        executor
            .execute_batch(
                "CREATE TABLE t (name TEXT, n INTEGER, x REAL);
                 INSERT INTO t VALUES ('a', 1, 0.5), ('b', 2, NULL), ('c', 3, 1.5);",
            )
            .unwrap();

        let table = executor
            .execute(
                "SELECT name, n, x FROM t WHERE name IN (?, ?) ORDER BY n",
                &["a".to_string(), "b".to_string()],
            )
            .unwrap();

        assert_eq!(table.columns, vec!["name", "n", "x"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "name"), Some(&Value::Text("a".into())));
        assert_eq!(table.get(0, "x"), Some(&Value::Float64(0.5)));
        assert_eq!(table.get(1, "n"), Some(&Value::Int64(2)));
        assert_eq!(table.get(1, "x"), Some(&Value::Null));
    }

    #[test]
    fn test_empty_result_keeps_columns() {
        let executor = SqliteExecutor::in_memory();
        executor.init_schema().unwrap();

        let table = executor.execute("SELECT nome FROM Vacina", &[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["nome"]);
    }

    #[test]
    fn test_malformed_sql_is_query_error() {
        let executor = SqliteExecutor::in_memory();
        let err = executor.execute("SELEC nonsense", &[]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Query);
        assert_eq!(err.query_text(), Some("SELEC nonsense"));
    }

    #[test]
    fn test_unknown_table_is_query_error() {
        let executor = SqliteExecutor::in_memory();
        let params = vec!["x".to_string()];
        let err = executor
            .execute("SELECT * FROM Missing WHERE a = ?", &params)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Query);
        assert_eq!(err.params(), params.as_slice());
    }

    #[test]
    fn test_missing_file_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let executor = SqliteExecutor::open(dir.path().join("absent.db"));

        let err = executor.execute("SELECT 1", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert_eq!(err.query_text(), Some("SELECT 1"));
    }

    #[test]
    fn test_create_then_reopen_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vax.db");

        let writer = SqliteExecutor::create(&path);
        writer.init_schema().unwrap();
        writer
            .execute_batch("INSERT INTO Vacina (id, nome) VALUES (1, 'BCG');")
            .unwrap();
        drop(writer);

        let reader = SqliteExecutor::open(&path);
        let table = reader.execute("SELECT nome FROM Vacina", &[]).unwrap();
        assert_eq!(table.text_column("nome"), vec!["BCG"]);

        let err = reader
            .execute_batch("INSERT INTO Vacina (id, nome) VALUES (2, 'Penta');")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Query);
    }
}
