use super::{Connection, ConnectionError, QueryError, Row};
use postgres::{Client, Config, NoTls, SimpleQueryMessage};
use std::{env, fmt::Debug, str::FromStr};
use tracing::{debug, info, trace};

/// Connection to a PostgreSQL server over the simple query protocol
pub struct PostgresConnection {
    client: Client,
}

impl Debug for PostgresConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("closed", &self.client.is_closed())
            .finish()
    }
}

impl PostgresConnection {
    /// Connect to the target described by `dsn`, either a key/value string
    /// (`host=localhost dbname=bench`) or a `postgresql://` URL. An empty
    /// string falls back to the usual `PG*` environment variables.
    pub fn load(dsn: &str) -> Result<Self, ConnectionError> {
        let config = if dsn.trim().is_empty() {
            default_config()
        } else {
            Config::from_str(dsn).map_err(ConnectionError::InvalidDsn)?
        };

        debug!(
            hosts = ?config.get_hosts(),
            user = ?config.get_user(),
            dbname = ?config.get_dbname(),
            "Connecting to PostgreSQL"
        );

        // the client never opens a transaction on its own, so every statement
        // below runs in autocommit mode and `vacuum` is allowed
        let client = config
            .connect(NoTls)
            .map_err(ConnectionError::Postgres)?;

        info!("Connected to PostgreSQL");

        Ok(Self { client })
    }
}

impl Connection for PostgresConnection {
    fn execute(&mut self, statements: &str) -> Result<(), QueryError> {
        trace!(statements, "execute");

        self.client
            .batch_execute(statements)
            .map_err(|error| QueryError::new(statements, error))
    }

    fn query(&mut self, query: &str) -> Result<Vec<Row>, QueryError> {
        trace!(query, "query");

        let messages = self
            .client
            .simple_query(query)
            .map_err(|error| QueryError::new(query, error))?;

        Ok(messages
            .into_iter()
            .filter_map(|message| match message {
                SimpleQueryMessage::Row(row) => Some(
                    (0..row.len())
                        .map(|index| row.get(index).map(str::to_owned))
                        .collect(),
                ),
                _ => None,
            })
            .collect())
    }
}

/// libpq style default target built from the environment
fn default_config() -> Config {
    let mut config = Config::new();

    config.host(&env::var("PGHOST").unwrap_or_else(|_| String::from("localhost")));

    if let Some(port) = env::var("PGPORT").ok().and_then(|port| port.parse().ok()) {
        config.port(port);
    }
    if let Ok(user) = env::var("PGUSER").or_else(|_| env::var("USER")) {
        config.user(&user);
    }
    if let Ok(password) = env::var("PGPASSWORD") {
        config.password(&password);
    }
    if let Ok(dbname) = env::var("PGDATABASE") {
        config.dbname(&dbname);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_dsn_is_rejected_before_connecting() {
        match PostgresConnection::load("host=localhost port=notaport") {
            Err(ConnectionError::InvalidDsn(_)) => {}
            other => panic!("expected an invalid dsn error, got {other:?}"),
        }
    }
}
