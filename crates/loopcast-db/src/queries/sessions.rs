//! Client session queries.
//!
//! A session pins a client to the wall-clock instant it first tuned in.
//! Everything the client sees afterwards is derived from that anchor, so
//! the row is written once and never updated.

use rusqlite::{params, Connection};

use loopcast_core::{ClientId, ClientSession, Error, Result};

/// Session for a known client, `None` if the client never tuned in.
pub fn get(conn: &Connection, client_id: &ClientId) -> Result<Option<ClientSession>> {
    match conn.query_row(
        "SELECT session_start_ms FROM sessions WHERE client_id = ?1",
        params![client_id.to_string()],
        |row| row.get(0),
    ) {
        Ok(session_start_ms) => Ok(Some(ClientSession {
            client_id: *client_id,
            session_start_ms,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Record the session anchor for a client, keeping the existing one if two
/// requests race. Returns the session actually stored.
pub fn create_if_absent(
    conn: &Connection,
    client_id: &ClientId,
    start_ms: i64,
) -> Result<ClientSession> {
    conn.execute(
        "INSERT OR IGNORE INTO sessions (client_id, session_start_ms) VALUES (?1, ?2)",
        params![client_id.to_string(), start_ms],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    get(conn, client_id)?
        .ok_or_else(|| Error::database("session row missing after insert".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn unknown_client_has_no_session() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        assert_eq!(get(&conn, &ClientId::new()).unwrap(), None);
    }

    #[test]
    fn create_then_get_returns_anchor() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let client = ClientId::new();

        let session = create_if_absent(&conn, &client, 1_000).unwrap();
        assert_eq!(session.session_start_ms, 1_000);
        assert_eq!(get(&conn, &client).unwrap(), Some(session));
    }

    #[test]
    fn second_create_keeps_first_anchor() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let client = ClientId::new();

        create_if_absent(&conn, &client, 1_000).unwrap();
        let session = create_if_absent(&conn, &client, 9_000).unwrap();
        assert_eq!(session.session_start_ms, 1_000);
    }
}
