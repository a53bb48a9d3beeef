//! [`SqliteStore`] — the SQLite implementation of [`CorpusStore`] and
//! [`ChatStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use agora_core::{
  chat::{Session, Turn, session_title_from_query},
  corpus::{CorpusKind, CorpusRecord},
  result::ResolutionResult,
  store::{ChatStore, CorpusStore},
};

use crate::{
  Error, Result,
  encode::{RawSession, RawTurn, encode_dt, encode_response, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The user's most recent session, if any.
  async fn latest_session(&self, user_id: &str) -> Result<Option<Session>> {
    let user = user_id.to_owned();

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT session_id, user_id, title, created_at
               FROM chat_sessions
               WHERE user_id = ?1
               ORDER BY created_at DESC
               LIMIT 1",
              rusqlite::params![user],
              |row| {
                Ok(RawSession {
                  session_id: row.get(0)?,
                  user_id:    row.get(1)?,
                  title:      row.get(2)?,
                  created_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }
}

// ─── CorpusStore impl ────────────────────────────────────────────────────────

impl CorpusStore for SqliteStore {
  type Error = Error;

  async fn get_record(
    &self,
    kind: CorpusKind,
    id: i64,
  ) -> Result<Option<CorpusRecord>> {
    let sql = format!(
      "SELECT id, title, description, url FROM {} WHERE id = ?1",
      kind.table()
    );

    let record = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], |row| {
              Ok(CorpusRecord {
                id:          row.get(0)?,
                title:       row.get(1)?,
                description: row.get(2)?,
                url:         row.get(3)?,
              })
            })
            .optional()?,
        )
      })
      .await?;

    Ok(record)
  }

  async fn list_records(&self, kind: CorpusKind) -> Result<Vec<CorpusRecord>> {
    let sql = format!(
      "SELECT id, title, description, url FROM {} ORDER BY id",
      kind.table()
    );

    let records = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(CorpusRecord {
              id:          row.get(0)?,
              title:       row.get(1)?,
              description: row.get(2)?,
              url:         row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(records)
  }

  async fn replace_records(
    &self,
    kind: CorpusKind,
    rows: Vec<CorpusRecord>,
  ) -> Result<()> {
    let table = kind.table();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(&format!("DELETE FROM {table}"), [])?;
        {
          let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} (id, title, description, url)
             VALUES (?1, ?2, ?3, ?4)"
          ))?;
          for row in &rows {
            stmt.execute(rusqlite::params![
              row.id,
              row.title,
              row.description,
              row.url,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}

// ─── ChatStore impl ──────────────────────────────────────────────────────────

impl ChatStore for SqliteStore {
  type Error = Error;

  async fn get_or_create_session(
    &self,
    user_id: &str,
    session_id: Option<Uuid>,
  ) -> Result<Option<Session>> {
    // An explicit reference must exist and belong to the caller.
    if let Some(sid) = session_id {
      let sid_str = encode_uuid(sid);
      let user = user_id.to_owned();

      let raw: Option<RawSession> = self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT session_id, user_id, title, created_at
                 FROM chat_sessions
                 WHERE session_id = ?1 AND user_id = ?2",
                rusqlite::params![sid_str, user],
                |row| {
                  Ok(RawSession {
                    session_id: row.get(0)?,
                    user_id:    row.get(1)?,
                    title:      row.get(2)?,
                    created_at: row.get(3)?,
                  })
                },
              )
              .optional()?,
          )
        })
        .await?;

      return raw.map(RawSession::into_session).transpose();
    }

    match self.latest_session(user_id).await? {
      Some(session) => Ok(Some(session)),
      None => Ok(Some(self.start_new_session(user_id).await?)),
    }
  }

  async fn start_new_session(&self, user_id: &str) -> Result<Session> {
    let session = Session {
      session_id: Uuid::new_v4(),
      user_id:    user_id.to_owned(),
      title:      None,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(session.session_id);
    let user   = session.user_id.clone();
    let at_str = encode_dt(session.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO chat_sessions (session_id, user_id, title, created_at)
           VALUES (?1, ?2, NULL, ?3)",
          rusqlite::params![id_str, user, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn record_turn(
    &self,
    session_id: Uuid,
    query: &str,
    response: &ResolutionResult,
  ) -> Result<Turn> {
    let created_at = Utc::now();

    let sid_str      = encode_uuid(session_id);
    let query_owned  = query.to_owned();
    let response_str = encode_response(response)?;
    let title        = session_title_from_query(query);
    let at_str       = encode_dt(created_at);

    let turn_id: i64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO chat_histories (session_id, query, response, feedback, created_at)
           VALUES (?1, ?2, ?3, NULL, ?4)",
          rusqlite::params![sid_str, query_owned, response_str, at_str],
        )?;
        let turn_id = tx.last_insert_rowid();

        // The first turn of an untitled session names it.
        tx.execute(
          "UPDATE chat_sessions SET title = ?1
           WHERE session_id = ?2 AND title IS NULL",
          rusqlite::params![title, sid_str],
        )?;

        tx.commit()?;
        Ok(turn_id)
      })
      .await?;

    Ok(Turn {
      turn_id,
      session_id,
      query: query.to_owned(),
      response: response.clone(),
      feedback: None,
      created_at,
    })
  }

  async fn list_sessions(&self, user_id: &str) -> Result<Vec<Session>> {
    let user = user_id.to_owned();

    let raws: Vec<RawSession> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT session_id, user_id, title, created_at
           FROM chat_sessions
           WHERE user_id = ?1
           ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |row| {
            Ok(RawSession {
              session_id: row.get(0)?,
              user_id:    row.get(1)?,
              title:      row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSession::into_session).collect()
  }

  async fn list_turns(&self, session_id: Uuid) -> Result<Vec<Turn>> {
    let sid_str = encode_uuid(session_id);

    let raws: Vec<RawTurn> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT turn_id, session_id, query, response, feedback, created_at
           FROM chat_histories
           WHERE session_id = ?1
           ORDER BY turn_id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![sid_str], |row| {
            Ok(RawTurn {
              turn_id:    row.get(0)?,
              session_id: row.get(1)?,
              query:      row.get(2)?,
              response:   row.get(3)?,
              feedback:   row.get(4)?,
              created_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTurn::into_turn).collect()
  }

  async fn attach_feedback(&self, user_id: &str, feedback: &str) -> Result<bool> {
    let user = user_id.to_owned();
    let text = feedback.to_owned();

    let updated: usize = self
      .conn
      .call(move |conn| {
        let latest: Option<String> = conn
          .query_row(
            "SELECT session_id FROM chat_sessions
             WHERE user_id = ?1
             ORDER BY created_at DESC
             LIMIT 1",
            rusqlite::params![user],
            |row| row.get(0),
          )
          .optional()?;

        let Some(sid) = latest else { return Ok(0) };

        Ok(conn.execute(
          "UPDATE chat_histories SET feedback = ?1
           WHERE turn_id = (
             SELECT turn_id FROM chat_histories
             WHERE session_id = ?2
             ORDER BY turn_id DESC
             LIMIT 1
           )",
          rusqlite::params![text, sid],
        )?)
      })
      .await?;

    Ok(updated > 0)
  }

  async fn delete_session(&self, session_id: Uuid) -> Result<bool> {
    let sid_str = encode_uuid(session_id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM chat_sessions WHERE session_id = ?1",
          rusqlite::params![sid_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }
}
