use std::path::Path;

use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{Movie, NewMovie, User};

use super::schema::SCHEMA;

/// Result of an insert that may collide with a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    Duplicate,
    EmptyName,
}

/// Persistence handle for profiles and their movies. Opened once at startup
/// and released with [`Repository::close`] on shutdown.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn open(db_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        tracing::debug!("Opened movie database at {}", db_path);
        Ok(Self { conn })
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }

    // User operations

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id")?;
                let users = stmt
                    .query_map([], user_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(users)
            })
            .await?;
        Ok(users)
    }

    pub async fn create_user(&self, name: &str) -> Result<InsertOutcome> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Ok(InsertOutcome::EmptyName);
        }

        let outcome = self
            .conn
            .call(move |conn| {
                let inserted = conn.execute("INSERT INTO users (name) VALUES (?1)", params![name]);
                unique_outcome(conn, inserted)
            })
            .await?;
        Ok(outcome)
    }

    pub async fn user_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        let name = name.to_string();
        let id = self
            .conn
            .call(move |conn| {
                let id = conn
                    .query_row(
                        "SELECT id FROM users WHERE name = ?1",
                        params![name],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(id)
            })
            .await?;
        Ok(id)
    }

    // Movie operations

    pub async fn list_movies(&self, user_id: i64) -> Result<Vec<Movie>> {
        let movies = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT title, year, rating, poster, note, imdb_id, country, soundtrack_url
                       FROM movies
                       WHERE user_id = ?1
                       ORDER BY id"#,
                )?;
                let movies = stmt
                    .query_map(params![user_id], movie_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(movies)
            })
            .await?;
        Ok(movies)
    }

    pub async fn insert_movie(&self, movie: NewMovie) -> Result<InsertOutcome> {
        if movie.title.trim().is_empty() {
            return Ok(InsertOutcome::EmptyName);
        }

        let outcome = self
            .conn
            .call(move |conn| {
                let inserted = conn.execute(
                    r#"INSERT INTO movies (user_id, title, year, rating, poster, imdb_id, country, soundtrack_url)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
                    params![
                        movie.user_id,
                        movie.title,
                        movie.year,
                        movie.rating,
                        movie.poster,
                        movie.imdb_id,
                        movie.country,
                        movie.soundtrack_url,
                    ],
                );
                unique_outcome(conn, inserted)
            })
            .await?;
        Ok(outcome)
    }

    /// Returns whether a movie with that title existed for the user.
    pub async fn delete_movie(&self, user_id: i64, title: &str) -> Result<bool> {
        let title = title.to_string();
        let deleted = self
            .conn
            .call(move |conn| {
                let rows = conn.execute(
                    "DELETE FROM movies WHERE user_id = ?1 AND title = ?2",
                    params![user_id, title],
                )?;
                Ok(rows > 0)
            })
            .await?;
        Ok(deleted)
    }

    // Not reachable from the menu; the update command edits notes.
    #[allow(dead_code)]
    pub async fn update_rating(&self, user_id: i64, title: &str, rating: f64) -> Result<bool> {
        let title = title.to_string();
        let updated = self
            .conn
            .call(move |conn| {
                let rows = conn.execute(
                    "UPDATE movies SET rating = ?1 WHERE user_id = ?2 AND title = ?3",
                    params![rating, user_id, title],
                )?;
                Ok(rows > 0)
            })
            .await?;
        Ok(updated)
    }

    pub async fn update_note(&self, user_id: i64, title: &str, note: &str) -> Result<bool> {
        let title = title.to_string();
        let note = note.to_string();
        let updated = self
            .conn
            .call(move |conn| {
                let rows = conn.execute(
                    "UPDATE movies SET note = ?1 WHERE user_id = ?2 AND title = ?3",
                    params![note, user_id, title],
                )?;
                Ok(rows > 0)
            })
            .await?;
        Ok(updated)
    }
}

/// Maps a UNIQUE violation to `Duplicate`; every other failure propagates.
fn unique_outcome(
    conn: &rusqlite::Connection,
    inserted: rusqlite::Result<usize>,
) -> tokio_rusqlite::Result<InsertOutcome> {
    match inserted {
        Ok(_) => Ok(InsertOutcome::Inserted(conn.last_insert_rowid())),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Ok(InsertOutcome::Duplicate)
        }
        Err(e) => Err(e.into()),
    }
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn movie_from_row(row: &Row) -> rusqlite::Result<Movie> {
    Ok(Movie {
        title: row.get(0)?,
        year: row.get(1)?,
        rating: row.get(2)?,
        poster: row.get(3)?,
        note: row.get(4)?,
        imdb_id: row.get(5)?,
        country: row.get(6)?,
        soundtrack_url: row.get(7)?,
    })
}
