use std::time::SystemTime;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::errors::ServerError;
use crate::models::note::{NoteMetadata, StoredNote};
use crate::schema::notes::dsl::*;
use crate::utils::{to_epoch_secs, to_system_time};

use super::NoteStore;

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Build the connection pool and run pending migrations.
    pub fn connect(database_url: &str) -> Result<Self, ServerError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = r2d2::Pool::builder().build(manager)?;

        let mut connection = pool.get()?;
        connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|_| ServerError::DieselError)?;

        Ok(PgStore { pool })
    }
}

impl NoteStore for PgStore {
    fn put(&self, note_id: &str, content: &str, metadata: &NoteMetadata) -> Result<(), ServerError> {
        let mut connection = self.pool.get()?;

        diesel::insert_into(notes)
            .values((
                &id.eq(note_id),
                &ciphertext.eq(content),
                &delete_after_read.eq(metadata.delete_after_read),
                &created_at.eq(SystemTime::now()),
                &expires_at.eq(to_system_time(metadata.expires_at)),
            ))
            .execute(&mut connection)?;

        Ok(())
    }

    fn get_with_metadata(&self, note_id: &str) -> Result<Option<StoredNote>, ServerError> {
        let mut connection = self.pool.get()?;

        match notes
            .select((ciphertext, delete_after_read, expires_at))
            .find(note_id.to_owned())
            .get_result::<(String, bool, SystemTime)>(&mut connection)
        {
            Ok((content, burn, expiry)) => {
                if expiry <= SystemTime::now() {
                    // past expiry but not yet swept
                    diesel::delete(notes.filter(id.eq(note_id.to_owned())))
                        .execute(&mut connection)?;
                    return Ok(None);
                }

                Ok(Some(StoredNote {
                    ciphertext: content,
                    metadata: NoteMetadata {
                        expires_at: to_epoch_secs(expiry),
                        delete_after_read: burn,
                    },
                }))
            }
            Err(diesel::result::Error::NotFound) => Ok(None),
            Err(_) => Err(ServerError::DieselError),
        }
    }

    fn delete(&self, note_id: &str) -> Result<bool, ServerError> {
        let mut connection = self.pool.get()?;

        let removed = diesel::delete(notes.filter(id.eq(note_id.to_owned())))
            .execute(&mut connection)?;
        Ok(removed > 0)
    }

    fn purge_expired(&self) -> Result<usize, ServerError> {
        let mut connection = self.pool.get()?;

        let removed = diesel::delete(notes.filter(expires_at.le(SystemTime::now())))
            .execute(&mut connection)?;
        Ok(removed)
    }
}
