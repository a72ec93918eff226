//! Embedded PostgreSQL databases for the Diesel suites.
//!
//! One cluster is shared per test binary. Each test gets a fresh database
//! cloned from a template that already has every migration applied, so
//! suites start from the real schema without re-running migrations.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

use wellness::domain::ports::UserRepository;
use wellness::domain::{Email, User, UserId, Username};
use wellness::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};

use super::{format_postgres_error, handle_cluster_setup_failure};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "wellness_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);
const STABLE_PASSWORD: &str = "wellness_embedded_test";

/// Shared cluster for this test binary.
///
/// `postgresql_embedded` picks a random password per bootstrap, but a data
/// directory left by an earlier binary keeps the password it was created
/// with, so `PG_PASSWORD` is pinned while the handle is created.
fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _password = std::env::var_os("PG_PASSWORD")
        .is_none()
        .then(|| env_lock::lock_env([("PG_PASSWORD", Some(STABLE_PASSWORD))]));
    pg_embedded_setup_unpriv::test_support::shared_cluster_handle()
        .map_err(|err| format!("start shared cluster: {err:?}"))
}

fn template_database_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Create the migrated template once per migration set.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        let mut conn = PgConnection::establish(&url).map_err(|err| format!("{err:?}"))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|err| format!("migration: {err:?}"))?;
    }
    Ok(template_name)
}

fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::from("no provisioning attempt ran");
    for attempt in 1..=PROVISION_RETRIES {
        let cloned = ensure_template_database(cluster).and_then(|template| {
            cluster
                .temporary_database_from_template(
                    format!("test_{}", Uuid::new_v4()).as_str(),
                    template.as_str(),
                )
                .map_err(|err| format!("clone template: {err:?}"))
        });
        match cloned {
            Ok(database) => return Ok(database),
            Err(error) => last_error = format!("attempt {attempt}/{PROVISION_RETRIES}: {error}"),
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// Drop `table` (and anything depending on it) to simulate schema loss.
///
/// Goes through `postgres` rather than the pool so the statement runs
/// outside any Diesel transaction.
pub fn drop_table(url: &str, table: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("DROP TABLE IF EXISTS {table} CASCADE;"))
        .map_err(|err| format_postgres_error(&err))
}

/// A migrated temporary database with a pool and a runtime to drive it.
pub struct DieselDb {
    pub runtime: Runtime,
    pub pool: DbPool,
    pub database_url: String,
    _database: TemporaryDatabase,
}

impl DieselDb {
    /// Provision a database, or `None` when the cluster may be skipped.
    pub fn provision() -> Option<Self> {
        match Self::try_provision() {
            Ok(db) => Some(db),
            Err(reason) => handle_cluster_setup_failure(reason),
        }
    }

    fn try_provision() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let cluster = shared_cluster()?;
        let database = provision_database(cluster)?;
        let database_url = database.url().to_string();
        let config = PoolConfig::new(&database_url)
            .with_max_size(4)
            .with_min_idle(Some(1));
        let pool = runtime
            .block_on(DbPool::new(config))
            .map_err(|err| err.to_string())?;
        Ok(Self {
            runtime,
            pool,
            database_url,
            _database: database,
        })
    }

    /// Insert an account named `name` and return it.
    pub fn seed_user(&self, name: &str) -> User {
        let user = User::new(
            UserId::random(),
            Username::new(name).expect("valid username"),
            Email::new(format!("{name}@example.com")).expect("valid email"),
            "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_owned(),
            at(2026, 3, 1, 9),
        );
        let users = DieselUserRepository::new(self.pool.clone());
        self.runtime
            .block_on(users.insert(&user))
            .expect("seed user inserts");
        user
    }
}

/// Whole-hour UTC instant; PostgreSQL keeps it without rounding.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}
