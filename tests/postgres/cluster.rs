//! Embedded `PostgreSQL` cluster shared by the store integration tests.
//!
//! The cluster is started once per test binary. Unprivileged runners start
//! it in process; root runners delegate lifecycle calls to the worker named
//! by `PG_EMBEDDED_WORKER` (or a `pg_worker` found on `PATH`).

use crate::test_helpers::EnvVarGuard;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use diesel::prelude::*;
use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{
    ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests, detect_execution_privileges,
};
use postgresql_embedded::{PostgreSQL, Settings, Status};
use rstest::fixture;
use std::ffi::{OsStr, OsString};
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// Boxed error type for harness failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

static SHARED_CLUSTER: OnceLock<ManagedCluster> = OnceLock::new();
static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Shared cluster handle handed to fixtures.
pub type PostgresCluster = &'static ManagedCluster;

/// Builds a runtime for driving async store calls from synchronous tests.
///
/// # Errors
///
/// Returns an error when the runtime cannot be built.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

/// Embedded `PostgreSQL` cluster kept alive for the test binary.
pub struct ManagedCluster {
    bootstrap: TestBootstrapSettings,
    env_vars: Vec<(String, Option<String>)>,
    runtime: Option<Runtime>,
    postgres: Option<PostgreSQL>,
}

impl ManagedCluster {
    fn new() -> Result<Self, BoxError> {
        let worker_env = worker_env_changes()?;
        let worker_guard = EnvVarGuard::set_many(&worker_env);
        let mut bootstrap = bootstrap_for_tests().map_err(|err| Box::new(err) as BoxError)?;
        drop(worker_guard);
        sync_password_from_file(&mut bootstrap.settings)?;
        let env_vars = bootstrap.environment.to_env();
        let mut cluster = Self {
            bootstrap,
            env_vars,
            runtime: None,
            postgres: None,
        };
        cluster.start()?;
        Ok(cluster)
    }

    /// Returns the connection URL for `database` on this cluster.
    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        self.bootstrap.settings.url(database)
    }

    /// Creates `template` and migrates it unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error when creation or migration fails; a half-built
    /// template is dropped again.
    pub fn ensure_template_exists<F>(&self, template: &str, migrate: F) -> Result<(), BoxError>
    where
        F: FnOnce(&str) -> Result<(), BoxError>,
    {
        let lock = TEMPLATE_LOCK.get_or_init(|| Mutex::new(()));
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.database_exists(template)? {
            return Ok(());
        }

        self.execute_admin_sql(&format!("CREATE DATABASE {}", quote_identifier(template)))?;
        if let Err(err) = migrate(&self.database_url(template)) {
            self.drop_database(template)?;
            return Err(err);
        }
        Ok(())
    }

    /// Creates `database` as a copy of `template`.
    ///
    /// # Errors
    ///
    /// Returns an error when the admin statement fails.
    pub fn create_database_from_template(
        &self,
        database: &str,
        template: &str,
    ) -> Result<(), BoxError> {
        self.execute_admin_sql(&format!(
            "CREATE DATABASE {} TEMPLATE {}",
            quote_identifier(database),
            quote_identifier(template),
        ))
    }

    /// Drops `database`, disconnecting any remaining sessions.
    ///
    /// # Errors
    ///
    /// Returns an error when the admin statement fails.
    pub fn drop_database(&self, database: &str) -> Result<(), BoxError> {
        self.execute_admin_sql(&format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(database)
        ))
    }

    fn start(&mut self) -> Result<(), BoxError> {
        match self.bootstrap.privileges {
            ExecutionPrivileges::Root => self.start_via_worker(),
            ExecutionPrivileges::Unprivileged => self.start_in_process(),
        }
    }

    fn start_in_process(&mut self) -> Result<(), BoxError> {
        let runtime = test_runtime()?;
        let env_guard = EnvVarGuard::set_many(&env_vars_to_os(&self.env_vars));
        let mut postgres = PostgreSQL::new(self.bootstrap.settings.clone());
        runtime.block_on(async {
            postgres
                .setup()
                .await
                .map_err(|err| Box::new(err) as BoxError)?;
            if !matches!(postgres.status(), Status::Started) {
                postgres
                    .start()
                    .await
                    .map_err(|err| Box::new(err) as BoxError)?;
            }
            Ok::<(), BoxError>(())
        })?;
        drop(env_guard);
        self.bootstrap.settings = postgres.settings().clone();
        sync_port_from_pid(&mut self.bootstrap.settings)?;
        self.runtime = Some(runtime);
        self.postgres = Some(postgres);
        Ok(())
    }

    fn start_via_worker(&mut self) -> Result<(), BoxError> {
        self.run_worker_operation(WorkerOperation::Setup, self.bootstrap.setup_timeout)?;
        self.run_worker_operation(WorkerOperation::Start, self.bootstrap.start_timeout)?;
        sync_port_from_pid(&mut self.bootstrap.settings)?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BoxError> {
        let Some(postgres) = self.postgres.take() else {
            if matches!(self.bootstrap.privileges, ExecutionPrivileges::Root) {
                self.run_worker_operation(WorkerOperation::Stop, self.bootstrap.shutdown_timeout)?;
            }
            return Ok(());
        };
        let Some(runtime) = &self.runtime else {
            return Ok(());
        };
        runtime.block_on(async {
            postgres
                .stop()
                .await
                .map_err(|err| Box::new(err) as BoxError)
        })
    }

    fn run_worker_operation(
        &self,
        operation: WorkerOperation,
        timeout: Duration,
    ) -> Result<(), BoxError> {
        let worker = self.bootstrap.worker_binary.as_ref().ok_or_else(|| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "PG_EMBEDDED_WORKER is not set for worker operation",
            )) as BoxError
        })?;
        let args = WorkerRequestArgs {
            worker: worker.as_path(),
            settings: &self.bootstrap.settings,
            env_vars: &self.env_vars,
            operation,
            timeout,
        };
        run_worker(&WorkerRequest::new(args)).map_err(|err| Box::new(err) as BoxError)
    }

    fn execute_admin_sql(&self, sql: &str) -> Result<(), BoxError> {
        let mut conn = PgConnection::establish(&self.database_url("postgres"))
            .map_err(|err| Box::new(err) as BoxError)?;
        diesel::sql_query(sql)
            .execute(&mut conn)
            .map_err(|err| Box::new(err) as BoxError)?;
        Ok(())
    }

    fn database_exists(&self, database: &str) -> Result<bool, BoxError> {
        #[derive(diesel::QueryableByName)]
        struct ExistsRow {
            #[diesel(sql_type = diesel::sql_types::Bool)]
            exists: bool,
        }

        let mut conn = PgConnection::establish(&self.database_url("postgres"))
            .map_err(|err| Box::new(err) as BoxError)?;
        let row = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS exists",
        )
        .bind::<diesel::sql_types::Text, _>(database)
        .get_result::<ExistsRow>(&mut conn)
        .map_err(|err| Box::new(err) as BoxError)?;
        Ok(row.exists)
    }
}

impl Drop for ManagedCluster {
    fn drop(&mut self) {
        drop(self.stop());
    }
}

/// Provides the shared cluster, starting it on first use.
#[fixture]
pub fn postgres_cluster() -> PostgresCluster {
    SHARED_CLUSTER.get_or_init(|| match ManagedCluster::new() {
        Ok(cluster) => cluster,
        Err(err) => panic!("failed to start embedded PostgreSQL: {err}"),
    })
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn env_vars_to_os(env_vars: &[(String, Option<String>)]) -> Vec<(OsString, Option<OsString>)> {
    env_vars
        .iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

fn worker_env_changes() -> Result<Vec<(OsString, Option<OsString>)>, BoxError> {
    let mut changes = Vec::new();
    if let Some(port) = resolve_pg_port()? {
        changes.push((OsString::from("PG_PORT"), Some(port)));
    }

    if matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && std::env::var_os("PG_EMBEDDED_WORKER").is_none()
    {
        let worker = locate_pg_worker_in_path().ok_or_else(|| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "running as root needs PG_EMBEDDED_WORKER or a pg_worker binary on PATH",
            )) as BoxError
        })?;
        changes.push((OsString::from("PG_EMBEDDED_WORKER"), Some(worker)));
    }

    Ok(changes)
}

fn resolve_pg_port() -> Result<Option<OsString>, BoxError> {
    if std::env::var_os("PG_PORT").is_some() {
        return Ok(None);
    }
    let listener = TcpListener::bind(("127.0.0.1", 0)).map_err(|err| Box::new(err) as BoxError)?;
    let port = listener
        .local_addr()
        .map(|addr| addr.port())
        .map_err(|err| Box::new(err) as BoxError)?;
    drop(listener);
    Ok(Some(OsString::from(port.to_string())))
}

fn locate_pg_worker_in_path() -> Option<OsString> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join("pg_worker"))
        .find(|candidate| candidate.is_file())
        .map(std::path::PathBuf::into_os_string)
}

fn open_ambient_dir(path: &Path) -> Result<Dir, BoxError> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| Box::new(err) as BoxError)
}

fn open_parent_dir(path: &Path) -> Result<(Dir, &OsStr), BoxError> {
    let file_name = path.file_name().ok_or_else(|| {
        Box::new(std::io::Error::other("path must include a file name")) as BoxError
    })?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    Ok((open_ambient_dir(parent)?, file_name))
}

fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    let (dir, file_name) = open_parent_dir(&settings.password_file)?;
    match dir.read_to_string(file_name) {
        Ok(contents) => {
            let password = contents.trim_end();
            if !password.is_empty() {
                password.clone_into(&mut settings.password);
            }
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(Box::new(err) as BoxError),
    }
}

fn sync_port_from_pid(settings: &mut Settings) -> Result<(), BoxError> {
    let data_dir = open_ambient_dir(&settings.data_dir)?;
    let contents = match data_dir.read_to_string("postmaster.pid") {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(Box::new(err) as BoxError),
    };
    // Line four of postmaster.pid holds the listening port.
    if let Some(port) = contents
        .lines()
        .nth(3)
        .and_then(|line| line.trim().parse::<u16>().ok())
    {
        settings.port = port;
    }
    Ok(())
}
