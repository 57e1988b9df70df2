use std::sync::{Arc, Mutex};

use log::error;
use pharmaqr_core::{
    render_code, CodeEncoderOptions, GeneratedCode, SqliteTabletRepository, TabletId,
    TabletResult, TabletService,
};
use rusqlite::Connection;
use tokio::task::spawn_blocking;

use super::{config::Config, error::ApiError};

type Service<'conn> = TabletService<SqliteTabletRepository<'conn>>;

/// Process-wide handles shared by every request.
pub struct AppState {
    pub config: Config,
    pub encoder_options: CodeEncoderOptions,
    conn: Mutex<Connection>,
}

impl AppState {
    /// Wraps an opened, migrated connection.
    pub fn new(config: Config, conn: Connection) -> Arc<Self> {
        Arc::new(Self {
            config,
            encoder_options: CodeEncoderOptions::default(),
            conn: Mutex::new(conn),
        })
    }

    /// Runs one tablet use case on the blocking pool.
    ///
    /// The connection lock is held only inside the blocking task.
    pub async fn run<T, F>(self: &Arc<Self>, operation: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Service<'_>) -> TabletResult<T> + Send + 'static,
    {
        let state = Arc::clone(self);
        blocking(move || state.with_service(operation)).await
    }

    /// Loads the record under the lock, then renders its code after releasing it.
    pub async fn generate_code(
        self: &Arc<Self>,
        id: TabletId,
        base_url: String,
    ) -> Result<GeneratedCode, ApiError> {
        let state = Arc::clone(self);
        blocking(move || {
            let target = state.with_service(|service| service.code_target(id, &base_url))?;
            Ok(render_code(target, &state.encoder_options)?)
        })
        .await
    }

    fn with_service<T>(
        &self,
        operation: impl FnOnce(&Service<'_>) -> TabletResult<T>,
    ) -> Result<T, ApiError> {
        let conn = self.conn.lock().map_err(|_| {
            error!("event=store_lock module=server status=error error_code=lock_poisoned");
            ApiError::Internal("storage handle unavailable".to_string())
        })?;
        let service = TabletService::with_encoder_options(
            SqliteTabletRepository::new(&conn),
            self.encoder_options,
        );
        operation(&service).map_err(ApiError::from)
    }
}

async fn blocking<T, F>(task: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    spawn_blocking(task).await.map_err(|err| {
        error!("event=blocking_task module=server status=error error={err}");
        ApiError::Internal("request task failed".to_string())
    })?
}
