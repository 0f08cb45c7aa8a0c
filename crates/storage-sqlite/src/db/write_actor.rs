use crate::errors::StorageError;
use diesel::SqliteConnection;
use log::{debug, error};
use quotes_core::errors::{DatabaseError, Error, Result};
use std::any::Any;
use std::thread;
use tokio::sync::{mpsc, oneshot};

const WRITER_QUEUE_DEPTH: usize = 256;

type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type Erased = Box<dyn Any + Send + 'static>;
type Envelope = (Job<Erased>, oneshot::Sender<Result<Erased>>);

/// Handle for sending jobs to the writer thread.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Executes a job inside an immediate transaction on the writer's connection.
    ///
    /// Jobs run one at a time in submission order. If the caller stops waiting,
    /// the job still runs to completion and its result is dropped.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((Box::new(move |c| job(c).map(|v| Box::new(v) as Erased)), ret_tx))
            .await
            .map_err(|_| writer_gone("writer is not accepting jobs"))?;

        let boxed = ret_rx
            .await
            .map_err(|_| writer_gone("writer dropped the job without replying"))??;

        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::Unexpected("writer returned a value of the wrong type".to_string()))
    }
}

fn writer_gone(detail: &str) -> Error {
    Error::Database(DatabaseError::Internal(detail.to_string()))
}

/// Starts the single database writer on a dedicated OS thread.
///
/// The writer owns a dedicated connection opened outside the pool, so reads
/// keep every pooled connection. It stops once every `WriteHandle` has been
/// dropped.
pub fn spawn_writer(database_url: &str) -> Result<WriteHandle> {
    let mut conn = super::establish_connection(database_url)?;
    let (tx, mut rx) = mpsc::channel::<Envelope>(WRITER_QUEUE_DEPTH);

    thread::Builder::new()
        .name("quotes-db-writer".to_string())
        .spawn(move || {
            debug!("Database writer started");
            while let Some((job, reply_tx)) = rx.blocking_recv() {
                let result: Result<Erased> = conn
                    .immediate_transaction::<_, StorageError, _>(|c| {
                        job(c).map_err(StorageError::from)
                    })
                    .map_err(Error::from);

                if let Err(Err(e)) = reply_tx.send(result) {
                    debug!("Write finished after its caller went away: {}", e);
                }
            }
            debug!("Database writer stopped");
        })
        .map_err(|e| {
            error!("Failed to start database writer thread: {}", e);
            writer_gone("failed to start writer thread")
        })?;

    Ok(WriteHandle { tx })
}
