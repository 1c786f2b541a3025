use tokio::{
    sync::{mpsc, oneshot},
    task,
};

use keeper_store::BookmarkStore;

#[derive(Debug)]
pub(crate) enum PersistJob {
    /// Overwrite the stored bookmark list.
    Save(Vec<String>),
    /// Answer once every job queued before it has been applied.
    Flush(oneshot::Sender<()>),
}

pub(crate) type PersistQueue = mpsc::UnboundedSender<PersistJob>;

/// Set up before the controller takes any action.
/// One worker applies saves in the order they were queued, so the last committed list is the one stored.
/// Failures are logged and never reach the sender.
pub(crate) fn listen_bookmark_persist(store: BookmarkStore) -> PersistQueue {
    let (job_sender, mut job_receiver) = mpsc::unbounded_channel::<PersistJob>();

    task::spawn(async move {
        while let Some(job) = job_receiver.recv().await {
            match job {
                PersistJob::Save(ids) => {
                    let store = store.clone();
                    let count = ids.len();
                    match task::spawn_blocking(move || store.save(&ids)).await {
                        Ok(Ok(())) => tracing::debug!("Persisted {} bookmarks", count),
                        Ok(Err(e)) => tracing::error!("Bookmark save failed: {}", e),
                        Err(e) => tracing::error!("Bookmark save job aborted: {}", e),
                    }
                }
                PersistJob::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        tracing::debug!("Bookmark persistence queue closed");
    });

    job_sender
}
