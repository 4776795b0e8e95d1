//! Background task spawning for code that is not itself async.
//!
//! The elevation cache is read from a synchronous presentation loop but has
//! to start network fetches. [`TaskSpawner`] captures a Tokio runtime handle
//! up front so those fetches can be spawned from anywhere.

use std::future::Future;

use tokio::runtime::Handle;

/// Spawns detached futures onto a Tokio runtime.
///
/// Cloning shares the same runtime.
#[derive(Debug, Clone)]
pub struct TaskSpawner {
    handle: Handle,
}

impl TaskSpawner {
    /// Spawner for the runtime the caller is currently running on.
    ///
    /// Returns `None` outside a Tokio runtime context.
    #[must_use]
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::from_handle)
    }

    /// Spawner for an explicit runtime handle.
    #[must_use]
    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }

    /// Spawn a background task that runs to completion.
    ///
    /// The future must be `Send + 'static` and return `()`. Tasks that
    /// produce values report them through a channel (e.g. `async_channel`).
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        drop(self.handle.spawn(future));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_outside_runtime() {
        assert!(TaskSpawner::current().is_none());
    }

    #[tokio::test]
    async fn test_spawned_task_runs() {
        let spawner = TaskSpawner::current().unwrap();
        let (tx, rx) = async_channel::bounded(1);

        spawner.spawn(async move {
            let _ = tx.send(7_u32).await;
        });

        assert_eq!(rx.recv().await.unwrap(), 7);
    }
}
