//! Async runtime bridge
//!
//! The public API is blocking while drivers may use async I/O underneath.
//! [`Runtime`] runs those futures to completion from synchronous code on a
//! process-wide tokio runtime, whatever context the caller is in:
//!
//! * outside any tokio runtime the calling thread blocks on the shared runtime
//! * inside a multi-threaded runtime the worker is handed off with
//!   `block_in_place`
//! * inside a current-thread runtime the future is driven from a scoped helper
//!   thread, since that runtime's only thread may not block on another
//!
//! Sessions only hold a [`tokio::runtime::Handle`], so dropping a connection
//! never tears down a runtime.

use std::fmt;
use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::{Handle, RuntimeFlavor};

static SHARED: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

/// Handle to the shared driver runtime
#[derive(Clone)]
pub struct Runtime {
    handle: Handle,
}

impl Runtime {
    /// Handle to the process-wide runtime, starting it on first use
    pub fn shared() -> std::io::Result<Self> {
        if let Some(rt) = SHARED.get() {
            return Ok(Self::from_runtime(rt));
        }

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("taos-connect-rt")
            .enable_all()
            .build()?;

        if let Err(rt) = SHARED.set(rt) {
            // Lost the race; this copy never ran a task.
            rt.shutdown_background();
        }

        SHARED
            .get()
            .map(Self::from_runtime)
            .ok_or_else(|| std::io::Error::other("driver runtime unavailable"))
    }

    fn from_runtime(rt: &tokio::runtime::Runtime) -> Self {
        Self {
            handle: rt.handle().clone(),
        }
    }

    /// Block the calling thread until `fut` completes
    pub fn block_on<F>(&self, fut: F) -> F::Output
    where
        F: Future + Send,
        F::Output: Send,
    {
        match Handle::try_current().map(|h| h.runtime_flavor()) {
            Err(_) => self.handle.block_on(fut),
            Ok(RuntimeFlavor::MultiThread) => {
                tokio::task::block_in_place(|| self.handle.block_on(fut))
            }
            Ok(_) => std::thread::scope(|s| {
                match s.spawn(|| self.handle.block_on(fut)).join() {
                    Ok(output) => output,
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }),
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("flavor", &self.handle.runtime_flavor())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on_outside_tokio() {
        let rt = Runtime::shared().unwrap();
        assert_eq!(rt.block_on(async { 40 + 2 }), 42);
    }

    #[test]
    fn test_shared_runtime_is_multi_thread() {
        let rt = Runtime::shared().unwrap();
        assert_eq!(rt.handle.runtime_flavor(), RuntimeFlavor::MultiThread);
        assert!(SHARED.get().is_some());
    }

    #[test]
    fn test_block_on_inside_multi_thread_runtime() {
        let outer = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();

        let value = outer.block_on(async {
            tokio::spawn(async {
                let rt = Runtime::shared().unwrap();
                rt.block_on(async { "bridged" })
            })
            .await
            .unwrap()
        });
        assert_eq!(value, "bridged");
    }

    #[tokio::test]
    async fn test_block_on_inside_current_thread_runtime() {
        let rt = Runtime::shared().unwrap();
        let value = rt.block_on(async {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            7
        });
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_drop_inside_async_context() {
        let rt = Runtime::shared().unwrap();
        assert_eq!(rt.block_on(async { 1 }), 1);
        drop(rt);
    }
}
