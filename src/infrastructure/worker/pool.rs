//! Worker Pool - 有界推理任务池
//!
//! 基于 Semaphore 控制并发。一个会话的两个任务一次性获取两个 permit，
//! 拆分后各持一个；任务结束或被 abort 时各自的 permit 随之释放

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{oneshot, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 最小容量：情感与摘要两个任务必须能同时运行
pub const MIN_POOL_CAPACITY: usize = 2;

/// 每个会话一次占用的槽位数
const PAIR_PERMITS: u32 = 2;

/// 任务执行错误
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    #[error("{0}")]
    Collaborator(String),

    #[error("Task cancelled")]
    Cancelled,

    #[error("Worker pool closed")]
    PoolClosed,
}

/// 任务池构造错误
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Worker pool capacity must be at least {min}, got {actual}")]
    CapacityTooSmall { min: usize, actual: usize },
}

/// 有界任务池
///
/// 所有会话共享同一个池；池本身是唯一的共享可变资源
#[derive(Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        if capacity < MIN_POOL_CAPACITY {
            return Err(PoolError::CapacityTooSmall {
                min: MIN_POOL_CAPACITY,
                actual: capacity,
            });
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前空闲槽位数
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// 成对提交一个会话的两个任务
    ///
    /// 两个槽位通过 `acquire_many_owned(2)` 一次性获取，再拆分给两个任务，
    /// 因此同一会话的两个任务要么一起开始，要么一起排队，不会被其它会话拆开。
    ///
    /// 等待槽位和执行期间都会响应取消令牌。取消只是尽力而为：
    /// 如果任务内部阻塞在不可中断的计算上，只有在它下一次让出时才会停止
    pub fn spawn_pair<A, B, FA, FB>(
        &self,
        names: (&'static str, &'static str),
        cancel: CancellationToken,
        first: FA,
        second: FB,
    ) -> (JoinHandle<Result<A, TaskError>>, JoinHandle<Result<B, TaskError>>)
    where
        A: Send + 'static,
        B: Send + 'static,
        FA: Future<Output = Result<A, TaskError>> + Send + 'static,
        FB: Future<Output = Result<B, TaskError>> + Send + 'static,
    {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let semaphore = self.semaphore.clone();
        let gate_cancel = cancel.clone();

        tokio::spawn(async move {
            let mut permits = tokio::select! {
                biased;
                _ = gate_cancel.cancelled() => return,
                permits = semaphore.acquire_many_owned(PAIR_PERMITS) => match permits {
                    Ok(permits) => permits,
                    Err(_) => return,
                },
            };
            tracing::debug!(first = names.0, second = names.1, "Worker slots acquired");

            // 接收端已被丢弃时 send 失败，permit 随之释放
            if let Some(second_permit) = permits.split(1) {
                let _ = second_tx.send(second_permit);
            }
            let _ = first_tx.send(permits);
        });

        (
            Self::run_with_permit(names.0, cancel.clone(), first_rx, first),
            Self::run_with_permit(names.1, cancel, second_rx, second),
        )
    }

    fn run_with_permit<T, F>(
        task_name: &'static str,
        cancel: CancellationToken,
        permit: oneshot::Receiver<OwnedSemaphorePermit>,
        work: F,
    ) -> JoinHandle<Result<T, TaskError>>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        tokio::spawn(async move {
            let _permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TaskError::Cancelled),
                permit = permit => permit.map_err(|_| TaskError::PoolClosed)?,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(task = task_name, "Task cancelled while running");
                    Err(TaskError::Cancelled)
                }
                result = work => result,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sleeper(secs: u64) -> impl Future<Output = Result<(), TaskError>> + Send + 'static {
        async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            Ok(())
        }
    }

    #[test]
    fn test_capacity_below_two_rejected() {
        assert!(WorkerPool::new(0).is_err());
        assert!(WorkerPool::new(1).is_err());
        assert_eq!(WorkerPool::new(2).unwrap().capacity(), 2);
    }

    #[tokio::test]
    async fn test_pair_runs_concurrently() {
        let pool = WorkerPool::new(2).unwrap();
        let barrier = Arc::new(tokio::sync::Barrier::new(2));

        let (first_barrier, second_barrier) = (barrier.clone(), barrier.clone());
        let (first, second) = pool.spawn_pair(
            ("first", "second"),
            CancellationToken::new(),
            async move {
                // 两个任务都必须在运行中才能通过 barrier
                first_barrier.wait().await;
                Ok::<_, TaskError>(())
            },
            async move {
                second_barrier.wait().await;
                Ok::<_, TaskError>(())
            },
        );

        for handle in [first, second] {
            let result = tokio::time::timeout(Duration::from_secs(5), handle)
                .await
                .expect("tasks serialized behind each other");
            assert!(result.unwrap().is_ok());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pair_never_split_across_sessions() {
        let pool = WorkerPool::new(3).unwrap();
        let (a1, a2) = pool.spawn_pair(("a1", "a2"), CancellationToken::new(), sleeper(5), sleeper(5));
        let (b1, b2) = pool.spawn_pair(("b1", "b2"), CancellationToken::new(), sleeper(5), sleeper(5));

        tokio::time::sleep(Duration::from_millis(10)).await;
        // 第二对整体排队，第三个槽位保持空闲
        assert_eq!(pool.available(), 1);

        let start = tokio::time::Instant::now();
        let (a1, a2, b1, b2) = tokio::join!(a1, a2, b1, b2);
        assert!(a1.unwrap().is_ok() && a2.unwrap().is_ok());
        assert!(b1.unwrap().is_ok() && b2.unwrap().is_ok());
        // 第二对在第一对结束后一起运行：5s + 5s，而不是串行的 15s
        assert!(start.elapsed() < Duration::from_secs(11));
        assert_eq!(pool.available(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_releases_slots() {
        let pool = WorkerPool::new(2).unwrap();
        let cancel = CancellationToken::new();

        let (first, second) = pool.spawn_pair(("slow", "slow"), cancel.clone(), sleeper(3600), sleeper(3600));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(pool.available(), 0);

        cancel.cancel();
        assert!(matches!(first.await.unwrap(), Err(TaskError::Cancelled)));
        assert!(matches!(second.await.unwrap(), Err(TaskError::Cancelled)));
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_queued() {
        let pool = WorkerPool::new(2).unwrap();
        let (_busy1, _busy2) = pool.spawn_pair(("busy", "busy"), CancellationToken::new(), sleeper(3600), sleeper(3600));

        let cancel = CancellationToken::new();
        let (first, second) = pool.spawn_pair(("queued", "queued"), cancel.clone(), sleeper(1), sleeper(1));
        tokio::time::sleep(Duration::from_millis(10)).await;

        cancel.cancel();
        assert!(matches!(first.await.unwrap(), Err(TaskError::Cancelled)));
        assert!(matches!(second.await.unwrap(), Err(TaskError::Cancelled)));
        assert_eq!(pool.available(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_releases_slot() {
        let pool = WorkerPool::new(2).unwrap();
        let (first, second) =
            pool.spawn_pair(("slow", "slow"), CancellationToken::new(), sleeper(3600), sleeper(3600));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(pool.available(), 0);

        first.abort();
        assert!(first.await.unwrap_err().is_cancelled());
        assert_eq!(pool.available(), 1);

        second.abort();
        assert!(second.await.unwrap_err().is_cancelled());
        assert_eq!(pool.available(), 2);
    }
}
