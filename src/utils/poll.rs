//! 有界轮询工具
//!
//! 页面元素和模态框的渲染有延迟，统一用有界轮询等待

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;

/// 反复求值条件，直到为真或尝试次数耗尽
///
/// # 参数
/// - `max_attempts`: 最大求值次数
/// - `interval`: 两次求值之间的等待时间
/// - `cond`: 条件（可带副作用，如"找到按钮就点击"）
///
/// # 返回
/// 条件变为真返回 true，次数耗尽返回 false
pub async fn poll_until<C, F>(max_attempts: usize, interval: Duration, mut cond: C) -> Result<bool>
where
    C: FnMut() -> F,
    F: Future<Output = Result<bool>>,
{
    for attempt in 1..=max_attempts {
        if cond().await? {
            return Ok(true);
        }
        if attempt < max_attempts {
            sleep(interval).await;
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_poll_stops_as_soon_as_cond_holds() {
        let evals = Cell::new(0usize);
        let found = poll_until(10, Duration::ZERO, || {
            evals.set(evals.get() + 1);
            let n = evals.get();
            async move { Ok(n >= 3) }
        })
        .await
        .expect("轮询失败");

        assert!(found);
        assert_eq!(evals.get(), 3);
    }

    #[tokio::test]
    async fn test_poll_gives_up_after_max_attempts() {
        let evals = Cell::new(0usize);
        let found = poll_until(4, Duration::ZERO, || {
            evals.set(evals.get() + 1);
            async { Ok(false) }
        })
        .await
        .expect("轮询失败");

        assert!(!found);
        assert_eq!(evals.get(), 4);
    }

    #[tokio::test]
    async fn test_poll_propagates_cond_error() {
        let result = poll_until(3, Duration::ZERO, || async {
            Err(anyhow::anyhow!("页面已关闭"))
        })
        .await;

        assert!(result.is_err());
    }
}
