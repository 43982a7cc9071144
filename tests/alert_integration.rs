//! Integration tests for the broadcast notice
//!
//! Many waiters at once on a multi-threaded runtime.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::sync::{watch, Barrier};
use tokio::time::{sleep, timeout};
use trade_funding::Notice;

const WAITERS: usize = 100;
const LIMIT: Duration = Duration::from_secs(5);

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_alert_reaches_every_waiter() {
    let notice = Notice::new();
    let receivers: Vec<_> = (0..WAITERS).map(|_| notice.wait(None)).collect();
    assert_eq!(notice.pending(), WAITERS);

    notice.alert();
    for rx in receivers {
        assert_eq!(timeout(LIMIT, rx).await.unwrap(), Ok(false));
    }
    assert_eq!(notice.pending(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_waiters_woken_by_one_alert() {
    let notice = Notice::new();
    let registered = Arc::new(Barrier::new(WAITERS + 1));

    let tasks: Vec<_> = (0..WAITERS)
        .map(|_| {
            let notice = notice.clone();
            let registered = Arc::clone(&registered);
            tokio::spawn(async move {
                let rx = notice.wait(None);
                registered.wait().await;
                timeout(LIMIT, rx).await
            })
        })
        .collect();

    registered.wait().await;
    assert_eq!(notice.pending(), WAITERS);
    notice.alert();

    for task in tasks {
        assert_eq!(task.await.unwrap(), Ok(Ok(false)));
    }
    assert_eq!(notice.pending(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_kick_wakes_every_waiter() {
    let notice = Notice::new();
    let (kick_tx, kick_rx) = watch::channel(false);
    let receivers: Vec<_> = (0..WAITERS)
        .map(|_| notice.wait(Some(kick_rx.clone())))
        .collect();

    kick_tx.send(true).unwrap();
    for rx in receivers {
        assert_eq!(timeout(LIMIT, rx).await.unwrap(), Ok(true));
    }

    timeout(LIMIT, async {
        while notice.pending() > 0 {
            sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_late_waiter_does_not_see_earlier_alert() {
    let notice = Notice::new();
    let early: Vec<_> = (0..WAITERS).map(|_| notice.wait(None)).collect();
    notice.alert();

    let mut late = notice.wait(None);
    for rx in early {
        assert_eq!(timeout(LIMIT, rx).await.unwrap(), Ok(false));
    }
    sleep(Duration::from_millis(5)).await;
    assert_eq!(late.try_recv(), Err(TryRecvError::Empty));

    notice.alert();
    assert_eq!(timeout(LIMIT, late).await.unwrap(), Ok(false));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_waits_and_alerts_from_many_tasks() {
    let notice = Notice::new();
    let mut tasks = Vec::with_capacity(WAITERS);
    for i in 0..WAITERS {
        let notice = notice.clone();
        tasks.push(tokio::spawn(async move {
            let (kick_tx, kick_rx) = watch::channel(false);
            let rx = notice.wait(Some(kick_rx));
            if i % 2 == 0 {
                kick_tx.send(true).unwrap();
            }
            // Keep the sender alive so odd waiters can only be alerted.
            let woken = timeout(LIMIT, rx).await;
            drop(kick_tx);
            (i, woken)
        }));
    }

    let alerter = {
        let notice = notice.clone();
        tokio::spawn(async move {
            loop {
                notice.alert();
                sleep(Duration::from_millis(1)).await;
            }
        })
    };

    for task in tasks {
        let (i, woken) = task.await.unwrap();
        if i % 2 == 0 {
            assert!(matches!(woken, Ok(Ok(_))));
        } else {
            assert!(matches!(woken, Ok(Ok(false))));
        }
    }
    alerter.abort();
}
