//! Tests for the in-process named locker.

use atelier_assets::KeyedLocker;
use atelier_error::AssetErrorKind;
use atelier_interface::Locker;
use std::time::Duration;

#[tokio::test]
async fn test_contended_lock_times_out() {
    let locker = KeyedLocker::new(Duration::from_millis(50));

    let held = locker.lock("a:downloading").await.unwrap();
    let err = locker.lock("a:downloading").await.unwrap_err();
    assert!(matches!(err.asset_kind(), Some(AssetErrorKind::LockTimeout(_))));

    let other = locker.lock("b:downloading").await.unwrap();
    assert_eq!(other.key(), "b:downloading");

    held.release();
    locker.lock("a:downloading").await.unwrap();
}

#[tokio::test]
async fn test_waiter_acquires_after_release() {
    let locker = std::sync::Arc::new(KeyedLocker::default());
    let held = locker.lock("k").await.unwrap();

    let waiter = {
        let locker = locker.clone();
        tokio::spawn(async move { locker.lock("k").await.map(|g| g.key().to_string()) })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    drop(held);
    assert_eq!(waiter.await.unwrap().unwrap(), "k");
    assert_eq!(locker.active(), 0);
}
