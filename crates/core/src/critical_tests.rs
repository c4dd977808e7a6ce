// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[tokio::test]
async fn section_is_released_on_drop() {
    let locks = AppLocks::new();

    let section = locks.enter("detox").await;
    assert!(locks.is_held("detox"));

    drop(section);
    assert!(!locks.is_held("detox"));
}

#[tokio::test]
async fn unknown_section_is_not_held() {
    let locks = AppLocks::new();
    assert!(!locks.is_held("detox"));
}

#[tokio::test]
async fn different_apps_do_not_block() {
    let locks = AppLocks::new();
    let _detox = locks.enter("detox").await;

    let dealer = tokio::time::timeout(Duration::from_secs(1), locks.enter("dealer")).await;
    assert!(dealer.is_ok());
}

#[tokio::test]
async fn same_app_waits_for_release() {
    let locks = Arc::new(AppLocks::new());
    let first = locks.enter("detox").await;

    let waiter = {
        let locks = Arc::clone(&locks);
        tokio::spawn(async move {
            let _second = locks.enter("detox").await;
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiter.is_finished());

    drop(first);
    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap();
    assert!(!locks.is_held("detox"));
}
