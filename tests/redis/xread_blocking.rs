use std::time::Duration;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_blocked_xread_wakes_on_append() {
    let mut env = TestEnv::new();
    let reader_address = TestUtils::client_address(41844);
    let writer_address = TestUtils::client_address(41845);

    env.exec_command_ok(
        TestUtils::xadd_command("events", "1-1", &["kind", "old"]),
        &writer_address,
        &TestUtils::expected_bulk_string("1-1"),
    )
    .await;

    let blocked = env
        .exec_command_blocked(
            TestUtils::xread_blocking_command(&["events"], &["$"], 0),
            &reader_address,
        )
        .await;

    assert_eq!(env.get_store().await.stream_waiters.waiting_on("events"), 1);

    let store = env.store.clone();
    let waiter = tokio::spawn(async move { blocked.wait(store).await });

    TestUtils::sleep_ms(20).await;
    assert!(!waiter.is_finished());

    env.exec_command_ok(
        TestUtils::xadd_command("events", "2-1", &["kind", "new"]),
        &writer_address,
        &TestUtils::expected_bulk_string("2-1"),
    )
    .await;

    let response = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("blocked read was not woken")
        .unwrap();

    assert_eq!(
        response.encode(),
        TestUtils::expected_xread(&[("events", &[("2-1", &["kind", "new"])])])
    );
    assert_eq!(env.get_store().await.stream_waiters.waiting_on("events"), 0);
}

#[tokio::test]
async fn test_blocked_xread_ignores_appends_to_other_ids() {
    let mut env = TestEnv::new();
    let reader_address = TestUtils::client_address(41844);
    let writer_address = TestUtils::client_address(41845);

    let blocked = env
        .exec_command_blocked(
            TestUtils::xread_blocking_command(&["a", "b"], &["5-0", "$"], 1000),
            &reader_address,
        )
        .await;

    let store = env.store.clone();
    let waiter = tokio::spawn(async move { blocked.wait(store).await });

    env.exec_command_ok(
        TestUtils::xadd_command("a", "3-0", &["f", "too old"]),
        &writer_address,
        &TestUtils::expected_bulk_string("3-0"),
    )
    .await;

    TestUtils::sleep_ms(20).await;
    assert!(!waiter.is_finished());

    env.exec_command_ok(
        TestUtils::xadd_command("b", "1-0", &["f", "fresh"]),
        &writer_address,
        &TestUtils::expected_bulk_string("1-0"),
    )
    .await;

    let response = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("blocked read was not woken")
        .unwrap();

    assert_eq!(
        response.encode(),
        TestUtils::expected_xread(&[("b", &[("1-0", &["f", "fresh"])])])
    );
}

#[tokio::test(start_paused = true)]
async fn test_blocked_xread_times_out() {
    let mut env = TestEnv::new();
    let reader_address = TestUtils::client_address(41844);

    let blocked = env
        .exec_command_blocked(
            TestUtils::xread_blocking_command(&["events"], &["0-0"], 50),
            &reader_address,
        )
        .await;

    let started = tokio::time::Instant::now();
    let response = blocked.wait(env.store.clone()).await;

    assert_eq!(response.encode(), TestUtils::expected_null_array());
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert_eq!(env.get_store().await.stream_waiters.waiting_on("events"), 0);
}

#[tokio::test]
async fn test_every_blocked_reader_is_woken() {
    let mut env = TestEnv::new();
    let writer_address = TestUtils::client_address(41900);

    let mut waiters = Vec::new();

    for port in 41844..41847 {
        let blocked = env
            .exec_command_blocked(
                TestUtils::xread_blocking_command(&["events"], &["$"], 0),
                &TestUtils::client_address(port),
            )
            .await;

        let store = env.store.clone();
        waiters.push(tokio::spawn(async move { blocked.wait(store).await }));
    }

    assert_eq!(env.get_store().await.stream_waiters.waiting_on("events"), 3);

    env.exec_command_ok(
        TestUtils::xadd_command("events", "7-0", &["n", "1"]),
        &writer_address,
        &TestUtils::expected_bulk_string("7-0"),
    )
    .await;

    for waiter in waiters {
        let response = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("blocked read was not woken")
            .unwrap();

        assert_eq!(
            response.encode(),
            TestUtils::expected_xread(&[("events", &[("7-0", &["n", "1"])])])
        );
    }
}

#[tokio::test]
async fn test_non_blocking_xread_returns_data_immediately() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(
        TestUtils::xadd_command("events", "1-0", &["n", "1"]),
        &client_address,
        &TestUtils::expected_bulk_string("1-0"),
    )
    .await;

    env.exec_command_ok(
        TestUtils::xread_blocking_command(&["events"], &["0-0"], 0),
        &client_address,
        &TestUtils::expected_xread(&[("events", &[("1-0", &["n", "1"])])]),
    )
    .await;
}
