use std::time::Duration;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_set_and_get_commands() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        (TestUtils::get_command("grape"), TestUtils::expected_null()),
        (
            TestUtils::set_command("grape", "mango"),
            TestUtils::expected_simple_string("OK"),
        ),
        (
            TestUtils::get_command("grape"),
            TestUtils::expected_bulk_string("mango"),
        ),
        (
            TestUtils::set_command("grape", ""),
            TestUtils::expected_simple_string("OK"),
        ),
        (TestUtils::get_command("grape"), "$0\r\n\r\n".to_string()),
        (
            TestUtils::command(&["SET", "grape"]),
            TestUtils::expected_error("ERR wrong number of arguments for 'set' command"),
        ),
        (
            TestUtils::command(&["SET", "grape", "x", "PX", "0"]),
            TestUtils::expected_error("ERR invalid expire time in 'set' command"),
        ),
        (
            TestUtils::command(&["SET", "grape", "x", "KEEPTTL"]),
            TestUtils::expected_error("ERR syntax error"),
        ),
        (
            TestUtils::command(&["get", "grape", "apple"]),
            TestUtils::expected_error("ERR wrong number of arguments for 'get' command"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_set_with_expiration() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(
        TestUtils::set_command_with_expiration("pear", "ripe", 50),
        &client_address,
        &TestUtils::expected_simple_string("OK"),
    )
    .await;

    tokio::time::advance(Duration::from_millis(10)).await;

    env.exec_command_ok(
        TestUtils::get_command("pear"),
        &client_address,
        &TestUtils::expected_bulk_string("ripe"),
    )
    .await;

    tokio::time::advance(Duration::from_millis(50)).await;

    env.exec_command_ok(
        TestUtils::get_command("pear"),
        &client_address,
        &TestUtils::expected_null(),
    )
    .await;
    env.exec_command_ok(
        TestUtils::type_command("pear"),
        &client_address,
        &TestUtils::expected_simple_string("none"),
    )
    .await;
    env.exec_command_ok(
        TestUtils::keys_command("*"),
        &client_address,
        &TestUtils::expected_bulk_string_array(&[]),
    )
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_set_without_expiration_clears_ttl() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(
        TestUtils::command(&["SET", "pear", "ripe", "EX", "1"]),
        &client_address,
        &TestUtils::expected_simple_string("OK"),
    )
    .await;
    env.exec_command_ok(
        TestUtils::set_command("pear", "rotten"),
        &client_address,
        &TestUtils::expected_simple_string("OK"),
    )
    .await;

    tokio::time::advance(Duration::from_secs(2)).await;

    env.exec_command_ok(
        TestUtils::get_command("pear"),
        &client_address,
        &TestUtils::expected_bulk_string("rotten"),
    )
    .await;
}

#[tokio::test]
async fn test_handle_incr_command() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        (TestUtils::incr_command("counter"), TestUtils::expected_integer(1)),
        (TestUtils::incr_command("counter"), TestUtils::expected_integer(2)),
        (
            TestUtils::set_command("big", "9223372036854775807"),
            TestUtils::expected_simple_string("OK"),
        ),
        (
            TestUtils::incr_command("big"),
            TestUtils::expected_error("ERR value is not an integer or out of range"),
        ),
        (
            TestUtils::set_command("word", "banana"),
            TestUtils::expected_simple_string("OK"),
        ),
        (
            TestUtils::incr_command("word"),
            TestUtils::expected_error("ERR value is not an integer or out of range"),
        ),
        (
            TestUtils::get_command("word"),
            TestUtils::expected_bulk_string("banana"),
        ),
        (
            TestUtils::get_command("counter"),
            TestUtils::expected_bulk_string("2"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}

#[tokio::test]
async fn test_handle_del_keys_and_type_commands() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        (
            TestUtils::set_command("b", "1"),
            TestUtils::expected_simple_string("OK"),
        ),
        (
            TestUtils::set_command("a", "1"),
            TestUtils::expected_simple_string("OK"),
        ),
        (
            TestUtils::rpush_command("list", &["x"]),
            TestUtils::expected_integer(1),
        ),
        (
            TestUtils::xadd_command("stream", "1-1", &["f", "v"]),
            TestUtils::expected_bulk_string("1-1"),
        ),
        (
            TestUtils::keys_command("*"),
            TestUtils::expected_bulk_string_array(&["a", "b", "list", "stream"]),
        ),
        (
            TestUtils::keys_command("list"),
            TestUtils::expected_bulk_string_array(&["list"]),
        ),
        (
            TestUtils::keys_command("l*"),
            TestUtils::expected_bulk_string_array(&[]),
        ),
        (
            TestUtils::type_command("a"),
            TestUtils::expected_simple_string("string"),
        ),
        (
            TestUtils::type_command("list"),
            TestUtils::expected_simple_string("list"),
        ),
        (
            TestUtils::type_command("stream"),
            TestUtils::expected_simple_string("stream"),
        ),
        (
            TestUtils::del_command(&["a", "list", "missing"]),
            TestUtils::expected_integer(2),
        ),
        (
            TestUtils::command(&["DELETE", "stream"]),
            TestUtils::expected_integer(1),
        ),
        (
            TestUtils::keys_command("*"),
            TestUtils::expected_bulk_string_array(&["b"]),
        ),
        (
            TestUtils::type_command("a"),
            TestUtils::expected_simple_string("none"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}

#[tokio::test]
async fn test_wrong_type_leaves_value_intact() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);
    let wrong_type =
        TestUtils::expected_error("WRONGTYPE Operation against a key holding the wrong kind of value");

    let test_cases = vec![
        (
            TestUtils::rpush_command("fruits", &["apple", "pear"]),
            TestUtils::expected_integer(2),
        ),
        (TestUtils::get_command("fruits"), wrong_type.clone()),
        (TestUtils::incr_command("fruits"), wrong_type.clone()),
        (
            TestUtils::xadd_command("fruits", "1-1", &["f", "v"]),
            wrong_type.clone(),
        ),
        (
            TestUtils::lrange_command("fruits", 0, -1),
            TestUtils::expected_bulk_string_array(&["apple", "pear"]),
        ),
        (
            TestUtils::set_command("fruits", "overwritten"),
            TestUtils::expected_simple_string("OK"),
        ),
        (TestUtils::llen_command("fruits"), wrong_type.clone()),
        (
            TestUtils::get_command("fruits"),
            TestUtils::expected_bulk_string("overwritten"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}

#[tokio::test]
async fn test_unknown_command() {
    let mut env = TestEnv::new();

    env.exec_command_ok(
        TestUtils::command(&["FLUSHALL"]),
        &TestUtils::client_address(41844),
        &TestUtils::expected_error("ERR unknown command 'flushall'"),
    )
    .await;
}

#[tokio::test]
async fn test_set_with_out_of_range_expiration() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        (
            TestUtils::command(&["SET", "grape", "x", "EX", "9223372036854775807"]),
            TestUtils::expected_error("ERR invalid expire time in 'set' command"),
        ),
        (
            TestUtils::command(&["SET", "grape", "x", "PX", "9223372036854775807"]),
            TestUtils::expected_error("ERR invalid expire time in 'set' command"),
        ),
        (TestUtils::get_command("grape"), TestUtils::expected_null()),
        (
            TestUtils::command(&["SET", "grape", "x", "EX", "3153600000"]),
            TestUtils::expected_simple_string("OK"),
        ),
        (
            TestUtils::get_command("grape"),
            TestUtils::expected_bulk_string("x"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}
