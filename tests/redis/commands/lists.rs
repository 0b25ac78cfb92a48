use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_push_commands() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        (
            TestUtils::rpush_command("fruits", &["apple"]),
            TestUtils::expected_integer(1),
        ),
        (
            TestUtils::rpush_command("fruits", &["mango", "pear"]),
            TestUtils::expected_integer(3),
        ),
        (
            TestUtils::lpush_command("fruits", &["a", "b", "c"]),
            TestUtils::expected_integer(6),
        ),
        (
            TestUtils::lrange_command("fruits", 0, -1),
            TestUtils::expected_bulk_string_array(&["c", "b", "a", "apple", "mango", "pear"]),
        ),
        (TestUtils::llen_command("fruits"), TestUtils::expected_integer(6)),
        (TestUtils::llen_command("missing"), TestUtils::expected_integer(0)),
        (
            TestUtils::command(&["RPUSH", "fruits"]),
            TestUtils::expected_error("ERR wrong number of arguments for 'rpush' command"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}

#[tokio::test]
async fn test_handle_lrange_command() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(
        TestUtils::rpush_command("letters", &["a", "b", "c", "d", "e"]),
        &client_address,
        &TestUtils::expected_integer(5),
    )
    .await;

    let test_cases: Vec<(i64, i64, &[&str])> = vec![
        (0, 1, &["a", "b"]),
        (0, 0, &["a"]),
        (2, 10, &["c", "d", "e"]),
        (-2, -1, &["d", "e"]),
        (-100, 1, &["a", "b"]),
        (0, -1, &["a", "b", "c", "d", "e"]),
        (3, 1, &[]),
        (5, 10, &[]),
        (-1, -3, &[]),
    ];

    for (start, stop, expected) in test_cases {
        env.exec_command_ok(
            TestUtils::lrange_command("letters", start, stop),
            &client_address,
            &TestUtils::expected_bulk_string_array(expected),
        )
        .await;
    }

    env.exec_command_ok(
        TestUtils::lrange_command("missing", 0, -1),
        &client_address,
        &TestUtils::expected_bulk_string_array(&[]),
    )
    .await;
    env.exec_command_ok(
        TestUtils::command(&["LRANGE", "letters", "zero", "1"]),
        &client_address,
        &TestUtils::expected_error("ERR value is not an integer or out of range"),
    )
    .await;
}

#[tokio::test]
async fn test_handle_pop_commands() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        (TestUtils::lpop_command("fruits"), TestUtils::expected_null()),
        (
            TestUtils::lpop_command_multiple_items("fruits", 2),
            TestUtils::expected_null_array(),
        ),
        (
            TestUtils::rpush_command("fruits", &["apple", "mango", "pear", "kiwi"]),
            TestUtils::expected_integer(4),
        ),
        (
            TestUtils::lpop_command("fruits"),
            TestUtils::expected_bulk_string("apple"),
        ),
        (
            TestUtils::rpop_command("fruits"),
            TestUtils::expected_bulk_string("kiwi"),
        ),
        (
            TestUtils::lpop_command_multiple_items("fruits", 5),
            TestUtils::expected_bulk_string_array(&["mango", "pear"]),
        ),
        (TestUtils::llen_command("fruits"), TestUtils::expected_integer(0)),
        (
            TestUtils::type_command("fruits"),
            TestUtils::expected_simple_string("none"),
        ),
        (
            TestUtils::command(&["LPOP", "fruits", "-1"]),
            TestUtils::expected_error("ERR value is out of range, must be positive"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}
