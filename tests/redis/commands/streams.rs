use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_xadd_command() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        (
            TestUtils::xadd_command("fruits", "0-0", &["mango", "1"]),
            TestUtils::expected_error("ERR The ID specified in XADD must be greater than 0-0"),
        ),
        (
            TestUtils::xadd_command("fruits", "0-*", &["mango", "1"]),
            TestUtils::expected_bulk_string("0-1"),
        ),
        (
            TestUtils::xadd_command("fruits", "1-5", &["mango", "2"]),
            TestUtils::expected_bulk_string("1-5"),
        ),
        (
            TestUtils::xadd_command("fruits", "1-*", &["mango", "3"]),
            TestUtils::expected_bulk_string("1-6"),
        ),
        (
            TestUtils::xadd_command("fruits", "1-6", &["mango", "4"]),
            TestUtils::expected_error(
                "ERR The ID specified in XADD is equal or smaller than the target stream top item",
            ),
        ),
        (
            TestUtils::xadd_command("fruits", "0-9", &["mango", "4"]),
            TestUtils::expected_error(
                "ERR The ID specified in XADD is equal or smaller than the target stream top item",
            ),
        ),
        (
            TestUtils::xadd_command("fruits", "2-*", &["mango", "5"]),
            TestUtils::expected_bulk_string("2-0"),
        ),
        (
            TestUtils::xadd_command("fruits", "two-1", &["mango", "6"]),
            TestUtils::expected_error("ERR Invalid stream ID specified as stream command argument"),
        ),
        (
            TestUtils::xadd_command("fruits", "3-1", &["mango"]),
            TestUtils::expected_error("ERR wrong number of arguments for 'xadd' command"),
        ),
        (TestUtils::xlen_command("fruits"), TestUtils::expected_integer(4)),
        (TestUtils::xlen_command("missing"), TestUtils::expected_integer(0)),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}

#[tokio::test]
async fn test_xadd_auto_generated_ids_increase() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    let mut ids = Vec::new();

    for _ in 0..3 {
        let result = env
            .exec_command(TestUtils::xadd_command("events", "*", &["n", "1"]), &client_address)
            .await;

        let respkv::commands::CommandResult::Response(respkv::resp::RespValue::BulkString(id)) =
            result
        else {
            panic!("Expected a bulk string id");
        };

        ids.push(id.parse::<respkv::stream::StreamId>().unwrap());
    }

    assert!(ids[0] < ids[1] && ids[1] < ids[2], "ids {:?}", ids);
}

#[tokio::test]
async fn test_handle_xrange_command() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    for (id, value) in [("1-1", "a"), ("1-2", "b"), ("2-0", "c"), ("3-7", "d")] {
        env.exec_command_ok(
            TestUtils::xadd_command("letters", id, &["letter", value]),
            &client_address,
            &TestUtils::expected_bulk_string(id),
        )
        .await;
    }

    let test_cases: Vec<(&str, &str, &[(&str, &[&str])])> = vec![
        (
            "-",
            "+",
            &[
                ("1-1", &["letter", "a"]),
                ("1-2", &["letter", "b"]),
                ("2-0", &["letter", "c"]),
                ("3-7", &["letter", "d"]),
            ],
        ),
        (
            "1-2",
            "2-0",
            &[("1-2", &["letter", "b"]), ("2-0", &["letter", "c"])],
        ),
        ("1", "1", &[("1-1", &["letter", "a"]), ("1-2", &["letter", "b"])]),
        ("3", "+", &[("3-7", &["letter", "d"])]),
        ("4", "+", &[]),
        ("3-0", "1-0", &[]),
    ];

    for (start, end, expected) in test_cases {
        env.exec_command_ok(
            TestUtils::xrange_command("letters", start, end),
            &client_address,
            &TestUtils::expected_stream_entries(expected),
        )
        .await;
    }

    env.exec_command_ok(
        TestUtils::command(&["XRANGE", "letters", "-", "+", "COUNT", "1"]),
        &client_address,
        &TestUtils::expected_stream_entries(&[("1-1", &["letter", "a"])]),
    )
    .await;
    env.exec_command_ok(
        TestUtils::xrange_command("missing", "-", "+"),
        &client_address,
        &TestUtils::expected_stream_entries(&[]),
    )
    .await;
}

#[tokio::test]
async fn test_handle_xread_command() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    for (key, id) in [("fruits", "1-1"), ("fruits", "1-2"), ("veggies", "5-0")] {
        env.exec_command_ok(
            TestUtils::xadd_command(key, id, &["name", id]),
            &client_address,
            &TestUtils::expected_bulk_string(id),
        )
        .await;
    }

    env.exec_command_ok(
        TestUtils::xread_command(&["fruits"], &["0-0"]),
        &client_address,
        &TestUtils::expected_xread(&[(
            "fruits",
            &[("1-1", &["name", "1-1"]), ("1-2", &["name", "1-2"])],
        )]),
    )
    .await;
    env.exec_command_ok(
        TestUtils::xread_command(&["fruits", "veggies"], &["1-1", "0"]),
        &client_address,
        &TestUtils::expected_xread(&[
            ("fruits", &[("1-2", &["name", "1-2"])]),
            ("veggies", &[("5-0", &["name", "5-0"])]),
        ]),
    )
    .await;
    env.exec_command_ok(
        TestUtils::xread_command(&["fruits", "veggies"], &["1-2", "0-0"]),
        &client_address,
        &TestUtils::expected_xread(&[("veggies", &[("5-0", &["name", "5-0"])])]),
    )
    .await;
    env.exec_command_ok(
        TestUtils::command(&["XREAD", "COUNT", "1", "STREAMS", "fruits", "0-0"]),
        &client_address,
        &TestUtils::expected_xread(&[("fruits", &[("1-1", &["name", "1-1"])])]),
    )
    .await;

    let test_cases = vec![
        (
            TestUtils::xread_command(&["fruits"], &["1-2"]),
            TestUtils::expected_null_array(),
        ),
        (
            TestUtils::xread_command(&["fruits"], &["$"]),
            TestUtils::expected_null_array(),
        ),
        (
            TestUtils::xread_command(&["missing"], &["0-0"]),
            TestUtils::expected_null_array(),
        ),
        (
            TestUtils::command(&["XREAD", "STREAMS", "fruits", "veggies", "0-0"]),
            TestUtils::expected_error(
                "ERR Unbalanced 'xread' list of streams: for each stream key an ID or '$' must be specified.",
            ),
        ),
        (
            TestUtils::command(&["XREAD", "fruits", "0-0", "x"]),
            TestUtils::expected_error("ERR syntax error"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}
