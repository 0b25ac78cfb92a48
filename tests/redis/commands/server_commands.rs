use respkv::{commands::CommandResult, resp::RespValue};

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_ping_and_echo_commands() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        (TestUtils::ping_command(), TestUtils::expected_simple_string("PONG")),
        (
            TestUtils::command(&["ping", "hello"]),
            TestUtils::expected_bulk_string("hello"),
        ),
        (
            TestUtils::echo_command("hello world"),
            TestUtils::expected_bulk_string("hello world"),
        ),
        (
            TestUtils::command(&["ECHO"]),
            TestUtils::expected_error("ERR wrong number of arguments for 'echo' command"),
        ),
        (
            TestUtils::command(&["PING", "a", "b"]),
            TestUtils::expected_error("ERR wrong number of arguments for 'ping' command"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}

#[tokio::test]
async fn test_handle_info_command() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(
        TestUtils::info_command(Some("replication")),
        &client_address,
        &TestUtils::expected_bulk_string("# Replication\r\nrole:master\r\n"),
    )
    .await;
    env.exec_command_ok(
        TestUtils::info_command(Some("nonsense")),
        &client_address,
        &TestUtils::expected_bulk_string(""),
    )
    .await;

    env.exec_command_ok(
        TestUtils::set_command("a", "1"),
        &client_address,
        &TestUtils::expected_simple_string("OK"),
    )
    .await;
    env.exec_command_ok(
        TestUtils::info_command(Some("KEYSPACE")),
        &client_address,
        &TestUtils::expected_bulk_string("# Keyspace\r\ndb0:keys=1\r\n"),
    )
    .await;

    let CommandResult::Response(RespValue::BulkString(info)) = env
        .exec_command(TestUtils::info_command(None), &client_address)
        .await
    else {
        panic!("Expected a bulk string");
    };

    assert!(info.contains("# Server\r\n"), "info {:?}", info);
    assert!(info.contains("tcp_port:6379\r\n"), "info {:?}", info);
    assert!(info.contains("role:master"), "info {:?}", info);
    assert!(info.contains("db0:keys=1"), "info {:?}", info);
}

#[tokio::test]
async fn test_handle_config_command() {
    let mut env = TestEnv::new();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        (
            TestUtils::config_get_command("dir"),
            TestUtils::expected_bulk_string_array(&["dir", "."]),
        ),
        (
            TestUtils::config_get_command("DBFILENAME"),
            TestUtils::expected_bulk_string_array(&["dbfilename", "dump.rdb"]),
        ),
        (
            TestUtils::config_get_command("port"),
            TestUtils::expected_bulk_string_array(&["port", "6379"]),
        ),
        (
            TestUtils::config_get_command("maxmemory"),
            TestUtils::expected_bulk_string_array(&[]),
        ),
        (
            TestUtils::config_set_command("dbfilename", "other.rdb"),
            TestUtils::expected_simple_string("OK"),
        ),
        (
            TestUtils::config_get_command("dbfilename"),
            TestUtils::expected_bulk_string_array(&["dbfilename", "other.rdb"]),
        ),
        (
            TestUtils::config_set_command("port", "not-a-port"),
            TestUtils::expected_error(
                "ERR CONFIG SET failed (possibly related to argument 'port') - argument couldn't be parsed into an integer",
            ),
        ),
        (
            TestUtils::config_set_command("maxmemory", "1mb"),
            TestUtils::expected_error(
                "ERR Unknown option or number of arguments for CONFIG SET - 'maxmemory'",
            ),
        ),
        (
            TestUtils::command(&["CONFIG", "GET"]),
            TestUtils::expected_error("ERR wrong number of arguments for 'config|get' command"),
        ),
        (
            TestUtils::command(&["CONFIG", "SET", "dir"]),
            TestUtils::expected_error("ERR wrong number of arguments for 'config|set' command"),
        ),
        (
            TestUtils::command(&["CONFIG", "RESETSTAT"]),
            TestUtils::expected_error("ERR unknown subcommand 'RESETSTAT'. Try CONFIG HELP."),
        ),
        (
            TestUtils::command(&["CONFIG"]),
            TestUtils::expected_error("ERR wrong number of arguments for 'config' command"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}
