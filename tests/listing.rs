#![allow(missing_docs)]

pub mod common;

use common::{epsv_connect, login, read_data_to_eof, read_from_server, send_to_server, tcp_connect};

#[tokio::test(flavor = "current_thread")]
async fn passive_list_of_root_matches_expected_lines() {
    common::initialize().await;

    let control = tcp_connect().await.unwrap();
    let mut buffer = vec![0u8; 1024];
    login(&control, &mut buffer, "anonymous", "x@y").await;

    let data = epsv_connect(&control, &mut buffer).await;

    send_to_server("LIST /listing_fixture\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("150 "));

    let body = read_data_to_eof(&data).await;
    let text = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "drwxr-xr-x 1 anonymous anonymous             0  Jan  1 00:00 foo");
    assert_eq!(lines[1], "-rw-r--r-- 1 anonymous anonymous             6  Jan  1 00:00 hogehoge.txt");

    assert!(read_from_server(&mut buffer, &control).await.starts_with("226 "));
}
