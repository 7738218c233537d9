#![allow(missing_docs)]

pub mod common;

use common::{epsv_connect, login, read_data_to_eof, read_from_server, send_to_server, tcp_connect};

#[tokio::test(flavor = "current_thread")]
async fn anonymous_retr_returns_exact_bytes() {
    common::initialize().await;

    let control = tcp_connect().await.unwrap();
    let mut buffer = vec![0u8; 1024];
    login(&control, &mut buffer, "anonymous", "x@y").await;

    let data = epsv_connect(&control, &mut buffer).await;

    send_to_server("RETR retr_fixtures/testfile\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("150 "));

    let body = read_data_to_eof(&data).await;
    assert_eq!(body, b"Hello ftp!");

    assert!(read_from_server(&mut buffer, &control).await.starts_with("226 "));

    send_to_server("QUIT\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("221 "));
}

#[tokio::test(flavor = "current_thread")]
async fn retr_of_missing_file_is_550() {
    common::initialize().await;

    let control = tcp_connect().await.unwrap();
    let mut buffer = vec![0u8; 1024];
    login(&control, &mut buffer, "anonymous", "x@y").await;

    send_to_server("RETR does-not-exist\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("550 "));
}
