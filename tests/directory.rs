#![allow(missing_docs)]

pub mod common;

use common::{login, read_from_server, send_to_server, tcp_connect};

#[tokio::test(flavor = "current_thread")]
async fn pwd_cwd_cdup_walk() {
    common::initialize().await;

    let control = tcp_connect().await.unwrap();
    let mut buffer = vec![0u8; 1024];
    login(&control, &mut buffer, "walker", "x").await;

    send_to_server("PWD\r\n", &control).await;
    assert_eq!(read_from_server(&mut buffer, &control).await, "257 \"/\" is the current directory\r\n");

    send_to_server("CWD /listing_fixture/foo/bar\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("250 "));
    send_to_server("PWD\r\n", &control).await;
    assert_eq!(read_from_server(&mut buffer, &control).await, "257 \"/listing_fixture/foo/bar\" is the current directory\r\n");

    send_to_server("CWD /not-exist\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("550 "));
    send_to_server("PWD\r\n", &control).await;
    assert_eq!(read_from_server(&mut buffer, &control).await, "257 \"/listing_fixture/foo/bar\" is the current directory\r\n");

    send_to_server("CWD /listing_fixture/foo/bar/hoge.txt\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("550 "));

    send_to_server("CDUP\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("250 "));
    send_to_server("PWD\r\n", &control).await;
    assert_eq!(read_from_server(&mut buffer, &control).await, "257 \"/listing_fixture/foo\" is the current directory\r\n");

    send_to_server("CDUP\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("250 "));
    send_to_server("PWD\r\n", &control).await;
    assert_eq!(read_from_server(&mut buffer, &control).await, "257 \"/listing_fixture\" is the current directory\r\n");

    send_to_server("CDUP\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("250 "));
    send_to_server("PWD\r\n", &control).await;
    assert_eq!(read_from_server(&mut buffer, &control).await, "257 \"/\" is the current directory\r\n");

    send_to_server("CDUP\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("550 "));
    send_to_server("PWD\r\n", &control).await;
    assert_eq!(read_from_server(&mut buffer, &control).await, "257 \"/\" is the current directory\r\n");
}

#[tokio::test(flavor = "current_thread")]
async fn mkd_quotes_embedded_doublequote_and_rejects_duplicates() {
    common::initialize().await;

    let control = tcp_connect().await.unwrap();
    let mut buffer = vec![0u8; 1024];
    login(&control, &mut buffer, "mkdir_tester", "x").await;

    send_to_server("MKD mkd_test_root\r\n", &control).await;
    assert_eq!(read_from_server(&mut buffer, &control).await, "257 \"/mkd_test_root\" directory created\r\n");

    send_to_server("MKD mkd_test_root\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("521 "));

    send_to_server("CWD /mkd_test_root\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("250 "));

    send_to_server("MKD bar\" hoge\r\n", &control).await;
    assert_eq!(
        read_from_server(&mut buffer, &control).await,
        "257 \"/mkd_test_root/bar\"\" hoge\" directory created\r\n"
    );

    send_to_server("CWD /mkd_test_root/bar\" hoge\r\n", &control).await;
    assert!(read_from_server(&mut buffer, &control).await.starts_with("250 "));
}
