#![allow(missing_docs)]

use async_trait::async_trait;
use objectftpd::Server;
use objectftpd::auth::{AuthFailed, Authenticator, Authorization};
use objectftpd::vfs::Vfs;
use objectftpd::vfs::objectstore::{MemStore, ObjectStoreFs};
use std::io::Error;
use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

pub const ADDR: &str = "127.0.0.1:2151";

/// Accepts any username/password and hands back a shared, writable VFS over an in-memory store
/// seeded at process startup. Good enough for exercising the protocol end to end; real deployments
/// use a real `Authenticator`.
#[derive(Debug)]
struct TestAuthenticator {
    vfs: Arc<dyn Vfs>,
}

#[async_trait]
impl Authenticator for TestAuthenticator {
    async fn authorize(&self, username: &str, _password: &str) -> Result<Authorization, AuthFailed> {
        Ok(Authorization {
            user: username.to_string(),
            vfs: self.vfs.clone(),
        })
    }
}

static CONSUMERS: LazyLock<Arc<Mutex<i32>>> = LazyLock::new(|| Arc::new(Mutex::new(0)));

async fn run_server() {
    let store = MemStore::seeded([
        ("listing_fixture/foo/bar/hoge.txt", "abc123"),
        ("listing_fixture/hogehoge.txt", "foobar"),
        ("retr_fixtures/testfile", "Hello ftp!"),
    ]);
    let vfs: Arc<dyn Vfs> = Arc::new(ObjectStoreFs::new(Arc::new(store), ""));
    let server = Server::new(Arc::new(TestAuthenticator { vfs })).greeting("Welcome test").build();
    server.listen(ADDR).await.unwrap();
}

pub async fn initialize() {
    let mut lock = CONSUMERS.lock().await;
    *lock += 1;
    if *lock == 1 {
        tokio::spawn(run_server());
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
}

pub async fn read_from_server<'a>(buffer: &'a mut [u8], stream: &TcpStream) -> &'a str {
    loop {
        stream.readable().await.unwrap();
        match stream.try_read(buffer) {
            Ok(n) => return std::str::from_utf8(&buffer[0..n]).unwrap(),
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => continue,
            Err(e) => panic!("{}", e),
        }
    }
}

pub async fn send_to_server(buffer: &str, stream: &TcpStream) {
    loop {
        stream.writable().await.unwrap();
        match stream.try_write(buffer.as_bytes()) {
            Ok(_) => break,
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => continue,
            Err(e) => panic!("{}", e),
        }
    }
}

pub async fn tcp_connect() -> Result<TcpStream, Error> {
    let mut errcount = 0;
    loop {
        match TcpStream::connect(ADDR).await {
            Ok(s) => return Ok(s),
            Err(e) => {
                if errcount > 5 {
                    return Err(e);
                }
                errcount += 1;
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
        }
    }
}

/// Parses the port out of a `229 Entering Extended Passive Mode (|||port|)` reply.
pub fn parse_epsv_port(line: &str) -> u16 {
    let body = line.split_once("(|||").and_then(|(_, rest)| rest.split_once('|')).expect("well-formed EPSV reply").0;
    body.parse().expect("numeric EPSV port")
}

pub async fn epsv_connect(control: &TcpStream, buffer: &mut [u8]) -> TcpStream {
    send_to_server("EPSV\r\n", control).await;
    let reply = read_from_server(buffer, control).await;
    assert!(reply.starts_with("229 "), "unexpected EPSV reply: {}", reply);
    let port = parse_epsv_port(reply);
    TcpStream::connect(SocketAddr::from(([127, 0, 0, 1], port))).await.unwrap()
}

pub async fn login(control: &TcpStream, buffer: &mut [u8], user: &str, pass: &str) {
    let greeting = read_from_server(buffer, control).await;
    assert!(greeting.starts_with("220 "), "unexpected greeting: {}", greeting);
    send_to_server(&format!("USER {}\r\n", user), control).await;
    assert!(read_from_server(buffer, control).await.starts_with("331 "));
    send_to_server(&format!("PASS {}\r\n", pass), control).await;
    assert!(read_from_server(buffer, control).await.starts_with("230 "));
}

pub async fn read_data_to_eof(stream: &TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    let mut buffer = [0u8; 1024];
    loop {
        stream.readable().await.unwrap();
        match stream.try_read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => data.extend_from_slice(&buffer[..n]),
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => continue,
            Err(e) => panic!("{}", e),
        }
    }
    data
}
