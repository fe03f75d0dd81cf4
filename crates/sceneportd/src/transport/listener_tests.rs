//! Tests for the command listener.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rstest::{fixture, rstest};

use sceneport_config::ListenEndpoint;

use super::test_utils::{CountingHandler, ParkingHandler};
use super::{CommandListener, ConnectionHandler, JoinOutcome, ListenerError};

#[fixture]
fn tcp_endpoint() -> ListenEndpoint {
    ListenEndpoint::new("127.0.0.1", 0)
}

fn wait_for_count(count: &AtomicUsize, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if count.load(Ordering::SeqCst) >= expected {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[rstest]
fn accepts_connections_on_named_threads(tcp_endpoint: ListenEndpoint) {
    let listener = CommandListener::bind(&tcp_endpoint).expect("bind tcp listener");
    let addr = listener
        .local_addr()
        .expect("listener should report local address");
    let (count, counting) = CountingHandler::new();
    let handler: Arc<dyn ConnectionHandler> = Arc::clone(&counting) as Arc<dyn ConnectionHandler>;
    let handle = listener.start(handler).expect("start listener");

    TcpStream::connect(addr).expect("connect first client");
    TcpStream::connect(addr).expect("connect second client");

    assert!(wait_for_count(&count, 2), "expected two connections");
    assert!(
        counting
            .thread_names()
            .iter()
            .all(|name| name.starts_with("sceneport-conn-")),
        "connection threads should be named after their peer"
    );
    let outcome = handle
        .join_timeout(Duration::from_secs(1))
        .expect("join listener");
    assert_eq!(outcome, JoinOutcome::Joined);
}

#[rstest]
fn stopping_releases_parked_connections(tcp_endpoint: ListenEndpoint) {
    let listener = CommandListener::bind(&tcp_endpoint).expect("bind tcp listener");
    let addr = listener.local_addr().expect("local address");
    let (finished, handler) = ParkingHandler::new();
    let handle = listener.start(handler).expect("start listener");
    let _client = TcpStream::connect(addr).expect("connect client");
    std::thread::sleep(Duration::from_millis(100));

    handle
        .join_timeout(Duration::from_secs(1))
        .expect("join listener");

    assert!(
        wait_for_count(&finished, 1),
        "connection should observe the cleared run flag"
    );
}

#[rstest]
fn the_port_is_free_again_after_join(tcp_endpoint: ListenEndpoint) {
    let listener = CommandListener::bind(&tcp_endpoint).expect("bind tcp listener");
    let addr = listener.local_addr().expect("local address");
    let (_, handler) = CountingHandler::new();
    let handle = listener.start(handler).expect("start listener");

    handle
        .join_timeout(Duration::from_secs(1))
        .expect("join listener");

    let rebound = CommandListener::bind(&ListenEndpoint::new("127.0.0.1", addr.port()));
    assert!(rebound.is_ok(), "port should be released: {rebound:?}");
}

#[rstest]
fn occupied_ports_fail_to_bind() {
    let occupied = TcpListener::bind("127.0.0.1:0").expect("occupy a port");
    let port = occupied.local_addr().expect("occupied address").port();

    let error = CommandListener::bind(&ListenEndpoint::new("127.0.0.1", port))
        .expect_err("bind should fail");

    assert!(matches!(error, ListenerError::BindTcp { .. }));
}

#[rstest]
fn unresolvable_hosts_report_resolution_errors() {
    let error = CommandListener::bind(&ListenEndpoint::new("no such host.invalid", 1999))
        .expect_err("resolution should fail");

    assert!(matches!(
        error,
        ListenerError::Resolve { .. } | ListenerError::ResolveEmpty { .. }
    ));
}
