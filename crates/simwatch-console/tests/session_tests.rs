mod common;

#[cfg(test)]
pub mod tests {
    use crate::common::{refused_url, spawn_status_server};
    use crossbeam_channel::Receiver;
    use serde_json::{json, Value};
    use simwatch_console::{
        Bounds, ConnectionState, ConsoleError, LatLng, LogKind, Session, SessionConfig,
    };
    use std::time::{Duration, Instant};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn open_session(url: &str) -> Session {
        let config = SessionConfig::new(url).unwrap();
        let mut session = Session::connect(&config).unwrap();
        session.wait_open(TIMEOUT).expect("Connection did not open");
        session
    }

    fn wait_for_log_len(session: &mut Session, len: usize) {
        let deadline = Instant::now() + TIMEOUT;
        while session.log().len() < len && Instant::now() < deadline {
            session.wait_event(Duration::from_millis(50));
        }
        assert_eq!(
            session.log().len(),
            len,
            "Log:\n{:#?}",
            session.log().entries()
        );
    }

    fn frame(frames: &Receiver<String>) -> Value {
        let text = frames.recv_timeout(TIMEOUT).expect("No frame received");
        serde_json::from_str(&text).expect("Frame is not JSON")
    }

    #[test]
    fn test_open_event_is_logged_first() {
        let (url, _frames) = spawn_status_server();
        let session = open_session(&url);

        assert_eq!(session.state(), ConnectionState::Open);
        let first = &session.log().entries()[0];
        assert_eq!(first.kind, LogKind::Open);
        assert_eq!(first.message, "connection open");
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn test_bounds_then_filter_on_the_wire() {
        let (url, frames) = spawn_status_server();
        let mut session = open_session(&url);

        let bounds = session
            .submit_bounds(Bounds::new(LatLng::new(-10.0, 20.0), LatLng::new(5.0, 30.0)))
            .unwrap();
        assert_eq!(bounds.id, "0");
        assert_eq!(
            frame(&frames),
            json!({
                "id": "0",
                "type": "bounds",
                "payload": {
                    "sw": { "lat": -10.0, "lng": 20.0 },
                    "ne": { "lat": 5.0, "lng": 30.0 }
                }
            })
        );

        let filter = session.submit_pilot_filter("N123AB").unwrap();
        assert_eq!(filter.id, "1");
        assert_eq!(
            frame(&frames),
            json!({ "id": "1", "type": "pilots_filter", "payload": { "query": "N123AB" } })
        );
    }

    #[test]
    fn test_log_length_matches_events() {
        let (url, _frames) = spawn_status_server();
        let mut session = open_session(&url);

        let n = 5;
        for i in 0..n {
            session.submit_pilot_filter(format!("CALLSIGN{i}")).unwrap();
        }

        // open + one request entry and one reply per submit
        wait_for_log_len(&mut session, 1 + 2 * n);

        let entries = session.log().entries();
        assert_eq!(entries[0].kind, LogKind::Open);
        let requests = entries.iter().filter(|e| e.kind == LogKind::Request).count();
        let messages = entries.iter().filter(|e| e.kind == LogKind::Message).count();
        assert_eq!(requests, n);
        assert_eq!(messages, n);

        for window in entries.windows(2) {
            assert!(window[0].index < window[1].index);
        }
        assert!(entries
            .iter()
            .filter(|e| e.kind == LogKind::Message)
            .all(|e| e.message.starts_with("message {")));
    }

    #[test]
    fn test_request_ids_strictly_increase() {
        let (url, frames) = spawn_status_server();
        let mut session = open_session(&url);

        session.submit_pilot_filter("").unwrap();
        session.submit_airport_filter(true).unwrap();
        session.subscribe("AFL123").unwrap();
        session.unsubscribe("AFL123").unwrap();
        session.submit_bounds_input("0", "0", "1", "1").unwrap();

        let ids: Vec<String> = (0..5)
            .map(|_| frame(&frames)["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["0", "1", "2", "3", "4"]);
        assert_eq!(session.next_request_id(), 5);
    }

    #[test]
    fn test_invalid_bounds_are_rejected_locally() {
        let (url, frames) = spawn_status_server();
        let mut session = open_session(&url);

        let err = session
            .submit_bounds_input("south", "20", "5", "30")
            .unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidNumber { field: "sw.lat", .. }));

        let err = session
            .submit_bounds(Bounds::new(LatLng::new(0.0, 200.0), LatLng::new(1.0, 1.0)))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::OutOfRange { field: "sw.lng", .. }));

        let errors: Vec<_> = session
            .log()
            .entries()
            .iter()
            .filter(|e| e.kind == LogKind::Error)
            .collect();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.starts_with("request rejected: "));
        assert!(frames.recv_timeout(Duration::from_millis(200)).is_err());

        // Rejected input does not consume ids
        assert_eq!(session.submit_pilot_filter("x").unwrap().id, "0");
    }

    #[test]
    fn test_send_without_connection_is_an_error() {
        let url = refused_url();
        let config = SessionConfig::new(url.trim_start_matches("ws://")).unwrap();
        let mut session = Session::connect(&config).unwrap();

        let err = session.wait_open(TIMEOUT).unwrap_err();
        assert!(matches!(err, ConsoleError::ConnectFailed { .. }), "{err}");
        assert_eq!(session.state(), ConnectionState::Closed);

        let before = session.log().len();
        let err = session.submit_pilot_filter("N123AB").unwrap_err();
        assert!(matches!(err, ConsoleError::ConnectionNotOpen { .. }));
        assert_eq!(session.log().len(), before + 1);
        let last = session.log().last().unwrap();
        assert_eq!(last.kind, LogKind::Error);
        assert!(last.message.starts_with("request 0 not sent"), "{}", last.message);
    }

    #[test]
    fn test_clear_log() {
        let (url, _frames) = spawn_status_server();
        let mut session = open_session(&url);

        session.submit_pilot_filter("A").unwrap();
        session.note("marker");
        session.note("marker");
        assert!(session.log().len() >= 4);

        session.clear_log();
        assert!(session.log().is_empty());

        // Ids keep counting after a clear
        assert_eq!(session.submit_pilot_filter("B").unwrap().id, "1");
    }

    #[test]
    fn test_close_logs_connection_closed() {
        let (url, _frames) = spawn_status_server();
        let session = open_session(&url);

        let log = session.close(TIMEOUT);
        let last = log.last().unwrap();
        assert_eq!(last.kind, LogKind::Closed);
        assert!(last.message.starts_with("connection closed"));
    }

    #[test]
    fn test_submit_logs_pending_open_event_first() {
        let (url, frames) = spawn_status_server();
        let config = SessionConfig::new(&url).unwrap();
        let mut session = Session::connect(&config).unwrap();

        // Wait for the socket without draining its events into the log
        let deadline = Instant::now() + TIMEOUT;
        while session.state() != ConnectionState::Open && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(session.state(), ConnectionState::Open);
        assert!(session.log().is_empty());

        let request = session.submit_pilot_filter("N123AB").unwrap();
        assert_eq!(request.id, "0");
        assert_eq!(frame(&frames)["id"], "0");

        wait_for_log_len(&mut session, 3);
        let kinds: Vec<LogKind> = session.log().entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [LogKind::Open, LogKind::Request, LogKind::Message]);
    }

    #[test]
    fn test_submit_before_open_event_is_rejected() {
        // Accepts TCP but never answers the websocket handshake
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("ws://{}/api/updates", listener.local_addr().unwrap());

        let config = SessionConfig::new(&url).unwrap();
        let mut session = Session::connect(&config).unwrap();

        let err = session.submit_pilot_filter("N123AB").unwrap_err();
        assert!(
            matches!(
                err,
                ConsoleError::ConnectionNotOpen {
                    state: ConnectionState::Connecting
                }
            ),
            "{err}"
        );
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.log().last().unwrap().kind, LogKind::Error);
        drop(listener);
    }

    #[test]
    fn test_wait_open_times_out_without_handshake() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("ws://{}/api/updates", listener.local_addr().unwrap());

        let config = SessionConfig::new(&url).unwrap();
        let mut session = Session::connect(&config).unwrap();

        let started = Instant::now();
        let err = session.wait_open(Duration::from_millis(300)).unwrap_err();
        assert!(
            matches!(err, ConsoleError::ConnectTimeout { ms: 300, .. }),
            "{err}"
        );
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(session.state(), ConnectionState::Connecting);
        assert!(session.log().is_empty());
        drop(listener);
    }
}
