use std::io::Read;
use std::sync::mpsc;
use std::thread;

/// A two-point, two-component PCA result.
pub const OK_BODY: &str = r#"{
    "points": [
        {"x": 0.5, "y": 1.0, "label": "frame_1.xyz"},
        {"x": -0.5, "y": -1.0, "label": "frame_2.xyz"}
    ],
    "explained_variance_ratio_all": [0.8, 0.2],
    "cumulative_variance_ratio_all": [0.8, 1.0]
}"#;

/// Serve one request with `status`/`body`; the raw request body is sent back.
pub fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<Vec<u8>>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut received = Vec::new();
        request.as_reader().read_to_end(&mut received).unwrap();
        let _ = tx.send(received);
        let header =
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
        let response = tiny_http::Response::from_string(body)
            .with_status_code(status)
            .with_header(header);
        request.respond(response).unwrap();
    });
    (format!("http://{addr}/process_pca"), rx)
}
