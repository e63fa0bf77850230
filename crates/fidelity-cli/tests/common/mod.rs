use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A fixture project copied into a scratch directory.
pub struct TestProject {
    _tmp: TempDir,
    pub dir: PathBuf,
    pub out: PathBuf,
}

impl TestProject {
    pub fn copy(name: &str) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let dir = tmp.path().join(name);
        test_fixtures::copy_project(name, &dir);
        let out = tmp.path().join("reports").join("report.json");
        Self { _tmp: tmp, dir, out }
    }

    /// `fidelity review` for this project, isolated from the caller's
    /// `FIDELITY_*` environment.
    pub fn review(&self, mode: &str) -> Command {
        let mut cmd = fidelity();
        cmd.arg("review")
            .arg("--project")
            .arg(&self.dir)
            .arg("--out")
            .arg(&self.out)
            .arg("--mode")
            .arg(mode);
        cmd
    }

    pub fn report(&self) -> Value {
        let raw = std::fs::read_to_string(&self.out).expect("report written");
        serde_json::from_str(&raw).expect("valid report json")
    }
}

pub fn fidelity() -> Command {
    let mut cmd = cargo_bin_cmd!("fidelity");
    for key in [
        "FIDELITY_FUZZY_THRESHOLD",
        "FIDELITY_TARGET_AGGREGATE",
        "FIDELITY_MAX_ITERATIONS",
        "FIDELITY_LOOKAHEAD_WINDOW",
        "FIDELITY_TOLERATED_CATEGORIES",
        "FIDELITY_ORACLE_ENDPOINT",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("FIDELITY_LOG", "warn");
    cmd
}

/// Answer one HTTP request with `body`; returns the base URL.
pub fn serve_once(body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header");
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("content length");
                }
            }
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).expect("body");

        let mut stream = stream;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        request_line.trim_end().to_string()
    });
    (url, handle)
}
