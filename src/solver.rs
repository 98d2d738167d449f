//! Client for the subspace solver.
//!
//! The solver (or the gateway in front of it) takes a matrix and answers with
//! the four fundamental subspaces, or with `{"error": "..."}`. Requests block,
//! so the application runs them on a worker thread through [`Pending`].

use std::sync::mpsc::{self, TryRecvError};
use std::time::Duration;

use ureq::config::Config;
use ureq::Agent;

use crate::config::Args;
use crate::model::{CalculationRequest, CalculationResult, MatrixError};

/// Error type used for solver requests.
#[derive(thiserror::Error, Debug)]
pub enum SolverError {
    #[error("request failed: {0}")]
    Transport(#[from] ureq::Error),
    #[error("solver answered with HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Rejected(String),
    #[error("invalid reply from solver: {0}")]
    InvalidReply(#[source] serde_json::Error),
    #[error("solver reports status {0:?}")]
    Unhealthy(String),
    #[error("invalid matrix: {0}")]
    Matrix(#[from] MatrixError),
    #[error("solver worker exited without replying")]
    WorkerLost,
}


/// Handle to the solver.
#[derive(Debug, Clone)]
pub struct SolverClient {
    agent: Agent,
    base_url: String,
    calculate_path: String,
    health_path: String,
}

impl SolverClient {
    pub fn new(base_url: &str, calculate_path: &str, health_path: &str, timeout: Duration) -> Self {
        // The solver is a local collaborator; don't route it through proxies.
        let agent = Config::builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .proxy(None)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            calculate_path: calculate_path.to_owned(),
            health_path: health_path.to_owned(),
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(
            &args.solver_url,
            &args.calculate_path,
            &args.health_path,
            Duration::from_secs(args.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `request` and waits for the solver's answer.
    ///
    /// **This method blocks and should be run on a background thread.**
    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, SolverError> {
        let url = format!("{}{}", self.base_url, self.calculate_path);
        log::debug!("POST {url} ({}x{})", request.rows().len(), request.rows()[0].len());

        let response = self.agent.post(&url).send_json(request)?;
        let status = response.status().as_u16();
        let body = response.into_body().read_to_string()?;
        interpret_reply(status, &body)
    }

    /// Checks that the solver is up.
    ///
    /// **This method blocks and should be run on a background thread.**
    pub fn health(&self) -> Result<(), SolverError> {
        let url = format!("{}{}", self.base_url, self.health_path);
        let response = self.agent.get(&url).call()?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(SolverError::Status(status));
        }
        let body = response.into_body().read_to_string()?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(SolverError::InvalidReply)?;
        match value.get("status").and_then(|s| s.as_str()) {
            Some("ok") => Ok(()),
            other => Err(SolverError::Unhealthy(other.unwrap_or_default().to_owned())),
        }
    }
}

/// Turns the raw reply into a result. An `error` field wins over the status
/// code; a non-JSON body on a failed request is reported by status alone.
fn interpret_reply(status: u16, body: &str) -> Result<CalculationResult, SolverError> {
    let success = (200..300).contains(&status);
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if !success => return Err(SolverError::Status(status)),
        Err(e) => return Err(SolverError::InvalidReply(e)),
    };

    if let Some(error) = value.get("error") {
        let message = match error.as_str() {
            Some(s) => s.to_owned(),
            None => error.to_string(),
        };
        return Err(SolverError::Rejected(message));
    }
    if !success {
        return Err(SolverError::Status(status));
    }
    serde_json::from_value(value).map_err(SolverError::InvalidReply)
}


/// Reply of a job running on a worker thread.
#[derive(Debug)]
pub struct Pending<T> {
    rx: mpsc::Receiver<Result<T, SolverError>>,
}

impl<T: Send + 'static> Pending<T> {
    /// Runs `job` on a new thread. `ctx`, if given, is asked to repaint once
    /// the reply is in so the UI picks it up promptly.
    pub fn spawn<F>(ctx: Option<egui::Context>, job: F) -> Self
    where
        F: FnOnce() -> Result<T, SolverError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            // The receiver is gone if a newer request replaced this one.
            tx.send(job()).ok();
            if let Some(ctx) = ctx {
                ctx.request_repaint();
            }
        });
        Self { rx }
    }

    /// Returns the reply if it has arrived. Never blocks.
    pub fn poll(&self) -> Option<Result<T, SolverError>> {
        match self.rx.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SolverError::WorkerLost)),
        }
    }
}


#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::tests::RANK_TWO_REPLY;

    /// Serves exactly one HTTP response and hands back the raw request.
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status_line}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len(),
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            tx.send(request).unwrap();
        });
        (format!("http://{addr}"), rx)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client(base_url: &str) -> SolverClient {
        SolverClient::new(base_url, "/calculate", "/health", Duration::from_secs(5))
    }

    fn request() -> CalculationRequest {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]];
        CalculationRequest::new(rows).unwrap()
    }

    #[test]
    fn successful_calculation() {
        let (url, requests) = serve_once("200 OK", RANK_TWO_REPLY);
        let result = client(&url).calculate(&request()).unwrap();
        assert_eq!(result.dimensions.rank, 2);

        let raw = requests.recv().unwrap();
        assert!(raw.starts_with("POST /calculate "), "{raw}");
        assert!(raw.contains(r#"{"matrix":[[1.0,2.0,3.0],[4.0,5.0,6.0],[7.0,8.0,9.0]]}"#), "{raw}");
    }

    #[test]
    fn solver_error_is_rejected() {
        const TOO_BIG: &str = "Matrix must be at most 3x3 for visualization";
        let (url, _requests) = serve_once(
            "400 Bad Request",
            r#"{"error": "Matrix must be at most 3x3 for visualization"}"#,
        );
        let err = client(&url).calculate(&request()).unwrap_err();
        assert!(matches!(&err, SolverError::Rejected(m) if m == TOO_BIG));
    }

    #[test]
    fn health_check() {
        let (url, requests) = serve_once("200 OK", r#"{"status": "ok"}"#);
        client(&url).health().unwrap();
        assert!(requests.recv().unwrap().starts_with("GET /health "));

        let (url, _requests) =
            serve_once("503 Service Unavailable", r#"{"error": "Backend unavailable"}"#);
        assert!(matches!(client(&url).health(), Err(SolverError::Status(503))));
    }

    #[test]
    fn unreachable_solver_is_a_transport_error() {
        // bind and drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let err = client(&format!("http://127.0.0.1:{port}")).calculate(&request()).unwrap_err();
        assert!(matches!(err, SolverError::Transport(_)), "{err:?}");
    }

    #[test]
    fn reply_interpretation() {
        assert!(interpret_reply(200, RANK_TWO_REPLY).is_ok());
        assert!(matches!(
            interpret_reply(500, r#"{"error": "Backend calculation failed"}"#),
            Err(SolverError::Rejected(m)) if m == "Backend calculation failed"
        ));
        assert!(matches!(
            interpret_reply(502, "<html>bad gateway</html>"),
            Err(SolverError::Status(502))
        ));
        assert!(matches!(interpret_reply(200, "not json"), Err(SolverError::InvalidReply(_))));
        assert!(matches!(
            interpret_reply(200, r#"{"status": "ok"}"#),
            Err(SolverError::InvalidReply(_))
        ));
        assert!(matches!(
            interpret_reply(404, r#"{"detail": "nope"}"#),
            Err(SolverError::Status(404))
        ));
    }

    #[test]
    fn pending_delivers_one_reply() {
        let pending = Pending::spawn(None, || Ok(42));
        let reply = loop {
            if let Some(reply) = pending.poll() {
                break reply;
            }
            std::thread::yield_now();
        };
        assert_eq!(reply.unwrap(), 42);
    }

    #[test]
    fn lost_worker_is_reported() {
        let pending: Pending<()> = Pending::spawn(None, || panic!("worker died"));
        let reply = loop {
            if let Some(reply) = pending.poll() {
                break reply;
            }
            std::thread::yield_now();
        };
        assert!(matches!(reply, Err(SolverError::WorkerLost)));
    }
}
