use anyhow::Context as _;
use serde_json::{Value, json};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Line-delimited JSON-RPC session with a spawned `watchbase-mcp` process.
///
/// The child is killed when the session is dropped.
pub struct StdioSession {
    _child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
}

impl StdioSession {
    pub fn spawn(api_key: &str, base_url: &str) -> anyhow::Result<Self> {
        let bin = env!("CARGO_BIN_EXE_watchbase-mcp");
        let mut child = Command::new(bin)
            .env("WATCHBASE_API_KEY", api_key)
            .env_remove("RUST_LOG")
            .arg("--base-url")
            .arg(base_url)
            .arg("--timeout-secs")
            .arg("5")
            .arg("--log-level")
            .arg("debug")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("spawn watchbase-mcp")?;

        let stdin = child.stdin.take().context("child stdin")?;
        let stdout = child.stdout.take().context("child stdout")?;
        Ok(Self {
            _child: child,
            stdin,
            lines: BufReader::new(stdout).lines(),
        })
    }

    pub async fn send(&mut self, msg: &Value) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(msg)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Send a request and wait for the response carrying the same id.
    pub async fn request(&mut self, id: u64, method: &str, params: Value) -> anyhow::Result<Value> {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .await?;

        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                let line = self
                    .lines
                    .next_line()
                    .await?
                    .context("server closed stdout")?;
                let msg: Value = serde_json::from_str(&line)
                    .with_context(|| format!("stdout carried a non-JSON line: {line}"))?;
                if msg.get("id") == Some(&json!(id)) {
                    return Ok(msg);
                }
            }
        })
        .await
        .with_context(|| format!("timed out waiting for response to {method}"))?
    }

    pub async fn initialize(&mut self) -> anyhow::Result<Value> {
        let init = self
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "watchbase-mcp-integration-tests", "version": "0" }
                }),
            )
            .await?;
        self.send(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await?;
        Ok(init)
    }
}
