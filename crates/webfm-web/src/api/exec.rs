use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use axum::extract::State;
use axum::Json;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;
use webfm_core::{CommandLine, CoreError};

use super::resolve_path;
use crate::dto::{ExecRequest, ExecResponse};
use crate::error::AppError;
use crate::session::SessionId;
use crate::state::AppState;

/// Runs an allow-listed program without a shell.
pub async fn run(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<ExecRequest>,
) -> Result<Json<ExecResponse>, AppError> {
    let exec = &state.config.core.exec;

    let line = CommandLine::parse(&req.command).map_err(|e| AppError::op("command refused", e))?;
    exec.policy()
        .authorize(&line)
        .map_err(|e| AppError::op("command refused", e))?;

    let cwd = match req.cwd.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(cwd) => resolve_path(&state, &session, cwd),
        None => state
            .sessions
            .location(session.as_str())
            .resolve()
            .as_path()
            .to_path_buf(),
    };

    let mut process = Command::new(line.program());
    process
        .args(line.args())
        .current_dir(&cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::info!("exec '{}' in {}", req.command.trim(), cwd.display());

    let max = exec.max_output_bytes;
    let mut child = process.spawn().map_err(|e| {
        AppError::op(
            "command failed",
            CoreError::from_io(Path::new(line.program()), e),
        )
    })?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stdout = read_capped(stdout, max);
    let stderr = read_capped(stderr, max);
    let exited = child.wait();
    let collect = async move { tokio::try_join!(stdout, stderr, exited) };

    let (stdout, stderr, status) =
        match timeout(Duration::from_secs(exec.timeout_secs), collect).await {
            Ok(Ok(collected)) => collected,
            Ok(Err(e)) => {
                return Err(AppError::op(
                    "command failed",
                    CoreError::from_io(Path::new(line.program()), e),
                ))
            }
            Err(_) => {
                tracing::warn!("command '{}' timed out", line.program());
                return Err(AppError::Timeout(format!(
                    "command timed out after {}s",
                    exec.timeout_secs
                )));
            }
        };

    let (stdout, stdout_cut) = render_output(&stdout);
    let (stderr, stderr_cut) = render_output(&stderr);

    Ok(Json(ExecResponse {
        success: status.success(),
        exit_code: status.code(),
        stdout,
        stderr,
        truncated: stdout_cut || stderr_cut,
    }))
}

/// Output kept from one pipe and the total byte count the pipe produced.
struct Captured {
    kept: Vec<u8>,
    total: u64,
}

/// Keeps at most `max` bytes of `pipe` and drains the rest so the child
/// never blocks on a full pipe.
async fn read_capped<R>(pipe: Option<R>, max: usize) -> std::io::Result<Captured>
where
    R: AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return Ok(Captured {
            kept: Vec::new(),
            total: 0,
        });
    };
    let mut kept = Vec::new();
    (&mut pipe).take(max as u64).read_to_end(&mut kept).await?;
    let rest = tokio::io::copy(&mut pipe, &mut tokio::io::sink()).await?;
    let total = kept.len() as u64 + rest;
    Ok(Captured { kept, total })
}

/// Lossy UTF-8 of the kept bytes, and whether anything was cut.
fn render_output(captured: &Captured) -> (String, bool) {
    let mut text = String::from_utf8_lossy(&captured.kept).into_owned();
    let cut = captured.total > captured.kept.len() as u64;
    if cut {
        text.push_str(&format!(
            "\n[output truncated, {} bytes total]",
            captured.total
        ));
    }
    (text, cut)
}
