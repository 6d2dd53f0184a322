use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use protocol::framing::MAX_LINE_LENGTH;
use protocol::{WorkRequest, WorkResponse};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::Instrument;

use crate::config::MAX_CONCURRENCY;
use crate::error::RunError;

use super::handler::{ExecutionPlan, RequestHandler};

/// Serves newline-delimited JSON work requests until `reader` is exhausted.
///
/// At most `concurrency` requests run at once; reading pauses while the pool
/// is full. Responses are written by a single task in completion order, each
/// tagged with the id of its request.
pub(crate) async fn run_worker<R, W>(
    reader: R,
    writer: W,
    handler: Arc<RequestHandler>,
    concurrency: usize,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
    let permits = Arc::new(Semaphore::new(concurrency));
    let (response_tx, response_rx) = mpsc::channel::<WorkResponse>(concurrency * 2);
    let writer_task = tokio::spawn(write_responses(writer, response_rx));
    let mut in_flight = JoinSet::new();

    tracing::info!(concurrency, "persistent worker started");
    let mut requests =
        FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    let mut read_error = None;
    while let Some(line) = requests.next().await {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                read_error = Some(anyhow::Error::new(err).context("failed to read work request"));
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let request: WorkRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "invalid work request payload");
                continue;
            }
        };
        if request.cancel {
            tracing::info!(
                request_id = request.request_id,
                "cancellation not supported, request keeps running"
            );
            continue;
        }

        let permit = match Arc::clone(&permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(err) => {
                read_error = Some(anyhow::Error::new(err).context("worker pool closed"));
                break;
            }
        };
        while let Some(finished) = in_flight.try_join_next() {
            log_join_failure(finished);
        }
        let handler = Arc::clone(&handler);
        let response_tx = response_tx.clone();
        let span = tracing::info_span!("work_request", request_id = request.request_id);
        in_flight.spawn(
            async move {
                let response = handle_request(&handler, request).await;
                if response_tx.send(response).await.is_err() {
                    tracing::error!("response writer stopped, dropping response");
                }
                drop(permit);
            }
            .instrument(span),
        );
    }

    // Accepted requests are always answered, even when reading failed.
    while let Some(finished) = in_flight.join_next().await {
        log_join_failure(finished);
    }
    drop(response_tx);
    let written = writer_task
        .await
        .context("response writer task failed")
        .and_then(|written| written);

    if let Some(err) = read_error {
        if let Err(write_err) = written {
            tracing::error!(error = %write_err, "response writer failed");
        }
        tracing::error!(error = %err, "request stream failed, persistent worker stopped");
        return Err(err);
    }
    written?;
    tracing::info!("request stream closed, persistent worker stopped");
    Ok(())
}

fn log_join_failure(finished: Result<(), JoinError>) {
    if let Err(err) = finished {
        tracing::error!(error = %err, "work request task failed");
    }
}

async fn handle_request(handler: &RequestHandler, request: WorkRequest) -> WorkResponse {
    let request_id = request.request_id;
    match execute_request(handler, &request).await {
        Ok(response) => response,
        Err(err) => {
            if err.is_configuration() {
                tracing::warn!(error = %err, "rejected work request");
            } else {
                tracing::error!(error = %err, "work request failed");
            }
            WorkResponse::error(request_id, err.to_string())
        }
    }
}

async fn execute_request(
    handler: &RequestHandler,
    request: &WorkRequest,
) -> Result<WorkResponse, RunError> {
    let sandbox = request.sandbox_dir().map(Path::new);
    let mut plan = ExecutionPlan::from_arguments(&request.arguments)?;
    if let Some(dir) = sandbox {
        plan = plan.relative_to(dir);
    }
    let outcome = handler.execute(&plan, &plan.tool_args, sandbox).await?;
    let response = match outcome.output {
        None if outcome.reported_exit_code == 0 => WorkResponse::success(request.request_id),
        output => WorkResponse::completed(request.request_id, outcome.reported_exit_code, output),
    };
    Ok(response)
}

async fn write_responses<W>(
    writer: W,
    mut responses: mpsc::Receiver<WorkResponse>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut framed =
        FramedWrite::new(writer, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    while let Some(response) = responses.recv().await {
        let payload = serde_json::to_string(&response)?;
        framed
            .send(payload)
            .await
            .context("failed to write work response")?;
        tracing::debug!(
            request_id = response.request_id,
            exit_code = response.exit_code,
            "work response sent"
        );
    }
    Ok(())
}
