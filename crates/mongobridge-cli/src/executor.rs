use std::time::{Duration, Instant};

use bson::Document;
use futures::TryStreamExt;
use mongodb::error::{Error as DriverError, ErrorKind};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use mongobridge_query::{BridgeError, Mode, QueryRequest, ResultEnvelope};

use crate::config::Config;

/// Bound on server selection so an unreachable deployment fails fast instead
/// of hanging the invoking process.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Open a fresh client for this invocation. The handle is dropped at process
/// exit; there is no pooling across invocations.
pub async fn connect(config: &Config) -> Result<Client, BridgeError> {
    let mut options = ClientOptions::parse(&config.uri)
        .await
        .map_err(|e| BridgeError::Connection(e.to_string()))?;
    options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
    Client::with_options(options).map_err(|e| BridgeError::Connection(e.to_string()))
}

/// Dispatch the decoded request and materialize the full result set.
///
/// The timer brackets dispatch through materialization only — decode and
/// encode overhead is not part of `executionTime`.
pub async fn execute(
    client: &Client,
    request: QueryRequest,
) -> Result<ResultEnvelope, BridgeError> {
    let collection = client
        .database(&request.database)
        .collection::<Document>(&request.collection);

    let started = Instant::now();
    let rows = match request.mode {
        Mode::Find => run_find(&collection, &request).await?,
        Mode::Aggregate => run_aggregate(&collection, request.pipeline).await?,
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::debug!(rows = rows.len(), elapsed_ms, "query materialized");
    ResultEnvelope::from_documents(rows, elapsed_ms)
}

async fn run_find(
    collection: &Collection<Document>,
    request: &QueryRequest,
) -> Result<Vec<Document>, BridgeError> {
    let mut find = collection.find(request.filter.clone());
    if let Some(projection) = &request.projection {
        find = find.projection(projection.clone());
    }
    if let Some(sort) = &request.sort {
        // Document iteration order is the caller's key order, so multi-key
        // sorts apply in the order the request spelled them.
        find = find.sort(sort.clone());
    }
    if let Some(skip) = request.effective_skip() {
        find = find.skip(skip);
    }
    if let Some(limit) = request.effective_limit() {
        find = find.limit(limit);
    }

    let cursor = find.await.map_err(classify)?;
    cursor.try_collect().await.map_err(classify)
}

async fn run_aggregate(
    collection: &Collection<Document>,
    pipeline: Vec<Document>,
) -> Result<Vec<Document>, BridgeError> {
    let cursor = collection.aggregate(pipeline).await.map_err(classify)?;
    cursor.try_collect().await.map_err(classify)
}

/// Split driver failures into the bridge's taxonomy: reachability problems
/// are connection errors, everything else is a query error.
fn classify(error: DriverError) -> BridgeError {
    match *error.kind {
        ErrorKind::ServerSelection { ref message, .. } => {
            BridgeError::Connection(message.clone())
        }
        ErrorKind::Io(_) => BridgeError::Connection(error.to_string()),
        _ => BridgeError::Query(error.to_string()),
    }
}
