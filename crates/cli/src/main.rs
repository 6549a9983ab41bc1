//! `fotokadr` -- terminal client for the ID-photo cropping backend.
//!
//! Submits one image, follows the processing task to its terminal
//! status, downloads the cropped result, and releases the server-side
//! session on exit (including Ctrl-C).
//!
//! # Usage
//!
//! ```text
//! fotokadr <file> <id_card|passport>
//! ```
//!
//! # Environment variables
//!
//! | Variable             | Required | Default                     | Description                     |
//! |----------------------|----------|-----------------------------|---------------------------------|
//! | `BACKEND_URL`        | no       | `http://localhost:5000`     | Cropping backend base URL       |
//! | `POLL_INTERVAL_SECS` | no       | `1`                         | Seconds between status queries  |
//! | `SESSION_FILE`       | no       | `<tmp>/fotokadr/session_id` | Durable session id location     |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};

use fotokadr_client::{
    BackendApi, ClientConfig, FileSessionStore, LifecycleCleaner, PollerConfig, SessionStore,
    SubmitOutcome, UploadCoordinator, UploadEvent,
};
use fotokadr_core::{DocumentType, RenderedResult, Severity};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fotokadr=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(file), Some(document_type)) = (args.next(), args.next()) else {
        bail!("Usage: fotokadr <file> <id_card|passport>");
    };
    let file = PathBuf::from(file);
    let document_type: DocumentType = document_type.parse()?;

    let config = ClientConfig::from_env();
    let api = Arc::new(BackendApi::new(config.backend_url.clone()));
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let cleaner = LifecycleCleaner::new(Arc::clone(&api), Arc::clone(&store));
    let coordinator = UploadCoordinator::new(
        Arc::clone(&api),
        Arc::clone(&store),
        PollerConfig {
            interval: config.poll_interval,
        },
    );

    // Greeting probe; the backend being quiet here is not fatal.
    match api.hello().await {
        Ok(hello) => println!("{}", hello.message),
        Err(e) => tracing::warn!(error = %e, "Backend greeting unavailable"),
    }

    let outcome = tokio::select! {
        outcome = run_upload(&coordinator, &api, &file, document_type) => outcome,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Przerwano.");
            Ok(())
        }
    };

    // Teardown mirrors the browser unload path: fire-and-forget clear,
    // stop polling, exit without waiting for delivery.
    cleaner.notify_teardown();
    coordinator.shutdown().await;

    outcome
}

/// Submit the file and follow it to a terminal outcome.
async fn run_upload(
    coordinator: &UploadCoordinator,
    api: &BackendApi,
    file: &Path,
    document_type: DocumentType,
) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .context("File name is not valid UTF-8")?;

    let mut events = coordinator.subscribe();

    println!("Przesyłanie i przetwarzanie danych...");
    let outcome = coordinator
        .submit(bytes, file_name, document_type)
        .await?;

    let task_id = match outcome {
        SubmitOutcome::Rejected { message } => {
            render_line(Severity::Error, &message);
            return Ok(());
        }
        SubmitOutcome::Completed(result) => {
            render_result(api, file, &result).await;
            return Ok(());
        }
        SubmitOutcome::Queued { task_id, .. } => task_id,
    };

    // Only the submitted task's terminal events matter; anything else
    // is stale.
    loop {
        match events.recv().await {
            Ok(event) if event.task_id() != task_id => continue,
            Ok(UploadEvent::TaskQueued { message, .. }) => {
                render_line(Severity::Info, &message);
            }
            Ok(UploadEvent::TaskCompleted { result, .. }) => {
                render_result(api, file, &result).await;
                return Ok(());
            }
            Ok(UploadEvent::TaskFailed { message, errors, .. }) => {
                render_line(Severity::Error, &message);
                for error in &errors {
                    render_line(Severity::Error, error);
                }
                return Ok(());
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            Err(e) => bail!("Event stream closed unexpectedly: {e}"),
        }
    }
}

/// Print a terminal result and download the cropped image next to the
/// input file.
async fn render_result(api: &BackendApi, input: &Path, result: &RenderedResult) {
    render_line(result.severity, &result.message);
    for warning in &result.warnings {
        render_line(Severity::Warning, warning);
    }
    for error in &result.errors {
        render_line(Severity::Error, error);
    }

    let Some(url) = result.image_url.as_deref() else {
        return;
    };

    let target = output_path(input);
    match api.fetch_output(url).await {
        Ok(bytes) => match tokio::fs::write(&target, bytes).await {
            Ok(()) => println!("Zapisano: {}", target.display()),
            Err(e) => render_line(Severity::Error, &format!("Nie udało się zapisać pliku: {e}")),
        },
        Err(e) => render_line(
            Severity::Error,
            &format!("Nie udało się pobrać zdjęcia: {e}"),
        ),
    }
}

/// Where the downloaded crop lands: `cropped_<input name>` beside the input.
fn output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("result.jpg");
    input.with_file_name(format!("cropped_{name}"))
}

/// One user-facing line, tagged with its severity bucket.
fn render_line(severity: Severity, message: &str) {
    let tag = match severity {
        Severity::Error => "BŁĄD",
        Severity::Warning => "UWAGA",
        Severity::Success => "OK",
        Severity::Info => "INFO",
    };
    println!("[{tag}] {message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_is_beside_input() {
        assert_eq!(
            output_path(Path::new("/tmp/photos/me.jpg")),
            PathBuf::from("/tmp/photos/cropped_me.jpg")
        );
    }
}
