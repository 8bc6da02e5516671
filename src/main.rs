use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use anyhow::Context;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod config;
mod editor;
mod input;
mod render;
mod runtime;
mod theme;

use config::Settings;
use editor::Editor;
use render::Renderer;
use runtime::{ExecutionResult, LoadError, Loader, RunError, Session};
use theme::Theme;

/// Lifecycle notifications from the runtime tasks to the UI loop.
enum AppEvent {
    LoadProgress(u8),
    LoadFinished(Result<(), LoadError>),
    RunFinished(Result<ExecutionResult, RunError>),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    // Parse command line args
    let args: Vec<String> = env::args().collect();
    let settings = Arc::new(RwLock::new(Settings::default()));
    let mut editor = if args.len() > 1 {
        Editor::open(PathBuf::from(&args[1]), Arc::clone(&settings))
            .with_context(|| format!("failed to open {}", args[1]))?
    } else {
        Editor::new(Arc::clone(&settings))
    };

    let session = Arc::new(Session::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Initialize the runtime in the background; the UI shows the progress
    // bar until LoadFinished arrives.
    {
        let session = Arc::clone(&session);
        let settings = Arc::clone(&settings);
        let tx = tx.clone();
        tokio::spawn(async move {
            let loader = Loader::new(settings);
            let progress = tx.clone();
            let result = loader
                .initialize(&session, move |pct| {
                    let _ = progress.send(AppEvent::LoadProgress(pct));
                })
                .await;
            let _ = tx.send(AppEvent::LoadFinished(result));
        });
    }

    Renderer::setup()?;
    let result = run_ui(&mut editor, &session, &tx, &mut rx).await;
    Renderer::teardown()?;
    result
}

async fn run_ui(
    editor: &mut Editor,
    session: &Arc<Session>,
    tx: &mpsc::UnboundedSender<AppEvent>,
    rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> anyhow::Result<()> {
    let mut renderer = Renderer::new()?;
    let mut theme = Theme::by_name(&editor.settings.theme).unwrap_or_default();

    editor.adjust_scroll(renderer.text_height(), renderer.text_width(editor));
    renderer.render(editor, &theme)?;

    // Event stream for async key reading
    let mut event_stream = EventStream::new();

    while editor.running {
        tokio::select! {
            Some(Ok(event)) = event_stream.next() => {
                if let Event::Resize(width, height) = event {
                    renderer.resize(width, height);
                }
                input::handle_event(editor, event);

                if let Some(code) = editor.take_run_request() {
                    editor.on_run_started(&code);
                    let session = Arc::clone(session);
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let result = session.run(&code).await;
                        let _ = tx.send(AppEvent::RunFinished(result));
                    });
                }
            }
            Some(app_event) = rx.recv() => {
                match app_event {
                    AppEvent::LoadProgress(pct) => editor.on_load_progress(pct),
                    AppEvent::LoadFinished(result) => editor.on_load_finished(&result),
                    AppEvent::RunFinished(result) => editor.on_run_finished(result),
                }
            }
        }

        // Settings can change underneath us (startup script, finch::config).
        theme = Theme::by_name(&editor.settings.theme).unwrap_or_default();
        editor.adjust_scroll(renderer.text_height(), renderer.text_width(editor));
        renderer.render(editor, &theme)?;
    }

    Ok(())
}

/// Logs go to a file so the alternate screen stays clean. Filter with the
/// FINCH_LOG env var (tracing's EnvFilter syntax).
fn init_logging() {
    let Some(dir) = Loader::config_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("finch.log")) else {
        return;
    };
    let filter = EnvFilter::try_from_env("FINCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
