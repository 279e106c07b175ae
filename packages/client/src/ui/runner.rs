//! Client execution logic.

use std::sync::{Arc, mpsc as std_mpsc};

use rustyline::{Cmd, DefaultEditor, KeyCode, KeyEvent, Modifiers, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    domain::{FeedSource, KeyValueStore, SyncError},
    infrastructure::{FileStore, HttpFeedClient, TerminalColorScheme},
    usecase::{
        ClientIdentity, ComposeBox, ComposeKey, FeedSyncEngine, PreferenceStore, ScrollAnchor,
        SubmissionFlow, select_strategy,
    },
};

use super::{
    command::Command,
    formatter::ViewFormatter,
    prompt::PROMPT,
    terminal::{TerminalFeedView, TerminalStatus, TerminalThemeIndicator},
};

/// Run the chat feed client until the user quits
pub async fn run_client(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize dependencies in order:
    // 1. Persistent store, preferences and identity
    // 2. HTTP client
    // 3. Terminal view, sync engine and submission flow

    // 1. Preferences and identity
    let file_store = Arc::new(FileStore::new(&config.store_path));
    tracing::info!("Preferences stored at {}", file_store.path().display());
    let store: Arc<dyn KeyValueStore> = file_store;
    let preferences = Arc::new(PreferenceStore::new(
        store.clone(),
        Arc::new(TerminalColorScheme),
        Arc::new(TerminalThemeIndicator),
    ));
    let identity = Arc::new(ClientIdentity::with_preferred_generator(store));
    let client_id = identity.get_or_create_client_id();
    preferences.apply_initial_theme();

    // 2. HTTP client
    let client = HttpFeedClient::new(&config.base_url)?;
    let source: Arc<dyn FeedSource> = Arc::new(client.clone());

    // 3. View, engine and submission
    let view = Arc::new(TerminalFeedView::new(config.viewport_rows));
    let anchor = ScrollAnchor::new(view.clone());
    let engine = FeedSyncEngine::new(source.clone(), anchor.clone())
        .with_push_watchdog(config.push_watchdog);
    let flow = SubmissionFlow::new(
        source,
        engine.clone(),
        identity,
        preferences.clone(),
        Arc::new(ComposeBox::new()),
        Arc::new(TerminalStatus),
    );

    let render_task = tokio::spawn(view.clone().render_loop());

    engine.initial_load().await;
    let strategy = select_strategy(config.transport, &client, config.poll_interval).await;
    let sync_engine = engine.clone();
    let sync_task = tokio::spawn(async move { sync_engine.run(strategy).await });

    let nickname = preferences.get_nickname();
    println!(
        "\nConnected to {} as '{}' (client {}). Type /help for commands.\n",
        config.base_url,
        if nickname.is_empty() { "(no nickname)" } else { nickname.as_str() },
        client_id.as_str()
    );

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let (seed_tx, seed_rx) = std_mpsc::channel::<Option<String>>();
    spawn_line_reader(input_tx, seed_rx);

    while let Some(line) = input_rx.recv().await {
        let mut seed = None;
        match Command::parse(&line) {
            Command::Message(text) => {
                flow.compose().set_text(text);
                let outcome = flow.handle_key(ComposeKey::Enter { shift: false }).await;
                if let Some(Err(e)) = &outcome {
                    tracing::debug!("Submission failed, draft kept: {}", e);
                }
                seed = retry_seed(&outcome, flow.compose());
            }
            Command::Theme => {
                if let Err(e) = preferences.toggle_theme() {
                    tracing::warn!("Failed to save theme: {}", e);
                }
            }
            Command::Nick(nickname) => match preferences.set_nickname(&nickname) {
                Ok(()) => println!("Nickname set to '{}'", preferences.get_nickname()),
                Err(e) => tracing::warn!("Failed to save nickname: {}", e),
            },
            Command::Up(lines) => view.scroll_lines(-lines),
            Command::Down(lines) => view.scroll_lines(lines),
            Command::Bottom => anchor.pin_to_bottom(),
            Command::Refresh => {
                if let Err(e) = engine.refresh().await {
                    tracing::warn!("{}", e);
                }
            }
            Command::Help => print!("{}", ViewFormatter::help()),
            Command::Quit => break,
            Command::Ignored => {}
        }
        if seed_tx.send(seed).is_err() {
            break;
        }
    }

    sync_task.abort();
    render_task.abort();
    tracing::info!("Client session ended normally");
    Ok(())
}

/// Text the next prompt starts with: the kept draft after a failed post
fn retry_seed(outcome: &Option<Result<(), SyncError>>, compose: &ComposeBox) -> Option<String> {
    match outcome {
        Some(Err(SyncError::PostFailed(_))) => {
            Some(compose.text()).filter(|text| !text.is_empty())
        }
        _ => None,
    }
}

/// Read lines on a blocking thread (rustyline is synchronous).
///
/// Shift+Enter and Alt+Enter insert a line break instead of ending the line.
/// After each line the reader waits for the input loop to hand back the
/// text the next prompt should start with.
fn spawn_line_reader(
    input_tx: mpsc::UnboundedSender<String>,
    seed_rx: std_mpsc::Receiver<Option<String>>,
) {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };
        rl.bind_sequence(KeyEvent(KeyCode::Enter, Modifiers::SHIFT), Cmd::Newline);
        rl.bind_sequence(KeyEvent(KeyCode::Enter, Modifiers::ALT), Cmd::Newline);

        let mut seed: Option<String> = None;
        loop {
            let read = match seed.take() {
                Some(draft) => rl.readline_with_initial(PROMPT, (draft.as_str(), "")),
                None => rl.readline(PROMPT),
            };
            match read {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    if input_tx.send(line).is_err() {
                        // Channel closed, exit thread
                        break;
                    }
                    match seed_rx.recv() {
                        Ok(next) => seed = next,
                        Err(_) => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });
}
