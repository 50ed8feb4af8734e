mod app;
mod demo;
mod draw;
mod keys;
mod print;
mod state;
mod store;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::live::LiveWorker;
use crate::state::messages::{LiveCommand, NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crate::store::Backend;
use anyhow::anyhow;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use league_api::auth::{Role, authorize};
use league_api::board::{PassTracker, load_board};
use league_api::league::LeagueContext;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, Default)]
struct Cli {
    demo: bool,
    print: bool,
    check_access: Option<Role>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(cli) = handle_cli_args()? else {
        return Ok(());
    };

    let settings = AppSettings::load()?;
    let backend = Backend::connect(cli.demo, settings.league.zone().today())?;

    if let Some(role) = cli.check_access {
        return check_access(&backend, &settings, role).await;
    }
    if cli.print {
        return print_board(&backend, &settings).await;
    }

    better_panic::install();

    let tui_backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(tui_backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Debug)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let refresh_every = Duration::from_secs(settings.league.refresh_secs.max(5));
    let live_every = Duration::from_secs(settings.league.live_poll_secs.max(1));
    let league = settings.league.clone();
    let app = Arc::new(Mutex::new(App::new(settings)));
    let tracker = PassTracker::default();

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (live_cmd_tx, live_cmd_rx) = mpsc::channel::<LiveCommand>(16);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(
        backend.clone(),
        league,
        tracker.clone(),
        network_req_rx,
        network_resp_tx.clone(),
    );
    let network_task = tokio::spawn(network_worker.run());

    // Live game feeds
    let live_worker = LiveWorker {
        store: backend.clone(),
        every: live_every,
        commands: live_cmd_rx,
        responses: network_resp_tx,
    };
    let live_task = tokio::spawn(live_worker.run());

    // Periodic board reload thread
    let periodic_updater = PeriodicRefresher::new(network_req_tx.clone(), tracker.clone(), refresh_every);
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Demo scorekeeper, so the live feed has something to show
    let scorer_task = backend
        .demo_store()
        .cloned()
        .map(|store| tokio::spawn(demo::run_scorer(store, Duration::from_secs(6))));

    // Animation tick thread, 80ms ≈ 12.5 FPS
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(80));
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    // Trigger board load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        tracker,
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
        live_cmd_tx,
    )
    .await;

    input_handler.abort();
    network_task.abort();
    live_task.abort();
    periodic_task.abort();
    animation_task.abort();
    if let Some(task) = scorer_task {
        task.abort();
    }

    Ok(())
}

/// `None` when the arguments were fully handled (help, version).
fn handle_cli_args() -> anyhow::Result<Option<Cli>> {
    let mut cli = Cli::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("hoopsboard {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "--demo" => cli.demo = true,
            "--print" => cli.print = true,
            "--check-access" => {
                let role = args
                    .next()
                    .ok_or_else(|| anyhow!("--check-access needs a role (admin, coach, scorekeeper)"))?;
                cli.check_access = Some(role.parse::<Role>().map_err(|e| anyhow!(e))?);
            }
            _ => {
                eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
        }
    }
    Ok(Some(cli))
}

fn usage_text() -> &'static str {
    "hoopsboard - youth basketball league standings in your terminal

Usage:
  hoopsboard [--demo]
  hoopsboard [--demo] --print
  hoopsboard [--demo] --check-access <admin|coach|scorekeeper>
  hoopsboard --help
  hoopsboard --version

Environment:
  HOOPS_PROJECT_ID      Document store project (required unless --demo)
  HOOPS_DATABASE        Database id (default \"(default)\")
  HOOPS_FIRESTORE_URL   Override the store endpoint, e.g. a local emulator
  HOOPS_API_KEY         API key appended to store requests
  HOOPS_ID_TOKEN        Bearer token of the signed-in user
  HOOPS_TIMEOUT_SECS    Request timeout in seconds (default 10)
  HOOPS_LEAGUE_CONFIG   League JSON (default ~/.config/hoopsboard/league.json)
  HOOPS_DIVISION        Division to open on: all, a slug like 14u, or a full name
  HOOPS_UID             Signed-in user id for --check-access
  HOOPS_LOG             Log level for the log pane (default error)"
}

async fn print_board(backend: &Backend, settings: &AppSettings) -> anyhow::Result<()> {
    let today = settings.league.zone().today();
    let ctx = LeagueContext::new(settings.league.clone(), settings.initial_scope(), today);
    let mut rng = StdRng::from_entropy();
    let board = load_board(backend, &ctx, &mut rng).await;
    print!("{}", print::render_board(&board, &ctx.config));
    Ok(())
}

async fn check_access(backend: &Backend, settings: &AppSettings, role: Role) -> anyhow::Result<()> {
    let profile = authorize(backend, settings.uid.as_deref(), role, &settings.league.retry).await?;
    println!("{} may open the {role} pages", profile.display_name);
    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    tracker: PassTracker,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    live_commands: mpsc::Sender<LiveCommand>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &tracker, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(
                    response,
                    &app,
                    &tracker,
                    &network_requests,
                    &live_commands,
                    &mut loading,
                )
                .await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    tracker: &PassTracker,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let scope = app.lock().await.state.scope.clone();
            let ticket = tracker.begin();
            let _ = network_requests.send(NetworkRequest::LoadBoard { scope, ticket }).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests, tracker).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            guard.advance_animation();
            true
        }
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    tracker: &PassTracker,
    network_requests: &mpsc::Sender<NetworkRequest>,
    live_commands: &mpsc::Sender<LiveCommand>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::BoardLoaded { ticket, snapshot } => {
            // Last trigger wins: a pass that finished after a newer one started is dropped.
            if !tracker.is_current(ticket) {
                debug!("discarding stale board for {}", snapshot.scope.label());
                return false;
            }
            let mut guard = app.lock().await;
            guard.on_board_loaded(*snapshot);
            let live = guard.live_game_ids();
            drop(guard);
            let _ = live_commands.send(LiveCommand::Watch(live)).await;
        }
        NetworkResponse::GameUpdated { game } => {
            let mut guard = app.lock().await;
            let went_final = guard.on_game_updated(game);
            drop(guard);
            if went_final {
                let ticket = tracker.begin();
                let _ = network_requests.send(NetworkRequest::Refresh { ticket }).await;
            }
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
