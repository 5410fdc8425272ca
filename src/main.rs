use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tracing::{info, warn};
use tray_icon::{menu::MenuEvent, TrayIconEvent};
use winit::dpi::LogicalSize;
use winit::event::{Event, StartCause, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder};
use winit::window::{WindowBuilder, WindowLevel};

use yescode_status::config::{self, Config};
use yescode_status::error::ResultExt;
use yescode_status::hotkeys::{AcceleratorId, GlobalHotkeyHost, HotkeySequenceEngine};
use yescode_status::logging;
use yescode_status::platform::PlatformPolicy;
use yescode_status::scheduler::{earliest_wake, DeadlineScheduler};
use yescode_status::shortcuts::parse_hotkey;
use yescode_status::status_app::StatusApp;
use yescode_status::stdin_commands::{start_stdin_listener, write_response, CommandRequest};
use yescode_status::tray::{
    init_toolkit, is_toggle_click, pump_toolkit, toolkit_pump_interval, TrayManager, TrayMenuIds,
};
use yescode_status::tray_presenter::TrayPresenter;
use yescode_status::window_control::{window_bounds, WinitDisplays, WinitWindowHost};
use yescode_status::window_manager::WindowModeController;
use yescode_status::window_state::CAPSULE_SIZE;

/// How often display geometry is polled for changes the OS does not announce.
const DISPLAY_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "yescode-status", version, about = "yesCode status-bar companion")]
struct Cli {
    /// Config file (default: ~/.yescode-status/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Hotkey chord, overriding the config file
    #[arg(long, value_name = "RAW")]
    hotkey: Option<String>,

    /// Do not read boundary commands from stdin
    #[arg(long)]
    no_stdin: bool,

    /// Parse a hotkey, print its display form or the error, and exit
    #[arg(long, value_name = "RAW")]
    check_hotkey: Option<String>,
}

#[derive(Debug)]
enum UserEvent {
    Hotkey(GlobalHotKeyEvent),
    TrayIcon(TrayIconEvent),
    Menu(MenuEvent),
    Command(CommandRequest),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(raw) = cli.check_hotkey.as_deref() {
        match parse_hotkey(raw) {
            Ok(spec) => {
                println!("{}", spec.display());
                return Ok(());
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }

    let _guard = logging::init();
    let config = config::load_config(cli.config.as_deref());
    let hotkey = cli.hotkey.clone().unwrap_or_else(|| config.hotkey.clone());
    run(config, hotkey, !cli.no_stdin)
}

fn run(config: Config, hotkey: String, read_stdin: bool) -> Result<()> {
    let policy = PlatformPolicy::current();
    let tray_ready = match init_toolkit() {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Tray unavailable, continuing without it");
            false
        }
    };

    let mut builder = EventLoopBuilder::<UserEvent>::with_user_event();
    #[cfg(target_os = "macos")]
    {
        use winit::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
        builder.with_activation_policy(ActivationPolicy::Accessory);
    }
    let event_loop = builder.build().context("Failed to create event loop")?;

    let window_builder = WindowBuilder::new()
        .with_title("yesCode Status")
        .with_decorations(false)
        .with_transparent(true)
        .with_visible(false)
        .with_resizable(false)
        .with_window_level(WindowLevel::AlwaysOnTop)
        .with_inner_size(LogicalSize::new(CAPSULE_SIZE.width, CAPSULE_SIZE.height));
    #[cfg(target_os = "windows")]
    let window_builder = {
        use winit::platform::windows::WindowBuilderExtWindows;
        window_builder.with_skip_taskbar(true)
    };
    let window = Rc::new(
        window_builder
            .build(&event_loop)
            .context("Failed to create overlay window")?,
    );

    let scheduler = DeadlineScheduler::new();
    let accelerators =
        GlobalHotkeyHost::new(policy.platform).context("Failed to set up global hotkeys")?;
    let engine = HotkeySequenceEngine::new(Box::new(accelerators), Box::new(scheduler.clone()))
        .with_reset_after(config.chord_timeout())
        .with_policy(config.registration_policy);
    let windows = WindowModeController::new(Box::new(WinitDisplays::new(window.clone())), policy);
    let presenter = TrayPresenter::new(config.brand.clone(), config.badge_range, policy.tray_title);

    let mut app = StatusApp::new(engine, windows, presenter);
    app.attach_window(Box::new(WinitWindowHost::new(window.clone())));

    // OS event receivers block, so each gets a forwarding thread
    let hotkey_proxy = event_loop.create_proxy();
    std::thread::spawn(move || {
        let rx = GlobalHotKeyEvent::receiver();
        while let Ok(event) = rx.recv() {
            if hotkey_proxy.send_event(UserEvent::Hotkey(event)).is_err() {
                break;
            }
        }
    });

    let tray_proxy = event_loop.create_proxy();
    std::thread::spawn(move || {
        let rx = TrayIconEvent::receiver();
        while let Ok(event) = rx.recv() {
            if tray_proxy.send_event(UserEvent::TrayIcon(event)).is_err() {
                break;
            }
        }
    });

    let menu_proxy = event_loop.create_proxy();
    std::thread::spawn(move || {
        let rx = MenuEvent::receiver();
        while let Ok(event) = rx.recv() {
            if menu_proxy.send_event(UserEvent::Menu(event)).is_err() {
                break;
            }
        }
    });

    if read_stdin {
        let command_proxy = event_loop.create_proxy();
        start_stdin_listener(move |request| {
            command_proxy.send_event(UserEvent::Command(request)).is_ok()
        })
        .context("Failed to start stdin listener")?;
    }

    let tooltip = format!("{} Status", config.brand);
    let mut tray_menu: Option<TrayMenuIds> = None;
    let mut next_display_poll = Instant::now() + DISPLAY_POLL_INTERVAL;

    event_loop
        .run(move |event, elwt| match event {
            Event::NewEvents(StartCause::Init) => {
                // Tray icons must be created once the loop is running
                if tray_ready {
                    match TrayManager::new(&tooltip) {
                        Ok(tray) => {
                            tray_menu = Some(tray.menu_ids());
                            app.attach_tray(Box::new(tray));
                        }
                        Err(e) => warn!(error = %e, "Tray unavailable, continuing without it"),
                    }
                }
                app.start(&hotkey, config.start_in_panel);
                info!(mode = %app.current_mode(), "yesCode Status started");
            }
            Event::UserEvent(UserEvent::Hotkey(event)) => {
                if event.state == HotKeyState::Pressed {
                    app.on_accelerator(AcceleratorId(event.id));
                }
            }
            Event::UserEvent(UserEvent::TrayIcon(event)) => {
                if is_toggle_click(&event) {
                    app.on_tray_click();
                }
            }
            Event::UserEvent(UserEvent::Menu(event)) => {
                if let Some(action) = tray_menu.as_ref().and_then(|m| m.match_menu_event(&event)) {
                    app.on_menu_action(action);
                }
            }
            Event::UserEvent(UserEvent::Command(request)) => {
                if let Some(response) = app.handle_command(request) {
                    write_response(&mut std::io::stdout().lock(), &response).log_err();
                }
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    app.on_close_requested();
                }
                WindowEvent::Moved(_) => {
                    if let Some(bounds) = window_bounds(&window) {
                        app.on_window_moved(bounds);
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => app.on_display_geometry_changed(),
                _ => {}
            },
            Event::AboutToWait => {
                pump_toolkit();
                let now = Instant::now();
                for id in scheduler.take_due(now) {
                    app.on_timer(id);
                }
                if now >= next_display_poll {
                    app.check_display_geometry();
                    next_display_poll = now + DISPLAY_POLL_INTERVAL;
                }
                if app.should_exit() {
                    elwt.exit();
                    return;
                }
                let wake = earliest_wake([
                    scheduler.next_deadline(),
                    Some(next_display_poll),
                    toolkit_pump_interval().map(|interval| now + interval),
                ])
                .unwrap_or(next_display_poll);
                elwt.set_control_flow(ControlFlow::WaitUntil(wake));
            }
            Event::LoopExiting => {
                app.teardown();
                info!("yesCode Status exiting");
            }
            _ => {}
        })
        .context("Event loop failed")
}
