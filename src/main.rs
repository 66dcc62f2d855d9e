use std::env;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton,
        MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

mod boosters;
mod config;
mod constants;
mod entities;
mod game;
mod gauge;
mod rendering;
mod terminal_io;
mod types;

use game::{ControlEvent, ControlScheme, Game};
use rendering::{GameGrid, OutputTarget, ScreenBuffer, draw_scene, gauge_bar};
use terminal_io::SimulatedInput;
use types::Vector2D;

struct Args {
    headless: bool,
    pilot: bool,
    cursor: bool,
    seed: Option<u64>,
    config_path: Option<String>,
    max_frames: Option<u64>,
}

fn parse_args() -> Args {
    let mut parsed = Args {
        headless: false,
        pilot: false,
        cursor: false,
        seed: None,
        config_path: None,
        max_frames: None,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--headless" => parsed.headless = true,
            "--pilot" => parsed.pilot = true,
            "--cursor" => parsed.cursor = true,
            "--seed" => parsed.seed = args.next().and_then(|v| v.parse().ok()),
            "--config" => parsed.config_path = args.next(),
            "--max-frames" => parsed.max_frames = args.next().and_then(|v| v.parse().ok()),
            other => info!("Ignoring unknown argument {}", other),
        }
    }
    parsed
}

fn main() -> io::Result<()> {
    simple_logging::log_to_file("drifter.log", log::LevelFilter::Info).unwrap();
    info!("Starting drifter.");

    let args = parse_args();
    let sim_config = match &args.config_path {
        Some(path) => config::load(path),
        None => config::SimConfig::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let scheme = if args.pilot {
        ControlScheme::RandomPilot
    } else if args.cursor {
        ControlScheme::CursorAim
    } else {
        ControlScheme::ScrollRotate
    };
    info!("Control scheme: {:?}", scheme);

    let game = Game::new(sim_config, scheme, rng);

    if args.headless {
        run_headless(game, args.max_frames.unwrap_or(600))
    } else {
        run_interactive(game, args.max_frames)
    }
}

/// Fixed-step run against an in-memory screen, driven by the scripted
/// input. Useful for demos and smoke checks without a terminal.
fn run_headless(mut game: Game, max_frames: u64) -> io::Result<()> {
    let (width, height) = (80u16, 24u16);
    let mut stdout_target = OutputTarget::ScreenBuffer(ScreenBuffer::new(width, height));
    let mut grid = GameGrid::new(width, height);
    let tick_rate = game.config().tick_rate;
    let dt = 1.0 / tick_rate;
    let mut input = SimulatedInput::demo_script(tick_rate, max_frames);
    let dump_every = (tick_rate as u64).max(1);

    let mut frame_count: u64 = 0;
    while game.is_running() && frame_count < max_frames {
        if input.poll(frame_count)? {
            let event = input.read()?;
            if !apply_input_event(&event, &mut game, (width, height)) {
                break;
            }
        }
        game.update(dt);

        grid.clear();
        draw_scene(&game, &mut grid);
        grid.render(&mut stdout_target)?;
        render_hud(&mut stdout_target, &game)?;

        // One dump per simulated second keeps the log readable.
        if frame_count % dump_every == 0 {
            if let OutputTarget::ScreenBuffer(sb) = &stdout_target {
                sb.print_to_log();
            }
        }
        frame_count += 1;
    }

    info!(
        "Headless run finished after {} frames ({:.1}s simulated).",
        frame_count,
        game.elapsed()
    );
    Ok(())
}

fn run_interactive(mut game: Game, max_frames: Option<u64>) -> io::Result<()> {
    enable_raw_mode().map_err(|e| {
        error!("Failed to enable raw mode: {}", e);
        e
    })?;
    let (mut terminal_width, mut terminal_height) = size().map_err(|e| {
        error!("Failed to get terminal size: {}", e);
        e
    })?;
    let mut stdout_target = OutputTarget::Stdout(io::stdout());
    stdout_target.execute_other_command(Hide)?;
    if game.scheme() == ControlScheme::CursorAim {
        stdout_target.execute_other_command(EnableMouseCapture)?;
    }

    let mut grid = GameGrid::new(terminal_width, terminal_height);
    grid.clear_screen_manual(&mut stdout_target, terminal_width, terminal_height)?;

    let tick_budget = Duration::from_secs_f64(1.0 / game.config().tick_rate);
    let mut last_tick = Instant::now();
    let mut frame_count: u64 = 0;

    while game.is_running() && max_frames.map_or(true, |max| frame_count < max) {
        if event::poll(tick_budget).map_err(|e| {
            error!("Failed to poll event: {}", e);
            e
        })? {
            let event = event::read().map_err(|e| {
                error!("Failed to read event: {}", e);
                e
            })?;
            match event {
                Event::Resize(new_width, new_height) => {
                    terminal_width = new_width;
                    terminal_height = new_height;
                    grid = GameGrid::new(terminal_width, terminal_height);
                    grid.clear_screen_manual(&mut stdout_target, terminal_width, terminal_height)?;
                }
                other => {
                    if !apply_input_event(&other, &mut game, (terminal_width, terminal_height)) {
                        break;
                    }
                }
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f64();
        last_tick = now;
        game.update(dt);

        grid.clear();
        draw_scene(&game, &mut grid);
        grid.render(&mut stdout_target)?;
        render_hud(&mut stdout_target, &game)?;
        render_controls(&mut stdout_target, terminal_height)?;
        stdout_target.flush()?;

        frame_count += 1;
    }

    show_summary_screen(&mut stdout_target, &game, terminal_width, terminal_height)?;

    if game.scheme() == ControlScheme::CursorAim {
        stdout_target.execute_other_command(DisableMouseCapture)?;
    }
    stdout_target.execute_other_command(Show).map_err(|e| {
        error!("Failed to show cursor on exit: {}", e);
        e
    })?;
    disable_raw_mode().map_err(|e| {
        error!("Failed to disable raw mode on exit: {}", e);
        e
    })?;
    Ok(())
}

/// Translate a terminal event into simulation control. Returns false when
/// the user asked to quit. Mouse buttons mirror the classic mapping:
/// hold left to burn, hold right to speed up, scroll to steer.
fn apply_input_event(event: &Event, game: &mut Game, terminal_size: (u16, u16)) -> bool {
    let rotation_step = game.config().acc_rotation_per_scroll;
    match event {
        Event::Key(key_event) => match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char(' ') => {
                if game.player.engine.is_on() {
                    game.apply(ControlEvent::EngineOff);
                } else {
                    game.apply(ControlEvent::EngineOn);
                }
            }
            KeyCode::Char('s') => {
                let speedup = game.player.engine.is_speedup();
                game.apply(ControlEvent::Speedup(!speedup));
            }
            KeyCode::Left => game.apply(ControlEvent::RotateAcc(-rotation_step)),
            KeyCode::Right => game.apply(ControlEvent::RotateAcc(rotation_step)),
            _ => {}
        },
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => game.apply(ControlEvent::EngineOn),
            MouseEventKind::Up(MouseButton::Left) => game.apply(ControlEvent::EngineOff),
            MouseEventKind::Down(MouseButton::Right) => game.apply(ControlEvent::Speedup(true)),
            MouseEventKind::Up(MouseButton::Right) => game.apply(ControlEvent::Speedup(false)),
            MouseEventKind::ScrollUp => game.apply(ControlEvent::RotateAcc(rotation_step)),
            MouseEventKind::ScrollDown => game.apply(ControlEvent::RotateAcc(-rotation_step)),
            MouseEventKind::Moved => {
                if game.scheme() == ControlScheme::CursorAim {
                    let target = cell_to_world(
                        mouse_event.column,
                        mouse_event.row,
                        terminal_size,
                        game,
                    );
                    game.apply(ControlEvent::AimAcc(target));
                }
            }
            _ => {}
        },
        _ => {}
    }
    true
}

fn cell_to_world(column: u16, row: u16, terminal_size: (u16, u16), game: &Game) -> Vector2D {
    let (width, height) = terminal_size;
    let x = column as f64 / width.max(1) as f64 * game.config().world_width;
    let y = row as f64 / height.max(1) as f64 * game.config().world_height;
    Vector2D::new(x, y)
}

fn render_hud(stdout: &mut OutputTarget, game: &Game) -> io::Result<()> {
    let engine = &game.player.engine;
    let state = if !engine.has_propellants() {
        "DRY"
    } else if !engine.is_on() {
        "OFF"
    } else if engine.is_speedup() {
        "BURN+"
    } else {
        "BURN"
    };
    stdout.execute_move_to(MoveTo(0, 0))?;
    write!(
        stdout,
        "Fuel {} Oxidizer {} Engine {:<5} Speed {:>6.1} T-{:>5.1}s",
        gauge_bar(&engine.fuel, 10),
        gauge_bar(&engine.oxidizer, 10),
        state,
        game.player.body.vel.length(),
        game.time_left(),
    )
}

fn render_controls(stdout: &mut OutputTarget, terminal_height: u16) -> io::Result<()> {
    let controls_text = [
        "Controls:",
        "  Space      : Engine on/off",
        "  s          : Speedup on/off",
        "  Left/Right : Rotate thrust",
        "  q          : Quit",
    ];
    let start_y = terminal_height.saturating_sub(controls_text.len() as u16);
    for (i, line) in controls_text.iter().enumerate() {
        stdout.execute_move_to(MoveTo(0, start_y.saturating_add(i as u16)))?;
        write!(stdout, "{}", line)?;
    }
    Ok(())
}

fn show_summary_screen(
    stdout: &mut OutputTarget,
    game: &Game,
    terminal_width: u16,
    terminal_height: u16,
) -> io::Result<()> {
    let grid = GameGrid::new(terminal_width, terminal_height);
    grid.clear_screen_manual(stdout, terminal_width, terminal_height)?;

    let end_msg = "FLIGHT OVER";
    let time_msg = format!("Time flown: {:.1}s", game.elapsed());
    let tanks_msg = format!(
        "Fuel left: {:.0}%  Oxidizer left: {:.0}%",
        game.player.engine.fuel.percent_full() * 100.0,
        game.player.engine.oxidizer.percent_full() * 100.0
    );
    let exit_msg = "Press any key to exit...";

    for (offset, msg) in [
        (-2i16, end_msg),
        (0, time_msg.as_str()),
        (1, tanks_msg.as_str()),
        (3, exit_msg),
    ] {
        let x = terminal_width / 2 - (msg.len() as u16).min(terminal_width) / 2;
        let y = (terminal_height as i16 / 2 + offset).max(0) as u16;
        stdout.execute_move_to(MoveTo(x, y))?;
        write!(stdout, "{}", msg)?;
    }
    stdout.flush()?;

    let _ = io::stdin().bytes().next();
    Ok(())
}
