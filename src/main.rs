use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use evdev::{AbsoluteAxisCode, Device, EventSummary, KeyCode, SynchronizationCode};
use fbswap::{Bgra, Rect, Session, SessionOptions, Surface};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::mpsc::{RecvTimeoutError, Sender, channel};
use std::thread;
use std::time::{Duration, Instant};

const QUIT_SIZE: i32 = 80;
const MARKER_SIZE: i32 = 24;

const BACKGROUND: Bgra = Bgra::opaque(0x10, 0x18, 0x20);
const QUIT: Bgra = Bgra::opaque(0xc0, 0x30, 0x30);
const MARKER: Bgra = Bgra::opaque(0x40, 0xd0, 0x60);

#[derive(Debug, Parser)]
#[command(name = "fbswap-demo", about = "Double-buffered framebuffer touch demo")]
struct Cli {
    /// Framebuffer device
    #[arg(long, env = "FRAMEBUFFER", default_value = "/dev/fb0")]
    device: PathBuf,
    /// Touch or pointer input device
    #[arg(long, default_value = "/dev/input/event1")]
    input: PathBuf,
    #[arg(long, default_value_t = 50)]
    repaint_ms: u64,
    /// Exit after this many frames
    #[arg(long)]
    frames: Option<u64>,
    #[arg(long, action = ArgAction::SetTrue)]
    show_cursor: bool,
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn read_touches(mut device: Device, clicks: Sender<(i32, i32)>) {
    let (mut x, mut y) = (0, 0);
    let mut touched = false;
    loop {
        let events = match device.fetch_events() {
            Ok(events) => events,
            Err(e) => {
                warn!("stopped reading input: {e}");
                return;
            }
        };
        for event in events {
            match event.destructure() {
                EventSummary::AbsoluteAxis(_, code, value) if code == AbsoluteAxisCode::ABS_X => x = value,
                EventSummary::AbsoluteAxis(_, code, value) if code == AbsoluteAxisCode::ABS_Y => y = value,
                EventSummary::Key(_, code, 1) if code == KeyCode::BTN_TOUCH => touched = true,
                EventSummary::Synchronization(_, code, _)
                    if code == SynchronizationCode::SYN_REPORT && touched =>
                {
                    touched = false;
                    if clicks.send((x, y)).is_err() {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

fn fill(surface: &mut Surface<'_>, rect: Rect, color: Bgra) {
    let Some(mut area) = surface.sub_image(rect) else {
        return;
    };
    let r = area.bounds();
    for y in r.y0..r.y1 {
        for x in r.x0..r.x1 {
            area.set(x, y, color);
        }
    }
}

fn quit_box(bounds: Rect) -> Rect {
    Rect::new(bounds.x1 - QUIT_SIZE, 0, bounds.x1, QUIT_SIZE)
}

fn paint(surface: &mut Surface<'_>, marker: Option<(i32, i32)>) {
    let bounds = surface.bounds();
    fill(surface, bounds, BACKGROUND);
    fill(surface, quit_box(bounds), QUIT);
    if let Some((x, y)) = marker {
        let half = MARKER_SIZE / 2;
        fill(surface, Rect::new(x - half, y - half, x + half, y + half), MARKER);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level.as_str()))
        .format_timestamp_secs()
        .init();

    let options = SessionOptions { hide_cursor: !cli.show_cursor };
    let mut session = Session::open_with(&cli.device, options)
        .with_context(|| format!("Failed to open {}", cli.device.display()))?;

    // Start with both buffers blank.
    for _ in 0..2 {
        session.clear();
        if let Err(e) = session.swap() {
            warn!("{e}");
        }
    }

    let (click_sender, click_receiver) = channel();
    match Device::open(&cli.input) {
        Ok(device) => {
            thread::spawn(move || read_touches(device, click_sender));
        }
        Err(e) => warn!("no input from {}: {e}", cli.input.display()),
    }

    let frame_interval = Duration::from_millis(cli.repaint_ms);
    let quit = quit_box(session.bounds());
    let mut marker = None;
    let mut frames = 0u64;
    let mut last_paint = Instant::now();

    loop {
        let wait = frame_interval.saturating_sub(last_paint.elapsed());
        match click_receiver.recv_timeout(wait) {
            Ok((x, y)) => {
                info!("click at {x},{y}");
                if quit.contains(x, y) {
                    break;
                }
                marker = Some((x, y));
                continue;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => thread::sleep(wait),
        }

        paint(&mut session.surface(), marker);
        if let Err(e) = session.swap() {
            warn!("{e}");
        }
        last_paint = Instant::now();

        frames += 1;
        if cli.frames.is_some_and(|limit| frames >= limit) {
            debug!("frame limit reached");
            break;
        }
    }

    session.close();
    Ok(())
}
