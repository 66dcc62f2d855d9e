use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    execute,
};

use crate::boosters::PropellantKind;
use crate::game::Game;
use crate::gauge::Gauge;
use crate::types::Vector2D;

// --- ScreenBuffer for headless rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    cursor_x: u16,
    cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.cursor_y < self.height && self.cursor_x < self.width {
                self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
            }
            self.cursor_x += 1;
        }
    }

    pub fn clear(&mut self) {
        self.buffer = vec![vec![' '; self.width as usize]; self.height as usize];
        self.cursor_x = 0;
        self.cursor_y = 0;
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
        info!("---------------------");
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.write_str(&s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- OutputTarget: real stdout or an in-memory buffer for headless runs ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            }
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => {
                let s = String::from_utf8_lossy(buf);
                sb.write_str(&s);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => sb.flush(),
        }
    }
}

// --- GameGrid: char canvas the scene is composed onto each frame ---
pub struct GameGrid {
    pub grid: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = c;
        }
    }

    pub fn clear(&mut self) {
        self.grid = vec![vec![' '; self.width as usize]; self.height as usize];
    }

    /// Map a world position onto a grid cell.
    fn cell_for(&self, pos: Vector2D, world_width: f64, world_height: f64) -> (u16, u16) {
        let x = pos.x / world_width * (self.width.saturating_sub(1)) as f64;
        let y = pos.y / world_height * (self.height.saturating_sub(1)) as f64;
        (x.round() as u16, y.round() as u16)
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", self.grid[y as usize].iter().collect::<String>())?;
        }
        Ok(())
    }

    pub fn clear_screen_manual(
        &self,
        stdout: &mut OutputTarget,
        terminal_width: u16,
        terminal_height: u16,
    ) -> io::Result<()> {
        for y in 0..terminal_height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", " ".repeat(terminal_width as usize))?;
        }
        stdout.execute_move_to(MoveTo(0, 0))?;
        Ok(())
    }
}

/// Compose the current simulation state onto the grid: boosters first, the
/// ship on top. Reads snapshots only; never mutates the game.
pub fn draw_scene(game: &Game, grid: &mut GameGrid) {
    let world_width = game.config().world_width;
    let world_height = game.config().world_height;

    for booster in game.live_boosters() {
        let (x, y) = grid.cell_for(booster.body.pos, world_width, world_height);
        // Lowercase once the remaining lifetime drops under 30%.
        let fading = booster.body.lifetime.as_gauge(true).percent_full() < 0.3;
        let glyph = match (booster.kind, fading) {
            (PropellantKind::Fuel, false) => 'F',
            (PropellantKind::Fuel, true) => 'f',
            (PropellantKind::Oxidizer, false) => 'O',
            (PropellantKind::Oxidizer, true) => 'o',
        };
        grid.set_char(x, y, glyph);
    }

    let player = &game.player;
    let (x, y) = grid.cell_for(player.body.pos, world_width, world_height);
    grid.set_char(x, y, ship_glyph(player.body.acc.angle()));

    // Exhaust trail opposite the thrust direction while burning.
    if player.engine.is_on() {
        if let Some(dir) = player.body.acc.normalized() {
            let behind = player.body.pos.sub(dir.scale(player.body.size * 2.0));
            let (ex, ey) = grid.cell_for(behind, world_width, world_height);
            let glyph = if player.engine.is_speedup() { '#' } else { '+' };
            grid.set_char(ex, ey, glyph);
        }
    }
}

/// Quadrant arrow for the thrust direction. The y axis points down, so
/// positive angles sweep toward the bottom of the screen.
fn ship_glyph(angle: f64) -> char {
    use std::f64::consts::FRAC_PI_4;
    let normalized = angle.rem_euclid(std::f64::consts::TAU);
    if normalized < FRAC_PI_4 || normalized >= 7.0 * FRAC_PI_4 {
        '>'
    } else if normalized < 3.0 * FRAC_PI_4 {
        'v'
    } else if normalized < 5.0 * FRAC_PI_4 {
        '<'
    } else {
        '^'
    }
}

/// Text bar for a gauge, e.g. `[######----]`.
pub fn gauge_bar(gauge: &Gauge, width: usize) -> String {
    let filled = (gauge.percent_full() * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
