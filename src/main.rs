// What you get:
// • `scan`  prints how many sprites each variation (sensitivity 1..20) finds.
// • `split` detects, optionally anchors + resizes, and writes PNG frames.
// • `view`  opens the sheet in a window:
//     Up/Down     change variation          Tab / Shift+Tab  select sprite
//     Mouse       click to select, drag edges or body
//     1..9        anchor preset (numpad layout: 7=top-left, 2=bottom, 5=center)
//     A           toggle preset target (all sprites / selected)
//     T           apply selected sprite's size to all (template)
//     R           reset selected box   Shift+R  reset whole variation
//     C           reset all anchors
//     Space       add selected to sequence   Backspace  drop last frame
//     S           reset sequence        E  export sequence (+ sprites.zip)   ESC quits

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use minifb::Key;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sprite_splitter::draw::{draw_crosshair, draw_text_5x7, render_overlay, render_sheet, Drawer};
use sprite_splitter::types::FrameBuffer;
use sprite_splitter::{export, loader, AnchorPreset, Background, DragEdge, Error, Session};

/// Find, align and export the sprites packed on a sprite sheet.
#[derive(Parser)]
#[command(name = "sprite-splitter", version, about)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print island counts per variation
    Scan {
        #[command(flatten)]
        detect: DetectArgs,

        /// Also list every raw island box
        #[arg(short, long)]
        list: bool,
    },

    /// Detect sprites and export them as PNG files
    Split {
        #[command(flatten)]
        detect: DetectArgs,

        /// Output folder
        output: PathBuf,

        /// Minimum island width and height (1..20)
        #[arg(short, long, default_value_t = 20)]
        sensitivity: u32,

        /// Anchor preset applied to every sprite before resizing
        #[arg(short, long)]
        preset: Option<AnchorPreset>,

        /// Resize every sprite to this sprite's size
        #[arg(short, long, conflicts_with = "size")]
        template: Option<usize>,

        /// Resize every sprite to WxH (e.g. 32x48)
        #[arg(long, value_parser = parse_size)]
        size: Option<(i32, i32)>,

        /// Write every sprite (sprite_N.png) instead of the sequence (frame_N.png)
        #[arg(long, conflicts_with = "zip")]
        all_sprites: bool,

        /// Also pack the sequence into this zip archive
        #[arg(long, value_name = "FILE")]
        zip: Option<PathBuf>,
    },

    /// Open the interactive editor
    View {
        #[command(flatten)]
        detect: DetectArgs,

        /// Where `E` exports the sequence (frames plus sprites.zip)
        #[arg(short, long, default_value = "sprites")]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct DetectArgs {
    /// Sprite sheet image (PNG, GIF, WebP, ...)
    sheet: PathBuf,

    /// How background pixels are recognised
    #[arg(short, long, value_enum, default_value = "alpha")]
    background: BackgroundMode,

    /// Color-key distance (sum of RGB differences) still counted as background
    #[arg(long, default_value_t = 30)]
    tolerance: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackgroundMode {
    /// Transparent pixels are background
    Alpha,
    /// Pixels close to the top-left color are background
    Key,
}

impl DetectArgs {
    fn background(&self) -> Background {
        match self.background {
            BackgroundMode::Alpha => Background::Alpha,
            BackgroundMode::Key => Background::ColorKey { tolerance: self.tolerance },
        }
    }

    fn open(&self) -> Result<Session, Error> {
        let sheet = loader::load_sheet(&self.sheet)?;
        Ok(Session::new(sheet, self.background()))
    }
}

fn parse_size(s: &str) -> Result<(i32, i32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got `{s}`"))?;
    let w = w.trim().parse::<i32>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<i32>().map_err(|e| e.to_string())?;
    Ok((w, h))
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "sprite_splitter=debug" } else { "sprite_splitter=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Command::Scan { detect, list } => scan(&detect, list),
        Command::Split { detect, output, sensitivity, preset, template, size, all_sprites, zip } => {
            let mut session = detect.open()?;
            session.apply_variation(sensitivity);
            if let Some(p) = preset {
                session.apply_preset(p, true);
            }
            if let Some(source) = template {
                session.apply_template_from(source)?;
            } else if let Some((w, h)) = size {
                session.apply_template(w, h)?;
            }

            let written = if all_sprites {
                export::export_sprites(session.sheet(), session.sprites(), &output)?
            } else {
                export::export_sequence(session.sheet(), session.sprites(), session.sequence(), &output)?
            };
            println!("Wrote {} files to {}", written.len(), output.display());
            if let Some(zip) = zip {
                let archive = export::export_zip(session.sheet(), session.sprites(), session.sequence(), &zip)?;
                println!("Wrote {}", archive.display());
            }
            Ok(())
        }
        Command::View { detect, output } => {
            let session = detect.open()?;
            view(session, output)
        }
    }
}

fn scan(detect: &DetectArgs, list: bool) -> Result<(), Error> {
    let session = detect.open()?;
    println!(
        "{}: {}x{}, {} islands",
        detect.sheet.display(),
        session.sheet().width(),
        session.sheet().height(),
        session.islands().len()
    );
    for (s, n) in session.variation_counts() {
        println!("  var {s:>2}: {n}");
    }
    if list {
        for (i, island) in session.islands().iter().enumerate() {
            println!("  [{i:>3}] {island}");
        }
    }
    Ok(())
}

/* ------------------------------ Interactive editor ------------------------------ */

const HUD_HEIGHT: usize = 24;
const MIN_WIDTH: usize = 480;

/// Numpad layout: the key's position on the pad is the anchored corner.
const PRESET_KEYS: [(Key, Key, AnchorPreset); 9] = [
    (Key::Key1, Key::NumPad1, AnchorPreset::BottomLeft),
    (Key::Key2, Key::NumPad2, AnchorPreset::Bottom),
    (Key::Key3, Key::NumPad3, AnchorPreset::BottomRight),
    (Key::Key4, Key::NumPad4, AnchorPreset::Left),
    (Key::Key5, Key::NumPad5, AnchorPreset::Center),
    (Key::Key6, Key::NumPad6, AnchorPreset::Right),
    (Key::Key7, Key::NumPad7, AnchorPreset::TopLeft),
    (Key::Key8, Key::NumPad8, AnchorPreset::Top),
    (Key::Key9, Key::NumPad9, AnchorPreset::TopRight),
];

/// Log a failed edit and keep going; nothing in the editor is fatal.
fn report(result: Result<(), Error>, status: &mut String) {
    if let Err(e) = result {
        warn!(error = %e, "edit rejected");
        *status = e.to_string();
    }
}

fn view(mut session: Session, output: PathBuf) -> Result<(), Error> {
    /* --- Window sized to the sheet plus a HUD strip --- */
    let sheet_w = session.sheet().width();
    let sheet_h = session.sheet().height();
    let width = sheet_w.max(MIN_WIDTH);
    let height = sheet_h + HUD_HEIGHT;
    let mut drawer = Drawer::new("Sprite Splitter", width, height)?;
    drawer.limit_fps(60);

    let mut screen = FrameBuffer { width, height, pixels: vec![0u32; width * height] };

    let mut apply_all = true;                        // preset target
    let mut drag: Option<(usize, DragEdge)> = None;  // active mouse grab
    let mut was_down = false;
    let mut status = String::from("READY");

    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Variation */
        if drawer.pressed_repeat(Key::Up) {
            session.apply_variation(session.sensitivity() + 1);
            drag = None;
        }
        if drawer.pressed_repeat(Key::Down) {
            session.apply_variation(session.sensitivity().saturating_sub(1));
            drag = None;
        }
        if drawer.pressed_once(Key::R) && drawer.shift_down() {
            session.reset_variation();
            drag = None;
            status = "VARIATION RESET".into();
        }

        /* 2) Selection */
        if drawer.pressed_repeat(Key::Tab) {
            if drawer.shift_down() { session.select_prev() } else { session.select_next() }
        }

        /* 3) Anchors */
        if drawer.pressed_once(Key::A) {
            apply_all = !apply_all;
        }
        for (key, pad, preset) in PRESET_KEYS {
            if drawer.pressed_once(key) || drawer.pressed_once(pad) {
                if session.apply_preset(preset, apply_all) == 0 {
                    status = "SELECT A SPRITE FIRST".into();
                } else {
                    status = format!("ANCHOR {preset}");
                }
            }
        }
        if drawer.pressed_once(Key::C) {
            session.reset_anchors();
        }

        /* 4) Geometry */
        if let Some(sel) = session.selected() {
            if drawer.pressed_once(Key::T) {
                report(session.apply_template_from(sel), &mut status);
            }
            if drawer.pressed_once(Key::R) && !drawer.shift_down() {
                report(session.reset_to_origin(sel), &mut status);
            }
            if drawer.pressed_once(Key::Space) {
                report(session.push_frame(sel), &mut status);
            }
        }

        /* 5) Sequence + export */
        if drawer.pressed_once(Key::Backspace) && !session.sequence().is_empty() {
            let last = session.sequence().len() - 1;
            report(session.remove_frame(last).map(|_| ()), &mut status);
        }
        if drawer.pressed_once(Key::S) {
            session.reset_sequence();
        }
        if drawer.pressed_once(Key::E) {
            let (sheet, sprites, sequence) = (session.sheet(), session.sprites(), session.sequence());
            let exported = export::export_sequence(sheet, sprites, sequence, &output).and_then(|files| {
                export::export_zip(sheet, sprites, sequence, &output.join("sprites.zip")).map(|_| files.len())
            });
            match exported {
                Ok(n) => status = format!("EXPORTED {n} FRAMES + ZIP"),
                Err(e) => report(Err(e), &mut status),
            }
        }

        /* 6) Mouse: press selects + grabs, hold drags, release lets go */
        let down = drawer.left_mouse_down();
        if let Some((mx, my)) = drawer.mouse_pos() {
            if down && !was_down && (my as usize) < sheet_h {
                drag = session.press(mx, my);
            } else if down {
                if let Some((idx, edge)) = drag {
                    report(session.drag(idx, edge, mx, my), &mut status);
                }
            }
        }
        if !down {
            drag = None;
        }
        was_down = down;

        /* 7) Draw: sheet, boxes, crosshair, HUD */
        render_sheet(&mut screen, session.sheet());
        render_overlay(&mut screen, session.sprites(), session.selected());
        if let Some((mx, my)) = drawer.mouse_pos() {
            draw_crosshair(&mut screen, mx, my, 8, 0x00_FF_CC_33);
        }

        let hud_y = sheet_h as i32 + 3;
        let counts = session.variation_counts();
        let here = counts
            .iter()
            .find(|(s, _)| *s == session.sensitivity())
            .map_or(0, |(_, n)| *n);
        let sel = session.selected().map_or("-".to_string(), |i| i.to_string());
        let line1 = format!(
            "VAR {} ({}) | SEL {} | PRESET: {} | {}",
            session.sensitivity(),
            here,
            sel,
            if apply_all { "ALL" } else { "SELECTED" },
            status
        );
        let frames: Vec<String> = session.sequence().frames().iter().map(|f| f.to_string()).collect();
        let line2 = format!("SEQ {}: {}", frames.len(), frames.join(" "));
        draw_text_5x7(&mut screen, 4, hud_y, &line1, 0x00_FF_FF_FF);
        draw_text_5x7(&mut screen, 4, hud_y + 10, &line2, 0x00_AA_AA_AA);

        drawer.present(&screen)?;
    }

    info!(sprites = session.sprites().len(), frames = session.sequence().len(), "editor closed");
    Ok(())
}
