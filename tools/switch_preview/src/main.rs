use std::{
    env,
    fs,
    path::{Path, PathBuf},
};

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use fixed::types::I16F16;
use nightswitch::{CloudArt, Constraint, SwitchButton, VisualConfig};

struct Config {
    out_dir: PathBuf,
    frames: u32,
    duration_ms: u32,
    density: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("tools/switch_preview/out"),
            frames: 16,
            duration_ms: 300,
            density: 2.0,
        }
    }
}

fn main() -> Result<(), String> {
    let cfg = parse_args(env::args().skip(1))?;
    if cfg.frames == 0 {
        return Err("--frames must be > 0".to_owned());
    }
    if cfg.density <= 0.0 {
        return Err("--density must be > 0".to_owned());
    }
    fs::create_dir_all(&cfg.out_dir).map_err(|e| format!("create output dir: {e}"))?;

    let visual = VisualConfig {
        duration_ms: cfg.duration_ms,
        density: I16F16::from_num(cfg.density),
        ..VisualConfig::default()
    };
    let mut switch = SwitchButton::new(visual, false);
    switch.on_attach();
    let size = switch.measure(Constraint::Unspecified, Constraint::Unspecified);

    let cloud_pixels = build_cloud_pixels(48, 24);
    let cloud =
        CloudArt::new(&cloud_pixels, 48, 24).map_err(|e| format!("cloud bitmap: {e}"))?;

    // One full on sweep followed by a full off sweep.
    for (leg, target_checked) in [("on", true), ("off", false)] {
        switch.set_checked(target_checked);
        for i in 0..cfg.frames {
            let now_ms = (i as u64 * cfg.duration_ms as u64) / (cfg.frames as u64 - 1).max(1);
            switch.tick(now_ms);
            let mut frame = Frame::new(size.width, size.height);
            switch
                .draw(&mut frame, &cloud)
                .map_err(|_| "draw failed".to_owned())?;
            let path = cfg.out_dir.join(format!("switch_{leg}_{i:02}.png"));
            image::save_buffer(&path, &frame.rgb, size.width, size.height, image::ColorType::Rgb8)
                .map_err(|e| format!("save {}: {e}", path.display()))?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}

/// Tightly packed RGB8 framebuffer the switch draws into.
struct Frame {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl Frame {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgb: vec![0; (width * height * 3) as usize],
        }
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Frame {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Rgb888>>,
    {
        for Pixel(p, color) in pixels {
            if p.x < 0 || p.y < 0 || p.x as u32 >= self.width || p.y as u32 >= self.height {
                continue;
            }
            let at = ((p.y as u32 * self.width + p.x as u32) * 3) as usize;
            self.rgb[at] = color.r();
            self.rgb[at + 1] = color.g();
            self.rgb[at + 2] = color.b();
        }
        Ok(())
    }
}

/// Stand-in cloud art: three overlapping white discs on transparent ground.
fn build_cloud_pixels(width: u32, height: u32) -> Vec<u32> {
    let mut pixels = vec![0u32; (width * height) as usize];
    let discs = [
        (width as i32 / 3, height as i32 * 2 / 3, height as i32 / 3),
        (width as i32 / 2, height as i32 / 2, height as i32 * 2 / 5),
        (width as i32 * 2 / 3, height as i32 * 2 / 3, height as i32 / 3),
    ];
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let covered = discs.iter().any(|&(cx, cy, r)| {
                let (dx, dy) = (x - cx, y - cy);
                dx * dx + dy * dy <= r * r
            });
            if covered {
                pixels[(y as u32 * width + x as u32) as usize] = 0xFFFF_FFFF;
            }
        }
    }
    pixels
}

fn parse_args<I>(args: I) -> Result<Config, String>
where
    I: IntoIterator<Item = String>,
{
    let mut cfg = Config::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--out" => cfg.out_dir = PathBuf::from(next_value("--out", &mut it)?),
            "--frames" => cfg.frames = parse_num(next_value("--frames", &mut it)?, "--frames")?,
            "--duration" => {
                cfg.duration_ms = parse_num(next_value("--duration", &mut it)?, "--duration")?
            }
            "--density" => cfg.density = parse_num(next_value("--density", &mut it)?, "--density")?,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => return Err(format!("unknown arg: {arg}")),
        }
    }
    Ok(cfg)
}

fn next_value<I>(flag: &str, it: &mut I) -> Result<String, String>
where
    I: Iterator<Item = String>,
{
    it.next()
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn parse_num<T>(raw: String, name: &str) -> Result<T, String>
where
    T: core::str::FromStr,
{
    raw.parse::<T>()
        .map_err(|_| format!("invalid numeric value for {name}: {raw}"))
}

fn print_help() {
    let exe = env::args()
        .next()
        .and_then(|p| {
            Path::new(&p)
                .file_name()
                .and_then(|n| n.to_str())
                .map(|s| s.to_owned())
        })
        .unwrap_or_else(|| "switch_preview".to_owned());
    println!("Usage: {exe} [--out DIR] [--frames N] [--duration MS] [--density F]");
}
