//! Binary entry point: an animated interference pattern driving the
//! full per-frame protocol.

use vistream::capture;
use vistream::config::Config;
use vistream::keys::KeyMask;
use vistream::viewer::Viewer;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--print-config") {
        let config = Config::default();
        match toml::to_string_pretty(&config) {
            Ok(s) => print!("{s}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("vistream {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("vistream {}", env!("CARGO_PKG_VERSION"));
        println!("A live visualization window for streaming pixel buffers\n");
        println!("USAGE:");
        println!("    vistream [OPTIONS]\n");
        println!("OPTIONS:");
        println!("    --print-config    Print the default configuration to stdout");
        println!("    --version, -V     Print version information");
        println!("    --help, -h        Print this help message\n");
        println!("KEYS:");
        println!("    W/A/S/D           Pan the pattern");
        println!("    = / -             Zoom in / out");
        return;
    }

    env_logger::init();

    let config = Config::default();
    let mut viewer = match Viewer::new(&config.window) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let width = config.window.width;
    let height = config.window.height;
    let mut pixels = vec![0u8; width as usize * height as usize * 4];
    let mut pattern = Pattern::default();
    let started = std::time::Instant::now();

    while viewer.is_open() {
        pattern.fill(&mut pixels, width, height, started.elapsed().as_secs_f32());

        let Some(mut frame) = viewer.begin_frame() else {
            continue;
        };
        frame.upload(width, height, &pixels);
        let mut frame = frame.render_scene();

        let mut save = false;
        frame.overlay(|panels| {
            panels.panel("pattern", |ui| {
                ui.float_input("scale", &mut pattern.scale);
                ui.float2_display("center", pattern.center);
                if ui.button("save frame") {
                    save = true;
                }
            });
        });

        let keys = frame.poll_keys();
        frame.finish();

        pattern.steer(keys);
        if save {
            let path = &config.capture.path;
            match capture::save_rgba(path, width, height, &pixels, config.capture.flip_vertical) {
                Ok(()) => log::info!("saved {}", path.display()),
                Err(e) => log::warn!("capture failed: {e}"),
            }
        }
    }
}

/// Animated interference pattern with a steerable center and zoom.
struct Pattern {
    center: [f32; 2],
    scale: f32,
}

impl Default for Pattern {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            scale: 1.0,
        }
    }
}

impl Pattern {
    /// One key edge nudges the view by a tenth of the visible span.
    fn steer(&mut self, keys: KeyMask) {
        let step = 0.1 * self.scale;
        if keys.contains(KeyMask::FORWARD) {
            self.center[1] -= step;
        }
        if keys.contains(KeyMask::BACK) {
            self.center[1] += step;
        }
        if keys.contains(KeyMask::LEFT) {
            self.center[0] -= step;
        }
        if keys.contains(KeyMask::RIGHT) {
            self.center[0] += step;
        }
        if keys.contains(KeyMask::INCREASE) {
            self.scale *= 0.5;
        }
        if keys.contains(KeyMask::DECREASE) {
            self.scale *= 2.0;
        }
    }

    fn fill(&self, pixels: &mut [u8], width: u32, height: u32, t: f32) {
        let (w, h) = (width as f32, height as f32);
        for y in 0..height {
            for x in 0..width {
                let u = (x as f32 / w - 0.5) * self.scale * 4.0 + self.center[0];
                let v = (y as f32 / h - 0.5) * self.scale * 4.0 + self.center[1];
                let wave = (u * 3.0 + t).sin()
                    + (v * 3.0).cos()
                    + ((u * u + v * v).sqrt() * 5.0 - t * 2.0).sin();

                let i = ((y * width + x) * 4) as usize;
                pixels[i] = channel(wave, 0.0);
                pixels[i + 1] = channel(wave, 2.0);
                pixels[i + 2] = channel(wave, 4.0);
                pixels[i + 3] = 255;
            }
        }
    }
}

fn channel(wave: f32, phase: f32) -> u8 {
    (((wave + phase).sin() * 0.5 + 0.5) * 255.0) as u8
}
