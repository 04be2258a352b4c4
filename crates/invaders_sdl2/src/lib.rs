use std::time::{Duration, Instant};

use anyhow::{Error, Result};
use log::{debug, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use typed_builder::TypedBuilder;

use invaders_common::app::App;
use invaders_common::key::Key;
pub use sdl2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    RGB24,
}

#[derive(TypedBuilder)]
pub struct SdlInitInfo {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub title: String,
    #[builder(default = PixelFormat::RGB24)]
    pub pixel_format: PixelFormat,
}

pub struct SdlContext;

impl SdlContext {
    /// Open the window and drive `app` until it asks to exit or the window
    /// is closed and the app agrees to go.
    pub fn run(sdl_init_info: SdlInitInfo, mut app: impl App) -> Result<()> {
        let SdlInitInfo {
            width,
            height,
            scale,
            title,
            pixel_format,
        } = sdl_init_info;
        let sdl_context = sdl2::init().map_err(Error::msg)?;
        let video_subsystem = sdl_context.video().map_err(Error::msg)?;
        let window = video_subsystem
            .window(&title, width * scale, height * scale)
            .position_centered()
            .build()?;
        info!("Window {}x{} at scale {}", width, height, scale);
        let mut canvas = window.into_canvas().present_vsync().build()?;
        info!("Renderer {}", canvas.info().name);
        canvas
            .set_scale(scale as f32, scale as f32)
            .map_err(Error::msg)?;
        let creator = canvas.texture_creator();
        let mut texture =
            creator.create_texture_target(map_pixel_format(pixel_format), width, height)?;
        let mut event_pump = sdl_context.event_pump().map_err(Error::msg)?;

        let color_size = map_pixel_format_size(pixel_format);
        let mut screen_state = vec![0u8; (width * color_size * height) as usize];
        app.init()?;

        let mut frame_rate = 0;
        let mut last_frame = Instant::now();
        loop {
            if app.should_exit() {
                app.exit();
                break;
            }

            for event in event_pump.poll_iter() {
                match event {
                    Event::Quit { .. } => app.handle_quit(),
                    Event::KeyDown {
                        keycode: Some(keycode),
                        repeat: false,
                        ..
                    } => app.handle_key_event(map_keycode(keycode), true),
                    Event::KeyUp {
                        keycode: Some(keycode),
                        ..
                    } => app.handle_key_event(map_keycode(keycode), false),
                    _ => {}
                }
            }

            app.update(&mut screen_state);

            texture.update(None, &screen_state, (width * color_size) as usize)?;
            canvas.copy(&texture, None, None).map_err(Error::msg)?;
            canvas.present();

            // Scenes may pick their own rate, so it's read every frame.
            if app.frame_rate() != frame_rate {
                frame_rate = app.frame_rate();
                debug!("Frame budget {:?} ({} Hz)", frame_budget(frame_rate), frame_rate);
            }
            let target_frame = frame_budget(frame_rate);
            let elapsed = last_frame.elapsed();
            if elapsed < target_frame {
                std::thread::sleep(target_frame - elapsed);
            }
            last_frame = Instant::now();
        }

        Ok(())
    }
}

/// Time one frame may take at `frame_rate` Hz. Zero is treated as one.
pub fn frame_budget(frame_rate: u32) -> Duration {
    Duration::from_secs(1) / frame_rate.max(1)
}

pub fn map_pixel_format(pixel_format: PixelFormat) -> PixelFormatEnum {
    match pixel_format {
        PixelFormat::RGB24 => PixelFormatEnum::RGB24,
    }
}

pub fn map_pixel_format_size(pixel_format: PixelFormat) -> u32 {
    match pixel_format {
        PixelFormat::RGB24 => 3,
    }
}

pub fn map_keycode(keycode: Keycode) -> Key {
    match keycode {
        Keycode::A => Key::A,
        Keycode::D => Key::D,
        Keycode::S => Key::S,
        Keycode::C => Key::C,
        Keycode::Left => Key::Left,
        Keycode::Right => Key::Right,
        Keycode::Up => Key::Up,
        Keycode::Space => Key::Space,
        Keycode::Return => Key::Return,
        Keycode::Escape => Key::Escape,
        _ => Key::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_keys_are_mapped() {
        assert_eq!(map_keycode(Keycode::Left), Key::Left);
        assert_eq!(map_keycode(Keycode::Space), Key::Space);
        assert_eq!(map_keycode(Keycode::Escape), Key::Escape);
        assert_eq!(map_keycode(Keycode::Return), Key::Return);
        assert_eq!(map_keycode(Keycode::F12), Key::None);
    }

    #[test]
    fn frame_budget_follows_the_rate() {
        assert_eq!(frame_budget(60), Duration::from_secs(1) / 60);
        assert_eq!(frame_budget(30), Duration::from_secs(1) / 30);
        assert_eq!(frame_budget(0), Duration::from_secs(1));
    }

    #[test]
    fn rgb24_is_three_bytes() {
        assert_eq!(map_pixel_format_size(PixelFormat::RGB24), 3);
    }
}
