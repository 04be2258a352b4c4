use anyhow::Result;

use crate::key::Key;

/// A program the frontend can drive one frame at a time.
///
/// The frontend owns the window and the RGB24 framebuffer; the app only
/// reacts to keys and paints into `screen` once per frame.
pub trait App {
    /// Called once before the first frame. Errors here are fatal.
    fn init(&mut self) -> Result<()>;
    fn update(&mut self, screen: &mut [u8]);
    fn handle_key_event(&mut self, key: Key, is_down: bool);
    /// The window was closed.
    fn handle_quit(&mut self);
    fn should_exit(&self) -> bool;
    fn exit(&mut self);

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn scale(&self) -> u32;
    fn title(&self) -> String;
    /// Frames per second the app wants to be ticked at.
    fn frame_rate(&self) -> u32 {
        60
    }
}
