use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, Cursor};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread;

use anyhow::{anyhow, Context, Result};
use log::{debug, error, warn};
use rodio::{Decoder, OutputStream, Sink};

use crate::audio::{AudioSink, Channel, SoundId};

/// Message sent from the game thread to the audio thread.
#[derive(Clone, Copy, Debug)]
enum Command {
    Play(SoundId),
    Stop(Channel),
}

struct SoundThread {
    receiver: Receiver<Command>,
    samples: HashMap<SoundId, Vec<u8>>,
}

impl SoundThread {
    fn new(receiver: Receiver<Command>) -> Self {
        let mut samples = HashMap::new();
        for sound in SoundId::ALL {
            match fs::read(sound.file()) {
                Ok(bytes) => {
                    samples.insert(sound, bytes);
                }
                Err(e) => {
                    warn!("Failed to load sound {:?} from {}: {e}", sound, sound.file());
                }
            }
        }
        if samples.is_empty() {
            warn!("No sound files could be loaded, the game will be silent");
        }
        Self { receiver, samples }
    }

    fn run(self, ready: SyncSender<Result<(), String>>) {
        // The stream has to live on this thread for as long as we play.
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };
        let _ = ready.send(Ok(()));

        let mut sinks: HashMap<Channel, Sink> = HashMap::new();
        while let Ok(command) = self.receiver.recv() {
            match command {
                Command::Play(sound) => {
                    let Some(bytes) = self.samples.get(&sound) else {
                        continue;
                    };
                    let source = match Decoder::new(BufReader::new(Cursor::new(bytes.clone()))) {
                        Ok(source) => source,
                        Err(e) => {
                            error!("Failed to decode sound {:?}: {e}", sound);
                            continue;
                        }
                    };
                    let sink = match Sink::try_new(&handle) {
                        Ok(sink) => sink,
                        Err(e) => {
                            error!("Failed to create audio sink: {e}");
                            continue;
                        }
                    };
                    sink.append(source);
                    if let Some(previous) = sinks.insert(sound.channel(), sink) {
                        previous.stop();
                    }
                }
                Command::Stop(channel) => {
                    if let Some(sink) = sinks.remove(&channel) {
                        sink.stop();
                    }
                }
            }
        }
        debug!("Audio channel closed, sound thread exiting");
    }
}

/// Handle to the rodio audio thread.
///
/// Each channel owns at most one sink; playing on a channel replaces (and
/// silences) its previous sink. Dropping every clone of the manager closes
/// the command channel and lets the thread wind down.
#[derive(Clone)]
pub struct SoundManager {
    sender: Sender<Command>,
}

impl SoundManager {
    /// Start the audio thread and wait until it has opened the output device.
    ///
    /// Failing to open the device is an error; missing sample files are only
    /// logged.
    pub fn new() -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<Command>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let sound_thread = SoundThread::new(receiver);

        thread::Builder::new()
            .name("invaders_sound".into())
            .spawn(move || sound_thread.run(ready_tx))
            .context("failed to spawn the audio thread")?;

        ready_rx
            .recv()
            .context("audio thread exited during start-up")?
            .map_err(|e| anyhow!("failed to open the default audio output: {e}"))?;

        Ok(Self { sender })
    }
}

impl AudioSink for SoundManager {
    fn play(&mut self, sound: SoundId) {
        // If the audio thread has gone away we simply stop making noise.
        let _ = self.sender.send(Command::Play(sound));
    }

    fn stop(&mut self, channel: Channel) {
        let _ = self.sender.send(Command::Stop(channel));
    }
}
