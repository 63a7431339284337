//! Audio playback through an external command-line player.
//!
//! Each clip runs as its own child process in its own process group. A
//! helper thread waits on the child and reports how it exited over a channel;
//! the viewer loop drains that channel between key presses.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::error::{Error, Result};
use crate::logging;
use crate::navigation::MediaPlayer;
use crate::settings::AUDIO_PLAYER_PRESET_LIST;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Completed,
    Failed(String),
}

pub struct CommandPlayer {
    engine: String,
    source: Option<PathBuf>,
    done_rx: Option<Receiver<std::result::Result<(), String>>>,
    kill_pid: Option<u32>,
}

impl CommandPlayer {
    /// `engine` is `"auto"` or a command line; `{}` in it is replaced by the
    /// clip path, otherwise the path is appended.
    pub fn new(engine: &str) -> Self {
        Self {
            engine: engine.to_string(),
            source: None,
            done_rx: None,
            kill_pid: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.done_rx.is_some()
    }

    /// How the running clip ended, reported once.
    pub fn poll_event(&mut self) -> Option<PlayerEvent> {
        let rx = self.done_rx.as_ref()?;
        let event = match rx.try_recv() {
            Ok(Ok(())) => PlayerEvent::Completed,
            Ok(Err(reason)) => PlayerEvent::Failed(reason),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                PlayerEvent::Failed("audio player exited without a status".to_string())
            }
        };
        self.done_rx = None;
        self.kill_pid = None;
        Some(event)
    }

    /// Stop the running clip and drop its pending completion.
    pub fn stop(&mut self) {
        if let Some(pid) = self.kill_pid.take() {
            logging::debug(format!("stopping audio player process group {pid}"));
            #[cfg(unix)]
            unsafe {
                libc::kill(-(pid as i32), libc::SIGKILL);
            }
        }
        self.done_rx = None;
    }

    /// Candidate (program, args) pairs for a clip, in the order to try them.
    pub fn commands_for(engine: &str, path: &Path) -> Vec<(String, Vec<String>)> {
        let path = path.to_string_lossy().to_string();

        if engine.is_empty() || engine == "auto" {
            return AUDIO_PLAYER_PRESET_LIST
                .iter()
                .map(|(program, args)| {
                    let mut args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                    args.push(path.clone());
                    (program.to_string(), args)
                })
                .collect();
        }

        let parts: Vec<&str> = engine.split_whitespace().collect();
        let Some((program, rest)) = parts.split_first() else {
            return Vec::new();
        };
        let mut args: Vec<String> = rest.iter().map(|part| part.replace("{}", &path)).collect();
        if !engine.contains("{}") {
            args.push(path);
        }
        vec![(program.to_string(), args)]
    }

    fn spawn(&mut self, program: &str, args: &[String]) -> io::Result<()> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Own process group so stop() also takes down anything the player forks.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            unsafe {
                cmd.pre_exec(|| {
                    libc::setsid();
                    Ok(())
                });
            }
        }

        let mut child = cmd.spawn()?;
        let pid = child.id();
        let (tx, rx) = mpsc::channel();
        let program = program.to_string();
        std::thread::spawn(move || {
            let outcome = match child.wait() {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => Err(format!("{program} exited with {status}")),
                Err(err) => Err(format!("{program} could not be waited on: {err}")),
            };
            // The receiver is gone when the clip was stopped.
            let _ = tx.send(outcome);
        });

        self.done_rx = Some(rx);
        self.kill_pid = Some(pid);
        Ok(())
    }
}

impl MediaPlayer for CommandPlayer {
    fn set_source(&mut self, path: &Path) {
        if self.source.as_deref() != Some(path) {
            self.stop();
        }
        self.source = Some(path.to_path_buf());
    }

    fn play(&mut self) -> Result<()> {
        let Some(source) = self.source.clone() else {
            return Err(Error::Playback("no audio source selected".to_string()));
        };
        self.stop();

        let mut last_error = None;
        for (program, args) in Self::commands_for(&self.engine, &source) {
            match self.spawn(&program, &args) {
                Ok(()) => {
                    logging::debug(format!("playing {} with {program}", source.display()));
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    logging::debug(format!("audio player {program} not found"));
                    last_error = Some(format!("{program} not found"));
                }
                Err(err) => {
                    last_error = Some(format!("{program}: {err}"));
                    break;
                }
            }
        }

        Err(Error::Playback(
            last_error.unwrap_or_else(|| "no audio player configured".to_string()),
        ))
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
