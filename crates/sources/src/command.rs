//! Sources backed by an external command (e.g. the `bird` CLI for Twitter).
//!
//! The command's stdout is read line by line; each non-empty line becomes
//! one descriptor. The process is killed when it outlives the timeout.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use ideapool_core::Descriptor;

use crate::error::SourceError;
use crate::source::Source;

const MAX_LINES: usize = 10;
const MAX_TITLE_CHARS: usize = 100;
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct CommandSource {
    id: String,
    argv: Vec<String>,
    timeout: Duration,
    link: String,
    tags: Vec<String>,
}

impl CommandSource {
    pub fn new(id: &str, argv: &[String], timeout_secs: u64) -> Self {
        CommandSource {
            id: id.to_string(),
            argv: argv.to_vec(),
            timeout: Duration::from_secs(timeout_secs),
            link: String::new(),
            tags: Vec::new(),
        }
    }

    /// The Twitter feed via `bird search`.
    pub fn twitter(argv: &[String], timeout_secs: u64) -> Self {
        let mut source = CommandSource::new("twitter", argv, timeout_secs);
        source.link = "https://twitter.com/search?q=AI".to_string();
        source.tags = vec!["AI".to_string(), "Twitter".to_string()];
        source
    }

    /// Run the command, returning its stdout.
    fn run(&self) -> Result<String, SourceError> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| SourceError::command(&self.id, "no command configured"))?;

        tracing::debug!(source = %self.id, program = %program, "running command");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SourceError::command(&self.id, format!("cannot run '{}': {}", program, e)))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::command(&self.id, "stdout was not captured"))?;
        let reader = thread::spawn(move || {
            let mut out = String::new();
            stdout.read_to_string(&mut out).map(|_| out)
        });

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if started.elapsed() >= self.timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    // A grandchild may still hold the pipe open; leave the
                    // reader detached instead of joining it.
                    drop(reader);
                    return Err(SourceError::Timeout {
                        source_id: self.id.clone(),
                        secs: self.timeout.as_secs(),
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(SourceError::command(&self.id, e.to_string())),
            }
        };

        let output = reader
            .join()
            .map_err(|_| SourceError::command(&self.id, "stdout reader panicked"))?
            .map_err(|e| SourceError::command(&self.id, format!("reading stdout: {}", e)))?;

        if !status.success() {
            return Err(SourceError::command(&self.id, format!("exited with {}", status)));
        }
        Ok(output)
    }

    /// First 10 non-empty lines as descriptors.
    pub fn parse_output(&self, stdout: &str) -> Vec<Descriptor> {
        stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(MAX_LINES)
            .map(|line| {
                let title: String = line.chars().take(MAX_TITLE_CHARS).collect();
                Descriptor::new(&self.id, &title, line)
                    .with_url(&self.link)
                    .with_tags(self.tags.iter().cloned())
            })
            .collect()
    }
}

impl Source for CommandSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn fetch(&self) -> Result<Vec<Descriptor>, SourceError> {
        let stdout = self.run()?;
        Ok(self.parse_output(&stdout))
    }
}
