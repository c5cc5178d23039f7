use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;
use std::sync::mpsc as std_mpsc;
use std::thread;
use tokio::sync::mpsc;

/// What came back from one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Interrupted,
    Eof,
}

/// rustyline running on its own thread so prompts can race timers
pub struct LineReader {
    prompts: std_mpsc::Sender<String>,
    lines: mpsc::UnboundedReceiver<Result<Input, String>>,
    outstanding: bool,
}

impl LineReader {
    pub fn spawn() -> Result<Self> {
        let (prompt_tx, prompt_rx) = std_mpsc::channel::<String>();
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<(), String>>();

        thread::Builder::new()
            .name("todsim-readline".to_string())
            .spawn(move || {
                // The editor stays on this thread
                let mut rl = match DefaultEditor::new() {
                    Ok(rl) => {
                        let _ = ready_tx.send(Ok(()));
                        rl
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                for prompt in prompt_rx {
                    let input = match rl.readline(&prompt) {
                        Ok(line) => {
                            if !line.trim().is_empty() {
                                let _ = rl.add_history_entry(line.as_str());
                            }
                            Ok(Input::Line(line))
                        }
                        Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
                        Err(ReadlineError::Eof) => Ok(Input::Eof),
                        Err(e) => Err(e.to_string()),
                    };
                    if line_tx.send(input).is_err() {
                        break;
                    }
                }
            })
            .context("Failed to start input thread")?;

        ready_rx
            .recv()
            .context("Input thread has stopped")?
            .map_err(|e| anyhow::anyhow!("Failed to initialize line editor: {}", e))?;

        Ok(Self {
            prompts: prompt_tx,
            lines: line_rx,
            outstanding: false,
        })
    }

    /// Show a prompt unless one is already waiting for the user
    pub fn request(&mut self, prompt: &str) -> Result<()> {
        if self.outstanding {
            return Ok(());
        }
        self.prompts
            .send(prompt.to_string())
            .context("Input thread has stopped")?;
        self.outstanding = true;
        Ok(())
    }

    /// Wait for the answer to the current prompt; cancel-safe
    pub async fn next(&mut self) -> Result<Input> {
        let input = self
            .lines
            .recv()
            .await
            .context("Input thread has stopped")?;
        self.outstanding = false;
        input.map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))
    }

    /// Prompt and wait; reuses a prompt that is still on screen
    pub async fn read(&mut self, prompt: &str) -> Result<Input> {
        if self.outstanding {
            print!("{}", prompt);
            let _ = std::io::stdout().flush();
        }
        self.request(prompt)?;
        self.next().await
    }
}
