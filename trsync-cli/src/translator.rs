//! Machine translation through an external command.
//!
//! The command receives one JSON request on stdin,
//! `{"source": "en", "target": "fr", "texts": ["Hello", "World"]}`,
//! and must print a JSON object mapping each input text to its translation.
//! Texts it cannot translate may be omitted.

use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, Stdio};

use serde::Serialize;
use tracing::debug;
use trsync::{Error, Translator};

#[derive(Debug, Serialize)]
struct TranslationRequest<'a> {
    source: &'a str,
    target: &'a str,
    texts: &'a [String],
}

/// Runs `program args...` once per batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTranslator {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandTranslator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Translator for CommandTranslator {
    fn translate(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Result<HashMap<String, String>, Error> {
        let request = serde_json::to_vec(&TranslationRequest {
            source,
            target,
            texts,
        })
        .map_err(|e| Error::translation_error("failed to encode request", Some(Box::new(e))))?;

        debug!(program = %self.program, texts = texts.len(), "spawning translator");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::translation_error(
                    format!("failed to start `{}`", self.program),
                    Some(Box::new(e)),
                )
            })?;

        // stdin is fed from its own thread while stdout and stderr are drained
        let stdin = child.stdin.take();
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(&request),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (writer.join(), output)
        });

        let output = output?;
        if !output.status.success() {
            return Err(Error::translation_error(
                format!(
                    "`{}` exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
                None,
            ));
        }

        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(Error::translation_error(
                    "failed to send request",
                    Some(Box::new(e)),
                ));
            }
            Err(_) => return Err(Error::translation_error("request writer panicked", None)),
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            Error::translation_error("translator returned invalid JSON", Some(Box::new(e)))
        })
    }
}
