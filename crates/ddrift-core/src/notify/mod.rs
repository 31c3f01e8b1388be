//! Command-pipe notifier
//!
//! Pipes the escalation message into a system mail command, matching the
//! classic `echo "..." | mail -s "DDNS Error" ops@example.com` escalation
//! channel. The command is configurable so deployments can substitute
//! `mailx`, `sendmail` wrappers, or a test stub.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::Error;
use crate::traits::Notifier;

/// Subject line attached to every escalation message
const NOTIFY_SUBJECT: &str = "DDNS Error";

/// Notifier that pipes the message to a mail command's stdin
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    command: String,
}

impl CommandNotifier {
    /// Create a notifier around the given mail command
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for CommandNotifier {
    async fn send(&self, message: &str, destination: &str) -> Result<(), Error> {
        debug!("delivering notification to {} via {}", destination, self.command);

        let mut child = Command::new(&self.command)
            .arg("-s")
            .arg(NOTIFY_SUBJECT)
            .arg(destination)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                Error::delivery(format!("failed to spawn {}: {}", self.command, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(message.as_bytes())
                .await
                .map_err(|e| Error::delivery(format!("failed to write message: {}", e)))?;
            // Close stdin so the command sees EOF and can deliver.
            drop(stdin);
        }

        let status = child
            .wait()
            .await
            .map_err(|e| Error::delivery(format!("failed to wait for {}: {}", self.command, e)))?;

        if !status.success() {
            return Err(Error::delivery(format!(
                "{} exited with {}",
                self.command, status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write an executable stub that records its arguments and stdin
    #[cfg(unix)]
    fn stub_mail_command(dir: &tempfile::TempDir) -> String {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.path().join("fakemail");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             out=\"$(dirname \"$0\")\"\n\
             printf '%s\\n' \"$@\" > \"$out/args.txt\"\n\
             cat > \"$out/message.txt\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script.to_str().unwrap().to_string()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn message_and_arguments_reach_the_command() {
        let dir = tempfile::TempDir::new().unwrap();
        let notifier = CommandNotifier::new(stub_mail_command(&dir));

        notifier
            .send("new IP is 203.0.113.9", "ops@example.com")
            .await
            .unwrap();

        let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
        assert_eq!(args, "-s\nDDNS Error\nops@example.com\n");

        let message = std::fs::read_to_string(dir.path().join("message.txt")).unwrap();
        assert_eq!(message, "new IP is 203.0.113.9");
    }

    #[tokio::test]
    async fn missing_command_is_a_delivery_error() {
        let notifier = CommandNotifier::new("ddrift-no-such-command");
        let err = notifier
            .send("test message", "ops@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Delivery(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_is_a_delivery_error() {
        let notifier = CommandNotifier::new("false");
        let err = notifier
            .send("test message", "ops@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Delivery(_)));
    }
}
