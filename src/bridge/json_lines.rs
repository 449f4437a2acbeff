use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::event::{EventListener, SmsEvent};

/// Writes each event payload as one JSON document per line.
///
/// The write happens inside `emit`, so every delivered event reaches the
/// writer before the broadcast callback returns.
pub struct JsonLinesListener<W> {
    writer: Mutex<W>,
    pretty: bool,
}

impl JsonLinesListener<Stdout> {
    pub fn stdout(pretty: bool) -> Self {
        Self::new(io::stdout(), pretty)
    }
}

impl<W: Write + Send> JsonLinesListener<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> EventListener for JsonLinesListener<W> {
    fn emit(&self, event_name: &str, event: &SmsEvent) {
        let line = if self.pretty {
            serde_json::to_string_pretty(event)
        } else {
            serde_json::to_string(event)
        };
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to serialize {}: {}", event_name, e);
                return;
            }
        };

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        match writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            Ok(()) => debug!(name = event_name, "Event written"),
            Err(e) => warn!("Failed to write {}: {}", event_name, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SMS_RECEIVED;

    fn event(body: &str) -> SmsEvent {
        SmsEvent {
            body: body.to_string(),
            address: "+15551234567".to_string(),
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_one_line_per_event() {
        let listener = JsonLinesListener::new(Vec::new(), false);
        listener.emit(SMS_RECEIVED, &event("one"));
        listener.emit(SMS_RECEIVED, &event("two"));

        let output = String::from_utf8(listener.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"body":"one","address":"+15551234567","timestamp":1700000000000}"#
        );
        let second: SmsEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second, event("two"));
    }

    #[test]
    fn test_pretty_output_parses_back() {
        let listener = JsonLinesListener::new(Vec::new(), true);
        listener.emit(SMS_RECEIVED, &event("hi"));

        let output = String::from_utf8(listener.into_inner()).unwrap();
        assert!(output.lines().count() > 1);
        let parsed: SmsEvent = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, event("hi"));
    }
}
