//! Chat notifications sent when a session ends.

use crate::{
    constants::NO_WORDS_LEARNED,
    error::{Error, Result},
    lookup::Lookups,
    session::SessionEnded,
};
use log::info;
use serde::Serialize;
use std::time::Duration;

/// Destination for chat messages
pub trait Notifier: Send {
    /// Post `text` to `chat_id`, optionally pinning it
    fn send_message(&mut self, chat_id: &str, text: &str, pin: bool) -> Result<()>;

    /// Get notifier name
    fn name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    pin: bool,
}

/// Eitaa bot API client (`{api_base}/{token}/sendMessage`)
pub struct EitaaNotifier {
    client: reqwest::blocking::Client,
    api_url: String,
}

impl EitaaNotifier {
    /// Create a notifier for the bot identified by `token`
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or the HTTP client cannot be built.
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::ConfigError("Notifier token is empty".to_string()));
        }
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: format!("{}/{token}/sendMessage", api_base.trim_end_matches('/')),
        })
    }
}

impl Notifier for EitaaNotifier {
    fn send_message(&mut self, chat_id: &str, text: &str, pin: bool) -> Result<()> {
        let request = SendMessageRequest { chat_id, text, pin };
        let response = self.client.post(&self.api_url).json(&request).send()?;
        let status = response.status();
        let body = response.text()?;

        // The bot API answers `{"ok": false, "description": ...}` on failure;
        // any other body falls back to the HTTP status
        let reply: Option<serde_json::Value> = serde_json::from_str(&body).ok();
        let field = |key: &str| reply.as_ref().and_then(|value| value.get(key));
        let ok = status.is_success() && field("ok").and_then(serde_json::Value::as_bool).unwrap_or(true);
        if ok {
            info!("Message sent to channel {chat_id}");
            Ok(())
        } else {
            let description = field("description")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_else(|| body.trim());
            Err(Error::DeliveryError(format!("Notifier returned {status}: {description}")))
        }
    }

    fn name(&self) -> &str {
        "EitaaNotifier"
    }
}

/// Human-readable end-of-class summary
#[must_use]
pub fn render_end_summary(event: &SessionEnded, lookups: &Lookups) -> String {
    let words_text = if event.learned_card_ids.is_empty() {
        NO_WORDS_LEARNED.to_string()
    } else {
        event
            .learned_card_ids
            .iter()
            .map(|&id| match lookups.word(id) {
                Some(word) => format!("- {word}"),
                None => format!("- #{id}"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "📚 کلاس تمام شد!\n\
         🕒 زمان پایان: {} {}\n\
         👩‍🏫 مربی: {}\n\
         👨‍🎓 دانش‌آموز: {}\n\
         ✅ تعداد کلمات یادگرفته شده: {}\n\
         📖 کلمات:\n{}",
        event.time.date(),
        event.time.clock(),
        lookups.person_name(event.trainer_id),
        lookups.person_name(event.student_id),
        event.count,
        words_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::jalali_timestamp;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn ended(cards: Vec<u32>) -> SessionEnded {
        SessionEnded {
            time: jalali_timestamp(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap().and_hms_opt(8, 15, 30).unwrap()),
            trainer_id: 10,
            student_id: 99,
            count: u32::try_from(cards.len()).unwrap(),
            learned_card_ids: cards,
        }
    }

    fn lookups() -> Lookups {
        Lookups::new(
            HashMap::from([(1, "apple".to_string()), (2, "book".to_string())]),
            HashMap::from([(10, "Ahmadi".to_string())]),
        )
    }

    #[test]
    fn test_summary_lists_words_in_order() {
        let text = render_end_summary(&ended(vec![2, 1]), &lookups());
        assert!(text.contains("1403-01-01 08:15:30"));
        assert!(text.contains("مربی: Ahmadi"));
        assert!(text.contains("ناشناس"));
        assert!(text.ends_with("- book\n- apple"));
    }

    #[test]
    fn test_summary_without_words() {
        let text = render_end_summary(&ended(vec![]), &lookups());
        assert!(text.ends_with(NO_WORDS_LEARNED));
        assert!(text.contains("شده: 0"));
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(EitaaNotifier::new("https://eitaayar.ir/api", "", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_unknown_card_falls_back_to_id() {
        let text = render_end_summary(&ended(vec![1, 7]), &lookups());
        assert!(text.ends_with("- apple\n- #7"));
    }

    /// Serve one HTTP exchange on a local port, answering with `response`
    fn serve_once(response: String) -> (String, std::thread::JoinHandle<String>) {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/api", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request_complete(&request) {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (base, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..header_end]);
        let length = headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + length
    }

    fn reply(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn send(response: String) -> (Result<()>, String) {
        let (base, server) = serve_once(response);
        let mut notifier = EitaaNotifier::new(&base, "bot-token", Duration::from_secs(5)).unwrap();
        let result = notifier.send_message("ArUcoGame", "سلام", true);
        (result, server.join().unwrap())
    }

    #[test]
    fn test_plain_text_success_counts_as_sent() {
        let (result, request) = send(reply("200 OK", "text/plain", "OK"));
        result.unwrap();
        assert!(request.starts_with("POST /api/bot-token/sendMessage"));
        assert!(request.contains("\"chat_id\":\"ArUcoGame\""));
        assert!(request.contains("\"pin\":true"));
    }

    #[test]
    fn test_json_ok_reply_counts_as_sent() {
        let (result, _) = send(reply("200 OK", "application/json", "{\"ok\":true}"));
        result.unwrap();
    }

    #[test]
    fn test_ok_false_reply_is_delivery_error() {
        let body = "{\"ok\":false,\"description\":\"chat not found\"}";
        match send(reply("200 OK", "application/json", body)).0 {
            Err(Error::DeliveryError(msg)) => assert!(msg.contains("chat not found")),
            other => panic!("Expected DeliveryError, got {other:?}"),
        }
    }

    #[test]
    fn test_server_error_with_plain_body_is_delivery_error() {
        match send(reply("502 Bad Gateway", "text/plain", "bad")).0 {
            Err(Error::DeliveryError(msg)) => assert!(msg.contains("502")),
            other => panic!("Expected DeliveryError, got {other:?}"),
        }
    }
}
