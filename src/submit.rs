//! Submits scanned completions to the achievement tracking site.
//!
//! Titles from the results file are mapped back to site ids and each id is
//! marked done with one POST request, authenticated with the operator's
//! browser cookies.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use serde::Serialize;
use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use crate::config::SubmissionConfig;
use crate::matching::AchievementTable;

/// Splits a `name=value; name2=value2` cookie string into pairs.
/// Values may contain `=`; entries without one are skipped.
pub fn parse_cookies(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            match part.split_once('=') {
                Some((name, value)) => Some((name.trim().to_string(), value.trim().to_string())),
                None => {
                    tracing::warn!("Ignoring malformed cookie: {}", part);
                    None
                }
            }
        })
        .collect()
}

fn cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Ids to submit for every completed title, plus the titles the table
/// does not know.
pub fn collect_ids(
    achievements: &BTreeMap<String, bool>,
    table: &AchievementTable,
) -> (Vec<u64>, Vec<String>) {
    let mut ids = Vec::new();
    let mut skipped = Vec::new();

    for (title, _) in achievements.iter().filter(|(_, done)| **done) {
        match table.ids(title) {
            Some(found) if !found.is_empty() => ids.extend_from_slice(found),
            _ => {
                tracing::warn!("Skipping {} (not in database)", title);
                skipped.push(title.clone());
            }
        }
    }

    (ids, skipped)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest {
    achievement_id: u64,
    done: bool,
}

pub struct Submitter {
    client: Client,
    endpoint: String,
    cookie: String,
    delay: Duration,
}

impl Submitter {
    pub fn new(config: &SubmissionConfig, cookies: &[(String, String)]) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            cookie: cookie_header(cookies),
            delay: Duration::from_millis(config.delay_ms),
        })
    }

    /// Marks one id as done. Any non-success status is an error.
    pub fn submit(&self, id: u64) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .header(COOKIE, &self.cookie)
            .json(&UpdateRequest {
                achievement_id: id,
                done: true,
            })
            .send()
            .with_context(|| format!("Request for achievement {} failed", id))?
            .error_for_status()
            .with_context(|| format!("Server rejected achievement {}", id))?;
        Ok(())
    }

    /// Submits every id in order, stopping at the first failure.
    pub fn submit_all(&self, ids: &[u64]) -> Result<()> {
        let total = ids.len();
        for (i, &id) in ids.iter().enumerate() {
            self.submit(id)?;
            tracing::info!("[{}/{}] Submitted achievement {}", i + 1, total, id);
            if i + 1 < total {
                thread::sleep(self.delay);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::database::AchievementFile;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;

    fn table() -> AchievementTable {
        let file: AchievementFile = serde_json::from_str(
            r#"{
                "2": { "name": "Adventurer" },
                "1": { "name": "Adventurer" },
                "5": { "name": "Meet the Ancients" }
            }"#,
        )
        .unwrap();
        AchievementTable::from_file(file)
    }

    #[test]
    fn test_parse_cookies() {
        let cookies = parse_cookies(" session=abc; token=x=y ;broken; ");
        assert_eq!(
            cookies,
            [
                ("session".to_string(), "abc".to_string()),
                ("token".to_string(), "x=y".to_string())
            ]
        );
        assert_eq!(cookie_header(&cookies), "session=abc; token=x=y");
    }

    #[test]
    fn test_collect_ids_for_shared_title() {
        let achievements = BTreeMap::from([("Adventurer".to_string(), true)]);
        let (ids, skipped) = collect_ids(&achievements, &table());
        assert_eq!(ids, [1, 2]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_collect_ids_skips_unknown_and_incomplete() {
        let achievements = BTreeMap::from([
            ("Adventurer".to_string(), true),
            ("Meet the Ancients".to_string(), false),
            ("Not A Real Title".to_string(), true),
        ]);
        let (ids, skipped) = collect_ids(&achievements, &table());
        assert_eq!(ids, [1, 2]);
        assert_eq!(skipped, ["Not A Real Title"]);
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(UpdateRequest {
            achievement_id: 84517,
            done: true,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "achievementId": 84517, "done": true }));
    }

    #[test]
    fn test_submit_nothing() {
        let submitter = Submitter::new(&SubmissionConfig::default(), &[]).unwrap();
        assert!(submitter.submit_all(&[]).is_ok());
    }

    #[test]
    fn test_unreachable_endpoint_aborts() {
        let config = SubmissionConfig {
            endpoint: "http://127.0.0.1:9/api/achievements/update".to_string(),
            delay_ms: 0,
            timeout_secs: 5,
        };
        let submitter = Submitter::new(&config, &[]).unwrap();
        assert!(submitter.submit_all(&[1, 2]).is_err());
    }

    /// Reads one HTTP request: headers plus a Content-Length body.
    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    /// Answers every request with `status` and passes the raw requests back.
    fn serve(status: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!(
            "http://{}/api/achievements/update",
            listener.local_addr().unwrap()
        );
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let mut stream = stream.unwrap();
                let request = read_request(&mut stream);
                tx.send(request).unwrap();
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
        });
        (endpoint, rx)
    }

    fn local_config(endpoint: String) -> SubmissionConfig {
        SubmissionConfig {
            endpoint,
            delay_ms: 0,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_rejected_request_aborts() {
        let (endpoint, requests) = serve("403 Forbidden");
        let cookies = parse_cookies("session=abc");
        let submitter = Submitter::new(&local_config(endpoint), &cookies).unwrap();

        let err = submitter.submit_all(&[1, 2, 3]).unwrap_err();
        assert!(err.to_string().contains("achievement 1"), "{err}");

        let received: Vec<String> = requests.try_iter().collect();
        assert_eq!(received.len(), 1);
        let request = received[0].to_lowercase();
        assert!(request.starts_with("post /api/achievements/update"));
        assert!(request.contains("cookie: session=abc"));
        assert!(request.contains(r#""achievementid":1"#));
    }

    #[test]
    fn test_accepted_requests_in_order() {
        let (endpoint, requests) = serve("200 OK");
        let submitter = Submitter::new(&local_config(endpoint), &[]).unwrap();

        submitter.submit_all(&[7, 3]).unwrap();

        let received: Vec<String> = requests.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert!(received[0].contains(r#""achievementId":7"#));
        assert!(received[1].contains(r#""achievementId":3"#));
    }
}
