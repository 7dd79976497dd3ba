//! HTTP plumbing between the client and a bridge.

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// The three calls the bridge API needs.
///
/// Each takes a full URL and returns the raw reply body. Implementations fail
/// with a network-class [`Error`] on transport failure or a non-2xx status.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;

    fn put(&self, url: &str, body: Vec<u8>) -> impl Future<Output = Result<Vec<u8>>> + Send;

    fn post(&self, url: &str, body: Vec<u8>) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// [`Transport`] over real HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::http("<client>", e))?;
        Ok(HttpTransport { client })
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<Vec<u8>> {
        let response = request.send().await.map_err(|e| Error::http(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| Error::http(url, e))?;
        debug!("HTTP {} <{}> {} bytes", status, url, body.len());
        Ok(body.to_vec())
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET <{}>", url);
        self.send(self.client.get(url), url).await
    }

    async fn put(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        debug!("PUT <{}> {}", url, String::from_utf8_lossy(&body));
        let request = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request, url).await
    }

    async fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        debug!("POST <{}> {}", url, String::from_utf8_lossy(&body));
        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request, url).await
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! In-memory transport serving canned replies.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::{Result, Transport};
    use crate::errors::Error;

    /// Three lamps and a plug, deliberately out of id order.
    pub(crate) const LIGHTS: &str = r#"{
        "3": {"state": {"on": true, "bri": 254, "hue": 14956, "sat": 140, "effect": "none",
                        "xy": [0.4571, 0.4097], "ct": 366, "alert": "select",
                        "colormode": "ct", "reachable": true},
              "type": "Extended color light", "name": "kitchen", "modelid": "LCT007"},
        "1": {"state": {"on": true, "bri": 254, "hue": 34076, "sat": 251, "effect": "none",
                        "xy": [0.3144, 0.3301], "ct": 153, "alert": "select",
                        "colormode": "xy", "reachable": true},
              "type": "Extended color light", "name": "living room", "modelid": "LCT007"},
        "4": {"state": {"on": false, "bri": 254, "alert": "none", "reachable": true},
              "type": "Dimmable light", "name": "bedroom", "modelid": "LWB010"},
        "7": {"state": {"on": false, "alert": "none", "mode": "homeautomation", "reachable": true},
              "type": "On/Off plug-in unit", "name": "fan plug", "modelid": "LOM001"}
    }"#;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Request {
        pub method: &'static str,
        pub url: String,
        pub body: Option<serde_json::Value>,
    }

    /// Replies are keyed by `"METHOD url"`; unknown keys answer 404.
    #[derive(Default)]
    pub(crate) struct FixtureTransport {
        replies: HashMap<String, String>,
        requests: Mutex<Vec<Request>>,
    }

    impl FixtureTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(mut self, method: &str, url: &str, body: &str) -> Self {
            self.replies
                .insert(format!("{method} {url}"), body.to_string());
            self
        }

        pub fn requests(&self) -> Vec<Request> {
            self.requests.lock().unwrap().clone()
        }

        fn answer(&self, method: &'static str, url: &str, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
            let body = body.map(|b| serde_json::from_slice(&b).unwrap());
            self.requests.lock().unwrap().push(Request {
                method,
                url: url.to_string(),
                body,
            });
            self.replies
                .get(&format!("{method} {url}"))
                .map(|reply| reply.as_bytes().to_vec())
                .ok_or_else(|| Error::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    impl Transport for FixtureTransport {
        async fn get(&self, url: &str) -> Result<Vec<u8>> {
            self.answer("GET", url, None)
        }

        async fn put(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
            self.answer("PUT", url, Some(body))
        }

        async fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
            self.answer("POST", url, Some(body))
        }
    }
}
