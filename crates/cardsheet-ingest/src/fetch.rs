//! Remote fetch of a sheet export and line-oriented access to its body.

use std::fmt;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// The only media type accepted from the export endpoint.
pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// User agent string for export requests.
const USER_AGENT_VALUE: &str = concat!("cardsheet/", env!("CARGO_PKG_VERSION"));

/// Source of sheet bodies. The pipeline only talks to the network through this.
pub trait SheetFetcher {
    /// Fetch `url` and validate that the response is CSV.
    fn fetch(&self, url: &str) -> Result<SheetBody>;
}

impl<F: SheetFetcher + ?Sized> SheetFetcher for &F {
    fn fetch(&self, url: &str) -> Result<SheetBody> {
        (**self).fetch(url)
    }
}

/// One decoded line of the fetched body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 0-based position of the line in the body.
    pub ordinal: usize,
    pub text: String,
}

/// A validated response body, readable once, front to back.
pub struct SheetBody {
    url: String,
    reader: Box<dyn BufRead + Send>,
}

impl SheetBody {
    pub fn from_reader<R>(url: impl Into<String>, reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            url: url.into(),
            reader: Box::new(BufReader::new(reader)),
        }
    }

    pub fn from_text(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from_reader(url, Cursor::new(text.into().into_bytes()))
    }

    /// Lazily split the body into lines.
    pub fn lines(self) -> Lines {
        Lines {
            url: self.url,
            reader: self.reader,
            ordinal: 0,
            done: false,
        }
    }
}

impl fmt::Debug for SheetBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetBody").field("url", &self.url).finish()
    }
}

/// Forward-only iterator over the lines of a [`SheetBody`].
///
/// Line terminators (`\n` or `\r\n`) are stripped and invalid UTF-8 is
/// replaced. A read failure is yielded once and ends the iteration.
pub struct Lines {
    url: String,
    reader: Box<dyn BufRead + Send>,
    ordinal: usize,
    done: bool,
}

impl Iterator for Lines {
    type Item = Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                let mut text = String::from_utf8_lossy(&buf).into_owned();
                if self.ordinal == 0 && text.starts_with('\u{feff}') {
                    text.remove(0);
                }
                let line = RawLine {
                    ordinal: self.ordinal,
                    text,
                };
                self.ordinal += 1;
                Some(Ok(line))
            }
            Err(error) => {
                self.done = true;
                Some(Err(IngestError::network(&self.url, error)))
            }
        }
    }
}

/// Reject anything whose media type is not `text/csv`.
///
/// Parameters such as `charset` are ignored.
pub fn check_content_type(url: &str, observed: Option<&str>) -> Result<()> {
    let is_csv = observed
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(CSV_MEDIA_TYPE));
    if is_csv {
        Ok(())
    } else {
        Err(IngestError::UnexpectedContentType {
            url: url.to_string(),
            observed: observed.map(str::to_string),
        })
    }
}

/// Blocking HTTP fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Client with the transport's default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Client with an explicit overall request timeout.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT_VALUE);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| IngestError::network("<client>", e))?;
        Ok(Self { client })
    }
}

impl SheetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<SheetBody> {
        info!(url, "fetching sheet export");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| IngestError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::network(url, format!("HTTP status {status}")));
        }

        let observed = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        check_content_type(url, observed.as_deref())?;
        debug!(url, content_type = ?observed, "response accepted");

        Ok(SheetBody::from_reader(url, response))
    }
}
