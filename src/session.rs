//! Transport seam between the client and the network.
//!
//! A [`Transport`] opens one [`Session`] per operation. The session lives as long as the
//! operation that opened it and is dropped on every exit path. [`HttpTransport`] is the
//! `reqwest` backed default; tests and callers with special needs can plug in their own.

use async_trait::async_trait;
use core::task::Poll;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::{
    cmp, fmt, io,
    sync::{Arc, Mutex},
};
use tracing::debug;

use crate::{config::Config, error::Result};

pub use reqwest::Method;

/// Called with `(file name, bytes sent, total bytes)` while a file body is streamed.
pub type ProgressListener = Arc<Mutex<dyn FnMut(Arc<String>, usize, usize) + Send + Sync + 'static>>;

const CHUNK_SIZE: usize = 1024 * 32;

/// One HTTP call, described independently of the transport carrying it.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Body,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Request {
            method,
            url: url.into(),
            query: vec![],
            body: Body::Empty,
        }
    }

    pub fn query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }
}

#[derive(Debug)]
pub enum Body {
    Empty,
    /// `application/x-www-form-urlencoded`
    Form(Vec<(&'static str, String)>),
    /// `multipart/form-data` with text fields followed by the file part.
    Multipart {
        fields: Vec<(&'static str, String)>,
        file: FilePart,
    },
}

/// The `file` part of an upload.
pub struct FilePart {
    pub name: String,
    pub content: Arc<Vec<u8>>,
    pub progress_listener: Option<ProgressListener>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .field("progress_listener", &self.progress_listener.is_some())
            .finish()
    }
}

impl FilePart {
    fn into_part(self) -> Part {
        let len = self.content.len() as u64;
        let part = match self.progress_listener {
            Some(listener) => Part::stream_with_length(
                reqwest::Body::wrap_stream(ProgressStream::new(
                    Arc::new(self.name.clone()),
                    self.content,
                    Some(listener),
                )),
                len,
            ),
            None => Part::bytes(self.content.to_vec()),
        };
        part.file_name(self.name)
    }
}

/// Produces a fresh session for each operation.
pub trait Transport: Send + Sync {
    type Session: Session;

    fn open(&self, config: &Config) -> Result<Self::Session>;
}

/// Sends requests and decodes their JSON answers.
#[async_trait]
pub trait Session: Send + Sync {
    async fn send(&self, request: Request) -> Result<Value>;
}

/// Opens a new `reqwest` client per session.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

impl Transport for HttpTransport {
    type Session = HttpSession;

    fn open(&self, config: &Config) -> Result<HttpSession> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpSession {
            client: builder.build()?,
        })
    }
}

pub struct HttpSession {
    client: reqwest::Client,
}

#[async_trait]
impl Session for HttpSession {
    async fn send(&self, request: Request) -> Result<Value> {
        // the query carries the token, so only the bare url is logged
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self.client.request(request.method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Form(fields) => builder.form(&fields),
            Body::Multipart { fields, file } => {
                let form = fields
                    .into_iter()
                    .fold(Form::new(), |form, (key, value)| form.text(key, value));
                builder.multipart(form.part("file", file.into_part()))
            }
        };

        let response = builder.send().await?;
        Ok(response.json::<Value>().await?)
    }
}

/// Streams a file body in fixed size chunks, reporting progress per chunk.
#[derive(Clone)]
pub struct ProgressStream {
    name: Arc<String>,
    data: Arc<Vec<u8>>,
    cursor: usize,
    progress_listener: Option<ProgressListener>,
}

impl ProgressStream {
    pub fn new(
        name: Arc<String>,
        data: Arc<Vec<u8>>,
        progress_listener: Option<ProgressListener>,
    ) -> Self {
        ProgressStream {
            name,
            data,
            cursor: 0,
            progress_listener,
        }
    }
}

impl futures::Stream for ProgressStream {
    type Item = io::Result<Vec<u8>>;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        _: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        let total_len = self.data.len();
        let remain_len = total_len - self.cursor;

        if remain_len == 0 {
            Poll::Ready(None)
        } else {
            let mut result = vec![0u8; cmp::min(remain_len, CHUNK_SIZE)];
            let start_index = self.cursor;
            self.cursor += result.len();
            result.copy_from_slice(&self.data[start_index..self.cursor]);

            if let Some(pl) = self.progress_listener.as_ref() {
                if let Ok(mut f) = pl.lock() {
                    f(self.name.clone(), self.cursor, total_len);
                }
            }

            Poll::Ready(Some(Ok(result)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn progress_stream_reports_every_chunk() {
        let data = Arc::new(vec![7u8; CHUNK_SIZE * 2 + 10]);
        let seen: Arc<Mutex<Vec<(String, usize, usize)>>> = Arc::new(Mutex::new(vec![]));
        let sink = seen.clone();
        let listener: ProgressListener = Arc::new(Mutex::new(move |name: Arc<String>, pos: usize, total: usize| {
            sink.lock().unwrap().push((name.to_string(), pos, total));
        }));

        let stream = ProgressStream::new(Arc::new("a.bin".into()), data.clone(), Some(listener));
        let chunks = futures::executor::block_on(stream.collect::<Vec<_>>());

        let lens: Vec<usize> = chunks.into_iter().map(|c| c.unwrap().len()).collect();
        assert_eq!(lens, vec![CHUNK_SIZE, CHUNK_SIZE, 10]);

        let total = data.len();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ("a.bin".to_owned(), CHUNK_SIZE, total),
                ("a.bin".to_owned(), CHUNK_SIZE * 2, total),
                ("a.bin".to_owned(), total, total),
            ]
        );
    }

    #[test]
    fn empty_body_ends_immediately() {
        let stream = ProgressStream::new(Arc::new("empty".into()), Arc::new(vec![]), None);
        let chunks = futures::executor::block_on(stream.collect::<Vec<_>>());
        assert!(chunks.is_empty());
    }

    #[test]
    fn request_builder_sets_parts() {
        let request = Request::new(Method::PUT, "https://api.gofile.io/setOption")
            .body(Body::Form(vec![("option", "public".into())]));
        assert_eq!(request.method, Method::PUT);
        assert!(request.query.is_empty());
        assert!(matches!(request.body, Body::Form(ref f) if f[0].1 == "public"));
    }
}
