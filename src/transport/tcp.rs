use std::{
    io::{Read, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
};

use url::Url;

use crate::{
    error::{TransportError, TransportErrorKind},
    header::Header,
    message::{Request, Response, status},
};

use super::{
    Transport, TransportOptions,
    h1::{self, BodyDecoder, ResponseHead},
};

const READ_BUFFER_SIZE: usize = 16384;
const DEFAULT_PROXY_PORT: u16 = 8080;

/// Plain HTTP/1.1 transport over a new TCP connection per request.
///
/// Only the `http` scheme is supported.
#[derive(Debug, Default)]
pub struct TcpTransport {}

impl TcpTransport {
    pub fn new() -> Self {
        Self {}
    }

    fn connect(&self, host: &str, port: u16, options: &TransportOptions) -> Result<TcpStream, TransportError> {
        let addresses = (host, port)
            .to_socket_addrs()
            .map_err(|error| {
                TransportError::new(TransportErrorKind::UnknownHost)
                    .with_context(host)
                    .with_source(error)
            })?
            .collect::<Vec<SocketAddr>>();

        if addresses.is_empty() {
            return Err(TransportError::new(TransportErrorKind::UnknownHost).with_context(host));
        }

        let mut last_error = None;

        for address in addresses {
            tracing::debug!(%address, "connecting");

            let result = match options.timeout {
                Some(timeout) => TcpStream::connect_timeout(&address, timeout),
                None => TcpStream::connect(address),
            };

            match result {
                Ok(stream) => {
                    stream.set_read_timeout(options.timeout)?;
                    stream.set_write_timeout(options.timeout)?;
                    return Ok(stream);
                }
                Err(error) => {
                    tracing::debug!(%address, %error, "connect failed");
                    last_error = Some(error);
                }
            }
        }

        let mut error = TransportError::new(TransportErrorKind::UnableToConnect)
            .with_context(format!("{}:{}", host, port));

        if let Some(source) = last_error {
            error = error.with_source(source);
        }

        Err(error)
    }

    fn read_head(stream: &mut TcpStream, buf: &mut Vec<u8>) -> Result<ResponseHead, TransportError> {
        let mut chunk = vec![0u8; READ_BUFFER_SIZE];

        loop {
            if let Some(head_len) = h1::scan_head_end(buf) {
                let head = ResponseHead::parse(&buf[..head_len])?;
                buf.drain(..head_len);

                if status::is_informational(head.status_code) && head.status_code != 101 {
                    tracing::debug!(status = head.status_code, "skipping interim response");
                    continue;
                }

                return Ok(head);
            }

            let len = stream.read(&mut chunk)?;

            if len == 0 {
                return Err(TransportError::new(TransportErrorKind::Other)
                    .with_context("connection closed before response head"));
            }

            buf.extend_from_slice(&chunk[..len]);
        }
    }
}

/// Returns the host and port to connect to and the request target.
fn route(url: &Url, request: &Request, proxy: Option<&str>) -> Result<(String, u16, String), TransportError> {
    match proxy {
        Some(proxy) => {
            let (host, port) = match proxy.rsplit_once(':') {
                Some((host, port)) => {
                    let port = port.parse().map_err(|error| {
                        TransportError::new(TransportErrorKind::Other)
                            .with_context(format!("bad proxy port in '{}'", proxy))
                            .with_source(error)
                    })?;
                    (host, port)
                }
                None => (proxy, DEFAULT_PROXY_PORT),
            };

            Ok((host.to_string(), port, url.to_string()))
        }
        None => {
            let host = url.host_str().unwrap_or_default().to_string();
            let port = url.port_or_known_default().unwrap_or(80);

            Ok((host, port, request.uri().to_string()))
        }
    }
}

impl Transport for TcpTransport {
    fn send(
        &mut self,
        request: &Request,
        options: &TransportOptions,
        mut sink: Option<&mut dyn Write>,
    ) -> Result<Response, TransportError> {
        let url = request.url().ok_or_else(|| {
            TransportError::new(TransportErrorKind::Other).with_context("request has no Host header")
        })?;

        if url.scheme() != "http" {
            return Err(TransportError::new(TransportErrorKind::Other)
                .with_context(format!("unsupported scheme '{}'", url.scheme())));
        }

        if options.certificates.is_some() {
            tracing::debug!("certificates are unused without TLS");
        }

        let (host, port, target) = route(&url, request, options.proxy.as_deref())?;
        let mut stream = self.connect(&host, port, options)?;

        tracing::debug!(method = request.method(), %url, "sending request");
        stream.write_all(&h1::encode_request(request, &target))?;
        stream.flush()?;

        let mut buf = Vec::new();
        let head = Self::read_head(&mut stream, &mut buf)?;
        tracing::debug!(status = head.status_code, "received response head");

        let mut response = Response::new();
        response.set_http_version(head.http_version.as_str());
        response.set_status(head.status_code, head.reason_phrase.as_str());

        for (name, value) in &head.fields {
            response.headers.add(Header::parse_lenient(name, value));
        }

        let mut decoder = BodyDecoder::new(&head, request.method())?;
        let mut body = Vec::new();
        let mut decoded = Vec::new();
        let mut chunk = vec![0u8; READ_BUFFER_SIZE];
        let mut data = std::mem::take(&mut buf);

        loop {
            decoder.transform(&data, &mut decoded)?;

            match sink.as_deref_mut() {
                Some(sink) => {
                    sink.write_all(&decoded)?;
                    decoded.clear();
                }
                None => body.append(&mut decoded),
            }

            if decoder.is_done() {
                break;
            }

            let len = stream.read(&mut chunk)?;

            if len == 0 {
                break;
            }

            data.clear();
            data.extend_from_slice(&chunk[..len]);
        }

        decoder.finish(&mut decoded)?;

        match sink {
            Some(sink) => {
                sink.write_all(&decoded)?;
                sink.flush()?;
            }
            None => body.append(&mut decoded),
        }

        response.set_body(body);

        Ok(response)
    }
}
