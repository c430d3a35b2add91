use crate::client::{BufferedService, map_buffer_error, try_acquire_buffer_slot};
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::{HttpResponse, ResponseBody};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{Request, Response};
use http_body_util::Full;
use tower::Service;

/// Request builder created by [`HttpClient::get`](crate::HttpClient::get).
///
/// Header errors are deferred and reported by [`send()`](RequestBuilder::send).
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    service: BufferedService,
    max_body_size: usize,
    method: http::Method,
    url: String,
    headers: Vec<(HeaderName, HeaderValue)>,
    error: Option<HttpError>,
    transport_security: TransportSecurity,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: BufferedService,
        max_body_size: usize,
        method: http::Method,
        url: String,
        transport_security: TransportSecurity,
    ) -> Self {
        Self {
            service,
            max_body_size,
            method,
            url,
            headers: Vec::new(),
            error: None,
            transport_security,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }

        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => self.headers.push((name, value)),
            (Err(e), _) => self.error = Some(HttpError::InvalidHeaderName(e)),
            (_, Err(e)) => self.error = Some(HttpError::InvalidHeaderValue(e)),
        }
        self
    }

    /// Parse the URL and check its scheme against the transport security mode.
    fn validate_url(&self) -> Result<http::Uri, HttpError> {
        let invalid = |kind: InvalidUriKind, reason: String| HttpError::InvalidUri {
            url: self.url.clone(),
            kind,
            reason,
        };

        let uri: http::Uri = self
            .url
            .parse()
            .map_err(|e: http::uri::InvalidUri| invalid(InvalidUriKind::ParseError, e.to_string()))?;

        if uri.authority().is_none() {
            return Err(invalid(
                InvalidUriKind::MissingAuthority,
                "missing host/authority".to_owned(),
            ));
        }

        match uri.scheme_str() {
            Some("https") => Ok(uri),
            Some("http") => match self.transport_security {
                TransportSecurity::AllowInsecureHttp => Ok(uri),
                TransportSecurity::TlsOnly => Err(HttpError::InvalidScheme {
                    scheme: "http".to_owned(),
                    reason: "HTTPS required (transport security is TlsOnly)".to_owned(),
                }),
            },
            Some(scheme) => Err(HttpError::InvalidScheme {
                scheme: scheme.to_owned(),
                reason: "only http:// and https:// schemes are supported".to_owned(),
            }),
            None => Err(invalid(
                InvalidUriKind::MissingScheme,
                "missing scheme".to_owned(),
            )),
        }
    }

    /// Send the request.
    ///
    /// Returns `Ok` for every HTTP status, including 4xx and 5xx.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` if a header or the URL is invalid, the scheme is not
    /// allowed, the request times out, the transport fails, or the request
    /// buffer is full.
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let uri = self.validate_url()?;

        let mut builder = Request::builder().method(self.method).uri(uri);
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        let request = builder.body(Full::new(Bytes::new()))?;

        try_acquire_buffer_slot(&mut self.service).await?;

        let inner: Response<ResponseBody> =
            self.service.call(request).await.map_err(map_buffer_error)?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::config::{HttpClientConfig, TransportSecurity};
    use crate::error::{HttpError, InvalidUriKind};
    use crate::{HttpClient, HttpClientBuilder};

    fn client(transport: TransportSecurity) -> HttpClient {
        HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .transport(transport)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_relative_url_rejected() {
        let result = client(TransportSecurity::AllowInsecureHttp)
            .get("/.well-known/oada-configuration")
            .send()
            .await;
        assert!(matches!(
            result,
            Err(HttpError::InvalidUri {
                kind: InvalidUriKind::MissingAuthority,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_unparseable_url_rejected() {
        let result = client(TransportSecurity::AllowInsecureHttp)
            .get("http://bad host/")
            .send()
            .await;
        assert!(matches!(
            result,
            Err(HttpError::InvalidUri {
                kind: InvalidUriKind::ParseError,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_http_rejected_when_tls_only() {
        let result = client(TransportSecurity::TlsOnly)
            .get("http://auth/.well-known/oada-configuration")
            .send()
            .await;
        assert!(matches!(result, Err(HttpError::InvalidScheme { scheme, .. }) if scheme == "http"));
    }

    #[tokio::test]
    async fn test_unsupported_scheme_rejected() {
        let result = client(TransportSecurity::AllowInsecureHttp)
            .get("ftp://files.example.com/doc")
            .send()
            .await;
        assert!(matches!(result, Err(HttpError::InvalidScheme { scheme, .. }) if scheme == "ftp"));
    }

    #[tokio::test]
    async fn test_invalid_header_deferred_to_send() {
        let result = client(TransportSecurity::AllowInsecureHttp)
            .get("http://auth/.well-known/oada-configuration")
            .header("bad header", "value")
            .send()
            .await;
        assert!(matches!(result, Err(HttpError::InvalidHeaderName(_))));
    }
}
