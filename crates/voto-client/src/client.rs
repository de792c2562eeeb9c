//! HTTP implementation of the data-access traits

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Method, RequestBuilder, StatusCode};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::api::{ListQuery, ReportApi, ResourceApi};
use crate::config::ClientConfig;
use crate::envelope::{LoginResponse, decode, decode_data, error_message};
use crate::error::{ApiError, Result};
use crate::forms::LoginRequest;
use crate::import::VoterUpload;
use crate::resource::{FormPart, RequestBody, Resource};
use crate::route::Route;
use crate::session::Session;
use crate::types::{DashboardSummary, ImportReport, LogEntry, ResultadoData};

/// Chunk size of streamed uploads
const UPLOAD_CHUNK: usize = 64 * 1024;

/// Client for the Voto Seguro REST API
///
/// Sends the session token as a bearer header on every request. A 401 from
/// any endpoint expires the session (token cleared, redirect to login)
/// before the error is returned. Nothing is retried.
pub struct HttpApi {
    client: Client,
    config: ClientConfig,
    session: Session,
}

impl HttpApi {
    pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        debug!(
            "HTTP client ready for {}{}",
            config.base_url, config.api_prefix
        );
        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Request builder with the bearer header, plus the endpoint path used in
    /// logs and decode errors
    fn prepare(&self, method: Method, path: &str, prefixed: bool) -> Result<(String, RequestBuilder)> {
        let url = self.config.endpoint(path, prefixed)?;
        let endpoint = url.path().to_string();
        let mut builder = self.client.request(method, url);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        Ok((endpoint, builder))
    }

    async fn execute(&self, endpoint: &str, builder: RequestBuilder) -> Result<Bytes> {
        debug!("Sending request to {}", endpoint);
        let response = builder.send().await.map_err(|e| {
            error!("Request to {} failed: {}", endpoint, e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("{} answered 401, expiring session", endpoint);
            self.session.expire();
            return Err(ApiError::Unauthorized);
        }

        let body = response.bytes().await?;
        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
            warn!("{} answered {}: {}", endpoint, status, message);
            return Err(ApiError::status(status.as_u16(), message));
        }

        debug!("{} answered {} ({} bytes)", endpoint, status, body.len());
        Ok(body)
    }

    async fn send_body(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<(String, Bytes)> {
        let (endpoint, builder) = self.prepare(method, path, true)?;
        let builder = match body {
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(multipart_form(parts)?),
        };
        let bytes = self.execute(&endpoint, builder).await?;
        Ok((endpoint, bytes))
    }

    /// `POST /auth/login`; stores the token and moves to the dashboard
    pub async fn login(&self, request: &LoginRequest) -> Result<()> {
        let (endpoint, builder) = self.prepare(Method::POST, "auth/login", false)?;
        let body = self
            .execute(&endpoint, builder.json(request))
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized => ApiError::status(401, "Email ou senha inválidos."),
                other => other,
            })?;

        let token = decode::<LoginResponse>(&endpoint, &body)?
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::decode(&endpoint, "Token não encontrado na resposta"))?;

        self.session.store_token(&token)?;
        info!("Logged in as {}", request.email);
        self.session.navigate(Route::Dashboard);
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        info!("Logging out");
        self.session.logout()
    }
}

fn multipart_form(parts: Vec<FormPart>) -> Result<Form> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let file = Part::bytes(bytes.to_vec())
                    .file_name(file_name)
                    .mime_str(&mime)?;
                form.part(name, file)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for HttpApi {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R::Entity>> {
        let (endpoint, builder) = self.prepare(Method::GET, R::KIND.path(), true)?;
        let body = self
            .execute(&endpoint, builder.query(&query.to_params()))
            .await?;
        decode_data(&endpoint, &body)
    }

    async fn get(&self, id: u64) -> Result<R::Entity> {
        let path = format!("{}/{}", R::KIND.path(), id);
        let (endpoint, builder) = self.prepare(Method::GET, &path, true)?;
        let body = self
            .execute(&endpoint, builder)
            .await
            .map_err(|e| e.or_not_found(R::KIND.singular(), id))?;
        decode_data(&endpoint, &body)
    }

    async fn create(&self, draft: &R::Draft) -> Result<R::Entity> {
        let (endpoint, body) = self
            .send_body(Method::POST, R::KIND.path(), R::payload(draft)?)
            .await?;
        decode_data(&endpoint, &body)
    }

    async fn update(&self, id: u64, draft: &R::Draft) -> Result<R::Entity> {
        let path = format!("{}/{}", R::KIND.path(), id);
        let (endpoint, body) = self
            .send_body(Method::PUT, &path, R::payload(draft)?)
            .await
            .map_err(|e| e.or_not_found(R::KIND.singular(), id))?;
        decode_data(&endpoint, &body)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let path = format!("{}/{}", R::KIND.path(), id);
        let (endpoint, builder) = self.prepare(Method::DELETE, &path, true)?;
        self.execute(&endpoint, builder)
            .await
            .map_err(|e| e.or_not_found(R::KIND.singular(), id))?;
        Ok(())
    }
}

#[async_trait]
impl ReportApi for HttpApi {
    async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let (endpoint, builder) = self.prepare(Method::GET, "dashboard/summary", true)?;
        let body = self.execute(&endpoint, builder).await?;
        decode_data(&endpoint, &body)
    }

    async fn audit_logs(&self) -> Result<Vec<LogEntry>> {
        let (endpoint, builder) = self.prepare(Method::GET, "auditoria", true)?;
        let body = self.execute(&endpoint, builder).await?;
        decode_data(&endpoint, &body)
    }

    async fn results(&self, eleicao_id: u64) -> Result<ResultadoData> {
        let path = format!("resultados/{}", eleicao_id);
        let (endpoint, builder) = self.prepare(Method::GET, &path, true)?;
        let body = self.execute(&endpoint, builder).await?;
        decode_data(&endpoint, &body)
    }

    async fn export_results(&self, eleicao_id: u64) -> Result<Bytes> {
        let path = format!("resultados/{}/exportar", eleicao_id);
        let (endpoint, builder) = self.prepare(Method::GET, &path, true)?;
        self.execute(&endpoint, builder).await
    }

    /// Streams the file in chunks; progress reaches 99 when the last chunk
    /// is handed to the connection and 100 is left to the caller
    async fn import_voters(
        &self,
        upload: &VoterUpload,
        progress: &watch::Sender<u8>,
    ) -> Result<ImportReport> {
        let (endpoint, builder) = self.prepare(Method::POST, "eleitores/importar", true)?;

        let total = upload.bytes.len();
        let chunks: Vec<Bytes> = (0..total)
            .step_by(UPLOAD_CHUNK)
            .map(|start| upload.bytes.slice(start..(start + UPLOAD_CHUNK).min(total)))
            .collect();

        let (sent_tx, mut sent_rx) = mpsc::unbounded_channel::<usize>();
        let stream = futures::stream::iter(chunks).map(move |chunk| {
            let _ = sent_tx.send(chunk.len());
            Ok::<Bytes, std::io::Error>(chunk)
        });

        let file = Part::stream_with_length(Body::wrap_stream(stream), total as u64)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime)?;
        let form = Form::new().part("file", file);

        let request = self.execute(&endpoint, builder.multipart(form));
        let track = async {
            let mut sent = 0usize;
            while let Some(n) = sent_rx.recv().await {
                sent += n;
                let percent = (sent * 99 / total.max(1)).min(99) as u8;
                progress.send_replace(percent);
                if sent >= total {
                    break;
                }
            }
        };
        let (body, ()) = tokio::join!(request, track);

        decode::<ImportReport>(&endpoint, &body?)
    }
}
