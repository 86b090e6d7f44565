// src/services/ai_service.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GEMINI_MODEL: &str = "gemini-2.5-flash";
// A chave vai no cabeçalho; na query string ela apareceria nos erros do reqwest
const API_KEY_HEADER: &str = "x-goog-api-key";

pub const DISABLED_MESSAGE: &str = "La función de IA está deshabilitada. Por favor, configure la clave de API.";
pub const FAILURE_MESSAGE: &str = "Error al generar la descripción. Por favor, inténtalo de nuevo.";

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescription {
    pub description: String,
}

fn work_order_prompt(complaint: &str) -> String {
    format!(
        "Basado en la siguiente queja de un cliente para su vehículo, escribe una descripción de servicio concisa y \
         profesional para una orden de trabajo de un mecánico. Mantén el lenguaje técnico pero comprensible. No añadas \
         saludos ni despedidas, solo la descripción del trabajo a realizar. Queja del cliente: \"{}\"",
        complaint
    )
}

/// Sugere a descrição do serviço a partir da queja do cliente. Nunca falha:
/// sem chave ou com erro devolve um texto fixo para o usuário.
#[derive(Clone)]
pub struct AiService {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl AiService {
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.is_empty());
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn generate_service_description(&self, complaint: &str) -> String {
        let Some(api_key) = &self.api_key else {
            return DISABLED_MESSAGE.to_string();
        };

        match self.request(api_key, complaint).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("❌ Erro ao gerar descrição com Gemini: {:?}", e);
                FAILURE_MESSAGE.to_string()
            }
        }
    }

    fn build_request(&self, api_key: &str, complaint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, GEMINI_MODEL);
        let body = json!({
            "contents": [{ "parts": [{ "text": work_order_prompt(complaint) }] }]
        });

        self.client.post(url).header(API_KEY_HEADER, api_key).json(&body)
    }

    async fn request(&self, api_key: &str, complaint: &str) -> anyhow::Result<String> {
        let response = self.build_request(api_key, complaint).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini respondeu {}: {}", status, error_text);
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect();

        let text = text.trim();
        if text.is_empty() {
            anyhow::bail!("Gemini respondeu sem texto");
        }
        Ok(text.to_string())
    }
}
