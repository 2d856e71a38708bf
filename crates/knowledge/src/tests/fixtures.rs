//! Test fixtures: minimal PDFs and offline collaborators.

use crate::embeddings::providers::MockProvider;
use crate::embeddings::EmbeddingProvider;
use orgdocs_core::{AppConfig, AppResult};
use orgdocs_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::path::Path;
use std::sync::Arc;

/// Write a PDF with one line of Helvetica text per page.
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let font_id = 3;
    let first_page_id = 4;
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| first_page_id + i * 2).collect();

    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" "),
        pages.len()
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    for (i, text) in pages.iter().enumerate() {
        let page_id = page_ids[i];
        let escaped = text
            .replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)");
        let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", escaped);

        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
            font_id,
            page_id + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, out.as_bytes()).unwrap();
}

/// Offline embedder used across the crate's tests.
pub fn mock_embedder() -> Arc<dyn EmbeddingProvider> {
    Arc::new(MockProvider::new("mock-minilm", 64))
}

/// Configuration rooted at `root` with the given users section.
pub fn config_at(root: &Path, users_yaml: &str) -> AppConfig {
    let yaml = format!(
        "folder_path: '{}'\nembed_model: mock-minilm\nembedding:\n  provider: mock\n  dimensions: 64\nusers:\n{}",
        root.display(),
        users_yaml
    );
    AppConfig::from_yaml_str(&yaml, &root.join("config.yaml")).unwrap()
}

/// Language model that answers with the prompt it was given, system part first.
#[derive(Debug, Default)]
pub struct EchoLlm;

#[async_trait::async_trait]
impl LlmClient for EchoLlm {
    fn provider_name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        Ok(LlmResponse {
            content: format!(
                "{}\n\n{}",
                request.system.as_deref().unwrap_or_default(),
                request.prompt
            ),
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}
