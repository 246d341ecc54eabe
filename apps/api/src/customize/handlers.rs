//! Axum route handlers for templates, previews, generated files and downloads.
//!
//! Every render goes through the same pipeline: load the record, deduplicate
//! `otros`, apply the selection (if any), render.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::customize::filter::{filter_by_selection, parse_selection};
use crate::cv::dedup::dedup_otros;
use crate::errors::AppError;
use crate::models::cv::CvRecord;
use crate::models::template::{Selection, Template};
use crate::render::{render, Format};
use crate::state::AppState;
use crate::store::{OutputFile, Templates};

const DEFAULT_OUTNAME: &str = "CV";
const DEFAULT_CUSTOM_OUTNAME: &str = "CV_personalizado";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_fmt() -> String {
    Format::Markdown.as_str().to_string()
}

fn default_outname() -> String {
    DEFAULT_OUTNAME.to_string()
}

fn default_custom_outname() -> String {
    DEFAULT_CUSTOM_OUTNAME.to_string()
}

#[derive(Debug, Serialize)]
pub struct CustomizeResponse {
    pub cv: CvRecord,
    pub templates: Templates,
}

#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub selection: Selection,
    #[serde(default)]
    pub created: String,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    #[serde(default = "default_fmt")]
    pub fmt: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub format: Format,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CustomPreviewRequest {
    #[serde(default)]
    pub selection: Selection,
    #[serde(default = "default_fmt")]
    pub fmt: String,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default = "default_fmt")]
    pub fmt: String,
    #[serde(default = "default_outname")]
    pub outname: String,
    #[serde(default)]
    pub selection_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub fmt: String,
    pub outname: String,
    /// Files written by this request.
    pub outputs: Vec<String>,
    /// Everything currently in the output directory.
    pub files: Vec<OutputFile>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCustomRequest {
    #[serde(default)]
    pub selection: Selection,
    #[serde(default = "default_fmt")]
    pub fmt: String,
    #[serde(default = "default_custom_outname")]
    pub outname: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateCustomResponse {
    pub success: bool,
    pub filename: String,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline helpers
// ────────────────────────────────────────────────────────────────────────────

/// Loads the record, deduplicates `otros`, then applies `selection`.
/// Selection indices therefore refer to the deduplicated `otros` list.
async fn prepare_cv(
    state: &AppState,
    selection: Option<&Selection>,
) -> Result<CvRecord, AppError> {
    let cv = dedup_otros(state.store.load_cv().await?);
    Ok(match selection {
        Some(selection) => filter_by_selection(&cv, selection),
        None => cv,
    })
}

/// `<outname><ext>`, with `default` standing in for a blank name. Names that
/// could leave the output directory are rejected.
fn output_file_name(outname: &str, default: &str, format: Format) -> Result<String, AppError> {
    let stem = if outname.trim().is_empty() {
        default
    } else {
        outname
    };
    if stem.contains(['/', '\\', '\0']) || stem.contains("..") {
        return Err(AppError::Validation(format!(
            "Output name '{stem}' must not contain path separators or '..'"
        )));
    }
    Ok(format!("{stem}{}", format.extension()))
}

async fn write_rendered(
    state: &AppState,
    cv: &CvRecord,
    fmt: &str,
    outname: &str,
    default: &str,
) -> Result<String, AppError> {
    let format = Format::parse(fmt);
    let file_name = output_file_name(outname, default, format)?;
    let content = render(cv, format);
    Ok(state.store.write_output(&file_name, &content).await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /personalizar
pub async fn handle_customize(
    State(state): State<AppState>,
) -> Result<Json<CustomizeResponse>, AppError> {
    let cv = state.store.load_cv().await?;
    let templates = state.store.load_templates().await?;
    Ok(Json(CustomizeResponse { cv, templates }))
}

/// GET /personalizar/plantilla/:name
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Template>, AppError> {
    let mut templates = state.store.load_templates().await?;
    templates
        .remove(&name)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template '{name}' not found")))
}

/// POST /personalizar/guardar
///
/// Creates or replaces the template with the given name.
pub async fn handle_save_template(
    State(state): State<AppState>,
    Json(request): Json<SaveTemplateRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    if request.name.is_empty() {
        return Err(AppError::Validation("Template name is required".to_string()));
    }

    let mut templates = state.store.load_templates().await?;
    let name = request.name.clone();
    templates.insert(
        request.name.clone(),
        Template {
            name: request.name,
            description: request.description,
            selection: request.selection,
            created: request.created,
        },
    );
    state.store.save_templates(&templates).await?;
    info!("Saved template '{name}'");

    Ok(Json(ActionResponse {
        success: true,
        message: format!("Template '{name}' saved"),
    }))
}

/// POST /personalizar/eliminar/:name
pub async fn handle_delete_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut templates = state.store.load_templates().await?;
    if templates.remove(&name).is_none() {
        return Err(AppError::NotFound(format!("Template '{name}' not found")));
    }
    state.store.save_templates(&templates).await?;
    info!("Deleted template '{name}'");

    Ok(Json(ActionResponse {
        success: true,
        message: format!("Template '{name}' deleted"),
    }))
}

/// GET /preview?fmt=md
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PreviewResponse>, AppError> {
    let format = Format::parse(&query.fmt);
    let cv = prepare_cv(&state, None).await?;
    Ok(Json(PreviewResponse {
        format,
        content: render(&cv, format),
    }))
}

/// POST /preview/personalizada
pub async fn handle_custom_preview(
    State(state): State<AppState>,
    Json(request): Json<CustomPreviewRequest>,
) -> Result<Json<ContentResponse>, AppError> {
    let cv = prepare_cv(&state, Some(&request.selection)).await?;
    Ok(Json(ContentResponse {
        content: render(&cv, Format::parse(&request.fmt)),
    }))
}

/// GET /generar
pub async fn handle_generate_page(
    State(state): State<AppState>,
) -> Result<Json<GenerateResponse>, AppError> {
    Ok(Json(GenerateResponse {
        fmt: default_fmt(),
        outname: default_outname(),
        outputs: Vec::new(),
        files: state.store.list_outputs().await?,
    }))
}

/// POST /generar
///
/// A `selection_data` field that fails to parse is ignored and the full
/// record is rendered instead.
pub async fn handle_generate(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Result<Json<GenerateResponse>, AppError> {
    let selection = match form.selection_data.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => match parse_selection(raw) {
            Ok(selection) => Some(selection),
            Err(e) => {
                warn!("Ignoring malformed selection_data: {e}");
                None
            }
        },
        None => None,
    };

    let cv = prepare_cv(&state, selection.as_ref()).await?;
    let file_name =
        write_rendered(&state, &cv, &form.fmt, &form.outname, DEFAULT_OUTNAME).await?;

    Ok(Json(GenerateResponse {
        fmt: form.fmt,
        outname: form.outname,
        outputs: vec![file_name],
        files: state.store.list_outputs().await?,
    }))
}

/// POST /generar/personalizado
pub async fn handle_generate_custom(
    State(state): State<AppState>,
    Json(request): Json<GenerateCustomRequest>,
) -> Result<Json<GenerateCustomResponse>, AppError> {
    let cv = prepare_cv(&state, Some(&request.selection)).await?;
    let filename = write_rendered(
        &state,
        &cv,
        &request.fmt,
        &request.outname,
        DEFAULT_CUSTOM_OUTNAME,
    )
    .await?;

    Ok(Json(GenerateCustomResponse {
        success: true,
        message: format!("Generated {filename}"),
        filename,
    }))
}

/// GET /download/*path
///
/// Sends a generated file as an attachment.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state
        .store
        .read_output(&path)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File '{path}' not found")))?;

    let file_name = path.rsplit('/').next().unwrap_or(path.as_str()).to_string();
    let content_type = if file_name.ends_with(".md") {
        "text/markdown; charset=utf-8"
    } else if file_name.ends_with(".txt") {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name.replace('"', "")),
            ),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("Ana", DEFAULT_OUTNAME, Format::Markdown).unwrap(),
            "Ana.md"
        );
        assert_eq!(
            output_file_name("", DEFAULT_OUTNAME, Format::Text).unwrap(),
            "CV.txt"
        );
        assert_eq!(
            output_file_name("  ", DEFAULT_CUSTOM_OUTNAME, Format::Markdown).unwrap(),
            "CV_personalizado.md"
        );
    }

    #[test]
    fn test_output_file_name_rejects_separators() {
        for bad in ["../escape", "dir/file", "a\\b", "a..b", ".."] {
            assert!(matches!(
                output_file_name(bad, DEFAULT_OUTNAME, Format::Markdown),
                Err(AppError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_generate_form_defaults() {
        let form: GenerateForm = serde_json::from_str("{}").unwrap();
        assert_eq!(form.fmt, "md");
        assert_eq!(form.outname, "CV");
        assert!(form.selection_data.is_none());
    }
}
