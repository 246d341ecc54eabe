//! Axum route handlers for viewing and editing the CV record.
//!
//! Form submissions redirect back to the relevant view, mirroring a classic
//! HTML-form workflow. Out-of-range item indices redirect without changes.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::cv::form::{item_fields, ContactForm, FormFields, SummaryForm};
use crate::cv::items;
use crate::errors::AppError;
use crate::models::cv::{Contact, Section};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SectionCount {
    pub section: Section,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub contact: Contact,
    pub summary: String,
    pub sections: Vec<SectionCount>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct IndexedItem {
    pub index: usize,
    pub item: Value,
}

#[derive(Debug, Serialize)]
pub struct SectionListResponse {
    pub section: Section,
    pub fields: &'static [&'static str],
    pub items: Vec<IndexedItem>,
}

#[derive(Debug, Serialize)]
pub struct ItemFormResponse {
    pub section: Section,
    pub fields: &'static [&'static str],
    pub index: Option<usize>,
    pub item: Value,
}

fn parse_section(raw: &str) -> Result<Section, AppError> {
    raw.parse()
        .map_err(|e| AppError::NotFound(format!("Section not found: {e}")))
}

fn to_section_list(section: Section) -> Redirect {
    Redirect::to(&format!("/{section}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_index(
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, AppError> {
    let cv = state.store.load_cv().await?;
    let sections = Section::ALL
        .into_iter()
        .map(|section| SectionCount {
            section,
            count: cv.section_len(section),
        })
        .collect();
    Ok(Json(OverviewResponse {
        contact: cv.contact,
        summary: cv.summary,
        sections,
    }))
}

/// GET /contact
pub async fn handle_get_contact(
    State(state): State<AppState>,
) -> Result<Json<Contact>, AppError> {
    Ok(Json(state.store.load_cv().await?.contact))
}

/// POST /contact
pub async fn handle_update_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<Redirect, AppError> {
    let mut cv = state.store.load_cv().await?;
    form.apply_to(&mut cv.contact);
    state.store.save_cv(&cv).await?;
    info!("Updated contact details");
    Ok(Redirect::to("/contact"))
}

/// GET /summary
pub async fn handle_get_summary(
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, AppError> {
    let summary = state.store.load_cv().await?.summary;
    Ok(Json(SummaryResponse { summary }))
}

/// POST /summary
pub async fn handle_update_summary(
    State(state): State<AppState>,
    Form(form): Form<SummaryForm>,
) -> Result<Redirect, AppError> {
    let mut cv = state.store.load_cv().await?;
    cv.summary = form.summary;
    state.store.save_cv(&cv).await?;
    info!("Updated summary");
    Ok(Redirect::to("/summary"))
}

/// GET /:section
pub async fn handle_list_items(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<SectionListResponse>, AppError> {
    let section = parse_section(&section)?;
    let cv = state.store.load_cv().await?;
    let items = items::list(&cv, section)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| IndexedItem { index, item })
        .collect();
    Ok(Json(SectionListResponse {
        section,
        fields: section.fields(),
        items,
    }))
}

/// GET /:section/add
///
/// Returns the field schema and an empty item for the add form.
pub async fn handle_new_item(
    Path(section): Path<String>,
) -> Result<Json<ItemFormResponse>, AppError> {
    let section = parse_section(&section)?;
    Ok(Json(ItemFormResponse {
        section,
        fields: section.fields(),
        index: None,
        item: Value::Object(Default::default()),
    }))
}

/// POST /:section/add
pub async fn handle_add_item(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Form(form): Form<FormFields>,
) -> Result<Redirect, AppError> {
    let section = parse_section(&section)?;
    let mut cv = state.store.load_cv().await?;
    items::push(&mut cv, section, item_fields(section, &form))?;
    state.store.save_cv(&cv).await?;
    info!("Added {section} item at index {}", cv.section_len(section) - 1);
    Ok(to_section_list(section))
}

/// GET /:section/edit/:index
pub async fn handle_get_item(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
) -> Result<Response, AppError> {
    let section = parse_section(&section)?;
    let cv = state.store.load_cv().await?;
    let Some(item) = items::get(&cv, section, index)? else {
        return Ok(to_section_list(section).into_response());
    };
    Ok(Json(ItemFormResponse {
        section,
        fields: section.fields(),
        index: Some(index),
        item,
    })
    .into_response())
}

/// POST /:section/edit/:index
pub async fn handle_edit_item(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
    Form(form): Form<FormFields>,
) -> Result<Redirect, AppError> {
    let section = parse_section(&section)?;
    let mut cv = state.store.load_cv().await?;
    if items::update(&mut cv, section, index, item_fields(section, &form))? {
        state.store.save_cv(&cv).await?;
        info!("Updated {section} item {index}");
    }
    Ok(to_section_list(section))
}

/// GET /:section/delete/:index
pub async fn handle_delete_item(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
) -> Result<Redirect, AppError> {
    let section = parse_section(&section)?;
    let mut cv = state.store.load_cv().await?;
    if items::remove(&mut cv, section, index) {
        state.store.save_cv(&cv).await?;
        info!("Deleted {section} item {index}");
    }
    Ok(to_section_list(section))
}
