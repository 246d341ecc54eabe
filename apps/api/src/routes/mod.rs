pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::customize::handlers as customize;
use crate::cv::handlers as cv;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/acerca", get(health::about_handler))
        // Record editing
        .route("/", get(cv::handle_index))
        .route(
            "/contact",
            get(cv::handle_get_contact).post(cv::handle_update_contact),
        )
        .route(
            "/summary",
            get(cv::handle_get_summary).post(cv::handle_update_summary),
        )
        .route("/:section", get(cv::handle_list_items))
        .route(
            "/:section/add",
            get(cv::handle_new_item).post(cv::handle_add_item),
        )
        .route(
            "/:section/edit/:index",
            get(cv::handle_get_item).post(cv::handle_edit_item),
        )
        .route("/:section/delete/:index", get(cv::handle_delete_item))
        // Templates
        .route("/personalizar", get(customize::handle_customize))
        .route(
            "/personalizar/plantilla/:name",
            get(customize::handle_get_template),
        )
        .route(
            "/personalizar/guardar",
            post(customize::handle_save_template),
        )
        .route(
            "/personalizar/eliminar/:name",
            post(customize::handle_delete_template),
        )
        // Rendering
        .route("/preview", get(customize::handle_preview))
        .route(
            "/preview/personalizada",
            post(customize::handle_custom_preview),
        )
        .route(
            "/generar",
            get(customize::handle_generate_page).post(customize::handle_generate),
        )
        .route(
            "/generar/personalizado",
            post(customize::handle_generate_custom),
        )
        .route("/download/*path", get(customize::handle_download))
        .with_state(state)
}
