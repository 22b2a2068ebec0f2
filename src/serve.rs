use crate::{build, config::Config};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use warp::{Filter, http::StatusCode, reply};

pub struct AppState {
    pub root: PathBuf,
    pub config: Config,
    build_lock: Mutex<()>,
}

impl AppState {
    pub fn new(root: PathBuf, config: Config) -> Self {
        AppState {
            root,
            config,
            build_lock: Mutex::new(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub category_name: Option<String>,
    pub subcategory_name: Option<String>,
}

#[derive(Debug, Serialize, Default)]
struct ApiResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn ok(message: String, output: Option<String>) -> reply::WithStatus<reply::Json> {
    let body = ApiResponse {
        success: true,
        message: Some(message),
        output,
        ..Default::default()
    };
    reply::with_status(reply::json(&body), StatusCode::OK)
}

fn fail(status: StatusCode, error: String) -> reply::WithStatus<reply::Json> {
    let body = ApiResponse {
        error: Some(error),
        ..Default::default()
    };
    reply::with_status(reply::json(&body), status)
}

/// A single folder name: no separators, no dot prefixes.
fn valid_folder_name(name: &str) -> Option<&str> {
    let name = name.trim();
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return None;
    }
    Some(name)
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn create_category(
    request: CreateCategoryRequest,
    state: Arc<AppState>,
) -> reply::WithStatus<reply::Json> {
    let Some(category) = request.category_name.as_deref().filter(|n| !n.trim().is_empty()) else {
        return fail(StatusCode::BAD_REQUEST, "Category name is required".to_string());
    };
    let Some(category) = valid_folder_name(category) else {
        return fail(StatusCode::BAD_REQUEST, format!("Invalid category name: {}", category));
    };

    let mut folder = state.root.join(category);
    let mut label = format!("\"{}\"", category);
    if let Some(sub) = request.subcategory_name.as_deref().filter(|n| !n.trim().is_empty()) {
        let Some(sub) = valid_folder_name(sub) else {
            return fail(StatusCode::BAD_REQUEST, format!("Invalid subcategory name: {}", sub));
        };
        folder = folder.join(sub);
        label = format!("{} / \"{}\"", label, sub);
    }

    if folder.exists() {
        return fail(StatusCode::BAD_REQUEST, "That category already exists!".to_string());
    }
    match fs::create_dir_all(&folder) {
        Ok(()) => {
            println!("{} {}", "Created category".green(), label.yellow());
            ok(format!("Category {} created successfully!", label), None)
        }
        Err(e) => {
            println!("{} {}: {}", "Failed to create".red(), label.yellow(), e);
            fail(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create category: {}", e),
            )
        }
    }
}

async fn regenerate_html(
    state: Arc<AppState>,
) -> Result<reply::WithStatus<reply::Json>, Infallible> {
    let _guard = state.build_lock.lock().await;
    let task_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        build::build(&task_state.root, &task_state.config).map_err(|e| e.to_string())
    })
    .await;

    Ok(match result {
        Ok(Ok(report)) => ok(
            "Catalog updated successfully! Reload the page.".to_string(),
            Some(report.summary()),
        ),
        Ok(Err(e)) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to regenerate HTML: {}", e),
        ),
        Err(e) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to regenerate HTML: {}", e),
        ),
    })
}

pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let create = warp::post()
        .and(warp::path!("api" / "create-category"))
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .map(create_category);

    let regenerate = warp::post()
        .and(warp::path!("api" / "regenerate-html"))
        .and(with_state(state.clone()))
        .and_then(regenerate_html);

    let files = warp::get().and(warp::fs::dir(state.root.clone()));

    create.or(regenerate).or(files)
}

pub async fn serve(
    root: PathBuf,
    config: Config,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{} {}",
        "Serving".blue(),
        root.display().to_string().yellow()
    );
    let state = Arc::new(AppState::new(root, config));
    println!("{}", format!("Starting server at http://localhost:{}", port).on_blue());
    warp::serve(routes(state)).run(([0, 0, 0, 0], port)).await;
    Ok(())
}
