use crate::errors::AppError;
use crate::models::WeekResponse;
use crate::signup::{parse_request, run_signup};
use crate::state::AppState;
use crate::ui::{gallery_photo, render_index, SCRIPT_JS};
use crate::week::WeekInfo;
use crate::widgets::{CookieStorage, PageElements, PageWidgets, Plan, ThemeToggle};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize, Default)]
pub struct IndexQuery {
    pub plan: Option<String>,
    pub menu: Option<String>,
    pub photo: Option<String>,
}

/// The page, with widget state taken from the no-script form fallbacks:
/// `?plan=` picks the training tab, `?menu=open` opens the drawer and
/// `?photo=` opens a gallery photo in the lightbox.
pub async fn index(Query(query): Query<IndexQuery>, headers: HeaderMap) -> Html<String> {
    let plan = query
        .plan
        .as_deref()
        .and_then(Plan::parse)
        .unwrap_or_default();
    let mut widgets = PageWidgets::init(PageElements::ALL, cookie_storage(&headers), plan);
    if query.menu.as_deref() == Some("open") {
        if let Some(drawer) = widgets.drawer.as_mut() {
            drawer.open();
        }
    }
    if let Some(lightbox) = widgets.lightbox.as_mut() {
        lightbox.open_from(query.photo.as_deref().and_then(gallery_photo));
    }
    Html(render_index(&WeekInfo::today(), &widgets))
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

/// Form fallback for the theme button when scripts are disabled.
pub async fn toggle_theme(headers: HeaderMap) -> impl IntoResponse {
    let mut toggle = ThemeToggle::init(cookie_storage(&headers));
    toggle.click();
    let cookies = toggle.into_storage().set_cookie_headers();
    (
        AppendHeaders(cookies.into_iter().map(|cookie| (header::SET_COOKIE, cookie))),
        Redirect::to("/"),
    )
}

pub async fn get_week() -> Json<WeekResponse> {
    Json(WeekInfo::today().to_response())
}

pub async fn signup(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Response, AppError> {
    if method != Method::POST {
        return Ok((StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response());
    }

    let request = parse_request(&body)?;

    let Some(store) = state.store.as_deref() else {
        warn!("signup rejected: repository settings are missing");
        return Err(AppError::misconfigured());
    };

    info!(race_id = %request.race_id, "runner signup");
    let response = run_signup(store, &request, state.conflict_retries)
        .await
        .inspect_err(|err| {
            warn!(race_id = %request.race_id, status = %err.status, "signup failed: {}", err.error)
        })?;
    Ok(Json(response).into_response())
}

fn cookie_storage(headers: &HeaderMap) -> CookieStorage {
    CookieStorage::from_header(
        headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok()),
    )
}
