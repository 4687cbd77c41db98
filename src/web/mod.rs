// Server-rendered web routes
//
// Every content route except login/signup/description checks for a live
// session and bounces to /signup otherwise.

pub mod auth;
mod templates;
mod validation;

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::db::{CreateUserError, Session, User};
use crate::model::{self, crops, PredictError};
use crate::AppState;

pub use templates::*;

// Session token cookie name
const SESSION_COOKIE: &str = "cropwise_session";

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/contact", get(contact))
        .route("/about", get(about))
        .route("/predict", post(predict))
        .route("/result", get(result))
        .route("/description", get(description))
        .route("/search", get(search))
        .route("/login", get(login_page))
        .route("/login", post(login_submit))
        .route("/signup", get(signup_page))
        .route("/signup", post(signup_submit))
        .route("/logout", get(logout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Helper to render templates and handle errors
fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Template error: {}", e),
        )
            .into_response(),
    }
}

// Resolve the cookie to a live session, if any
async fn current_session(state: &AppState, jar: &CookieJar) -> Option<Session> {
    let token = jar.get(SESSION_COOKIE)?.value().to_string();
    auth::session_for_token(&state.db, &token).await.ok().flatten()
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

// Home page
async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(session) = current_session(&state, &jar).await else {
        return Redirect::to("/signup").into_response();
    };

    render_template(IndexTemplate {
        username: session.user_name,
        error: None,
        search_results: None,
    })
}

async fn contact(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(session) = current_session(&state, &jar).await else {
        return Redirect::to("/signup").into_response();
    };

    render_template(ContactTemplate {
        username: session.user_name,
    })
}

async fn about(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(session) = current_session(&state, &jar).await else {
        return Redirect::to("/signup").into_response();
    };

    render_template(AboutTemplate {
        username: session.user_name,
    })
}

// Run the measurement form through the pipeline
async fn predict(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let Some(session) = current_session(&state, &jar).await else {
        return Redirect::to("/signup").into_response();
    };

    match model::predict(&state.model, &fields) {
        Ok(outcome) => {
            if let Err(e) = session.set_last_crop(&state.db, &outcome.crop).await {
                error!(error = %e, "Failed to record prediction in session");
                return render_with_error(session.user_name, "Something went wrong, please try again");
            }

            info!(user = %session.user_name, crop = %outcome.crop, "Prediction served");

            render_template(ResultTemplate {
                username: session.user_name,
                crop: Some(outcome.crop),
                crop_image: outcome.image,
            })
        }
        Err(err @ PredictError::InvalidFields(_)) => {
            render_with_error(session.user_name, &err.to_string())
        }
        Err(PredictError::Model(e)) => {
            error!(error = %e, "Prediction failed");
            render_with_error(session.user_name, "Prediction failed, please try again")
        }
    }
}

fn render_with_error(username: String, message: &str) -> Response {
    render_template(IndexTemplate {
        username,
        error: Some(message.to_string()),
        search_results: None,
    })
}

// Re-render the last prediction stored in the session
async fn result(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(session) = current_session(&state, &jar).await else {
        return Redirect::to("/signup").into_response();
    };

    let crop_image = session
        .last_crop
        .as_deref()
        .map(crops::image_file)
        .unwrap_or_else(|| "default.jpg".to_string());

    render_template(ResultTemplate {
        username: session.user_name,
        crop: session.last_crop,
        crop_image,
    })
}

// Public reference page
async fn description() -> Response {
    render_template(DescriptionTemplate {
        crops: &crops::CROP_PROFILES,
    })
}

#[derive(Deserialize)]
struct SearchParams {
    search: Option<String>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(session) = current_session(&state, &jar).await else {
        return Redirect::to("/signup").into_response();
    };

    let results = crops::search(params.search.as_deref().unwrap_or(""));

    render_template(IndexTemplate {
        username: session.user_name,
        error: None,
        search_results: Some(results),
    })
}

// Login

async fn login_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if current_session(&state, &jar).await.is_some() {
        return Redirect::to("/").into_response();
    }

    render_template(LoginTemplate { error: None })
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if current_session(&state, &jar).await.is_some() {
        return Redirect::to("/").into_response();
    }

    let user = match User::find_by_name(&state.db, &form.username).await {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "Login lookup failed");
            return login_error("Something went wrong, please try again");
        }
    };

    // One generic message for both unknown user and bad password
    let verified = user
        .map(|u| auth::verify_password(&form.password, &u.password_hash))
        .unwrap_or(false);
    if !verified {
        return login_error("Invalid username or password");
    }

    match auth::issue_session(&state.db, &form.username, state.config.auth.session_ttl_hours).await
    {
        Ok((_, token)) => {
            info!(user = %form.username, "User logged in");
            (jar.add(session_cookie(token)), Redirect::to("/")).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create session");
            login_error("Something went wrong, please try again")
        }
    }
}

fn login_error(message: &str) -> Response {
    let template = LoginTemplate {
        error: Some(message.to_string()),
    };
    let html = template.render().unwrap_or_else(|e| format!("Error: {}", e));
    (StatusCode::UNAUTHORIZED, Html(html)).into_response()
}

// Signup

async fn signup_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if current_session(&state, &jar).await.is_some() {
        return Redirect::to("/").into_response();
    }

    render_template(SignupTemplate { error: None })
}

#[derive(Deserialize)]
struct SignupForm {
    username: String,
    email: String,
    password: String,
}

async fn signup_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Response {
    if current_session(&state, &jar).await.is_some() {
        return Redirect::to("/").into_response();
    }

    if let Err(message) = validation::validate_username(&form.username)
        .and_then(|_| validation::validate_email(&form.email))
        .and_then(|_| validation::validate_password(&form.password))
    {
        return signup_error(StatusCode::BAD_REQUEST, &message);
    }

    let password_hash = match auth::hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return signup_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong, please try again",
            );
        }
    };

    // The INSERT itself is the duplicate check: the UNIQUE constraint decides,
    // even when two signups race
    let user = match User::create(&state.db, &form.username, &form.email, &password_hash).await {
        Ok(user) => user,
        Err(e @ (CreateUserError::DuplicateName | CreateUserError::DuplicateEmail)) => {
            return signup_error(StatusCode::CONFLICT, &e.to_string());
        }
        Err(CreateUserError::Database(e)) => {
            error!(error = %e, "Failed to create user");
            return signup_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong, please try again",
            );
        }
    };

    info!(user = %user.name, "Account created");

    // Auto-login after signup
    match auth::issue_session(&state.db, &user.name, state.config.auth.session_ttl_hours).await {
        Ok((_, token)) => (jar.add(session_cookie(token)), Redirect::to("/")).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create session");
            Redirect::to("/login").into_response()
        }
    }
}

fn signup_error(status: StatusCode, message: &str) -> Response {
    let template = SignupTemplate {
        error: Some(message.to_string()),
    };
    let html = template.render().unwrap_or_else(|e| format!("Error: {}", e));
    (status, Html(html)).into_response()
}

// Logout: drop the session row (auth marker and last prediction together)
// and the cookie
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(session) = current_session(&state, &jar).await {
        if let Err(e) = session.delete(&state.db).await {
            error!(error = %e, "Failed to delete session");
        } else {
            info!(user = %session.user_name, "User logged out");
        }
    }

    let jar = jar.remove(Cookie::from(SESSION_COOKIE));
    (jar, Redirect::to("/signup")).into_response()
}
