//! Analytical endpoints
//!
//! Path values go to the catalog untouched. The worker identity is taken on
//! entry and handed down to the client pool.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use termlens_db::WorkerId;
use termlens_query::{Template, TemplateInput};

use super::AppState;
use crate::normalize::normalize;

#[derive(Debug, Deserialize)]
pub struct DayPath {
    pub country_name: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct RangePath {
    pub country_name: String,
    pub init_date: String,
    pub finish_date: String,
}

impl From<DayPath> for TemplateInput {
    fn from(p: DayPath) -> Self {
        TemplateInput::Day {
            country: p.country_name,
            date: p.date,
        }
    }
}

impl From<RangePath> for TemplateInput {
    fn from(p: RangePath) -> Self {
        TemplateInput::Range {
            country: p.country_name,
            init_date: p.init_date,
            finish_date: p.finish_date,
        }
    }
}

type Reply = (StatusCode, Json<Value>);

async fn run(state: &AppState, template: Template, input: TemplateInput) -> Reply {
    let worker = WorkerId::current();
    let (status, body) = normalize(state.analytics.run(template, input, worker).await);
    (status, Json(body))
}

pub async fn top_terms_day(State(state): State<AppState>, Path(p): Path<DayPath>) -> Reply {
    run(&state, Template::TopTermsDay, p.into()).await
}

pub async fn top_terms_dates(State(state): State<AppState>, Path(p): Path<RangePath>) -> Reply {
    run(&state, Template::TopTermsRange, p.into()).await
}

pub async fn top_rising_terms_day(State(state): State<AppState>, Path(p): Path<DayPath>) -> Reply {
    run(&state, Template::TopRisingDay, p.into()).await
}

pub async fn top_rising_terms_dates(State(state): State<AppState>, Path(p): Path<RangePath>) -> Reply {
    run(&state, Template::TopRisingRange, p.into()).await
}

pub async fn top_terms_interval_dates(State(state): State<AppState>) -> Reply {
    run(&state, Template::TermsDateBounds, TemplateInput::Bounds).await
}

pub async fn top_rising_terms_interval_dates(State(state): State<AppState>) -> Reply {
    run(&state, Template::RisingDateBounds, TemplateInput::Bounds).await
}
