//! Request handlers for the tracker endpoint.
//!
//! GET and POST share one handler so the dispatch order is identical for
//! both methods: self-check page, stats roll-up, stats page, identifier
//! validation, then publish or resolve.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::debug;

use tracker_core::{
    AddressStore, Cleaner, Identifier, PublishRequest, RegistrationEngine, Resolver, Space,
    StatsAggregator, TimeSource, TrackerConfig,
};

use crate::client_addr::{format_endpoint, observed_host};
use crate::pages;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AddressStore>,
    pub engine: Arc<RegistrationEngine>,
    pub resolver: Arc<Resolver>,
    pub cleaner: Arc<Cleaner>,
    pub stats: Arc<StatsAggregator>,
    pub time: Arc<dyn TimeSource>,
    pub tracker_config: Arc<TrackerConfig>,
    pub trust_forwarded_headers: bool,
}

/// Query parameters of the tracker endpoint. The flag parameters are
/// present-or-absent; their value (usually empty) is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackerQuery {
    pub id: Option<String>,
    pub alternate: Option<String>,
    pub stats: Option<String>,
    pub config: Option<String>,
}

/// Form body of a publish request. `port` arrives as a string and is
/// parsed leniently: an unparseable value drops the self endpoint without
/// failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublishForm {
    pub instance: Option<String>,
    pub port: Option<String>,
    pub host: Option<String>,
    pub addresses: Option<String>,
    pub alternate: Option<String>,
}

/// The `/tracker` endpoint, both methods.
pub async fn handle_tracker(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<TrackerQuery>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    form: Option<Form<PublishForm>>,
) -> Response {
    if query.config.is_some() {
        let page = pages::config_page(
            &state.tracker_config,
            state.store.counts(),
        );
        return Html(page).into_response();
    }

    let now = state.time.now();
    state.stats.send_pending(now).await;

    if query.stats.is_some() {
        let page = pages::stats_page(
            &state.tracker_config.stats.hostname,
            &state.stats.usage_table(now),
        );
        return Html(page).into_response();
    }

    let Some(raw_id) = query.id else {
        debug!(method = %method, "tracker request without id");
        return empty_reply();
    };
    let identifier = match Identifier::parse(raw_id) {
        Ok(identifier) => identifier,
        Err(error) => {
            debug!(%error, "tracker request rejected");
            return empty_reply();
        }
    };
    let alternate = query.alternate.is_some();

    if method == Method::POST {
        let form = form.map(|Form(inner)| inner).unwrap_or_default();
        let request = build_publish_request(
            identifier,
            alternate,
            form,
            &headers,
            peer,
            state.trust_forwarded_headers,
        );
        state.engine.publish(&request, now);
        state.cleaner.clean(now);
        empty_reply()
    } else {
        let space = Space::from_alternate_flag(alternate);
        let rows = state.resolver.resolve(&identifier, space, now);
        let body = Resolver::render(&rows);
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain"),
                (header::VARY, "Accept-Encoding"),
            ],
            body,
        )
            .into_response()
    }
}

/// Liveness probe.
pub async fn health_check() -> &'static str {
    "ok"
}

/// The permissive degraded reply: 200 with an empty body.
fn empty_reply() -> Response {
    (StatusCode::OK, String::new()).into_response()
}

fn build_publish_request(
    identifier: Identifier,
    alternate_scope: bool,
    form: PublishForm,
    headers: &HeaderMap,
    peer: SocketAddr,
    trust_forwarded: bool,
) -> PublishRequest {
    let endpoint = match form.port.as_deref().map(str::trim) {
        Some(raw_port) if !raw_port.is_empty() => match raw_port.parse::<u16>() {
            Ok(port) => {
                let host = match form.host.as_deref().map(str::trim) {
                    Some(host) if !host.is_empty() => host.to_string(),
                    _ => observed_host(headers, peer, trust_forwarded),
                };
                Some(format_endpoint(&host, port))
            }
            Err(_) => {
                debug!(port = raw_port, "unparseable port, self endpoint dropped");
                None
            }
        },
        _ => None,
    };

    PublishRequest {
        identifier,
        instance: form.instance,
        endpoint,
        addresses: split_list(form.addresses.as_deref()),
        alternates: split_list(form.alternate.as_deref()),
        alternate_scope,
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
