use anyhow::{Context, Result};
use oddsboard_client::logging::init_stderr;
use oddsboard_client::{
    calculate_now, ConfigFlags, EngineConfig, HttpEngine, ProbabilityEngine,
};
use oddsboard_core::{BoardView, Card, Selection, SlotGroup, SlotRef};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{debug, error, info, Level};

const DEFAULT_ADDR: &str = "127.0.0.1:7878";
const INDEX_HTML: &str = include_str!("../static/index.html");

fn main() {
    init_stderr(Level::INFO);
    if let Err(err) = run(&std::env::args().skip(1).collect::<Vec<_>>()) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

#[derive(Debug, Default)]
struct WebOptions {
    addr: Option<String>,
    config_path: Option<PathBuf>,
    flags: ConfigFlags,
}

fn parse_options(args: &[String]) -> Result<WebOptions> {
    let mut options = WebOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let value = args.get(idx + 1);
        match (args[idx].as_str(), value) {
            ("--addr", Some(value)) => options.addr = Some(value.clone()),
            ("--config" | "-c", Some(value)) => options.config_path = Some(PathBuf::from(value)),
            ("--endpoint", Some(value)) => options.flags.endpoint = Some(value.clone()),
            ("--opponents", Some(value)) => {
                options.flags.opponents = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid opponent count '{value}'"))?,
                );
            }
            _ => {
                idx += 1;
                continue;
            }
        }
        idx += 2;
    }
    Ok(options)
}

fn run(args: &[String]) -> Result<()> {
    let options = parse_options(args)?;
    let config = EngineConfig::resolve(options.config_path.as_deref(), &options.flags)
        .context("load engine config")?;
    let engine = HttpEngine::new(&config).context("build http engine")?;

    let addr = options.addr.unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let server = Server::http(addr.as_str())
        .map_err(|err| anyhow::anyhow!("start server on {addr}: {err}"))?;
    info!(%addr, endpoint = %config.endpoint, "odds board listening");
    let state = Arc::new(Mutex::new(AppState::new(Box::new(engine), config.num_opponents)));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state) {
            error!("request error: {err}");
        }
    }
    Ok(())
}

type SharedEngine = Box<dyn ProbabilityEngine + Send>;

struct AppState {
    selection: Selection,
    engine: SharedEngine,
    num_opponents: u32,
}

impl AppState {
    fn new(engine: SharedEngine, num_opponents: u32) -> Self {
        Self {
            selection: Selection::new(),
            engine,
            num_opponents,
        }
    }
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    board: BoardView,
}

#[derive(Debug, Deserialize)]
struct ActionRequest {
    action: String,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    index: Option<usize>,
    #[serde(default)]
    card: Option<String>,
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = request.url().to_string();
    debug!(method = %request.method(), %url, "request");
    match (request.method(), route_path(&url)) {
        (&Method::Get, "/") => {
            let header = Header::from_bytes(&b"Content-Type"[..], "text/html; charset=utf-8")
                .map_err(|_| "invalid header")?;
            request.respond(Response::from_string(INDEX_HTML).with_header(header))?;
        }
        (&Method::Get, "/api/state") => {
            let response = match state.lock() {
                Ok(guard) => build_response(&guard, None),
                Err(_) => return respond_poisoned(request),
            };
            respond_json(request, 200, &response)?;
        }
        (&Method::Post, "/api/action") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            let parsed = serde_json::from_str::<ActionRequest>(&body);
            let mut guard = match state.lock() {
                Ok(guard) => guard,
                Err(_) => return respond_poisoned(request),
            };
            let (status, response) = match parsed {
                Ok(action) => {
                    let err = apply_action(&mut guard, action).err();
                    (200, build_response(&guard, err))
                }
                Err(err) => (400, build_response(&guard, Some(format!("bad request: {err}")))),
            };
            drop(guard);
            respond_json(request, status, &response)?;
        }
        _ => {
            request.respond(Response::empty(StatusCode(404)))?;
        }
    }
    Ok(())
}

/// Path part of a request target; the query string never affects routing.
fn route_path(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

fn respond_json(
    request: tiny_http::Request,
    status: u16,
    response: &ApiResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec_pretty(response)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "invalid header")?;
    request.respond(
        Response::from_data(body)
            .with_status_code(status)
            .with_header(header),
    )?;
    Ok(())
}

fn respond_poisoned(request: tiny_http::Request) -> Result<(), Box<dyn std::error::Error>> {
    error!("board state lock poisoned");
    request.respond(Response::from_string("state unavailable").with_status_code(500))?;
    Ok(())
}

fn build_response(state: &AppState, err: Option<String>) -> ApiResponse {
    ApiResponse {
        ok: err.is_none(),
        error: err,
        board: state.selection.view(),
    }
}

/// Applies one front-end action. Malformed input is rejected before the
/// board is touched.
fn apply_action(state: &mut AppState, req: ActionRequest) -> Result<(), String> {
    match req.action.as_str() {
        "edit" => {
            let slot = parse_slot(&req)?;
            state
                .selection
                .begin_edit(slot)
                .map_err(|err| err.to_string())
        }
        "pick" => {
            let text = req.card.as_deref().ok_or("missing card")?;
            let card: Card = text
                .parse()
                .map_err(|err| format!("invalid card '{text}': {err}"))?;
            state.selection.pick(card);
            Ok(())
        }
        "reset" => {
            state.selection.reset();
            Ok(())
        }
        "calculate" => {
            if !state.selection.hand_complete() {
                return Err("pick both hand cards first".to_string());
            }
            let result = calculate_now(&mut state.selection, &*state.engine, state.num_opponents);
            info!(%result, "probability calculated");
            Ok(())
        }
        other => Err(format!("unknown action '{other}'")),
    }
}

fn parse_slot(req: &ActionRequest) -> Result<SlotRef, String> {
    let label = req.group.as_deref().ok_or("missing slot group")?;
    let group =
        SlotGroup::from_label(label).ok_or_else(|| format!("unknown slot group '{label}'"))?;
    let index = req.index.ok_or("missing slot index")?;
    Ok(SlotRef { group, index })
}
