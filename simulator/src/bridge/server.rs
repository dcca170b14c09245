use crate::bridge::state::LotState;
use log::info;
use parkcore::model::Heading;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Reply};

#[derive(Debug, Deserialize)]
struct CountQuery {
    direction: String,
    name: String,
}

fn with_state(
    state: Arc<LotState>,
) -> impl Filter<Extract = (Arc<LotState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Matches each non-empty segment of `prefix` in order.
fn prefix_filter(prefix: &str) -> BoxedFilter<()> {
    prefix
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .fold(warp::any().boxed(), |filter, segment| {
            filter.and(warp::path(segment)).boxed()
        })
}

/// The three read endpoints the client consumes, mounted under `prefix`.
pub fn routes(state: Arc<LotState>, prefix: &str) -> BoxedFilter<(Response,)> {
    let base = prefix_filter(prefix).and(warp::path("parkingSpot"));

    let spots = base
        .clone()
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(|state: Arc<LotState>| warp::reply::json(&state.spots()).into_response());

    let occupied = base
        .clone()
        .and(warp::path("occupied-count"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(|state: Arc<LotState>| warp::reply::json(&state.occupied_count()).into_response());

    let count = base
        .and(warp::path("count"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<CountQuery>())
        .and(with_state(state))
        .map(
            |query: CountQuery, state: Arc<LotState>| match query.direction.parse::<Heading>() {
                Ok(heading) => {
                    warp::reply::json(&state.free_in_direction(heading, &query.name))
                        .into_response()
                }
                Err(err) => warp::reply::with_status(
                    warp::reply::json(&json!({ "error": err.to_string() })),
                    StatusCode::BAD_REQUEST,
                )
                .into_response(),
            },
        );

    spots.or(occupied).unify().or(count).unify().boxed()
}

/// Flips one random reservation every `period` until aborted.
pub fn spawn_churn(state: Arc<LotState>, period: Duration, seed: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if state.is_empty() {
                continue;
            }
            let index = rng.gen_range(0..state.len());
            if let Some(spot) = state.flip(index) {
                info!(
                    "[churn] {} is now {}",
                    spot.name,
                    if spot.reserved { "occupied" } else { "free" }
                );
            }
        }
    })
}
