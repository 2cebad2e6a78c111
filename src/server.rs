use crate::config::AppConfig;
use crate::feed::FeedCity;
use crate::ranking::PerStateRanking;
use crate::types::CityRecord;
use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// Wrapper for RTree indexing
pub struct CityPoint {
    index: usize,
    position: [f64; 2],
}

impl RTreeObject for CityPoint {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for CityPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

pub struct AppState {
    pub ranking: PerStateRanking,
    pub cities: Vec<CityRecord>,
    pub tree: RTree<CityPoint>,
}

impl AppState {
    pub fn new(ranking: PerStateRanking) -> Self {
        let cities: Vec<CityRecord> = ranking.values().flatten().cloned().collect();
        let tree_items: Vec<CityPoint> = cities.iter().enumerate().map(|(i, city)| {
            CityPoint {
                index: i,
                position: [city.coordinates.x(), city.coordinates.y()],
            }
        }).collect();
        let tree = RTree::bulk_load(tree_items);

        AppState { ranking, cities, tree }
    }
}

#[derive(Deserialize)]
pub struct RankingParams {
    state: String,
}

#[derive(Deserialize)]
pub struct NearestParams {
    lat: f64,
    lon: f64,
}

pub async fn start_server(config: AppConfig, ranking: PerStateRanking) -> Result<()> {
    println!("Building spatial index for API...");
    let state = Arc::new(AppState::new(ranking));
    println!("Spatial index built over {} cities.", state.cities.len());

    let port = config.server.port;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    println!("Starting server on http://{}", addr);

    let app = Router::new()
        .route("/api/states", get(states_handler))
        .route("/api/ranking", get(ranking_handler))
        .route("/api/nearest", get(nearest_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn states_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.ranking.keys().cloned().collect())
}

async fn ranking_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RankingParams>,
) -> Json<Option<Vec<FeedCity>>> {
    Json(state.ranking.get(&params.state)
        .map(|cities| cities.iter().map(FeedCity::from).collect()))
}

async fn nearest_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearestParams>,
) -> Json<Option<FeedCity>> {
    let nearest = state.tree.nearest_neighbor(&[params.lon, params.lat])
        .and_then(|found| state.cities.get(found.index))
        .map(FeedCity::from);

    Json(nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    fn city(name: &str, state_id: &str, lon: f64, lat: f64, population: u64) -> CityRecord {
        CityRecord {
            name: name.to_string(),
            state_id: state_id.to_string(),
            coordinates: Point::new(lon, lat),
            population,
        }
    }

    fn sample_state() -> Arc<AppState> {
        let mut ranking = PerStateRanking::new();
        ranking.insert("CO".to_string(), vec![
            city("Denver", "CO", -104.9903, 39.7392, 715522),
            city("Colorado Springs", "CO", -104.8214, 38.8339, 478961),
        ]);
        ranking.insert("NM".to_string(), vec![
            city("Albuquerque", "NM", -106.6504, 35.0844, 564559),
        ]);
        Arc::new(AppState::new(ranking))
    }

    #[tokio::test]
    async fn states_are_listed_in_order() {
        let Json(states) = states_handler(State(sample_state())).await;
        assert_eq!(states, vec!["CO", "NM"]);
    }

    #[tokio::test]
    async fn ranking_returns_cities_in_rank_order() {
        let params = RankingParams { state: "CO".to_string() };
        let Json(cities) = ranking_handler(State(sample_state()), Query(params)).await;
        let cities = cities.unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].name, "Denver");
        assert_eq!(cities[1].name, "Colorado Springs");
    }

    #[tokio::test]
    async fn unknown_state_returns_none() {
        let params = RankingParams { state: "AK".to_string() };
        let Json(cities) = ranking_handler(State(sample_state()), Query(params)).await;
        assert!(cities.is_none());
    }

    #[tokio::test]
    async fn nearest_finds_the_closest_ranked_city() {
        // Just south of Albuquerque.
        let params = NearestParams { lat: 34.9, lon: -106.6 };
        let Json(found) = nearest_handler(State(sample_state()), Query(params)).await;
        assert_eq!(found.unwrap().name, "Albuquerque");
    }

    #[tokio::test]
    async fn nearest_on_an_empty_ranking_returns_none() {
        let state = Arc::new(AppState::new(PerStateRanking::new()));
        let params = NearestParams { lat: 0.0, lon: 0.0 };
        let Json(found) = nearest_handler(State(state), Query(params)).await;
        assert!(found.is_none());
    }
}
