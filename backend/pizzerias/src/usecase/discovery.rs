use crate::domain::geo::{
    haversine_miles, is_same_location, km_to_miles, BoundingBox, Coordinates,
};
use crate::domain::pizzeria::{NearbyPizzeria, Pizzeria};
use crate::usecase::contracts::{PizzeriaRepository, PlaceSearch};
use crate::usecase::error::UsecaseError;

pub const DEFAULT_MIN_CACHED_RESULTS: usize = 5;
pub const MAX_RADIUS_KM: f64 = 50.0;
/// Cap on cached rows read per lookup; the nearest rows are kept.
pub const CACHED_LOOKUP_LIMIT: i64 = 500;

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Below this many cached hits the place search API is consulted.
    pub min_cached_results: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            min_cached_results: DEFAULT_MIN_CACHED_RESULTS,
        }
    }
}

pub struct DiscoveryUseCase<P, S>
where
    P: PizzeriaRepository,
    S: PlaceSearch,
{
    pizzeria_repository: P,
    place_search: S,
    config: DiscoveryConfig,
}

impl<P, S> DiscoveryUseCase<P, S>
where
    P: PizzeriaRepository,
    S: PlaceSearch,
{
    pub fn new(pizzeria_repository: P, place_search: S, config: DiscoveryConfig) -> Self {
        Self {
            pizzeria_repository,
            place_search,
            config,
        }
    }

    /// Cached pizzerias near `center`, supplemented by the place search API
    /// when the cache is sparse. Collaborator failures degrade the result
    /// instead of failing the call.
    #[tracing::instrument(skip(self), fields(lat = center.latitude, lng = center.longitude, radius_km))]
    pub async fn discover_nearby(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<Vec<NearbyPizzeria>, UsecaseError> {
        tracing::debug!("discovering nearby pizzerias");

        if !center.is_valid() {
            return Err(UsecaseError::Validation("Invalid coordinates".to_string()));
        }
        if !radius_km.is_finite() || radius_km <= 0.0 || radius_km > MAX_RADIUS_KM {
            return Err(UsecaseError::Validation(format!(
                "Radius must be greater than 0 and at most {MAX_RADIUS_KM} km"
            )));
        }

        metrics::counter!("discovery_requests_total").increment(1);
        let radius_miles = km_to_miles(radius_km);

        let cached = self.cached_within(center, radius_miles).await;
        tracing::debug!(cached = cached.len(), "cache lookup finished");

        let mut merged = cached;
        if merged.len() < self.config.min_cached_results {
            metrics::counter!("discovery_api_supplements_total").increment(1);
            let fresh = self.fetch_new_places(center, radius_miles, &merged).await;
            self.cache_new_places(&fresh).await;
            merged.extend(fresh);
        }

        let mut results: Vec<NearbyPizzeria> = merged
            .into_iter()
            .map(|pizzeria| NearbyPizzeria {
                distance_miles: haversine_miles(center, pizzeria.coordinates()),
                pizzeria,
            })
            .collect();
        results.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));

        tracing::info!(count = results.len(), "nearby pizzerias discovered");
        Ok(results)
    }

    async fn cached_within(&self, center: Coordinates, radius_miles: f64) -> Vec<Pizzeria> {
        let bounds = BoundingBox::around(center, radius_miles);
        match self
            .pizzeria_repository
            .find_in_bounds(&bounds, center, CACHED_LOOKUP_LIMIT)
            .await
        {
            Ok(candidates) => candidates
                .into_iter()
                .filter(|p| haversine_miles(center, p.coordinates()) <= radius_miles)
                .collect(),
            Err(e) => {
                tracing::error!(error = %e, "cached pizzeria lookup failed, falling back to place search");
                vec![]
            }
        }
    }

    /// Place search results that are inside the radius and not already
    /// known, deduplicated among themselves as well.
    async fn fetch_new_places(
        &self,
        center: Coordinates,
        radius_miles: f64,
        known: &[Pizzeria],
    ) -> Vec<Pizzeria> {
        let places = match self.place_search.search_nearby(center, radius_miles).await {
            Ok(places) => places,
            Err(e) => {
                tracing::error!(error = %e, "place search failed, using cached results only");
                return vec![];
            }
        };

        let total = places.len();
        let mut fresh: Vec<Pizzeria> = Vec::new();
        for place in places {
            let location = place.coordinates();
            if haversine_miles(center, location) > radius_miles {
                continue;
            }
            let duplicate = known
                .iter()
                .chain(fresh.iter())
                .any(|p| is_same_location(p.coordinates(), location));
            if duplicate {
                continue;
            }
            fresh.push(Pizzeria::from_discovered(place));
        }

        tracing::debug!(total, fresh = fresh.len(), "place search results deduplicated");
        fresh
    }

    async fn cache_new_places(&self, fresh: &[Pizzeria]) {
        for pizzeria in fresh {
            match self.pizzeria_repository.create(pizzeria).await {
                Ok(()) => {
                    metrics::counter!("discovery_cached_writes_total").increment(1);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        external_id = ?pizzeria.external_id,
                        "failed to cache discovered pizzeria"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pizzeria::{sample_pizzeria, DiscoveredPlace};
    use crate::repository::errors::RepositoryError;
    use crate::usecase::contracts::{MockPizzeriaRepository, MockPlaceSearch};
    use crate::usecase::overpass::PlaceSearchError;

    const CENTER: Coordinates = Coordinates { latitude: 40.0, longitude: -74.0 };

    fn place(id: &str, latitude: f64, longitude: f64) -> DiscoveredPlace {
        DiscoveredPlace {
            external_id: id.to_string(),
            name: format!("Place {id}"),
            address: None,
            city: None,
            state: None,
            postal_code: None,
            latitude,
            longitude,
            phone: None,
            website: None,
            opening_hours: None,
        }
    }

    /// `count` cached pizzerias spread north of the center, ~0.7 miles apart.
    fn cached(count: usize) -> Vec<Pizzeria> {
        (0..count)
            .map(|i| sample_pizzeria(40.0 + 0.01 * (i as f64 + 1.0), -74.0))
            .collect()
    }

    #[tokio::test]
    async fn test_sparse_cache_triggers_place_search() {
        let mut repo = MockPizzeriaRepository::new();
        let mut search = MockPlaceSearch::new();
        let cached_rows = cached(3);

        repo.expect_find_in_bounds()
            .times(1)
            .returning(move |_, _, _| Ok(cached_rows.clone()));
        search
            .expect_search_nearby()
            .times(1)
            .returning(|_, _| Ok(vec![place("node/1", 40.0, -74.05)]));
        repo.expect_create().times(1).returning(|_| Ok(()));

        let usecase = DiscoveryUseCase::new(repo, search, DiscoveryConfig::default());
        let results = usecase.discover_nearby(CENTER, 15.0).await.unwrap();

        assert_eq!(results.len(), 4);
        assert!(results.iter().any(|r| r.pizzeria.external_id.as_deref() == Some("node/1")));
    }

    #[tokio::test]
    async fn test_full_cache_skips_place_search() {
        let mut repo = MockPizzeriaRepository::new();
        let mut search = MockPlaceSearch::new();
        let cached_rows = cached(6);

        repo.expect_find_in_bounds()
            .times(1)
            .returning(move |_, _, _| Ok(cached_rows.clone()));
        search.expect_search_nearby().times(0);
        repo.expect_create().times(0);

        let usecase = DiscoveryUseCase::new(repo, search, DiscoveryConfig::default());
        let results = usecase.discover_nearby(CENTER, 15.0).await.unwrap();

        assert_eq!(results.len(), 6);
    }

    #[tokio::test]
    async fn test_results_sorted_by_distance() {
        let mut repo = MockPizzeriaRepository::new();
        let mut search = MockPlaceSearch::new();
        let far = sample_pizzeria(40.05, -74.0);
        let near = sample_pizzeria(40.01, -74.0);
        let rows = vec![far, near];

        repo.expect_find_in_bounds()
            .returning(move |_, _, _| Ok(rows.clone()));
        search
            .expect_search_nearby()
            .returning(|_, _| Ok(vec![place("node/9", 40.03, -74.0)]));
        repo.expect_create().returning(|_| Ok(()));

        let usecase = DiscoveryUseCase::new(repo, search, DiscoveryConfig::default());
        let results = usecase.discover_nearby(CENTER, 15.0).await.unwrap();

        let distances: Vec<f64> = results.iter().map(|r| r.distance_miles).collect();
        assert_eq!(distances.len(), 3);
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert!((distances[0] - haversine_miles(CENTER, Coordinates::new(40.01, -74.0))).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_api_duplicates_of_cached_places_are_dropped() {
        let mut repo = MockPizzeriaRepository::new();
        let mut search = MockPlaceSearch::new();
        let existing = sample_pizzeria(40.01, -74.0);
        let existing_id = existing.id;
        let rows = vec![existing];

        repo.expect_find_in_bounds()
            .returning(move |_, _, _| Ok(rows.clone()));
        search.expect_search_nearby().returning(|_, _| {
            Ok(vec![
                // ~100 ft from the cached entry
                place("node/dup", 40.0103, -74.0),
                place("node/new", 40.02, -74.0),
                // ~50 ft from node/new
                place("node/dup2", 40.0201, -74.0),
            ])
        });
        repo.expect_create()
            .times(1)
            .withf(|p| p.external_id.as_deref() == Some("node/new"))
            .returning(|_| Ok(()));

        let usecase = DiscoveryUseCase::new(repo, search, DiscoveryConfig::default());
        let results = usecase.discover_nearby(CENTER, 15.0).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].pizzeria.id, existing_id);
        for (i, a) in results.iter().enumerate() {
            for b in results.iter().skip(i + 1) {
                assert!(!is_same_location(a.pizzeria.coordinates(), b.pizzeria.coordinates()));
            }
        }
    }

    #[tokio::test]
    async fn test_api_results_outside_radius_are_dropped() {
        let mut repo = MockPizzeriaRepository::new();
        let mut search = MockPlaceSearch::new();

        repo.expect_find_in_bounds().returning(|_, _, _| Ok(vec![]));
        search
            .expect_search_nearby()
            .returning(|_, _| Ok(vec![place("node/far", 41.0, -74.0)]));
        repo.expect_create().times(0);

        let usecase = DiscoveryUseCase::new(repo, search, DiscoveryConfig::default());
        let results = usecase.discover_nearby(CENTER, 5.0).await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_cache_failure_degrades_to_api_only() {
        let mut repo = MockPizzeriaRepository::new();
        let mut search = MockPlaceSearch::new();

        repo.expect_find_in_bounds()
            .returning(|_, _, _| {
                Err(RepositoryError::DatabaseError("connection refused".to_string()))
            });
        search
            .expect_search_nearby()
            .times(1)
            .returning(|_, _| Ok(vec![place("node/1", 40.01, -74.0)]));
        repo.expect_create().returning(|_| Ok(()));

        let usecase = DiscoveryUseCase::new(repo, search, DiscoveryConfig::default());
        let results = usecase.discover_nearby(CENTER, 15.0).await.unwrap();

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_api_failure_degrades_to_cache_only() {
        let mut repo = MockPizzeriaRepository::new();
        let mut search = MockPlaceSearch::new();
        let rows = cached(2);

        repo.expect_find_in_bounds()
            .returning(move |_, _, _| Ok(rows.clone()));
        search
            .expect_search_nearby()
            .returning(|_, _| Err(PlaceSearchError::Transport("timeout".to_string())));
        repo.expect_create().times(0);

        let usecase = DiscoveryUseCase::new(repo, search, DiscoveryConfig::default());
        let results = usecase.discover_nearby(CENTER, 15.0).await.unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_cache_write_failure_keeps_result() {
        let mut repo = MockPizzeriaRepository::new();
        let mut search = MockPlaceSearch::new();

        repo.expect_find_in_bounds().returning(|_, _, _| Ok(vec![]));
        search.expect_search_nearby().returning(|_, _| {
            Ok(vec![place("node/1", 40.01, -74.0), place("node/2", 40.02, -74.0)])
        });
        repo.expect_create()
            .times(2)
            .returning(|_| Err(RepositoryError::Conflict("duplicate external id".to_string())));

        let usecase = DiscoveryUseCase::new(repo, search, DiscoveryConfig::default());
        let results = usecase.discover_nearby(CENTER, 15.0).await.unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_cached_rows_outside_radius_are_filtered() {
        let mut repo = MockPizzeriaRepository::new();
        let search = MockPlaceSearch::new();
        // bounding box corner: inside the box, outside the circle
        let corner = sample_pizzeria(40.0 + 0.9 / 69.0, -74.0 + 0.9 / 52.8);
        let mut rows = cached(5);
        rows.push(corner);

        repo.expect_find_in_bounds()
            .returning(move |_, _, _| Ok(rows.clone()));

        let config = DiscoveryConfig { min_cached_results: 0 };
        let usecase = DiscoveryUseCase::new(repo, search, config);
        let results = usecase.discover_nearby(CENTER, 1.0 / 0.621_371).await.unwrap();

        assert!(results.iter().all(|r| r.distance_miles <= 1.0 + 1e-6));
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_larger_radius_never_returns_fewer_results() {
        let rows = cached(4);
        let mut previous = 0;
        for radius_km in [1.0, 2.0, 5.0, 10.0] {
            let mut repo = MockPizzeriaRepository::new();
            let search = MockPlaceSearch::new();
            let rows = rows.clone();
            repo.expect_find_in_bounds()
                .returning(move |_, _, _| Ok(rows.clone()));

            let config = DiscoveryConfig { min_cached_results: 0 };
            let usecase = DiscoveryUseCase::new(repo, search, config);
            let count = usecase.discover_nearby(CENTER, radius_km).await.unwrap().len();

            assert!(count >= previous);
            previous = count;
        }
        assert_eq!(previous, 4);
    }

    /// Mirrors the store: box filter, nearest first, truncated to `limit`.
    fn nearest_in_bounds(
        rows: &[Pizzeria],
        bounds: &BoundingBox,
        center: Coordinates,
        limit: i64,
    ) -> Vec<Pizzeria> {
        let mut hits: Vec<Pizzeria> = rows
            .iter()
            .filter(|p| {
                (bounds.min_latitude..=bounds.max_latitude).contains(&p.latitude)
                    && (bounds.min_longitude..=bounds.max_longitude).contains(&p.longitude)
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| {
            haversine_miles(center, a.coordinates()).total_cmp(&haversine_miles(center, b.coordinates()))
        });
        hits.truncate(limit as usize);
        hits
    }

    /// 900 pizzeria grid, ~0.14 miles apart, centred on `CENTER`.
    fn dense_grid() -> Vec<Pizzeria> {
        let mut rows = Vec::new();
        for i in 0..30 {
            for j in 0..30 {
                rows.push(sample_pizzeria(
                    40.0 + 0.002 * (i as f64 - 15.0),
                    -74.0 + 0.002 * (j as f64 - 15.0),
                ));
            }
        }
        rows
    }

    #[tokio::test]
    async fn test_dense_cache_keeps_nearest_and_stays_monotonic() {
        let rows = dense_grid();
        assert!(rows.len() as i64 > CACHED_LOOKUP_LIMIT);

        let mut previous = 0;
        for radius_km in [1.0, 3.0, 10.0, 25.0] {
            let mut repo = MockPizzeriaRepository::new();
            let search = MockPlaceSearch::new();
            let rows = rows.clone();
            repo.expect_find_in_bounds()
                .withf(|_, center, limit| *center == CENTER && *limit == CACHED_LOOKUP_LIMIT)
                .times(1)
                .returning(move |bounds, center, limit| {
                    Ok(nearest_in_bounds(&rows, bounds, center, limit))
                });

            let config = DiscoveryConfig { min_cached_results: 0 };
            let usecase = DiscoveryUseCase::new(repo, search, config);
            let results = usecase.discover_nearby(CENTER, radius_km).await.unwrap();

            assert!(results.len() >= previous);
            assert!(results[0].distance_miles < 1e-9);
            previous = results.len();
        }
        assert_eq!(previous as i64, CACHED_LOOKUP_LIMIT);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_any_call() {
        let repo = MockPizzeriaRepository::new();
        let search = MockPlaceSearch::new();
        let usecase = DiscoveryUseCase::new(repo, search, DiscoveryConfig::default());

        for radius in [0.0, -1.0, f64::NAN, MAX_RADIUS_KM + 1.0] {
            let result = usecase.discover_nearby(CENTER, radius).await;
            assert!(matches!(result, Err(UsecaseError::Validation(_))));
        }

        let result = usecase
            .discover_nearby(Coordinates::new(120.0, 0.0), 5.0)
            .await;
        assert!(matches!(result, Err(UsecaseError::Validation(_))));
    }
}
