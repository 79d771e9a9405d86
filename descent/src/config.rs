//! Parameters of a generation run.

use rand::Rng;
use rand::seq::IndexedRandom as _;

use descent_base::math::GridVector;

use crate::template::TemplateId;

/// Largest separation margin accepted on any axis.
const MAX_SEPARATION: u32 = 1 << 20;

/// Everything that determines a dungeon, apart from the templates themselves and the
/// random seed.
///
/// This is normally deserialized from JSON:
///
/// ```
/// # extern crate descent;
/// # extern crate serde_json;
/// let config: descent::GenerationConfig = serde_json::from_str(r#"{
///     "starts": [{ "id": "start" }],
///     "ends": [{ "id": "end" }],
///     "rooms": [{ "id": "vault", "weight": 1 }, { "id": "cellar", "weight": 3 }],
///     "paths": ["hall", "stairs"],
///     "numberOfRooms": 6,
///     "minSeparation": [4, 2, 4]
/// }"#).unwrap();
/// assert_eq!(config.back_edge_chance, 0.1);
/// config.validate().unwrap();
/// ```
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Templates the first room is chosen from.
    pub starts: Vec<PoolEntry>,
    /// Templates the last room is chosen from.
    pub ends: Vec<PoolEntry>,
    /// Templates the other rooms are chosen from.
    pub rooms: Vec<PoolEntry>,
    /// Templates corridors are built from. May be empty, in which case only rooms
    /// whose openings already face each other can be joined.
    #[serde(default)]
    pub paths: Vec<TemplateId>,
    /// Total number of rooms, including the start and end rooms.
    pub number_of_rooms: u32,
    /// Least distance kept between any two rooms, per axis.
    pub min_separation: [u32; 3],
    /// Probability that each candidate connection left out of the spanning tree is
    /// added back, creating a loop.
    #[serde(default = "default_back_edge_chance")]
    pub back_edge_chance: f64,
    /// Whether middle rooms are turned by a random multiple of a quarter turn about
    /// the vertical axis.
    #[serde(default)]
    pub rotate_rooms: bool,
    /// Limit on room separation sweeps.
    #[serde(default = "default_max_steering_iterations")]
    pub max_steering_iterations: u32,
    /// Limit on search expansions for each corridor.
    #[serde(default = "default_max_search_expansions")]
    pub max_search_expansions: u32,
    /// Number of times the whole layout is placed before giving up when a corridor
    /// cannot be found.
    #[serde(default = "default_placement_attempts")]
    pub placement_attempts: u32,
    /// Number of pairs of openings tried for each connection before the layout is
    /// considered unsolvable.
    #[serde(default = "default_opening_attempts")]
    pub opening_attempts: u32,
}

fn default_back_edge_chance() -> f64 {
    0.1
}
fn default_max_steering_iterations() -> u32 {
    10_000
}
fn default_max_search_expansions() -> u32 {
    crate::pathfind::DEFAULT_MAX_EXPANSIONS
}
fn default_placement_attempts() -> u32 {
    3
}
fn default_opening_attempts() -> u32 {
    4
}

impl GenerationConfig {
    /// Constructs a configuration with one template per pool and default tuning.
    pub fn new(
        start: impl Into<TemplateId>,
        end: impl Into<TemplateId>,
        rooms: impl IntoIterator<Item = TemplateId>,
        paths: impl IntoIterator<Item = TemplateId>,
        number_of_rooms: u32,
        min_separation: [u32; 3],
    ) -> Self {
        Self {
            starts: vec![PoolEntry::new(start)],
            ends: vec![PoolEntry::new(end)],
            rooms: rooms.into_iter().map(PoolEntry::new).collect(),
            paths: paths.into_iter().collect(),
            number_of_rooms,
            min_separation,
            back_edge_chance: default_back_edge_chance(),
            rotate_rooms: false,
            max_steering_iterations: default_max_steering_iterations(),
            max_search_expansions: default_max_search_expansions(),
            placement_attempts: default_placement_attempts(),
            opening_attempts: default_opening_attempts(),
        }
    }

    /// Checks that the configuration describes a possible dungeon.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.number_of_rooms < 2 {
            return Err(ConfigError::TooFewRooms(self.number_of_rooms));
        }
        for (name, pool) in [
            ("starts", &self.starts),
            ("ends", &self.ends),
            ("rooms", &self.rooms),
        ] {
            // The middle pool is only drawn from when there are middle rooms.
            if name == "rooms" && self.number_of_rooms == 2 {
                continue;
            }
            if pool.iter().all(|entry| entry.weight == 0) {
                return Err(ConfigError::EmptyPool(name));
            }
        }
        if !(0.0..=1.0).contains(&self.back_edge_chance) {
            return Err(ConfigError::BackEdgeChance(self.back_edge_chance));
        }
        for (name, value) in [
            ("maxSteeringIterations", self.max_steering_iterations),
            ("maxSearchExpansions", self.max_search_expansions),
            ("placementAttempts", self.placement_attempts),
            ("openingAttempts", self.opening_attempts),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroBudget(name));
            }
        }
        if let Some(&margin) = self.min_separation.iter().find(|&&m| m > MAX_SEPARATION) {
            return Err(ConfigError::SeparationTooLarge(margin));
        }
        Ok(())
    }

    /// [`Self::min_separation`] as a vector.
    pub fn separation(&self) -> GridVector {
        GridVector::from(self.min_separation.map(|m| m.min(MAX_SEPARATION).cast_signed()))
    }
}

/// A template in a weighted pool.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PoolEntry {
    /// The template.
    pub id: TemplateId,
    /// Relative likelihood of this entry being chosen.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl PoolEntry {
    /// Constructs an entry with weight 1.
    pub fn new(id: impl Into<TemplateId>) -> Self {
        Self {
            id: id.into(),
            weight: default_weight(),
        }
    }
}

/// Picks a template from a weighted pool, or [`None`] if no entry has positive weight.
pub(crate) fn choose_from<'p, R: Rng + ?Sized>(
    pool: &'p [PoolEntry],
    rng: &mut R,
) -> Option<&'p TemplateId> {
    pool.choose_weighted(rng, |entry| entry.weight)
        .ok()
        .map(|entry| &entry.id)
}

/// Ways a [`GenerationConfig`] can be unusable.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Fewer than two rooms were requested.
    #[error("at least 2 rooms are required (the start and the end), but {0} were requested")]
    TooFewRooms(u32),
    /// A pool has no entries with positive weight.
    #[error("the {0} pool has no templates with positive weight")]
    EmptyPool(&'static str),
    /// The back-edge probability is not a probability.
    #[error("back edge chance must be between 0 and 1, but was {0}")]
    BackEdgeChance(f64),
    /// A limit that must be positive is zero.
    #[error("{0} must be at least 1")]
    ZeroBudget(&'static str),
    /// A separation margin is unreasonably large.
    #[error("minimum separation {0} is too large")]
    SeparationTooLarge(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng as _;
    use rand_xoshiro::Xoshiro256Plus;

    fn config() -> GenerationConfig {
        GenerationConfig::new(
            "start",
            "end",
            ["room".into()],
            ["hall".into()],
            4,
            [2, 1, 2],
        )
    }

    #[test]
    fn defaults_from_json() {
        let parsed: GenerationConfig = serde_json::from_str(
            r#"{
                "starts": [{ "id": "start" }],
                "ends": [{ "id": "end" }],
                "rooms": [{ "id": "room" }],
                "paths": ["hall"],
                "numberOfRooms": 4,
                "minSeparation": [2, 1, 2]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed, config());
    }

    #[test]
    fn json_round_trip_uses_camel_case() {
        let json = serde_json::to_value(config()).unwrap();
        assert_eq!(json["numberOfRooms"], 4);
        assert_eq!(json["maxSearchExpansions"], 20_000);
        assert_eq!(json["starts"][0]["weight"], 1);
    }

    #[test]
    fn valid() {
        assert_eq!(config().validate(), Ok(()));
        assert_eq!(config().separation(), GridVector::new(2, 1, 2));
    }

    #[test]
    fn too_few_rooms() {
        let mut c = config();
        c.number_of_rooms = 1;
        assert_eq!(c.validate(), Err(ConfigError::TooFewRooms(1)));
    }

    #[test]
    fn empty_pools() {
        let mut c = config();
        c.ends.clear();
        assert_eq!(c.validate(), Err(ConfigError::EmptyPool("ends")));

        let mut c = config();
        c.rooms[0].weight = 0;
        assert_eq!(c.validate(), Err(ConfigError::EmptyPool("rooms")));
        c.number_of_rooms = 2;
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn bad_chance_and_budgets() {
        let mut c = config();
        c.back_edge_chance = 1.5;
        assert_eq!(c.validate(), Err(ConfigError::BackEdgeChance(1.5)));

        let mut c = config();
        c.opening_attempts = 0;
        assert_eq!(c.validate(), Err(ConfigError::ZeroBudget("openingAttempts")));

        let mut c = config();
        c.min_separation = [0, u32::MAX, 0];
        assert_eq!(
            c.validate(),
            Err(ConfigError::SeparationTooLarge(u32::MAX))
        );
    }

    #[test]
    fn weighted_choice_skips_zero_weight() {
        let pool = [
            PoolEntry {
                id: "never".into(),
                weight: 0,
            },
            PoolEntry::new("always"),
        ];
        let mut rng = Xoshiro256Plus::seed_from_u64(9);
        for _ in 0..20 {
            assert_eq!(choose_from(&pool, &mut rng).unwrap().as_str(), "always");
        }
        assert_eq!(choose_from(&pool[..1], &mut rng), None);
        assert_eq!(choose_from(&[], &mut rng), None);
    }
}
