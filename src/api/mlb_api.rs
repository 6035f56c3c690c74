use crate::models::{
    Boxscore, CountryLeaders, Game, LeaderCategory, LeaderEntry, Person, PlayerProfile, Team,
};
use crate::utils::nationality::Country;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const MLB_API_BASE_URL: &str = "https://statsapi.mlb.com/api/v1";

const SCHEDULE_HYDRATE: &str =
    "team,linescore,decisions,probablePitcher(stats(group=[pitching],type=[season]))";

const PROFILE_HYDRATE: &str = "stats(group=[hitting,pitching],type=[season,career])";

/// Concurrent `/people/{id}` requests during a birth-country backfill
const BIRTH_COUNTRY_CONCURRENCY: usize = 8;

/// Leaders requested per category before filtering by country
const LEADERS_LIMIT: &str = "100";
pub const LEADERS_PER_CATEGORY: usize = 5;

/// (API key, label, abbreviation), in display order
pub const HITTING_LEADER_CATEGORIES: [(&str, &str, &str); 11] = [
    ("battingAverage", "Promedio de Bateo", "AVG"),
    ("onBasePercentage", "Porcentaje de Embasarse", "OBP"),
    ("sluggingPercentage", "Slugging", "SLG"),
    ("onBasePlusSlugging", "OPS", "OPS"),
    ("hits", "Hits", "H"),
    ("doubles", "Dobles", "2B"),
    ("triples", "Triples", "3B"),
    ("homeRuns", "Home Runs", "HR"),
    ("runs", "Carreras Anotadas", "R"),
    ("runsBattedIn", "Carreras Remolcadas", "RBI"),
    ("stolenBases", "Bases Robadas", "SB"),
];

pub const PITCHING_LEADER_CATEGORIES: [(&str, &str, &str); 10] = [
    ("wins", "Victorias", "W"),
    ("earnedRunAverage", "Efectividad", "ERA"),
    ("whip", "WHIP", "WHIP"),
    ("saves", "Juegos Salvados", "SV"),
    ("strikeOuts", "Ponches", "SO"),
    ("strikeoutsPer9Inn", "Ponches por 9 Innings", "K/9"),
    ("walks", "Bases por Bolas", "BB"),
    ("walksPer9Inn", "BB por cada 9 inning", "BB/9"),
    ("inningsPitched", "Entradas Lanzadas", "IP"),
    ("gamesPlayed", "Juegos Jugados", "G"),
];

#[derive(Debug, Default, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Debug, Default, Deserialize)]
struct ScheduleDate {
    #[serde(default)]
    games: Vec<Game>,
}

#[derive(Debug, Deserialize)]
struct PeopleResponse<T> {
    #[serde(default = "Vec::new")]
    people: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeadersResponse {
    #[serde(default)]
    league_leaders: Vec<LeadersCategoryResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeadersCategoryResponse {
    #[serde(default)]
    leader_category: String,
    #[serde(default)]
    leaders: Vec<LeaderResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct LeaderResponse {
    #[serde(default)]
    rank: u32,
    #[serde(default)]
    value: String,
    #[serde(default)]
    team: Team,
    #[serde(default)]
    person: Person,
}

/// Keep the first few leaders born in `country` for every category, in display order
fn country_leader_categories(
    response: LeadersResponse,
    categories: &[(&str, &str, &str)],
    country: Country,
) -> Vec<LeaderCategory> {
    let mut by_key: HashMap<String, Vec<LeaderResponse>> = response
        .league_leaders
        .into_iter()
        .map(|c| (c.leader_category, c.leaders))
        .collect();

    categories
        .iter()
        .map(|&(key, label, abbreviation)| {
            let leaders = by_key
                .remove(key)
                .unwrap_or_default()
                .into_iter()
                .filter(|l| {
                    l.person
                        .birth_country
                        .as_deref()
                        .is_some_and(|c| country.matches(c))
                })
                .take(LEADERS_PER_CATEGORY)
                .map(|l| LeaderEntry {
                    id: l.person.id,
                    name: l.person.full_name.unwrap_or_default(),
                    team_name: l.team.name,
                    value: l.value,
                    rank: l.rank,
                })
                .collect();

            LeaderCategory {
                key: key.to_string(),
                label: label.to_string(),
                abbreviation: abbreviation.to_string(),
                leaders,
            }
        })
        .collect()
}

/// Session-scoped birth-country lookups. Unbounded; a successful lookup
/// is cached even when the person has no country on file.
#[derive(Debug, Default)]
pub struct BirthCountryCache {
    entries: HashMap<u64, Option<String>>,
}

impl BirthCountryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player_id: u64) -> Option<&Option<String>> {
        self.entries.get(&player_id)
    }

    pub fn insert(&mut self, player_id: u64, birth_country: Option<String>) {
        self.entries.insert(player_id, birth_country);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy cached countries into the boxscore's players that lack one
    pub fn fill(&self, boxscore: &mut Boxscore) {
        for team in boxscore.sides_mut() {
            for player in team.players.values_mut() {
                if player.person.birth_country.is_none() {
                    if let Some(country) = self.get(player.person.id) {
                        player.person.birth_country = country.clone();
                    }
                }
            }
        }
    }
}

pub struct MlbStatsClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for MlbStatsClient {
    fn default() -> Self {
        Self::new(MLB_API_BASE_URL.to_string())
    }
}

impl MlbStatsClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", what))?;

        if !response.status().is_success() {
            anyhow::bail!("{} returned error: {}", what, response.status());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {}", what))
    }

    /// Fetch every game scheduled on `date`
    pub async fn fetch_schedule(&self, date: NaiveDate) -> Result<Vec<Game>> {
        let date = date.format("%Y-%m-%d").to_string();

        let schedule: ScheduleResponse = self
            .get_json(
                "/schedule",
                &[
                    ("sportId", "1"),
                    ("date", date.as_str()),
                    ("hydrate", SCHEDULE_HYDRATE),
                ],
                "MLB schedule",
            )
            .await?;

        Ok(schedule
            .dates
            .into_iter()
            .next()
            .map(|d| d.games)
            .unwrap_or_default())
    }

    /// Fetch the boxscore for a single game
    pub async fn fetch_boxscore(&self, game_pk: u64) -> Result<Boxscore> {
        self.get_json(
            &format!("/game/{}/boxscore", game_pk),
            &[("hydrate", "person")],
            &format!("boxscore for game {}", game_pk),
        )
        .await
    }

    /// Full profile with season and career hitting and pitching stats
    pub async fn fetch_player_profile(&self, player_id: u64) -> Result<Option<PlayerProfile>> {
        let people: PeopleResponse<PlayerProfile> = self
            .get_json(
                &format!("/people/{}", player_id),
                &[("hydrate", PROFILE_HYDRATE)],
                &format!("profile for player {}", player_id),
            )
            .await?;

        Ok(people.people.into_iter().next())
    }

    async fn fetch_person(&self, player_id: u64) -> Result<Option<Person>> {
        let people: PeopleResponse<Person> = self
            .get_json(
                &format!("/people/{}", player_id),
                &[],
                &format!("player {}", player_id),
            )
            .await?;

        Ok(people.people.into_iter().next())
    }

    async fn fetch_leader_group(
        &self,
        group: &str,
        categories: &[(&str, &str, &str)],
        season: &str,
        country: Country,
    ) -> Result<Vec<LeaderCategory>> {
        let keys: Vec<&str> = categories.iter().map(|(key, _, _)| *key).collect();
        let keys = keys.join(",");

        let response: LeadersResponse = self
            .get_json(
                "/stats/leaders",
                &[
                    ("leaderCategories", keys.as_str()),
                    ("statGroup", group),
                    ("limit", LEADERS_LIMIT),
                    ("season", season),
                    ("hydrate", "person"),
                ],
                &format!("{} leaders", group),
            )
            .await?;

        Ok(country_leader_categories(response, categories, country))
    }

    /// Top hitters and pitchers born in `country` for a season
    pub async fn fetch_leaders(&self, season: i32, country: Country) -> Result<CountryLeaders> {
        let season_param = season.to_string();

        let (hitting, pitching) = tokio::try_join!(
            self.fetch_leader_group("hitting", &HITTING_LEADER_CATEGORIES, &season_param, country),
            self.fetch_leader_group("pitching", &PITCHING_LEADER_CATEGORIES, &season_param, country),
        )?;

        Ok(CountryLeaders {
            season,
            country,
            hitting,
            pitching,
        })
    }

    /// Look up birth countries concurrently. Failed lookups are logged and left out.
    pub async fn fetch_birth_countries(&self, player_ids: Vec<u64>) -> Vec<(u64, Option<String>)> {
        stream::iter(player_ids)
            .map(|id| async move { (id, self.fetch_person(id).await) })
            .buffer_unordered(BIRTH_COUNTRY_CONCURRENCY)
            .filter_map(|(id, result)| async move {
                match result {
                    Ok(person) => Some((id, person.and_then(|p| p.birth_country))),
                    Err(e) => {
                        warn!("Birth country lookup failed: {:#}", e);
                        None
                    }
                }
            })
            .collect()
            .await
    }

    /// Fill in birth countries the boxscores did not include. The cache lock
    /// is only held to read and to record results, never across requests.
    pub async fn backfill_birth_countries(
        &self,
        mut boxscores: Vec<&mut Boxscore>,
        cache: &Mutex<BirthCountryCache>,
    ) {
        let missing: Vec<u64> = {
            let cache = cache.lock().await;
            boxscores
                .iter()
                .flat_map(|b| b.players_missing_birth_country())
                .filter(|id| cache.get(*id).is_none())
                .collect::<BTreeSet<u64>>()
                .into_iter()
                .collect()
        };

        if !missing.is_empty() {
            debug!(count = missing.len(), "Backfilling birth countries");
            let found = self.fetch_birth_countries(missing).await;

            let mut cache = cache.lock().await;
            for (id, birth_country) in found {
                cache.insert(id, birth_country);
            }
        }

        let cache = cache.lock().await;
        for boxscore in boxscores.iter_mut() {
            cache.fill(boxscore);
        }
    }
}
