//! Mirror of the search state in shareable URL parameters.
//!
//! `q`, `types` and `generations` are comma separated, stat bounds use
//! `min_<stat>` / `max_<stat>` with the upstream stat name, and `offset` is
//! only written when non-zero.

use crate::errors::QueryStringError;
use crate::search::filters::SearchFilters;
use schema::{PokemonType, StatKind};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;
use url::form_urlencoded;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub filters: SearchFilters,
    pub offset: usize,
}

impl SearchParams {
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());

        let query = self.query.trim();
        if !query.is_empty() {
            out.append_pair("q", query);
        }
        if !self.filters.types.is_empty() {
            let types: Vec<&str> = self.filters.types.iter().map(|t| t.name()).collect();
            out.append_pair("types", &types.join(","));
        }
        if !self.filters.generations.is_empty() {
            let generations: Vec<String> =
                self.filters.generations.iter().map(u8::to_string).collect();
            out.append_pair("generations", &generations.join(","));
        }
        for (stat, value) in &self.filters.min_stats {
            out.append_pair(&format!("min_{}", stat.api_name()), &value.to_string());
        }
        for (stat, value) in &self.filters.max_stats {
            out.append_pair(&format!("max_{}", stat.api_name()), &value.to_string());
        }
        if self.offset > 0 {
            out.append_pair("offset", &self.offset.to_string());
        }

        out.finish()
    }

    /// `/search`, with the query string appended when there is one.
    pub fn to_url_path(&self) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            "/search".to_string()
        } else {
            format!("/search?{query}")
        }
    }

    /// Parse parameters written by [`to_query_string`](Self::to_query_string).
    /// A leading `?` is accepted, unrecognised parameters are ignored.
    pub fn from_query_string(input: &str) -> Result<Self, QueryStringError> {
        let input = input.strip_prefix('?').unwrap_or(input);
        let mut params = SearchParams::default();

        for (name, value) in form_urlencoded::parse(input.as_bytes()) {
            match name.as_ref() {
                "q" => params.query = value.trim().to_string(),
                "types" => params.filters.types = parse_types(&value),
                "generations" => {
                    params.filters.generations = split_list(&value)
                        .map(|g| parse_number(&name, g))
                        .collect::<Result<_, _>>()?;
                }
                "offset" => params.offset = parse_number(&name, &value)?,
                other => {
                    if let Some(stat) = other.strip_prefix("min_") {
                        insert_bound(&mut params.filters.min_stats, other, stat, &value)?;
                    } else if let Some(stat) = other.strip_prefix("max_") {
                        insert_bound(&mut params.filters.max_stats, other, stat, &value)?;
                    } else {
                        debug!(param = other, "ignoring unknown search parameter");
                    }
                }
            }
        }

        Ok(params)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|part| !part.is_empty())
}

fn parse_types(value: &str) -> Vec<PokemonType> {
    split_list(value)
        .filter_map(|name| match name.parse::<PokemonType>() {
            Ok(PokemonType::Typeless) | Err(_) => {
                debug!(name, "skipping unknown type in search parameters");
                None
            }
            Ok(pokemon_type) => Some(pokemon_type),
        })
        .collect()
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> Result<T, QueryStringError> {
    value
        .trim()
        .parse()
        .map_err(|_| QueryStringError::NotANumber {
            name: name.to_string(),
            value: value.to_string(),
        })
}

fn insert_bound(
    bounds: &mut BTreeMap<StatKind, u32>,
    param: &str,
    stat: &str,
    value: &str,
) -> Result<(), QueryStringError> {
    let stat = stat
        .parse::<StatKind>()
        .map_err(|_| QueryStringError::UnknownStat(param.to_string()))?;
    bounds.insert(stat, parse_number(param, value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::filters::StatBound;
    use pretty_assertions::assert_eq;

    fn fire_fast_params() -> SearchParams {
        let mut filters = SearchFilters::default();
        filters.toggle_type(PokemonType::Fire);
        filters.toggle_type(PokemonType::Dragon);
        filters.toggle_generation(1);
        filters.set_stat_bound(StatKind::Speed, StatBound::Min, 90);
        filters.set_stat_bound(StatKind::SpecialAttack, StatBound::Max, 150);
        SearchParams {
            query: String::new(),
            filters,
            offset: 40,
        }
    }

    #[test]
    fn test_empty_params_write_nothing() {
        let params = SearchParams::default();
        assert_eq!(params.to_query_string(), "");
        assert_eq!(params.to_url_path(), "/search");
    }

    #[test]
    fn test_filters_are_written_as_named_parameters() {
        assert_eq!(
            fire_fast_params().to_query_string(),
            "types=fire%2Cdragon&generations=1&min_speed=90&max_special-attack=150&offset=40"
        );
    }

    #[test]
    fn test_query_is_encoded_and_read_back() {
        let params = SearchParams {
            query: "mr. mime".to_string(),
            ..SearchParams::default()
        };
        let encoded = params.to_query_string();
        assert_eq!(encoded, "q=mr.+mime");
        assert_eq!(SearchParams::from_query_string(&encoded).unwrap(), params);
    }

    #[test]
    fn test_written_filters_parse_back_unchanged() {
        let params = fire_fast_params();
        let path = params.to_url_path();
        let query = path.trim_start_matches("/search");
        assert_eq!(SearchParams::from_query_string(query).unwrap(), params);
    }

    #[test]
    fn test_unencoded_commas_and_unknown_types() {
        let params = SearchParams::from_query_string("?types=water,,shadow,ICE&q=lap").unwrap();
        assert_eq!(params.filters.types, vec![PokemonType::Water, PokemonType::Ice]);
        assert_eq!(params.query, "lap");
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_malformed_numbers_are_errors() {
        assert_eq!(
            SearchParams::from_query_string("offset=ten"),
            Err(QueryStringError::NotANumber {
                name: "offset".to_string(),
                value: "ten".to_string()
            })
        );
        assert!(SearchParams::from_query_string("min_speed=fast").is_err());
        assert_eq!(
            SearchParams::from_query_string("min_luck=10"),
            Err(QueryStringError::UnknownStat("min_luck".to_string()))
        );
    }
}
