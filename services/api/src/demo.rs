use crate::infra::{demo_graph, load_graph, parse_locale, parse_view, InMemoryEntityStore};
use chrono_tz::Tz;
use clap::{Args, Subcommand};
use saskatoon::config::AppConfig;
use saskatoon::error::AppError;
use saskatoon::harvest::projection::{HarvestProjection, PropertyProjection};
use saskatoon::harvest::{
    ActorId, AuthUserId, DisplayClock, HarvestId, Locale, ProjectionService,
    ProjectionServiceError, PropertyId, ViewMode,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ProjectArgs {
    /// View mode: full, list, or owner. Collections default to list, single entities to full.
    #[arg(long, value_parser = parse_view)]
    pub(crate) view: Option<ViewMode>,
    /// Language for localized fields (fr or en). Defaults to SASKATOON_LANGUAGE.
    #[arg(long, value_parser = parse_locale)]
    pub(crate) lang: Option<Locale>,
    /// Snapshot document to project instead of SASKATOON_SEED_PATH
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) target: ProjectTarget,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ProjectTarget {
    /// One property, or the whole directory when no id is given
    Property { id: Option<u64> },
    /// One harvest, or the whole calendar when no id is given
    Harvest { id: Option<u64> },
    /// Actor record with its person or organization side
    Actor { id: u64 },
    /// Owner card for an actor
    Owner { id: u64 },
    Person { id: u64 },
    Organization { id: u64 },
    /// Every equipment item with its owner
    Equipment,
    /// One community account, or all of them when no id is given
    Community { id: Option<u64> },
    /// Participation requests, optionally for one harvest
    Participations {
        #[arg(long)]
        harvest: Option<u64>,
    },
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// IANA time zone harvest schedules are rendered in
    #[arg(long, default_value = "America/Montreal", value_parser = parse_time_zone)]
    pub(crate) time_zone: Tz,
    /// Language for localized fields (fr or en)
    #[arg(long, default_value = "fr", value_parser = parse_locale)]
    pub(crate) lang: Locale,
    /// Print the full detail payload of the first harvest
    #[arg(long)]
    pub(crate) show_detail: bool,
}

fn parse_time_zone(raw: &str) -> Result<Tz, String> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|err| format!("unknown time zone '{raw}' ({err})"))
}

pub(crate) fn run_projection(args: ProjectArgs) -> Result<(), AppError> {
    let ProjectArgs {
        view,
        lang,
        seed,
        target,
    } = args;

    let config = AppConfig::load()?;
    let seed = seed.or(config.seed_path);
    let graph = load_graph(seed.as_deref())?;
    let service = ProjectionService::new(
        Arc::new(InMemoryEntityStore::new(graph)),
        DisplayClock::new(config.display.time_zone),
        config.display.default_locale,
    );

    let detail = view.unwrap_or(ViewMode::Full);
    let collection = view.unwrap_or(ViewMode::List);

    match target {
        ProjectTarget::Property { id: Some(id) } => {
            print_json(service.property(PropertyId(id), detail, lang))
        }
        ProjectTarget::Property { id: None } => print_json(service.properties(collection, lang)),
        ProjectTarget::Harvest { id: Some(id) } => {
            print_json(service.harvest(HarvestId(id), detail, lang))
        }
        ProjectTarget::Harvest { id: None } => print_json(service.harvests(collection, lang)),
        ProjectTarget::Actor { id } => print_json(service.actor(ActorId(id), lang)),
        ProjectTarget::Owner { id } => print_json(service.owner(ActorId(id))),
        ProjectTarget::Person { id } => print_json(service.person(ActorId(id))),
        ProjectTarget::Organization { id } => {
            print_json(service.organization(ActorId(id), lang))
        }
        ProjectTarget::Equipment => print_json(service.equipment(lang)),
        ProjectTarget::Community { id: Some(id) } => {
            print_json(service.community_member(AuthUserId(id)))
        }
        ProjectTarget::Community { id: None } => print_json(service.community()),
        ProjectTarget::Participations { harvest } => {
            print_json(service.participation_requests(harvest.map(HarvestId)))
        }
    }
}

fn print_json<T: Serialize>(result: Result<T, ProjectionServiceError>) -> Result<(), AppError> {
    let view = result?;
    let json = serde_json::to_string_pretty(&view)?;
    println!("{json}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        time_zone,
        lang,
        show_detail,
    } = args;

    let graph = demo_graph()?;
    let organizations: Vec<ActorId> = graph.organizations().map(|org| org.actor_id).collect();
    let service = ProjectionService::new(
        Arc::new(InMemoryEntityStore::new(graph)),
        DisplayClock::new(time_zone),
        lang,
    );

    println!("Saskatoon projection demo ({time_zone}, {lang})");

    println!("\nProperty directory");
    for row in service.properties(ViewMode::List, None)? {
        let PropertyProjection::List(row) = row else {
            continue;
        };
        let trees = row
            .trees
            .iter()
            .map(|tree| tree.fruit_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let last = row
            .last_succeeded_harvest_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "- #{} {} [{}] trees: {} | last successful harvest: {} | {} harvest(s)",
            row.id,
            row.title,
            row.neighborhood.as_deref().unwrap_or("no neighborhood"),
            if trees.is_empty() { "none" } else { trees.as_str() },
            last,
            row.harvests.len()
        );
    }

    println!("\nHarvest calendar");
    for entry in service.harvests(ViewMode::List, None)? {
        let HarvestProjection::List(entry) = entry else {
            continue;
        };
        let leader = entry
            .pick_leader
            .as_ref()
            .map(|leader| leader.name.as_str())
            .unwrap_or("no pick leader");
        println!(
            "- {} {}-{} {} at {} ({})",
            entry.start_date, entry.start_time, entry.end_time, entry.status, entry.property, leader
        );
    }

    println!("\nEquipment points");
    for id in organizations {
        let organization = service.organization(id, None)?;
        println!("- {} ({})", organization.civil_name, id);
        for (locale, inventory) in &organization.inventory {
            let inventory = if inventory.is_empty() {
                "no equipment"
            } else {
                inventory.as_str()
            };
            println!("  {locale}: {inventory}");
        }
    }

    println!("\nCommunity");
    for member in service.community()? {
        let name = member
            .person
            .as_ref()
            .map(|person| person.name.clone())
            .unwrap_or_else(|| member.email.clone());
        println!("- {} [{}]", name, member.roles.join(", "));
    }

    if show_detail {
        if let Some(first) = service.harvests(ViewMode::Full, None)?.into_iter().next() {
            match serde_json::to_string_pretty(&first) {
                Ok(json) => println!("\nHarvest detail payload:\n{json}"),
                Err(err) => println!("\nHarvest detail payload unavailable: {err}"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_against_bundled_snapshot() {
        let args = DemoArgs {
            time_zone: chrono_tz::America::Montreal,
            lang: Locale::En,
            show_detail: true,
        };
        run_demo(args).expect("demo completes");
    }

    #[test]
    fn unrenderable_projection_is_an_error() {
        let mut keyed = std::collections::BTreeMap::new();
        keyed.insert((1u8, 2u8), "non-string map key");

        let err = print_json(Ok(keyed)).expect_err("json rejects tuple keys");
        assert!(matches!(err, AppError::Render(_)));
    }

    #[test]
    fn missing_projection_is_propagated() {
        let err = print_json::<()>(Err(ProjectionServiceError::NotFound {
            kind: "harvest",
            id: 9,
        }))
        .expect_err("not found");
        assert!(matches!(err, AppError::Projection(_)));
    }

    #[test]
    fn time_zone_parser_rejects_unknown_zones() {
        assert_eq!(
            parse_time_zone("America/Toronto"),
            Ok(chrono_tz::America::Toronto)
        );
        assert!(parse_time_zone("Mars/Olympus").is_err());
    }
}
