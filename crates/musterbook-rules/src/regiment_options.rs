use std::collections::HashSet;

use musterbook_core::{BattleProfile, FactionCatalog, Regiment, RegimentOption, UnitCategory};

use crate::errors::{RuleKind, ViolationReport};

/// Check that each follower is admitted by one of the leader's regiment options
/// and that capped options are not exceeded.
///
/// Units or leaders missing from the catalog are skipped; they are reported by
/// the catalog presence rule.
pub fn check_regiment_options(
    regiment: &Regiment,
    catalog: &FactionCatalog,
    report: &mut ViolationReport,
) {
    let Some(leader) = regiment.assigned_leader() else {
        return;
    };
    let Some(leader_profile) = catalog.profile(&leader.name) else {
        return;
    };
    let options = &leader_profile.regiment_options;

    let followers: Vec<(&str, &BattleProfile)> = regiment
        .followers
        .iter()
        .filter_map(|follower| {
            catalog
                .profile(&follower.name)
                .map(|profile| (follower.name.as_str(), profile))
        })
        .collect();

    for (name, profile) in &followers {
        if profile.is_hero() {
            if !options.iter().any(|option| admits_hero(option, name, profile)) {
                report.push(
                    RuleKind::RegimentOptions,
                    format!("{name} is a Hero and cannot join {}'s regiment", leader.name),
                );
            }
        } else if !options
            .iter()
            .any(|option| matches_option(&option.name, name, profile))
        {
            report.push(
                RuleKind::RegimentOptions,
                format!("{name} cannot join {}'s regiment", leader.name),
            );
        }
    }

    for option in options {
        let Some(max) = option.max else {
            continue;
        };
        let tagged = followers
            .iter()
            .filter(|(_, profile)| has_tag(profile, &option.name))
            .count();
        if tagged > max as usize {
            report.push(
                RuleKind::RegimentOptions,
                format!(
                    "{}'s regiment may include at most {} {} ({} present)",
                    leader.name, max, option.name, tagged
                ),
            );
        }
    }

    for option in options {
        let Some(max) = option.max.filter(|max| *max > 0) else {
            continue;
        };
        let matching = followers
            .iter()
            .filter(|(name, profile)| matches_option(&option.name, name, profile))
            .count();
        if matching > max as usize {
            report.push(
                RuleKind::RegimentOptions,
                format!(
                    "{}'s regiment may include at most {} units matching {} ({} present)",
                    leader.name, max, option.name, matching
                ),
            );
        }
    }
}

/// Heroes join only through an option naming one of their regiment tags or
/// the unit itself.
fn admits_hero(option: &RegimentOption, unit_name: &str, profile: &BattleProfile) -> bool {
    has_tag(profile, &option.name) || option.name.trim().eq_ignore_ascii_case(unit_name.trim())
}

fn has_tag(profile: &BattleProfile, option_name: &str) -> bool {
    profile
        .regiment_tags
        .iter()
        .any(|tag| tag.trim().eq_ignore_ascii_case(option_name.trim()))
}

/// Whether a follower falls under a regiment option.
///
/// Matches on unit name containment, category containment, or keywords. A
/// multi-word option only matches by keywords when every word appears among
/// the follower's keyword words.
pub fn matches_option(option_name: &str, unit_name: &str, profile: &BattleProfile) -> bool {
    let option = option_name.trim().to_lowercase();
    if option.is_empty() {
        return false;
    }

    let name = unit_name.trim().to_lowercase();
    if !name.is_empty() && (name.contains(&option) || option.contains(&name)) {
        return true;
    }

    if profile.category != UnitCategory::Other {
        let category = profile.category.label();
        if option.contains(category) || category.contains(option.as_str()) {
            return true;
        }
    }

    let words: Vec<&str> = option.split_whitespace().collect();
    if words.len() > 1 {
        let keyword_words: HashSet<String> = profile
            .keywords
            .iter()
            .flat_map(|keyword| {
                keyword
                    .to_lowercase()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        return words.iter().all(|word| keyword_words.contains(*word));
    }

    profile
        .keywords
        .iter()
        .any(|keyword| keyword.to_lowercase().contains(&option))
}
