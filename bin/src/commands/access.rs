use crate::cli::AccessArgs;
use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use plat::{evaluate, resolve_role, CollabAction, ViewAsRole};
use plat_api::{Actor, MapConfig, MembershipRecord, MembershipRole, PlanLevel};
use std::fs;

pub fn handle(args: AccessArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.map)
        .with_context(|| format!("reading map config {}", args.map.display()))?;
    let map: MapConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parsing map config {}", args.map.display()))?;

    let action = CollabAction::from_slug(&args.action)
        .with_context(|| format!("unknown action '{}'", args.action))?;
    let plan =
        PlanLevel::from_slug(&args.plan).with_context(|| format!("unknown plan '{}'", args.plan))?;

    let mut actor = Actor::new(args.account.as_str(), plan);
    actor.subscription_active = !args.inactive;

    let membership = args
        .member_role
        .as_deref()
        .map(parse_membership_role)
        .transpose()?
        .map(|role| MembershipRecord {
            role,
            joined_at: Utc::now(),
        });

    let view_as = match args.view_as.as_deref() {
        Some(slug) => ViewAsRole::from_slug(slug)
            .with_context(|| format!("unknown view-as role '{slug}'"))?,
        None => ViewAsRole::default(),
    };

    let flags = resolve_role(
        membership.as_ref(),
        &actor.account_id,
        &map.owner_account_id,
        view_as,
    );
    let decision = evaluate(action, &map, actor.effective_plan(), flags);

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

fn parse_membership_role(slug: &str) -> Result<MembershipRole> {
    match slug {
        "owner" => Ok(MembershipRole::Owner),
        "manager" => Ok(MembershipRole::Manager),
        "editor" => Ok(MembershipRole::Editor),
        _ => bail!("unknown membership role '{slug}'"),
    }
}
