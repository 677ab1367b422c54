use crate::cli::{FetchArgs, FetchCommand};
use anyhow::{Context as _, Result};
use plat_api::{BoundaryLayer, HttpBackend, HttpConfig, LatLng, MapBackend, PinId};
use serde::Serialize;

pub async fn handle(args: FetchArgs) -> Result<()> {
    let config = HttpConfig::new(&args.base_url)
        .with_context(|| format!("invalid base url '{}'", args.base_url))?;
    tracing::debug!(base_url = %config.base_url, "using platform backend");
    let backend = HttpBackend::new(config)?;

    match args.command {
        FetchCommand::Pin { id } => {
            let summary = backend.fetch_pin(&PinId::new(id)).await?;
            print_json(&summary)
        },
        FetchCommand::Boundary { layer, entity_id } => {
            let layer = BoundaryLayer::from_slug(&layer)
                .with_context(|| format!("unknown boundary layer '{layer}'"))?;
            let detail = backend.resolve_boundary(layer, &entity_id).await?;
            print_json(&detail)
        },
        FetchCommand::Geocode { lat, lng } => {
            match backend.reverse_geocode(LatLng::new(lat, lng)).await? {
                Some(label) => println!("{label}"),
                None => println!("null"),
            }
            Ok(())
        },
    }
}

fn print_json<T: Serialize>(value: &Option<T>) -> Result<()> {
    match value {
        Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
        None => println!("null"),
    }
    Ok(())
}
