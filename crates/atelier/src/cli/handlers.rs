//! Command handlers.

use super::commands::Commands;
use atelier::{
    Asset, AssetError, AssetErrorKind, AssetId, AssetKind, Atelier, AtelierResult, Entity, Image,
    JsonError, Sanitised,
};
use serde_json::{Value, json};
use std::path::Path;

/// Execute one command against the configured stores.
pub async fn run_command(atelier: &Atelier, command: Commands) -> AtelierResult<()> {
    match command {
        Commands::Ingest {
            source,
            image,
            name,
            transport,
        } => {
            let out = if image {
                ingest_image(atelier, &source, name.as_deref(), transport.as_deref()).await?
            } else {
                ingest_file(atelier, &source, name.as_deref(), transport.as_deref()).await?
            };
            print_json(Value::Object(out))
        }

        Commands::Thumb {
            id,
            variant,
            width,
            height,
            exact,
        } => {
            let mut image: Image = atelier.assets().load(parse_id(&id)?).await?;
            let mut handle = atelier.images().thumb(&image, &variant).await?;
            if exact {
                handle.resize_exact(width, height);
            } else {
                handle.thumbnail(width, height);
            }
            handle.commit(&mut image).await?;
            print_json(Value::Object(atelier.images().sanitise(&image).await?))
        }

        Commands::Url { id, variant } => {
            let image: Image = atelier.assets().load(parse_id(&id)?).await?;
            let url = match variant {
                Some(variant) => atelier.images().registered_url(&image, &variant).await?,
                None => atelier.images().url(&image, None).await?,
            };
            println!("{}", url);
            Ok(())
        }

        Commands::Show { id, fields } => {
            let id = parse_id(&id)?;
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            let out = match atelier.assets().kind_of(id).await? {
                AssetKind::Image => {
                    let image: Image = atelier.assets().load(id).await?;
                    if fields.is_empty() {
                        atelier.images().sanitise(&image).await?
                    } else {
                        atelier.images().sanitise_fields(&image, &fields)?
                    }
                }
                AssetKind::File => {
                    let asset: Asset = atelier.assets().load(id).await?;
                    if fields.is_empty() {
                        atelier.assets().sanitise(&asset).await?
                    } else {
                        atelier.assets().sanitise_fields(&asset, &fields)?
                    }
                }
            };
            print_json(Value::Object(out))
        }

        Commands::Remove { id } => {
            let id = parse_id(&id)?;
            let report = match atelier.assets().kind_of(id).await? {
                AssetKind::Image => {
                    let image: Image = atelier.assets().load(id).await?;
                    atelier.images().remove(&image).await?
                }
                AssetKind::File => {
                    let asset: Asset = atelier.assets().load(id).await?;
                    atelier.assets().remove(&asset).await?
                }
            };
            let failures: Vec<Value> = report
                .failures()
                .map(|o| json!({ "target": o.target(), "error": o.result().as_ref().err() }))
                .collect();
            print_json(json!({
                "id": id.to_string(),
                "record_removed": report.record_removed(),
                "failures": failures,
            }))
        }
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn prepare<E: Entity>(entity: &mut E, transport: Option<&str>) {
    if let Some(transport) = transport {
        entity.asset_mut().ensure_transport(transport);
    }
}

/// A downloaded asset is named after its URL; `--name` overrides that.
async fn rename_download<E: Entity>(atelier: &Atelier, entity: &mut E, name: Option<&str>) -> AtelierResult<()> {
    if name.is_some() {
        entity.asset_mut().set_name(name);
        atelier.assets().save(entity).await?;
    }
    Ok(())
}

async fn ingest_file(
    atelier: &Atelier,
    source: &str,
    name: Option<&str>,
    transport: Option<&str>,
) -> AtelierResult<Sanitised> {
    let mut asset = Asset::default();
    prepare(&mut asset, transport);
    if is_url(source) {
        atelier.assets().from_url(&mut asset, source).await?;
        rename_download(atelier, &mut asset, name).await?;
    } else {
        atelier.assets().from_file(&mut asset, Path::new(source), name).await?;
    }
    atelier.assets().sanitise(&asset).await
}

async fn ingest_image(
    atelier: &Atelier,
    source: &str,
    name: Option<&str>,
    transport: Option<&str>,
) -> AtelierResult<Sanitised> {
    let mut image = Image::default();
    prepare(&mut image, transport);
    if is_url(source) {
        atelier.images().from_url(&mut image, source).await?;
        rename_download(atelier, &mut image, name).await?;
    } else {
        atelier.images().from_file(&mut image, Path::new(source), name).await?;
    }
    atelier.images().sanitise(&image).await
}

fn parse_id(id: &str) -> AtelierResult<AssetId> {
    AssetId::parse(id)
        .ok_or_else(|| AssetError::new(AssetErrorKind::NotFound(format!("no asset with id {}", id))).into())
}

fn print_json(value: Value) -> AtelierResult<()> {
    let json = serde_json::to_string_pretty(&value).map_err(|e| JsonError::new(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
