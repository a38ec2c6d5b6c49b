//! Place command handlers.

use std::sync::Arc;

use tabled::Tabled;

use staybook_core::{Backend, EntityId, NewPlace, Place, PlaceLocation, PlaceUpdate};

use crate::cli::{GlobalOpts, PlacesArgs, PlacesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PlaceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Till")]
    till: String,
    #[tabled(rename = "Owner")]
    owner: String,
}

impl From<&Arc<Place>> for PlaceRow {
    fn from(p: &Arc<Place>) -> Self {
        Self {
            id: p.id.to_string(),
            title: p.data.title.clone(),
            price: format!("{:.2}", p.data.price),
            from: util::day(&p.data.available_from),
            till: util::day(&p.data.available_till),
            owner: p.data.user_id.to_string(),
        }
    }
}

fn detail(p: &Arc<Place>) -> String {
    let mut lines = vec![
        format!("ID:           {}", p.id),
        format!("Title:        {}", p.data.title),
        format!("Description:  {}", p.data.description),
        format!("Price:        {:.2}", p.data.price),
        format!(
            "Available:    {} .. {}",
            util::day(&p.data.available_from),
            util::day(&p.data.available_till)
        ),
        format!("Image:        {}", p.data.image_url),
        format!("Owner:        {}", p.data.user_id),
    ];
    if let Some(ref loc) = p.data.location {
        lines.push(format!("Location:     {:.5}, {:.5}", loc.lat, loc.lng));
        if let Some(ref address) = loc.address {
            lines.push(format!("Address:      {address}"));
        }
    }
    lines.join("\n")
}

fn print_place(place: &Arc<Place>, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, place, detail, |p| p.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(backend: &Backend, args: PlacesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        PlacesCommand::List { bookable } => {
            let places: Vec<Arc<Place>> = if bookable {
                backend.places().fetch_all().await?;
                backend.bookable_places().await?
            } else {
                backend.places().fetch_all().await?.to_vec()
            };
            let out = output::render_list(
                &global.output,
                &places,
                |p| PlaceRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PlacesCommand::Get { place } => {
            let found = backend.places().fetch_one(&EntityId::from(place)).await?;
            print_place(&found, global)
        }

        PlacesCommand::Create {
            title,
            description,
            image_url,
            price,
            from,
            till,
            lat,
            lng,
            address,
        } => {
            let location = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(PlaceLocation {
                    lat,
                    lng,
                    address,
                    static_map_image_url: None,
                }),
                _ => None,
            };
            let draft = NewPlace {
                title,
                description,
                image_url,
                price,
                available_from: util::parse_day("from", &from)?,
                available_till: util::parse_day("till", &till)?,
                location,
            };

            let created = backend.places().create(draft).await?;
            output::print_status(&format!("Place offered: {}", created.id), global.quiet);
            print_place(&created, global)
        }

        PlacesCommand::Update {
            place,
            title,
            description,
            price,
            image_url,
            from,
            till,
        } => {
            let patch = PlaceUpdate {
                title,
                description,
                image_url,
                price,
                available_from: util::parse_optional_day("from", from.as_deref())?,
                available_till: util::parse_optional_day("till", till.as_deref())?,
                location: None,
            };

            // The cache starts empty here; the update re-fetches it first.
            let updated = backend.places().update(&EntityId::from(place), patch).await?;
            output::print_status("Place updated", global.quiet);
            print_place(&updated, global)
        }
    }
}
