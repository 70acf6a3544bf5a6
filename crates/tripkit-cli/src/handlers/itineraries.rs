//! Itinerary command handlers

use super::{with_spinner, Session};
use crate::cli::{CreateItineraryArgs, ItineraryCommand};
use crate::error::Result;
use crate::output::{OutputWriter, Tabular};
use serde_json::json;
use tripkit_core::{ItineraryDraft, ItineraryItem};

pub async fn handle_itineraries(command: ItineraryCommand, session: &Session, output: &mut OutputWriter) -> Result<()> {
    session.require_sign_in()?;
    let ops = session.store.itineraries();

    match command {
        ItineraryCommand::List(page) => {
            let page = with_spinner(output, "Loading itineraries", ops.fetch_all(page.into())).await?;
            output.page(&page, "No itineraries yet")
        }
        ItineraryCommand::Show { id, items } => {
            let itinerary = with_spinner(output, "Loading itinerary", ops.fetch(&id)).await?;
            if !items {
                return output.record(&itinerary);
            }

            let items = with_spinner(output, "Loading items", ops.fetch_items(&id)).await?;
            if !output.is_human() {
                return output.data(&json!({ "itinerary": itinerary, "items": items }));
            }

            output.record(&itinerary)?;
            if let Some(description) = &itinerary.description {
                output.writeln(description)?;
            }
            output.section("Items")?;
            if items.is_empty() {
                output.info("No items planned")
            } else {
                output.table(ItineraryItem::HEADERS, items.iter().map(Tabular::row).collect())
            }
        }
        ItineraryCommand::Create(args) => {
            let draft = draft_from(args);
            let created = with_spinner(output, "Creating itinerary", ops.create(&draft)).await?;
            output.success(&format!("Created itinerary {} ({})", created.title, created.id))?;
            if !output.is_human() {
                output.record(&created)?;
            }
            Ok(())
        }
        ItineraryCommand::Delete { id } => {
            with_spinner(output, "Deleting itinerary", ops.delete(&id)).await?;
            output.success(&format!("Deleted itinerary {}", id))
        }
    }
}

fn draft_from(args: CreateItineraryArgs) -> ItineraryDraft {
    ItineraryDraft {
        title: Some(args.title),
        description: args.description,
        destination: args.destination,
        start_date: args.start_date,
        end_date: args.end_date,
    }
}
