//! Booking command handlers.

use std::sync::Arc;

use tabled::Tabled;

use staybook_core::{Backend, Booking, EntityId, GuestDetails};

use crate::cli::{BookingsArgs, BookingsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Place")]
    place: String,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "Guests")]
    guests: u32,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Till")]
    till: String,
}

impl From<&Arc<Booking>> for BookingRow {
    fn from(b: &Arc<Booking>) -> Self {
        Self {
            id: b.id.to_string(),
            place: b.data.place_title.clone(),
            guest: b.data.guest_name(),
            guests: b.data.guest_number,
            from: util::day(&b.data.booked_from),
            till: util::day(&b.data.booked_till),
        }
    }
}

fn detail(b: &Arc<Booking>) -> String {
    [
        format!("ID:      {}", b.id),
        format!("Place:   {} ({})", b.data.place_title, b.data.place_id),
        format!("Guest:   {}", b.data.guest_name()),
        format!("Guests:  {}", b.data.guest_number),
        format!(
            "Stay:    {} .. {}",
            util::day(&b.data.booked_from),
            util::day(&b.data.booked_till)
        ),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backend: &Backend,
    args: BookingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BookingsCommand::List => {
            let snap = backend.bookings().fetch_all().await?;
            let out = output::render_list(
                &global.output,
                &snap,
                |b| BookingRow::from(b),
                |b| b.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Create {
            place,
            first_name,
            last_name,
            guests,
            from,
            till,
        } => {
            let guest = GuestDetails {
                first_name,
                last_name,
                guest_number: guests,
                booked_from: util::parse_day("from", &from)?,
                booked_till: util::parse_day("till", &till)?,
            };

            let booking = backend.book(&EntityId::from(place), guest).await?;
            output::print_status(&format!("Booked: {}", booking.id), global.quiet);
            let out =
                output::render_single(&global.output, &booking, detail, |b| b.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Cancel { booking } => {
            if !util::confirm(
                &format!("Cancel booking {booking}? This cannot be undone."),
                "bookings cancel",
                global.yes,
            )? {
                return Ok(());
            }
            backend.bookings().delete(&EntityId::from(booking)).await?;
            output::print_status("Booking cancelled", global.quiet);
            Ok(())
        }
    }
}
