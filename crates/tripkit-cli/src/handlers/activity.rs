//! Reviews, alerts, notifications and bookings

use super::{with_spinner, Session};
use crate::cli::{AlertCommand, BookingCommand, NotificationCommand, ReviewCommand};
use crate::error::Result;
use crate::output::OutputWriter;

pub async fn handle_reviews(command: ReviewCommand, session: &Session, output: &mut OutputWriter) -> Result<()> {
    let ops = session.store.reviews();

    match command {
        ReviewCommand::List { target, page } => {
            let page = with_spinner(output, "Loading reviews", ops.fetch_all(target.as_deref(), page.into())).await?;
            output.page(&page, "No reviews")
        }
        ReviewCommand::Helpful { id } => {
            session.require_sign_in()?;
            let review = ops.mark_helpful(&id).await?;
            output.success(&format!(
                "Marked review {} as helpful ({} found it helpful)",
                review.id, review.helpful_count
            ))?;
            if !output.is_human() {
                output.record(&review)?;
            }
            Ok(())
        }
    }
}

pub async fn handle_alerts(command: AlertCommand, session: &Session, output: &mut OutputWriter) -> Result<()> {
    let ops = session.store.alerts();

    match command {
        AlertCommand::List(page) => {
            let page = with_spinner(output, "Loading alerts", ops.fetch_all(page.into())).await?;
            output.page(&page, "No active alerts")
        }
        AlertCommand::Dismiss { id } => {
            session.require_sign_in()?;
            ops.dismiss(&id).await?;
            output.success(&format!("Dismissed alert {}", id))
        }
    }
}

pub async fn handle_notifications(command: NotificationCommand, session: &Session, output: &mut OutputWriter) -> Result<()> {
    session.require_sign_in()?;
    let ops = session.store.notifications();

    match command {
        NotificationCommand::List(page) => {
            let page = with_spinner(output, "Loading notifications", ops.fetch_all(page.into())).await?;
            output.page(&page, "No notifications")?;

            let unread = session.store.select(|state| state.notifications.unread_count);
            if unread > 0 {
                output.info(&format!("{} unread", unread))?;
            }
            Ok(())
        }
        NotificationCommand::Read { id } => {
            let notification = ops.mark_read(&id).await?;
            output.success(&format!("Marked \"{}\" as read", notification.title))?;
            if !output.is_human() {
                output.record(&notification)?;
            }
            Ok(())
        }
        NotificationCommand::ReadAll => {
            ops.mark_all_read().await?;
            output.success("All notifications marked as read")
        }
    }
}

pub async fn handle_bookings(command: BookingCommand, session: &Session, output: &mut OutputWriter) -> Result<()> {
    session.require_sign_in()?;
    let ops = session.store.bookings();

    match command {
        BookingCommand::List(page) => {
            let page = with_spinner(output, "Loading bookings", ops.fetch_all(page.into())).await?;
            output.page(&page, "No bookings")
        }
        BookingCommand::Cancel { id } => {
            let booking = with_spinner(output, "Cancelling booking", ops.cancel(&id)).await?;
            let status = format!("{:?}", booking.status).to_lowercase();
            output.success(&format!("Booking {} is now {}", booking.id, status))?;
            if !output.is_human() {
                output.record(&booking)?;
            }
            Ok(())
        }
    }
}
