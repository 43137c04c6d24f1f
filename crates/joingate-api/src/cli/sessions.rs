//! `joingate sessions` -- inspect and reset stored funnel sessions.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use joingate_core::repository::{SessionFilter, SessionStore};
use joingate_types::session::{FunnelStatus, UserId, UserSession};

/// List sessions, optionally filtered by status.
pub async fn list_sessions(
    store: &impl SessionStore,
    status: Option<&str>,
    limit: u32,
    json: bool,
) -> Result<()> {
    let status = status
        .map(|s| s.parse::<FunnelStatus>().map_err(anyhow::Error::msg))
        .transpose()?;
    let sessions = store
        .list(SessionFilter {
            status,
            limit: Some(limit),
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!("  {}", style("No sessions found.").dim());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("User ID").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Starts").fg(Color::White),
        Cell::new("Email").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for session in &sessions {
        table.add_row(vec![
            Cell::new(session.user_id),
            status_cell(session.status),
            Cell::new(session.start_count),
            Cell::new(session.email.as_deref().unwrap_or("-")),
            Cell::new(format_relative_time(&session.updated_at)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

/// Show one session.
pub async fn show_session(store: &impl SessionStore, user_id: &str, json: bool) -> Result<()> {
    let user_id = parse_user_id(user_id)?;
    let session = store
        .get(user_id)
        .await?
        .with_context(|| format!("no session for user {user_id}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    print_session(&session);
    Ok(())
}

/// Reset a session to the start of the funnel.
///
/// The start counter is kept, matching the in-chat restart action.
pub async fn reset_session(store: &impl SessionStore, user_id: &str, json: bool) -> Result<()> {
    let user_id = parse_user_id(user_id)?;
    let mut session = store
        .get(user_id)
        .await?
        .with_context(|| format!("no session for user {user_id}"))?;

    session.reset();
    session.updated_at = Utc::now();
    store.save(&session).await?;
    tracing::info!(user_id = %user_id, "session reset");

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!();
        println!(
            "  {} Session for {} reset to {}",
            style("✓").green().bold(),
            style(user_id).cyan(),
            style(session.status).bold()
        );
        println!();
    }
    Ok(())
}

fn parse_user_id(raw: &str) -> Result<UserId> {
    raw.parse::<UserId>()
        .with_context(|| format!("invalid user id '{raw}'"))
}

fn print_session(session: &UserSession) {
    println!();
    println!("  {} {}", style("User").dim(), style(session.user_id).cyan().bold());
    println!("  {}", style("──────────────────────────").dim());
    println!("  Status:   {}", status_label(session.status));
    println!("  Starts:   {}", session.start_count);
    println!(
        "  Email:    {}",
        session.email.as_deref().unwrap_or("(not captured)")
    );
    println!("  Started:  {}", session.started_at.to_rfc3339());
    println!(
        "  Updated:  {} ({})",
        session.updated_at.to_rfc3339(),
        format_relative_time(&session.updated_at)
    );
    println!();
}

fn status_cell(status: FunnelStatus) -> Cell {
    match status {
        FunnelStatus::New => Cell::new("○ new").fg(Color::DarkGrey),
        FunnelStatus::WaitingJoin => Cell::new("◐ waiting_join").fg(Color::Yellow),
        FunnelStatus::WaitingEmail => Cell::new("◑ waiting_email").fg(Color::Cyan),
        FunnelStatus::Done => Cell::new("● done").fg(Color::Green),
    }
}

fn status_label(status: FunnelStatus) -> String {
    match status {
        FunnelStatus::Done => style(status).green().to_string(),
        FunnelStatus::New => style(status).dim().to_string(),
        _ => style(status).yellow().to_string(),
    }
}

/// Format a timestamp as "5m ago", "3h ago", "2d ago".
fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let secs = (Utc::now() - *dt).num_seconds().max(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joingate_core::repository::InMemorySessionStore;

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now), "just now");
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::minutes(5))),
            "5m ago"
        );
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::hours(3))),
            "3h ago"
        );
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::days(2))),
            "2d ago"
        );
    }

    #[tokio::test]
    async fn reset_moves_session_back_to_new() {
        let store = InMemorySessionStore::new();
        let mut session = UserSession::new(UserId(3));
        session.status = FunnelStatus::Done;
        session.start_count = 4;
        session.email = Some("a@b.co".to_string());
        store.save(&session).await.unwrap();

        reset_session(&store, "3", true).await.unwrap();

        let loaded = store.get(UserId(3)).await.unwrap().unwrap();
        assert_eq!(loaded.status, FunnelStatus::New);
        assert_eq!(loaded.start_count, 4);
        assert!(loaded.email.is_none());
    }

    #[tokio::test]
    async fn unknown_user_and_bad_input_are_errors() {
        let store = InMemorySessionStore::new();
        assert!(show_session(&store, "99", true).await.is_err());
        assert!(reset_session(&store, "not-a-number", true).await.is_err());
        assert!(list_sessions(&store, Some("bogus"), 10, true).await.is_err());
    }

    #[tokio::test]
    async fn list_accepts_status_filter() {
        let store = InMemorySessionStore::new();
        store.save(&UserSession::new(UserId(1))).await.unwrap();
        list_sessions(&store, Some("new"), 10, true).await.unwrap();
        list_sessions(&store, None, 10, false).await.unwrap();
    }
}
