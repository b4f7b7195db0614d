//! Cache management commands

use chrono::{DateTime, Utc};

use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;

/// Show cache status/statistics
pub fn status(ctx: &CommandContext) -> Result<()> {
    let path = ctx.cache.path().display().to_string();
    let ttl = ctx.config.cache_ttl();
    let stats = ctx.cache.load().stats(Utc::now(), ttl);

    match ctx.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "total_entries": stats.total_entries,
                "fresh_entries": stats.fresh_entries,
                "expired_entries": stats.expired_entries,
                "ttl_days": ttl.num_days(),
                "oldest_entry_timestamp": stats.oldest_entry.map(|t| t.to_rfc3339()),
                "newest_entry_timestamp": stats.newest_entry.map(|t| t.to_rfc3339()),
                "path": path,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            println!("Cache Status");
            println!("────────────────────────────────────────");
            println!("Location:       {}", path);
            println!("Total entries:  {}", stats.total_entries);
            println!("Fresh entries:  {}", stats.fresh_entries);
            println!("Expired:        {}", stats.expired_entries);
            println!("TTL:            {} days", ttl.num_days());

            if let Some(oldest) = stats.oldest_entry {
                println!("Oldest entry:   {}", local_time(oldest));
            }
            if let Some(newest) = stats.newest_entry {
                println!("Newest entry:   {}", local_time(newest));
            }
        }
    }

    Ok(())
}

/// Clear all cache entries
pub fn clear(ctx: &CommandContext) -> Result<()> {
    let removed = ctx.cache.clear()?;

    match ctx.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries_removed": removed,
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            if removed > 0 {
                println!("Cleared {} cache entries", removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Show cache path
pub fn path(ctx: &CommandContext) -> Result<()> {
    println!("{}", ctx.cache.path().display());
    Ok(())
}

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
