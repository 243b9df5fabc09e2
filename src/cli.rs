use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::fs;

use crate::models::Visit;
use crate::store::VisitStore;

/// Command-line interface for placelog. Serves the web app when no
/// subcommand is given.
#[derive(Parser)]
#[command(
    name = "placelog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Log café and park visits on a map",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the web app (default)
    Serve,

    /// Append visits from a JSON export of the browser store
    Import {
        /// Path to the JSON file
        file: String,
    },

    /// Remove all stored visits
    Reset,
}

impl Cli {
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

/// Append the visits from a JSON array (the value the browser kept under its
/// `visits` key) to the stored list. Records whose id is already stored are
/// skipped.
pub async fn import_visits(pool: &SqlitePool, file_path: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path)?;
    let incoming: Vec<Visit> = serde_json::from_str(&content)?;

    let store = VisitStore::new(pool.clone());
    let mut visits = store.load().await;
    let before = visits.len();

    for visit in incoming {
        if visits.iter().any(|v| v.id == visit.id) {
            eprintln!("Skipping visit {}: already stored", visit.id);
            continue;
        }
        visits.push(visit);
    }

    store.save(&visits).await?;
    let imported = visits.len() - before;
    println!("Imported {} visits", imported);
    Ok(imported)
}

pub async fn clear_visits(pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    VisitStore::new(pool.clone()).clear().await?;
    println!("Cleared all visits");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"[
        {"date":"2024-06-15T12:00:00.000Z","id":"8441234567","clicks":2,"coords":[51.5,-0.1],
         "placeName":"Blue Bottle","timeSpent":30,"type":"cafe","rating":4,
         "description":"Visit to Blue Bottle on June 15"},
        {"date":"2024-06-16T09:30:00.000Z","id":"8441299999","clicks":0,"coords":[51.507,-0.165],
         "placeName":"Hyde Park","timeSpent":45,"type":"park","activities":"frisbee",
         "description":"Visit to Hyde Park on June 16"}
    ]"#;

    fn write_export(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("placelog-{}-{}.json", name, std::process::id()));
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["placelog"]).unwrap();
        assert_eq!(cli.command(), &Commands::Serve);

        let cli = Cli::try_parse_from(["placelog", "import", "visits.json"]).unwrap();
        assert_eq!(cli.command(), &Commands::Import { file: "visits.json".to_string() });

        let cli = Cli::try_parse_from(["placelog", "reset"]).unwrap();
        assert_eq!(cli.command(), &Commands::Reset);
    }

    #[test]
    fn import_requires_file() {
        assert!(Cli::try_parse_from(["placelog", "import"]).is_err());
        assert!(Cli::try_parse_from(["placelog", "bogus"]).is_err());
    }

    #[tokio::test]
    async fn import_appends_and_skips_duplicates() {
        let pool = crate::db::memory_pool().await;
        let path = write_export("import", EXPORT);

        assert_eq!(import_visits(&pool, &path).await.unwrap(), 2);
        assert_eq!(import_visits(&pool, &path).await.unwrap(), 0);

        let stored = VisitStore::new(pool).load().await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].clicks, 2);
        fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn import_rejects_malformed_file() {
        let pool = crate::db::memory_pool().await;
        let path = write_export("malformed", "[{\"type\":\"gym\"}]");
        assert!(import_visits(&pool, &path).await.is_err());
        fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn clear_empties_store() {
        let pool = crate::db::memory_pool().await;
        let path = write_export("clear", EXPORT);
        import_visits(&pool, &path).await.unwrap();

        clear_visits(&pool).await.unwrap();
        assert!(VisitStore::new(pool).load().await.is_empty());
        fs::remove_file(path).ok();
    }
}
