//! Interactive terminal front end
//!
//! A thin, menu-driven layer over the library service and the catalogs. No
//! flags: every interaction is a prompt. Recoverable errors are printed
//! inline and the loop keeps running; only startup failures abort.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::{
    catalog::{Catalog, OmdbClient, OpenLibraryClient},
    config::Config,
    error::AppResult,
    models::{Candidate, MediaKind, MediaRecord, Status},
    services::{
        library::{MAX_RATING, MIN_RATING},
        recommend, stats, Library,
    },
    store,
};

/// Runs the application until the user quits
pub async fn run(config: Config) -> anyhow::Result<()> {
    let store = store::create_store(&config).await?;
    let app = App {
        library: Library::new(store),
        // Kept as a Result so the configuration message is reported at the
        // moment movie search is requested, not at startup
        movie_catalog: OmdbClient::from_config(&config),
        book_catalog: OpenLibraryClient::new(config.open_library_url.clone()),
        input: BufReader::new(tokio::io::stdin()).lines(),
    };

    app.main_menu().await;
    Ok(())
}

struct App {
    library: Library,
    movie_catalog: AppResult<OmdbClient>,
    book_catalog: OpenLibraryClient,
    input: Lines<BufReader<Stdin>>,
}

impl App {
    async fn main_menu(mut self) {
        loop {
            print_header("Media Tracker");
            println!("1. Movies");
            println!("2. Books");
            println!("3. Recommendations");
            println!("4. Statistics");
            println!("5. Quit");

            match self.prompt("\nChoose an option: ").await.as_str() {
                "1" => self.kind_menu(MediaKind::Movie).await,
                "2" => self.kind_menu(MediaKind::Book).await,
                "3" => self.report(self.show_recommendations().await),
                "4" => self.report(self.show_statistics().await),
                "5" | "" => {
                    println!("\nGoodbye!");
                    return;
                }
                _ => println!("Invalid option."),
            }
        }
    }

    async fn kind_menu(&mut self, kind: MediaKind) {
        loop {
            print_header(&format!("{}s", capitalize(&kind.to_string())));
            println!("1. Search and add");
            println!("2. View all");
            println!("3. View by status");
            println!("4. View favorites");
            println!("5. Update status");
            println!("6. Rate");
            println!("7. Toggle favorite");
            println!("8. Edit note");
            println!("9. Delete");
            println!("0. Back");

            let choice = self.prompt("\nChoose an option: ").await;
            let result = match choice.as_str() {
                "1" => self.search_and_add(kind).await,
                "2" => self.view_all(kind).await,
                "3" => self.view_by_status(kind).await,
                "4" => self.view_favorites(kind).await,
                "5" => self.update_status(kind).await,
                "6" => self.rate(kind).await,
                "7" => self.toggle_favorite(kind).await,
                "8" => self.edit_note(kind).await,
                "9" => self.delete(kind).await,
                "0" | "" => return,
                _ => {
                    println!("Invalid option.");
                    Ok(())
                }
            };
            self.report(result);
        }
    }

    fn report(&self, result: AppResult<()>) {
        if let Err(e) = result {
            println!("\nError: {}", e);
        }
    }

    async fn search_and_add(&mut self, kind: MediaKind) -> AppResult<()> {
        let catalog: Box<dyn Catalog> = match kind {
            MediaKind::Movie => match &self.movie_catalog {
                Ok(catalog) => Box::new(catalog.clone()),
                Err(e) => {
                    println!("\n{}", e);
                    return Ok(());
                }
            },
            MediaKind::Book => Box::new(self.book_catalog.clone()),
        };

        let query = self.prompt("Search for: ").await;
        if query.is_empty() {
            return Ok(());
        }

        let mut candidates = catalog.search(&query).await?;
        if candidates.is_empty() {
            println!("No results for '{}'.", query);
            return Ok(());
        }

        println!();
        for (i, candidate) in candidates.iter().enumerate() {
            display_candidate(i + 1, candidate);
        }

        let picked = match self.pick(candidates.len()).await {
            Some(index) => candidates.remove(index),
            None => return Ok(()),
        };
        let candidate = catalog.enrich(picked).await?;

        let status = match self.pick_status(kind).await {
            Some(status) => status,
            None => return Ok(()),
        };
        let record = self.library.add(candidate, status).await?;
        println!("\nAdded '{}' to your library.", record.title);

        if let Some(rating) = self.pick_rating().await {
            self.library.rate(&record.external_id, kind, rating).await?;
            println!("Rated {}/10.", rating);
        }

        Ok(())
    }

    async fn view_all(&mut self, kind: MediaKind) -> AppResult<()> {
        let records = self.library.records(kind).await?;
        display_records(&records, kind);
        Ok(())
    }

    async fn view_by_status(&mut self, kind: MediaKind) -> AppResult<()> {
        let status = match self.pick_status(kind).await {
            Some(status) => status,
            None => return Ok(()),
        };
        let records = self.library.records_by_status(kind, status).await?;
        display_records(&records, kind);
        Ok(())
    }

    async fn view_favorites(&mut self, kind: MediaKind) -> AppResult<()> {
        let records = self.library.favorites(kind).await?;
        display_records(&records, kind);
        Ok(())
    }

    async fn update_status(&mut self, kind: MediaKind) -> AppResult<()> {
        let external_id = match self.pick_record(kind).await? {
            Some(id) => id,
            None => return Ok(()),
        };
        let status = match self.pick_status(kind).await {
            Some(status) => status,
            None => return Ok(()),
        };
        let rating = self.pick_rating().await;

        let record = self
            .library
            .set_status(&external_id, kind, status, rating)
            .await?;
        println!("\n'{}' is now: {}", record.title, status.label(kind));
        Ok(())
    }

    async fn rate(&mut self, kind: MediaKind) -> AppResult<()> {
        let external_id = match self.pick_record(kind).await? {
            Some(id) => id,
            None => return Ok(()),
        };
        let rating = match self.pick_rating().await {
            Some(rating) => rating,
            None => return Ok(()),
        };

        let record = self.library.rate(&external_id, kind, rating).await?;
        println!("\nRated '{}' {}/10.", record.title, rating);
        Ok(())
    }

    async fn toggle_favorite(&mut self, kind: MediaKind) -> AppResult<()> {
        let external_id = match self.pick_record(kind).await? {
            Some(id) => id,
            None => return Ok(()),
        };

        let record = self.library.toggle_favorite(&external_id, kind).await?;
        if record.is_favorite {
            println!("\n'{}' marked as favorite.", record.title);
        } else {
            println!("\n'{}' is no longer a favorite.", record.title);
        }
        Ok(())
    }

    async fn edit_note(&mut self, kind: MediaKind) -> AppResult<()> {
        let external_id = match self.pick_record(kind).await? {
            Some(id) => id,
            None => return Ok(()),
        };

        let notes = self.prompt("Note (empty to clear): ").await;
        let notes = (!notes.is_empty()).then_some(notes);
        self.library.set_notes(&external_id, kind, notes).await?;
        println!("\nNote saved.");
        Ok(())
    }

    async fn delete(&mut self, kind: MediaKind) -> AppResult<()> {
        let external_id = match self.pick_record(kind).await? {
            Some(id) => id,
            None => return Ok(()),
        };

        let confirm = self.prompt("Delete this record? (y/N): ").await;
        if !confirm.eq_ignore_ascii_case("y") {
            return Ok(());
        }

        self.library.remove(&external_id, kind).await?;
        println!("\nDeleted.");
        Ok(())
    }

    async fn show_recommendations(&self) -> AppResult<()> {
        print_header("Recommendations");

        for kind in [MediaKind::Movie, MediaKind::Book] {
            let records = self.library.records(kind).await?;
            let recommendations = recommend::recommend(&records);

            println!("{}s:", capitalize(&kind.to_string()));
            if recommendations.top_tags.is_empty() {
                println!("  Nothing to go on yet. Complete or rate a few items first.\n");
                continue;
            }

            let tags: Vec<&str> = recommendations
                .top_tags
                .iter()
                .take(3)
                .map(|t| t.tag.as_str())
                .collect();
            println!("  Based on your favorite tags: {}", tags.join(", "));

            if recommendations.candidates.is_empty() {
                println!("  No unseen matches in your library.\n");
                continue;
            }
            for suggestion in recommendations.candidates.iter().take(5) {
                println!("  - {} (score {:.0})", suggestion.title, suggestion.score);
            }
            println!();
        }

        Ok(())
    }

    async fn show_statistics(&self) -> AppResult<()> {
        print_header("Statistics");

        for kind in [MediaKind::Movie, MediaKind::Book] {
            let records = self.library.records(kind).await?;
            let summary = stats::summarize(&records);

            println!("{}s:", capitalize(&kind.to_string()));
            for status in Status::ALL {
                println!(
                    "  {}: {}",
                    status.label(kind),
                    summary.counts_by_status[&status]
                );
            }
            match summary.average_rating {
                Some(avg) => println!("  Average rating: {:.1}/10", avg),
                None => println!("  Average rating: -"),
            }
            if !summary.top_tags.is_empty() {
                let tags: Vec<String> = summary
                    .top_tags
                    .iter()
                    .map(|t| format!("{} ({})", t.tag, t.count))
                    .collect();
                println!("  Top tags: {}", tags.join(", "));
            }
            println!();
        }

        Ok(())
    }

    /// Lists the library and asks for a record number; None cancels
    async fn pick_record(&mut self, kind: MediaKind) -> AppResult<Option<String>> {
        let records = self.library.records(kind).await?;
        if records.is_empty() {
            println!("Your {} library is empty.", kind);
            return Ok(None);
        }

        println!();
        for (i, record) in records.iter().enumerate() {
            println!("{}. {}", i + 1, one_line(record));
        }

        Ok(self
            .pick(records.len())
            .await
            .map(|index| records[index].external_id.clone()))
    }

    /// Asks for a number in [1, max]; empty input cancels
    async fn pick(&mut self, max: usize) -> Option<usize> {
        loop {
            let value = self.prompt("\nPick a number (Enter to cancel): ").await;
            if value.is_empty() {
                return None;
            }
            match value.parse::<usize>() {
                Ok(n) if (1..=max).contains(&n) => return Some(n - 1),
                _ => println!("Please enter a number between 1 and {}.", max),
            }
        }
    }

    async fn pick_status(&mut self, kind: MediaKind) -> Option<Status> {
        println!();
        for (i, status) in Status::ALL.iter().enumerate() {
            println!("{}. {}", i + 1, status.label(kind));
        }

        self.pick(Status::ALL.len()).await.map(|i| Status::ALL[i])
    }

    /// Asks for an optional rating; empty input skips
    async fn pick_rating(&mut self) -> Option<u8> {
        loop {
            let value = self
                .prompt("Your rating (1-10, Enter to skip): ")
                .await;
            if value.is_empty() {
                return None;
            }
            match value.parse::<u8>() {
                Ok(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => {
                    return Some(rating)
                }
                _ => println!(
                    "Rating must be between {} and {}.",
                    MIN_RATING, MAX_RATING
                ),
            }
        }
    }

    /// Reads one trimmed line; EOF reads as an empty line so every menu
    /// treats it as cancel/quit
    async fn prompt(&mut self, text: &str) -> String {
        print!("{}", text);
        let _ = std::io::stdout().flush();

        match self.input.next_line().await {
            Ok(Some(line)) => line.trim().to_string(),
            Ok(None) | Err(_) => String::new(),
        }
    }
}

fn print_header(title: &str) {
    println!("\n{}", "=".repeat(40));
    println!("  {}", title);
    println!("{}\n", "=".repeat(40));
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn one_line(record: &MediaRecord) -> String {
    let mut line = record.title.clone();
    if let Some(year) = &record.year {
        line.push_str(&format!(" ({})", year));
    }
    line.push_str(&format!(" - {}", record.status.label(record.kind)));
    if let Some(rating) = record.user_rating {
        line.push_str(&format!(", {}/10", rating));
    }
    if record.is_favorite {
        line.push_str(" *");
    }
    line
}

fn display_candidate(number: usize, candidate: &Candidate) {
    let year = candidate
        .year
        .as_deref()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    let creator = candidate
        .creator
        .as_deref()
        .map(|c| format!(" - {}", c))
        .unwrap_or_default();
    println!("{}. {}{}{}", number, candidate.title, year, creator);
}

fn display_records(records: &[MediaRecord], kind: MediaKind) {
    if records.is_empty() {
        println!("Your {} library is empty.", kind);
        return;
    }

    println!();
    for record in records {
        display_record(record);
    }
}

fn display_record(record: &MediaRecord) {
    let year = record
        .year
        .as_deref()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    let favorite = if record.is_favorite { " *" } else { "" };
    println!("{}{}{}", record.title, year, favorite);

    let creator_label = match record.kind {
        MediaKind::Movie => "Director",
        MediaKind::Book => "Author",
    };
    if let Some(creator) = &record.creator {
        println!("   {}: {}", creator_label, creator);
    }
    if !record.tags.is_empty() {
        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        println!("   Tags: {}", tags.join(", "));
    }
    println!("   Status: {}", record.status.label(record.kind));
    if let Some(rating) = &record.catalog_rating {
        println!("   Catalog rating: {}", rating);
    }
    if let Some(rating) = record.user_rating {
        println!("   Your rating: {}/10", rating);
    }
    if let Some(synopsis) = &record.synopsis {
        if synopsis.chars().count() > 100 {
            let short: String = synopsis.chars().take(100).collect();
            println!("   {}...", short);
        } else {
            println!("   {}", synopsis);
        }
    }
    if let Some(notes) = &record.notes {
        println!("   Note: {}", notes);
    }
    println!();
}
