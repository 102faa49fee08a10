use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::cli::{self, parse_choice, Console, MenuAction};
use crate::collection::{
    collection_stats, filter_movies, pick_random, search_movies, sort_by_rating, sort_by_title,
    sort_by_year,
};
use crate::config::Config;
use crate::db::{InsertOutcome, Repository};
use crate::error::{AppError, Result};
use crate::models::{MovieFilter, NewMovie, User};
use crate::services::{LastFmClient, MetadataProvider, OmdbClient, SoundtrackProvider};
use crate::site;

pub struct App<R, W> {
    console: Console<R, W>,
    user: Option<User>,

    // Services
    repository: Repository,
    metadata: Option<Box<dyn MetadataProvider>>,
    soundtrack: Option<Box<dyn SoundtrackProvider>>,

    template_path: PathBuf,
    output_dir: PathBuf,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub async fn new(config: &Config, console: Console<R, W>) -> Result<Self> {
        let repository = Repository::open(&config.db_path).await?;

        let metadata = config
            .omdb_api_key
            .as_ref()
            .map(|key| OmdbClient::new(config.omdb_url.clone(), key.clone()))
            .transpose()?
            .map(|client| Box::new(client) as Box<dyn MetadataProvider>);

        let soundtrack = config
            .lastfm_api_key
            .as_ref()
            .map(|key| LastFmClient::new(config.lastfm_url.clone(), key.clone()))
            .transpose()?
            .map(|client| Box::new(client) as Box<dyn SoundtrackProvider>);

        Ok(Self::with_services(config, repository, console, metadata, soundtrack))
    }

    pub fn with_services(
        config: &Config,
        repository: Repository,
        console: Console<R, W>,
        metadata: Option<Box<dyn MetadataProvider>>,
        soundtrack: Option<Box<dyn SoundtrackProvider>>,
    ) -> Self {
        Self {
            console,
            user: None,
            repository,
            metadata,
            soundtrack,
            template_path: PathBuf::from(&config.template_path),
            output_dir: PathBuf::from(&config.output_dir),
        }
    }

    /// Releases the database handle.
    pub async fn shutdown(self) -> Result<()> {
        self.repository.close().await
    }

    /// Profile selection followed by the menu loop. Returns when the user
    /// exits or input is closed; command failures are reported and the loop
    /// carries on.
    pub async fn run(&mut self) -> Result<()> {
        if !self.select_user().await? {
            return Ok(());
        }

        loop {
            let username = self.current_user()?.name;
            cli::print_menu(&mut self.console, &username)?;

            let Some(choice) = self.console.prompt("Enter your choice: ")? else {
                return Ok(());
            };

            let Some(action) = parse_choice(&choice) else {
                writeln!(self.console, "Invalid choice. Please try again.")?;
                continue;
            };

            match self.handle_action(action).await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => {
                    tracing::error!("Command {:?} failed: {}", action, e);
                    writeln!(self.console, "Error: {}", e)?;
                }
            }
        }
    }

    /// Returns `true` when the program should quit.
    pub async fn handle_action(&mut self, action: MenuAction) -> Result<bool> {
        match action {
            MenuAction::Exit => {
                writeln!(self.console, "Bye!")?;
                return Ok(true);
            }
            MenuAction::ListMovies => self.list_movies().await?,
            MenuAction::AddMovie => self.add_movie().await?,
            MenuAction::DeleteMovie => self.delete_movie().await?,
            MenuAction::UpdateNote => self.update_note().await?,
            MenuAction::Stats => self.show_stats().await?,
            MenuAction::RandomMovie => self.random_movie().await?,
            MenuAction::SearchMovie => self.search().await?,
            MenuAction::SortByRating => self.sorted_by_rating().await?,
            MenuAction::SortByYear => self.sorted_by_year().await?,
            MenuAction::FilterMovies => self.filter().await?,
            MenuAction::GenerateWebsite => self.generate_website().await?,
            MenuAction::SwitchUser => {
                if !self.select_user().await? {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// Prompts until a profile is chosen or created. `false` if input closed.
    pub async fn select_user(&mut self) -> Result<bool> {
        loop {
            let users = self.repository.list_users().await?;
            cli::print_user_choices(&mut self.console, &users)?;

            let Some(choice) = self.console.prompt("Enter choice: ")? else {
                return Ok(false);
            };

            match choice.parse::<usize>() {
                Ok(n) if (1..=users.len()).contains(&n) => {
                    let user = users[n - 1].clone();
                    cli::print_welcome(&mut self.console, &user.name)?;
                    self.user = Some(user);
                    return Ok(true);
                }
                Ok(n) if n == users.len() + 1 => {
                    let Some(name) = self.console.prompt("Enter new username: ")? else {
                        return Ok(false);
                    };
                    if let Some(user) = self.create_user(&name).await? {
                        cli::print_welcome(&mut self.console, &user.name)?;
                        self.user = Some(user);
                        return Ok(true);
                    }
                }
                _ => writeln!(self.console, "Invalid choice, please try again.")?,
            }
        }
    }

    async fn create_user(&mut self, name: &str) -> Result<Option<User>> {
        match self.repository.create_user(name).await? {
            InsertOutcome::Inserted(id) => {
                writeln!(self.console, "User '{}' created successfully.", name)?;
                tracing::info!("Created profile {} ({})", name, id);
                Ok(Some(User {
                    id,
                    name: name.to_string(),
                }))
            }
            InsertOutcome::Duplicate => {
                writeln!(self.console, "⚠️ User '{}' already exists.", name)?;
                Ok(None)
            }
            InsertOutcome::EmptyName => {
                writeln!(self.console, "Username cannot be empty.")?;
                Ok(None)
            }
        }
    }

    fn current_user(&self) -> Result<User> {
        self.user
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no profile selected").into())
    }

    async fn list_movies(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let movies = self.repository.list_movies(user.id).await?;
        cli::print_collection(&mut self.console, &user.name, &sort_by_title(&movies))?;
        Ok(())
    }

    async fn add_movie(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let Some(title) = self.console.prompt("Enter movie title: ")? else {
            return Ok(());
        };
        if title.is_empty() {
            writeln!(self.console, "Movie title cannot be empty.")?;
            return Ok(());
        }

        let Some(metadata_provider) = &self.metadata else {
            writeln!(
                self.console,
                "OMDb API key is not configured (set OMDB_API_KEY)."
            )?;
            return Ok(());
        };

        let metadata = match metadata_provider.lookup(&title).await {
            Ok(metadata) => metadata,
            Err(AppError::MovieNotFound(_)) => {
                writeln!(self.console, "Movie '{}' not found in OMDb.", title)?;
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("OMDb lookup for '{}' failed: {}", title, e);
                writeln!(self.console, "Error: Could not connect to OMDb API.")?;
                writeln!(self.console, "{}", e)?;
                return Ok(());
            }
        };

        let soundtrack_url = match &self.soundtrack {
            Some(provider) => match provider.soundtrack_url(&metadata.title).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Soundtrack lookup for '{}' failed: {}", metadata.title, e);
                    None
                }
            },
            None => None,
        };

        let movie = NewMovie {
            user_id: user.id,
            title: metadata.title,
            year: metadata.year,
            rating: metadata.rating,
            poster: metadata.poster,
            imdb_id: metadata.imdb_id,
            country: Some(metadata.country),
            soundtrack_url,
        };
        let stored_title = movie.title.clone();

        match self.repository.insert_movie(movie).await? {
            InsertOutcome::Inserted(_) => {
                writeln!(self.console, "Movie '{}' added successfully.", stored_title)?
            }
            InsertOutcome::Duplicate => writeln!(
                self.console,
                "Movie '{}' is already in your collection.",
                stored_title
            )?,
            InsertOutcome::EmptyName => {
                writeln!(self.console, "OMDb returned an empty title for '{}'.", title)?
            }
        }
        Ok(())
    }

    async fn delete_movie(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let Some(title) = self.console.prompt("Enter movie title to delete: ")? else {
            return Ok(());
        };

        if self.repository.delete_movie(user.id, &title).await? {
            writeln!(self.console, "Movie '{}' deleted successfully.", title)?;
        } else {
            writeln!(self.console, "Movie '{}' not found for this user.", title)?;
        }
        Ok(())
    }

    async fn update_note(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let Some(title) = self.console.prompt("Enter movie title to update: ")? else {
            return Ok(());
        };
        let Some(note) = self.console.prompt("Enter movie note: ")? else {
            return Ok(());
        };

        if self.repository.update_note(user.id, &title, &note).await? {
            writeln!(self.console, "Movie '{}' successfully updated with note.", title)?;
        } else {
            writeln!(self.console, "Movie '{}' not found for this user.", title)?;
        }
        Ok(())
    }

    async fn show_stats(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let movies = self.repository.list_movies(user.id).await?;

        match collection_stats(&movies) {
            Some(stats) => cli::print_stats(&mut self.console, &stats)?,
            None => writeln!(self.console, "\n{}, your collection is empty.", user.name)?,
        }
        Ok(())
    }

    async fn random_movie(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let movies = self.repository.list_movies(user.id).await?;

        match pick_random(&movies, &mut rand::thread_rng()) {
            Some(movie) => cli::print_random(&mut self.console, movie)?,
            None => writeln!(self.console, "No movies found.")?,
        }
        Ok(())
    }

    async fn search(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let Some(keyword) = self.console.prompt("Enter keyword to search: ")? else {
            return Ok(());
        };
        let movies = self.repository.list_movies(user.id).await?;

        let outcome = search_movies(&movies, &keyword);
        cli::print_search(&mut self.console, &keyword, &outcome)?;
        Ok(())
    }

    async fn sorted_by_rating(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let movies = self.repository.list_movies(user.id).await?;

        if movies.is_empty() {
            writeln!(self.console, "No movies found.")?;
            return Ok(());
        }
        cli::print_movies(&mut self.console, "Movies sorted by rating:", &sort_by_rating(&movies))?;
        Ok(())
    }

    async fn sorted_by_year(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let movies = self.repository.list_movies(user.id).await?;

        if movies.is_empty() {
            writeln!(self.console, "No movies found.")?;
            return Ok(());
        }
        cli::print_movies(&mut self.console, "Movies sorted by year:", &sort_by_year(&movies))?;
        Ok(())
    }

    async fn filter(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let Some(min_rating) = self.prompt_number::<f64>("Enter minimum rating (or leave blank): ")? else {
            return Ok(());
        };
        let Some(start_year) = self.prompt_number::<i32>("Enter start year (or leave blank): ")? else {
            return Ok(());
        };
        let Some(end_year) = self.prompt_number::<i32>("Enter end year (or leave blank): ")? else {
            return Ok(());
        };

        let filter = MovieFilter {
            min_rating,
            start_year,
            end_year,
        };
        let movies = self.repository.list_movies(user.id).await?;
        let filtered = filter_movies(&movies, &filter);

        if filtered.is_empty() {
            writeln!(self.console, "No movies found with the given filters.")?;
            return Ok(());
        }
        cli::print_movies(&mut self.console, "Filtered movies:", &filtered)?;
        Ok(())
    }

    /// Outer `None`: input closed. Inner `None`: blank or not a number.
    fn prompt_number<T: std::str::FromStr>(&mut self, prompt: &str) -> Result<Option<Option<T>>> {
        let Some(raw) = self.console.prompt(prompt)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(Some(None));
        }
        match raw.parse::<T>() {
            Ok(value) => Ok(Some(Some(value))),
            Err(_) => {
                writeln!(self.console, "'{}' is not a number, ignoring it.", raw)?;
                Ok(Some(None))
            }
        }
    }

    async fn generate_website(&mut self) -> Result<()> {
        let user = self.current_user()?;
        let movies = self.repository.list_movies(user.id).await?;

        if movies.is_empty() {
            writeln!(self.console, "No movies to display in website.")?;
            return Ok(());
        }

        site::write_site(&self.template_path, &self.output_dir, &user.name, &movies)?;
        writeln!(
            self.console,
            "Website for {} was generated successfully.",
            user.name
        )?;
        Ok(())
    }

    /// Headless gallery export for one profile.
    pub async fn export_website(&mut self, username: &str) -> Result<PathBuf> {
        let user_id = self
            .repository
            .user_id_by_name(username)
            .await?
            .ok_or_else(|| anyhow::anyhow!("no profile named '{}'", username))?;
        let movies = self.repository.list_movies(user_id).await?;
        site::write_site(&self.template_path, &self.output_dir, username, &movies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MovieMetadata;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct FakeMetadata;

    #[async_trait::async_trait]
    impl MetadataProvider for FakeMetadata {
        async fn lookup(&self, title: &str) -> Result<MovieMetadata> {
            match title.to_lowercase().as_str() {
                "inception" => Ok(MovieMetadata {
                    title: "Inception".to_string(),
                    year: 2010,
                    rating: 8.8,
                    poster: Some("https://example.com/inception.jpg".to_string()),
                    imdb_id: Some("tt1375666".to_string()),
                    country: "USA, UK".to_string(),
                }),
                "heat" => Ok(MovieMetadata {
                    title: "Heat".to_string(),
                    year: 1995,
                    rating: 8.3,
                    poster: None,
                    imdb_id: Some("tt0113277".to_string()),
                    country: "USA".to_string(),
                }),
                "offline" => Err(AppError::MetadataApi("connection refused".to_string())),
                _ => Err(AppError::MovieNotFound(title.to_string())),
            }
        }
    }

    struct FailingSoundtrack;

    #[async_trait::async_trait]
    impl SoundtrackProvider for FailingSoundtrack {
        async fn soundtrack_url(&self, _title: &str) -> Result<Option<String>> {
            Err(AppError::MetadataApi("rate limited".to_string()))
        }
    }

    struct FixedSoundtrack;

    #[async_trait::async_trait]
    impl SoundtrackProvider for FixedSoundtrack {
        async fn soundtrack_url(&self, title: &str) -> Result<Option<String>> {
            Ok(Some(format!("https://www.last.fm/music/{}", title)))
        }
    }

    struct Harness {
        dir: TempDir,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn config(&self) -> Config {
            let template_path = self.dir.path().join("template.html");
            std::fs::write(
                &template_path,
                "<h1>TEMPLATE_TITLE</h1><ul>TEMPLATE_MOVIE_GRID</ul>",
            )
            .unwrap();
            Config {
                db_path: self.dir.path().join("movies.db").to_string_lossy().to_string(),
                template_path: template_path.to_string_lossy().to_string(),
                output_dir: self.dir.path().join("site").to_string_lossy().to_string(),
                ..Config::default()
            }
        }

        async fn app(
            &self,
            input: &str,
            soundtrack: Option<Box<dyn SoundtrackProvider>>,
        ) -> App<Cursor<String>, Vec<u8>> {
            let config = self.config();
            let repository = Repository::open(&config.db_path).await.unwrap();
            App::with_services(
                &config,
                repository,
                Console::new(Cursor::new(input.to_string()), Vec::new()),
                Some(Box::new(FakeMetadata)),
                soundtrack,
            )
        }

        async fn session(&self, input: &str) -> String {
            let mut app = self.app(input, Some(Box::new(FailingSoundtrack))).await;
            app.run().await.unwrap();
            let output = output_text(&app);
            app.shutdown().await.unwrap();
            output
        }
    }

    fn output_text(app: &App<Cursor<String>, Vec<u8>>) -> String {
        String::from_utf8_lossy(app.console.output()).to_string()
    }

    #[tokio::test]
    async fn creates_profile_and_exits() {
        let h = Harness::new();

        let out = h.session("1\nSara\n0\n").await;

        assert!(out.contains("1. Create new user"));
        assert!(out.contains("User 'Sara' created successfully."));
        assert!(out.contains("Welcome back, Sara!"));
        assert!(out.contains("Bye!"));
    }

    #[tokio::test]
    async fn empty_and_duplicate_names_reprompt() {
        let h = Harness::new();
        h.session("1\nSara\n0\n").await;

        let out = h.session("2\n\n2\nSara\n9\n1\n0\n").await;

        assert!(out.contains("Username cannot be empty."));
        assert!(out.contains("User 'Sara' already exists."));
        assert!(out.contains("Invalid choice, please try again."));
        assert!(out.contains("Welcome back, Sara!"));
    }

    #[tokio::test]
    async fn add_list_and_duplicate() {
        let h = Harness::new();

        let out = h
            .session("1\nSara\n2\ninception\n2\nInception\n1\n0\n")
            .await;

        assert!(out.contains("Movie 'Inception' added successfully."));
        assert!(out.contains("Movie 'Inception' is already in your collection."));
        assert!(out.contains("Sara, you have 1 movies in total:"));
        assert!(out.contains("Inception (2010): 8.8"));
    }

    #[tokio::test]
    async fn lookup_failures_abort_without_writing() {
        let h = Harness::new();

        let out = h.session("1\nSara\n2\nnope\n2\noffline\n1\n0\n").await;

        assert!(out.contains("Movie 'nope' not found in OMDb."));
        assert!(out.contains("Error: Could not connect to OMDb API."));
        assert!(out.contains("Sara, your movie collection is empty."));
    }

    #[tokio::test]
    async fn soundtrack_failure_does_not_block_add() {
        let h = Harness::new();
        let mut app = h.app("1\nSara\n2\nheat\n0\n", Some(Box::new(FailingSoundtrack))).await;

        app.run().await.unwrap();

        let movies = app.repository.list_movies(1).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].soundtrack_url, None);
        assert_eq!(movies[0].country.as_deref(), Some("USA"));
    }

    #[tokio::test]
    async fn soundtrack_is_stored_when_found() {
        let h = Harness::new();
        let mut app = h.app("1\nSara\n2\nheat\n0\n", Some(Box::new(FixedSoundtrack))).await;

        app.run().await.unwrap();

        let movies = app.repository.list_movies(1).await.unwrap();
        assert_eq!(
            movies[0].soundtrack_url.as_deref(),
            Some("https://www.last.fm/music/Heat")
        );
    }

    #[tokio::test]
    async fn delete_and_update_report_missing_titles() {
        let h = Harness::new();

        let out = h
            .session("1\nSara\n2\nheat\n3\nRonin\n4\nRonin\nmeh\n4\nHeat\nclassic\n3\nHeat\n1\n0\n")
            .await;

        assert!(out.contains("Movie 'Ronin' not found for this user."));
        assert!(out.contains("Movie 'Heat' successfully updated with note."));
        assert!(out.contains("Movie 'Heat' deleted successfully."));
        assert!(out.contains("Sara, your movie collection is empty."));
    }

    #[tokio::test]
    async fn stats_sort_search_and_random() {
        let h = Harness::new();

        let out = h
            .session("1\nSara\n2\nheat\n2\ninception\n5\n6\n7\nInceptoin\n8\n9\n0\n")
            .await;

        assert!(out.contains("Average rating: 8.55"));
        assert!(out.contains("Median rating: 8.55"));
        assert!(out.contains("Your random movie is: "));
        assert!(out.contains("Did you mean:\nInception"));
        assert!(out.contains("Movies sorted by rating:\nInception (2010): 8.8\nHeat (1995): 8.3"));
        assert!(out.contains("Movies sorted by year:\nInception (2010): 8.8\nHeat (1995): 8.3"));
    }

    #[tokio::test]
    async fn malformed_filter_input_is_ignored() {
        let h = Harness::new();

        let out = h
            .session("1\nSara\n2\nheat\n2\ninception\n10\nabc\n2000\n\n10\n9\n\n\n0\n")
            .await;

        assert!(out.contains("'abc' is not a number, ignoring it."));
        assert!(out.contains("Filtered movies:\nInception (2010): 8.8"));
        assert!(!out.contains("Filtered movies:\nHeat"));
        assert!(out.contains("No movies found with the given filters."));
    }

    #[tokio::test]
    async fn invalid_menu_choice_redisplays_menu() {
        let h = Harness::new();

        let out = h.session("1\nSara\n42\n0\n").await;

        assert!(out.contains("Invalid choice. Please try again."));
        assert_eq!(out.matches("****** Sara's Movie Database ******").count(), 2);
    }

    #[tokio::test]
    async fn empty_collection_commands_do_not_fail() {
        let h = Harness::new();

        let out = h.session("1\nSara\n5\n6\n8\n9\n11\n0\n").await;

        assert!(out.contains("Sara, your collection is empty."));
        assert!(out.contains("No movies found."));
        assert!(out.contains("No movies to display in website."));
        assert!(out.contains("Bye!"));
    }

    #[tokio::test]
    async fn switch_user_changes_collection() {
        let h = Harness::new();

        let out = h
            .session("1\nSara\n2\nheat\n12\n2\nTom\n1\n12\n1\n1\n0\n")
            .await;

        assert!(out.contains("Tom, your movie collection is empty."));
        assert!(out.contains("Sara, you have 1 movies in total:"));
    }

    #[tokio::test]
    async fn generates_site_and_survives_missing_template() {
        let h = Harness::new();
        let out = h.session("1\nSara\n2\ninception\n11\n0\n").await;

        assert!(out.contains("Website for Sara was generated successfully."));
        let html = std::fs::read_to_string(h.dir.path().join("site").join("Sara.html")).unwrap();
        assert!(html.contains("<h1>Sara's Movie App</h1>"));
        assert!(html.contains("Inception 🇺🇸"));

        std::fs::remove_file(h.dir.path().join("template.html")).unwrap();
        let config = Config {
            template_path: h.dir.path().join("gone.html").to_string_lossy().to_string(),
            ..h.config()
        };
        let repository = Repository::open(&config.db_path).await.unwrap();
        let mut app = App::with_services(
            &config,
            repository,
            Console::new(Cursor::new("1\n11\n1\n0\n".to_string()), Vec::<u8>::new()),
            None,
            None,
        );
        app.run().await.unwrap();

        let out = output_text(&app);
        assert!(out.contains("Error: Template error"));
        assert!(out.contains("Inception (2010): 8.8"));
    }

    #[tokio::test]
    async fn export_website_for_unknown_user_fails() {
        let h = Harness::new();
        let mut app = h.app("", None).await;

        assert!(app.export_website("ghost").await.is_err());
    }

    #[tokio::test]
    async fn missing_api_key_reports_and_continues() {
        let h = Harness::new();
        let config = h.config();
        let repository = Repository::open(&config.db_path).await.unwrap();
        let mut app = App::with_services(
            &config,
            repository,
            Console::new(Cursor::new("1\nSara\n2\nheat\n0\n".to_string()), Vec::<u8>::new()),
            None,
            None,
        );

        app.run().await.unwrap();

        assert!(output_text(&app).contains("OMDb API key is not configured"));
    }

    #[test]
    fn closed_input_ends_the_session() {
        let h = Harness::new();
        tokio_test::block_on(async {
            let out = h.session("").await;
            assert!(out.contains("Welcome to the Movie App!"));
            assert!(!out.contains("Bye!"));
        });
    }
}
