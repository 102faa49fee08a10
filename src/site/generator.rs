use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{AppError, Result};
use crate::models::Movie;

use super::flag::country_to_flag;

pub const TITLE_PLACEHOLDER: &str = "TEMPLATE_TITLE";
pub const GRID_PLACEHOLDER: &str = "TEMPLATE_MOVIE_GRID";

// `.html` names turn on tera's autoescaping for every `{{ }}` value.
const TITLE_NAME: &str = "title.html";
const CARD_NAME: &str = "card.html";

const TITLE_TEMPLATE: &str = "{{ username }}'s Movie App";

const CARD_TEMPLATE: &str = r#"<li>
    <div class="movie">
        {% if movie.imdb_id %}<a href="https://www.imdb.com/title/{{ movie.imdb_id }}" target="_blank">{% else %}<div class="movie-poster-placeholder">{% endif %}<img class="movie-poster" src="{{ movie.poster }}" alt="{{ movie.title }} poster" title="{{ movie.note }}"/>{% if movie.imdb_id %}</a>{% else %}</div>{% endif %}
        <div class="movie-title">{{ movie.title }} {{ movie.flag }}</div>
        <div class="movie-year">{{ movie.year }}</div>
        <div class="movie-rating">⭐ {{ movie.rating }}</div>
{% if movie.soundtrack_url %}        <a class="soundtrack" href="{{ movie.soundtrack_url }}" target="_blank">🎵 Soundtrack</a>
{% endif %}    </div>
</li>"#;

/// What one gallery card shows. Missing poster and note render as empty text;
/// the rating is preformatted so whole numbers keep their `.0`.
#[derive(Serialize)]
struct Card<'a> {
    title: &'a str,
    year: i32,
    rating: String,
    poster: &'a str,
    note: &'a str,
    imdb_id: Option<&'a str>,
    flag: String,
    soundtrack_url: Option<&'a str>,
}

impl<'a> From<&'a Movie> for Card<'a> {
    fn from(movie: &'a Movie) -> Self {
        Self {
            title: &movie.title,
            year: movie.year,
            rating: format!("{:?}", movie.rating),
            poster: movie.poster.as_deref().unwrap_or(""),
            note: movie.note.as_deref().unwrap_or(""),
            imdb_id: movie.imdb_id.as_deref(),
            flag: country_to_flag(movie.country.as_deref().unwrap_or("")),
            soundtrack_url: movie.soundtrack_url.as_deref(),
        }
    }
}

/// Renders the gallery for one user and writes `<output_dir>/<username>.html`.
pub fn write_site(
    template_path: &Path,
    output_dir: &Path,
    username: &str,
    movies: &[Movie],
) -> Result<PathBuf> {
    let template = std::fs::read_to_string(template_path).map_err(|e| {
        AppError::Template(format!("cannot read {}: {}", template_path.display(), e))
    })?;

    let html = render_page(&template, username, movies)?;

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}.html", file_stem(username)));
    std::fs::write(&path, html)?;

    tracing::debug!("Wrote {} movie cards to {}", movies.len(), path.display());
    Ok(path)
}

pub fn render_page(template: &str, username: &str, movies: &[Movie]) -> Result<String> {
    if !template.contains(GRID_PLACEHOLDER) {
        return Err(AppError::Template(format!(
            "template has no {} placeholder",
            GRID_PLACEHOLDER
        )));
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(vec![(TITLE_NAME, TITLE_TEMPLATE), (CARD_NAME, CARD_TEMPLATE)])?;

    let mut ctx = Context::new();
    ctx.insert("username", username);
    let title = tera.render(TITLE_NAME, &ctx)?;

    let grid = movies
        .iter()
        .map(|movie| render_card(&tera, movie))
        .collect::<Result<Vec<_>>>()?
        .join("\n");

    Ok(template
        .replace(TITLE_PLACEHOLDER, &title)
        .replace(GRID_PLACEHOLDER, &grid))
}

fn render_card(tera: &Tera, movie: &Movie) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("movie", &Card::from(movie));
    Ok(tera.render(CARD_NAME, &ctx)?)
}

/// Keeps the output inside `output_dir` whatever the profile is called.
fn file_stem(username: &str) -> String {
    username
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            _ => c,
        })
        .collect()
}
