use std::io::{self, Write};

use crate::collection::{CollectionStats, SearchOutcome};
use crate::models::{Movie, User};

use super::handler::MENU;

pub fn print_welcome<W: Write>(w: &mut W, username: &str) -> io::Result<()> {
    writeln!(w, "\nWelcome back, {}! 🎬", username)
}

pub fn print_user_choices<W: Write>(w: &mut W, users: &[User]) -> io::Result<()> {
    writeln!(w, "\nWelcome to the Movie App! 🎬")?;
    writeln!(w, "Select a user:")?;
    for (idx, user) in users.iter().enumerate() {
        writeln!(w, "{}. {}", idx + 1, user.name)?;
    }
    writeln!(w, "{}. Create new user", users.len() + 1)
}

pub fn print_menu<W: Write>(w: &mut W, username: &str) -> io::Result<()> {
    writeln!(w, "\n****** {}'s Movie Database ******", username)?;
    for (code, label, _) in MENU {
        writeln!(w, "{}. {}", code, label)?;
    }
    Ok(())
}

pub fn print_collection<W: Write>(w: &mut W, username: &str, movies: &[&Movie]) -> io::Result<()> {
    if movies.is_empty() {
        return writeln!(w, "\n📢 {}, your movie collection is empty.", username);
    }
    writeln!(w, "\n🎬 {}, you have {} movies in total:", username, movies.len())?;
    for movie in movies {
        writeln!(w, "{} ({}): {:.1}", movie.title, movie.year, movie.rating)?;
    }
    Ok(())
}

/// Sorted, filtered, search and stats listings show the stored rating as is.
pub fn print_movies<W: Write>(w: &mut W, heading: &str, movies: &[&Movie]) -> io::Result<()> {
    writeln!(w, "{}", heading)?;
    for movie in movies {
        writeln!(w, "{} ({}): {:?}", movie.title, movie.year, movie.rating)?;
    }
    Ok(())
}

pub fn print_stats<W: Write>(w: &mut W, stats: &CollectionStats<'_>) -> io::Result<()> {
    writeln!(w, "Average rating: {:.2}", stats.average)?;
    writeln!(w, "Median rating: {:.2}", stats.median)?;
    writeln!(w)?;
    print_movies(w, "Best movies:", &stats.best)?;
    writeln!(w)?;
    print_movies(w, "Worst movies:", &stats.worst)
}

pub fn print_random<W: Write>(w: &mut W, movie: &Movie) -> io::Result<()> {
    writeln!(
        w,
        "Your random movie is: {} with rating {:.1}",
        movie.title, movie.rating
    )
}

pub fn print_search<W: Write>(w: &mut W, keyword: &str, outcome: &SearchOutcome<'_>) -> io::Result<()> {
    match outcome {
        SearchOutcome::Matches(found) => print_movies(w, "Search results:", found),
        SearchOutcome::Suggestions(suggestions) => {
            writeln!(w, "The movie '{}' does not exist.", keyword)?;
            if !suggestions.is_empty() {
                writeln!(w, "Did you mean:")?;
                for title in suggestions {
                    writeln!(w, "{}", title)?;
                }
            }
            Ok(())
        }
    }
}
