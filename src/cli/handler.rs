#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Exit,
    ListMovies,
    AddMovie,
    DeleteMovie,
    UpdateNote,
    Stats,
    RandomMovie,
    SearchMovie,
    SortByRating,
    SortByYear,
    FilterMovies,
    GenerateWebsite,
    SwitchUser,
}

/// Menu entries in display order: choice code, label, action.
pub const MENU: &[(&str, &str, MenuAction)] = &[
    ("0", "Exit", MenuAction::Exit),
    ("1", "List Movies", MenuAction::ListMovies),
    ("2", "Add Movie", MenuAction::AddMovie),
    ("3", "Delete Movie", MenuAction::DeleteMovie),
    ("4", "Update Movie", MenuAction::UpdateNote),
    ("5", "Stats", MenuAction::Stats),
    ("6", "Random Movie", MenuAction::RandomMovie),
    ("7", "Search Movie", MenuAction::SearchMovie),
    ("8", "Movies sorted by rating", MenuAction::SortByRating),
    ("9", "Movies sorted by year", MenuAction::SortByYear),
    ("10", "Filter Movies", MenuAction::FilterMovies),
    ("11", "Generate Website", MenuAction::GenerateWebsite),
    ("12", "Switch User", MenuAction::SwitchUser),
];

pub fn parse_choice(input: &str) -> Option<MenuAction> {
    let input = input.trim();
    MENU.iter()
        .find(|(code, _, _)| *code == input)
        .map(|(_, _, action)| *action)
}
